// Copyright 2023 Divy Srivastava <dj.srivastava23@gmail.com>
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Request-line + header-block parsing. Only `GET` request-lines are
//! accepted — a body-carrying method would need a `Content-Length`-driven
//! read loop that this crate's dispatcher never performs.

use crate::http::error::RequestError;
use crate::http::headers::{parse_headers, Headers};
use crate::http::method::Method;
use crate::token::Token;
use crate::tokenizer::Tokenizer;

/// A parsed HTTP request. Borrows its strings out of the input buffer
/// wherever the wire bytes didn't need folding or escaping.
#[derive(Debug, Clone, PartialEq)]
pub struct Request<'a> {
  pub method: Method,
  pub path: &'a str,
  pub protocol: &'a str,
  pub headers: Headers<'a>,
}

impl<'a> Request<'a> {
  pub fn header(&self, name: &str) -> Option<&str> {
    self.headers.get(name)
  }
}

/// Parses `GET <path> HTTP/<version>\r\n<headers>\r\n` out of `data`.
/// Returns the request and the number of bytes consumed, so callers can
/// slice off the body (if any) that follows.
pub fn parse_request(data: &str) -> Result<(Request<'_>, usize), RequestError> {
  let mut tokenizer = Tokenizer::create(data, Some("<request-line>"));

  tokenizer.expect_exact(&Token::UpperSymbol("GET".to_string()))?;
  tokenizer.skip_string(" ")?;

  let path = tokenizer.read_string_until(&[" "])?;
  if !path.starts_with('/') {
    return Err(RequestError::InvalidPath { path: path.to_string() });
  }
  tokenizer.skip_string(" ")?;

  let protocol = tokenizer.read_string_until(&["\r\n"])?;
  tokenizer.skip_string("\r\n")?;

  let header_data = &data[tokenizer.position()..];
  let (headers, header_len) = parse_headers(header_data)?;

  Ok((
    Request { method: Method::Get, path, protocol, headers },
    tokenizer.position() + header_len,
  ))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_minimal_get() {
    let (request, consumed) =
      parse_request("GET / HTTP/1.1\r\nHost: example.com\r\n\r\n").unwrap();
    assert_eq!(request.method, Method::Get);
    assert_eq!(request.path, "/");
    assert_eq!(request.protocol, "HTTP/1.1");
    assert_eq!(request.header("Host"), Some("example.com"));
    assert_eq!(consumed, "GET / HTTP/1.1\r\nHost: example.com\r\n\r\n".len());
  }

  #[test]
  fn rejects_path_without_leading_slash() {
    let err = parse_request("GET foo HTTP/1.1\r\n\r\n").unwrap_err();
    assert_eq!(err, RequestError::InvalidPath { path: "foo".to_string() });
  }

  #[test]
  fn rejects_non_get_method() {
    let err = parse_request("POST / HTTP/1.1\r\n\r\n").unwrap_err();
    match err {
      RequestError::Tokenizer(crate::tokenizer::TokenizerError::ExpectedToken {
        expected,
        actual,
        ..
      }) => {
        assert_eq!(expected, Token::UpperSymbol("GET".to_string()));
        assert_eq!(actual, Token::UpperSymbol("POST".to_string()));
      }
      other => panic!("expected a tokenizer ExpectedToken error, got {other:?}"),
    }
  }

  #[test]
  fn exposes_websocket_upgrade_headers() {
    let (request, _) = parse_request(
      "GET /chat HTTP/1.1\r\nHost: example.com\r\nUpgrade: websocket\r\nConnection: Upgrade\r\nSec-WebSocket-Key: dGhlIHNhbXBsZSBub25jZQ==\r\nSec-WebSocket-Version: 13\r\n\r\n",
    )
    .unwrap();
    assert_eq!(request.header("Upgrade"), Some("websocket"));
    assert_eq!(
      request.header("Sec-WebSocket-Key"),
      Some("dGhlIHNhbXBsZSBub25jZQ==")
    );
  }
}
