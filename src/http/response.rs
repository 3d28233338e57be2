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

//! Status-line + header-block parsing for responses read back on the
//! client path (e.g. the 101 handshake response).

use crate::http::error::ResponseError;
use crate::http::headers::{parse_headers, Headers};
use crate::tokenizer::Tokenizer;

#[derive(Debug, Clone, PartialEq)]
pub struct Response<'a> {
  pub protocol: &'a str,
  pub status: i64,
  pub message: &'a str,
  pub headers: Headers<'a>,
  pub body: &'a str,
}

impl<'a> Response<'a> {
  pub fn header(&self, name: &str) -> Option<&str> {
    self.headers.get(name)
  }
}

/// Parses `HTTP/<version> <status> <message>\r\n<headers>\r\n<body>`.
/// `status` must be a decimal integer in `100..=599`; everything after
/// the header block's terminating blank line is returned verbatim as
/// `body` (no `Content-Length`-driven truncation — the caller decides how
/// much of `data` is actually theirs).
pub fn parse_response(data: &str) -> Result<Response<'_>, ResponseError> {
  let mut tokenizer = Tokenizer::create(data, Some("<status-line>"));

  let protocol = tokenizer.read_string_until(&[" "])?;
  tokenizer.skip_string(" ")?;

  let status_text = tokenizer.read_string_until(&[" "])?;
  let status: i64 = status_text
    .parse()
    .map_err(|_| ResponseError::InvalidStatus { status: status_text.to_string() })?;
  if !(100..=599).contains(&status) {
    return Err(ResponseError::StatusOutOfRange { status });
  }
  tokenizer.skip_string(" ")?;

  let message = tokenizer.read_string_until(&["\r\n"])?;
  tokenizer.skip_string("\r\n")?;

  let header_data = &data[tokenizer.position()..];
  let (headers, header_len) = parse_headers(header_data)?;
  let body = &header_data[header_len..];

  Ok(Response { protocol, status, message, headers, body })
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_101_switching_protocols() {
    let response = parse_response(
      "HTTP/1.1 101 Switching Protocols\r\nUpgrade: websocket\r\nConnection: Upgrade\r\nSec-WebSocket-Accept: s3pPLMBiTxaQ9kYGzzhZRbK+xOo=\r\n\r\n",
    )
    .unwrap();
    assert_eq!(response.protocol, "HTTP/1.1");
    assert_eq!(response.status, 101);
    assert_eq!(response.message, "Switching Protocols");
    assert_eq!(
      response.header("Sec-WebSocket-Accept"),
      Some("s3pPLMBiTxaQ9kYGzzhZRbK+xOo=")
    );
  }

  #[test]
  fn rejects_non_numeric_status() {
    let err = parse_response("HTTP/1.1 abc Nope\r\n\r\n").unwrap_err();
    assert_eq!(err, ResponseError::InvalidStatus { status: "abc".to_string() });
  }

  #[test]
  fn rejects_out_of_range_status() {
    let err = parse_response("HTTP/1.1 999 Nope\r\n\r\n").unwrap_err();
    assert_eq!(err, ResponseError::StatusOutOfRange { status: 999 });
  }

  #[test]
  fn exposes_trailing_body() {
    let response =
      parse_response("HTTP/1.1 200 OK\r\nContent-Length: 5\r\n\r\nhello").unwrap();
    assert_eq!(response.body, "hello");
  }
}
