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

//! The RFC 6455 §1.3 opening handshake: server-side verification and
//! accept-key computation, and the client-side request builder.

use base64::Engine;
use sha1::{Digest, Sha1};

use crate::http::Request;

const WEBSOCKET_GUID: &str = "258EAFA5-E914-47DA-95CA-C5AB0DC85B11";

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum HandshakeError {
  #[error("missing required header {name:?}")]
  MissingHeader { name: &'static str },

  #[error("header {name:?} was {actual:?}, expected {expected:?}")]
  UnexpectedHeaderValue {
    name: &'static str,
    expected: &'static str,
    actual: String,
  },
}

/// Computes `base64(SHA1(key ++ GUID))`, the `Sec-WebSocket-Accept` value.
pub fn accept_key(client_key: &str) -> String {
  let mut hasher = Sha1::new();
  hasher.update(client_key.as_bytes());
  hasher.update(WEBSOCKET_GUID.as_bytes());
  base64::engine::general_purpose::STANDARD.encode(hasher.finalize())
}

/// Verifies the upgrade preconditions from §4.D: `Sec-WebSocket-Key`,
/// `Connection: Upgrade`, `Upgrade: websocket`, `Sec-WebSocket-Version:
/// 13`, and `Host` must all be present with the right values. Returns
/// the client key on success.
pub fn verify_upgrade_request<'a>(
  request: &'a Request<'a>,
) -> Result<&'a str, HandshakeError> {
  require_header(request, "Host")?;

  let upgrade = require_header(request, "Upgrade")?;
  if !upgrade.eq_ignore_ascii_case("websocket") {
    return Err(HandshakeError::UnexpectedHeaderValue {
      name: "Upgrade",
      expected: "websocket",
      actual: upgrade.to_string(),
    });
  }

  let connection = require_header(request, "Connection")?;
  if !connection.split(',').any(|token| token.trim().eq_ignore_ascii_case("upgrade")) {
    return Err(HandshakeError::UnexpectedHeaderValue {
      name: "Connection",
      expected: "Upgrade",
      actual: connection.to_string(),
    });
  }

  let version = require_header(request, "Sec-WebSocket-Version")?;
  if version != "13" {
    return Err(HandshakeError::UnexpectedHeaderValue {
      name: "Sec-WebSocket-Version",
      expected: "13",
      actual: version.to_string(),
    });
  }

  require_header(request, "Sec-WebSocket-Key")
}

fn require_header<'a>(
  request: &'a Request<'a>,
  name: &'static str,
) -> Result<&'a str, HandshakeError> {
  request.header(name).ok_or(HandshakeError::MissingHeader { name })
}

/// Builds the exact four-line `101 Switching Protocols` response from §4.D.
pub fn switching_protocols_response(client_key: &str) -> String {
  format!(
    "HTTP/1.1 101 Switching Protocols\r\nUpgrade: websocket\r\nConnection: Upgrade\r\nSec-WebSocket-Accept: {}\r\n\r\n",
    accept_key(client_key)
  )
}

/// The literal `400 Bad Request` sent when a handshake precondition fails.
pub fn bad_request_response() -> &'static str {
  "HTTP/1.1 400 Bad Request\r\nContent-Length: 0\r\n\r\n"
}

/// Generates a fresh client-side `Sec-WebSocket-Key`: 16 random bytes,
/// base64-encoded.
pub fn generate_key() -> String {
  use rand::Rng;
  let mut nonce = [0u8; 16];
  rand::thread_rng().fill(&mut nonce);
  base64::engine::general_purpose::STANDARD.encode(nonce)
}

/// Splits `[scheme://]host[:port][/path]` into the host (and optional
/// port) portion, per §6's `host_from_url` contract.
pub fn host_from_url(url: &str) -> &str {
  let after_scheme = match url.find("://") {
    Some(idx) => &url[idx + 3..],
    None => url,
  };
  match after_scheme.find('/') {
    Some(idx) => &after_scheme[..idx],
    None => after_scheme,
  }
}

/// Returns the path portion of `url`, or `"/"` when the URL has none.
pub fn path_from_url(url: &str) -> &str {
  let after_scheme = match url.find("://") {
    Some(idx) => &url[idx + 3..],
    None => url,
  };
  match after_scheme.find('/') {
    Some(idx) => &after_scheme[idx..],
    None => "/",
  }
}

/// Builds the client-side upgrade request text for `url`. A caller-supplied
/// `Host` header in `extra_headers` is preserved as-is; otherwise one is
/// derived from `url`.
pub fn build_upgrade_request(url: &str, extra_headers: &[(&str, &str)]) -> String {
  let path = path_from_url(url);
  let key = generate_key();

  let mut request = format!("GET {path} HTTP/1.1\r\n");
  if !extra_headers.iter().any(|(name, _)| name.eq_ignore_ascii_case("host")) {
    request.push_str(&format!("Host: {}\r\n", host_from_url(url)));
  }
  request.push_str("Upgrade: websocket\r\n");
  request.push_str("Connection: Upgrade\r\n");
  request.push_str(&format!("Sec-WebSocket-Key: {key}\r\n"));
  request.push_str("Sec-WebSocket-Version: 13\r\n");
  for (name, value) in extra_headers {
    request.push_str(&format!("{name}: {value}\r\n"));
  }
  request.push_str("\r\n");
  request
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::http::parse_request;

  #[test]
  fn computes_the_spec_accept_value() {
    assert_eq!(
      accept_key("dGhlIHNhbXBsZSBub25jZQ=="),
      "s3pPLMBiTxaQ9kYGzzhZRbK+xOo="
    );
  }

  #[test]
  fn verifies_a_well_formed_upgrade_request() {
    let (request, _) = parse_request(
      "GET /chat HTTP/1.1\r\nHost: example.com\r\nUpgrade: websocket\r\nConnection: Upgrade\r\nSec-WebSocket-Key: dGhlIHNhbXBsZSBub25jZQ==\r\nSec-WebSocket-Version: 13\r\n\r\n",
    )
    .unwrap();
    assert_eq!(verify_upgrade_request(&request).unwrap(), "dGhlIHNhbXBsZSBub25jZQ==");
  }

  #[test]
  fn rejects_missing_upgrade_header() {
    let (request, _) = parse_request(
      "GET /chat HTTP/1.1\r\nHost: example.com\r\nConnection: Upgrade\r\nSec-WebSocket-Key: dGhlIHNhbXBsZSBub25jZQ==\r\nSec-WebSocket-Version: 13\r\n\r\n",
    )
    .unwrap();
    assert_eq!(
      verify_upgrade_request(&request).unwrap_err(),
      HandshakeError::MissingHeader { name: "Upgrade" }
    );
  }

  #[test]
  fn splits_host_and_path_from_a_url() {
    assert_eq!(host_from_url("ws://localhost:9001/echo"), "localhost:9001");
    assert_eq!(path_from_url("ws://localhost:9001/echo"), "/echo");
    assert_eq!(path_from_url("localhost:9001"), "/");
  }
}
