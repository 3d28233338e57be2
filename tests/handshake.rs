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

use assert2::assert;
use httpwire::handshake;
use httpwire::http::parse_request;

#[test]
fn server_handshake_end_to_end() {
  let raw = "GET /chat HTTP/1.1\r\nHost: server.example.com\r\nUpgrade: websocket\r\nConnection: Upgrade\r\nSec-WebSocket-Key: dGhlIHNhbXBsZSBub25jZQ==\r\nSec-WebSocket-Version: 13\r\n\r\n";
  let (request, _) = parse_request(raw).unwrap();

  let client_key = handshake::verify_upgrade_request(&request).unwrap();
  assert!(client_key == "dGhlIHNhbXBsZSBub25jZQ==");

  let response = handshake::switching_protocols_response(client_key);
  assert!(response.starts_with("HTTP/1.1 101 Switching Protocols\r\n"));
  assert!(response.contains("Sec-WebSocket-Accept: s3pPLMBiTxaQ9kYGzzhZRbK+xOo="));
  assert!(response.ends_with("\r\n\r\n"));
}

#[test]
fn rejects_a_request_with_no_websocket_headers_at_all() {
  let raw = "GET / HTTP/1.1\r\nHost: server.example.com\r\n\r\n";
  let (request, _) = parse_request(raw).unwrap();
  assert!(handshake::verify_upgrade_request(&request).is_err());
}

#[test]
fn client_upgrade_request_carries_a_fresh_key_each_time() {
  let first = handshake::build_upgrade_request("ws://localhost:9001/echo", &[]);
  let second = handshake::build_upgrade_request("ws://localhost:9001/echo", &[]);
  assert!(first.starts_with("GET /echo HTTP/1.1\r\n"));
  assert!(first.contains("Host: localhost:9001\r\n"));
  assert!(first.contains("Sec-WebSocket-Version: 13\r\n"));
  assert!(first != second);
}
