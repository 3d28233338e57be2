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

use std::sync::Arc;

use anyhow::Result;
use assert2::assert;
use httpwire::dispatcher::{HandlerOutcome, HandlerResponse, Server, ServerConfig, WsReply};
use httpwire::http::{parse_response, Request};
use httpwire::ws::{parse_websocket_fragment, serialize_websocket_fragment, Fragment, FragmentData};
use httpwire::{handshake, Arena};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

async fn spawn_test_server() -> std::net::SocketAddr {
  let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
  let addr = listener.local_addr().unwrap();
  drop(listener);

  let mut config = ServerConfig::default();
  config.bind_addr = addr;

  let mut server = Server::new(config);
  server.register(
    Arc::new(|request: &Request<'_>| request.path == "/hello"),
    Arc::new(|_request: &Request<'_>, _arena: &Arena| {
      HandlerOutcome::Respond(HandlerResponse::ok("hello"))
    }),
  );
  server.register(
    Arc::new(|request: &Request<'_>| request.path == "/echo"),
    Arc::new(|_request: &Request<'_>, _arena: &Arena| {
      HandlerOutcome::Upgrade(Arc::new(|data: &FragmentData<'_>| match data {
        FragmentData::Text(payload) => Some(WsReply::Text(payload.to_vec())),
        _ => None,
      }))
    }),
  );

  tokio::spawn(async move {
    let _ = server.serve().await;
  });

  // Give the accept loop a moment to bind before tests connect.
  tokio::time::sleep(std::time::Duration::from_millis(20)).await;
  addr
}

#[tokio::test]
async fn routes_a_matching_request() -> Result<()> {
  let addr = spawn_test_server().await;
  let mut stream = TcpStream::connect(addr).await?;
  stream.write_all(b"GET /hello HTTP/1.1\r\nHost: test\r\n\r\n").await?;

  let mut buf = vec![0u8; 4096];
  let n = stream.read(&mut buf).await?;
  let text = std::str::from_utf8(&buf[..n])?;
  assert!(text.starts_with("HTTP/1.1 200 OK\r\n"));
  assert!(text.ends_with("hello"));
  Ok(())
}

#[tokio::test]
async fn falls_back_to_404_for_unknown_paths() -> Result<()> {
  let addr = spawn_test_server().await;
  let mut stream = TcpStream::connect(addr).await?;
  stream.write_all(b"GET /nope HTTP/1.1\r\nHost: test\r\n\r\n").await?;

  let mut buf = vec![0u8; 4096];
  let n = stream.read(&mut buf).await?;
  let text = std::str::from_utf8(&buf[..n])?;
  assert!(text.starts_with("HTTP/1.1 404 Not Found\r\n"));
  Ok(())
}

#[tokio::test]
async fn upgrades_and_echoes_a_text_fragment() -> Result<()> {
  let addr = spawn_test_server().await;
  let mut stream = TcpStream::connect(addr).await?;

  let request = handshake::build_upgrade_request(&format!("ws://{addr}/echo"), &[]);
  stream.write_all(request.as_bytes()).await?;

  let mut buf = vec![0u8; 4096];
  let n = stream.read(&mut buf).await?;
  let response = parse_response(std::str::from_utf8(&buf[..n])?)?;
  assert!(response.status == 101);

  let mut payload = b"round trip".to_vec();
  let mut fragment = Fragment {
    data: FragmentData::Text(&mut payload),
    fin: true,
    mask_key: Some([0x01, 0x02, 0x03, 0x04]),
  };
  let mut wire = vec![0u8; 256];
  let written = serialize_websocket_fragment(&mut wire, &mut fragment)?.len();
  stream.write_all(&wire[..written]).await?;

  let mut reply = vec![0u8; 4096];
  let n = stream.read(&mut reply).await?;
  let (parsed, _) = parse_websocket_fragment(&mut reply[..n])?;
  match parsed.data {
    FragmentData::Text(text) => assert!(text == b"round trip"),
    other => panic!("expected a Text reply, got {other:?}"),
  }
  Ok(())
}
