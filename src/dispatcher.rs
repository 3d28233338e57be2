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

//! The connection dispatcher: accept loop, per-connection HTTP request
//! loop, routing, WebSocket upgrade, and the fragment receive loop. This
//! is a thin orchestration layer over [`crate::http`] and [`crate::ws`];
//! it owns all socket I/O so that handlers stay plain, synchronous
//! functions (see DESIGN.md for why handlers don't hold the socket).

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Semaphore;

use crate::arena::Arena;
use crate::handshake;
use crate::http::{parse_request, Request};
use crate::ws::{
  parse_websocket_fragment, serialize_websocket_fragment, Fragment, FragmentData,
};

/// Dispatcher-wide configuration. Filled by the caller (the sample
/// binary fills it from `std::env::args`) instead of hidden constants.
#[derive(Debug, Clone)]
pub struct ServerConfig {
  pub bind_addr: SocketAddr,
  /// Bound on concurrently in-flight connections (one `tokio::task`
  /// each). Default 1000, per spec.md §4.D/§5.
  pub worker_pool_capacity: usize,
  /// Default 64 KiB.
  pub http_read_cap: usize,
  /// Default 128 KiB.
  pub ws_read_cap: usize,
}

impl Default for ServerConfig {
  fn default() -> Self {
    ServerConfig {
      bind_addr: ([127, 0, 0, 1], 0).into(),
      worker_pool_capacity: 1000,
      http_read_cap: 64 * 1024,
      ws_read_cap: 128 * 1024,
    }
  }
}

pub type Matcher = Arc<dyn Fn(&Request<'_>) -> bool + Send + Sync>;
pub type Handler = Arc<dyn Fn(&Request<'_>, &Arena) -> HandlerOutcome + Send + Sync>;
pub type WsHandler = Arc<dyn Fn(&FragmentData<'_>) -> Option<WsReply> + Send + Sync>;

/// What a handler wants the dispatcher to do after it runs.
pub enum HandlerOutcome {
  Respond(HandlerResponse),
  /// Accept the WebSocket upgrade (pending handshake header validation)
  /// and hand subsequent fragments to `WsHandler`.
  Upgrade(WsHandler),
}

/// A plain HTTP response a handler builds by value; the dispatcher is
/// responsible for writing it to the socket.
#[derive(Debug, Clone)]
pub struct HandlerResponse {
  pub status: u16,
  pub reason: &'static str,
  pub headers: Vec<(String, String)>,
  pub body: Vec<u8>,
}

impl HandlerResponse {
  pub fn ok(body: impl AsRef<[u8]>) -> Self {
    HandlerResponse { status: 200, reason: "OK", headers: Vec::new(), body: body.as_ref().to_vec() }
  }

  pub fn not_found() -> Self {
    HandlerResponse { status: 404, reason: "Not Found", headers: Vec::new(), body: Vec::new() }
  }

  fn to_bytes(&self) -> Vec<u8> {
    let mut out = format!("HTTP/1.1 {} {}\r\n", self.status, self.reason);
    let has_content_length =
      self.headers.iter().any(|(name, _)| name.eq_ignore_ascii_case("content-length"));
    if !has_content_length {
      out.push_str(&format!("Content-Length: {}\r\n", self.body.len()));
    }
    for (name, value) in &self.headers {
      out.push_str(&format!("{name}: {value}\r\n"));
    }
    out.push_str("\r\n");
    let mut bytes = out.into_bytes();
    bytes.extend_from_slice(&self.body);
    bytes
  }
}

/// A reply a `WsHandler` wants echoed back. Server-to-client frames are
/// never masked (RFC 6455 §5.3).
pub enum WsReply {
  Text(Vec<u8>),
  Binary(Vec<u8>),
}

pub struct Server {
  config: ServerConfig,
  routes: Vec<(Matcher, Handler)>,
}

impl Server {
  pub fn new(config: ServerConfig) -> Self {
    Server { config, routes: Vec::new() }
  }

  /// Registers a route. Routes are consulted in registration order;
  /// first match wins. The table is never mutated again once `serve`
  /// starts, so concurrent connection tasks read it without locking.
  pub fn register(&mut self, matcher: Matcher, handler: Handler) {
    self.routes.push((matcher, handler));
  }

  /// Runs the accept loop until the listener errors. Each accepted
  /// connection gets its own arena and occupies one pool slot for its
  /// entire lifetime (handshake through WebSocket teardown), matching
  /// the ordering guarantee in spec.md §5.
  pub async fn serve(self) -> std::io::Result<()> {
    let listener = TcpListener::bind(self.config.bind_addr).await?;
    let capacity = self.config.worker_pool_capacity;
    let server = Arc::new(self);
    let pool = Arc::new(Semaphore::new(capacity));

    loop {
      let (stream, peer) = match listener.accept().await {
        Ok(accepted) => accepted,
        Err(error) => {
          tracing::warn!(%error, "accept failed");
          continue;
        }
      };

      let server = Arc::clone(&server);
      let permit = Arc::clone(&pool).acquire_owned().await.expect("semaphore is never closed");
      tokio::spawn(async move {
        let _permit = permit;
        handle_connection(stream, peer, server).await;
      });
    }
  }
}

#[tracing::instrument(skip(stream, server), fields(%peer))]
async fn handle_connection(mut stream: TcpStream, peer: SocketAddr, server: Arc<Server>) {
  let arena = Arena::new();

  loop {
    let raw = match read_http_request(&mut stream, server.config.http_read_cap).await {
      Ok(Some(raw)) => raw,
      Ok(None) => return,
      Err(error) => {
        tracing::debug!(%error, "read error, closing connection");
        return;
      }
    };

    let text = match std::str::from_utf8(&raw) {
      Ok(text) => text,
      Err(error) => {
        tracing::warn!(%error, "request was not valid UTF-8, closing connection without a response");
        return;
      }
    };

    let request = match parse_request(text) {
      Ok((request, _consumed)) => request,
      Err(error) => {
        tracing::warn!(%error, "malformed request, closing connection without a response");
        return;
      }
    };

    let outcome = server
      .routes
      .iter()
      .find(|(matcher, _)| matcher(&request))
      .map(|(_, handler)| handler(&request, &arena))
      .unwrap_or_else(|| HandlerOutcome::Respond(HandlerResponse::not_found()));

    match outcome {
      HandlerOutcome::Respond(response) => {
        if write_all(&mut stream, &response.to_bytes()).await.is_err() {
          return;
        }
      }
      HandlerOutcome::Upgrade(ws_handler) => match handshake::verify_upgrade_request(&request) {
        Ok(client_key) => {
          let response = handshake::switching_protocols_response(client_key);
          if write_all(&mut stream, response.as_bytes()).await.is_err() {
            return;
          }
          run_websocket_loop(&mut stream, ws_handler, server.config.ws_read_cap).await;
          return;
        }
        Err(error) => {
          tracing::warn!(%error, "rejected websocket upgrade");
          if write_all(&mut stream, handshake::bad_request_response().as_bytes()).await.is_err() {
            return;
          }
        }
      },
    }
  }
}

async fn write_all(stream: &mut TcpStream, bytes: &[u8]) -> std::io::Result<()> {
  stream.write_all(bytes).await
}

/// Reads from `stream` until the accumulated buffer contains a bare
/// `\r\n\r\n` anywhere in it (scanning the whole buffer, not just the
/// latest read — see DESIGN.md), the peer closes, or `cap` is reached.
async fn read_http_request(
  stream: &mut TcpStream,
  cap: usize,
) -> std::io::Result<Option<Vec<u8>>> {
  let mut buf = Vec::with_capacity(4096);
  let mut read_chunk = [0u8; 4096];

  loop {
    if contains_header_terminator(&buf) || buf.len() >= cap {
      return Ok(Some(buf));
    }

    let read = stream.read(&mut read_chunk).await?;
    if read == 0 {
      return Ok(if buf.is_empty() { None } else { Some(buf) });
    }
    buf.extend_from_slice(&read_chunk[..read]);
  }
}

fn contains_header_terminator(buf: &[u8]) -> bool {
  buf.windows(4).any(|window| window == b"\r\n\r\n")
}

/// Drives the post-upgrade fragment loop: one fragment per iteration,
/// auto-pong on Ping, exit on Close, `ws_handler` consulted for
/// Text/Binary/Continuation payloads.
async fn run_websocket_loop(stream: &mut TcpStream, ws_handler: WsHandler, cap: usize) {
  let mut scratch: Vec<u8> = Vec::new();
  let mut reply_buffer = vec![0u8; cap];

  loop {
    let fragment_len = match read_one_fragment(stream, &mut scratch, cap).await {
      Ok(len) => len,
      Err(error) => {
        tracing::debug!(%error, "websocket read error, closing connection");
        return;
      }
    };

    let (reply, should_close) = {
      let (mut fragment, _consumed) = match parse_websocket_fragment(&mut scratch[..fragment_len])
      {
        Ok(parsed) => parsed,
        Err(error) => {
          tracing::warn!(%error, "malformed websocket fragment, closing connection");
          return;
        }
      };
      dispatch_fragment(&mut fragment, &ws_handler)
    };
    scratch.drain(0..fragment_len);

    if let Some(reply) = reply {
      match serialize_reply(reply, &mut reply_buffer) {
        Ok(len) => {
          if write_all(stream, &reply_buffer[..len]).await.is_err() {
            return;
          }
        }
        Err(error) => {
          tracing::warn!(%error, "failed to serialize websocket reply");
          return;
        }
      }
    }

    if should_close {
      return;
    }
  }
}

enum PendingReply {
  Pong(Vec<u8>),
  User(WsReply),
}

fn dispatch_fragment(
  fragment: &mut Fragment<'_>,
  ws_handler: &WsHandler,
) -> (Option<PendingReply>, bool) {
  match &fragment.data {
    FragmentData::Close(_) => (None, true),
    FragmentData::Ping(payload) => (Some(PendingReply::Pong(payload.to_vec())), false),
    FragmentData::Pong(_) => (None, false),
    FragmentData::Text(_) | FragmentData::Binary(_) | FragmentData::Continuation(_) => {
      (ws_handler(&fragment.data).map(PendingReply::User), false)
    }
  }
}

/// Builds the wire bytes for `reply` into `buffer`, returning how many
/// bytes were written. The reply's payload is owned locally for the
/// duration of this call — `Fragment` never needs to outlive it.
fn serialize_reply(
  reply: PendingReply,
  buffer: &mut [u8],
) -> Result<usize, crate::ws::WebSocketError> {
  // The spec's auto-pong convention: generate a random mask even though
  // the reply travels server-to-client (see DESIGN.md).
  let (mut payload, mask_key, make): (_, _, fn(&mut [u8]) -> FragmentData<'_>) = match reply {
    PendingReply::Pong(payload) => (payload, Some(random_mask_key()), FragmentData::Pong),
    PendingReply::User(WsReply::Text(payload)) => (payload, None, FragmentData::Text),
    PendingReply::User(WsReply::Binary(payload)) => (payload, None, FragmentData::Binary),
  };

  let mut fragment = Fragment { data: make(&mut payload), fin: true, mask_key };
  serialize_websocket_fragment(buffer, &mut fragment).map(|wire| wire.len())
}

fn random_mask_key() -> [u8; 4] {
  use rand::Rng;
  rand::thread_rng().gen()
}

/// Reads bytes into `scratch` (starting from whatever is already
/// buffered there, typically the remainder of a prior read) until a
/// complete fragment is present, mirroring the teacher's own
/// progressive header-then-length-then-payload read shape.
async fn read_one_fragment(
  stream: &mut TcpStream,
  scratch: &mut Vec<u8>,
  cap: usize,
) -> std::io::Result<usize> {
  read_at_least(stream, scratch, 2).await?;
  let len7 = scratch[1] & 0x7F;
  let masked = scratch[1] & 0x80 != 0;

  let extended = match len7 {
    126 => 2,
    127 => 8,
    _ => 0,
  };
  read_at_least(stream, scratch, 2 + extended).await?;

  let payload_len: usize = match len7 {
    126 => u16::from_be_bytes(scratch[2..4].try_into().unwrap()) as usize,
    127 => u64::from_be_bytes(scratch[2..10].try_into().unwrap()) as usize,
    short => short as usize,
  };

  let mask_len = if masked { 4 } else { 0 };
  let total = 2 + extended + mask_len + payload_len;
  if total > cap {
    return Err(std::io::Error::new(
      std::io::ErrorKind::InvalidData,
      "fragment exceeds the configured read cap",
    ));
  }

  read_at_least(stream, scratch, total).await?;
  Ok(total)
}

async fn read_at_least(
  stream: &mut TcpStream,
  buf: &mut Vec<u8>,
  n: usize,
) -> std::io::Result<()> {
  let mut chunk = [0u8; 4096];
  while buf.len() < n {
    let read = stream.read(&mut chunk).await?;
    if read == 0 {
      return Err(std::io::Error::new(
        std::io::ErrorKind::UnexpectedEof,
        "connection closed mid-fragment",
      ));
    }
    buf.extend_from_slice(&chunk[..read]);
  }
  Ok(())
}
