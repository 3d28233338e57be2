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

//! _httpwire_ is a small HTTP/1.1 + WebSocket (RFC 6455) protocol
//! toolkit: a generic tokenizer, an HTTP/1.1 message parser built on it,
//! a byte-exact WebSocket fragment codec, and a thin connection
//! dispatcher that wires the three together behind a handler table.
//!
//! # Example
//!
//! ```no_run
//! use httpwire::dispatcher::{HandlerOutcome, HandlerResponse, Server, ServerConfig};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> std::io::Result<()> {
//!   use httpwire::http::Request;
//!   use httpwire::Arena;
//!
//!   let mut server = Server::new(ServerConfig::default());
//!   server.register(
//!     Arc::new(|request: &Request<'_>| request.path == "/"),
//!     Arc::new(|_request: &Request<'_>, _arena: &Arena| {
//!       HandlerOutcome::Respond(HandlerResponse::ok("hello"))
//!     }),
//!   );
//!   server.serve().await
//! }
//! ```
//!
//! ## WebSocket upgrades
//!
//! A route can hand the connection off to a [`dispatcher::WsHandler`]
//! instead of responding directly:
//!
//! ```no_run
//! use httpwire::dispatcher::{HandlerOutcome, Server, ServerConfig, WsReply};
//! use httpwire::http::Request;
//! use httpwire::ws::FragmentData;
//! use httpwire::Arena;
//! use std::sync::Arc;
//!
//! # async fn run() -> std::io::Result<()> {
//! let mut server = Server::new(ServerConfig::default());
//! server.register(
//!   Arc::new(|request: &Request<'_>| request.path == "/echo"),
//!   Arc::new(|_request: &Request<'_>, _arena: &Arena| {
//!     HandlerOutcome::Upgrade(Arc::new(|data: &FragmentData<'_>| match data {
//!       FragmentData::Text(payload) => Some(WsReply::Text(payload.to_vec())),
//!       FragmentData::Binary(payload) => Some(WsReply::Binary(payload.to_vec())),
//!       _ => None,
//!     }))
//!   }),
//! );
//! server.serve().await
//! # }
//! ```

pub mod arena;
pub mod dispatcher;
pub mod handshake;
pub mod hmac;
pub mod http;
pub mod location;
pub mod token;
pub mod tokenizer;
pub mod ws;

pub use arena::Arena;
pub use dispatcher::{HandlerOutcome, HandlerResponse, Server, ServerConfig, WsReply};
pub use hmac::hmac_sha256;
pub use location::Location;
pub use token::{SourceToken, Token};
pub use tokenizer::{Tokenizer, TokenizerError};
