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

//! Echoes every WebSocket Text/Binary fragment sent to `/echo`.
//!
//! ```bash
//! cargo run --example echo_server
//! ```

use std::sync::Arc;

use anyhow::Result;
use httpwire::dispatcher::{HandlerOutcome, HandlerResponse, Server, ServerConfig, WsReply};
use httpwire::http::Request;
use httpwire::ws::FragmentData;
use httpwire::Arena;

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt::init();

  let mut config = ServerConfig::default();
  config.bind_addr = ([127, 0, 0, 1], 9001).into();

  let mut server = Server::new(config);
  server.register(
    Arc::new(|request: &Request<'_>| request.path == "/echo"),
    Arc::new(|_request: &Request<'_>, _arena: &Arena| {
      HandlerOutcome::Upgrade(Arc::new(|data: &FragmentData<'_>| match data {
        FragmentData::Text(payload) => Some(WsReply::Text(payload.to_vec())),
        FragmentData::Binary(payload) => Some(WsReply::Binary(payload.to_vec())),
        _ => None,
      }))
    }),
  );
  server.register(
    Arc::new(|_request: &Request<'_>| true),
    Arc::new(|_request: &Request<'_>, _arena: &Arena| {
      HandlerOutcome::Respond(HandlerResponse::not_found())
    }),
  );

  tracing::info!("listening on ws://127.0.0.1:9001/echo");
  server.serve().await?;
  Ok(())
}
