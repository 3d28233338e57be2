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

//! Sample CLI surface: `httpd <port>`. Binds `127.0.0.1:<port>` and
//! serves a trivial "hello" handler plus a 404 fallback. Not part of
//! the core library.

use std::sync::Arc;

use httpwire::dispatcher::{HandlerOutcome, HandlerResponse, Server, ServerConfig};
use httpwire::http::Request;
use httpwire::Arena;

#[tokio::main]
async fn main() {
  tracing_subscriber::fmt::init();

  let port: u16 = match std::env::args().nth(1).and_then(|arg| arg.parse().ok()) {
    Some(port) => port,
    None => {
      tracing::error!("usage: httpd <port>");
      std::process::exit(1);
    }
  };

  let mut config = ServerConfig::default();
  config.bind_addr = ([127, 0, 0, 1], port).into();

  let mut server = Server::new(config.clone());
  server.register(
    Arc::new(|request: &Request<'_>| request.path == "/"),
    Arc::new(|_request: &Request<'_>, _arena: &Arena| {
      HandlerOutcome::Respond(HandlerResponse::ok("hello from httpwire\n"))
    }),
  );

  tracing::info!(addr = %config.bind_addr, "starting httpwire");
  if let Err(error) = server.serve().await {
    tracing::error!(%error, "server exited");
    std::process::exit(1);
  }
}
