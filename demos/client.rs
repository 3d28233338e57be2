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

//! A minimal client-side upgrade + single masked Text fragment round
//! trip, against the `echo_server` example.
//!
//! ```bash
//! cargo run --example echo_server &
//! cargo run --example client
//! ```

use anyhow::{anyhow, Result};
use httpwire::handshake;
use httpwire::http::parse_response;
use httpwire::ws::{parse_websocket_fragment, serialize_websocket_fragment, Fragment, FragmentData};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

#[tokio::main]
async fn main() -> Result<()> {
  let mut stream = TcpStream::connect("127.0.0.1:9001").await?;

  let request = handshake::build_upgrade_request("ws://127.0.0.1:9001/echo", &[]);
  stream.write_all(request.as_bytes()).await?;

  let mut response_buf = vec![0u8; 4096];
  let n = stream.read(&mut response_buf).await?;
  let response_text = std::str::from_utf8(&response_buf[..n])?;
  let response = parse_response(response_text)?;
  if response.status != 101 {
    return Err(anyhow!("server refused the upgrade: {}", response.status));
  }

  let mut payload = b"Hello, httpwire!".to_vec();
  let mut fragment = Fragment {
    data: FragmentData::Text(&mut payload),
    fin: true,
    mask_key: Some([0x12, 0x34, 0x56, 0x78]),
  };
  let mut wire = vec![0u8; 256];
  let written = serialize_websocket_fragment(&mut wire, &mut fragment)?.len();
  stream.write_all(&wire[..written]).await?;

  let mut reply_buf = vec![0u8; 4096];
  let n = stream.read(&mut reply_buf).await?;
  let (reply, _) = parse_websocket_fragment(&mut reply_buf[..n])?;
  match reply.data {
    FragmentData::Text(payload) => {
      println!("server echoed: {}", std::str::from_utf8(payload)?);
    }
    other => println!("unexpected reply: {other:?}"),
  }

  Ok(())
}
