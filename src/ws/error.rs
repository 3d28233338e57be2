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

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum WebSocketError {
  #[error("unexpected end of input while reading a fragment header")]
  UnexpectedEof,

  #[error("opcode {opcode:#x} is not one of the six defined by RFC 6455")]
  InvalidOpcode { opcode: u8 },

  #[error(
    "serialized fragment needs {required_size} bytes but the buffer only has {available} bytes"
  )]
  BufferTooSmall { required_size: usize, available: usize },
}
