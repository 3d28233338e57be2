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

//! RFC 6455 WebSocket fragment codec: byte-exact parsing and
//! serialization of one fragment at a time.

pub mod close;
pub mod error;
pub mod fragment;
pub mod mask;

pub use close::CloseCode;
pub use error::WebSocketError;
pub use fragment::{parse_websocket_fragment, serialize_websocket_fragment, Fragment, FragmentData};
pub use mask::apply_mask;
