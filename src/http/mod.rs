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

//! HTTP/1.1 message parsing built on top of the generic tokenizer in
//! [`crate::tokenizer`].

pub mod error;
pub mod headers;
pub mod method;
pub mod request;
pub mod response;

pub use error::{HeaderError, RequestError, ResponseError};
pub use headers::Headers;
pub use method::Method;
pub use request::{parse_request, Request};
pub use response::{parse_response, Response};
