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

/// An HTTP request method. `Post` carries its request body, but
/// [`crate::http::request::parse_request`] only ever produces `Get` — the
/// data model keeps `Post` so that a caller constructing a `Request` by
/// hand (e.g. for the client path, or a future parser extension) has
/// somewhere to put one. See spec.md §4.B: "parsing it is not required by
/// this spec".
#[derive(Debug, Clone, PartialEq)]
pub enum Method {
  Get,
  Post(Vec<u8>),
}

impl Method {
  pub fn name(&self) -> &'static str {
    match self {
      Method::Get => "GET",
      Method::Post(_) => "POST",
    }
  }
}
