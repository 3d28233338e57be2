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

use crate::tokenizer::TokenizerError;

/// The bound on a header block's length, per RFC 7230's recommendation
/// that servers impose a limit on header size. Pinned to 32 KiB to match
/// the literal `Headers_Too_Long{length=32769}` test vector this crate is
/// built against (see DESIGN.md for the discrepancy with the prose's "64
/// KiB" figure).
pub const MAX_HEADERS_LENGTH: usize = 32 * 1024;

#[derive(Debug, thiserror::Error, Clone, PartialEq)]
pub enum HeaderError {
  #[error("header block is {length} bytes, exceeding the {} byte cap", MAX_HEADERS_LENGTH)]
  HeadersTooLong { length: usize },

  #[error("reached end of input before a header name's terminating ':': {data:?}")]
  ExpectedHeaderNameEnd { data: String },

  #[error("reached end of input before header {name:?}'s terminating CRLF: {data:?}")]
  ExpectedHeaderValueEnd { name: String, data: String },

  #[error("header block is missing its terminating blank line: {data:?}")]
  ExpectedHeaderEndMarker { data: String },

  #[error(transparent)]
  Tokenizer(#[from] TokenizerError),
}

#[derive(Debug, thiserror::Error, Clone, PartialEq)]
pub enum RequestError {
  #[error(transparent)]
  Tokenizer(#[from] TokenizerError),

  #[error(transparent)]
  Header(#[from] HeaderError),

  #[error("request path {path:?} does not start with '/'")]
  InvalidPath { path: String },
}

#[derive(Debug, thiserror::Error, Clone, PartialEq)]
pub enum ResponseError {
  #[error(transparent)]
  Tokenizer(#[from] TokenizerError),

  #[error(transparent)]
  Header(#[from] HeaderError),

  #[error("status {status:?} does not parse as a decimal integer")]
  InvalidStatus { status: String },

  #[error("status {status} is out of the 100..=599 range")]
  StatusOutOfRange { status: i64 },
}
