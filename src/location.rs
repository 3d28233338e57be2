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

use std::fmt;
use std::sync::Arc;

/// A position within a tokenizer's source, attached to every token and
/// every tokenizer-originated error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
  /// 1-based line number.
  pub line: u32,
  /// 0-based column within `line`.
  pub column: u32,
  /// 0-based byte offset from the start of the source.
  pub position: usize,
  /// Name of the source, for diagnostics. Defaults to `"<input>"`.
  pub file: Arc<str>,
}

impl Location {
  pub(crate) fn start(file: Arc<str>) -> Self {
    Location { line: 1, column: 0, position: 0, file }
  }
}

impl fmt::Display for Location {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}:{}:{}", self.file, self.line, self.column)
  }
}
