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

//! Header-block parsing: name/value pairs, obsolete line-folding, and the
//! length cap from RFC 7230 §3.2/§3.2.4.

use std::borrow::Cow;

use crate::http::error::{HeaderError, MAX_HEADERS_LENGTH};
use crate::token::Token;
use crate::tokenizer::Tokenizer;

/// A header name/value map. Preserves insertion order (so serialization is
/// stable) and preserves header name case exactly as received — callers
/// that want case-insensitive lookup should normalize before comparing.
/// Duplicate names: the last value inserted wins, matching the source
/// behavior (no aggregation of repeated headers).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Headers<'a> {
  entries: Vec<(Cow<'a, str>, Cow<'a, str>)>,
}

impl<'a> Headers<'a> {
  pub fn new() -> Self {
    Headers { entries: Vec::new() }
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  /// Inserts `name: value`. If `name` is already present (byte-for-byte),
  /// its value is replaced in place; the prior position is preserved.
  pub fn insert(&mut self, name: Cow<'a, str>, value: Cow<'a, str>) {
    if let Some(existing) = self.entries.iter_mut().find(|(n, _)| n == &name) {
      existing.1 = value;
    } else {
      self.entries.push((name, value));
    }
  }

  pub fn get(&self, name: &str) -> Option<&str> {
    self.entries.iter().find(|(n, _)| n == name).map(|(_, v)| v.as_ref())
  }

  pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
    self.entries.iter().map(|(n, v)| (n.as_ref(), v.as_ref()))
  }

  pub fn into_owned(self) -> Headers<'static> {
    Headers {
      entries: self
        .entries
        .into_iter()
        .map(|(n, v)| (Cow::Owned(n.into_owned()), Cow::Owned(v.into_owned())))
        .collect(),
    }
  }
}

/// Parses a header block: `(header)* CRLF`, where each `header` may be
/// followed by obsolete-line-folded continuations (a line starting with
/// SP or HTAB). Returns the parsed map and the number of bytes consumed
/// from `data`, including the terminating blank-line CRLF.
///
/// `data` should start right after the request-line/status-line's CRLF.
pub fn parse_headers(data: &str) -> Result<(Headers<'_>, usize), HeaderError> {
  if data.len() > MAX_HEADERS_LENGTH {
    return Err(HeaderError::HeadersTooLong { length: data.len() });
  }

  let mut tokenizer = Tokenizer::create(data, Some("<headers>"));
  let mut headers = Headers::new();

  loop {
    let remaining = &data[tokenizer_pos(&tokenizer)..];
    if remaining.starts_with("\r\n") {
      tokenizer.skip_string("\r\n")?;
      break;
    }
    if remaining.is_empty() {
      return Err(HeaderError::ExpectedHeaderEndMarker { data: remaining.to_string() });
    }

    let name = tokenizer.read_string_until(&[":"]).map_err(|_| {
      HeaderError::ExpectedHeaderNameEnd { data: remaining.to_string() }
    })?;
    tokenizer.skip_string(":")?;
    tokenizer.skip_any_of(&[Token::Space, Token::Tab])?;

    let value_start = &data[tokenizer_pos(&tokenizer)..];
    let first_value = tokenizer.read_string_until(&["\r\n"]).map_err(|_| {
      HeaderError::ExpectedHeaderValueEnd { name: name.to_string(), data: value_start.to_string() }
    })?;
    tokenizer.skip_string("\r\n")?;

    // Unfolded headers (the common case) stay borrowed from `data`; a
    // fold forces one allocation to join continuation lines with `\n`.
    let mut value: Cow<'_, str> = Cow::Borrowed(first_value);

    loop {
      let peeked = tokenizer.peek()?;
      if !matches!(peeked, Token::Space | Token::Tab) {
        break;
      }
      tokenizer.skip_any_of(&[Token::Space, Token::Tab])?;
      let continuation_start = &data[tokenizer_pos(&tokenizer)..];
      let continuation = tokenizer.read_string_until(&["\r\n"]).map_err(|_| {
        HeaderError::ExpectedHeaderValueEnd {
          name: name.to_string(),
          data: continuation_start.to_string(),
        }
      })?;
      tokenizer.skip_string("\r\n")?;
      let mut owned = value.into_owned();
      owned.push('\n');
      owned.push_str(continuation);
      value = Cow::Owned(owned);
    }

    headers.insert(Cow::Borrowed(name), value);
  }

  Ok((headers, tokenizer_pos(&tokenizer)))
}

/// Serializes `headers` back into wire form (`name: value\r\n` per entry,
/// no terminating blank line — callers append that once per message).
/// Folded values (containing `\n`) are re-folded with a single leading
/// space per continuation line, so that
/// `parse_headers(serialize_headers(h))` round-trips `h` up to name case
/// preservation and the last-duplicate-wins rule (see §8).
pub fn serialize_headers(headers: &Headers<'_>) -> String {
  let mut out = String::new();
  for (name, value) in headers.iter() {
    out.push_str(name);
    out.push_str(": ");
    let mut lines = value.split('\n');
    if let Some(first) = lines.next() {
      out.push_str(first);
    }
    for line in lines {
      out.push_str("\r\n ");
      out.push_str(line);
    }
    out.push_str("\r\n");
  }
  out
}

fn tokenizer_pos(tokenizer: &Tokenizer<'_>) -> usize {
  tokenizer.position()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_single_header() {
    let (headers, consumed) =
      parse_headers("Content-Type: text/html\r\n\r\n").unwrap();
    assert_eq!(headers.get("Content-Type"), Some("text/html"));
    assert_eq!(consumed, "Content-Type: text/html\r\n\r\n".len());
  }

  #[test]
  fn folds_obsolete_continuations() {
    let (headers, _) = parse_headers(
      "X-Multi: start of value\r\n end of value\r\nContent-Type: text/html\r\n\r\n",
    )
    .unwrap();
    assert_eq!(headers.get("X-Multi"), Some("start of value\nend of value"));
    assert_eq!(headers.get("Content-Type"), Some("text/html"));
  }

  #[test]
  fn rejects_too_long_header_block() {
    let data = "a".repeat(32769);
    let err = parse_headers(&data).unwrap_err();
    assert_eq!(err, HeaderError::HeadersTooLong { length: 32769 });
  }

  #[test]
  fn last_duplicate_wins() {
    let (headers, _) = parse_headers("X: one\r\nX: two\r\n\r\n").unwrap();
    assert_eq!(headers.get("X"), Some("two"));
    assert_eq!(headers.len(), 1);
  }

  #[test]
  fn empty_value_is_permitted() {
    let (headers, _) = parse_headers("X-Empty:\r\n\r\n").unwrap();
    assert_eq!(headers.get("X-Empty"), Some(""));
  }

  #[test]
  fn round_trips_through_serialize() {
    let (headers, _) = parse_headers(
      "X-Multi: start of value\r\n end of value\r\nContent-Type: text/html\r\n\r\n",
    )
    .unwrap();
    let wire = serialize_headers(&headers) + "\r\n";
    let (reparsed, _) = parse_headers(&wire).unwrap();
    assert_eq!(headers, reparsed);
  }
}
