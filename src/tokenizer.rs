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

//! A position-tracking lexer shared by every text-protocol parser in this
//! crate. [`Tokenizer`] is the only component the HTTP parser (`http`
//! module) depends on; the WebSocket codec is binary and does not use it.

use std::sync::Arc;

use crate::location::Location;
use crate::token::{SourceToken, Token};

/// Errors a [`Tokenizer`] can produce. `ExpectedToken`, `ExpectedString`,
/// `ExpectedEndMarker` and `ExpectedOneOf` are recoverable parse errors a
/// caller can react to. `Fatal` covers conditions the original design
/// terminates the process over (a lone `\r`, an unterminated string, a
/// malformed integer literal, an unrecognized lead byte) — here they are an
/// ordinary error variant instead of a panic, so a tokenizer fed untrusted
/// network input can never crash its caller.
#[derive(Debug, thiserror::Error, Clone, PartialEq)]
pub enum TokenizerError {
  #[error("{location}: expected {expected:?}, found {actual:?}")]
  ExpectedToken { expected: Token, actual: Token, location: Location },

  #[error("{location}: expected \"{expected}\", found \"{actual}\"")]
  ExpectedString { expected: String, actual: String, location: Location },

  #[error("{location}: none of {markers:?} occurred before end of input")]
  ExpectedEndMarker { markers: Vec<String>, location: Location },

  #[error("{location}: expected one of {expected:?}, found {actual:?}")]
  ExpectedOneOf { expected: Vec<Token>, actual: Token, location: Location },

  #[error("{location}: {message}")]
  Fatal { message: String, location: Location },
}

const SNIPPET_LEN: usize = 64;

fn snippet(source: &str, position: usize) -> String {
  let mut end = (position + SNIPPET_LEN).min(source.len());
  while end > position && !source.is_char_boundary(end) {
    end -= 1;
  }
  source[position..end].to_string()
}

/// A lexer over a borrowed source string. Tracks byte position, 1-based
/// line, 0-based column, and a monotone token index.
pub struct Tokenizer<'a> {
  source: &'a str,
  file: Arc<str>,
  position: usize,
  line: u32,
  column: u32,
  index: usize,
}

impl<'a> Tokenizer<'a> {
  /// Creates a tokenizer over `source`. `filename` defaults to `"<input>"`
  /// when not given; it is carried on every [`Location`] for diagnostics.
  pub fn create(source: &'a str, filename: Option<&str>) -> Self {
    Tokenizer {
      source,
      file: Arc::from(filename.unwrap_or("<input>")),
      position: 0,
      line: 1,
      column: 0,
      index: 0,
    }
  }

  /// The current byte offset into the source. Useful for callers (like
  /// the header-block parser) that need to know how much of a larger
  /// buffer a sub-parse consumed.
  pub fn position(&self) -> usize {
    self.position
  }

  fn current_location(&self) -> Location {
    Location {
      line: self.line,
      column: self.column,
      position: self.position,
      file: self.file.clone(),
    }
  }

  fn remaining(&self) -> &'a str {
    &self.source[self.position..]
  }

  fn at_eof(&self) -> bool {
    self.position >= self.source.len()
  }

  /// Non-destructive: returns the token that `next` would return, without
  /// advancing. Returns `Token::Eof` at end of source.
  pub fn peek(&self) -> Result<Token, TokenizerError> {
    if self.at_eof() {
      return Ok(Token::Eof);
    }
    let (token, _lexeme) = self.lex_one()?;
    Ok(token)
  }

  /// Advances the tokenizer by one token. Returns the token (paired with
  /// the location it started at), the pre-increment token index, and
  /// `false` iff the tokenizer was already at EOF (in which case the
  /// returned token is `Token::Eof` and no state changes besides the
  /// returned index).
  pub fn next(&mut self) -> Result<(SourceToken, usize, bool), TokenizerError> {
    let location = self.current_location();
    let index = self.index;

    if self.at_eof() {
      return Ok((SourceToken { token: Token::Eof, location }, index, false));
    }

    let (token, lexeme) = self.lex_one()?;
    self.commit(&token, lexeme);
    self.index += 1;
    Ok((SourceToken { token, location }, index, true))
  }

  /// Consumes one token; succeeds iff its variant matches `expected`'s
  /// variant (the carried value, if any, is ignored). On mismatch the
  /// token has still been consumed — the tokenizer is left positioned past
  /// it either way.
  pub fn expect(
    &mut self,
    expected: &Token,
  ) -> Result<SourceToken, TokenizerError> {
    let location = self.current_location();
    let (source_token, _index, _ok) = self.next()?;
    if source_token.token.same_variant(expected) {
      Ok(source_token)
    } else {
      Err(TokenizerError::ExpectedToken {
        expected: expected.clone(),
        actual: source_token.token,
        location,
      })
    }
  }

  /// Like [`Tokenizer::expect`] but additionally requires the carried
  /// value to match.
  pub fn expect_exact(
    &mut self,
    expected: &Token,
  ) -> Result<SourceToken, TokenizerError> {
    let location = self.current_location();
    let (source_token, _index, _ok) = self.next()?;
    if &source_token.token == expected {
      Ok(source_token)
    } else {
      Err(TokenizerError::ExpectedToken {
        expected: expected.clone(),
        actual: source_token.token,
        location,
      })
    }
  }

  /// Consumes one token, requiring its variant to match one of `expected`.
  pub fn expect_one_of(
    &mut self,
    expected: &[Token],
  ) -> Result<SourceToken, TokenizerError> {
    let location = self.current_location();
    let (source_token, _index, _ok) = self.next()?;
    if expected.iter().any(|t| source_token.token.same_variant(t)) {
      Ok(source_token)
    } else {
      Err(TokenizerError::ExpectedOneOf {
        expected: expected.to_vec(),
        actual: source_token.token,
        location,
      })
    }
  }

  /// Repeatedly peeks and consumes tokens whose variant matches any of
  /// `tokens`, stopping at the first that doesn't (or at EOF).
  pub fn skip_any_of(
    &mut self,
    tokens: &[Token],
  ) -> Result<(), TokenizerError> {
    loop {
      let peeked = self.peek()?;
      if tokens.iter().any(|t| peeked.same_variant(t)) {
        self.next()?;
      } else {
        break;
      }
    }
    Ok(())
  }

  /// Scans forward for the first occurrence of any of `end_markers`,
  /// returning the prefix before it (exclusive) and leaving the tokenizer
  /// positioned just before the marker. Fails if no marker occurs before
  /// end of source.
  pub fn read_string_until(
    &mut self,
    end_markers: &[&str],
  ) -> Result<&'a str, TokenizerError> {
    let location = self.current_location();
    let rest = self.remaining();

    let found = end_markers
      .iter()
      .filter_map(|marker| rest.find(marker).map(|idx| (idx, *marker)))
      .min_by_key(|(idx, _)| *idx);

    match found {
      Some((idx, _marker)) => {
        let prefix = &rest[..idx];
        self.advance_resetting(prefix);
        Ok(prefix)
      }
      None => Err(TokenizerError::ExpectedEndMarker {
        markers: end_markers.iter().map(|s| s.to_string()).collect(),
        location,
      }),
    }
  }

  /// If the source at the current position starts with `expected`,
  /// advances past it. Otherwise returns `ExpectedString` carrying up to
  /// `len(expected)` bytes of whatever is actually there.
  pub fn skip_string(
    &mut self,
    expected: &str,
  ) -> Result<(), TokenizerError> {
    let location = self.current_location();
    let rest = self.remaining();

    if rest.starts_with(expected) {
      self.advance_resetting(expected);
      Ok(())
    } else {
      let actual_len = expected.len().min(rest.len());
      Err(TokenizerError::ExpectedString {
        expected: expected.to_string(),
        actual: rest[..actual_len].to_string(),
        location,
      })
    }
  }

  /// Updates position/line/column the way `read_string_until` and
  /// `skip_string` are specified to: if `text` contains newlines, `line`
  /// advances by their count and `column` resets to 1; otherwise `column`
  /// advances by `text`'s length.
  fn advance_resetting(&mut self, text: &str) {
    let newlines = text.matches('\n').count() as u32;
    if newlines > 0 {
      self.line += newlines;
      self.column = 1;
    } else {
      self.column += text.len() as u32;
    }
    self.position += text.len();
  }

  /// Updates position/line/column after consuming one lexer token.
  fn commit(&mut self, token: &Token, lexeme: &str) {
    if matches!(token, Token::Newline) {
      self.line += 1;
      self.column = 0;
      self.position += lexeme.len();
      return;
    }

    let newlines = lexeme.matches('\n').count() as u32;
    if newlines > 0 {
      self.line += newlines;
      let after_last = lexeme.rsplit('\n').next().unwrap_or("");
      self.column = after_last.len() as u32;
    } else {
      self.column += lexeme.len() as u32;
    }
    self.position += lexeme.len();
  }

  /// Lexes exactly one token at the current position without mutating
  /// tokenizer state. Returns the token and the exact lexeme consumed, so
  /// that `source[position .. position + lexeme.len()] == lexeme` always
  /// holds (the round-trip invariant).
  fn lex_one(&self) -> Result<(Token, &'a str), TokenizerError> {
    let rest = self.remaining();
    let location = self.current_location();
    let bytes = rest.as_bytes();
    let b = bytes[0];

    match b {
      b'#' => {
        let end = rest.find('\n').unwrap_or(rest.len());
        Ok((Token::Comment(rest[1..end].to_string()), &rest[..end]))
      }
      b' ' => Ok((Token::Space, &rest[..1])),
      b'\t' => Ok((Token::Tab, &rest[..1])),
      b'\n' => Ok((Token::Newline, &rest[..1])),
      b'\r' => {
        if bytes.get(1) == Some(&b'\n') {
          Ok((Token::Newline, &rest[..2]))
        } else {
          Err(TokenizerError::Fatal {
            message: "lone carriage return".to_string(),
            location,
          })
        }
      }
      b'(' => Ok((Token::LeftParen, &rest[..1])),
      b')' => Ok((Token::RightParen, &rest[..1])),
      b'[' => Ok((Token::LeftBracket, &rest[..1])),
      b']' => Ok((Token::RightBracket, &rest[..1])),
      b'{' => Ok((Token::LeftBrace, &rest[..1])),
      b'}' => Ok((Token::RightBrace, &rest[..1])),
      b'<' => Ok((Token::LeftAngleBracket, &rest[..1])),
      b'>' => Ok((Token::RightAngleBracket, &rest[..1])),
      b'^' => Ok((Token::Caret, &rest[..1])),
      b':' => Ok((Token::Colon, &rest[..1])),
      b',' => Ok((Token::Comma, &rest[..1])),
      b'.' => Ok((Token::Dot, &rest[..1])),
      b'_' => Ok((Token::Underscore, &rest[..1])),
      b'-' => Ok((Token::Dash, &rest[..1])),
      b'/' => Ok((Token::Slash, &rest[..1])),
      b'$' => {
        let value = *bytes.get(1).ok_or_else(|| TokenizerError::Fatal {
          message: "unterminated char literal".to_string(),
          location: location.clone(),
        })?;
        Ok((Token::Char(value), &rest[..2]))
      }
      b'"' => self.lex_quoted(rest, &location, '"', Token::Str),
      b'\'' => self.lex_quoted(rest, &location, '\'', Token::SingleQuotedString),
      b'0'..=b'9' => self.lex_number(rest, &location),
      b'a'..=b'z' => self.lex_lower_or_boolean(rest),
      b'A'..=b'Z' => self.lex_upper(rest),
      _ => Err(TokenizerError::Fatal {
        message: format!("unexpected character {:?}: {:?}", b as char, snippet(rest, 0)),
        location,
      }),
    }
  }

  fn lex_quoted(
    &self,
    rest: &'a str,
    location: &Location,
    quote: char,
    make: fn(String) -> Token,
  ) -> Result<(Token, &'a str), TokenizerError> {
    let mut chars = rest.char_indices();
    chars.next(); // skip leading quote
    for (idx, c) in chars {
      if c == quote {
        let content = &rest[1..idx];
        return Ok((make(content.to_string()), &rest[..idx + 1]));
      }
    }
    Err(TokenizerError::Fatal {
      message: format!("unterminated string starting with {quote:?}"),
      location: location.clone(),
    })
  }

  fn lex_number(
    &self,
    rest: &'a str,
    location: &Location,
  ) -> Result<(Token, &'a str), TokenizerError> {
    let digit_run = |s: &str| s.len() - s.trim_start_matches(|c: char| c.is_ascii_digit()).len();

    let int_len = digit_run(rest);
    let after_int = &rest[int_len..];

    if after_int.starts_with('.') {
      let frac = &after_int[1..];
      let frac_len = digit_run(frac);
      if frac_len > 0 {
        let lexeme = &rest[..int_len + 1 + frac_len];
        return match lexeme.parse::<f64>() {
          Ok(value) => Ok((Token::Float(value), lexeme)),
          Err(_) => Err(TokenizerError::Fatal {
            message: format!("malformed float literal {lexeme:?}"),
            location: location.clone(),
          }),
        };
      }
    }

    if int_len == 0 {
      return Err(TokenizerError::Fatal {
        message: "expected a digit".to_string(),
        location: location.clone(),
      });
    }

    let lexeme = &rest[..int_len];
    match lexeme.parse::<i64>() {
      Ok(value) => Ok((Token::Integer(value), lexeme)),
      Err(_) => Err(TokenizerError::Fatal {
        message: format!("malformed integer literal {lexeme:?}"),
        location: location.clone(),
      }),
    }
  }

  fn lex_lower_or_boolean(&self, rest: &'a str) -> Result<(Token, &'a str), TokenizerError> {
    for (word, value) in [("true", true), ("false", false)] {
      if rest.starts_with(word) {
        let after = &rest[word.len()..];
        if after.is_empty() || is_symbol_terminator(after.as_bytes()[0]) {
          return Ok((Token::Boolean(value), &rest[..word.len()]));
        }
      }
    }
    let len = symbol_len(rest);
    Ok((Token::LowerSymbol(rest[..len].to_string()), &rest[..len]))
  }

  fn lex_upper(&self, rest: &'a str) -> Result<(Token, &'a str), TokenizerError> {
    let len = symbol_len(rest);
    Ok((Token::UpperSymbol(rest[..len].to_string()), &rest[..len]))
  }
}

fn is_symbol_terminator(b: u8) -> bool {
  b.is_ascii_whitespace()
    || matches!(b, b'(' | b')' | b'[' | b']' | b'{' | b'}' | b'<' | b'>' | b',' | b'.' | b':' | b'\'' | b'"')
}

fn symbol_len(rest: &str) -> usize {
  rest
    .as_bytes()
    .iter()
    .position(|&b| is_symbol_terminator(b))
    .unwrap_or(rest.len())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn lexes_punctuation() {
    let mut t = Tokenizer::create("(){}[]<>^:,._-/", None);
    let expected = [
      Token::LeftParen,
      Token::RightParen,
      Token::LeftBrace,
      Token::RightBrace,
      Token::LeftBracket,
      Token::RightBracket,
      Token::LeftAngleBracket,
      Token::RightAngleBracket,
      Token::Caret,
      Token::Colon,
      Token::Comma,
      Token::Dot,
      Token::Underscore,
      Token::Dash,
      Token::Slash,
    ];
    for want in expected {
      let (got, _, ok) = t.next().unwrap();
      assert!(ok);
      assert_eq!(got.token, want);
    }
    let (eof, _, ok) = t.next().unwrap();
    assert!(!ok);
    assert_eq!(eof.token, Token::Eof);
  }

  #[test]
  fn lexes_crlf_as_single_newline() {
    let mut t = Tokenizer::create("\r\nx", None);
    let (tok, _, _) = t.next().unwrap();
    assert_eq!(tok.token, Token::Newline);
    assert_eq!(tok.location.line, 1);
    let (tok, _, _) = t.next().unwrap();
    assert_eq!(tok.token, Token::LowerSymbol("x".into()));
    assert_eq!(tok.location.line, 2);
    assert_eq!(tok.location.column, 0);
  }

  #[test]
  fn lone_cr_is_fatal() {
    let mut t = Tokenizer::create("\ra", None);
    let err = t.next().unwrap_err();
    assert!(matches!(err, TokenizerError::Fatal { .. }));
  }

  #[test]
  fn lexes_literals() {
    let mut t = Tokenizer::create("\"hi\" 'lo' 3.5 42 $a true false Upper lower", None);
    let mut want = |tok: Token| {
      t.skip_any_of(&[Token::Space]).unwrap();
      let (got, _, _) = t.next().unwrap();
      assert_eq!(got.token, tok);
    };
    want(Token::Str("hi".into()));
    want(Token::SingleQuotedString("lo".into()));
    want(Token::Float(3.5));
    want(Token::Integer(42));
    want(Token::Char(b'a'));
    want(Token::Boolean(true));
    want(Token::Boolean(false));
    want(Token::UpperSymbol("Upper".into()));
    want(Token::LowerSymbol("lower".into()));
  }

  #[test]
  fn boolean_prefix_does_not_shadow_longer_symbol() {
    let mut t = Tokenizer::create("truest", None);
    let (tok, _, _) = t.next().unwrap();
    assert_eq!(tok.token, Token::LowerSymbol("truest".into()));
  }

  #[test]
  fn expect_consumes_on_mismatch() {
    let mut t = Tokenizer::create("42", None);
    let err = t.expect(&Token::Str(String::new())).unwrap_err();
    assert!(matches!(err, TokenizerError::ExpectedToken { .. }));
    // Positioned past the consumed Integer(42) either way.
    let (next, _, ok) = t.next().unwrap();
    assert!(!ok);
    assert_eq!(next.token, Token::Eof);
  }

  #[test]
  fn read_string_until_advances_exact_length() {
    let mut t = Tokenizer::create("name: value\r\n", None);
    let prefix = t.read_string_until(&[":"]).unwrap();
    assert_eq!(prefix, "name");
    t.skip_string(":").unwrap();
    let rest = t.read_string_until(&["\r\n"]).unwrap();
    assert_eq!(rest, " value");
  }

  #[test]
  fn read_string_until_fails_without_marker() {
    let mut t = Tokenizer::create("no marker here", None);
    let err = t.read_string_until(&[":"]).unwrap_err();
    assert!(matches!(err, TokenizerError::ExpectedEndMarker { .. }));
  }

  #[test]
  fn skip_string_reports_actual_on_mismatch() {
    let mut t = Tokenizer::create("GET /", None);
    let err = t.skip_string("POST").unwrap_err();
    match err {
      TokenizerError::ExpectedString { expected, actual, .. } => {
        assert_eq!(expected, "POST");
        assert_eq!(actual, "GET ");
      }
      _ => panic!("wrong error variant"),
    }
  }
}
