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

use std::mem::discriminant;

use crate::location::Location;

/// One lexical unit produced by [`crate::tokenizer::Tokenizer`].
///
/// Variants that carry a value (`UpperSymbol`, `Str`, ...) still compare
/// equal to their bare counterpart under [`Token::same_variant`] — that is
/// the comparison `Tokenizer::expect` uses, while `expect_exact` additionally
/// requires the carried value to match.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
  Eof,
  Newline,
  Tab,
  Space,
  LeftParen,
  RightParen,
  LeftBracket,
  RightBracket,
  LeftBrace,
  RightBrace,
  LeftAngleBracket,
  RightAngleBracket,
  Caret,
  Colon,
  Comma,
  Dot,
  Underscore,
  Dash,
  Slash,
  /// A `#`-led line comment. The carried value is the comment text, not
  /// including the leading `#` or the trailing newline.
  Comment(String),
  UpperSymbol(String),
  LowerSymbol(String),
  Str(String),
  SingleQuotedString(String),
  Float(f64),
  Integer(i64),
  /// A `$`-prefixed byte literal, e.g. `$a`.
  Char(u8),
  Boolean(bool),
}

impl Token {
  /// Compares only the enum discriminant, ignoring any carried value. This
  /// is the comparison `Tokenizer::expect` performs.
  pub fn same_variant(&self, other: &Token) -> bool {
    discriminant(self) == discriminant(other)
  }

  /// A short, human-readable name of this token's variant, used in error
  /// messages.
  pub fn variant_name(&self) -> &'static str {
    match self {
      Token::Eof => "EOF",
      Token::Newline => "newline",
      Token::Tab => "tab",
      Token::Space => "space",
      Token::LeftParen => "(",
      Token::RightParen => ")",
      Token::LeftBracket => "[",
      Token::RightBracket => "]",
      Token::LeftBrace => "{",
      Token::RightBrace => "}",
      Token::LeftAngleBracket => "<",
      Token::RightAngleBracket => ">",
      Token::Caret => "^",
      Token::Colon => ":",
      Token::Comma => ",",
      Token::Dot => ".",
      Token::Underscore => "_",
      Token::Dash => "-",
      Token::Slash => "/",
      Token::Comment(_) => "comment",
      Token::UpperSymbol(_) => "upper symbol",
      Token::LowerSymbol(_) => "lower symbol",
      Token::Str(_) => "string",
      Token::SingleQuotedString(_) => "single-quoted string",
      Token::Float(_) => "float",
      Token::Integer(_) => "integer",
      Token::Char(_) => "char",
      Token::Boolean(_) => "boolean",
    }
  }
}

/// A [`Token`] paired with the [`Location`] at which it starts.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceToken {
  pub token: Token,
  pub location: Location,
}
