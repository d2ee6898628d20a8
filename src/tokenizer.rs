//! Lexical analysis: hands out one classified token per pull.
//!
//! The tokenizer is intentionally tiny – it knows nothing about semantics
//! beyond recognising literals, identifiers and the reserved words. The
//! cursor only moves forward; once the end of input is reached every
//! further pull returns `Eof` again.

use crate::error::{CompileError, CompileResult};

/// Kinds of tokens recognised by the front-end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
  Int,
  Ident,
  KwVar,
  KwIf,
  KwElse,
  KwWhile,
  KwFor,
  Plus,
  Minus,
  Star,
  Slash,
  LParen,
  RParen,
  Assign,
  Semicolon,
  Eof,
}

impl TokenKind {
  /// Phrase used in "expected ..." diagnostics.
  pub fn describe(self) -> &'static str {
    match self {
      TokenKind::Int => "a number",
      TokenKind::Ident => "an identifier",
      TokenKind::KwVar => "\"var\"",
      TokenKind::KwIf => "\"if\"",
      TokenKind::KwElse => "\"else\"",
      TokenKind::KwWhile => "\"while\"",
      TokenKind::KwFor => "\"for\"",
      TokenKind::Plus => "\"+\"",
      TokenKind::Minus => "\"-\"",
      TokenKind::Star => "\"*\"",
      TokenKind::Slash => "\"/\"",
      TokenKind::LParen => "\"(\"",
      TokenKind::RParen => "\")\"",
      TokenKind::Assign => "\"=\"",
      TokenKind::Semicolon => "\";\"",
      TokenKind::Eof => "end of input",
    }
  }
}

/// Thin wrapper for lexical information needed by later stages.
#[derive(Debug, Clone)]
pub struct Token {
  pub kind: TokenKind,
  pub value: Option<i64>,
  pub loc: usize,
  pub len: usize,
}

impl Token {
  /// Convenience constructor to keep the scanning loop readable.
  pub fn new(kind: TokenKind, loc: usize, len: usize, value: Option<i64>) -> Self {
    Self {
      kind,
      value,
      loc,
      len,
    }
  }
}

/// Return the slice from the source that produced this token.
pub fn token_text<'a>(token: &Token, source: &'a str) -> &'a str {
  let end = token.loc + token.len;
  &source[token.loc..end]
}

/// Human-friendly description used in diagnostics.
pub fn describe_token(token: &Token, source: &str) -> String {
  match token.kind {
    TokenKind::Eof => "end of input".to_string(),
    _ => token_text(token, source).to_string(),
  }
}

/// Forward-only scanner over a single source string. Not restartable –
/// re-tokenizing requires a fresh instance.
pub struct Tokenizer<'a> {
  source: &'a str,
  pos: usize,
}

impl<'a> Tokenizer<'a> {
  pub fn new(source: &'a str) -> Self {
    Self { source, pos: 0 }
  }

  /// Scan and return the next token, advancing the cursor past it.
  ///
  /// Whitespace and `#` line comments produce no token. Any character
  /// matching no token pattern is a lexical error carrying the character
  /// and its offset.
  pub fn next_token(&mut self) -> CompileResult<Token> {
    let bytes = self.source.as_bytes();

    while self.pos < bytes.len() {
      let c = bytes[self.pos];

      if c.is_ascii_whitespace() {
        self.pos += 1;
        continue;
      }

      if c == b'#' {
        while self.pos < bytes.len() && bytes[self.pos] != b'\n' {
          self.pos += 1;
        }
        continue;
      }

      if c.is_ascii_digit() {
        return self.read_number();
      }

      if c.is_ascii_alphabetic() || c == b'_' {
        return Ok(self.read_identifier());
      }

      if let Some(kind) = punctuator_kind(c) {
        let token = Token::new(kind, self.pos, 1, None);
        self.pos += 1;
        return Ok(token);
      }

      let character = self.source[self.pos..].chars().next().unwrap_or('\0');
      return Err(CompileError::unexpected_character(
        self.source,
        self.pos,
        character,
      ));
    }

    Ok(Token::new(TokenKind::Eof, self.source.len(), 0, None))
  }

  /// Maximal run of digits. No sign, no radix prefixes, no floating point.
  fn read_number(&mut self) -> CompileResult<Token> {
    let bytes = self.source.as_bytes();
    let start = self.pos;
    while self.pos < bytes.len() && bytes[self.pos].is_ascii_digit() {
      self.pos += 1;
    }
    let text = &self.source[start..self.pos];
    let value = text
      .parse::<i64>()
      .map_err(|_| CompileError::integer_out_of_range(self.source, start))?;
    Ok(Token::new(TokenKind::Int, start, self.pos - start, Some(value)))
  }

  /// Letter or underscore start, then letters/digits/underscores; the
  /// lexeme is looked up in the reserved-word table afterwards.
  fn read_identifier(&mut self) -> Token {
    let bytes = self.source.as_bytes();
    let start = self.pos;
    while self.pos < bytes.len() && (bytes[self.pos].is_ascii_alphanumeric() || bytes[self.pos] == b'_')
    {
      self.pos += 1;
    }
    let lexeme = &self.source[start..self.pos];
    let kind = keyword_kind(lexeme).unwrap_or(TokenKind::Ident);
    Token::new(kind, start, self.pos - start, None)
  }
}

/// Reserved-word table. The C-style type names declare variables the same
/// way `var` does; the control-flow keywords are recognised but no grammar
/// production consumes them yet.
fn keyword_kind(lexeme: &str) -> Option<TokenKind> {
  match lexeme {
    "var" | "int" | "float" | "double" => Some(TokenKind::KwVar),
    "if" => Some(TokenKind::KwIf),
    "else" => Some(TokenKind::KwElse),
    "while" => Some(TokenKind::KwWhile),
    "for" => Some(TokenKind::KwFor),
    _ => None,
  }
}

fn punctuator_kind(c: u8) -> Option<TokenKind> {
  match c {
    b'+' => Some(TokenKind::Plus),
    b'-' => Some(TokenKind::Minus),
    b'*' => Some(TokenKind::Star),
    b'/' => Some(TokenKind::Slash),
    b'(' => Some(TokenKind::LParen),
    b')' => Some(TokenKind::RParen),
    b'=' => Some(TokenKind::Assign),
    b';' => Some(TokenKind::Semicolon),
    _ => None,
  }
}
