//! Shared error utilities used across the compilation pipeline.
//!
//! Diagnostics are kept lightweight – each variant carries the structured
//! data a host might inspect (offending character, expectation, name) plus
//! a pre-rendered excerpt pointing a caret at the offending line.

use snafu::Snafu;

pub type CompileResult<T> = Result<T, CompileError>;

/// Broad classification of a diagnostic, one per analysis stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
  Lexical,
  Syntax,
  Semantic,
}

#[derive(Debug, Snafu)]
pub enum CompileError {
  /// A character that matches no token pattern.
  #[snafu(display("lexical error: unexpected character '{character}'\n{excerpt}"))]
  UnexpectedCharacter {
    character: char,
    offset: usize,
    excerpt: String,
  },

  /// A digit run too large for the literal type.
  #[snafu(display("lexical error: integer literal out of range\n{excerpt}"))]
  IntegerOutOfRange { offset: usize, excerpt: String },

  /// The current token does not fit what the grammar expects here.
  #[snafu(display("syntax error: expected {expected}, but got \"{found}\"\n{excerpt}"))]
  UnexpectedToken {
    expected: String,
    found: String,
    offset: usize,
    excerpt: String,
  },

  /// An identifier was read or assigned before any declaration of it.
  #[snafu(display("semantic error: variable '{name}' is not declared\n{excerpt}"))]
  UndeclaredVariable {
    name: String,
    offset: usize,
    excerpt: String,
  },
}

impl CompileError {
  pub fn unexpected_character(source: &str, offset: usize, character: char) -> Self {
    Self::UnexpectedCharacter {
      character,
      offset,
      excerpt: excerpt(source, offset),
    }
  }

  pub fn integer_out_of_range(source: &str, offset: usize) -> Self {
    Self::IntegerOutOfRange {
      offset,
      excerpt: excerpt(source, offset),
    }
  }

  pub fn unexpected_token(
    source: &str,
    offset: usize,
    expected: impl Into<String>,
    found: impl Into<String>,
  ) -> Self {
    Self::UnexpectedToken {
      expected: expected.into(),
      found: found.into(),
      offset,
      excerpt: excerpt(source, offset),
    }
  }

  pub fn undeclared_variable(source: &str, offset: usize, name: impl Into<String>) -> Self {
    Self::UndeclaredVariable {
      name: name.into(),
      offset,
      excerpt: excerpt(source, offset),
    }
  }

  pub fn category(&self) -> Category {
    match self {
      Self::UnexpectedCharacter { .. } | Self::IntegerOutOfRange { .. } => Category::Lexical,
      Self::UnexpectedToken { .. } => Category::Syntax,
      Self::UndeclaredVariable { .. } => Category::Semantic,
    }
  }

  /// Byte offset into the source the diagnostic is anchored at.
  pub fn offset(&self) -> usize {
    match self {
      Self::UnexpectedCharacter { offset, .. }
      | Self::IntegerOutOfRange { offset, .. }
      | Self::UnexpectedToken { offset, .. }
      | Self::UndeclaredVariable { offset, .. } => *offset,
    }
  }
}

/// Render the source line containing `offset` with a caret underneath,
/// prefixed by the line:column position.
fn excerpt(source: &str, offset: usize) -> String {
  let offset = offset.min(source.len());
  let line_start = source[..offset].rfind('\n').map(|i| i + 1).unwrap_or(0);
  let line_end = source[offset..]
    .find(|c| c == '\r' || c == '\n')
    .map(|i| i + offset)
    .unwrap_or(source.len());
  let line_number = source[..line_start].lines().count() + 1;
  let column = source[line_start..offset].chars().count() + 1;
  let line = &source[line_start..line_end];
  format!(
    " --> {line_number}:{column}\n  | {line}\n  | {spaces}^",
    spaces = " ".repeat(column - 1)
  )
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn excerpt_points_at_the_offending_column() {
    let source = "var x = 1;\nx = @;";
    let err = CompileError::unexpected_character(source, 15, '@');
    let rendered = err.to_string();
    assert!(rendered.contains("unexpected character '@'"));
    assert!(rendered.contains(" --> 2:5"));
    assert!(rendered.contains("  | x = @;"));
    assert!(rendered.contains("  |     ^"));
  }

  #[test]
  fn excerpt_at_end_of_input_stays_in_bounds() {
    let source = "var x";
    let err = CompileError::unexpected_token(source, source.len(), "\";\"", "end of input");
    let rendered = err.to_string();
    assert!(rendered.contains(" --> 1:6"));
    assert!(rendered.contains("  |      ^"));
  }

  #[test]
  fn categories_follow_the_taxonomy() {
    let source = "x";
    assert_eq!(
      CompileError::unexpected_character(source, 0, '@').category(),
      Category::Lexical
    );
    assert_eq!(
      CompileError::integer_out_of_range(source, 0).category(),
      Category::Lexical
    );
    assert_eq!(
      CompileError::unexpected_token(source, 0, "\";\"", "x").category(),
      Category::Syntax
    );
    assert_eq!(
      CompileError::undeclared_variable(source, 0, "x").category(),
      Category::Semantic
    );
  }

  #[test]
  fn offsets_are_preserved() {
    let err = CompileError::undeclared_variable("y = 1;", 0, "y");
    assert_eq!(err.offset(), 0);
  }
}
