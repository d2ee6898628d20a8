//! Recursive-descent parser with syntax-directed translation.
//!
//! No AST is built: each expression routine returns the value reference
//! holding its result and instructions are emitted while the input is
//! recognised. Beyond one token of lookahead the only parse state is the
//! call stack itself.
//!
//! Grammar:
//! ```text
//! program        -> statement_list EOF
//! statement_list -> statement*              (lookahead in {IDENT, "var"})
//! statement      -> "var" IDENT ("=" expr)? ";"
//!                 |  IDENT "=" expr ";"
//! expr           -> term (("+" | "-") term)*
//! term           -> factor (("*" | "/") factor)*
//! factor         -> "(" expr ")" | INT | IDENT
//! ```

use crate::codegen::{BinOp, CodeGenerator, Value};
use crate::error::{CompileError, CompileResult};
use crate::symtab::SymbolTable;
use crate::tokenizer::{Token, TokenKind, Tokenizer, describe_token, token_text};

/// LL(1) grammar engine. The symbol table and the code generator are
/// borrowed collaborators, so everything a parse produces outlives the
/// parser itself.
pub struct Parser<'a> {
  tokens: Tokenizer<'a>,
  source: &'a str,
  current: Token,
  symbols: &'a mut SymbolTable,
  codegen: &'a mut CodeGenerator,
}

impl<'a> Parser<'a> {
  /// Pulls the first lookahead token; a lexical error in it surfaces here.
  pub fn new(
    mut tokens: Tokenizer<'a>,
    source: &'a str,
    symbols: &'a mut SymbolTable,
    codegen: &'a mut CodeGenerator,
  ) -> CompileResult<Self> {
    let current = tokens.next_token()?;
    Ok(Self {
      tokens,
      source,
      current,
      symbols,
      codegen,
    })
  }

  /// program -> statement_list EOF
  ///
  /// Anything left over after the statement list is a syntax error, never
  /// a silent truncation.
  pub fn parse_program(&mut self) -> CompileResult<()> {
    self.statement_list()?;
    if self.current.kind != TokenKind::Eof {
      return Err(self.unexpected(TokenKind::Eof.describe()));
    }
    Ok(())
  }

  fn statement_list(&mut self) -> CompileResult<()> {
    while matches!(self.current.kind, TokenKind::Ident | TokenKind::KwVar) {
      self.statement()?;
    }
    Ok(())
  }

  fn statement(&mut self) -> CompileResult<()> {
    if self.current.kind == TokenKind::KwVar {
      self.declaration()
    } else {
      self.assignment()
    }
  }

  /// "var" IDENT ("=" expr)? ";"
  ///
  /// The name is registered the moment it is read, initializer or not;
  /// a bare declaration emits no instruction.
  fn declaration(&mut self) -> CompileResult<()> {
    self.eat(TokenKind::KwVar)?;
    let name = token_text(&self.current, self.source).to_string();
    self.eat(TokenKind::Ident)?;
    self.symbols.declare(&name);

    if self.current.kind == TokenKind::Assign {
      self.eat(TokenKind::Assign)?;
      let place = self.expr()?;
      self.codegen.emit_move(place, Value::Var(name));
    }
    self.eat(TokenKind::Semicolon)
  }

  /// IDENT "=" expr ";"
  ///
  /// The target must already be declared. The check runs before "=" is
  /// consumed so the diagnostic lands on the identifier itself.
  fn assignment(&mut self) -> CompileResult<()> {
    let name = token_text(&self.current, self.source).to_string();
    if !self.symbols.is_declared(&name) {
      return Err(CompileError::undeclared_variable(
        self.source,
        self.current.loc,
        name,
      ));
    }
    self.eat(TokenKind::Ident)?;
    self.eat(TokenKind::Assign)?;
    let place = self.expr()?;
    self.codegen.emit_move(place, Value::Var(name));
    self.eat(TokenKind::Semicolon)
  }

  /// expr -> term (("+" | "-") term)*
  ///
  /// Each operator occurrence parses the tighter production first, then
  /// lands its result in a fresh temporary that becomes the running left
  /// value – strict left-to-right evaluation, left-associative.
  fn expr(&mut self) -> CompileResult<Value> {
    let mut left = self.term()?;

    loop {
      let op = match self.current.kind {
        TokenKind::Plus => BinOp::Add,
        TokenKind::Minus => BinOp::Sub,
        _ => break,
      };
      self.advance()?;
      let right = self.term()?;
      let temp = self.codegen.new_temp();
      self.codegen.emit_binary(op, left, right, temp.clone());
      left = temp;
    }

    Ok(left)
  }

  /// term -> factor (("*" | "/") factor)*
  fn term(&mut self) -> CompileResult<Value> {
    let mut left = self.factor()?;

    loop {
      let op = match self.current.kind {
        TokenKind::Star => BinOp::Mul,
        TokenKind::Slash => BinOp::Div,
        _ => break,
      };
      self.advance()?;
      let right = self.factor()?;
      let temp = self.codegen.new_temp();
      self.codegen.emit_binary(op, left, right, temp.clone());
      left = temp;
    }

    Ok(left)
  }

  /// factor -> "(" expr ")" | INT | IDENT
  ///
  /// Parentheses pass the inner value through unchanged. A literal is
  /// materialized into a fresh temporary; reading a declared variable
  /// emits nothing and yields the name directly.
  fn factor(&mut self) -> CompileResult<Value> {
    match self.current.kind {
      TokenKind::LParen => {
        self.eat(TokenKind::LParen)?;
        let place = self.expr()?;
        self.eat(TokenKind::RParen)?;
        Ok(place)
      }
      TokenKind::Int => {
        let Some(value) = self.current.value else {
          return Err(self.unexpected(TokenKind::Int.describe()));
        };
        self.advance()?;
        let temp = self.codegen.new_temp();
        self.codegen.emit_move(Value::Literal(value), temp.clone());
        Ok(temp)
      }
      TokenKind::Ident => {
        let name = token_text(&self.current, self.source).to_string();
        if !self.symbols.is_declared(&name) {
          return Err(CompileError::undeclared_variable(
            self.source,
            self.current.loc,
            name,
          ));
        }
        self.advance()?;
        Ok(Value::Var(name))
      }
      _ => Err(self.unexpected("\"(\", a number or an identifier")),
    }
  }

  fn advance(&mut self) -> CompileResult<()> {
    self.current = self.tokens.next_token()?;
    Ok(())
  }

  /// Consume the current token if its kind matches, otherwise fail with a
  /// diagnostic naming the expectation.
  fn eat(&mut self, expected: TokenKind) -> CompileResult<()> {
    if self.current.kind == expected {
      self.advance()
    } else {
      Err(self.unexpected(expected.describe()))
    }
  }

  fn unexpected(&self, expected: &str) -> CompileError {
    let found = describe_token(&self.current, self.source);
    CompileError::unexpected_token(self.source, self.current.loc, expected, found)
  }
}

#[cfg(test)]
mod tests {
  use std::collections::HashSet;

  use super::*;
  use crate::codegen::{Instruction, Program};
  use crate::error::Category;

  fn generate(source: &str) -> CompileResult<Program> {
    let mut symbols = SymbolTable::new();
    let mut codegen = CodeGenerator::new();
    let mut parser = Parser::new(Tokenizer::new(source), source, &mut symbols, &mut codegen)?;
    parser.parse_program()?;
    Ok(codegen.into_program())
  }

  fn lines(source: &str) -> Vec<String> {
    generate(source)
      .expect("program must compile")
      .to_string()
      .lines()
      .map(str::to_string)
      .collect()
  }

  #[test]
  fn declaration_with_initializer_emits_one_move_to_the_name() {
    assert_eq!(lines("var x = 1;"), ["0: t0 = 1", "1: x = t0"]);
  }

  #[test]
  fn bare_declaration_emits_nothing_but_registers_the_name() {
    assert!(generate("var x;").unwrap().is_empty());
    assert_eq!(lines("var x; x = 2;"), ["0: t0 = 2", "1: x = t0"]);
  }

  #[test]
  fn type_aliases_declare_like_var() {
    assert_eq!(
      lines("int x = 1; double y = 2;"),
      ["0: t0 = 1", "1: x = t0", "2: t1 = 2", "3: y = t1"]
    );
  }

  #[test]
  fn multiplication_binds_tighter_than_addition() {
    assert_eq!(
      lines("var a = 2 + 3 * 4;"),
      [
        "0: t0 = 2",
        "1: t1 = 3",
        "2: t2 = 4",
        "3: t3 = t1 * t2",
        "4: t4 = t0 + t3",
        "5: a = t4",
      ]
    );
  }

  #[test]
  fn subtraction_chains_left_associatively() {
    assert_eq!(
      lines("var r = 8 - 3 - 2;"),
      [
        "0: t0 = 8",
        "1: t1 = 3",
        "2: t2 = t0 - t1",
        "3: t3 = 2",
        "4: t4 = t2 - t3",
        "5: r = t4",
      ]
    );
  }

  #[test]
  fn parentheses_emit_the_inner_operation_first() {
    assert_eq!(
      lines("var p = (2 + 3) * 4;"),
      [
        "0: t0 = 2",
        "1: t1 = 3",
        "2: t2 = t0 + t1",
        "3: t3 = 4",
        "4: t4 = t2 * t3",
        "5: p = t4",
      ]
    );
  }

  #[test]
  fn reading_a_variable_emits_no_instruction() {
    assert_eq!(
      lines("var a = 1; var b = a;"),
      ["0: t0 = 1", "1: a = t0", "2: b = a"]
    );
  }

  #[test]
  fn assigning_an_undeclared_variable_fails_at_the_identifier() {
    let err = generate("x = 1;").unwrap_err();
    assert_eq!(err.category(), Category::Semantic);
    assert_eq!(err.offset(), 0);
    assert!(matches!(err, CompileError::UndeclaredVariable { name, .. } if name == "x"));
  }

  #[test]
  fn reading_an_undeclared_variable_fails_at_the_identifier() {
    let err = generate("var y = x + 1;").unwrap_err();
    assert_eq!(err.offset(), 8);
    assert!(matches!(err, CompileError::UndeclaredVariable { name, .. } if name == "x"));
  }

  #[test]
  fn redeclaration_is_non_fatal() {
    assert_eq!(
      lines("var x = 1; var x = 2;"),
      ["0: t0 = 1", "1: x = t0", "2: t1 = 2", "3: x = t1"]
    );
  }

  #[test]
  fn declared_name_is_visible_to_its_own_initializer() {
    assert_eq!(lines("var x = x;"), ["0: x = x"]);
  }

  #[test]
  fn missing_factor_is_a_syntax_error_at_the_semicolon() {
    let err = generate("var x = ;").unwrap_err();
    assert_eq!(err.category(), Category::Syntax);
    assert_eq!(err.offset(), 8);
  }

  #[test]
  fn trailing_token_is_a_syntax_error_not_a_truncation() {
    let err = generate("var x = 1; )").unwrap_err();
    assert_eq!(err.category(), Category::Syntax);
    assert!(matches!(
      &err,
      CompileError::UnexpectedToken { expected, found, .. }
        if expected == "end of input" && found == ")"
    ));
  }

  #[test]
  fn control_keywords_are_recognised_but_start_no_statement() {
    let err = generate("var x = 1; while").unwrap_err();
    assert!(matches!(
      &err,
      CompileError::UnexpectedToken { expected, found, .. }
        if expected == "end of input" && found == "while"
    ));
  }

  #[test]
  fn lexical_error_aborts_the_whole_parse() {
    let err = generate("var x = 1 @ 2;").unwrap_err();
    assert_eq!(err.category(), Category::Lexical);
    assert_eq!(err.offset(), 10);
  }

  #[test]
  fn comments_do_not_disturb_surrounding_statements() {
    assert_eq!(
      lines("var x = 1; # x = banned;\nx = 3;"),
      ["0: t0 = 1", "1: x = t0", "2: t1 = 3", "3: x = t1"]
    );
  }

  #[test]
  fn empty_input_is_an_empty_program() {
    assert!(generate("").unwrap().is_empty());
    assert!(generate("  # only a comment\n").unwrap().is_empty());
  }

  #[test]
  fn temporaries_are_defined_before_any_use() {
    let program =
      generate("var a = (1 + 2) * (3 - 4) / 5; var b = a * a + 6; b = b + a * 2;").unwrap();
    assert!(!program.is_empty());

    let mut defined = HashSet::new();
    for instruction in program.instructions() {
      let (operands, dest) = match instruction {
        Instruction::Binary { lhs, rhs, dest, .. } => (vec![lhs, rhs], dest),
        Instruction::Move { src, dest } => (vec![src], dest),
      };
      for value in operands {
        if let Value::Temp(n) = value {
          assert!(defined.contains(n), "t{n} used before being defined");
        }
      }
      if let Value::Temp(n) = dest {
        defined.insert(*n);
      }
    }
  }
}
