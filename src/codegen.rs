//! Code generation: fresh temporaries and an append-only instruction list.
//!
//! Three-address instructions only ever refer to values – a literal, a
//! source variable or a generated temporary – so a whole program renders
//! as a numbered list of `dest = ...` lines in emission order.

use std::fmt;

/// A value reference usable as an operand or a result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
  Literal(i64),
  Var(String),
  Temp(u32),
}

impl fmt::Display for Value {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Value::Literal(value) => write!(f, "{value}"),
      Value::Var(name) => write!(f, "{name}"),
      Value::Temp(n) => write!(f, "t{n}"),
    }
  }
}

/// Binary operators carried by an instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
  Add,
  Sub,
  Mul,
  Div,
}

impl fmt::Display for BinOp {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let symbol = match self {
      BinOp::Add => "+",
      BinOp::Sub => "-",
      BinOp::Mul => "*",
      BinOp::Div => "/",
    };
    f.write_str(symbol)
  }
}

/// One three-address instruction: at most one operator, up to two
/// operands, exactly one result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
  Binary {
    op: BinOp,
    lhs: Value,
    rhs: Value,
    dest: Value,
  },
  Move {
    src: Value,
    dest: Value,
  },
}

impl fmt::Display for Instruction {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Instruction::Binary { op, lhs, rhs, dest } => write!(f, "{dest} = {lhs} {op} {rhs}"),
      Instruction::Move { src, dest } => write!(f, "{dest} = {src}"),
    }
  }
}

/// Ordered instruction sequence; the index is the execution order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
  instructions: Vec<Instruction>,
}

impl Program {
  pub fn instructions(&self) -> &[Instruction] {
    &self.instructions
  }

  pub fn len(&self) -> usize {
    self.instructions.len()
  }

  pub fn is_empty(&self) -> bool {
    self.instructions.is_empty()
  }
}

impl fmt::Display for Program {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for (i, instruction) in self.instructions.iter().enumerate() {
      writeln!(f, "{i}: {instruction}")?;
    }
    Ok(())
  }
}

/// Allocates temporaries and appends instructions for one session.
///
/// The counter is owned exclusively by this instance and starts at zero,
/// so two sessions never see each other's temporaries.
#[derive(Debug, Default)]
pub struct CodeGenerator {
  next_temp: u32,
  program: Program,
}

impl CodeGenerator {
  pub fn new() -> Self {
    Self::default()
  }

  /// Return a temporary guaranteed unique within this session.
  pub fn new_temp(&mut self) -> Value {
    let temp = Value::Temp(self.next_temp);
    self.next_temp += 1;
    temp
  }

  pub fn emit_binary(&mut self, op: BinOp, lhs: Value, rhs: Value, dest: Value) {
    self
      .program
      .instructions
      .push(Instruction::Binary { op, lhs, rhs, dest });
  }

  pub fn emit_move(&mut self, src: Value, dest: Value) {
    self.program.instructions.push(Instruction::Move { src, dest });
  }

  pub fn into_program(self) -> Program {
    self.program
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn temporaries_are_unique_and_monotonic() {
    let mut codegen = CodeGenerator::new();
    assert_eq!(codegen.new_temp(), Value::Temp(0));
    assert_eq!(codegen.new_temp(), Value::Temp(1));
    assert_eq!(codegen.new_temp(), Value::Temp(2));
  }

  #[test]
  fn values_render_as_tac_operands() {
    assert_eq!(Value::Literal(7).to_string(), "7");
    assert_eq!(Value::Var("x".to_string()).to_string(), "x");
    assert_eq!(Value::Temp(3).to_string(), "t3");
  }

  #[test]
  fn program_renders_numbered_lines() {
    let mut codegen = CodeGenerator::new();
    let t0 = codegen.new_temp();
    codegen.emit_move(Value::Literal(7), t0.clone());
    let t1 = codegen.new_temp();
    codegen.emit_binary(BinOp::Add, t0, Value::Var("y".to_string()), t1.clone());
    codegen.emit_move(t1, Value::Var("x".to_string()));

    let program = codegen.into_program();
    assert_eq!(program.len(), 3);
    assert_eq!(program.to_string(), "0: t0 = 7\n1: t1 = t0 + y\n2: x = t1\n");
  }

  #[test]
  fn empty_program_renders_nothing() {
    let program = CodeGenerator::new().into_program();
    assert!(program.is_empty());
    assert_eq!(program.to_string(), "");
  }
}
