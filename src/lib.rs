//! Crate root: wires together the compilation pipeline.
//!
//! The stages are intentionally small and composable so they can be evolved
//! independently:
//! - `tokenizer` performs lexical analysis, handing out one token per pull.
//! - `symtab` tracks declared names for declare-before-use checking.
//! - `parser` owns all syntactic knowledge and emits code while it
//!   recognises the input – there is no intermediate AST.
//! - `codegen` allocates temporaries and collects the instruction list.
//! - `error` centralises the diagnostic taxonomy shared by the stages.

pub mod codegen;
pub mod error;
pub mod parser;
pub mod symtab;
pub mod tokenizer;

pub use codegen::{CodeGenerator, Program};
pub use error::{CompileError, CompileResult};
pub use parser::Parser;
pub use symtab::SymbolTable;
pub use tokenizer::Tokenizer;

/// Compile a source string into a three-address-code program.
///
/// Each invocation owns a fresh tokenizer, symbol table and code generator,
/// so no state leaks between sessions. Fail-fast: the first diagnostic
/// aborts the run and no partial program is returned.
pub fn generate_tac(source: &str) -> CompileResult<Program> {
  let mut symbols = SymbolTable::new();
  let mut codegen = CodeGenerator::new();
  let mut parser = Parser::new(Tokenizer::new(source), source, &mut symbols, &mut codegen)?;
  parser.parse_program()?;
  Ok(codegen.into_program())
}
