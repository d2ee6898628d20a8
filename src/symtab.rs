//! Declared-name bookkeeping for a single parse session.

use std::collections::HashSet;

/// Flat set of declared variable names. The language has a single
/// namespace and no nested scopes; a name, once declared, stays visible
/// until the session ends.
#[derive(Debug, Default)]
pub struct SymbolTable {
  names: HashSet<String>,
}

impl SymbolTable {
  pub fn new() -> Self {
    Self::default()
  }

  /// Insert a name. Redeclaring an existing name is a no-op, not an error.
  pub fn declare(&mut self, name: &str) {
    self.names.insert(name.to_string());
  }

  pub fn is_declared(&self, name: &str) -> bool {
    self.names.contains(name)
  }
}
