//! Integration tests for the cmdtree_engine crate.
//!
//! Tests for matching compiled rule sets:
//! - Ranked line matching and batches
//! - Record building and layouts
//! - Round-trip reconstruction

mod matcher;
mod records;

use cmdtree_grammar::{CompileOptions, GrammarCompiler, GrammarRow, RuleSet};

/// Compiles `(verb, object, template)` rows with default options.
pub fn rule_set(rows: &[(&str, &str, &str)]) -> RuleSet {
    compile(rows, CompileOptions::default())
}

/// Compiles rows with the given options.
pub fn compile(rows: &[(&str, &str, &str)], options: CompileOptions) -> RuleSet {
    let rows: Vec<_> = rows
        .iter()
        .map(|(verb, object, template)| GrammarRow::new(*verb, *object, *template))
        .collect();
    GrammarCompiler::new(options).compile_rows(&rows).rules
}
