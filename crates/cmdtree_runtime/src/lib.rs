//! Configuration, grammar tables, persistence and the CLI for cmdtree.
//!
//! This crate provides:
//! - [`RuntimeConfig`] - TOML-backed settings
//! - [`TableReader`] - CSV/TSV grammar tables
//! - Rule-set descriptor persistence (JSON or `MessagePack`)
//! - [`VerificationReport`] - Batch output verification
//! - [`Repl`] - Interactive matching loop

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod editor;
pub mod logging;
pub mod repl;
pub mod rows;
pub mod serialize;
pub mod verify;

use std::path::Path;

use tracing::info;

use cmdtree_grammar::{Compilation, GrammarCompiler, Result};

pub use config::RuntimeConfig;
pub use editor::{LineEditor, ReadResult, RustylineEditor};
pub use repl::Repl;
pub use rows::{TableReader, read_table};
pub use serialize::{
    DescriptorFormat, RecordWriter, load_descriptor, save_descriptor, save_syntax, write_syntax,
};
pub use verify::{Mismatch, VerificationReport};

/// Returns true if `path` names a grammar table rather than a descriptor.
#[must_use]
pub fn is_table(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| ["csv", "tsv", "tab"].iter().any(|t| ext.eq_ignore_ascii_case(t)))
}

/// Loads a rule set from a grammar table or a saved descriptor.
///
/// Tables are compiled with the configured options; descriptors carry their
/// own case sensitivity.
///
/// # Errors
///
/// Returns an error if the file cannot be read or decoded. Problems with
/// individual rows or rules are reported as diagnostics instead.
pub fn load_rule_set<P: AsRef<Path>>(path: P, config: &RuntimeConfig) -> Result<Compilation> {
    let path = path.as_ref();
    let compilation = if is_table(path) {
        let rows = read_table(path)?;
        GrammarCompiler::new(config.compile_options()).compile_rows(&rows)
    } else {
        load_descriptor(path)?.load()?
    };
    info!(
        path = %path.display(),
        rules = compilation.rules.len(),
        diagnostics = compilation.diagnostics.len(),
        "loaded rule set"
    );
    Ok(compilation)
}
