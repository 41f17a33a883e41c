//! cmdtree - Command-grammar template compiler and line matcher
//!
//! This crate re-exports all layers of the cmdtree system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 2: cmdtree_runtime  - Config, grammar tables, descriptors, verification, REPL, CLI
//! Layer 1: cmdtree_engine   - Ranked matching, record building, layouts, round-trip
//! Layer 0: cmdtree_grammar  - Tokenizer, template compiler, anchors, ranking, errors
//! ```

pub use cmdtree_engine as engine;
pub use cmdtree_grammar as grammar;
pub use cmdtree_runtime as runtime;
