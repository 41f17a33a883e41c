//! Integration tests for the cmdtree_grammar crate.
//!
//! Tests for the template compilation pipeline:
//! - Tokenization
//! - Template compilation
//! - Row carry and verb expansion
//! - Anchor resolution
//! - Specificity ranking

mod expander;
mod ranker;
mod tokenizer;
