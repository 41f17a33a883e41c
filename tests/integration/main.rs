//! Cross-layer integration tests for cmdtree
//!
//! Tests that verify correct interaction between multiple crates.

mod end_to_end;
mod verify;
