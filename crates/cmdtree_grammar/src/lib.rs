//! Grammar compilation for command-line templates.
//!
//! This crate turns a table of `(verb, object, template)` rows into an
//! immutable, ranked [`RuleSet`] that the matching engine scans line by line.
//!
//! # Architecture
//!
//! ```text
//! ("add/del", "syslog", "host <ip> [port <p>]")
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ ROW CARRY       │  → blank verb/object cells inherit from the row above
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ TOKENIZER       │  → [Literal(host), Variable(ip), Optional[Literal(port), Variable(p)]]
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ TEMPLATE        │  → slots host, ip, port?, p?  + keyword links
//! │ COMPILER        │
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ ANCHOR          │  → last mandatory literal pins resynchronisation
//! │ RESOLVER        │
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ VERB EXPANDER   │  → one rule per alias: add syslog …, del syslog …
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ SPECIFICITY     │  → stable sort by 3 × literals + 1 × others
//! │ RANKER          │
//! └─────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`token`] / [`tokenizer`] - Template syntax to token stream
//! - [`slot`] - Argument slots and value patterns
//! - [`compiler`] - Token stream to slot list
//! - [`constants`] - Keyword links between slots
//! - [`pattern`] - Slot list to full-line regex
//! - [`anchor`] - Anchor selection
//! - [`expander`] - Continuation rows and verb aliases
//! - [`ranker`] / [`ruleset`] - Ordering and dispatch
//! - [`pipeline`] - Rows to rule set, with diagnostics
//! - [`descriptor`] - Persisted rule metadata

#![warn(missing_docs)]

pub mod anchor;
pub mod compiler;
pub mod constants;
pub mod descriptor;
pub mod diagnostic;
pub mod error;
pub mod expander;
pub mod options;
pub mod pattern;
pub mod pipeline;
pub mod ranker;
pub mod rule;
pub mod ruleset;
pub mod slot;
pub mod token;
pub mod tokenizer;

pub use anchor::{AnchorOutcome, AnchorResolver};
pub use compiler::{CompiledTemplate, TemplateCompiler};
pub use constants::ConstantMap;
pub use descriptor::{
    DESCRIPTOR_VERSION, RejectedRule, RuleDescriptor, RuleSetDescriptor, SlotDescriptor,
};
pub use diagnostic::{Diagnostic, DiagnosticCode, Location, Severity};
pub use error::{Error, ErrorContext, ErrorKind, Result};
pub use expander::{GrammarRow, ResolvedRow, VerbExpander};
pub use options::CompileOptions;
pub use pipeline::{Compilation, GrammarCompiler};
pub use ranker::SpecificityRanker;
pub use rule::{GrammarRule, RuleKey};
pub use ruleset::RuleSet;
pub use slot::{ArgumentSlot, SlotKind, ValuePattern};
pub use token::{Span, Token, TokenKind};
pub use tokenizer::tokenize;
