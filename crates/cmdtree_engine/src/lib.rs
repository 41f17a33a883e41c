//! Line matching and record building for cmdtree.
//!
//! This crate provides:
//! - [`Matcher`] - Ranked, stateless matching of lines against a rule set
//! - [`RecordBuilder`] - Capture-to-slot mapping with value validation
//! - [`RecordLayout`] - Tokens, nested and flat record rendering
//! - [`roundtrip`] - Line reconstruction and verification

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod layout;
pub mod matcher;
pub mod record;
pub mod roundtrip;

pub use layout::{ArgToken, RecordLayout, SerializedRecord};
pub use matcher::{BatchReport, DEFAULT_COMMENT_PREFIX, LineOutcome, MatchOutcome, Matcher, Unmatched};
pub use record::{MatchRecord, RecordBuilder, SlotValue};
pub use roundtrip::{normalize_space, reconstruct, reconstruct_serialized, verify};
