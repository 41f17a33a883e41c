//! Regex construction from slot lists.
//!
//! Every slot becomes one positional capture group named `s<index>`, so the
//! record builder can map captures back onto the declared slot order without
//! relying on user-chosen group names. Consecutive slots of the same optional
//! group are wrapped together in `(?:...)?`.

use regex::{Regex, RegexBuilder};

use crate::error::{Error, Result};
use crate::slot::{ArgumentSlot, words_regex};

const SEPARATOR: &str = r"\s+";

/// Returns the capture group name used for slot `index`.
#[must_use]
pub fn group_name(index: usize) -> String {
    format!("s{index}")
}

/// Builds the regex source for a rule.
#[must_use]
pub fn pattern_source(verb: &str, object: &str, slots: &[ArgumentSlot]) -> String {
    let mut out = String::from("^");
    out.push_str(&words_regex(verb));
    if !object.trim().is_empty() {
        out.push_str(SEPARATOR);
        out.push_str(&words_regex(object));
    }

    let mut i = 0;
    while i < slots.len() {
        match slots[i].group {
            None => {
                push_slot(&mut out, i, &slots[i]);
                i += 1;
            }
            Some(group) => {
                out.push_str("(?:");
                while i < slots.len() && slots[i].group == Some(group) {
                    push_slot(&mut out, i, &slots[i]);
                    i += 1;
                }
                out.push_str(")?");
            }
        }
    }

    out.push_str(r"\s*$");
    out
}

fn push_slot(out: &mut String, index: usize, slot: &ArgumentSlot) {
    if !slot.joined {
        out.push_str(SEPARATOR);
    }
    out.push_str("(?P<");
    out.push_str(&group_name(index));
    out.push('>');
    out.push_str(&slot.value_regex());
    out.push(')');
}

/// Compiles the regex for a rule.
///
/// # Errors
///
/// Returns an error if the regex engine rejects the generated pattern.
pub fn build_pattern(
    verb: &str,
    object: &str,
    slots: &[ArgumentSlot],
    case_insensitive: bool,
) -> Result<Regex> {
    let source = pattern_source(verb, object, slots);
    RegexBuilder::new(&source)
        .case_insensitive(case_insensitive)
        .build()
        .map_err(|e| Error::invalid_pattern(e.to_string()))
}
