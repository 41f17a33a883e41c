//! Line reconstruction from records.
//!
//! A record is lossless when the verb, the object and every present value,
//! joined by single spaces (no space before glued tokens), give back the
//! original line up to whitespace.

use crate::layout::SerializedRecord;
use crate::record::MatchRecord;

/// Collapses every whitespace run to one space and trims the ends.
#[must_use]
pub fn normalize_space(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn assemble<'a>(
    verb: &str,
    object: &str,
    values: impl Iterator<Item = (Option<&'a str>, bool)>,
) -> String {
    let mut out = String::from(verb);
    if !object.is_empty() {
        out.push(' ');
        out.push_str(object);
    }
    for (value, joined) in values {
        let Some(value) = value.filter(|v| !v.is_empty()) else {
            continue;
        };
        if !joined {
            out.push(' ');
        }
        out.push_str(value);
    }
    normalize_space(&out)
}

/// Rebuilds the line a record was matched from.
#[must_use]
pub fn reconstruct(record: &MatchRecord<'_>) -> String {
    assemble(
        record.verb(),
        record.object(),
        record.slots().map(|sv| (sv.value, sv.slot.joined)),
    )
}

/// Rebuilds the line from a deserialized tokens-layout record.
#[must_use]
pub fn reconstruct_serialized(record: &SerializedRecord) -> String {
    assemble(
        &record.verb,
        &record.object,
        record.args.iter().map(|a| (a.value(), a.joined())),
    )
}

/// Compares two lines after normalizing whitespace, optionally ignoring case.
#[must_use]
pub fn lines_agree(left: &str, right: &str, case_insensitive: bool) -> bool {
    let (left, right) = (normalize_space(left), normalize_space(right));
    if case_insensitive {
        left.to_lowercase() == right.to_lowercase()
    } else {
        left == right
    }
}

/// Checks that `record` reconstructs `line`.
///
/// Case is ignored when the matching rule ignores case, since the verb and
/// object come from the rule labels rather than the line.
#[must_use]
pub fn verify(record: &MatchRecord<'_>, line: &str) -> bool {
    lines_agree(&reconstruct(record), line, record.rule().case_insensitive())
}
