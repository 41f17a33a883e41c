//! Record serialization layouts.
//!
//! - `tokens`: the ordered argument list, one typed entry per slot
//! - `nested`: keywords that introduce values become objects holding them
//! - `flat`: one key per slot, qualified with its keyword when it has one

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use cmdtree_grammar::SlotKind;

use crate::record::MatchRecord;

/// Separator between a slot name and its keyword in the flat layout.
pub const FLAT_SEPARATOR: char = '\\';

/// How a record is rendered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordLayout {
    /// Ordered typed argument list.
    #[default]
    Tokens,
    /// Values grouped under the keywords that introduce them.
    Nested,
    /// One key per slot.
    Flat,
}

impl RecordLayout {
    /// Renders `record` in this layout.
    #[must_use]
    pub fn render(self, record: &MatchRecord<'_>, include_raw: bool) -> Value {
        match self {
            Self::Tokens => {
                let serialized = SerializedRecord::from_record(record, include_raw);
                serde_json::to_value(serialized).unwrap_or(Value::Null)
            }
            Self::Nested => envelope(record, Value::Object(nested_args(record)), include_raw),
            Self::Flat => envelope(record, Value::Object(flat_args(record)), include_raw),
        }
    }
}

impl fmt::Display for RecordLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tokens => write!(f, "tokens"),
            Self::Nested => write!(f, "nested"),
            Self::Flat => write!(f, "flat"),
        }
    }
}

impl FromStr for RecordLayout {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "tokens" => Ok(Self::Tokens),
            "nested" => Ok(Self::Nested),
            "flat" => Ok(Self::Flat),
            _ => Err(format!("unknown layout '{s}' (expected tokens, nested or flat)")),
        }
    }
}

fn is_false(b: &bool) -> bool {
    !*b
}

/// One entry of a tokens-layout argument list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ArgToken {
    /// A fixed keyword or punctuation mark.
    Keyword {
        /// Observed text, or `None` if its optional block was absent.
        value: Option<String>,
        /// Whether the keyword sits in an optional block.
        optional: bool,
        /// No whitespace before this token.
        #[serde(default, skip_serializing_if = "is_false")]
        joined: bool,
    },
    /// A variable or choice.
    Variable {
        /// Slot name.
        name: String,
        /// Captured text, or `None` if absent.
        value: Option<String>,
        /// Whether the slot sits in an optional block.
        optional: bool,
        /// The alternatives of a choice.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        options: Option<Vec<String>>,
        /// No whitespace before this token.
        #[serde(default, skip_serializing_if = "is_false")]
        joined: bool,
    },
}

impl ArgToken {
    /// The captured value, if any.
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        match self {
            Self::Keyword { value, .. } | Self::Variable { value, .. } => value.as_deref(),
        }
    }

    /// Whether the token is glued to the previous one.
    #[must_use]
    pub fn joined(&self) -> bool {
        match self {
            Self::Keyword { joined, .. } | Self::Variable { joined, .. } => *joined,
        }
    }
}

/// A record in the tokens layout, as written to and read from JSON.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializedRecord {
    /// Verb label.
    pub verb: String,
    /// Object label.
    pub object: String,
    /// Arguments in declaration order.
    #[serde(default)]
    pub args: Vec<ArgToken>,
    /// The input line, when requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
}

impl SerializedRecord {
    /// Converts a match record into the tokens layout.
    #[must_use]
    pub fn from_record(record: &MatchRecord<'_>, include_raw: bool) -> Self {
        let args = record
            .slots()
            .map(|sv| {
                let value = sv.value.map(str::to_string);
                match sv.slot.kind {
                    SlotKind::Literal => ArgToken::Keyword {
                        value,
                        optional: sv.slot.optional,
                        joined: sv.slot.joined,
                    },
                    SlotKind::Variable | SlotKind::Choice => ArgToken::Variable {
                        name: sv.slot.name.clone(),
                        value,
                        optional: sv.slot.optional,
                        options: (sv.slot.kind == SlotKind::Choice)
                            .then(|| sv.slot.allowed.clone()),
                        joined: sv.slot.joined,
                    },
                }
            })
            .collect();

        Self {
            verb: record.verb().to_string(),
            object: record.object().to_string(),
            args,
            raw: include_raw.then(|| record.raw().to_string()),
        }
    }
}

fn envelope(record: &MatchRecord<'_>, args: Value, include_raw: bool) -> Value {
    let mut out = Map::new();
    out.insert("verb".into(), Value::from(record.verb()));
    out.insert("object".into(), Value::from(record.object()));
    out.insert("args".into(), args);
    if include_raw {
        out.insert("raw".into(), Value::from(record.raw()));
    }
    Value::Object(out)
}

fn text(value: Option<&str>) -> Value {
    value.map_or(Value::Null, Value::from)
}

fn nested_args(record: &MatchRecord<'_>) -> Map<String, Value> {
    let constants = record.rule().constants();
    let slots: Vec<_> = record.slots().collect();
    let mut out = Map::new();

    for sv in &slots {
        if constants.keyword_for(sv.index).is_some() {
            continue;
        }
        let value = if constants.is_introducer(sv.index) {
            match sv.value {
                Some(_) => {
                    let inner: Map<String, Value> = constants
                        .introduced_by(sv.index)
                        .map(|i| (slots[i].slot.name.clone(), text(slots[i].value)))
                        .collect();
                    Value::Object(inner)
                }
                None => Value::Null,
            }
        } else {
            text(sv.value)
        };
        out.insert(sv.slot.name.clone(), value);
    }
    out
}

fn flat_args(record: &MatchRecord<'_>) -> Map<String, Value> {
    let constants = record.rule().constants();
    let slots = record.rule().slots();
    record
        .slots()
        .map(|sv| {
            let key = match constants.keyword_for(sv.index) {
                Some(keyword) => format!("{}{FLAT_SEPARATOR}{}", sv.slot.name, slots[keyword].name),
                None => sv.slot.name.clone(),
            };
            (key, text(sv.value))
        })
        .collect()
}
