//! Argument slots: the named extraction points of a compiled rule.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// What a slot extracts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotKind {
    /// A fixed keyword (or punctuation) from the template.
    Literal,
    /// A `<variable>` or wildcard.
    Variable,
    /// A `{a|b}` choice among fixed values.
    Choice,
}

impl SlotKind {
    /// The lowercase name used in descriptors.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Literal => "literal",
            Self::Variable => "variable",
            Self::Choice => "choice",
        }
    }
}

impl FromStr for SlotKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "literal" => Ok(Self::Literal),
            "variable" => Ok(Self::Variable),
            "choice" => Ok(Self::Choice),
            _ => Err(format!("unknown slot kind '{s}'")),
        }
    }
}

/// How a variable slot matches its value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ValuePattern {
    /// Any run of non-whitespace characters.
    Word,
    /// A run of non-whitespace characters that also stops at the given
    /// punctuation characters.
    Delimited(String),
    /// Everything up to the end of the line.
    Remainder,
    /// The shortest run that still lets the rest of the pattern match.
    ShortestRemainder,
}

impl ValuePattern {
    /// Returns the regex fragment for this pattern.
    #[must_use]
    pub fn regex(&self) -> String {
        match self {
            Self::Word => r"\S+".to_string(),
            Self::Delimited(stops) => format!(r"[^\s{}]+", regex::escape(stops)),
            Self::Remainder => ".+".to_string(),
            Self::ShortestRemainder => ".+?".to_string(),
        }
    }

    /// Returns true if the value may span whitespace.
    #[must_use]
    pub const fn is_remainder(&self) -> bool {
        matches!(self, Self::Remainder | Self::ShortestRemainder)
    }
}

impl fmt::Display for ValuePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Word => write!(f, "word"),
            Self::Delimited(stops) => write!(f, "delimited:{stops}"),
            Self::Remainder => write!(f, "remainder"),
            Self::ShortestRemainder => write!(f, "shortest-remainder"),
        }
    }
}

impl FromStr for ValuePattern {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "word" => Ok(Self::Word),
            "remainder" => Ok(Self::Remainder),
            "shortest-remainder" => Ok(Self::ShortestRemainder),
            _ => match s.strip_prefix("delimited:") {
                Some(stops) if !stops.is_empty() => Ok(Self::Delimited(stops.to_string())),
                _ => Err(format!("unknown value pattern '{s}'")),
            },
        }
    }
}

/// One named extraction point within a compiled rule.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArgumentSlot {
    /// Name, unique within the rule.
    pub name: String,
    /// What the slot extracts.
    pub kind: SlotKind,
    /// Whether the slot sits inside an optional block.
    pub optional: bool,
    /// The optional block the slot belongs to, if any.
    pub group: Option<usize>,
    /// The keyword of a literal, or the alternatives of a choice.
    pub allowed: Vec<String>,
    /// The match pattern of a variable.
    pub pattern: Option<ValuePattern>,
    /// No whitespace separates this slot from the previous token.
    pub joined: bool,
    /// Whether this literal is the rule's resynchronisation anchor.
    pub anchor: bool,
}

impl ArgumentSlot {
    /// Creates a literal slot for a keyword.
    #[must_use]
    pub fn literal(name: impl Into<String>, keyword: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: SlotKind::Literal,
            optional: false,
            group: None,
            allowed: vec![keyword.into()],
            pattern: None,
            joined: false,
            anchor: false,
        }
    }

    /// Creates a variable slot.
    #[must_use]
    pub fn variable(name: impl Into<String>, pattern: ValuePattern) -> Self {
        Self {
            name: name.into(),
            kind: SlotKind::Variable,
            optional: false,
            group: None,
            allowed: Vec::new(),
            pattern: Some(pattern),
            joined: false,
            anchor: false,
        }
    }

    /// Creates a choice slot.
    #[must_use]
    pub fn choice(name: impl Into<String>, options: Vec<String>) -> Self {
        Self {
            name: name.into(),
            kind: SlotKind::Choice,
            optional: false,
            group: None,
            allowed: options,
            pattern: None,
            joined: false,
            anchor: false,
        }
    }

    /// Places the slot inside an optional block.
    #[must_use]
    pub fn in_group(mut self, group: usize) -> Self {
        self.optional = true;
        self.group = Some(group);
        self
    }

    /// Sets the joined flag.
    #[must_use]
    pub fn with_joined(mut self, joined: bool) -> Self {
        self.joined = joined;
        self
    }

    /// Returns the keyword of a literal slot.
    #[must_use]
    pub fn keyword(&self) -> Option<&str> {
        match self.kind {
            SlotKind::Literal => self.allowed.first().map(String::as_str),
            _ => None,
        }
    }

    /// Returns true for a literal outside any optional block.
    #[must_use]
    pub fn is_mandatory_literal(&self) -> bool {
        self.kind == SlotKind::Literal && !self.optional
    }

    /// Returns true if the slot holds a punctuation literal.
    #[must_use]
    pub fn is_punctuation(&self) -> bool {
        self.keyword().is_some_and(|k| {
            let mut chars = k.chars();
            chars.next().is_some_and(crate::token::is_punctuation) && chars.next().is_none()
        })
    }

    /// Returns true if `value` is acceptable for this slot.
    ///
    /// Variables accept anything; literals and choices accept their allowed
    /// values, compared with whitespace collapsed.
    #[must_use]
    pub fn accepts(&self, value: &str, case_insensitive: bool) -> bool {
        if self.kind == SlotKind::Variable {
            return true;
        }
        let observed = collapse(value);
        self.allowed.iter().any(|allowed| {
            if case_insensitive {
                allowed.to_lowercase() == observed.to_lowercase()
            } else {
                *allowed == observed
            }
        })
    }

    /// Returns the regex fragment that matches this slot's value.
    #[must_use]
    pub fn value_regex(&self) -> String {
        match self.kind {
            SlotKind::Literal => words_regex(self.allowed.first().map_or("", String::as_str)),
            SlotKind::Choice => {
                let alternatives: Vec<String> =
                    self.allowed.iter().map(|alt| words_regex(alt)).collect();
                format!("(?:{})", alternatives.join("|"))
            }
            SlotKind::Variable => self
                .pattern
                .as_ref()
                .unwrap_or(&ValuePattern::Word)
                .regex(),
        }
    }
}

/// Escapes `text` and lets any run of whitespace inside it match `\s+`.
#[must_use]
pub fn words_regex(text: &str) -> String {
    text.split_whitespace()
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(r"\s+")
}

fn collapse(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Turns raw template text into a slot-name base.
///
/// Runs of non-word characters become `_`; names that would be empty or
/// start with a digit get an `arg_` prefix.
#[must_use]
pub fn normalize_name(raw: &str) -> String {
    let mut key = String::new();
    let mut in_gap = false;
    for c in raw.trim().chars() {
        if c.is_alphanumeric() || c == '_' {
            key.push(c);
            in_gap = false;
        } else if !in_gap {
            key.push('_');
            in_gap = true;
        }
    }

    if key.is_empty() || key.starts_with(|c: char| c.is_ascii_digit()) {
        format!("arg_{key}")
    } else {
        key
    }
}

/// Hands out slot names that are unique within one rule.
///
/// The first use of a base keeps it as-is; later uses get `_1`, `_2`, ...
#[derive(Debug, Default)]
pub struct SlotNamer {
    used: HashMap<String, usize>,
}

impl SlotNamer {
    /// Creates an empty namer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a fresh unique name derived from `base`.
    pub fn allocate(&mut self, base: &str) -> String {
        let mut count = self.used.get(base).copied().unwrap_or(0);
        loop {
            let candidate = if count == 0 {
                base.to_string()
            } else {
                format!("{base}_{count}")
            };
            count += 1;
            if !self.used.contains_key(&candidate) {
                self.used.insert(base.to_string(), count);
                self.used.entry(candidate.clone()).or_insert(1);
                return candidate;
            }
        }
    }
}
