//! Compiled grammar rules.

use std::fmt;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::compiler::CompiledTemplate;
use crate::constants::ConstantMap;
use crate::error::Result;
use crate::pattern::build_pattern;
use crate::ranker::specificity;
use crate::slot::ArgumentSlot;

/// Identifies a rule for persisted correlation.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RuleKey {
    /// Verb label (one alias of the row's verb field).
    pub verb: String,
    /// Object label.
    pub object: String,
    /// Template text as written in the grammar table.
    pub template: String,
}

impl RuleKey {
    /// Creates a new rule key.
    #[must_use]
    pub fn new(
        verb: impl Into<String>,
        object: impl Into<String>,
        template: impl Into<String>,
    ) -> Self {
        Self {
            verb: verb.into(),
            object: object.into(),
            template: template.into(),
        }
    }
}

impl fmt::Display for RuleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.verb, self.object)?;
        if !self.template.is_empty() {
            write!(f, " {}", self.template)?;
        }
        Ok(())
    }
}

/// One compiled (verb, object, template) unit.
///
/// Immutable once built; matching never mutates a rule.
#[derive(Clone, Debug)]
pub struct GrammarRule {
    key: RuleKey,
    slots: Vec<ArgumentSlot>,
    constants: ConstantMap,
    score: u32,
    pattern: Regex,
    case_insensitive: bool,
}

impl GrammarRule {
    /// Builds a rule and its full-line pattern.
    ///
    /// # Errors
    ///
    /// Returns an error if the generated pattern is rejected by the regex
    /// engine.
    pub fn new(key: RuleKey, compiled: CompiledTemplate, case_insensitive: bool) -> Result<Self> {
        let pattern = build_pattern(&key.verb, &key.object, &compiled.slots, case_insensitive)?;
        let score = specificity(&compiled.slots);
        Ok(Self {
            key,
            slots: compiled.slots,
            constants: compiled.constants,
            score,
            pattern,
            case_insensitive,
        })
    }

    /// The rule key.
    #[must_use]
    pub fn key(&self) -> &RuleKey {
        &self.key
    }

    /// The verb label.
    #[must_use]
    pub fn verb(&self) -> &str {
        &self.key.verb
    }

    /// The object label.
    #[must_use]
    pub fn object(&self) -> &str {
        &self.key.object
    }

    /// The template text.
    #[must_use]
    pub fn template(&self) -> &str {
        &self.key.template
    }

    /// Slots in declaration order.
    #[must_use]
    pub fn slots(&self) -> &[ArgumentSlot] {
        &self.slots
    }

    /// Keyword links between slots.
    #[must_use]
    pub fn constants(&self) -> &ConstantMap {
        &self.constants
    }

    /// Specificity score.
    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    /// The compiled full-line pattern.
    #[must_use]
    pub fn pattern(&self) -> &Regex {
        &self.pattern
    }

    /// Whether the pattern ignores case.
    #[must_use]
    pub fn case_insensitive(&self) -> bool {
        self.case_insensitive
    }

    /// Index of the anchor slot, if the rule has one.
    #[must_use]
    pub fn anchor(&self) -> Option<usize> {
        self.slots.iter().position(|s| s.anchor)
    }

    /// Index of the slot with the given name.
    #[must_use]
    pub fn slot_index(&self, name: &str) -> Option<usize> {
        self.slots.iter().position(|s| s.name == name)
    }

    /// The first word of the verb, used as the dispatch key.
    #[must_use]
    pub fn leading_word(&self) -> &str {
        self.key.verb.split_whitespace().next().unwrap_or("")
    }
}
