//! Match records and the builder that fills them from regex captures.

use regex::Captures;

use cmdtree_grammar::pattern::group_name;
use cmdtree_grammar::{ArgumentSlot, GrammarRule, RuleKey, SlotKind};

/// One slot of a matched rule together with the text it captured.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SlotValue<'r> {
    /// Position of the slot in declaration order.
    pub index: usize,
    /// The slot definition.
    pub slot: &'r ArgumentSlot,
    /// Captured text, or `None` for an optional slot that was not present.
    pub value: Option<&'r str>,
}

/// The structured result of matching one line.
///
/// Borrows the rule that produced it; records are built per line and are
/// not meant to outlive the rule set.
#[derive(Clone, Debug)]
pub struct MatchRecord<'r> {
    rule: &'r GrammarRule,
    values: Vec<Option<String>>,
    raw: String,
}

impl<'r> MatchRecord<'r> {
    /// The rule that matched.
    #[must_use]
    pub fn rule(&self) -> &'r GrammarRule {
        self.rule
    }

    /// The matched rule's key.
    #[must_use]
    pub fn key(&self) -> &'r RuleKey {
        self.rule.key()
    }

    /// Verb label of the matched rule.
    #[must_use]
    pub fn verb(&self) -> &'r str {
        self.rule.verb()
    }

    /// Object label of the matched rule.
    #[must_use]
    pub fn object(&self) -> &'r str {
        self.rule.object()
    }

    /// The input line as given.
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Captured values in declaration order; `None` marks an absent slot.
    #[must_use]
    pub fn values(&self) -> &[Option<String>] {
        &self.values
    }

    /// Iterates `(slot, value)` pairs in declaration order.
    pub fn slots(&self) -> impl Iterator<Item = SlotValue<'_>> {
        self.rule
            .slots()
            .iter()
            .zip(&self.values)
            .enumerate()
            .map(|(index, (slot, value))| SlotValue {
                index,
                slot,
                value: value.as_deref(),
            })
    }

    /// Looks up a captured value by slot name.
    ///
    /// Returns `None` both for unknown names and for absent slots.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        let index = self.rule.slot_index(name)?;
        self.values[index].as_deref()
    }

    /// Returns true if the named slot captured a value.
    #[must_use]
    pub fn is_present(&self, name: &str) -> bool {
        self.get(name).is_some()
    }
}

/// Builds [`MatchRecord`]s from the captures of a rule's pattern.
pub struct RecordBuilder;

impl RecordBuilder {
    /// Maps capture group `sN` onto slot `N` and validates the result.
    ///
    /// Returns `None` if a choice or anchor capture holds a value outside
    /// its allowed set, or if a mandatory slot captured nothing.
    #[must_use]
    pub fn build<'r>(
        rule: &'r GrammarRule,
        captures: &Captures<'_>,
        raw: &str,
    ) -> Option<MatchRecord<'r>> {
        let mut values = Vec::with_capacity(rule.slots().len());
        for (i, slot) in rule.slots().iter().enumerate() {
            let value = captures.name(&group_name(i)).map(|m| m.as_str());
            match value {
                Some(text) => {
                    if needs_validation(slot) && !slot.accepts(text, rule.case_insensitive()) {
                        return None;
                    }
                    values.push(Some(text.to_string()));
                }
                None if slot.optional => values.push(None),
                None => return None,
            }
        }

        Some(MatchRecord {
            rule,
            values,
            raw: raw.to_string(),
        })
    }
}

fn needs_validation(slot: &ArgumentSlot) -> bool {
    slot.kind == SlotKind::Choice || slot.anchor
}
