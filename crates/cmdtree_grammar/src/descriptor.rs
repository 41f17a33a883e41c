//! Persisted rule descriptors.
//!
//! A descriptor records everything needed to rebuild a rule without the
//! grammar table: the key and the full slot list. Patterns are not stored;
//! they are regenerated from the slots on load. Loading is tolerant per rule:
//! a rule whose descriptor is missing data, holds a field of the wrong type or
//! contradicts itself is excluded and reported, and the rest of the set still
//! loads. Rules are first read as untyped values and decoded one at a time,
//! which works for any self-describing format.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::compiler::CompiledTemplate;
use crate::diagnostic::Diagnostic;
use crate::error::{Error, Result};
use crate::pipeline::Compilation;
use crate::rule::{GrammarRule, RuleKey};
use crate::ruleset::RuleSet;
use crate::slot::{ArgumentSlot, SlotKind, ValuePattern};

/// Current descriptor format version.
pub const DESCRIPTOR_VERSION: u32 = 1;

fn is_false(b: &bool) -> bool {
    !*b
}

/// The persisted form of one slot.
///
/// Every field is optional on the wire so that a damaged slot is reported
/// against its rule instead of failing the whole file.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotDescriptor {
    /// Slot name.
    #[serde(default)]
    pub name: Option<String>,
    /// `literal`, `variable` or `choice`.
    #[serde(default)]
    pub kind: Option<String>,
    /// Whether the slot sits in an optional block.
    #[serde(default)]
    pub optional: bool,
    /// Optional block index.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<usize>,
    /// Keyword of a literal or alternatives of a choice.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_values: Option<Vec<String>>,
    /// Text form of a variable's value pattern.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    /// No whitespace before this slot.
    #[serde(default, skip_serializing_if = "is_false")]
    pub joined: bool,
    /// Whether this slot is the rule's anchor.
    #[serde(default, skip_serializing_if = "is_false")]
    pub anchor: bool,
}

impl From<&ArgumentSlot> for SlotDescriptor {
    fn from(slot: &ArgumentSlot) -> Self {
        Self {
            name: Some(slot.name.clone()),
            kind: Some(slot.kind.as_str().to_string()),
            optional: slot.optional,
            group: slot.group,
            allowed_values: (slot.kind != SlotKind::Variable).then(|| slot.allowed.clone()),
            pattern: slot.pattern.as_ref().map(ToString::to_string),
            joined: slot.joined,
            anchor: slot.anchor,
        }
    }
}

impl SlotDescriptor {
    /// Rebuilds the slot, checking that the fields agree with each other.
    ///
    /// # Errors
    ///
    /// Returns a descriptor mismatch error naming the first problem found.
    pub fn to_slot(&self) -> Result<ArgumentSlot> {
        let name = self
            .name
            .as_deref()
            .filter(|n| !n.is_empty())
            .ok_or_else(|| Error::descriptor_mismatch("slot has no name"))?;
        let mismatch = |what: &str| Error::descriptor_mismatch(format!("slot '{name}' {what}"));

        let kind: SlotKind = self
            .kind
            .as_deref()
            .ok_or_else(|| mismatch("has no kind"))?
            .parse()
            .map_err(|e: String| mismatch(&e))?;

        if self.optional != self.group.is_some() {
            return Err(mismatch("has inconsistent optional and group fields"));
        }

        let allowed = self.allowed_values.clone().unwrap_or_default();
        let pattern = match kind {
            SlotKind::Literal => {
                if allowed.len() != 1 || allowed[0].is_empty() {
                    return Err(mismatch("must have exactly one allowed value"));
                }
                None
            }
            SlotKind::Choice => {
                if allowed.is_empty() || allowed.iter().any(String::is_empty) {
                    return Err(mismatch("has no allowed values"));
                }
                None
            }
            SlotKind::Variable => {
                let text = self
                    .pattern
                    .as_deref()
                    .ok_or_else(|| mismatch("has no value pattern"))?;
                Some(
                    text.parse::<ValuePattern>()
                        .map_err(|e: String| mismatch(&e))?,
                )
            }
        };

        if self.anchor && (kind != SlotKind::Literal || self.optional) {
            return Err(mismatch("is marked as anchor but is not a mandatory literal"));
        }

        Ok(ArgumentSlot {
            name: name.to_string(),
            kind,
            optional: self.optional,
            group: self.group,
            allowed,
            pattern,
            joined: self.joined,
            anchor: self.anchor,
        })
    }
}

/// The persisted form of one rule.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleDescriptor {
    /// Verb label.
    #[serde(default)]
    pub verb: String,
    /// Object label.
    #[serde(default)]
    pub object: String,
    /// Template text.
    #[serde(default)]
    pub template: String,
    /// Slots in declaration order; `None` if missing from the file.
    #[serde(default)]
    pub slots: Option<Vec<SlotDescriptor>>,
}

impl From<&GrammarRule> for RuleDescriptor {
    fn from(rule: &GrammarRule) -> Self {
        Self {
            verb: rule.verb().to_string(),
            object: rule.object().to_string(),
            template: rule.template().to_string(),
            slots: Some(rule.slots().iter().map(SlotDescriptor::from).collect()),
        }
    }
}

impl RuleDescriptor {
    /// The key this descriptor claims.
    #[must_use]
    pub fn key(&self) -> RuleKey {
        RuleKey::new(&self.verb, &self.object, &self.template)
    }

    /// Rebuilds the rule and regenerates its pattern.
    ///
    /// # Errors
    ///
    /// Returns a descriptor mismatch error if the slot list is missing or
    /// inconsistent, or if the regenerated pattern does not build.
    pub fn to_rule(&self, case_insensitive: bool) -> Result<GrammarRule> {
        if self.verb.trim().is_empty() {
            return Err(Error::descriptor_mismatch("rule has no verb"));
        }
        let slots = self
            .slots
            .as_ref()
            .ok_or_else(|| Error::descriptor_mismatch("rule has no slot list"))?
            .iter()
            .map(SlotDescriptor::to_slot)
            .collect::<Result<Vec<_>>>()?;
        check_structure(&slots)?;

        GrammarRule::new(
            self.key(),
            CompiledTemplate::from_slots(slots),
            case_insensitive,
        )
        .map_err(|e| Error::descriptor_mismatch(e.to_string()))
    }
}

/// Checks rule-level invariants a single slot cannot see.
fn check_structure(slots: &[ArgumentSlot]) -> Result<()> {
    let mut names = HashSet::new();
    for slot in slots {
        if !names.insert(slot.name.as_str()) {
            return Err(Error::descriptor_mismatch(format!(
                "slot name '{}' is used twice",
                slot.name
            )));
        }
    }

    if slots.iter().filter(|s| s.anchor).count() > 1 {
        return Err(Error::descriptor_mismatch("rule has more than one anchor"));
    }

    // Each optional block must be one contiguous run.
    let mut closed = HashSet::new();
    let mut current = None;
    for slot in slots {
        if slot.group != current {
            if let Some(previous) = current {
                closed.insert(previous);
            }
            if let Some(group) = slot.group.filter(|g| closed.contains(g)) {
                return Err(Error::descriptor_mismatch(format!(
                    "optional block {group} is not contiguous"
                )));
            }
            current = slot.group;
        }
    }
    Ok(())
}

/// The persisted form of a whole rule set.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "StoredRuleSet")]
pub struct RuleSetDescriptor {
    /// Format version.
    pub version: u32,
    /// Whether patterns ignore case.
    pub case_insensitive: bool,
    /// Rules in ranked order.
    pub rules: Vec<RuleDescriptor>,
    /// Rules present in the input that could not be decoded.
    #[serde(skip)]
    pub rejected: Vec<RejectedRule>,
}

/// A persisted rule whose fields could not be decoded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RejectedRule {
    /// Whatever key could be recovered from the damaged entry.
    pub key: RuleKey,
    /// The decoding error.
    pub reason: String,
}

impl RejectedRule {
    fn from_value(value: &Value, reason: String) -> Self {
        let text = |field: &str| value.get(field).and_then(Value::as_str).unwrap_or_default();
        Self {
            key: RuleKey::new(text("verb"), text("object"), text("template")),
            reason,
        }
    }
}

/// The wire shape of a rule set, with rules left undecoded.
#[derive(Deserialize)]
struct StoredRuleSet {
    version: u32,
    #[serde(default = "default_case_insensitive")]
    case_insensitive: bool,
    #[serde(default)]
    rules: Vec<Value>,
}

const fn default_case_insensitive() -> bool {
    true
}

impl From<StoredRuleSet> for RuleSetDescriptor {
    fn from(stored: StoredRuleSet) -> Self {
        let mut rules = Vec::with_capacity(stored.rules.len());
        let mut rejected = Vec::new();
        for value in stored.rules {
            match RuleDescriptor::deserialize(&value) {
                Ok(rule) => rules.push(rule),
                Err(e) => rejected.push(RejectedRule::from_value(&value, e.to_string())),
            }
        }
        Self {
            version: stored.version,
            case_insensitive: stored.case_insensitive,
            rules,
            rejected,
        }
    }
}

impl From<&RuleSet> for RuleSetDescriptor {
    fn from(set: &RuleSet) -> Self {
        Self {
            version: DESCRIPTOR_VERSION,
            case_insensitive: set.case_insensitive(),
            rules: set.iter().map(RuleDescriptor::from).collect(),
            rejected: Vec::new(),
        }
    }
}

impl RuleSetDescriptor {
    /// Rebuilds the rule set.
    ///
    /// Rules that failed to decode, or whose descriptors do not hold
    /// together, are excluded and each produces a `RuleMetadataMismatch`
    /// diagnostic.
    ///
    /// # Errors
    ///
    /// Returns an error only if the format version is not supported.
    pub fn load(&self) -> Result<Compilation> {
        if self.version == 0 || self.version > DESCRIPTOR_VERSION {
            return Err(Error::descriptor_mismatch(format!(
                "unsupported descriptor version {}",
                self.version
            )));
        }

        let mut rules = Vec::with_capacity(self.rules.len());
        let mut diagnostics = Vec::new();
        for rejected in &self.rejected {
            let e = Error::descriptor_mismatch(format!("malformed rule: {}", rejected.reason));
            warn!(rule = %rejected.key, error = %e, "excluding persisted rule");
            diagnostics.push(Diagnostic::metadata_mismatch(rejected.key.clone(), &e));
        }
        for descriptor in &self.rules {
            match descriptor.to_rule(self.case_insensitive) {
                Ok(rule) => rules.push(rule),
                Err(e) => {
                    let key = descriptor.key();
                    warn!(rule = %key, error = %e, "excluding persisted rule");
                    diagnostics.push(Diagnostic::metadata_mismatch(key, &e));
                }
            }
        }

        Ok(Compilation {
            rules: RuleSet::new(rules, self.case_insensitive),
            diagnostics,
        })
    }
}

impl RuleSet {
    /// Returns the persisted form of this rule set.
    #[must_use]
    pub fn to_descriptor(&self) -> RuleSetDescriptor {
        RuleSetDescriptor::from(self)
    }
}
