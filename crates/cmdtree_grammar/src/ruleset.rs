//! The immutable, ranked rule set.

use std::collections::HashMap;

use crate::ranker::SpecificityRanker;
use crate::rule::{GrammarRule, RuleKey};

/// Ranked rules plus a dispatch table keyed by the leading verb word.
///
/// Every rule pattern starts with its verb, so only rules whose verb begins
/// with the line's first word can match; the table narrows the linear scan
/// to that bucket while preserving ranked order inside it.
#[derive(Clone, Debug, Default)]
pub struct RuleSet {
    rules: Vec<GrammarRule>,
    dispatch: HashMap<String, Vec<usize>>,
    case_insensitive: bool,
}

impl RuleSet {
    /// Ranks the rules and builds the dispatch table.
    #[must_use]
    pub fn new(rules: Vec<GrammarRule>, case_insensitive: bool) -> Self {
        let rules = SpecificityRanker::rank(rules);
        let mut dispatch: HashMap<String, Vec<usize>> = HashMap::new();
        for (i, rule) in rules.iter().enumerate() {
            dispatch
                .entry(dispatch_key(rule.leading_word(), case_insensitive))
                .or_default()
                .push(i);
        }
        Self {
            rules,
            dispatch,
            case_insensitive,
        }
    }

    /// Rules in ranked order.
    #[must_use]
    pub fn rules(&self) -> &[GrammarRule] {
        &self.rules
    }

    /// Iterates rules in ranked order.
    pub fn iter(&self) -> std::slice::Iter<'_, GrammarRule> {
        self.rules.iter()
    }

    /// Number of rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true if there are no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Whether rule patterns ignore case.
    #[must_use]
    pub fn case_insensitive(&self) -> bool {
        self.case_insensitive
    }

    /// Looks up a rule by key.
    #[must_use]
    pub fn get(&self, key: &RuleKey) -> Option<&GrammarRule> {
        self.rules.iter().find(|r| r.key() == key)
    }

    /// Rules that could match `line`, in ranked order.
    pub fn candidates<'a>(&'a self, line: &str) -> impl Iterator<Item = &'a GrammarRule> + use<'a> {
        let bucket = line
            .split_whitespace()
            .next()
            .and_then(|word| self.dispatch.get(&dispatch_key(word, self.case_insensitive)))
            .map_or(&[][..], Vec::as_slice);
        bucket.iter().map(move |&i| &self.rules[i])
    }

    /// Distinct verbs in ranked order of first appearance.
    #[must_use]
    pub fn verbs(&self) -> Vec<&str> {
        let mut verbs: Vec<&str> = Vec::new();
        for rule in &self.rules {
            if !verbs.contains(&rule.verb()) {
                verbs.push(rule.verb());
            }
        }
        verbs
    }
}

impl<'a> IntoIterator for &'a RuleSet {
    type Item = &'a GrammarRule;
    type IntoIter = std::slice::Iter<'a, GrammarRule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}

fn dispatch_key(word: &str, case_insensitive: bool) -> String {
    if case_insensitive {
        word.to_lowercase()
    } else {
        word.to_string()
    }
}
