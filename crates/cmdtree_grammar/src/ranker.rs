//! Specificity ranking.
//!
//! Rules anchored by more fixed text are tried before variable-heavy rules
//! that could otherwise absorb the same line.

use crate::rule::GrammarRule;
use crate::slot::ArgumentSlot;

/// Weight of a mandatory literal slot.
pub const LITERAL_WEIGHT: u32 = 3;

/// Weight of any other slot (variables, choices, optional slots).
pub const FLEXIBLE_WEIGHT: u32 = 1;

/// Calculates the specificity score of a slot list.
///
/// `3 × mandatory literals + 1 × everything else`.
#[must_use]
pub fn specificity(slots: &[ArgumentSlot]) -> u32 {
    slots
        .iter()
        .map(|slot| {
            if slot.is_mandatory_literal() {
                LITERAL_WEIGHT
            } else {
                FLEXIBLE_WEIGHT
            }
        })
        .sum()
}

/// Orders rules so the most specific are tried first.
pub struct SpecificityRanker;

impl SpecificityRanker {
    /// Sorts rules by descending score.
    ///
    /// The sort is stable: equal scores keep declaration order.
    #[must_use]
    pub fn rank(mut rules: Vec<GrammarRule>) -> Vec<GrammarRule> {
        rules.sort_by(|a, b| b.score().cmp(&a.score()));
        rules
    }
}
