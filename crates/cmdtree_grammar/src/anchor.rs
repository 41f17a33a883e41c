//! Anchor resolution.
//!
//! A remainder capture (`<msg...>`, `*`) placed before fixed text is greedy:
//! left alone it would run over an optional block that precedes the fixed
//! text and the optional would never be observed. The resolver picks the
//! last mandatory literal of the slot list as the rule's anchor, gives it a
//! fixed allowed value checked at match time, and makes every remainder
//! capture before it lazy so matching resynchronises on the anchor.
//!
//! Only the single last mandatory literal is considered. Templates with
//! several interleaved optional and mandatory groups may still match
//! ambiguously; the first assignment found by the regex engine wins.

use crate::slot::{ArgumentSlot, ValuePattern};

/// What the resolver did to a slot list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnchorOutcome {
    /// The slot at this index is now the anchor.
    Anchored(usize),
    /// The template has no mandatory literal; the pattern stays naive.
    Unanchored,
}

impl AnchorOutcome {
    /// Returns the anchor index, if any.
    #[must_use]
    pub const fn index(self) -> Option<usize> {
        match self {
            Self::Anchored(i) => Some(i),
            Self::Unanchored => None,
        }
    }
}

/// Installs the anchor on a slot list.
pub struct AnchorResolver;

impl AnchorResolver {
    /// Finds the last mandatory literal, marks it as the anchor and makes
    /// remainder captures before it lazy.
    pub fn resolve(slots: &mut [ArgumentSlot]) -> AnchorOutcome {
        let Some(anchor) = slots.iter().rposition(ArgumentSlot::is_mandatory_literal) else {
            return AnchorOutcome::Unanchored;
        };

        for slot in &mut slots[..anchor] {
            if slot.pattern == Some(ValuePattern::Remainder) {
                slot.pattern = Some(ValuePattern::ShortestRemainder);
            }
        }

        let slot = &mut slots[anchor];
        slot.anchor = true;
        slot.allowed.truncate(1);
        AnchorOutcome::Anchored(anchor)
    }
}
