//! Keyword links between slots.
//!
//! A non-literal slot that directly follows a keyword in the same group is
//! "introduced" by that keyword: in `host <ip> [port <p>]`, `ip` belongs to
//! `host` and `p` belongs to `port`. Output layouts use these links to group
//! or qualify slot names.

use crate::slot::{ArgumentSlot, SlotKind};

/// Maps slot indices to the index of the keyword slot introducing them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConstantMap {
    links: Vec<Option<usize>>,
}

impl ConstantMap {
    /// Derives the links from an ordered slot list.
    #[must_use]
    pub fn from_slots(slots: &[ArgumentSlot]) -> Self {
        let mut links = vec![None; slots.len()];
        for i in 1..slots.len() {
            let (prev, slot) = (&slots[i - 1], &slots[i]);
            if slot.kind != SlotKind::Literal
                && prev.kind == SlotKind::Literal
                && !prev.is_punctuation()
                && prev.group == slot.group
            {
                links[i] = Some(i - 1);
            }
        }
        Self { links }
    }

    /// Returns the keyword slot introducing `slot`, if any.
    #[must_use]
    pub fn keyword_for(&self, slot: usize) -> Option<usize> {
        self.links.get(slot).copied().flatten()
    }

    /// Returns the slots introduced by the keyword at `keyword`.
    pub fn introduced_by(&self, keyword: usize) -> impl Iterator<Item = usize> + '_ {
        self.links
            .iter()
            .enumerate()
            .filter(move |(_, link)| **link == Some(keyword))
            .map(|(i, _)| i)
    }

    /// Returns true if the keyword at `keyword` introduces any slot.
    #[must_use]
    pub fn is_introducer(&self, keyword: usize) -> bool {
        self.links.contains(&Some(keyword))
    }

    /// Number of linked slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.links.iter().filter(|l| l.is_some()).count()
    }

    /// Returns true if no slot is linked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
