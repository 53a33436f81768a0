//! Quorum arithmetic and duplicate-proof vote sets.
//!
//! Votes are counted by set membership, never by arrival order: the same
//! principal can only ever contribute one vote to a given [`VoteSet`].

use crate::core::Address;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Votes needed to admit a candidate once the consortium is past bootstrap.
///
/// `ceil(accepted / 2)`, evaluated against the accepted count at vote time.
pub fn required_votes(accepted: usize) -> usize {
    accepted.div_ceil(2)
}

/// A set of distinct voters.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteSet {
    voters: BTreeSet<Address>,
}

impl VoteSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a voter. Returns `false` and leaves the set untouched if the voter
    /// was already present.
    pub fn insert(&mut self, voter: Address) -> bool {
        self.voters.insert(voter)
    }

    /// Whether the voter is already counted.
    pub fn contains(&self, voter: &Address) -> bool {
        self.voters.contains(voter)
    }

    /// Number of distinct voters.
    pub fn len(&self) -> usize {
        self.voters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voters.is_empty()
    }

    /// Whether the set has reached `threshold` voters.
    pub fn reaches(&self, threshold: usize) -> bool {
        self.voters.len() >= threshold
    }

    pub fn clear(&mut self) {
        self.voters.clear();
    }
}
