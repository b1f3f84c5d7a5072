//! Move history: one record per resolved pair attempt.
//!
//! Single flips are not recorded; a record is written when the second card
//! of a turn is evaluated. Useful for replays and for agents that learn
//! from past reveals.

use serde::{Deserialize, Serialize};

use crate::cards::CardId;

/// How a pair attempt resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveKind {
    /// Both cards share a value and are now solved.
    Matched,
    /// Values differ; the pair reverts after the delay.
    Mismatched,
}

/// A resolved pair attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MoveRecord {
    /// Attempt number within the game, starting at 0.
    pub sequence: u32,

    /// Card revealed first.
    pub first: CardId,

    /// Card revealed second.
    pub second: CardId,

    /// Outcome of the comparison.
    pub kind: MoveKind,
}

impl MoveRecord {
    /// Create a new move record.
    #[must_use]
    pub fn new(sequence: u32, first: CardId, second: CardId, kind: MoveKind) -> Self {
        Self {
            sequence,
            first,
            second,
            kind,
        }
    }

    /// Check whether this attempt found a pair.
    #[must_use]
    pub fn is_match(&self) -> bool {
        self.kind == MoveKind::Matched
    }

    /// Check whether this attempt revealed the given card.
    #[must_use]
    pub fn involves(&self, id: CardId) -> bool {
        self.first == id || self.second == id
    }
}
