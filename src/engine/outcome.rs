//! Results of player actions and revert completions.

use crate::cards::CardId;

use super::timer::RevertTicket;

/// Why a selection had no effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IgnoreReason {
    /// A pair is being evaluated or waiting to revert.
    Locked,
    /// Every card is solved; only a reset accepts input now.
    AlreadyWon,
    /// The id is not on the current board.
    UnknownCard,
    /// The card is already part of a solved pair.
    AlreadySolved,
    /// The card is the one currently face-up.
    AlreadyFlipped,
}

/// Result of `MatchEngine::select`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectOutcome {
    /// First card of a turn turned face-up.
    Flipped(CardId),
    /// The lone face-up card was turned back down (`ReselectPolicy::Unflip`).
    Unflipped(CardId),
    /// Second card matched the first; both are solved.
    Matched {
        first: CardId,
        second: CardId,
        /// True if this pair cleared the board.
        won: bool,
    },
    /// Second card did not match; the pair reverts when the ticket is due.
    Mismatched {
        first: CardId,
        second: CardId,
        ticket: RevertTicket,
    },
    /// Nothing changed.
    Ignored(IgnoreReason),
}

impl SelectOutcome {
    /// Check whether the selection changed engine state.
    #[must_use]
    pub const fn has_update(&self) -> bool {
        !matches!(self, SelectOutcome::Ignored(_))
    }

    /// The revert ticket armed by a mismatch.
    #[must_use]
    pub fn ticket(&self) -> Option<&RevertTicket> {
        match self {
            SelectOutcome::Mismatched { ticket, .. } => Some(ticket),
            _ => None,
        }
    }
}

/// Result of handing a revert ticket back to the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RevertOutcome {
    /// The pair turned face-down and input is unlocked.
    Reverted { first: CardId, second: CardId },
    /// The ticket no longer applies (board replaced or already reverted).
    Stale,
}

impl RevertOutcome {
    /// Check whether the revert changed engine state.
    #[must_use]
    pub const fn has_update(&self) -> bool {
        matches!(self, RevertOutcome::Reverted { .. })
    }
}
