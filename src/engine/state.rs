//! Engine state: everything that changes while a board is played.
//!
//! ## Lifecycle
//!
//! A fresh `EngineState` is created for every dealt board and dropped
//! wholesale when the board is replaced. Only `MatchEngine` mutates it;
//! callers read it through accessors or a `Snapshot`.
//!
//! ## Phases
//!
//! | Phase       | flipped | locked | revert pending |
//! |-------------|---------|--------|----------------|
//! | Idle        | 0       | no     | no             |
//! | OneFlipped  | 1       | no     | no             |
//! | Evaluating  | 2       | yes    | no             |
//! | Reverting   | 2       | yes    | yes            |
//!
//! `Evaluating` only exists inside `MatchEngine::select`; a match resolves
//! synchronously and a mismatch moves straight to `Reverting`.

use im::Vector;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::timer::{Generation, RevertTicket};
use crate::cards::CardId;
use crate::core::{GameError, Invariant, MoveRecord, Result};

/// Flip-sequencing phase of the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// No unresolved card is face-up.
    Idle,
    /// One card is face-up, waiting for its partner.
    OneFlipped,
    /// Two cards are face-up and being compared.
    Evaluating,
    /// Two mismatched cards are face-up until the revert ticket is due.
    Reverting,
}

/// How a card is shown. Derived from state, never stored on the card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Visibility {
    /// Face-down.
    Hidden,
    /// Face-up but not solved.
    Flipped,
    /// Face-up permanently as part of a matched pair.
    Solved,
}

impl Visibility {
    /// Check whether the card's value is shown.
    #[must_use]
    pub const fn is_face_up(self) -> bool {
        !matches!(self, Visibility::Hidden)
    }

    /// Check whether the card is highlighted as solved.
    #[must_use]
    pub const fn is_solved(self) -> bool {
        matches!(self, Visibility::Solved)
    }
}

/// Face-up rule shared by the engine state and snapshots: solved wins over
/// flipped, anything else is face-down.
pub(crate) fn visibility_of(flipped: &[CardId], solved: &Vector<CardId>, id: CardId) -> Visibility {
    if solved.iter().any(|&card| card == id) {
        Visibility::Solved
    } else if flipped.contains(&id) {
        Visibility::Flipped
    } else {
        Visibility::Hidden
    }
}

/// Mutable state of one board.
#[derive(Clone, Debug)]
pub struct EngineState {
    /// Face-up unsolved cards in reveal order.
    pub(crate) flipped: SmallVec<[CardId; 2]>,

    /// Solved cards in the order they were matched.
    pub(crate) solved: Vector<CardId>,

    /// Rejects new flips while a pair is evaluated or reverting.
    pub(crate) locked: bool,

    /// Number of mismatches so far.
    pub(crate) failed_attempts: u32,

    /// Every card is solved.
    pub(crate) won: bool,

    /// Board this state belongs to.
    pub(crate) generation: Generation,

    /// Armed mismatch revert.
    pub(crate) pending_revert: Option<RevertTicket>,

    /// Resolved pair attempts.
    pub(crate) history: Vector<MoveRecord>,
}

impl EngineState {
    /// Create the idle state for a freshly dealt board.
    #[must_use]
    pub fn new(generation: Generation) -> Self {
        Self {
            flipped: SmallVec::new(),
            solved: Vector::new(),
            locked: false,
            failed_attempts: 0,
            won: false,
            generation,
            pending_revert: None,
            history: Vector::new(),
        }
    }

    /// Face-up unsolved cards, first-revealed first.
    #[must_use]
    pub fn flipped(&self) -> &[CardId] {
        &self.flipped
    }

    /// Solved cards in match order.
    #[must_use]
    pub fn solved(&self) -> &Vector<CardId> {
        &self.solved
    }

    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    #[must_use]
    pub fn failed_attempts(&self) -> u32 {
        self.failed_attempts
    }

    #[must_use]
    pub fn is_won(&self) -> bool {
        self.won
    }

    #[must_use]
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// The armed revert, if a mismatched pair is showing.
    #[must_use]
    pub fn pending_revert(&self) -> Option<&RevertTicket> {
        self.pending_revert.as_ref()
    }

    /// Resolved pair attempts in order.
    #[must_use]
    pub fn history(&self) -> &Vector<MoveRecord> {
        &self.history
    }

    #[must_use]
    pub fn is_flipped(&self, id: CardId) -> bool {
        self.flipped.contains(&id)
    }

    #[must_use]
    pub fn is_solved(&self, id: CardId) -> bool {
        self.solved.iter().any(|&solved| solved == id)
    }

    /// Derive how a card is shown.
    #[must_use]
    pub fn visibility(&self, id: CardId) -> Visibility {
        visibility_of(&self.flipped, &self.solved, id)
    }

    /// Current flip-sequencing phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        match (self.flipped.len(), self.pending_revert.is_some()) {
            (0, _) => Phase::Idle,
            (1, _) => Phase::OneFlipped,
            (_, true) => Phase::Reverting,
            (_, false) => Phase::Evaluating,
        }
    }

    /// Check the board consistency rules against a deck of `deck_len` cards.
    ///
    /// Holds after every completed action; only the synchronous comparison
    /// inside `select` may observe a violation of the lock rule.
    ///
    /// # Errors
    ///
    /// Returns `GameError::InvariantViolated` naming the first broken rule.
    pub fn check_invariants(&self, deck_len: usize) -> Result<()> {
        let violated = |invariant| Err(GameError::InvariantViolated(invariant));

        if self.flipped.len() > 2 {
            return violated(Invariant::FlippedBound);
        }
        if self.flipped.iter().any(|&id| self.is_solved(id)) {
            return violated(Invariant::FlippedSolvedDisjoint);
        }
        if self.solved.len() % 2 != 0 {
            return violated(Invariant::SolvedEven);
        }
        if self.won != (self.solved.len() == deck_len) {
            return violated(Invariant::WonMatchesSolved);
        }
        if self.locked != self.pending_revert.is_some() {
            return violated(Invariant::LockedMatchesPending);
        }
        let in_deck = |id: &CardId| id.index() < deck_len;
        if !self.flipped.iter().all(in_deck) || !self.solved.iter().all(in_deck) {
            return violated(Invariant::KnownCards);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    #[test]
    fn test_new_state_is_idle() {
        let state = EngineState::new(Generation::new(3));

        assert_eq!(state.phase(), Phase::Idle);
        assert_eq!(state.generation(), Generation::new(3));
        assert!(!state.is_locked());
        assert!(!state.is_won());
        assert_eq!(state.failed_attempts(), 0);
        assert!(state.history().is_empty());
        assert_eq!(state.check_invariants(16), Ok(()));
    }

    #[test]
    fn test_visibility() {
        let mut state = EngineState::new(Generation::default());
        state.flipped.push(CardId::new(2));
        state.solved.push_back(CardId::new(0));
        state.solved.push_back(CardId::new(1));

        assert_eq!(state.visibility(CardId::new(0)), Visibility::Solved);
        assert_eq!(state.visibility(CardId::new(2)), Visibility::Flipped);
        assert_eq!(state.visibility(CardId::new(3)), Visibility::Hidden);

        assert!(Visibility::Solved.is_face_up());
        assert!(Visibility::Flipped.is_face_up());
        assert!(!Visibility::Hidden.is_face_up());
        assert!(!Visibility::Flipped.is_solved());
    }

    #[test]
    fn test_phase_derivation() {
        let mut state = EngineState::new(Generation::default());
        state.flipped.push(CardId::new(0));
        assert_eq!(state.phase(), Phase::OneFlipped);

        state.flipped.push(CardId::new(1));
        state.locked = true;
        assert_eq!(state.phase(), Phase::Evaluating);

        state.pending_revert = Some(RevertTicket::new(
            state.generation,
            0,
            (CardId::new(0), CardId::new(1)),
            Instant::now(),
            Duration::from_millis(10),
        ));
        assert_eq!(state.phase(), Phase::Reverting);
        assert_eq!(state.check_invariants(4), Ok(()));
    }

    #[test]
    fn test_invariant_violations() {
        let mut state = EngineState::new(Generation::default());
        state.solved.push_back(CardId::new(0));
        assert_eq!(
            state.check_invariants(4),
            Err(GameError::InvariantViolated(Invariant::SolvedEven))
        );

        let mut state = EngineState::new(Generation::default());
        state.solved.push_back(CardId::new(0));
        state.solved.push_back(CardId::new(1));
        state.flipped.push(CardId::new(1));
        assert_eq!(
            state.check_invariants(4),
            Err(GameError::InvariantViolated(Invariant::FlippedSolvedDisjoint))
        );

        let mut state = EngineState::new(Generation::default());
        state.solved.push_back(CardId::new(0));
        state.solved.push_back(CardId::new(1));
        assert_eq!(
            state.check_invariants(2),
            Err(GameError::InvariantViolated(Invariant::WonMatchesSolved))
        );

        let mut state = EngineState::new(Generation::default());
        state.locked = true;
        assert_eq!(
            state.check_invariants(4),
            Err(GameError::InvariantViolated(Invariant::LockedMatchesPending))
        );

        let mut state = EngineState::new(Generation::default());
        state.flipped.push(CardId::new(9));
        assert_eq!(
            state.check_invariants(4),
            Err(GameError::InvariantViolated(Invariant::KnownCards))
        );
    }
}
