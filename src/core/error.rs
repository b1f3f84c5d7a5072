//! Error types for deck construction and engine configuration.
//!
//! Rejected player input is not an error: `select` reports it through
//! `SelectOutcome::Ignored`. Errors are reserved for bad configuration and
//! for invariant checks that indicate a logic bug.

use thiserror::Error;

/// Board consistency rules checked by `EngineState::check_invariants`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Invariant {
    /// At most two cards are flipped at once.
    FlippedBound,
    /// A card is never both flipped and solved.
    FlippedSolvedDisjoint,
    /// Pairs resolve atomically, so the solved count is even.
    SolvedEven,
    /// `won` is set exactly when every card is solved.
    WonMatchesSolved,
    /// The engine is locked exactly while a revert is pending.
    LockedMatchesPending,
    /// Every flipped or solved id belongs to the current deck.
    KnownCards,
}

impl std::fmt::Display for Invariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Invariant::FlippedBound => "more than two cards flipped",
            Invariant::FlippedSolvedDisjoint => "card is both flipped and solved",
            Invariant::SolvedEven => "odd number of solved cards",
            Invariant::WonMatchesSolved => "won flag disagrees with solved cards",
            Invariant::LockedMatchesPending => "lock disagrees with pending revert",
            Invariant::KnownCards => "state references a card outside the deck",
        };
        f.write_str(text)
    }
}

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid grid size {size}, expected 2..=10")]
    InvalidConfiguration { size: u8 },
    #[error("Deck layout has {found} cards, expected {expected}")]
    InvalidLayout { expected: usize, found: usize },
    #[error("Card value {0} does not appear exactly twice")]
    UnpairedValue(u32),
    #[error("Card value {value} is outside 1..={max}")]
    ValueOutOfRange { value: u32, max: u32 },
    #[error("Card at position {position} has id {id}")]
    MisplacedCard { position: usize, id: u32 },
    #[error("Engine invariant violated: {0}")]
    InvariantViolated(Invariant),
}

pub type Result<T> = std::result::Result<T, GameError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_configuration_message() {
        let err = GameError::InvalidConfiguration { size: 11 };
        assert_eq!(err.to_string(), "Invalid grid size 11, expected 2..=10");
    }

    #[test]
    fn test_layout_messages() {
        let err = GameError::ValueOutOfRange { value: 9, max: 2 };
        assert_eq!(err.to_string(), "Card value 9 is outside 1..=2");

        let err = GameError::MisplacedCard { position: 1, id: 5 };
        assert_eq!(err.to_string(), "Card at position 1 has id 5");
    }

    #[test]
    fn test_invariant_message() {
        let err = GameError::InvariantViolated(Invariant::SolvedEven);
        assert_eq!(
            err.to_string(),
            "Engine invariant violated: odd number of solved cards"
        );
    }
}
