//! # memory-match
//!
//! A memory (concentration) game engine: a seeded deck generator and a
//! match state machine for boards from 2x2 to 10x10.
//!
//! ## Design Principles
//!
//! 1. **Synchronous Core**: `MatchEngine` never sleeps or spawns. A
//!    mismatch returns a `RevertTicket` and the driver decides how to wait.
//!
//! 2. **Generation-Tagged Timers**: Every dealt board has a `Generation`.
//!    A revert ticket from a replaced board is rejected, so a reset can
//!    never be undone by a late timer.
//!
//! 3. **Derived Visibility**: Cards carry only an id and a value. Whether a
//!    card is face-up is computed from `flipped` and `solved`.
//!
//! ## Modules
//!
//! - `core`: Configuration, errors, RNG, move history
//! - `cards`: Card identity and deck generation
//! - `engine`: Match state machine, revert tickets, snapshots
//! - `session`: Async driver on the tokio timer
//!
//! ## Example
//!
//! ```
//! use memory_match::{CardId, GameConfig, MatchEngine, SelectOutcome};
//!
//! let mut engine = MatchEngine::new(GameConfig::default().with_seed(42));
//! let first = engine.deck().iter().next().unwrap().id;
//! let partner = engine.deck().partner(first).unwrap();
//!
//! engine.select(first);
//! let outcome = engine.select(partner);
//! assert!(matches!(outcome, SelectOutcome::Matched { won: false, .. }));
//! ```

pub mod core;
pub mod cards;
pub mod engine;
pub mod session;

// Re-export commonly used types
pub use crate::core::{
    GameConfig, GameError, GameRng, GridSize, Invariant, MoveKind, MoveRecord, ReselectPolicy,
    Result,
};

pub use crate::cards::{generate_deck, Card, CardId, CardValue, Deck};

pub use crate::engine::{
    CardView, EngineState, Generation, IgnoreReason, MatchEngine, Phase, RevertOutcome,
    RevertTicket, SelectOutcome, Snapshot, Visibility,
};

pub use crate::session::GameSession;

#[cfg(feature = "python")]
mod python;
