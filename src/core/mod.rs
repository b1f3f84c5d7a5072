//! Core engine types: configuration, errors, RNG, move history.
//!
//! These building blocks carry no game rules. The match rules live in
//! `engine`, deck construction in `cards`.

pub mod config;
pub mod error;
pub mod history;
pub mod rng;

pub use config::{
    GameConfig, GridSize, ReselectPolicy, DEFAULT_GRID_SIZE, DEFAULT_REVERT_DELAY, MAX_GRID_SIZE,
    MIN_GRID_SIZE,
};
pub use error::{GameError, Invariant, Result};
pub use history::{MoveKind, MoveRecord};
pub use rng::GameRng;
