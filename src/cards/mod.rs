//! Cards and deck generation.
//!
//! ## Key Types
//!
//! - `CardId`: Board position, stable for the lifetime of a game
//! - `CardValue`: Pairing key
//! - `Card`: Immutable id/value pair
//! - `Deck`: Shuffled cards for one game, with pairing queries
//!
//! `generate_deck` takes any `rand::Rng`, so tests and replays can inject a
//! seeded source.

pub mod card;
pub mod deck;

pub use card::{Card, CardId, CardValue};
pub use deck::{generate_deck, Deck};
