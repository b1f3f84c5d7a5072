//! Deck generation.
//!
//! A deck for an `n × n` board holds `n²` cards. Values come in pairs; when
//! `n²` is odd exactly one value appears once (the singleton), which can be
//! flipped but never matched.
//!
//! ## Algorithm
//!
//! 1. Take `ceil(n² / 2)` values and duplicate them
//! 2. Shuffle the tokens with the supplied random source
//! 3. Truncate to `n²` tokens (drops one token on odd boards)
//! 4. Number the survivors by position
//!
//! The random source is injected, so a seeded `GameRng` yields a
//! reproducible board:
//!
//! ```
//! use memory_match::cards::generate_deck;
//! use memory_match::core::{GameRng, GridSize};
//!
//! let size = GridSize::new(4).unwrap();
//! let a = generate_deck(size, &mut GameRng::new(9));
//! let b = generate_deck(size, &mut GameRng::new(9));
//!
//! assert_eq!(a.len(), 16);
//! assert_eq!(a, b);
//! ```

use im::Vector;
use rand::seq::SliceRandom;
use rand::Rng;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::card::{Card, CardId, CardValue};
use crate::core::{GameError, GridSize, Result};

/// Shuffle a fresh deck for a board of the given size.
pub fn generate_deck<R: Rng + ?Sized>(size: GridSize, rng: &mut R) -> Deck {
    let total = size.total_cards();
    let value_count = (total + 1) / 2;

    let mut tokens: Vec<CardValue> = (1..=value_count as u32).map(CardValue::new).collect();
    tokens.extend_from_within(..);
    tokens.shuffle(rng);
    tokens.truncate(total);

    let cards: Vector<Card> = tokens
        .into_iter()
        .enumerate()
        .map(|(position, value)| Card::new(CardId::new(position as u32), value))
        .collect();

    let deck = Deck { size, cards };
    debug!(size = %size, cards = deck.len(), singleton = ?deck.singleton(), "dealt deck");
    deck
}

/// An ordered set of cards for one game, indexed by `CardId`.
///
/// Backed by `im::Vector` so engine snapshots share it without copying.
/// Deserializing runs the same checks as `from_values`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "DeckLayout")]
pub struct Deck {
    size: GridSize,
    cards: Vector<Card>,
}

/// Unchecked wire form of a `Deck`.
#[derive(Deserialize)]
struct DeckLayout {
    size: GridSize,
    cards: Vec<Card>,
}

impl TryFrom<DeckLayout> for Deck {
    type Error = GameError;

    fn try_from(layout: DeckLayout) -> Result<Self> {
        if let Some((position, card)) = layout
            .cards
            .iter()
            .enumerate()
            .find(|(position, card)| card.id.index() != *position)
        {
            return Err(GameError::MisplacedCard {
                position,
                id: card.id.raw(),
            });
        }
        let values: Vec<u32> = layout.cards.iter().map(|card| card.value.raw()).collect();
        Deck::from_values(layout.size, &values)
    }
}

impl Deck {
    /// Validate `size` and shuffle a deck for it.
    ///
    /// # Errors
    ///
    /// Returns `GameError::InvalidConfiguration` if `size` is outside `2..=10`.
    pub fn generate<R: Rng + ?Sized>(size: u8, rng: &mut R) -> Result<Self> {
        Ok(generate_deck(GridSize::new(size)?, rng))
    }

    /// Build a deck from an explicit layout, in row-major order.
    ///
    /// Useful for replaying a known board. The layout must have exactly
    /// `size²` entries with values in `1..=ceil(size² / 2)` and obey the
    /// pairing rule: every value twice, except one value once on odd boards.
    ///
    /// # Errors
    ///
    /// Returns `GameError::InvalidLayout` for a wrong length,
    /// `GameError::ValueOutOfRange` for a value outside the range and
    /// `GameError::UnpairedValue` for a value with the wrong count.
    pub fn from_values(size: GridSize, values: &[u32]) -> Result<Self> {
        let expected = size.total_cards();
        if values.len() != expected {
            return Err(GameError::InvalidLayout {
                expected,
                found: values.len(),
            });
        }

        let max = expected.div_ceil(2) as u32;
        if let Some(&value) = values.iter().find(|&&value| value == 0 || value > max) {
            return Err(GameError::ValueOutOfRange { value, max });
        }

        let cards: Vector<Card> = values
            .iter()
            .enumerate()
            .map(|(position, &value)| Card::new(CardId::new(position as u32), CardValue::new(value)))
            .collect();
        let deck = Self { size, cards };

        let mut singles = 0;
        for (&value, &count) in &deck.value_counts() {
            match count {
                2 => {}
                1 if size.has_singleton() && singles == 0 => singles += 1,
                _ => return Err(GameError::UnpairedValue(value.raw())),
            }
        }

        Ok(deck)
    }

    /// Board dimension this deck was dealt for.
    #[must_use]
    pub fn grid_size(&self) -> GridSize {
        self.size
    }

    /// Number of cards.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// True for a deck with no cards. Dealt decks are never empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Check whether `id` is on this board.
    #[must_use]
    pub fn contains(&self, id: CardId) -> bool {
        id.index() < self.cards.len()
    }

    /// Look up a card.
    #[must_use]
    pub fn get(&self, id: CardId) -> Option<&Card> {
        self.cards.get(id.index())
    }

    /// Look up a card's value.
    #[must_use]
    pub fn value_of(&self, id: CardId) -> Option<CardValue> {
        self.get(id).map(|card| card.value)
    }

    /// Iterate cards in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }

    /// The shared card list.
    #[must_use]
    pub fn cards(&self) -> &Vector<Card> {
        &self.cards
    }

    /// Count cards per value.
    #[must_use]
    pub fn value_counts(&self) -> FxHashMap<CardValue, usize> {
        let mut counts = FxHashMap::default();
        for card in &self.cards {
            *counts.entry(card.value).or_insert(0) += 1;
        }
        counts
    }

    /// The unmatched card on an odd board, if any.
    #[must_use]
    pub fn singleton(&self) -> Option<CardId> {
        let counts = self.value_counts();
        self.cards
            .iter()
            .find(|card| counts.get(&card.value) == Some(&1))
            .map(|card| card.id)
    }

    /// The other card carrying the same value.
    #[must_use]
    pub fn partner(&self, id: CardId) -> Option<CardId> {
        let card = self.get(id)?;
        self.cards
            .iter()
            .find(|other| card.pairs_with(other))
            .map(|other| other.id)
    }
}

impl<'a> IntoIterator for &'a Deck {
    type Item = &'a Card;
    type IntoIter = im::vector::Iter<'a, Card>;

    fn into_iter(self) -> Self::IntoIter {
        self.cards.iter()
    }
}
