//! Card identity and pairing values.
//!
//! A `Card` never changes after the deck is dealt. Whether it is face-up is
//! derived from engine state, not stored here.

use serde::{Deserialize, Serialize};

/// Position of a card on the board, 0-based in row-major order.
///
/// Ids are assigned at generation time and never reused within a game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CardId(pub u32);

impl CardId {
    /// Create a new card ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Index into the deck.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl From<u32> for CardId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card({})", self.0)
    }
}

/// Pairing key. Two cards match when their values are equal.
///
/// Values start at 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CardValue(pub u32);

impl CardValue {
    /// Create a new card value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Get the raw value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for CardValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single grid slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    /// Board position.
    pub id: CardId,
    /// Pairing key.
    pub value: CardValue,
}

impl Card {
    /// Create a card.
    #[must_use]
    pub const fn new(id: CardId, value: CardValue) -> Self {
        Self { id, value }
    }

    /// Check whether two cards form a pair.
    ///
    /// A card never pairs with itself.
    #[must_use]
    pub fn pairs_with(&self, other: &Card) -> bool {
        self.id != other.id && self.value == other.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_id() {
        let id = CardId::new(7);
        assert_eq!(id.raw(), 7);
        assert_eq!(id.index(), 7);
        assert_eq!(CardId::from(7), id);
        assert_eq!(format!("{}", id), "Card(7)");
    }

    #[test]
    fn test_card_value_display() {
        assert_eq!(format!("{}", CardValue::new(12)), "12");
    }

    #[test]
    fn test_pairs_with() {
        let a = Card::new(CardId::new(0), CardValue::new(3));
        let b = Card::new(CardId::new(5), CardValue::new(3));
        let c = Card::new(CardId::new(6), CardValue::new(4));

        assert!(a.pairs_with(&b));
        assert!(b.pairs_with(&a));
        assert!(!a.pairs_with(&c));
        assert!(!a.pairs_with(&a));
    }

    #[test]
    fn test_serialization() {
        let card = Card::new(CardId::new(3), CardValue::new(2));
        let json = serde_json::to_string(&card).unwrap();
        let deserialized: Card = serde_json::from_str(&json).unwrap();
        assert_eq!(card, deserialized);
    }
}
