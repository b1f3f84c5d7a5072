//! Read-only board snapshots for renderers and agents.

use im::Vector;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::state::{visibility_of, EngineState, Phase, Visibility};
use super::timer::Generation;
use crate::cards::{Card, CardId, CardValue, Deck};
use crate::core::GridSize;

/// What a player sees at one position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardView {
    Hidden,
    Flipped(CardValue),
    Solved(CardValue),
}

impl CardView {
    /// The shown value, `None` while face-down.
    #[must_use]
    pub const fn value(self) -> Option<CardValue> {
        match self {
            CardView::Hidden => None,
            CardView::Flipped(value) | CardView::Solved(value) => Some(value),
        }
    }

    #[must_use]
    pub const fn visibility(self) -> Visibility {
        match self {
            CardView::Hidden => Visibility::Hidden,
            CardView::Flipped(_) => Visibility::Flipped,
            CardView::Solved(_) => Visibility::Solved,
        }
    }
}

/// Everything needed to render the board after an action.
///
/// Clones are cheap; `cards` and `solved` share structure with the engine.
/// `cards` carries every value, so hand `board()` rather than the raw
/// snapshot to anything that must not peek.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub grid_size: GridSize,
    pub cards: Vector<Card>,
    pub flipped: SmallVec<[CardId; 2]>,
    pub solved: Vector<CardId>,
    pub locked: bool,
    pub won: bool,
    pub failed_attempts: u32,
    pub generation: Generation,
    pub phase: Phase,
}

impl Snapshot {
    pub(crate) fn capture(deck: &Deck, state: &EngineState) -> Self {
        Self {
            grid_size: deck.grid_size(),
            cards: deck.cards().clone(),
            flipped: state.flipped.clone(),
            solved: state.solved.clone(),
            locked: state.locked,
            won: state.won,
            failed_attempts: state.failed_attempts,
            generation: state.generation,
            phase: state.phase(),
        }
    }

    #[must_use]
    pub fn visibility(&self, id: CardId) -> Visibility {
        visibility_of(&self.flipped, &self.solved, id)
    }

    #[must_use]
    pub fn is_face_up(&self, id: CardId) -> bool {
        self.visibility(id).is_face_up()
    }

    /// What the player sees at `id`, or `None` for an id off the board.
    #[must_use]
    pub fn view(&self, id: CardId) -> Option<CardView> {
        let card = self.cards.get(id.index())?;
        Some(match self.visibility(id) {
            Visibility::Hidden => CardView::Hidden,
            Visibility::Flipped => CardView::Flipped(card.value),
            Visibility::Solved => CardView::Solved(card.value),
        })
    }

    /// Player-visible board in row-major order.
    #[must_use]
    pub fn board(&self) -> Vec<CardView> {
        self.cards
            .iter()
            .filter_map(|card| self.view(card.id))
            .collect()
    }

    /// Row-major encoding of `board()`: `0` face-down, `value` flipped,
    /// `-value` solved.
    #[must_use]
    pub fn observation(&self) -> Vec<i32> {
        self.board()
            .into_iter()
            .map(|view| match view {
                CardView::Hidden => 0,
                CardView::Flipped(value) => value.raw() as i32,
                CardView::Solved(value) => -(value.raw() as i32),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::GameConfig;
    use crate::engine::MatchEngine;

    fn played() -> Snapshot {
        let deck = Deck::from_values(GridSize::MIN, &[1, 2, 1, 2]).unwrap();
        let mut engine = MatchEngine::with_deck(GameConfig::default(), deck);
        engine.select(CardId::new(0));
        engine.select(CardId::new(2));
        engine.select(CardId::new(3));
        engine.snapshot()
    }

    #[test]
    fn test_board_hides_face_down_values() {
        let snapshot = played();

        assert_eq!(
            snapshot.board(),
            vec![
                CardView::Solved(CardValue::new(1)),
                CardView::Hidden,
                CardView::Solved(CardValue::new(1)),
                CardView::Flipped(CardValue::new(2)),
            ]
        );
        assert_eq!(snapshot.view(CardId::new(4)), None);
        assert_eq!(snapshot.phase, Phase::OneFlipped);
    }

    #[test]
    fn test_visibility_agrees_with_engine() {
        let deck = Deck::from_values(GridSize::MIN, &[1, 2, 1, 2]).unwrap();
        let mut engine = MatchEngine::with_deck(GameConfig::default(), deck);
        engine.select(CardId::new(0));
        engine.select(CardId::new(2));
        engine.select(CardId::new(1));
        engine.select(CardId::new(0));
        let snapshot = engine.snapshot();

        for raw in 0..5 {
            let id = CardId::new(raw);
            assert_eq!(snapshot.visibility(id), engine.visibility(id));
        }
        assert_eq!(snapshot.visibility(CardId::new(0)), Visibility::Solved);
        assert_eq!(snapshot.visibility(CardId::new(1)), Visibility::Flipped);
    }

    #[test]
    fn test_observation_encoding() {
        assert_eq!(played().observation(), vec![-1, 0, -1, 2]);
    }

    #[test]
    fn test_card_view_accessors() {
        let view = CardView::Flipped(CardValue::new(5));
        assert_eq!(view.value(), Some(CardValue::new(5)));
        assert_eq!(view.visibility(), Visibility::Flipped);
        assert_eq!(CardView::Hidden.value(), None);
    }

    #[test]
    fn test_snapshot_serializes() {
        let snapshot = played();
        let json = serde_json::to_string(&snapshot).unwrap();
        let back: Snapshot = serde_json::from_str(&json).unwrap();

        assert_eq!(back, snapshot);
    }
}
