//! The match engine: flip sequencing, match evaluation, revert handling and
//! win detection for one board at a time.

use std::time::Instant;

use tracing::{debug, info, instrument, trace, warn};

use super::outcome::{IgnoreReason, RevertOutcome, SelectOutcome};
use super::snapshot::Snapshot;
use super::state::{EngineState, Phase, Visibility};
use super::timer::{Generation, RevertTicket};
use crate::cards::{generate_deck, CardId, Deck};
use crate::core::{GameConfig, GameRng, GridSize, MoveKind, MoveRecord, ReselectPolicy, Result};

/// State machine for a memory game.
///
/// Owns the current deck and its `EngineState`; callers interact only
/// through `select`, `reinitialize`, `set_grid_size` and the revert entry
/// points.
///
/// ## Example
///
/// ```
/// use std::time::{Duration, Instant};
/// use memory_match::cards::{CardId, Deck};
/// use memory_match::core::{GameConfig, GridSize};
/// use memory_match::engine::{MatchEngine, SelectOutcome};
///
/// let deck = Deck::from_values(GridSize::MIN, &[1, 2, 1, 2]).unwrap();
/// let mut engine = MatchEngine::with_deck(GameConfig::default(), deck);
/// let t0 = Instant::now();
///
/// engine.select_at(CardId::new(0), t0);
/// let outcome = engine.select_at(CardId::new(1), t0);
/// assert!(matches!(outcome, SelectOutcome::Mismatched { .. }));
///
/// // Nothing happens before the delay is over
/// assert!(engine.poll_at(t0 + Duration::from_millis(999)).is_none());
/// assert!(engine.poll_at(t0 + Duration::from_millis(1000)).is_some());
/// assert!(!engine.is_locked());
/// ```
#[derive(Clone, Debug)]
pub struct MatchEngine {
    config: GameConfig,
    rng: GameRng,
    deck: Deck,
    state: EngineState,
}

impl MatchEngine {
    /// Deal a board for `config` and start in the idle phase.
    #[must_use]
    pub fn new(config: GameConfig) -> Self {
        let mut rng = GameRng::new(config.seed);
        let deck = generate_deck(config.grid_size, &mut rng.fork());
        Self {
            config,
            rng,
            deck,
            state: EngineState::new(Generation::default()),
        }
    }

    /// Start a default-configured game on a `size × size` board.
    ///
    /// # Errors
    ///
    /// Returns `GameError::InvalidConfiguration` if `size` is outside `2..=10`.
    pub fn initialize(size: u8) -> Result<Self> {
        let config = GameConfig::new().with_grid_size(GridSize::new(size)?);
        Ok(Self::new(config))
    }

    /// Play a prepared deck. Later reinitializations deal from `config.seed`.
    #[must_use]
    pub fn with_deck(config: GameConfig, deck: Deck) -> Self {
        let config = config.with_grid_size(deck.grid_size());
        Self {
            rng: GameRng::new(config.seed),
            config,
            deck,
            state: EngineState::new(Generation::default()),
        }
    }

    // === Accessors ===

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[must_use]
    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    #[must_use]
    pub fn state(&self) -> &EngineState {
        &self.state
    }

    #[must_use]
    pub fn grid_size(&self) -> GridSize {
        self.deck.grid_size()
    }

    #[must_use]
    pub fn generation(&self) -> Generation {
        self.state.generation
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.state.locked
    }

    #[must_use]
    pub fn is_won(&self) -> bool {
        self.state.won
    }

    #[must_use]
    pub fn failed_attempts(&self) -> u32 {
        self.state.failed_attempts
    }

    /// The armed revert, if a mismatched pair is showing.
    #[must_use]
    pub fn pending_revert(&self) -> Option<&RevertTicket> {
        self.state.pending_revert.as_ref()
    }

    /// Derive how a card is shown.
    #[must_use]
    pub fn visibility(&self, id: CardId) -> Visibility {
        self.state.visibility(id)
    }

    /// Read-only copy of everything a renderer needs.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(&self.deck, &self.state)
    }

    /// Check the board consistency rules.
    ///
    /// # Errors
    ///
    /// Returns `GameError::InvariantViolated` naming the first broken rule.
    pub fn check_invariants(&self) -> Result<()> {
        self.state.check_invariants(self.deck.len())
    }

    // === Player actions ===

    /// Select a card at the current time.
    pub fn select(&mut self, id: CardId) -> SelectOutcome {
        self.select_at(id, Instant::now())
    }

    /// Select a card; `now` timestamps the revert ticket on a mismatch.
    #[instrument(skip(self, now), fields(card = %id, generation = self.state.generation.raw()))]
    pub fn select_at(&mut self, id: CardId, now: Instant) -> SelectOutcome {
        if let Some(reason) = self.rejection(id) {
            if reason == IgnoreReason::AlreadyFlipped && self.config.reselect == ReselectPolicy::Unflip {
                self.state.flipped.clear();
                debug!("unflipped lone card");
                self.debug_check();
                return SelectOutcome::Unflipped(id);
            }
            trace!(?reason, "ignored selection");
            return SelectOutcome::Ignored(reason);
        }

        let outcome = match self.state.flipped.first().copied() {
            None => {
                self.state.flipped.push(id);
                debug!("flipped first card");
                SelectOutcome::Flipped(id)
            }
            Some(first) => {
                self.state.locked = true;
                self.state.flipped.push(id);
                self.evaluate(first, id, now)
            }
        };
        self.debug_check();
        outcome
    }

    fn rejection(&self, id: CardId) -> Option<IgnoreReason> {
        if self.state.won {
            Some(IgnoreReason::AlreadyWon)
        } else if self.state.locked {
            Some(IgnoreReason::Locked)
        } else if !self.deck.contains(id) {
            Some(IgnoreReason::UnknownCard)
        } else if self.state.is_solved(id) {
            Some(IgnoreReason::AlreadySolved)
        } else if self.state.is_flipped(id) {
            Some(IgnoreReason::AlreadyFlipped)
        } else {
            None
        }
    }

    fn evaluate(&mut self, first: CardId, second: CardId, now: Instant) -> SelectOutcome {
        let attempt = self.state.history.len() as u32;
        let matched = match (self.deck.get(first), self.deck.get(second)) {
            (Some(a), Some(b)) => a.pairs_with(b),
            _ => false,
        };

        if matched {
            self.state.solved.push_back(first);
            self.state.solved.push_back(second);
            self.state.flipped.clear();
            self.state.locked = false;
            self.state
                .history
                .push_back(MoveRecord::new(attempt, first, second, MoveKind::Matched));
            self.state.won = self.state.solved.len() == self.deck.len();

            if self.state.won {
                info!(failed_attempts = self.state.failed_attempts, "board cleared");
            } else {
                debug!(%first, %second, "pair matched");
            }
            SelectOutcome::Matched {
                first,
                second,
                won: self.state.won,
            }
        } else {
            self.state.failed_attempts += 1;
            let ticket = RevertTicket::new(
                self.state.generation,
                attempt,
                (first, second),
                now,
                self.config.revert_delay,
            );
            self.state.pending_revert = Some(ticket);
            self.state
                .history
                .push_back(MoveRecord::new(attempt, first, second, MoveKind::Mismatched));

            debug!(
                %first,
                %second,
                failed_attempts = self.state.failed_attempts,
                delay_ms = self.config.revert_delay.as_millis() as u64,
                "pair mismatched, revert armed"
            );
            SelectOutcome::Mismatched {
                first,
                second,
                ticket,
            }
        }
    }

    // === Revert handling ===

    /// Turn a mismatched pair face-down.
    ///
    /// Applies only if `ticket` is the revert currently pending on this
    /// board; tickets from replaced boards or already-completed reverts
    /// return `RevertOutcome::Stale` and change nothing. The caller is
    /// responsible for waiting until the ticket is due.
    #[instrument(skip(self, ticket), fields(ticket_generation = ticket.generation().raw(), generation = self.state.generation.raw()))]
    pub fn complete_revert(&mut self, ticket: &RevertTicket) -> RevertOutcome {
        match self.state.pending_revert {
            Some(pending) if pending == *ticket => {
                self.state.pending_revert = None;
                self.state.flipped.clear();
                self.state.locked = false;
                self.debug_check();

                let (first, second) = ticket.pair();
                debug!(%first, %second, "mismatched pair reverted");
                RevertOutcome::Reverted { first, second }
            }
            _ if ticket.generation() != self.state.generation => {
                debug!("discarded revert from a replaced board");
                RevertOutcome::Stale
            }
            _ => {
                warn!(attempt = ticket.attempt(), "discarded revert that is no longer pending");
                RevertOutcome::Stale
            }
        }
    }

    /// Complete the pending revert if its delay has elapsed.
    pub fn poll(&mut self) -> Option<RevertOutcome> {
        self.poll_at(Instant::now())
    }

    /// Complete the pending revert if it is due at `now`.
    ///
    /// Returns `None` when nothing is pending or the delay is still running.
    pub fn poll_at(&mut self, now: Instant) -> Option<RevertOutcome> {
        let ticket = self.state.pending_revert.filter(|ticket| ticket.is_due(now))?;
        Some(self.complete_revert(&ticket))
    }

    // === Board lifecycle ===

    /// Deal a new board of the configured size.
    ///
    /// Drops the current deck and state, including any pending revert, and
    /// moves to the next generation so outstanding tickets become stale.
    #[instrument(skip(self), fields(size = %self.config.grid_size))]
    pub fn reinitialize(&mut self) {
        let deck = generate_deck(self.config.grid_size, &mut self.rng.fork());
        let cancelled = self.state.pending_revert.is_some();
        let generation = self.state.generation.next();

        self.deck = deck;
        self.state = EngineState::new(generation);
        debug!(%generation, cancelled_revert = cancelled, "board reinitialized");
    }

    /// Change the grid size and deal a new board.
    ///
    /// Returns `Ok(false)` without dealing when the size is unchanged.
    ///
    /// # Errors
    ///
    /// Returns `GameError::InvalidConfiguration` if `size` is outside
    /// `2..=10`; nothing is modified in that case.
    #[instrument(skip(self))]
    pub fn set_grid_size(&mut self, size: u8) -> Result<bool> {
        let size = GridSize::new(size)?;
        if size == self.config.grid_size && size == self.deck.grid_size() {
            return Ok(false);
        }
        self.config.grid_size = size;
        self.reinitialize();
        Ok(true)
    }

    fn debug_check(&self) {
        debug_assert_eq!(self.check_invariants(), Ok(()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{GameError, MoveKind};
    use std::time::Duration;

    /// Board with values:
    /// ```text
    /// 1 2
    /// 1 2
    /// ```
    fn engine() -> MatchEngine {
        let deck = Deck::from_values(GridSize::MIN, &[1, 2, 1, 2]).unwrap();
        MatchEngine::with_deck(GameConfig::default(), deck)
    }

    fn id(raw: u32) -> CardId {
        CardId::new(raw)
    }

    #[test]
    fn test_new_engine_is_idle() {
        let engine = MatchEngine::new(GameConfig::default());

        assert_eq!(engine.deck().len(), 16);
        assert_eq!(engine.phase(), Phase::Idle);
        assert_eq!(engine.generation(), Generation::default());
        assert_eq!(engine.check_invariants(), Ok(()));
    }

    #[test]
    fn test_initialize_validates_size() {
        assert_eq!(
            MatchEngine::initialize(1).unwrap_err(),
            GameError::InvalidConfiguration { size: 1 }
        );
        assert_eq!(MatchEngine::initialize(3).unwrap().deck().len(), 9);
    }

    #[test]
    fn test_same_seed_same_board() {
        let config = GameConfig::default().with_seed(11);
        let a = MatchEngine::new(config.clone());
        let b = MatchEngine::new(config);

        assert_eq!(a.deck(), b.deck());
    }

    #[test]
    fn test_first_flip() {
        let mut engine = engine();

        assert_eq!(engine.select(id(0)), SelectOutcome::Flipped(id(0)));
        assert_eq!(engine.phase(), Phase::OneFlipped);
        assert_eq!(engine.visibility(id(0)), Visibility::Flipped);
        assert!(!engine.is_locked());
    }

    #[test]
    fn test_match_resolves_synchronously() {
        let mut engine = engine();

        engine.select(id(0));
        let outcome = engine.select(id(2));

        assert_eq!(
            outcome,
            SelectOutcome::Matched {
                first: id(0),
                second: id(2),
                won: false
            }
        );
        assert_eq!(engine.phase(), Phase::Idle);
        assert!(!engine.is_locked());
        assert_eq!(engine.visibility(id(0)), Visibility::Solved);
        assert_eq!(engine.visibility(id(2)), Visibility::Solved);
        assert_eq!(engine.failed_attempts(), 0);
    }

    #[test]
    fn test_mismatch_locks_until_revert() {
        let mut engine = engine();
        let t0 = Instant::now();

        engine.select_at(id(0), t0);
        let outcome = engine.select_at(id(1), t0);

        let ticket = *outcome.ticket().expect("mismatch arms a ticket");
        assert_eq!(ticket.pair(), (id(0), id(1)));
        assert_eq!(ticket.due(), t0 + Duration::from_millis(1000));
        assert_eq!(engine.phase(), Phase::Reverting);
        assert!(engine.is_locked());
        assert_eq!(engine.failed_attempts(), 1);
        assert_eq!(engine.state().flipped(), &[id(0), id(1)]);

        assert_eq!(
            engine.complete_revert(&ticket),
            RevertOutcome::Reverted {
                first: id(0),
                second: id(1)
            }
        );
        assert_eq!(engine.phase(), Phase::Idle);
        assert!(!engine.is_locked());
        assert_eq!(engine.visibility(id(0)), Visibility::Hidden);
    }

    #[test]
    fn test_select_while_locked_is_ignored() {
        let mut engine = engine();
        engine.select(id(0));
        engine.select(id(1));
        let before = engine.snapshot();

        assert_eq!(engine.select(id(2)), SelectOutcome::Ignored(IgnoreReason::Locked));
        assert_eq!(engine.snapshot(), before);
    }

    #[test]
    fn test_reselect_ignored_by_default() {
        let mut engine = engine();
        engine.select(id(0));

        assert_eq!(
            engine.select(id(0)),
            SelectOutcome::Ignored(IgnoreReason::AlreadyFlipped)
        );
        assert_eq!(engine.state().flipped(), &[id(0)]);
        assert_eq!(engine.failed_attempts(), 0);
    }

    #[test]
    fn test_reselect_unflips_with_policy() {
        let deck = Deck::from_values(GridSize::MIN, &[1, 2, 1, 2]).unwrap();
        let config = GameConfig::default().with_reselect(ReselectPolicy::Unflip);
        let mut engine = MatchEngine::with_deck(config, deck);

        engine.select(id(3));
        assert_eq!(engine.select(id(3)), SelectOutcome::Unflipped(id(3)));
        assert_eq!(engine.phase(), Phase::Idle);
        assert!(!engine.is_locked());
        assert_eq!(engine.failed_attempts(), 0);
    }

    #[test]
    fn test_unknown_and_solved_cards_ignored() {
        let mut engine = engine();

        assert_eq!(
            engine.select(id(4)),
            SelectOutcome::Ignored(IgnoreReason::UnknownCard)
        );

        engine.select(id(1));
        engine.select(id(3));
        assert_eq!(
            engine.select(id(1)),
            SelectOutcome::Ignored(IgnoreReason::AlreadySolved)
        );
    }

    #[test]
    fn test_win_blocks_further_input() {
        let mut engine = engine();

        engine.select(id(0));
        engine.select(id(2));
        engine.select(id(1));
        let last = engine.select(id(3));

        assert_eq!(
            last,
            SelectOutcome::Matched {
                first: id(1),
                second: id(3),
                won: true
            }
        );
        assert!(engine.is_won());
        assert_eq!(
            engine.select(id(0)),
            SelectOutcome::Ignored(IgnoreReason::AlreadyWon)
        );
    }

    #[test]
    fn test_poll_respects_delay() {
        let mut engine = engine();
        let t0 = Instant::now();

        assert_eq!(engine.poll_at(t0), None);

        engine.select_at(id(0), t0);
        engine.select_at(id(1), t0);

        assert_eq!(engine.poll_at(t0 + Duration::from_millis(500)), None);
        assert!(engine.is_locked());
        assert!(matches!(
            engine.poll_at(t0 + Duration::from_millis(1000)),
            Some(RevertOutcome::Reverted { .. })
        ));
        assert_eq!(engine.poll_at(t0 + Duration::from_millis(2000)), None);
    }

    #[test]
    fn test_custom_revert_delay() {
        let deck = Deck::from_values(GridSize::MIN, &[1, 2, 1, 2]).unwrap();
        let config = GameConfig::default().with_revert_delay(Duration::from_millis(250));
        let mut engine = MatchEngine::with_deck(config, deck);
        let t0 = Instant::now();

        engine.select_at(id(0), t0);
        engine.select_at(id(1), t0);

        assert_eq!(engine.poll_at(t0 + Duration::from_millis(249)), None);
        assert!(engine.poll_at(t0 + Duration::from_millis(250)).is_some());
    }

    #[test]
    fn test_completed_ticket_is_stale() {
        let mut engine = engine();
        engine.select(id(0));
        let ticket = *engine.select(id(1)).ticket().unwrap();

        assert!(engine.complete_revert(&ticket).has_update());
        assert_eq!(engine.complete_revert(&ticket), RevertOutcome::Stale);
    }

    #[test]
    fn test_reinitialize_invalidates_ticket() {
        let mut engine = engine();
        engine.select(id(0));
        let ticket = *engine.select(id(1)).ticket().unwrap();

        engine.reinitialize();
        assert_eq!(engine.generation(), Generation::new(1));
        assert_eq!(engine.phase(), Phase::Idle);
        assert!(engine.pending_revert().is_none());

        // The new board accepts a flip; the stale ticket must not undo it
        let first = engine.deck().iter().next().unwrap().id;
        engine.select(first);
        assert_eq!(engine.complete_revert(&ticket), RevertOutcome::Stale);
        assert_eq!(engine.state().flipped(), &[first]);
    }

    #[test]
    fn test_reinitialize_resets_counters() {
        let mut engine = engine();
        engine.select(id(0));
        engine.select(id(1));
        engine.reinitialize();

        assert_eq!(engine.failed_attempts(), 0);
        assert!(engine.state().solved().is_empty());
        assert!(engine.state().history().is_empty());
        assert!(!engine.is_won());
    }

    #[test]
    fn test_set_grid_size() {
        let mut engine = MatchEngine::new(GameConfig::default());

        assert_eq!(engine.set_grid_size(4), Ok(false));
        assert_eq!(engine.generation(), Generation::new(0));

        assert_eq!(engine.set_grid_size(6), Ok(true));
        assert_eq!(engine.deck().len(), 36);
        assert_eq!(engine.grid_size().get(), 6);
        assert_eq!(engine.generation(), Generation::new(1));
    }

    #[test]
    fn test_set_grid_size_rejects_without_mutation() {
        let mut engine = engine();
        engine.select(id(0));
        let before = engine.snapshot();

        assert_eq!(
            engine.set_grid_size(11),
            Err(GameError::InvalidConfiguration { size: 11 })
        );
        assert_eq!(engine.snapshot(), before);
    }

    #[test]
    fn test_history_records_attempts() {
        let mut engine = engine();
        let t0 = Instant::now();

        engine.select_at(id(0), t0);
        engine.select_at(id(1), t0);
        engine.poll_at(t0 + Duration::from_secs(1));
        engine.select_at(id(0), t0);
        engine.select_at(id(2), t0);

        let history = engine.state().history();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].kind, MoveKind::Mismatched);
        assert_eq!(history[1].kind, MoveKind::Matched);
        assert_eq!(history[1].sequence, 1);
    }
}
