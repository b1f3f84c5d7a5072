//! Async game session driven by the tokio timer.
//!
//! `GameSession` owns a `MatchEngine` behind a tokio mutex and takes care of
//! the mismatch delay: when a pair mismatches it spawns a task that sleeps
//! until the revert ticket is due and then hands the ticket back. Every
//! state change is published on a `watch` channel so a renderer can redraw
//! without polling.
//!
//! ## Cancellation
//!
//! Reinitializing aborts the outstanding revert task. A task that already
//! woke and is waiting on the lock still can't touch the new board; its
//! ticket belongs to the old generation and comes back `Stale`.
//!
//! ```
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! use memory_match::core::GameConfig;
//! use memory_match::session::GameSession;
//!
//! let (session, snapshot) = GameSession::initialize(GameConfig::default());
//! assert_eq!(snapshot.cards.len(), 16);
//!
//! let first = snapshot.cards[0].id;
//! let after = session.select(first).await;
//! assert!(after.is_face_up(first));
//! # }
//! ```

use std::sync::Arc;

use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, instrument, trace};

use crate::cards::{CardId, Deck};
use crate::core::{GameConfig, Result};
use crate::engine::{MatchEngine, RevertTicket, SelectOutcome, Snapshot};

/// Shared handle to one running game. Clones drive the same board.
#[derive(Clone, Debug)]
pub struct GameSession {
    shared: Arc<Shared>,
}

#[derive(Debug)]
struct Shared {
    slot: Mutex<Slot>,
    updates: watch::Sender<Snapshot>,
}

#[derive(Debug)]
struct Slot {
    engine: MatchEngine,
    revert_task: Option<JoinHandle<()>>,
}

impl Slot {
    fn cancel_revert(&mut self) {
        if let Some(task) = self.revert_task.take() {
            task.abort();
            trace!("aborted revert task");
        }
    }
}

impl Shared {
    fn publish(&self, snapshot: &Snapshot) {
        self.updates.send_replace(snapshot.clone());
    }
}

impl GameSession {
    /// Deal a board for `config` and return the session with its first
    /// snapshot.
    #[must_use]
    pub fn initialize(config: GameConfig) -> (Self, Snapshot) {
        Self::from_engine(MatchEngine::new(config))
    }

    /// Start a session on a prepared deck.
    #[must_use]
    pub fn with_deck(config: GameConfig, deck: Deck) -> (Self, Snapshot) {
        Self::from_engine(MatchEngine::with_deck(config, deck))
    }

    fn from_engine(engine: MatchEngine) -> (Self, Snapshot) {
        let snapshot = engine.snapshot();
        let (updates, _) = watch::channel(snapshot.clone());
        let session = Self {
            shared: Arc::new(Shared {
                slot: Mutex::new(Slot {
                    engine,
                    revert_task: None,
                }),
                updates,
            }),
        };
        (session, snapshot)
    }

    /// Select a card and return the resulting board.
    ///
    /// A mismatch schedules the revert on the tokio timer; the returned
    /// snapshot still shows both cards face-up and the board locked.
    #[instrument(skip(self), fields(card = %id))]
    pub async fn select(&self, id: CardId) -> Snapshot {
        let mut slot = self.shared.slot.lock().await;
        let outcome = slot.engine.select_at(id, Instant::now().into_std());
        let snapshot = slot.engine.snapshot();

        if let SelectOutcome::Mismatched { ticket, .. } = outcome {
            slot.cancel_revert();
            slot.revert_task = Some(self.schedule_revert(ticket));
        }
        if outcome.has_update() {
            self.shared.publish(&snapshot);
        }
        snapshot
    }

    fn schedule_revert(&self, ticket: RevertTicket) -> JoinHandle<()> {
        let shared = Arc::clone(&self.shared);
        tokio::spawn(async move {
            sleep_until(Instant::from_std(ticket.due())).await;

            let mut slot = shared.slot.lock().await;
            let outcome = slot.engine.complete_revert(&ticket);
            if outcome.has_update() {
                slot.revert_task = None;
                shared.publish(&slot.engine.snapshot());
            }
        })
    }

    /// Deal a fresh board of the current size, cancelling any pending
    /// revert.
    #[instrument(skip(self))]
    pub async fn reinitialize(&self) -> Snapshot {
        let mut slot = self.shared.slot.lock().await;
        slot.cancel_revert();
        slot.engine.reinitialize();

        let snapshot = slot.engine.snapshot();
        self.shared.publish(&snapshot);
        snapshot
    }

    /// Change the grid size. An unchanged size keeps the current board.
    ///
    /// # Errors
    ///
    /// Returns `GameError::InvalidConfiguration` if `size` is outside
    /// `2..=10`; the board is untouched in that case.
    #[instrument(skip(self))]
    pub async fn set_grid_size(&self, size: u8) -> Result<Snapshot> {
        let mut slot = self.shared.slot.lock().await;
        if slot.engine.set_grid_size(size)? {
            slot.cancel_revert();
            let snapshot = slot.engine.snapshot();
            self.shared.publish(&snapshot);
            return Ok(snapshot);
        }
        debug!("grid size unchanged");
        Ok(slot.engine.snapshot())
    }

    /// Current board.
    pub async fn snapshot(&self) -> Snapshot {
        self.shared.slot.lock().await.engine.snapshot()
    }

    /// Copy of the session configuration.
    pub async fn config(&self) -> GameConfig {
        self.shared.slot.lock().await.engine.config().clone()
    }

    /// Receive every published board, starting with the current one.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.shared.updates.subscribe()
    }
}
