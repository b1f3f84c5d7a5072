//! Match rules: flip sequencing, pair evaluation, mismatch reverts and win
//! detection.
//!
//! `MatchEngine` is synchronous and never sleeps. A mismatch hands back a
//! `RevertTicket`; whoever drives the engine waits out the delay and returns
//! the ticket via `complete_revert`, or calls `poll` from a game loop.

pub mod match_engine;
pub mod outcome;
pub mod snapshot;
pub mod state;
pub mod timer;

pub use match_engine::MatchEngine;
pub use outcome::{IgnoreReason, RevertOutcome, SelectOutcome};
pub use snapshot::{CardView, Snapshot};
pub use state::{EngineState, Phase, Visibility};
pub use timer::{Generation, RevertTicket};
