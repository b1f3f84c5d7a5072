//! Mismatch revert scheduling.
//!
//! The engine never sleeps. A mismatch produces a `RevertTicket` naming the
//! game generation it belongs to and the instant it becomes due; a driver
//! (a game loop calling `poll`, or the tokio `GameSession`) hands the
//! ticket back once the delay has elapsed. Reinitializing bumps the
//! generation, so a ticket from a replaced board can never touch the new one.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::cards::CardId;

/// Identifies one dealt board. Bumped on every reinitialize.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Generation(pub u64);

impl Generation {
    /// Create a generation counter.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Get the raw counter value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }

    /// The generation that replaces this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl std::fmt::Display for Generation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Gen({})", self.0)
    }
}

/// A scheduled revert of one mismatched pair.
///
/// Tickets compare equal only if they were armed for the same attempt of
/// the same generation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RevertTicket {
    generation: Generation,
    attempt: u32,
    first: CardId,
    second: CardId,
    due: Instant,
}

impl RevertTicket {
    pub(crate) fn new(
        generation: Generation,
        attempt: u32,
        (first, second): (CardId, CardId),
        armed_at: Instant,
        delay: Duration,
    ) -> Self {
        Self {
            generation,
            attempt,
            first,
            second,
            due: armed_at + delay,
        }
    }

    /// Board generation the ticket was armed for.
    #[must_use]
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Attempt number the ticket belongs to.
    #[must_use]
    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    /// The two mismatched cards, in reveal order.
    #[must_use]
    pub fn pair(&self) -> (CardId, CardId) {
        (self.first, self.second)
    }

    /// When the pair may turn face-down.
    #[must_use]
    pub fn due(&self) -> Instant {
        self.due
    }

    /// Check whether the delay has elapsed at `now`.
    #[must_use]
    pub fn is_due(&self, now: Instant) -> bool {
        now >= self.due
    }

    /// Time left until due, zero once due.
    #[must_use]
    pub fn remaining(&self, now: Instant) -> Duration {
        self.due.saturating_duration_since(now)
    }
}
