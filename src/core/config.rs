//! Game configuration types.
//!
//! - `GridSize`: validated board dimension (the board is `size × size`)
//! - `ReselectPolicy`: what selecting the lone flipped card again does
//! - `GameConfig`: combines all configuration with the seed and revert delay
//!
//! The engine validates every size it receives, even though UIs are expected
//! to clamp before calling in.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::error::{GameError, Result};

/// Smallest accepted grid dimension.
pub const MIN_GRID_SIZE: u8 = 2;

/// Largest accepted grid dimension.
pub const MAX_GRID_SIZE: u8 = 10;

/// Grid dimension used when nothing else is configured.
pub const DEFAULT_GRID_SIZE: u8 = 4;

/// Delay before a mismatched pair turns face-down again.
pub const DEFAULT_REVERT_DELAY: Duration = Duration::from_millis(1000);

/// Board dimension in `[MIN_GRID_SIZE, MAX_GRID_SIZE]`.
///
/// ```
/// use memory_match::core::GridSize;
///
/// let size = GridSize::new(3).unwrap();
/// assert_eq!(size.total_cards(), 9);
/// assert!(GridSize::new(11).is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct GridSize(u8);

impl GridSize {
    /// Smallest board.
    pub const MIN: Self = Self(MIN_GRID_SIZE);

    /// Largest board.
    pub const MAX: Self = Self(MAX_GRID_SIZE);

    /// Validate a grid dimension.
    ///
    /// # Errors
    ///
    /// Returns `GameError::InvalidConfiguration` if `size` is outside
    /// `[MIN_GRID_SIZE, MAX_GRID_SIZE]`.
    pub fn new(size: u8) -> Result<Self> {
        if (MIN_GRID_SIZE..=MAX_GRID_SIZE).contains(&size) {
            Ok(Self(size))
        } else {
            Err(GameError::InvalidConfiguration { size })
        }
    }

    /// Clamp any value into the accepted range.
    #[must_use]
    pub fn clamped(size: u8) -> Self {
        Self(size.clamp(MIN_GRID_SIZE, MAX_GRID_SIZE))
    }

    /// Get the raw dimension.
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Number of cards on a board of this size.
    #[must_use]
    pub const fn total_cards(self) -> usize {
        self.0 as usize * self.0 as usize
    }

    /// Number of complete pairs that fit on the board.
    #[must_use]
    pub const fn pair_count(self) -> usize {
        self.total_cards() / 2
    }

    /// True when the board has one unpairable slot.
    #[must_use]
    pub const fn has_singleton(self) -> bool {
        self.total_cards() % 2 == 1
    }

    /// One step larger, saturating at `MAX`.
    #[must_use]
    pub fn increment(self) -> Self {
        Self::clamped(self.0.saturating_add(1))
    }

    /// One step smaller, saturating at `MIN`.
    #[must_use]
    pub fn decrement(self) -> Self {
        Self::clamped(self.0.saturating_sub(1))
    }
}

impl Default for GridSize {
    fn default() -> Self {
        Self(DEFAULT_GRID_SIZE)
    }
}

impl TryFrom<u8> for GridSize {
    type Error = GameError;

    fn try_from(size: u8) -> Result<Self> {
        Self::new(size)
    }
}

impl From<GridSize> for u8 {
    fn from(size: GridSize) -> Self {
        size.0
    }
}

impl std::fmt::Display for GridSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.0, self.0)
    }
}

/// Behavior when the single face-up card is selected again.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReselectPolicy {
    /// The selection is rejected and nothing changes.
    #[default]
    Ignore,
    /// The card turns face-down again, returning the board to idle.
    Unflip,
}

/// Complete game configuration.
///
/// ```
/// use std::time::Duration;
/// use memory_match::core::{GameConfig, GridSize};
///
/// let config = GameConfig::new()
///     .with_grid_size(GridSize::new(6).unwrap())
///     .with_revert_delay(Duration::from_millis(500))
///     .with_seed(7);
///
/// assert_eq!(config.grid_size.get(), 6);
/// assert_eq!(config.revert_delay, Duration::from_millis(500));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Board dimension.
    pub grid_size: GridSize,

    /// How long a mismatched pair stays visible.
    #[serde(with = "millis")]
    pub revert_delay: Duration,

    /// Seed for the deck shuffles.
    pub seed: u64,

    /// Reselecting the lone flipped card.
    pub reselect: ReselectPolicy,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_size: GridSize::default(),
            revert_delay: DEFAULT_REVERT_DELAY,
            seed: 0,
            reselect: ReselectPolicy::default(),
        }
    }
}

impl GameConfig {
    /// Create a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the board dimension.
    #[must_use]
    pub fn with_grid_size(mut self, grid_size: GridSize) -> Self {
        self.grid_size = grid_size;
        self
    }

    /// Set the mismatch revert delay.
    #[must_use]
    pub fn with_revert_delay(mut self, delay: Duration) -> Self {
        self.revert_delay = delay;
        self
    }

    /// Set the shuffle seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the reselect policy.
    #[must_use]
    pub fn with_reselect(mut self, reselect: ReselectPolicy) -> Self {
        self.reselect = reselect;
        self
    }
}

mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(delay: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        let ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        serializer.serialize_u64(ms)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
