//! Engine bindings for Python.

use std::time::Duration;

use numpy::{PyArray1, PyArray2, PyArrayMethods};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::cards::CardId;
use crate::core::{GameConfig, GridSize, ReselectPolicy};
use crate::engine::{MatchEngine, RevertOutcome, SelectOutcome};

/// Python wrapper for `MatchEngine`.
#[pyclass(name = "MemoryGame")]
pub struct PyMemoryGame {
    engine: MatchEngine,
}

#[pymethods]
impl PyMemoryGame {
    /// Create a new game.
    ///
    /// # Arguments
    /// - size: Board dimension (2-10)
    /// - seed: RNG seed for deterministic deals
    /// - revert_delay_ms: How long a mismatched pair stays visible
    /// - unflip: Reselecting the lone face-up card turns it back down
    #[new]
    #[pyo3(signature = (size = 4, seed = 0, revert_delay_ms = 1000, unflip = false))]
    fn new(size: u8, seed: u64, revert_delay_ms: u64, unflip: bool) -> PyResult<Self> {
        let reselect = if unflip {
            ReselectPolicy::Unflip
        } else {
            ReselectPolicy::Ignore
        };
        let config = GameConfig::new()
            .with_grid_size(GridSize::new(size)?)
            .with_seed(seed)
            .with_revert_delay(Duration::from_millis(revert_delay_ms))
            .with_reselect(reselect);
        Ok(Self {
            engine: MatchEngine::new(config),
        })
    }

    /// Select a card by position.
    ///
    /// Returns one of "flipped", "unflipped", "matched", "won",
    /// "mismatched", "ignored".
    fn select(&mut self, card: u32) -> &'static str {
        match self.engine.select(CardId::new(card)) {
            SelectOutcome::Flipped(_) => "flipped",
            SelectOutcome::Unflipped(_) => "unflipped",
            SelectOutcome::Matched { won: true, .. } => "won",
            SelectOutcome::Matched { .. } => "matched",
            SelectOutcome::Mismatched { .. } => "mismatched",
            SelectOutcome::Ignored(_) => "ignored",
        }
    }

    /// Deal a new board of the current size.
    fn reset(&mut self) {
        self.engine.reinitialize();
    }

    /// Change the board size. Returns False if the size was unchanged.
    fn set_grid_size(&mut self, size: u8) -> PyResult<bool> {
        Ok(self.engine.set_grid_size(size)?)
    }

    /// Revert a mismatched pair if its delay has elapsed.
    ///
    /// Returns True if the board changed.
    fn poll(&mut self) -> bool {
        matches!(self.engine.poll(), Some(RevertOutcome::Reverted { .. }))
    }

    /// Revert a mismatched pair now, ignoring the delay.
    fn skip_delay(&mut self) -> bool {
        match self.engine.pending_revert().copied() {
            Some(ticket) => self.engine.complete_revert(&ticket).has_update(),
            None => false,
        }
    }

    /// Board as an int32 array of shape (size, size).
    ///
    /// 0 is face-down, a positive value is face-up, a negative value is solved.
    fn observation<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyArray2<i32>>> {
        let side = self.engine.grid_size().get() as usize;
        PyArray1::from_vec_bound(py, self.engine.snapshot().observation())
            .reshape([side, side])
            .map_err(|e| PyValueError::new_err(format!("{}", e)))
    }

    /// Face-up unsolved card positions.
    #[getter]
    fn flipped(&self) -> Vec<u32> {
        self.engine.state().flipped().iter().map(|id| id.raw()).collect()
    }

    /// Solved card positions in match order.
    #[getter]
    fn solved(&self) -> Vec<u32> {
        self.engine.state().solved().iter().map(|id| id.raw()).collect()
    }

    #[getter]
    fn locked(&self) -> bool {
        self.engine.is_locked()
    }

    #[getter]
    fn won(&self) -> bool {
        self.engine.is_won()
    }

    #[getter]
    fn failed_attempts(&self) -> u32 {
        self.engine.failed_attempts()
    }

    #[getter]
    fn grid_size(&self) -> u8 {
        self.engine.grid_size().get()
    }

    #[getter]
    fn generation(&self) -> u64 {
        self.engine.generation().raw()
    }

    fn __repr__(&self) -> String {
        format!(
            "MemoryGame(size={}, solved={}/{}, failed_attempts={})",
            self.engine.grid_size(),
            self.engine.state().solved().len(),
            self.engine.deck().len(),
            self.engine.failed_attempts()
        )
    }
}
