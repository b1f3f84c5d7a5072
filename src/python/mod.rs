//! Python bindings for the memory-match engine.
//!
//! Exposes the synchronous `MatchEngine` for agents and notebooks. The
//! mismatch delay is driven from Python with `poll()`, or skipped outright
//! with `skip_delay()` when training.
//!
//! # Quick Start
//!
//! ```python
//! import memory_match as mm
//!
//! game = mm.MemoryGame(size=4, seed=42)
//! game.select(0)
//! result = game.select(1)       # "matched", "mismatched", "won", ...
//! if result == "mismatched":
//!     game.skip_delay()
//!
//! obs = game.observation()      # int32 array, shape (4, 4)
//! ```

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::core::GameError;

mod py_engine;

pub use py_engine::*;

impl From<GameError> for PyErr {
    fn from(err: GameError) -> Self {
        PyValueError::new_err(err.to_string())
    }
}

/// memory_match: a seeded memory (concentration) game engine.
#[pymodule]
fn memory_match(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyMemoryGame>()?;
    Ok(())
}
