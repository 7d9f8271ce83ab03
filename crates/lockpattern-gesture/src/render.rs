//! Rendering boundary
//!
//! The recognizer never draws. After every mutation it builds a
//! [`RenderSnapshot`] and hands it to an attached [`PatternRenderer`].

use lockpattern_core::{Cell, GridSize};
use serde::{Deserialize, Serialize};

/// How the displayed pattern should be drawn
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DisplayMode {
    /// Normal / accepted
    #[default]
    Correct,
    /// Demonstration playback
    Animate,
    /// Rejected (too short, mismatch)
    Wrong,
}

/// Read-only view of everything a renderer needs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderSnapshot {
    /// Grid the cells belong to
    pub grid_size: GridSize,
    /// Displayed cells in order
    pub cells: Vec<Cell>,
    /// `size²` row-major flags: cell is part of the displayed pattern
    pub lookup: Vec<bool>,
    /// Live pointer position while a gesture is tracked
    pub in_progress: Option<(f32, f32)>,
    /// Drawing mode
    pub mode: DisplayMode,
    /// Whether new gestures may start
    pub input_enabled: bool,
}

impl RenderSnapshot {
    /// Whether `cell` is drawn as selected
    #[must_use]
    pub fn is_selected(&self, cell: Cell) -> bool {
        cell.fits(self.grid_size)
            && self
                .lookup
                .get(cell.index(self.grid_size))
                .copied()
                .unwrap_or(false)
    }
}

/// Consumer of render snapshots
///
/// Implementations must not call back into the recognizer.
pub trait PatternRenderer: Send {
    /// Called after every pattern or pointer mutation
    fn render(&mut self, snapshot: &RenderSnapshot);
}

impl<F> PatternRenderer for F
where
    F: FnMut(&RenderSnapshot) + Send,
{
    fn render(&mut self, snapshot: &RenderSnapshot) {
        self(snapshot);
    }
}
