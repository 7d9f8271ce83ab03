//! Pointer input and recognizer notifications

use lockpattern_core::{Cell, Pattern};
use serde::{Deserialize, Serialize};

/// Single-finger pointer input in viewport coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    /// Finger touched down
    Down {
        /// Horizontal position
        x: f32,
        /// Vertical position
        y: f32,
    },
    /// Finger moved while down
    Move {
        /// Horizontal position
        x: f32,
        /// Vertical position
        y: f32,
    },
    /// Finger lifted
    Up {
        /// Horizontal position
        x: f32,
        /// Vertical position
        y: f32,
    },
}

impl PointerEvent {
    /// Pointer position carried by the event
    #[inline]
    #[must_use]
    pub fn position(&self) -> (f32, f32) {
        match *self {
            Self::Down { x, y } | Self::Move { x, y } | Self::Up { x, y } => (x, y),
        }
    }
}

/// Lifecycle notification emitted by the recognizer
///
/// Events of one gesture are returned in occurrence order, and always before
/// any event of the next gesture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GestureEvent {
    /// Tracking began on a cell
    Started,
    /// A cell joined the in-progress pattern
    CellAdded(Cell),
    /// The pattern was discarded (explicit clear, or a gesture with no cells)
    Cleared,
    /// The finger lifted; the finished pattern is handed over by value
    Completed(Pattern),
}

impl GestureEvent {
    /// Short name for logs
    #[inline]
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Started => "started",
            Self::CellAdded(_) => "cell-added",
            Self::Cleared => "cleared",
            Self::Completed(_) => "completed",
        }
    }
}
