//! Lock Pattern Gesture Recognition
//!
//! Consumes single-finger pointer events against a [`Grid`] and produces an
//! ordered, duplicate-free [`Pattern`] plus lifecycle notifications.
//!
//! # Core Concepts
//!
//! - [`GestureRecognizer`]: The `Idle`/`Tracking` state machine
//! - [`PointerEvent`]: Down / Move / Up input
//! - [`GestureEvent`]: Started / CellAdded / Cleared / Completed output
//! - [`RenderSnapshot`] and [`PatternRenderer`]: The drawing boundary
//!
//! # Example
//!
//! ```rust
//! use lockpattern_core::{Grid, GridSize, Viewport};
//! use lockpattern_gesture::{GestureEvent, GestureRecognizer};
//!
//! let grid = Grid::new(GridSize::DEFAULT, Viewport::square(300.0).unwrap());
//! let mut recognizer = GestureRecognizer::new(grid);
//!
//! recognizer.pointer_down(50.0, 50.0);
//! recognizer.pointer_move(250.0, 250.0);
//! let events = recognizer.pointer_up(250.0, 250.0);
//!
//! let GestureEvent::Completed(pattern) = &events[0] else { panic!() };
//! assert_eq!(pattern.len(), 3); // (0,0) -> (1,1) -> (2,2)
//! ```
//!
//! [`Grid`]: lockpattern_core::Grid
//! [`Pattern`]: lockpattern_core::Pattern

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod event;
mod recognizer;
mod render;

// Re-exports
pub use event::{GestureEvent, PointerEvent};
pub use recognizer::{GestureRecognizer, RecognizerState};
pub use render::{DisplayMode, PatternRenderer, RenderSnapshot};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
