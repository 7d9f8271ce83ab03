//! Lock Pattern Core
//!
//! The geometric and data model underneath gesture unlock credentials.
//!
//! # Core Concepts
//!
//! - [`Cell`]: One grid intersection, compared by `(row, column)`
//! - [`Grid`]: Cell arena plus geometry (centres, hit testing, skip-over)
//! - [`Pattern`]: Ordered, duplicate-free cell sequence
//! - [`PatternCodec`]: Compact one-symbol-per-cell string form
//! - [`LockPatternConfig`]: Grid size, minimum length and workflow delays
//!
//! # Example
//!
//! ```rust
//! use lockpattern_core::{Grid, GridSize, Pattern, PatternCodec, Viewport};
//!
//! let grid = Grid::new(GridSize::DEFAULT, Viewport::square(300.0).unwrap());
//! let start = grid.cell_at(50.0, 50.0).unwrap();
//! let end = grid.cell(2, 2).unwrap();
//!
//! // Dragging corner to corner passes through the centre cell
//! let mut pattern = Pattern::from_cells([start]).unwrap();
//! for cell in grid.cells_between(start, end) {
//!     pattern.push(cell);
//! }
//! assert_eq!(PatternCodec::serialize(&pattern, grid.size()).unwrap(), "048");
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod cell;
mod codec;
mod config;
mod error;
mod grid;
mod pattern;

// Re-exports
pub use cell::{Cell, GridSize};
pub use codec::{PatternCodec, ALPHABET};
pub use config::LockPatternConfig;
pub use error::{ConfigError, GridError, MalformedReason, PatternError};
pub use grid::{Grid, Viewport};
pub use pattern::Pattern;

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for pattern work
    pub use crate::{Cell, Grid, GridSize, LockPatternConfig, Pattern, PatternCodec, Viewport};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
