//! Grid geometry
//!
//! Maps between continuous pointer coordinates and discrete [`Cell`]s.
//!
//! # Hit testing
//!
//! Each cell owns a `square_width x square_height` square of the viewport.
//! Only a centred band of `hit_factor` of that square is hit-sensitive, so
//! points in the gap between two cells resolve to no cell at all. Rows and
//! columns are probed in ascending order with inclusive edges; if bands
//! touch (`hit_factor == 1.0`) a point exactly on the shared edge resolves to
//! the lower row/column.

use crate::cell::{Cell, GridSize};
use crate::error::GridError;
use serde::{Deserialize, Serialize};

/// Drawing rectangle the grid is laid out in (padding already removed)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Left edge
    pub left: f32,
    /// Top edge
    pub top: f32,
    /// Width
    pub width: f32,
    /// Height
    pub height: f32,
}

impl Viewport {
    /// Create a viewport
    ///
    /// # Errors
    /// Returns [`GridError::InvalidViewport`] for non-finite origins or
    /// non-positive extents
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Result<Self, GridError> {
        if !(left.is_finite() && top.is_finite()) {
            return Err(GridError::InvalidViewport(format!(
                "origin ({left}, {top}) is not finite"
            )));
        }
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(GridError::InvalidViewport(format!(
                "extent {width}x{height} must be positive"
            )));
        }
        Ok(Self {
            left,
            top,
            width,
            height,
        })
    }

    /// Square viewport anchored at the origin
    ///
    /// # Errors
    /// Same as [`Viewport::new`]
    pub fn square(side: f32) -> Result<Self, GridError> {
        Self::new(0.0, 0.0, side, side)
    }
}

/// Gesture grid: cell arena plus geometry
///
/// The grid owns the `size²` cells it hands out. Resizing rebuilds the arena
/// in one step; cells from the previous size are rejected by
/// [`Grid::contains`] when they no longer fit.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    size: GridSize,
    viewport: Viewport,
    hit_factor: f32,
    cells: Vec<Cell>,
}

impl Grid {
    /// Fraction of a cell square that is hit-sensitive by default
    pub const DEFAULT_HIT_FACTOR: f32 = 0.6;

    /// Create a grid
    #[must_use]
    pub fn new(size: GridSize, viewport: Viewport) -> Self {
        Self {
            size,
            viewport,
            hit_factor: Self::DEFAULT_HIT_FACTOR,
            cells: build_arena(size),
        }
    }

    /// With a custom hit factor, clamped into `(0, 1]`
    ///
    /// Non-finite values fall back to [`Grid::DEFAULT_HIT_FACTOR`].
    #[must_use]
    pub fn with_hit_factor(mut self, hit_factor: f32) -> Self {
        self.hit_factor = if hit_factor.is_finite() {
            hit_factor.clamp(f32::EPSILON, 1.0)
        } else {
            Self::DEFAULT_HIT_FACTOR
        };
        self
    }

    /// Grid size
    #[inline]
    #[must_use]
    pub fn size(&self) -> GridSize {
        self.size
    }

    /// Viewport
    #[inline]
    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Hit factor in effect
    #[inline]
    #[must_use]
    pub fn hit_factor(&self) -> f32 {
        self.hit_factor
    }

    /// All cells, row-major
    #[inline]
    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Canonical cell for `(row, column)`, or `None` outside the grid
    #[must_use]
    pub fn cell(&self, row: u8, column: u8) -> Option<Cell> {
        if row >= self.size.get() || column >= self.size.get() {
            return None;
        }
        let side = usize::from(self.size.get());
        self.cells
            .get(usize::from(row) * side + usize::from(column))
            .copied()
    }

    /// Whether `cell` is addressable in this grid
    #[inline]
    #[must_use]
    pub fn contains(&self, cell: Cell) -> bool {
        cell.fits(self.size)
    }

    /// Change the grid size, rebuilding the arena
    pub fn resize(&mut self, size: GridSize) {
        if size != self.size {
            tracing::debug!(from = %self.size, to = %size, "grid resized");
        }
        self.size = size;
        self.cells = build_arena(size);
    }

    /// Change the viewport (layout pass)
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Width of one cell square
    #[inline]
    #[must_use]
    pub fn square_width(&self) -> f32 {
        self.viewport.width / f32::from(self.size.get())
    }

    /// Height of one cell square
    #[inline]
    #[must_use]
    pub fn square_height(&self) -> f32 {
        self.viewport.height / f32::from(self.size.get())
    }

    /// Centre of a cell in viewport coordinates
    #[must_use]
    pub fn center_of(&self, cell: Cell) -> (f32, f32) {
        let square_width = self.square_width();
        let square_height = self.square_height();
        let x = self.viewport.left
            + f32::from(cell.column()) * square_width
            + square_width / 2.0;
        let y = self.viewport.top + f32::from(cell.row()) * square_height + square_height / 2.0;
        (x, y)
    }

    /// Cell whose hit area contains the point, if any
    #[must_use]
    pub fn cell_at(&self, x: f32, y: f32) -> Option<Cell> {
        let row = band_hit(y, self.viewport.top, self.square_height(), self.hit_factor, self.size)?;
        let column = band_hit(
            x,
            self.viewport.left,
            self.square_width(),
            self.hit_factor,
            self.size,
        )?;
        let cell = self.cell(row, column);
        tracing::trace!(x, y, ?cell, "hit test");
        cell
    }

    /// Cells on the straight segment from `a` to `b`
    ///
    /// Excludes `a`, includes `b`, ordered from `a` towards `b`. Only cells
    /// whose centres lie exactly on the segment qualify, which on an integer
    /// lattice means stepping by `(dr, dc) / gcd(|dr|, |dc|)`.
    #[must_use]
    pub fn cells_between(&self, a: Cell, b: Cell) -> Vec<Cell> {
        if a == b {
            return Vec::new();
        }
        let d_row = i16::from(b.row()) - i16::from(a.row());
        let d_column = i16::from(b.column()) - i16::from(a.column());
        let steps = gcd(d_row.unsigned_abs(), d_column.unsigned_abs());
        // steps >= 1 since a != b, and both deltas are bounded by MAX grid size
        let steps = i16::try_from(steps).unwrap_or(1);
        let (step_row, step_column) = (d_row / steps, d_column / steps);

        (1..=steps)
            .filter_map(|k| {
                let row = u8::try_from(i16::from(a.row()) + step_row * k).ok()?;
                let column = u8::try_from(i16::from(a.column()) + step_column * k).ok()?;
                self.cell(row, column)
            })
            .collect()
    }
}

fn build_arena(size: GridSize) -> Vec<Cell> {
    (0..size.cell_count())
        .filter_map(|index| Cell::from_index(index, size))
        .collect()
}

/// Index of the hit band containing `coord` along one axis
fn band_hit(coord: f32, origin: f32, square: f32, hit_factor: f32, size: GridSize) -> Option<u8> {
    let hit_size = square * hit_factor;
    let offset = origin + (square - hit_size) / 2.0;
    (0..size.get()).find(|&i| {
        let hit_start = offset + f32::from(i) * square;
        coord >= hit_start && coord <= hit_start + hit_size
    })
}

fn gcd(mut a: u16, mut b: u16) -> u16 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}
