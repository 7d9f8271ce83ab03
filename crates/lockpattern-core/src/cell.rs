//! Cells and grid sizes
//!
//! Provides [`Cell`], the value identifying one intersection of the gesture
//! grid, and [`GridSize`], the validated side length of the grid.

use crate::error::GridError;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Validated grid side length
///
/// Bounded by the single-character codec alphabet: `7 * 7 = 49` cells fit in
/// the 62 available symbols, `8 * 8` would not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct GridSize(u8);

impl GridSize {
    /// Smallest supported size
    pub const MIN: u8 = 1;

    /// Largest supported size
    pub const MAX: u8 = 7;

    /// The classic 3x3 layout
    pub const DEFAULT: GridSize = GridSize(3);

    /// Create a grid size
    ///
    /// # Errors
    /// Returns [`GridError::InvalidSize`] outside `MIN..=MAX`
    pub fn new(size: u8) -> Result<Self, GridError> {
        if (Self::MIN..=Self::MAX).contains(&size) {
            Ok(Self(size))
        } else {
            Err(GridError::InvalidSize {
                size,
                min: Self::MIN,
                max: Self::MAX,
            })
        }
    }

    /// Side length
    #[inline]
    #[must_use]
    pub fn get(self) -> u8 {
        self.0
    }

    /// Number of cells (`size²`)
    #[inline]
    #[must_use]
    pub fn cell_count(self) -> usize {
        usize::from(self.0) * usize::from(self.0)
    }
}

impl Default for GridSize {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<u8> for GridSize {
    type Error = GridError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<GridSize> for u8 {
    fn from(value: GridSize) -> Self {
        value.0
    }
}

impl Display for GridSize {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{0}x{0}", self.0)
    }
}

/// One addressable grid intersection
///
/// Cells are plain values: two cells are equal exactly when their row and
/// column are equal, and they order row-major.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Cell {
    row: u8,
    column: u8,
}

impl Cell {
    /// Create a cell bound-checked against a grid size
    ///
    /// # Errors
    /// Returns [`GridError::CellOutOfRange`] if either coordinate is `>= size`
    pub fn at(row: u8, column: u8, size: GridSize) -> Result<Self, GridError> {
        if row < size.get() && column < size.get() {
            Ok(Self { row, column })
        } else {
            Err(GridError::CellOutOfRange {
                row,
                column,
                size: size.get(),
            })
        }
    }

    /// Rebuild a cell from its row-major index
    ///
    /// Returns `None` if `index >= size²`.
    #[must_use]
    pub fn from_index(index: usize, size: GridSize) -> Option<Self> {
        if index >= size.cell_count() {
            return None;
        }
        let side = usize::from(size.get());
        let row = u8::try_from(index / side).ok()?;
        let column = u8::try_from(index % side).ok()?;
        Some(Self { row, column })
    }

    /// Row (0-based)
    #[inline]
    #[must_use]
    pub fn row(self) -> u8 {
        self.row
    }

    /// Column (0-based)
    #[inline]
    #[must_use]
    pub fn column(self) -> u8 {
        self.column
    }

    /// Row-major index: `row * size + column`
    #[inline]
    #[must_use]
    pub fn index(self, size: GridSize) -> usize {
        usize::from(self.row) * usize::from(size.get()) + usize::from(self.column)
    }

    /// Whether the cell lies inside a grid of this size
    #[inline]
    #[must_use]
    pub fn fits(self, size: GridSize) -> bool {
        self.row < size.get() && self.column < size.get()
    }
}

impl Display for Cell {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_size_bounds() {
        assert!(GridSize::new(0).is_err());
        assert!(GridSize::new(1).is_ok());
        assert!(GridSize::new(7).is_ok());
        assert!(GridSize::new(8).is_err());
        assert_eq!(GridSize::default().cell_count(), 9);
    }

    #[test]
    fn cell_index_is_row_major() {
        let size = GridSize::DEFAULT;
        let cell = Cell::at(2, 1, size).unwrap();
        assert_eq!(cell.index(size), 7);
        assert_eq!(Cell::from_index(7, size), Some(cell));
        assert_eq!(Cell::from_index(9, size), None);
    }

    #[test]
    fn cell_rejects_out_of_range() {
        let err = Cell::at(3, 0, GridSize::DEFAULT).unwrap_err();
        assert!(matches!(err, GridError::CellOutOfRange { row: 3, .. }));
    }

    #[test]
    fn cells_compare_by_coordinates() {
        let size = GridSize::DEFAULT;
        assert_eq!(Cell::at(1, 1, size).unwrap(), Cell::at(1, 1, size).unwrap());
        assert!(Cell::at(0, 2, size).unwrap() < Cell::at(1, 0, size).unwrap());
    }

    #[test]
    fn grid_size_deserializes_with_validation() {
        #[derive(Deserialize)]
        struct Holder {
            size: GridSize,
        }
        let ok: Holder = toml::from_str("size = 4").unwrap();
        assert_eq!(ok.size.get(), 4);
        assert!(toml::from_str::<Holder>("size = 12").is_err());
    }
}
