//! Ordered, duplicate-free cell sequences
//!
//! Order is part of the credential: `[a, b, c]` and `[c, b, a]` are
//! different patterns.

use crate::cell::{Cell, GridSize};
use crate::error::PatternError;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Ordered sequence of distinct cells
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<Cell>", into = "Vec<Cell>")]
pub struct Pattern(Vec<Cell>);

impl Pattern {
    /// Empty pattern
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Empty pattern with room for every cell of a grid
    #[inline]
    #[must_use]
    pub fn with_capacity(size: GridSize) -> Self {
        Self(Vec::with_capacity(size.cell_count()))
    }

    /// Build from cells, rejecting repeats
    ///
    /// # Errors
    /// Returns [`PatternError::DuplicateCell`] for the first repeated cell
    pub fn from_cells(cells: impl IntoIterator<Item = Cell>) -> Result<Self, PatternError> {
        let mut pattern = Self::new();
        for cell in cells {
            if !pattern.push(cell) {
                return Err(PatternError::DuplicateCell {
                    row: cell.row(),
                    column: cell.column(),
                });
            }
        }
        Ok(pattern)
    }

    /// Append a cell unless it is already present
    ///
    /// Returns `false` (and leaves the pattern untouched) for a repeat.
    pub fn push(&mut self, cell: Cell) -> bool {
        if self.contains(cell) {
            return false;
        }
        self.0.push(cell);
        true
    }

    /// Remove every cell
    #[inline]
    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Cells in visiting order
    #[inline]
    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.0
    }

    /// Number of cells
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// No cells yet
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether `cell` has been visited
    #[inline]
    #[must_use]
    pub fn contains(&self, cell: Cell) -> bool {
        self.0.contains(&cell)
    }

    /// First visited cell
    #[inline]
    #[must_use]
    pub fn first(&self) -> Option<Cell> {
        self.0.first().copied()
    }

    /// Most recently visited cell
    #[inline]
    #[must_use]
    pub fn last(&self) -> Option<Cell> {
        self.0.last().copied()
    }

    /// Iterate cells in order
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = Cell> + '_ {
        self.0.iter().copied()
    }

    /// Whether every cell fits a grid of this size
    #[must_use]
    pub fn fits(&self, size: GridSize) -> bool {
        self.0.iter().all(|c| c.fits(size))
    }

    /// Per-cell membership table (`size²` entries, row-major)
    ///
    /// Cells outside the grid are ignored.
    #[must_use]
    pub fn lookup(&self, size: GridSize) -> Vec<bool> {
        let mut table = vec![false; size.cell_count()];
        for cell in self.iter().filter(|c| c.fits(size)) {
            table[cell.index(size)] = true;
        }
        table
    }
}

impl TryFrom<Vec<Cell>> for Pattern {
    type Error = PatternError;

    fn try_from(value: Vec<Cell>) -> Result<Self, Self::Error> {
        Self::from_cells(value)
    }
}

impl From<Pattern> for Vec<Cell> {
    fn from(value: Pattern) -> Self {
        value.0
    }
}

impl<'a> IntoIterator for &'a Pattern {
    type Item = &'a Cell;
    type IntoIter = std::slice::Iter<'a, Cell>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl Display for Pattern {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, cell) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{cell}")?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(row: u8, column: u8) -> Cell {
        Cell::at(row, column, GridSize::DEFAULT).unwrap()
    }

    #[test]
    fn push_rejects_repeats() {
        let mut pattern = Pattern::new();
        assert!(pattern.push(c(0, 0)));
        assert!(pattern.push(c(1, 1)));
        assert!(!pattern.push(c(0, 0)));
        assert_eq!(pattern.cells(), &[c(0, 0), c(1, 1)]);
    }

    #[test]
    fn from_cells_reports_duplicate() {
        let err = Pattern::from_cells([c(0, 0), c(0, 1), c(0, 0)]).unwrap_err();
        assert_eq!(err, PatternError::DuplicateCell { row: 0, column: 0 });
    }

    #[test]
    fn order_matters_for_equality() {
        let forward = Pattern::from_cells([c(0, 0), c(0, 1), c(1, 1)]).unwrap();
        let reversed = Pattern::from_cells([c(1, 1), c(0, 1), c(0, 0)]).unwrap();
        assert_ne!(forward, reversed);
    }

    #[test]
    fn lookup_marks_members() {
        let pattern = Pattern::from_cells([c(0, 0), c(2, 2)]).unwrap();
        let table = pattern.lookup(GridSize::DEFAULT);
        assert_eq!(table.len(), 9);
        assert_eq!(table.iter().filter(|&&b| b).count(), 2);
        assert!(table[0] && table[8]);
    }

    #[test]
    fn display_lists_cells() {
        let pattern = Pattern::from_cells([c(0, 0), c(1, 2)]).unwrap();
        assert_eq!(pattern.to_string(), "[(0, 0), (1, 2)]");
    }
}
