//! Pattern serialization
//!
//! One character per cell, no separator. A cell's symbol is its row-major
//! index `row * size + column` looked up in [`ALPHABET`]: digits first, so a
//! 3x3 pattern serializes to digits `0`-`8` only.

use crate::cell::{Cell, GridSize};
use crate::error::{GridError, MalformedReason, PatternError};
use crate::pattern::Pattern;

/// Symbol alphabet, indexed by cell index
pub const ALPHABET: &[u8; 62] =
    b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Stateless pattern codec
#[derive(Debug, Clone, Copy, Default)]
pub struct PatternCodec;

impl PatternCodec {
    /// Serialize a pattern bound to a grid size
    ///
    /// # Errors
    /// Returns [`PatternError::Grid`] if a cell does not fit the grid
    pub fn serialize(pattern: &Pattern, size: GridSize) -> Result<String, PatternError> {
        pattern
            .iter()
            .map(|cell| {
                if !cell.fits(size) {
                    return Err(PatternError::Grid(GridError::CellOutOfRange {
                        row: cell.row(),
                        column: cell.column(),
                        size: size.get(),
                    }));
                }
                Ok(char::from(ALPHABET[cell.index(size)]))
            })
            .collect()
    }

    /// Deserialize a pattern for a grid size
    ///
    /// The empty string is the empty pattern.
    ///
    /// # Errors
    /// Returns [`PatternError::MalformedPattern`] for an unknown symbol, an
    /// index `>= size²`, or a repeated cell
    pub fn deserialize(encoded: &str, size: GridSize) -> Result<Pattern, PatternError> {
        let mut pattern = Pattern::with_capacity(size);
        for (index, symbol) in encoded.chars().enumerate() {
            let malformed = |reason| PatternError::MalformedPattern {
                index,
                symbol,
                reason,
            };
            let value = symbol_value(symbol).ok_or_else(|| malformed(MalformedReason::UnknownSymbol))?;
            let cell = Cell::from_index(value, size).ok_or_else(|| malformed(MalformedReason::OutOfRange))?;
            if !pattern.push(cell) {
                return Err(malformed(MalformedReason::Repeated));
            }
        }
        Ok(pattern)
    }
}

fn symbol_value(symbol: char) -> Option<usize> {
    let byte = u8::try_from(symbol).ok()?;
    ALPHABET.iter().position(|&s| s == byte)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn c(row: u8, column: u8) -> Cell {
        Cell::at(row, column, GridSize::DEFAULT).unwrap()
    }

    #[test]
    fn default_grid_uses_digits() {
        let pattern = Pattern::from_cells([c(0, 0), c(1, 1), c(2, 2), c(2, 1)]).unwrap();
        let encoded = PatternCodec::serialize(&pattern, GridSize::DEFAULT).unwrap();
        assert_eq!(encoded, "0487");
    }

    #[test]
    fn empty_pattern_is_empty_string() {
        let encoded = PatternCodec::serialize(&Pattern::new(), GridSize::DEFAULT).unwrap();
        assert_eq!(encoded, "");
        assert!(PatternCodec::deserialize("", GridSize::DEFAULT).unwrap().is_empty());
    }

    #[test]
    fn out_of_range_symbol_is_malformed() {
        let err = PatternCodec::deserialize("019", GridSize::DEFAULT).unwrap_err();
        assert_eq!(
            err,
            PatternError::MalformedPattern {
                index: 2,
                symbol: '9',
                reason: MalformedReason::OutOfRange,
            }
        );
    }

    #[test]
    fn unknown_and_repeated_symbols_are_malformed() {
        assert!(matches!(
            PatternCodec::deserialize("0-1", GridSize::DEFAULT),
            Err(PatternError::MalformedPattern { reason: MalformedReason::UnknownSymbol, .. })
        ));
        assert!(matches!(
            PatternCodec::deserialize("010", GridSize::DEFAULT),
            Err(PatternError::MalformedPattern { reason: MalformedReason::Repeated, .. })
        ));
        assert!(matches!(
            PatternCodec::deserialize("0é", GridSize::DEFAULT),
            Err(PatternError::MalformedPattern { index: 1, .. })
        ));
    }

    #[test]
    fn larger_grids_use_letters() {
        let size = GridSize::new(7).unwrap();
        let last = Cell::at(6, 6, size).unwrap();
        let pattern = Pattern::from_cells([last]).unwrap();
        assert_eq!(PatternCodec::serialize(&pattern, size).unwrap(), "M");
    }

    #[test]
    fn serialize_rejects_cells_outside_grid() {
        let pattern = Pattern::from_cells([c(2, 2)]).unwrap();
        let err = PatternCodec::serialize(&pattern, GridSize::new(2).unwrap()).unwrap_err();
        assert!(matches!(err, PatternError::Grid(GridError::CellOutOfRange { .. })));
    }

    fn arb_pattern() -> impl Strategy<Value = (GridSize, Pattern)> {
        (GridSize::MIN..=GridSize::MAX).prop_flat_map(|side| {
            let size = GridSize::new(side).unwrap();
            let count = size.cell_count();
            Just((0..count).collect::<Vec<_>>())
                .prop_shuffle()
                .prop_flat_map(move |order| {
                    (0..=count).prop_map(move |len| {
                        let cells = order[..len].iter().filter_map(|&i| Cell::from_index(i, size));
                        (size, Pattern::from_cells(cells).unwrap())
                    })
                })
        })
    }

    proptest! {
        #[test]
        fn prop_deserialize_inverts_serialize((size, pattern) in arb_pattern()) {
            let encoded = PatternCodec::serialize(&pattern, size).unwrap();
            prop_assert_eq!(encoded.chars().count(), pattern.len());
            let decoded = PatternCodec::deserialize(&encoded, size).unwrap();
            prop_assert_eq!(decoded, pattern);
        }
    }
}
