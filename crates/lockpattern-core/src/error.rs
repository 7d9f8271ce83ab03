//! Error types for the pattern core
//!
//! - Grid construction and cell addressing failures
//! - Pattern decoding and validation failures
//! - Configuration loading failures

use thiserror::Error;

/// Grid geometry errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GridError {
    /// Grid size outside the representable range
    #[error("invalid grid size {size} (supported: {min}..={max})")]
    InvalidSize {
        /// Requested size
        size: u8,
        /// Smallest supported size
        min: u8,
        /// Largest supported size
        max: u8,
    },

    /// Cell coordinates outside the grid
    #[error("cell ({row}, {column}) outside {size}x{size} grid")]
    CellOutOfRange {
        /// Row of the offending cell
        row: u8,
        /// Column of the offending cell
        column: u8,
        /// Grid size
        size: u8,
    },

    /// Viewport with a non-positive or non-finite extent
    #[error("invalid viewport: {0}")]
    InvalidViewport(String),
}

/// Why a serialized pattern was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MalformedReason {
    /// Character is not part of the symbol alphabet
    UnknownSymbol,
    /// Symbol decodes to an index `>= size²`
    OutOfRange,
    /// Symbol repeats a cell already seen earlier in the string
    Repeated,
}

impl std::fmt::Display for MalformedReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownSymbol => write!(f, "unknown symbol"),
            Self::OutOfRange => write!(f, "cell index out of range"),
            Self::Repeated => write!(f, "repeated cell"),
        }
    }
}

/// Pattern model and codec errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PatternError {
    /// Serialized pattern cannot be decoded for the declared grid size
    #[error("malformed pattern at position {index} ({symbol:?}): {reason}")]
    MalformedPattern {
        /// Character position in the serialized string
        index: usize,
        /// Offending character
        symbol: char,
        /// Classification
        reason: MalformedReason,
    },

    /// Pattern would visit the same cell twice
    #[error("cell ({row}, {column}) appears more than once")]
    DuplicateCell {
        /// Row of the repeated cell
        row: u8,
        /// Column of the repeated cell
        column: u8,
    },

    /// Cell does not belong to the grid the pattern is bound to
    #[error(transparent)]
    Grid(#[from] GridError),
}

impl PatternError {
    /// Check if this is a decode failure of persisted input
    #[inline]
    #[must_use]
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::MalformedPattern { .. })
    }
}

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// TOML could not be parsed into a configuration
    #[error("failed to parse configuration: {0}")]
    Parse(String),

    /// Configuration parsed but violates a constraint
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

impl From<GridError> for ConfigError {
    fn from(value: GridError) -> Self {
        ConfigError::Invalid(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_display_names_position() {
        let err = PatternError::MalformedPattern {
            index: 2,
            symbol: '9',
            reason: MalformedReason::OutOfRange,
        };
        let text = err.to_string();
        assert!(text.contains("position 2"));
        assert!(text.contains("out of range"));
        assert!(err.is_malformed());
    }

    #[test]
    fn grid_error_converts_into_config_error() {
        let err: ConfigError = GridError::InvalidSize { size: 9, min: 1, max: 7 }.into();
        assert!(matches!(err, ConfigError::Invalid(msg) if msg.contains("9")));
    }
}
