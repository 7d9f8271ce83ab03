//! Lock pattern configuration
//!
//! Loaded from TOML or built in code. Grid size and minimum length are
//! process-wide settings; they are re-read from configuration rather than
//! persisted with an enrollment session.

use crate::cell::GridSize;
use crate::error::ConfigError;
use crate::grid::Grid;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for capture and enrollment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LockPatternConfig {
    /// Grid side length
    pub grid_size: GridSize,
    /// Shortest pattern accepted as a first choice
    pub min_pattern_len: usize,
    /// Hit-sensitive fraction of each cell square
    pub hit_factor: f32,
    /// Delay before a rejected pattern is cleared
    pub clear_delay_ms: u64,
    /// Delay before an accepted first choice advances to confirmation
    pub confirm_delay_ms: u64,
    /// Delay between a confirmed pattern being saved and the flow exiting
    pub finish_delay_ms: u64,
}

impl LockPatternConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse from TOML and validate
    ///
    /// Missing keys take their default values.
    ///
    /// # Errors
    /// Returns [`ConfigError::Parse`] for bad TOML and
    /// [`ConfigError::Invalid`] for constraint violations
    pub fn from_toml_str(toml: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// With grid size
    #[inline]
    #[must_use]
    pub fn with_grid_size(mut self, grid_size: GridSize) -> Self {
        self.grid_size = grid_size;
        self
    }

    /// With minimum pattern length
    #[inline]
    #[must_use]
    pub fn with_min_pattern_len(mut self, min: usize) -> Self {
        self.min_pattern_len = min;
        self
    }

    /// With hit factor
    #[inline]
    #[must_use]
    pub fn with_hit_factor(mut self, hit_factor: f32) -> Self {
        self.hit_factor = hit_factor;
        self
    }

    /// With all three workflow delays
    #[inline]
    #[must_use]
    pub fn with_delays(mut self, clear: Duration, confirm: Duration, finish: Duration) -> Self {
        self.clear_delay_ms = duration_ms(clear);
        self.confirm_delay_ms = duration_ms(confirm);
        self.finish_delay_ms = duration_ms(finish);
        self
    }

    /// Check every constraint
    ///
    /// # Errors
    /// Returns [`ConfigError::Invalid`] describing the first violation
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_pattern_len == 0 {
            return Err(ConfigError::Invalid(
                "min_pattern_len must be at least 1".to_string(),
            ));
        }
        if self.min_pattern_len > self.grid_size.cell_count() {
            return Err(ConfigError::Invalid(format!(
                "min_pattern_len {} exceeds the {} cells of a {} grid",
                self.min_pattern_len,
                self.grid_size.cell_count(),
                self.grid_size
            )));
        }
        if !(self.hit_factor.is_finite() && self.hit_factor > 0.0 && self.hit_factor <= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "hit_factor {} must be in (0, 1]",
                self.hit_factor
            )));
        }
        Ok(())
    }

    /// Apply the geometry settings to a grid
    #[must_use]
    pub fn configure_grid(&self, grid: Grid) -> Grid {
        let mut grid = grid.with_hit_factor(self.hit_factor);
        grid.resize(self.grid_size);
        grid
    }

    /// Auto-clear delay
    #[inline]
    #[must_use]
    pub fn clear_delay(&self) -> Duration {
        Duration::from_millis(self.clear_delay_ms)
    }

    /// Auto-advance delay
    #[inline]
    #[must_use]
    pub fn confirm_delay(&self) -> Duration {
        Duration::from_millis(self.confirm_delay_ms)
    }

    /// Finish delay
    #[inline]
    #[must_use]
    pub fn finish_delay(&self) -> Duration {
        Duration::from_millis(self.finish_delay_ms)
    }
}

impl Default for LockPatternConfig {
    fn default() -> Self {
        Self {
            grid_size: GridSize::DEFAULT,
            min_pattern_len: 4,
            hit_factor: Grid::DEFAULT_HIT_FACTOR,
            clear_delay_ms: 1000,
            confirm_delay_ms: 1000,
            finish_delay_ms: 250,
        }
    }
}

fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Viewport;

    #[test]
    fn defaults() {
        let config = LockPatternConfig::new();
        assert_eq!(config.grid_size.get(), 3);
        assert_eq!(config.min_pattern_len, 4);
        assert_eq!(config.clear_delay(), Duration::from_millis(1000));
        assert_eq!(config.finish_delay(), Duration::from_millis(250));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn toml_overrides_and_defaults() {
        let config = LockPatternConfig::from_toml_str(
            r#"
            grid_size = 4
            min_pattern_len = 6
            "#,
        )
        .unwrap();
        assert_eq!(config.grid_size.get(), 4);
        assert_eq!(config.min_pattern_len, 6);
        assert_eq!(config.confirm_delay_ms, 1000);
    }

    #[test]
    fn rejects_min_len_above_cell_count() {
        let err = LockPatternConfig::from_toml_str("grid_size = 2\nmin_pattern_len = 5").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_bad_grid_size_and_hit_factor() {
        assert!(matches!(
            LockPatternConfig::from_toml_str("grid_size = 9"),
            Err(ConfigError::Parse(_))
        ));
        assert!(LockPatternConfig::new().with_hit_factor(1.5).validate().is_err());
        assert!(LockPatternConfig::new().with_min_pattern_len(0).validate().is_err());
    }

    #[test]
    fn configure_grid_applies_size_and_hit_factor() {
        let config = LockPatternConfig::new()
            .with_grid_size(GridSize::new(4).unwrap())
            .with_hit_factor(0.8);
        let grid = config.configure_grid(Grid::new(GridSize::DEFAULT, Viewport::square(400.0).unwrap()));
        assert_eq!(grid.size().get(), 4);
        assert!((grid.hit_factor() - 0.8).abs() < f32::EPSILON);
    }
}
