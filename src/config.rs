//! Configuration for modal comparison and surface interpolation.
//!
//! This module provides the [`ModalConfig`] struct which centralizes the
//! tunable parameters of mode pairing and mode shape surface gridding,
//! along with a few presets.
//!
//! # Example
//!
//! ```
//! use modal_vibs::{ModalConfig, TieBreak};
//!
//! let config = ModalConfig::default();
//! assert_eq!(config.tie_break, TieBreak::LowestIndex);
//!
//! let legacy = ModalConfig::legacy();
//! assert_eq!(legacy.tie_break, TieBreak::HighestIndex);
//! ```

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{ModalError, Result};

/// Configuration for modal comparison and surface interpolation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ModalConfig {
    /// Rule for choosing among equal MAC values when pairing modes.
    pub tie_break: TieBreak,

    /// Number of grid samples along x for surface interpolation.
    pub x_resolution: usize,

    /// Number of grid samples along y for surface interpolation.
    pub y_resolution: usize,

    /// Amplitude assigned to boundary (support) points.
    pub boundary_amplitude: f64,

    /// Barycentric slack when deciding whether a grid node lies inside a
    /// triangle. Keeps nodes on the convex hull from turning into NaN.
    pub hull_tolerance: f64,
}

/// Tie-break rule for best-match selection in mode pairing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TieBreak {
    /// Among equal maxima, the slave mode with the lowest index wins.
    #[default]
    LowestIndex,
    /// Among equal maxima, the slave mode with the highest index wins.
    /// Matches sorting a row ascending and taking the last entry.
    HighestIndex,
}

impl Default for ModalConfig {
    fn default() -> Self {
        Self {
            tie_break: TieBreak::LowestIndex,
            x_resolution: 50,
            y_resolution: 50,
            boundary_amplitude: 0.0,
            hull_tolerance: 1e-10,
        }
    }
}

impl ModalConfig {
    /// Create a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any parameter is out of valid range.
    pub fn validate(&self) -> Result<()> {
        if self.x_resolution < 2 {
            return Err(ModalError::invalid_config(
                "x_resolution must be at least 2",
            ));
        }
        if self.y_resolution < 2 {
            return Err(ModalError::invalid_config(
                "y_resolution must be at least 2",
            ));
        }
        if !self.boundary_amplitude.is_finite() {
            return Err(ModalError::invalid_config(
                "boundary_amplitude must be finite",
            ));
        }
        if !(self.hull_tolerance.is_finite() && self.hull_tolerance >= 0.0) {
            return Err(ModalError::invalid_config(
                "hull_tolerance must be finite and non-negative",
            ));
        }
        Ok(())
    }

    /// Preset reproducing the historical "sort ascending, take last" pairing.
    ///
    /// Equal MAC values resolve to the highest slave index. NaN entries are
    /// still never picked: a zero-norm master mode, whose MAC row is all NaN,
    /// stays unpaired, whereas the historical sort placed NaN last and so
    /// paired it with the final slave mode.
    #[must_use]
    pub fn legacy() -> Self {
        Self {
            tie_break: TieBreak::HighestIndex,
            ..Self::default()
        }
    }

    /// Preset for quick looks at large meshes.
    #[must_use]
    pub fn coarse() -> Self {
        Self {
            x_resolution: 20,
            y_resolution: 20,
            ..Self::default()
        }
    }

    /// Preset for publication-quality surfaces.
    #[must_use]
    pub fn fine() -> Self {
        Self {
            x_resolution: 200,
            y_resolution: 200,
            ..Self::default()
        }
    }

    /// Set the tie-break rule.
    #[must_use]
    pub const fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }

    /// Set the surface grid resolution.
    #[must_use]
    pub const fn with_resolution(mut self, x_resolution: usize, y_resolution: usize) -> Self {
        self.x_resolution = x_resolution;
        self.y_resolution = y_resolution;
        self
    }

    /// Set the amplitude assigned to boundary points.
    #[must_use]
    pub const fn with_boundary_amplitude(mut self, amplitude: f64) -> Self {
        self.boundary_amplitude = amplitude;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ModalConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.tie_break, TieBreak::LowestIndex);
        assert_eq!(config.x_resolution, 50);
        assert_eq!(config.y_resolution, 50);
        assert_eq!(config.boundary_amplitude, 0.0);
    }

    #[test]
    fn test_presets() {
        assert!(ModalConfig::legacy().validate().is_ok());
        assert_eq!(ModalConfig::legacy().tie_break, TieBreak::HighestIndex);
        assert_eq!(ModalConfig::coarse().x_resolution, 20);
        assert_eq!(ModalConfig::fine().y_resolution, 200);
    }

    #[test]
    fn test_validation() {
        let mut config = ModalConfig::default();

        config.x_resolution = 1;
        assert!(config.validate().is_err());

        config.x_resolution = 10;
        config.y_resolution = 0;
        assert!(config.validate().is_err());

        config.y_resolution = 10;
        config.boundary_amplitude = f64::NAN;
        assert!(config.validate().is_err());

        config.boundary_amplitude = 0.0;
        config.hull_tolerance = -1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_builder_pattern() {
        let config = ModalConfig::new()
            .with_tie_break(TieBreak::HighestIndex)
            .with_resolution(30, 40)
            .with_boundary_amplitude(0.5);
        assert_eq!(config.tie_break, TieBreak::HighestIndex);
        assert_eq!(config.x_resolution, 30);
        assert_eq!(config.y_resolution, 40);
        assert_eq!(config.boundary_amplitude, 0.5);
    }
}
