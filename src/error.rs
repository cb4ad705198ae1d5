//! Error types for modal analysis operations.
//!
//! Shape incompatibilities and empty inputs fail fast. Degenerate numeric
//! input (e.g. a zero-norm mode shape) is not an error: it propagates as NaN.

use thiserror::Error;

/// Main error type for modal analysis operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModalError {
    /// Two mode sets (or vectors) do not share the same number of DOFs.
    #[error("Dimension mismatch: {left} DOFs vs {right} DOFs")]
    DimensionMismatch { left: usize, right: usize },

    /// A mode set has no DOFs or no modes.
    #[error("Empty mode set: {which} has shape {rows}x{cols}")]
    EmptyModeSet {
        which: &'static str,
        rows: usize,
        cols: usize,
    },

    /// Nearest-neighbour search over an empty point set.
    #[error("Point set is empty")]
    EmptyPointSet,

    /// Paired arrays have different lengths.
    #[error("Length mismatch: {expected} expected, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    /// Input validation errors.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Scattered points cannot be triangulated.
    #[error("Degenerate geometry: {0}")]
    DegenerateGeometry(String),

    /// Configuration validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type alias for modal analysis operations.
pub type Result<T> = std::result::Result<T, ModalError>;

impl ModalError {
    /// Create a dimension mismatch error.
    #[must_use]
    pub const fn dimension_mismatch(left: usize, right: usize) -> Self {
        Self::DimensionMismatch { left, right }
    }

    /// Create an empty mode set error.
    #[must_use]
    pub const fn empty_mode_set(which: &'static str, rows: usize, cols: usize) -> Self {
        Self::EmptyModeSet { which, rows, cols }
    }

    /// Create a length mismatch error.
    #[must_use]
    pub const fn length_mismatch(expected: usize, actual: usize) -> Self {
        Self::LengthMismatch { expected, actual }
    }

    /// Create an invalid input error.
    #[must_use]
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a degenerate geometry error.
    #[must_use]
    pub fn degenerate_geometry(msg: impl Into<String>) -> Self {
        Self::DegenerateGeometry(msg.into())
    }

    /// Create an invalid configuration error.
    #[must_use]
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}
