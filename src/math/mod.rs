//! Mathematical utilities for modal analysis.
//!
//! This module provides:
//! - [`linalg`]: Hermitian transpose, column inner products and rescaling
//! - [`scalar`]: decibel conversion and linear sampling
//! - [`sequence`]: order-preserving deduplication

pub mod linalg;
pub mod scalar;
pub mod sequence;

pub use linalg::{column_energies, hermitian, scale_columns_to_unit_peak};
pub use scalar::{db2mag, linspace, mag2db};
pub use sequence::stable_unique;
