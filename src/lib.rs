//! Modal Analysis Utilities
//!
//! Numerical tools for comparing and inspecting structural mode shapes.
//!
//! Mode shape matrices are `[n_dof x n_modes]` ([`nalgebra::DMatrix`]):
//! rows are degrees of freedom, columns are modes. Real normal modes (`f64`)
//! and complex modes ([`Complex64`], re-exported from `num-complex`) go
//! through the same code.
//!
//! # Features
//!
//! - **MAC**: Modal Assurance Criterion matrix between two mode sets
//! - **Mode pairing**: master/slave best-match assignment, deduplicated
//! - **Snapping**: exact nearest-neighbour search over n-dimensional points
//! - **Surfaces**: gridded interpolation of a mode shape for 3D plotting
//! - **Rendering**: MAC matrices as intensity images
//!
//! # Quick Start
//!
//! ```
//! use modal_vibs::{compute_mac, pair_modes};
//! use nalgebra::DMatrix;
//!
//! // Two measured mode sets on the same 3 DOFs
//! let test = DMatrix::from_row_slice(3, 2, &[
//!     1.0, 0.1,
//!     0.9, -0.8,
//!     0.8, 1.0,
//! ]);
//! let model = DMatrix::from_row_slice(3, 2, &[
//!     0.0, 1.0,
//!     -1.0, 1.0,
//!     1.0, 1.0,
//! ]);
//!
//! let mac = compute_mac(&test, &model)?;
//! assert_eq!(mac.shape(), (2, 2));
//!
//! // Test mode 0 looks like model mode 1 and vice versa
//! assert_eq!(pair_modes(&test, &model)?, vec![1, 0]);
//! # Ok::<(), modal_vibs::ModalError>(())
//! ```

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::similar_names)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]

pub mod config;
pub mod error;
pub mod mac;
pub mod math;
pub mod pairing;
pub mod render;
pub mod spatial;
pub mod surface;
pub mod triangulation;

// Re-exports for convenient access
pub use config::{ModalConfig, TieBreak};
pub use error::{ModalError, Result};
pub use mac::{compute_mac, mac_single, ModalAssurance};
pub use math::{db2mag, hermitian, mag2db, stable_unique};
pub use num_complex::Complex64;
pub use pairing::{
    best_match, best_matches, pair_from_mac, pair_modes, pair_modes_detailed, pair_modes_with,
    ModePair,
};
pub use render::IntensityImage;
pub use spatial::{search, search_scalar, snap, snap_scalar, KdTree};
pub use surface::{interpolate_surface, SurfaceGrid};
pub use triangulation::Triangulation;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::DMatrix;
    use std::f64::consts::PI;

    /// Cantilever-like shapes sampled along a beam, with a little noise.
    fn shapes(n_dof: usize, n_modes: usize, noise: f64) -> DMatrix<f64> {
        DMatrix::from_fn(n_dof, n_modes, |i, j| {
            let x = (i + 1) as f64 / n_dof as f64;
            let k = (2 * j + 1) as f64 * PI / 2.0;
            (k * x).sin() + noise * ((i * 7 + j * 3) as f64).cos()
        })
    }

    #[test]
    fn test_full_pipeline() {
        let analytical = shapes(24, 4, 0.0);
        let measured = shapes(24, 4, 0.02);

        let mac = ModalAssurance::new(&measured, &analytical).unwrap();
        assert_eq!(mac.shape(), (4, 4));
        for d in mac.diagonal() {
            assert!(d > 0.95, "diagonal MAC too low: {}", d);
        }

        let pairs = mac.pairs(TieBreak::LowestIndex);
        let slaves: Vec<usize> = pairs.iter().map(|p| p.slave).collect();
        assert_eq!(slaves, pair_modes(&measured, &analytical).unwrap());
        assert_eq!(slaves, vec![0, 1, 2, 3]);

        let image = mac.image();
        assert_eq!(image.to_ascii().lines().count(), 4);
    }

    #[test]
    fn test_complex_modes_through_reexport() {
        let real = shapes(12, 3, 0.01);
        let complex = real.map(|v| Complex64::from_polar(v, 0.7));
        assert_eq!(pair_modes(&complex, &real.map(Complex64::from)).unwrap(), vec![0, 1, 2]);

        let mac = compute_mac(&complex, &complex).unwrap();
        for i in 0..3 {
            assert!((mac[(i, i)] - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
