//! Gridded mode shape surfaces.
//!
//! Turns scattered measurement points with a vertical modal amplitude into a
//! regular grid suitable for a 3D surface or contour plot. Boundary (support)
//! points are appended with a fixed amplitude, the combined set is
//! triangulated, and every grid node inside the convex hull is linearly
//! interpolated. Nodes outside the hull are NaN.
//!
//! # Example
//!
//! ```
//! use modal_vibs::{interpolate_surface, ModalConfig};
//!
//! let coords = [[0.5, 0.5]];
//! let amplitudes = [1.0];
//! let supports = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];
//!
//! let config = ModalConfig::default().with_resolution(3, 3);
//! let surface = interpolate_surface(&coords, &amplitudes, &supports, &config)?;
//! assert_eq!(surface.value_at(1, 1), Some(1.0));
//! assert_eq!(surface.z_limits(), Some((0.0, 1.0)));
//! # Ok::<(), modal_vibs::ModalError>(())
//! ```

use nalgebra::DMatrix;
use tracing::debug;

use crate::config::ModalConfig;
use crate::error::{ModalError, Result};
use crate::math::linspace;
use crate::triangulation::{bounds, Triangulation};

/// Interpolated mode shape on a regular grid.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceGrid {
    /// Grid x coordinates, ascending.
    pub x: Vec<f64>,
    /// Grid y coordinates, ascending.
    pub y: Vec<f64>,
    /// Amplitudes, `[y.len() x x.len()]`: row `r`, column `c` is the node
    /// at `(x[c], y[r])`. NaN outside the convex hull.
    pub z: DMatrix<f64>,
    /// Measurement and boundary point positions, for plotting markers.
    pub markers: Vec<[f64; 2]>,
}

impl SurfaceGrid {
    /// `(min, max)` of the x axis.
    #[must_use]
    pub fn x_limits(&self) -> (f64, f64) {
        axis_limits(&self.x)
    }

    /// `(min, max)` of the y axis.
    #[must_use]
    pub fn y_limits(&self) -> (f64, f64) {
        axis_limits(&self.y)
    }

    /// `(min, max)` of the defined amplitudes, `None` if every node is NaN.
    #[must_use]
    pub fn z_limits(&self) -> Option<(f64, f64)> {
        self.z
            .iter()
            .filter(|v| !v.is_nan())
            .fold(None, |acc, &v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((f64::min(lo, v), f64::max(hi, v))),
            })
    }

    /// Amplitude at grid row `row` (y index) and column `col` (x index).
    #[must_use]
    pub fn value_at(&self, row: usize, col: usize) -> Option<f64> {
        self.z.get((row, col)).copied()
    }

    /// Number of grid nodes that fell inside the hull.
    #[must_use]
    pub fn defined_count(&self) -> usize {
        self.z.iter().filter(|v| !v.is_nan()).count()
    }
}

fn axis_limits(axis: &[f64]) -> (f64, f64) {
    match (axis.first(), axis.last()) {
        (Some(&lo), Some(&hi)) => (lo, hi),
        _ => (f64::NAN, f64::NAN),
    }
}

/// Interpolate a mode shape onto a regular grid.
///
/// # Arguments
///
/// * `coords` - Plan-view `(x, y)` positions of the measured DOFs
/// * `amplitudes` - Vertical modal amplitude at each position
/// * `boundary` - Support positions, pinned to `config.boundary_amplitude`
/// * `config` - Grid resolution, boundary amplitude and hull tolerance
///
/// # Errors
///
/// Fails on an invalid configuration, a length mismatch between `coords` and
/// `amplitudes`, non-finite input, or geometry that cannot be triangulated.
pub fn interpolate_surface(
    coords: &[[f64; 2]],
    amplitudes: &[f64],
    boundary: &[[f64; 2]],
    config: &ModalConfig,
) -> Result<SurfaceGrid> {
    config.validate()?;

    if coords.len() != amplitudes.len() {
        return Err(ModalError::length_mismatch(coords.len(), amplitudes.len()));
    }
    if let Some(i) = amplitudes.iter().position(|a| !a.is_finite()) {
        return Err(ModalError::invalid_input(format!(
            "amplitude {i} is not finite"
        )));
    }

    let mut points = Vec::with_capacity(coords.len() + boundary.len());
    points.extend_from_slice(coords);
    points.extend_from_slice(boundary);

    let mut values = Vec::with_capacity(points.len());
    values.extend_from_slice(amplitudes);
    values.resize(points.len(), config.boundary_amplitude);

    let triangulation = Triangulation::new(&points)?;

    let (min, max) = bounds(&points);
    let x = linspace(min[0], max[0], config.x_resolution);
    let y = linspace(min[1], max[1], config.y_resolution);

    let mut z = DMatrix::from_element(y.len(), x.len(), f64::NAN);
    for (r, &yr) in y.iter().enumerate() {
        for (c, &xc) in x.iter().enumerate() {
            let value = triangulation.interpolate(&values, [xc, yr], config.hull_tolerance)?;
            if let Some(v) = value {
                z[(r, c)] = v;
            }
        }
    }

    let surface = SurfaceGrid {
        x,
        y,
        z,
        markers: points,
    };

    debug!(
        n_measured = coords.len(),
        n_boundary = boundary.len(),
        x_resolution = config.x_resolution,
        y_resolution = config.y_resolution,
        defined = surface.defined_count(),
        "interpolated mode shape surface"
    );

    Ok(surface)
}
