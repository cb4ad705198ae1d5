//! Modal Assurance Criterion (MAC).
//!
//! The MAC between two mode shapes `u` and `v` is
//!
//! ```text
//! MAC(u, v) = (<conj(u), v> * <conj(v), u>) / (<conj(u), u> * <conj(v), v>)
//! ```
//!
//! i.e. the squared modulus of the Hermitian inner product normalized by both
//! column energies. It is 1 for shapes that are collinear up to a complex
//! scale factor and 0 for orthogonal shapes. A zero-norm shape gives `0 / 0`,
//! which is left as NaN ("undefined similarity") rather than raised.
//!
//! Mode shape matrices are `[n_dof x n_modes]`: rows are degrees of freedom,
//! columns are modes. Both real (`f64`) and complex (`Complex64`) entries
//! are accepted through the same generic code path.

use std::fmt;

use nalgebra::{ComplexField, DMatrix, DVector};
use tracing::debug;

use crate::config::TieBreak;
use crate::error::{ModalError, Result};
use crate::math::{column_energies, scale_columns_to_unit_peak};
use crate::pairing::{best_matches, pair_from_mac, ModePair};
use crate::render::IntensityImage;

/// Check that two mode sets are non-empty and share their DOF count.
pub(crate) fn check_mode_sets<T>(u1: &DMatrix<T>, u2: &DMatrix<T>) -> Result<()>
where
    T: ComplexField,
{
    if u1.is_empty() {
        return Err(ModalError::empty_mode_set("u1", u1.nrows(), u1.ncols()));
    }
    if u2.is_empty() {
        return Err(ModalError::empty_mode_set("u2", u2.nrows(), u2.ncols()));
    }
    if u1.nrows() != u2.nrows() {
        return Err(ModalError::dimension_mismatch(u1.nrows(), u2.nrows()));
    }
    Ok(())
}

/// Compute the MAC matrix between two mode sets.
///
/// # Arguments
///
/// * `u1` - First mode set, `[n_dof x n1]`
/// * `u2` - Second mode set, `[n_dof x n2]`
///
/// # Returns
///
/// Real `[n1 x n2]` matrix with entries in `[0, 1]`, or NaN where either
/// column has zero norm.
///
/// # Errors
///
/// Returns [`ModalError::DimensionMismatch`] if the DOF counts differ and
/// [`ModalError::EmptyModeSet`] if either set has no DOFs or no modes.
///
/// # Example
///
/// ```
/// use modal_vibs::compute_mac;
/// use nalgebra::DMatrix;
///
/// let u1 = DMatrix::from_row_slice(2, 1, &[1.0, 0.0]);
/// let u2 = DMatrix::from_row_slice(2, 1, &[0.0, 1.0]);
/// let m = compute_mac(&u1, &u2)?;
/// assert_eq!(m[(0, 0)], 0.0);
/// # Ok::<(), modal_vibs::ModalError>(())
/// ```
pub fn compute_mac<T>(u1: &DMatrix<T>, u2: &DMatrix<T>) -> Result<DMatrix<f64>>
where
    T: ComplexField<RealField = f64>,
{
    check_mode_sets(u1, u2)?;

    let mac = mac_matrix(u1, u2);

    debug!(
        n_dof = u1.nrows(),
        n_modes1 = u1.ncols(),
        n_modes2 = u2.ncols(),
        undefined = mac.iter().filter(|v| v.is_nan()).count(),
        "computed MAC matrix"
    );

    Ok(mac)
}

/// MAC value of a single pair of mode shape vectors.
///
/// # Errors
///
/// Returns an error if the vectors differ in length or are empty.
pub fn mac_single<T>(u: &DVector<T>, v: &DVector<T>) -> Result<f64>
where
    T: ComplexField<RealField = f64>,
{
    if u.is_empty() {
        return Err(ModalError::empty_mode_set("u", 0, 1));
    }
    if v.is_empty() {
        return Err(ModalError::empty_mode_set("v", 0, 1));
    }
    if u.len() != v.len() {
        return Err(ModalError::dimension_mismatch(u.len(), v.len()));
    }

    let u = DMatrix::from_column_slice(u.len(), 1, u.as_slice());
    let v = DMatrix::from_column_slice(v.len(), 1, v.as_slice());
    Ok(mac_matrix(&u, &v)[(0, 0)])
}

/// MAC of every column pair of two checked mode sets.
fn mac_matrix<T>(u1: &DMatrix<T>, u2: &DMatrix<T>) -> DMatrix<f64>
where
    T: ComplexField<RealField = f64>,
{
    // MAC is scale invariant per column; unit peaks keep the products finite
    let u1 = scale_columns_to_unit_peak(u1);
    let u2 = scale_columns_to_unit_peak(u2);

    // Self products only depend on one column, compute them once
    let energies1 = column_energies(&u1);
    let energies2 = column_energies(&u2);

    DMatrix::from_fn(u1.ncols(), u2.ncols(), |i, j| {
        let cross = u1.column(i).dotc(&u2.column(j));
        normalize(cross.modulus_squared(), energies1[i] * energies2[j])
    })
}

/// `num / den`, clamped into `[0, 1]` against rounding. NaN passes through.
#[inline]
fn normalize(num: f64, den: f64) -> f64 {
    (num / den).clamp(0.0, 1.0)
}

/// A computed MAC matrix.
///
/// Holds only the result, not the mode sets it was computed from.
/// Presentation lives in [`IntensityImage`] and the [`fmt::Display`] impl.
#[derive(Debug, Clone, PartialEq)]
pub struct ModalAssurance {
    matrix: DMatrix<f64>,
}

impl ModalAssurance {
    /// Compute the MAC between two mode sets.
    ///
    /// # Errors
    ///
    /// See [`compute_mac`].
    pub fn new<T>(u1: &DMatrix<T>, u2: &DMatrix<T>) -> Result<Self>
    where
        T: ComplexField<RealField = f64>,
    {
        compute_mac(u1, u2).map(Self::from_matrix)
    }

    /// Wrap an already computed MAC matrix.
    #[must_use]
    pub const fn from_matrix(matrix: DMatrix<f64>) -> Self {
        Self { matrix }
    }

    /// The underlying `[n1 x n2]` matrix.
    #[must_use]
    pub const fn matrix(&self) -> &DMatrix<f64> {
        &self.matrix
    }

    /// Consume and return the underlying matrix.
    #[must_use]
    pub fn into_matrix(self) -> DMatrix<f64> {
        self.matrix
    }

    /// `(n1, n2)`.
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        self.matrix.shape()
    }

    /// MAC between mode `i` of the first set and mode `j` of the second.
    #[must_use]
    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        self.matrix.get((i, j)).copied()
    }

    /// Leading diagonal, `min(n1, n2)` entries.
    ///
    /// For a set compared against itself every entry is 1.
    #[must_use]
    pub fn diagonal(&self) -> Vec<f64> {
        self.matrix.diagonal().iter().copied().collect()
    }

    /// Best-matching column for every row (see [`best_matches`]).
    #[must_use]
    pub fn best_matches(&self, tie_break: TieBreak) -> Vec<Option<usize>> {
        best_matches(&self.matrix, tie_break)
    }

    /// Deduplicated master/slave pairs (see [`pair_from_mac`]).
    #[must_use]
    pub fn pairs(&self, tie_break: TieBreak) -> Vec<ModePair> {
        pair_from_mac(&self.matrix, tie_break)
    }

    /// Intensity image of the matrix, one pixel per entry.
    #[must_use]
    pub fn image(&self) -> IntensityImage {
        IntensityImage::from_mac(&self.matrix)
    }
}

impl fmt::Display for ModalAssurance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Modal Assurance Criterion:\n{}", self.matrix)
    }
}
