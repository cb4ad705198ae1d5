//! Linear algebra helpers shared by the MAC and pairing code.
//!
//! Everything here is generic over [`ComplexField`] with a real field of
//! `f64`, so the same code path handles real normal modes (`f64`) and
//! complex modes (`Complex64`).

use nalgebra::{ComplexField, DMatrix};

/// Hermitian (complex-conjugate) transpose of a matrix.
///
/// For real-valued input this is a plain transpose.
///
/// # Example
///
/// ```
/// use modal_vibs::math::hermitian;
/// use nalgebra::DMatrix;
/// use modal_vibs::Complex64;
///
/// let x = DMatrix::from_row_slice(1, 2, &[Complex64::new(1.0, 2.0), Complex64::new(0.0, -1.0)]);
/// let h = hermitian(&x);
/// assert_eq!(h.shape(), (2, 1));
/// assert_eq!(h[(0, 0)], Complex64::new(1.0, -2.0));
/// ```
#[must_use]
pub fn hermitian<T>(x: &DMatrix<T>) -> DMatrix<T>
where
    T: ComplexField,
{
    x.adjoint()
}

/// Hermitian self inner product `<conj(u_j), u_j>` of every column.
///
/// The value is real and non-negative; zero means an all-zero column.
#[must_use]
pub fn column_energies<T>(u: &DMatrix<T>) -> Vec<f64>
where
    T: ComplexField<RealField = f64>,
{
    u.column_iter().map(|c| c.norm_squared()).collect()
}

/// Copy of `u` with every column divided by its largest entry modulus.
///
/// Keeps inner products of very large or very small shapes inside the
/// floating-point range. All-zero and non-finite columns are left as they
/// are.
#[must_use]
pub fn scale_columns_to_unit_peak<T>(u: &DMatrix<T>) -> DMatrix<T>
where
    T: ComplexField<RealField = f64>,
{
    let mut scaled = u.clone();
    for mut col in scaled.column_iter_mut() {
        let peak = col.iter().map(|z| z.clone().modulus()).fold(0.0, f64::max);
        if peak > 0.0 && peak.is_finite() {
            col.unscale_mut(peak);
        }
    }
    scaled
}
