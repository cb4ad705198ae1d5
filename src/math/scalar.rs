//! Scalar and sampling helpers.
//!
//! - **Decibels**: `20 * log10(x)` and its inverse
//! - **Sampling**: evenly spaced samples over a closed interval

/// Convert a magnitude to decibels.
///
/// Follows IEEE-754 logarithm semantics: `0` maps to `-inf` and negative
/// magnitudes map to NaN.
///
/// # Example
///
/// ```
/// use modal_vibs::math::mag2db;
///
/// assert_eq!(mag2db(1.0), 0.0);
/// assert_eq!(mag2db(10.0), 20.0);
/// ```
#[inline]
#[must_use]
pub fn mag2db(x: f64) -> f64 {
    20.0 * x.log10()
}

/// Convert decibels back to a magnitude.
///
/// Inverse of [`mag2db`].
#[inline]
#[must_use]
pub fn db2mag(db: f64) -> f64 {
    10f64.powf(db / 20.0)
}

/// `n` evenly spaced samples over `[start, stop]`, both ends included.
///
/// Returns an empty vector for `n == 0` and `[start]` for `n == 1`.
#[must_use]
pub fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (n - 1) as f64;
            (0..n)
                .map(|i| {
                    // Pin the last sample so the grid reaches `stop` exactly
                    if i == n - 1 {
                        stop
                    } else {
                        start + step * i as f64
                    }
                })
                .collect()
        }
    }
}
