//! Master/slave mode pairing.
//!
//! Each mode of the master set `u1` is assigned the slave mode of `u2` with
//! the highest MAC. When several master modes claim the same slave mode only
//! the first claim is kept, so the result can be shorter than the number of
//! master modes.

use std::collections::HashSet;

use nalgebra::{ComplexField, DMatrix};
use tracing::{debug, warn};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::config::{ModalConfig, TieBreak};
use crate::error::Result;
use crate::mac::compute_mac;
use crate::math::stable_unique;

/// A retained master/slave assignment.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ModePair {
    /// Column index in the master set.
    pub master: usize,
    /// Column index in the slave set.
    pub slave: usize,
    /// MAC between the two modes.
    pub mac: f64,
}

/// Index of the largest value in `row`, ignoring NaN.
///
/// Returns `None` for an empty or all-NaN row.
#[allow(clippy::float_cmp)]
#[must_use]
pub fn best_match<I>(row: I, tie_break: TieBreak) -> Option<usize>
where
    I: IntoIterator<Item = f64>,
{
    let mut best: Option<(usize, f64)> = None;
    for (j, value) in row.into_iter().enumerate() {
        if value.is_nan() {
            continue;
        }
        best = match best {
            None => Some((j, value)),
            Some((_, current)) if value > current => Some((j, value)),
            Some((_, current)) if value == current && tie_break == TieBreak::HighestIndex => {
                Some((j, value))
            }
            keep => keep,
        };
    }
    best.map(|(j, _)| j)
}

/// Best-matching column for every row of a MAC matrix.
///
/// Rows whose entries are all NaN (zero-norm master modes) map to `None`.
#[must_use]
pub fn best_matches(mac: &DMatrix<f64>, tie_break: TieBreak) -> Vec<Option<usize>> {
    mac.row_iter()
        .map(|row| best_match(row.iter().copied(), tie_break))
        .collect()
}

/// Deduplicated pairs from an already computed MAC matrix.
///
/// Pairs come out in master order; a slave already claimed by an earlier
/// master is skipped.
#[must_use]
pub fn pair_from_mac(mac: &DMatrix<f64>, tie_break: TieBreak) -> Vec<ModePair> {
    let mut claimed = HashSet::with_capacity(mac.ncols());
    let mut pairs = Vec::with_capacity(mac.nrows());

    for (master, slave) in best_matches(mac, tie_break).into_iter().enumerate() {
        let Some(slave) = slave else {
            warn!(master, "mode has undefined MAC against every slave mode, left unpaired");
            continue;
        };
        if !claimed.insert(slave) {
            debug!(master, slave, "slave mode already claimed, dropping pair");
            continue;
        }
        pairs.push(ModePair {
            master,
            slave,
            mac: mac[(master, slave)],
        });
    }

    pairs
}

/// Pair the modes of `u1` (master) with those of `u2` (slave).
///
/// Uses the default [`TieBreak::LowestIndex`] rule.
///
/// # Returns
///
/// Indices into `u2`, one per paired master mode, in master order with
/// duplicates removed.
///
/// # Errors
///
/// Fails on DOF count mismatch or an empty mode set, see
/// [`compute_mac`](crate::compute_mac).
///
/// # Example
///
/// ```
/// use modal_vibs::pair_modes;
/// use nalgebra::DMatrix;
///
/// let u = DMatrix::from_row_slice(3, 2, &[1.0, 0.0, 0.0, 1.0, 1.0, 0.0]);
/// assert_eq!(pair_modes(&u, &u)?, vec![0, 1]);
/// # Ok::<(), modal_vibs::ModalError>(())
/// ```
pub fn pair_modes<T>(u1: &DMatrix<T>, u2: &DMatrix<T>) -> Result<Vec<usize>>
where
    T: ComplexField<RealField = f64>,
{
    pair_modes_with(u1, u2, &ModalConfig::default())
}

/// Pair modes using the tie-break rule from `config`.
///
/// # Errors
///
/// See [`pair_modes`].
pub fn pair_modes_with<T>(
    u1: &DMatrix<T>,
    u2: &DMatrix<T>,
    config: &ModalConfig,
) -> Result<Vec<usize>>
where
    T: ComplexField<RealField = f64>,
{
    let mac = compute_mac(u1, u2)?;
    let raw: Vec<usize> = best_matches(&mac, config.tie_break)
        .into_iter()
        .flatten()
        .collect();
    let paired = stable_unique(raw.iter().copied());

    debug!(
        n_master = mac.nrows(),
        n_paired = paired.len(),
        dropped = raw.len() - paired.len(),
        "paired modes"
    );

    Ok(paired)
}

/// Pair modes and report the MAC of each retained pair.
///
/// # Errors
///
/// See [`pair_modes`].
pub fn pair_modes_detailed<T>(
    u1: &DMatrix<T>,
    u2: &DMatrix<T>,
    config: &ModalConfig,
) -> Result<Vec<ModePair>>
where
    T: ComplexField<RealField = f64>,
{
    let mac = compute_mac(u1, u2)?;
    Ok(pair_from_mac(&mac, config.tie_break))
}
