//! Exact nearest-neighbour search for snapping coordinates.
//!
//! [`KdTree`] answers exact Euclidean nearest-neighbour queries over
//! `[f64; D]` points. Ties are broken towards the lowest point index, so the
//! result never depends on how the tree happened to split equal coordinates.
//!
//! The scalar helpers ([`search_scalar`], [`snap_scalar`]) scan a plain
//! slice and agree with the `D = 1` tree, ties included.

use std::cmp::Ordering;

use tracing::trace;

use crate::error::{ModalError, Result};

#[derive(Debug, Clone, Copy)]
struct Node {
    point: usize,
    axis: usize,
    left: Option<usize>,
    right: Option<usize>,
}

/// Static KD-tree over a set of points.
///
/// # Example
///
/// ```
/// use modal_vibs::KdTree;
///
/// let tree = KdTree::new(&[[0.0, 0.0], [1.0, 0.0], [0.0, 2.0]])?;
/// assert_eq!(tree.nearest_index(&[0.9, 0.2])?, 1);
/// # Ok::<(), modal_vibs::ModalError>(())
/// ```
#[derive(Debug, Clone)]
pub struct KdTree<const D: usize> {
    points: Vec<[f64; D]>,
    nodes: Vec<Node>,
    root: usize,
}

impl<const D: usize> KdTree<D> {
    /// Build a tree over `points`.
    ///
    /// # Errors
    ///
    /// Returns [`ModalError::EmptyPointSet`] for an empty set and
    /// [`ModalError::InvalidInput`] for zero-dimensional points or
    /// non-finite coordinates.
    pub fn new(points: &[[f64; D]]) -> Result<Self> {
        if points.is_empty() {
            return Err(ModalError::EmptyPointSet);
        }
        if D == 0 {
            return Err(ModalError::invalid_input("points must have at least one dimension"));
        }
        if let Some(i) = points.iter().position(|p| p.iter().any(|c| !c.is_finite())) {
            return Err(ModalError::invalid_input(format!(
                "point {i} has a non-finite coordinate"
            )));
        }

        let mut indices: Vec<usize> = (0..points.len()).collect();
        let mut nodes = Vec::with_capacity(points.len());
        let root = Self::build(points, &mut indices, 0, &mut nodes)
            .ok_or(ModalError::EmptyPointSet)?;

        trace!(n_points = points.len(), dim = D, "built KD-tree");

        Ok(Self {
            points: points.to_vec(),
            nodes,
            root,
        })
    }

    fn build(
        points: &[[f64; D]],
        indices: &mut [usize],
        depth: usize,
        nodes: &mut Vec<Node>,
    ) -> Option<usize> {
        if indices.is_empty() {
            return None;
        }

        let axis = depth % D;
        let mid = indices.len() / 2;
        indices.select_nth_unstable_by(mid, |&a, &b| {
            points[a][axis].total_cmp(&points[b][axis]).then(a.cmp(&b))
        });

        let id = nodes.len();
        nodes.push(Node {
            point: indices[mid],
            axis,
            left: None,
            right: None,
        });

        let (lower, rest) = indices.split_at_mut(mid);
        let left = Self::build(points, lower, depth + 1, nodes);
        let right = Self::build(points, &mut rest[1..], depth + 1, nodes);
        nodes[id].left = left;
        nodes[id].right = right;

        Some(id)
    }

    /// Number of points in the tree.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false: construction rejects empty sets.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The indexed points, in their original order.
    #[must_use]
    pub fn points(&self) -> &[[f64; D]] {
        &self.points
    }

    /// Index of and Euclidean distance to the point nearest `query`.
    ///
    /// # Errors
    ///
    /// Returns [`ModalError::InvalidInput`] if `query` has a non-finite
    /// coordinate.
    pub fn nearest(&self, query: &[f64; D]) -> Result<(usize, f64)> {
        if query.iter().any(|c| !c.is_finite()) {
            return Err(ModalError::invalid_input(
                "query has a non-finite coordinate",
            ));
        }

        let mut best = (usize::MAX, f64::INFINITY);
        self.descend(Some(self.root), query, &mut best);
        Ok((best.0, best.1.sqrt()))
    }

    /// Index of the point nearest `query`.
    ///
    /// # Errors
    ///
    /// See [`KdTree::nearest`].
    pub fn nearest_index(&self, query: &[f64; D]) -> Result<usize> {
        self.nearest(query).map(|(i, _)| i)
    }

    /// The point nearest `query`.
    ///
    /// # Errors
    ///
    /// See [`KdTree::nearest`].
    pub fn snap(&self, query: &[f64; D]) -> Result<[f64; D]> {
        self.nearest_index(query).map(|i| self.points[i])
    }

    fn descend(&self, node: Option<usize>, query: &[f64; D], best: &mut (usize, f64)) {
        let Some(id) = node else {
            return;
        };
        let node = self.nodes[id];
        let p = &self.points[node.point];

        let d2 = squared_distance(p, query);
        let closer = match d2.total_cmp(&best.1) {
            Ordering::Less => true,
            Ordering::Equal => node.point < best.0,
            Ordering::Greater => false,
        };
        if closer {
            *best = (node.point, d2);
        }

        let diff = query[node.axis] - p[node.axis];
        let (near, far) = if diff < 0.0 {
            (node.left, node.right)
        } else {
            (node.right, node.left)
        };

        self.descend(near, query, best);
        // Points on the far side are at least |diff| away; equal distances
        // are still visited so a lower index can win the tie
        if diff * diff <= best.1 {
            self.descend(far, query, best);
        }
    }
}

#[inline]
fn squared_distance<const D: usize>(a: &[f64; D], b: &[f64; D]) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y) * (x - y)).sum()
}

/// Index of the point in `points` nearest to `query`.
///
/// # Errors
///
/// See [`KdTree::new`] and [`KdTree::nearest`].
pub fn search<const D: usize>(points: &[[f64; D]], query: &[f64; D]) -> Result<usize> {
    KdTree::new(points)?.nearest_index(query)
}

/// Snap `query` to the nearest point in `points`.
///
/// # Errors
///
/// See [`KdTree::new`] and [`KdTree::nearest`].
pub fn snap<const D: usize>(points: &[[f64; D]], query: &[f64; D]) -> Result<[f64; D]> {
    let idx = search(points, query)?;
    Ok(points[idx])
}

/// Index of the value in `values` nearest to `value`.
///
/// # Errors
///
/// Returns an error for an empty slice or non-finite input.
///
/// # Example
///
/// ```
/// use modal_vibs::search_scalar;
///
/// assert_eq!(search_scalar(&[1.0, 5.0, 9.0], 4.0)?, 1);
/// # Ok::<(), modal_vibs::ModalError>(())
/// ```
pub fn search_scalar(values: &[f64], value: f64) -> Result<usize> {
    if values.is_empty() {
        return Err(ModalError::EmptyPointSet);
    }
    if let Some(i) = values.iter().position(|v| !v.is_finite()) {
        return Err(ModalError::invalid_input(format!(
            "value {i} is not finite"
        )));
    }
    if !value.is_finite() {
        return Err(ModalError::invalid_input("query is not finite"));
    }

    // Squared difference keeps rounding identical to the tree path
    let mut best = (0, (values[0] - value) * (values[0] - value));
    for (i, v) in values.iter().enumerate().skip(1) {
        let d = (v - value) * (v - value);
        if d < best.1 {
            best = (i, d);
        }
    }
    Ok(best.0)
}

/// Snap `value` to the nearest entry of `values`.
///
/// # Errors
///
/// See [`search_scalar`].
pub fn snap_scalar(values: &[f64], value: f64) -> Result<f64> {
    search_scalar(values, value).map(|i| values[i])
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Brute-force reference: lowest index among the minimum distances.
    fn brute_force<const D: usize>(points: &[[f64; D]], query: &[f64; D]) -> usize {
        let mut best = (0, f64::INFINITY);
        for (i, p) in points.iter().enumerate() {
            let d = squared_distance(p, query);
            if d < best.1 {
                best = (i, d);
            }
        }
        best.0
    }

    /// Deterministic pseudo-random coordinates in `[-10, 10)`.
    fn lcg_points<const D: usize>(n: usize, seed: u64) -> Vec<[f64; D]> {
        let mut state = seed;
        let mut next = move || {
            state = state
                .wrapping_mul(6_364_136_223_846_793_005)
                .wrapping_add(1_442_695_040_888_963_407);
            ((state >> 11) as f64 / (1u64 << 53) as f64) * 20.0 - 10.0
        };
        (0..n).map(|_| std::array::from_fn(|_| next())).collect()
    }

    #[test]
    fn test_scalar_snap_and_search() {
        let values = [1.0, 5.0, 9.0];
        assert_eq!(snap_scalar(&values, 4.0).unwrap(), 5.0);
        assert_eq!(search_scalar(&values, 4.0).unwrap(), 1);
        assert_eq!(snap_scalar(&values, -100.0).unwrap(), 1.0);
        assert_eq!(snap_scalar(&values, 100.0).unwrap(), 9.0);
    }

    #[test]
    fn test_tree_snap_and_search_1d() {
        let points = [[1.0], [5.0], [9.0]];
        assert_eq!(snap(&points, &[4.0]).unwrap(), [5.0]);
        assert_eq!(search(&points, &[4.0]).unwrap(), 1);
    }

    #[test]
    fn test_ties_pick_lowest_index() {
        // 3.0 is equidistant from 1.0 and 5.0
        assert_eq!(search_scalar(&[5.0, 1.0, 5.0], 3.0).unwrap(), 0);
        assert_eq!(search(&[[5.0], [1.0], [5.0]], &[3.0]).unwrap(), 0);

        let square = [[1.0, 1.0], [-1.0, 1.0], [-1.0, -1.0], [1.0, -1.0]];
        assert_eq!(search(&square, &[0.0, 0.0]).unwrap(), 0);
        let duplicates = [[2.0, 2.0], [0.0, 0.0], [0.0, 0.0]];
        assert_eq!(search(&duplicates, &[0.1, 0.0]).unwrap(), 1);
    }

    #[test]
    fn test_scalar_matches_tree() {
        let values: Vec<f64> = lcg_points::<1>(200, 7).into_iter().map(|p| p[0]).collect();
        let points: Vec<[f64; 1]> = values.iter().map(|&v| [v]).collect();
        let tree = KdTree::new(&points).unwrap();
        for q in lcg_points::<1>(100, 99) {
            assert_eq!(search_scalar(&values, q[0]).unwrap(), tree.nearest_index(&q).unwrap());
        }
    }

    #[test]
    fn test_tree_matches_brute_force_3d() {
        let points = lcg_points::<3>(500, 42);
        let tree = KdTree::new(&points).unwrap();
        assert_eq!(tree.len(), 500);
        for q in lcg_points::<3>(200, 1234) {
            assert_eq!(tree.nearest_index(&q).unwrap(), brute_force(&points, &q));
        }
    }

    #[test]
    fn test_nearest_distance() {
        let tree = KdTree::new(&[[0.0, 0.0], [3.0, 4.0]]).unwrap();
        let (idx, dist) = tree.nearest(&[3.0, 5.0]).unwrap();
        assert_eq!(idx, 1);
        assert!((dist - 1.0).abs() < 1e-12);
        assert_eq!(tree.snap(&[0.2, -0.1]).unwrap(), [0.0, 0.0]);
    }

    #[test]
    fn test_invalid_inputs() {
        let empty: [[f64; 2]; 0] = [];
        assert_eq!(KdTree::new(&empty).unwrap_err(), ModalError::EmptyPointSet);
        assert!(KdTree::new(&[[f64::NAN, 0.0]]).is_err());
        let tree = KdTree::new(&[[0.0, 0.0]]).unwrap();
        assert!(tree.nearest(&[f64::INFINITY, 0.0]).is_err());

        assert_eq!(search_scalar(&[], 1.0).unwrap_err(), ModalError::EmptyPointSet);
        assert!(search_scalar(&[1.0], f64::NAN).is_err());
    }
}
