//! Planar Delaunay triangulation of scattered points.
//!
//! Built incrementally with the Bowyer–Watson algorithm: triangles in
//! conflict with a new point are removed and the resulting cavity is
//! re-fanned from that point. The hull is closed off by ghost triangles
//! sharing a vertex at infinity. A ghost triangle conflicts with every point
//! beyond its hull edge, so the real triangles always tile exactly the convex
//! hull, however flat its edges are.

use std::collections::HashSet;

use tracing::debug;

use crate::error::{ModalError, Result};

/// Vertex index of the point at infinity.
const GHOST: usize = usize::MAX;

/// Twice the signed area of `(a, b, c)`; positive when counter-clockwise.
#[inline]
fn orient(a: [f64; 2], b: [f64; 2], c: [f64; 2]) -> f64 {
    (b[0] - a[0]) * (c[1] - a[1]) - (b[1] - a[1]) * (c[0] - a[0])
}

/// Positive when `d` lies strictly inside the circumcircle of the
/// counter-clockwise triangle `(a, b, c)`.
fn incircle(a: [f64; 2], b: [f64; 2], c: [f64; 2], d: [f64; 2]) -> f64 {
    let (adx, ady) = (a[0] - d[0], a[1] - d[1]);
    let (bdx, bdy) = (b[0] - d[0], b[1] - d[1]);
    let (cdx, cdy) = (c[0] - d[0], c[1] - d[1]);

    (adx * adx + ady * ady) * (bdx * cdy - cdx * bdy)
        - (bdx * bdx + bdy * bdy) * (adx * cdy - cdx * ady)
        + (cdx * cdx + cdy * cdy) * (adx * bdy - bdx * ady)
}

/// Whether `p` invalidates the counter-clockwise triangle `tri`.
///
/// Ghost triangles are stored as `[u, v, GHOST]` with the outside of hull
/// edge `u -> v` on its left. They conflict with points strictly outside
/// that edge, or on the open segment itself.
fn in_conflict(tri: [usize; 3], points: &[[f64; 2]], p: [f64; 2]) -> bool {
    if tri[2] == GHOST {
        let (u, v) = (points[tri[0]], points[tri[1]]);
        let side = orient(u, v, p);
        side > 0.0
            || (side == 0.0
                && (p[0] - u[0]) * (v[0] - u[0]) + (p[1] - u[1]) * (v[1] - u[1]) > 0.0
                && (p[0] - v[0]) * (u[0] - v[0]) + (p[1] - v[1]) * (u[1] - v[1]) > 0.0)
    } else {
        let [a, b, c] = tri.map(|k| points[k]);
        incircle(a, b, c, p) > 0.0
    }
}

/// Rotate a triangle so the ghost vertex, if any, comes last.
#[inline]
fn ghost_last([a, b, c]: [usize; 3]) -> [usize; 3] {
    if a == GHOST {
        [b, c, a]
    } else if b == GHOST {
        [c, a, b]
    } else {
        [a, b, c]
    }
}

/// Delaunay triangulation of a planar point set.
///
/// Triangle vertices index into the point slice given to
/// [`Triangulation::new`] and are ordered counter-clockwise. Exact duplicate
/// points are triangulated once, through their first occurrence.
#[derive(Debug, Clone)]
pub struct Triangulation {
    points: Vec<[f64; 2]>,
    triangles: Vec<[usize; 3]>,
}

impl Triangulation {
    /// Triangulate `points`.
    ///
    /// # Errors
    ///
    /// Returns [`ModalError::InvalidInput`] for non-finite coordinates and
    /// [`ModalError::DegenerateGeometry`] when fewer than three distinct
    /// points are given or all points are collinear.
    pub fn new(points: &[[f64; 2]]) -> Result<Self> {
        if let Some(i) = points.iter().position(|p| !(p[0].is_finite() && p[1].is_finite())) {
            return Err(ModalError::invalid_input(format!(
                "point {i} has a non-finite coordinate"
            )));
        }

        // `+ 0.0` folds -0.0 into 0.0 so both spellings count as one point
        let mut seen = HashSet::with_capacity(points.len());
        let distinct: Vec<usize> = (0..points.len())
            .filter(|&i| seen.insert(points[i].map(|c| (c + 0.0).to_bits())))
            .collect();

        if distinct.len() < 3 {
            return Err(ModalError::degenerate_geometry(format!(
                "need at least 3 distinct points, got {}",
                distinct.len()
            )));
        }

        // Seed with the first non-collinear triple
        let (a, b) = (distinct[0], distinct[1]);
        let c = distinct[2..]
            .iter()
            .copied()
            .find(|&k| orient(points[a], points[b], points[k]) != 0.0)
            .ok_or_else(|| ModalError::degenerate_geometry("all points are collinear"))?;
        let [a, b, c] = if orient(points[a], points[b], points[c]) > 0.0 {
            [a, b, c]
        } else {
            [a, c, b]
        };

        let mut triangles = vec![[a, b, c], [b, a, GHOST], [c, b, GHOST], [a, c, GHOST]];

        for &i in distinct.iter().filter(|&&k| k != a && k != b && k != c) {
            let p = points[i];

            let (bad, good): (Vec<[usize; 3]>, Vec<[usize; 3]>) = triangles
                .into_iter()
                .partition(|&t| in_conflict(t, points, p));

            // Cavity boundary: directed edges whose twin was not removed
            let edges: Vec<(usize, usize)> = bad
                .iter()
                .flat_map(|&[x, y, z]| [(x, y), (y, z), (z, x)])
                .collect();
            let removed: HashSet<(usize, usize)> = edges.iter().copied().collect();

            triangles = good;
            triangles.extend(
                edges
                    .into_iter()
                    .filter(|&(x, y)| !removed.contains(&(y, x)))
                    .map(|(x, y)| ghost_last([x, y, i])),
            );
        }

        let triangles: Vec<[usize; 3]> = triangles
            .into_iter()
            .filter(|t| t[2] != GHOST)
            .filter(|t| orient(points[t[0]], points[t[1]], points[t[2]]) != 0.0)
            .collect();

        debug!(
            n_points = points.len(),
            n_distinct = distinct.len(),
            n_triangles = triangles.len(),
            "triangulated scattered points"
        );

        Ok(Self {
            points: points.to_vec(),
            triangles,
        })
    }

    /// Total area covered by the triangles.
    ///
    /// Equals the area of the convex hull of the points.
    #[must_use]
    pub fn area(&self) -> f64 {
        self.triangles
            .iter()
            .map(|t| 0.5 * orient(self.points[t[0]], self.points[t[1]], self.points[t[2]]).abs())
            .sum()
    }


    /// The triangulated points.
    #[must_use]
    pub fn points(&self) -> &[[f64; 2]] {
        &self.points
    }

    /// Triangles as vertex index triples.
    #[must_use]
    pub fn triangles(&self) -> &[[usize; 3]] {
        &self.triangles
    }

    /// Find a triangle containing `query`.
    ///
    /// Returns the triangle's vertex indices and the barycentric weights of
    /// `query` with respect to them. A weight may dip to `-tolerance` so that
    /// points on the hull are still located.
    #[must_use]
    pub fn locate(&self, query: [f64; 2], tolerance: f64) -> Option<([usize; 3], [f64; 3])> {
        self.triangles.iter().find_map(|&tri| {
            barycentric(tri.map(|v| self.points[v]), query)
                .filter(|w| w.iter().all(|&l| l >= -tolerance))
                .map(|w| (tri, w))
        })
    }

    /// Piecewise-linear interpolation of `values` (one per point) at `query`.
    ///
    /// `None` outside the convex hull.
    ///
    /// # Errors
    ///
    /// Returns [`ModalError::LengthMismatch`] if `values` does not have one
    /// entry per point.
    pub fn interpolate(&self, values: &[f64], query: [f64; 2], tolerance: f64) -> Result<Option<f64>> {
        if values.len() != self.points.len() {
            return Err(ModalError::length_mismatch(self.points.len(), values.len()));
        }
        Ok(self
            .locate(query, tolerance)
            .map(|(tri, w)| w[0] * values[tri[0]] + w[1] * values[tri[1]] + w[2] * values[tri[2]]))
    }
}

/// Barycentric weights of `p` in triangle `[a, b, c]`, `None` if degenerate.
fn barycentric([a, b, c]: [[f64; 2]; 3], p: [f64; 2]) -> Option<[f64; 3]> {
    let det = (b[1] - c[1]) * (a[0] - c[0]) + (c[0] - b[0]) * (a[1] - c[1]);
    if det == 0.0 {
        return None;
    }
    let l1 = ((b[1] - c[1]) * (p[0] - c[0]) + (c[0] - b[0]) * (p[1] - c[1])) / det;
    let l2 = ((c[1] - a[1]) * (p[0] - c[0]) + (a[0] - c[0]) * (p[1] - c[1])) / det;
    Some([l1, l2, 1.0 - l1 - l2])
}

/// Component-wise min and max of a non-empty point set.
pub(crate) fn bounds(points: &[[f64; 2]]) -> ([f64; 2], [f64; 2]) {
    points.iter().fold(
        ([f64::INFINITY; 2], [f64::NEG_INFINITY; 2]),
        |(lo, hi), p| {
            (
                [lo[0].min(p[0]), lo[1].min(p[1])],
                [hi[0].max(p[0]), hi[1].max(p[1])],
            )
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_square_with_center() -> Vec<[f64; 2]> {
        vec![[0.5, 0.5], [0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]
    }

    #[test]
    fn test_square_with_center_gives_fan() {
        let tri = Triangulation::new(&unit_square_with_center()).unwrap();
        assert_eq!(tri.triangles().len(), 4);
        // Every triangle uses the center point
        assert!(tri.triangles().iter().all(|t| t.contains(&0)));
    }

    #[test]
    fn test_triangle_count_for_points_in_general_position() {
        // n points with h on the hull give 2n - h - 2 triangles
        let points = [[0.0, 0.0], [4.0, 0.1], [4.2, 3.9], [0.1, 4.0], [1.3, 1.7], [2.9, 2.2]];
        let tri = Triangulation::new(&points).unwrap();
        assert_eq!(tri.triangles().len(), 2 * 6 - 4 - 2);
    }

    #[test]
    fn test_interpolate_reproduces_plane() {
        let points = [
            [0.0, 0.0],
            [3.0, 0.0],
            [3.0, 2.0],
            [0.0, 2.0],
            [1.1, 0.7],
            [2.2, 1.4],
            [0.4, 1.6],
        ];
        let plane = |p: [f64; 2]| 2.0 * p[0] - p[1] + 1.0;
        let values: Vec<f64> = points.iter().map(|&p| plane(p)).collect();
        let tri = Triangulation::new(&points).unwrap();

        for q in [[0.5, 0.5], [2.9, 1.9], [1.5, 1.0], [0.0, 1.0], [3.0, 2.0]] {
            let z = tri.interpolate(&values, q, 1e-10).unwrap().unwrap();
            assert_relative_eq!(z, plane(q), epsilon = 1e-9);
        }
    }

    #[test]
    fn test_outside_hull_is_none() {
        let tri = Triangulation::new(&unit_square_with_center()).unwrap();
        let values = [1.0, 0.0, 0.0, 0.0, 0.0];
        assert_eq!(tri.interpolate(&values, [1.5, 0.5], 1e-10).unwrap(), None);
        assert!(tri.locate([-0.1, -0.1], 1e-10).is_none());
    }

    #[test]
    fn test_duplicates_are_ignored() {
        let mut points = unit_square_with_center();
        points.push([1.0, 1.0]);
        points.push([-0.0, 0.0]);
        let tri = Triangulation::new(&points).unwrap();
        assert_eq!(tri.triangles().len(), 4);
        assert!(tri.triangles().iter().flatten().all(|&v| v < 5));
    }

    #[test]
    fn test_degenerate_inputs() {
        assert!(matches!(
            Triangulation::new(&[[0.0, 0.0], [1.0, 1.0], [0.0, 0.0]]),
            Err(ModalError::DegenerateGeometry(_))
        ));
        assert!(matches!(
            Triangulation::new(&[[0.0, 0.0], [1.0, 1.0], [2.0, 2.0], [3.0, 3.0]]),
            Err(ModalError::DegenerateGeometry(_))
        ));
        assert!(matches!(
            Triangulation::new(&[[0.0, 0.0], [1.0, f64::NAN], [2.0, 0.0]]),
            Err(ModalError::InvalidInput(_))
        ));
    }

    /// Long, slightly cambered deck: two chains of 41 stations, 2 units apart,
    /// bowing towards each other by at most 0.01. Only the four end stations
    /// are on the hull, so it is the bounding box.
    fn cambered_deck() -> Vec<[f64; 2]> {
        let camber = |x: f64| 1e-6 * (x - 100.0) * (x - 100.0);
        let stations = (0_u32..=40).map(|k| 5.0 * f64::from(k));
        stations
            .clone()
            .map(|x| [x, -camber(x)])
            .chain(stations.map(|x| [x, 2.0 + camber(x)]))
            .collect()
    }

    #[test]
    fn test_thin_cambered_set_covers_hull() {
        let points = cambered_deck();
        let tri = Triangulation::new(&points).unwrap();

        assert_relative_eq!(tri.area(), 200.0 * 2.02, max_relative = 1e-9);
        assert_eq!(tri.triangles().len(), 2 * points.len() - 4 - 2);
        for x in [2.5, 47.5, 100.0, 152.5, 197.5] {
            for y in [-0.005, 1.0, 2.005] {
                assert!(tri.locate([x, y], 1e-10).is_some(), "gap at ({x}, {y})");
            }
        }
    }

    #[test]
    fn test_collinear_points_on_hull_edge() {
        let points = [[0.0, 0.0], [4.0, 0.0], [2.0, 3.0], [1.0, 0.0], [3.0, 0.0], [6.0, 0.0]];
        let tri = Triangulation::new(&points).unwrap();
        assert_relative_eq!(tri.area(), 9.0, epsilon = 1e-12);
        assert_eq!(tri.triangles().len(), 4);
        assert!(tri
            .triangles()
            .iter()
            .all(|t| orient(points[t[0]], points[t[1]], points[t[2]]) > 0.0));
    }

    #[test]
    fn test_interpolate_length_mismatch() {
        let tri = Triangulation::new(&unit_square_with_center()).unwrap();
        assert_eq!(
            tri.interpolate(&[1.0, 2.0], [0.5, 0.5], 0.0),
            Err(ModalError::length_mismatch(5, 2))
        );
    }
}
