//! Point deduplication utilities.
//!
//! The triangulation core never merges points: two coordinate-equal inputs
//! become two distinct sites. Callers that want set semantics filter their
//! input with these helpers first.

#![forbid(unsafe_code)]

use ordered_float::OrderedFloat;

use crate::core::collections::{FastHashSet, fast_hash_set_with_capacity};
use crate::geometry::point::Point;

/// Hashable exact-coordinate key of a point.
///
/// Uses `OrderedFloat`, so `NaN` equals `NaN` and `+0.0` equals `-0.0`.
#[inline]
#[must_use]
pub fn exact_point_key(point: Point) -> (OrderedFloat<f64>, OrderedFloat<f64>) {
    (OrderedFloat(point.x), OrderedFloat(point.y))
}

/// `true` if both coordinates are exactly equal (NaN-aware, `+0.0 == -0.0`).
///
/// # Examples
///
/// ```
/// use point_graph::core::util::points_equal_exact;
/// use point_graph::geometry::point::Point;
///
/// assert!(points_equal_exact(Point::new(0.0, 1.0), Point::new(-0.0, 1.0)));
/// assert!(points_equal_exact(Point::new(f64::NAN, 1.0), Point::new(f64::NAN, 1.0)));
/// assert!(!points_equal_exact(Point::new(0.0, 1.0), Point::new(0.0, 1.0 + f64::EPSILON)));
/// ```
#[inline]
#[must_use]
pub fn points_equal_exact(a: Point, b: Point) -> bool {
    exact_point_key(a) == exact_point_key(b)
}

/// Removes exact coordinate duplicates, keeping the first occurrence of each
/// point and the relative order of the survivors.
///
/// # Complexity
///
/// O(n) expected, using a hash set of [`exact_point_key`]s.
///
/// # Examples
///
/// ```
/// use point_graph::core::util::dedup_points_exact;
/// use point_graph::geometry::point::Point;
///
/// let points = [
///     Point::new(0.0, 0.0),
///     Point::new(1.0, 1.0),
///     Point::new(0.0, 0.0),
/// ];
/// assert_eq!(
///     dedup_points_exact(&points),
///     vec![Point::new(0.0, 0.0), Point::new(1.0, 1.0)]
/// );
/// ```
#[must_use]
pub fn dedup_points_exact(points: &[Point]) -> Vec<Point> {
    let mut seen: FastHashSet<_> = fast_hash_set_with_capacity(points.len());
    points
        .iter()
        .copied()
        .filter(|&p| seen.insert(exact_point_key(p)))
        .collect()
}

/// Removes points within `epsilon` of an earlier kept point.
///
/// # Complexity
///
/// O(n²); intended for small inputs.
///
/// # Examples
///
/// ```
/// use point_graph::core::util::dedup_points_epsilon;
/// use point_graph::geometry::point::Point;
///
/// let points = [
///     Point::new(0.0, 0.0),
///     Point::new(1e-12, 0.0),
///     Point::new(1.0, 0.0),
/// ];
/// assert_eq!(dedup_points_epsilon(&points, 1e-9).len(), 2);
/// ```
#[must_use]
pub fn dedup_points_epsilon(points: &[Point], epsilon: f64) -> Vec<Point> {
    let epsilon_squared = epsilon * epsilon;
    let mut unique: Vec<Point> = Vec::with_capacity(points.len());
    for &p in points {
        if unique
            .iter()
            .all(|&q| p.distance_squared(q) > epsilon_squared)
        {
            unique.push(p);
        }
    }
    unique
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_dedup_keeps_first_occurrence_order() {
        let points = [
            Point::new(2.0, 2.0),
            Point::new(0.0, 0.0),
            Point::new(2.0, 2.0),
            Point::new(-0.0, 0.0),
            Point::new(1.0, 0.0),
        ];
        assert_eq!(
            dedup_points_exact(&points),
            vec![Point::new(2.0, 2.0), Point::new(0.0, 0.0), Point::new(1.0, 0.0)]
        );
    }

    #[test]
    fn exact_dedup_of_empty_input() {
        assert!(dedup_points_exact(&[]).is_empty());
    }

    #[test]
    fn epsilon_dedup_merges_near_points_only() {
        let points = [
            Point::new(0.0, 0.0),
            Point::new(0.0, 5e-10),
            Point::new(0.0, 2e-9),
        ];
        assert_eq!(dedup_points_epsilon(&points, 1e-9).len(), 2);
        assert_eq!(dedup_points_epsilon(&points, 0.0).len(), 3);
    }
}
