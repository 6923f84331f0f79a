//! Geometric predicates for 2D triangulation.
//!
//! This module contains the orientation and in-circle tests used by the
//! insertion core. Signs come from the adaptive-precision predicates of the
//! [`robust`] crate (after Shewchuk's `orient2d` and `incircle`), so every
//! answer is the sign of the exact determinant of the input coordinates:
//! [`Orientation::DEGENERATE`] means exactly collinear and
//! [`InCircle::BOUNDARY`] means exactly cocircular.

use robust::{Coord, Coord3D};
use serde::{Deserialize, Serialize};

use crate::geometry::point::Point;
use crate::geometry::util::TriangleGeometry;

/// Represents the position of a point relative to a circumcircle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InCircle {
    /// The point is outside the circumcircle
    OUTSIDE,
    /// The point is exactly on the circumcircle
    BOUNDARY,
    /// The point is inside the circumcircle
    INSIDE,
}

impl std::fmt::Display for InCircle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OUTSIDE => write!(f, "OUTSIDE"),
            Self::BOUNDARY => write!(f, "BOUNDARY"),
            Self::INSIDE => write!(f, "INSIDE"),
        }
    }
}

/// Represents the orientation (winding) of three points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Orientation {
    /// Clockwise turn (determinant < 0)
    NEGATIVE,
    /// Collinear, or too close to call in floating point
    DEGENERATE,
    /// Counter-clockwise turn (determinant > 0)
    POSITIVE,
}

impl Orientation {
    /// Returns the opposite winding; `DEGENERATE` stays `DEGENERATE`.
    #[must_use]
    pub const fn reversed(self) -> Self {
        match self {
            Self::NEGATIVE => Self::POSITIVE,
            Self::DEGENERATE => Self::DEGENERATE,
            Self::POSITIVE => Self::NEGATIVE,
        }
    }

    /// Returns `true` for `DEGENERATE`.
    #[must_use]
    pub const fn is_degenerate(self) -> bool {
        matches!(self, Self::DEGENERATE)
    }
}

impl std::fmt::Display for Orientation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NEGATIVE => write!(f, "NEGATIVE"),
            Self::DEGENERATE => write!(f, "DEGENERATE"),
            Self::POSITIVE => write!(f, "POSITIVE"),
        }
    }
}

/// Signed doubled area of the triangle `(a, b, c)`, in plain floating point.
///
/// Positive when `a → b → c` turns counter-clockwise. Use [`orientation`]
/// for the exact sign.
#[inline]
#[must_use]
pub fn orientation_determinant(a: Point, b: Point, c: Point) -> f64 {
    (a.x - c.x) * (b.y - c.y) - (a.y - c.y) * (b.x - c.x)
}

const fn sign_of(det: f64) -> Orientation {
    if det > 0.0 {
        Orientation::POSITIVE
    } else if det < 0.0 {
        Orientation::NEGATIVE
    } else {
        Orientation::DEGENERATE
    }
}

/// Determine the orientation of the point triple `(a, b, c)`.
///
/// The result is the exact sign of the determinant
///
/// ```text
/// | ax - cx   ay - cy |
/// | bx - cx   by - cy |
/// ```
///
/// so `DEGENERATE` is returned only for exactly collinear points.
///
/// # Example
///
/// ```
/// use point_graph::geometry::point::Point;
/// use point_graph::geometry::predicates::{Orientation, orientation};
///
/// let a = Point::new(0.0, 0.0);
/// let b = Point::new(1.0, 0.0);
/// assert_eq!(orientation(a, b, Point::new(0.0, 1.0)), Orientation::POSITIVE);
/// assert_eq!(orientation(a, b, Point::new(0.0, -1.0)), Orientation::NEGATIVE);
/// assert_eq!(orientation(a, b, Point::new(2.0, 0.0)), Orientation::DEGENERATE);
/// ```
#[must_use]
pub fn orientation(a: Point, b: Point, c: Point) -> Orientation {
    let coord = |p: Point| Coord { x: p.x, y: p.y };
    sign_of(robust::orient2d(coord(a), coord(b), coord(c)))
}

/// Which side of the directed line `from → to` the point `p` lies on.
///
/// This is the sign of the cross product of the line direction and
/// `p - from`; `POSITIVE` is the left side.
#[inline]
#[must_use]
pub fn point_side(from: Point, to: Point, p: Point) -> Orientation {
    orientation(from, to, p)
}

/// Exact sign of the cross product `(to - from) × direction`.
///
/// `POSITIVE` when `direction` points to the left of the directed line
/// `from → to`. The differences are never rounded: the cross product equals
/// the 3×3 determinant with rows `(from, 1)`, `(to, 1)` and `(direction, 0)`,
/// which is evaluated as an exact 3D orientation against the origin.
///
/// # Example
///
/// ```
/// use point_graph::geometry::point::Point;
/// use point_graph::geometry::predicates::{Orientation, direction_side};
///
/// let from = Point::new(1.0, 1.0);
/// let to = Point::new(3.0, 1.0);
/// assert_eq!(direction_side(from, to, Point::new(0.0, 1.0)), Orientation::POSITIVE);
/// assert_eq!(direction_side(from, to, Point::new(0.5, -2.0)), Orientation::NEGATIVE);
/// assert_eq!(direction_side(from, to, Point::new(-4.0, 0.0)), Orientation::DEGENERATE);
/// ```
#[must_use]
pub fn direction_side(from: Point, to: Point, direction: Point) -> Orientation {
    let lift = |p: Point, z: f64| Coord3D { x: p.x, y: p.y, z };
    sign_of(robust::orient3d(
        lift(from, 1.0),
        lift(to, 1.0),
        lift(direction, 0.0),
        lift(Point::default(), 0.0),
    ))
}

/// Classify `p` against the circle through `a`, `b` and `c`.
///
/// Works for either winding. Returns `OUTSIDE` when the three points are
/// collinear, since they span no circle.
///
/// # Example
///
/// ```
/// use point_graph::geometry::point::Point;
/// use point_graph::geometry::predicates::{InCircle, in_circle};
///
/// let (a, b, c) = (Point::new(0.0, 0.0), Point::new(1.0, 0.0), Point::new(1.0, 1.0));
/// assert_eq!(in_circle(a, b, c, Point::new(0.0, 1.0)), InCircle::BOUNDARY);
/// assert_eq!(in_circle(c, b, a, Point::new(0.5, 0.5)), InCircle::INSIDE);
/// assert_eq!(in_circle(a, b, c, Point::new(2.0, 2.0)), InCircle::OUTSIDE);
/// ```
#[must_use]
pub fn in_circle(a: Point, b: Point, c: Point, p: Point) -> InCircle {
    let winding = orientation(a, b, c);
    let coord = |p: Point| Coord { x: p.x, y: p.y };
    let det = robust::incircle(coord(a), coord(b), coord(c), coord(p));
    let side = match winding {
        Orientation::POSITIVE => sign_of(det),
        Orientation::NEGATIVE => sign_of(det).reversed(),
        Orientation::DEGENERATE => return InCircle::OUTSIDE,
    };
    match side {
        Orientation::POSITIVE => InCircle::INSIDE,
        Orientation::DEGENERATE => InCircle::BOUNDARY,
        Orientation::NEGATIVE => InCircle::OUTSIDE,
    }
}

/// Classify `p` against the circumcircle of the triangle described by
/// `geometry`.
///
/// Evaluated exactly on the triangle's vertex coordinates rather than on the
/// cached circumcenter, so slivers and far-off coordinates classify
/// correctly. Returns `OUTSIDE` for a degenerate triangle.
///
/// # Example
///
/// ```
/// use point_graph::geometry::point::Point;
/// use point_graph::geometry::predicates::{InCircle, in_circumcircle};
/// use point_graph::geometry::util::TriangleGeometry;
///
/// let g = TriangleGeometry::new(
///     Point::new(0.0, 0.0),
///     Point::new(4.0, 0.0),
///     Point::new(0.0, 4.0),
/// );
/// assert_eq!(in_circumcircle(&g, Point::new(1.0, 1.0)), InCircle::INSIDE);
/// assert_eq!(in_circumcircle(&g, Point::new(4.0, 4.0)), InCircle::BOUNDARY);
/// assert_eq!(in_circumcircle(&g, Point::new(9.0, 9.0)), InCircle::OUTSIDE);
/// ```
#[must_use]
pub fn in_circumcircle(geometry: &TriangleGeometry, p: Point) -> InCircle {
    let [a, b, c] = geometry.vertices();
    in_circle(a, b, c, p)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orientation_of_counter_clockwise_triangle() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(4.0, 0.0);
        let c = Point::new(0.0, 4.0);
        assert_eq!(orientation(a, b, c), Orientation::POSITIVE);
        assert_eq!(orientation(a, c, b), Orientation::NEGATIVE);
        assert_eq!(orientation(b, c, a), Orientation::POSITIVE);
    }

    #[test]
    fn orientation_detects_exact_collinearity() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(2.0, 0.0);
        let c = Point::new(4.0, 0.0);
        assert!(orientation(a, b, c).is_degenerate());
        assert!(orientation(a, a, c).is_degenerate());
    }

    #[test]
    fn orientation_resolves_nearly_collinear_large_coordinates() {
        // Off the line by far less than the rounding error of the plain
        // floating-point determinant.
        let a = Point::new(1.0e15, 1.0e15);
        let b = Point::new(-1.0e15, -1.0e15);
        let above = Point::new(0.1, 0.1 + 1.0e-17);
        let on = Point::new(0.25, 0.25);
        assert_eq!(orientation(b, a, above), Orientation::POSITIVE);
        assert_eq!(orientation(a, b, above), Orientation::NEGATIVE);
        assert!(orientation(a, b, on).is_degenerate());
    }

    #[test]
    fn orientation_is_consistent_on_rounded_line() {
        // (0.1 i, 0.3 i) is only approximately a line in binary floating point.
        let points: Vec<Point> = (0..12)
            .map(|i| Point::new(0.1 * f64::from(i), 0.3 * f64::from(i)))
            .collect();
        for a in &points {
            for b in &points {
                for c in &points {
                    let o = orientation(*a, *b, *c);
                    assert_eq!(orientation(*b, *c, *a), o);
                    assert_eq!(orientation(*b, *a, *c), o.reversed());
                }
            }
        }
        // Doubling is exact, so these three are exactly collinear.
        assert!(orientation(points[0], points[1], points[2]).is_degenerate());
    }

    #[test]
    fn direction_side_matches_cross_product() {
        let from = Point::new(1.0e6, 0.0);
        let to = Point::new(1.0e6 + 0.5, 0.5);
        assert_eq!(direction_side(from, to, Point::new(-1.0, 1.0)), Orientation::POSITIVE);
        assert_eq!(direction_side(from, to, Point::new(1.0, -1.0)), Orientation::NEGATIVE);
        assert_eq!(direction_side(from, to, Point::new(2.0, 2.0)), Orientation::DEGENERATE);
        assert_eq!(direction_side(to, from, Point::new(-1.0, 1.0)), Orientation::NEGATIVE);
    }

    #[test]
    fn reversed_orientation() {
        assert_eq!(Orientation::POSITIVE.reversed(), Orientation::NEGATIVE);
        assert_eq!(Orientation::NEGATIVE.reversed(), Orientation::POSITIVE);
        assert_eq!(Orientation::DEGENERATE.reversed(), Orientation::DEGENERATE);
    }

    #[test]
    fn point_side_matches_cross_product_sign() {
        let from = Point::new(0.0, 0.0);
        let to = Point::new(1.0, 1.0);
        assert_eq!(point_side(from, to, Point::new(0.0, 1.0)), Orientation::POSITIVE);
        assert_eq!(point_side(from, to, Point::new(1.0, 0.0)), Orientation::NEGATIVE);
        assert_eq!(point_side(from, to, Point::new(3.0, 3.0)), Orientation::DEGENERATE);
    }

    #[test]
    fn in_circumcircle_classifies_square_corner_as_boundary() {
        let g = TriangleGeometry::new(
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(1.0, 1.0),
        );
        assert_eq!(in_circumcircle(&g, Point::new(0.0, 1.0)), InCircle::BOUNDARY);
        assert_eq!(in_circumcircle(&g, Point::new(0.5, 0.5)), InCircle::INSIDE);
        assert_eq!(in_circumcircle(&g, Point::new(2.0, 2.0)), InCircle::OUTSIDE);
    }

    #[test]
    fn in_circumcircle_of_degenerate_triangle_is_outside() {
        let g = TriangleGeometry::new(
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(2.0, 0.0),
        );
        assert_eq!(in_circumcircle(&g, Point::new(1.0, 0.0)), InCircle::OUTSIDE);
    }

    #[test]
    fn in_circle_classifies_sliver_exactly() {
        // A duplicate jittered by 1e-9 next to the unit square's corner.
        let a = Point::new(1.0, 1.0);
        let b = Point::new(1.0 + 1.0e-9, 1.0 - 2.0e-9);
        let c = Point::new(0.0, 1.0);
        let winding = orientation(a, b, c);
        assert!(!winding.is_degenerate());
        assert_eq!(in_circle(a, b, c, a), InCircle::BOUNDARY);
        assert_eq!(in_circle(c, b, a, b), InCircle::BOUNDARY);
        assert_eq!(in_circle(a, b, c, Point::new(0.0, 0.0)), InCircle::OUTSIDE);
    }

    #[test]
    fn in_circle_far_from_origin() {
        let base = 1.0e6;
        let a = Point::new(base, 0.0);
        let b = Point::new(base + 1.0e-3, 0.0);
        let c = Point::new(base, 1.0e-3);
        assert_eq!(in_circle(a, b, c, Point::new(base + 1.0e-3, 1.0e-3)), InCircle::BOUNDARY);
        assert_eq!(in_circle(a, b, c, Point::new(base + 5.0e-4, 5.0e-4)), InCircle::INSIDE);
        assert_eq!(in_circle(a, c, b, Point::new(base + 2.0e-3, 2.0e-3)), InCircle::OUTSIDE);
    }

    #[test]
    fn display_impls() {
        assert_eq!(Orientation::DEGENERATE.to_string(), "DEGENERATE");
        assert_eq!(InCircle::BOUNDARY.to_string(), "BOUNDARY");
    }
}
