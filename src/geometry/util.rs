//! Geometric utility functions for 2D triangulation.
//!
//! This module contains the closed-form derived attributes of segments and
//! triangles (midpoint, slope, circumcircle, centroid, signed area) and the
//! axis-aligned bounding box used to size the bootstrap triangle. These
//! functions are pure: they only read coordinates.

pub mod point_generation;

pub use point_generation::*;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::point::Point;
use crate::geometry::predicates::{Orientation, orientation, orientation_determinant};

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur during random point generation.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum RandomPointGenerationError {
    /// Invalid coordinate range provided.
    #[error("Invalid coordinate range: minimum {min} must be less than maximum {max}")]
    InvalidRange {
        /// The minimum value of the range.
        min: String,
        /// The maximum value of the range.
        max: String,
    },
    /// Grid parameters are unusable (zero spacing, non-finite values, ...).
    #[error("Invalid grid parameters: {details}")]
    InvalidGrid {
        /// Description of the rejected parameters.
        details: String,
    },
}

// =============================================================================
// SEGMENT ATTRIBUTES
// =============================================================================

/// Midpoint of the segment `a`–`b`.
#[inline]
#[must_use]
pub fn midpoint(a: Point, b: Point) -> Point {
    Point::new((b.x - a.x).mul_add(0.5, a.x), (b.y - a.y).mul_add(0.5, a.y))
}

/// Direction angle of the segment `a → b` in radians, in `(-π, π]`.
///
/// # Examples
///
/// ```
/// use point_graph::geometry::point::Point;
/// use point_graph::geometry::util::slope;
///
/// let angle = slope(Point::new(0.0, 0.0), Point::new(1.0, 1.0));
/// assert!((angle - std::f64::consts::FRAC_PI_4).abs() < 1e-15);
/// ```
#[inline]
#[must_use]
pub fn slope(a: Point, b: Point) -> f64 {
    (b.y - a.y).atan2(b.x - a.x)
}

// =============================================================================
// TRIANGLE ATTRIBUTES
// =============================================================================

/// Circumcenter of the triangle `(a, b, c)`.
///
/// Uses the determinant closed form on coordinates relative to `a`, which
/// keeps the products small for triangles far from the origin:
///
/// ```text
/// (bx, by) = b - a,  (cx, cy) = c - a
/// d  = 2 (bx cy - by cx)
/// ux = (cy |b|² - by |c|²) / d
/// uy = (bx |c|² - cx |b|²) / d
/// ```
///
/// The result is non-finite when the three points are collinear (`d = 0`).
#[must_use]
pub fn circumcenter(a: Point, b: Point, c: Point) -> Point {
    let b = b - a;
    let c = c - a;
    let d = 2.0 * b.x.mul_add(c.y, -(b.y * c.x));

    let b2 = b.x.mul_add(b.x, b.y * b.y);
    let c2 = c.x.mul_add(c.x, c.y * c.y);

    let ux = c.y.mul_add(b2, -(b.y * c2)) / d;
    let uy = b.x.mul_add(c2, -(c.x * b2)) / d;

    Point::new(a.x + ux, a.y + uy)
}

/// Circumradius of the triangle `(a, b, c)`.
///
/// Non-finite when the three points are collinear.
#[must_use]
pub fn circumradius(a: Point, b: Point, c: Point) -> f64 {
    circumcenter(a, b, c).distance(a)
}

/// Signed area of the triangle `(a, b, c)`; positive for counter-clockwise winding.
///
/// # Examples
///
/// ```
/// use point_graph::geometry::point::Point;
/// use point_graph::geometry::util::signed_area;
///
/// let a = Point::new(0.0, 0.0);
/// let b = Point::new(4.0, 0.0);
/// let c = Point::new(0.0, 4.0);
/// assert_eq!(signed_area(a, b, c), 8.0);
/// assert_eq!(signed_area(a, c, b), -8.0);
/// ```
#[inline]
#[must_use]
pub fn signed_area(a: Point, b: Point, c: Point) -> f64 {
    0.5 * orientation_determinant(a, b, c)
}

/// Centroid (vertex average) of the triangle `(a, b, c)`.
#[inline]
#[must_use]
pub fn centroid(a: Point, b: Point, c: Point) -> Point {
    Point::new((a.x + b.x + c.x) / 3.0, (a.y + b.y + c.y) / 3.0)
}

/// Derived attributes of a triangle, computed once from its vertex coordinates.
///
/// Triangles are immutable once inserted into the graph, so their derived
/// attributes are computed once. The cached circumcircle feeds the Voronoi
/// dual; in-circle decisions use the exact predicates on [`Self::vertices`].
///
/// # Examples
///
/// ```
/// use point_graph::geometry::point::Point;
/// use point_graph::geometry::predicates::Orientation;
/// use point_graph::geometry::util::TriangleGeometry;
///
/// let g = TriangleGeometry::new(
///     Point::new(0.0, 0.0),
///     Point::new(4.0, 0.0),
///     Point::new(0.0, 4.0),
/// );
/// assert_eq!(g.circumcenter(), Point::new(2.0, 2.0));
/// assert_eq!(g.circumradius_squared(), 8.0);
/// assert_eq!(g.winding(), Orientation::POSITIVE);
/// assert!(!g.is_degenerate());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TriangleGeometry {
    vertices: [Point; 3],
    circumcenter: Point,
    circumradius_squared: f64,
    centroid: Point,
    signed_area: f64,
    winding: Orientation,
}

impl TriangleGeometry {
    /// Computes all derived attributes of the triangle `(a, b, c)`.
    #[must_use]
    pub fn new(a: Point, b: Point, c: Point) -> Self {
        let center = circumcenter(a, b, c);
        Self {
            vertices: [a, b, c],
            circumcenter: center,
            circumradius_squared: center.distance_squared(a),
            centroid: centroid(a, b, c),
            signed_area: signed_area(a, b, c),
            winding: orientation(a, b, c),
        }
    }

    /// The three vertex coordinates in chain order `a, b, c`.
    #[inline]
    #[must_use]
    pub const fn vertices(&self) -> [Point; 3] {
        self.vertices
    }

    /// Center of the circumscribed circle.
    #[inline]
    #[must_use]
    pub const fn circumcenter(&self) -> Point {
        self.circumcenter
    }

    /// Radius of the circumscribed circle.
    #[inline]
    #[must_use]
    pub fn circumradius(&self) -> f64 {
        self.circumradius_squared.sqrt()
    }

    /// Squared radius of the circumscribed circle.
    #[inline]
    #[must_use]
    pub const fn circumradius_squared(&self) -> f64 {
        self.circumradius_squared
    }

    /// Vertex average.
    #[inline]
    #[must_use]
    pub const fn centroid(&self) -> Point {
        self.centroid
    }

    /// Signed area; positive for counter-clockwise winding.
    #[inline]
    #[must_use]
    pub const fn signed_area(&self) -> f64 {
        self.signed_area
    }

    /// Orientation of the vertex chain `a → b → c`.
    #[inline]
    #[must_use]
    pub const fn winding(&self) -> Orientation {
        self.winding
    }

    /// `true` when the vertices are collinear within floating-point error.
    #[inline]
    #[must_use]
    pub const fn is_degenerate(&self) -> bool {
        self.winding.is_degenerate()
    }
}

// =============================================================================
// BOUNDING BOX
// =============================================================================

/// Axis-aligned bounding box of a point set.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Lower-left corner.
    pub min: Point,
    /// Upper-right corner.
    pub max: Point,
}

impl BoundingBox {
    /// Computes the bounding box of `points`, or `None` if `points` is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use point_graph::geometry::point::Point;
    /// use point_graph::geometry::util::BoundingBox;
    ///
    /// let bbox = BoundingBox::from_points(&[
    ///     Point::new(1.0, 5.0),
    ///     Point::new(-3.0, 2.0),
    ///     Point::new(4.0, -1.0),
    /// ])
    /// .unwrap();
    /// assert_eq!(bbox.min, Point::new(-3.0, -1.0));
    /// assert_eq!(bbox.max, Point::new(4.0, 5.0));
    /// assert!(BoundingBox::from_points(&[]).is_none());
    /// ```
    #[must_use]
    pub fn from_points(points: &[Point]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let mut bbox = Self {
            min: *first,
            max: *first,
        };
        for p in rest {
            bbox.min.x = bbox.min.x.min(p.x);
            bbox.min.y = bbox.min.y.min(p.y);
            bbox.max.x = bbox.max.x.max(p.x);
            bbox.max.y = bbox.max.y.max(p.y);
        }
        Some(bbox)
    }

    /// Midpoint of the box.
    #[inline]
    #[must_use]
    pub fn center(&self) -> Point {
        midpoint(self.min, self.max)
    }

    /// Length of the box diagonal.
    #[inline]
    #[must_use]
    pub fn diagonal(&self) -> f64 {
        self.min.distance(self.max)
    }

    /// Diagonal length clamped below by `1.0`, so that a single point or a
    /// tiny cluster still yields a usable working scale.
    #[inline]
    #[must_use]
    pub fn extent(&self) -> f64 {
        self.diagonal().max(1.0)
    }
}

// =============================================================================
// TESTS
// =============================================================================
