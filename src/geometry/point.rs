//! Data and operations on 2D points.
//!
//! # Floating-Point Equality Semantics
//!
//! [`Point`] equality is plain IEEE 754 equality on both coordinates: `NaN`
//! never compares equal and `0.0 == -0.0`. Points are *values*; the identity of
//! a site in a triangulation is its [`SiteKey`](crate::core::triangulation_data_structure::SiteKey),
//! never its coordinates, so two coordinate-equal input points still become two
//! distinct sites.

#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};

// =============================================================================
// POINT STRUCT DEFINITION
// =============================================================================

/// A point in the Euclidean plane.
///
/// # Examples
///
/// ```rust
/// use point_graph::geometry::point::Point;
///
/// let a = Point::new(0.0, 0.0);
/// let b = Point::new(3.0, 4.0);
/// assert_eq!(a.distance(b), 5.0);
/// assert_eq!(Point::from((3.0, 4.0)), b);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl Point {
    /// Creates a point from its two coordinates.
    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`, computed as `sqrt(dx² + dy²)`.
    #[inline]
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        self.distance_squared(other).sqrt()
    }

    /// Squared Euclidean distance to `other`.
    ///
    /// Circumcircle containment compares squared distances so that cocircular
    /// points with small integer coordinates compare exactly.
    #[inline]
    #[must_use]
    pub fn distance_squared(self, other: Self) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        dx.mul_add(dx, dy * dy)
    }

    /// Returns `true` if both coordinates are finite (neither `NaN` nor infinite).
    #[inline]
    #[must_use]
    pub const fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Returns the coordinates as an array `[x, y]`.
    #[inline]
    #[must_use]
    pub const fn to_array(self) -> [f64; 2] {
        [self.x, self.y]
    }

    /// Returns `true` if both coordinates are bitwise identical.
    ///
    /// Unlike `==`, this treats `0.0` and `-0.0` as different and every `NaN`
    /// bit pattern as equal to itself.
    #[inline]
    #[must_use]
    pub const fn bitwise_eq(self, other: Self) -> bool {
        self.x.to_bits() == other.x.to_bits() && self.y.to_bits() == other.y.to_bits()
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<(f64, f64)> for Point {
    #[inline]
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

impl From<[f64; 2]> for Point {
    #[inline]
    fn from([x, y]: [f64; 2]) -> Self {
        Self::new(x, y)
    }
}

impl From<Point> for [f64; 2] {
    #[inline]
    fn from(point: Point) -> Self {
        point.to_array()
    }
}

impl Add for Point {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn distance_is_symmetric_and_sign_independent() {
        let a = Point::new(-1.0, 2.0);
        let b = Point::new(2.0, -2.0);
        assert_relative_eq!(a.distance(b), 5.0);
        assert_relative_eq!(b.distance(a), 5.0);
        assert_relative_eq!(a.distance_squared(b), 25.0);
    }

    #[test]
    fn conversions_roundtrip() {
        let p = Point::from([1.5, -2.5]);
        let arr: [f64; 2] = p.into();
        assert_eq!(arr, [1.5, -2.5]);
        assert_eq!(Point::from((1.5, -2.5)), p);
    }

    #[test]
    fn finiteness_check() {
        assert!(Point::new(0.0, 1.0).is_finite());
        assert!(!Point::new(f64::NAN, 1.0).is_finite());
        assert!(!Point::new(0.0, f64::INFINITY).is_finite());
    }

    #[test]
    fn bitwise_equality_distinguishes_signed_zero() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(-0.0, 0.0);
        assert_eq!(a, b);
        assert!(!a.bitwise_eq(b));
        assert!(a.bitwise_eq(a));
    }

    #[test]
    fn vector_arithmetic() {
        let a = Point::new(1.0, 2.0);
        let b = Point::new(0.5, -1.0);
        assert_eq!(a + b, Point::new(1.5, 1.0));
        assert_eq!(a - b, Point::new(0.5, 3.0));
    }

    #[test]
    fn serde_roundtrip() {
        let p = Point::new(3.25, -7.5);
        let json = serde_json::to_string(&p).unwrap();
        let back: Point = serde_json::from_str(&json).unwrap();
        assert_eq!(p, back);
    }

    #[test]
    fn display_formats_coordinates() {
        assert_eq!(Point::new(1.0, -2.5).to_string(), "(1, -2.5)");
    }
}
