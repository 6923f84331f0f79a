//! Sites: the points stored in the triangulation graph.
//!
//! A [`Site`] pairs a coordinate with its provenance. Input sites remember
//! their position in the caller's point list; synthetic sites are the three
//! bootstrap vertices that exist only while the triangulation is being built.
//! Identity is the arena key, never the coordinate.

use serde::{Deserialize, Serialize};

use crate::geometry::point::Point;

/// Where a site came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SiteKind {
    /// A caller-supplied point; `index` is its position in the input list.
    Input {
        /// Position of the originating point in the input list.
        index: usize,
    },
    /// One of the three bootstrap (super-triangle) vertices.
    Synthetic,
}

/// A vertex of the triangulation graph.
///
/// # Examples
///
/// ```rust
/// use point_graph::core::site::{Site, SiteKind};
/// use point_graph::geometry::point::Point;
///
/// let site = Site::input(3, Point::new(1.0, 2.0));
/// assert_eq!(site.kind(), SiteKind::Input { index: 3 });
/// assert_eq!(site.input_index(), Some(3));
/// assert!(!site.is_synthetic());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Site {
    point: Point,
    kind: SiteKind,
}

impl Site {
    /// Creates a site for the input point at position `index`.
    #[must_use]
    pub const fn input(index: usize, point: Point) -> Self {
        Self {
            point,
            kind: SiteKind::Input { index },
        }
    }

    /// Creates a bootstrap vertex.
    #[must_use]
    pub const fn synthetic(point: Point) -> Self {
        Self {
            point,
            kind: SiteKind::Synthetic,
        }
    }

    /// Coordinates of the site.
    ///
    /// For an input site this may differ from the originating input point by
    /// a tiny perturbation if the insertion hit a degenerate configuration.
    #[inline]
    #[must_use]
    pub const fn point(&self) -> Point {
        self.point
    }

    /// Provenance of the site.
    #[inline]
    #[must_use]
    pub const fn kind(&self) -> SiteKind {
        self.kind
    }

    /// `true` for bootstrap vertices.
    #[inline]
    #[must_use]
    pub const fn is_synthetic(&self) -> bool {
        matches!(self.kind, SiteKind::Synthetic)
    }

    /// Position of the originating input point, if any.
    #[inline]
    #[must_use]
    pub const fn input_index(&self) -> Option<usize> {
        match self.kind {
            SiteKind::Input { index } => Some(index),
            SiteKind::Synthetic => None,
        }
    }

    /// Replaces the coordinates; only used before the site is committed to a graph.
    pub(crate) const fn set_point(&mut self, point: Point) {
        self.point = point;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synthetic_sites_have_no_input_index() {
        let site = Site::synthetic(Point::new(100.0, 0.0));
        assert!(site.is_synthetic());
        assert_eq!(site.input_index(), None);
        assert_eq!(site.point(), Point::new(100.0, 0.0));
    }

    #[test]
    fn set_point_keeps_provenance() {
        let mut site = Site::input(0, Point::new(0.0, 0.0));
        site.set_point(Point::new(1.0e-9, 0.0));
        assert_eq!(site.input_index(), Some(0));
        assert_eq!(site.point(), Point::new(1.0e-9, 0.0));
    }

    #[test]
    fn serde_roundtrip() {
        let site = Site::input(7, Point::new(-1.0, 0.5));
        let json = serde_json::to_string(&site).unwrap();
        let back: Site = serde_json::from_str(&json).unwrap();
        assert_eq!(site, back);
    }
}
