//! Segments: the edges of the triangulation graph.
//!
//! A [`Segment`] is an *ordered* pair of endpoint [`SiteKey`]s. Identity is
//! the segment's own [`SegmentKey`](crate::core::triangulation_data_structure::SegmentKey):
//! two segments created separately between the same pair of sites are
//! distinct entities, exactly like two coordinate-equal input points are
//! distinct sites.
//!
//! Derived geometry (length, midpoint, slope, point side) needs coordinates and
//! is therefore provided by [`Tds`](crate::core::triangulation_data_structure::Tds).

use serde::{Deserialize, Serialize};

use crate::core::triangulation_data_structure::SiteKey;

/// An edge between two sites.
///
/// # Examples
///
/// ```rust
/// use point_graph::core::segment::Segment;
/// use point_graph::core::triangulation_data_structure::SiteKey;
/// use slotmap::SlotMap;
///
/// let mut sites: SlotMap<SiteKey, ()> = SlotMap::with_key();
/// let a = sites.insert(());
/// let b = sites.insert(());
/// let c = sites.insert(());
///
/// let ab = Segment::new(a, b);
/// assert!(ab.has_vertex(a));
/// assert!(!ab.has_vertex(c));
/// assert_eq!(ab.other(a), Some(b));
/// assert_eq!(ab.other(c), None);
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Segment {
    a: SiteKey,
    b: SiteKey,
}

impl Segment {
    /// Creates the segment `a → b`.
    #[inline]
    #[must_use]
    pub const fn new(a: SiteKey, b: SiteKey) -> Self {
        Self { a, b }
    }

    /// First endpoint.
    #[inline]
    #[must_use]
    pub const fn a(self) -> SiteKey {
        self.a
    }

    /// Second endpoint.
    #[inline]
    #[must_use]
    pub const fn b(self) -> SiteKey {
        self.b
    }

    /// Both endpoints, in construction order.
    #[inline]
    #[must_use]
    pub const fn endpoints(self) -> (SiteKey, SiteKey) {
        (self.a, self.b)
    }

    /// `true` iff `site` is one of the two endpoints.
    #[inline]
    #[must_use]
    pub fn has_vertex(self, site: SiteKey) -> bool {
        self.a == site || self.b == site
    }

    /// The endpoint opposite `site`, or `None` if `site` is not an endpoint.
    #[inline]
    #[must_use]
    pub fn other(self, site: SiteKey) -> Option<SiteKey> {
        if self.a == site {
            Some(self.b)
        } else if self.b == site {
            Some(self.a)
        } else {
            None
        }
    }

    /// `true` if the segment connects `u` and `v`, in either direction.
    #[inline]
    #[must_use]
    pub fn connects(self, u: SiteKey, v: SiteKey) -> bool {
        (self.a == u && self.b == v) || (self.a == v && self.b == u)
    }
}

impl From<(SiteKey, SiteKey)> for Segment {
    #[inline]
    fn from((a, b): (SiteKey, SiteKey)) -> Self {
        Self::new(a, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    #[test]
    fn segment_keeps_endpoint_order() {
        let mut sites: SlotMap<SiteKey, ()> = SlotMap::with_key();
        let a = sites.insert(());
        let b = sites.insert(());

        let ab = Segment::new(a, b);
        let ba = Segment::new(b, a);
        assert_eq!(ab.endpoints(), (a, b));
        assert_eq!(ba.endpoints(), (b, a));
        assert_ne!(ab, ba);
        assert!(ab.connects(b, a));
        assert!(ba.connects(a, b));
        assert_eq!(Segment::from((a, b)), ab);
    }

    #[test]
    fn other_endpoint() {
        let mut sites: SlotMap<SiteKey, ()> = SlotMap::with_key();
        let a = sites.insert(());
        let b = sites.insert(());
        let c = sites.insert(());

        let seg = Segment::new(a, b);
        assert_eq!(seg.other(a), Some(b));
        assert_eq!(seg.other(b), Some(a));
        assert_eq!(seg.other(c), None);
        assert!(!seg.connects(a, c));
    }
}
