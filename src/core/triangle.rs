//! Triangles: the cells of the triangulation graph.
//!
//! A [`Triangle`] is built from three segments `ab`, `bc`, `ca` chained so that
//! consecutive segments share exactly one endpoint, forming the closed loop
//! `a → b → c → a`. The vertices are derived from the chain, and the derived
//! geometry (circumcircle, centroid, winding, signed area) is computed once at
//! construction and cached in a [`TriangleGeometry`].
//!
//! Membership queries are split by argument kind: [`Triangle::has_vertex`]
//! for sites and [`Triangle::has_edge`] for segments.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::segment::Segment;
use crate::core::triangulation_data_structure::{SegmentKey, SiteKey};
use crate::geometry::point::Point;
use crate::geometry::util::TriangleGeometry;

/// Errors that can occur while constructing a [`Triangle`].
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum TriangleError {
    /// The three segments do not form a closed chain `a → b → c → a` of three
    /// distinct sites.
    #[error("Malformed segment chain: {ab:?}, {bc:?}, {ca:?} do not close a triangle")]
    MalformedChain {
        /// First segment of the chain.
        ab: SegmentKey,
        /// Second segment of the chain.
        bc: SegmentKey,
        /// Third segment of the chain.
        ca: SegmentKey,
    },
    /// A vertex of the chain is not stored in the graph.
    #[error("Site {site:?} referenced by a triangle does not exist")]
    MissingSite {
        /// The missing site.
        site: SiteKey,
    },
}

/// Resolve the vertex chain `a, b, c` from three segments.
///
/// `b` is the endpoint of `ab` shared with `bc`, `a` is the other endpoint of
/// `ab`, `c` is the other endpoint of `bc`, and `ca` must connect `c` back to
/// `a`. Returns `None` if the segments do not close a loop over three distinct
/// sites.
///
/// The stored direction of each segment is ignored. Any chain that closes is
/// accepted, including one where `ab`'s first endpoint is the one shared with
/// `bc` (then `a = ab.b()`). This is wider than the rule "`a = ab.a()`, then
/// walk `bc` and `ca` from there", which rejects such chains. The vertex order,
/// and therefore [`TriangleGeometry::winding`], follows the shared endpoints
/// and may differ from the order that rule would give.
///
/// # Examples
///
/// ```rust
/// use point_graph::core::segment::Segment;
/// use point_graph::core::triangle::resolve_chain;
/// use point_graph::core::triangulation_data_structure::SiteKey;
/// use slotmap::SlotMap;
///
/// let mut sites: SlotMap<SiteKey, ()> = SlotMap::with_key();
/// let (u, v, p) = (sites.insert(()), sites.insert(()), sites.insert(()));
///
/// // Boundary edge u-v, then the fan edges v-p and u-p.
/// let chain = resolve_chain(Segment::new(u, v), Segment::new(v, p), Segment::new(u, p));
/// assert_eq!(chain, Some([u, v, p]));
///
/// // Two segments that never meet cannot close a loop.
/// assert_eq!(
///     resolve_chain(Segment::new(u, v), Segment::new(p, p), Segment::new(u, p)),
///     None
/// );
/// ```
#[must_use]
pub fn resolve_chain(ab: Segment, bc: Segment, ca: Segment) -> Option<[SiteKey; 3]> {
    let (a, b) = if bc.has_vertex(ab.b()) {
        (ab.a(), ab.b())
    } else if bc.has_vertex(ab.a()) {
        (ab.b(), ab.a())
    } else {
        return None;
    };
    let c = bc.other(b)?;

    if a == b || b == c || c == a || !ca.connects(c, a) {
        return None;
    }
    Some([a, b, c])
}

/// A triangle of the graph, identified by its [`TriangleKey`](crate::core::triangulation_data_structure::TriangleKey).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Triangle {
    ab: SegmentKey,
    bc: SegmentKey,
    ca: SegmentKey,
    vertices: [SiteKey; 3],
    geometry: TriangleGeometry,
}

impl Triangle {
    /// Builds a triangle from three chained segments.
    ///
    /// `point_of` resolves site coordinates for the derived geometry.
    ///
    /// # Errors
    ///
    /// Returns [`TriangleError::MalformedChain`] if the segment keys are not
    /// distinct or the segments do not form a closed loop, and
    /// [`TriangleError::MissingSite`] if a vertex has no coordinates.
    pub fn from_segments<F>(
        (ab, ab_segment): (SegmentKey, Segment),
        (bc, bc_segment): (SegmentKey, Segment),
        (ca, ca_segment): (SegmentKey, Segment),
        point_of: F,
    ) -> Result<Self, TriangleError>
    where
        F: Fn(SiteKey) -> Option<Point>,
    {
        let malformed = || TriangleError::MalformedChain { ab, bc, ca };
        if ab == bc || bc == ca || ca == ab {
            return Err(malformed());
        }
        let vertices = resolve_chain(ab_segment, bc_segment, ca_segment).ok_or_else(malformed)?;

        let [pa, pb, pc] = vertices.map(|site| point_of(site).ok_or(site));
        let (pa, pb, pc) = match (pa, pb, pc) {
            (Ok(pa), Ok(pb), Ok(pc)) => (pa, pb, pc),
            (Err(site), _, _) | (_, Err(site), _) | (_, _, Err(site)) => {
                return Err(TriangleError::MissingSite { site });
            }
        };

        Ok(Self {
            ab,
            bc,
            ca,
            vertices,
            geometry: TriangleGeometry::new(pa, pb, pc),
        })
    }

    /// The three segments in chain order `ab, bc, ca`.
    #[inline]
    #[must_use]
    pub const fn edges(&self) -> [SegmentKey; 3] {
        [self.ab, self.bc, self.ca]
    }

    /// The three derived vertices in chain order `a, b, c`.
    #[inline]
    #[must_use]
    pub const fn vertices(&self) -> [SiteKey; 3] {
        self.vertices
    }

    /// Cached derived geometry.
    #[inline]
    #[must_use]
    pub const fn geometry(&self) -> &TriangleGeometry {
        &self.geometry
    }

    /// `true` iff `site` is one of the three vertices.
    #[inline]
    #[must_use]
    pub fn has_vertex(&self, site: SiteKey) -> bool {
        self.vertices.contains(&site)
    }

    /// `true` iff `segment` is one of the three edges.
    #[inline]
    #[must_use]
    pub fn has_edge(&self, segment: SegmentKey) -> bool {
        self.ab == segment || self.bc == segment || self.ca == segment
    }

    /// The vertex not on `segment`, if `segment` is an edge of this triangle.
    #[must_use]
    pub fn opposite_vertex(&self, segment: SegmentKey) -> Option<SiteKey> {
        let [a, b, c] = self.vertices;
        if segment == self.ab {
            Some(c)
        } else if segment == self.bc {
            Some(a)
        } else if segment == self.ca {
            Some(b)
        } else {
            None
        }
    }
}
