//! Voronoi dual of the triangulation graph.
//!
//! Two triangles are Voronoi neighbours iff they share a segment. Voronoi
//! vertices are triangle circumcenters and every interior segment yields one
//! Voronoi edge between the circumcenters of its two triangles.
//!
//! Nothing here is cached inside the [`Tds`]: callers build a [`VoronoiDual`]
//! (or run a single [`voronoi_neighbors`] query) on the current snapshot, and
//! rebuild it after the graph changes.

#![forbid(unsafe_code)]

use thiserror::Error;

use crate::core::collections::{
    SmallBuffer, TriangleNeighborsMap, TriangleSecondaryMap, fast_hash_map_with_capacity,
};
use crate::core::triangulation_data_structure::{SegmentKey, Tds, TriangleKey};
use crate::geometry::point::Point;

/// Neighbour list of one triangle; a triangle has at most three.
pub type TriangleNeighbors = SmallBuffer<TriangleKey, 3>;

/// Errors raised by Voronoi queries.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum AdjacencyError {
    /// The queried triangle is not in the graph.
    #[error("Triangle {triangle:?} does not exist")]
    MissingTriangle {
        /// The missing triangle.
        triangle: TriangleKey,
    },

    /// A segment is shared by more than two triangles.
    #[error("Segment {segment:?} is shared by {count} triangles")]
    OverSharedSegment {
        /// The offending segment.
        segment: SegmentKey,
        /// Number of triangles using it.
        count: usize,
    },
}

/// An edge of the Voronoi diagram, dual to an interior segment.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VoronoiEdge {
    /// The interior segment this edge crosses.
    pub segment: SegmentKey,
    /// The two triangles sharing `segment`.
    pub triangles: [TriangleKey; 2],
    /// Circumcenter of `triangles[0]`.
    pub from: Point,
    /// Circumcenter of `triangles[1]`.
    pub to: Point,
}

/// Voronoi neighbours of `triangle`, found through the segment → triangles index.
///
/// Neighbours are listed in edge order (`ab`, `bc`, `ca`), skipping hull edges.
///
/// # Errors
///
/// Returns [`AdjacencyError::MissingTriangle`] if `triangle` is not in `tds`.
///
/// # Examples
///
/// ```
/// use point_graph::core::adjacency::voronoi_neighbors;
/// use point_graph::prelude::*;
///
/// let dt = DelaunayTriangulation::new(&[
///     Point::new(0.0, 0.0),
///     Point::new(4.0, 0.0),
///     Point::new(4.0, 3.0),
///     Point::new(0.0, 4.0),
/// ])
/// .unwrap();
/// for (key, _) in dt.triangles() {
///     assert_eq!(voronoi_neighbors(dt.tds(), key).unwrap().len(), 1);
/// }
/// ```
pub fn voronoi_neighbors(
    tds: &Tds,
    triangle: TriangleKey,
) -> Result<TriangleNeighbors, AdjacencyError> {
    let edges = tds
        .triangle(triangle)
        .ok_or(AdjacencyError::MissingTriangle { triangle })?
        .edges();

    let mut neighbors = TriangleNeighbors::new();
    for segment in edges {
        for &other in tds.triangles_of_segment(segment) {
            if other != triangle && !neighbors.contains(&other) {
                neighbors.push(other);
            }
        }
    }
    Ok(neighbors)
}

/// Voronoi neighbours of `triangle` found by scanning every triangle for a
/// shared edge, without the incidence index.
///
/// Yields the same set as [`voronoi_neighbors`] on a consistent graph; used to
/// cross-check the index.
///
/// # Errors
///
/// Returns [`AdjacencyError::MissingTriangle`] if `triangle` is not in `tds`.
pub fn voronoi_neighbors_by_scan(
    tds: &Tds,
    triangle: TriangleKey,
) -> Result<TriangleNeighbors, AdjacencyError> {
    let target = tds
        .triangle(triangle)
        .ok_or(AdjacencyError::MissingTriangle { triangle })?;

    Ok(tds
        .triangles()
        .filter(|&(key, other)| {
            key != triangle && target.edges().iter().any(|&edge| other.has_edge(edge))
        })
        .map(|(key, _)| key)
        .collect())
}

/// Immutable Voronoi dual built from a graph snapshot.
///
/// # Examples
///
/// ```
/// use point_graph::core::adjacency::VoronoiDual;
/// use point_graph::prelude::*;
///
/// let dt = DelaunayTriangulation::new(&[
///     Point::new(0.0, 0.0),
///     Point::new(4.0, 0.0),
///     Point::new(4.0, 3.0),
///     Point::new(0.0, 4.0),
/// ])
/// .unwrap();
/// let dual = VoronoiDual::build(dt.tds()).unwrap();
/// assert_eq!(dual.number_of_vertices(), 2);
/// assert_eq!(dual.edges().len(), 1);
/// ```
#[derive(Clone, Debug)]
pub struct VoronoiDual {
    vertices: TriangleSecondaryMap<Point>,
    neighbors: TriangleNeighborsMap,
    edges: Vec<VoronoiEdge>,
}

impl VoronoiDual {
    /// Builds the dual of every triangle in `tds`.
    ///
    /// # Errors
    ///
    /// Returns [`AdjacencyError::OverSharedSegment`] if a segment borders more
    /// than two triangles, and [`AdjacencyError::MissingTriangle`] if the
    /// incidence index names a triangle that does not exist.
    pub fn build(tds: &Tds) -> Result<Self, AdjacencyError> {
        let mut vertices = TriangleSecondaryMap::new();
        let mut neighbors: TriangleNeighborsMap =
            fast_hash_map_with_capacity(tds.number_of_triangles());
        for (key, triangle) in tds.triangles() {
            vertices.insert(key, triangle.geometry().circumcenter());
            neighbors.insert(key, SmallBuffer::new());
        }

        let mut edges = Vec::new();
        for segment in tds.segment_keys() {
            let incident = tds.triangles_of_segment(segment);
            match *incident {
                [t0, t1] => {
                    let from = *vertices
                        .get(t0)
                        .ok_or(AdjacencyError::MissingTriangle { triangle: t0 })?;
                    let to = *vertices
                        .get(t1)
                        .ok_or(AdjacencyError::MissingTriangle { triangle: t1 })?;
                    neighbors.entry(t0).or_default().push(t1);
                    neighbors.entry(t1).or_default().push(t0);
                    edges.push(VoronoiEdge {
                        segment,
                        triangles: [t0, t1],
                        from,
                        to,
                    });
                }
                [] | [_] => {}
                _ => {
                    return Err(AdjacencyError::OverSharedSegment {
                        segment,
                        count: incident.len(),
                    });
                }
            }
        }

        tracing::debug!(
            vertices = vertices.len(),
            edges = edges.len(),
            "built Voronoi dual"
        );
        Ok(Self {
            vertices,
            neighbors,
            edges,
        })
    }

    /// Voronoi vertex (circumcenter) of `triangle`.
    #[must_use]
    pub fn vertex(&self, triangle: TriangleKey) -> Option<Point> {
        self.vertices.get(triangle).copied()
    }

    /// Number of Voronoi vertices, one per triangle.
    #[must_use]
    pub fn number_of_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Neighbours of `triangle`; empty for unknown triangles.
    #[must_use]
    pub fn neighbors(&self, triangle: TriangleKey) -> &[TriangleKey] {
        self.neighbors
            .get(&triangle)
            .map(|buffer| buffer.as_slice())
            .unwrap_or_default()
    }

    /// All finite Voronoi edges.
    #[must_use]
    pub fn edges(&self) -> &[VoronoiEdge] {
        &self.edges
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::site::Site;

    /// A strip of three triangles: `t0 | t1 | t2`, sharing two diagonals.
    fn strip() -> (Tds, [TriangleKey; 3]) {
        let mut tds = Tds::empty();
        let p: Vec<_> = [(0.0, 0.0), (2.0, 0.0), (4.0, 0.0), (1.0, 2.0), (3.0, 2.0)]
            .into_iter()
            .enumerate()
            .map(|(i, xy)| tds.insert_site(Site::input(i, Point::from(xy))))
            .collect();
        let s01 = tds.insert_segment(p[0], p[1]).unwrap();
        let s13 = tds.insert_segment(p[1], p[3]).unwrap();
        let s30 = tds.insert_segment(p[3], p[0]).unwrap();
        let s14 = tds.insert_segment(p[1], p[4]).unwrap();
        let s43 = tds.insert_segment(p[4], p[3]).unwrap();
        let s12 = tds.insert_segment(p[1], p[2]).unwrap();
        let s24 = tds.insert_segment(p[2], p[4]).unwrap();
        let t0 = tds.insert_triangle(s01, s13, s30).unwrap();
        let t1 = tds.insert_triangle(s14, s43, s13).unwrap();
        let t2 = tds.insert_triangle(s12, s24, s14).unwrap();
        (tds, [t0, t1, t2])
    }

    #[test]
    fn neighbors_follow_shared_segments() {
        let (tds, [t0, t1, t2]) = strip();
        assert_eq!(voronoi_neighbors(&tds, t0).unwrap().as_slice(), &[t1]);
        assert_eq!(voronoi_neighbors(&tds, t2).unwrap().as_slice(), &[t1]);

        let middle = voronoi_neighbors(&tds, t1).unwrap();
        assert_eq!(middle.len(), 2);
        assert!(middle.contains(&t0) && middle.contains(&t2));
    }

    #[test]
    fn scan_agrees_with_index() {
        let (tds, keys) = strip();
        for key in keys {
            let mut indexed = voronoi_neighbors(&tds, key).unwrap();
            let mut scanned = voronoi_neighbors_by_scan(&tds, key).unwrap();
            indexed.sort();
            scanned.sort();
            assert_eq!(indexed, scanned);
        }
    }

    #[test]
    fn missing_triangle_is_reported() {
        let (mut tds, [t0, ..]) = strip();
        tds.remove_triangle(t0);
        assert_eq!(
            voronoi_neighbors(&tds, t0),
            Err(AdjacencyError::MissingTriangle { triangle: t0 })
        );
        assert!(voronoi_neighbors_by_scan(&tds, t0).is_err());
    }

    #[test]
    fn dual_has_one_edge_per_interior_segment() {
        let (tds, [t0, t1, t2]) = strip();
        let dual = VoronoiDual::build(&tds).unwrap();
        assert_eq!(dual.number_of_vertices(), 3);
        assert_eq!(dual.edges().len(), 2);
        assert_eq!(dual.neighbors(t1).len(), 2);
        assert_eq!(dual.neighbors(t0), &[t1]);

        for edge in dual.edges() {
            assert!(!tds.is_hull_segment(edge.segment));
            assert_eq!(Some(edge.from), dual.vertex(edge.triangles[0]));
            assert_eq!(Some(edge.to), dual.vertex(edge.triangles[1]));
        }
        assert_eq!(
            dual.vertex(t2),
            tds.triangle_geometry(t2).map(|g| g.circumcenter())
        );
    }

    #[test]
    fn dual_of_empty_graph_is_empty() {
        let dual = VoronoiDual::build(&Tds::empty()).unwrap();
        assert_eq!(dual.number_of_vertices(), 0);
        assert!(dual.edges().is_empty());
    }
}
