//! # point-graph
//!
//! Incremental 2D Delaunay triangulation of an ordered point list, with two
//! structures derived from it: the Voronoi dual (triangles adjacent through a
//! shared segment, circumcenters as Voronoi vertices) and a Euclidean minimum
//! spanning tree over the triangulation's segments.
//!
//! # Features
//!
//! - Bowyer–Watson insertion over a bootstrap (super) triangle, one point at a
//!   time, with a read-only cavity plan and an atomic commit
//! - Arena storage ([`slotmap`]) with stable keys for sites, segments and
//!   triangles; two coordinate-equal inputs stay two distinct sites
//! - Incidence indices site → segments and segment → triangles, kept in step
//!   with every mutation
//! - Bounded, seeded jitter of the inserted point when a cavity is degenerate
//! - Voronoi adjacency and Kruskal MST computed on demand
//! - Serialization with [serde](https://serde.rs)
//!
//! # Basic Usage
//!
//! ```rust
//! use point_graph::prelude::*;
//!
//! let points = [
//!     Point::new(0.0, 0.0),
//!     Point::new(4.0, 0.0),
//!     Point::new(4.0, 4.0),
//!     Point::new(0.0, 4.0),
//!     Point::new(1.0, 2.0),
//! ];
//! let dt = DelaunayTriangulation::new(&points).unwrap();
//!
//! assert_eq!(dt.number_of_sites(), 5);
//! assert_eq!(dt.number_of_triangles(), 4);
//! assert!(dt.is_valid().is_ok());
//! assert!(dt.validate_delaunay().is_ok());
//!
//! // Derived structures.
//! let tree = dt.minimum_spanning_tree().unwrap();
//! assert_eq!(tree.len(), 4);
//! for (key, _) in dt.triangles() {
//!     assert!(dt.voronoi_neighbors(key).unwrap().len() <= 3);
//! }
//! ```
//!
//! # Triangulation Invariants
//!
//! Checked by [`DelaunayTriangulation::is_valid`](core::delaunay_triangulation::DelaunayTriangulation::is_valid)
//! and [`DelaunayTriangulation::validate_delaunay`](core::delaunay_triangulation::DelaunayTriangulation::validate_delaunay):
//!
//! - **Incidence** – both indices agree with the arenas.
//! - **Segment sharing** – a segment borders at most 2 triangles.
//! - **Triangle validity** – every triangle's segments close a chain and its
//!   vertices are not collinear.
//! - **No bootstrap residue** – no synthetic site survives a run.
//! - **Delaunay property** – no site lies strictly inside the circumcircle of
//!   a triangle it is not a vertex of.
//!
//! # Degenerate input
//!
//! Collinear input produces a path of segments and no triangle. Exact
//! duplicates are kept as separate sites unless
//! [`TriangulationOptions::deduplicate`](core::builder::TriangulationOptions::deduplicate)
//! is set; a duplicate is stored with a tiny jitter so that every triangle
//! keeps a non-zero area.

// Forbid unsafe code throughout the entire crate
#![forbid(unsafe_code)]

#[macro_use]
extern crate derive_builder;

/// Triangulation graph, insertion algorithms and derived structures.
pub mod core {
    /// Construction algorithms
    pub mod algorithms {
        /// Incremental Bowyer–Watson insertion
        pub mod bowyer_watson;
        /// Bootstrap triangle creation and removal
        pub mod super_triangle;
    }
    pub mod adjacency;
    pub mod builder;
    /// Collection types used by the graph and its indices
    pub mod collections;
    pub mod delaunay_triangulation;
    pub mod segment;
    pub mod site;
    pub mod spanning_tree;
    pub mod triangle;
    pub mod triangulation_data_structure;
    pub mod util;

    // Re-export the `core` modules.
    pub use adjacency::*;
    pub use builder::*;
    pub use delaunay_triangulation::*;
    pub use segment::*;
    pub use site::*;
    pub use spanning_tree::*;
    pub use triangle::*;
    pub use triangulation_data_structure::*;
    pub use util::*;
    // Note: collections module not re-exported here to avoid namespace pollution
}

/// Points, geometric predicates and closed-form geometric attributes.
pub mod geometry {
    pub mod point;
    pub mod predicates;
    /// Geometric utility functions and point generators
    pub mod util;
    pub use point::*;
    pub use predicates::*;
    pub use util::*;
}

/// Topological characteristics of triangulation graphs.
pub mod topology {
    /// Counting and classification
    pub mod characteristics {
        pub mod euler;
    }
}

/// A prelude module that re-exports commonly used types.
pub mod prelude {
    pub use crate::core::{
        adjacency::{AdjacencyError, TriangleNeighbors, VoronoiDual, VoronoiEdge},
        algorithms::bowyer_watson::InsertionError,
        builder::{TriangulationOptions, TriangulationOptionsBuilder},
        delaunay_triangulation::{DelaunayTriangulation, TriangulationStatistics},
        segment::Segment,
        site::{Site, SiteKind},
        spanning_tree::SpanningTreeError,
        triangle::Triangle,
        triangulation_data_structure::{
            SegmentKey, SiteKey, Tds, TriangleKey, TriangulationValidationError,
        },
        util::{dedup_points_exact, is_delaunay},
    };

    pub use crate::core::collections::{
        FastHashMap, FastHashSet, SiteSecondaryMap, SmallBuffer, TriangleSecondaryMap,
    };

    pub use crate::geometry::{
        point::Point,
        predicates::{InCircle, Orientation},
        util::{BoundingBox, TriangleGeometry},
    };
}

/// The function `is_normal` checks that structs implement `auto` traits.
/// Traits are checked at compile time, so this function is only used for
/// testing.
#[must_use]
pub const fn is_normal<T: Sized + Send + Sync + Unpin>() -> bool {
    true
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::{
        core::{
            builder::TriangulationOptions, delaunay_triangulation::DelaunayTriangulation,
            segment::Segment, site::Site, triangle::Triangle,
            triangulation_data_structure::Tds,
        },
        geometry::Point,
        is_normal,
    };

    #[test]
    fn normal_types() {
        assert!(is_normal::<Point>());
        assert!(is_normal::<Site>());
        assert!(is_normal::<Segment>());
        assert!(is_normal::<Triangle>());
        assert!(is_normal::<Tds>());
        assert!(is_normal::<TriangulationOptions>());
        assert!(is_normal::<DelaunayTriangulation>());
    }

    #[test]
    fn test_prelude_exports() {
        use crate::prelude::*;

        let mut map: FastHashMap<u64, usize> = FastHashMap::default();
        map.insert(123, 456);
        assert_eq!(map.get(&123), Some(&456));

        let dt = DelaunayTriangulation::new(&[
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(0.0, 1.0),
        ])
        .unwrap();
        let mut degree: SiteSecondaryMap<usize> = SiteSecondaryMap::new();
        for (key, _) in dt.sites() {
            degree.insert(key, dt.tds().segments_of_site(key).len());
        }
        assert!(degree.values().all(|&d| d == 2));

        let (key, _) = dt.triangles().next().unwrap();
        let winding = dt.triangle_geometry(key).map(TriangleGeometry::winding);
        assert!(matches!(
            winding,
            Some(Orientation::POSITIVE | Orientation::NEGATIVE)
        ));
    }
}
