//! Euler characteristic and face counts of planar triangulations.
//!
//! For a triangulation of a planar point set whose triangles cover the convex
//! hull, `χ = V − E + F = 1` (the unbounded face is not counted), and with
//! `h` hull segments:
//!
//! ```text
//! E = 3V − 3 − h
//! F = 2V − 2 − h
//! ```
//!
//! # Examples
//!
//! ```rust
//! use point_graph::prelude::*;
//! use point_graph::topology::characteristics::euler;
//!
//! let dt = DelaunayTriangulation::new(&[
//!     Point::new(0.0, 0.0),
//!     Point::new(4.0, 0.0),
//!     Point::new(0.0, 4.0),
//!     Point::new(1.0, 1.0),
//! ])
//! .unwrap();
//!
//! let counts = euler::count_faces(dt.tds());
//! assert_eq!(euler::euler_characteristic(&counts), 1);
//! assert_eq!(euler::count_hull_segments(dt.tds()), 3);
//! assert_eq!(euler::expected_segment_count(4, 3), Some(6));
//! ```

#![forbid(unsafe_code)]

use thiserror::Error;

use crate::core::triangulation_data_structure::Tds;

/// Errors reported by topology checks.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum TopologyError {
    /// Euler characteristic does not match the classification.
    #[error(
        "Euler characteristic mismatch: computed χ={computed}, expected χ={expected} for {classification:?}"
    )]
    EulerMismatch {
        /// The computed Euler characteristic.
        computed: isize,
        /// The expected Euler characteristic.
        expected: isize,
        /// Classification the expectation was derived from.
        classification: TopologyClassification,
    },

    /// Segment or triangle count differs from the hull-based formula.
    #[error("Expected {expected} {what} for {sites} sites and {hull} hull segments, found {actual}")]
    CountMismatch {
        /// `"segments"` or `"triangles"`.
        what: &'static str,
        /// Number of sites.
        sites: usize,
        /// Number of hull segments.
        hull: usize,
        /// Count predicted by the formula.
        expected: usize,
        /// Count found in the graph.
        actual: usize,
    },
}

/// Number of sites, segments and triangles (the planar f-vector).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FaceCounts {
    /// `f₀`
    pub sites: usize,
    /// `f₁`
    pub segments: usize,
    /// `f₂`
    pub triangles: usize,
}

/// Topological shape of a triangulation graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TopologyClassification {
    /// No sites.
    Empty,
    /// Sites and segments but no triangle (all sites collinear, or a single site).
    Collinear,
    /// Exactly one triangle.
    SingleTriangle,
    /// A triangulated disk.
    Disk,
}

/// Counts the sites, segments and triangles of `tds`.
#[must_use]
pub fn count_faces(tds: &Tds) -> FaceCounts {
    FaceCounts {
        sites: tds.number_of_sites(),
        segments: tds.number_of_segments(),
        triangles: tds.number_of_triangles(),
    }
}

/// `V − E + F`.
///
/// # Examples
///
/// ```rust
/// use point_graph::topology::characteristics::euler::{FaceCounts, euler_characteristic};
///
/// let single = FaceCounts { sites: 3, segments: 3, triangles: 1 };
/// assert_eq!(euler_characteristic(&single), 1);
/// ```
#[must_use]
#[allow(clippy::cast_possible_wrap)]
pub fn euler_characteristic(counts: &FaceCounts) -> isize {
    counts.sites as isize - counts.segments as isize + counts.triangles as isize
}

/// Number of segments bordering exactly one triangle.
#[must_use]
pub fn count_hull_segments(tds: &Tds) -> usize {
    tds.segment_keys()
        .filter(|&segment| tds.is_hull_segment(segment))
        .count()
}

/// `3n − 3 − h`, or `None` when that is negative.
#[must_use]
pub fn expected_segment_count(sites: usize, hull_segments: usize) -> Option<usize> {
    (3 * sites).checked_sub(3 + hull_segments)
}

/// `2n − 2 − h`, or `None` when that is negative.
#[must_use]
pub fn expected_triangle_count(sites: usize, hull_segments: usize) -> Option<usize> {
    (2 * sites).checked_sub(2 + hull_segments)
}

/// Classifies `tds` by its triangle count.
#[must_use]
pub fn classify_triangulation(tds: &Tds) -> TopologyClassification {
    match (tds.number_of_sites(), tds.number_of_triangles()) {
        (0, _) => TopologyClassification::Empty,
        (_, 0) => TopologyClassification::Collinear,
        (_, 1) => TopologyClassification::SingleTriangle,
        _ => TopologyClassification::Disk,
    }
}

/// Expected χ: 0 for an empty graph, 1 otherwise (a tree or a disk).
#[must_use]
pub const fn expected_chi_for(classification: TopologyClassification) -> isize {
    match classification {
        TopologyClassification::Empty => 0,
        TopologyClassification::Collinear
        | TopologyClassification::SingleTriangle
        | TopologyClassification::Disk => 1,
    }
}

/// Checks χ, and for graphs with triangles also the hull-based segment and
/// triangle counts.
///
/// # Errors
///
/// Returns [`TopologyError::EulerMismatch`] or [`TopologyError::CountMismatch`]
/// describing the first discrepancy.
pub fn validate_triangulation_euler(tds: &Tds) -> Result<FaceCounts, TopologyError> {
    let counts = count_faces(tds);
    let classification = classify_triangulation(tds);
    let computed = euler_characteristic(&counts);
    let expected = expected_chi_for(classification);
    if computed != expected {
        return Err(TopologyError::EulerMismatch {
            computed,
            expected,
            classification,
        });
    }

    if counts.triangles > 0 {
        let hull = count_hull_segments(tds);
        let checks = [
            ("segments", expected_segment_count(counts.sites, hull), counts.segments),
            ("triangles", expected_triangle_count(counts.sites, hull), counts.triangles),
        ];
        for (what, expected, actual) in checks {
            if expected != Some(actual) {
                return Err(TopologyError::CountMismatch {
                    what,
                    sites: counts.sites,
                    hull,
                    expected: expected.unwrap_or_default(),
                    actual,
                });
            }
        }
    }

    tracing::debug!(?counts, ?classification, chi = computed, "validated Euler characteristic");
    Ok(counts)
}
