use super::{
    FastHashMap, FastHashSet, SmallBuffer, TYPICAL_CAVITY_SIZE, TYPICAL_SITE_DEGREE,
};
use crate::core::triangulation_data_structure::{SegmentKey, SiteKey, TriangleKey};

// =============================================================================
// INCIDENCE INDICES
// =============================================================================

/// Site → incident segments.
///
/// Every site in the graph has an entry (possibly empty); entries are
/// inserted and purged together with the site.
///
/// # Examples
///
/// ```rust
/// use point_graph::core::collections::SiteToSegmentsMap;
///
/// let index: SiteToSegmentsMap = SiteToSegmentsMap::default();
/// assert!(index.is_empty());
/// ```
pub type SiteToSegmentsMap = FastHashMap<SiteKey, SmallBuffer<SegmentKey, TYPICAL_SITE_DEGREE>>;

/// Segment → incident triangles.
///
/// Holds at most two triangles per segment: one for a hull segment, two for
/// an interior segment.
///
/// # Examples
///
/// ```rust
/// use point_graph::core::collections::SegmentToTrianglesMap;
///
/// let index: SegmentToTrianglesMap = SegmentToTrianglesMap::default();
/// assert!(index.is_empty());
/// ```
pub type SegmentToTrianglesMap = FastHashMap<SegmentKey, SmallBuffer<TriangleKey, 2>>;

// =============================================================================
// KEY BUFFERS AND SETS
// =============================================================================

/// Buffer of triangle keys sized for a typical insertion cavity.
pub type TriangleKeyBuffer = SmallBuffer<TriangleKey, TYPICAL_CAVITY_SIZE>;

/// Buffer of segment keys sized for a typical cavity boundary.
pub type SegmentKeyBuffer = SmallBuffer<SegmentKey, TYPICAL_CAVITY_SIZE>;

/// Buffer of site keys sized for a typical cavity boundary.
pub type SiteKeyBuffer = SmallBuffer<SiteKey, TYPICAL_CAVITY_SIZE>;

/// Set of triangle keys for membership tests.
pub type TriangleKeySet = FastHashSet<TriangleKey>;

/// Set of segment keys for membership tests.
pub type SegmentKeySet = FastHashSet<SegmentKey>;

/// Set of site keys for membership tests.
pub type SiteKeySet = FastHashSet<SiteKey>;

/// Triangle → neighbouring triangles across shared segments (at most three).
pub type TriangleNeighborsMap = FastHashMap<TriangleKey, SmallBuffer<TriangleKey, 3>>;
