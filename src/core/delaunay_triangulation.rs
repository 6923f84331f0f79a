//! Delaunay triangulation facade.
//!
//! [`DelaunayTriangulation`] owns the pending input points, the options and
//! the triangulation graph. Every [`triangulate`](DelaunayTriangulation::triangulate)
//! call is a full rebuild:
//!
//! 1. clear the graph and add the bootstrap triangle around the input,
//! 2. insert each point in input order ([`insert_site`]),
//! 3. remove the bootstrap triangle and everything touching it.
//!
//! A run either succeeds for every point or leaves the graph empty; there is
//! no partially triangulated state to observe.

#![forbid(unsafe_code)]

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::core::adjacency::{
    AdjacencyError, TriangleNeighbors, VoronoiDual, VoronoiEdge, voronoi_neighbors,
};
use crate::core::algorithms::bowyer_watson::{InsertionError, PerturbationPolicy, insert_site};
use crate::core::algorithms::super_triangle::{
    SuperTriangleRemoval, create_super_triangle, remove_super_triangle,
};
use crate::core::builder::TriangulationOptions;
use crate::core::segment::Segment;
use crate::core::site::Site;
use crate::core::spanning_tree::{SpanningTreeError, minimum_spanning_tree};
use crate::core::triangle::Triangle;
use crate::core::triangulation_data_structure::{
    SegmentKey, SiteKey, Tds, TriangleKey, TriangulationValidationError,
};
use crate::core::util::{DelaunayValidationError, is_delaunay, points_equal_exact};
use crate::geometry::point::Point;
use crate::geometry::util::{BoundingBox, TriangleGeometry};

/// Counters describing the last [`DelaunayTriangulation::triangulate`] run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TriangulationStatistics {
    /// Points inserted.
    pub inserted_sites: usize,
    /// Points whose stored coordinates were jittered.
    pub perturbed_sites: usize,
    /// Jitter attempts over all points.
    pub perturbation_attempts: usize,
    /// What the bootstrap removal deleted.
    pub removal: SuperTriangleRemoval,
}

/// A 2D Delaunay triangulation of an ordered point list.
///
/// # Examples
///
/// ```rust
/// use point_graph::prelude::*;
///
/// let dt = DelaunayTriangulation::new(&[
///     Point::new(0.0, 0.0),
///     Point::new(4.0, 0.0),
///     Point::new(4.0, 4.0),
///     Point::new(0.0, 4.0),
/// ])
/// .unwrap();
///
/// assert_eq!(dt.number_of_sites(), 4);
/// assert_eq!(dt.number_of_segments(), 5);
/// assert_eq!(dt.number_of_triangles(), 2);
/// assert!(dt.is_valid().is_ok());
/// assert!(dt.validate_delaunay().is_ok());
/// ```
#[derive(Clone, Debug, Default)]
pub struct DelaunayTriangulation {
    tds: Tds,
    points: Vec<Point>,
    options: TriangulationOptions,
    statistics: TriangulationStatistics,
}

impl DelaunayTriangulation {
    /// Triangulates `points` with default options.
    ///
    /// # Errors
    ///
    /// Returns the [`InsertionError`] that stopped the run; see
    /// [`triangulate`](Self::triangulate).
    pub fn new(points: &[Point]) -> Result<Self, InsertionError> {
        Self::with_options(points, TriangulationOptions::default())
    }

    /// Triangulates `points` with the given options.
    ///
    /// Points go through [`add_point`](Self::add_point), so exact duplicates
    /// are dropped when `options.deduplicate()` is set.
    ///
    /// # Errors
    ///
    /// Returns the [`InsertionError`] that stopped the run.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use point_graph::core::builder::TriangulationOptionsBuilder;
    /// use point_graph::prelude::*;
    ///
    /// let options = TriangulationOptionsBuilder::default()
    ///     .deduplicate(true)
    ///     .build()
    ///     .unwrap();
    /// let points = [
    ///     Point::new(0.0, 0.0),
    ///     Point::new(4.0, 0.0),
    ///     Point::new(0.0, 4.0),
    ///     Point::new(4.0, 0.0),
    /// ];
    /// let dt = DelaunayTriangulation::with_options(&points, options).unwrap();
    /// assert_eq!(dt.points().len(), 3);
    /// assert_eq!(dt.number_of_triangles(), 1);
    /// ```
    pub fn with_options(
        points: &[Point],
        options: TriangulationOptions,
    ) -> Result<Self, InsertionError> {
        let mut dt = Self::with_empty_options(options);
        for &point in points {
            dt.add_point(point);
        }
        dt.triangulate()?;
        Ok(dt)
    }

    /// An empty triangulation with default options.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// An empty triangulation with the given options.
    #[must_use]
    pub fn with_empty_options(options: TriangulationOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Rebuilds a triangulation around an existing graph.
    ///
    /// The pending point list is recovered from the input sites, ordered by
    /// input index; jittered sites contribute their stored coordinates.
    #[must_use]
    pub fn from_tds(tds: Tds, options: TriangulationOptions) -> Self {
        let mut input: Vec<(usize, Point)> = tds
            .sites()
            .filter_map(|(_, site)| Some((site.input_index()?, site.point())))
            .collect();
        input.sort_by_key(|&(index, _)| index);
        Self {
            tds,
            points: input.into_iter().map(|(_, point)| point).collect(),
            options,
            statistics: TriangulationStatistics::default(),
        }
    }

    // =========================================================================
    // INPUT
    // =========================================================================

    /// Appends `point` to the pending input without re-triangulating.
    ///
    /// Returns `false` (and ignores the point) when deduplication is enabled
    /// and an equal point is already pending.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use point_graph::prelude::*;
    ///
    /// let mut dt = DelaunayTriangulation::new(&[
    ///     Point::new(0.0, 0.0),
    ///     Point::new(4.0, 0.0),
    ///     Point::new(0.0, 4.0),
    /// ])
    /// .unwrap();
    ///
    /// assert!(dt.add_point(Point::new(1.0, 1.0)));
    /// assert_eq!(dt.number_of_sites(), 3);
    /// dt.triangulate().unwrap();
    /// assert_eq!(dt.number_of_sites(), 4);
    /// assert_eq!(dt.number_of_triangles(), 3);
    /// ```
    pub fn add_point(&mut self, point: Point) -> bool {
        if self.options.deduplicate()
            && self.points.iter().any(|&pending| points_equal_exact(pending, point))
        {
            tracing::debug!(point = %point, "ignoring duplicate point");
            return false;
        }
        self.points.push(point);
        true
    }

    /// Pending input points, in insertion order.
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Options in effect.
    #[must_use]
    pub const fn options(&self) -> &TriangulationOptions {
        &self.options
    }

    /// Counters of the last run.
    #[must_use]
    pub const fn statistics(&self) -> &TriangulationStatistics {
        &self.statistics
    }

    // =========================================================================
    // TRIANGULATION
    // =========================================================================

    /// Rebuilds the graph from the pending points.
    ///
    /// The jitter RNG is re-seeded from the options on every call, so running
    /// twice on the same input yields the same graph.
    ///
    /// # Errors
    ///
    /// - [`InsertionError::NonFiniteCoordinate`] if a pending point is not finite;
    /// - [`InsertionError::DegenerateCavity`] if jitter could not resolve a
    ///   degenerate insertion;
    /// - a fatal error ([`InsertionError::is_fatal`]) if the graph became
    ///   inconsistent.
    ///
    /// On error the graph is left empty.
    pub fn triangulate(&mut self) -> Result<TriangulationStatistics, InsertionError> {
        let result = self.rebuild();
        match &result {
            Ok(statistics) => {
                self.statistics = *statistics;
                tracing::debug!(
                    sites = self.tds.number_of_sites(),
                    segments = self.tds.number_of_segments(),
                    triangles = self.tds.number_of_triangles(),
                    ?statistics,
                    "triangulation complete"
                );
            }
            Err(error) => {
                self.tds.clear();
                self.statistics = TriangulationStatistics::default();
                if error.is_fatal() {
                    tracing::error!(%error, "triangulation aborted");
                } else {
                    tracing::warn!(%error, "triangulation failed");
                }
            }
        }
        result
    }

    fn rebuild(&mut self) -> Result<TriangulationStatistics, InsertionError> {
        self.tds.clear();
        if let Some((index, &point)) = self
            .points
            .iter()
            .enumerate()
            .find(|(_, point)| !point.is_finite())
        {
            return Err(InsertionError::NonFiniteCoordinate { index, point });
        }
        let Some(bbox) = BoundingBox::from_points(&self.points) else {
            return Ok(TriangulationStatistics::default());
        };

        let frame = create_super_triangle(&mut self.tds, &bbox, self.options.super_triangle_scale())?;
        let policy = PerturbationPolicy {
            magnitude: self.options.perturbation_magnitude() * bbox.extent(),
            max_attempts: self.options.max_perturbation_attempts(),
        };
        let mut rng = StdRng::seed_from_u64(self.options.seed());

        let mut statistics = TriangulationStatistics::default();
        for (index, &point) in self.points.iter().enumerate() {
            let outcome = insert_site(&mut self.tds, &frame, index, point, &policy, &mut rng)?;
            statistics.inserted_sites += 1;
            statistics.perturbation_attempts += outcome.perturbations;
            if outcome.perturbations > 0 {
                statistics.perturbed_sites += 1;
            }
        }

        statistics.removal = remove_super_triangle(&mut self.tds)?;
        Ok(statistics)
    }

    // =========================================================================
    // OUTPUT COLLECTIONS
    // =========================================================================

    /// The underlying graph.
    #[must_use]
    pub const fn tds(&self) -> &Tds {
        &self.tds
    }

    /// Sites of the finished graph.
    pub fn sites(&self) -> impl Iterator<Item = (SiteKey, &Site)> {
        self.tds.sites()
    }

    /// Segments of the finished graph.
    pub fn segments(&self) -> impl Iterator<Item = (SegmentKey, &Segment)> {
        self.tds.segments()
    }

    /// Triangles of the finished graph.
    pub fn triangles(&self) -> impl Iterator<Item = (TriangleKey, &Triangle)> {
        self.tds.triangles()
    }

    /// Number of sites.
    #[must_use]
    pub fn number_of_sites(&self) -> usize {
        self.tds.number_of_sites()
    }

    /// Number of segments.
    #[must_use]
    pub fn number_of_segments(&self) -> usize {
        self.tds.number_of_segments()
    }

    /// Number of triangles.
    #[must_use]
    pub fn number_of_triangles(&self) -> usize {
        self.tds.number_of_triangles()
    }

    /// Stored coordinates of `site`.
    #[must_use]
    pub fn site_point(&self, site: SiteKey) -> Option<Point> {
        self.tds.site_point(site)
    }

    /// Length of `segment`.
    #[must_use]
    pub fn segment_length(&self, segment: SegmentKey) -> Option<f64> {
        self.tds.segment_length(segment)
    }

    /// Midpoint of `segment`.
    #[must_use]
    pub fn segment_midpoint(&self, segment: SegmentKey) -> Option<Point> {
        self.tds.segment_midpoint(segment)
    }

    /// Slope angle of `segment`, in radians.
    #[must_use]
    pub fn segment_slope(&self, segment: SegmentKey) -> Option<f64> {
        self.tds.segment_slope(segment)
    }

    /// Cached geometry (circumcircle, centroid, winding, area) of `triangle`.
    #[must_use]
    pub fn triangle_geometry(&self, triangle: TriangleKey) -> Option<&TriangleGeometry> {
        self.tds.triangle_geometry(triangle)
    }

    // =========================================================================
    // DERIVED STRUCTURES
    // =========================================================================

    /// Triangles sharing a segment with `triangle`.
    ///
    /// # Errors
    ///
    /// Returns [`AdjacencyError::MissingTriangle`] for an unknown triangle.
    pub fn voronoi_neighbors(
        &self,
        triangle: TriangleKey,
    ) -> Result<TriangleNeighbors, AdjacencyError> {
        voronoi_neighbors(&self.tds, triangle)
    }

    /// The Voronoi dual of the current graph.
    ///
    /// # Errors
    ///
    /// Returns an [`AdjacencyError`] if the incidence index is inconsistent.
    pub fn voronoi_dual(&self) -> Result<VoronoiDual, AdjacencyError> {
        VoronoiDual::build(&self.tds)
    }

    /// Voronoi edges (circumcenter pairs) of every interior segment.
    ///
    /// # Errors
    ///
    /// Returns an [`AdjacencyError`] if the incidence index is inconsistent.
    pub fn voronoi_edges(&self) -> Result<Vec<VoronoiEdge>, AdjacencyError> {
        Ok(self.voronoi_dual()?.edges().to_vec())
    }

    /// Minimum spanning tree of the segment graph, in ascending length order.
    ///
    /// # Errors
    ///
    /// Returns [`SpanningTreeError::MissingSite`] if a segment is dangling.
    pub fn minimum_spanning_tree(&self) -> Result<Vec<SegmentKey>, SpanningTreeError> {
        minimum_spanning_tree(&self.tds)
    }

    // =========================================================================
    // VALIDATION
    // =========================================================================

    /// Structural checks on the finished graph, including the absence of
    /// bootstrap vertices.
    ///
    /// # Errors
    ///
    /// Returns the first [`TriangulationValidationError`] found.
    pub fn is_valid(&self) -> Result<(), TriangulationValidationError> {
        self.tds.is_valid()?;
        self.tds.validate_no_synthetic_sites()
    }

    /// Checks that no site lies strictly inside any triangle's circumcircle.
    ///
    /// This is an O(T·N) scan intended for tests and debugging.
    ///
    /// # Errors
    ///
    /// Returns [`TriangulationValidationError::DelaunayViolation`] describing
    /// the first violation.
    pub fn validate_delaunay(&self) -> Result<(), TriangulationValidationError> {
        is_delaunay(&self.tds).map_err(|err| match err {
            DelaunayValidationError::DelaunayViolation { triangle, site } => {
                let point = self
                    .tds
                    .site_point(site)
                    .map_or_else(|| "?".to_string(), |p| p.to_string());
                TriangulationValidationError::DelaunayViolation {
                    message: format!(
                        "site {site:?} at {point} lies inside the circumcircle of triangle {triangle:?}"
                    ),
                }
            }
            DelaunayValidationError::MissingTriangle { triangle } => {
                TriangulationValidationError::DelaunayViolation {
                    message: format!("triangle {triangle:?} disappeared during validation"),
                }
            }
        })
    }
}

// Only the graph is serialized; options fall back to their defaults.
impl Serialize for DelaunayTriangulation {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.tds.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for DelaunayTriangulation {
    fn deserialize<De>(deserializer: De) -> Result<Self, De::Error>
    where
        De: Deserializer<'de>,
    {
        let tds = Tds::deserialize(deserializer)?;
        Ok(Self::from_tds(tds, TriangulationOptions::default()))
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::builder::TriangulationOptionsBuilder;
    use crate::core::triangulation_data_structure::TdsMutationError;

    fn points(coords: &[(f64, f64)]) -> Vec<Point> {
        coords.iter().copied().map(Point::from).collect()
    }

    #[test]
    fn empty_input_gives_empty_graph() {
        let dt = DelaunayTriangulation::new(&[]).unwrap();
        assert!(dt.tds().is_empty());
        assert_eq!(dt.statistics(), &TriangulationStatistics::default());
        assert!(dt.is_valid().is_ok());
    }

    #[test]
    fn single_point_has_no_segments() {
        let dt = DelaunayTriangulation::new(&points(&[(1.0, 2.0)])).unwrap();
        assert_eq!(dt.number_of_sites(), 1);
        assert_eq!(dt.number_of_segments(), 0);
        assert_eq!(dt.number_of_triangles(), 0);
        assert!(dt.minimum_spanning_tree().unwrap().is_empty());
    }

    #[test]
    fn two_points_share_one_segment() {
        let dt = DelaunayTriangulation::new(&points(&[(0.0, 0.0), (3.0, 4.0)])).unwrap();
        assert_eq!(dt.number_of_sites(), 2);
        assert_eq!(dt.number_of_segments(), 1);
        assert_eq!(dt.number_of_triangles(), 0);
        let (segment, _) = dt.segments().next().unwrap();
        assert_eq!(dt.segment_length(segment), Some(5.0));
    }

    #[test]
    fn statistics_count_bootstrap_removal() {
        let dt = DelaunayTriangulation::new(&points(&[(0.0, 0.0), (4.0, 0.0), (0.0, 4.0)])).unwrap();
        let stats = dt.statistics();
        assert_eq!(stats.inserted_sites, 3);
        assert_eq!(stats.perturbed_sites, 0);
        assert_eq!(stats.removal.sites, 3);
        // Six sites with a 3-edge hull: 12 segments and 7 triangles, of which
        // only the real triangle and its 3 edges survive.
        assert_eq!(stats.removal.segments, 9);
        assert_eq!(stats.removal.triangles, 6);
        assert_eq!(dt.number_of_triangles(), 1);
    }

    #[test]
    fn non_finite_point_clears_the_graph() {
        let mut dt = DelaunayTriangulation::new(&points(&[(0.0, 0.0), (4.0, 0.0), (0.0, 4.0)])).unwrap();
        assert!(!dt.tds().is_empty());

        dt.add_point(Point::new(f64::NAN, 1.0));
        let err = dt.triangulate().unwrap_err();
        assert!(matches!(err, InsertionError::NonFiniteCoordinate { index: 3, .. }));
        assert!(!err.is_fatal());
        assert!(dt.tds().is_empty());
        assert_eq!(dt.points().len(), 4);
    }

    #[test]
    fn add_point_respects_deduplication() {
        let mut plain = DelaunayTriangulation::empty();
        assert!(plain.add_point(Point::new(1.0, 1.0)));
        assert!(plain.add_point(Point::new(1.0, 1.0)));
        assert_eq!(plain.points().len(), 2);

        let options = TriangulationOptionsBuilder::default()
            .deduplicate(true)
            .build()
            .unwrap();
        let mut dedup = DelaunayTriangulation::with_empty_options(options);
        assert!(dedup.add_point(Point::new(1.0, 1.0)));
        assert!(!dedup.add_point(Point::new(1.0, 1.0)));
        assert!(dedup.add_point(Point::new(1.0, 2.0)));
        assert_eq!(dedup.points().len(), 2);
        assert!(dedup.tds().is_empty());
    }

    #[test]
    fn retriangulation_is_a_full_rebuild() {
        let mut dt = DelaunayTriangulation::new(&points(&[
            (0.0, 0.0),
            (4.0, 0.0),
            (4.0, 4.0),
            (0.0, 4.0),
            (1.0, 3.0),
        ]))
        .unwrap();
        let first: Vec<_> = dt.triangles().map(|(_, t)| sorted_indices(&dt, t)).collect();

        dt.triangulate().unwrap();
        let second: Vec<_> = dt.triangles().map(|(_, t)| sorted_indices(&dt, t)).collect();
        assert_eq!(sorted(first), sorted(second));
    }

    fn sorted_indices(dt: &DelaunayTriangulation, triangle: &Triangle) -> [usize; 3] {
        let mut indices = triangle
            .vertices()
            .map(|v| dt.tds().site(v).and_then(Site::input_index).unwrap());
        indices.sort_unstable();
        indices
    }

    fn sorted(mut items: Vec<[usize; 3]>) -> Vec<[usize; 3]> {
        items.sort_unstable();
        items
    }

    #[test]
    fn validate_delaunay_reports_violations() {
        // Hand-built non-Delaunay split of a kite: the short diagonal is missing.
        let mut tds = Tds::empty();
        let a = tds.insert_site(Site::input(0, Point::new(0.0, 0.0)));
        let b = tds.insert_site(Site::input(1, Point::new(10.0, -1.0)));
        let c = tds.insert_site(Site::input(2, Point::new(20.0, 0.0)));
        let d = tds.insert_site(Site::input(3, Point::new(10.0, 1.0)));
        let ab = tds.insert_segment(a, b).unwrap();
        let bc = tds.insert_segment(b, c).unwrap();
        let ca = tds.insert_segment(c, a).unwrap();
        let cd = tds.insert_segment(c, d).unwrap();
        let da = tds.insert_segment(d, a).unwrap();
        tds.insert_triangle(ab, bc, ca).unwrap();
        tds.insert_triangle(ca, cd, da).unwrap();

        let dt = DelaunayTriangulation::from_tds(tds, TriangulationOptions::default());
        assert_eq!(dt.points().len(), 4);
        assert!(dt.is_valid().is_ok());
        assert!(matches!(
            dt.validate_delaunay(),
            Err(TriangulationValidationError::DelaunayViolation { .. })
        ));
    }

    #[test]
    fn serde_roundtrip_preserves_graph() {
        let dt = DelaunayTriangulation::new(&points(&[(0.0, 0.0), (4.0, 0.0), (2.0, 3.0), (2.0, 1.0)])).unwrap();
        let json = serde_json::to_string(&dt).unwrap();
        let back: DelaunayTriangulation = serde_json::from_str(&json).unwrap();

        assert_eq!(back.number_of_sites(), dt.number_of_sites());
        assert_eq!(back.number_of_segments(), dt.number_of_segments());
        assert_eq!(back.number_of_triangles(), dt.number_of_triangles());
        assert_eq!(back.points(), dt.points());
        assert!(back.is_valid().is_ok());
    }

    #[test]
    fn fatal_errors_are_classified() {
        let err = InsertionError::from(TdsMutationError::LoopSegment {
            site: SiteKey::default(),
        });
        assert!(err.is_fatal());
    }
}
