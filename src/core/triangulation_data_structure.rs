//! The triangulation graph: arenas of sites, segments and triangles plus the
//! incidence indices that tie them together.
//!
//! [`Tds`] (triangulation data structure) owns every entity of a planar
//! triangulation and is the only place where they are created or destroyed.
//! Entities are addressed by opaque slotmap keys ([`SiteKey`], [`SegmentKey`],
//! [`TriangleKey`]); relations between them are key-to-key mappings:
//!
//! - **site → segments**: every segment incident to a site;
//! - **segment → triangles**: the one (hull) or two (interior) triangles that
//!   use a segment as an edge.
//!
//! Every mutating method updates both indices before it returns, so a caller
//! never observes an index that disagrees with the arenas.
//!
//! # Invariants
//!
//! | Invariant | Checked by |
//! |---|---|
//! | Every site has an index entry listing exactly its incident segments | [`Tds::validate_site_mappings`] |
//! | Every segment lists exactly the triangles that use it, at most two | [`Tds::validate_segment_mappings`] |
//! | Every triangle's segments still close a chain over non-collinear sites | [`Tds::validate_triangles`] |
//!
//! The Delaunay property is not a structural invariant; it is checked by
//! [`crate::core::util::find_delaunay_violations`].
//!
//! # Examples
//!
//! ```rust
//! use point_graph::core::site::Site;
//! use point_graph::core::triangulation_data_structure::Tds;
//! use point_graph::geometry::point::Point;
//!
//! let mut tds = Tds::empty();
//! let a = tds.insert_site(Site::input(0, Point::new(0.0, 0.0)));
//! let b = tds.insert_site(Site::input(1, Point::new(4.0, 0.0)));
//! let c = tds.insert_site(Site::input(2, Point::new(0.0, 4.0)));
//!
//! let ab = tds.insert_segment(a, b).unwrap();
//! let bc = tds.insert_segment(b, c).unwrap();
//! let ca = tds.insert_segment(c, a).unwrap();
//! let t = tds.insert_triangle(ab, bc, ca).unwrap();
//!
//! assert_eq!(tds.number_of_triangles(), 1);
//! assert_eq!(tds.triangles_of_segment(ab), &[t]);
//! assert_eq!(tds.segments_of_site(a).len(), 2);
//! assert!(tds.is_valid().is_ok());
//! ```

#![forbid(unsafe_code)]

// =============================================================================
// IMPORTS
// =============================================================================

use std::fmt;

use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use slotmap::new_key_type;
use thiserror::Error;

use crate::core::collections::{
    SegmentToTrianglesMap, SiteToSegmentsMap, StorageMap, TriangleKeySet,
};
use crate::core::segment::Segment;
use crate::core::site::Site;
use crate::core::triangle::{Triangle, TriangleError, resolve_chain};
use crate::geometry::point::Point;
use crate::geometry::predicates::{Orientation, point_side};
use crate::geometry::util::{TriangleGeometry, midpoint, slope};

// =============================================================================
// KEY TYPES
// =============================================================================

new_key_type! {
    /// Key type for accessing sites in the storage map.
    ///
    /// Two coordinate-equal points inserted separately receive two distinct
    /// keys; identity is never derived from coordinates.
    pub struct SiteKey;
}

new_key_type! {
    /// Key type for accessing segments in the storage map.
    pub struct SegmentKey;
}

new_key_type! {
    /// Key type for accessing triangles in the storage map.
    pub struct TriangleKey;
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// The kind of entity referenced by an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntityKind {
    /// A site.
    Site,
    /// A segment.
    Segment,
    /// A triangle.
    Triangle,
}

/// Errors raised by the mutating operations of [`Tds`].
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum TdsMutationError {
    /// A referenced site is not stored in the graph.
    #[error("Site {site:?} does not exist")]
    MissingSite {
        /// The missing site.
        site: SiteKey,
    },
    /// A referenced segment is not stored in the graph.
    #[error("Segment {segment:?} does not exist")]
    MissingSegment {
        /// The missing segment.
        segment: SegmentKey,
    },
    /// A segment was requested between a site and itself.
    #[error("Segment endpoints must be distinct, got {site:?} twice")]
    LoopSegment {
        /// The repeated endpoint.
        site: SiteKey,
    },
    /// A segment already has two incident triangles.
    #[error("Segment {segment:?} already borders two triangles")]
    SegmentSaturated {
        /// The saturated segment.
        segment: SegmentKey,
    },
    /// The three segments do not form a valid triangle.
    #[error(transparent)]
    Triangle(#[from] TriangleError),
}

/// Errors that can occur during triangulation validation.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum TriangulationValidationError {
    /// An incidence index disagrees with the arenas.
    #[error("{entity:?} mapping inconsistency: {message}")]
    MappingInconsistency {
        /// The kind of entity whose mapping is inconsistent.
        entity: EntityKind,
        /// Description of the inconsistency.
        message: String,
    },
    /// A segment borders more than two triangles.
    #[error("Segment {segment:?} is shared by {count} triangles (at most 2 allowed)")]
    OverSharedSegment {
        /// The offending segment.
        segment: SegmentKey,
        /// Number of triangles using it.
        count: usize,
    },
    /// A triangle's segments no longer close a chain.
    #[error("Invalid triangle {triangle:?}: {source}")]
    InvalidTriangle {
        /// The offending triangle.
        triangle: TriangleKey,
        /// Underlying construction error.
        #[source]
        source: TriangleError,
    },
    /// A triangle's vertices are collinear.
    #[error("Triangle {triangle:?} is degenerate: signed area {area}")]
    DegenerateTriangle {
        /// The offending triangle.
        triangle: TriangleKey,
        /// Its signed area.
        area: String,
    },
    /// A bootstrap vertex is still part of a finished triangulation.
    #[error("Synthetic site {site:?} is still present")]
    SyntheticSiteRemaining {
        /// The leftover synthetic site.
        site: SiteKey,
    },
    /// A site lies strictly inside a triangle's circumcircle.
    #[error("Delaunay invariant violated: {message}")]
    DelaunayViolation {
        /// Description of the violation.
        message: String,
    },
}

// =============================================================================
// TDS STRUCT
// =============================================================================

/// Arena-backed planar triangulation graph with incidence indices.
///
/// The struct is purely combinatorial plus cached geometry: it never decides
/// *which* triangles to create. That is the job of
/// [`crate::core::algorithms::bowyer_watson`].
#[derive(Clone, Debug, Default)]
pub struct Tds {
    sites: StorageMap<SiteKey, Site>,
    segments: StorageMap<SegmentKey, Segment>,
    triangles: StorageMap<TriangleKey, Triangle>,

    /// Site → incident segments. Not serialized; rebuilt on deserialization.
    site_to_segments: SiteToSegmentsMap,

    /// Segment → incident triangles. Not serialized; rebuilt on deserialization.
    segment_to_triangles: SegmentToTrianglesMap,

    /// Incremented on every structural change.
    generation: u64,
}

// =============================================================================
// CORE FUNCTIONALITY
// =============================================================================

impl Tds {
    /// Creates an empty graph.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Removes every site, segment and triangle.
    pub fn clear(&mut self) {
        self.sites.clear();
        self.segments.clear();
        self.triangles.clear();
        self.site_to_segments.clear();
        self.segment_to_triangles.clear();
        self.bump_generation();
    }

    /// Structural modification counter.
    #[inline]
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    const fn bump_generation(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }

    /// `true` if the graph holds no sites.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    /// Number of sites, including synthetic ones if present.
    #[must_use]
    pub fn number_of_sites(&self) -> usize {
        self.sites.len()
    }

    /// Number of segments.
    #[must_use]
    pub fn number_of_segments(&self) -> usize {
        self.segments.len()
    }

    /// Number of triangles.
    #[must_use]
    pub fn number_of_triangles(&self) -> usize {
        self.triangles.len()
    }

    /// Iterates over `(key, site)` pairs.
    pub fn sites(&self) -> impl Iterator<Item = (SiteKey, &Site)> {
        self.sites.iter()
    }

    /// Iterates over `(key, segment)` pairs.
    pub fn segments(&self) -> impl Iterator<Item = (SegmentKey, &Segment)> {
        self.segments.iter()
    }

    /// Iterates over `(key, triangle)` pairs.
    pub fn triangles(&self) -> impl Iterator<Item = (TriangleKey, &Triangle)> {
        self.triangles.iter()
    }

    /// Iterates over site keys.
    pub fn site_keys(&self) -> impl Iterator<Item = SiteKey> + '_ {
        self.sites.keys()
    }

    /// Iterates over segment keys.
    pub fn segment_keys(&self) -> impl Iterator<Item = SegmentKey> + '_ {
        self.segments.keys()
    }

    /// Iterates over triangle keys.
    pub fn triangle_keys(&self) -> impl Iterator<Item = TriangleKey> + '_ {
        self.triangles.keys()
    }

    /// Looks up a site.
    #[must_use]
    pub fn site(&self, key: SiteKey) -> Option<&Site> {
        self.sites.get(key)
    }

    /// Looks up a segment.
    #[must_use]
    pub fn segment(&self, key: SegmentKey) -> Option<&Segment> {
        self.segments.get(key)
    }

    /// Looks up a triangle.
    #[must_use]
    pub fn triangle(&self, key: TriangleKey) -> Option<&Triangle> {
        self.triangles.get(key)
    }

    /// Coordinates of a site.
    #[must_use]
    pub fn site_point(&self, key: SiteKey) -> Option<Point> {
        self.sites.get(key).map(Site::point)
    }

    /// `true` if `key` names a stored site.
    #[must_use]
    pub fn contains_site(&self, key: SiteKey) -> bool {
        self.sites.contains_key(key)
    }

    /// `true` if `key` names a stored segment.
    #[must_use]
    pub fn contains_segment(&self, key: SegmentKey) -> bool {
        self.segments.contains_key(key)
    }

    /// `true` if `key` names a stored triangle.
    #[must_use]
    pub fn contains_triangle(&self, key: TriangleKey) -> bool {
        self.triangles.contains_key(key)
    }

    // =========================================================================
    // INCIDENCE QUERIES
    // =========================================================================

    /// Segments incident to `site`; empty for unknown sites.
    #[must_use]
    pub fn segments_of_site(&self, site: SiteKey) -> &[SegmentKey] {
        self.site_to_segments
            .get(&site)
            .map(|buffer| buffer.as_slice())
            .unwrap_or_default()
    }

    /// Triangles that use `segment` as an edge; empty for unknown segments.
    #[must_use]
    pub fn triangles_of_segment(&self, segment: SegmentKey) -> &[TriangleKey] {
        self.segment_to_triangles
            .get(&segment)
            .map(|buffer| buffer.as_slice())
            .unwrap_or_default()
    }

    /// Triangles having `site` as a vertex.
    #[must_use]
    pub fn triangles_of_site(&self, site: SiteKey) -> TriangleKeySet {
        self.segments_of_site(site)
            .iter()
            .flat_map(|&segment| self.triangles_of_segment(segment).iter().copied())
            .collect()
    }

    /// The first segment connecting `u` and `v` in either direction.
    #[must_use]
    pub fn segment_between(&self, u: SiteKey, v: SiteKey) -> Option<SegmentKey> {
        self.segments_of_site(u).iter().copied().find(|&key| {
            self.segments
                .get(key)
                .is_some_and(|segment| segment.connects(u, v))
        })
    }

    /// `true` if `segment` borders exactly one triangle.
    #[must_use]
    pub fn is_hull_segment(&self, segment: SegmentKey) -> bool {
        self.triangles_of_segment(segment).len() == 1
    }

    // =========================================================================
    // SEGMENT GEOMETRY
    // =========================================================================

    fn segment_points(&self, key: SegmentKey) -> Option<(Point, Point)> {
        let segment = self.segments.get(key)?;
        Some((self.site_point(segment.a())?, self.site_point(segment.b())?))
    }

    /// Euclidean length of a segment.
    #[must_use]
    pub fn segment_length(&self, key: SegmentKey) -> Option<f64> {
        self.segment_points(key).map(|(a, b)| a.distance(b))
    }

    /// Midpoint of a segment.
    #[must_use]
    pub fn segment_midpoint(&self, key: SegmentKey) -> Option<Point> {
        self.segment_points(key).map(|(a, b)| midpoint(a, b))
    }

    /// Angle of the segment direction `a → b`, in radians.
    #[must_use]
    pub fn segment_slope(&self, key: SegmentKey) -> Option<f64> {
        self.segment_points(key).map(|(a, b)| slope(a, b))
    }

    /// Which side of the directed segment `a → b` the point `p` lies on.
    ///
    /// `POSITIVE` is the left side.
    #[must_use]
    pub fn segment_point_side(&self, key: SegmentKey, p: Point) -> Option<Orientation> {
        self.segment_points(key).map(|(a, b)| point_side(a, b, p))
    }

    /// Cached geometry of a triangle.
    #[must_use]
    pub fn triangle_geometry(&self, key: TriangleKey) -> Option<&TriangleGeometry> {
        self.triangles.get(key).map(Triangle::geometry)
    }

    // =========================================================================
    // MUTATION
    // =========================================================================

    /// Adds a site with no incident segments.
    pub fn insert_site(&mut self, site: Site) -> SiteKey {
        let key = self.sites.insert(site);
        self.site_to_segments.insert(key, Default::default());
        self.bump_generation();
        key
    }

    /// Adds the segment `a → b`.
    ///
    /// # Errors
    ///
    /// Returns [`TdsMutationError::MissingSite`] if either endpoint is unknown
    /// and [`TdsMutationError::LoopSegment`] if `a == b`.
    pub fn insert_segment(
        &mut self,
        a: SiteKey,
        b: SiteKey,
    ) -> Result<SegmentKey, TdsMutationError> {
        if a == b {
            return Err(TdsMutationError::LoopSegment { site: a });
        }
        for site in [a, b] {
            if !self.sites.contains_key(site) {
                return Err(TdsMutationError::MissingSite { site });
            }
        }

        let key = self.segments.insert(Segment::new(a, b));
        for site in [a, b] {
            self.site_to_segments.entry(site).or_default().push(key);
        }
        self.segment_to_triangles.insert(key, Default::default());
        self.bump_generation();
        Ok(key)
    }

    /// Adds the triangle bounded by the chained segments `ab, bc, ca`.
    ///
    /// # Errors
    ///
    /// Returns [`TdsMutationError::MissingSegment`] for an unknown segment,
    /// [`TdsMutationError::SegmentSaturated`] if a segment already borders two
    /// triangles, and [`TdsMutationError::Triangle`] if the segments do not
    /// close a chain.
    pub fn insert_triangle(
        &mut self,
        ab: SegmentKey,
        bc: SegmentKey,
        ca: SegmentKey,
    ) -> Result<TriangleKey, TdsMutationError> {
        let lookup = |segment: SegmentKey| {
            let value = *self
                .segments
                .get(segment)
                .ok_or(TdsMutationError::MissingSegment { segment })?;
            if self.triangles_of_segment(segment).len() >= 2 {
                return Err(TdsMutationError::SegmentSaturated { segment });
            }
            Ok((segment, value))
        };
        let (ab, bc, ca) = (lookup(ab)?, lookup(bc)?, lookup(ca)?);

        let triangle = Triangle::from_segments(ab, bc, ca, |site| self.site_point(site))?;
        let key = self.triangles.insert(triangle);
        for segment in triangle.edges() {
            self.segment_to_triangles.entry(segment).or_default().push(key);
        }
        self.bump_generation();
        Ok(key)
    }

    /// Removes a triangle and its segment → triangle entries.
    ///
    /// The triangle's segments are left in place.
    pub fn remove_triangle(&mut self, key: TriangleKey) -> Option<Triangle> {
        let triangle = self.triangles.remove(key)?;
        for segment in triangle.edges() {
            if let Some(incident) = self.segment_to_triangles.get_mut(&segment) {
                incident.retain(|t| *t != key);
            }
        }
        self.bump_generation();
        Some(triangle)
    }

    /// Removes a segment together with every triangle that uses it.
    pub fn remove_segment(&mut self, key: SegmentKey) -> Option<Segment> {
        let incident = self.segment_to_triangles.remove(&key).unwrap_or_default();
        for triangle in incident {
            self.remove_triangle(triangle);
        }

        let segment = self.segments.remove(key)?;
        for site in [segment.a(), segment.b()] {
            if let Some(incident) = self.site_to_segments.get_mut(&site) {
                incident.retain(|s| *s != key);
            }
        }
        self.bump_generation();
        Some(segment)
    }

    /// Removes a site together with every segment and triangle touching it.
    pub fn remove_site(&mut self, key: SiteKey) -> Option<Site> {
        let incident = self.site_to_segments.remove(&key).unwrap_or_default();
        for segment in incident {
            self.remove_segment(segment);
        }
        let site = self.sites.remove(key)?;
        self.bump_generation();
        Some(site)
    }

    /// Rebuilds both incidence indices from the arenas.
    fn rebuild_indices(&mut self) {
        self.site_to_segments.clear();
        self.segment_to_triangles.clear();
        for key in self.sites.keys() {
            self.site_to_segments.insert(key, Default::default());
        }
        for (key, segment) in &self.segments {
            for site in [segment.a(), segment.b()] {
                self.site_to_segments.entry(site).or_default().push(key);
            }
            self.segment_to_triangles.insert(key, Default::default());
        }
        for (key, triangle) in &self.triangles {
            for segment in triangle.edges() {
                self.segment_to_triangles.entry(segment).or_default().push(key);
            }
        }
        self.bump_generation();
    }

    // =========================================================================
    // VALIDATION & CONSISTENCY CHECKS
    // =========================================================================

    /// Checks the site → segments index against the segment arena.
    ///
    /// # Errors
    ///
    /// Returns [`TriangulationValidationError::MappingInconsistency`] if a site
    /// has no entry, an entry names an unknown site or segment, or a segment is
    /// missing from (or duplicated in) an endpoint's list.
    pub fn validate_site_mappings(&self) -> Result<(), TriangulationValidationError> {
        let inconsistency = |message: String| TriangulationValidationError::MappingInconsistency {
            entity: EntityKind::Site,
            message,
        };

        if self.site_to_segments.len() != self.sites.len() {
            return Err(inconsistency(format!(
                "{} index entries for {} sites",
                self.site_to_segments.len(),
                self.sites.len()
            )));
        }

        for (&site, incident) in &self.site_to_segments {
            if !self.sites.contains_key(site) {
                return Err(inconsistency(format!("index entry for unknown site {site:?}")));
            }
            for &key in incident {
                let Some(segment) = self.segments.get(key) else {
                    return Err(inconsistency(format!(
                        "site {site:?} lists unknown segment {key:?}"
                    )));
                };
                if !segment.has_vertex(site) {
                    return Err(inconsistency(format!(
                        "site {site:?} lists segment {key:?} it is not an endpoint of"
                    )));
                }
            }
        }

        for (key, segment) in &self.segments {
            for site in [segment.a(), segment.b()] {
                let listed = self
                    .segments_of_site(site)
                    .iter()
                    .filter(|&&s| s == key)
                    .count();
                if listed != 1 {
                    return Err(inconsistency(format!(
                        "segment {key:?} listed {listed} times for endpoint {site:?}"
                    )));
                }
            }
        }
        Ok(())
    }

    /// Checks the segment → triangles index against the triangle arena.
    ///
    /// # Errors
    ///
    /// Returns [`TriangulationValidationError::MappingInconsistency`] for stale
    /// or missing entries and [`TriangulationValidationError::OverSharedSegment`]
    /// if a segment borders more than two triangles.
    pub fn validate_segment_mappings(&self) -> Result<(), TriangulationValidationError> {
        let inconsistency = |message: String| TriangulationValidationError::MappingInconsistency {
            entity: EntityKind::Segment,
            message,
        };

        if self.segment_to_triangles.len() != self.segments.len() {
            return Err(inconsistency(format!(
                "{} index entries for {} segments",
                self.segment_to_triangles.len(),
                self.segments.len()
            )));
        }

        for (&segment, incident) in &self.segment_to_triangles {
            if !self.segments.contains_key(segment) {
                return Err(inconsistency(format!(
                    "index entry for unknown segment {segment:?}"
                )));
            }
            if incident.len() > 2 {
                return Err(TriangulationValidationError::OverSharedSegment {
                    segment,
                    count: incident.len(),
                });
            }
            for &key in incident {
                if !self.triangles.get(key).is_some_and(|t| t.has_edge(segment)) {
                    return Err(inconsistency(format!(
                        "segment {segment:?} lists triangle {key:?} that does not use it"
                    )));
                }
            }
        }

        for (key, triangle) in &self.triangles {
            for segment in triangle.edges() {
                let listed = self
                    .triangles_of_segment(segment)
                    .iter()
                    .filter(|&&t| t == key)
                    .count();
                if listed != 1 {
                    return Err(TriangulationValidationError::MappingInconsistency {
                        entity: EntityKind::Triangle,
                        message: format!(
                            "triangle {key:?} listed {listed} times for segment {segment:?}"
                        ),
                    });
                }
            }
        }
        Ok(())
    }

    /// Checks that every triangle still closes a chain over its stored vertices
    /// and has non-zero area.
    ///
    /// # Errors
    ///
    /// Returns [`TriangulationValidationError::InvalidTriangle`] for a broken
    /// chain and [`TriangulationValidationError::DegenerateTriangle`] for a
    /// collinear triangle.
    pub fn validate_triangles(&self) -> Result<(), TriangulationValidationError> {
        for (key, triangle) in &self.triangles {
            let [ab, bc, ca] = triangle.edges();
            let segments = [ab, bc, ca].map(|s| self.segments.get(s).copied());
            let chain = match segments {
                [Some(ab_seg), Some(bc_seg), Some(ca_seg)] => resolve_chain(ab_seg, bc_seg, ca_seg),
                _ => None,
            };
            if chain != Some(triangle.vertices()) {
                return Err(TriangulationValidationError::InvalidTriangle {
                    triangle: key,
                    source: TriangleError::MalformedChain { ab, bc, ca },
                });
            }
            if let Some(site) = triangle
                .vertices()
                .into_iter()
                .find(|&site| !self.sites.contains_key(site))
            {
                return Err(TriangulationValidationError::InvalidTriangle {
                    triangle: key,
                    source: TriangleError::MissingSite { site },
                });
            }
            let geometry = triangle.geometry();
            if geometry.is_degenerate() {
                return Err(TriangulationValidationError::DegenerateTriangle {
                    triangle: key,
                    area: format!("{:?}", geometry.signed_area()),
                });
            }
        }
        Ok(())
    }

    /// Checks that no bootstrap vertex remains.
    ///
    /// # Errors
    ///
    /// Returns [`TriangulationValidationError::SyntheticSiteRemaining`] for the
    /// first synthetic site found.
    pub fn validate_no_synthetic_sites(&self) -> Result<(), TriangulationValidationError> {
        match self.sites.iter().find(|(_, site)| site.is_synthetic()) {
            Some((site, _)) => Err(TriangulationValidationError::SyntheticSiteRemaining { site }),
            None => Ok(()),
        }
    }

    /// Runs every structural check and returns the first failure.
    ///
    /// Does not check the Delaunay property.
    ///
    /// # Errors
    ///
    /// Returns the first [`TriangulationValidationError`] found.
    pub fn is_valid(&self) -> Result<(), TriangulationValidationError> {
        self.validate_site_mappings()?;
        self.validate_segment_mappings()?;
        self.validate_triangles()
    }
}

// =============================================================================
// SERDE
// =============================================================================

// The incidence indices are keyed by slotmap keys, which do not serialize as
// map keys in self-describing formats. Only the arenas are written; the
// indices are rebuilt on deserialization and the result is validated.

impl Serialize for Tds {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;

        let mut state = serializer.serialize_struct("Tds", 3)?;
        state.serialize_field("sites", &self.sites)?;
        state.serialize_field("segments", &self.segments)?;
        state.serialize_field("triangles", &self.triangles)?;
        state.end()
    }
}

impl<'de> Deserialize<'de> for Tds {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(field_identifier, rename_all = "snake_case")]
        enum Field {
            Sites,
            Segments,
            Triangles,
        }

        struct TdsVisitor;

        impl<'de> Visitor<'de> for TdsVisitor {
            type Value = Tds;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("struct Tds")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut sites: Option<StorageMap<SiteKey, Site>> = None;
                let mut segments: Option<StorageMap<SegmentKey, Segment>> = None;
                let mut triangles: Option<StorageMap<TriangleKey, Triangle>> = None;

                while let Some(key) = map.next_key()? {
                    match key {
                        Field::Sites => {
                            if sites.is_some() {
                                return Err(de::Error::duplicate_field("sites"));
                            }
                            sites = Some(map.next_value()?);
                        }
                        Field::Segments => {
                            if segments.is_some() {
                                return Err(de::Error::duplicate_field("segments"));
                            }
                            segments = Some(map.next_value()?);
                        }
                        Field::Triangles => {
                            if triangles.is_some() {
                                return Err(de::Error::duplicate_field("triangles"));
                            }
                            triangles = Some(map.next_value()?);
                        }
                    }
                }

                let mut tds = Tds {
                    sites: sites.ok_or_else(|| de::Error::missing_field("sites"))?,
                    segments: segments.ok_or_else(|| de::Error::missing_field("segments"))?,
                    triangles: triangles.ok_or_else(|| de::Error::missing_field("triangles"))?,
                    ..Tds::default()
                };
                tds.rebuild_indices();
                tds.is_valid().map_err(de::Error::custom)?;
                Ok(tds)
            }
        }

        const FIELDS: &[&str] = &["sites", "segments", "triangles"];
        deserializer.deserialize_struct("Tds", FIELDS, TdsVisitor)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Unit right triangle at the origin plus a fourth site at (1, 1), with
    /// both triangles of the unit square.
    fn unit_square() -> (Tds, [SiteKey; 4], [SegmentKey; 5], [TriangleKey; 2]) {
        let mut tds = Tds::empty();
        let a = tds.insert_site(Site::input(0, Point::new(0.0, 0.0)));
        let b = tds.insert_site(Site::input(1, Point::new(1.0, 0.0)));
        let c = tds.insert_site(Site::input(2, Point::new(1.0, 1.0)));
        let d = tds.insert_site(Site::input(3, Point::new(0.0, 1.0)));

        let ab = tds.insert_segment(a, b).unwrap();
        let bc = tds.insert_segment(b, c).unwrap();
        let ca = tds.insert_segment(c, a).unwrap();
        let cd = tds.insert_segment(c, d).unwrap();
        let da = tds.insert_segment(d, a).unwrap();

        let t1 = tds.insert_triangle(ab, bc, ca).unwrap();
        let t2 = tds.insert_triangle(ca, cd, da).unwrap();
        (tds, [a, b, c, d], [ab, bc, ca, cd, da], [t1, t2])
    }

    #[test]
    fn incidence_indices_track_insertions() {
        let (tds, [a, _, c, _], [ab, _, ca, cd, _], [t1, t2]) = unit_square();

        assert_eq!(tds.number_of_sites(), 4);
        assert_eq!(tds.number_of_segments(), 5);
        assert_eq!(tds.number_of_triangles(), 2);

        assert_eq!(tds.segments_of_site(a).len(), 3);
        assert_eq!(tds.segments_of_site(c).len(), 3);
        assert_eq!(tds.triangles_of_segment(ab), &[t1]);
        assert_eq!(tds.triangles_of_segment(cd), &[t2]);
        assert_eq!(tds.triangles_of_segment(ca).len(), 2);
        assert!(tds.is_hull_segment(ab));
        assert!(!tds.is_hull_segment(ca));
        assert_eq!(tds.triangles_of_site(a).len(), 2);
        assert!(tds.is_valid().is_ok());
    }

    #[test]
    fn segment_between_ignores_direction() {
        let (tds, [a, b, c, d], [ab, _, ca, _, _], _) = unit_square();
        assert_eq!(tds.segment_between(a, b), Some(ab));
        assert_eq!(tds.segment_between(b, a), Some(ab));
        assert_eq!(tds.segment_between(a, c), Some(ca));
        assert_eq!(tds.segment_between(b, d), None);
    }

    #[test]
    fn segment_geometry() {
        let (tds, _, [ab, _, ca, _, _], _) = unit_square();
        assert_relative_eq!(tds.segment_length(ab).unwrap(), 1.0);
        assert_relative_eq!(tds.segment_length(ca).unwrap(), 2.0_f64.sqrt());
        assert_eq!(tds.segment_midpoint(ca), Some(Point::new(0.5, 0.5)));
        assert_relative_eq!(tds.segment_slope(ab).unwrap(), 0.0);
        assert_eq!(
            tds.segment_point_side(ab, Point::new(0.5, 1.0)),
            Some(Orientation::POSITIVE)
        );
        assert_eq!(
            tds.segment_point_side(ab, Point::new(0.5, -1.0)),
            Some(Orientation::NEGATIVE)
        );
    }

    #[test]
    fn insert_segment_rejects_loops_and_unknown_sites() {
        let (mut tds, [a, ..], _, _) = unit_square();
        assert_eq!(
            tds.insert_segment(a, a),
            Err(TdsMutationError::LoopSegment { site: a })
        );

        let ghost = tds.insert_site(Site::input(9, Point::new(5.0, 5.0)));
        tds.remove_site(ghost);
        assert_eq!(
            tds.insert_segment(a, ghost),
            Err(TdsMutationError::MissingSite { site: ghost })
        );
    }

    #[test]
    fn insert_triangle_rejects_saturated_segments() {
        let (mut tds, [a, _, c, _], [_, _, ca, _, _], _) = unit_square();
        // ca already borders two triangles.
        let e = tds.insert_site(Site::input(4, Point::new(2.0, 0.0)));
        let ce = tds.insert_segment(c, e).unwrap();
        let ea = tds.insert_segment(e, a).unwrap();
        assert_eq!(
            tds.insert_triangle(ca, ce, ea),
            Err(TdsMutationError::SegmentSaturated { segment: ca })
        );
        assert!(tds.is_valid().is_ok());
    }

    #[test]
    fn remove_triangle_keeps_segments() {
        let (mut tds, _, [_, _, ca, _, _], [t1, t2]) = unit_square();
        assert!(tds.remove_triangle(t1).is_some());
        assert!(tds.remove_triangle(t1).is_none());
        assert_eq!(tds.number_of_segments(), 5);
        assert_eq!(tds.triangles_of_segment(ca), &[t2]);
        assert!(tds.is_valid().is_ok());
    }

    #[test]
    fn remove_segment_cascades_to_triangles() {
        let (mut tds, [a, _, c, _], [_, _, ca, _, _], _) = unit_square();
        tds.remove_segment(ca);
        assert_eq!(tds.number_of_triangles(), 0);
        assert_eq!(tds.number_of_segments(), 4);
        assert_eq!(tds.segments_of_site(a).len(), 2);
        assert_eq!(tds.segments_of_site(c).len(), 2);
        assert!(tds.is_valid().is_ok());
    }

    #[test]
    fn remove_site_cascades_to_segments() {
        let (mut tds, [_, b, ..], _, [_, t2]) = unit_square();
        tds.remove_site(b);
        assert_eq!(tds.number_of_sites(), 3);
        assert_eq!(tds.number_of_segments(), 3);
        assert_eq!(tds.triangle_keys().collect::<Vec<_>>(), vec![t2]);
        assert!(tds.is_valid().is_ok());
    }

    #[test]
    fn generation_advances_on_mutation() {
        let mut tds = Tds::empty();
        let g0 = tds.generation();
        let a = tds.insert_site(Site::input(0, Point::new(0.0, 0.0)));
        assert!(tds.generation() > g0);
        let g1 = tds.generation();
        tds.remove_site(a);
        assert!(tds.generation() > g1);
        tds.clear();
        assert!(tds.is_empty());
    }

    #[test]
    fn degenerate_triangle_fails_validation() {
        let mut tds = Tds::empty();
        let a = tds.insert_site(Site::input(0, Point::new(0.0, 0.0)));
        let b = tds.insert_site(Site::input(1, Point::new(1.0, 0.0)));
        let c = tds.insert_site(Site::input(2, Point::new(2.0, 0.0)));
        let ab = tds.insert_segment(a, b).unwrap();
        let bc = tds.insert_segment(b, c).unwrap();
        let ca = tds.insert_segment(c, a).unwrap();
        let t = tds.insert_triangle(ab, bc, ca).unwrap();

        assert!(matches!(
            tds.is_valid(),
            Err(TriangulationValidationError::DegenerateTriangle { triangle, .. }) if triangle == t
        ));
    }

    #[test]
    fn synthetic_sites_are_reported() {
        let mut tds = Tds::empty();
        tds.insert_site(Site::input(0, Point::new(0.0, 0.0)));
        assert!(tds.validate_no_synthetic_sites().is_ok());
        let s = tds.insert_site(Site::synthetic(Point::new(100.0, 0.0)));
        assert_eq!(
            tds.validate_no_synthetic_sites(),
            Err(TriangulationValidationError::SyntheticSiteRemaining { site: s })
        );
    }

    #[test]
    fn serde_roundtrip_rebuilds_indices() {
        let (tds, [a, ..], [_, _, ca, _, _], _) = unit_square();
        let json = serde_json::to_string(&tds).unwrap();
        let back: Tds = serde_json::from_str(&json).unwrap();

        assert_eq!(back.number_of_sites(), 4);
        assert_eq!(back.number_of_segments(), 5);
        assert_eq!(back.number_of_triangles(), 2);
        assert_eq!(back.segments_of_site(a).len(), 3);
        assert_eq!(back.triangles_of_segment(ca).len(), 2);
        assert!(back.is_valid().is_ok());
    }
}
