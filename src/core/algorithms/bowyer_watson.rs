//! Incremental Bowyer-Watson insertion over a bootstrap triangle.
//!
//! Each point is inserted in two phases:
//!
//! 1. **Plan** (read-only): scan every triangle for the ones the point
//!    affects, split the edges of those triangles into *interior* edges (shared
//!    by two affected triangles) and *boundary* edges, collect the boundary
//!    vertices in first-appearance order, and check that fanning the boundary
//!    to the new point yields only properly oriented, non-degenerate triangles.
//! 2. **Commit**: remove the affected triangles and interior segments, add the
//!    site, connect it to every boundary vertex and close one triangle per
//!    boundary edge.
//!
//! The graph is only mutated once a plan passes its checks, so a degenerate
//! configuration never leaves a half-built cavity behind. When a plan fails,
//! the *inserted* point is jittered by a bounded random offset and planned
//! again; already committed sites never move.
//!
//! # Bootstrap vertices at infinity
//!
//! Circumcircle tests against the huge bootstrap triangle are numerically
//! fragile, so triangles touching synthetic sites are classified as if those
//! sites lay infinitely far away along their direction from the frame center:
//!
//! | Synthetic vertices | Affected region |
//! |---|---|
//! | 0 | closed circumdisk |
//! | 1 | open half-plane beyond the real edge, on the synthetic vertex's side |
//! | 2 | open half-plane through the real vertex, parallel to the synthetic edge, on its side |
//! | 3 | the whole plane |
//!
//! When the point lies exactly on the bounding line of a half-plane, the
//! closed circumdisk through the actual bootstrap coordinates decides. For a
//! single synthetic vertex that is still the limit answer (any circle through
//! `u` and `v` holds the closed chord and nothing else of the line).
//!
//! Every predicate is evaluated exactly (see [`crate::geometry::predicates`]),
//! so the affected test and the plan checks agree, and a cavity is defective
//! only when the point coincides with an existing site or hits one of the
//! exact ties above. Orientation checks in the plan use the same limit model
//! through [`symbolic_orientation`].
//!
//! # References
//!
//! - **Bowyer, A.** "Computing Dirichlet tessellations." *The Computer Journal* 24.2 (1981): 162-166.
//! - **Watson, D.F.** "Computing the n-dimensional Delaunay tessellation with application to
//!   Voronoi polytopes." *The Computer Journal* 24.2 (1981): 167-172.

use rand::Rng;
use thiserror::Error;

use crate::core::algorithms::super_triangle::{SuperTriangle, SuperTriangleError};
use crate::core::collections::{
    FastHashMap, SegmentKeyBuffer, SegmentKeySet, SiteKeyBuffer, SmallBuffer, TYPICAL_CAVITY_SIZE,
    TriangleKeyBuffer, TriangleKeySet, fast_hash_map_with_capacity,
};
use crate::core::site::Site;
use crate::core::triangle::Triangle;
use crate::core::triangulation_data_structure::{
    SegmentKey, SiteKey, Tds, TdsMutationError, TriangleKey,
};
use crate::geometry::point::Point;
use crate::geometry::predicates::{
    InCircle, Orientation, direction_side, in_circumcircle, orientation,
};

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Error during incremental insertion.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum InsertionError {
    /// An input point has a `NaN` or infinite coordinate.
    #[error("Input point {index} has a non-finite coordinate: {point}")]
    NonFiniteCoordinate {
        /// Position of the point in the input list.
        index: usize,
        /// The offending point.
        point: Point,
    },

    /// No triangle is affected by the point; the graph no longer covers the plane.
    #[error("No affected triangle found for input point {index}")]
    EmptyCavity {
        /// Position of the point in the input list.
        index: usize,
    },

    /// Every perturbation attempt still produced a degenerate cavity.
    #[error("Degenerate cavity for input point {index} after {attempts} perturbation attempts")]
    DegenerateCavity {
        /// Position of the point in the input list.
        index: usize,
        /// Number of perturbations tried.
        attempts: usize,
    },

    /// A boundary edge could not be matched with two distinct new segments.
    #[error("Boundary segment {segment:?} could not be re-chained: {message}")]
    UnmatchedBoundaryEdge {
        /// The boundary segment.
        segment: SegmentKey,
        /// What was missing.
        message: String,
    },

    /// The graph rejected a mutation.
    #[error("Graph mutation failed: {0}")]
    Tds(#[from] TdsMutationError),

    /// The bootstrap triangle could not be built or removed.
    #[error("Bootstrap triangle error: {0}")]
    SuperTriangle(#[from] SuperTriangleError),
}

impl InsertionError {
    /// `true` for structural-integrity failures after which the graph must
    /// be discarded.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::EmptyCavity { .. } | Self::UnmatchedBoundaryEdge { .. } | Self::Tds(_)
        )
    }
}

// =============================================================================
// SYMBOLIC ORIENTATION
// =============================================================================

/// A vertex position for orientation tests: a finite point, or a point at
/// infinity along a direction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Anchor {
    /// An ordinary point.
    Finite(Point),
    /// A point infinitely far away along the given direction.
    Infinite(Point),
}

/// Resolves `site` to an [`Anchor`]: synthetic sites lie at infinity along
/// their direction from the frame center.
#[must_use]
pub fn anchor(tds: &Tds, frame: &SuperTriangle, site: SiteKey) -> Option<Anchor> {
    let site = tds.site(site)?;
    Some(if site.is_synthetic() {
        Anchor::Infinite(frame.direction(site.point()))
    } else {
        Anchor::Finite(site.point())
    })
}

/// Orientation of `(a, b, c)` where any vertex may lie at infinity.
///
/// Infinite vertices are scaled by a common factor `R → ∞` and only the
/// leading term of the determinant is kept, so the result is the limit
/// orientation. Orientation is invariant under cyclic rotation, which reduces
/// every case to one of four forms. A finite edge exactly parallel to an
/// infinite direction is `DEGENERATE`.
///
/// # Examples
///
/// ```
/// use point_graph::core::algorithms::bowyer_watson::{Anchor, symbolic_orientation};
/// use point_graph::geometry::point::Point;
/// use point_graph::geometry::predicates::Orientation;
///
/// let a = Anchor::Finite(Point::new(0.0, 0.0));
/// let b = Anchor::Finite(Point::new(1.0, 0.0));
/// let up = Anchor::Infinite(Point::new(0.3, 1.0));
/// assert_eq!(symbolic_orientation(a, b, up), Orientation::POSITIVE);
/// assert_eq!(symbolic_orientation(b, a, up), Orientation::NEGATIVE);
/// ```
#[must_use]
pub fn symbolic_orientation(a: Anchor, b: Anchor, c: Anchor) -> Orientation {
    use Anchor::{Finite, Infinite};

    let origin = Point::default();
    match (a, b, c) {
        (Finite(a), Finite(b), Finite(c)) => orientation(a, b, c),
        // One vertex at infinity, rotated into the last slot.
        (Finite(a), Finite(b), Infinite(d)) => direction_side(a, b, d),
        (Finite(a), Infinite(d), Finite(c)) => direction_side(c, a, d),
        (Infinite(d), Finite(b), Finite(c)) => direction_side(b, c, d),
        // Two vertices at infinity, finite vertex rotated into the first slot.
        (Finite(_), Infinite(d1), Infinite(d2)) | (Infinite(d1), Infinite(d2), Finite(_)) => {
            orientation(origin, d1, d2)
        }
        (Infinite(d1), Finite(_), Infinite(d2)) => orientation(origin, d2, d1),
        (Infinite(d1), Infinite(d2), Infinite(d3)) => orientation(d1, d2, d3),
    }
}

// =============================================================================
// AFFECTED TRIANGLES
// =============================================================================

fn circle_contains(triangle: &Triangle, p: Point) -> bool {
    in_circumcircle(triangle.geometry(), p) != InCircle::OUTSIDE
}

/// `true` if inserting `p` invalidates `triangle`.
///
/// Triangles without synthetic vertices use the closed circumdisk; triangles
/// with synthetic vertices use the half-plane limits described in the
/// [module documentation](self).
#[must_use]
pub fn is_affected(tds: &Tds, frame: &SuperTriangle, triangle: &Triangle, p: Point) -> bool {
    let vertices = triangle.vertices();
    let Some(anchors) = vertices
        .iter()
        .map(|&site| anchor(tds, frame, site))
        .collect::<Option<SmallBuffer<Anchor, 3>>>()
    else {
        return false;
    };

    let infinite: SmallBuffer<usize, 3> = (0..3)
        .filter(|&i| matches!(anchors[i], Anchor::Infinite(_)))
        .collect();
    let coordinates = |i: usize| match anchors[i] {
        Anchor::Finite(point) | Anchor::Infinite(point) => point,
    };

    match infinite.as_slice() {
        [] => circle_contains(triangle, p),
        &[s] => {
            let u = coordinates((s + 1) % 3);
            let v = coordinates((s + 2) % 3);
            let side_s = direction_side(u, v, coordinates(s));
            if side_s.is_degenerate() {
                return false;
            }
            match orientation(u, v, p) {
                Orientation::DEGENERATE => circle_contains(triangle, p),
                side_p => side_p == side_s,
            }
        }
        &[first, second] => {
            let r = 3 - first - second;
            let u = coordinates(r);
            let d1 = coordinates((r + 1) % 3);
            let d2 = coordinates((r + 2) % 3);
            match direction_side(u, p, d2 - d1) {
                Orientation::DEGENERATE => circle_contains(triangle, p),
                side_p => side_p == orientation(Point::default(), d1, d2),
            }
        }
        _ => true,
    }
}

/// Every triangle affected by `p`, by exhaustive scan.
#[must_use]
pub fn find_affected_triangles(tds: &Tds, frame: &SuperTriangle, p: Point) -> TriangleKeyBuffer {
    tds.triangles()
        .filter(|(_, triangle)| is_affected(tds, frame, triangle, p))
        .map(|(key, _)| key)
        .collect()
}

// =============================================================================
// CAVITY PLANNING
// =============================================================================

/// A cavity edge that survives the insertion and is fanned to the new site.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoundaryEdge {
    /// The surviving segment.
    pub segment: SegmentKey,
    /// First endpoint of the segment.
    pub u: SiteKey,
    /// Second endpoint of the segment.
    pub v: SiteKey,
    /// Vertex of the removed triangle opposite the segment.
    pub opposite: SiteKey,
}

/// Read-only description of one insertion.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CavityPlan {
    /// Triangles to remove.
    pub affected: TriangleKeyBuffer,
    /// Segments shared by two affected triangles; removed outright.
    pub interior: SegmentKeyBuffer,
    /// Segments on the cavity boundary, each closing one new triangle.
    pub boundary: SmallBuffer<BoundaryEdge, TYPICAL_CAVITY_SIZE>,
    /// Distinct boundary endpoints, in first-appearance order.
    pub boundary_vertices: SiteKeyBuffer,
}

impl CavityPlan {
    /// `true` when no triangle is affected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.affected.is_empty()
    }
}

/// Why a cavity plan cannot be committed as is.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CavityDefect {
    /// The new point is collinear with a boundary edge.
    CollinearFan {
        /// The boundary segment.
        segment: SegmentKey,
    },
    /// The new point lies on the far side of a boundary edge.
    FoldedFan {
        /// The boundary segment.
        segment: SegmentKey,
    },
    /// A vertex of the cavity would lose all of its segments.
    HiddenVertex {
        /// The vertex.
        site: SiteKey,
    },
}

/// Classifies the cavity that inserting `p` would open.
///
/// An edge of an affected triangle is interior iff at least two affected
/// triangles use it; every other edge is a boundary edge. When exactly one
/// triangle is affected all three of its edges are therefore boundary edges.
#[must_use]
pub fn plan_cavity(tds: &Tds, frame: &SuperTriangle, p: Point) -> CavityPlan {
    let affected = find_affected_triangles(tds, frame, p);
    let affected_set: TriangleKeySet = affected.iter().copied().collect();

    let mut plan = CavityPlan::default();
    let mut seen_interior = SegmentKeySet::default();
    for &key in &affected {
        let Some(triangle) = tds.triangle(key) else {
            continue;
        };
        for segment in triangle.edges() {
            let shared = tds
                .triangles_of_segment(segment)
                .iter()
                .filter(|t| affected_set.contains(*t))
                .count();
            if shared >= 2 {
                if seen_interior.insert(segment) {
                    plan.interior.push(segment);
                }
                continue;
            }
            let (Some(seg), Some(opposite)) =
                (tds.segment(segment), triangle.opposite_vertex(segment))
            else {
                continue;
            };
            plan.boundary.push(BoundaryEdge {
                segment,
                u: seg.a(),
                v: seg.b(),
                opposite,
            });
            for site in [seg.a(), seg.b()] {
                if !plan.boundary_vertices.contains(&site) {
                    plan.boundary_vertices.push(site);
                }
            }
        }
    }
    plan.affected = affected;
    plan
}

/// Checks that fanning `plan` to `p` yields only well-formed triangles.
///
/// Returns the first defect found, or `None` if the plan can be committed.
#[must_use]
pub fn find_cavity_defect(
    tds: &Tds,
    frame: &SuperTriangle,
    plan: &CavityPlan,
    p: Point,
) -> Option<CavityDefect> {
    let point = Anchor::Finite(p);
    for edge in &plan.boundary {
        let (Some(u), Some(v), Some(w)) = (
            anchor(tds, frame, edge.u),
            anchor(tds, frame, edge.v),
            anchor(tds, frame, edge.opposite),
        ) else {
            return Some(CavityDefect::FoldedFan {
                segment: edge.segment,
            });
        };
        let side_p = symbolic_orientation(u, v, point);
        if side_p.is_degenerate() {
            return Some(CavityDefect::CollinearFan {
                segment: edge.segment,
            });
        }
        if side_p != symbolic_orientation(u, v, w) {
            return Some(CavityDefect::FoldedFan {
                segment: edge.segment,
            });
        }
    }

    plan.affected
        .iter()
        .filter_map(|&key| tds.triangle(key))
        .flat_map(|triangle| triangle.vertices())
        .find(|site| !plan.boundary_vertices.contains(site))
        .map(|site| CavityDefect::HiddenVertex { site })
}

// =============================================================================
// COMMIT
// =============================================================================

/// Closes one triangle per boundary edge using the spokes from each boundary
/// vertex to the new site.
///
/// For boundary edge `(u, v)` the triangle is chained as
/// `(u → v, v → p, p → u)`.
///
/// # Errors
///
/// Returns [`InsertionError::UnmatchedBoundaryEdge`] if a boundary edge lacks
/// two distinct spokes, and [`InsertionError::Tds`] if the graph rejects a
/// triangle.
pub fn fill_cavity(
    tds: &mut Tds,
    boundary: &[BoundaryEdge],
    spokes: &FastHashMap<SiteKey, SegmentKey>,
) -> Result<TriangleKeyBuffer, InsertionError> {
    let mut created = TriangleKeyBuffer::new();
    for edge in boundary {
        let (to_u, to_v) = match (spokes.get(&edge.u), spokes.get(&edge.v)) {
            (Some(&to_u), Some(&to_v)) if to_u != to_v => (to_u, to_v),
            (to_u, to_v) => {
                return Err(InsertionError::UnmatchedBoundaryEdge {
                    segment: edge.segment,
                    message: format!("spoke to u: {to_u:?}, spoke to v: {to_v:?}"),
                });
            }
        };
        created.push(tds.insert_triangle(edge.segment, to_v, to_u)?);
    }
    Ok(created)
}

/// Applies a checked plan: removes the cavity, inserts `site` and re-triangulates.
///
/// # Errors
///
/// Propagates [`fill_cavity`] and graph mutation errors; all are fatal.
pub fn commit_cavity(
    tds: &mut Tds,
    plan: &CavityPlan,
    site: Site,
) -> Result<(SiteKey, TriangleKeyBuffer), InsertionError> {
    for &triangle in &plan.affected {
        tds.remove_triangle(triangle);
    }
    for &segment in &plan.interior {
        tds.remove_segment(segment);
    }

    let p = tds.insert_site(site);
    let mut spokes = fast_hash_map_with_capacity(plan.boundary_vertices.len());
    for &u in &plan.boundary_vertices {
        spokes.insert(u, tds.insert_segment(u, p)?);
    }

    let created = fill_cavity(tds, &plan.boundary, &spokes)?;
    Ok((p, created))
}

// =============================================================================
// INSERTION
// =============================================================================

/// Bounds for jittering a point out of a degenerate configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PerturbationPolicy {
    /// Half-width of the uniform jitter applied to each coordinate.
    pub magnitude: f64,
    /// Perturbations tried before giving up.
    pub max_attempts: usize,
}

/// Result of a successful [`insert_site`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InsertionOutcome {
    /// The new site.
    pub site: SiteKey,
    /// Coordinates actually stored, after any perturbation.
    pub point: Point,
    /// Number of perturbations applied.
    pub perturbations: usize,
    /// Triangles removed.
    pub triangles_removed: usize,
    /// Triangles created.
    pub triangles_created: usize,
}

fn perturb<R: Rng + ?Sized>(point: Point, magnitude: f64, rng: &mut R) -> Point {
    Point::new(
        point.x + rng.random_range(-magnitude..=magnitude),
        point.y + rng.random_range(-magnitude..=magnitude),
    )
}

/// Inserts input point `index` at `point` into a graph that still holds its
/// bootstrap triangle.
///
/// # Errors
///
/// - [`InsertionError::NonFiniteCoordinate`] for a `NaN` or infinite point;
/// - [`InsertionError::DegenerateCavity`] when `policy.max_attempts`
///   perturbations did not resolve a degenerate cavity (the graph is
///   untouched);
/// - fatal errors ([`InsertionError::is_fatal`]) when the graph is corrupted.
pub fn insert_site<R: Rng + ?Sized>(
    tds: &mut Tds,
    frame: &SuperTriangle,
    index: usize,
    point: Point,
    policy: &PerturbationPolicy,
    rng: &mut R,
) -> Result<InsertionOutcome, InsertionError> {
    if !point.is_finite() {
        return Err(InsertionError::NonFiniteCoordinate { index, point });
    }

    let mut candidate = point;
    for attempt in 0..=policy.max_attempts {
        let plan = plan_cavity(tds, frame, candidate);
        if plan.is_empty() {
            return Err(InsertionError::EmptyCavity { index });
        }
        tracing::trace!(
            index,
            affected = plan.affected.len(),
            interior = plan.interior.len(),
            boundary = plan.boundary.len(),
            "planned cavity"
        );

        let Some(defect) = find_cavity_defect(tds, frame, &plan, candidate) else {
            let (site, created) = commit_cavity(tds, &plan, Site::input(index, candidate))?;
            tracing::debug!(
                index,
                point = %candidate,
                perturbations = attempt,
                removed = plan.affected.len(),
                created = created.len(),
                "inserted site"
            );
            return Ok(InsertionOutcome {
                site,
                point: candidate,
                perturbations: attempt,
                triangles_removed: plan.affected.len(),
                triangles_created: created.len(),
            });
        };

        if attempt == policy.max_attempts {
            break;
        }
        candidate = perturb(point, policy.magnitude, rng);
        tracing::warn!(
            index,
            attempt = attempt + 1,
            ?defect,
            point = %candidate,
            "degenerate cavity; perturbing inserted point"
        );
    }

    Err(InsertionError::DegenerateCavity {
        index,
        attempts: policy.max_attempts,
    })
}

// =============================================================================
// TESTS
// =============================================================================
