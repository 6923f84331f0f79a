//! Bootstrap ("super") triangle creation and removal.
//!
//! Incremental insertion starts from a single synthetic triangle that encloses
//! every input point. Its three sites are flagged [`SiteKind::Synthetic`] and
//! are treated by the insertion core as vertices at infinity in the direction
//! they point away from the frame center; see
//! [`crate::core::algorithms::bowyer_watson`]. Once every input point has been
//! inserted, [`remove_super_triangle`] deletes the synthetic sites and
//! everything touching them.
//!
//! [`SiteKind::Synthetic`]: crate::core::site::SiteKind::Synthetic

use std::f64::consts::TAU;

use thiserror::Error;

use crate::core::collections::{SegmentKeySet, TriangleKeySet};
use crate::core::site::Site;
use crate::core::triangulation_data_structure::{
    SegmentKey, SiteKey, Tds, TdsMutationError, TriangleKey,
};
use crate::geometry::point::Point;
use crate::geometry::util::BoundingBox;

/// Angle of the first bootstrap vertex, in radians.
///
/// Rotated off the coordinate axes and the grid diagonals so that no bootstrap
/// direction is parallel to a row, column or diagonal of gridded input.
pub const SUPER_TRIANGLE_PHASE: f64 = 0.5;

/// Errors that can occur while creating or removing the bootstrap triangle.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum SuperTriangleError {
    /// The radius must be finite and greater than 0.
    #[error("Invalid radius: radius must be finite and greater than 0, but got {radius}")]
    InvalidRadius {
        /// The invalid radius value.
        radius: f64,
    },
    /// The center must have finite coordinates.
    #[error("Invalid center: {center} is not finite")]
    InvalidCenter {
        /// The invalid center.
        center: Point,
    },
    /// Removal was requested but the graph holds no synthetic sites.
    #[error("No bootstrap triangle present in the triangulation")]
    MissingSuperTriangle,
    /// The graph rejected one of the bootstrap entities.
    #[error("Failed to build bootstrap triangle: {0}")]
    Tds(#[from] TdsMutationError),
}

/// Handles and frame of the bootstrap triangle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SuperTriangle {
    center: Point,
    radius: f64,
    sites: [SiteKey; 3],
    segments: [SegmentKey; 3],
    triangle: TriangleKey,
}

impl SuperTriangle {
    /// Center of the circle the bootstrap vertices lie on.
    #[must_use]
    pub const fn center(&self) -> Point {
        self.center
    }

    /// Distance of each bootstrap vertex from [`Self::center`].
    #[must_use]
    pub const fn radius(&self) -> f64 {
        self.radius
    }

    /// The three synthetic sites.
    #[must_use]
    pub const fn sites(&self) -> [SiteKey; 3] {
        self.sites
    }

    /// The three bootstrap segments.
    #[must_use]
    pub const fn segments(&self) -> [SegmentKey; 3] {
        self.segments
    }

    /// The bootstrap triangle as first inserted.
    #[must_use]
    pub const fn triangle(&self) -> TriangleKey {
        self.triangle
    }

    /// Direction in which a synthetic site at `point` lies at infinity.
    #[inline]
    #[must_use]
    pub fn direction(&self, point: Point) -> Point {
        point - self.center
    }
}

/// Summary of a [`remove_super_triangle`] call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SuperTriangleRemoval {
    /// Synthetic sites removed.
    pub sites: usize,
    /// Segments removed because they touched a synthetic site.
    pub segments: usize,
    /// Triangles removed because they used such a segment.
    pub triangles: usize,
}

/// Vertices of an equilateral triangle inscribed in the circle of `radius`
/// around `center`, counter-clockwise from [`SUPER_TRIANGLE_PHASE`].
///
/// # Errors
///
/// Returns [`SuperTriangleError::InvalidRadius`] unless `radius` is finite and
/// positive, and [`SuperTriangleError::InvalidCenter`] for a non-finite center.
///
/// # Examples
///
/// ```
/// use approx::assert_relative_eq;
/// use point_graph::core::algorithms::super_triangle::super_triangle_vertices;
/// use point_graph::geometry::point::Point;
///
/// let center = Point::new(1.0, -2.0);
/// let vertices = super_triangle_vertices(center, 10.0).unwrap();
/// for v in vertices {
///     assert_relative_eq!(v.distance(center), 10.0, epsilon = 1e-12);
/// }
/// assert!(super_triangle_vertices(center, 0.0).is_err());
/// ```
pub fn super_triangle_vertices(
    center: Point,
    radius: f64,
) -> Result<[Point; 3], SuperTriangleError> {
    if !(radius.is_finite() && radius > 0.0) {
        return Err(SuperTriangleError::InvalidRadius { radius });
    }
    if !center.is_finite() {
        return Err(SuperTriangleError::InvalidCenter { center });
    }

    Ok([0.0, 1.0, 2.0].map(|i: f64| {
        let angle = i.mul_add(TAU / 3.0, SUPER_TRIANGLE_PHASE);
        Point::new(
            radius.mul_add(angle.cos(), center.x),
            radius.mul_add(angle.sin(), center.y),
        )
    }))
}

/// Clears `tds` and inserts the bootstrap triangle for points inside `bbox`.
///
/// The triangle is centered on the box center with radius
/// `scale × bbox.extent()`. For `scale > 1` its incircle (radius `R / 2`)
/// strictly contains the box's circumcircle, so every input point lies
/// strictly inside the triangle.
///
/// # Errors
///
/// Returns [`SuperTriangleError::InvalidRadius`] or
/// [`SuperTriangleError::InvalidCenter`] for a non-finite box or scale, and
/// [`SuperTriangleError::Tds`] if the graph rejects an entity.
///
/// # Examples
///
/// ```
/// use point_graph::core::algorithms::super_triangle::create_super_triangle;
/// use point_graph::core::triangulation_data_structure::Tds;
/// use point_graph::geometry::point::Point;
/// use point_graph::geometry::util::BoundingBox;
///
/// let bbox = BoundingBox::from_points(&[Point::new(0.0, 0.0), Point::new(4.0, 3.0)]).unwrap();
/// let mut tds = Tds::empty();
/// let frame = create_super_triangle(&mut tds, &bbox, 16.0).unwrap();
///
/// assert_eq!(frame.radius(), 80.0);
/// assert_eq!(tds.number_of_sites(), 3);
/// assert_eq!(tds.number_of_segments(), 3);
/// assert_eq!(tds.number_of_triangles(), 1);
/// assert!(tds.sites().all(|(_, site)| site.is_synthetic()));
/// ```
pub fn create_super_triangle(
    tds: &mut Tds,
    bbox: &BoundingBox,
    scale: f64,
) -> Result<SuperTriangle, SuperTriangleError> {
    let center = bbox.center();
    let radius = scale * bbox.extent();
    let vertices = super_triangle_vertices(center, radius)?;

    tds.clear();
    let [a, b, c] = vertices.map(|p| tds.insert_site(Site::synthetic(p)));
    let ab = tds.insert_segment(a, b)?;
    let bc = tds.insert_segment(b, c)?;
    let ca = tds.insert_segment(c, a)?;
    let triangle = tds.insert_triangle(ab, bc, ca)?;

    tracing::debug!(
        center = %center,
        radius,
        "created bootstrap triangle"
    );

    Ok(SuperTriangle {
        center,
        radius,
        sites: [a, b, c],
        segments: [ab, bc, ca],
        triangle,
    })
}

/// Deletes every synthetic site, every segment touching one, and every
/// triangle using such a segment, together with their index entries.
///
/// # Errors
///
/// Returns [`SuperTriangleError::MissingSuperTriangle`] if the graph holds no
/// synthetic site.
pub fn remove_super_triangle(tds: &mut Tds) -> Result<SuperTriangleRemoval, SuperTriangleError> {
    let synthetic: Vec<SiteKey> = tds
        .sites()
        .filter(|(_, site)| site.is_synthetic())
        .map(|(key, _)| key)
        .collect();
    if synthetic.is_empty() {
        return Err(SuperTriangleError::MissingSuperTriangle);
    }

    let segments: SegmentKeySet = synthetic
        .iter()
        .flat_map(|&site| tds.segments_of_site(site).iter().copied())
        .collect();
    let triangles: TriangleKeySet = segments
        .iter()
        .flat_map(|&segment| tds.triangles_of_segment(segment).iter().copied())
        .collect();

    for &triangle in &triangles {
        tds.remove_triangle(triangle);
    }
    for &segment in &segments {
        tds.remove_segment(segment);
    }
    for &site in &synthetic {
        tds.remove_site(site);
    }

    let removal = SuperTriangleRemoval {
        sites: synthetic.len(),
        segments: segments.len(),
        triangles: triangles.len(),
    };
    tracing::debug!(?removal, "removed bootstrap triangle");
    Ok(removal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::predicates::{Orientation, orientation};
    use approx::assert_relative_eq;

    #[test]
    fn vertices_are_counter_clockwise_and_equilateral() {
        let [a, b, c] = super_triangle_vertices(Point::new(0.0, 0.0), 5.0).unwrap();
        assert_eq!(orientation(a, b, c), Orientation::POSITIVE);
        assert_relative_eq!(a.distance(b), b.distance(c), epsilon = 1e-12);
        assert_relative_eq!(b.distance(c), c.distance(a), epsilon = 1e-12);
    }

    #[test]
    fn invalid_frames_are_rejected() {
        let origin = Point::new(0.0, 0.0);
        assert_eq!(
            super_triangle_vertices(origin, -1.0),
            Err(SuperTriangleError::InvalidRadius { radius: -1.0 })
        );
        assert!(matches!(
            super_triangle_vertices(origin, f64::NAN),
            Err(SuperTriangleError::InvalidRadius { .. })
        ));
        assert!(matches!(
            super_triangle_vertices(Point::new(f64::INFINITY, 0.0), 1.0),
            Err(SuperTriangleError::InvalidCenter { .. })
        ));
    }

    #[test]
    fn bounding_box_lies_strictly_inside() {
        let points = [Point::new(-3.0, 1.0), Point::new(7.0, 2.0), Point::new(0.0, -9.0)];
        let bbox = BoundingBox::from_points(&points).unwrap();
        let mut tds = Tds::empty();
        let frame = create_super_triangle(&mut tds, &bbox, 1.5).unwrap();

        let [a, b, c] = frame.sites().map(|s| tds.site_point(s).unwrap());
        let corners = [
            bbox.min,
            bbox.max,
            Point::new(bbox.min.x, bbox.max.y),
            Point::new(bbox.max.x, bbox.min.y),
        ];
        for p in corners {
            assert_eq!(orientation(a, b, p), Orientation::POSITIVE);
            assert_eq!(orientation(b, c, p), Orientation::POSITIVE);
            assert_eq!(orientation(c, a, p), Orientation::POSITIVE);
        }
    }

    #[test]
    fn creation_clears_prior_state() {
        let bbox = BoundingBox::from_points(&[Point::new(0.0, 0.0)]).unwrap();
        let mut tds = Tds::empty();
        tds.insert_site(Site::input(0, Point::new(0.0, 0.0)));
        let frame = create_super_triangle(&mut tds, &bbox, 16.0).unwrap();

        assert_eq!(tds.number_of_sites(), 3);
        assert_relative_eq!(frame.radius(), 16.0);
        assert_eq!(frame.center(), Point::new(0.0, 0.0));
        assert!(tds.contains_triangle(frame.triangle()));
        assert!(tds.is_valid().is_ok());
    }

    #[test]
    fn removal_purges_everything_synthetic() {
        let bbox = BoundingBox::from_points(&[Point::new(0.0, 0.0)]).unwrap();
        let mut tds = Tds::empty();
        create_super_triangle(&mut tds, &bbox, 16.0).unwrap();

        let removal = remove_super_triangle(&mut tds).unwrap();
        assert_eq!(
            removal,
            SuperTriangleRemoval {
                sites: 3,
                segments: 3,
                triangles: 1
            }
        );
        assert!(tds.is_empty());
        assert_eq!(tds.number_of_segments(), 0);
        assert_eq!(tds.number_of_triangles(), 0);
        assert_eq!(
            remove_super_triangle(&mut tds),
            Err(SuperTriangleError::MissingSuperTriangle)
        );
    }
}
