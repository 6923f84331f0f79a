//! Delaunay empty-circle property validation.

#![forbid(unsafe_code)]

use thiserror::Error;

use crate::core::triangulation_data_structure::{SiteKey, Tds, TriangleKey};
use crate::geometry::predicates::{InCircle, in_circumcircle};

/// A site strictly inside the circumcircle of a triangle it is not a vertex of.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DelaunayViolation {
    /// The triangle whose circumcircle is not empty.
    pub triangle: TriangleKey,
    /// The offending site.
    pub site: SiteKey,
}

/// Errors that can occur during Delaunay property validation.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DelaunayValidationError {
    /// A triangle's circumcircle strictly contains a site.
    #[error("Triangle {triangle:?} violates the Delaunay property: site {site:?} lies inside its circumcircle")]
    DelaunayViolation {
        /// The violating triangle.
        triangle: TriangleKey,
        /// The site inside its circumcircle.
        site: SiteKey,
    },
    /// A requested triangle is not in the graph.
    #[error("Triangle {triangle:?} does not exist")]
    MissingTriangle {
        /// The missing triangle.
        triangle: TriangleKey,
    },
}

/// Collects every (triangle, site) pair breaking the empty-circle property.
///
/// Only triangles and sites without synthetic vertices are considered. The
/// in-circle test is exact, so cocircular sites are accepted and slivers are
/// judged on their true circumcircle.
///
/// `triangles_to_check` restricts the scan; `None` checks every triangle.
///
/// # Errors
///
/// Returns [`DelaunayValidationError::MissingTriangle`] if a requested
/// triangle does not exist.
pub fn find_delaunay_violations(
    tds: &Tds,
    triangles_to_check: Option<&[TriangleKey]>,
) -> Result<Vec<DelaunayViolation>, DelaunayValidationError> {
    let keys: Vec<TriangleKey> = match triangles_to_check {
        Some(keys) => keys.to_vec(),
        None => tds.triangle_keys().collect(),
    };

    let mut violations = Vec::new();
    for triangle_key in keys {
        let triangle = tds
            .triangle(triangle_key)
            .ok_or(DelaunayValidationError::MissingTriangle {
                triangle: triangle_key,
            })?;
        let vertices = triangle.vertices();
        if vertices
            .iter()
            .any(|&v| tds.site(v).is_none_or(|site| site.is_synthetic()))
        {
            continue;
        }

        let geometry = triangle.geometry();
        for (site_key, site) in tds.sites() {
            if site.is_synthetic() || vertices.contains(&site_key) {
                continue;
            }
            if in_circumcircle(geometry, site.point()) == InCircle::INSIDE {
                violations.push(DelaunayViolation {
                    triangle: triangle_key,
                    site: site_key,
                });
            }
        }
    }

    tracing::debug!(
        checked = triangles_to_check.map_or(tds.number_of_triangles(), <[TriangleKey]>::len),
        violations = violations.len(),
        "find_delaunay_violations"
    );
    Ok(violations)
}

/// Checks the empty-circle property over the whole graph.
///
/// # Errors
///
/// Returns [`DelaunayValidationError::DelaunayViolation`] for the first
/// violation found.
///
/// # Examples
///
/// ```
/// use point_graph::core::util::is_delaunay;
/// use point_graph::prelude::*;
///
/// let dt = DelaunayTriangulation::new(&[
///     Point::new(0.0, 0.0),
///     Point::new(4.0, 0.0),
///     Point::new(4.0, 4.0),
///     Point::new(0.0, 4.0),
///     Point::new(1.0, 2.5),
/// ])
/// .unwrap();
/// assert!(is_delaunay(dt.tds()).is_ok());
/// ```
pub fn is_delaunay(tds: &Tds) -> Result<(), DelaunayValidationError> {
    match find_delaunay_violations(tds, None)?.first() {
        Some(violation) => Err(DelaunayValidationError::DelaunayViolation {
            triangle: violation.triangle,
            site: violation.site,
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::site::Site;
    use crate::geometry::point::Point;

    /// Square split along the diagonal `a-c`, with an extra site `e` placed
    /// inside the circumcircle of both triangles.
    fn square_with_intruder() -> (Tds, TriangleKey, TriangleKey, SiteKey) {
        let mut tds = Tds::empty();
        let a = tds.insert_site(Site::input(0, Point::new(0.0, 0.0)));
        let b = tds.insert_site(Site::input(1, Point::new(2.0, 0.0)));
        let c = tds.insert_site(Site::input(2, Point::new(2.0, 2.0)));
        let d = tds.insert_site(Site::input(3, Point::new(0.0, 2.0)));
        let e = tds.insert_site(Site::input(4, Point::new(1.0, 1.2)));
        let ab = tds.insert_segment(a, b).unwrap();
        let bc = tds.insert_segment(b, c).unwrap();
        let ca = tds.insert_segment(c, a).unwrap();
        let cd = tds.insert_segment(c, d).unwrap();
        let da = tds.insert_segment(d, a).unwrap();
        let t1 = tds.insert_triangle(ab, bc, ca).unwrap();
        let t2 = tds.insert_triangle(ca, cd, da).unwrap();
        (tds, t1, t2, e)
    }

    #[test]
    fn intruder_is_reported_for_both_triangles() {
        let (tds, t1, t2, e) = square_with_intruder();
        let violations = find_delaunay_violations(&tds, None).unwrap();
        assert_eq!(violations.len(), 2);
        assert!(violations.contains(&DelaunayViolation { triangle: t1, site: e }));
        assert!(violations.contains(&DelaunayViolation { triangle: t2, site: e }));
        assert!(is_delaunay(&tds).is_err());
    }

    #[test]
    fn cocircular_sites_are_not_violations() {
        let (mut tds, t1, _, e) = square_with_intruder();
        tds.remove_site(e);
        assert!(find_delaunay_violations(&tds, None).unwrap().is_empty());
        assert!(find_delaunay_violations(&tds, Some(&[t1])).unwrap().is_empty());
        assert!(is_delaunay(&tds).is_ok());
    }

    #[test]
    fn sliver_next_to_a_site_is_judged_exactly() {
        // Two vertices 2e-9 apart; the circumcircle is centered near (1/3, 2/3).
        let mut tds = Tds::empty();
        let a = tds.insert_site(Site::input(0, Point::new(1.0, 1.0)));
        let b = tds.insert_site(Site::input(1, Point::new(1.0 + 1.0e-9, 1.0 - 2.0e-9)));
        let c = tds.insert_site(Site::input(2, Point::new(0.0, 0.0)));
        let outside = tds.insert_site(Site::input(3, Point::new(-1.0, 0.0)));
        let ab = tds.insert_segment(a, b).unwrap();
        let bc = tds.insert_segment(b, c).unwrap();
        let ca = tds.insert_segment(c, a).unwrap();
        let t = tds.insert_triangle(ab, bc, ca).unwrap();
        assert!(find_delaunay_violations(&tds, Some(&[t])).unwrap().is_empty());

        let inside = tds.insert_site(Site::input(4, Point::new(0.5, 0.5)));
        let violations = find_delaunay_violations(&tds, Some(&[t])).unwrap();
        assert_eq!(violations, vec![DelaunayViolation { triangle: t, site: inside }]);
        assert!(!violations.iter().any(|v| v.site == outside));
    }

    #[test]
    fn missing_triangle_is_an_error() {
        let (mut tds, t1, _, _) = square_with_intruder();
        tds.remove_triangle(t1);
        assert_eq!(
            find_delaunay_violations(&tds, Some(&[t1])),
            Err(DelaunayValidationError::MissingTriangle { triangle: t1 })
        );
    }
}
