//! Property-based tests for serialization/deserialization roundtrips.
//!
//! A triangulation serializes as its graph (sites, segments, triangles with
//! their keys). Deserializing rebuilds the incidence indices, validates the
//! result and recovers the input points from the sites' input indices.

use approx::relative_eq;
use point_graph::prelude::*;
use proptest::prelude::*;

/// Check if two points are approximately equal (coordinate-wise)
fn points_approx_equal(p1: Point, p2: Point) -> bool {
    relative_eq!(p1.x, p2.x, epsilon = 1e-14, max_relative = 1e-14)
        && relative_eq!(p1.y, p2.y, epsilon = 1e-14, max_relative = 1e-14)
}

// =============================================================================
// TEST CONFIGURATION
// =============================================================================

fn finite_coordinate() -> impl Strategy<Value = f64> {
    (-100.0..100.0).prop_filter("must be finite", |x: &f64| x.is_finite())
}

fn point_set() -> impl Strategy<Value = Vec<Point>> {
    prop::collection::vec(
        (finite_coordinate(), finite_coordinate()).prop_map(Point::from),
        3..=20,
    )
    .prop_map(|points| dedup_points_exact(&points))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_json_roundtrip_preserves_graph(points in point_set()) {
        let dt = DelaunayTriangulation::new(&points).unwrap();
        let json = serde_json::to_string(&dt).unwrap();
        let back: DelaunayTriangulation = serde_json::from_str(&json).unwrap();

        prop_assert_eq!(back.number_of_sites(), dt.number_of_sites());
        prop_assert_eq!(back.number_of_segments(), dt.number_of_segments());
        prop_assert_eq!(back.number_of_triangles(), dt.number_of_triangles());
        prop_assert!(back.is_valid().is_ok());

        for (key, site) in dt.sites() {
            let restored = back.tds().site(key);
            prop_assert!(restored.is_some());
            prop_assert!(points_approx_equal(site.point(), restored.unwrap().point()));
        }
        for (key, _) in dt.segments() {
            prop_assert_eq!(
                back.tds().triangles_of_segment(key).len(),
                dt.tds().triangles_of_segment(key).len()
            );
        }
        prop_assert_eq!(back.points().len(), points.len());
    }
}

// =============================================================================
// MALFORMED INPUT
// =============================================================================

#[test]
fn tds_roundtrip_keeps_keys() {
    let dt = DelaunayTriangulation::new(&[
        Point::new(0.0, 0.0),
        Point::new(2.0, 0.0),
        Point::new(1.0, 2.0),
        Point::new(1.0, 0.7),
    ])
    .unwrap();
    let json = serde_json::to_string(dt.tds()).unwrap();
    let tds: Tds = serde_json::from_str(&json).unwrap();

    for (key, triangle) in dt.triangles() {
        assert_eq!(tds.triangle(key).map(Triangle::vertices), Some(triangle.vertices()));
    }
    assert_eq!(tds.number_of_triangles(), 3);
}

#[test]
fn garbage_json_is_rejected() {
    assert!(serde_json::from_str::<Tds>("{\"sites\": 3}").is_err());
    assert!(serde_json::from_str::<Tds>("{\"sites\": []}").is_err());
    assert!(serde_json::from_str::<DelaunayTriangulation>("[1, 2, 3]").is_err());
}

#[test]
fn dangling_triangle_is_rejected() {
    let dt = DelaunayTriangulation::new(&[
        Point::new(0.0, 0.0),
        Point::new(1.0, 0.0),
        Point::new(0.0, 1.0),
    ])
    .unwrap();
    let mut value = serde_json::to_value(dt.tds()).unwrap();
    value["segments"] = serde_json::to_value(Tds::empty()).unwrap()["segments"].clone();
    assert!(serde_json::from_value::<Tds>(value).is_err());
}
