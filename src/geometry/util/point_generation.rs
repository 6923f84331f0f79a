//! Random and structured point generation.
//!
//! These helpers produce input point sets for tests, benchmarks and demos.

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::geometry::point::Point;

use super::RandomPointGenerationError;

fn validate_range(range: (f64, f64)) -> Result<(), RandomPointGenerationError> {
    if !(range.0.is_finite() && range.1.is_finite()) || range.0 >= range.1 {
        return Err(RandomPointGenerationError::InvalidRange {
            min: format!("{:?}", range.0),
            max: format!("{:?}", range.1),
        });
    }
    Ok(())
}

/// Generate `n_points` random points with both coordinates uniform in `range`.
///
/// # Errors
///
/// Returns `RandomPointGenerationError::InvalidRange` if `range.0 >= range.1`
/// or either bound is not finite.
///
/// # Examples
///
/// ```
/// use point_graph::geometry::util::generate_random_points;
///
/// let points = generate_random_points(50, (-10.0, 10.0)).unwrap();
/// assert_eq!(points.len(), 50);
/// assert!(points.iter().all(|p| (-10.0..10.0).contains(&p.x)));
/// ```
pub fn generate_random_points(
    n_points: usize,
    range: (f64, f64),
) -> Result<Vec<Point>, RandomPointGenerationError> {
    validate_range(range)?;
    let mut rng = rand::rng();
    Ok((0..n_points)
        .map(|_| Point::new(rng.random_range(range.0..range.1), rng.random_range(range.0..range.1)))
        .collect())
}

/// Generate reproducible random points from a fixed `seed`.
///
/// # Errors
///
/// Returns `RandomPointGenerationError::InvalidRange` if `range.0 >= range.1`
/// or either bound is not finite.
///
/// # Examples
///
/// ```
/// use point_graph::geometry::util::generate_random_points_seeded;
///
/// let points1 = generate_random_points_seeded(100, (-5.0, 5.0), 42).unwrap();
/// let points2 = generate_random_points_seeded(100, (-5.0, 5.0), 42).unwrap();
/// assert_eq!(points1, points2);
///
/// let points3 = generate_random_points_seeded(100, (-5.0, 5.0), 123).unwrap();
/// assert_ne!(points1, points3);
/// ```
pub fn generate_random_points_seeded(
    n_points: usize,
    range: (f64, f64),
    seed: u64,
) -> Result<Vec<Point>, RandomPointGenerationError> {
    validate_range(range)?;
    let mut rng = StdRng::seed_from_u64(seed);
    Ok((0..n_points)
        .map(|_| Point::new(rng.random_range(range.0..range.1), rng.random_range(range.0..range.1)))
        .collect())
}

/// Generate a `rows × cols` grid of points with the given `spacing`, starting at `origin`.
///
/// Points are produced row by row (increasing `y`), each row left to right.
///
/// # Errors
///
/// Returns `RandomPointGenerationError::InvalidGrid` if `spacing` is not a
/// positive finite number or `origin` is not finite.
///
/// # Examples
///
/// ```
/// use point_graph::geometry::point::Point;
/// use point_graph::geometry::util::generate_grid_points;
///
/// let grid = generate_grid_points(2, 3, 1.0, Point::new(0.0, 0.0)).unwrap();
/// assert_eq!(grid.len(), 6);
/// assert_eq!(grid[0], Point::new(0.0, 0.0));
/// assert_eq!(grid[5], Point::new(2.0, 1.0));
/// ```
pub fn generate_grid_points(
    rows: usize,
    cols: usize,
    spacing: f64,
    origin: Point,
) -> Result<Vec<Point>, RandomPointGenerationError> {
    if !(spacing.is_finite() && spacing > 0.0) || !origin.is_finite() {
        return Err(RandomPointGenerationError::InvalidGrid {
            details: format!("spacing={spacing:?}, origin={origin}"),
        });
    }

    let mut points = Vec::with_capacity(rows.saturating_mul(cols));
    let mut y = origin.y;
    for _ in 0..rows {
        let mut x = origin.x;
        for _ in 0..cols {
            points.push(Point::new(x, y));
            x += spacing;
        }
        y += spacing;
    }
    Ok(points)
}
