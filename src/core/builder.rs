//! Options controlling a triangulation run.
//!
//! [`TriangulationOptions`] is built with [`TriangulationOptionsBuilder`]; any
//! field left unset takes its default. The builder validates the finished
//! options, so every `TriangulationOptions` value in circulation is usable.
//!
//! | Option | Default | Meaning |
//! |---|---|---|
//! | `super_triangle_scale` | `16.0` | bootstrap radius as a multiple of the input extent |
//! | `perturbation_magnitude` | `1e-6` | jitter half-width relative to the input extent |
//! | `max_perturbation_attempts` | `64` | jitter retries before giving up on a point |
//! | `seed` | `0x5EED_2D` | seed of the jitter RNG, re-applied on every run |
//! | `deduplicate` | `false` | drop exact coordinate duplicates in `add_point` |
//!
//! # Examples
//!
//! ```rust
//! use point_graph::core::builder::TriangulationOptionsBuilder;
//!
//! let options = TriangulationOptionsBuilder::default()
//!     .deduplicate(true)
//!     .seed(42)
//!     .build()
//!     .unwrap();
//! assert!(options.deduplicate());
//! assert_eq!(options.seed(), 42);
//! assert_eq!(options.max_perturbation_attempts(), 64);
//!
//! // Invalid values are rejected by the builder.
//! assert!(
//!     TriangulationOptionsBuilder::default()
//!         .super_triangle_scale(0.5)
//!         .build()
//!         .is_err()
//! );
//! ```

/// Default bootstrap radius multiplier.
pub const DEFAULT_SUPER_TRIANGLE_SCALE: f64 = 16.0;

/// Default jitter half-width, relative to the input extent.
///
/// Predicates are exact, so any non-zero jitter separates a duplicate from
/// its original; this width keeps the resulting triangles well-conditioned
/// for the derived circumcenters.
pub const DEFAULT_PERTURBATION_MAGNITUDE: f64 = 1e-6;

/// Default number of jitter retries per point.
pub const DEFAULT_MAX_PERTURBATION_ATTEMPTS: usize = 64;

/// Default jitter RNG seed.
pub const DEFAULT_SEED: u64 = 0x5EED_2D;

/// Configuration of a [`DelaunayTriangulation`](crate::core::delaunay_triangulation::DelaunayTriangulation).
#[derive(Builder, Clone, Copy, Debug, PartialEq)]
#[builder(default, build_fn(validate = "Self::validate"))]
pub struct TriangulationOptions {
    /// Bootstrap radius as a multiple of `max(bbox diagonal, 1)`; must exceed 1.
    super_triangle_scale: f64,
    /// Jitter half-width as a fraction of `max(bbox diagonal, 1)`; must be positive.
    perturbation_magnitude: f64,
    /// Perturbations tried per point before the run fails.
    max_perturbation_attempts: usize,
    /// Seed of the jitter RNG.
    seed: u64,
    /// Reject points whose coordinates equal an already pending point.
    deduplicate: bool,
}

impl Default for TriangulationOptions {
    fn default() -> Self {
        Self {
            super_triangle_scale: DEFAULT_SUPER_TRIANGLE_SCALE,
            perturbation_magnitude: DEFAULT_PERTURBATION_MAGNITUDE,
            max_perturbation_attempts: DEFAULT_MAX_PERTURBATION_ATTEMPTS,
            seed: DEFAULT_SEED,
            deduplicate: false,
        }
    }
}

impl TriangulationOptions {
    /// Bootstrap radius multiplier.
    #[must_use]
    pub const fn super_triangle_scale(&self) -> f64 {
        self.super_triangle_scale
    }

    /// Relative jitter half-width.
    #[must_use]
    pub const fn perturbation_magnitude(&self) -> f64 {
        self.perturbation_magnitude
    }

    /// Jitter retries per point.
    #[must_use]
    pub const fn max_perturbation_attempts(&self) -> usize {
        self.max_perturbation_attempts
    }

    /// Jitter RNG seed.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Whether `add_point` drops exact duplicates.
    #[must_use]
    pub const fn deduplicate(&self) -> bool {
        self.deduplicate
    }
}

impl TriangulationOptionsBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(scale) = self.super_triangle_scale
            && !(scale.is_finite() && scale > 1.0)
        {
            return Err(format!(
                "super_triangle_scale must be finite and greater than 1, got {scale}"
            ));
        }
        if let Some(magnitude) = self.perturbation_magnitude
            && !(magnitude.is_finite() && magnitude > 0.0)
        {
            return Err(format!(
                "perturbation_magnitude must be finite and positive, got {magnitude}"
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let options = TriangulationOptions::default();
        assert_eq!(options.super_triangle_scale(), 16.0);
        assert_eq!(options.perturbation_magnitude(), 1e-6);
        assert_eq!(options.max_perturbation_attempts(), 64);
        assert_eq!(options.seed(), 0x5EED_2D);
        assert!(!options.deduplicate());
        assert_eq!(TriangulationOptionsBuilder::default().build().unwrap(), options);
    }

    #[test]
    fn builder_overrides_selected_fields() {
        let options = TriangulationOptionsBuilder::default()
            .super_triangle_scale(4.0)
            .max_perturbation_attempts(3)
            .build()
            .unwrap();
        assert_eq!(options.super_triangle_scale(), 4.0);
        assert_eq!(options.max_perturbation_attempts(), 3);
        assert_eq!(options.seed(), DEFAULT_SEED);
    }

    #[test]
    fn builder_rejects_invalid_values() {
        for scale in [1.0, 0.0, -2.0, f64::NAN, f64::INFINITY] {
            assert!(
                TriangulationOptionsBuilder::default()
                    .super_triangle_scale(scale)
                    .build()
                    .is_err(),
                "scale {scale} accepted"
            );
        }
        for magnitude in [0.0, -1e-9, f64::NAN] {
            let err = TriangulationOptionsBuilder::default()
                .perturbation_magnitude(magnitude)
                .build()
                .unwrap_err();
            assert!(err.to_string().contains("perturbation_magnitude"));
        }
    }
}
