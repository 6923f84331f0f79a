use crate::core::triangulation_data_structure::{SiteKey, TriangleKey};
use slotmap::SparseSecondaryMap;

// =============================================================================
// SLOTMAP SECONDARY MAPS FOR AUXILIARY DATA
// =============================================================================

/// Sparse secondary map for algorithm state attached to sites.
///
/// The idiomatic way to associate temporary data with arena keys, e.g. the
/// union-find parent links of the minimum spanning tree.
///
/// # Examples
///
/// ```rust
/// use point_graph::prelude::*;
///
/// let dt = DelaunayTriangulation::new(&[
///     Point::new(0.0, 0.0),
///     Point::new(4.0, 0.0),
///     Point::new(0.0, 4.0),
/// ])
/// .unwrap();
///
/// let mut order: SiteSecondaryMap<usize> = SiteSecondaryMap::new();
/// for (idx, (site_key, _)) in dt.sites().enumerate() {
///     order.insert(site_key, idx);
/// }
/// assert_eq!(order.len(), 3);
/// ```
pub type SiteSecondaryMap<V> = SparseSecondaryMap<SiteKey, V>;

/// Sparse secondary map for algorithm state attached to triangles.
pub type TriangleSecondaryMap<V> = SparseSecondaryMap<TriangleKey, V>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secondary_maps_compile_and_instantiate() {
        let _site_aux: SiteSecondaryMap<usize> = SiteSecondaryMap::new();
        let _triangle_aux: TriangleSecondaryMap<bool> = TriangleSecondaryMap::new();
    }
}
