//! Euclidean minimum spanning tree over the triangulation's segments.
//!
//! Kruskal's algorithm: segments are visited in ascending length order (a
//! stable sort, so equal lengths keep arena order) and a segment is kept when
//! its endpoints belong to different components of a union-find keyed by
//! [`SiteKey`].

#![forbid(unsafe_code)]

use ordered_float::OrderedFloat;
use thiserror::Error;

use crate::core::collections::SiteSecondaryMap;
use crate::core::triangulation_data_structure::{SegmentKey, SiteKey, Tds};

/// Errors raised while building a spanning tree.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SpanningTreeError {
    /// A segment references a site that is not in the graph.
    #[error("Segment {segment:?} references missing site {site:?}")]
    MissingSite {
        /// The segment holding the dangling reference.
        segment: SegmentKey,
        /// The missing site.
        site: SiteKey,
    },
}

/// Disjoint-set forest over sites.
///
/// `find` follows parent links to a fixed point without compressing paths,
/// and `union` always attaches the second root below the first, so results
/// depend only on the order of `union` calls.
///
/// # Examples
///
/// ```
/// use point_graph::core::spanning_tree::UnionFind;
/// use point_graph::prelude::*;
///
/// let dt = DelaunayTriangulation::new(&[
///     Point::new(0.0, 0.0),
///     Point::new(1.0, 0.0),
///     Point::new(0.0, 1.0),
/// ])
/// .unwrap();
/// let keys: Vec<_> = dt.tds().site_keys().collect();
///
/// let mut sets = UnionFind::new(keys.iter().copied());
/// assert!(sets.union(keys[0], keys[1]));
/// assert!(!sets.union(keys[1], keys[0]));
/// assert_eq!(sets.find(keys[1]), Some(keys[0]));
/// assert_eq!(sets.find(keys[2]), Some(keys[2]));
/// ```
#[derive(Clone, Debug, Default)]
pub struct UnionFind {
    parent: SiteSecondaryMap<SiteKey>,
}

impl UnionFind {
    /// One singleton set per site.
    pub fn new(sites: impl IntoIterator<Item = SiteKey>) -> Self {
        let mut parent = SiteSecondaryMap::new();
        for site in sites {
            parent.insert(site, site);
        }
        Self { parent }
    }

    /// Representative of the set containing `site`, or `None` for unknown sites.
    #[must_use]
    pub fn find(&self, site: SiteKey) -> Option<SiteKey> {
        let mut current = site;
        loop {
            let parent = *self.parent.get(current)?;
            if parent == current {
                return Some(current);
            }
            current = parent;
        }
    }

    /// Merges the sets of `a` and `b`; returns `false` if they were already
    /// joined or either site is unknown.
    pub fn union(&mut self, a: SiteKey, b: SiteKey) -> bool {
        let (Some(root_a), Some(root_b)) = (self.find(a), self.find(b)) else {
            return false;
        };
        if root_a == root_b {
            return false;
        }
        self.parent.insert(root_b, root_a);
        true
    }
}

/// Minimum spanning tree (forest, for a disconnected graph) of the segment graph.
///
/// Returns the kept segments in ascending length order. A connected graph with
/// `n` sites yields `n - 1` segments.
///
/// # Errors
///
/// Returns [`SpanningTreeError::MissingSite`] if a segment references a site
/// that is not in `tds`.
///
/// # Examples
///
/// ```
/// use point_graph::core::spanning_tree::minimum_spanning_tree;
/// use point_graph::prelude::*;
///
/// let dt = DelaunayTriangulation::new(&[
///     Point::new(0.0, 0.0),
///     Point::new(4.0, 0.0),
///     Point::new(4.0, 3.0),
///     Point::new(0.0, 3.0),
/// ])
/// .unwrap();
/// let tree = minimum_spanning_tree(dt.tds()).unwrap();
/// assert_eq!(tree.len(), 3);
/// let total: f64 = tree.iter().filter_map(|&s| dt.segment_length(s)).sum();
/// assert_eq!(total, 10.0);
/// ```
pub fn minimum_spanning_tree(tds: &Tds) -> Result<Vec<SegmentKey>, SpanningTreeError> {
    let mut candidates = Vec::with_capacity(tds.number_of_segments());
    for (key, segment) in tds.segments() {
        for site in [segment.a(), segment.b()] {
            if !tds.contains_site(site) {
                return Err(SpanningTreeError::MissingSite { segment: key, site });
            }
        }
        let length = tds.segment_length(key).unwrap_or(f64::INFINITY);
        candidates.push((OrderedFloat(length), key, segment.endpoints()));
    }
    candidates.sort_by_key(|&(length, _, _)| length);

    let mut sets = UnionFind::new(tds.site_keys());
    let target = tds.number_of_sites().saturating_sub(1);
    let mut tree = Vec::with_capacity(target);
    for (_, key, (a, b)) in candidates {
        if sets.union(a, b) {
            tree.push(key);
            if tree.len() == target {
                break;
            }
        }
    }

    tracing::debug!(
        sites = tds.number_of_sites(),
        segments = tds.number_of_segments(),
        tree = tree.len(),
        "built minimum spanning tree"
    );
    Ok(tree)
}

// =============================================================================
// TESTS
// =============================================================================
