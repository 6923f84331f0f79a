use rustc_hash::{FxBuildHasher, FxHashMap, FxHashSet, FxHasher};
use smallvec::SmallVec;

// Import slotmap types for storage backend
#[cfg(not(feature = "dense-slotmap"))]
use slotmap::SlotMap;

#[cfg(feature = "dense-slotmap")]
use slotmap::DenseSlotMap;

// =============================================================================
// STORAGE BACKEND
// =============================================================================

/// Arena storage backend for sites, segments and triangles.
///
/// This type alias abstracts over the concrete storage implementation,
/// allowing the choice between `DenseSlotMap` (**default**) and `SlotMap`
/// (when built with `--no-default-features`) without exposing the choice
/// in public APIs.
///
/// # Feature Flags
///
/// - **default**: Uses `DenseSlotMap` (enabled via the default `dense-slotmap` feature)
/// - **--no-default-features**: Uses `SlotMap` for comparison and experimentation
///
/// # Internal Use Only
///
/// Public methods return iterators over `(key, &value)` pairs instead of
/// exposing the storage map itself.
#[cfg(not(feature = "dense-slotmap"))]
pub type StorageMap<K, V> = SlotMap<K, V>;

#[cfg(feature = "dense-slotmap")]
pub type StorageMap<K, V> = DenseSlotMap<K, V>;

// =============================================================================
// CORE OPTIMIZED TYPES
// =============================================================================

/// Optimized `HashMap` type for internal, non-adversarial keys.
///
/// Uses `FastHasher` (`rustc_hash::FxHasher`). Not DoS-resistant; only
/// arena keys and other trusted values are used as keys in this crate.
///
/// # Examples
///
/// ```rust
/// use point_graph::core::collections::FastHashMap;
///
/// let mut map: FastHashMap<u64, usize> = FastHashMap::default();
/// map.insert(123, 456);
/// assert_eq!(map.get(&123), Some(&456));
/// ```
pub type FastHashMap<K, V> = FxHashMap<K, V>;

/// Fast non-cryptographic hasher alias for internal collections.
pub type FastHasher = FxHasher;

/// Build hasher that instantiates [`FastHasher`].
pub type FastBuildHasher = FxBuildHasher;

/// Re-export the Entry enum for `FastHashMap`.
pub use std::collections::hash_map::Entry;

/// Optimized `HashSet` type for internal membership tests.
///
/// # Examples
///
/// ```rust
/// use point_graph::core::collections::FastHashSet;
///
/// let mut set: FastHashSet<u64> = FastHashSet::default();
/// set.insert(7);
/// assert!(set.contains(&7));
/// ```
pub type FastHashSet<T> = FxHashSet<T>;

/// Small-optimized Vec that stays on the stack for up to `N` elements.
///
/// # Size Guidelines
///
/// - **N=2**: Triangles incident to one segment (1 on the hull, 2 inside)
/// - **N=3**: Edges or neighbours of one triangle
/// - **N=8**: Segments incident to one site (typical Delaunay degree is 6)
/// - **N=16**: Cavity-sized scratch buffers
///
/// # Examples
///
/// ```rust
/// use point_graph::core::collections::SmallBuffer;
///
/// let mut buffer: SmallBuffer<i32, 8> = SmallBuffer::new();
/// buffer.push(42);
/// assert_eq!(buffer.len(), 1);
/// ```
pub type SmallBuffer<T, const N: usize> = SmallVec<[T; N]>;

// =============================================================================
// SEMANTIC SIZE CONSTANTS
// =============================================================================

/// Inline capacity for per-site segment lists.
///
/// A site in a Delaunay triangulation has six incident segments on average,
/// so eight keeps almost every list on the stack.
pub const TYPICAL_SITE_DEGREE: usize = 8;

/// Inline capacity for cavity scratch buffers (affected triangles, boundary
/// segments, boundary sites).
pub const TYPICAL_CAVITY_SIZE: usize = 16;
