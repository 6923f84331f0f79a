//! Collection types used by the triangulation graph.
//!
//! Arena storage, fast non-cryptographic hash maps and small inline buffers,
//! plus the semantic aliases for the two incidence indices
//! (site → segments, segment → triangles).

mod aliases;
mod helpers;
mod secondary_maps;
mod triangulation_maps;

pub use aliases::*;
pub use helpers::*;
pub use secondary_maps::*;
pub use triangulation_maps::*;
