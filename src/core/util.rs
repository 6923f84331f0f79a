//! General helper utilities

#![forbid(unsafe_code)]

mod deduplication;
mod delaunay_validation;

pub use deduplication::*;
pub use delaunay_validation::*;
