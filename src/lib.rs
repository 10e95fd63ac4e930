//! Two ordered containers over a caller-supplied ordering:
//! a top-down [`splay::SplayTree`], used as an insert/find cache,
//! and a [`weight::WeightTree`] that also answers rank and select queries.

pub mod compare;
pub mod error;
pub mod random;
pub mod trees;

pub use compare::{Comparator, NaturalOrder};
pub use error::AllocError;
pub use trees::*;
