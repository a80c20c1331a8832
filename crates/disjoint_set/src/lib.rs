//! Union-find over arbitrary hashable elements.
//!
//! Elements are mapped to dense ids on insertion; the forest itself is two
//! flat arrays indexed by id.

mod error;
mod set;

pub use error::{DisjointSetError, Operand};
pub use set::DisjointSet;
