//! Ordered integer-keyed index backed by a left-leaning red-black tree.
//!
//! [`OrderedMap`] is the engine: every node owns its children and tracks the
//! size of its subtree, which gives `O(log n)` search, rank and select.
//! [`OrderedIndex`] is the key-only view with fallible symbol-table queries.

mod error;
mod index;
mod map;

pub use error::IndexError;
pub use index::OrderedIndex;
pub use map::{Iter, Keys, OrderedMap, Values};

pub type Key = i64;

pub const DEFAULT_DELIMITER: &str = ",";
pub const DEFAULT_NIL: &str = ")";
