use std::fmt;

use crate::map::{Keys, OrderedMap};
use crate::{DEFAULT_DELIMITER, DEFAULT_NIL, IndexError, Key};

/// Ordered set of keys with symbol-table queries.
///
/// Queries that need at least one key fail with [`IndexError::Empty`] on an
/// empty index. Lookups of a specific absent key fail with
/// [`IndexError::NotFound`]. [`OrderedIndex::depth`] is the only query that
/// answers `0` for an empty index.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct OrderedIndex {
    inner: OrderedMap<()>,
}

impl OrderedIndex {
    pub fn new() -> Self {
        Self {
            inner: OrderedMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn insert(&mut self, key: Key) {
        self.inner.insert(key, ());
    }

    pub fn erase(&mut self, key: Key) -> Result<(), IndexError> {
        self.inner.remove(key).ok_or(IndexError::NotFound(key))
    }

    pub fn contains(&self, key: Key) -> bool {
        self.inner.contains_key(key)
    }

    pub fn at(&self, key: Key) -> Result<Key, IndexError> {
        if self.inner.contains_key(key) {
            Ok(key)
        } else {
            Err(IndexError::NotFound(key))
        }
    }

    pub fn min(&self) -> Result<Key, IndexError> {
        self.inner.first_key().ok_or(IndexError::Empty)
    }

    pub fn max(&self) -> Result<Key, IndexError> {
        self.inner.last_key().ok_or(IndexError::Empty)
    }

    /// Number of keys strictly less than `key`; `key` itself need not be
    /// present.
    pub fn rank(&self, key: Key) -> Result<usize, IndexError> {
        self.non_empty()?;
        Ok(self.inner.rank(key))
    }

    pub fn floor(&self, key: Key) -> Result<Key, IndexError> {
        self.non_empty()?;
        self.inner.floor(key).ok_or(IndexError::NotFound(key))
    }

    pub fn ceiling(&self, key: Key) -> Result<Key, IndexError> {
        self.non_empty()?;
        self.inner.ceiling(key).ok_or(IndexError::NotFound(key))
    }

    pub fn rank_select(&self, rank: usize) -> Result<Key, IndexError> {
        self.non_empty()?;
        self.inner
            .select(rank)
            .map(|(key, _)| key)
            .ok_or(IndexError::RankOutOfRange {
                rank,
                len: self.len(),
            })
    }

    pub fn iter(&self) -> Keys<'_, ()> {
        self.inner.keys()
    }

    pub fn depth(&self) -> usize {
        self.inner.depth()
    }

    pub fn serialize(&self) -> Result<String, IndexError> {
        self.serialize_with(DEFAULT_DELIMITER, DEFAULT_NIL)
    }

    pub fn serialize_with(&self, delimiter: &str, nil: &str) -> Result<String, IndexError> {
        self.non_empty()?;
        Ok(self.inner.serialize(delimiter, nil))
    }

    pub fn check_invariants(&self) -> Result<(), IndexError> {
        self.inner.check_invariants()
    }

    fn non_empty(&self) -> Result<(), IndexError> {
        if self.is_empty() {
            Err(IndexError::Empty)
        } else {
            Ok(())
        }
    }
}

impl fmt::Debug for OrderedIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl FromIterator<Key> for OrderedIndex {
    fn from_iter<I: IntoIterator<Item = Key>>(iter: I) -> Self {
        let mut index = Self::new();
        index.extend(iter);
        index
    }
}

impl Extend<Key> for OrderedIndex {
    fn extend<I: IntoIterator<Item = Key>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}

impl<'a> IntoIterator for &'a OrderedIndex {
    type Item = Key;
    type IntoIter = Keys<'a, ()>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
