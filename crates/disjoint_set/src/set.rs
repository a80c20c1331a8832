use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use tracing::debug;

use crate::{DisjointSetError, Operand};

const INITIAL_SLOTS: usize = 8;

/// Weighted quick-union with path halving.
///
/// Every registered element gets the next dense id. `parent` and `size` are
/// sized in slots that double when the ids run out; slots past `len()` are
/// unused.
#[derive(Clone)]
pub struct DisjointSet<T> {
    ids: HashMap<T, usize>,
    parent: Vec<usize>,
    size: Vec<usize>,
    sets: usize,
}

impl<T> DisjointSet<T>
where
    T: Hash + Eq,
{
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Room for `capacity` elements before the first reallocation.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            ids: HashMap::with_capacity(capacity),
            parent: vec![0; capacity],
            size: vec![0; capacity],
            sets: 0,
        }
    }

    /// Registers `element` as a singleton set. Returns `false` and changes
    /// nothing if it is already registered.
    pub fn insert(&mut self, element: T) -> bool {
        if self.ids.contains_key(&element) {
            return false;
        }
        let id = self.ids.len();
        if id == self.parent.len() {
            self.grow();
        }
        self.parent[id] = id;
        self.size[id] = 1;
        self.ids.insert(element, id);
        self.sets += 1;
        true
    }

    pub fn contains<Q>(&self, element: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.ids.contains_key(element)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Number of disjoint sets.
    pub fn set_count(&self) -> usize {
        self.sets
    }

    /// Id of the root of the set holding `element`.
    pub fn find<Q>(&mut self, element: &Q) -> Result<usize, DisjointSetError>
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let id = self.id_of(element, Operand::First)?;
        Ok(self.root(id))
    }

    /// Merges the sets holding `p` and `q`; the smaller tree goes under the
    /// larger one.
    pub fn connect<Q>(&mut self, p: &Q, q: &Q) -> Result<(), DisjointSetError>
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let p = self.id_of(p, Operand::First)?;
        let q = self.id_of(q, Operand::Second)?;
        let (root_p, root_q) = (self.root(p), self.root(q));
        if root_p == root_q {
            return Ok(());
        }
        if self.size[root_p] > self.size[root_q] {
            self.parent[root_q] = root_p;
            self.size[root_p] += self.size[root_q];
        } else {
            self.parent[root_p] = root_q;
            self.size[root_q] += self.size[root_p];
        }
        self.sets -= 1;
        Ok(())
    }

    pub fn is_connected<Q>(&mut self, p: &Q, q: &Q) -> Result<bool, DisjointSetError>
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let p = self.id_of(p, Operand::First)?;
        let q = self.id_of(q, Operand::Second)?;
        Ok(self.root(p) == self.root(q))
    }

    /// Number of elements in the set holding `element`.
    pub fn set_size<Q>(&mut self, element: &Q) -> Result<usize, DisjointSetError>
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let root = self.find(element)?;
        Ok(self.size[root])
    }

    fn id_of<Q>(&self, element: &Q, operand: Operand) -> Result<usize, DisjointSetError>
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.ids
            .get(element)
            .copied()
            .ok_or(DisjointSetError::NotFound { operand })
    }

    fn root(&mut self, mut id: usize) -> usize {
        while self.parent[id] != id {
            self.parent[id] = self.parent[self.parent[id]];
            id = self.parent[id];
        }
        id
    }

    fn grow(&mut self) {
        let slots = (self.parent.len() * 2).max(INITIAL_SLOTS);
        debug!(from = self.parent.len(), to = slots, "growing disjoint set storage");
        self.parent.resize(slots, 0);
        self.size.resize(slots, 0);
    }
}

impl<T> Default for DisjointSet<T>
where
    T: Hash + Eq,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for DisjointSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DisjointSet")
            .field("len", &self.ids.len())
            .field("sets", &self.sets)
            .finish()
    }
}

impl<T> FromIterator<T> for DisjointSet<T>
where
    T: Hash + Eq,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut set = Self::with_capacity(iter.size_hint().0);
        set.extend(iter);
        set
    }
}

impl<T> Extend<T> for DisjointSet<T>
where
    T: Hash + Eq,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for element in iter {
            self.insert(element);
        }
    }
}
