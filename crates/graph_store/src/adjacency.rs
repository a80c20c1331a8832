use std::fmt;

use ordered_index::{Iter, Keys, OrderedIndex, OrderedMap};

use crate::view::Adj;
use crate::{Vertex, Weight};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Edge {
    pub from: Vertex,
    pub to: Vertex,
    pub weight: Weight,
}

impl Edge {
    pub fn new(from: Vertex, to: Vertex, weight: Weight) -> Self {
        Self { from, to, weight }
    }
}

/// Renders as `"{from} -> {to}[{weight}]"`. The formatter precision applies to
/// the weight and defaults to two digits.
impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let precision = f.precision().unwrap_or(2);
        write!(
            f,
            "{} -> {}[{:.*}]",
            self.from, self.to, precision, self.weight
        )
    }
}

/// Per-vertex state: outgoing edges keyed by target, and the ids of every
/// vertex with an edge into this one.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AdjacencyRecord {
    outgoing: OrderedMap<Weight>,
    incoming: OrderedIndex,
}

impl AdjacencyRecord {
    pub fn outgoing(&self) -> &OrderedMap<Weight> {
        &self.outgoing
    }

    pub fn incoming(&self) -> &OrderedIndex {
        &self.incoming
    }

    pub fn outdegree(&self) -> usize {
        self.outgoing.len()
    }

    pub fn indegree(&self) -> usize {
        self.incoming.len()
    }

    pub fn weight_to(&self, target: Vertex) -> Option<Weight> {
        self.outgoing.get(target).copied()
    }

    pub fn edges(&self, from: Vertex) -> Adj<'_> {
        Adj::new(from, self.outgoing.iter())
    }
}

/// Vertex id to record. Edge bookkeeping that has to touch two records at once
/// lives here so both halves of an edge always change together.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct VertexTable {
    records: OrderedMap<AdjacencyRecord>,
}

impl VertexTable {
    pub(crate) fn len(&self) -> usize {
        self.records.len()
    }

    pub(crate) fn contains(&self, v: Vertex) -> bool {
        self.records.contains_key(v)
    }

    pub(crate) fn get(&self, v: Vertex) -> Option<&AdjacencyRecord> {
        self.records.get(v)
    }

    pub(crate) fn iter(&self) -> Iter<'_, AdjacencyRecord> {
        self.records.iter()
    }

    pub(crate) fn keys(&self) -> Keys<'_, AdjacencyRecord> {
        self.records.keys()
    }

    /// Returns `false` if `v` was already present.
    pub(crate) fn insert_vertex(&mut self, v: Vertex) -> bool {
        if self.records.contains_key(v) {
            return false;
        }
        self.records.insert(v, AdjacencyRecord::default());
        true
    }

    /// Inserts or reweights `v -> w`. Both endpoints must exist. Returns
    /// `true` if the edge is new.
    pub(crate) fn link(&mut self, v: Vertex, w: Vertex, weight: Weight) -> bool {
        let Some(source) = self.records.get_mut(v) else {
            return false;
        };
        let created = source.outgoing.insert(w, weight).is_none();
        if created {
            if let Some(target) = self.records.get_mut(w) {
                target.incoming.insert(v);
            }
        }
        created
    }

    /// Returns `true` if `v -> w` existed.
    pub(crate) fn unlink(&mut self, v: Vertex, w: Vertex) -> bool {
        let removed = self
            .records
            .get_mut(v)
            .is_some_and(|source| source.outgoing.remove(w).is_some());
        if removed {
            if let Some(target) = self.records.get_mut(w) {
                let mirrored = target.incoming.erase(v).is_ok();
                debug_assert!(mirrored, "{v} -> {w} was not mirrored in {w}");
            }
        }
        removed
    }

    /// Removes `v` with every edge touching it and returns how many directed
    /// edges went with it, or `None` if `v` is absent. Only the neighbors named
    /// in the record are visited.
    pub(crate) fn detach(&mut self, v: Vertex) -> Option<usize> {
        let record = self.records.remove(v)?;
        let mut removed = record.outgoing.len();
        for u in &record.incoming {
            if u == v {
                continue;
            }
            if let Some(source) = self.records.get_mut(u) {
                let mirrored = source.outgoing.remove(v).is_some();
                debug_assert!(mirrored, "{u} is incoming to {v} without an edge");
                if mirrored {
                    removed += 1;
                }
            }
        }
        for w in record.outgoing.keys() {
            if w == v {
                continue;
            }
            if let Some(target) = self.records.get_mut(w) {
                let mirrored = target.incoming.erase(v).is_ok();
                debug_assert!(mirrored, "{v} -> {w} was not mirrored in {w}");
            }
        }
        Some(removed)
    }
}
