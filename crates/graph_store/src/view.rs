use std::iter::FusedIterator;

use ordered_index::{Iter, Keys};

use crate::adjacency::{AdjacencyRecord, Edge};
use crate::{GraphError, Vertex, Weight};

/// Read-only access shared by directed and undirected graphs.
pub trait GraphView {
    fn is_directed(&self) -> bool;
    fn vertex_count(&self) -> usize;
    fn edge_count(&self) -> usize;
    fn contains(&self, v: Vertex) -> bool;
    fn vertices(&self) -> Vertices<'_>;
    fn adj(&self, v: Vertex) -> Result<Adj<'_>, GraphError>;
    fn incoming(&self, v: Vertex) -> Result<Incoming<'_>, GraphError>;

    fn is_empty(&self) -> bool {
        self.vertex_count() == 0
    }
}

/// Vertex ids in ascending order.
pub struct Vertices<'a> {
    inner: Keys<'a, AdjacencyRecord>,
}

impl<'a> Vertices<'a> {
    pub(crate) fn new(inner: Keys<'a, AdjacencyRecord>) -> Self {
        Self { inner }
    }
}

impl Iterator for Vertices<'_> {
    type Item = Vertex;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Vertices<'_> {}

impl FusedIterator for Vertices<'_> {}

/// Outgoing edges of one vertex, ordered by target.
pub struct Adj<'a> {
    from: Vertex,
    inner: Iter<'a, Weight>,
}

impl<'a> Adj<'a> {
    pub(crate) fn new(from: Vertex, inner: Iter<'a, Weight>) -> Self {
        Self { from, inner }
    }
}

impl Iterator for Adj<'_> {
    type Item = Edge;

    fn next(&mut self) -> Option<Self::Item> {
        let (to, &weight) = self.inner.next()?;
        Some(Edge::new(self.from, to, weight))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Adj<'_> {}

impl FusedIterator for Adj<'_> {}

/// Sources of the edges into one vertex, ascending.
pub struct Incoming<'a> {
    inner: Keys<'a, ()>,
}

impl<'a> Incoming<'a> {
    pub(crate) fn new(inner: Keys<'a, ()>) -> Self {
        Self { inner }
    }
}

impl Iterator for Incoming<'_> {
    type Item = Vertex;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Incoming<'_> {}

impl FusedIterator for Incoming<'_> {}

/// Every stored directed edge, ordered by source and then target.
pub struct Edges<'a> {
    records: Iter<'a, AdjacencyRecord>,
    current: Option<Adj<'a>>,
}

impl<'a> Edges<'a> {
    pub(crate) fn new(records: Iter<'a, AdjacencyRecord>) -> Self {
        Self {
            records,
            current: None,
        }
    }
}

impl Iterator for Edges<'_> {
    type Item = Edge;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(edge) = self.current.as_mut().and_then(Iterator::next) {
                return Some(edge);
            }
            let (from, record) = self.records.next()?;
            self.current = Some(record.edges(from));
        }
    }
}

impl FusedIterator for Edges<'_> {}
