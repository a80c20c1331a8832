use std::fmt;

use tracing::{debug, trace};

use crate::adjacency::{AdjacencyRecord, VertexTable};
use crate::render::{self, RenderOptions};
use crate::view::{Adj, Edges, GraphView, Incoming, Vertices};
use crate::{DEFAULT_WEIGHT, GraphError, Vertex, Weight};

/// Weighted directed graph. Vertices are kept in an ordered index, so every
/// enumeration is ascending by id.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DiGraph {
    table: VertexTable,
    edge_count: usize,
}

impl DiGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Graph on the vertices `0..count` with no edges.
    pub fn with_vertices(count: usize) -> Self {
        Self::from_vertices(0..count as Vertex)
    }

    pub fn from_vertices<I>(vertices: I) -> Self
    where
        I: IntoIterator<Item = Vertex>,
    {
        let mut graph = Self::new();
        graph.insert_vertices(vertices);
        debug!(vertices = graph.vertex_count(), "built digraph");
        graph
    }

    pub fn vertex_count(&self) -> usize {
        self.table.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn is_empty(&self) -> bool {
        self.table.len() == 0
    }

    pub fn contains(&self, v: Vertex) -> bool {
        self.table.contains(v)
    }

    pub fn contains_edge(&self, v: Vertex, w: Vertex) -> bool {
        self.table
            .get(v)
            .is_some_and(|record| record.outgoing().contains_key(w))
    }

    pub fn weight(&self, v: Vertex, w: Vertex) -> Result<Weight, GraphError> {
        let record = self.record(v)?;
        self.require(w)?;
        record
            .weight_to(w)
            .ok_or(GraphError::EdgeNotFound { from: v, to: w })
    }

    pub fn record(&self, v: Vertex) -> Result<&AdjacencyRecord, GraphError> {
        self.table.get(v).ok_or(GraphError::VertexNotFound(v))
    }

    pub fn indegree(&self, v: Vertex) -> Result<usize, GraphError> {
        Ok(self.record(v)?.indegree())
    }

    pub fn outdegree(&self, v: Vertex) -> Result<usize, GraphError> {
        Ok(self.record(v)?.outdegree())
    }

    pub fn adj(&self, v: Vertex) -> Result<Adj<'_>, GraphError> {
        Ok(self.record(v)?.edges(v))
    }

    pub fn incoming(&self, v: Vertex) -> Result<Incoming<'_>, GraphError> {
        Ok(Incoming::new(self.record(v)?.incoming().iter()))
    }

    pub fn vertices(&self) -> Vertices<'_> {
        Vertices::new(self.table.keys())
    }

    pub fn edges(&self) -> Edges<'_> {
        Edges::new(self.table.iter())
    }

    pub fn insert_vertex(&mut self, v: Vertex) {
        self.table.insert_vertex(v);
    }

    pub fn insert_vertices<I>(&mut self, vertices: I)
    where
        I: IntoIterator<Item = Vertex>,
    {
        for v in vertices {
            self.table.insert_vertex(v);
        }
    }

    /// Inserts `v -> w` with the default weight, or resets the weight of an
    /// existing edge.
    pub fn insert_edge(&mut self, v: Vertex, w: Vertex) -> Result<(), GraphError> {
        self.insert_weighted_edge(v, w, DEFAULT_WEIGHT)
    }

    pub fn insert_weighted_edge(
        &mut self,
        v: Vertex,
        w: Vertex,
        weight: Weight,
    ) -> Result<(), GraphError> {
        self.require(v)?;
        self.require(w)?;
        self.link(v, w, weight);
        Ok(())
    }

    /// Inserts each pair in turn. Edges already present are left alone; the
    /// first pair with a missing endpoint aborts, keeping the earlier ones.
    pub fn insert_edges<I>(&mut self, edges: I) -> Result<(), GraphError>
    where
        I: IntoIterator<Item = (Vertex, Vertex)>,
    {
        for (v, w) in edges {
            self.require(v)?;
            self.require(w)?;
            if !self.contains_edge(v, w) {
                self.link(v, w, DEFAULT_WEIGHT);
            }
        }
        Ok(())
    }

    /// Removes `v` together with its incoming and outgoing edges.
    pub fn erase_vertex(&mut self, v: Vertex) -> Result<(), GraphError> {
        let pruned = self.table.detach(v).ok_or(GraphError::VertexNotFound(v))?;
        self.edge_count -= pruned;
        trace!(vertex = v, pruned, "erased vertex");
        Ok(())
    }

    /// Erases the listed vertices that exist and returns how many did.
    pub fn erase_vertices<I>(&mut self, vertices: I) -> usize
    where
        I: IntoIterator<Item = Vertex>,
    {
        vertices
            .into_iter()
            .filter(|&v| self.erase_vertex(v).is_ok())
            .count()
    }

    pub fn erase_edge(&mut self, v: Vertex, w: Vertex) -> Result<(), GraphError> {
        self.require(v)?;
        self.require(w)?;
        if self.unlink(v, w) {
            Ok(())
        } else {
            Err(GraphError::EdgeNotFound { from: v, to: w })
        }
    }

    /// Absent edges are skipped; a missing endpoint aborts.
    pub fn erase_edges<I>(&mut self, edges: I) -> Result<(), GraphError>
    where
        I: IntoIterator<Item = (Vertex, Vertex)>,
    {
        for (v, w) in edges {
            self.require(v)?;
            self.require(w)?;
            self.unlink(v, w);
        }
        Ok(())
    }

    /// Verifies that every outgoing edge is mirrored in the target's incoming
    /// set and vice versa, and that the edge counter matches.
    pub fn check_invariants(&self) -> Result<(), GraphError> {
        let mut total = 0;
        for (v, record) in self.table.iter() {
            total += record.outdegree();
            for w in record.outgoing().keys() {
                let mirrored = self
                    .table
                    .get(w)
                    .is_some_and(|target| target.incoming().contains(v));
                if !mirrored {
                    return Err(GraphError::InvariantViolation(format!(
                        "edge {v} -> {w} is missing from the incoming set of {w}"
                    )));
                }
            }
            for u in record.incoming() {
                let mirrored = self
                    .table
                    .get(u)
                    .is_some_and(|source| source.outgoing().contains_key(v));
                if !mirrored {
                    return Err(GraphError::InvariantViolation(format!(
                        "{u} is listed as incoming to {v} without an edge {u} -> {v}"
                    )));
                }
            }
        }
        if total != self.edge_count {
            return Err(GraphError::InvariantViolation(format!(
                "edge counter is {} but {total} edges are stored",
                self.edge_count
            )));
        }
        Ok(())
    }

    pub fn to_string_with(&self, options: &RenderOptions) -> String {
        render::render(&self.table, options)
    }

    /// Endpoints must already be validated.
    pub(crate) fn link(&mut self, v: Vertex, w: Vertex, weight: Weight) {
        if self.table.link(v, w, weight) {
            self.edge_count += 1;
        }
    }

    pub(crate) fn unlink(&mut self, v: Vertex, w: Vertex) -> bool {
        let removed = self.table.unlink(v, w);
        if removed {
            self.edge_count -= 1;
        }
        removed
    }

    pub(crate) fn require(&self, v: Vertex) -> Result<(), GraphError> {
        if self.table.contains(v) {
            Ok(())
        } else {
            Err(GraphError::VertexNotFound(v))
        }
    }
}

impl fmt::Display for DiGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_with(&RenderOptions::default()))
    }
}

impl FromIterator<Vertex> for DiGraph {
    fn from_iter<I: IntoIterator<Item = Vertex>>(iter: I) -> Self {
        Self::from_vertices(iter)
    }
}

impl GraphView for DiGraph {
    fn is_directed(&self) -> bool {
        true
    }

    fn vertex_count(&self) -> usize {
        DiGraph::vertex_count(self)
    }

    fn edge_count(&self) -> usize {
        DiGraph::edge_count(self)
    }

    fn contains(&self, v: Vertex) -> bool {
        DiGraph::contains(self, v)
    }

    fn vertices(&self) -> Vertices<'_> {
        DiGraph::vertices(self)
    }

    fn adj(&self, v: Vertex) -> Result<Adj<'_>, GraphError> {
        DiGraph::adj(self, v)
    }

    fn incoming(&self, v: Vertex) -> Result<Incoming<'_>, GraphError> {
        DiGraph::incoming(self, v)
    }
}
