use std::fmt;

use tracing::debug;

use crate::adjacency::AdjacencyRecord;
use crate::digraph::DiGraph;
use crate::render::RenderOptions;
use crate::view::{Adj, Edges, GraphView, Incoming, Vertices};
use crate::{DEFAULT_WEIGHT, GraphError, Vertex, Weight};

/// Weighted undirected graph.
///
/// Stored as a [`DiGraph`] holding both directions of every edge; a self-loop
/// is a single directed edge. `edge_count` counts undirected edges.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Graph {
    inner: DiGraph,
    edge_count: usize,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_vertices(count: usize) -> Self {
        Self::from_vertices(0..count as Vertex)
    }

    pub fn from_vertices<I>(vertices: I) -> Self
    where
        I: IntoIterator<Item = Vertex>,
    {
        let mut graph = Self::new();
        graph.insert_vertices(vertices);
        debug!(vertices = graph.vertex_count(), "built graph");
        graph
    }

    pub fn vertex_count(&self) -> usize {
        self.inner.vertex_count()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn contains(&self, v: Vertex) -> bool {
        self.inner.contains(v)
    }

    pub fn contains_edge(&self, v: Vertex, w: Vertex) -> bool {
        self.inner.contains_edge(v, w)
    }

    pub fn weight(&self, v: Vertex, w: Vertex) -> Result<Weight, GraphError> {
        self.inner.weight(v, w)
    }

    pub fn record(&self, v: Vertex) -> Result<&AdjacencyRecord, GraphError> {
        self.inner.record(v)
    }

    /// Number of edges at `v`, a self-loop counting once.
    pub fn degree(&self, v: Vertex) -> Result<usize, GraphError> {
        let record = self.inner.record(v)?;
        if record.indegree() != record.outdegree() {
            return Err(GraphError::InvariantViolation(format!(
                "vertex {v} has in-degree {} but out-degree {}",
                record.indegree(),
                record.outdegree()
            )));
        }
        Ok(record.outdegree())
    }

    pub fn indegree(&self, v: Vertex) -> Result<usize, GraphError> {
        self.inner.indegree(v)
    }

    pub fn outdegree(&self, v: Vertex) -> Result<usize, GraphError> {
        self.inner.outdegree(v)
    }

    pub fn adj(&self, v: Vertex) -> Result<Adj<'_>, GraphError> {
        self.inner.adj(v)
    }

    pub fn incoming(&self, v: Vertex) -> Result<Incoming<'_>, GraphError> {
        self.inner.incoming(v)
    }

    pub fn vertices(&self) -> Vertices<'_> {
        self.inner.vertices()
    }

    /// Both directions of every edge, ordered by source then target.
    pub fn edges(&self) -> Edges<'_> {
        self.inner.edges()
    }

    pub fn insert_vertex(&mut self, v: Vertex) {
        self.inner.insert_vertex(v);
    }

    pub fn insert_vertices<I>(&mut self, vertices: I)
    where
        I: IntoIterator<Item = Vertex>,
    {
        self.inner.insert_vertices(vertices);
    }

    pub fn insert_edge(&mut self, v: Vertex, w: Vertex) -> Result<(), GraphError> {
        self.insert_weighted_edge(v, w, DEFAULT_WEIGHT)
    }

    pub fn insert_weighted_edge(
        &mut self,
        v: Vertex,
        w: Vertex,
        weight: Weight,
    ) -> Result<(), GraphError> {
        self.inner.require(v)?;
        self.inner.require(w)?;
        self.link_pair(v, w, weight);
        Ok(())
    }

    /// Existing edges keep their weight; the first missing endpoint aborts.
    pub fn insert_edges<I>(&mut self, edges: I) -> Result<(), GraphError>
    where
        I: IntoIterator<Item = (Vertex, Vertex)>,
    {
        for (v, w) in edges {
            self.inner.require(v)?;
            self.inner.require(w)?;
            if !self.inner.contains_edge(v, w) {
                self.link_pair(v, w, DEFAULT_WEIGHT);
            }
        }
        Ok(())
    }

    pub fn erase_vertex(&mut self, v: Vertex) -> Result<(), GraphError> {
        let degree = self.inner.outdegree(v)?;
        self.inner.erase_vertex(v)?;
        self.edge_count -= degree;
        Ok(())
    }

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
        self.inner.require(v)?;
        self.inner.require(w)?;
        if self.unlink_pair(v, w) {
            Ok(())
        } else {
            Err(GraphError::EdgeNotFound { from: v, to: w })
        }
    }

    pub fn erase_edges<I>(&mut self, edges: I) -> Result<(), GraphError>
    where
        I: IntoIterator<Item = (Vertex, Vertex)>,
    {
        for (v, w) in edges {
            self.inner.require(v)?;
            self.inner.require(w)?;
            self.unlink_pair(v, w);
        }
        Ok(())
    }

    /// Checks the directed storage, then that every edge has a reverse twin of
    /// equal weight and that the undirected counter matches.
    pub fn check_invariants(&self) -> Result<(), GraphError> {
        self.inner.check_invariants()?;
        let mut self_loops = 0;
        for edge in self.inner.edges() {
            if edge.from == edge.to {
                self_loops += 1;
                continue;
            }
            match self.inner.weight(edge.to, edge.from) {
                Ok(weight) if weight == edge.weight => {}
                Ok(weight) => {
                    return Err(GraphError::InvariantViolation(format!(
                        "edge {} -> {} weighs {} but its reverse weighs {weight}",
                        edge.from, edge.to, edge.weight
                    )));
                }
                Err(_) => {
                    return Err(GraphError::InvariantViolation(format!(
                        "edge {} -> {} has no reverse",
                        edge.from, edge.to
                    )));
                }
            }
        }
        let stored = (self.inner.edge_count() + self_loops) / 2;
        if stored != self.edge_count {
            return Err(GraphError::InvariantViolation(format!(
                "edge counter is {} but {stored} edges are stored",
                self.edge_count
            )));
        }
        Ok(())
    }

    pub fn to_string_with(&self, options: &RenderOptions) -> String {
        self.inner.to_string_with(options)
    }

    /// Endpoints must already be validated.
    fn link_pair(&mut self, v: Vertex, w: Vertex, weight: Weight) {
        let created = !self.inner.contains_edge(v, w);
        self.inner.link(v, w, weight);
        if v != w {
            self.inner.link(w, v, weight);
        }
        if created {
            self.edge_count += 1;
        }
    }

    fn unlink_pair(&mut self, v: Vertex, w: Vertex) -> bool {
        if !self.inner.unlink(v, w) {
            return false;
        }
        if v != w {
            self.inner.unlink(w, v);
        }
        self.edge_count -= 1;
        true
    }
}

impl fmt::Display for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.inner, f)
    }
}

impl FromIterator<Vertex> for Graph {
    fn from_iter<I: IntoIterator<Item = Vertex>>(iter: I) -> Self {
        Self::from_vertices(iter)
    }
}

/// Forgets edge direction. When both `v -> w` and `w -> v` exist the one
/// replayed last, `max(v, w) -> min(v, w)`, decides the weight.
impl From<&DiGraph> for Graph {
    fn from(digraph: &DiGraph) -> Self {
        let mut graph = Self::from_vertices(digraph.vertices());
        for edge in digraph.edges() {
            graph.link_pair(edge.from, edge.to, edge.weight);
        }
        graph
    }
}

impl GraphView for Graph {
    fn is_directed(&self) -> bool {
        false
    }

    fn vertex_count(&self) -> usize {
        Graph::vertex_count(self)
    }

    fn edge_count(&self) -> usize {
        Graph::edge_count(self)
    }

    fn contains(&self, v: Vertex) -> bool {
        Graph::contains(self, v)
    }

    fn vertices(&self) -> Vertices<'_> {
        Graph::vertices(self)
    }

    fn adj(&self, v: Vertex) -> Result<Adj<'_>, GraphError> {
        Graph::adj(self, v)
    }

    fn incoming(&self, v: Vertex) -> Result<Incoming<'_>, GraphError> {
        Graph::incoming(self, v)
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::collections::BTreeSet;

    use super::*;

    fn rendered(graph: &Graph) -> String {
        graph.to_string()
    }

    #[test]
    fn new_graph_is_empty() {
        let graph = Graph::new();
        assert_eq!(graph.vertex_count(), 0);
        assert_eq!(graph.edge_count(), 0);
        assert_eq!(rendered(&graph), "");

        let mut graph = Graph::with_vertices(5);
        assert_eq!(graph.vertex_count(), 5);
        assert!(graph.insert_edge(1, 2).is_ok());
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn edges_render_in_both_directions() {
        let mut graph = Graph::from_vertices([1, 2, 3]);
        graph.insert_edge(1, 2).unwrap();
        assert_eq!(rendered(&graph), "1: 1 -> 2[1.00],\n2: 2 -> 1[1.00],\n3: \n");
        graph.insert_edge(3, 1).unwrap();
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(
            rendered(&graph),
            "1: 1 -> 2[1.00],1 -> 3[1.00],\n2: 2 -> 1[1.00],\n3: 3 -> 1[1.00],\n"
        );
    }

    #[test]
    fn weight_updates_apply_to_both_directions() {
        let mut graph = Graph::with_vertices(2);
        graph.insert_weighted_edge(0, 1, 2.0).unwrap();
        graph.insert_weighted_edge(1, 0, 7.5).unwrap();
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.weight(0, 1), Ok(7.5));
        assert_eq!(graph.weight(1, 0), Ok(7.5));
        graph.check_invariants().unwrap();
    }

    #[test]
    fn failed_insert_leaves_nothing_behind() {
        let mut graph = Graph::with_vertices(2);
        assert_eq!(graph.insert_edge(0, 5), Err(GraphError::VertexNotFound(5)));
        assert_eq!(graph.insert_edge(5, 0), Err(GraphError::VertexNotFound(5)));
        assert_eq!(graph.edge_count(), 0);
        assert_eq!(graph.degree(0), Ok(0));
        graph.check_invariants().unwrap();
    }

    #[test]
    fn clone_survives_draining_the_original() {
        let mut first = Graph::with_vertices(5);
        first.insert_edges([(0, 1), (1, 2)]).unwrap();
        let second = first.clone();
        assert_eq!(second.vertex_count(), 5);
        assert_eq!(second.edge_count(), 2);
        assert_eq!(rendered(&first), rendered(&second));

        first.erase_vertices(0..5);
        assert_eq!(first.vertex_count(), 0);
        assert_eq!(first.edge_count(), 0);
        assert_eq!(second.vertex_count(), 5);
        assert_eq!(second.edge_count(), 2);
    }

    #[test]
    fn erase_edge_removes_both_halves() {
        let mut graph = Graph::from_vertices(1..=4);
        graph.insert_edges([(1, 2), (2, 3), (2, 4)]).unwrap();

        graph.erase_edge(2, 4).unwrap();
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(
            rendered(&graph),
            "1: 1 -> 2[1.00],\n2: 2 -> 1[1.00],2 -> 3[1.00],\n3: 3 -> 2[1.00],\n4: \n"
        );
        assert_eq!(graph.erase_edge(1, 5), Err(GraphError::VertexNotFound(5)));
        assert_eq!(
            graph.erase_edge(1, 4),
            Err(GraphError::EdgeNotFound { from: 1, to: 4 })
        );
    }

    #[test]
    fn erasing_a_vertex_of_a_complete_graph() {
        const N: Vertex = 10;
        let mut graph = Graph::with_vertices(N as usize);
        for i in 0..N {
            for j in i + 1..N {
                graph.insert_edge(i, j).unwrap();
            }
        }
        let n = N as usize;
        assert_eq!(graph.edge_count(), n * (n - 1) / 2);
        assert_eq!(graph.degree(0), Ok(n - 1));

        graph.erase_vertex(N - 1).unwrap();
        assert_eq!(graph.vertex_count(), n - 1);
        assert_eq!(graph.edge_count(), (n - 1) * (n - 2) / 2);

        let mut expected = String::new();
        for i in 0..N - 1 {
            expected += &format!("{i}: ");
            for j in (0..N - 1).filter(|&j| j != i) {
                expected += &format!("{i} -> {j}[1.00],");
            }
            expected += "\n";
        }
        assert_eq!(rendered(&graph), expected);
    }

    #[test]
    fn self_loops_count_once() {
        let mut graph = Graph::with_vertices(2);
        graph.insert_edges([(0, 0), (0, 1)]).unwrap();
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.degree(0), Ok(2));
        assert_eq!(rendered(&graph), "0: 0 -> 0[1.00],0 -> 1[1.00],\n1: 1 -> 0[1.00],\n");
        graph.check_invariants().unwrap();

        graph.erase_edge(0, 0).unwrap();
        assert_eq!(graph.edge_count(), 1);
        graph.insert_edge(1, 1).unwrap();
        graph.erase_vertex(1).unwrap();
        assert_eq!(graph.edge_count(), 0);
        graph.check_invariants().unwrap();
    }

    #[test]
    fn mixed_bulk_operations() {
        let mut graph: Graph = [0, 2, 4, 6, 8, 10].into_iter().collect();

        let evens = [(0, 2), (0, 4), (2, 6), (2, 8), (4, 8), (4, 10), (6, 10)];
        graph.insert_edges(evens).unwrap();
        assert_eq!(graph.edge_count(), 7);
        for i in (1..10).step_by(2) {
            graph.insert_vertex(i);
            graph.insert_edge(i - 1, i).unwrap();
            graph.insert_edge(i + 1, i).unwrap();
        }
        assert_eq!(graph.vertex_count(), 11);
        assert_eq!(graph.edge_count(), 17);
        graph.erase_edges(evens).unwrap();
        assert_eq!(
            rendered(&graph),
            "0: 0 -> 1[1.00],\n1: 1 -> 0[1.00],1 -> 2[1.00],\n2: 2 -> 1[1.00],2 -> 3[1.00],\n\
             3: 3 -> 2[1.00],3 -> 4[1.00],\n4: 4 -> 3[1.00],4 -> 5[1.00],\n\
             5: 5 -> 4[1.00],5 -> 6[1.00],\n6: 6 -> 5[1.00],6 -> 7[1.00],\n\
             7: 7 -> 6[1.00],7 -> 8[1.00],\n8: 8 -> 7[1.00],8 -> 9[1.00],\n\
             9: 9 -> 8[1.00],9 -> 10[1.00],\n10: 10 -> 9[1.00],\n"
        );

        graph.erase_vertices([1, 3, 5, 7, 9]);
        assert_eq!(rendered(&graph), "0: \n2: \n4: \n6: \n8: \n10: \n");
        assert_eq!(graph.edge_count(), 0);

        // reinserting a reversed pair changes nothing
        graph
            .insert_edges([(0, 2), (2, 4), (4, 6), (6, 8), (8, 10), (10, 0)])
            .unwrap();
        graph.insert_edges([(2, 0), (6, 4), (10, 8)]).unwrap();
        assert_eq!(graph.edge_count(), 6);

        graph.erase_vertices([2, 8]);
        assert_eq!(graph.vertex_count(), 4);
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(
            rendered(&graph),
            "0: 0 -> 10[1.00],\n4: 4 -> 6[1.00],\n6: 6 -> 4[1.00],\n10: 10 -> 0[1.00],\n"
        );

        graph.erase_vertices([4, 6]);
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(
            graph.erase_edges([(4, 4)]),
            Err(GraphError::VertexNotFound(4))
        );
        graph.erase_edges([(10, 0)]).unwrap();
        assert_eq!(graph.edge_count(), 0);
        assert_eq!(rendered(&graph), "0: \n10: \n");

        graph.insert_vertex(2);
        graph.insert_edges([(0, 2), (0, 10), (2, 10)]).unwrap();
        graph.insert_vertex(1);
        graph.insert_edges([(1, 0), (1, 2), (1, 10)]).unwrap();
        assert_eq!(graph.vertex_count(), 4);
        assert_eq!(graph.edge_count(), 6);

        graph.erase_edges([(0, 2), (2, 10), (1, 10)]).unwrap();
        assert_eq!(graph.edge_count(), 3);
        assert_eq!(
            rendered(&graph),
            "0: 0 -> 1[1.00],0 -> 10[1.00],\n1: 1 -> 0[1.00],1 -> 2[1.00],\n\
             2: 2 -> 1[1.00],\n10: 10 -> 0[1.00],\n"
        );
        graph.check_invariants().unwrap();
    }

    #[test]
    fn repeated_insertion_does_not_recount() {
        let mut graph = Graph::new();
        graph.insert_vertex(1);
        graph.insert_vertex(1);
        assert_eq!(rendered(&graph), "1: \n");

        graph.insert_vertex(2);
        graph.insert_edge(1, 2).unwrap();
        graph.insert_edge(1, 2).unwrap();
        assert_eq!(graph.edge_count(), 1);

        graph.insert_vertices([1, 3, 3, 3, 4, 5, 5, 5]);
        assert_eq!(graph.vertex_count(), 5);

        graph
            .insert_edges([(1, 3), (2, 3), (4, 5), (4, 5), (1, 3)])
            .unwrap();
        assert_eq!(graph.edge_count(), 4);
        assert_eq!(
            rendered(&graph),
            "1: 1 -> 2[1.00],1 -> 3[1.00],\n2: 2 -> 1[1.00],2 -> 3[1.00],\n\
             3: 3 -> 1[1.00],3 -> 2[1.00],\n4: 4 -> 5[1.00],\n5: 5 -> 4[1.00],\n"
        );
    }

    #[test]
    fn line_graph_stress() {
        let mut graph = Graph::new();
        for i in 0..100 {
            graph.insert_vertex(i);
            if i > 0 {
                graph.insert_edge(i - 1, i).unwrap();
            }
        }
        assert_eq!(graph.edge_count(), 99);
        graph.insert_edges([(0, 1), (1, 0)]).unwrap();
        assert_eq!(graph.edge_count(), 99);

        for i in (0..50).step_by(2) {
            graph.erase_vertex(i).unwrap();
        }
        assert_eq!(graph.vertex_count(), 75);

        for i in (1..100).step_by(2) {
            graph.insert_edge(i, (i + 2) % 100).unwrap();
            graph.erase_edge(i, (i + 2) % 100).unwrap();
        }
        assert_eq!(graph.edge_count(), 50);

        graph.erase_edge(60, 61).unwrap();
        graph.erase_edge(84, 83).unwrap();
        assert_eq!(graph.edge_count(), 48);
        graph.check_invariants().unwrap();
    }

    #[test]
    fn random_operations_match_pair_set() {
        let mut rng = StdRng::seed_from_u64(31);
        let mut graph = Graph::with_vertices(64);
        let mut oracle = BTreeSet::new();
        for _ in 0..5_000 {
            let v = rng.random_range(0..64);
            let w = rng.random_range(0..64);
            let pair = (v.min(w), v.max(w));
            if rng.random_bool(0.6) {
                graph.insert_edge(v, w).unwrap();
                oracle.insert(pair);
            } else {
                assert_eq!(graph.erase_edge(v, w).is_ok(), oracle.remove(&pair));
            }
            assert_eq!(graph.edge_count(), oracle.len());
        }
        graph.check_invariants().unwrap();
        for v in 0..64 {
            let expected = oracle.iter().filter(|&&(a, b)| a == v || b == v).count();
            assert_eq!(graph.degree(v), Ok(expected));
        }
    }

    #[test]
    fn from_digraph_forgets_direction() {
        let mut digraph = DiGraph::with_vertices(4);
        digraph.insert_weighted_edge(0, 1, 1.0).unwrap();
        digraph.insert_weighted_edge(1, 0, 3.0).unwrap();
        digraph.insert_weighted_edge(2, 3, 2.0).unwrap();
        digraph.insert_weighted_edge(3, 3, 4.0).unwrap();

        let graph = Graph::from(&digraph);
        assert_eq!(graph.vertex_count(), 4);
        assert_eq!(graph.edge_count(), 3);
        assert_eq!(graph.weight(0, 1), Ok(3.0));
        assert_eq!(graph.weight(1, 0), Ok(3.0));
        assert_eq!(graph.weight(3, 2), Ok(2.0));
        assert_eq!(graph.degree(3), Ok(2));
        graph.check_invariants().unwrap();
    }
}
