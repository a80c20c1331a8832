use std::collections::{HashMap, VecDeque};

use graph_store::{GraphView, Vertex};
use tracing::debug;

use crate::RoutineError;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Strategy {
    #[default]
    DepthFirst,
    BreadthFirst,
}

/// Paths from a single source, following edges in their stored direction.
#[derive(Clone, Debug)]
pub struct GraphPaths {
    source: Vertex,
    edge_to: HashMap<Vertex, Vertex>,
}

impl GraphPaths {
    pub fn new<G: GraphView>(
        graph: &G,
        source: Vertex,
        strategy: Strategy,
    ) -> Result<Self, RoutineError> {
        if graph.is_empty() {
            return Err(RoutineError::EmptyGraph);
        }
        if !graph.contains(source) {
            return Err(RoutineError::VertexNotFound(source));
        }
        let edge_to = match strategy {
            Strategy::DepthFirst => depth_first(graph, source)?,
            Strategy::BreadthFirst => breadth_first(graph, source)?,
        };
        debug!(source, ?strategy, reachable = edge_to.len(), "computed paths");
        Ok(Self { source, edge_to })
    }

    pub fn source(&self) -> Vertex {
        self.source
    }

    pub fn has_path_to(&self, v: Vertex) -> bool {
        self.edge_to.contains_key(&v)
    }

    /// Vertices from the source to `v` inclusive, or an empty path when `v`
    /// is unreachable.
    pub fn path_to(&self, v: Vertex) -> Vec<Vertex> {
        if !self.has_path_to(v) {
            return Vec::new();
        }
        let mut path = vec![v];
        let mut cur = v;
        while cur != self.source {
            cur = self.edge_to[&cur];
            path.push(cur);
        }
        path.reverse();
        path
    }

    /// Vertices reachable from the source, the source included.
    pub fn count(&self) -> usize {
        self.edge_to.len()
    }
}

/// Visits in the order a recursive search would: a vertex is settled when it
/// is popped, and its parent is whoever pushed it last.
fn depth_first<G: GraphView>(
    graph: &G,
    source: Vertex,
) -> Result<HashMap<Vertex, Vertex>, RoutineError> {
    let mut edge_to = HashMap::new();
    let mut stack = vec![(source, source)];
    let mut neighbors = Vec::new();

    while let Some((current, parent)) = stack.pop() {
        if edge_to.contains_key(&current) {
            continue;
        }
        edge_to.insert(current, parent);
        neighbors.clear();
        neighbors.extend(graph.adj(current)?.map(|edge| edge.to));
        // reversed so the smallest neighbor is popped first
        for &next in neighbors.iter().rev() {
            if !edge_to.contains_key(&next) {
                stack.push((next, current));
            }
        }
    }
    Ok(edge_to)
}

fn breadth_first<G: GraphView>(
    graph: &G,
    source: Vertex,
) -> Result<HashMap<Vertex, Vertex>, RoutineError> {
    let mut edge_to = HashMap::from([(source, source)]);
    let mut queue = VecDeque::from([source]);

    while let Some(current) = queue.pop_front() {
        for edge in graph.adj(current)? {
            if !edge_to.contains_key(&edge.to) {
                edge_to.insert(edge.to, current);
                queue.push_back(edge.to);
            }
        }
    }
    Ok(edge_to)
}
