use std::collections::{BTreeMap, HashMap};

use disjoint_set::DisjointSet;
use graph_store::{GraphView, Vertex};
use tracing::debug;

use crate::RoutineError;

/// Connected components, numbered `0..count` in ascending order of each
/// component's smallest vertex. Edge direction is ignored, so a directed graph
/// yields its weakly connected components.
#[derive(Clone, Debug)]
pub struct ConnectedComponents {
    ids: BTreeMap<Vertex, usize>,
    count: usize,
}

impl ConnectedComponents {
    pub fn new<G: GraphView>(graph: &G) -> Result<Self, RoutineError> {
        let mut sets: DisjointSet<Vertex> = graph.vertices().collect();
        for v in graph.vertices() {
            for edge in graph.adj(v)? {
                sets.connect(&edge.from, &edge.to)?;
            }
        }

        let mut ids = BTreeMap::new();
        let mut by_root: HashMap<usize, usize> = HashMap::with_capacity(sets.set_count());
        for v in graph.vertices() {
            let root = sets.find(&v)?;
            let next = by_root.len();
            ids.insert(v, *by_root.entry(root).or_insert(next));
        }
        let count = by_root.len();
        debug!(vertices = ids.len(), components = count, "computed connected components");
        Ok(Self { ids, count })
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn id(&self, v: Vertex) -> Result<usize, RoutineError> {
        if self.ids.is_empty() {
            return Err(RoutineError::EmptyGraph);
        }
        self.ids
            .get(&v)
            .copied()
            .ok_or(RoutineError::VertexNotFound(v))
    }

    pub fn is_connected(&self, v: Vertex, w: Vertex) -> Result<bool, RoutineError> {
        Ok(self.id(v)? == self.id(w)?)
    }
}
