use std::collections::{BTreeMap, BTreeSet, VecDeque};

use graph_store::{GraphView, Vertex};
use tracing::debug;

use crate::RoutineError;

/// Two-coloring of a graph, with edge direction ignored.
///
/// Each component is colored breadth-first from its smallest vertex, which
/// lands in the first part.
#[derive(Clone, Debug)]
pub struct Bipartite {
    first: BTreeSet<Vertex>,
    second: BTreeSet<Vertex>,
    bipartite: bool,
}

impl Bipartite {
    pub fn new<G: GraphView>(graph: &G) -> Result<Self, RoutineError> {
        let mut side: BTreeMap<Vertex, bool> = BTreeMap::new();
        let mut bipartite = true;
        let mut queue = VecDeque::new();

        'components: for start in graph.vertices() {
            if side.contains_key(&start) {
                continue;
            }
            side.insert(start, false);
            queue.clear();
            queue.push_back(start);
            while let Some(current) = queue.pop_front() {
                let color = side[&current];
                let outgoing = graph.adj(current)?.map(|edge| edge.to);
                for next in outgoing.chain(graph.incoming(current)?) {
                    match side.get(&next) {
                        None => {
                            side.insert(next, !color);
                            queue.push_back(next);
                        }
                        Some(&other) if other == color => {
                            bipartite = false;
                            break 'components;
                        }
                        Some(_) => {}
                    }
                }
            }
        }

        let (mut first, mut second) = (BTreeSet::new(), BTreeSet::new());
        if bipartite {
            for (v, color) in side {
                if color {
                    second.insert(v);
                } else {
                    first.insert(v);
                }
            }
        }
        debug!(vertices = graph.vertex_count(), bipartite, "computed bipartition");
        Ok(Self {
            first,
            second,
            bipartite,
        })
    }

    /// An empty graph counts as bipartite.
    pub fn is_bipartite(&self) -> bool {
        self.bipartite
    }

    pub fn same_set(&self, v: Vertex, w: Vertex) -> Result<bool, RoutineError> {
        self.ensure_partitioned()?;
        Ok(self.part_of(v)? == self.part_of(w)?)
    }

    /// The part holding the smallest vertex first.
    pub fn partition(&self) -> Result<(&BTreeSet<Vertex>, &BTreeSet<Vertex>), RoutineError> {
        self.ensure_partitioned()?;
        Ok((&self.first, &self.second))
    }

    fn ensure_partitioned(&self) -> Result<(), RoutineError> {
        if !self.bipartite {
            return Err(RoutineError::NotBipartite);
        }
        if self.first.is_empty() {
            return Err(RoutineError::EmptyGraph);
        }
        Ok(())
    }

    fn part_of(&self, v: Vertex) -> Result<bool, RoutineError> {
        if self.first.contains(&v) {
            Ok(false)
        } else if self.second.contains(&v) {
            Ok(true)
        } else {
            Err(RoutineError::VertexNotFound(v))
        }
    }
}
