use std::collections::BTreeMap;

use graph_store::{GraphView, Vertex};
use tracing::debug;

use crate::RoutineError;

/// Edge list snapshot for Hierholzer's walk. An undirected edge gets one id
/// shared by both endpoints' lists so it is walked once.
struct Trails {
    adjacency: BTreeMap<Vertex, Vec<(Vertex, usize)>>,
    /// Out-degree minus in-degree when directed, degree when undirected.
    balance: BTreeMap<Vertex, i64>,
    edges: usize,
}

impl Trails {
    fn new<G: GraphView>(graph: &G) -> Result<Self, RoutineError> {
        let directed = graph.is_directed();
        let mut adjacency: BTreeMap<Vertex, Vec<(Vertex, usize)>> =
            graph.vertices().map(|v| (v, Vec::new())).collect();
        let mut balance: BTreeMap<Vertex, i64> = graph.vertices().map(|v| (v, 0)).collect();
        let mut edges = 0;

        for v in graph.vertices() {
            for edge in graph.adj(v)? {
                let w = edge.to;
                if directed {
                    push(&mut adjacency, v, w, edges);
                    *balance.entry(v).or_default() += 1;
                    *balance.entry(w).or_default() -= 1;
                } else if v <= w {
                    push(&mut adjacency, v, w, edges);
                    if v != w {
                        push(&mut adjacency, w, v, edges);
                    }
                    *balance.entry(v).or_default() += 1;
                    *balance.entry(w).or_default() += 1;
                } else {
                    continue;
                }
                edges += 1;
            }
        }
        Ok(Self {
            adjacency,
            balance,
            edges,
        })
    }

    /// Start vertex if the degrees admit an Eulerian path, and whether that
    /// path must close into a cycle.
    fn start(&self, directed: bool) -> Option<(Vertex, bool)> {
        let first_with_edges = self
            .adjacency
            .iter()
            .find(|(_, out)| !out.is_empty())
            .map(|(&v, _)| v)?;

        if directed {
            let mut heads = self.balance.iter().filter(|&(_, &b)| b != 0);
            match (heads.next(), heads.next(), heads.next()) {
                (None, _, _) => Some((first_with_edges, true)),
                (Some((&a, &ba)), Some((&b, &bb)), None) => match (ba, bb) {
                    (1, -1) => Some((a, false)),
                    (-1, 1) => Some((b, false)),
                    _ => None,
                },
                _ => None,
            }
        } else {
            let mut odd = self.balance.iter().filter(|&(_, &d)| d % 2 != 0);
            match (odd.next(), odd.next(), odd.next()) {
                (None, _, _) => Some((first_with_edges, true)),
                (Some((&a, _)), Some(_), None) => Some((a, false)),
                _ => None,
            }
        }
    }

    fn walk(&self, start: Vertex) -> Vec<Vertex> {
        let mut used = vec![false; self.edges];
        let mut cursor: BTreeMap<Vertex, usize> = BTreeMap::new();
        let mut stack = vec![start];
        let mut path = Vec::with_capacity(self.edges + 1);

        while let Some(&current) = stack.last() {
            let out = self.adjacency.get(&current).map(Vec::as_slice).unwrap_or(&[]);
            let at = cursor.entry(current).or_insert(0);
            while *at < out.len() && used[out[*at].1] {
                *at += 1;
            }
            match out.get(*at) {
                Some(&(next, id)) => {
                    used[id] = true;
                    stack.push(next);
                }
                None => {
                    path.push(current);
                    stack.pop();
                }
            }
        }
        path.reverse();
        path
    }
}

fn push(
    adjacency: &mut BTreeMap<Vertex, Vec<(Vertex, usize)>>,
    from: Vertex,
    to: Vertex,
    id: usize,
) {
    adjacency.entry(from).or_default().push((to, id));
}

/// Eulerian path or circuit, found with Hierholzer's algorithm. Undirected
/// graphs have each edge walked once in either direction.
#[derive(Clone, Debug)]
pub struct Eulerian {
    path: Vec<Vertex>,
    cycle: bool,
}

impl Eulerian {
    pub fn new<G: GraphView>(graph: &G) -> Result<Self, RoutineError> {
        let trails = Trails::new(graph)?;
        let (path, cycle) = match trails.start(graph.is_directed()) {
            Some((start, cycle)) => {
                let path = trails.walk(start);
                // a shorter walk means the edges span several components
                if path.len() == trails.edges + 1 {
                    (path, cycle)
                } else {
                    (Vec::new(), false)
                }
            }
            None => (Vec::new(), false),
        };
        debug!(
            edges = trails.edges,
            path = !path.is_empty(),
            cycle,
            "computed eulerian path"
        );
        Ok(Self { path, cycle })
    }

    pub fn has_eulerian_path(&self) -> bool {
        !self.path.is_empty()
    }

    pub fn has_eulerian_cycle(&self) -> bool {
        self.cycle
    }

    /// Vertices along the path; the circuit when one exists, empty when
    /// there is no path.
    pub fn path(&self) -> &[Vertex] {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use graph_store::{DiGraph, Graph};

    use super::*;

    fn assert_walks_every_edge<G: GraphView>(graph: &G, path: &[Vertex]) {
        let mut seen = BTreeSet::new();
        for pair in path.windows(2) {
            let (v, w) = (pair[0], pair[1]);
            assert!(
                graph.adj(v).unwrap().any(|edge| edge.to == w),
                "{v} -> {w} is not an edge"
            );
            let key = if graph.is_directed() { (v, w) } else { (v.min(w), v.max(w)) };
            assert!(seen.insert(key), "{v} -> {w} walked twice");
        }
        assert_eq!(seen.len(), graph.edge_count());
    }

    #[test]
    fn edgeless_graphs_have_neither() {
        for eulerian in [
            Eulerian::new(&DiGraph::new()).unwrap(),
            Eulerian::new(&DiGraph::with_vertices(3)).unwrap(),
            Eulerian::new(&Graph::with_vertices(3)).unwrap(),
        ] {
            assert!(!eulerian.has_eulerian_path());
            assert!(!eulerian.has_eulerian_cycle());
            assert!(eulerian.path().is_empty());
        }
    }

    #[test]
    fn directed_circuit() {
        let mut graph = DiGraph::with_vertices(4);
        graph
            .insert_edges([(0, 1), (1, 2), (2, 0), (2, 3), (3, 2)])
            .unwrap();
        let eulerian = Eulerian::new(&graph).unwrap();
        assert!(eulerian.has_eulerian_cycle());
        assert_eq!(eulerian.path(), &[0, 1, 2, 3, 2, 0]);
        assert_walks_every_edge(&graph, eulerian.path());
    }

    #[test]
    fn directed_open_path_starts_at_the_surplus_vertex() {
        let mut graph = DiGraph::with_vertices(4);
        graph.insert_edges([(1, 2), (2, 0), (0, 1), (1, 3)]).unwrap();
        let eulerian = Eulerian::new(&graph).unwrap();
        assert!(eulerian.has_eulerian_path());
        assert!(!eulerian.has_eulerian_cycle());
        assert_eq!(eulerian.path().first(), Some(&1));
        assert_eq!(eulerian.path().last(), Some(&3));
        assert_walks_every_edge(&graph, eulerian.path());
    }

    #[test]
    fn unbalanced_digraph_has_no_path() {
        let mut graph = DiGraph::with_vertices(3);
        graph.insert_edges([(0, 1), (0, 2)]).unwrap();
        let eulerian = Eulerian::new(&graph).unwrap();
        assert!(!eulerian.has_eulerian_path());
        assert!(eulerian.path().is_empty());
    }

    #[test]
    fn split_edges_have_no_path() {
        let mut graph = DiGraph::with_vertices(4);
        graph.insert_edges([(0, 1), (1, 0), (2, 3), (3, 2)]).unwrap();
        let eulerian = Eulerian::new(&graph).unwrap();
        assert!(!eulerian.has_eulerian_path());
        assert!(!eulerian.has_eulerian_cycle());
    }

    #[test]
    fn undirected_square_with_self_loop() {
        let mut graph = Graph::with_vertices(4);
        graph
            .insert_edges([(0, 1), (1, 2), (2, 3), (3, 0), (2, 2)])
            .unwrap();
        let eulerian = Eulerian::new(&graph).unwrap();
        assert!(eulerian.has_eulerian_cycle());
        assert_eq!(eulerian.path().len(), 6);
        assert_eq!(eulerian.path().first(), eulerian.path().last());
        assert_walks_every_edge(&graph, eulerian.path());
    }

    #[test]
    fn undirected_open_path_between_odd_vertices() {
        let mut graph = Graph::with_vertices(5);
        graph
            .insert_edges([(0, 1), (1, 2), (2, 0), (2, 3), (3, 4)])
            .unwrap();
        let eulerian = Eulerian::new(&graph).unwrap();
        assert!(eulerian.has_eulerian_path());
        assert!(!eulerian.has_eulerian_cycle());
        assert_eq!(eulerian.path().first(), Some(&2));
        assert_eq!(eulerian.path().last(), Some(&4));
        assert_walks_every_edge(&graph, eulerian.path());
    }

    #[test]
    fn star_has_no_path() {
        let mut graph = Graph::with_vertices(4);
        graph.insert_edges([(0, 1), (0, 2), (0, 3)]).unwrap();
        assert!(!Eulerian::new(&graph).unwrap().has_eulerian_path());
    }

    #[test]
    fn isolated_vertices_do_not_matter() {
        let mut graph = Graph::from_vertices([-5, 0, 1, 2, 9]);
        graph.insert_edges([(0, 1), (1, 2), (2, 0)]).unwrap();
        let eulerian = Eulerian::new(&graph).unwrap();
        assert!(eulerian.has_eulerian_cycle());
        assert_eq!(eulerian.path(), &[0, 1, 2, 0]);
    }
}
