use std::collections::{HashMap, HashSet, VecDeque};

use graph_store::{DiGraph, Graph, Vertex};
use tracing::debug;

use crate::RoutineError;

/// Kahn elimination: the graph is acyclic iff every vertex can be removed
/// once its in-degree drops to zero.
pub fn has_directed_cycle(graph: &DiGraph) -> Result<bool, RoutineError> {
    let mut in_degree: HashMap<Vertex, usize> = HashMap::with_capacity(graph.vertex_count());
    for v in graph.vertices() {
        in_degree.insert(v, graph.indegree(v)?);
    }
    let mut ready: Vec<Vertex> = in_degree
        .iter()
        .filter(|&(_, &degree)| degree == 0)
        .map(|(&v, _)| v)
        .collect();

    let mut removed = 0;
    while let Some(v) = ready.pop() {
        removed += 1;
        for edge in graph.adj(v)? {
            if let Some(degree) = in_degree.get_mut(&edge.to) {
                *degree -= 1;
                if *degree == 0 {
                    ready.push(edge.to);
                }
            }
        }
    }
    let cyclic = removed != graph.vertex_count();
    debug!(vertices = graph.vertex_count(), removed, cyclic, "checked for a directed cycle");
    Ok(cyclic)
}

/// Breadth-first search per component; reaching an already discovered vertex
/// other than the parent closes a cycle. A self-loop is a cycle.
pub fn has_cycle(graph: &Graph) -> Result<bool, RoutineError> {
    let mut discovered: HashSet<Vertex> = HashSet::with_capacity(graph.vertex_count());
    let mut queue = VecDeque::new();
    let mut cyclic = false;

    'components: for start in graph.vertices() {
        if !discovered.insert(start) {
            continue;
        }
        queue.clear();
        queue.push_back((start, None));
        while let Some((current, parent)) = queue.pop_front() {
            for edge in graph.adj(current)? {
                if discovered.insert(edge.to) {
                    queue.push_back((edge.to, Some(current)));
                } else if Some(edge.to) != parent {
                    cyclic = true;
                    break 'components;
                }
            }
        }
    }
    debug!(vertices = graph.vertex_count(), cyclic, "checked for a cycle");
    Ok(cyclic)
}
