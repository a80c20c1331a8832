use disjoint_set::DisjointSetError;
use graph_store::{GraphError, Vertex};
use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum RoutineError {
    #[error("the graph has no vertices")]
    EmptyGraph,
    #[error("vertex {0} is not in the graph")]
    VertexNotFound(Vertex),
    #[error("the graph is not bipartite")]
    NotBipartite,
    #[error(transparent)]
    Graph(#[from] GraphError),
    #[error(transparent)]
    DisjointSet(#[from] DisjointSetError),
}
