use thiserror::Error;

use crate::Vertex;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum GraphError {
    #[error("vertex {0} is not in the graph")]
    VertexNotFound(Vertex),
    #[error("there is no edge from {from} to {to}")]
    EdgeNotFound { from: Vertex, to: Vertex },
    #[error("the graph has no vertices")]
    EmptyGraph,
    #[error("graph invariant violated: {0}")]
    InvariantViolation(String),
}
