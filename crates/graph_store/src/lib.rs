//! Weighted directed and undirected graphs over integer vertex ids.
//!
//! Each vertex owns an [`AdjacencyRecord`] holding its outgoing edges and the
//! ids of the vertices that point at it. The incoming ids are plain keys, so a
//! vertex can be erased in time proportional to its degree without any
//! ownership cycle between records.

mod adjacency;
mod digraph;
mod error;
mod graph;
mod render;
mod view;

pub use adjacency::{AdjacencyRecord, Edge};
pub use digraph::DiGraph;
pub use error::GraphError;
pub use graph::Graph;
pub use render::RenderOptions;
pub use view::{Adj, Edges, GraphView, Incoming, Vertices};

pub type Vertex = i64;
pub type Weight = f64;

pub const DEFAULT_WEIGHT: Weight = 1.0;
