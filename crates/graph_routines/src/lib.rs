//! Query structures computed once from a graph.
//!
//! Every routine reads the graph through [`GraphView`] and keeps its own
//! copy of the answer, so mutating the graph afterwards does not change a
//! result that was already built.
//!
//! [`GraphView`]: graph_store::GraphView

mod bipartite;
mod components;
mod cycle;
mod error;
mod eulerian;
mod traversal;

pub use bipartite::Bipartite;
pub use components::ConnectedComponents;
pub use cycle::{has_cycle, has_directed_cycle};
pub use error::RoutineError;
pub use eulerian::Eulerian;
pub use traversal::{GraphPaths, Strategy};
