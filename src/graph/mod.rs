//! Graph store: nodes, weighted multi-edges and incidence lists.
//!
//! The graph is built once through [`GraphBuilder`], which rejects
//! disconnected input, and afterwards only grows by duplicated edges.

mod components;
mod edge;
mod multigraph;
mod node;

pub use components::connected_components;
pub use edge::{Edge, EdgeId};
pub use multigraph::{Graph, GraphBuilder};
pub use node::{Node, NodeId, Position};
