//! Shortest-path engine.
//!
//! - [`ShortestPathTree`] — one Dijkstra run, queried for many targets
//! - [`distance`] / [`shortest_path`] — single-pair conveniences

mod dijkstra;

pub use dijkstra::{distance, shortest_path, ShortestPathTree};
