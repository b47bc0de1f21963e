//! Distance table over the odd-degree node set.
//!
//! Provides the dense pairwise table the matching solver reads, and the
//! fan-out that fills it from independent Dijkstra runs.

mod table;

pub use table::{shortest_path_trees, DistanceTable};
