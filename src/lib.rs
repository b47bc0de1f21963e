//! # u-postman
//!
//! Route inspection (Chinese Postman) on weighted, undirected road-network
//! multigraphs: find a closed walk that traverses every edge at least once
//! with minimum total length.
//!
//! ## Modules
//!
//! - [`graph`] — Multigraph store with stable edge ids and duplicate edges
//! - [`shortest_path`] — Dijkstra trees with deterministic tie-breaking
//! - [`distance`] — Odd-node distance table, built in parallel
//! - [`matching`] — Blossom minimum-weight perfect matching
//! - [`augment`] — Shortest-path edge duplication to restore even degrees
//! - [`euler`] — Hierholzer Eulerian circuit construction
//! - [`models`] — Route, Solution, statistics and violation types
//! - [`evaluation`] — Route coverage and length verification
//! - [`network`] — Road network input and the `NetworkSource` seam
//! - [`solver`] — The end-to-end pipeline
//!
//! ## Quick start
//!
//! ```
//! use u_postman::graph::GraphBuilder;
//! use u_postman::{PostmanSolver, SolverConfig};
//!
//! let mut b = GraphBuilder::new();
//! let a = b.add_node(1, None);
//! let c = b.add_node(2, None);
//! let d = b.add_node(3, None);
//! b.add_edge(a, c, 3.0, ()).unwrap();
//! b.add_edge(c, d, 4.0, ()).unwrap();
//!
//! let solution = PostmanSolver::new(SolverConfig::default())
//!     .solve(b.build().unwrap())
//!     .unwrap();
//! assert!((solution.total_length() - 14.0).abs() < 1e-10);
//! assert_eq!(solution.route().node_sequence(), vec![a, c, d, c, a]);
//! ```

pub mod augment;
pub mod config;
pub mod distance;
pub mod error;
pub mod euler;
pub mod evaluation;
pub mod graph;
pub mod interrupt;
pub mod matching;
pub mod models;
pub mod network;
pub mod shortest_path;
pub mod solver;

pub use config::SolverConfig;
pub use error::{PostmanError, PostmanResult};
pub use interrupt::Interrupt;
pub use solver::PostmanSolver;
