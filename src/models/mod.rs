//! Domain model types for route inspection results.
//!
//! - [`Route`] / [`Traversal`]: the closed walk as directed edge traversals
//! - [`Solution`]: route plus augmented graph, matching and [`SolveStats`]
//! - [`Violation`] / [`ViolationType`]: defects reported by route verification

mod route;
mod solution;

pub use route::{Route, Traversal, METERS_PER_MILE};
pub use solution::{Solution, SolveStats, Violation, ViolationType};
