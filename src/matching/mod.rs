//! Matching solvers.
//!
//! - [`maximum_weight_matching`] — Edmonds' blossom algorithm on a general graph
//! - [`min_weight_perfect_matching`] — minimum-weight perfect matching of the
//!   odd-degree nodes over their [`DistanceTable`](crate::distance::DistanceTable)

mod blossom;
mod perfect;

pub use blossom::maximum_weight_matching;
pub use perfect::{min_weight_perfect_matching, MatchedPair, Matching};
