//! Error types for route inspection.

use thiserror::Error;

use crate::graph::{EdgeId, NodeId};
use crate::models::Violation;

/// All errors that can occur while building a graph or solving a
/// route inspection instance.
///
/// None of these are recoverable by retrying: they signal either bad input
/// or a broken internal invariant.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PostmanError {
    /// Disconnected, empty, or otherwise malformed input graph.
    #[error("Invalid graph: {0}")]
    InvalidGraph(String),

    /// An edge with negative length was handed to the shortest-path engine.
    #[error("Edge {edge} has negative length {length}")]
    NegativeWeight { edge: EdgeId, length: f64 },

    /// No path connects the two nodes.
    #[error("Node {to} is unreachable from node {from}")]
    Unreachable { from: NodeId, to: NodeId },

    /// The odd-degree set cannot be perfectly matched.
    #[error("No perfect matching: {0}")]
    NoPerfectMatching(String),

    /// A node still has odd degree after augmentation.
    #[error("Node {node} has odd degree {degree} after augmentation")]
    AugmentationInvariantViolated { node: NodeId, degree: usize },

    /// Circuit construction preconditions do not hold.
    #[error("Graph is not Eulerian: {0}")]
    NotEulerian(String),

    /// Node ID out of range.
    #[error("Node ID {0} not found")]
    UnknownNode(NodeId),

    /// Edge ID out of range.
    #[error("Edge ID {0} not found")]
    UnknownEdge(EdgeId),

    /// The run was interrupted or hit its time limit.
    #[error("Solve was cancelled")]
    Cancelled,

    /// The produced route failed post-solve verification.
    #[error("Route verification failed with {} violation(s)", .0.len())]
    RouteVerificationFailed(Vec<Violation>),
}

/// Convenience result type for route inspection operations.
pub type PostmanResult<T> = Result<T, PostmanError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ViolationType;

    #[test]
    fn test_display_messages() {
        let e = PostmanError::Unreachable { from: 1, to: 4 };
        assert_eq!(e.to_string(), "Node 4 is unreachable from node 1");

        let e = PostmanError::AugmentationInvariantViolated { node: 3, degree: 5 };
        assert_eq!(
            e.to_string(),
            "Node 3 has odd degree 5 after augmentation"
        );
    }

    #[test]
    fn test_verification_failure_counts_violations() {
        let e = PostmanError::RouteVerificationFailed(vec![
            Violation::new(ViolationType::NotClosed { start: 0, end: 1 }),
            Violation::new(ViolationType::EdgeMissing { edge: 2 }),
        ]);
        assert_eq!(e.to_string(), "Route verification failed with 2 violation(s)");
    }
}
