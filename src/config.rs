//! Solver configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::graph::NodeId;

/// Configuration for [`PostmanSolver`](crate::solver::PostmanSolver).
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use u_postman::SolverConfig;
///
/// let config = SolverConfig::default()
///     .with_parallel(false)
///     .with_start_node(3)
///     .with_time_limit(Duration::from_secs(30));
/// assert!(!config.parallel);
/// assert_eq!(config.start_node, Some(3));
/// assert!(config.verify);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Compute distance-table rows on the rayon thread pool.
    pub parallel: bool,
    /// Rotate the finished route so it begins and ends at this node.
    pub start_node: Option<NodeId>,
    /// Give up with [`Cancelled`](crate::PostmanError::Cancelled) after this long.
    pub time_limit: Option<Duration>,
    /// Check the finished route for coverage and length before returning it.
    pub verify: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            start_node: None,
            time_limit: None,
            verify: true,
        }
    }
}

impl SolverConfig {
    /// Enables or disables parallel distance-table construction.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the node the reported route should start from.
    pub fn with_start_node(mut self, node: NodeId) -> Self {
        self.start_node = Some(node);
        self
    }

    /// Sets a wall-clock limit for the whole solve.
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    /// Enables or disables post-solve route verification.
    pub fn with_verification(mut self, verify: bool) -> Self {
        self.verify = verify;
        self
    }
}
