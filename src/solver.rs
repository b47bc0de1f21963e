//! Route inspection pipeline.
//!
//! Chains the stages that turn a connected multigraph into a minimum-length
//! closed walk covering every edge:
//!
//! 1. **Odd set**: collect odd-degree nodes (always an even count)
//! 2. **Distances**: one Dijkstra tree per odd node, optionally on the rayon
//!    pool, folded into a symmetric [`DistanceTable`]
//! 3. **Matching**: minimum-weight perfect matching over the table
//! 4. **Augmentation**: duplicate every edge of each matched pair's shortest
//!    path, reusing the trees from step 2
//! 5. **Circuit**: Hierholzer over the now-Eulerian graph, then an optional
//!    rotation to the configured start node
//! 6. **Verification**: optional coverage and length check
//!
//! # Reference
//!
//! Edmonds, J. & Johnson, E.L. (1973). "Matching, Euler tours and the Chinese
//! postman", *Mathematical Programming* 5, 88-124.

use std::time::Instant;

use log::{debug, info, warn};

use crate::augment::augment;
use crate::config::SolverConfig;
use crate::distance::{shortest_path_trees, DistanceTable};
use crate::error::{PostmanError, PostmanResult};
use crate::euler::eulerian_circuit;
use crate::evaluation::RouteEvaluator;
use crate::graph::Graph;
use crate::interrupt::Interrupt;
use crate::matching::min_weight_perfect_matching;
use crate::models::{Solution, SolveStats};

/// Solves the route inspection problem on a connected multigraph.
///
/// # Examples
///
/// ```
/// use u_postman::graph::GraphBuilder;
/// use u_postman::{PostmanSolver, SolverConfig};
///
/// // Star with three unit-length spokes: every spoke is walked twice.
/// let mut b = GraphBuilder::new();
/// let hub = b.add_node(0, None);
/// for key in 1..=3 {
///     let leaf = b.add_node(key, None);
///     b.add_edge(hub, leaf, 1.0, ()).unwrap();
/// }
/// let graph = b.build().unwrap();
///
/// let solution = PostmanSolver::new(SolverConfig::default()).solve(graph).unwrap();
/// assert!((solution.total_length() - 6.0).abs() < 1e-10);
/// assert_eq!(solution.duplicated_edges().len(), 3);
/// ```
#[derive(Debug, Clone, Default)]
pub struct PostmanSolver {
    config: SolverConfig,
    interrupt: Interrupt,
}

impl PostmanSolver {
    /// Creates a solver with its own interrupt handle.
    pub fn new(config: SolverConfig) -> Self {
        Self {
            config,
            interrupt: Interrupt::new(),
        }
    }

    /// Uses an externally owned interrupt handle.
    pub fn with_interrupt(mut self, interrupt: Interrupt) -> Self {
        self.interrupt = interrupt;
        self
    }

    /// A handle that cancels this solver's runs from another thread.
    pub fn interrupt(&self) -> Interrupt {
        self.interrupt.clone()
    }

    /// Returns the configuration.
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Runs the full pipeline, consuming the graph.
    ///
    /// The returned [`Solution`] owns the augmented graph.
    ///
    /// # Errors
    ///
    /// - [`PostmanError::UnknownNode`] if the configured start node is absent
    /// - [`PostmanError::NegativeWeight`] if any edge length is negative
    /// - [`PostmanError::Cancelled`] on interrupt or time limit
    /// - [`PostmanError::RouteVerificationFailed`] if verification is on and
    ///   the route is defective
    /// - any stage error: `Unreachable`, `NoPerfectMatching`,
    ///   `AugmentationInvariantViolated`, `NotEulerian`
    pub fn solve<P: Clone + Sync>(&self, graph: Graph<P>) -> PostmanResult<Solution<P>> {
        let interrupt = match self.config.time_limit {
            Some(limit) => self.interrupt.with_time_limit(limit),
            None => self.interrupt.clone(),
        };
        let result = self.run(graph, &interrupt);
        if let Err(PostmanError::Cancelled) = &result {
            warn!("Route inspection cancelled");
        }
        result
    }

    fn run<P: Clone + Sync>(
        &self,
        mut graph: Graph<P>,
        interrupt: &Interrupt,
    ) -> PostmanResult<Solution<P>> {
        let started = Instant::now();
        let mut stats = SolveStats {
            original_length: graph.total_length(),
            ..SolveStats::default()
        };

        if let Some(start) = self.config.start_node {
            if !graph.contains_node(start) {
                return Err(PostmanError::UnknownNode(start));
            }
        }
        if let Some(edge) = graph.negative_edge() {
            return Err(PostmanError::NegativeWeight {
                edge: edge.id(),
                length: edge.length(),
            });
        }
        interrupt.check()?;

        let odd = graph.odd_nodes();
        stats.odd_nodes = odd.len();
        info!(
            "Solving route inspection: {} nodes, {} edges, {} odd nodes",
            graph.node_count(),
            graph.edge_count(),
            odd.len()
        );

        let stage = Instant::now();
        let trees = shortest_path_trees(&graph, &odd, self.config.parallel, interrupt)?;
        let table = DistanceTable::from_trees(&trees)?;
        stats.distance_time = stage.elapsed();
        debug!("Distance table: {}x{}", table.size(), table.size());

        let stage = Instant::now();
        let matching = min_weight_perfect_matching(&table, interrupt)?;
        stats.matching_time = stage.elapsed();
        stats.matched_pairs = matching.len();
        debug!(
            "Matching: {} pairs, weight {:.3}",
            matching.len(),
            matching.total_weight()
        );

        interrupt.check()?;
        let stage = Instant::now();
        let duplicated = augment(&mut graph, &matching, &trees)?;
        stats.augment_time = stage.elapsed();
        stats.duplicated_edges = duplicated.len();
        debug!("Augmentation: {} edges duplicated", duplicated.len());

        interrupt.check()?;
        let stage = Instant::now();
        let mut route = eulerian_circuit(&graph, None)?;
        if let Some(start) = self.config.start_node {
            route = route
                .rotated_to(start)
                .ok_or(PostmanError::UnknownNode(start))?;
        }
        stats.circuit_time = stage.elapsed();
        stats.route_length = route.total_length();

        if self.config.verify {
            let violations = RouteEvaluator::new(&graph).evaluate(&route);
            if !violations.is_empty() {
                warn!("Route failed verification: {:?}", violations);
                return Err(PostmanError::RouteVerificationFailed(violations));
            }
        }

        stats.total_time = started.elapsed();
        info!(
            "Route inspection solved: length {:.3} (input {:.3}, {} edges duplicated) in {:?}",
            stats.route_length, stats.original_length, stats.duplicated_edges, stats.total_time
        );

        Ok(Solution::new(route, graph, odd, matching, duplicated, stats))
    }
}
