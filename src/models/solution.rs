//! Solution, statistics and violation types.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{Route, Traversal};
use crate::graph::{Edge, EdgeId, Graph, NodeId};
use crate::matching::Matching;

/// A type of defect found when checking a route against its graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ViolationType {
    /// The walk does not return to its start node.
    NotClosed {
        /// Node the walk starts at.
        start: NodeId,
        /// Node the walk ends at.
        end: NodeId,
    },
    /// A traversal does not leave from the node the previous one reached.
    Discontinuity {
        /// Index of the offending traversal.
        position: usize,
        /// Node the walk was at.
        expected: NodeId,
        /// Node the traversal claims to leave from.
        found: NodeId,
    },
    /// A traversal names an edge id the graph does not have.
    UnknownEdge {
        /// Index of the offending traversal.
        position: usize,
        /// The missing edge id.
        edge: EdgeId,
    },
    /// A traversal's endpoints or length disagree with its edge.
    EdgeMismatch {
        /// Index of the offending traversal.
        position: usize,
        /// The edge id.
        edge: EdgeId,
    },
    /// An edge instance is traversed more than once.
    EdgeRepeated {
        /// The edge id.
        edge: EdgeId,
        /// Number of traversals.
        count: usize,
    },
    /// An edge instance is never traversed.
    EdgeMissing {
        /// The edge id.
        edge: EdgeId,
    },
    /// An input edge is covered by neither itself nor any of its duplicates.
    OriginalUncovered {
        /// The input edge id.
        edge: EdgeId,
    },
    /// The reported length differs from the sum of edge lengths.
    LengthMismatch {
        /// Length stored on the route.
        reported: f64,
        /// Sum of traversed edge lengths.
        actual: f64,
    },
}

/// A defect found in a route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    /// The type of violation.
    pub kind: ViolationType,
}

impl Violation {
    /// Creates a new violation.
    pub fn new(kind: ViolationType) -> Self {
        Self { kind }
    }
}

/// Counters and stage timings recorded by one solver run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SolveStats {
    /// Number of odd-degree nodes in the input.
    pub odd_nodes: usize,
    /// Number of matched pairs.
    pub matched_pairs: usize,
    /// Number of edge instances added by augmentation.
    pub duplicated_edges: usize,
    /// Sum of input edge lengths.
    pub original_length: f64,
    /// Length of the closed walk.
    pub route_length: f64,
    /// Time spent building shortest-path trees and the distance table.
    pub distance_time: Duration,
    /// Time spent in the matching solver.
    pub matching_time: Duration,
    /// Time spent augmenting the graph.
    pub augment_time: Duration,
    /// Time spent building the circuit.
    pub circuit_time: Duration,
    /// Wall time of the whole run.
    pub total_time: Duration,
}

impl SolveStats {
    /// Extra length walked over the input edges.
    pub fn deadhead_length(&self) -> f64 {
        self.route_length - self.original_length
    }
}

/// The outcome of a route inspection run.
///
/// Owns the augmented graph so every traversal in the route can be resolved
/// to its edge record and payload.
#[derive(Debug, Clone)]
pub struct Solution<P> {
    route: Route,
    graph: Graph<P>,
    odd_nodes: Vec<NodeId>,
    matching: Matching,
    duplicated: Vec<EdgeId>,
    stats: SolveStats,
}

impl<P> Solution<P> {
    /// Assembles a solution from its parts.
    pub fn new(
        route: Route,
        graph: Graph<P>,
        odd_nodes: Vec<NodeId>,
        matching: Matching,
        duplicated: Vec<EdgeId>,
        stats: SolveStats,
    ) -> Self {
        Self {
            route,
            graph,
            odd_nodes,
            matching,
            duplicated,
            stats,
        }
    }

    /// The closed walk.
    pub fn route(&self) -> &Route {
        &self.route
    }

    /// The augmented multigraph the route is an Eulerian circuit of.
    pub fn graph(&self) -> &Graph<P> {
        &self.graph
    }

    /// Odd-degree nodes of the input graph, ascending.
    pub fn odd_nodes(&self) -> &[NodeId] {
        &self.odd_nodes
    }

    /// The minimum-weight perfect matching over the odd nodes.
    pub fn matching(&self) -> &Matching {
        &self.matching
    }

    /// Ids of edge instances added by augmentation.
    pub fn duplicated_edges(&self) -> &[EdgeId] {
        &self.duplicated
    }

    /// Run statistics.
    pub fn stats(&self) -> &SolveStats {
        &self.stats
    }

    /// Length of the closed walk.
    pub fn total_length(&self) -> f64 {
        self.route.total_length()
    }

    /// Iterates the route's traversals paired with their edge records.
    ///
    /// # Panics
    ///
    /// Panics if the route names an edge missing from the graph, which a
    /// solver-produced solution never does.
    pub fn traversed_edges(&self) -> impl Iterator<Item = (&Traversal, &Edge<P>)> + '_ {
        self.route.traversals().iter().map(move |t| {
            let edge = self
                .graph
                .edge(t.edge)
                .expect("route references an edge outside the graph");
            (t, edge)
        })
    }

    /// Splits the solution into its route and augmented graph.
    pub fn into_parts(self) -> (Route, Graph<P>) {
        (self.route, self.graph)
    }
}
