//! Route and traversal types.

use serde::{Deserialize, Serialize};

use crate::graph::{EdgeId, NodeId};

/// Meters in one statute mile, for presentation of metric lengths.
pub const METERS_PER_MILE: f64 = 1609.344;

/// A single traversal of one edge instance within a route.
///
/// Records the direction of travel, since edges themselves are undirected.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Traversal {
    /// Edge instance being traversed.
    pub edge: EdgeId,
    /// Node the traversal leaves.
    pub from: NodeId,
    /// Node the traversal arrives at.
    pub to: NodeId,
    /// Length of the edge.
    pub length: f64,
}

/// A closed walk: an ordered sequence of edge traversals that starts and
/// ends at the same node.
///
/// # Examples
///
/// ```
/// use u_postman::models::{Route, Traversal};
///
/// let mut route = Route::new(0);
/// route.push(Traversal { edge: 0, from: 0, to: 1, length: 2.0 });
/// route.push(Traversal { edge: 1, from: 1, to: 0, length: 3.0 });
/// assert_eq!(route.len(), 2);
/// assert_eq!(route.node_sequence(), vec![0, 1, 0]);
/// assert!(route.is_closed());
/// assert!((route.total_length() - 5.0).abs() < 1e-10);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    origin: NodeId,
    traversals: Vec<Traversal>,
    total_length: f64,
}

impl Route {
    /// Creates an empty route anchored at `origin`.
    pub fn new(origin: NodeId) -> Self {
        Self {
            origin,
            traversals: Vec::new(),
            total_length: 0.0,
        }
    }

    /// Appends a traversal to the end of this route.
    pub fn push(&mut self, traversal: Traversal) {
        self.total_length += traversal.length;
        self.traversals.push(traversal);
    }

    /// The node the walk begins (and, when closed, ends) at.
    pub fn start_node(&self) -> NodeId {
        self.origin
    }

    /// The node the last traversal arrives at.
    pub fn end_node(&self) -> NodeId {
        self.traversals.last().map_or(self.origin, |t| t.to)
    }

    /// Returns the ordered sequence of traversals.
    pub fn traversals(&self) -> &[Traversal] {
        &self.traversals
    }

    /// Returns the number of traversals.
    pub fn len(&self) -> usize {
        self.traversals.len()
    }

    /// Returns `true` if this route traverses no edges.
    pub fn is_empty(&self) -> bool {
        self.traversals.is_empty()
    }

    /// Returns `true` if the walk ends where it started.
    pub fn is_closed(&self) -> bool {
        self.end_node() == self.origin
    }

    /// Returns the edge ids in traversal order.
    pub fn edge_ids(&self) -> Vec<EdgeId> {
        self.traversals.iter().map(|t| t.edge).collect()
    }

    /// Returns the visited nodes, starting and ending with the start node.
    pub fn node_sequence(&self) -> Vec<NodeId> {
        std::iter::once(self.origin)
            .chain(self.traversals.iter().map(|t| t.to))
            .collect()
    }

    /// Sum of traversed edge lengths, in the input unit.
    pub fn total_length(&self) -> f64 {
        self.total_length
    }

    /// Total length converted from meters to miles.
    pub fn total_length_miles(&self) -> f64 {
        self.total_length / METERS_PER_MILE
    }

    /// Returns the same closed walk re-anchored to begin at `node`.
    ///
    /// The first traversal leaving `node` becomes the first step. Returns
    /// `None` if the route never visits `node`. Rotation does not change
    /// the edge multiset or the total length.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_postman::models::{Route, Traversal};
    ///
    /// let mut route = Route::new(0);
    /// route.push(Traversal { edge: 0, from: 0, to: 1, length: 1.0 });
    /// route.push(Traversal { edge: 1, from: 1, to: 2, length: 1.0 });
    /// route.push(Traversal { edge: 2, from: 2, to: 0, length: 1.0 });
    ///
    /// let rotated = route.rotated_to(2).unwrap();
    /// assert_eq!(rotated.node_sequence(), vec![2, 0, 1, 2]);
    /// assert!(route.rotated_to(7).is_none());
    /// ```
    pub fn rotated_to(&self, node: NodeId) -> Option<Route> {
        if node == self.origin {
            return Some(self.clone());
        }
        if !self.is_closed() {
            return None;
        }
        let split = self.traversals.iter().position(|t| t.from == node)?;
        let mut rotated = Route::new(node);
        for t in self.traversals[split..]
            .iter()
            .chain(self.traversals[..split].iter())
        {
            rotated.push(*t);
        }
        Some(rotated)
    }
}
