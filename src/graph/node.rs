//! Node and position types.

use serde::{Deserialize, Serialize};

/// Dense node index assigned by [`GraphBuilder`](super::GraphBuilder).
pub type NodeId = usize;

/// A planar or geographic position carried through for the caller.
///
/// The solver never reads positions; they exist so that a rendering layer
/// can draw the route without a second lookup.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Easting or longitude.
    pub x: f64,
    /// Northing or latitude.
    pub y: f64,
}

impl Position {
    /// Creates a new position.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A node of the road network.
///
/// # Examples
///
/// ```
/// use u_postman::graph::{Node, Position};
///
/// let node = Node::new(261_116_543, Some(Position::new(-87.65, 41.94)));
/// assert_eq!(node.key(), 261_116_543);
/// assert!(node.position().is_some());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    key: u64,
    position: Option<Position>,
}

impl Node {
    /// Creates a node from an external key (e.g. an OSM node id).
    pub fn new(key: u64, position: Option<Position>) -> Self {
        Self { key, position }
    }

    /// The caller's opaque identifier for this node.
    pub fn key(&self) -> u64 {
        self.key
    }

    /// Position, if the source supplied one.
    pub fn position(&self) -> Option<Position> {
        self.position
    }
}
