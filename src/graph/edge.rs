//! Edge instance type.

use serde::{Deserialize, Serialize};

use super::NodeId;

/// Dense edge-instance index. Stable for the life of a graph.
pub type EdgeId = usize;

/// One traversable edge instance of an undirected multigraph.
///
/// Parallel edges between the same pair of nodes are separate instances
/// with separate ids. Duplicates inserted by augmentation record the
/// original instance they were copied from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge<P> {
    id: EdgeId,
    u: NodeId,
    v: NodeId,
    length: f64,
    payload: P,
    duplicate_of: Option<EdgeId>,
}

impl<P> Edge<P> {
    pub(crate) fn new(id: EdgeId, u: NodeId, v: NodeId, length: f64, payload: P) -> Self {
        Self {
            id,
            u,
            v,
            length,
            payload,
            duplicate_of: None,
        }
    }

    /// Copies this edge under a new id, keeping endpoints, length and payload.
    pub(crate) fn duplicate(&self, id: EdgeId) -> Self
    where
        P: Clone,
    {
        Self {
            id,
            u: self.u,
            v: self.v,
            length: self.length,
            payload: self.payload.clone(),
            duplicate_of: Some(self.original_id()),
        }
    }

    /// This instance's id.
    pub fn id(&self) -> EdgeId {
        self.id
    }

    /// First endpoint as supplied at construction.
    pub fn u(&self) -> NodeId {
        self.u
    }

    /// Second endpoint as supplied at construction.
    pub fn v(&self) -> NodeId {
        self.v
    }

    /// Both endpoints.
    pub fn endpoints(&self) -> (NodeId, NodeId) {
        (self.u, self.v)
    }

    /// Edge length in the caller's unit.
    pub fn length(&self) -> f64 {
        self.length
    }

    /// Opaque attributes carried through unchanged.
    pub fn payload(&self) -> &P {
        &self.payload
    }

    /// The original instance this edge duplicates, if any.
    pub fn duplicate_of(&self) -> Option<EdgeId> {
        self.duplicate_of
    }

    /// Returns `true` if this edge was inserted by augmentation.
    pub fn is_duplicate(&self) -> bool {
        self.duplicate_of.is_some()
    }

    /// The id of the original input edge this instance stands for.
    pub fn original_id(&self) -> EdgeId {
        self.duplicate_of.unwrap_or(self.id)
    }

    /// Returns `true` if both endpoints are the same node.
    pub fn is_loop(&self) -> bool {
        self.u == self.v
    }

    /// The endpoint opposite `node`, or `None` if `node` is not an endpoint.
    pub fn opposite(&self, node: NodeId) -> Option<NodeId> {
        if node == self.u {
            Some(self.v)
        } else if node == self.v {
            Some(self.u)
        } else {
            None
        }
    }
}
