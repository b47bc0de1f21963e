//! Single-source shortest paths with Dijkstra's algorithm.
//!
//! # Algorithm
//!
//! Binary-heap Dijkstra over non-negative edge lengths. Each settled node
//! records the edge instance it was reached through, so a path to any
//! target is rebuilt by walking predecessors back to the source.
//!
//! Ties are broken deterministically: among equal tentative distances the
//! heap yields the lowest node id first, a predecessor is only replaced by a
//! strictly shorter candidate, and incidence lists are scanned in insertion
//! order. Among parallel edges of equal length the lowest edge id therefore
//! wins, which is always an original edge rather than a duplicate.
//!
//! # Complexity
//!
//! O((V + E) log V) per source.
//!
//! # Reference
//!
//! Dijkstra, E.W. (1959). "A note on two problems in connexion with graphs",
//! *Numerische Mathematik* 1, 269-271.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::error::{PostmanError, PostmanResult};
use crate::graph::{EdgeId, Graph, NodeId};

#[derive(Debug, Clone, Copy)]
struct State {
    cost: f64,
    node: NodeId,
}

impl PartialEq for State {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for State {}

impl Ord for State {
    // Reversed so that `BinaryHeap` pops the cheapest, then lowest-id, state.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Shortest-path tree rooted at one source node.
///
/// # Examples
///
/// ```
/// use u_postman::graph::GraphBuilder;
/// use u_postman::shortest_path::ShortestPathTree;
///
/// let mut b = GraphBuilder::new();
/// let n: Vec<_> = (0..3).map(|k| b.add_node(k, None)).collect();
/// b.add_edge(n[0], n[1], 2.0, ()).unwrap();
/// b.add_edge(n[1], n[2], 3.0, ()).unwrap();
/// b.add_edge(n[0], n[2], 10.0, ()).unwrap();
/// let g = b.build().unwrap();
///
/// let tree = ShortestPathTree::from_source(&g, n[0]).unwrap();
/// assert_eq!(tree.distance_to(n[2]), Some(5.0));
/// assert_eq!(tree.path_to(n[2]).unwrap(), vec![0, 1]);
/// ```
#[derive(Debug, Clone)]
pub struct ShortestPathTree {
    source: NodeId,
    dist: Vec<f64>,
    pred: Vec<Option<(EdgeId, NodeId)>>,
}

impl ShortestPathTree {
    /// Runs Dijkstra from `source` over the whole graph.
    ///
    /// Fails with [`PostmanError::UnknownNode`] for a bad source and
    /// [`PostmanError::NegativeWeight`] if any edge has negative length.
    pub fn from_source<P>(graph: &Graph<P>, source: NodeId) -> PostmanResult<Self> {
        if !graph.contains_node(source) {
            return Err(PostmanError::UnknownNode(source));
        }
        if let Some(e) = graph.negative_edge() {
            return Err(PostmanError::NegativeWeight {
                edge: e.id(),
                length: e.length(),
            });
        }

        let n = graph.node_count();
        let mut dist = vec![f64::INFINITY; n];
        let mut pred: Vec<Option<(EdgeId, NodeId)>> = vec![None; n];
        let mut settled = vec![false; n];
        let mut heap = BinaryHeap::new();

        dist[source] = 0.0;
        heap.push(State {
            cost: 0.0,
            node: source,
        });

        while let Some(State { cost, node }) = heap.pop() {
            if settled[node] {
                continue;
            }
            settled[node] = true;

            for &eid in graph.edges_incident(node) {
                let edge = &graph.edges()[eid];
                let Some(next) = edge.opposite(node) else {
                    continue;
                };
                if settled[next] {
                    continue;
                }
                let candidate = cost + edge.length();
                if candidate < dist[next] {
                    dist[next] = candidate;
                    pred[next] = Some((eid, node));
                    heap.push(State {
                        cost: candidate,
                        node: next,
                    });
                }
            }
        }

        Ok(Self { source, dist, pred })
    }

    /// The root of this tree.
    pub fn source(&self) -> NodeId {
        self.source
    }

    /// Shortest distance to `target`, or `None` if unreachable or unknown.
    pub fn distance_to(&self, target: NodeId) -> Option<f64> {
        self.dist.get(target).copied().filter(|d| d.is_finite())
    }

    /// Edge instances along the shortest path from the source to `target`,
    /// in travel order. Empty when `target` is the source.
    pub fn path_to(&self, target: NodeId) -> PostmanResult<Vec<EdgeId>> {
        if target >= self.dist.len() {
            return Err(PostmanError::UnknownNode(target));
        }
        if self.distance_to(target).is_none() {
            return Err(PostmanError::Unreachable {
                from: self.source,
                to: target,
            });
        }

        let mut path = Vec::new();
        let mut current = target;
        while current != self.source {
            let (edge, prev) = self.pred[current].ok_or(PostmanError::Unreachable {
                from: self.source,
                to: target,
            })?;
            path.push(edge);
            current = prev;
        }
        path.reverse();
        Ok(path)
    }
}

/// Shortest total length from `source` to `target`.
///
/// Fails with [`PostmanError::Unreachable`] if no path exists.
pub fn distance<P>(graph: &Graph<P>, source: NodeId, target: NodeId) -> PostmanResult<f64> {
    if !graph.contains_node(target) {
        return Err(PostmanError::UnknownNode(target));
    }
    ShortestPathTree::from_source(graph, source)?
        .distance_to(target)
        .ok_or(PostmanError::Unreachable {
            from: source,
            to: target,
        })
}

/// Edge instances of one shortest path from `source` to `target`.
///
/// Repeated calls on the same graph return the same path.
pub fn shortest_path<P>(
    graph: &Graph<P>,
    source: NodeId,
    target: NodeId,
) -> PostmanResult<Vec<EdgeId>> {
    if !graph.contains_node(target) {
        return Err(PostmanError::UnknownNode(target));
    }
    ShortestPathTree::from_source(graph, source)?.path_to(target)
}
