//! Eulerian circuit construction.
//!
//! # Algorithm
//!
//! Iterative Hierholzer: walk unused edges from the start node pushing each
//! step on a stack; when a node has no unused edge left, pop it and emit the
//! traversal that reached it. Sub-tours discovered mid-walk are spliced in
//! automatically by the stack discipline. Emitted traversals come out in
//! reverse and are flipped once at the end.
//!
//! Each node keeps a cursor into its incidence list, so every incidence
//! entry is inspected at most once.
//!
//! # Complexity
//!
//! O(V + E).
//!
//! # Reference
//!
//! Hierholzer, C. (1873). "Über die Möglichkeit, einen Linienzug ohne
//! Wiederholung und ohne Unterbrechung zu umfahren", *Math. Annalen* 6.

use log::debug;

use crate::error::{PostmanError, PostmanResult};
use crate::graph::{EdgeId, Graph, NodeId};
use crate::models::{Route, Traversal};

/// Builds a closed walk using every edge instance of `graph` exactly once.
///
/// The walk starts at `start`, or node 0 when `None`. Loops are traversed
/// once each, parallel edges once per instance.
///
/// # Errors
///
/// - [`PostmanError::UnknownNode`] if `start` is out of range
/// - [`PostmanError::NotEulerian`] if some node has odd degree, or the edges
///   do not form a single connected component
///
/// # Examples
///
/// ```
/// use u_postman::euler::eulerian_circuit;
/// use u_postman::graph::GraphBuilder;
///
/// let mut b = GraphBuilder::new();
/// let n: Vec<_> = (0..3).map(|k| b.add_node(k, None)).collect();
/// b.add_edge(n[0], n[1], 1.0, ()).unwrap();
/// b.add_edge(n[1], n[2], 1.0, ()).unwrap();
/// b.add_edge(n[2], n[0], 1.0, ()).unwrap();
/// let g = b.build().unwrap();
///
/// let route = eulerian_circuit(&g, None).unwrap();
/// assert_eq!(route.len(), 3);
/// assert!(route.is_closed());
/// assert!((route.total_length() - 3.0).abs() < 1e-10);
/// ```
pub fn eulerian_circuit<P>(graph: &Graph<P>, start: Option<NodeId>) -> PostmanResult<Route> {
    let start = start.unwrap_or(0);
    if !graph.contains_node(start) {
        return Err(PostmanError::UnknownNode(start));
    }
    if let Some(&node) = graph.odd_nodes().first() {
        return Err(PostmanError::NotEulerian(format!(
            "node {} has odd degree {}",
            node,
            graph.degree(node)
        )));
    }

    let edge_count = graph.edge_count();
    let mut used = vec![false; edge_count];
    let mut cursor = vec![0usize; graph.node_count()];
    let mut stack: Vec<(NodeId, Option<EdgeId>)> = vec![(start, None)];
    let mut reversed: Vec<Traversal> = Vec::with_capacity(edge_count);

    while let Some(&(node, via)) = stack.last() {
        let incident = graph.edges_incident(node);
        let pos = &mut cursor[node];
        while *pos < incident.len() && used[incident[*pos]] {
            *pos += 1;
        }

        if let Some(&e) = incident.get(*pos) {
            used[e] = true;
            let next = graph.edges()[e]
                .opposite(node)
                .ok_or_else(|| PostmanError::NotEulerian(format!("edge {e} not incident to node {node}")))?;
            stack.push((next, Some(e)));
        } else {
            stack.pop();
            if let (Some(e), Some(&(prev, _))) = (via, stack.last()) {
                reversed.push(Traversal {
                    edge: e,
                    from: prev,
                    to: node,
                    length: graph.edges()[e].length(),
                });
            }
        }
    }

    if reversed.len() != edge_count {
        return Err(PostmanError::NotEulerian(format!(
            "circuit from node {} reaches {} of {} edges",
            start,
            reversed.len(),
            edge_count
        )));
    }

    let mut route = Route::new(start);
    for t in reversed.into_iter().rev() {
        route.push(t);
    }
    debug!(
        "Eulerian circuit: {} traversals, length {:.3}",
        route.len(),
        route.total_length()
    );
    Ok(route)
}
