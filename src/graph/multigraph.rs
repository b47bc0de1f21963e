//! Undirected weighted multigraph and its builder.

use std::collections::HashMap;

use crate::error::{PostmanError, PostmanResult};

use super::{connected_components, Edge, EdgeId, Node, NodeId, Position};

/// Incrementally assembles a [`Graph`] and validates it on [`build`](Self::build).
///
/// # Examples
///
/// ```
/// use u_postman::graph::GraphBuilder;
///
/// let mut b = GraphBuilder::new();
/// let a = b.add_node(10, None);
/// let c = b.add_node(20, None);
/// b.add_edge(a, c, 1.0, ()).unwrap();
/// b.add_edge(a, c, 2.0, ()).unwrap(); // parallel edge
///
/// let g = b.build().unwrap();
/// assert_eq!(g.edge_count(), 2);
/// assert_eq!(g.degree(a), 2);
/// ```
#[derive(Debug, Clone)]
pub struct GraphBuilder<P> {
    nodes: Vec<Node>,
    keys: HashMap<u64, NodeId>,
    edges: Vec<Edge<P>>,
}

impl<P> GraphBuilder<P> {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            keys: HashMap::new(),
            edges: Vec::new(),
        }
    }

    /// Adds a node with the given external key and returns its id.
    ///
    /// Adding a key a second time returns the id assigned the first time;
    /// the original position is kept.
    pub fn add_node(&mut self, key: u64, position: Option<Position>) -> NodeId {
        if let Some(&id) = self.keys.get(&key) {
            return id;
        }
        let id = self.nodes.len();
        self.nodes.push(Node::new(key, position));
        self.keys.insert(key, id);
        id
    }

    /// Looks up the id assigned to an external key.
    pub fn node_id(&self, key: u64) -> Option<NodeId> {
        self.keys.get(&key).copied()
    }

    /// Adds an undirected edge instance between `u` and `v`.
    ///
    /// Returns [`PostmanError::UnknownNode`] if an endpoint was never added
    /// and [`PostmanError::InvalidGraph`] if `length` is NaN or infinite.
    pub fn add_edge(&mut self, u: NodeId, v: NodeId, length: f64, payload: P) -> PostmanResult<EdgeId> {
        for node in [u, v] {
            if node >= self.nodes.len() {
                return Err(PostmanError::UnknownNode(node));
            }
        }
        if !length.is_finite() {
            return Err(PostmanError::InvalidGraph(format!(
                "edge {}-{} has non-finite length {}",
                u, v, length
            )));
        }
        let id = self.edges.len();
        self.edges.push(Edge::new(id, u, v, length, payload));
        Ok(id)
    }

    /// Number of nodes added so far.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges added so far.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Validates connectivity and produces the graph.
    ///
    /// Fails with [`PostmanError::InvalidGraph`] when there are no nodes or
    /// when the nodes do not form a single connected component.
    pub fn build(self) -> PostmanResult<Graph<P>> {
        if self.nodes.is_empty() {
            return Err(PostmanError::InvalidGraph("graph has no nodes".into()));
        }

        let components = connected_components(
            self.nodes.len(),
            self.edges.iter().map(|e| e.endpoints()),
        );
        if components.len() > 1 {
            return Err(PostmanError::InvalidGraph(format!(
                "graph is disconnected ({} components)",
                components.len()
            )));
        }

        let mut incidence = vec![Vec::new(); self.nodes.len()];
        for e in &self.edges {
            incidence[e.u()].push(e.id());
            incidence[e.v()].push(e.id());
        }
        let negative_edge = self.edges.iter().find(|e| e.length() < 0.0).map(|e| e.id());

        Ok(Graph {
            original_edge_count: self.edges.len(),
            nodes: self.nodes,
            edges: self.edges,
            incidence,
            negative_edge,
        })
    }
}

impl<P> Default for GraphBuilder<P> {
    fn default() -> Self {
        Self::new()
    }
}

/// A connected, undirected, weighted multigraph.
///
/// Edge instances are never removed. The only mutation is
/// [`add_duplicate_edge`](Self::add_duplicate_edge), which the augmenter
/// uses to restore even degree parity.
///
/// Every edge id appears once in each endpoint's incidence list; a
/// self-loop therefore appears twice in its node's list.
#[derive(Debug, Clone)]
pub struct Graph<P> {
    nodes: Vec<Node>,
    edges: Vec<Edge<P>>,
    incidence: Vec<Vec<EdgeId>>,
    original_edge_count: usize,
    negative_edge: Option<EdgeId>,
}

impl<P> Graph<P> {
    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edge instances, including duplicates.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Number of edges supplied at construction.
    pub fn original_edge_count(&self) -> usize {
        self.original_edge_count
    }

    /// All nodes, indexed by [`NodeId`].
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// All edge instances, indexed by [`EdgeId`].
    pub fn edges(&self) -> &[Edge<P>] {
        &self.edges
    }

    /// Looks up a node.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Looks up an edge instance.
    pub fn edge(&self, id: EdgeId) -> Option<&Edge<P>> {
        self.edges.get(id)
    }

    /// Returns `true` if `id` names a node of this graph.
    pub fn contains_node(&self, id: NodeId) -> bool {
        id < self.nodes.len()
    }

    /// Size of the node's incidence list.
    ///
    /// # Panics
    ///
    /// Panics if `node` is out of range.
    pub fn degree(&self, node: NodeId) -> usize {
        self.incidence[node].len()
    }

    /// Edge ids incident to `node`, in insertion order.
    ///
    /// # Panics
    ///
    /// Panics if `node` is out of range.
    pub fn edges_incident(&self, node: NodeId) -> &[EdgeId] {
        &self.incidence[node]
    }

    /// Nodes with odd degree, in ascending id order.
    pub fn odd_nodes(&self) -> Vec<NodeId> {
        (0..self.nodes.len())
            .filter(|&n| self.incidence[n].len() % 2 == 1)
            .collect()
    }

    /// Returns `true` if every node has even degree.
    pub fn is_even(&self) -> bool {
        self.incidence.iter().all(|inc| inc.len() % 2 == 0)
    }

    /// Sum of all edge-instance lengths.
    pub fn total_length(&self) -> f64 {
        self.edges.iter().map(|e| e.length()).sum()
    }

    /// Shortest edge length, or `None` for an edgeless graph.
    pub fn min_length(&self) -> Option<f64> {
        self.edges.iter().map(|e| e.length()).min_by(f64::total_cmp)
    }

    /// First edge with a negative length, if any.
    pub fn negative_edge(&self) -> Option<&Edge<P>> {
        self.negative_edge.map(|id| &self.edges[id])
    }

    /// Returns `true` if all nodes lie in one connected component.
    pub fn is_connected(&self) -> bool {
        connected_components(self.nodes.len(), self.edges.iter().map(|e| e.endpoints())).len() <= 1
    }

    /// Inserts a copy of an existing edge instance.
    ///
    /// The copy has the same endpoints, length and payload, and raises both
    /// endpoint degrees by one. Its [`Edge::duplicate_of`] names the original
    /// input edge even when `edge` is itself a duplicate.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_postman::graph::GraphBuilder;
    ///
    /// let mut b = GraphBuilder::new();
    /// let a = b.add_node(1, None);
    /// let c = b.add_node(2, None);
    /// let e = b.add_edge(a, c, 4.0, "Halsted St").unwrap();
    /// let mut g = b.build().unwrap();
    ///
    /// let d = g.add_duplicate_edge(e).unwrap();
    /// assert_eq!(g.degree(a), 2);
    /// assert_eq!(g.edge(d).unwrap().duplicate_of(), Some(e));
    /// assert_eq!(*g.edge(d).unwrap().payload(), "Halsted St");
    /// ```
    pub fn add_duplicate_edge(&mut self, edge: EdgeId) -> PostmanResult<EdgeId>
    where
        P: Clone,
    {
        let id = self.edges.len();
        let copy = self
            .edges
            .get(edge)
            .ok_or(PostmanError::UnknownEdge(edge))?
            .duplicate(id);
        self.incidence[copy.u()].push(id);
        self.incidence[copy.v()].push(id);
        self.edges.push(copy);
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Graph<()> {
        let mut b = GraphBuilder::new();
        let n: Vec<NodeId> = (0..4).map(|k| b.add_node(k, None)).collect();
        for i in 0..4 {
            b.add_edge(n[i], n[(i + 1) % 4], 1.0, ()).unwrap();
        }
        b.build().unwrap()
    }

    #[test]
    fn test_add_node_dedupes_keys() {
        let mut b: GraphBuilder<()> = GraphBuilder::new();
        let a = b.add_node(42, Some(Position::new(1.0, 2.0)));
        let again = b.add_node(42, None);
        assert_eq!(a, again);
        assert_eq!(b.node_count(), 1);
        assert_eq!(b.node_id(42), Some(a));
        assert_eq!(b.node_id(7), None);
    }

    #[test]
    fn test_add_edge_unknown_node() {
        let mut b = GraphBuilder::new();
        let a = b.add_node(1, None);
        assert_eq!(b.add_edge(a, 5, 1.0, ()), Err(PostmanError::UnknownNode(5)));
    }

    #[test]
    fn test_add_edge_non_finite_length() {
        let mut b = GraphBuilder::new();
        let a = b.add_node(1, None);
        let c = b.add_node(2, None);
        assert!(matches!(
            b.add_edge(a, c, f64::NAN, ()),
            Err(PostmanError::InvalidGraph(_))
        ));
        assert!(matches!(
            b.add_edge(a, c, f64::INFINITY, ()),
            Err(PostmanError::InvalidGraph(_))
        ));
    }

    #[test]
    fn test_build_empty_rejected() {
        let b: GraphBuilder<()> = GraphBuilder::new();
        assert!(matches!(b.build(), Err(PostmanError::InvalidGraph(_))));
    }

    #[test]
    fn test_build_disconnected_rejected() {
        let mut b = GraphBuilder::new();
        let n: Vec<NodeId> = (0..4).map(|k| b.add_node(k, None)).collect();
        b.add_edge(n[0], n[1], 1.0, ()).unwrap();
        b.add_edge(n[2], n[3], 1.0, ()).unwrap();
        match b.build() {
            Err(PostmanError::InvalidGraph(msg)) => assert!(msg.contains("2 components")),
            other => panic!("expected InvalidGraph, got {:?}", other),
        }
    }

    #[test]
    fn test_single_node_is_connected() {
        let mut b: GraphBuilder<()> = GraphBuilder::new();
        b.add_node(9, None);
        let g = b.build().unwrap();
        assert!(g.is_connected());
        assert!(g.is_even());
        assert_eq!(g.edge_count(), 0);
    }

    #[test]
    fn test_square_degrees() {
        let g = square();
        assert_eq!(g.node_count(), 4);
        assert_eq!(g.edge_count(), 4);
        for n in 0..4 {
            assert_eq!(g.degree(n), 2);
        }
        assert!(g.odd_nodes().is_empty());
        assert!((g.total_length() - 4.0).abs() < 1e-10);
    }

    #[test]
    fn test_self_loop_counts_twice() {
        let mut b = GraphBuilder::new();
        let a = b.add_node(1, None);
        let e = b.add_edge(a, a, 2.0, ()).unwrap();
        let g = b.build().unwrap();
        assert_eq!(g.degree(a), 2);
        assert_eq!(g.edges_incident(a), &[e, e]);
    }

    #[test]
    fn test_duplicate_raises_degree() {
        let mut g = square();
        let d = g.add_duplicate_edge(0).unwrap();
        assert_eq!(d, 4);
        assert_eq!(g.degree(0), 3);
        assert_eq!(g.degree(1), 3);
        assert_eq!(g.odd_nodes(), vec![0, 1]);
        assert_eq!(g.original_edge_count(), 4);
        assert_eq!(g.edge_count(), 5);
    }

    #[test]
    fn test_duplicate_unknown_edge() {
        let mut g = square();
        assert_eq!(g.add_duplicate_edge(99), Err(PostmanError::UnknownEdge(99)));
    }

    #[test]
    fn test_negative_edge_recorded() {
        let mut b = GraphBuilder::new();
        let a = b.add_node(1, None);
        let c = b.add_node(2, None);
        b.add_edge(a, c, 1.0, ()).unwrap();
        let neg = b.add_edge(a, c, -3.0, ()).unwrap();
        let g = b.build().unwrap();
        assert_eq!(g.negative_edge().map(|e| e.id()), Some(neg));
    }

    #[test]
    fn test_min_length() {
        let mut b = GraphBuilder::new();
        let a = b.add_node(1, None);
        let c = b.add_node(2, None);
        b.add_edge(a, c, 4.0, ()).unwrap();
        b.add_edge(a, c, 0.5, ()).unwrap();
        assert_eq!(b.build().unwrap().min_length(), Some(0.5));

        let mut b: GraphBuilder<()> = GraphBuilder::new();
        b.add_node(1, None);
        assert_eq!(b.build().unwrap().min_length(), None);
    }
}
