//! The seam through which road data enters the solver.

use std::collections::HashMap;

use crate::error::{PostmanError, PostmanResult};
use crate::graph::{Graph, GraphBuilder, NodeId, Position};

/// A node as handed over by a network source.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceNode {
    /// External node key.
    pub key: u64,
    /// Optional planar position.
    pub position: Option<Position>,
}

/// An undirected edge as handed over by a network source, addressed by
/// external node keys.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceEdge<P> {
    /// Key of one endpoint.
    pub from: u64,
    /// Key of the other endpoint.
    pub to: u64,
    /// Non-negative length.
    pub length: f64,
    /// Opaque payload carried onto the edge.
    pub payload: P,
}

/// Supplies nodes and edges for graph construction.
///
/// Implementors own retrieval and any filtering; the solver only sees what
/// they return. The edges must form one connected component.
pub trait NetworkSource {
    /// Payload attached to each edge.
    type Payload;

    /// All nodes of the network.
    fn nodes(&self) -> Vec<SourceNode>;

    /// All edges of the network.
    fn edges(&self) -> Vec<SourceEdge<Self::Payload>>;
}

impl<P> Graph<P> {
    /// Builds a graph from a [`NetworkSource`].
    ///
    /// # Errors
    ///
    /// - [`PostmanError::InvalidGraph`] if an edge references a key the
    ///   source did not list, or the result is empty or disconnected
    /// - any error [`GraphBuilder::add_edge`] reports
    pub fn from_source<S>(source: &S) -> PostmanResult<Self>
    where
        S: NetworkSource<Payload = P> + ?Sized,
    {
        let mut builder = GraphBuilder::new();
        let mut ids: HashMap<u64, NodeId> = HashMap::new();
        for node in source.nodes() {
            let id = builder.add_node(node.key, node.position);
            ids.insert(node.key, id);
        }
        for edge in source.edges() {
            let lookup = |key: u64| {
                ids.get(&key).copied().ok_or_else(|| {
                    PostmanError::InvalidGraph(format!("edge references unknown node key {key}"))
                })
            };
            let u = lookup(edge.from)?;
            let v = lookup(edge.to)?;
            builder.add_edge(u, v, edge.length, edge.payload)?;
        }
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Triangle;

    impl NetworkSource for Triangle {
        type Payload = u32;

        fn nodes(&self) -> Vec<SourceNode> {
            [100, 200, 300]
                .iter()
                .map(|&key| SourceNode {
                    key,
                    position: None,
                })
                .collect()
        }

        fn edges(&self) -> Vec<SourceEdge<u32>> {
            vec![
                SourceEdge {
                    from: 100,
                    to: 200,
                    length: 1.0,
                    payload: 7,
                },
                SourceEdge {
                    from: 200,
                    to: 300,
                    length: 2.0,
                    payload: 8,
                },
                SourceEdge {
                    from: 300,
                    to: 100,
                    length: 3.0,
                    payload: 9,
                },
            ]
        }
    }

    struct Dangling;

    impl NetworkSource for Dangling {
        type Payload = ();

        fn nodes(&self) -> Vec<SourceNode> {
            vec![SourceNode {
                key: 1,
                position: None,
            }]
        }

        fn edges(&self) -> Vec<SourceEdge<()>> {
            vec![SourceEdge {
                from: 1,
                to: 2,
                length: 1.0,
                payload: (),
            }]
        }
    }

    #[test]
    fn test_from_source() {
        let g = Graph::from_source(&Triangle).unwrap();
        assert_eq!(g.node_count(), 3);
        assert_eq!(g.edge_count(), 3);
        assert_eq!(g.node(1).unwrap().key(), 200);
        assert_eq!(*g.edge(2).unwrap().payload(), 9);
        assert!(g.is_even());
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = Graph::from_source(&Dangling).unwrap_err();
        assert!(matches!(err, PostmanError::InvalidGraph(_)));
    }
}
