//! Graph augmentation: duplicate matched shortest paths to fix parity.
//!
//! For every matched pair `(u, v)` each edge instance on the shortest
//! `u → v` path is duplicated. Paths of different pairs may share edges;
//! a shared edge is duplicated once per pair that uses it.

use std::collections::HashMap;

use log::debug;

use crate::error::{PostmanError, PostmanResult};
use crate::graph::{EdgeId, Graph, NodeId};
use crate::matching::Matching;
use crate::shortest_path::ShortestPathTree;

/// Duplicates the shortest path of every matched pair.
///
/// `trees` must contain a tree rooted at the lower node of each pair; these
/// are the same trees the distance table was filled from, so each
/// duplicated path realises the tabled distance exactly.
///
/// Returns the ids of the inserted duplicates. Fails with
/// [`PostmanError::AugmentationInvariantViolated`] if any node has odd
/// degree afterwards.
///
/// # Examples
///
/// ```
/// use u_postman::augment::augment;
/// use u_postman::graph::GraphBuilder;
/// use u_postman::matching::{Matching, MatchedPair};
/// use u_postman::shortest_path::ShortestPathTree;
///
/// // Path 0 - 1 - 2: nodes 0 and 2 are odd.
/// let mut b = GraphBuilder::new();
/// let n: Vec<_> = (0..3).map(|k| b.add_node(k, None)).collect();
/// b.add_edge(n[0], n[1], 1.0, ()).unwrap();
/// b.add_edge(n[1], n[2], 1.0, ()).unwrap();
/// let mut g = b.build().unwrap();
///
/// let trees = vec![ShortestPathTree::from_source(&g, 0).unwrap()];
/// let m = Matching::from_pairs([MatchedPair { u: 0, v: 2, distance: 2.0 }]);
/// let added = augment(&mut g, &m, &trees).unwrap();
/// assert_eq!(added.len(), 2);
/// assert!(g.is_even());
/// ```
pub fn augment<P: Clone>(
    graph: &mut Graph<P>,
    matching: &Matching,
    trees: &[ShortestPathTree],
) -> PostmanResult<Vec<EdgeId>> {
    let by_source: HashMap<NodeId, &ShortestPathTree> =
        trees.iter().map(|t| (t.source(), t)).collect();

    let mut added = Vec::new();
    for pair in matching.pairs() {
        let path = match by_source.get(&pair.u) {
            Some(tree) => tree.path_to(pair.v)?,
            None => ShortestPathTree::from_source(graph, pair.u)?.path_to(pair.v)?,
        };
        debug!(
            "duplicating {} edge(s) between nodes {} and {}",
            path.len(),
            pair.u,
            pair.v
        );
        for edge in path {
            added.push(graph.add_duplicate_edge(edge)?);
        }
    }

    if let Some(node) = (0..graph.node_count()).find(|&n| graph.degree(n) % 2 == 1) {
        return Err(PostmanError::AugmentationInvariantViolated {
            node,
            degree: graph.degree(node),
        });
    }
    Ok(added)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphBuilder;
    use crate::matching::MatchedPair;

    /// Star with center 0 and leaves 1, 2, 3.
    fn star() -> Graph<()> {
        let mut b = GraphBuilder::new();
        let n: Vec<NodeId> = (0..4).map(|k| b.add_node(k, None)).collect();
        for leaf in 1..4 {
            b.add_edge(n[0], n[leaf], 1.0, ()).unwrap();
        }
        b.build().unwrap()
    }

    fn pair(u: NodeId, v: NodeId, distance: f64) -> MatchedPair {
        MatchedPair { u, v, distance }
    }

    #[test]
    fn test_empty_matching_is_noop() {
        let mut b = GraphBuilder::new();
        let a = b.add_node(0, None);
        let c = b.add_node(1, None);
        b.add_edge(a, c, 1.0, ()).unwrap();
        b.add_edge(a, c, 1.0, ()).unwrap();
        let mut g = b.build().unwrap();
        let added = augment(&mut g, &Matching::default(), &[]).unwrap();
        assert!(added.is_empty());
        assert_eq!(g.edge_count(), 2);
    }

    #[test]
    fn test_star_pairs_share_no_edges() {
        let mut g = star();
        let m = Matching::from_pairs([pair(0, 1, 1.0), pair(2, 3, 2.0)]);
        let trees: Vec<ShortestPathTree> = [0, 2]
            .iter()
            .map(|&s| ShortestPathTree::from_source(&g, s).unwrap())
            .collect();
        let added = augment(&mut g, &m, &trees).unwrap();
        assert_eq!(added.len(), 3);
        assert!(g.is_even());
        assert!((g.total_length() - 6.0).abs() < 1e-10);
        for id in added {
            assert!(g.edge(id).unwrap().is_duplicate());
        }
    }

    #[test]
    fn test_overlapping_paths_duplicate_shared_edge_per_pair() {
        // Two stars joined by a bridge: 0-1, leaves 2,3 on 0 and 4,5 on 1.
        // Every node is odd and all three pairs route over the bridge.
        let mut b = GraphBuilder::new();
        let n: Vec<NodeId> = (0..6).map(|k| b.add_node(k, None)).collect();
        let bridge = b.add_edge(n[0], n[1], 1.0, ()).unwrap();
        b.add_edge(n[0], n[2], 1.0, ()).unwrap();
        b.add_edge(n[0], n[3], 1.0, ()).unwrap();
        b.add_edge(n[1], n[4], 1.0, ()).unwrap();
        b.add_edge(n[1], n[5], 1.0, ()).unwrap();
        let mut g = b.build().unwrap();
        assert_eq!(g.odd_nodes(), vec![0, 1, 2, 3, 4, 5]);

        let m = Matching::from_pairs([pair(0, 1, 1.0), pair(2, 4, 3.0), pair(3, 5, 3.0)]);
        let added = augment(&mut g, &m, &[]).unwrap();
        let bridge_copies = added
            .iter()
            .filter(|&&id| g.edge(id).unwrap().duplicate_of() == Some(bridge))
            .count();
        assert_eq!(bridge_copies, 3);
        assert_eq!(added.len(), 7);
        assert!(g.is_even());
    }

    #[test]
    fn test_wrong_matching_violates_invariant() {
        // Pairing only one of the two odd couples leaves parity broken.
        let mut g = star();
        let m = Matching::from_pairs([pair(1, 2, 2.0)]);
        match augment(&mut g, &m, &[]) {
            Err(PostmanError::AugmentationInvariantViolated { node, degree }) => {
                assert_eq!(node, 0);
                assert_eq!(degree, 5);
            }
            other => panic!("expected invariant violation, got {:?}", other),
        }
    }
}
