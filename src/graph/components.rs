//! Connected components of an undirected multigraph.
//!
//! # Algorithm
//!
//! Disjoint-set union with path halving and union by size. Every endpoint
//! pair merges two sets; each resulting set is one component.
//!
//! # Complexity
//!
//! O((V + E) α(V)).

use super::NodeId;

struct DisjointSet {
    parent: Vec<usize>,
    size: Vec<usize>,
}

impl DisjointSet {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            size: vec![1; n],
        }
    }

    fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    fn union(&mut self, a: usize, b: usize) {
        let (mut ra, mut rb) = (self.find(a), self.find(b));
        if ra == rb {
            return;
        }
        if self.size[ra] < self.size[rb] {
            std::mem::swap(&mut ra, &mut rb);
        }
        self.parent[rb] = ra;
        self.size[ra] += self.size[rb];
    }
}

/// Groups nodes `0..node_count` into connected components.
///
/// Components are returned in order of their smallest node id, and each
/// component lists its nodes in ascending order.
///
/// # Panics
///
/// Panics if an endpoint is `>= node_count`.
///
/// # Examples
///
/// ```
/// use u_postman::graph::connected_components;
///
/// let comps = connected_components(5, [(0, 1), (3, 4)].into_iter());
/// assert_eq!(comps, vec![vec![0, 1], vec![2], vec![3, 4]]);
/// ```
pub fn connected_components<I>(node_count: usize, endpoints: I) -> Vec<Vec<NodeId>>
where
    I: Iterator<Item = (NodeId, NodeId)>,
{
    let mut dsu = DisjointSet::new(node_count);
    for (u, v) in endpoints {
        dsu.union(u, v);
    }

    let mut slot_of_root = vec![usize::MAX; node_count];
    let mut components: Vec<Vec<NodeId>> = Vec::new();
    for node in 0..node_count {
        let root = dsu.find(node);
        if slot_of_root[root] == usize::MAX {
            slot_of_root[root] = components.len();
            components.push(Vec::new());
        }
        components[slot_of_root[root]].push(node);
    }
    components
}
