//! Dense distance table over the odd-degree nodes.

use rayon::prelude::*;

use crate::error::{PostmanError, PostmanResult};
use crate::graph::{Graph, NodeId};
use crate::interrupt::Interrupt;
use crate::shortest_path::ShortestPathTree;

/// A dense symmetric k×k distance table stored in row-major order.
///
/// Row and column `i` both stand for graph node `nodes()[i]`. The table is
/// filled once from shortest-path trees and only read afterwards.
///
/// # Examples
///
/// ```
/// use u_postman::distance::DistanceTable;
///
/// let dt = DistanceTable::from_data(vec![4, 9], vec![0.0, 5.0, 5.0, 0.0]).unwrap();
/// assert_eq!(dt.size(), 2);
/// assert_eq!(dt.node(1), 9);
/// assert!((dt.get(0, 1) - 5.0).abs() < 1e-10);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceTable {
    nodes: Vec<NodeId>,
    data: Vec<f64>,
    size: usize,
}

impl DistanceTable {
    /// Creates a table over the given nodes, initialized to zero.
    pub fn new(nodes: Vec<NodeId>) -> Self {
        let size = nodes.len();
        Self {
            nodes,
            data: vec![0.0; size * size],
            size,
        }
    }

    /// Creates a table from an explicit k×k grid.
    ///
    /// Returns `None` if the data length doesn't match `nodes.len()²`.
    pub fn from_data(nodes: Vec<NodeId>, data: Vec<f64>) -> Option<Self> {
        let size = nodes.len();
        if data.len() != size * size {
            return None;
        }
        Some(Self { nodes, data, size })
    }

    /// Builds the table from one shortest-path tree per node.
    ///
    /// Row `i` corresponds to `trees[i].source()`. Both `(i, j)` and `(j, i)`
    /// are read from the tree with the smaller index so the table is exactly
    /// symmetric. Fails with [`PostmanError::Unreachable`] if a pair is
    /// disconnected.
    pub fn from_trees(trees: &[ShortestPathTree]) -> PostmanResult<Self> {
        let nodes: Vec<NodeId> = trees.iter().map(|t| t.source()).collect();
        let mut table = Self::new(nodes);
        for i in 0..table.size {
            for j in (i + 1)..table.size {
                let to = table.nodes[j];
                let d = trees[i].distance_to(to).ok_or(PostmanError::Unreachable {
                    from: table.nodes[i],
                    to,
                })?;
                table.set(i, j, d);
                table.set(j, i, d);
            }
        }
        Ok(table)
    }

    /// Returns the distance between rows `from` and `to`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn get(&self, from: usize, to: usize) -> f64 {
        self.data[from * self.size + to]
    }

    /// Sets the distance between rows `from` and `to` (one direction only).
    pub fn set(&mut self, from: usize, to: usize, distance: f64) {
        self.data[from * self.size + to] = distance;
    }

    /// Number of rows (odd nodes) in this table.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns `true` if the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Graph node standing for row `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn node(&self, index: usize) -> NodeId {
        self.nodes[index]
    }

    /// Graph nodes in row order.
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    /// Row index of a graph node, if it is in the table.
    pub fn index_of(&self, node: NodeId) -> Option<usize> {
        self.nodes.iter().position(|&n| n == node)
    }

    /// Returns `true` if the table is symmetric within the given tolerance.
    pub fn is_symmetric(&self, tol: f64) -> bool {
        for i in 0..self.size {
            for j in (i + 1)..self.size {
                if (self.get(i, j) - self.get(j, i)).abs() > tol {
                    return false;
                }
            }
        }
        true
    }
}

/// Runs one Dijkstra per source, fanning out over the rayon pool when
/// `parallel` is set.
///
/// The graph is only read. The interrupt is checked before each run.
pub fn shortest_path_trees<P: Sync>(
    graph: &Graph<P>,
    sources: &[NodeId],
    parallel: bool,
    interrupt: &Interrupt,
) -> PostmanResult<Vec<ShortestPathTree>> {
    let run = |&source: &NodeId| {
        interrupt.check()?;
        ShortestPathTree::from_source(graph, source)
    };
    if parallel {
        sources.par_iter().map(run).collect()
    } else {
        sources.iter().map(run).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphBuilder;

    /// Path 0 - 1 - 2 - 3 with lengths 1, 2, 3.
    fn path_graph() -> Graph<()> {
        let mut b = GraphBuilder::new();
        let n: Vec<NodeId> = (0..4).map(|k| b.add_node(k, None)).collect();
        b.add_edge(n[0], n[1], 1.0, ()).unwrap();
        b.add_edge(n[1], n[2], 2.0, ()).unwrap();
        b.add_edge(n[2], n[3], 3.0, ()).unwrap();
        b.build().unwrap()
    }

    #[test]
    fn test_from_trees() {
        let g = path_graph();
        let odd = g.odd_nodes();
        assert_eq!(odd, vec![0, 3]);
        let trees = shortest_path_trees(&g, &odd, false, &Interrupt::new()).unwrap();
        let dt = DistanceTable::from_trees(&trees).unwrap();
        assert_eq!(dt.size(), 2);
        assert!((dt.get(0, 1) - 6.0).abs() < 1e-10);
        assert!((dt.get(1, 0) - 6.0).abs() < 1e-10);
        assert_eq!(dt.get(0, 0), 0.0);
        assert!(dt.is_symmetric(0.0));
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let g = path_graph();
        let all: Vec<NodeId> = (0..4).collect();
        let seq = shortest_path_trees(&g, &all, false, &Interrupt::new()).unwrap();
        let par = shortest_path_trees(&g, &all, true, &Interrupt::new()).unwrap();
        assert_eq!(
            DistanceTable::from_trees(&seq).unwrap(),
            DistanceTable::from_trees(&par).unwrap()
        );
    }

    #[test]
    fn test_cancelled_before_work() {
        let g = path_graph();
        let interrupt = Interrupt::new();
        interrupt.cancel();
        let result = shortest_path_trees(&g, &[0, 3], true, &interrupt);
        assert_eq!(result.unwrap_err(), PostmanError::Cancelled);
    }

    #[test]
    fn test_from_data_invalid_size() {
        assert!(DistanceTable::from_data(vec![0, 1], vec![0.0, 1.0, 2.0]).is_none());
    }

    #[test]
    fn test_set_get_and_index() {
        let mut dt = DistanceTable::new(vec![2, 5, 8]);
        dt.set(0, 1, 42.0);
        assert_eq!(dt.get(0, 1), 42.0);
        assert_eq!(dt.get(1, 0), 0.0);
        assert!(!dt.is_symmetric(1e-10));
        assert_eq!(dt.index_of(8), Some(2));
        assert_eq!(dt.index_of(3), None);
    }

    #[test]
    fn test_empty() {
        let dt = DistanceTable::from_trees(&[]).unwrap();
        assert!(dt.is_empty());
    }
}
