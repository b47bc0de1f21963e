//! Minimum-weight perfect matching over a distance table.

use serde::{Deserialize, Serialize};

use crate::distance::DistanceTable;
use crate::error::{PostmanError, PostmanResult};
use crate::graph::NodeId;
use crate::interrupt::Interrupt;

use super::maximum_weight_matching;

/// Two odd-degree nodes paired by the matching, with `u < v`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchedPair {
    /// Lower node id.
    pub u: NodeId,
    /// Higher node id.
    pub v: NodeId,
    /// Shortest-path distance between the two nodes.
    pub distance: f64,
}

/// A perfect matching of the odd-degree nodes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Matching {
    pairs: Vec<MatchedPair>,
    total_weight: f64,
}

impl Matching {
    /// Creates a matching from pairs, normalizing each to `u < v` and
    /// ordering pairs by `u`.
    pub fn from_pairs(pairs: impl IntoIterator<Item = MatchedPair>) -> Self {
        let mut pairs: Vec<MatchedPair> = pairs
            .into_iter()
            .map(|p| MatchedPair {
                u: p.u.min(p.v),
                v: p.u.max(p.v),
                distance: p.distance,
            })
            .collect();
        pairs.sort_by_key(|p| p.u);
        let total_weight = pairs.iter().map(|p| p.distance).sum();
        Self {
            pairs,
            total_weight,
        }
    }

    /// Matched pairs in ascending order of their lower node.
    pub fn pairs(&self) -> &[MatchedPair] {
        &self.pairs
    }

    /// Number of pairs.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Returns `true` if nothing was matched.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Sum of the pair distances.
    pub fn total_weight(&self) -> f64 {
        self.total_weight
    }

    /// The node matched with `node`, if any.
    pub fn partner(&self, node: NodeId) -> Option<NodeId> {
        self.pairs.iter().find_map(|p| {
            if p.u == node {
                Some(p.v)
            } else if p.v == node {
                Some(p.u)
            } else {
                None
            }
        })
    }
}

/// Finds a perfect matching of the table's nodes with minimum total distance.
///
/// Weights are inverted as `1 + max - d` and handed to the blossom solver
/// with maximum cardinality enforced, so among the perfect matchings of the
/// complete graph the one with the least original distance wins.
///
/// Fails with [`PostmanError::NoPerfectMatching`] for an odd number of
/// nodes, and with [`PostmanError::Cancelled`] if interrupted.
///
/// # Examples
///
/// ```
/// use u_postman::distance::DistanceTable;
/// use u_postman::matching::min_weight_perfect_matching;
/// use u_postman::Interrupt;
///
/// // Four points on a line at 0, 1, 10, 11.
/// let pos = [0.0_f64, 1.0, 10.0, 11.0];
/// let data = pos
///     .iter()
///     .flat_map(|a| pos.iter().map(move |b| (a - b).abs()))
///     .collect();
/// let table = DistanceTable::from_data(vec![0, 1, 2, 3], data).unwrap();
///
/// let m = min_weight_perfect_matching(&table, &Interrupt::new()).unwrap();
/// assert_eq!(m.len(), 2);
/// assert_eq!(m.partner(0), Some(1));
/// assert_eq!(m.partner(2), Some(3));
/// assert!((m.total_weight() - 2.0).abs() < 1e-10);
/// ```
pub fn min_weight_perfect_matching(
    table: &DistanceTable,
    interrupt: &Interrupt,
) -> PostmanResult<Matching> {
    let k = table.size();
    if k % 2 == 1 {
        return Err(PostmanError::NoPerfectMatching(format!(
            "odd-degree set has odd size {}",
            k
        )));
    }
    if k == 0 {
        return Ok(Matching::default());
    }

    let mut max_distance = 0.0_f64;
    for i in 0..k {
        for j in (i + 1)..k {
            max_distance = max_distance.max(table.get(i, j));
        }
    }
    let offset = max_distance + 1.0;
    let mut edges = Vec::with_capacity(k * (k - 1) / 2);
    for i in 0..k {
        for j in (i + 1)..k {
            edges.push((i, j, offset - table.get(i, j)));
        }
    }

    let mates = maximum_weight_matching(k, &edges, true, interrupt)?;

    let mut pairs = Vec::with_capacity(k / 2);
    for (i, mate) in mates.iter().enumerate() {
        match *mate {
            None => {
                return Err(PostmanError::NoPerfectMatching(format!(
                    "node {} left unmatched",
                    table.node(i)
                )))
            }
            Some(j) if i < j => pairs.push(MatchedPair {
                u: table.node(i),
                v: table.node(j),
                distance: table.get(i, j),
            }),
            Some(_) => {}
        }
    }
    Ok(Matching::from_pairs(pairs))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(k: usize, d: impl Fn(usize, usize) -> f64) -> DistanceTable {
        let mut t = DistanceTable::new((0..k).map(|i| i * 10).collect());
        for i in 0..k {
            for j in (i + 1)..k {
                t.set(i, j, d(i, j));
                t.set(j, i, d(i, j));
            }
        }
        t
    }

    /// Exhaustive minimum over all perfect matchings of rows `0..k`.
    fn brute_force(t: &DistanceTable) -> f64 {
        fn rec(free: &mut Vec<usize>, t: &DistanceTable) -> f64 {
            if free.is_empty() {
                return 0.0;
            }
            let first = free.remove(0);
            let mut best = f64::INFINITY;
            for idx in 0..free.len() {
                let other = free.remove(idx);
                best = best.min(t.get(first, other) + rec(free, t));
                free.insert(idx, other);
            }
            free.insert(0, first);
            best
        }
        rec(&mut (0..t.size()).collect(), t)
    }

    #[test]
    fn test_empty_table() {
        let m = min_weight_perfect_matching(&DistanceTable::new(vec![]), &Interrupt::new()).unwrap();
        assert!(m.is_empty());
        assert_eq!(m.total_weight(), 0.0);
    }

    #[test]
    fn test_odd_size_rejected() {
        let t = table(3, |_, _| 1.0);
        assert!(matches!(
            min_weight_perfect_matching(&t, &Interrupt::new()),
            Err(PostmanError::NoPerfectMatching(_))
        ));
    }

    #[test]
    fn test_pair_maps_back_to_graph_nodes() {
        let t = table(2, |_, _| 7.5);
        let m = min_weight_perfect_matching(&t, &Interrupt::new()).unwrap();
        assert_eq!(
            m.pairs(),
            &[MatchedPair {
                u: 0,
                v: 10,
                distance: 7.5
            }]
        );
    }

    #[test]
    fn test_prefers_two_short_pairs_over_greedy() {
        // Greedy would take the 0-weight pair (1,2) and be forced into (0,3)=100.
        let d = [
            [0.0, 10.0, 50.0, 100.0],
            [10.0, 0.0, 0.0, 50.0],
            [50.0, 0.0, 0.0, 10.0],
            [100.0, 50.0, 10.0, 0.0],
        ];
        let t = table(4, |i, j| d[i][j]);
        let m = min_weight_perfect_matching(&t, &Interrupt::new()).unwrap();
        assert!((m.total_weight() - 20.0).abs() < 1e-10);
        assert_eq!(m.partner(0), Some(10));
        assert_eq!(m.partner(20), Some(30));
    }

    #[test]
    fn test_same_cost_on_rerun() {
        let t = table(6, |_, _| 3.0);
        let a = min_weight_perfect_matching(&t, &Interrupt::new()).unwrap();
        let b = min_weight_perfect_matching(&t, &Interrupt::new()).unwrap();
        assert!((a.total_weight() - b.total_weight()).abs() < 1e-10);
        assert!((a.total_weight() - 9.0).abs() < 1e-10);
    }

    #[test]
    fn test_partner_lookup() {
        let m = Matching::from_pairs([
            MatchedPair {
                u: 9,
                v: 2,
                distance: 1.0,
            },
            MatchedPair {
                u: 1,
                v: 4,
                distance: 2.0,
            },
        ]);
        assert_eq!(m.pairs()[0].u, 1);
        assert_eq!(m.pairs()[1].u, 2);
        assert_eq!(m.partner(9), Some(2));
        assert_eq!(m.partner(7), None);
        assert!((m.total_weight() - 3.0).abs() < 1e-10);
    }

    #[test]
    fn test_cancelled() {
        let interrupt = Interrupt::new();
        interrupt.cancel();
        let t = table(4, |i, j| (i + j) as f64);
        assert_eq!(
            min_weight_perfect_matching(&t, &interrupt),
            Err(PostmanError::Cancelled)
        );
    }

    mod prop {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(64))]

            #[test]
            fn prop_optimal_against_brute_force(
                half in 1usize..5,
                weights in proptest::collection::vec(0u32..100, 28),
            ) {
                let k = 2 * half;
                let mut it = weights.into_iter();
                let mut t = DistanceTable::new((0..k).collect());
                for i in 0..k {
                    for j in (i + 1)..k {
                        let w = it.next().unwrap_or(0) as f64;
                        t.set(i, j, w);
                        t.set(j, i, w);
                    }
                }
                let m = min_weight_perfect_matching(&t, &Interrupt::new()).unwrap();
                prop_assert_eq!(m.len(), half);
                prop_assert!((m.total_weight() - brute_force(&t)).abs() < 1e-9);

                let mut seen = vec![false; k];
                for p in m.pairs() {
                    prop_assert!(!seen[p.u] && !seen[p.v]);
                    seen[p.u] = true;
                    seen[p.v] = true;
                }
                prop_assert!(seen.iter().all(|&s| s));
            }
        }
    }
}
