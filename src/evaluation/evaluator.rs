//! Route verifier that checks a closed walk against its multigraph.

use crate::graph::{EdgeId, Graph};
use crate::models::{Route, Violation, ViolationType};

/// Relative tolerance used when comparing a reported length against the
/// recomputed one.
const LENGTH_TOLERANCE: f64 = 1e-9;

/// Checks that a route is an Eulerian circuit of an augmented graph and that
/// it covers every input edge.
///
/// The augmented graph keeps input edges at ids `0..original_edge_count`, so
/// a single graph answers both questions: each edge instance must appear
/// exactly once, and each input edge must be walked at least once through
/// itself or one of its duplicates.
///
/// # Examples
///
/// ```
/// use u_postman::evaluation::RouteEvaluator;
/// use u_postman::euler::eulerian_circuit;
/// use u_postman::graph::GraphBuilder;
///
/// let mut b = GraphBuilder::new();
/// let a = b.add_node(1, None);
/// let c = b.add_node(2, None);
/// b.add_edge(a, c, 2.0, ()).unwrap();
/// let mut g = b.build().unwrap();
/// g.add_duplicate_edge(0).unwrap();
///
/// let route = eulerian_circuit(&g, None).unwrap();
/// let evaluator = RouteEvaluator::new(&g);
/// assert!(evaluator.evaluate(&route).is_empty());
/// assert_eq!(evaluator.coverage(&route), vec![2]);
/// ```
pub struct RouteEvaluator<'a, P> {
    graph: &'a Graph<P>,
}

impl<'a, P> RouteEvaluator<'a, P> {
    /// Creates an evaluator over the augmented graph.
    pub fn new(graph: &'a Graph<P>) -> Self {
        Self { graph }
    }

    /// Runs every check and returns the violations found.
    ///
    /// An empty result means the route is a closed walk that uses each edge
    /// instance exactly once, covers every input edge, and reports its true
    /// length.
    pub fn evaluate(&self, route: &Route) -> Vec<Violation> {
        let mut violations = Vec::new();
        self.check_walk(route, &mut violations);
        self.check_usage(route, &mut violations);
        self.check_coverage(route, &mut violations);
        self.check_length(route, &mut violations);
        violations
    }

    /// Returns `true` if [`evaluate`](Self::evaluate) finds nothing.
    pub fn is_valid(&self, route: &Route) -> bool {
        self.evaluate(route).is_empty()
    }

    /// Number of times each input edge is walked, counting its duplicates.
    ///
    /// Indexed by input edge id. Traversals of unknown edges are ignored.
    pub fn coverage(&self, route: &Route) -> Vec<usize> {
        let mut counts = vec![0usize; self.graph.original_edge_count()];
        for t in route.traversals() {
            if let Some(edge) = self.graph.edge(t.edge) {
                if let Some(c) = counts.get_mut(edge.original_id()) {
                    *c += 1;
                }
            }
        }
        counts
    }

    /// Sum of the graph's lengths over the route's traversals.
    pub fn recomputed_length(&self, route: &Route) -> f64 {
        route
            .traversals()
            .iter()
            .filter_map(|t| self.graph.edge(t.edge))
            .map(|e| e.length())
            .sum()
    }

    fn check_walk(&self, route: &Route, violations: &mut Vec<Violation>) {
        let mut at = route.start_node();
        for (position, t) in route.traversals().iter().enumerate() {
            if t.from != at {
                violations.push(Violation::new(ViolationType::Discontinuity {
                    position,
                    expected: at,
                    found: t.from,
                }));
            }
            match self.graph.edge(t.edge) {
                None => violations.push(Violation::new(ViolationType::UnknownEdge {
                    position,
                    edge: t.edge,
                })),
                Some(edge) => {
                    if edge.opposite(t.from) != Some(t.to) || edge.length() != t.length {
                        violations.push(Violation::new(ViolationType::EdgeMismatch {
                            position,
                            edge: t.edge,
                        }));
                    }
                }
            }
            at = t.to;
        }
        if at != route.start_node() {
            violations.push(Violation::new(ViolationType::NotClosed {
                start: route.start_node(),
                end: at,
            }));
        }
    }

    fn check_usage(&self, route: &Route, violations: &mut Vec<Violation>) {
        let mut counts = vec![0usize; self.graph.edge_count()];
        for t in route.traversals() {
            if let Some(c) = counts.get_mut(t.edge) {
                *c += 1;
            }
        }
        for (edge, &count) in counts.iter().enumerate() {
            match count {
                0 => violations.push(Violation::new(ViolationType::EdgeMissing { edge })),
                1 => {}
                _ => violations.push(Violation::new(ViolationType::EdgeRepeated { edge, count })),
            }
        }
    }

    fn check_coverage(&self, route: &Route, violations: &mut Vec<Violation>) {
        let uncovered: Vec<EdgeId> = self
            .coverage(route)
            .iter()
            .enumerate()
            .filter(|&(_, &c)| c == 0)
            .map(|(edge, _)| edge)
            .collect();
        for edge in uncovered {
            violations.push(Violation::new(ViolationType::OriginalUncovered { edge }));
        }
    }

    fn check_length(&self, route: &Route, violations: &mut Vec<Violation>) {
        let actual = self.recomputed_length(route);
        let reported = route.total_length();
        if (reported - actual).abs() > LENGTH_TOLERANCE * actual.abs().max(1.0) {
            violations.push(Violation::new(ViolationType::LengthMismatch { reported, actual }));
        }
    }
}
