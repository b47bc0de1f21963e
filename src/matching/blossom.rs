//! Maximum-weight matching in general graphs.
//!
//! # Algorithm
//!
//! Edmonds' blossom method for augmenting paths combined with the
//! primal-dual method for weights, in the formulation of Galil (1986).
//! Each stage grows alternating trees from the single vertices, shrinking
//! odd cycles ("blossoms") into pseudo-vertices, until either an augmenting
//! path is found or the dual variables are adjusted by the least slack
//! `delta` to make new edges tight.
//!
//! Vertices are numbered `0..n`; non-trivial blossoms reuse the numbers
//! `n..2n`. Edge `k` has endpoints `2k` and `2k + 1`. Vertex duals are
//! stored doubled, so every slack below is twice the textbook value.
//!
//! # Complexity
//!
//! O(n³) for n vertices.
//!
//! # Reference
//!
//! Galil, Z. (1986). "Efficient algorithms for finding maximum matching in
//! graphs", *ACM Computing Surveys* 18(1), 23-38.

use crate::error::PostmanResult;
use crate::interrupt::Interrupt;

const NONE: usize = usize::MAX;

const FREE: u8 = 0;
const S_LABEL: u8 = 1;
const T_LABEL: u8 = 2;
const BREADCRUMB: u8 = 4;

/// Python-style indexing: negative positions count from the end.
fn at(items: &[usize], index: isize) -> usize {
    items[index.rem_euclid(items.len() as isize) as usize]
}

struct BlossomSolver<'a> {
    edges: &'a [(usize, usize, f64)],
    vertex_count: usize,
    max_cardinality: bool,
    interrupt: &'a Interrupt,

    /// Vertex that endpoint `p` is attached to.
    endpoint: Vec<usize>,
    /// Remote endpoints of the edges incident to each vertex.
    neighbor_endpoints: Vec<Vec<usize>>,
    /// Remote endpoint of the vertex's matched edge, or `NONE`.
    mate: Vec<usize>,
    /// Label of a top-level blossom (or of a vertex inside a T-blossom).
    label: Vec<u8>,
    /// Remote endpoint of the edge through which the label was obtained.
    label_end: Vec<usize>,
    /// Top-level blossom containing each vertex.
    in_blossom: Vec<usize>,
    blossom_parent: Vec<usize>,
    /// Sub-blossoms in cycle order, starting at the base.
    blossom_children: Vec<Vec<usize>>,
    blossom_base: Vec<usize>,
    /// `blossom_endpoints[b][i]` joins child `i` to child `i + 1`.
    blossom_endpoints: Vec<Vec<usize>>,
    /// Least-slack edge to an S-vertex (for free vertices) or to another
    /// S-blossom (for top-level S-blossoms).
    best_edge: Vec<usize>,
    blossom_best_edges: Vec<Option<Vec<usize>>>,
    unused_blossoms: Vec<usize>,
    dual: Vec<f64>,
    allow_edge: Vec<bool>,
    queue: Vec<usize>,
}

impl<'a> BlossomSolver<'a> {
    fn new(
        vertex_count: usize,
        edges: &'a [(usize, usize, f64)],
        max_cardinality: bool,
        interrupt: &'a Interrupt,
    ) -> Self {
        let n = vertex_count;
        let max_weight = edges.iter().map(|e| e.2).fold(0.0_f64, f64::max);

        let mut endpoint = Vec::with_capacity(2 * edges.len());
        let mut neighbor_endpoints = vec![Vec::new(); n];
        for (k, &(i, j, _)) in edges.iter().enumerate() {
            endpoint.push(i);
            endpoint.push(j);
            neighbor_endpoints[i].push(2 * k + 1);
            neighbor_endpoints[j].push(2 * k);
        }

        let mut blossom_base: Vec<usize> = (0..n).collect();
        blossom_base.extend(std::iter::repeat(NONE).take(n));
        let mut dual = vec![max_weight; n];
        dual.extend(std::iter::repeat(0.0).take(n));

        Self {
            edges,
            vertex_count: n,
            max_cardinality,
            interrupt,
            endpoint,
            neighbor_endpoints,
            mate: vec![NONE; n],
            label: vec![FREE; 2 * n],
            label_end: vec![NONE; 2 * n],
            in_blossom: (0..n).collect(),
            blossom_parent: vec![NONE; 2 * n],
            blossom_children: vec![Vec::new(); 2 * n],
            blossom_base,
            blossom_endpoints: vec![Vec::new(); 2 * n],
            best_edge: vec![NONE; 2 * n],
            blossom_best_edges: vec![None; 2 * n],
            unused_blossoms: (n..2 * n).collect(),
            dual,
            allow_edge: vec![false; edges.len()],
            queue: Vec::new(),
        }
    }

    /// Twice the slack of edge `k` (not valid inside blossoms).
    fn slack(&self, k: usize) -> f64 {
        let (i, j, w) = self.edges[k];
        self.dual[i] + self.dual[j] - 2.0 * w
    }

    fn blossom_leaves(&self, b: usize) -> Vec<usize> {
        let mut leaves = Vec::new();
        let mut stack = vec![b];
        while let Some(x) = stack.pop() {
            if x < self.vertex_count {
                leaves.push(x);
            } else {
                stack.extend(self.blossom_children[x].iter().rev());
            }
        }
        leaves
    }

    /// Labels the top-level blossom of `w` with `t`, reached through the
    /// edge whose remote endpoint is `p`. A T-label propagates S to the mate.
    fn assign_label(&mut self, w: usize, t: u8, p: usize) {
        let b = self.in_blossom[w];
        debug_assert!(self.label[w] == FREE && self.label[b] == FREE);
        self.label[w] = t;
        self.label[b] = t;
        self.label_end[w] = p;
        self.label_end[b] = p;
        self.best_edge[w] = NONE;
        self.best_edge[b] = NONE;
        if t == S_LABEL {
            let leaves = self.blossom_leaves(b);
            self.queue.extend(leaves);
        } else if t == T_LABEL {
            let mate_base = self.mate[self.blossom_base[b]];
            debug_assert!(mate_base != NONE);
            self.assign_label(self.endpoint[mate_base], S_LABEL, mate_base ^ 1);
        }
    }

    /// Traces back from `v` and `w`. Returns the base of a new blossom, or
    /// `NONE` if the two trees are disjoint (an augmenting path exists).
    fn scan_blossom(&mut self, mut v: usize, mut w: usize) -> usize {
        let mut path = Vec::new();
        let mut base = NONE;
        while v != NONE || w != NONE {
            let mut b = self.in_blossom[v];
            if self.label[b] & BREADCRUMB != 0 {
                base = self.blossom_base[b];
                break;
            }
            debug_assert_eq!(self.label[b], S_LABEL);
            path.push(b);
            self.label[b] = S_LABEL | BREADCRUMB;
            if self.label_end[b] == NONE {
                v = NONE;
            } else {
                v = self.endpoint[self.label_end[b]];
                b = self.in_blossom[v];
                debug_assert_eq!(self.label[b], T_LABEL);
                v = self.endpoint[self.label_end[b]];
            }
            if w != NONE {
                std::mem::swap(&mut v, &mut w);
            }
        }
        for b in path {
            self.label[b] = S_LABEL;
        }
        base
    }

    /// Shrinks the cycle closed by edge `k` into a new S-blossom with the
    /// given base.
    fn add_blossom(&mut self, base: usize, k: usize) {
        let (v, w, _) = self.edges[k];
        let bb = self.in_blossom[base];
        let mut bv = self.in_blossom[v];
        let mut bw = self.in_blossom[w];

        let b = self
            .unused_blossoms
            .pop()
            .expect("at most n/2 blossoms are nested at once");
        self.blossom_base[b] = base;
        self.blossom_parent[b] = NONE;
        self.blossom_parent[bb] = b;

        let mut children = Vec::new();
        let mut endps = Vec::new();
        while bv != bb {
            self.blossom_parent[bv] = b;
            children.push(bv);
            endps.push(self.label_end[bv]);
            let next = self.endpoint[self.label_end[bv]];
            bv = self.in_blossom[next];
        }
        children.push(bb);
        children.reverse();
        endps.reverse();
        endps.push(2 * k);
        while bw != bb {
            self.blossom_parent[bw] = b;
            children.push(bw);
            endps.push(self.label_end[bw] ^ 1);
            let next = self.endpoint[self.label_end[bw]];
            bw = self.in_blossom[next];
        }

        self.label[b] = S_LABEL;
        self.label_end[b] = self.label_end[bb];
        self.dual[b] = 0.0;

        for leaf in self.blossom_leaves_of(&children) {
            if self.label[self.in_blossom[leaf]] == T_LABEL {
                // T-vertices become S-vertices inside the new blossom.
                self.queue.push(leaf);
            }
            self.in_blossom[leaf] = b;
        }

        let mut best_to = vec![NONE; 2 * self.vertex_count];
        for &child in &children {
            let lists: Vec<Vec<usize>> = match self.blossom_best_edges[child].take() {
                Some(list) => vec![list],
                None => self
                    .blossom_leaves(child)
                    .into_iter()
                    .map(|leaf| self.neighbor_endpoints[leaf].iter().map(|p| p / 2).collect())
                    .collect(),
            };
            for list in lists {
                for k in list {
                    let (mut i, mut j, _) = self.edges[k];
                    if self.in_blossom[j] == b {
                        std::mem::swap(&mut i, &mut j);
                    }
                    let bj = self.in_blossom[j];
                    if bj != b
                        && self.label[bj] == S_LABEL
                        && (best_to[bj] == NONE || self.slack(k) < self.slack(best_to[bj]))
                    {
                        best_to[bj] = k;
                    }
                }
            }
            self.best_edge[child] = NONE;
        }

        let best_list: Vec<usize> = best_to.into_iter().filter(|&k| k != NONE).collect();
        let mut best = NONE;
        for &k in &best_list {
            if best == NONE || self.slack(k) < self.slack(best) {
                best = k;
            }
        }
        self.best_edge[b] = best;
        self.blossom_best_edges[b] = Some(best_list);
        self.blossom_children[b] = children;
        self.blossom_endpoints[b] = endps;
    }

    fn blossom_leaves_of(&self, children: &[usize]) -> Vec<usize> {
        children.iter().flat_map(|&c| self.blossom_leaves(c)).collect()
    }

    /// Dissolves top-level blossom `b` into its sub-blossoms.
    fn expand_blossom(&mut self, b: usize, end_stage: bool) {
        let children = self.blossom_children[b].clone();
        for &s in &children {
            self.blossom_parent[s] = NONE;
            if s < self.vertex_count {
                self.in_blossom[s] = s;
            } else if end_stage && self.dual[s] == 0.0 {
                self.expand_blossom(s, end_stage);
            } else {
                for leaf in self.blossom_leaves(s) {
                    self.in_blossom[leaf] = s;
                }
            }
        }

        if !end_stage && self.label[b] == T_LABEL {
            // Relabel the sub-blossoms of an expanding T-blossom, starting
            // from the child through which it was reached.
            let endps = self.blossom_endpoints[b].clone();
            let entry_child = self.in_blossom[self.endpoint[self.label_end[b] ^ 1]];
            let mut j = children
                .iter()
                .position(|&c| c == entry_child)
                .expect("entry child belongs to the blossom") as isize;
            let (j_step, endp_trick): (isize, usize) = if j & 1 != 0 {
                j -= children.len() as isize;
                (1, 0)
            } else {
                (-1, 1)
            };

            let mut p = self.label_end[b];
            while j != 0 {
                self.label[self.endpoint[p ^ 1]] = FREE;
                let q = at(&endps, j - endp_trick as isize);
                self.label[self.endpoint[q ^ endp_trick ^ 1]] = FREE;
                self.assign_label(self.endpoint[p ^ 1], T_LABEL, p);
                self.allow_edge[q / 2] = true;
                j += j_step;
                p = at(&endps, j - endp_trick as isize) ^ endp_trick;
                self.allow_edge[p / 2] = true;
                j += j_step;
            }

            // The base T-sub-blossom keeps its label without passing S on.
            let bv = at(&children, j);
            self.label[self.endpoint[p ^ 1]] = T_LABEL;
            self.label[bv] = T_LABEL;
            self.label_end[self.endpoint[p ^ 1]] = p;
            self.label_end[bv] = p;
            self.best_edge[bv] = NONE;

            j += j_step;
            while at(&children, j) != entry_child {
                let bv = at(&children, j);
                if self.label[bv] == S_LABEL {
                    j += j_step;
                    continue;
                }
                let reached = self
                    .blossom_leaves(bv)
                    .into_iter()
                    .find(|&leaf| self.label[leaf] != FREE);
                if let Some(v) = reached {
                    debug_assert_eq!(self.label[v], T_LABEL);
                    debug_assert_eq!(self.in_blossom[v], bv);
                    self.label[v] = FREE;
                    let mate_end = self.mate[self.blossom_base[bv]];
                    self.label[self.endpoint[mate_end]] = FREE;
                    let end = self.label_end[v];
                    self.assign_label(v, T_LABEL, end);
                }
                j += j_step;
            }
        }

        self.label[b] = FREE;
        self.label_end[b] = NONE;
        self.blossom_children[b] = Vec::new();
        self.blossom_endpoints[b] = Vec::new();
        self.blossom_base[b] = NONE;
        self.blossom_best_edges[b] = None;
        self.best_edge[b] = NONE;
        self.unused_blossoms.push(b);
    }

    /// Flips matched and unmatched edges along the alternating path inside
    /// blossom `b` from vertex `v` to the base, making `v` the new base.
    fn augment_blossom(&mut self, b: usize, v: usize) {
        let mut t = v;
        while self.blossom_parent[t] != b {
            t = self.blossom_parent[t];
        }
        if t >= self.vertex_count {
            self.augment_blossom(t, v);
        }

        let children = self.blossom_children[b].clone();
        let endps = self.blossom_endpoints[b].clone();
        let i = children
            .iter()
            .position(|&c| c == t)
            .expect("sub-blossom belongs to its parent");
        let mut j = i as isize;
        let (j_step, endp_trick): (isize, usize) = if i & 1 != 0 {
            j -= children.len() as isize;
            (1, 0)
        } else {
            (-1, 1)
        };

        while j != 0 {
            j += j_step;
            let t = at(&children, j);
            let p = at(&endps, j - endp_trick as isize) ^ endp_trick;
            if t >= self.vertex_count {
                self.augment_blossom(t, self.endpoint[p]);
            }
            j += j_step;
            let t = at(&children, j);
            if t >= self.vertex_count {
                self.augment_blossom(t, self.endpoint[p ^ 1]);
            }
            self.mate[self.endpoint[p]] = p ^ 1;
            self.mate[self.endpoint[p ^ 1]] = p;
        }

        self.blossom_children[b].rotate_left(i);
        self.blossom_endpoints[b].rotate_left(i);
        self.blossom_base[b] = self.blossom_base[self.blossom_children[b][0]];
        debug_assert_eq!(self.blossom_base[b], v);
    }

    /// Augments along the path through edge `k`, which joins two S-vertices
    /// in different trees.
    fn augment_matching(&mut self, k: usize) {
        let (v, w, _) = self.edges[k];
        for (mut s, mut p) in [(v, 2 * k + 1), (w, 2 * k)] {
            loop {
                let bs = self.in_blossom[s];
                debug_assert_eq!(self.label[bs], S_LABEL);
                if bs >= self.vertex_count {
                    self.augment_blossom(bs, s);
                }
                self.mate[s] = p;
                if self.label_end[bs] == NONE {
                    break;
                }
                let t = self.endpoint[self.label_end[bs]];
                let bt = self.in_blossom[t];
                debug_assert_eq!(self.label[bt], T_LABEL);
                s = self.endpoint[self.label_end[bt]];
                let j = self.endpoint[self.label_end[bt] ^ 1];
                if bt >= self.vertex_count {
                    self.augment_blossom(bt, j);
                }
                self.mate[j] = self.label_end[bt];
                p = self.label_end[bt] ^ 1;
            }
        }
    }

    /// Scans the S-vertex queue. Returns `true` if the matching was augmented.
    fn grow_trees(&mut self) -> bool {
        while let Some(v) = self.queue.pop() {
            debug_assert_eq!(self.label[self.in_blossom[v]], S_LABEL);
            for idx in 0..self.neighbor_endpoints[v].len() {
                let p = self.neighbor_endpoints[v][idx];
                let k = p / 2;
                let w = self.endpoint[p];
                if self.in_blossom[v] == self.in_blossom[w] {
                    continue;
                }
                let mut k_slack = 0.0;
                if !self.allow_edge[k] {
                    k_slack = self.slack(k);
                    if k_slack <= 0.0 {
                        self.allow_edge[k] = true;
                    }
                }
                if self.allow_edge[k] {
                    if self.label[self.in_blossom[w]] == FREE {
                        self.assign_label(w, T_LABEL, p ^ 1);
                    } else if self.label[self.in_blossom[w]] == S_LABEL {
                        let base = self.scan_blossom(v, w);
                        if base != NONE {
                            self.add_blossom(base, k);
                        } else {
                            self.augment_matching(k);
                            return true;
                        }
                    } else if self.label[w] == FREE {
                        // w sits unreached inside a T-blossom; remember how
                        // to reach it for when that blossom expands.
                        debug_assert_eq!(self.label[self.in_blossom[w]], T_LABEL);
                        self.label[w] = T_LABEL;
                        self.label_end[w] = p ^ 1;
                    }
                } else if self.label[self.in_blossom[w]] == S_LABEL {
                    let b = self.in_blossom[v];
                    if self.best_edge[b] == NONE || k_slack < self.slack(self.best_edge[b]) {
                        self.best_edge[b] = k;
                    }
                } else if self.label[w] == FREE
                    && (self.best_edge[w] == NONE || k_slack < self.slack(self.best_edge[w]))
                {
                    self.best_edge[w] = k;
                }
            }
        }
        false
    }

    /// Adjusts the duals by the least slack. Returns `false` once the
    /// optimum is reached.
    fn adjust_duals(&mut self) -> bool {
        let n = self.vertex_count;
        let min_vertex_dual = self.dual[..n].iter().copied().fold(f64::INFINITY, f64::min);

        let mut delta_type = 0u8;
        let mut delta = 0.0;
        let mut delta_edge = NONE;
        let mut delta_blossom = NONE;

        if !self.max_cardinality {
            delta_type = 1;
            delta = min_vertex_dual;
        }

        // Least slack between an S-vertex and a free vertex.
        for v in 0..n {
            if self.label[self.in_blossom[v]] == FREE && self.best_edge[v] != NONE {
                let d = self.slack(self.best_edge[v]);
                if delta_type == 0 || d < delta {
                    delta = d;
                    delta_type = 2;
                    delta_edge = self.best_edge[v];
                }
            }
        }

        // Half the least slack between two S-blossoms.
        for b in 0..2 * n {
            if self.blossom_parent[b] == NONE
                && self.label[b] == S_LABEL
                && self.best_edge[b] != NONE
            {
                let d = self.slack(self.best_edge[b]) / 2.0;
                if delta_type == 0 || d < delta {
                    delta = d;
                    delta_type = 3;
                    delta_edge = self.best_edge[b];
                }
            }
        }

        // Least dual of a T-blossom.
        for b in n..2 * n {
            if self.blossom_base[b] != NONE
                && self.blossom_parent[b] == NONE
                && self.label[b] == T_LABEL
                && (delta_type == 0 || self.dual[b] < delta)
            {
                delta = self.dual[b];
                delta_type = 4;
                delta_blossom = b;
            }
        }

        if delta_type == 0 {
            // Maximum cardinality reached; one last update keeps the duals
            // verifiable.
            debug_assert!(self.max_cardinality);
            delta_type = 1;
            delta = min_vertex_dual.max(0.0);
        }

        for v in 0..n {
            match self.label[self.in_blossom[v]] {
                S_LABEL => self.dual[v] -= delta,
                T_LABEL => self.dual[v] += delta,
                _ => {}
            }
        }
        for b in n..2 * n {
            if self.blossom_base[b] != NONE && self.blossom_parent[b] == NONE {
                match self.label[b] {
                    S_LABEL => self.dual[b] += delta,
                    T_LABEL => self.dual[b] -= delta,
                    _ => {}
                }
            }
        }

        match delta_type {
            2 => {
                self.allow_edge[delta_edge] = true;
                let (mut i, j, _) = self.edges[delta_edge];
                if self.label[self.in_blossom[i]] == FREE {
                    i = j;
                }
                self.queue.push(i);
                true
            }
            3 => {
                self.allow_edge[delta_edge] = true;
                let (i, _, _) = self.edges[delta_edge];
                self.queue.push(i);
                true
            }
            4 => {
                self.expand_blossom(delta_blossom, false);
                true
            }
            _ => false,
        }
    }

    fn solve(mut self) -> PostmanResult<Vec<Option<usize>>> {
        let n = self.vertex_count;
        for _stage in 0..n {
            self.interrupt.check()?;

            self.label.iter_mut().for_each(|l| *l = FREE);
            self.best_edge.iter_mut().for_each(|e| *e = NONE);
            self.blossom_best_edges[n..].iter_mut().for_each(|e| *e = None);
            self.allow_edge.iter_mut().for_each(|a| *a = false);
            self.queue.clear();

            for v in 0..n {
                if self.mate[v] == NONE && self.label[self.in_blossom[v]] == FREE {
                    self.assign_label(v, S_LABEL, NONE);
                }
            }

            let mut augmented = false;
            loop {
                self.interrupt.check()?;
                if self.grow_trees() {
                    augmented = true;
                    break;
                }
                if !self.adjust_duals() {
                    break;
                }
            }

            if !augmented {
                break;
            }

            for b in n..2 * n {
                if self.blossom_parent[b] == NONE
                    && self.blossom_base[b] != NONE
                    && self.label[b] == S_LABEL
                    && self.dual[b] == 0.0
                {
                    self.expand_blossom(b, true);
                }
            }
        }

        Ok(self
            .mate
            .iter()
            .map(|&p| if p == NONE { None } else { Some(self.endpoint[p]) })
            .collect())
    }
}

/// Computes a maximum-weight matching of a general undirected graph.
///
/// `edges` lists `(i, j, weight)` triples over vertices `0..vertex_count`,
/// with at most one edge per pair and no self-loops. If `max_cardinality`
/// is set, only matchings of maximum cardinality are considered.
///
/// Returns `mate`, where `mate[v]` is the vertex matched to `v`.
/// The interrupt is checked at every stage and sub-stage.
///
/// # Panics
///
/// Panics if an endpoint is `>= vertex_count`.
///
/// # Examples
///
/// ```
/// use u_postman::matching::maximum_weight_matching;
/// use u_postman::Interrupt;
///
/// // Path 0-1-2-3 with a heavy middle edge.
/// let edges = [(0, 1, 5.0), (1, 2, 11.0), (2, 3, 5.0)];
/// let mate = maximum_weight_matching(4, &edges, false, &Interrupt::new()).unwrap();
/// assert_eq!(mate, vec![None, Some(2), Some(1), None]);
///
/// let mate = maximum_weight_matching(4, &edges, true, &Interrupt::new()).unwrap();
/// assert_eq!(mate, vec![Some(1), Some(0), Some(3), Some(2)]);
/// ```
pub fn maximum_weight_matching(
    vertex_count: usize,
    edges: &[(usize, usize, f64)],
    max_cardinality: bool,
    interrupt: &Interrupt,
) -> PostmanResult<Vec<Option<usize>>> {
    if edges.is_empty() {
        return Ok(vec![None; vertex_count]);
    }
    BlossomSolver::new(vertex_count, edges, max_cardinality, interrupt).solve()
}
