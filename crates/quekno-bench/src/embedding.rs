//! Subgraph monomorphism search.
//!
//! Decides whether a small pattern graph (logical qubit pairs that must be
//! adjacent at the same time) can be placed injectively on the architecture
//! so that every pattern edge lands on a coupling edge. The search is a
//! backtracking match in connectivity order with degree pruning, bounded by
//! a call limit.

use rustc_hash::{FxHashMap, FxHashSet};

use quekno_compile::CouplingMap;

/// Result of an embedding search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Embedding {
    /// An injective placement exists.
    Found,
    /// No placement exists.
    Impossible,
    /// The call limit was reached first.
    LimitReached,
}

/// Search for a placement of `pattern` on `target`.
pub fn find_embedding(pattern: &[(u32, u32)], target: &CouplingMap, call_limit: usize) -> Embedding {
    let mut adjacency: FxHashMap<u32, Vec<u32>> = FxHashMap::default();
    let mut seen_edges: FxHashSet<(u32, u32)> = FxHashSet::default();
    for &(a, b) in pattern {
        if a == b {
            return Embedding::Impossible;
        }
        let key = if a < b { (a, b) } else { (b, a) };
        if seen_edges.insert(key) {
            adjacency.entry(a).or_default().push(b);
            adjacency.entry(b).or_default().push(a);
        }
    }
    if adjacency.is_empty() {
        return Embedding::Found;
    }

    let target_nodes: Vec<u32> = (0..target.num_qubits()).collect();
    if adjacency.len() > target_nodes.len() || seen_edges.len() > target.num_edges() {
        return Embedding::Impossible;
    }

    let mut pattern_degrees: Vec<usize> = adjacency.values().map(Vec::len).collect();
    let mut target_degrees: Vec<usize> = target_nodes.iter().map(|&q| target.degree(q)).collect();
    pattern_degrees.sort_unstable_by(|a, b| b.cmp(a));
    target_degrees.sort_unstable_by(|a, b| b.cmp(a));
    if pattern_degrees
        .iter()
        .zip(&target_degrees)
        .any(|(p, t)| p > t)
    {
        return Embedding::Impossible;
    }

    let order = match_order(&adjacency);
    let mut matcher = Matcher {
        adjacency: &adjacency,
        target,
        target_nodes: &target_nodes,
        order: &order,
        image: FxHashMap::default(),
        used: vec![false; target_nodes.len()],
        calls: 0,
        call_limit,
    };
    match matcher.extend(0) {
        Some(true) => Embedding::Found,
        Some(false) => Embedding::Impossible,
        None => Embedding::LimitReached,
    }
}

/// Pattern nodes ordered so that each node after the first of its component
/// has an already placed neighbor. Ties go to the higher degree, then the
/// lower index.
fn match_order(adjacency: &FxHashMap<u32, Vec<u32>>) -> Vec<u32> {
    let mut nodes: Vec<u32> = adjacency.keys().copied().collect();
    nodes.sort_unstable();

    let mut order = Vec::with_capacity(nodes.len());
    let mut placed: FxHashSet<u32> = FxHashSet::default();
    while order.len() < nodes.len() {
        let next = nodes
            .iter()
            .copied()
            .filter(|n| !placed.contains(n))
            .max_by_key(|n| {
                let links = adjacency[n].iter().filter(|m| placed.contains(m)).count();
                (links, adjacency[n].len(), std::cmp::Reverse(*n))
            });
        let Some(next) = next else { break };
        placed.insert(next);
        order.push(next);
    }
    order
}

struct Matcher<'a> {
    adjacency: &'a FxHashMap<u32, Vec<u32>>,
    target: &'a CouplingMap,
    target_nodes: &'a [u32],
    order: &'a [u32],
    image: FxHashMap<u32, u32>,
    used: Vec<bool>,
    calls: usize,
    call_limit: usize,
}

impl Matcher<'_> {
    /// `Some(found)` when the subtree was fully explored, `None` on limit.
    fn extend(&mut self, depth: usize) -> Option<bool> {
        self.calls += 1;
        if self.calls > self.call_limit {
            return None;
        }
        let Some(&node) = self.order.get(depth) else {
            return Some(true);
        };

        let placed_neighbors: Vec<u32> = self.adjacency[&node]
            .iter()
            .filter_map(|n| self.image.get(n).copied())
            .collect();
        let candidates: Vec<u32> = match placed_neighbors.first() {
            Some(&anchor) => self.target.neighbors(anchor).collect(),
            None => self.target_nodes.to_vec(),
        };
        let degree = self.adjacency[&node].len();

        for candidate in candidates {
            let slot = candidate as usize;
            if slot >= self.used.len() || self.used[slot] || self.target.degree(candidate) < degree {
                continue;
            }
            if !placed_neighbors
                .iter()
                .all(|&n| self.target.has_edge(n, candidate))
            {
                continue;
            }

            self.used[slot] = true;
            self.image.insert(node, candidate);
            let result = self.extend(depth + 1);
            self.image.remove(&node);
            self.used[slot] = false;
            match result {
                Some(false) => {}
                other => return other,
            }
        }
        Some(false)
    }
}
