//! Qubit mappings and their decomposition into swaps.
//!
//! A [`Permutation`] maps logical qubits to physical qubits: `map[l] = p`.
//! Swapping the physical pair `(a, b)` exchanges the logical qubits sitting
//! on `a` and `b`, so a swap sequence `τ₁ … τₖ` applied to `π_from` yields
//! `τₖ ∘ … ∘ τ₁ ∘ π_from`.
//!
//! [`decompose_to_swaps`] finds a shortest such sequence along the edges of
//! a region with an IDA* search over token placements. The heuristic is the
//! larger of two admissible bounds: half the summed token distances (a swap
//! moves two tokens by one step each) and `moved - cycles` (the transposition
//! distance on a complete graph). The search is exact whenever it finishes
//! within its node limit.

use std::fmt;

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use quekno_compile::CouplingMap;

use crate::error::{BenchError, BenchResult};

/// A swap on the physical qubits `(a, b)`.
pub type Swap = (u32, u32);

/// A bijection from logical to physical qubit indices.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permutation {
    map: Vec<u32>,
}

impl Permutation {
    /// The identity mapping on `n` qubits.
    pub fn identity(n: u32) -> Self {
        Self {
            map: (0..n).collect(),
        }
    }

    /// A uniformly random mapping on `n` qubits.
    pub fn random<R: Rng + ?Sized>(n: u32, rng: &mut R) -> Self {
        let mut map: Vec<u32> = (0..n).collect();
        map.shuffle(rng);
        Self { map }
    }

    /// Build a mapping from one-line notation, checking it is a bijection.
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_vec(map: Vec<u32>) -> BenchResult<Self> {
        let n = map.len();
        let mut seen = vec![false; n];
        for &p in &map {
            let slot = p as usize;
            if slot >= n || seen[slot] {
                return Err(BenchError::InconsistentPermutation(format!(
                    "{map:?} is not a permutation of 0..{n}"
                )));
            }
            seen[slot] = true;
        }
        Ok(Self { map })
    }

    /// Number of qubits.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// One-line notation.
    pub fn as_slice(&self) -> &[u32] {
        &self.map
    }

    /// Physical qubit holding `logical`.
    #[inline]
    pub fn apply(&self, logical: u32) -> u32 {
        self.map[logical as usize]
    }

    /// `self ∘ other`: apply `other` first, then `self`.
    pub fn compose(&self, other: &Self) -> Self {
        debug_assert_eq!(self.len(), other.len());
        Self {
            map: other.map.iter().map(|&q| self.apply(q)).collect(),
        }
    }

    /// The inverse mapping, physical to logical.
    #[allow(clippy::cast_possible_truncation)]
    pub fn inverse(&self) -> Self {
        let mut inv = vec![0; self.map.len()];
        for (logical, &physical) in self.map.iter().enumerate() {
            inv[physical as usize] = logical as u32;
        }
        Self { map: inv }
    }

    /// The mapping after swapping the logical qubits on physical `a` and `b`.
    #[must_use]
    pub fn apply_swap(&self, (a, b): Swap) -> Self {
        let map = self
            .map
            .iter()
            .map(|&p| {
                if p == a {
                    b
                } else if p == b {
                    a
                } else {
                    p
                }
            })
            .collect();
        Self { map }
    }

    /// The mapping after applying `swaps` in order.
    #[must_use]
    pub fn apply_swaps(&self, swaps: &[Swap]) -> Self {
        swaps.iter().fold(self.clone(), |pi, &swap| pi.apply_swap(swap))
    }

    pub fn is_identity(&self) -> bool {
        self.map.iter().enumerate().all(|(i, &p)| p as usize == i)
    }

    /// Space-separated one-line notation in parentheses, e.g. `(2 0 1)`.
    pub fn oneline(&self) -> String {
        let body: Vec<String> = self.map.iter().map(ToString::to_string).collect();
        format!("({})", body.join(" "))
    }
}

impl fmt::Display for Permutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.oneline())
    }
}

/// Outcome of a swap decomposition search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwapSearch {
    /// A shortest swap sequence.
    Found(Vec<Swap>),
    /// Some qubit cannot reach its destination inside the region.
    Unreachable,
    /// The node limit was hit before the search finished.
    Inconclusive,
}

impl SwapSearch {
    /// The swap sequence, if one was found.
    pub fn found(self) -> Option<Vec<Swap>> {
        match self {
            Self::Found(swaps) => Some(swaps),
            _ => None,
        }
    }
}

/// Find a shortest sequence of swaps along `region` edges turning `from`
/// into `to`.
///
/// Among shortest sequences, the next swap prefers one that shares a qubit
/// with the previous swap with probability `0.5 + consecutive_bias`. The
/// bias only changes which sequence is returned, never its length.
pub fn decompose_to_swaps<R: Rng + ?Sized>(
    from: &Permutation,
    to: &Permutation,
    region: &CouplingMap,
    consecutive_bias: f64,
    node_limit: usize,
    rng: &mut R,
) -> SwapSearch {
    if from.len() != to.len() {
        return SwapSearch::Unreachable;
    }

    // dest[p]: where the token now on physical p has to end up.
    let from_inv = from.inverse();
    let mut dest: Vec<u32> = (0..from.len())
        .map(|p| to.apply(from_inv.map[p]))
        .collect();

    for (p, &d) in dest.iter().enumerate() {
        #[allow(clippy::cast_possible_truncation)]
        let p = p as u32;
        if p != d && region.distance(p, d).is_none() {
            return SwapSearch::Unreachable;
        }
    }

    let mut search = IdaSearch {
        region,
        prefer_consecutive: (0.5 + consecutive_bias).clamp(0.0, 1.0),
        node_limit,
        nodes: 0,
        path: Vec::new(),
    };

    let mut bound = lower_bound(&dest, region);
    let ceiling = from.len() * from.len() + 1;
    loop {
        match search.dfs(&mut dest, 0, bound, None, rng) {
            Step::Found => return SwapSearch::Found(search.path),
            Step::Aborted => return SwapSearch::Inconclusive,
            Step::Exceeded(next) if next <= ceiling => bound = next,
            Step::Exceeded(_) => return SwapSearch::Inconclusive,
        }
    }
}

/// Whether `to` can be reached from `from` with at most `max_swaps` swaps
/// along `region` edges.
///
/// Runs a single bounded search pass. Returns `None` if the node limit is hit.
pub fn realizable_within<R: Rng + ?Sized>(
    from: &Permutation,
    to: &Permutation,
    region: &CouplingMap,
    max_swaps: usize,
    node_limit: usize,
    rng: &mut R,
) -> Option<bool> {
    if from.len() != to.len() {
        return Some(false);
    }
    let from_inv = from.inverse();
    let mut dest: Vec<u32> = (0..from.len())
        .map(|p| to.apply(from_inv.map[p]))
        .collect();

    let mut search = IdaSearch {
        region,
        prefer_consecutive: 0.5,
        node_limit,
        nodes: 0,
        path: Vec::new(),
    };
    match search.dfs(&mut dest, 0, max_swaps, None, rng) {
        Step::Found => Some(true),
        Step::Exceeded(_) => Some(false),
        Step::Aborted => None,
    }
}

/// Admissible estimate of the remaining swaps.
fn lower_bound(dest: &[u32], region: &CouplingMap) -> usize {
    let mut total_distance = 0usize;
    let mut moved = 0usize;
    for (p, &d) in dest.iter().enumerate() {
        #[allow(clippy::cast_possible_truncation)]
        let p = p as u32;
        if p != d {
            moved += 1;
            total_distance = total_distance
                .saturating_add(region.distance(p, d).map_or(usize::MAX / 4, |x| x as usize));
        }
    }

    let mut visited = vec![false; dest.len()];
    let mut cycles = 0usize;
    for start in 0..dest.len() {
        if visited[start] || dest[start] as usize == start {
            continue;
        }
        cycles += 1;
        let mut p = start;
        while !visited[p] {
            visited[p] = true;
            p = dest[p] as usize;
        }
    }

    total_distance.div_ceil(2).max(moved - cycles)
}

enum Step {
    Found,
    Exceeded(usize),
    Aborted,
}

struct IdaSearch<'a> {
    region: &'a CouplingMap,
    prefer_consecutive: f64,
    node_limit: usize,
    nodes: usize,
    path: Vec<Swap>,
}

impl IdaSearch<'_> {
    fn dfs<R: Rng + ?Sized>(
        &mut self,
        dest: &mut [u32],
        depth: usize,
        bound: usize,
        last: Option<Swap>,
        rng: &mut R,
    ) -> Step {
        let h = lower_bound(dest, self.region);
        let f = depth + h;
        if f > bound {
            return Step::Exceeded(f);
        }
        if h == 0 {
            return Step::Found;
        }

        let mut consecutive = Vec::new();
        let mut others = Vec::new();
        for &(a, b) in self.region.edges() {
            if last.is_some_and(|(x, y)| (x, y) == (a, b) || (x, y) == (b, a)) {
                continue;
            }
            match last {
                Some((x, y)) if a == x || a == y || b == x || b == y => consecutive.push((a, b)),
                _ => others.push((a, b)),
            }
        }
        consecutive.shuffle(rng);
        others.shuffle(rng);
        let ordered = if rng.gen_bool(self.prefer_consecutive) {
            consecutive.into_iter().chain(others)
        } else {
            others.into_iter().chain(consecutive)
        };

        let mut next_bound = usize::MAX;
        for (a, b) in ordered {
            self.nodes += 1;
            if self.nodes > self.node_limit {
                return Step::Aborted;
            }
            dest.swap(a as usize, b as usize);
            self.path.push((a, b));
            match self.dfs(dest, depth + 1, bound, Some((a, b)), rng) {
                Step::Found => return Step::Found,
                Step::Aborted => return Step::Aborted,
                Step::Exceeded(f) => next_bound = next_bound.min(f),
            }
            self.path.pop();
            dest.swap(a as usize, b as usize);
        }
        Step::Exceeded(next_bound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn test_identity_and_inverse() {
        let id = Permutation::identity(4);
        assert!(id.is_identity());

        let p = Permutation::from_vec(vec![2, 0, 3, 1]).unwrap();
        assert!(p.compose(&p.inverse()).is_identity());
        assert!(p.inverse().compose(&p).is_identity());
        assert_eq!(p.apply(0), 2);
        assert_eq!(p.inverse().apply(2), 0);
    }

    #[test]
    fn test_from_vec_rejects_non_bijection() {
        assert!(Permutation::from_vec(vec![0, 0, 1]).is_err());
        assert!(Permutation::from_vec(vec![0, 3, 1]).is_err());
        assert!(Permutation::from_vec(vec![]).unwrap().is_empty());
    }

    #[test]
    fn test_apply_swap_moves_logicals() {
        let p = Permutation::from_vec(vec![1, 2, 0]).unwrap();
        // logical 0 sits on 1, logical 1 on 2
        let q = p.apply_swap((1, 2));
        assert_eq!(q.as_slice(), &[2, 1, 0]);
        assert_eq!(p.apply_swaps(&[(1, 2), (1, 2)]), p);
    }

    #[test]
    fn test_compose_order() {
        let p = Permutation::from_vec(vec![1, 2, 0]).unwrap();
        let q = Permutation::from_vec(vec![0, 2, 1]).unwrap();
        // (p ∘ q)(1) = p(q(1)) = p(2) = 0
        assert_eq!(p.compose(&q).apply(1), 0);
    }

    #[test]
    fn test_oneline() {
        let p = Permutation::from_vec(vec![2, 0, 1]).unwrap();
        assert_eq!(p.oneline(), "(2 0 1)");
        assert_eq!(p.to_string(), "(2 0 1)");
    }

    #[test]
    fn test_decompose_adjacent_transposition() {
        let line = CouplingMap::linear(4);
        let from = Permutation::identity(4);
        let to = from.apply_swap((1, 2));
        let mut rng = SmallRng::seed_from_u64(1);

        let swaps = decompose_to_swaps(&from, &to, &line, 0.0, 10_000, &mut rng)
            .found()
            .unwrap();
        assert_eq!(swaps, vec![(1, 2)]);
    }

    #[test]
    fn test_decompose_end_to_end_on_line() {
        // Moving qubit 0 to the far end of a 4-line and back is a reversal: 6 swaps.
        let line = CouplingMap::linear(4);
        let from = Permutation::identity(4);
        let to = Permutation::from_vec(vec![3, 2, 1, 0]).unwrap();
        let mut rng = SmallRng::seed_from_u64(7);

        let swaps = decompose_to_swaps(&from, &to, &line, 0.2, 100_000, &mut rng)
            .found()
            .unwrap();
        assert_eq!(swaps.len(), 6);
        assert_eq!(from.apply_swaps(&swaps), to);
        assert!(swaps.iter().all(|&(a, b)| line.has_edge(a, b)));
    }

    #[test]
    fn test_decompose_identity_is_empty() {
        let ring = CouplingMap::ring(5);
        let pi = Permutation::from_vec(vec![4, 2, 0, 1, 3]).unwrap();
        let mut rng = SmallRng::seed_from_u64(0);
        assert_eq!(
            decompose_to_swaps(&pi, &pi, &ring, 0.0, 10, &mut rng),
            SwapSearch::Found(vec![])
        );
    }

    #[test]
    fn test_decompose_outside_region_is_unreachable() {
        let full = CouplingMap::linear(4);
        let region = full.induced_subgraph(&[(0, 1)]);
        let from = Permutation::identity(4);
        let to = from.apply_swap((2, 3));
        let mut rng = SmallRng::seed_from_u64(0);
        assert_eq!(
            decompose_to_swaps(&from, &to, &region, 0.0, 10_000, &mut rng),
            SwapSearch::Unreachable
        );
    }

    #[test]
    fn test_realizable_within() {
        let ring = CouplingMap::ring(4);
        let from = Permutation::identity(4);
        let to = from.apply_swap((0, 1)).apply_swap((1, 2));
        let mut rng = SmallRng::seed_from_u64(2);
        assert_eq!(realizable_within(&from, &to, &ring, 2, 1_000, &mut rng), Some(true));
        assert_eq!(realizable_within(&from, &to, &ring, 1, 1_000, &mut rng), Some(false));

        // Without the (0, 1) edge the same 3-cycle needs more swaps.
        let cut = ring.induced_subgraph(&[(1, 2), (2, 3), (3, 0)]);
        assert_eq!(realizable_within(&from, &to, &cut, 2, 1_000, &mut rng), Some(false));
    }

    #[test]
    fn test_decompose_node_limit() {
        let line = CouplingMap::linear(6);
        let from = Permutation::identity(6);
        let to = Permutation::from_vec(vec![5, 4, 3, 2, 1, 0]).unwrap();
        let mut rng = SmallRng::seed_from_u64(3);
        assert_eq!(
            decompose_to_swaps(&from, &to, &line, 0.0, 5, &mut rng),
            SwapSearch::Inconclusive
        );
    }
}
