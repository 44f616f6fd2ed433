//! Glink search.
//!
//! A glink joins two consecutive gate layers. The current layer runs on a
//! region `S` under `π_before`; the glink's swaps, all on edges of `S`, turn
//! `π_before` into `π_after`; the next layer runs on a fresh region under
//! `π_after`.
//!
//! A candidate is accepted when
//!
//! 1. its swap sequence is a shortest one for `S` (exact search, replayed
//!    and checked against `π_after`),
//! 2. the next region contains at least one *front pair*: an edge whose
//!    logical qubits under `π_after` are not coupled under `π_before`, and
//! 3. the logical pairs of `S` together with the front pairs cannot be
//!    placed on the architecture all at once.
//!
//! Condition 3 makes the glink *strong*: any router that executes the layer
//! followed by the front gates has to insert at least one swap in between.

use rand::Rng;
use rand::seq::SliceRandom;
use serde::Serialize;
use tracing::{debug, trace};

use quekno_compile::CouplingMap;

use crate::config::{Config, OptType};
use crate::embedding::{Embedding, find_embedding};
use crate::error::{BenchError, BenchResult};
use crate::permutation::{Permutation, Swap, SwapSearch, decompose_to_swaps, realizable_within};
use crate::subgraph::random_connected_subgraph_from;

/// A certified link between two gate layers.
#[derive(Debug, Clone, Serialize)]
pub struct Glink {
    /// Region of the layer before the swaps. Every swap is one of its edges.
    pub region: CouplingMap,
    pub pi_before: Permutation,
    pub pi_after: Permutation,
    /// Shortest swap sequence from `pi_before` to `pi_after` inside `region`.
    pub swaps: Vec<Swap>,
    /// False when the minimality trials were capped or inconclusive.
    pub certificate_exact: bool,
}

impl Glink {
    /// Known cost contribution: swaps for gate objectives, one swap layer for depth.
    pub fn cost(&self, opt_type: OptType) -> usize {
        match opt_type {
            OptType::Opt1 | OptType::Opt2 => self.swaps.len(),
            OptType::Depth => usize::from(!self.swaps.is_empty()),
        }
    }

    /// Depth of the swap sequence when swaps on disjoint qubits overlap.
    pub fn swap_depth(&self) -> usize {
        let mut level = vec![0usize; self.pi_before.len()];
        let mut depth = 0;
        for &(a, b) in &self.swaps {
            let (a, b) = (a as usize, b as usize);
            let next = level[a].max(level[b]) + 1;
            level[a] = next;
            level[b] = next;
            depth = depth.max(next);
        }
        depth
    }
}

/// An accepted glink with the region and front gates of the layer after it.
#[derive(Debug, Clone)]
pub struct GlinkStep {
    pub glink: Glink,
    pub next_region: CouplingMap,
    /// Logical pairs of `next_region` that force a swap, emitted first in the next layer.
    pub front_pairs: Vec<(u32, u32)>,
}

/// Inputs of one glink search.
#[derive(Debug, Clone, Copy)]
pub struct GlinkQuery<'a> {
    pub graph: &'a CouplingMap,
    pub region: &'a CouplingMap,
    pub pi_before: &'a Permutation,
    pub opt_type: OptType,
    /// Cap on swaps drawn, from the remaining cost budget.
    pub max_swaps: Option<usize>,
    pub mean_subgraph_size: f64,
}

/// Search for a strong glink leaving `query.region`.
///
/// Tries up to `glink_search_patience` candidates. Replay mismatches are
/// fatal ([`BenchError::InconsistentPermutation`]); running out of patience
/// yields [`BenchError::GlinkVerificationFailed`], which the chain generator
/// recovers from.
pub fn find_glink<R: Rng + ?Sized>(
    query: &GlinkQuery<'_>,
    config: &Config,
    rng: &mut R,
) -> BenchResult<GlinkStep> {
    let before_inv = query.pi_before.inverse();
    let current_pairs: Vec<(u32, u32)> = query
        .region
        .edges()
        .iter()
        .map(|&(p, q)| (before_inv.apply(p), before_inv.apply(q)))
        .collect();

    for attempt in 0..config.glink_search_patience {
        let drawn = draw_swaps(query.region, query.opt_type, query.max_swaps, config, rng);
        if drawn.is_empty() {
            break;
        }
        let pi_after = query.pi_before.apply_swaps(&drawn);

        let swaps = match decompose_to_swaps(
            query.pi_before,
            &pi_after,
            query.region,
            swap_bias(query.opt_type, config),
            config.decomposition_node_limit,
            rng,
        ) {
            SwapSearch::Found(swaps) => swaps,
            SwapSearch::Unreachable => {
                return Err(BenchError::InconsistentPermutation(format!(
                    "swaps {drawn:?} drawn inside the region are unreachable in it"
                )));
            }
            SwapSearch::Inconclusive => {
                trace!(attempt, "swap decomposition hit its node limit");
                continue;
            }
        };
        if swaps.is_empty()
            || swaps.len() > drawn.len()
            || query.pi_before.apply_swaps(&swaps) != pi_after
        {
            return Err(BenchError::InconsistentPermutation(format!(
                "decomposition {swaps:?} does not reproduce {pi_after} from {}",
                query.pi_before
            )));
        }

        let certificate_exact = minimality_trials(query, &pi_after, &swaps, config, rng)?;

        let seeds = incident_edges(query.graph, &swaps);
        let next_region = random_connected_subgraph_from(
            query.graph,
            &seeds,
            query.mean_subgraph_size,
            config.subgraph_size_std,
            config.subgraph_retry_limit,
            rng,
        )?;

        let front_pairs = front_pairs(query.graph, query.pi_before, &pi_after, &next_region);
        if front_pairs.is_empty() {
            trace!(attempt, "next region has no forcing pair");
            continue;
        }

        let mut pattern = current_pairs.clone();
        pattern.extend_from_slice(&front_pairs);
        match find_embedding(&pattern, query.graph, config.embedding_call_limit) {
            Embedding::Impossible => {
                debug!(
                    attempt,
                    swaps = swaps.len(),
                    region = query.region.num_edges(),
                    next_region = next_region.num_edges(),
                    fronts = front_pairs.len(),
                    "strong glink found"
                );
                return Ok(GlinkStep {
                    glink: Glink {
                        region: query.region.clone(),
                        pi_before: query.pi_before.clone(),
                        pi_after,
                        swaps,
                        certificate_exact,
                    },
                    next_region,
                    front_pairs,
                });
            }
            Embedding::Found => trace!(attempt, "union pattern embeds, not strong"),
            Embedding::LimitReached => trace!(attempt, "embedding search hit its call limit"),
        }
    }

    Err(BenchError::GlinkVerificationFailed {
        attempts: config.glink_search_patience,
    })
}

/// Draw the swaps that define `π_after`.
///
/// - `opt1`: one region edge.
/// - `opt2`: one edge, followed with probability `0.5 + bias` by a second
///   edge sharing a qubit with it.
/// - `depth`: pairwise disjoint region edges, grown until a null pick.
pub fn draw_swaps<R: Rng + ?Sized>(
    region: &CouplingMap,
    opt_type: OptType,
    max_swaps: Option<usize>,
    config: &Config,
    rng: &mut R,
) -> Vec<Swap> {
    let edges = region.edges();
    let Some(&first) = edges.choose(rng) else {
        return Vec::new();
    };
    let mut swaps = vec![first];

    match opt_type {
        OptType::Opt1 => {}
        OptType::Opt2 => {
            let budget = max_swaps.unwrap_or(2).min(2);
            if budget >= 2 && rng.gen_bool(config.consecutive_probability()) {
                let touching: Vec<Swap> = edges
                    .iter()
                    .copied()
                    .filter(|&e| e != first && shares_qubit(e, first))
                    .collect();
                if let Some(&second) = touching.choose(rng) {
                    swaps.push(second);
                }
            }
        }
        OptType::Depth => loop {
            let candidates: Vec<Swap> = edges
                .iter()
                .copied()
                .filter(|&e| swaps.iter().all(|&s| !shares_qubit(e, s)))
                .collect();
            if candidates.is_empty() {
                break;
            }
            // The extra slot is the null pick that stops early.
            let pick = rng.gen_range(0..=candidates.len());
            match candidates.get(pick) {
                Some(&edge) => swaps.push(edge),
                None => break,
            }
        },
    }
    swaps
}

/// Logical pairs of `next_region` under `pi_after` that are not coupled under `pi_before`.
pub fn front_pairs(
    graph: &CouplingMap,
    pi_before: &Permutation,
    pi_after: &Permutation,
    next_region: &CouplingMap,
) -> Vec<(u32, u32)> {
    let after_inv = pi_after.inverse();
    next_region
        .edges()
        .iter()
        .map(|&(p, q)| (after_inv.apply(p), after_inv.apply(q)))
        .filter(|&(l1, l2)| !graph.has_edge(pi_before.apply(l1), pi_before.apply(l2)))
        .collect()
}

/// Remove each swap edge from the region in turn and check that the same
/// transformation still needs at least as many swaps.
///
/// `swaps` is already a shortest sequence for the whole region, and a
/// sub-region can never do better, so a trial only fails on an internal
/// inconsistency. The trials re-confirm the decomposition; they do not
/// reject regions. Returns whether every trial ran to completion, which
/// becomes `certificate_exact`.
fn minimality_trials<R: Rng + ?Sized>(
    query: &GlinkQuery<'_>,
    pi_after: &Permutation,
    swaps: &[Swap],
    config: &Config,
    rng: &mut R,
) -> BenchResult<bool> {
    let mut support: Vec<Swap> = Vec::new();
    for &(a, b) in swaps {
        if !support.iter().any(|&e| e == (a, b) || e == (b, a)) {
            support.push((a, b));
        }
    }

    let mut exact = support.len() <= config.minimality_trial_cap;
    for &(a, b) in support.iter().take(config.minimality_trial_cap) {
        let reduced: Vec<Swap> = query
            .region
            .edges()
            .iter()
            .copied()
            .filter(|&e| e != (a, b) && e != (b, a))
            .collect();
        let reduced = query.region.induced_subgraph(&reduced);
        match realizable_within(
            query.pi_before,
            pi_after,
            &reduced,
            swaps.len() - 1,
            config.decomposition_node_limit,
            rng,
        ) {
            Some(false) => {}
            Some(true) => {
                return Err(BenchError::InconsistentPermutation(format!(
                    "a sub-region realizes {pi_after} with fewer than {} swaps",
                    swaps.len()
                )));
            }
            None => exact = false,
        }
    }
    Ok(exact)
}

/// Consecutive-swap bias for the decomposition. Only `opt2` uses it.
fn swap_bias(opt_type: OptType, config: &Config) -> f64 {
    match opt_type {
        OptType::Opt2 => config.consec_swap_bias,
        OptType::Opt1 | OptType::Depth => 0.0,
    }
}

/// Architecture edges touching any swapped qubit.
fn incident_edges(graph: &CouplingMap, swaps: &[Swap]) -> Vec<Swap> {
    graph
        .edges()
        .iter()
        .copied()
        .filter(|&e| swaps.iter().any(|&s| shares_qubit(e, s)))
        .collect()
}

fn shares_qubit((a, b): Swap, (c, d): Swap) -> bool {
    a == c || a == d || b == c || b == d
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn query<'a>(
        graph: &'a CouplingMap,
        region: &'a CouplingMap,
        pi: &'a Permutation,
        opt_type: OptType,
    ) -> GlinkQuery<'a> {
        GlinkQuery {
            graph,
            region,
            pi_before: pi,
            opt_type,
            max_swaps: None,
            mean_subgraph_size: 5.0,
        }
    }

    #[test]
    fn test_draw_swaps_shapes() {
        let tokyo = CouplingMap::tokyo();
        let config = Config::default();
        let mut rng = SmallRng::seed_from_u64(4);

        for _ in 0..50 {
            let one = draw_swaps(&tokyo, OptType::Opt1, None, &config, &mut rng);
            assert_eq!(one.len(), 1);

            let two = draw_swaps(&tokyo, OptType::Opt2, None, &config, &mut rng);
            assert!(matches!(two.len(), 1 | 2));
            if let [a, b] = two[..] {
                assert!(shares_qubit(a, b));
                assert_ne!(a, b);
            }

            let capped = draw_swaps(&tokyo, OptType::Opt2, Some(1), &config, &mut rng);
            assert_eq!(capped.len(), 1);

            let layer = draw_swaps(&tokyo, OptType::Depth, None, &config, &mut rng);
            assert!(!layer.is_empty());
            for (i, &a) in layer.iter().enumerate() {
                for &b in &layer[i + 1..] {
                    assert!(!shares_qubit(a, b));
                }
            }
        }
    }

    #[test]
    fn test_opt2_full_bias_always_pairs() {
        let ring = CouplingMap::ring(5);
        let config = Config {
            consec_swap_bias: 0.5,
            ..Config::default()
        };
        let mut rng = SmallRng::seed_from_u64(8);
        for _ in 0..20 {
            assert_eq!(draw_swaps(&ring, OptType::Opt2, None, &config, &mut rng).len(), 2);
        }
    }

    #[test]
    fn test_swap_bias_only_for_opt2() {
        let config = Config {
            consec_swap_bias: 0.3,
            ..Config::default()
        };
        assert_eq!(swap_bias(OptType::Opt2, &config), 0.3);
        assert_eq!(swap_bias(OptType::Opt1, &config), 0.0);
        assert_eq!(swap_bias(OptType::Depth, &config), 0.0);
    }

    #[test]
    fn test_minimality_trials_confirm_shortest_sequence() {
        let line = CouplingMap::linear(4);
        let pi = Permutation::identity(4);
        let swaps = vec![(0, 1), (2, 3)];
        let after = pi.apply_swaps(&swaps);
        let config = Config::default();
        let mut rng = SmallRng::seed_from_u64(1);

        let q = query(&line, &line, &pi, OptType::Depth);
        assert!(minimality_trials(&q, &after, &swaps, &config, &mut rng).unwrap());

        let capped = Config {
            minimality_trial_cap: 1,
            ..Config::default()
        };
        assert!(!minimality_trials(&q, &after, &swaps, &capped, &mut rng).unwrap());
    }

    #[test]
    fn test_swap_depth() {
        let glink = Glink {
            region: CouplingMap::linear(4),
            pi_before: Permutation::identity(4),
            pi_after: Permutation::identity(4),
            swaps: vec![(0, 1), (2, 3), (1, 2)],
            certificate_exact: true,
        };
        assert_eq!(glink.swap_depth(), 2);
        assert_eq!(glink.cost(OptType::Opt1), 3);
        assert_eq!(glink.cost(OptType::Depth), 1);
    }

    #[test]
    fn test_front_pairs() {
        let line = CouplingMap::linear(4);
        let before = Permutation::identity(4);
        let after = before.apply_swap((1, 2));
        // Under `after`, physical (0, 1) holds logicals (0, 2), which sat on 0 and 2.
        let next = line.induced_subgraph(&[(0, 1), (2, 3)]);
        let fronts = front_pairs(&line, &before, &after, &next);
        assert_eq!(fronts, vec![(0, 2), (1, 3)]);
    }

    #[test]
    fn test_find_glink_on_grid() {
        let grid = CouplingMap::grid(3, 4);
        let config = Config {
            glink_search_patience: 256,
            ..Config::default()
        };
        let mut rng = SmallRng::seed_from_u64(21);
        let pi = Permutation::random(12, &mut rng);
        let region =
            crate::subgraph::random_connected_subgraph(&grid, 10.0, 0.0, 8, &mut rng).unwrap();

        for opt_type in [OptType::Opt1, OptType::Opt2, OptType::Depth] {
            let step = find_glink(&query(&grid, &region, &pi, opt_type), &config, &mut rng).unwrap();
            let glink = &step.glink;
            assert_eq!(glink.pi_before.apply_swaps(&glink.swaps), glink.pi_after);
            assert!(glink.swaps.iter().all(|&(a, b)| region.has_edge(a, b)));
            assert!(!step.front_pairs.is_empty());

            let json = serde_json::to_value(glink).unwrap();
            assert_eq!(json["swaps"].as_array().unwrap().len(), glink.swaps.len());

            let after_inv = glink.pi_after.inverse();
            for &(l1, l2) in &step.front_pairs {
                let (p, q) = (glink.pi_after.apply(l1), glink.pi_after.apply(l2));
                assert!(step.next_region.has_edge(p, q));
                assert_eq!(after_inv.apply(p), l1);
                assert!(!grid.has_edge(glink.pi_before.apply(l1), glink.pi_before.apply(l2)));
            }
        }
    }

    #[test]
    fn test_single_edge_region_on_line_fails_cleanly() {
        // One coupled pair on a line: the pattern is always a short path,
        // which embeds, so the search must give up after its patience.
        let line = CouplingMap::linear(3);
        let region = line.induced_subgraph(&[(0, 1)]);
        let pi = Permutation::identity(3);
        let config = Config {
            glink_search_patience: 4,
            ..Config::default()
        };
        let mut rng = SmallRng::seed_from_u64(2);
        let mut q = query(&line, &region, &pi, OptType::Opt1);
        q.mean_subgraph_size = 1.0;
        let err = find_glink(&q, &config, &mut rng).unwrap_err();
        assert!(matches!(err, BenchError::GlinkVerificationFailed { attempts: 4 }));
    }
}
