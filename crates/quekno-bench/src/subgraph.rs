//! Random connected subgraphs of the architecture.
//!
//! Regions are grown edge by edge: starting from a seed edge, each step adds
//! a uniformly chosen edge that touches the qubits collected so far. The
//! result keeps the device indexing of the architecture.

use rand::Rng;
use rand_distr::{Distribution, Normal};
use rustc_hash::FxHashSet;
use tracing::{debug, trace};

use quekno_compile::CouplingMap;

use crate::error::{BenchError, BenchResult};

/// Draw an edge count from `N(mean, std)`, rounded up and clipped to `[1, |E|]`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn sample_edge_count<R: Rng + ?Sized>(
    graph: &CouplingMap,
    mean: f64,
    std: f64,
    rng: &mut R,
) -> usize {
    let max = graph.num_edges().max(1);
    let drawn = match Normal::new(mean, std) {
        Ok(normal) => normal.sample(rng),
        Err(_) => mean,
    };
    let drawn = drawn.ceil();
    if drawn < 1.0 {
        1
    } else if drawn >= max as f64 {
        max
    } else {
        drawn as usize
    }
}

/// Grow a connected region with `num_edges` edges, starting from `seed`.
///
/// Returns `None` if the component containing `seed` has fewer edges.
pub fn grow_connected_subgraph<R: Rng + ?Sized>(
    graph: &CouplingMap,
    seed: (u32, u32),
    num_edges: usize,
    rng: &mut R,
) -> Option<CouplingMap> {
    if !graph.has_edge(seed.0, seed.1) {
        return None;
    }

    let mut chosen: Vec<(u32, u32)> = vec![seed];
    let mut chosen_set: FxHashSet<(u32, u32)> = FxHashSet::default();
    chosen_set.insert(normalized(seed));
    let mut nodes: FxHashSet<u32> = [seed.0, seed.1].into_iter().collect();

    while chosen.len() < num_edges {
        // Graph edges are stored in a fixed order, which keeps the draw
        // reproducible for a given seed.
        let frontier: Vec<(u32, u32)> = graph
            .edges()
            .iter()
            .copied()
            .filter(|&(a, b)| {
                (nodes.contains(&a) || nodes.contains(&b))
                    && !chosen_set.contains(&normalized((a, b)))
            })
            .collect();
        if frontier.is_empty() {
            return None;
        }
        let edge = frontier[rng.gen_range(0..frontier.len())];
        chosen_set.insert(normalized(edge));
        nodes.insert(edge.0);
        nodes.insert(edge.1);
        chosen.push(edge);
    }

    Some(graph.induced_subgraph(&chosen))
}

/// A random connected region whose edge count is drawn around `mean`.
///
/// Each attempt re-draws both the size and the seed edge. After
/// `retry_limit` failed attempts the build reports
/// [`BenchError::SubgraphUnavailable`].
pub fn random_connected_subgraph<R: Rng + ?Sized>(
    graph: &CouplingMap,
    mean: f64,
    std: f64,
    retry_limit: usize,
    rng: &mut R,
) -> BenchResult<CouplingMap> {
    random_connected_subgraph_from(graph, graph.edges(), mean, std, retry_limit, rng)
}

/// Like [`random_connected_subgraph`], but the seed edge is drawn from `seeds`.
pub fn random_connected_subgraph_from<R: Rng + ?Sized>(
    graph: &CouplingMap,
    seeds: &[(u32, u32)],
    mean: f64,
    std: f64,
    retry_limit: usize,
    rng: &mut R,
) -> BenchResult<CouplingMap> {
    let mut last_size = 0;
    if !seeds.is_empty() {
        for attempt in 0..retry_limit {
            let size = sample_edge_count(graph, mean, std, rng);
            let seed = seeds[rng.gen_range(0..seeds.len())];
            last_size = size;
            if let Some(region) = grow_connected_subgraph(graph, seed, size, rng) {
                trace!(edges = size, attempt, "grew region");
                return Ok(region);
            }
            debug!(edges = size, attempt, "region too large for component, re-drawing size");
        }
    }
    Err(BenchError::SubgraphUnavailable {
        graph: graph.name().to_string(),
        edges: last_size,
        attempts: retry_limit,
    })
}

fn normalized((a, b): (u32, u32)) -> (u32, u32) {
    if a <= b { (a, b) } else { (b, a) }
}
