//! Permutation-chain generation.
//!
//! The chain alternates gate layers and glinks:
//!
//! ```text
//! layer₁ (π₁, S₁) ─ glink₁ ─ layer₂ (π₂, S₂) ─ glink₂ ─ … ─ layer_{ℓ+1} (π_{ℓ+1}, S_{ℓ+1})
//! ```
//!
//! Each step samples the layer for the current region, then searches a glink
//! leaving it. A failed search at the head redraws the head region; anywhere
//! else it drops the previous glink and retries that position. Failures are
//! counted across the whole build and capped by `max_chain_failures`.
//!
//! Only the last layer is ever cut short or padded, so a gate-size or depth
//! target is met exactly. A layer becomes the last one when it reaches the
//! target on its own, or when the front gates of the next layer would not
//! fit.

use rand::Rng;
use tracing::{debug, info, instrument};

use quekno_compile::CouplingMap;
use quekno_ir::{Instruction, QubitId};

use crate::config::{Config, OptType, Target};
use crate::error::{BenchError, BenchResult};
use crate::glink::{Glink, GlinkQuery, find_glink};
use crate::permutation::{Permutation, Swap};
use crate::sampler::{GateLayer, pad_layer, sample_layer};
use crate::subgraph::random_connected_subgraph;

/// A generated chain of layers and glinks.
#[derive(Debug, Clone)]
pub struct Chain {
    pub opt_type: OptType,
    pub target: Target,
    /// The initial mapping π₁.
    pub init_map: Permutation,
    /// Glink `i` sits between `layers[i]` and `layers[i + 1]`.
    pub glinks: Vec<Glink>,
    pub layers: Vec<GateLayer>,
}

impl Chain {
    /// Known transformation cost: swaps, or swap layers for the depth objective.
    pub fn cost(&self) -> usize {
        self.glinks.iter().map(|g| g.cost(self.opt_type)).sum()
    }

    pub fn num_swaps(&self) -> usize {
        self.glinks.iter().map(|g| g.swaps.len()).sum()
    }

    /// Known cost in two-qubit gates, three per swap.
    pub fn known_gate_cost(&self) -> usize {
        3 * self.num_swaps()
    }

    /// Known cost in depth, three per swap layer.
    pub fn known_depth_cost(&self) -> usize {
        3 * self.glinks.iter().map(Glink::swap_depth).sum::<usize>()
    }

    /// Swap lists taking π_i to π_{i+1}.
    pub fn swaps(&self) -> Vec<Vec<Swap>> {
        self.glinks.iter().map(|g| g.swaps.clone()).collect()
    }

    /// Mapping of the last layer.
    pub fn final_map(&self) -> &Permutation {
        self.layers.last().map_or(&self.init_map, |layer| &layer.mapping)
    }

    pub fn certificate_exact(&self) -> bool {
        self.glinks.iter().all(|g| g.certificate_exact)
    }

    /// Edge counts of every layer's region, in chain order.
    pub fn glink_sizes(&self) -> Vec<usize> {
        self.layers.iter().map(|l| l.region.num_edges()).collect()
    }

    /// Mean region edge count across the chain.
    #[allow(clippy::cast_precision_loss)]
    pub fn mean_subgraph_size(&self) -> f64 {
        let sizes = self.glink_sizes();
        if sizes.is_empty() {
            0.0
        } else {
            sizes.iter().sum::<usize>() as f64 / sizes.len() as f64
        }
    }

    /// Logical gates across all layers.
    pub fn gate_size(&self) -> usize {
        self.layers.iter().map(GateLayer::len).sum()
    }

    /// Re-check the chain's structural invariants.
    ///
    /// Every glink must replay to its `pi_after`, hand that mapping to the
    /// next layer, and only use swaps on its region; every layer must stay
    /// inside its region.
    pub fn verify(&self) -> BenchResult<()> {
        if self.layers.len() != self.glinks.len() + 1 {
            return Err(BenchError::InconsistentPermutation(format!(
                "{} layers for {} glinks",
                self.layers.len(),
                self.glinks.len()
            )));
        }
        if self.layers[0].mapping != self.init_map {
            return Err(BenchError::InconsistentPermutation(
                "first layer does not start from the initial mapping".into(),
            ));
        }
        for (i, glink) in self.glinks.iter().enumerate() {
            if glink.pi_before != self.layers[i].mapping
                || glink.pi_after != self.layers[i + 1].mapping
                || glink.pi_before.apply_swaps(&glink.swaps) != glink.pi_after
            {
                return Err(BenchError::InconsistentPermutation(format!(
                    "glink {i} does not connect its layers"
                )));
            }
            if let Some(&(a, b)) = glink.swaps.iter().find(|&&(a, b)| !glink.region.has_edge(a, b)) {
                return Err(BenchError::InconsistentPermutation(format!(
                    "glink {i} swaps ({a}, {b}) outside its region"
                )));
            }
        }
        if let Some(i) = self.layers.iter().position(|l| !l.is_contained()) {
            return Err(BenchError::InconsistentPermutation(format!(
                "layer {i} has a two-qubit gate outside its region"
            )));
        }
        Ok(())
    }
}

/// Running totals of the layers accepted so far.
#[derive(Debug, Clone)]
struct Tally {
    gates: usize,
    wires: Vec<usize>,
    depth: usize,
    cost: usize,
}

impl Tally {
    fn new(num_qubits: usize) -> Self {
        Self {
            gates: 0,
            wires: vec![0; num_qubits],
            depth: 0,
            cost: 0,
        }
    }

    fn level_after(&self, gate: &Instruction) -> usize {
        gate.qubits
            .iter()
            .map(|q| self.wires[q.index()])
            .max()
            .unwrap_or(0)
            + 1
    }

    fn push(&mut self, gate: &Instruction) {
        let level = self.level_after(gate);
        for q in &gate.qubits {
            self.wires[q.index()] = level;
        }
        self.depth = self.depth.max(level);
        self.gates += 1;
    }

    fn extend<'a>(&mut self, gates: impl IntoIterator<Item = &'a Instruction>) {
        for gate in gates {
            self.push(gate);
        }
    }

    /// The lowest-indexed logical qubit at the current depth.
    fn deepest_wire(&self) -> u32 {
        let deepest = self
            .wires
            .iter()
            .enumerate()
            .find(|&(_, &level)| level == self.depth)
            .map_or(0, |(q, _)| q);
        u32::try_from(deepest).unwrap_or(0)
    }
}

/// State of the position being extended.
#[derive(Debug, Clone)]
struct Position {
    region: CouplingMap,
    mapping: Permutation,
    fronts: Vec<(u32, u32)>,
}

/// A glink accepted into the chain, with what is needed to undo it.
struct Accepted {
    position: Position,
    layer: GateLayer,
    glink: Glink,
    tally_before: Tally,
}

/// Generate a chain on `graph` for `opt_type` until `target` is met.
///
/// `mean_subgraph_size` is the mean region edge count. All randomness comes
/// from `rng`, so a seeded generator makes the chain reproducible.
#[instrument(skip(graph, config, rng), fields(arch = %graph.name()))]
pub fn generate_chain<R: Rng + ?Sized>(
    graph: &CouplingMap,
    opt_type: OptType,
    target: Target,
    mean_subgraph_size: f64,
    config: &Config,
    rng: &mut R,
) -> BenchResult<Chain> {
    config.validate()?;
    graph
        .validate()
        .map_err(|e| BenchError::InvalidGraph(e.to_string()))?;

    let num_qubits = graph.num_qubits() as usize;
    let init_map = Permutation::random(graph.num_qubits(), rng);
    let mut current = Position {
        region: head_region(graph, mean_subgraph_size, config, rng)?,
        mapping: init_map.clone(),
        fronts: Vec::new(),
    };
    let mut tally = Tally::new(num_qubits);
    let mut accepted: Vec<Accepted> = Vec::new();
    let mut failures = 0usize;

    let terminal = loop {
        let mut layer = sample_layer(
            &current.region,
            &current.mapping,
            &current.fronts,
            opt_type,
            config,
            rng,
        );
        let mut after = tally.clone();
        after.extend(&layer.gates);

        let reached = match target {
            Target::GateSize(n) => after.gates >= n,
            Target::Depth(d) => after.depth >= d,
            Target::Cost(c) => tally.cost >= c,
        };
        if reached {
            finish_layer(&mut layer, &tally, target, config, rng);
            break layer;
        }

        let query = GlinkQuery {
            graph,
            region: &current.region,
            pi_before: &current.mapping,
            opt_type,
            max_swaps: match target {
                Target::Cost(c) => Some(c - tally.cost),
                _ => None,
            },
            mean_subgraph_size,
        };
        match find_glink(&query, config, rng) {
            Ok(step) => {
                let fits = match target {
                    Target::GateSize(n) => after.gates + step.front_pairs.len() <= n,
                    Target::Depth(d) => {
                        let mut tentative = after.clone();
                        tentative.extend(&front_gates(&step.front_pairs, config));
                        tentative.depth <= d
                    }
                    Target::Cost(_) => true,
                };
                if !fits {
                    debug!(glinks = accepted.len(), "next front gates overshoot, closing chain");
                    finish_layer(&mut layer, &tally, target, config, rng);
                    break layer;
                }

                after.cost += step.glink.cost(opt_type);
                debug!(
                    position = accepted.len(),
                    swaps = step.glink.swaps.len(),
                    cost = after.cost,
                    gates = after.gates,
                    depth = after.depth,
                    "glink accepted"
                );
                let next = Position {
                    region: step.next_region,
                    mapping: step.glink.pi_after.clone(),
                    fronts: step.front_pairs,
                };
                accepted.push(Accepted {
                    position: std::mem::replace(&mut current, next),
                    layer,
                    glink: step.glink,
                    tally_before: std::mem::replace(&mut tally, after),
                });
            }
            Err(BenchError::GlinkVerificationFailed { attempts }) => {
                failures += 1;
                if failures > config.max_chain_failures {
                    return Err(BenchError::GlinkSearchExhausted {
                        graph: graph.name().to_string(),
                        mean_subgraph_size,
                        failures,
                        glinks: accepted.len(),
                    });
                }
                match accepted.pop() {
                    Some(previous) => {
                        debug!(attempts, position = accepted.len(), "no glink found, backtracking");
                        current = previous.position;
                        tally = previous.tally_before;
                    }
                    None => {
                        debug!(attempts, "no glink from the head region, regrowing it");
                        current.region = head_region(graph, mean_subgraph_size, config, rng)?;
                    }
                }
            }
            Err(e) => return Err(e),
        }
    };

    let mut glinks = Vec::with_capacity(accepted.len());
    let mut layers = Vec::with_capacity(accepted.len() + 1);
    for entry in accepted {
        glinks.push(entry.glink);
        layers.push(entry.layer);
    }
    layers.push(terminal);

    let chain = Chain {
        opt_type,
        target,
        init_map,
        glinks,
        layers,
    };
    chain.verify()?;

    info!(
        glinks = chain.glinks.len(),
        cost = chain.cost(),
        gates = chain.gate_size(),
        failures,
        "chain generated"
    );
    Ok(chain)
}

fn head_region<R: Rng + ?Sized>(
    graph: &CouplingMap,
    mean_subgraph_size: f64,
    config: &Config,
    rng: &mut R,
) -> BenchResult<CouplingMap> {
    random_connected_subgraph(
        graph,
        mean_subgraph_size,
        config.subgraph_size_std,
        config.subgraph_retry_limit,
        rng,
    )
}

fn front_gates(pairs: &[(u32, u32)], config: &Config) -> Vec<Instruction> {
    pairs
        .iter()
        .map(|&(a, b)| Instruction::two_qubit_gate(config.two_qubit_gate, QubitId(a), QubitId(b)))
        .collect()
}

/// Cut or pad the last layer so the target is met exactly.
///
/// `before` holds the totals of all earlier layers. Front gates always fit,
/// since the glink that produced them was only accepted if they did.
fn finish_layer<R: Rng + ?Sized>(
    layer: &mut GateLayer,
    before: &Tally,
    target: Target,
    config: &Config,
    rng: &mut R,
) {
    match target {
        Target::GateSize(n) => {
            let remaining = n.saturating_sub(before.gates);
            if layer.len() > remaining {
                layer.truncate(remaining);
            } else {
                pad_layer(layer, remaining - layer.len(), config, rng);
            }
        }
        Target::Depth(d) => {
            let num_front = layer.num_front;
            let mut tentative = before.clone();
            let mut kept = Vec::with_capacity(layer.len());
            for (i, gate) in layer.gates.drain(..).enumerate() {
                if i < num_front || tentative.level_after(&gate) <= d {
                    tentative.push(&gate);
                    kept.push(gate);
                }
            }
            while tentative.depth < d {
                let gate = Instruction::single_qubit_gate(
                    config.one_qubit_gate,
                    QubitId(tentative.deepest_wire()),
                );
                tentative.push(&gate);
                kept.push(gate);
            }
            layer.gates = kept;
        }
        Target::Cost(_) => {}
    }
}
