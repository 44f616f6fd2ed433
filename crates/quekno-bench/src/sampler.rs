//! Gate-layer sampling.
//!
//! Every layer belongs to one region and one mapping. Its two-qubit gates act
//! on logical pairs that the mapping places on region edges, so the whole
//! layer runs without swaps once the mapping is in place.
//!
//! A layer is laid out as
//!
//! ```text
//! [ front gates ][ back gates, shuffled ]
//! ```
//!
//! Front gates are the pairs that forced the preceding glink. Back gates
//! cover every region edge at least once, plus `m * k * n` extra edge draws
//! (`k = rand_edges_var`, `n` uniform in `1..=4`), and
//! `ceil((fronts + back_2q) * qbg_ratio)` one-qubit gates on region qubits.

use rand::Rng;
use rand::seq::SliceRandom;
use rustc_hash::FxHashSet;
use tracing::debug;

use quekno_compile::CouplingMap;
use quekno_ir::{Instruction, QubitId};

use crate::config::{Config, OptType};
use crate::permutation::Permutation;

/// Gates sampled for one region under one mapping.
#[derive(Debug, Clone)]
pub struct GateLayer {
    pub region: CouplingMap,
    /// Logical to physical mapping the layer is laid out under.
    pub mapping: Permutation,
    /// Gates on logical qubits, fronts first.
    pub gates: Vec<Instruction>,
    /// Number of leading front gates.
    pub num_front: usize,
    /// Two-qubit back gates drawn, before any truncation.
    pub multiplicity: usize,
}

impl GateLayer {
    pub fn len(&self) -> usize {
        self.gates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gates.is_empty()
    }

    pub fn num_two_qubit_gates(&self) -> usize {
        self.gates.iter().filter(|g| g.is_two_qubit_gate()).count()
    }

    pub fn num_one_qubit_gates(&self) -> usize {
        self.gates.len() - self.num_two_qubit_gates()
    }

    /// Whether every two-qubit gate sits on a region edge under the mapping.
    pub fn is_contained(&self) -> bool {
        self.gates
            .iter()
            .filter(|g| g.is_two_qubit_gate())
            .all(|g| {
                let p = self.mapping.apply(g.qubits[0].0);
                let q = self.mapping.apply(g.qubits[1].0);
                self.region.has_edge(p, q)
            })
    }

    /// Keep the first `len` gates. Front gates are never dropped.
    pub fn truncate(&mut self, len: usize) {
        self.gates.truncate(len.max(self.num_front));
    }
}

/// Sample the layer for `region` under `mapping`.
///
/// `front_pairs` are logical pairs that must come first; they must map onto
/// region edges.
pub fn sample_layer<R: Rng + ?Sized>(
    region: &CouplingMap,
    mapping: &Permutation,
    front_pairs: &[(u32, u32)],
    opt_type: OptType,
    config: &Config,
    rng: &mut R,
) -> GateLayer {
    let inv = mapping.inverse();
    let edges = region.edges();
    let nodes = region.active_qubits();

    let multiplicity = edge_multiplicity(edges.len(), config.rand_edges_var, rng);

    let mut back: Vec<Instruction> = Vec::with_capacity(multiplicity * 3);
    for &(p, q) in edges {
        back.push(two_qubit(config, &inv, (p, q)));
    }
    for _ in edges.len()..multiplicity {
        if let Some(&edge) = edges.choose(rng) {
            back.push(two_qubit(config, &inv, edge));
        }
    }

    let one_qubit = one_qubit_count(front_pairs.len() + multiplicity, config.qbg_ratio);
    for _ in 0..one_qubit {
        if let Some(&node) = nodes.choose(rng) {
            back.push(Instruction::single_qubit_gate(
                config.one_qubit_gate,
                QubitId(inv.apply(node)),
            ));
        }
    }
    back.shuffle(rng);
    if opt_type == OptType::Depth {
        back = pack_time_steps(back);
    }

    let mut gates: Vec<Instruction> = front_pairs
        .iter()
        .map(|&(a, b)| Instruction::two_qubit_gate(config.two_qubit_gate, QubitId(a), QubitId(b)))
        .collect();
    gates.extend(back);

    GateLayer {
        region: region.clone(),
        mapping: mapping.clone(),
        gates,
        num_front: front_pairs.len(),
        multiplicity,
    }
}

/// Append `count` extra gates drawn from the region, keeping the layer's ratio.
pub fn pad_layer<R: Rng + ?Sized>(layer: &mut GateLayer, count: usize, config: &Config, rng: &mut R) {
    let inv = layer.mapping.inverse();
    let edges = layer.region.edges().to_vec();
    let nodes = layer.region.active_qubits();
    let two_qubit_share = 1.0 / (1.0 + config.qbg_ratio);

    for _ in 0..count {
        let gate = if rng.gen_bool(two_qubit_share) {
            edges.choose(rng).map(|&e| two_qubit(config, &inv, e))
        } else {
            nodes.choose(rng).map(|&node| {
                Instruction::single_qubit_gate(config.one_qubit_gate, QubitId(inv.apply(node)))
            })
        };
        if let Some(gate) = gate {
            layer.gates.push(gate);
        }
    }
}

/// `round(m * (1 + k * n))` with `n` uniform in `1..=4`, never below `m` or 1.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn edge_multiplicity<R: Rng + ?Sized>(num_edges: usize, rand_edges_var: f64, rng: &mut R) -> usize {
    let n: u32 = rng.gen_range(1..=4);
    let drawn = (num_edges as f64 * (1.0 + rand_edges_var * f64::from(n))).round();
    let floor = num_edges.max(1);
    if !drawn.is_finite() || drawn < floor as f64 {
        debug!(num_edges, drawn, "clamping edge multiplicity to {floor}");
        floor
    } else {
        drawn as usize
    }
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn one_qubit_count(two_qubit: usize, ratio: f64) -> usize {
    (two_qubit as f64 * ratio).ceil() as usize
}

fn two_qubit(config: &Config, inv: &Permutation, (p, q): (u32, u32)) -> Instruction {
    Instruction::two_qubit_gate(
        config.two_qubit_gate,
        QubitId(inv.apply(p)),
        QubitId(inv.apply(q)),
    )
}

/// Reorder gates into consecutive groups acting on disjoint qubits.
///
/// Each pass sweeps the remaining gates in order and takes every gate whose
/// qubits are still free in the current step. Gates on a shared qubit keep
/// their relative order.
fn pack_time_steps(gates: Vec<Instruction>) -> Vec<Instruction> {
    let mut remaining = gates;
    let mut packed = Vec::with_capacity(remaining.len());
    while !remaining.is_empty() {
        let mut busy: FxHashSet<QubitId> = FxHashSet::default();
        let mut blocked: FxHashSet<QubitId> = FxHashSet::default();
        let mut rest = Vec::new();
        for gate in remaining {
            let free = gate
                .qubits
                .iter()
                .all(|q| !busy.contains(q) && !blocked.contains(q));
            if free {
                busy.extend(gate.qubits.iter().copied());
                packed.push(gate);
            } else {
                blocked.extend(gate.qubits.iter().copied());
                rest.push(gate);
            }
        }
        remaining = rest;
    }
    packed
}
