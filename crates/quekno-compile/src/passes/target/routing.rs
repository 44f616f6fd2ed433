//! Routing passes for inserting SWAP gates.

use tracing::{debug, trace};

use quekno_ir::{CircuitDag, CircuitLevel, Instruction, QubitId, StandardGate};

use crate::error::{CompileError, CompileResult};
use crate::pass::{Pass, PassKind};
use crate::property::{Layout, PropertySet};

/// Statistics recorded by [`BasicRouting`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RoutingStats {
    /// Number of SWAP gates inserted.
    pub swaps_inserted: usize,
}

/// Basic routing pass.
///
/// Walks the circuit in order and, whenever a two-qubit gate acts on
/// uncoupled physical qubits, moves the first operand along a shortest path
/// until it neighbours the second one. The output DAG is over physical
/// qubits; the layout in the `PropertySet` ends as the final mapping.
///
/// The greedy strategy gives an upper bound on the routing cost, never the
/// optimum.
pub struct BasicRouting;

impl Pass for BasicRouting {
    fn name(&self) -> &str {
        "BasicRouting"
    }

    fn kind(&self) -> PassKind {
        PassKind::Transformation
    }

    fn run(&self, dag: &mut CircuitDag, properties: &mut PropertySet) -> CompileResult<()> {
        let coupling_map = properties
            .coupling_map
            .as_ref()
            .ok_or(CompileError::MissingCouplingMap)?;

        let layout = properties
            .layout
            .as_mut()
            .ok_or(CompileError::MissingLayout)?;

        let mut routed = CircuitDag::new();
        for p in 0..coupling_map.num_qubits() {
            routed.add_qubit(QubitId(p));
        }
        routed.set_level(CircuitLevel::Physical);

        let mut swaps_inserted = 0;

        for (_idx, inst) in dag.ops() {
            if inst.is_two_qubit_gate() {
                let p0 = physical(layout, inst.qubits[0])?;
                let p1 = physical(layout, inst.qubits[1])?;

                if !coupling_map.has_edge(p0, p1) {
                    let path =
                        coupling_map
                            .shortest_path(p0, p1)
                            .ok_or(CompileError::RoutingFailed {
                                qubit1: p0,
                                qubit2: p1,
                            })?;
                    trace!("routing {} via {:?}", inst.name(), path);

                    // Walk the first operand up to the last hop.
                    for hop in path.windows(2).take(path.len().saturating_sub(2)) {
                        routed.apply(Instruction::two_qubit_gate(
                            StandardGate::Swap,
                            QubitId(hop[0]),
                            QubitId(hop[1]),
                        ))?;
                        layout.swap(hop[0], hop[1]);
                        swaps_inserted += 1;
                    }
                }
            }

            let mut mapped = Vec::with_capacity(inst.qubits.len());
            for &q in &inst.qubits {
                mapped.push(QubitId(physical(layout, q)?));
            }
            routed.apply(Instruction {
                kind: inst.kind,
                qubits: mapped,
            })?;
        }

        debug!("BasicRouting inserted {swaps_inserted} swaps");
        *dag = routed;
        properties.insert(RoutingStats { swaps_inserted });
        Ok(())
    }

    fn should_run(&self, _dag: &CircuitDag, properties: &PropertySet) -> bool {
        properties.coupling_map.is_some() && properties.layout.is_some()
    }
}

fn physical(layout: &Layout, qubit: QubitId) -> CompileResult<u32> {
    layout.get_physical(qubit).ok_or(CompileError::MissingLayout)
}
