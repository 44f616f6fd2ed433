//! DAG-based circuit representation.

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex as PetNodeIndex};
use petgraph::visit::EdgeRef;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::instruction::{Instruction, InstructionKind};
use crate::qubit::QubitId;

/// Node index type for the circuit DAG.
pub type NodeIndex = PetNodeIndex<u32>;

/// A node in the circuit DAG.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DagNode {
    /// Input node for a qubit wire.
    In(QubitId),
    /// Output node for a qubit wire.
    Out(QubitId),
    /// Operation node containing an instruction.
    Op(Instruction),
}

impl DagNode {
    /// Get the instruction if this is an operation node.
    #[inline]
    pub fn instruction(&self) -> Option<&Instruction> {
        match self {
            DagNode::Op(inst) => Some(inst),
            _ => None,
        }
    }
}

/// An edge in the circuit DAG, carrying the qubit wire it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DagEdge {
    /// The wire this edge represents.
    pub wire: QubitId,
}

/// The abstraction level of a circuit.
///
/// Synthesized benchmarks are `Logical`. The reference router lowers them to
/// `Physical`, where every qubit id is a node of the coupling graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CircuitLevel {
    /// Logical level: qubits are abstract, no physical mapping applied.
    #[default]
    Logical,
    /// Physical level: qubits are mapped to physical device positions.
    Physical,
}

/// DAG-based circuit representation.
///
/// Nodes are input, output or operation nodes; edges are qubit wires.
/// Operations are only ever appended, so node indices grow in insertion
/// order and every operation's predecessors have smaller indices. Both
/// [`CircuitDag::ops`] and [`CircuitDag::depth`] rely on that ordering.
///
/// The DAG keeps a `wire_front` index mapping each wire to the node just
/// before its output node, which makes `apply()` O(1) per operand.
#[derive(Debug, Clone, Default)]
pub struct CircuitDag {
    graph: DiGraph<DagNode, DagEdge, u32>,
    qubit_inputs: FxHashMap<QubitId, NodeIndex>,
    qubit_outputs: FxHashMap<QubitId, NodeIndex>,
    wire_front: FxHashMap<QubitId, NodeIndex>,
    level: CircuitLevel,
}

impl CircuitDag {
    /// Create a new empty circuit DAG.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a qubit to the circuit. Adding an existing qubit is a no-op.
    pub fn add_qubit(&mut self, qubit: QubitId) {
        if self.qubit_inputs.contains_key(&qubit) {
            return;
        }
        let in_node = self.graph.add_node(DagNode::In(qubit));
        let out_node = self.graph.add_node(DagNode::Out(qubit));
        self.graph.add_edge(in_node, out_node, DagEdge { wire: qubit });
        self.qubit_inputs.insert(qubit, in_node);
        self.qubit_outputs.insert(qubit, out_node);
        self.wire_front.insert(qubit, in_node);
    }

    /// Append an instruction to the circuit.
    #[allow(clippy::cast_possible_truncation)]
    pub fn apply(&mut self, instruction: Instruction) -> IrResult<NodeIndex> {
        let gate_name = instruction.as_gate().map(|g| g.name().to_string());

        if let InstructionKind::Gate(gate) = instruction.kind {
            let expected = gate.num_qubits() as usize;
            let got = instruction.qubits.len();
            if expected != got {
                return Err(IrError::QubitCountMismatch {
                    gate_name: gate.name().to_string(),
                    expected: expected as u32,
                    got: got as u32,
                });
            }
        }

        for &qubit in &instruction.qubits {
            if !self.qubit_inputs.contains_key(&qubit) {
                return Err(IrError::QubitNotFound {
                    qubit,
                    gate_name: gate_name.clone(),
                });
            }
        }

        let mut seen = FxHashSet::default();
        for &qubit in &instruction.qubits {
            if !seen.insert(qubit) {
                return Err(IrError::DuplicateQubit {
                    qubit,
                    gate_name: gate_name.clone(),
                });
            }
        }

        let qubits = instruction.qubits.clone();
        let op_node = self.graph.add_node(DagNode::Op(instruction));

        for qubit in qubits {
            let out_node = self.qubit_outputs[&qubit];
            let prev_node = self.wire_front[&qubit];

            let eid = self
                .graph
                .edges_directed(prev_node, Direction::Outgoing)
                .find(|e| e.weight().wire == qubit && e.target() == out_node)
                .map(|e| e.id())
                .ok_or_else(|| {
                    IrError::InvalidDag(format!(
                        "Missing edge from predecessor to output for qubit wire {qubit:?}"
                    ))
                })?;
            self.graph.remove_edge(eid);
            self.graph.add_edge(prev_node, op_node, DagEdge { wire: qubit });
            self.graph.add_edge(op_node, out_node, DagEdge { wire: qubit });
            self.wire_front.insert(qubit, op_node);
        }

        Ok(op_node)
    }

    /// Iterate over operations in the order they were applied.
    ///
    /// Insertion order is a valid topological order of the DAG.
    pub fn ops(&self) -> impl Iterator<Item = (NodeIndex, &Instruction)> {
        self.graph
            .node_indices()
            .filter_map(|idx| self.graph[idx].instruction().map(|inst| (idx, inst)))
    }

    /// Get the number of qubits.
    #[inline]
    pub fn num_qubits(&self) -> usize {
        self.qubit_inputs.len()
    }

    /// Get the number of operations, barriers included.
    #[inline]
    pub fn num_ops(&self) -> usize {
        self.graph
            .node_count()
            .saturating_sub(2 * self.qubit_inputs.len())
    }

    /// Number of gate operations (barriers excluded).
    pub fn num_gates(&self) -> usize {
        self.ops().filter(|(_, inst)| inst.is_gate()).count()
    }

    /// Number of two-qubit gate operations.
    pub fn num_two_qubit_gates(&self) -> usize {
        self.ops().filter(|(_, inst)| inst.is_two_qubit_gate()).count()
    }

    /// Count operations by name.
    pub fn count_ops(&self) -> FxHashMap<&'static str, usize> {
        let mut counts = FxHashMap::default();
        for (_, inst) in self.ops() {
            *counts.entry(inst.name()).or_insert(0) += 1;
        }
        counts
    }

    /// Calculate the circuit depth.
    ///
    /// Barriers synchronize the wires they touch but do not add a layer.
    pub fn depth(&self) -> usize {
        let mut depths: Vec<usize> = vec![0; self.graph.node_count()];
        let mut max_depth = 0usize;

        for node in self.graph.node_indices() {
            let max_pred_depth = self
                .graph
                .edges_directed(node, Direction::Incoming)
                .map(|e| depths[e.source().index()])
                .max()
                .unwrap_or(0);

            let node_depth = match &self.graph[node] {
                DagNode::Op(inst) if inst.is_gate() => max_pred_depth + 1,
                _ => max_pred_depth,
            };

            max_depth = max_depth.max(node_depth);
            depths[node.index()] = node_depth;
        }

        max_depth
    }

    /// Iterate over qubits in ascending id order.
    pub fn qubits(&self) -> impl Iterator<Item = QubitId> + '_ {
        let mut ids: Vec<_> = self.qubit_inputs.keys().copied().collect();
        ids.sort_unstable();
        ids.into_iter()
    }

    /// Get the abstraction level of this circuit.
    pub fn level(&self) -> CircuitLevel {
        self.level
    }

    /// Set the abstraction level of this circuit.
    pub fn set_level(&mut self, level: CircuitLevel) {
        self.level = level;
    }

    /// Get a reference to the underlying graph.
    pub fn graph(&self) -> &DiGraph<DagNode, DagEdge, u32> {
        &self.graph
    }

    /// Verify the structural integrity of the DAG.
    ///
    /// Checks that the graph is acyclic and that every qubit wire forms an
    /// unbroken path from its In node to its Out node.
    pub fn verify_integrity(&self) -> IrResult<()> {
        if petgraph::algo::is_cyclic_directed(&self.graph) {
            return Err(IrError::InvalidDag("Graph contains a cycle".into()));
        }

        for (&qubit, &in_node) in &self.qubit_inputs {
            let out_node = self.qubit_outputs.get(&qubit).copied().ok_or_else(|| {
                IrError::InvalidDag(format!("Qubit {qubit:?} has an In node but no Out node"))
            })?;

            let mut current = in_node;
            let mut steps = 0;
            let max_steps = self.graph.node_count();

            while current != out_node {
                current = self
                    .graph
                    .edges_directed(current, Direction::Outgoing)
                    .find(|e| e.weight().wire == qubit)
                    .map(|e| e.target())
                    .ok_or_else(|| {
                        IrError::InvalidDag(format!(
                            "Wire for qubit {qubit:?} is broken: no outgoing edge from node {current:?}"
                        ))
                    })?;

                steps += 1;
                if steps > max_steps {
                    return Err(IrError::InvalidDag(format!(
                        "Wire for qubit {qubit:?} has too many steps (possible infinite loop)"
                    )));
                }
            }
        }

        Ok(())
    }
}
