//! High-level circuit builder API.

use rustc_hash::FxHashMap;

use crate::dag::CircuitDag;
use crate::error::IrResult;
use crate::gate::StandardGate;
use crate::instruction::Instruction;
use crate::qubit::QubitId;

/// A quantum circuit.
///
/// A thin builder over [`CircuitDag`] with convenience methods for the
/// gates benchmark layers are made of.
#[derive(Debug, Clone)]
pub struct Circuit {
    name: String,
    num_qubits: u32,
    dag: CircuitDag,
}

impl Circuit {
    /// Create a circuit over qubits `0..num_qubits`.
    pub fn with_size(name: impl Into<String>, num_qubits: u32) -> Self {
        let mut dag = CircuitDag::new();
        for q in 0..num_qubits {
            dag.add_qubit(QubitId(q));
        }
        Self {
            name: name.into(),
            num_qubits,
            dag,
        }
    }

    /// Append an arbitrary instruction.
    pub fn apply(&mut self, instruction: Instruction) -> IrResult<&mut Self> {
        self.dag.apply(instruction)?;
        Ok(self)
    }

    /// Apply a standard gate.
    pub fn gate(
        &mut self,
        gate: StandardGate,
        qubits: impl IntoIterator<Item = QubitId>,
    ) -> IrResult<&mut Self> {
        self.dag.apply(Instruction::gate(gate, qubits))?;
        Ok(self)
    }

    /// Apply Hadamard gate.
    pub fn h(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.dag
            .apply(Instruction::single_qubit_gate(StandardGate::H, qubit))?;
        Ok(self)
    }

    /// Apply Pauli-X gate.
    pub fn x(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.dag
            .apply(Instruction::single_qubit_gate(StandardGate::X, qubit))?;
        Ok(self)
    }

    /// Apply CNOT gate.
    pub fn cx(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.dag.apply(Instruction::two_qubit_gate(
            StandardGate::CX,
            control,
            target,
        ))?;
        Ok(self)
    }

    /// Apply CZ gate.
    pub fn cz(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.dag.apply(Instruction::two_qubit_gate(
            StandardGate::CZ,
            control,
            target,
        ))?;
        Ok(self)
    }

    /// Apply SWAP gate.
    pub fn swap(&mut self, q1: QubitId, q2: QubitId) -> IrResult<&mut Self> {
        self.dag
            .apply(Instruction::two_qubit_gate(StandardGate::Swap, q1, q2))?;
        Ok(self)
    }

    /// Apply a barrier to specified qubits.
    pub fn barrier(&mut self, qubits: impl IntoIterator<Item = QubitId>) -> IrResult<&mut Self> {
        self.dag.apply(Instruction::barrier(qubits))?;
        Ok(self)
    }

    /// Apply a barrier to all qubits.
    pub fn barrier_all(&mut self) -> IrResult<&mut Self> {
        self.dag
            .apply(Instruction::barrier((0..self.num_qubits).map(QubitId)))?;
        Ok(self)
    }

    /// Get the circuit name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits as usize
    }

    /// Get the circuit depth.
    pub fn depth(&self) -> usize {
        self.dag.depth()
    }

    /// Number of gates, barriers excluded.
    pub fn size(&self) -> usize {
        self.dag.num_gates()
    }

    /// Number of two-qubit gates.
    pub fn num_two_qubit_gates(&self) -> usize {
        self.dag.num_two_qubit_gates()
    }

    /// Count operations by name.
    pub fn count_ops(&self) -> FxHashMap<&'static str, usize> {
        self.dag.count_ops()
    }

    /// Iterate over instructions in the order they were applied.
    pub fn instructions(&self) -> impl Iterator<Item = &Instruction> {
        self.dag.ops().map(|(_, inst)| inst)
    }

    /// Get a reference to the underlying DAG.
    pub fn dag(&self) -> &CircuitDag {
        &self.dag
    }

    /// Consume the circuit and return the DAG.
    pub fn into_dag(self) -> CircuitDag {
        self.dag
    }

    /// Create a circuit from a DAG.
    ///
    /// The qubit count is one past the largest qubit id on the DAG, so
    /// physical circuits keep their device indexing.
    pub fn from_dag(name: impl Into<String>, dag: CircuitDag) -> Self {
        let num_qubits = dag.qubits().map(|q| q.0 + 1).max().unwrap_or(0);
        Self {
            name: name.into(),
            num_qubits,
            dag,
        }
    }
}
