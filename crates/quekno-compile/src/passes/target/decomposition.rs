//! Decomposition of SWAP gates into the native two-qubit gate.

use quekno_ir::{CircuitDag, Instruction, InstructionKind, StandardGate};

use crate::error::CompileResult;
use crate::pass::{Pass, PassKind};
use crate::property::PropertySet;

/// Replaces every `swap a, b` with `g a, b; g b, a; g a, b`.
///
/// With `g = cx` this is the exact identity; for other two-qubit gates it
/// keeps the gate count and depth of the standard decomposition.
pub struct SwapDecomposition {
    gate: StandardGate,
}

impl SwapDecomposition {
    /// Decompose into CNOTs.
    pub fn new() -> Self {
        Self {
            gate: StandardGate::CX,
        }
    }

    /// Decompose into a different two-qubit gate.
    pub fn with_gate(gate: StandardGate) -> Self {
        Self { gate }
    }
}

impl Default for SwapDecomposition {
    fn default() -> Self {
        Self::new()
    }
}

impl Pass for SwapDecomposition {
    fn name(&self) -> &'static str {
        "SwapDecomposition"
    }

    fn kind(&self) -> PassKind {
        PassKind::Transformation
    }

    fn run(&self, dag: &mut CircuitDag, _properties: &mut PropertySet) -> CompileResult<()> {
        // Rebuild rather than substitute in place so replacements keep
        // their position in the gate order.
        let mut new_dag = CircuitDag::new();
        for qubit in dag.qubits() {
            new_dag.add_qubit(qubit);
        }
        new_dag.set_level(dag.level());

        for (_idx, inst) in dag.ops() {
            if inst.kind == InstructionKind::Gate(StandardGate::Swap) {
                let (a, b) = (inst.qubits[0], inst.qubits[1]);
                new_dag.apply(Instruction::two_qubit_gate(self.gate, a, b))?;
                new_dag.apply(Instruction::two_qubit_gate(self.gate, b, a))?;
                new_dag.apply(Instruction::two_qubit_gate(self.gate, a, b))?;
            } else {
                new_dag.apply(inst.clone())?;
            }
        }

        *dag = new_dag;
        Ok(())
    }

    fn should_run(&self, dag: &CircuitDag, _properties: &PropertySet) -> bool {
        dag.ops()
            .any(|(_, inst)| inst.as_gate() == Some(StandardGate::Swap))
    }
}
