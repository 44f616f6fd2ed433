//! QASM emitter for serializing circuits.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use quekno_ir::{Circuit, Instruction, InstructionKind, QubitId};

use crate::error::{EmitError, EmitResult};

/// Output dialect.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum QasmVersion {
    /// `OPENQASM 2.0` with `qelib1.inc`, as read by most routing tools.
    #[default]
    #[serde(rename = "2")]
    V2,
    /// `OPENQASM 3.0` with `stdgates.inc`.
    #[serde(rename = "3")]
    V3,
}

impl fmt::Display for QasmVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::V2 => f.write_str("2.0"),
            Self::V3 => f.write_str("3.0"),
        }
    }
}

impl FromStr for QasmVersion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "2" | "2.0" => Ok(Self::V2),
            "3" | "3.0" => Ok(Self::V3),
            other => Err(format!("unknown OpenQASM version '{other}' (expected 2 or 3)")),
        }
    }
}

/// Emit a circuit as QASM3 source code.
pub fn emit(circuit: &Circuit) -> EmitResult<String> {
    Emitter::new(QasmVersion::V3).emit_circuit(circuit)
}

/// Emit a circuit as QASM 2.0 source code.
///
/// Register declarations use the QASM2 style (`qreg q[n];`), which is what
/// published routing benchmarks and most routers read.
pub fn emit_qasm2(circuit: &Circuit) -> EmitResult<String> {
    Emitter::new(QasmVersion::V2).emit_circuit(circuit)
}

/// Emit a circuit in the given dialect.
pub fn emit_with(circuit: &Circuit, version: QasmVersion) -> EmitResult<String> {
    Emitter::new(version).emit_circuit(circuit)
}

/// Emit a circuit and write it to `path`.
pub fn write_qasm(path: &Path, circuit: &Circuit, version: QasmVersion) -> EmitResult<()> {
    let source = emit_with(circuit, version)?;
    std::fs::write(path, source).map_err(|source| EmitError::Io {
        path: path.to_path_buf(),
        source,
    })
}

struct Emitter {
    version: QasmVersion,
    output: String,
}

impl Emitter {
    fn new(version: QasmVersion) -> Self {
        Self {
            version,
            output: String::new(),
        }
    }

    fn emit_circuit(mut self, circuit: &Circuit) -> EmitResult<String> {
        match self.version {
            QasmVersion::V2 => {
                self.writeln("OPENQASM 2.0;");
                self.writeln("include \"qelib1.inc\";");
            }
            QasmVersion::V3 => {
                self.writeln("OPENQASM 3.0;");
                self.writeln("include \"stdgates.inc\";");
            }
        }
        self.writeln("");

        let num_qubits = circuit.num_qubits();
        if num_qubits > 0 {
            match self.version {
                QasmVersion::V2 => self.writeln(&format!("qreg q[{num_qubits}];")),
                QasmVersion::V3 => self.writeln(&format!("qubit[{num_qubits}] q;")),
            }
            self.writeln("");
        }

        for instruction in circuit.instructions() {
            self.emit_instruction(instruction, num_qubits)?;
        }

        Ok(self.output)
    }

    fn emit_instruction(&mut self, instruction: &Instruction, num_qubits: usize) -> EmitResult<()> {
        if let Some(q) = instruction.qubits.iter().find(|q| q.index() >= num_qubits) {
            return Err(EmitError::QubitOutOfRange {
                qubit: q.0,
                num_qubits,
            });
        }

        let qubits = emit_qubits(&instruction.qubits);
        match &instruction.kind {
            InstructionKind::Gate(gate) => {
                self.writeln(&format!("{} {qubits};", gate.name()));
            }
            InstructionKind::Barrier => {
                // A full-width barrier reads better as the register name.
                if instruction.qubits.len() == num_qubits {
                    self.writeln("barrier q;");
                } else {
                    self.writeln(&format!("barrier {qubits};"));
                }
            }
        }
        Ok(())
    }

    fn writeln(&mut self, line: &str) {
        self.output.push_str(line);
        self.output.push('\n');
    }
}

fn emit_qubits(qubits: &[QubitId]) -> String {
    qubits
        .iter()
        .map(|q| format!("q[{}]", q.0))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use quekno_ir::StandardGate;

    fn layer() -> Circuit {
        let mut circuit = Circuit::with_size("layer", 3);
        circuit.h(QubitId(0)).unwrap();
        circuit.cx(QubitId(0), QubitId(1)).unwrap();
        circuit.barrier_all().unwrap();
        circuit.cx(QubitId(2), QubitId(1)).unwrap();
        circuit
    }

    #[test]
    fn test_emit_qasm3() {
        let qasm = emit(&layer()).unwrap();

        assert!(qasm.starts_with("OPENQASM 3.0;\n"));
        assert!(qasm.contains("qubit[3] q;"));
        assert!(qasm.contains("h q[0];"));
        assert!(qasm.contains("cx q[0], q[1];"));
        assert!(qasm.contains("barrier q;"));
        assert!(qasm.contains("cx q[2], q[1];"));
    }

    #[test]
    fn test_emit_qasm2() {
        let qasm = emit_qasm2(&layer()).unwrap();

        assert!(qasm.contains("OPENQASM 2.0;"));
        assert!(qasm.contains("include \"qelib1.inc\";"));
        assert!(qasm.contains("qreg q[3];"));
        assert!(!qasm.contains("qubit["));
        assert!(!qasm.contains("OPENQASM 3.0;"));
    }

    #[test]
    fn test_gate_order_is_kept() {
        let qasm = emit_qasm2(&layer()).unwrap();
        let body: Vec<&str> = qasm.lines().skip(5).collect();
        assert_eq!(
            body,
            vec!["h q[0];", "cx q[0], q[1];", "barrier q;", "cx q[2], q[1];"]
        );
    }

    #[test]
    fn test_partial_barrier() {
        let mut circuit = Circuit::with_size("partial", 3);
        circuit.barrier([QubitId(0), QubitId(2)]).unwrap();
        let qasm = emit(&circuit).unwrap();
        assert!(qasm.contains("barrier q[0], q[2];"));
    }

    #[test]
    fn test_configured_gate_names() {
        let mut circuit = Circuit::with_size("cz", 2);
        circuit.gate(StandardGate::SX, [QubitId(1)]).unwrap();
        circuit.cz(QubitId(1), QubitId(0)).unwrap();
        let qasm = emit_qasm2(&circuit).unwrap();
        assert!(qasm.contains("sx q[1];"));
        assert!(qasm.contains("cz q[1], q[0];"));
    }

    #[test]
    fn test_version_parsing() {
        assert_eq!("2".parse::<QasmVersion>().unwrap(), QasmVersion::V2);
        assert_eq!("3.0".parse::<QasmVersion>().unwrap(), QasmVersion::V3);
        assert!("4".parse::<QasmVersion>().is_err());
        assert_eq!(QasmVersion::default(), QasmVersion::V2);
    }
}
