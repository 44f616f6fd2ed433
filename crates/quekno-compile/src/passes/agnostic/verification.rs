//! Verification passes for routed circuits.

use tracing::debug;

use quekno_ir::{CircuitDag, CircuitLevel};

use crate::error::{CompileError, CompileResult};
use crate::pass::{Pass, PassKind};
use crate::property::PropertySet;

/// Result of connectivity verification.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectivityReport {
    /// Whether the verification passed.
    pub passed: bool,
    /// Number of two-qubit gates checked.
    pub two_qubit_gates_checked: usize,
}

/// Analysis pass that checks every two-qubit gate of a physical circuit
/// acts on a coupled pair.
///
/// Added last in the reference router so that a routing bug surfaces as an
/// error instead of a silently wrong cost.
pub struct ConnectivityVerification;

impl Pass for ConnectivityVerification {
    fn name(&self) -> &'static str {
        "connectivity_verification"
    }

    fn kind(&self) -> PassKind {
        PassKind::Analysis
    }

    fn run(&self, dag: &mut CircuitDag, properties: &mut PropertySet) -> CompileResult<()> {
        let coupling_map = properties
            .coupling_map
            .as_ref()
            .ok_or(CompileError::MissingCouplingMap)?;

        let mut checked = 0;
        for (_idx, inst) in dag.ops() {
            if !inst.is_two_qubit_gate() {
                continue;
            }
            let (q1, q2) = (inst.qubits[0].0, inst.qubits[1].0);
            if !coupling_map.has_edge(q1, q2) {
                return Err(CompileError::ConnectivityViolation {
                    gate_name: inst.name().to_string(),
                    qubit1: q1,
                    qubit2: q2,
                });
            }
            checked += 1;
        }

        debug!("Connectivity verification passed: {checked} two-qubit gates checked");
        properties.insert(ConnectivityReport {
            passed: true,
            two_qubit_gates_checked: checked,
        });
        Ok(())
    }

    fn should_run(&self, dag: &CircuitDag, properties: &PropertySet) -> bool {
        dag.level() == CircuitLevel::Physical && properties.coupling_map.is_some()
    }
}
