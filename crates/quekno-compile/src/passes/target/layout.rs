//! Layout passes for mapping logical qubits to physical qubits.

use quekno_ir::{CircuitDag, CircuitLevel};

use crate::error::{CompileError, CompileResult};
use crate::pass::{Pass, PassKind};
use crate::property::{CouplingMap, Layout, PropertySet};

fn check_fits(dag: &CircuitDag, coupling_map: &CouplingMap) -> CompileResult<()> {
    let num_logical = dag.num_qubits();
    if num_logical > coupling_map.num_qubits() as usize {
        return Err(CompileError::CircuitTooLarge {
            required: num_logical,
            available: coupling_map.num_qubits(),
        });
    }
    Ok(())
}

/// Trivial layout pass.
///
/// Maps logical qubit i to physical qubit i. Only runs when no layout has
/// been installed yet.
pub struct TrivialLayout;

impl Pass for TrivialLayout {
    fn name(&self) -> &'static str {
        "TrivialLayout"
    }

    fn kind(&self) -> PassKind {
        PassKind::Analysis
    }

    #[allow(clippy::cast_possible_truncation)]
    fn run(&self, dag: &mut CircuitDag, properties: &mut PropertySet) -> CompileResult<()> {
        let coupling_map = properties
            .coupling_map
            .as_ref()
            .ok_or(CompileError::MissingCouplingMap)?;
        check_fits(dag, coupling_map)?;

        properties.layout = Some(Layout::trivial(dag.num_qubits() as u32));
        dag.set_level(CircuitLevel::Physical);
        Ok(())
    }

    fn should_run(&self, _dag: &CircuitDag, properties: &PropertySet) -> bool {
        properties.layout.is_none() && properties.coupling_map.is_some()
    }
}

/// Installs a caller-chosen initial layout.
///
/// The benchmark accountant uses this to route a synthesized circuit from
/// the chain's initial mapping.
pub struct FixedLayout(pub Layout);

impl Pass for FixedLayout {
    fn name(&self) -> &'static str {
        "FixedLayout"
    }

    fn kind(&self) -> PassKind {
        PassKind::Analysis
    }

    fn run(&self, dag: &mut CircuitDag, properties: &mut PropertySet) -> CompileResult<()> {
        let coupling_map = properties
            .coupling_map
            .as_ref()
            .ok_or(CompileError::MissingCouplingMap)?;
        check_fits(dag, coupling_map)?;

        for qubit in dag.qubits() {
            match self.0.get_physical(qubit) {
                Some(p) if p < coupling_map.num_qubits() => {}
                _ => return Err(CompileError::MissingLayout),
            }
        }

        properties.layout = Some(self.0.clone());
        dag.set_level(CircuitLevel::Physical);
        Ok(())
    }
}
