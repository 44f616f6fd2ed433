//! Pass manager for orchestrating compilation.

use tracing::{debug, info, instrument};

use quekno_ir::{CircuitDag, StandardGate};

use crate::error::CompileResult;
use crate::pass::Pass;
use crate::passes::{
    BasicRouting, ConnectivityVerification, FixedLayout, SwapDecomposition, TrivialLayout,
};
use crate::property::{CouplingMap, Layout, PropertySet};

/// Manages and executes a sequence of compilation passes.
pub struct PassManager {
    /// The passes to execute, in order.
    passes: Vec<Box<dyn Pass>>,
}

impl PassManager {
    /// Create a new empty pass manager.
    pub fn new() -> Self {
        Self { passes: vec![] }
    }

    /// Add a pass to the manager.
    pub fn add_pass(&mut self, pass: impl Pass + 'static) {
        self.passes.push(Box::new(pass));
    }

    /// Run all passes on the given DAG.
    #[instrument(skip(self, dag, properties))]
    pub fn run(&self, dag: &mut CircuitDag, properties: &mut PropertySet) -> CompileResult<()> {
        info!(
            "Running pass manager with {} passes on circuit with {} qubits",
            self.passes.len(),
            dag.num_qubits()
        );

        for pass in &self.passes {
            if pass.should_run(dag, properties) {
                debug!("Running pass: {}", pass.name());
                pass.run(dag, properties)?;
                debug!("Pass {} completed, ops: {}", pass.name(), dag.num_ops());
            } else {
                debug!("Skipping pass: {}", pass.name());
            }
        }

        info!(
            "Pass manager completed, final depth: {}, ops: {}",
            dag.depth(),
            dag.num_ops()
        );

        Ok(())
    }

    /// Get the number of passes.
    pub fn len(&self) -> usize {
        self.passes.len()
    }

    /// Check if the manager has no passes.
    pub fn is_empty(&self) -> bool {
        self.passes.is_empty()
    }
}

impl Default for PassManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for creating pass managers with preset configurations.
pub struct PassManagerBuilder {
    properties: PropertySet,
    initial_layout: Option<Layout>,
    decompose_swaps: bool,
    swap_gate: StandardGate,
}

impl PassManagerBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self {
            properties: PropertySet::new(),
            initial_layout: None,
            decompose_swaps: true,
            swap_gate: StandardGate::CX,
        }
    }

    /// The reference router: fixed initial layout, greedy routing, SWAP
    /// decomposition into CNOTs, then a connectivity check.
    pub fn reference_router(coupling_map: CouplingMap, layout: Layout) -> Self {
        Self::new()
            .with_coupling_map(coupling_map)
            .with_initial_layout(layout)
    }

    /// Set the target properties.
    #[must_use]
    pub fn with_properties(mut self, properties: PropertySet) -> Self {
        self.properties = properties;
        self
    }

    /// Set the target coupling map.
    #[must_use]
    pub fn with_coupling_map(mut self, coupling_map: CouplingMap) -> Self {
        self.properties.coupling_map = Some(coupling_map);
        self
    }

    /// Route from this layout instead of the trivial one.
    #[must_use]
    pub fn with_initial_layout(mut self, layout: Layout) -> Self {
        self.initial_layout = Some(layout);
        self
    }

    /// Keep inserted SWAPs as `swap` gates.
    #[must_use]
    pub fn keep_swaps(mut self) -> Self {
        self.decompose_swaps = false;
        self
    }

    /// Decompose inserted SWAPs into this two-qubit gate instead of CX.
    #[must_use]
    pub fn with_swap_gate(mut self, gate: StandardGate) -> Self {
        self.swap_gate = gate;
        self
    }

    /// Build the pass manager and return it with the properties.
    pub fn build(self) -> (PassManager, PropertySet) {
        let mut pm = PassManager::new();

        if self.properties.coupling_map.is_some() {
            match self.initial_layout {
                Some(layout) => pm.add_pass(FixedLayout(layout)),
                None => pm.add_pass(TrivialLayout),
            }
            pm.add_pass(BasicRouting);
            if self.decompose_swaps {
                pm.add_pass(SwapDecomposition::with_gate(self.swap_gate));
            }
            pm.add_pass(ConnectivityVerification);
        }

        (pm, self.properties)
    }
}

impl Default for PassManagerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::passes::{ConnectivityReport, RoutingStats};
    use quekno_ir::{Circuit, QubitId};

    #[test]
    fn test_empty_pass_manager() {
        let pm = PassManager::new();
        assert!(pm.is_empty());
        assert_eq!(pm.len(), 0);
    }

    #[test]
    fn test_pass_manager_run() {
        let pm = PassManager::new();
        let mut props = PropertySet::new();

        let mut circuit = Circuit::with_size("test", 2);
        circuit.h(QubitId(0)).unwrap();
        circuit.cx(QubitId(0), QubitId(1)).unwrap();

        let mut dag = circuit.into_dag();
        pm.run(&mut dag, &mut props).unwrap();

        assert_eq!(dag.num_ops(), 2);
    }

    #[test]
    fn test_builder_without_target_is_empty() {
        let (pm, props) = PassManagerBuilder::new().build();
        assert!(pm.is_empty());
        assert!(props.coupling_map.is_none());
    }

    #[test]
    fn test_reference_router() {
        let mut circuit = Circuit::with_size("test", 4);
        circuit.cx(QubitId(0), QubitId(2)).unwrap();
        circuit.cx(QubitId(1), QubitId(3)).unwrap();

        let (pm, mut props) =
            PassManagerBuilder::reference_router(CouplingMap::linear(4), Layout::trivial(4))
                .build();
        assert_eq!(pm.len(), 4);

        let mut dag = circuit.into_dag();
        pm.run(&mut dag, &mut props).unwrap();

        let swaps = props.get::<RoutingStats>().unwrap().swaps_inserted;
        assert!(swaps >= 1);
        assert_eq!(dag.num_gates(), 2 + 3 * swaps);
        assert!(dag.count_ops().get("swap").is_none());
        assert!(props.get::<ConnectivityReport>().unwrap().passed);
    }

    #[test]
    fn test_keep_swaps() {
        let mut circuit = Circuit::with_size("test", 3);
        circuit.cx(QubitId(0), QubitId(2)).unwrap();

        let (pm, mut props) = PassManagerBuilder::new()
            .with_coupling_map(CouplingMap::linear(3))
            .keep_swaps()
            .build();
        let mut dag = circuit.into_dag();
        pm.run(&mut dag, &mut props).unwrap();
        assert_eq!(dag.count_ops()["swap"], 1);
    }
}
