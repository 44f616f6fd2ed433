//! Circuit assembly.
//!
//! Turns a chain into the benchmark circuit on logical qubits, and into the
//! known solution: the same gates on physical qubits with every glink's swaps
//! spelled out as three two-qubit gates.

use tracing::debug;

use quekno_compile::passes::ConnectivityVerification;
use quekno_compile::{CouplingMap, Pass, PropertySet};
use quekno_ir::{Circuit, CircuitLevel, Instruction, QubitId};

use crate::chain::Chain;
use crate::config::Config;
use crate::error::BenchResult;

/// A benchmark circuit together with its known routing.
#[derive(Debug, Clone)]
pub struct BenchmarkCircuit {
    /// Gates on logical qubits, layer after layer.
    pub circuit: Circuit,
    /// Gate count before each glink boundary.
    pub boundaries: Vec<usize>,
    /// The routed circuit on physical qubits.
    pub solution: Circuit,
}

impl BenchmarkCircuit {
    pub fn name(&self) -> &str {
        self.circuit.name()
    }

    pub fn gate_size(&self) -> usize {
        self.circuit.size()
    }

    pub fn depth(&self) -> usize {
        self.circuit.depth()
    }

    /// The logical circuit with a full-width barrier at every glink boundary.
    pub fn with_barriers(&self) -> BenchResult<Circuit> {
        let num_qubits = u32::try_from(self.circuit.num_qubits()).unwrap_or(u32::MAX);
        let mut barriered = Circuit::with_size(self.circuit.name(), num_qubits);
        let mut boundaries = self.boundaries.iter().copied().peekable();
        for (i, inst) in self.circuit.instructions().enumerate() {
            while boundaries.next_if(|&b| b == i).is_some() {
                barriered.barrier_all()?;
            }
            barriered.apply(inst.clone())?;
        }
        for _ in boundaries {
            barriered.barrier_all()?;
        }
        Ok(barriered)
    }

    /// Check that every two-qubit gate of the solution sits on a coupled pair.
    pub fn verify_solution(&self, graph: &CouplingMap) -> BenchResult<()> {
        let mut dag = self.solution.dag().clone();
        dag.set_level(CircuitLevel::Physical);
        let mut props = PropertySet::new().with_coupling_map(graph.clone());
        ConnectivityVerification.run(&mut dag, &mut props)?;
        Ok(())
    }
}

/// Lay out `chain` as a circuit named `name`.
pub fn assemble(chain: &Chain, name: &str, config: &Config) -> BenchResult<BenchmarkCircuit> {
    let num_qubits = u32::try_from(chain.init_map.len()).unwrap_or(u32::MAX);
    let mut circuit = Circuit::with_size(name, num_qubits);
    let mut solution = Circuit::with_size(format!("{name}_solution"), num_qubits);
    let mut boundaries = Vec::with_capacity(chain.glinks.len());

    for (i, layer) in chain.layers.iter().enumerate() {
        for gate in &layer.gates {
            circuit.apply(gate.clone())?;
            solution.apply(gate.remapped(|q| QubitId(layer.mapping.apply(q.0))))?;
        }
        if let Some(glink) = chain.glinks.get(i) {
            boundaries.push(circuit.size());
            for &(a, b) in &glink.swaps {
                let (a, b) = (QubitId(a), QubitId(b));
                let g = config.two_qubit_gate;
                solution.apply(Instruction::two_qubit_gate(g, a, b))?;
                solution.apply(Instruction::two_qubit_gate(g, b, a))?;
                solution.apply(Instruction::two_qubit_gate(g, a, b))?;
            }
        }
    }

    debug!(
        name,
        gates = circuit.size(),
        depth = circuit.depth(),
        solution_gates = solution.size(),
        "assembled circuit"
    );
    Ok(BenchmarkCircuit {
        circuit,
        boundaries,
        solution,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::generate_chain;
    use crate::config::{OptType, Target};
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn sample(graph: &CouplingMap, seed: u64) -> (Chain, BenchmarkCircuit) {
        let config = Config::default();
        let mut rng = SmallRng::seed_from_u64(seed);
        let chain =
            generate_chain(graph, OptType::Opt1, Target::Cost(3), 6.0, &config, &mut rng).unwrap();
        let bench = assemble(&chain, "sample", &config).unwrap();
        (chain, bench)
    }

    #[test]
    fn test_assemble_sizes() {
        let grid = CouplingMap::grid(3, 3);
        let (chain, bench) = sample(&grid, 2);

        assert_eq!(bench.gate_size(), chain.gate_size());
        assert_eq!(bench.boundaries.len(), chain.glinks.len());
        assert_eq!(
            bench.solution.size(),
            chain.gate_size() + chain.known_gate_cost()
        );
        assert!(bench.boundaries.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_solution_respects_connectivity() {
        let grid = CouplingMap::grid(3, 3);
        let (_, bench) = sample(&grid, 8);
        assert!(bench.verify_solution(&grid).is_ok());
    }

    #[test]
    fn test_solution_fails_on_sparser_graph() {
        let grid = CouplingMap::grid(3, 3);
        let (_, bench) = sample(&grid, 8);
        assert!(bench.verify_solution(&CouplingMap::new(9)).is_err());
    }

    #[test]
    fn test_barriers_at_boundaries() {
        let grid = CouplingMap::grid(3, 3);
        let (chain, bench) = sample(&grid, 5);
        let barriered = bench.with_barriers().unwrap();

        let barriers = barriered.instructions().filter(|i| i.is_barrier()).count();
        assert_eq!(barriers, chain.glinks.len());
        assert_eq!(barriered.size(), bench.gate_size());
    }
}
