//! Integration tests for the reference router.
//!
//! Whatever the architecture and initial layout, the routed circuit must
//! only use coupled pairs, and its size must be the logical size plus three
//! gates per inserted SWAP.

use proptest::prelude::*;
use quekno_compile::passes::{ConnectivityReport, RoutingStats};
use quekno_compile::{CouplingMap, Layout, PassManagerBuilder};
use quekno_ir::{Circuit, CircuitLevel, QubitId};

fn architectures() -> Vec<CouplingMap> {
    vec![
        CouplingMap::linear(6),
        CouplingMap::ring(6),
        CouplingMap::star(6),
        CouplingMap::grid(2, 3),
    ]
}

fn shuffled(n: u32, keys: &[u32]) -> Vec<u32> {
    let mut mapping: Vec<u32> = (0..n).collect();
    for (i, &k) in keys.iter().enumerate().take(n as usize) {
        let j = k as usize % (i + 1);
        mapping.swap(i, j);
    }
    mapping
}

// ============================================================================
// Named devices
// ============================================================================

#[test]
fn test_route_across_tokyo() {
    let tokyo = CouplingMap::tokyo();
    let mut circuit = Circuit::with_size("far", 20);
    circuit.cx(QubitId(0), QubitId(19)).unwrap();
    circuit.cx(QubitId(4), QubitId(15)).unwrap();

    let (pm, mut props) = PassManagerBuilder::reference_router(tokyo, Layout::trivial(20)).build();
    let mut dag = circuit.into_dag();
    pm.run(&mut dag, &mut props).unwrap();

    let swaps = props.get::<RoutingStats>().unwrap().swaps_inserted;
    assert!(swaps >= 2);
    assert_eq!(dag.num_gates(), 2 + 3 * swaps);
    assert_eq!(dag.level(), CircuitLevel::Physical);
    assert!(props.get::<ConnectivityReport>().unwrap().passed);
}

// ============================================================================
// Random circuits
// ============================================================================

proptest! {
    #[test]
    fn test_routed_circuits_respect_coupling(
        arch in 0usize..4,
        gates in prop::collection::vec((0u32..6, 1u32..6, any::<bool>()), 1..30),
        keys in prop::collection::vec(any::<u32>(), 6),
    ) {
        let map = architectures().swap_remove(arch);
        let mut circuit = Circuit::with_size("random", 6);
        for &(a, off, one_qubit) in &gates {
            if one_qubit {
                circuit.h(QubitId(a)).unwrap();
            } else {
                circuit.cx(QubitId(a), QubitId((a + off) % 6)).unwrap();
            }
        }
        let logical_size = circuit.size();

        let layout = Layout::from_mapping(&shuffled(6, &keys));
        let (pm, mut props) = PassManagerBuilder::reference_router(map, layout).build();
        let mut dag = circuit.into_dag();
        pm.run(&mut dag, &mut props).unwrap();

        let swaps = props.get::<RoutingStats>().unwrap().swaps_inserted;
        prop_assert_eq!(dag.num_gates(), logical_size + 3 * swaps);
        prop_assert!(props.get::<ConnectivityReport>().unwrap().passed);
    }
}
