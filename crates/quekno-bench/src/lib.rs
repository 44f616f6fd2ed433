//! QUEKNO Benchmark Synthesis
//!
//! Builds qubit-routing benchmark circuits whose optimal routing cost is
//! known by construction. A circuit is a chain of gate layers, each confined
//! to a connected region of the device. Between two layers sits a glink, a
//! short swap sequence that provably cannot be skipped. The swaps of all
//! glinks together are a routing of the circuit, so their count is the known
//! cost.
//!
//! # Pipeline
//!
//! ```text
//! CouplingMap + Config + seed
//!       │
//!       ▼
//! generate_chain ──► find_glink ──► decompose_to_swaps / find_embedding
//!       │       └──► sample_layer
//!       ▼
//! assemble ──► BenchmarkCircuit (logical circuit, boundaries, solution)
//!       │
//!       ▼
//! account ──► Metrics (known cost vs. reference router)
//! ```
//!
//! # Example
//!
//! ```rust
//! use quekno_bench::{Config, OptType, Quekno, Target};
//! use quekno_compile::CouplingMap;
//!
//! let quekno = Quekno::new(CouplingMap::ring(5), Config::default()).unwrap();
//! let bench = quekno
//!     .build("ring_demo", OptType::Opt1, Target::GateSize(20), 5.0, 7)
//!     .unwrap();
//!
//! assert_eq!(bench.metadata.metrics.gate_size, 20);
//! assert_eq!(bench.metadata.metrics.cost, bench.chain.glinks.len());
//! ```

pub mod assembler;
pub mod chain;
pub mod config;
pub mod embedding;
pub mod error;
pub mod glink;
pub mod metrics;
pub mod permutation;
pub mod sampler;
pub mod subgraph;

use std::time::Instant;

use rand::SeedableRng;
use rand::rngs::SmallRng;
use tracing::info;

use quekno_compile::CouplingMap;

pub use assembler::{BenchmarkCircuit, assemble};
pub use chain::{Chain, generate_chain};
pub use config::{Config, OptType, QbgRatio, SubgraphSize, Target};
pub use error::{BenchError, BenchResult};
pub use glink::{Glink, find_glink};
pub use metrics::{BuildReport, Metadata, Metrics, account};
pub use permutation::{Permutation, Swap};
pub use sampler::{GateLayer, sample_layer};

/// A finished benchmark: circuit, the chain it came from, and its metadata.
#[derive(Debug, Clone)]
pub struct Benchmark {
    pub circuit: BenchmarkCircuit,
    pub chain: Chain,
    pub metadata: Metadata,
    /// Wall-clock build time in seconds. Kept apart from `metadata`, which
    /// depends only on the build arguments.
    pub build_time: f64,
}

impl Benchmark {
    /// The exported record: metadata plus build time.
    pub fn report(&self) -> BuildReport<'_> {
        BuildReport {
            metadata: &self.metadata,
            build_time: self.build_time,
        }
    }
}

/// Benchmark builder for one architecture and configuration.
///
/// Holds no state between builds, so one value can serve many builds,
/// including concurrent ones.
#[derive(Debug, Clone)]
pub struct Quekno {
    graph: CouplingMap,
    config: Config,
}

impl Quekno {
    /// Validate `graph` and `config` and wrap them.
    pub fn new(graph: CouplingMap, config: Config) -> BenchResult<Self> {
        config.validate()?;
        graph
            .validate()
            .map_err(|e| BenchError::InvalidGraph(e.to_string()))?;
        Ok(Self { graph, config })
    }

    pub fn graph(&self) -> &CouplingMap {
        &self.graph
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Build one benchmark. The same arguments always give the same circuit.
    pub fn build(
        &self,
        name: &str,
        opt_type: OptType,
        target: Target,
        mean_subgraph_size: f64,
        seed: u64,
    ) -> BenchResult<Benchmark> {
        let started = Instant::now();
        let mut rng = SmallRng::seed_from_u64(seed);

        let chain = generate_chain(
            &self.graph,
            opt_type,
            target,
            mean_subgraph_size,
            &self.config,
            &mut rng,
        )?;
        let circuit = assemble(&chain, name, &self.config)?;
        circuit.verify_solution(&self.graph)?;
        let metrics = account(&circuit, &chain, &self.graph, &self.config)?;

        let build_time = started.elapsed().as_secs_f64();
        info!(
            name,
            cost = metrics.cost,
            gates = metrics.gate_size,
            depth = metrics.depth,
            "built benchmark in {build_time:.3}s"
        );

        let metadata = Metadata {
            name: name.to_string(),
            opt_type,
            archgraph: self.graph.name().to_string(),
            num_qubits: self.graph.num_qubits(),
            seed,
            target,
            metrics,
            init_map: chain.init_map.oneline(),
            swaps: chain.swaps(),
            glink_sizes: chain.glink_sizes(),
        };
        Ok(Benchmark {
            circuit,
            chain,
            metadata,
            build_time,
        })
    }
}
