//! QUEKNO Compilation Framework
//!
//! Device connectivity, qubit layouts and a small pass-based router. The
//! benchmark synthesizer uses it in two ways: [`CouplingMap`] is the
//! connectivity graph every benchmark is built against, and the reference
//! router produced by [`PassManagerBuilder::reference_router`] measures how
//! many gates a real routing run adds on top of a synthesized circuit.
//!
//! # Architecture
//!
//! ```text
//! Logical Circuit
//!       │
//!       ▼
//! ┌─────────────┐
//! │ PassManager │ ◄── PropertySet (coupling map, layout, results)
//! └─────────────┘
//!       │
//!       ├── FixedLayout / TrivialLayout
//!       ├── BasicRouting
//!       ├── SwapDecomposition
//!       └── ConnectivityVerification
//!       │
//!       ▼
//! Physical Circuit
//! ```
//!
//! # Example
//!
//! ```rust
//! use quekno_compile::{CouplingMap, Layout, PassManagerBuilder};
//! use quekno_compile::passes::RoutingStats;
//! use quekno_ir::{Circuit, QubitId};
//!
//! let mut circuit = Circuit::with_size("demo", 3);
//! circuit.cx(QubitId(0), QubitId(2)).unwrap();
//!
//! let (pm, mut props) =
//!     PassManagerBuilder::reference_router(CouplingMap::linear(3), Layout::trivial(3)).build();
//!
//! let mut dag = circuit.into_dag();
//! pm.run(&mut dag, &mut props).unwrap();
//!
//! assert_eq!(props.get::<RoutingStats>().unwrap().swaps_inserted, 1);
//! assert_eq!(dag.num_gates(), 4);
//! ```
//!
//! # Custom Passes
//!
//! ```rust
//! use quekno_compile::{CompileResult, Pass, PassKind, PropertySet};
//! use quekno_ir::CircuitDag;
//!
//! struct CountTwoQubitGates;
//!
//! impl Pass for CountTwoQubitGates {
//!     fn name(&self) -> &str { "count_2q" }
//!     fn kind(&self) -> PassKind { PassKind::Analysis }
//!
//!     fn run(&self, dag: &mut CircuitDag, props: &mut PropertySet) -> CompileResult<()> {
//!         props.insert(dag.num_two_qubit_gates());
//!         Ok(())
//!     }
//! }
//! ```

pub mod error;
pub mod manager;
pub mod pass;
pub mod property;

pub mod passes;

pub use error::{CompileError, CompileResult};
pub use manager::{PassManager, PassManagerBuilder};
pub use pass::{Pass, PassKind};
pub use property::{CouplingMap, Layout, PropertySet};
