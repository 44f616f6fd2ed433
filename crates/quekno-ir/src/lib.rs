//! QUEKNO Circuit Intermediate Representation
//!
//! Core data structures for the circuits QUEKNO synthesizes and routes.
//!
//! # Overview
//!
//! Circuits are stored as a DAG (Directed Acyclic Graph) of operations
//! connected by qubit wires. The [`Circuit`] type is a builder over that DAG.
//! Synthesized benchmarks live at the [`CircuitLevel::Logical`] level; the
//! reference router in `quekno-compile` lowers them to
//! [`CircuitLevel::Physical`].
//!
//! # Example
//!
//! ```rust
//! use quekno_ir::{Circuit, QubitId};
//!
//! let mut circuit = Circuit::with_size("layer", 3);
//! circuit.h(QubitId(0)).unwrap();
//! circuit.cx(QubitId(0), QubitId(1)).unwrap();
//! circuit.cx(QubitId(2), QubitId(1)).unwrap();
//!
//! assert_eq!(circuit.size(), 3);
//! assert_eq!(circuit.depth(), 3);
//! ```
//!
//! # Supported Gates
//!
//! | Gate | Qubits | Description |
//! |------|--------|-------------|
//! | `id` | 1 | Identity |
//! | `h` | 1 | Hadamard gate |
//! | `x`, `y`, `z` | 1 | Pauli gates |
//! | `s`, `sdg`, `t`, `tdg`, `sx` | 1 | Clifford+T gates |
//! | `cx` | 2 | Controlled-NOT (CNOT) |
//! | `cy`, `cz` | 2 | Controlled-Y and Controlled-Z |
//! | `swap` | 2 | SWAP gate |

pub mod circuit;
pub mod dag;
pub mod error;
pub mod gate;
pub mod instruction;
pub mod qubit;

pub use circuit::Circuit;
pub use dag::{CircuitDag, CircuitLevel, DagEdge, DagNode, NodeIndex};
pub use error::{IrError, IrResult};
pub use gate::StandardGate;
pub use instruction::{Instruction, InstructionKind};
pub use qubit::QubitId;
