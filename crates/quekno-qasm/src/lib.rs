//! `OpenQASM` Emitter for QUEKNO
//!
//! Writes synthesized benchmark circuits as `OpenQASM` 2.0 (the format the
//! published benchmark suites use) or 3.0. Separators between glinks are
//! ordinary `barrier` instructions on the circuit, so a barriered copy is
//! emitted the same way as the plain one.
//!
//! # Example
//!
//! ```rust
//! use quekno_ir::{Circuit, QubitId};
//! use quekno_qasm::{emit, emit_qasm2};
//!
//! let mut circuit = Circuit::with_size("layer", 2);
//! circuit.h(QubitId(0)).unwrap();
//! circuit.cx(QubitId(0), QubitId(1)).unwrap();
//!
//! let qasm2 = emit_qasm2(&circuit).unwrap();
//! assert!(qasm2.contains("qreg q[2];"));
//! assert!(qasm2.contains("cx q[0], q[1];"));
//!
//! let qasm3 = emit(&circuit).unwrap();
//! assert!(qasm3.contains("OPENQASM 3.0;"));
//! ```

mod emitter;
mod error;

pub use emitter::{QasmVersion, emit, emit_qasm2, emit_with, write_qasm};
pub use error::{EmitError, EmitResult};
