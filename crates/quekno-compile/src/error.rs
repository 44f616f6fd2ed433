//! Error types for the compilation crate.

use thiserror::Error;

/// Errors that can occur during compilation.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CompileError {
    /// Error from the IR crate.
    #[error("IR error: {0}")]
    Ir(#[from] quekno_ir::IrError),

    /// Missing coupling map for routing.
    #[error("Missing coupling map for routing")]
    MissingCouplingMap,

    /// Missing layout for routing.
    #[error("Missing layout for routing")]
    MissingLayout,

    /// Routing failed because qubits are not connected.
    #[error("Routing failed: qubits {qubit1} and {qubit2} not connected")]
    RoutingFailed { qubit1: u32, qubit2: u32 },

    /// Circuit too large for target.
    #[error("Circuit requires {required} qubits but target only has {available}")]
    CircuitTooLarge { required: usize, available: u32 },

    /// The coupling map is not a connected simple graph.
    #[error("Invalid coupling map: {0}")]
    InvalidCouplingMap(String),

    /// Unknown architecture name.
    #[error("Unknown architecture '{0}'")]
    UnknownArchitecture(String),

    /// A two-qubit gate acts on physical qubits that are not coupled.
    #[error("Gate '{gate_name}' on qubits {qubit1} and {qubit2} violates connectivity")]
    ConnectivityViolation {
        gate_name: String,
        qubit1: u32,
        qubit2: u32,
    },
}

/// Result type for compilation operations.
pub type CompileResult<T> = Result<T, CompileError>;
