//! Error types for the QASM emitter.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while emitting a circuit.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EmitError {
    /// An instruction refers to a qubit outside the register.
    #[error("Qubit {qubit} out of range for register of size {num_qubits}")]
    QubitOutOfRange { qubit: u32, num_qubits: usize },

    /// Writing the output file failed.
    #[error("Failed to write '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for emitting operations.
pub type EmitResult<T> = Result<T, EmitError>;
