//! Error types for benchmark synthesis.

use thiserror::Error;

/// Errors that can occur while building a benchmark circuit.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BenchError {
    /// Error from the compilation crate.
    #[error("Compile error: {0}")]
    Compile(#[from] quekno_compile::CompileError),

    /// Error from the IR crate.
    #[error("IR error: {0}")]
    Ir(#[from] quekno_ir::IrError),

    /// No connected subgraph of the requested size could be grown.
    #[error("No connected subgraph with {edges} edges in '{graph}' after {attempts} attempts")]
    SubgraphUnavailable {
        graph: String,
        edges: usize,
        attempts: usize,
    },

    /// No candidate certified as a strong glink within the search patience.
    #[error("No glink certified after {attempts} candidates")]
    GlinkVerificationFailed { attempts: usize },

    /// Glink search kept failing across chain positions.
    #[error(
        "Glink search exhausted on '{graph}' after {failures} failed positions \
         (mean subgraph size {mean_subgraph_size}, {glinks} glinks built)"
    )]
    GlinkSearchExhausted {
        graph: String,
        mean_subgraph_size: f64,
        failures: usize,
        glinks: usize,
    },

    /// Replaying a swap sequence did not reproduce the target mapping.
    #[error("Inconsistent permutation: {0}")]
    InconsistentPermutation(String),

    /// A configuration value is out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The architecture graph cannot host a benchmark.
    #[error("Invalid architecture graph: {0}")]
    InvalidGraph(String),

    /// Failed to read a configuration file.
    #[error("Config parse error: {0}")]
    ConfigParse(#[from] serde_yaml_ng::Error),
}

/// Result type for benchmark synthesis.
pub type BenchResult<T> = Result<T, BenchError>;
