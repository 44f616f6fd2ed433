//! Tunable parameters for benchmark synthesis.
//!
//! A [`Config`] is read once at the start of a build and shared by reference
//! with every component. Nothing mutates it during a build, so several
//! benchmarks can be generated concurrently from one value.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use quekno_ir::StandardGate;

use crate::error::{BenchError, BenchResult};

/// Configuration for a benchmark build.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Gate emitted for one-qubit operations.
    pub one_qubit_gate: StandardGate,
    /// Gate emitted for two-qubit operations and used to decompose swaps.
    pub two_qubit_gate: StandardGate,
    /// Added to 0.5 to give the probability of preferring consecutive swaps.
    pub consec_swap_bias: f64,
    /// Standard deviation of the subgraph edge-count draw.
    pub subgraph_size_std: f64,
    /// `k` in the two-qubit gate multiplicity `m * (1 + k * n)`.
    pub rand_edges_var: f64,
    /// Candidates tried per chain position before giving up on it.
    pub glink_search_patience: usize,
    /// Ratio of one-qubit to two-qubit gates in each layer.
    pub qbg_ratio: f64,
    /// Call limit of the pattern-embedding search.
    pub embedding_call_limit: usize,
    /// Maximum edge-removal trials in the minimality check.
    pub minimality_trial_cap: usize,
    /// Failed chain positions tolerated before a build is abandoned.
    pub max_chain_failures: usize,
    /// Size re-draws when growing a connected subgraph.
    pub subgraph_retry_limit: usize,
    /// Node limit of one swap decomposition search.
    pub decomposition_node_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            one_qubit_gate: StandardGate::H,
            two_qubit_gate: StandardGate::CX,
            consec_swap_bias: 0.0,
            subgraph_size_std: 10.0,
            rand_edges_var: 0.05,
            glink_search_patience: 64,
            qbg_ratio: QbgRatio::Tfl.value(),
            embedding_call_limit: 10_000,
            minimality_trial_cap: 16,
            max_chain_failures: 256,
            subgraph_retry_limit: 32,
            decomposition_node_limit: 200_000,
        }
    }
}

impl Config {
    /// Parse a configuration from YAML. Missing fields take their defaults.
    pub fn from_yaml(text: &str) -> BenchResult<Self> {
        let config: Self = serde_yaml_ng::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every field against its valid range.
    pub fn validate(&self) -> BenchResult<()> {
        if self.one_qubit_gate.num_qubits() != 1 {
            return Err(BenchError::InvalidConfig(format!(
                "one_qubit_gate '{}' is not a one-qubit gate",
                self.one_qubit_gate
            )));
        }
        if self.two_qubit_gate.num_qubits() != 2 || self.two_qubit_gate == StandardGate::Swap {
            return Err(BenchError::InvalidConfig(format!(
                "two_qubit_gate '{}' must be a two-qubit gate other than swap",
                self.two_qubit_gate
            )));
        }
        if !(-0.5..=0.5).contains(&self.consec_swap_bias) {
            return Err(BenchError::InvalidConfig(format!(
                "consec_swap_bias {} outside [-0.5, 0.5]",
                self.consec_swap_bias
            )));
        }
        for (field, value) in [
            ("subgraph_size_std", self.subgraph_size_std),
            ("rand_edges_var", self.rand_edges_var),
            ("qbg_ratio", self.qbg_ratio),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(BenchError::InvalidConfig(format!(
                    "{field} must be a non-negative number, got {value}"
                )));
            }
        }
        for (field, value) in [
            ("glink_search_patience", self.glink_search_patience),
            ("embedding_call_limit", self.embedding_call_limit),
            ("max_chain_failures", self.max_chain_failures),
            ("subgraph_retry_limit", self.subgraph_retry_limit),
            ("decomposition_node_limit", self.decomposition_node_limit),
        ] {
            if value == 0 {
                return Err(BenchError::InvalidConfig(format!("{field} must be positive")));
            }
        }
        Ok(())
    }

    /// Probability of preferring a swap that shares a qubit with the previous one.
    pub fn consecutive_probability(&self) -> f64 {
        (0.5 + self.consec_swap_bias).clamp(0.0, 1.0)
    }
}

/// Objective a benchmark is built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptType {
    /// Gate count, one swap per glink.
    Opt1,
    /// Gate count, one or two consecutive swaps per glink.
    Opt2,
    /// Depth, one layer of disjoint swaps per glink.
    Depth,
}

impl OptType {
    /// Lowercase name used in metadata and file names.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Opt1 => "opt1",
            Self::Opt2 => "opt2",
            Self::Depth => "depth",
        }
    }
}

impl fmt::Display for OptType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OptType {
    type Err = BenchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "opt1" => Ok(Self::Opt1),
            "opt2" => Ok(Self::Opt2),
            "depth" => Ok(Self::Depth),
            other => Err(BenchError::InvalidConfig(format!(
                "unknown opt type '{other}' (expected opt1, opt2 or depth)"
            ))),
        }
    }
}

/// When chain generation stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Target {
    /// Logical circuit has exactly this many gates.
    GateSize(usize),
    /// Logical circuit has exactly this depth.
    Depth(usize),
    /// Stop once the known cost reaches this value.
    Cost(usize),
}

impl Target {
    /// The numeric target value.
    pub fn value(self) -> usize {
        match self {
            Self::GateSize(v) | Self::Depth(v) | Self::Cost(v) => v,
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GateSize(v) => write!(f, "gate_size={v}"),
            Self::Depth(v) => write!(f, "depth={v}"),
            Self::Cost(v) => write!(f, "cost={v}"),
        }
    }
}

impl FromStr for Target {
    type Err = BenchError;

    /// Parse `gate_size=N`, `depth=N` or `cost=N`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || {
            BenchError::InvalidConfig(format!(
                "invalid target '{s}' (expected gate_size=N, depth=N or cost=N)"
            ))
        };
        let (kind, value) = s.split_once('=').ok_or_else(invalid)?;
        let value: usize = value.trim().parse().map_err(|_| invalid())?;
        match kind.trim().to_ascii_lowercase().as_str() {
            "gate_size" | "gates" => Ok(Self::GateSize(value)),
            "depth" => Ok(Self::Depth(value)),
            "cost" => Ok(Self::Cost(value)),
            _ => Err(invalid()),
        }
    }
}

/// Mean subgraph edge counts used by the published benchmark suites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubgraphSize {
    Tokyo,
    Small,
    Large,
}

impl SubgraphSize {
    /// Mean number of edges.
    pub fn value(self) -> f64 {
        match self {
            Self::Tokyo => 5.0,
            Self::Small => 8.0,
            Self::Large => 16.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Tokyo => "tokyo",
            Self::Small => "small",
            Self::Large => "large",
        }
    }
}

/// One-qubit to two-qubit gate ratios of the published benchmark suites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QbgRatio {
    Tfl,
    Qse,
}

impl QbgRatio {
    pub fn value(self) -> f64 {
        match self {
            Self::Tfl => 1.5,
            Self::Qse => 2.55,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Tfl => "tfl",
            Self::Qse => "qse",
        }
    }
}

impl FromStr for SubgraphSize {
    type Err = BenchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "tokyo" => Ok(Self::Tokyo),
            "small" => Ok(Self::Small),
            "large" => Ok(Self::Large),
            other => Err(BenchError::InvalidConfig(format!(
                "unknown subgraph size '{other}' (expected tokyo, small or large)"
            ))),
        }
    }
}

impl FromStr for QbgRatio {
    type Err = BenchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "tfl" => Ok(Self::Tfl),
            "qse" => Ok(Self::Qse),
            other => Err(BenchError::InvalidConfig(format!(
                "unknown gate ratio '{other}' (expected tfl or qse)"
            ))),
        }
    }
}
