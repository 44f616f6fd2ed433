//! Built-in compilation passes.
//!
//! Passes are organized into two categories:
//! - [`agnostic`]: checks that only read DAG structure and the property set
//! - [`target`]: layout, routing and decomposition against a coupling map

pub mod agnostic;
pub mod target;

pub use agnostic::{ConnectivityReport, ConnectivityVerification};
pub use target::{BasicRouting, FixedLayout, RoutingStats, SwapDecomposition, TrivialLayout};
