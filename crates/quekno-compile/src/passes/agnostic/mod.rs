//! Target-agnostic compilation passes.
//!
//! These passes never rewrite the DAG. They inspect it and record their
//! findings in the `PropertySet`.

pub mod verification;

pub use verification::{ConnectivityReport, ConnectivityVerification};
