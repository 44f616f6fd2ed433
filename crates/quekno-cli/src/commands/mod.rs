//! CLI command implementations.

pub mod archs;
pub mod common;
pub mod generate;
pub mod suite;
pub mod version;
