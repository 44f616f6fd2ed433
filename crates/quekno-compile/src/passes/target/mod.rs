//! Target-specific compilation passes.
//!
//! These passes require the coupling map (and, after layout, the layout)
//! from the `PropertySet` and produce circuits over physical qubits.

pub mod decomposition;
pub mod layout;
pub mod routing;

pub use decomposition::SwapDecomposition;
pub use layout::{FixedLayout, TrivialLayout};
pub use routing::{BasicRouting, RoutingStats};
