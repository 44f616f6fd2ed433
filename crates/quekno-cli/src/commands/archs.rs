//! Archs command implementation.

use anyhow::Result;
use console::style;

use quekno_compile::CouplingMap;

/// Named devices, in the order they are listed.
pub const NAMED_ARCHS: [&str; 4] = ["tokyo", "rochester", "sycamore54", "sycamore"];

/// Execute the archs command.
pub fn execute() -> Result<()> {
    println!("{}", style("Named architectures:").bold());
    println!();
    println!("  {:<12} {:>7} {:>7} {:>9}", "NAME", "QUBITS", "EDGES", "DIAMETER");
    for name in NAMED_ARCHS {
        let graph = CouplingMap::from_name(name)?;
        println!(
            "  {:<12} {:>7} {:>7} {:>9}",
            style(name).cyan(),
            graph.num_qubits(),
            graph.num_edges(),
            diameter(&graph)
        );
    }
    println!();
    println!("{}", style("Parametric families:").bold());
    println!();
    println!("  line(n)  ring(n)  star(n)  full(n)  grid(rows, cols)");

    Ok(())
}

fn diameter(graph: &CouplingMap) -> u32 {
    let n = graph.num_qubits();
    (0..n)
        .flat_map(|a| (0..n).map(move |b| (a, b)))
        .filter_map(|(a, b)| graph.distance(a, b))
        .max()
        .unwrap_or(0)
}
