//! Version command implementation.

use console::style;

/// Execute the version command.
pub fn execute() {
    let version = env!("CARGO_PKG_VERSION");

    println!(
        "{} {} - routing benchmarks with known optimal cost",
        style("QUEKNO").cyan().bold(),
        style(format!("v{version}")).yellow()
    );
    println!();
    println!("Components:");
    println!("  quekno-ir       Circuit intermediate representation");
    println!("  quekno-compile  Coupling maps and reference router");
    println!("  quekno-bench    Permutation chains and benchmark assembly");
    println!("  quekno-qasm     OpenQASM export");
    println!("  quekno-cli      Command-line interface");
    println!();
    println!("License: {}", style(env!("CARGO_PKG_LICENSE")).dim());
}
