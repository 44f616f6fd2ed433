//! Generate command implementation.

use std::path::Path;

use anyhow::Result;
use console::style;

use quekno_bench::{OptType, Quekno, Target};

use super::common::{
    ConfigOverrides, export_benchmark, file_arch_name, load_arch, load_config, parse_qasm_version,
    parse_subgraph_size,
};

/// Arguments of the generate command.
#[derive(Debug, Clone)]
pub struct GenerateArgs<'a> {
    pub arch: &'a str,
    pub opt_type: &'a str,
    pub target: &'a str,
    pub subgraph_size: &'a str,
    pub seed: u64,
    pub name: Option<&'a str>,
    pub output: &'a Path,
    pub config: Option<&'a Path>,
    pub qasm_version: &'a str,
    pub overrides: ConfigOverrides,
}

/// Execute the generate command.
pub fn execute(args: &GenerateArgs<'_>) -> Result<()> {
    let graph = load_arch(args.arch)?;
    let opt_type: OptType = args.opt_type.parse()?;
    let target: Target = args.target.parse()?;
    let subgraph_size = parse_subgraph_size(args.subgraph_size)?;
    let version = parse_qasm_version(args.qasm_version)?;
    let config = load_config(args.config, &args.overrides)?;

    let name = args.name.map_or_else(
        || {
            format!(
                "{}QBT_{}_{}_{}_seed{}",
                graph.num_qubits(),
                file_arch_name(&graph),
                opt_type,
                target.to_string().replace('=', "_"),
                args.seed
            )
        },
        str::to_string,
    );

    println!(
        "{} Generating {} on {} ({}, {})",
        style("→").cyan().bold(),
        style(&name).green(),
        style(graph.name()).yellow(),
        opt_type,
        target
    );

    let quekno = Quekno::new(graph, config)?;
    let bench = quekno.build(&name, opt_type, target, subgraph_size, args.seed)?;
    let files = export_benchmark(args.output, &bench, version)?;

    let metrics = &bench.metadata.metrics;
    println!("{} Benchmark complete", style("✓").green().bold());
    println!(
        "  Circuit: {} gates, depth {}, {} glinks",
        metrics.gate_size,
        metrics.depth,
        bench.chain.glinks.len()
    );
    println!(
        "  Known cost: {} (gate cost {}, depth cost {})",
        style(metrics.cost).yellow(),
        metrics.known_gate_cost,
        metrics.known_depth_cost
    );
    println!(
        "  Reference router: gate cost {}, depth cost {}",
        metrics.gate_cost, metrics.depth_cost
    );
    if !metrics.certificate_exact {
        println!(
            "  {} minimality check was capped for at least one glink",
            style("!").yellow().bold()
        );
    }
    println!("  Output: {}", style(files.circuit.display()).green());
    println!("  Barriered: {}", files.barriered.display());
    println!("  Results: {}", files.results.display());

    Ok(())
}
