//! Suite command implementation.
//!
//! Reproduces the layout of the published benchmark packages: every
//! combination of subgraph size, objective, target cost and gate ratio,
//! repeated with consecutive seeds.

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::warn;

use quekno_bench::{BenchError, OptType, QbgRatio, Quekno, SubgraphSize, Target};

use super::common::{
    ConfigOverrides, export_benchmark, file_arch_name, load_arch, load_config, parse_qasm_version,
};

const GATE_TARGETS: [usize; 10] = [0, 1, 2, 3, 4, 5, 10, 15, 20, 25];
const DEPTH_TARGETS: [usize; 6] = [1, 2, 3, 4, 5, 10];

/// Which objective family a suite covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuiteKind {
    Gate,
    Depth,
}

impl SuiteKind {
    pub fn parse(text: &str) -> Result<Self> {
        match text.to_ascii_lowercase().as_str() {
            "gate" => Ok(Self::Gate),
            "depth" => Ok(Self::Depth),
            other => anyhow::bail!("Unknown suite '{other}' (expected gate or depth)"),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Gate => "gate",
            Self::Depth => "depth",
        }
    }
}

/// One benchmark of a suite.
#[derive(Debug, Clone, PartialEq)]
pub struct SuiteEntry {
    pub name: String,
    pub subgraph_size: SubgraphSize,
    pub opt_type: OptType,
    pub target_cost: usize,
    pub qbg_ratio: QbgRatio,
    pub repeat: usize,
}

/// Every benchmark of a suite, in generation order.
pub fn plan(kind: SuiteKind, arch_name: &str, num_qubits: u32, repeats: usize) -> Vec<SuiteEntry> {
    let sizes: &[SubgraphSize] = if arch_name.eq_ignore_ascii_case("tokyo") {
        &[SubgraphSize::Tokyo]
    } else {
        &[SubgraphSize::Small, SubgraphSize::Large]
    };
    let (opt_types, targets, ratios): (&[OptType], &[usize], &[QbgRatio]) = match kind {
        SuiteKind::Gate => (&[OptType::Opt1, OptType::Opt2], &GATE_TARGETS, &[QbgRatio::Tfl]),
        SuiteKind::Depth => (&[OptType::Depth], &DEPTH_TARGETS, &[QbgRatio::Tfl, QbgRatio::Qse]),
    };

    let mut entries = Vec::new();
    for &subgraph_size in sizes {
        for &opt_type in opt_types {
            for &target_cost in targets {
                for &qbg_ratio in ratios {
                    for repeat in 0..repeats {
                        let name = format!(
                            "{num_qubits}QBT_{}_{arch_name}_{}_{opt_type}_{target_cost}_{}_no.{repeat}",
                            kind.as_str(),
                            subgraph_size.as_str(),
                            qbg_ratio.value()
                        );
                        entries.push(SuiteEntry {
                            name,
                            subgraph_size,
                            opt_type,
                            target_cost,
                            qbg_ratio,
                            repeat,
                        });
                    }
                }
            }
        }
    }
    entries
}

/// Arguments of the suite command.
#[derive(Debug, Clone)]
pub struct SuiteArgs<'a> {
    pub kind: &'a str,
    pub arch: &'a str,
    pub repeats: usize,
    pub seed: u64,
    pub output: &'a Path,
    pub config: Option<&'a Path>,
    pub qasm_version: &'a str,
    pub overrides: ConfigOverrides,
}

/// Execute the suite command.
pub fn execute(args: &SuiteArgs<'_>) -> Result<()> {
    let kind = SuiteKind::parse(args.kind)?;
    let graph = load_arch(args.arch)?;
    let version = parse_qasm_version(args.qasm_version)?;
    let base_config = load_config(args.config, &args.overrides)?;

    let arch_name = file_arch_name(&graph);
    let benchmark = format!("{}Q_{}_{arch_name}", graph.num_qubits(), kind.as_str());
    let root = args.output.join(&benchmark);
    let entries = plan(kind, &arch_name, graph.num_qubits(), args.repeats);

    println!(
        "{} Generating suite {} ({} circuits)",
        style("→").cyan().bold(),
        style(&benchmark).green(),
        entries.len()
    );

    let progress = ProgressBar::new(entries.len() as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{bar:40.cyan/blue} {pos}/{len} {msg}")
            .context("Invalid progress bar template")?
            .progress_chars("##-"),
    );

    let started = Instant::now();
    let mut failed = 0usize;
    let mut seed = args.seed;
    for entry in &entries {
        progress.set_message(entry.name.clone());

        let mut config = base_config.clone();
        if args.overrides.qbg_ratio.is_none() {
            config.qbg_ratio = entry.qbg_ratio.value();
        }
        let quekno = Quekno::new(graph.clone(), config)?;
        match quekno.build(
            &entry.name,
            entry.opt_type,
            Target::Cost(entry.target_cost),
            entry.subgraph_size.value(),
            seed,
        ) {
            Ok(bench) => {
                export_benchmark(&root, &bench, version)?;
            }
            Err(e @ BenchError::GlinkSearchExhausted { .. }) => {
                warn!(name = %entry.name, "skipped: {e}");
                failed += 1;
            }
            Err(e) => {
                progress.abandon();
                return Err(e).with_context(|| format!("Failed to build {}", entry.name));
            }
        }
        seed += 1;
        progress.inc(1);
    }
    progress.finish_and_clear();

    println!(
        "{} Generated {} circuits in {:.3} s",
        style("✓").green().bold(),
        entries.len() - failed,
        started.elapsed().as_secs_f64()
    );
    if failed > 0 {
        println!(
            "  {} {} circuits skipped after exhausting the glink search",
            style("!").yellow().bold(),
            failed
        );
    }
    println!("  Output: {}", style(root.display()).green());

    Ok(())
}
