//! QUEKNO Command-Line Interface
//!
//! Generates qubit-routing benchmark circuits whose optimal routing cost
//! is known by construction, and exports them as OpenQASM together with
//! their metadata.

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use console::style;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::common::ConfigOverrides;
use commands::{archs, generate, suite, version};

/// QUEKNO - routing benchmarks with known optimal cost
#[derive(Parser)]
#[command(name = "quekno")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Options shared by the generating commands.
#[derive(Args)]
struct GeneratorOptions {
    /// YAML config file (defaults are used when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// OpenQASM version of the exported circuits (2 or 3)
    #[arg(long, default_value = "2")]
    qasm_version: String,

    /// Failed glink searches tolerated per layer
    #[arg(long)]
    patience: Option<usize>,

    /// One- to two-qubit gate ratio (tfl, qse or a number)
    #[arg(long)]
    qbg_ratio: Option<String>,

    /// Two-qubit gate used for layers and swaps (cx, cz)
    #[arg(long)]
    two_qubit_gate: Option<String>,
}

impl GeneratorOptions {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            patience: self.patience,
            qbg_ratio: self.qbg_ratio.clone(),
            two_qubit_gate: self.two_qubit_gate.clone(),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Generate one benchmark circuit
    Generate {
        /// Target architecture (tokyo, rochester, sycamore, grid(3, 4), ...)
        #[arg(short, long, default_value = "tokyo")]
        arch: String,

        /// Objective (opt1, opt2, depth)
        #[arg(long, default_value = "opt1")]
        opt_type: String,

        /// Stopping condition (gate_size=N, depth=N, cost=N)
        #[arg(short, long)]
        target: String,

        /// Mean glink size (tokyo, small, large or a number of edges)
        #[arg(long, default_value = "tokyo")]
        subgraph_size: String,

        /// Random seed
        #[arg(long, default_value = "0")]
        seed: u64,

        /// Benchmark name (derived from the parameters when omitted)
        #[arg(long)]
        name: Option<String>,

        /// Output directory
        #[arg(short, long, default_value = ".")]
        output: PathBuf,

        #[command(flatten)]
        options: GeneratorOptions,
    },

    /// Generate a full benchmark suite
    Suite {
        /// Suite kind (gate, depth)
        #[arg(short, long, default_value = "gate")]
        kind: String,

        /// Target architecture
        #[arg(short, long, default_value = "tokyo")]
        arch: String,

        /// Circuits per parameter combination
        #[arg(short, long, default_value = "10")]
        repeats: usize,

        /// Seed of the first circuit; later circuits count up from it
        #[arg(long, default_value = "0")]
        seed: u64,

        /// Output directory
        #[arg(short, long, default_value = "quekno_suite")]
        output: PathBuf,

        #[command(flatten)]
        options: GeneratorOptions,
    },

    /// List available architectures
    Archs,

    /// Show version information
    Version,
}

fn main() {
    let cli = Cli::parse();

    // Setup logging
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .init();

    // Execute command
    let result = match cli.command {
        Commands::Generate {
            arch,
            opt_type,
            target,
            subgraph_size,
            seed,
            name,
            output,
            options,
        } => generate::execute(&generate::GenerateArgs {
            arch: &arch,
            opt_type: &opt_type,
            target: &target,
            subgraph_size: &subgraph_size,
            seed,
            name: name.as_deref(),
            output: &output,
            config: options.config.as_deref(),
            qasm_version: &options.qasm_version,
            overrides: options.overrides(),
        }),

        Commands::Suite {
            kind,
            arch,
            repeats,
            seed,
            output,
            options,
        } => suite::execute(&suite::SuiteArgs {
            kind: &kind,
            arch: &arch,
            repeats,
            seed,
            output: &output,
            config: options.config.as_deref(),
            qasm_version: &options.qasm_version,
            overrides: options.overrides(),
        }),

        Commands::Archs => archs::execute(),

        Commands::Version => {
            version::execute();
            Ok(())
        }
    };

    // Handle errors
    if let Err(e) = result {
        eprintln!("{} {e:#}", style("Error:").red().bold());
        std::process::exit(1);
    }
}
