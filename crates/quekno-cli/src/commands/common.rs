//! Shared helpers for CLI commands.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use quekno_bench::{Benchmark, Config, QbgRatio, SubgraphSize};
use quekno_compile::CouplingMap;
use quekno_ir::StandardGate;
use quekno_qasm::{QasmVersion, write_qasm};

/// Config fields that can be overridden from the command line.
#[derive(Debug, Default, Clone)]
pub struct ConfigOverrides {
    pub patience: Option<usize>,
    pub qbg_ratio: Option<String>,
    pub two_qubit_gate: Option<String>,
}

/// Load the config file (or defaults) and apply command-line overrides.
pub fn load_config(path: Option<&Path>, overrides: &ConfigOverrides) -> Result<Config> {
    let mut config = match path {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            Config::from_yaml(&text)
                .with_context(|| format!("Invalid config file: {}", path.display()))?
        }
        None => Config::default(),
    };

    if let Some(patience) = overrides.patience {
        config.glink_search_patience = patience;
    }
    if let Some(ratio) = &overrides.qbg_ratio {
        config.qbg_ratio = parse_qbg_ratio(ratio)?;
    }
    if let Some(gate) = &overrides.two_qubit_gate {
        config.two_qubit_gate = gate
            .parse::<StandardGate>()
            .map_err(|e| anyhow::anyhow!("Invalid two-qubit gate '{gate}': {e}"))?;
    }
    config.validate()?;
    Ok(config)
}

/// Resolve an architecture name such as `tokyo` or `grid(3, 4)`.
pub fn load_arch(name: &str) -> Result<CouplingMap> {
    CouplingMap::from_name(name).with_context(|| {
        format!(
            "Unknown architecture '{name}'. Available: tokyo, rochester, sycamore, sycamore54, \
             line(n), ring(n), star(n), full(n), grid(rows, cols)"
        )
    })
}

/// A preset (`tokyo`, `small`, `large`) or a number of edges.
pub fn parse_subgraph_size(text: &str) -> Result<f64> {
    if let Ok(preset) = text.parse::<SubgraphSize>() {
        return Ok(preset.value());
    }
    let value: f64 = text
        .parse()
        .map_err(|_| anyhow::anyhow!("Invalid subgraph size '{text}' (use tokyo, small, large or a number)"))?;
    if !value.is_finite() || value <= 0.0 {
        anyhow::bail!("Subgraph size must be positive, got {value}");
    }
    Ok(value)
}

/// A preset (`tfl`, `qse`) or a number.
pub fn parse_qbg_ratio(text: &str) -> Result<f64> {
    if let Ok(preset) = text.parse::<QbgRatio>() {
        return Ok(preset.value());
    }
    text.parse()
        .map_err(|_| anyhow::anyhow!("Invalid gate ratio '{text}' (use tfl, qse or a number)"))
}

pub fn parse_qasm_version(text: &str) -> Result<QasmVersion> {
    text.parse::<QasmVersion>().map_err(|e| anyhow::anyhow!(e))
}

/// Architecture name as used in file names: `grid(3, 4)` becomes `Grid_3_4`.
pub fn file_arch_name(graph: &CouplingMap) -> String {
    let mut name = String::new();
    let mut pending_sep = false;
    for c in graph.name().chars() {
        if c.is_ascii_alphanumeric() {
            if pending_sep && !name.is_empty() {
                name.push('_');
            }
            pending_sep = false;
            if name.is_empty() {
                name.push(c.to_ascii_uppercase());
            } else {
                name.push(c);
            }
        } else {
            pending_sep = true;
        }
    }
    name
}

/// Files written for one benchmark.
#[derive(Debug, Clone)]
pub struct ExportedFiles {
    pub circuit: PathBuf,
    pub barriered: PathBuf,
    pub results: PathBuf,
}

/// Write the circuit, its barriered copy and the metadata under `root`.
pub fn export_benchmark(root: &Path, bench: &Benchmark, version: QasmVersion) -> Result<ExportedFiles> {
    let name = &bench.metadata.name;
    let dirs = [
        root.join("circuits"),
        root.join("circuits_barriered"),
        root.join("results"),
    ];
    for dir in &dirs {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;
    }
    let [circuits, barriered_dir, results_dir] = dirs;

    let files = ExportedFiles {
        circuit: circuits.join(format!("{name}.qasm")),
        barriered: barriered_dir.join(format!("{name}.qasm")),
        results: results_dir.join(format!("{name}.json")),
    };

    write_qasm(&files.circuit, &bench.circuit.circuit, version)?;
    let barriered = bench.circuit.with_barriers()?;
    write_qasm(&files.barriered, &barriered, version)?;

    let json = bench.report().to_json()?;
    fs::write(&files.results, json)
        .with_context(|| format!("Failed to write file: {}", files.results.display()))?;

    Ok(files)
}
