//! CLI command parsing and end-to-end tests.
//!
//! Tests cover argument parsing (via clap `try_parse_from`), the
//! behaviour the shared `common` helpers rely on, and full runs of the
//! `quekno` binary against a temporary output directory.

// The CLI is a binary crate, so parsing is validated on a mirror of the
// clap structs and the helpers through the underlying crates.

// ============================================================================
// commands::common equivalents
// ============================================================================

mod common_tests {
    use quekno_bench::{Config, QbgRatio, SubgraphSize, Target};
    use quekno_compile::CouplingMap;

    #[test]
    fn test_named_archs() {
        assert_eq!(CouplingMap::from_name("tokyo").unwrap().num_qubits(), 20);
        assert_eq!(CouplingMap::from_name("rochester").unwrap().num_qubits(), 53);
        assert_eq!(CouplingMap::from_name("sycamore54").unwrap().num_qubits(), 54);
        assert_eq!(CouplingMap::from_name("sycamore").unwrap().num_qubits(), 53);
    }

    #[test]
    fn test_parametric_archs() {
        let grid = CouplingMap::from_name("grid(3, 4)").unwrap();
        assert_eq!(grid.num_qubits(), 12);
        assert_eq!(grid.num_edges(), 17);
        assert_eq!(CouplingMap::from_name("Ring(6)").unwrap().num_edges(), 6);
    }

    #[test]
    fn test_unknown_arch() {
        assert!(CouplingMap::from_name("falcon").is_err());
        assert!(CouplingMap::from_name("grid(3)").is_err());
        assert!(CouplingMap::from_name("line(x)").is_err());
    }

    #[test]
    fn test_subgraph_presets() {
        assert_eq!("TOKYO".parse::<SubgraphSize>().unwrap(), SubgraphSize::Tokyo);
        assert_eq!("large".parse::<SubgraphSize>().unwrap(), SubgraphSize::Large);
        assert!("huge".parse::<SubgraphSize>().is_err());
    }

    #[test]
    fn test_ratio_presets() {
        assert_eq!("qse".parse::<QbgRatio>().unwrap(), QbgRatio::Qse);
        assert!("tfl".parse::<QbgRatio>().unwrap().value() > 0.0);
    }

    #[test]
    fn test_target_strings() {
        assert_eq!("gate_size=20".parse::<Target>().unwrap(), Target::GateSize(20));
        assert_eq!("depth = 7".parse::<Target>().unwrap(), Target::Depth(7));
        assert_eq!("cost=3".parse::<Target>().unwrap(), Target::Cost(3));
        assert!("swaps=3".parse::<Target>().is_err());
        assert!("cost".parse::<Target>().is_err());
    }

    #[test]
    fn test_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "glink_search_patience: 5\nqbg_ratio: 2.0\n").unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let config = Config::from_yaml(&text).unwrap();
        assert_eq!(config.glink_search_patience, 5);
        assert_eq!(config.qbg_ratio, 2.0);
        assert_eq!(config.rand_edges_var, Config::default().rand_edges_var);
        config.validate().unwrap();
    }
}

// ============================================================================
// Clap argument parsing (test via try_parse_from on equivalent structs)
// ============================================================================

mod clap_parsing {
    use std::path::PathBuf;

    use clap::{Args, Parser, Subcommand};

    // Mirror the CLI struct for testing (since main.rs is a binary)
    #[derive(Parser)]
    #[command(name = "quekno")]
    struct TestCli {
        #[arg(short, long, action = clap::ArgAction::Count, global = true)]
        verbose: u8,

        #[command(subcommand)]
        command: TestCommands,
    }

    #[derive(Args)]
    struct TestGeneratorOptions {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(long, default_value = "2")]
        qasm_version: String,
        #[arg(long)]
        patience: Option<usize>,
        #[arg(long)]
        qbg_ratio: Option<String>,
        #[arg(long)]
        two_qubit_gate: Option<String>,
    }

    #[derive(Subcommand)]
    enum TestCommands {
        Generate {
            #[arg(short, long, default_value = "tokyo")]
            arch: String,
            #[arg(long, default_value = "opt1")]
            opt_type: String,
            #[arg(short, long)]
            target: String,
            #[arg(long, default_value = "tokyo")]
            subgraph_size: String,
            #[arg(long, default_value = "0")]
            seed: u64,
            #[arg(long)]
            name: Option<String>,
            #[arg(short, long, default_value = ".")]
            output: PathBuf,
            #[command(flatten)]
            options: TestGeneratorOptions,
        },
        Suite {
            #[arg(short, long, default_value = "gate")]
            kind: String,
            #[arg(short, long, default_value = "tokyo")]
            arch: String,
            #[arg(short, long, default_value = "10")]
            repeats: usize,
            #[arg(long, default_value = "0")]
            seed: u64,
            #[arg(short, long, default_value = "quekno_suite")]
            output: PathBuf,
            #[command(flatten)]
            options: TestGeneratorOptions,
        },
        Archs,
        Version,
    }

    // --- Generate command ---

    #[test]
    fn test_parse_generate_minimal() {
        let cli = TestCli::try_parse_from(["quekno", "generate", "-t", "cost=5"]).unwrap();
        match cli.command {
            TestCommands::Generate {
                arch,
                opt_type,
                target,
                subgraph_size,
                seed,
                name,
                output,
                options,
            } => {
                assert_eq!(arch, "tokyo");
                assert_eq!(opt_type, "opt1");
                assert_eq!(target, "cost=5");
                assert_eq!(subgraph_size, "tokyo");
                assert_eq!(seed, 0);
                assert!(name.is_none());
                assert_eq!(output, PathBuf::from("."));
                assert_eq!(options.qasm_version, "2");
                assert!(options.config.is_none());
                assert!(options.patience.is_none());
            }
            _ => panic!("expected Generate"),
        }
    }

    #[test]
    fn test_parse_generate_with_all_args() {
        let cli = TestCli::try_parse_from([
            "quekno",
            "generate",
            "-a",
            "grid(3, 4)",
            "--opt-type",
            "depth",
            "-t",
            "depth=30",
            "--subgraph-size",
            "6.5",
            "--seed",
            "42",
            "--name",
            "bench",
            "-o",
            "out",
            "-c",
            "quekno.yaml",
            "--qasm-version",
            "3",
            "--patience",
            "8",
            "--qbg-ratio",
            "qse",
            "--two-qubit-gate",
            "cz",
        ])
        .unwrap();
        match cli.command {
            TestCommands::Generate {
                arch,
                opt_type,
                target,
                subgraph_size,
                seed,
                name,
                output,
                options,
            } => {
                assert_eq!(arch, "grid(3, 4)");
                assert_eq!(opt_type, "depth");
                assert_eq!(target, "depth=30");
                assert_eq!(subgraph_size, "6.5");
                assert_eq!(seed, 42);
                assert_eq!(name.as_deref(), Some("bench"));
                assert_eq!(output, PathBuf::from("out"));
                assert_eq!(options.config, Some(PathBuf::from("quekno.yaml")));
                assert_eq!(options.qasm_version, "3");
                assert_eq!(options.patience, Some(8));
                assert_eq!(options.qbg_ratio.as_deref(), Some("qse"));
                assert_eq!(options.two_qubit_gate.as_deref(), Some("cz"));
            }
            _ => panic!("expected Generate"),
        }
    }

    #[test]
    fn test_parse_generate_missing_target() {
        let result = TestCli::try_parse_from(["quekno", "generate"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_generate_bad_seed() {
        let result = TestCli::try_parse_from(["quekno", "generate", "-t", "cost=1", "--seed", "-3"]);
        assert!(result.is_err());
    }

    // --- Suite command ---

    #[test]
    fn test_parse_suite_defaults() {
        let cli = TestCli::try_parse_from(["quekno", "suite"]).unwrap();
        match cli.command {
            TestCommands::Suite {
                kind,
                arch,
                repeats,
                seed,
                output,
                options,
            } => {
                assert_eq!(kind, "gate");
                assert_eq!(arch, "tokyo");
                assert_eq!(repeats, 10);
                assert_eq!(seed, 0);
                assert_eq!(output, PathBuf::from("quekno_suite"));
                assert_eq!(options.qasm_version, "2");
            }
            _ => panic!("expected Suite"),
        }
    }

    #[test]
    fn test_parse_suite_depth() {
        let cli = TestCli::try_parse_from([
            "quekno", "suite", "-k", "depth", "-a", "rochester", "-r", "2", "--seed", "100",
        ])
        .unwrap();
        match cli.command {
            TestCommands::Suite {
                kind,
                arch,
                repeats,
                seed,
                ..
            } => {
                assert_eq!(kind, "depth");
                assert_eq!(arch, "rochester");
                assert_eq!(repeats, 2);
                assert_eq!(seed, 100);
            }
            _ => panic!("expected Suite"),
        }
    }

    // --- Other commands ---

    #[test]
    fn test_parse_archs() {
        let cli = TestCli::try_parse_from(["quekno", "archs"]).unwrap();
        assert!(matches!(cli.command, TestCommands::Archs));
    }

    #[test]
    fn test_parse_version() {
        let cli = TestCli::try_parse_from(["quekno", "version"]).unwrap();
        assert!(matches!(cli.command, TestCommands::Version));
    }

    // --- Verbose flag ---

    #[test]
    fn test_parse_verbose_flag() {
        let cli = TestCli::try_parse_from(["quekno", "-v", "version"]).unwrap();
        assert_eq!(cli.verbose, 1);
    }

    #[test]
    fn test_parse_verbose_after_subcommand() {
        let cli = TestCli::try_parse_from(["quekno", "generate", "-t", "cost=1", "-vv"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }

    // --- Error cases ---

    #[test]
    fn test_no_subcommand() {
        let result = TestCli::try_parse_from(["quekno"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_subcommand() {
        let result = TestCli::try_parse_from(["quekno", "route"]);
        assert!(result.is_err());
    }
}

// ============================================================================
// End-to-end runs of the binary
// ============================================================================

mod end_to_end {
    use std::path::Path;
    use std::process::{Command, Output};

    fn quekno(args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_quekno"))
            .args(args)
            .output()
            .unwrap()
    }

    fn generate_ring(output: &Path, name: &str, extra: &[&str]) -> Output {
        let out = output.to_str().unwrap();
        let mut args = vec![
            "generate",
            "-a",
            "ring(5)",
            "-t",
            "gate_size=20",
            "--subgraph-size",
            "4",
            "--seed",
            "17",
            "--name",
            name,
            "-o",
            out,
        ];
        args.extend_from_slice(extra);
        quekno(&args)
    }

    #[test]
    fn test_generate_writes_three_files() {
        let dir = tempfile::tempdir().unwrap();
        let output = generate_ring(dir.path(), "ring_bench", &[]);
        assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

        let circuit = dir.path().join("circuits").join("ring_bench.qasm");
        let barriered = dir.path().join("circuits_barriered").join("ring_bench.qasm");
        let results = dir.path().join("results").join("ring_bench.json");
        assert!(circuit.exists());
        assert!(barriered.exists());
        assert!(results.exists());

        let qasm = std::fs::read_to_string(&circuit).unwrap();
        assert!(qasm.starts_with("OPENQASM 2.0;"));
        assert!(qasm.contains("qreg q[5];"));
        assert!(!qasm.contains("barrier"));

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&results).unwrap()).unwrap();
        assert_eq!(json["name"], "ring_bench");
        assert_eq!(json["opt_type"], "opt1");
        assert_eq!(json["archgraph"], "ring(5)");
        assert_eq!(json["num_qubits"], 5);
        assert_eq!(json["seed"], 17);
        assert_eq!(json["gate_size"], 20);
        assert_eq!(json["known_gate_cost"], json["cost"].as_u64().unwrap() * 3);

        let glinks = json["swaps"].as_array().unwrap().len() as u64;
        let barriers = std::fs::read_to_string(&barriered)
            .unwrap()
            .lines()
            .filter(|line| line.starts_with("barrier"))
            .count() as u64;
        assert_eq!(barriers, glinks);
    }

    #[test]
    fn test_generate_is_deterministic() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        assert!(generate_ring(first.path(), "b", &[]).status.success());
        assert!(generate_ring(second.path(), "b", &[]).status.success());

        let read = |root: &Path| std::fs::read_to_string(root.join("circuits").join("b.qasm")).unwrap();
        assert_eq!(read(first.path()), read(second.path()));
    }

    #[test]
    fn test_generate_qasm3() {
        let dir = tempfile::tempdir().unwrap();
        let output = generate_ring(dir.path(), "v3", &["--qasm-version", "3"]);
        assert!(output.status.success());

        let qasm = std::fs::read_to_string(dir.path().join("circuits").join("v3.qasm")).unwrap();
        assert!(qasm.starts_with("OPENQASM 3.0;"));
        assert!(qasm.contains("qubit[5] q;"));
    }

    #[test]
    fn test_generate_unknown_arch_fails() {
        let dir = tempfile::tempdir().unwrap();
        let output = quekno(&[
            "generate",
            "-a",
            "falcon",
            "-t",
            "cost=2",
            "-o",
            dir.path().to_str().unwrap(),
        ]);
        assert!(!output.status.success());
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("Error:"));
        assert!(stderr.contains("falcon"));
    }

    #[test]
    fn test_generate_zero_patience_fails() {
        let dir = tempfile::tempdir().unwrap();
        let output = generate_ring(dir.path(), "bad", &["--patience", "0"]);
        assert!(!output.status.success());
        assert!(!dir.path().join("circuits").join("bad.qasm").exists());
    }

    #[test]
    fn test_archs_lists_devices() {
        let output = quekno(&["archs"]);
        assert!(output.status.success());
        let stdout = String::from_utf8_lossy(&output.stdout);
        for name in ["tokyo", "rochester", "sycamore54", "sycamore"] {
            assert!(stdout.contains(name), "{name}");
        }
    }

    #[test]
    fn test_version_runs() {
        let output = quekno(&["version"]);
        assert!(output.status.success());
        assert!(String::from_utf8_lossy(&output.stdout).contains("quekno-bench"));
    }
}
