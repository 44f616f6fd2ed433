//! Benchmarks for chain generation and swap decomposition
//!
//! Run with: cargo bench -p quekno-bench

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use rand::SeedableRng;
use rand::rngs::SmallRng;

use quekno_bench::permutation::decompose_to_swaps;
use quekno_bench::{Config, OptType, Permutation, Target, generate_chain};
use quekno_compile::CouplingMap;

/// Benchmark full chain generation per objective
fn bench_generate_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate_chain");
    group.sample_size(20);
    let config = Config::default();
    let grid = CouplingMap::grid(3, 4);

    for (opt_type, target) in [
        (OptType::Opt1, Target::Cost(5)),
        (OptType::Opt2, Target::Cost(5)),
        (OptType::Depth, Target::Depth(30)),
    ] {
        group.bench_with_input(
            BenchmarkId::new("grid_3x4", opt_type),
            &(opt_type, target),
            |b, &(opt_type, target)| {
                let mut seed = 0;
                b.iter(|| {
                    seed += 1;
                    let mut rng = SmallRng::seed_from_u64(seed);
                    generate_chain(&grid, opt_type, target, 8.0, &config, &mut rng)
                });
            },
        );
    }

    group.finish();
}

/// Benchmark shortest swap sequences for a reversed line
fn bench_decompose_reversal(c: &mut Criterion) {
    let mut group = c.benchmark_group("decompose_to_swaps");

    for n in &[3_u32, 4, 5] {
        let line = CouplingMap::linear(*n);
        let from = Permutation::identity(*n);
        let to = match Permutation::from_vec((0..*n).rev().collect()) {
            Ok(pi) => pi,
            Err(_) => continue,
        };
        group.bench_with_input(BenchmarkId::new("line_reversal", n), n, |b, _| {
            let mut rng = SmallRng::seed_from_u64(0);
            b.iter(|| {
                decompose_to_swaps(
                    black_box(&from),
                    black_box(&to),
                    &line,
                    0.0,
                    1_000_000,
                    &mut rng,
                )
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_generate_chain, bench_decompose_reversal);
criterion_main!(benches);
