//! Model evaluation benchmarks.
//!
//! Covers the per-call cost of every model at a typical operating point and
//! how finite models scale with the size of their state space.
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use queuecalc::models::{param_values, MmInfinite, MmcFinite, MmrRepair, ModelKind, QueueModel};

/// One stable configuration per model, through validation and the guard.
fn bench_models(c: &mut Criterion) {
    let mut group = c.benchmark_group("compute");
    group.sample_size(100);
    group.confidence_level(0.95);

    let cases = [
        (ModelKind::Mm1Inf, vec![("lambda", 1.0), ("mu", 2.0)]),
        (ModelKind::Mm1N, vec![("lambda", 1.0), ("mu", 2.0), ("N", 50.0)]),
        (ModelKind::MmcInf, vec![("lambda", 4.0), ("mu", 2.0), ("c", 3.0)]),
        (ModelKind::MmcN, vec![("lambda", 4.0), ("mu", 2.0), ("c", 3.0), ("N", 50.0)]),
        (ModelKind::Mminf, vec![("lambda", 2.0), ("mu", 1.0)]),
        (ModelKind::MmrRepair, vec![("lambda", 0.1), ("mu", 1.0), ("R", 2.0), ("K", 20.0)]),
        (ModelKind::Mg1Pk, vec![("lambda", 1.0), ("meanService", 0.5), ("varService", 0.1)]),
    ];

    for (kind, pairs) in cases {
        let spec = kind.spec();
        let params = param_values(pairs);
        group.bench_with_input(BenchmarkId::new("evaluate", kind.id()), &params, |b, params| {
            b.iter(|| black_box(spec.evaluate(black_box(params))));
        });
    }

    group.finish();
}

/// Finite models walk their full range for aggregates.
fn bench_large_state_spaces(c: &mut Criterion) {
    let mut group = c.benchmark_group("state_space");
    group.sample_size(50);

    for capacity in [100_u64, 10_000, 1_000_000] {
        group.bench_with_input(BenchmarkId::new("mmc_n", capacity), &capacity, |b, &n| {
            let model = MmcFinite::new(9.0, 1.0, 10, n);
            b.iter(|| black_box(model.compute()));
        });
    }

    for population in [100_u64, 10_000, 100_000] {
        group.bench_with_input(
            BenchmarkId::new("mmr_repair", population),
            &population,
            |b, &k| {
                let model = MmrRepair::new(0.001, 1.0, 5, k);
                b.iter(|| black_box(model.compute()));
            },
        );
    }

    for load in [10.0, 1_000.0, 100_000.0] {
        group.bench_with_input(BenchmarkId::new("mminf", load), &load, |b, &a| {
            let model = MmInfinite::new(a, 1.0);
            b.iter(|| black_box(model.compute()));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_models, bench_large_state_spaces);
criterion_main!(benches);
