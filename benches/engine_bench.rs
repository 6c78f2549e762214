//! Engine benchmarks over synthetic tables
//!
//! Benchmark IDs encode the table size: `group/method/n<rows>`.
//!
//! Run with: cargo bench --bench engine_bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};
use std::time::Duration;
use tabular_insight::prelude::*;

const SIZES: [usize; 3] = [1_000, 10_000, 50_000];

fn synthetic_table(rows: usize, columns: usize) -> Table {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let normal = Normal::new(0.0, 1.0).unwrap();
    (0..columns)
        .fold(Table::builder(), |builder, c| {
            let values: Vec<f64> = (0..rows)
                .map(|i| i as f64 * 0.01 * c as f64 + normal.sample(&mut rng))
                .collect();
            builder.values(format!("x{c}"), values)
        })
        .build()
        .unwrap()
}

fn bench_stats(c: &mut Criterion) {
    let mut group = c.benchmark_group("stats");
    for &n in &SIZES {
        let table = synthetic_table(n, 4);
        let engine = StatsEngine::new(&table);
        group.throughput(Throughput::Elements(n as u64));

        group.bench_with_input(BenchmarkId::new("descriptive", format!("n{n}")), &n, |b, _| {
            b.iter(|| black_box(engine.descriptive_statistics()))
        });
        for method in [CorrelationMethod::Pearson, CorrelationMethod::Spearman] {
            group.bench_with_input(
                BenchmarkId::new(method.name(), format!("n{n}")),
                &n,
                |b, _| b.iter(|| black_box(engine.correlation_analysis(method))),
            );
        }
    }
    group.finish();
}

fn bench_kendall(c: &mut Criterion) {
    let mut group = c.benchmark_group("kendall");
    for &n in &SIZES {
        let table = synthetic_table(n, 2);
        let engine = StatsEngine::new(&table);
        group.bench_with_input(BenchmarkId::new("kendall", format!("n{n}")), &n, |b, _| {
            b.iter(|| black_box(engine.correlation_analysis(CorrelationMethod::Kendall)))
        });
    }
    group.finish();
}

fn bench_outliers(c: &mut Criterion) {
    let mut group = c.benchmark_group("outliers");
    group.measurement_time(Duration::from_secs(10));
    for &n in &SIZES {
        let table = synthetic_table(n, 3);
        let engine = OutlierEngine::new(&table);
        group.throughput(Throughput::Elements(n as u64));

        group.bench_with_input(BenchmarkId::new("iqr", format!("n{n}")), &n, |b, _| {
            b.iter(|| black_box(engine.detect_iqr(None, 1.5).unwrap()))
        });
        group.bench_with_input(BenchmarkId::new("zscore", format!("n{n}")), &n, |b, _| {
            b.iter(|| black_box(engine.detect_zscore(None, 3.0).unwrap()))
        });
        group.bench_with_input(
            BenchmarkId::new("isolation_forest", format!("n{n}")),
            &n,
            |b, _| b.iter(|| black_box(engine.detect_isolation(0.1, 42).unwrap())),
        );
    }
    group.finish();
}

fn bench_report(c: &mut Criterion) {
    let mut group = c.benchmark_group("report");
    group.sample_size(20);
    let config = AnalysisConfig::default();
    for &n in &SIZES[..2] {
        let table = synthetic_table(n, 4);
        group.bench_with_input(BenchmarkId::new("build", format!("n{n}")), &n, |b, _| {
            b.iter(|| black_box(AnalysisReport::build(&table, &config).unwrap()))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_stats, bench_kendall, bench_outliers, bench_report);
criterion_main!(benches);
