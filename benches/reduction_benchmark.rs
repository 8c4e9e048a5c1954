//! Benchmark for correlation-cluster pruning across mask widths
//!
//! Run with: cargo bench --bench reduction_benchmark

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use faer::Mat;
use rand::prelude::*;
use rand::SeedableRng;

use rhosel::selection::reduce_correlated;

/// Synthetic data where consecutive blocks of 4 columns share a latent
/// driver, giving the clustering real structure to find.
fn generate_blocked_matrix(n_rows: usize, n_features: usize, seed: u64) -> Mat<f64> {
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);

    let n_blocks = n_features.div_ceil(4);
    let drivers: Vec<Vec<f64>> = (0..n_blocks)
        .map(|_| (0..n_rows).map(|_| rng.gen::<f64>() * 10.0).collect())
        .collect();

    let noise: Vec<Vec<f64>> = (0..n_features)
        .map(|_| (0..n_rows).map(|_| rng.gen::<f64>()).collect())
        .collect();

    Mat::from_fn(n_rows, n_features, |i, j| {
        drivers[j / 4][i] + noise[j][i]
    })
}

fn bench_reduction(c: &mut Criterion) {
    let mut group = c.benchmark_group("redundancy_reduction");

    for &n_features in &[16usize, 64, 128] {
        let x = generate_blocked_matrix(500, n_features, 42);
        let support = vec![true; n_features];

        group.throughput(Throughput::Elements(n_features as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(n_features),
            &n_features,
            |b, _| {
                b.iter(|| {
                    let mask = reduce_correlated(black_box(&x), &support, 0.8).unwrap();
                    black_box(mask)
                })
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_reduction);
criterion_main!(benches);
