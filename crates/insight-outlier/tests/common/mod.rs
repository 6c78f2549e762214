//! Shared utilities for insight-outlier integration tests

#![allow(dead_code)]

use insight_core::Table;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};

/// Six-row fixture: `A` has one extreme value, `C`
/// has one gap.
pub fn fixture() -> Table {
    Table::builder()
        .values("A", [1.0, 2.0, 3.0, 4.0, 5.0, 100.0])
        .values("B", [5.0, 4.0, 3.0, 2.0, 1.0, 0.0])
        .values("C", [1.0, f64::NAN, 3.0, 4.0, 5.0, 6.0])
        .categorical("label", [Some("a"), Some("b"), Some("c"), Some("d"), Some("e"), Some("f")])
        .build()
        .unwrap()
}

/// Two-dimensional gaussian cluster of `n` rows with `outliers` far-away rows
/// appended at the end.
pub fn cluster_with_outliers(n: usize, outliers: usize, seed: u64) -> Table {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let normal = Normal::new(0.0, 1.0).unwrap();
    let mut x: Vec<f64> = (0..n).map(|_| normal.sample(&mut rng)).collect();
    let mut y: Vec<f64> = (0..n).map(|_| normal.sample(&mut rng)).collect();
    for _ in 0..outliers {
        x.push(rng.gen_range(40.0..60.0));
        y.push(rng.gen_range(-60.0..-40.0));
    }
    Table::builder().values("x", x).values("y", y).build().unwrap()
}
