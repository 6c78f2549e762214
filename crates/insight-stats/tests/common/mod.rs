//! Shared utilities for insight-stats integration tests

#![allow(dead_code)]

use insight_core::Table;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};

pub const EPSILON: f64 = 1e-10;

/// The four-column fixture used throughout: an outlier column, a descending
/// column, a column with a gap and a category.
pub fn fixture() -> Table {
    Table::builder()
        .values("A", [1.0, 2.0, 3.0, 4.0, 5.0, 100.0])
        .values("B", [5.0, 4.0, 3.0, 2.0, 1.0, 0.0])
        .values("C", [1.0, f64::NAN, 3.0, 4.0, 5.0, 6.0])
        .categorical(
            "region",
            [Some("north"), Some("south"), Some("north"), None, Some("east"), Some("north")],
        )
        .build()
        .unwrap()
}

/// Correlated gaussian columns `x`, `y = 2x + noise` and independent `z`.
pub fn gaussian_table(n: usize, seed: u64) -> Table {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let normal = Normal::new(0.0, 1.0).unwrap();
    let x: Vec<f64> = (0..n).map(|_| normal.sample(&mut rng)).collect();
    let y: Vec<f64> = x.iter().map(|v| 2.0 * v + 0.1 * normal.sample(&mut rng)).collect();
    let z: Vec<f64> = (0..n).map(|_| normal.sample(&mut rng)).collect();
    Table::builder()
        .values("x", x)
        .values("y", y)
        .values("z", z)
        .build()
        .unwrap()
}
