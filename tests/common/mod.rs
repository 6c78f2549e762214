//! Shared utilities for tabular-insight integration tests

#![allow(dead_code)]

use chrono::{Duration, NaiveDate, NaiveDateTime};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};
use tabular_insight::Table;

pub const EPSILON: f64 = 1e-10;

/// Route engine logs to the test writer. Safe to call from every test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// `n` consecutive days starting 2022-01-01
pub fn days(n: usize) -> Vec<Option<NaiveDateTime>> {
    let start = NaiveDate::from_ymd_opt(2022, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap();
    (0..n)
        .map(|i| Some(start + Duration::days(i as i64)))
        .collect()
}

/// Outlier, descending and gapped columns over six sequential dates.
pub fn fixture() -> Table {
    Table::builder()
        .values("A", [1.0, 2.0, 3.0, 4.0, 5.0, 100.0])
        .values("B", [5.0, 4.0, 3.0, 2.0, 1.0, 0.0])
        .values("C", [1.0, f64::NAN, 3.0, 4.0, 5.0, 6.0])
        .datetime("Date", days(6))
        .build()
        .unwrap()
}

/// Gaussian sales with a rising trend, a region label and a text date axis.
pub fn sales(n: usize, seed: u64) -> Table {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let noise = Normal::new(0.0, 5.0).unwrap();
    let regions = ["north", "south", "east", "west"];
    let dates: Vec<String> = days(n)
        .into_iter()
        .flatten()
        .map(|d| d.format("%Y-%m-%d").to_string())
        .collect();
    Table::builder()
        .categorical("date", dates.iter().map(|d| Some(d.as_str())))
        .values(
            "sales",
            (0..n).map(|i| 100.0 + 2.0 * i as f64 + noise.sample(&mut rng)),
        )
        .values("cost", (0..n).map(|_| 50.0 + noise.sample(&mut rng)))
        .categorical("region", (0..n).map(|i| Some(regions[i % regions.len()])))
        .build()
        .unwrap()
}
