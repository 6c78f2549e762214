//! Shared utilities for insight-trend integration tests

#![allow(dead_code)]

use chrono::{Duration, NaiveDate, NaiveDateTime};
use insight_core::Table;

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
