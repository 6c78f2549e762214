//! Shared utilities for insight-core integration tests

#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use insight_core::Table;

pub const EPSILON: f64 = 1e-10;

/// Midnight on the given day of January 2022
pub fn jan(day: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2022, 1, day)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap()
}

/// Small mixed-kind table: two numeric columns, a text date column and a
/// text category column.
pub fn sales_table() -> Table {
    Table::builder()
        .values("sales", [10.0, 12.0, f64::NAN, 15.0, 18.0, 10.0])
        .integer("units", [Some(1), Some(2), Some(2), None, Some(4), Some(1)])
        .categorical(
            "date",
            [
                Some("2022-01-03"),
                Some("2022-01-01"),
                Some("2022-01-02"),
                Some("2022-01-05"),
                Some("2022-01-04"),
                Some("2022-01-03"),
            ],
        )
        .categorical(
            "region",
            [Some("north"), Some("south"), Some("north"), None, Some("east"), Some("north")],
        )
        .build()
        .unwrap()
}
