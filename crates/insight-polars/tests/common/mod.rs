//! Common test utilities for insight-polars tests

#![allow(dead_code)]

use polars::prelude::*;

/// Mixed-dtype frame: floats with a null, integers, strings, booleans
pub fn mixed_df() -> DataFrame {
    df![
        "price" => [Some(1.5), None, Some(3.0)],
        "qty" => [1i64, 2, 3],
        "region" => [Some("north"), Some("south"), None],
        "flag" => [true, false, true],
    ]
    .unwrap()
}

/// Frame with a `Date` column counted in days from 1970-01-01
pub fn dated_df(days: &[i32], values: &[f64]) -> DataFrame {
    let date = Series::new(PlSmallStr::from("date"), days)
        .cast(&DataType::Date)
        .unwrap();
    DataFrame::new(vec![
        date.into(),
        Series::new(PlSmallStr::from("value"), values).into(),
    ])
    .unwrap()
}
