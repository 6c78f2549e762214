//! Integration tests for the table model and type coercion

mod common;

use common::{jan, sales_table, EPSILON};
use insight_core::{ColumnKind, Error, InferredKind, Table};

#[test]
fn test_sales_table_shape() {
    let table = sales_table();
    assert_eq!(table.row_count(), 6);
    assert_eq!(table.column_count(), 4);
    assert_eq!(table.column_names(), vec!["sales", "units", "date", "region"]);
    assert_eq!(table.numeric_column_names(), vec!["sales", "units"]);
    assert_eq!(table.categorical_column_names(), vec!["date", "region"]);
}

#[test]
fn test_overview_counts_duplicates_and_missing() {
    let ov = sales_table().overview();
    // Rows 0 and 5 are identical
    assert_eq!(ov.duplicate_rows, 1);
    assert_eq!(ov.total_missing, 3);
    assert!((ov.missing_percentage - 3.0 / 24.0 * 100.0).abs() < EPSILON);

    let region = &ov.column_summaries[3];
    assert_eq!(region.name, "region");
    assert_eq!(region.missing, 1);
    assert_eq!(region.unique, 3);
}

#[test]
fn test_coerce_types_detects_dates() {
    let table = sales_table();
    let (typed, conversions) = table.coerce_types();

    let date = typed.column("date").unwrap();
    assert_eq!(date.kind(), ColumnKind::Datetime);
    assert_eq!(date.as_datetime().unwrap()[1], Some(jan(1)));
    assert_eq!(typed.column("region").unwrap().kind(), ColumnKind::Categorical);

    let kinds: Vec<_> = conversions.iter().map(|c| (c.column.as_str(), c.inferred)).collect();
    assert_eq!(
        kinds,
        vec![("date", InferredKind::Datetime), ("region", InferredKind::Text)]
    );
    assert_ne!(typed.fingerprint(), table.fingerprint());
}

#[test]
fn test_argsort_by_text_dates_matches_datetime_order() {
    let table = sales_table();
    let (typed, _) = table.coerce_types();
    let text_order = table.column("date").unwrap().argsort();
    let typed_order = typed.column("date").unwrap().argsort();
    assert_eq!(text_order, typed_order);
    assert_eq!(text_order, vec![1, 2, 0, 5, 4, 3]);
}

#[test]
fn test_sorted_view_via_take_rows() {
    let table = sales_table();
    let order = table.column("date").unwrap().argsort();
    let sorted = table.take_rows(&order);
    let sales = sorted.column("sales").unwrap().numeric_values().unwrap();
    assert_eq!(sales, &[Some(12.0), None, Some(10.0), Some(10.0), Some(18.0), Some(15.0)]);
}

#[test]
fn test_empty_table() {
    let table = Table::builder().build().unwrap();
    assert!(table.is_empty());
    let ov = table.overview();
    assert_eq!(ov.rows, 0);
    assert_eq!(ov.missing_percentage, 0.0);
    assert_eq!(ov.duplicate_rows, 0);
}

#[test]
fn test_require_column_error() {
    let table = sales_table();
    assert_eq!(
        table.require_column("profit").unwrap_err(),
        Error::ColumnNotFound("profit".to_string())
    );
}
