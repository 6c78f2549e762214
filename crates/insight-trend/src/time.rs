//! Time axis detection

use insight_core::classify::parse_datetime;
use insight_core::{Column, ColumnKind, Table};

/// Whether a text column holds at least one value and every value parses as
/// a date.
pub fn is_date_text(column: &Column) -> bool {
    match column.as_text() {
        Some(cells) => {
            let mut present = cells.iter().flatten().peekable();
            present.peek().is_some() && present.all(|s| parse_datetime(s).is_some())
        }
        None => false,
    }
}

/// First datetime column in declaration order, else the first text column
/// whose values all parse as dates.
pub fn detect_time_column(table: &Table) -> Option<&str> {
    table
        .columns()
        .iter()
        .find(|c| c.kind() == ColumnKind::Datetime)
        .or_else(|| table.columns().iter().find(|c| is_date_text(c)))
        .map(Column::name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_datetime_column_preferred() {
        let day = chrono::NaiveDate::from_ymd_opt(2022, 1, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0));
        let table = Table::builder()
            .categorical("text_date", [Some("2022-01-01")])
            .datetime("when", [day])
            .build()
            .unwrap();
        assert_eq!(detect_time_column(&table), Some("when"));
    }

    #[test]
    fn test_text_dates_detected() {
        let table = Table::builder()
            .categorical("region", [Some("north"), Some("south")])
            .categorical("date", [Some("01/02/2022"), None])
            .values("v", [1.0, 2.0])
            .build()
            .unwrap();
        assert_eq!(detect_time_column(&table), Some("date"));
    }

    #[test]
    fn test_no_time_axis() {
        let table = Table::builder()
            .categorical("date", [None::<&str>, None])
            .categorical("mixed", [Some("2022-01-01"), Some("soon")])
            .values("v", [1.0, 2.0])
            .build()
            .unwrap();
        assert_eq!(detect_time_column(&table), None);
    }
}
