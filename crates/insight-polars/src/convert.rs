//! Conversions between Polars frames and tables

use crate::{Error, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use insight_core::{Column as TableColumn, ColumnData, Table};
use polars::prelude::*;
use tracing::debug;

/// Days from 0001-01-01 to 1970-01-01
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

fn name_of(column: &Column) -> String {
    column.name().to_string()
}

fn numeric(column: &Column) -> Result<TableColumn> {
    let cast = column.cast(&DataType::Float64)?;
    let values: Vec<Option<f64>> = cast.f64()?.into_iter().collect();
    Ok(TableColumn::numeric(name_of(column), values))
}

fn text(column: &Column) -> Result<TableColumn> {
    let cast = column.cast(&DataType::String)?;
    let values: Vec<Option<String>> = cast
        .str()?
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect();
    Ok(TableColumn::categorical(name_of(column), values))
}

fn date(column: &Column) -> Result<TableColumn> {
    let name = name_of(column);
    let days = column.cast(&DataType::Int32)?;
    let values = days
        .i32()?
        .into_iter()
        .map(|cell| match cell {
            None => Ok(None),
            Some(d) => d
                .checked_add(UNIX_EPOCH_DAYS_FROM_CE)
                .and_then(NaiveDate::from_num_days_from_ce_opt)
                .and_then(|date| date.and_hms_opt(0, 0, 0))
                .map(Some)
                .ok_or_else(|| Error::TimestampOutOfRange {
                    column: name.clone(),
                    value: d as i64,
                }),
        })
        .collect::<Result<Vec<Option<NaiveDateTime>>>>()?;
    Ok(TableColumn::datetime(name, values))
}

fn datetime(column: &Column, unit: TimeUnit) -> Result<TableColumn> {
    let name = name_of(column);
    let raw = column.cast(&DataType::Int64)?;
    let values = raw
        .i64()?
        .into_iter()
        .map(|cell| match cell {
            None => Ok(None),
            Some(v) => {
                let ts = match unit {
                    TimeUnit::Milliseconds => DateTime::from_timestamp_millis(v),
                    TimeUnit::Microseconds => DateTime::from_timestamp_micros(v),
                    TimeUnit::Nanoseconds => Some(DateTime::from_timestamp_nanos(v)),
                };
                ts.map(|t| Some(t.naive_utc()))
                    .ok_or_else(|| Error::TimestampOutOfRange {
                        column: name.clone(),
                        value: v,
                    })
            }
        })
        .collect::<Result<Vec<Option<NaiveDateTime>>>>()?;
    Ok(TableColumn::datetime(name, values))
}

/// Convert one Polars column.
///
/// Integer and float dtypes become numeric, `Date` and `Datetime` become
/// datetime (time zones are dropped, values are read as UTC), `Boolean`
/// becomes categorical `"true"`/`"false"`, and everything else is read as
/// text.
pub fn column_to_table_column(column: &Column) -> Result<TableColumn> {
    match column.dtype() {
        DataType::Int32
        | DataType::Int64
        | DataType::UInt32
        | DataType::UInt64
        | DataType::Float32
        | DataType::Float64 => numeric(column),
        DataType::Date => date(column),
        DataType::Datetime(unit, _) => datetime(column, *unit),
        _ => text(column),
    }
}

/// Build a [`Table`] from every column of a frame.
pub fn dataframe_to_table(df: &DataFrame) -> Result<Table> {
    let columns = df
        .get_columns()
        .iter()
        .map(column_to_table_column)
        .collect::<Result<Vec<_>>>()?;
    let table = Table::new(columns)?;
    debug!(
        rows = table.row_count(),
        columns = table.column_count(),
        "converted DataFrame to table"
    );
    Ok(table)
}

/// Build a frame from a table. Datetime columns are written with millisecond
/// precision.
pub fn table_to_dataframe(table: &Table) -> Result<DataFrame> {
    let columns = table
        .columns()
        .iter()
        .map(|col| -> Result<Column> {
            let name = PlSmallStr::from(col.name());
            let series = match col.data() {
                ColumnData::Numeric(v) => Series::new(name, v.as_slice()),
                ColumnData::Categorical(v) => Series::new(name, v.as_slice()),
                ColumnData::Datetime(v) => {
                    let millis: Vec<Option<i64>> = v
                        .iter()
                        .map(|t| t.map(|t| t.and_utc().timestamp_millis()))
                        .collect();
                    Series::new(name, millis)
                        .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))?
                }
            };
            Ok(series.into())
        })
        .collect::<Result<Vec<Column>>>()?;
    Ok(DataFrame::new(columns)?)
}
