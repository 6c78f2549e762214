//! Trend analysis over a [`Table`]
//!
//! [`TrendEngine`] finds a time axis, fits straight-line trends of numeric
//! columns along it, and computes rolling means.
//!
//! Trends are fitted against sample *position* after sorting by time and
//! dropping missing values, not against the raw timestamps, so unevenly
//! spaced observations count as evenly spaced.
//!
//! The engine remembers the detected time column in a [`OnceCell`], which
//! makes it `!Sync`; create one engine per thread.
//!
//! # Example
//!
//! ```rust
//! use insight_core::Table;
//! use insight_trend::{TrendDirection, TrendEngine};
//!
//! let table = Table::builder()
//!     .categorical("date", [Some("2022-01-02"), Some("2022-01-01"), Some("2022-01-03")])
//!     .values("sales", [20.0, 10.0, 30.0])
//!     .build()
//!     .unwrap();
//!
//! let engine = TrendEngine::new(&table);
//! assert_eq!(engine.detect_time_column(), Some("date"));
//!
//! let trend = engine.identify_trend("sales", None).unwrap();
//! assert_eq!(trend.direction, TrendDirection::Increasing);
//! assert_eq!(trend.percent_change, 200.0);
//! ```

pub mod moving;
pub mod regression;
pub mod time;
pub mod types;

pub use moving::MovingAverage;
pub use regression::LinearFit;
pub use types::{TrendDirection, TrendResult};

use insight_core::{Error, Result, Table};
use std::cell::OnceCell;
use tracing::{debug, instrument, trace};

/// Trend analysis over a borrowed table
#[derive(Debug)]
pub struct TrendEngine<'a> {
    table: &'a Table,
    time_column: OnceCell<Option<String>>,
}

impl<'a> TrendEngine<'a> {
    pub fn new(table: &'a Table) -> Self {
        Self {
            table,
            time_column: OnceCell::new(),
        }
    }

    pub fn table(&self) -> &'a Table {
        self.table
    }

    /// The table's time axis, detected on first use.
    pub fn detect_time_column(&self) -> Option<&str> {
        self.time_column
            .get_or_init(|| {
                let found = time::detect_time_column(self.table).map(str::to_string);
                debug!(time_column = ?found, "time column detection");
                found
            })
            .as_deref()
    }

    /// Linear trend of `value_column` ordered by `time_column`, or by the
    /// detected time column when `None`.
    ///
    /// Returns `None` without a usable time axis, for an absent or
    /// non-numeric value column, or with fewer than two observations.
    #[instrument(skip(self))]
    pub fn identify_trend(&self, value_column: &str, time_column: Option<&str>) -> Option<TrendResult> {
        let values = self.table.column(value_column)?.numeric_values()?;
        let time_name = match time_column {
            Some(name) => name,
            None => self.detect_time_column()?,
        };
        let order = self.table.column(time_name)?.argsort();

        let series: Vec<f64> = order.iter().filter_map(|&row| values[row]).collect();
        let fit = regression::fit_against_position(&series)?;
        let (first, last) = (series[0], series[series.len() - 1]);
        trace!(points = fit.points, slope = fit.slope, "fitted trend");

        Some(TrendResult {
            value_column: value_column.to_string(),
            time_column: time_name.to_string(),
            points: fit.points,
            slope: fit.slope,
            intercept: fit.intercept,
            r_squared: fit.r_squared,
            p_value: fit.p_value,
            direction: TrendDirection::from_slope(fit.slope),
            percent_change: types::percent_change(first, last),
            fingerprint: self.table.fingerprint(),
        })
    }

    /// Trends of every numeric column other than the time column itself.
    #[instrument(skip(self))]
    pub fn trend_all(&self, time_column: Option<&str>) -> Vec<TrendResult> {
        let time_name = match time_column {
            Some(name) => name,
            None => match self.detect_time_column() {
                Some(name) => name,
                None => return Vec::new(),
            },
        };
        let trends: Vec<TrendResult> = self
            .table
            .numeric_column_names()
            .into_iter()
            .filter(|&name| name != time_name)
            .filter_map(|name| self.identify_trend(name, Some(time_name)))
            .collect();
        debug!(trends = trends.len(), "trend_all finished");
        trends
    }

    /// Rolling mean of a numeric column in row order.
    ///
    /// Empty for an absent or non-numeric column; a zero window is an error.
    pub fn moving_average(&self, column: &str, window: usize) -> Result<Vec<f64>> {
        if window == 0 {
            return Err(Error::InvalidParameter(
                "window must be at least 1".to_string(),
            ));
        }
        Ok(self
            .table
            .column(column)
            .and_then(|c| c.numeric_values())
            .map(|cells| moving::rolling_mean(cells, window))
            .unwrap_or_default())
    }

    /// Rolling means for several window sizes. Empty for an absent or
    /// non-numeric column.
    pub fn moving_averages(&self, column: &str, windows: &[usize]) -> Result<Vec<MovingAverage>> {
        if self
            .table
            .column(column)
            .and_then(|c| c.numeric_values())
            .is_none()
        {
            return Ok(Vec::new());
        }
        windows
            .iter()
            .map(|&window| {
                Ok(MovingAverage {
                    column: column.to_string(),
                    window,
                    values: self.moving_average(column, window)?,
                })
            })
            .collect()
    }
}
