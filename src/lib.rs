//! Descriptive statistics, outlier detection and trend analysis over
//! in-memory tables
//!
//! This crate re-exports the workspace crates under one roof:
//!
//! - [`insight_core`]: the [`Table`] model, configuration and errors
//! - [`insight_stats`]: descriptive, correlation and distribution statistics
//! - [`insight_outlier`]: IQR, z-score and isolation forest detection
//! - [`insight_trend`]: time-axis detection, linear trends, moving averages
//! - `insight_polars` (feature `polars`): build tables from Polars frames
//!
//! and adds [`AnalysisReport`], which runs everything once for a report.
//!
//! # Example
//!
//! ```rust
//! use tabular_insight::prelude::*;
//!
//! let table = Table::builder()
//!     .values("A", [1.0, 2.0, 3.0, 4.0, 5.0, 100.0])
//!     .values("B", [5.0, 4.0, 3.0, 2.0, 1.0, 0.0])
//!     .categorical("date", [
//!         Some("2022-01-01"), Some("2022-01-02"), Some("2022-01-03"),
//!         Some("2022-01-04"), Some("2022-01-05"), Some("2022-01-06"),
//!     ])
//!     .build()
//!     .unwrap();
//!
//! let report = AnalysisReport::build(&table, &AnalysisConfig::default()).unwrap();
//! assert_eq!(report.time_column.as_deref(), Some("date"));
//! assert_eq!(report.trends.len(), 2);
//! for advice in report.recommendations() {
//!     println!("{advice}");
//! }
//! ```

pub mod report;

pub use insight_core;
pub use insight_outlier;
#[cfg(feature = "polars")]
pub use insight_polars;
pub use insight_stats;
pub use insight_trend;

pub use insight_core::{AnalysisConfig, Error, Result, Table};
pub use report::{AnalysisReport, Recommendation};

/// Commonly used types
pub mod prelude {
    pub use crate::report::{AnalysisReport, Recommendation};
    pub use insight_core::{
        AnalysisConfig, Column, ColumnKind, CorrelationMethod, Error, OutlierMethod, Result,
        Table,
    };
    pub use insight_outlier::{DetectionParams, OutlierCache, OutlierEngine};
    pub use insight_stats::StatsEngine;
    pub use insight_trend::{TrendDirection, TrendEngine};

    #[cfg(feature = "polars")]
    pub use insight_polars::TableExt;
}
