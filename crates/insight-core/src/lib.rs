//! Core types for tabular analysis
//!
//! This crate provides the in-memory table every analysis engine reads from,
//! together with the pieces those engines share.
//!
//! # Layout
//!
//! - [`table`]: typed, nullable, column-major [`Table`] with a content
//!   fingerprint
//! - [`classify`]: ordered parse attempts used to re-type text columns
//! - [`math`]: quantiles, sample moments and float ordering
//! - [`config`]: method enums and serde-backed engine settings
//! - [`error`]: the workspace-wide [`Error`] type
//!
//! # Example
//!
//! ```rust
//! use insight_core::{ColumnKind, Table};
//!
//! let table = Table::builder()
//!     .values("sales", [10.0, 12.5, 11.0])
//!     .categorical("date", [Some("2022-01-01"), Some("2022-01-02"), Some("2022-01-03")])
//!     .build()
//!     .unwrap();
//!
//! let (typed, _) = table.coerce_types();
//! assert_eq!(typed.column("date").unwrap().kind(), ColumnKind::Datetime);
//! ```

pub mod classify;
pub mod config;
pub mod error;
pub mod math;
pub mod table;

// Re-export core types
pub use classify::{Classification, InferredKind, ParseFailure};
pub use config::{
    AnalysisConfig, CorrelationMethod, OutlierConfig, OutlierMethod, StatsConfig, TrendConfig,
};
pub use error::{Error, Result};
pub use table::{
    Column, ColumnData, ColumnKind, ColumnOverview, DatasetOverview, Table, TableBuilder,
    TypeConversion,
};
