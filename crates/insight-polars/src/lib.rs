//! Polars integration for tabular-insight
//!
//! This crate turns a Polars [`DataFrame`](polars::prelude::DataFrame) into an
//! [`insight_core::Table`] so the analysis engines can run on it, and back.
//!
//! # Example
//!
//! ```rust
//! use polars::prelude::*;
//! use insight_polars::TableExt;
//!
//! let df = df![
//!     "sales" => [10.0, 12.5, 11.0],
//!     "region" => ["north", "south", "north"],
//! ].unwrap();
//!
//! let table = df.to_table().unwrap();
//! assert_eq!(table.numeric_column_names(), vec!["sales"]);
//! assert_eq!(table.categorical_column_names(), vec!["region"]);
//! ```

pub mod convert;
pub mod error;

pub use convert::{column_to_table_column, dataframe_to_table, table_to_dataframe};
pub use error::{Error, Result};

use insight_core::Table;
use polars::prelude::DataFrame;

/// Extension trait for building tables from Polars DataFrames
pub trait TableExt {
    /// Convert every column into a [`Table`]
    fn to_table(&self) -> Result<Table>;

    /// Convert only the named columns, in the given order
    fn select_table(&self, columns: &[&str]) -> Result<Table>;
}

impl TableExt for DataFrame {
    fn to_table(&self) -> Result<Table> {
        dataframe_to_table(self)
    }

    fn select_table(&self, columns: &[&str]) -> Result<Table> {
        let picked = columns
            .iter()
            .map(|name| column_to_table_column(self.column(name)?))
            .collect::<Result<Vec<_>>>()?;
        Ok(Table::new(picked)?)
    }
}
