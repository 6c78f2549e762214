//! Descriptive and correlation statistics over a [`Table`]
//!
//! [`StatsEngine`] borrows a table and answers questions about its numeric and
//! categorical columns. Nothing here mutates or caches: each call computes a
//! fresh result tagged with the table's fingerprint.
//!
//! Data-dependent gaps are never errors. A table without numeric columns
//! yields empty statistics, an absent or non-numeric column yields `None`, and
//! statistics that are undefined for the data come out as NaN.
//!
//! # Example
//!
//! ```rust
//! use insight_core::{CorrelationMethod, Table};
//! use insight_stats::StatsEngine;
//!
//! let table = Table::builder()
//!     .values("a", [1.0, 2.0, 3.0, 4.0, 5.0, 100.0])
//!     .values("b", [5.0, 4.0, 3.0, 2.0, 1.0, 0.0])
//!     .build()
//!     .unwrap();
//!
//! let engine = StatsEngine::new(&table);
//! let stats = engine.descriptive_statistics();
//! assert_eq!(stats.get("a").unwrap().q25, 2.25);
//!
//! let strong = engine.strong_correlations(0.7, CorrelationMethod::Spearman);
//! assert_eq!(strong.len(), 1);
//! assert_eq!(strong[0].coefficient, -1.0);
//! ```

pub mod correlation;
pub mod counts;
pub mod descriptive;
pub mod distribution;

pub use correlation::{CorrelationMatrix, CorrelationPair};
pub use counts::{ValueCount, ValueCounts};
pub use descriptive::{ColumnSummary, DescriptiveStats};
pub use distribution::{DistributionSummary, NormalityTest};

use insight_core::{CorrelationMethod, Table};
use tracing::{debug, instrument};

/// Default significance level of the normality test
pub const DEFAULT_NORMALITY_ALPHA: f64 = 0.05;

/// Statistics over a borrowed table
#[derive(Debug, Clone, Copy)]
pub struct StatsEngine<'a> {
    table: &'a Table,
    normality_alpha: f64,
}

impl<'a> StatsEngine<'a> {
    pub fn new(table: &'a Table) -> Self {
        Self {
            table,
            normality_alpha: DEFAULT_NORMALITY_ALPHA,
        }
    }

    /// Use a different significance level for [`Self::distribution_analysis`].
    pub fn with_normality_alpha(mut self, alpha: f64) -> Self {
        self.normality_alpha = alpha;
        self
    }

    pub fn table(&self) -> &'a Table {
        self.table
    }

    /// Count, mean, std, quartiles, extremes, variance, skewness, kurtosis,
    /// range and IQR for every numeric column.
    #[instrument(skip(self), fields(columns = self.table.column_count()))]
    pub fn descriptive_statistics(&self) -> DescriptiveStats {
        let columns: Vec<ColumnSummary> = self
            .table
            .columns()
            .iter()
            .filter_map(|col| {
                let values = col.valid_numeric()?;
                Some(ColumnSummary::from_values(col.name(), &values))
            })
            .collect();
        debug!("Summarised {} numeric columns", columns.len());
        DescriptiveStats {
            fingerprint: self.table.fingerprint(),
            columns,
        }
    }

    /// Correlation matrix over all numeric columns. Empty with fewer than two.
    #[instrument(skip(self))]
    pub fn correlation_analysis(&self, method: CorrelationMethod) -> CorrelationMatrix {
        let numeric: Vec<(&str, &[Option<f64>])> = self
            .table
            .columns()
            .iter()
            .filter_map(|c| Some((c.name(), c.numeric_values()?)))
            .collect();
        if numeric.len() < 2 {
            debug!("Fewer than two numeric columns, no correlation matrix");
            return CorrelationMatrix::empty(method, self.table.fingerprint());
        }

        let k = numeric.len();
        let mut values = vec![vec![f64::NAN; k]; k];
        for i in 0..k {
            // A column correlates perfectly with itself unless it is constant
            values[i][i] = if correlation::has_spread(numeric[i].1) { 1.0 } else { f64::NAN };
            for j in (i + 1)..k {
                let r = correlation::correlate(method, numeric[i].1, numeric[j].1);
                values[i][j] = r;
                values[j][i] = r;
            }
        }

        CorrelationMatrix {
            method,
            fingerprint: self.table.fingerprint(),
            columns: numeric.iter().map(|(name, _)| name.to_string()).collect(),
            values,
        }
    }

    /// Column pairs with |r| >= threshold, strongest first.
    pub fn strong_correlations(&self, threshold: f64, method: CorrelationMethod) -> Vec<CorrelationPair> {
        let pairs = self.correlation_analysis(method).strong_pairs(threshold);
        debug!(threshold, found = pairs.len(), "strong correlations");
        pairs
    }

    /// Moments, mode and a normality test for one numeric column.
    #[instrument(skip(self))]
    pub fn distribution_analysis(&self, column: &str) -> Option<DistributionSummary> {
        let values = self.table.column(column)?.valid_numeric()?;
        DistributionSummary::from_values(column, &values, self.normality_alpha)
    }

    /// Frequency table of a categorical column, at most `top_n` entries.
    pub fn value_counts(&self, column: &str, top_n: usize) -> Option<ValueCounts> {
        let cells = self.table.column(column)?.as_text()?;
        Some(ValueCounts::from_cells(column, cells, top_n))
    }
}
