//! Per-column descriptive statistics

use insight_core::math::{mean, quartiles_sorted, sample_variance, sorted, Moments};
use serde::Serialize;

/// Summary of one numeric column, computed over its non-missing values
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSummary {
    pub column: String,
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
    pub variance: f64,
    /// Bias-adjusted sample skewness
    pub skewness: f64,
    /// Bias-adjusted sample excess kurtosis
    pub kurtosis: f64,
    pub range: f64,
    pub iqr: f64,
}

impl ColumnSummary {
    /// Summarise a set of non-missing values. Statistics that need more
    /// observations than are available come out as NaN.
    pub fn from_values(column: impl Into<String>, values: &[f64]) -> Self {
        let data = sorted(values.iter().copied());
        let (q25, median, q75) = quartiles_sorted(&data);
        let (min, max) = match (data.first(), data.last()) {
            (Some(&lo), Some(&hi)) => (lo, hi),
            _ => (f64::NAN, f64::NAN),
        };
        let variance = sample_variance(&data);
        let moments = Moments::from_slice(&data);

        Self {
            column: column.into(),
            count: data.len(),
            mean: mean(&data),
            std: variance.sqrt(),
            min,
            q25,
            median,
            q75,
            max,
            variance,
            skewness: moments.sample_skewness(),
            kurtosis: moments.sample_excess_kurtosis(),
            range: max - min,
            iqr: q75 - q25,
        }
    }
}

/// Descriptive statistics for every numeric column of a table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DescriptiveStats {
    /// Fingerprint of the table the statistics were computed from
    pub fingerprint: u64,
    pub columns: Vec<ColumnSummary>,
}

impl DescriptiveStats {
    pub fn get(&self, column: &str) -> Option<&ColumnSummary> {
        self.columns.iter().find(|c| c.column == column)
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }
}
