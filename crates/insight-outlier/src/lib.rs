//! Outlier detection over a [`Table`]
//!
//! Three independent methods are available:
//!
//! - **IQR**: per column, flag values strictly outside
//!   `[Q1 - m * IQR, Q3 + m * IQR]`
//! - **Z-score**: per column, flag values whose standard score (sample
//!   standard deviation) exceeds a threshold
//! - **Isolation forest**: one row-level verdict over all numeric columns
//!   jointly, flagging the highest-scoring share of complete rows
//!
//! Every method returns an [`OutlierDetection`] whose masks span all table
//! rows. Missing cells are never flagged, and a row with any missing numeric
//! cell takes no part in isolation scoring.
//!
//! Detection is pure. Results can be kept in an [`OutlierCache`] owned by the
//! caller, which answers lookups by method name and refuses results computed
//! against a different table.
//!
//! # Example
//!
//! ```rust
//! use insight_core::Table;
//! use insight_outlier::OutlierEngine;
//!
//! let table = Table::builder()
//!     .values("A", [1.0, 2.0, 3.0, 4.0, 5.0, 100.0])
//!     .build()
//!     .unwrap();
//!
//! let engine = OutlierEngine::new(&table);
//! let iqr = engine.detect_iqr(None, 1.5).unwrap();
//! assert_eq!(iqr.flagged_rows(), vec![5]);
//!
//! let z = engine.detect_zscore(None, 3.0).unwrap();
//! assert!(z.flagged_rows().is_empty());
//! ```

pub mod cache;
pub mod detection;
pub mod iqr;
pub mod isolation;
pub mod zscore;

pub use cache::OutlierCache;
pub use detection::{
    Bounds, ColumnFlags, ColumnOutlierSummary, DetectionParams, Flags, OutlierDetection,
    OutlierSummary, RowFlags,
};

use insight_core::{Column, Error, OutlierConfig, Result, Table};
use tracing::{debug, instrument};

pub const DEFAULT_IQR_MULTIPLIER: f64 = 1.5;
pub const DEFAULT_ZSCORE_THRESHOLD: f64 = 3.0;
pub const DEFAULT_CONTAMINATION: f64 = 0.1;
pub const DEFAULT_SEED: u64 = 42;
pub const DEFAULT_TREES: usize = 100;

/// Largest accepted contamination rate
pub const MAX_CONTAMINATION: f64 = 0.5;

fn check_non_negative(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(Error::non_negative(name, value))
    }
}

/// Outlier detection over a borrowed table
#[derive(Debug, Clone, Copy)]
pub struct OutlierEngine<'a> {
    table: &'a Table,
}

impl<'a> OutlierEngine<'a> {
    pub fn new(table: &'a Table) -> Self {
        Self { table }
    }

    /// Numeric columns named in `columns`, or all numeric columns. Unknown and
    /// non-numeric names are skipped.
    fn targets(&self, columns: Option<&[String]>) -> Vec<&'a Column> {
        match columns {
            None => self
                .table
                .columns()
                .iter()
                .filter(|c| c.is_numeric())
                .collect(),
            Some(names) => names
                .iter()
                .filter_map(|n| self.table.column(n))
                .filter(|c| c.is_numeric())
                .collect(),
        }
    }

    fn per_column(
        &self,
        params: DetectionParams,
        columns: Option<&[String]>,
        mask_fn: impl Fn(&[Option<f64>]) -> (Vec<bool>, Option<Bounds>),
    ) -> OutlierDetection {
        let flags: Vec<ColumnFlags> = self
            .targets(columns)
            .into_iter()
            .filter_map(|col| {
                let (mask, bounds) = mask_fn(col.numeric_values()?);
                Some(ColumnFlags {
                    column: col.name().to_string(),
                    mask,
                    bounds,
                })
            })
            .collect();
        debug!(
            columns = flags.len(),
            flagged = flags.iter().map(ColumnFlags::count).sum::<usize>(),
            "per-column detection finished"
        );
        OutlierDetection {
            params,
            fingerprint: self.table.fingerprint(),
            row_count: self.table.row_count(),
            flags: Flags::PerColumn(flags),
        }
    }

    /// Flag values outside the IQR fences of each column.
    #[instrument(skip(self))]
    pub fn detect_iqr(&self, columns: Option<&[&str]>, multiplier: f64) -> Result<OutlierDetection> {
        let mut params = DetectionParams::iqr(multiplier);
        if let Some(names) = columns {
            params = params.with_columns(names.iter().copied());
        }
        self.detect(&params)
    }

    /// Flag values whose |z| exceeds `threshold`.
    #[instrument(skip(self))]
    pub fn detect_zscore(&self, columns: Option<&[&str]>, threshold: f64) -> Result<OutlierDetection> {
        let mut params = DetectionParams::zscore(threshold);
        if let Some(names) = columns {
            params = params.with_columns(names.iter().copied());
        }
        self.detect(&params)
    }

    /// Isolation forest over all numeric columns with the default tree count.
    #[instrument(skip(self))]
    pub fn detect_isolation(&self, contamination: f64, seed: u64) -> Result<OutlierDetection> {
        self.detect(&DetectionParams::isolation_forest(contamination, seed))
    }

    /// Run any detection request.
    pub fn detect(&self, params: &DetectionParams) -> Result<OutlierDetection> {
        match params {
            DetectionParams::Iqr {
                columns,
                multiplier,
            } => {
                check_non_negative("multiplier", *multiplier)?;
                let m = *multiplier;
                Ok(self.per_column(params.clone(), columns.as_deref(), |cells| {
                    iqr::iqr_mask(cells, m)
                }))
            }
            DetectionParams::ZScore { columns, threshold } => {
                check_non_negative("threshold", *threshold)?;
                let t = *threshold;
                Ok(self.per_column(params.clone(), columns.as_deref(), |cells| {
                    zscore::zscore_mask(cells, t)
                }))
            }
            DetectionParams::IsolationForest {
                contamination,
                seed,
                trees,
            } => {
                if !(0.0..=MAX_CONTAMINATION).contains(contamination) {
                    return Err(Error::InvalidParameter(format!(
                        "contamination must be in [0, {MAX_CONTAMINATION}], got {contamination}"
                    )));
                }
                if *trees == 0 {
                    return Err(Error::InvalidParameter(
                        "trees must be at least 1".to_string(),
                    ));
                }
                Ok(self.isolation(params.clone(), *contamination, *seed, *trees))
            }
        }
    }

    /// Run each method with the settings in `config`, in the order IQR,
    /// z-score, isolation forest.
    pub fn detect_all(&self, config: &OutlierConfig) -> Result<Vec<OutlierDetection>> {
        let requests = [
            DetectionParams::iqr(config.iqr_multiplier),
            DetectionParams::zscore(config.zscore_threshold),
            DetectionParams::IsolationForest {
                contamination: config.contamination,
                seed: config.isolation_seed,
                trees: config.isolation_trees,
            },
        ];
        requests.iter().map(|p| self.detect(p)).collect()
    }

    fn isolation(
        &self,
        params: DetectionParams,
        contamination: f64,
        seed: u64,
        trees: usize,
    ) -> OutlierDetection {
        let rows = self.table.row_count();
        let numeric: Vec<&[Option<f64>]> = self
            .table
            .columns()
            .iter()
            .filter_map(Column::numeric_values)
            .collect();

        // Complete rows only
        let (row_ids, points): (Vec<usize>, Vec<Vec<f64>>) = if numeric.is_empty() {
            (Vec::new(), Vec::new())
        } else {
            (0..rows)
                .filter_map(|r| {
                    let point: Option<Vec<f64>> = numeric.iter().map(|c| c[r]).collect();
                    point.map(|p| (r, p))
                })
                .unzip()
        };

        let mut mask = vec![false; rows];
        let mut scores = vec![f64::NAN; rows];
        if points.len() >= 2 {
            let point_scores = isolation::isolation_scores(&points, trees, seed);
            let k = isolation::flag_count(contamination, points.len());
            let flagged = isolation::top_k_mask(&point_scores, k);
            for ((&row, &score), &flag) in row_ids.iter().zip(&point_scores).zip(&flagged) {
                scores[row] = score;
                mask[row] = flag;
            }
        }
        debug!(
            complete_rows = points.len(),
            flagged = mask.iter().filter(|&&f| f).count(),
            "isolation forest finished"
        );

        OutlierDetection {
            params,
            fingerprint: self.table.fingerprint(),
            row_count: rows,
            flags: Flags::Rows(RowFlags {
                mask,
                scores,
                scored_rows: points.len(),
            }),
        }
    }
}
