//! Detection requests and results

use insight_core::OutlierMethod;
use serde::Serialize;

/// Parameters of one detection run
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum DetectionParams {
    Iqr {
        /// Columns to examine, all numeric columns when `None`
        columns: Option<Vec<String>>,
        multiplier: f64,
    },
    #[serde(rename = "zscore")]
    ZScore {
        columns: Option<Vec<String>>,
        threshold: f64,
    },
    IsolationForest {
        contamination: f64,
        seed: u64,
        trees: usize,
    },
}

impl DetectionParams {
    pub fn iqr(multiplier: f64) -> Self {
        Self::Iqr {
            columns: None,
            multiplier,
        }
    }

    pub fn zscore(threshold: f64) -> Self {
        Self::ZScore {
            columns: None,
            threshold,
        }
    }

    pub fn isolation_forest(contamination: f64, seed: u64) -> Self {
        Self::IsolationForest {
            contamination,
            seed,
            trees: crate::DEFAULT_TREES,
        }
    }

    /// Restrict a per-column method to the named columns. No effect on
    /// isolation forest, which always uses every numeric column.
    pub fn with_columns<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        match &mut self {
            Self::Iqr { columns, .. } | Self::ZScore { columns, .. } => *columns = Some(names),
            Self::IsolationForest { .. } => {}
        }
        self
    }

    pub fn method(&self) -> OutlierMethod {
        match self {
            Self::Iqr { .. } => OutlierMethod::Iqr,
            Self::ZScore { .. } => OutlierMethod::ZScore,
            Self::IsolationForest { .. } => OutlierMethod::IsolationForest,
        }
    }
}

/// Acceptance interval used for a column. Values strictly outside are flagged.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub lower: f64,
    pub upper: f64,
}

impl Bounds {
    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && value <= self.upper
    }
}

/// Flags for one column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnFlags {
    pub column: String,
    /// One entry per table row
    pub mask: Vec<bool>,
    /// `None` when the column had too few values to define bounds
    pub bounds: Option<Bounds>,
}

impl ColumnFlags {
    pub fn count(&self) -> usize {
        self.mask.iter().filter(|&&f| f).count()
    }
}

/// Row-level flags from the isolation forest
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowFlags {
    pub mask: Vec<bool>,
    /// Anomaly score per row, NaN for rows excluded for missing values
    pub scores: Vec<f64>,
    /// Rows that took part in scoring
    pub scored_rows: usize,
}

impl RowFlags {
    pub fn count(&self) -> usize {
        self.mask.iter().filter(|&&f| f).count()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Flags {
    PerColumn(Vec<ColumnFlags>),
    Rows(RowFlags),
}

/// Result of a single detection run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutlierDetection {
    pub params: DetectionParams,
    /// Fingerprint of the table the run was made against
    pub fingerprint: u64,
    pub row_count: usize,
    pub flags: Flags,
}

/// Flagged count for one column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnOutlierSummary {
    pub column: String,
    pub count: usize,
    /// Percentage of all table rows
    pub percentage: f64,
}

/// Counts of flagged rows for a detection run
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OutlierSummary {
    PerColumn {
        method: OutlierMethod,
        columns: Vec<ColumnOutlierSummary>,
    },
    Total {
        method: OutlierMethod,
        total: usize,
        percentage: f64,
    },
}

impl OutlierSummary {
    pub fn method(&self) -> OutlierMethod {
        match self {
            Self::PerColumn { method, .. } | Self::Total { method, .. } => *method,
        }
    }

    /// Flagged cells summed over columns, or flagged rows for a row-level run.
    pub fn total_flags(&self) -> usize {
        match self {
            Self::PerColumn { columns, .. } => columns.iter().map(|c| c.count).sum(),
            Self::Total { total, .. } => *total,
        }
    }
}

fn percentage(count: usize, rows: usize) -> f64 {
    if rows == 0 {
        0.0
    } else {
        count as f64 / rows as f64 * 100.0
    }
}

impl OutlierDetection {
    pub fn method(&self) -> OutlierMethod {
        self.params.method()
    }

    /// Flags for a column of a per-column run.
    pub fn column(&self, name: &str) -> Option<&ColumnFlags> {
        match &self.flags {
            Flags::PerColumn(cols) => cols.iter().find(|c| c.column == name),
            Flags::Rows(_) => None,
        }
    }

    pub fn summary(&self) -> OutlierSummary {
        let method = self.method();
        match &self.flags {
            Flags::PerColumn(cols) => OutlierSummary::PerColumn {
                method,
                columns: cols
                    .iter()
                    .map(|c| ColumnOutlierSummary {
                        column: c.column.clone(),
                        count: c.count(),
                        percentage: percentage(c.count(), self.row_count),
                    })
                    .collect(),
            },
            Flags::Rows(rows) => OutlierSummary::Total {
                method,
                total: rows.count(),
                percentage: percentage(rows.count(), self.row_count),
            },
        }
    }

    /// Union mask: a row is flagged when any column flags it.
    pub fn combined_mask(&self) -> Vec<bool> {
        match &self.flags {
            Flags::PerColumn(cols) => {
                let mut mask = vec![false; self.row_count];
                for col in cols {
                    for (m, &f) in mask.iter_mut().zip(&col.mask) {
                        *m |= f;
                    }
                }
                mask
            }
            Flags::Rows(rows) => rows.mask.clone(),
        }
    }

    /// Ascending indices of flagged rows.
    pub fn flagged_rows(&self) -> Vec<usize> {
        self.combined_mask()
            .into_iter()
            .enumerate()
            .filter_map(|(i, f)| f.then_some(i))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn per_column() -> OutlierDetection {
        OutlierDetection {
            params: DetectionParams::iqr(1.5),
            fingerprint: 1,
            row_count: 4,
            flags: Flags::PerColumn(vec![
                ColumnFlags {
                    column: "a".to_string(),
                    mask: vec![true, false, false, false],
                    bounds: None,
                },
                ColumnFlags {
                    column: "b".to_string(),
                    mask: vec![true, false, true, false],
                    bounds: None,
                },
            ]),
        }
    }

    #[test]
    fn test_union_of_columns() {
        let det = per_column();
        assert_eq!(det.flagged_rows(), vec![0, 2]);
        match det.summary() {
            OutlierSummary::PerColumn { columns, .. } => {
                assert_eq!(columns[1].count, 2);
                assert_eq!(columns[1].percentage, 50.0);
            }
            other => panic!("unexpected summary {other:?}"),
        }
        assert_eq!(det.summary().total_flags(), 3);
    }

    #[test]
    fn test_row_level_summary() {
        let det = OutlierDetection {
            params: DetectionParams::isolation_forest(0.25, 42),
            fingerprint: 1,
            row_count: 4,
            flags: Flags::Rows(RowFlags {
                mask: vec![false, false, false, true],
                scores: vec![0.4, 0.4, f64::NAN, 0.8],
                scored_rows: 3,
            }),
        };
        assert_eq!(det.flagged_rows(), vec![3]);
        assert_eq!(
            det.summary(),
            OutlierSummary::Total {
                method: OutlierMethod::IsolationForest,
                total: 1,
                percentage: 25.0
            }
        );
        assert!(det.column("a").is_none());
    }

    #[test]
    fn test_with_columns() {
        let params = DetectionParams::zscore(3.0).with_columns(["x"]);
        assert_eq!(
            params,
            DetectionParams::ZScore {
                columns: Some(vec!["x".to_string()]),
                threshold: 3.0
            }
        );
        assert_eq!(params.method(), OutlierMethod::ZScore);
    }
}
