//! Bundled analysis results for report rendering
//!
//! [`AnalysisReport::build`] runs every engine once with the settings from an
//! [`AnalysisConfig`] and keeps the results a report emitter needs. The bundle
//! is `Serialize`, so it can be rendered without recomputation.

use insight_core::{AnalysisConfig, DatasetOverview, Result, Table};
use insight_outlier::{OutlierEngine, OutlierSummary};
use insight_stats::{CorrelationPair, DescriptiveStats, StatsEngine};
use insight_trend::{MovingAverage, TrendEngine, TrendResult};
use serde::Serialize;
use std::fmt;
use tracing::{info, instrument};

/// Missing-cell percentage above which imputation is recommended
pub const MISSING_WARNING_PERCENT: f64 = 5.0;

/// One piece of advice derived from a report
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Recommendation {
    HighMissing { percentage: f64 },
    DuplicateRows { count: usize },
    OutliersDetected { flagged: usize },
    StrongCorrelations { pairs: usize },
    Clean,
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HighMissing { percentage } => write!(
                f,
                "High percentage of missing values ({percentage:.2}%). Consider imputation strategies."
            ),
            Self::DuplicateRows { count } => write!(
                f,
                "Found {count} duplicate rows. Review and remove if necessary."
            ),
            Self::OutliersDetected { .. } => {
                write!(f, "Outliers detected. Review for data quality issues.")
            }
            Self::StrongCorrelations { .. } => {
                write!(f, "Strong correlations found between variables.")
            }
            Self::Clean => write!(f, "Dataset appears clean and well-structured."),
        }
    }
}

/// Results of a full analysis run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub fingerprint: u64,
    pub config: AnalysisConfig,
    pub overview: DatasetOverview,
    pub descriptive: DescriptiveStats,
    pub strong_correlations: Vec<CorrelationPair>,
    /// IQR, z-score and isolation forest, in that order
    pub outliers: Vec<OutlierSummary>,
    pub time_column: Option<String>,
    pub trends: Vec<TrendResult>,
    /// Rolling means of every trended column, one per configured window
    pub moving_averages: Vec<MovingAverage>,
}

impl AnalysisReport {
    /// Run every engine over `table`. Fails only for an invalid `config`.
    #[instrument(skip_all, fields(rows = table.row_count(), columns = table.column_count()))]
    pub fn build(table: &Table, config: &AnalysisConfig) -> Result<Self> {
        config.validate()?;

        let stats = StatsEngine::new(table).with_normality_alpha(config.stats.normality_alpha);
        let descriptive = stats.descriptive_statistics();
        let strong_correlations = stats.strong_correlations(
            config.stats.strong_correlation_threshold,
            config.stats.correlation_method,
        );

        let outliers = OutlierEngine::new(table)
            .detect_all(&config.outliers)?
            .iter()
            .map(|d| d.summary())
            .collect();

        let trend = TrendEngine::new(table);
        let time_column = trend.detect_time_column().map(str::to_string);
        let trends = trend.trend_all(None);
        let mut moving_averages = Vec::new();
        for t in &trends {
            moving_averages.extend(
                trend.moving_averages(&t.value_column, &config.trend.moving_average_windows)?,
            );
        }

        let report = Self {
            fingerprint: table.fingerprint(),
            config: config.clone(),
            overview: table.overview(),
            descriptive,
            strong_correlations,
            outliers,
            time_column,
            trends,
            moving_averages,
        };
        info!(
            strong_correlations = report.strong_correlations.len(),
            trends = report.trends.len(),
            "analysis report built"
        );
        Ok(report)
    }

    /// Whether the report was built from `table`.
    pub fn is_current(&self, table: &Table) -> bool {
        self.fingerprint == table.fingerprint()
    }

    /// Advice derived from the results, `Clean` when nothing stands out.
    pub fn recommendations(&self) -> Vec<Recommendation> {
        let mut out = Vec::new();
        if self.overview.missing_percentage > MISSING_WARNING_PERCENT {
            out.push(Recommendation::HighMissing {
                percentage: self.overview.missing_percentage,
            });
        }
        if self.overview.duplicate_rows > 0 {
            out.push(Recommendation::DuplicateRows {
                count: self.overview.duplicate_rows,
            });
        }
        let flagged: usize = self.outliers.iter().map(OutlierSummary::total_flags).sum();
        if flagged > 0 {
            out.push(Recommendation::OutliersDetected { flagged });
        }
        if !self.strong_correlations.is_empty() {
            out.push(Recommendation::StrongCorrelations {
                pairs: self.strong_correlations.len(),
            });
        }
        if out.is_empty() {
            out.push(Recommendation::Clean);
        }
        out
    }
}
