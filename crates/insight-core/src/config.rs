//! Configuration types for analysis methods

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Correlation coefficient
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorrelationMethod {
    /// Linear (product-moment) correlation
    #[default]
    Pearson,
    /// Pearson correlation of average ranks
    Spearman,
    /// Kendall's tau-b
    Kendall,
}

impl CorrelationMethod {
    pub const NAMES: [&'static str; 3] = ["pearson", "spearman", "kendall"];

    /// Get the name of this method
    pub fn name(&self) -> &'static str {
        match self {
            Self::Pearson => "pearson",
            Self::Spearman => "spearman",
            Self::Kendall => "kendall",
        }
    }
}

impl fmt::Display for CorrelationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CorrelationMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pearson" => Ok(Self::Pearson),
            "spearman" => Ok(Self::Spearman),
            "kendall" => Ok(Self::Kendall),
            _ => Err(Error::unknown_method(s, &Self::NAMES)),
        }
    }
}

/// Outlier detection method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutlierMethod {
    /// Interquartile range fences
    Iqr,
    /// Standard score against the sample standard deviation
    #[serde(rename = "zscore")]
    ZScore,
    /// Isolation forest over all numeric columns
    IsolationForest,
}

impl OutlierMethod {
    pub const NAMES: [&'static str; 3] = ["iqr", "zscore", "isolation_forest"];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Iqr => "iqr",
            Self::ZScore => "zscore",
            Self::IsolationForest => "isolation_forest",
        }
    }

    /// Whether the method produces one mask per column
    pub fn is_per_column(&self) -> bool {
        !matches!(self, Self::IsolationForest)
    }
}

impl fmt::Display for OutlierMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OutlierMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "iqr" => Ok(Self::Iqr),
            "zscore" | "z_score" => Ok(Self::ZScore),
            "isolation_forest" => Ok(Self::IsolationForest),
            _ => Err(Error::unknown_method(s, &Self::NAMES)),
        }
    }
}

/// Statistics engine settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsConfig {
    pub correlation_method: CorrelationMethod,
    /// Minimum |r| reported as a strong correlation
    pub strong_correlation_threshold: f64,
    /// Significance level of the normality test
    pub normality_alpha: f64,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            correlation_method: CorrelationMethod::Pearson,
            strong_correlation_threshold: 0.7,
            normality_alpha: 0.05,
        }
    }
}

/// Outlier engine settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutlierConfig {
    pub iqr_multiplier: f64,
    pub zscore_threshold: f64,
    /// Expected share of anomalous rows, in [0, 0.5]
    pub contamination: f64,
    pub isolation_trees: usize,
    pub isolation_seed: u64,
}

impl Default for OutlierConfig {
    fn default() -> Self {
        Self {
            iqr_multiplier: 1.5,
            zscore_threshold: 3.0,
            contamination: 0.1,
            isolation_trees: 100,
            isolation_seed: 42,
        }
    }
}

/// Trend engine settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendConfig {
    pub moving_average_windows: Vec<usize>,
}

impl Default for TrendConfig {
    fn default() -> Self {
        Self {
            moving_average_windows: vec![7, 14, 30],
        }
    }
}

/// Settings for a full analysis run
///
/// Every field has a default, so a partial JSON document only overrides what
/// it names:
///
/// ```
/// use insight_core::config::{AnalysisConfig, CorrelationMethod};
///
/// let config = AnalysisConfig::from_json_str(
///     r#"{ "stats": { "correlation_method": "spearman" } }"#,
/// ).unwrap();
///
/// assert_eq!(config.stats.correlation_method, CorrelationMethod::Spearman);
/// assert_eq!(config.outliers.iqr_multiplier, 1.5);
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub stats: StatsConfig,
    pub outliers: OutlierConfig,
    pub trend: TrendConfig,
}

impl AnalysisConfig {
    /// Parse and validate a JSON configuration.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        let s = &self.stats;
        if !(0.0..=1.0).contains(&s.strong_correlation_threshold) {
            return Err(Error::Config(format!(
                "strong_correlation_threshold must be in [0, 1], got {}",
                s.strong_correlation_threshold
            )));
        }
        if !(s.normality_alpha > 0.0 && s.normality_alpha < 1.0) {
            return Err(Error::Config(format!(
                "normality_alpha must be in (0, 1), got {}",
                s.normality_alpha
            )));
        }

        let o = &self.outliers;
        if !(o.iqr_multiplier.is_finite() && o.iqr_multiplier >= 0.0) {
            return Err(Error::Config(format!(
                "iqr_multiplier must be finite and >= 0, got {}",
                o.iqr_multiplier
            )));
        }
        if !(o.zscore_threshold.is_finite() && o.zscore_threshold >= 0.0) {
            return Err(Error::Config(format!(
                "zscore_threshold must be finite and >= 0, got {}",
                o.zscore_threshold
            )));
        }
        if !(0.0..=0.5).contains(&o.contamination) {
            return Err(Error::Config(format!(
                "contamination must be in [0, 0.5], got {}",
                o.contamination
            )));
        }
        if o.isolation_trees == 0 {
            return Err(Error::Config("isolation_trees must be at least 1".to_string()));
        }

        if self.trend.moving_average_windows.contains(&0) {
            return Err(Error::Config(
                "moving_average_windows must not contain 0".to_string(),
            ));
        }
        Ok(())
    }
}
