//! Types used for trend analysis

use serde::Serialize;
use std::fmt;

/// Sign of a fitted slope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Increasing,
    Decreasing,
    /// Slope exactly zero
    Stable,
}

impl TrendDirection {
    pub fn from_slope(slope: f64) -> Self {
        if slope > 0.0 {
            Self::Increasing
        } else if slope < 0.0 {
            Self::Decreasing
        } else {
            Self::Stable
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Increasing => "increasing",
            Self::Decreasing => "decreasing",
            Self::Stable => "stable",
        }
    }
}

impl fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Linear trend of one value column along one time column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendResult {
    pub value_column: String,
    pub time_column: String,
    /// Observations used in the fit
    pub points: usize,
    /// Change per observation
    pub slope: f64,
    pub intercept: f64,
    pub r_squared: f64,
    pub p_value: f64,
    pub direction: TrendDirection,
    /// (last - first) / first * 100 over the fitted values, 0 when the first
    /// value is 0
    pub percent_change: f64,
    pub fingerprint: u64,
}

impl fmt::Display for TrendResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} over {}: {} (slope {:.4}, R² {:.3}, p {:.4}, change {:.2}%)",
            self.value_column,
            self.time_column,
            self.direction,
            self.slope,
            self.r_squared,
            self.p_value,
            self.percent_change
        )
    }
}

/// Percent change from `first` to `last`, 0 for a zero baseline.
pub fn percent_change(first: f64, last: f64) -> f64 {
    if first == 0.0 {
        0.0
    } else {
        (last - first) / first * 100.0
    }
}
