//! Rolling means

use serde::Serialize;

/// Rolling mean series for one window size
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovingAverage {
    pub column: String,
    pub window: usize,
    pub values: Vec<f64>,
}

/// Trailing rolling mean needing at least one observation per window.
///
/// Output has the same length as the input. Position `i` averages the
/// non-missing cells among `i + 1 - window ..= i`, so the first `window - 1`
/// entries cover fewer than `window` rows. A window holding no values yields
/// NaN. `window` must be at least 1.
pub fn rolling_mean(cells: &[Option<f64>], window: usize) -> Vec<f64> {
    debug_assert!(window > 0);
    (0..cells.len())
        .map(|i| {
            let start = (i + 1).saturating_sub(window);
            let (sum, count) = cells[start..=i]
                .iter()
                .flatten()
                .fold((0.0, 0usize), |(s, c), &v| (s + v, c + 1));
            if count == 0 {
                f64::NAN
            } else {
                sum / count as f64
            }
        })
        .collect()
}
