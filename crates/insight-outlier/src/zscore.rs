//! Standard score detection

use crate::detection::Bounds;
use insight_core::math::{mean, sample_std};

/// Mean and sample standard deviation, `None` when the values have no spread.
fn location_scale(cells: &[Option<f64>]) -> Option<(f64, f64)> {
    let values: Vec<f64> = cells.iter().flatten().copied().collect();
    if values.windows(2).all(|w| w[0] == w[1]) {
        return None;
    }
    let s = sample_std(&values);
    (s.is_finite() && s > 0.0).then(|| (mean(&values), s))
}

/// Absolute standard scores of the non-missing cells, using the sample
/// standard deviation. `None` for missing cells, and for every cell when the
/// spread is zero or undefined.
pub fn zscores(cells: &[Option<f64>]) -> Vec<Option<f64>> {
    match location_scale(cells) {
        Some((m, s)) => cells.iter().map(|c| c.map(|v| ((v - m) / s).abs())).collect(),
        None => vec![None; cells.len()],
    }
}

/// Flag cells with |z| > threshold.
pub fn zscore_mask(cells: &[Option<f64>], threshold: f64) -> (Vec<bool>, Option<Bounds>) {
    let Some((m, s)) = location_scale(cells) else {
        return (vec![false; cells.len()], None);
    };
    let mask = cells
        .iter()
        .map(|c| c.is_some_and(|v| ((v - m) / s).abs() > threshold))
        .collect();
    let bounds = Bounds {
        lower: m - threshold * s,
        upper: m + threshold * s,
    };
    (mask, Some(bounds))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn fixture() -> Vec<Option<f64>> {
        [1.0, 2.0, 3.0, 4.0, 5.0, 100.0].map(Some).to_vec()
    }

    #[test]
    fn test_zscore_of_extreme_value() {
        let z = zscores(&fixture());
        // mean 19.1667, sample std 39.6253
        assert_relative_eq!(z[5].unwrap(), 2.039_941, epsilon = 1e-5);
    }

    #[test]
    fn test_zscore_thresholds() {
        let (mask, _) = zscore_mask(&fixture(), 1.5);
        assert_eq!(mask, vec![false, false, false, false, false, true]);
        let (mask, bounds) = zscore_mask(&fixture(), 3.0);
        assert!(mask.iter().all(|f| !f));
        assert!(bounds.is_some());
    }

    #[test]
    fn test_zscore_constant_column() {
        let (mask, bounds) = zscore_mask(&[Some(2.0), Some(2.0), None], 0.0);
        assert_eq!(mask, vec![false, false, false]);
        assert!(bounds.is_none());
    }
}
