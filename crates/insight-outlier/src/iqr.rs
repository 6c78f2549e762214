//! Interquartile range fences

use crate::detection::Bounds;
use insight_core::math::{quartiles_sorted, sorted};

/// Fences `[Q1 - m * IQR, Q3 + m * IQR]`, `None` below two values.
pub fn iqr_bounds(values: &[f64], multiplier: f64) -> Option<Bounds> {
    if values.len() < 2 {
        return None;
    }
    let data = sorted(values.iter().copied());
    let (q1, _, q3) = quartiles_sorted(&data);
    let iqr = q3 - q1;
    Some(Bounds {
        lower: q1 - multiplier * iqr,
        upper: q3 + multiplier * iqr,
    })
}

/// Flag cells strictly outside the IQR fences. Missing cells stay unflagged.
pub fn iqr_mask(cells: &[Option<f64>], multiplier: f64) -> (Vec<bool>, Option<Bounds>) {
    let values: Vec<f64> = cells.iter().flatten().copied().collect();
    match iqr_bounds(&values, multiplier) {
        Some(bounds) => {
            let mask = cells
                .iter()
                .map(|c| c.is_some_and(|v| !bounds.contains(v)))
                .collect();
            (mask, Some(bounds))
        }
        None => (vec![false; cells.len()], None),
    }
}
