//! Ordinary least squares against sample position

use serde::Serialize;
use statrs::distribution::{ContinuousCDF, StudentsT};

/// Straight-line fit of `y[i]` against `i`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LinearFit {
    pub points: usize,
    pub slope: f64,
    pub intercept: f64,
    pub r_squared: f64,
    /// Two-sided p-value of the slope against zero, Student t with n - 2
    /// degrees of freedom
    pub p_value: f64,
    /// Standard error of the slope
    pub slope_std_err: f64,
}

/// Fit `y` against positions `0, 1, 2, ...`. `None` below two points.
///
/// With exactly two points the line is exact: the p-value is 0, or 1 when both
/// values are equal.
pub fn fit_against_position(y: &[f64]) -> Option<LinearFit> {
    let n = y.len();
    if n < 2 {
        return None;
    }
    let nf = n as f64;
    let mx = (nf - 1.0) / 2.0;
    let my = y.iter().sum::<f64>() / nf;

    let (mut sxx, mut sxy, mut syy) = (0.0, 0.0, 0.0);
    for (i, &v) in y.iter().enumerate() {
        let dx = i as f64 - mx;
        let dy = v - my;
        sxx += dx * dx;
        sxy += dx * dy;
        syy += dy * dy;
    }

    let slope = sxy / sxx;
    let intercept = my - slope * mx;
    let r = if syy == 0.0 {
        0.0
    } else {
        (sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0)
    };
    let r_squared = r * r;

    let df = n - 2;
    let (p_value, slope_std_err) = if df == 0 {
        (if syy == 0.0 { 1.0 } else { 0.0 }, 0.0)
    } else {
        let dff = df as f64;
        let std_err = ((1.0 - r_squared) * syy / dff).max(0.0).sqrt() / sxx.sqrt();
        let p = if r_squared >= 1.0 {
            0.0
        } else {
            let t = r * (dff / (1.0 - r_squared)).sqrt();
            StudentsT::new(0.0, 1.0, dff)
                .map(|dist| (2.0 * (1.0 - dist.cdf(t.abs()))).clamp(0.0, 1.0))
                .unwrap_or(f64::NAN)
        };
        (p, std_err)
    };

    Some(LinearFit {
        points: n,
        slope,
        intercept,
        r_squared,
        p_value,
        slope_std_err,
    })
}
