//! Numeric helpers shared by every engine
//!
//! All percentile-derived values in the workspace go through
//! [`quantile_sorted`] so that quartiles, IQR and outlier bounds agree with
//! each other. Dispersion uses the sample (n - 1) convention throughout.

use std::cmp::Ordering;

/// Tolerance below which a second central moment is treated as zero.
const ZERO_VARIANCE_TOLERANCE: f64 = 1e-14;

/// Collect values and sort them ascending.
pub fn sorted(values: impl IntoIterator<Item = f64>) -> Vec<f64> {
    let mut out: Vec<f64> = values.into_iter().collect();
    out.sort_by(|a, b| a.total_cmp(b));
    out
}

/// Quantile of pre-sorted data using linear interpolation between order
/// statistics. Returns NaN for empty input.
pub fn quantile_sorted(sorted: &[f64], p: f64) -> f64 {
    let n = sorted.len();
    if n == 0 {
        return f64::NAN;
    }
    if n == 1 {
        return sorted[0];
    }
    let h = (n - 1) as f64 * p.clamp(0.0, 1.0);
    let lo = h.floor() as usize;
    let hi = (lo + 1).min(n - 1);
    let frac = h - lo as f64;
    sorted[lo] + frac * (sorted[hi] - sorted[lo])
}

/// Quartiles (Q1, median, Q3) of pre-sorted data.
pub fn quartiles_sorted(sorted: &[f64]) -> (f64, f64, f64) {
    (
        quantile_sorted(sorted, 0.25),
        quantile_sorted(sorted, 0.5),
        quantile_sorted(sorted, 0.75),
    )
}

/// Arithmetic mean, NaN when empty.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample variance (n - 1 denominator), NaN below two observations.
pub fn sample_variance(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return f64::NAN;
    }
    let m = mean(values);
    values.iter().map(|&x| (x - m) * (x - m)).sum::<f64>() / (n - 1) as f64
}

/// Sample standard deviation (n - 1 denominator).
pub fn sample_std(values: &[f64]) -> f64 {
    sample_variance(values).sqrt()
}

/// Total order for floats that places NaN last.
pub fn cmp_f64(a: &f64, b: &f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a.total_cmp(b),
    }
}

/// Central moments of a sample, used for skewness and kurtosis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Moments {
    pub n: usize,
    pub mean: f64,
    /// Second central moment (population variance)
    pub m2: f64,
    pub m3: f64,
    pub m4: f64,
}

impl Moments {
    pub fn from_slice(values: &[f64]) -> Self {
        let n = values.len();
        let mean = mean(values);
        let (mut m2, mut m3, mut m4) = (0.0, 0.0, 0.0);
        for &x in values {
            let d = x - mean;
            let d2 = d * d;
            m2 += d2;
            m3 += d2 * d;
            m4 += d2 * d2;
        }
        let nf = n.max(1) as f64;
        Self {
            n,
            mean,
            m2: m2 / nf,
            m3: m3 / nf,
            m4: m4 / nf,
        }
    }

    fn has_zero_variance(&self) -> bool {
        self.m2 <= ZERO_VARIANCE_TOLERANCE * self.mean.abs().max(1.0).powi(2)
    }

    /// Biased (population) skewness g1 = m3 / m2^1.5.
    ///
    /// NaN when empty or when the sample has no spread.
    pub fn population_skewness(&self) -> f64 {
        if self.n == 0 || self.has_zero_variance() {
            return f64::NAN;
        }
        self.m3 / self.m2.powf(1.5)
    }

    /// Biased excess kurtosis g2 = m4 / m2^2 - 3.
    pub fn population_excess_kurtosis(&self) -> f64 {
        if self.n == 0 || self.has_zero_variance() {
            return f64::NAN;
        }
        self.m4 / (self.m2 * self.m2) - 3.0
    }

    /// Bias-adjusted sample skewness G1. NaN below three observations, zero
    /// for a constant sample.
    pub fn sample_skewness(&self) -> f64 {
        if self.n < 3 {
            return f64::NAN;
        }
        if self.has_zero_variance() {
            return 0.0;
        }
        let n = self.n as f64;
        let g1 = self.m3 / self.m2.powf(1.5);
        (n * (n - 1.0)).sqrt() / (n - 2.0) * g1
    }

    /// Bias-adjusted sample excess kurtosis G2. NaN below four observations,
    /// zero for a constant sample.
    pub fn sample_excess_kurtosis(&self) -> f64 {
        if self.n < 4 {
            return f64::NAN;
        }
        if self.has_zero_variance() {
            return 0.0;
        }
        let n = self.n as f64;
        let g2 = self.m4 / (self.m2 * self.m2) - 3.0;
        ((n + 1.0) * g2 + 6.0) * (n - 1.0) / ((n - 2.0) * (n - 3.0))
    }
}
