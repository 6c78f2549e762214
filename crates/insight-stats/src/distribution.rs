//! Shape of a single numeric distribution and a normality test

use insight_core::math::{mean, quantile_sorted, sample_variance, sorted, Moments};
use ordered_float::OrderedFloat;
use serde::Serialize;
use statrs::distribution::{ContinuousCDF, Normal};
use std::collections::BTreeMap;

/// Minimum sample size for the normality test.
pub const MIN_NORMALITY_SAMPLES: usize = 3;

/// Largest sample size that gets the exact KS p-value.
pub const EXACT_KS_MAX_N: usize = 100;

/// Power-of-ten rescaling step for the exact KS matrix power
const SCALE_EXP: i32 = 140;

/// One-sample Kolmogorov-Smirnov test against a fitted normal
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NormalityTest {
    /// Largest distance between the empirical and the normal CDF
    pub statistic: f64,
    /// Two-sided p-value. Exact for up to [`EXACT_KS_MAX_N`] values, the
    /// small-sample corrected asymptotic form beyond that. The mean and std are
    /// estimated from the same data, so it is conservative for normality.
    pub p_value: f64,
    /// `p_value > alpha`
    pub is_normal: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistributionSummary {
    pub column: String,
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    /// Smallest of the most frequent values
    pub mode: f64,
    pub std: f64,
    pub variance: f64,
    /// Population (biased) skewness
    pub skewness: f64,
    /// Population (biased) excess kurtosis
    pub kurtosis: f64,
    pub min: f64,
    pub max: f64,
    /// `None` below three values or when the sample has no spread
    pub normality: Option<NormalityTest>,
}

impl DistributionSummary {
    /// Summarise a non-empty set of values. Returns `None` for an empty one.
    pub fn from_values(column: impl Into<String>, values: &[f64], alpha: f64) -> Option<Self> {
        let data = sorted(values.iter().copied());
        let (&min, &max) = (data.first()?, data.last()?);
        let mean = mean(&data);
        let variance = sample_variance(&data);
        let std = variance.sqrt();
        let moments = Moments::from_slice(&data);

        let normality = if data.len() >= MIN_NORMALITY_SAMPLES && std > 0.0 {
            ks_normal_test(&data, mean, std, alpha)
        } else {
            None
        };

        Some(Self {
            column: column.into(),
            count: data.len(),
            mean,
            median: quantile_sorted(&data, 0.5),
            mode: mode(&data)?,
            std,
            variance,
            skewness: moments.population_skewness(),
            kurtosis: moments.population_excess_kurtosis(),
            min,
            max,
            normality,
        })
    }
}

/// Smallest most-frequent value.
pub fn mode(values: &[f64]) -> Option<f64> {
    let mut counts: BTreeMap<OrderedFloat<f64>, usize> = BTreeMap::new();
    for &v in values {
        *counts.entry(OrderedFloat(v)).or_insert(0) += 1;
    }
    let mut best: Option<(f64, usize)> = None;
    for (value, count) in counts {
        if best.map_or(true, |(_, c)| count > c) {
            best = Some((value.into_inner(), count));
        }
    }
    best.map(|(v, _)| v)
}

/// Kolmogorov-Smirnov statistic of sorted data against N(mean, std).
pub fn ks_statistic(sorted: &[f64], mean: f64, std: f64) -> Option<f64> {
    let normal = Normal::new(mean, std).ok()?;
    let n = sorted.len() as f64;
    let d = sorted
        .iter()
        .enumerate()
        .map(|(i, &x)| {
            let cdf = normal.cdf(x);
            let above = (i + 1) as f64 / n - cdf;
            let below = cdf - i as f64 / n;
            above.max(below)
        })
        .fold(0.0, f64::max);
    Some(d)
}

/// Survival function of the Kolmogorov distribution, Q(lambda).
pub fn kolmogorov_q(lambda: f64) -> f64 {
    if lambda < 0.2 {
        return 1.0;
    }
    let mut sum = 0.0;
    let mut sign = 1.0;
    for j in 1..=100 {
        let jf = j as f64;
        let term = sign * (-2.0 * jf * jf * lambda * lambda).exp();
        sum += term;
        if term.abs() < 1e-12 {
            break;
        }
        sign = -sign;
    }
    (2.0 * sum).clamp(0.0, 1.0)
}

fn mat_mul(a: &[f64], b: &[f64], m: usize) -> Vec<f64> {
    let mut c = vec![0.0; m * m];
    for i in 0..m {
        for k in 0..m {
            let aik = a[i * m + k];
            if aik == 0.0 {
                continue;
            }
            for j in 0..m {
                c[i * m + j] += aik * b[k * m + j];
            }
        }
    }
    c
}

/// `h^n` by squaring, with the power of ten factored out of the result.
fn mat_pow(h: &[f64], m: usize, n: usize) -> (Vec<f64>, i32) {
    if n == 1 {
        return (h.to_vec(), 0);
    }
    let (half, exp) = mat_pow(h, m, n / 2);
    let mut q = mat_mul(&half, &half, m);
    let mut exp = 2 * exp;
    if n % 2 == 1 {
        q = mat_mul(h, &q, m);
    }
    let centre = m / 2;
    if q[centre * m + centre] > 10f64.powi(SCALE_EXP) {
        let down = 10f64.powi(-SCALE_EXP);
        q.iter_mut().for_each(|v| *v *= down);
        exp += SCALE_EXP;
    }
    (q, exp)
}

/// Exact P(D_n >= d) for the two-sided one-sample KS statistic.
///
/// Marsaglia, Tsang and Wang (2003): the CDF is an entry of the n-th power
/// of a (2k-1) square matrix, k = floor(n d) + 1.
pub fn kolmogorov_exact_sf(n: usize, d: f64) -> f64 {
    if n == 0 || d.is_nan() {
        return f64::NAN;
    }
    let nf = n as f64;
    if d >= 1.0 {
        return 0.0;
    }
    if d <= 0.5 / nf {
        return 1.0;
    }

    let k = (nf * d).floor() as usize + 1;
    let m = 2 * k - 1;
    let h = k as f64 - nf * d;

    let mut hm = vec![0.0; m * m];
    for i in 0..m {
        for j in 0..=(i + 1).min(m - 1) {
            hm[i * m + j] = 1.0;
        }
    }
    for i in 0..m {
        hm[i * m] -= h.powi(i as i32 + 1);
        hm[(m - 1) * m + i] -= h.powi((m - i) as i32);
    }
    if 2.0 * h - 1.0 > 0.0 {
        hm[(m - 1) * m] += (2.0 * h - 1.0).powi(m as i32);
    }
    for i in 0..m {
        for j in 0..=i.min(m - 1) {
            // (i - j + 1)!
            for g in 1..=(i + 1 - j) {
                hm[i * m + j] /= g as f64;
            }
        }
    }

    let (q, mut exp) = mat_pow(&hm, m, n);
    let mut s = q[(k - 1) * m + (k - 1)];
    for i in 1..=n {
        s = s * i as f64 / nf;
        if s < 10f64.powi(-SCALE_EXP) {
            s *= 10f64.powi(SCALE_EXP);
            exp -= SCALE_EXP;
        }
    }
    let cdf = s * 10f64.powi(exp);
    (1.0 - cdf).clamp(0.0, 1.0)
}

/// Two-sided KS test of sorted data against N(mean, std).
pub fn ks_normal_test(sorted: &[f64], mean: f64, std: f64, alpha: f64) -> Option<NormalityTest> {
    let statistic = ks_statistic(sorted, mean, std)?;
    let n = sorted.len();
    let p_value = if n <= EXACT_KS_MAX_N {
        kolmogorov_exact_sf(n, statistic)
    } else {
        let sqrt_n = (n as f64).sqrt();
        kolmogorov_q((sqrt_n + 0.12 + 0.11 / sqrt_n) * statistic)
    };
    Some(NormalityTest {
        statistic,
        p_value,
        is_normal: p_value > alpha,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use rand_distr::{Distribution, Exp, Normal as NormalDist};

    #[test]
    fn test_mode_prefers_smallest() {
        assert_eq!(mode(&[3.0, 1.0, 3.0, 1.0, 2.0]), Some(1.0));
        assert_eq!(mode(&[5.0, 4.0]), Some(4.0));
        assert_eq!(mode(&[]), None);
    }

    #[test]
    fn test_kolmogorov_q_limits() {
        assert_eq!(kolmogorov_q(0.0), 1.0);
        assert!(kolmogorov_q(3.0) < 1e-6);
        // Q(1.3581) is the classic 5% critical value
        assert_relative_eq!(kolmogorov_q(1.3581), 0.05, epsilon = 1e-3);
    }

    #[test]
    fn test_kolmogorov_exact() {
        // D = 0.40925 is the tabulated 5% critical value for n = 10
        assert_relative_eq!(kolmogorov_exact_sf(10, 0.40925), 0.05, epsilon = 1e-4);
        // n = 1: P(D < d) = 2d - 1
        assert_relative_eq!(kolmogorov_exact_sf(1, 0.75), 0.5, epsilon = 1e-12);
        // Upper tail for d >= 1 - 1/n is 2(1 - d)^n
        assert_relative_eq!(kolmogorov_exact_sf(3, 0.9), 0.002, epsilon = 1e-12);
        assert_relative_eq!(kolmogorov_exact_sf(5, 0.3), 0.664, epsilon = 1e-9);
        assert_relative_eq!(kolmogorov_exact_sf(20, 0.2), 0.352_720_173_623_416, epsilon = 1e-9);

        assert_eq!(kolmogorov_exact_sf(10, 0.05), 1.0);
        assert_eq!(kolmogorov_exact_sf(10, 1.0), 0.0);
        assert!(kolmogorov_exact_sf(0, 0.5).is_nan());
    }

    #[test]
    fn test_small_sample_uses_exact_p_value() {
        let data = [1.0, 2.0, 2.5, 3.0, 7.0];
        let m = mean(&data);
        let s = sample_variance(&data).sqrt();
        let test = ks_normal_test(&data, m, s, 0.05).unwrap();
        let d = ks_statistic(&data, m, s).unwrap();
        assert_eq!(test.statistic, d);
        assert_eq!(test.p_value, kolmogorov_exact_sf(5, d));

        // Near the size limit both forms agree closely
        let exact = kolmogorov_exact_sf(EXACT_KS_MAX_N, 0.1);
        let asymptotic = kolmogorov_q((10.0 + 0.12 + 0.011) * 0.1);
        assert_relative_eq!(exact, asymptotic, epsilon = 5e-3);
    }

    #[test]
    fn test_normal_sample_passes() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let dist = NormalDist::new(10.0, 2.0).unwrap();
        let values: Vec<f64> = (0..500).map(|_| dist.sample(&mut rng)).collect();
        let summary = DistributionSummary::from_values("x", &values, 0.05).unwrap();
        let test = summary.normality.unwrap();
        assert!(test.is_normal, "p = {}", test.p_value);
        assert!(summary.skewness.abs() < 0.5);
    }

    #[test]
    fn test_skewed_sample_fails() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let dist = Exp::new(1.0).unwrap();
        let values: Vec<f64> = (0..500).map(|_| dist.sample(&mut rng)).collect();
        let summary = DistributionSummary::from_values("x", &values, 0.05).unwrap();
        let test = summary.normality.unwrap();
        assert!(!test.is_normal, "p = {}", test.p_value);
        assert!(summary.skewness > 1.0);
    }

    #[test]
    fn test_insufficient_samples() {
        let summary = DistributionSummary::from_values("x", &[1.0, 2.0], 0.05).unwrap();
        assert!(summary.normality.is_none());
        assert_eq!(summary.mean, 1.5);

        let summary = DistributionSummary::from_values("x", &[4.0, 4.0, 4.0], 0.05).unwrap();
        assert!(summary.normality.is_none());
        assert!(summary.skewness.is_nan());

        assert!(DistributionSummary::from_values("x", &[], 0.05).is_none());
    }
}
