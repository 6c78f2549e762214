//! Correlation coefficients and matrices
//!
//! Every coefficient is computed over pairwise-complete observations: a row
//! contributes to the (x, y) coefficient only when both cells are present.
//! Coefficients that are undefined for the data at hand (fewer than two pairs,
//! a constant side) are NaN.

use insight_core::math::cmp_f64;
use insight_core::CorrelationMethod;
use serde::Serialize;
use std::cmp::Ordering;

/// Rows where both cells are present, as two aligned vectors.
pub fn complete_pairs(x: &[Option<f64>], y: &[Option<f64>]) -> (Vec<f64>, Vec<f64>) {
    x.iter()
        .zip(y)
        .filter_map(|(a, b)| Some(((*a)?, (*b)?)))
        .unzip()
}

/// Average (1-based) ranks, ties sharing the mean of their positions.
pub fn average_ranks(values: &[f64]) -> Vec<f64> {
    let n = values.len();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| cmp_f64(&values[a], &values[b]));

    let mut ranks = vec![0.0; n];
    let mut i = 0;
    while i < n {
        let mut j = i + 1;
        while j < n && values[order[j]] == values[order[i]] {
            j += 1;
        }
        // Positions i..j (0-based) share rank mean(i+1..=j)
        let rank = (i + j + 1) as f64 / 2.0;
        for &idx in &order[i..j] {
            ranks[idx] = rank;
        }
        i = j;
    }
    ranks
}

fn is_constant(values: &[f64]) -> bool {
    values.windows(2).all(|w| w[0] == w[1])
}

/// At least two present values, not all equal.
pub fn has_spread(cells: &[Option<f64>]) -> bool {
    let mut present = cells.iter().flatten();
    match present.next() {
        Some(first) => present.any(|v| v != first),
        None => false,
    }
}

/// Pearson product-moment correlation of two aligned samples.
pub fn pearson(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len().min(y.len());
    // A constant side leaves rounding noise in the centred sums
    if n < 2 || is_constant(&x[..n]) || is_constant(&y[..n]) {
        return f64::NAN;
    }
    let mx = x[..n].iter().sum::<f64>() / n as f64;
    let my = y[..n].iter().sum::<f64>() / n as f64;

    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (&a, &b) in x[..n].iter().zip(&y[..n]) {
        let dx = a - mx;
        let dy = b - my;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }
    if sxx == 0.0 || syy == 0.0 {
        return f64::NAN;
    }
    (sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0)
}

/// Spearman rank correlation: Pearson over average ranks.
pub fn spearman(x: &[f64], y: &[f64]) -> f64 {
    pearson(&average_ranks(x), &average_ranks(y))
}

/// Pairs inside runs of equal neighbours: sum of t(t-1)/2 over run lengths t.
fn tied_pairs<T>(items: &[T], eq: impl Fn(&T, &T) -> bool) -> u64 {
    let mut total = 0u64;
    let mut run = 1u64;
    for w in items.windows(2) {
        if eq(&w[0], &w[1]) {
            run += 1;
        } else {
            total += run * (run - 1) / 2;
            run = 1;
        }
    }
    total + run * (run - 1) / 2
}

/// Bottom-up merge sort that returns the number of strict inversions.
fn sort_counting_swaps(values: &mut [f64]) -> u64 {
    let n = values.len();
    let mut buf = values.to_vec();
    let mut swaps = 0u64;
    let mut width = 1;
    while width < n {
        let mut start = 0;
        while start < n {
            let mid = (start + width).min(n);
            let end = (start + 2 * width).min(n);
            let (mut i, mut j) = (start, mid);
            for slot in &mut buf[start..end] {
                // Equal values are not inversions, so the left run wins ties
                if j < end && (i == mid || cmp_f64(&values[j], &values[i]) == Ordering::Less) {
                    *slot = values[j];
                    swaps += (mid - i) as u64;
                    j += 1;
                } else {
                    *slot = values[i];
                    i += 1;
                }
            }
            start = end;
        }
        values.copy_from_slice(&buf);
        width *= 2;
    }
    swaps
}

/// Kendall's tau-b, which corrects for ties in either sample.
///
/// Runs in O(n log n): sort by (x, y), then count the discordant pairs as the
/// inversions left in the y sequence.
pub fn kendall_tau_b(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len().min(y.len());
    if n < 2 {
        return f64::NAN;
    }
    let same = |a: &f64, b: &f64| cmp_f64(a, b) == Ordering::Equal;

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| cmp_f64(&x[a], &x[b]).then_with(|| cmp_f64(&y[a], &y[b])));
    let tied_x = tied_pairs(&order, |&a, &b| same(&x[a], &x[b]));
    let tied_xy = tied_pairs(&order, |&a, &b| same(&x[a], &x[b]) && same(&y[a], &y[b]));

    let mut ys: Vec<f64> = order.iter().map(|&i| y[i]).collect();
    let swaps = sort_counting_swaps(&mut ys);
    let tied_y = tied_pairs(&ys, same);

    let total = (n as u64) * (n as u64 - 1) / 2;
    let denom = ((total - tied_x) as f64 * (total - tied_y) as f64).sqrt();
    if denom == 0.0 {
        return f64::NAN;
    }
    // concordant - discordant
    let score = total as f64 - tied_x as f64 - tied_y as f64 + tied_xy as f64 - 2.0 * swaps as f64;
    (score / denom).clamp(-1.0, 1.0)
}

/// Coefficient of the given method over pairwise-complete observations.
pub fn correlate(method: CorrelationMethod, x: &[Option<f64>], y: &[Option<f64>]) -> f64 {
    let (a, b) = complete_pairs(x, y);
    match method {
        CorrelationMethod::Pearson => pearson(&a, &b),
        CorrelationMethod::Spearman => spearman(&a, &b),
        CorrelationMethod::Kendall => kendall_tau_b(&a, &b),
    }
}

/// Square, symmetric correlation matrix over numeric columns
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    pub method: CorrelationMethod,
    pub fingerprint: u64,
    pub columns: Vec<String>,
    /// Row-major coefficients, `values[i][j]` for `columns[i]` against `columns[j]`
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    pub(crate) fn empty(method: CorrelationMethod, fingerprint: u64) -> Self {
        Self {
            method,
            fingerprint,
            columns: Vec::new(),
            values: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    fn index_of(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    /// Coefficient for a pair of column names.
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        Some(self.values[self.index_of(a)?][self.index_of(b)?])
    }

    /// Pairs from the upper triangle with |r| >= threshold, strongest first.
    /// Ties keep column order.
    pub fn strong_pairs(&self, threshold: f64) -> Vec<CorrelationPair> {
        let mut pairs = Vec::new();
        for i in 0..self.columns.len() {
            for j in (i + 1)..self.columns.len() {
                let r = self.values[i][j];
                if r.abs() >= threshold {
                    pairs.push(CorrelationPair {
                        first: self.columns[i].clone(),
                        second: self.columns[j].clone(),
                        coefficient: r,
                    });
                }
            }
        }
        pairs.sort_by(|a, b| cmp_f64(&b.coefficient.abs(), &a.coefficient.abs()));
        pairs
    }
}

/// Two columns and their correlation coefficient
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationPair {
    pub first: String,
    pub second: String,
    pub coefficient: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_average_ranks_with_ties() {
        let ranks = average_ranks(&[10.0, 20.0, 10.0, 30.0]);
        assert_eq!(ranks, vec![1.5, 3.0, 1.5, 4.0]);
    }

    #[test]
    fn test_pearson_perfect() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0, 100.0];
        let y = [5.0, 4.0, 3.0, 2.0, 1.0, 0.0];
        let r = pearson(&x, &y);
        assert!(r < -0.6);
        assert_relative_eq!(pearson(&x, &x), 1.0, epsilon = 1e-12);
        assert_relative_eq!(spearman(&x, &y), -1.0, epsilon = 1e-12);
        assert_relative_eq!(kendall_tau_b(&x, &y), -1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_constant_is_nan() {
        let x = [1.0, 2.0, 3.0];
        let c = [4.0, 4.0, 4.0];
        assert!(pearson(&x, &c).is_nan());
        assert!(spearman(&x, &c).is_nan());
        assert!(kendall_tau_b(&x, &c).is_nan());
        assert!(pearson(&[1.0], &[2.0]).is_nan());
    }

    #[test]
    fn test_kendall_tau_b_ties() {
        // 5 concordant, 0 discordant, one tie in x: 5 / sqrt(5 * 6)
        let tau = kendall_tau_b(&[1.0, 2.0, 2.0, 3.0], &[1.0, 3.0, 2.0, 4.0]);
        assert_relative_eq!(tau, 0.912_870_929_175_276_9, epsilon = 1e-12);
    }

    fn kendall_by_pairs(x: &[f64], y: &[f64]) -> f64 {
        let n = x.len();
        let (mut score, mut tied_x, mut tied_y) = (0i64, 0i64, 0i64);
        for i in 0..n {
            for j in (i + 1)..n {
                match (cmp_f64(&x[i], &x[j]), cmp_f64(&y[i], &y[j])) {
                    (Ordering::Equal, Ordering::Equal) => {
                        tied_x += 1;
                        tied_y += 1;
                    }
                    (Ordering::Equal, _) => tied_x += 1,
                    (_, Ordering::Equal) => tied_y += 1,
                    (dx, dy) if dx == dy => score += 1,
                    _ => score -= 1,
                }
            }
        }
        let total = (n * (n - 1) / 2) as i64;
        score as f64 / (((total - tied_x) * (total - tied_y)) as f64).sqrt()
    }

    #[test]
    fn test_kendall_matches_pair_count() {
        use rand::{Rng, SeedableRng};
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(11);
        for n in [2, 3, 7, 50, 301] {
            // Small integer range forces ties in both samples
            let x: Vec<f64> = (0..n).map(|_| rng.gen_range(0..6) as f64).collect();
            let y: Vec<f64> = x.iter().map(|v| v + rng.gen_range(-3..4) as f64).collect();
            let expected = kendall_by_pairs(&x, &y);
            if expected.is_nan() {
                assert!(kendall_tau_b(&x, &y).is_nan());
            } else {
                assert_relative_eq!(kendall_tau_b(&x, &y), expected, epsilon = 1e-12);
            }
        }
        let x = [1.0, 2.0, 2.0, 3.0, 3.0, 4.0];
        let y = [2.0, 1.0, 2.0, 4.0, 4.0, 3.0];
        assert_relative_eq!(kendall_tau_b(&x, &y), 6.0 / 13.0, epsilon = 1e-12);
    }

    #[test]
    fn test_has_spread() {
        assert!(has_spread(&[Some(1.0), None, Some(2.0)]));
        assert!(!has_spread(&[Some(4.0), None, Some(4.0)]));
        assert!(!has_spread(&[None, Some(4.0)]));
        assert!(!has_spread(&[]));
    }

    #[test]
    fn test_swap_count() {
        let mut v = [3.0, 1.0, 2.0, 2.0, 0.0];
        assert_eq!(sort_counting_swaps(&mut v), 7);
        assert_eq!(v, [0.0, 1.0, 2.0, 2.0, 3.0]);
        assert_eq!(tied_pairs(&v, |a, b| a == b), 1);
    }

    #[test]
    fn test_pairwise_complete() {
        let x = [Some(1.0), None, Some(3.0), Some(4.0)];
        let y = [Some(2.0), Some(9.0), None, Some(8.0)];
        let (a, b) = complete_pairs(&x, &y);
        assert_eq!(a, vec![1.0, 4.0]);
        assert_eq!(b, vec![2.0, 8.0]);
        assert_relative_eq!(correlate(CorrelationMethod::Pearson, &x, &y), 1.0);
    }
}
