//! Isolation forest scoring
//!
//! Points are isolated by random recursive partitioning: an ensemble of trees
//! is grown on random subsamples, each split picking a random feature and a
//! uniform cut between that feature's extremes. Anomalies need fewer cuts to
//! isolate, so their average path length is short.
//!
//! Path lengths are normalised by c(n), the expected depth of an unsuccessful
//! binary search tree lookup, giving a score s = 2^(-E[h] / c(n)) in (0, 1].
//! Scores near 1 are anomalous and scores near 0.5 are unremarkable.
//!
//! All randomness comes from a [`ChaCha8Rng`] seeded by the caller, so a given
//! input and seed always produce the same scores.

use rand::seq::index;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Largest subsample drawn for a single tree.
pub const MAX_SAMPLES: usize = 256;

const EULER_GAMMA: f64 = 0.577_215_664_901_532_9;

enum Node {
    Split {
        feature: usize,
        value: f64,
        left: Box<Node>,
        right: Box<Node>,
    },
    Leaf {
        size: usize,
    },
}

/// Expected path length of an unsuccessful search in a BST of `n` nodes.
pub fn c_factor(n: usize) -> f64 {
    match n {
        0 | 1 => 0.0,
        2 => 1.0,
        _ => {
            let n = n as f64;
            2.0 * ((n - 1.0).ln() + EULER_GAMMA) - 2.0 * (n - 1.0) / n
        }
    }
}

fn grow(points: &[&[f64]], dims: usize, depth_left: usize, rng: &mut ChaCha8Rng) -> Node {
    let n = points.len();
    if n <= 1 || depth_left == 0 {
        return Node::Leaf { size: n };
    }

    let feature = rng.gen_range(0..dims);
    let (lo, hi) = points
        .iter()
        .map(|p| p[feature])
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if hi <= lo {
        return Node::Leaf { size: n };
    }

    let value = lo + rng.gen::<f64>() * (hi - lo);
    let (left, right): (Vec<&[f64]>, Vec<&[f64]>) =
        points.iter().copied().partition(|p| p[feature] < value);
    if left.is_empty() || right.is_empty() {
        return Node::Leaf { size: n };
    }

    Node::Split {
        feature,
        value,
        left: Box::new(grow(&left, dims, depth_left - 1, rng)),
        right: Box::new(grow(&right, dims, depth_left - 1, rng)),
    }
}

fn path_length(point: &[f64], node: &Node, depth: usize) -> f64 {
    match node {
        Node::Leaf { size } => depth as f64 + c_factor(*size),
        Node::Split {
            feature,
            value,
            left,
            right,
        } => {
            if point[*feature] < *value {
                path_length(point, left, depth + 1)
            } else {
                path_length(point, right, depth + 1)
            }
        }
    }
}

/// Anomaly score for every point.
///
/// `points` must be non-empty rows of equal width with finite values. Fewer
/// than two points, or zero trees, score 0.5 throughout.
pub fn isolation_scores(points: &[Vec<f64>], trees: usize, seed: u64) -> Vec<f64> {
    let n = points.len();
    let dims = points.first().map_or(0, Vec::len);
    if n < 2 || dims == 0 || trees == 0 {
        return vec![0.5; n];
    }

    let sample_size = n.min(MAX_SAMPLES);
    let max_depth = (sample_size as f64).log2().ceil() as usize;
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let forest: Vec<Node> = (0..trees)
        .map(|_| {
            let subsample: Vec<&[f64]> = index::sample(&mut rng, n, sample_size)
                .into_iter()
                .map(|i| points[i].as_slice())
                .collect();
            grow(&subsample, dims, max_depth, &mut rng)
        })
        .collect();

    let cn = c_factor(sample_size);
    points
        .iter()
        .map(|p| {
            let mean_path =
                forest.iter().map(|t| path_length(p, t, 0)).sum::<f64>() / trees as f64;
            2f64.powf(-mean_path / cn)
        })
        .collect()
}

/// Number of points flagged for a contamination rate: ceil(c * n), guarding
/// against representation error such as 0.1 * 30 = 3.0000000000000004.
pub fn flag_count(contamination: f64, n: usize) -> usize {
    let k = (contamination * n as f64 - 1e-9).ceil();
    (k.max(0.0) as usize).min(n)
}

/// Mask of the `k` highest scores, earlier points first among ties.
pub fn top_k_mask(scores: &[f64], k: usize) -> Vec<bool> {
    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));
    let mut mask = vec![false; scores.len()];
    for &i in order.iter().take(k) {
        mask[i] = true;
    }
    mask
}
