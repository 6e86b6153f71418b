//! Isolation Forest

use ndarray::{Array2, ArrayView1};
use rand::seq::index::sample;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

const EULER_GAMMA: f64 = 0.577_215_664_901_532_9;

/// Average path length of an unsuccessful BST search over `n` points
///
/// Normalizes path lengths so scores are comparable across subsample sizes.
pub fn average_path_length(n: usize) -> f64 {
    match n {
        0 | 1 => 0.0,
        2 => 1.0,
        _ => {
            let n = n as f64;
            2.0 * ((n - 1.0).ln() + EULER_GAMMA) - 2.0 * (n - 1.0) / n
        }
    }
}

#[derive(Debug)]
enum Node {
    Leaf {
        size: usize,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: Box<Node>,
        right: Box<Node>,
    },
}

/// One randomized partitioning tree
#[derive(Debug)]
struct IsolationTree {
    root: Node,
}

impl IsolationTree {
    fn fit(data: &Array2<f64>, indices: Vec<usize>, max_depth: usize, rng: &mut ChaCha20Rng) -> Self {
        Self {
            root: Self::grow(data, indices, 0, max_depth, rng),
        }
    }

    fn grow(
        data: &Array2<f64>,
        indices: Vec<usize>,
        depth: usize,
        max_depth: usize,
        rng: &mut ChaCha20Rng,
    ) -> Node {
        let size = indices.len();
        if depth >= max_depth || size <= 1 {
            return Node::Leaf { size };
        }

        // Only features that still vary within this node can split it
        let candidates: Vec<(usize, f64, f64)> = (0..data.ncols())
            .filter_map(|feature| {
                let (min, max) = indices.iter().fold((f64::MAX, f64::MIN), |(lo, hi), &i| {
                    let v = data[[i, feature]];
                    (lo.min(v), hi.max(v))
                });
                (max > min).then_some((feature, min, max))
            })
            .collect();

        if candidates.is_empty() {
            return Node::Leaf { size };
        }

        let (feature, min, max) = candidates[rng.gen_range(0..candidates.len())];
        let threshold = rng.gen_range(min..max);

        // threshold < max, so both sides are non-empty
        let (left, right): (Vec<usize>, Vec<usize>) = indices
            .into_iter()
            .partition(|&i| data[[i, feature]] <= threshold);

        Node::Split {
            feature,
            threshold,
            left: Box::new(Self::grow(data, left, depth + 1, max_depth, rng)),
            right: Box::new(Self::grow(data, right, depth + 1, max_depth, rng)),
        }
    }

    fn path_length(&self, row: ArrayView1<f64>) -> f64 {
        let mut node = &self.root;
        let mut depth = 0.0;
        loop {
            match node {
                Node::Leaf { size } => return depth + average_path_length(*size),
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    node = if row[*feature] <= *threshold { &**left } else { &**right };
                    depth += 1.0;
                }
            }
        }
    }
}

/// Ensemble of isolation trees fitted on one batch
#[derive(Debug)]
pub struct IsolationForest {
    trees: Vec<IsolationTree>,
    subsample: usize,
}

impl IsolationForest {
    /// Fit `n_trees` trees, each on a subsample drawn without replacement
    ///
    /// Identical data and seed always produce an identical forest.
    pub fn fit(data: &Array2<f64>, n_trees: usize, max_samples: usize, seed: u64) -> Self {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let rows = data.nrows();
        let subsample = max_samples.min(rows);
        let max_depth = (subsample.max(2) as f64).log2().ceil() as usize;

        let trees = (0..n_trees)
            .map(|_| {
                let indices = sample(&mut rng, rows, subsample).into_vec();
                IsolationTree::fit(data, indices, max_depth, &mut rng)
            })
            .collect();

        Self { trees, subsample }
    }

    /// Subsample size each tree was grown on
    pub fn subsample(&self) -> usize {
        self.subsample
    }

    /// Anomaly score in (0, 1] per row; higher isolates faster
    pub fn score_samples(&self, data: &Array2<f64>) -> Vec<f64> {
        let norm = average_path_length(self.subsample).max(f64::EPSILON);
        let n_trees = self.trees.len().max(1) as f64;

        data.rows()
            .into_iter()
            .map(|row| {
                let mean_path: f64 =
                    self.trees.iter().map(|t| t.path_length(row)).sum::<f64>() / n_trees;
                2f64.powf(-mean_path / norm)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clustered_with_outlier() -> Array2<f64> {
        let mut data = Vec::new();
        for i in 0..100 {
            let t = i as f64;
            data.extend([10.0 + (t * 0.37).sin(), 5.0 + (t * 1.13).cos()]);
        }
        data.extend([60.0, -40.0]);
        Array2::from_shape_vec((101, 2), data).unwrap()
    }

    #[test]
    fn test_average_path_length() {
        assert_eq!(average_path_length(0), 0.0);
        assert_eq!(average_path_length(1), 0.0);
        assert_eq!(average_path_length(2), 1.0);
        // 2 * (ln(255) + gamma) - 2 * 255 / 256
        let expected = 2.0 * (255f64.ln() + EULER_GAMMA) - 2.0 * 255.0 / 256.0;
        assert!((average_path_length(256) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_outlier_scores_highest() {
        let data = clustered_with_outlier();
        let forest = IsolationForest::fit(&data, 100, 256, 42);
        let scores = forest.score_samples(&data);

        let (max_idx, _) = scores
            .iter()
            .enumerate()
            .fold((0, f64::MIN), |best, (i, &s)| if s > best.1 { (i, s) } else { best });
        assert_eq!(max_idx, 100);
        assert!(scores.iter().all(|&s| s > 0.0 && s <= 1.0));
    }

    #[test]
    fn test_fixed_seed_is_reproducible() {
        let data = clustered_with_outlier();
        let a = IsolationForest::fit(&data, 50, 64, 42).score_samples(&data);
        let b = IsolationForest::fit(&data, 50, 64, 42).score_samples(&data);
        assert_eq!(a, b);
    }

    #[test]
    fn test_subsample_capped_by_rows() {
        let data = clustered_with_outlier();
        let forest = IsolationForest::fit(&data, 10, 256, 7);
        assert_eq!(forest.subsample(), 101);
    }

    #[test]
    fn test_two_points_always_separate() {
        let data = Array2::from_shape_vec((2, 1), vec![0.0, 1.0]).unwrap();
        let scores = IsolationForest::fit(&data, 200, 256, 42).score_samples(&data);
        // Every root split isolates both points at depth 1, and c(2) = 1
        assert_eq!(scores, vec![0.5, 0.5]);
    }

    #[test]
    fn test_constant_data_scores_uniformly() {
        let data = Array2::from_elem((20, 3), 1.5);
        let scores = IsolationForest::fit(&data, 20, 256, 42).score_samples(&data);
        assert!(scores.windows(2).all(|w| w[0] == w[1]));
    }
}
