//! Ensemble of isolation trees with normalized path-length scoring (Liu et al., 2008).

use super::tree::IsolationTree;
use crate::config::ForestConfig;
use crate::error::{DetectError, Result};
use ndarray::ArrayView2;
use rand::rngs::StdRng;
use rand::SeedableRng;

const EULER_GAMMA: f64 = 0.577_215_664_901_532_9;

/// Fewest rows that can be partitioned at all.
pub const MIN_SAMPLES: usize = 2;

/// Expected path length of an unsuccessful BST search over `n` points, c(n).
pub fn average_path_length(n: usize) -> f64 {
    if n <= 1 {
        return 0.0;
    }
    let n = n as f64;
    2.0 * ((n - 1.0).ln() + EULER_GAMMA) - 2.0 * (n - 1.0) / n
}

/// Linearly interpolated empirical quantile, `q` in [0, 1]. `None` for no scores.
pub fn quantile(scores: &[f64], q: f64) -> Option<f64> {
    if scores.is_empty() {
        return None;
    }
    let mut sorted = scores.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mut pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    // snap 18.999… to 19 so whole positions land exactly on a score
    if (pos - pos.round()).abs() < 1e-9 {
        pos = pos.round();
    }
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64))
}

/// Flag scores strictly above the (1 − fraction) quantile of the batch.
pub fn flag_above_quantile(scores: &[f64], fraction: f64) -> Vec<bool> {
    match quantile(scores, 1.0 - fraction) {
        Some(threshold) => scores.iter().map(|&s| s > threshold).collect(),
        None => Vec::new(),
    }
}

/// Unfitted forest: parameters only.
#[derive(Debug, Clone)]
pub struct IsolationForest {
    config: ForestConfig,
}

impl IsolationForest {
    pub fn new(config: ForestConfig) -> Self {
        Self { config }
    }

    /// Build every tree from one seeded generator, in tree order, so a given
    /// input and seed always yields the same forest.
    pub fn fit(&self, x: ArrayView2<'_, f64>) -> Result<FittedForest> {
        let n = x.nrows();
        if n < MIN_SAMPLES {
            return Err(DetectError::InsufficientData {
                needed: MIN_SAMPLES,
                have: n,
            });
        }
        let sample_size = self.config.max_samples.clamp(MIN_SAMPLES, n);
        let max_depth = (sample_size as f64).log2().ceil() as usize;
        let mut rng = StdRng::seed_from_u64(self.config.seed);

        let trees = (0..self.config.n_trees)
            .map(|_| {
                let sample = rand::seq::index::sample(&mut rng, n, sample_size).into_vec();
                IsolationTree::build(&x, sample, max_depth, &mut rng)
            })
            .collect();

        tracing::debug!(
            n_trees = self.config.n_trees,
            sample_size,
            max_depth,
            rows = n,
            "fitted isolation forest"
        );
        Ok(FittedForest {
            trees,
            sample_size,
            contamination: self.config.contamination,
        })
    }
}

#[derive(Debug, Clone)]
pub struct FittedForest {
    trees: Vec<IsolationTree>,
    sample_size: usize,
    contamination: f64,
}

impl FittedForest {
    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    pub fn sample_size(&self) -> usize {
        self.sample_size
    }

    /// s(x) = 2^(−E[h(x)] / c(ψ)) in (0, 1]; higher is more anomalous.
    pub fn score_samples(&self, x: ArrayView2<'_, f64>) -> Vec<f64> {
        let norm = average_path_length(self.sample_size);
        let t = self.trees.len() as f64;
        x.rows()
            .into_iter()
            .map(|row| {
                let total: f64 = self.trees.iter().map(|tree| tree.path_length(row)).sum();
                2f64.powf(-(total / t) / norm)
            })
            .collect()
    }

    /// Outlier flags for `scores` at the fitted contamination.
    pub fn flag_outliers(&self, scores: &[f64]) -> Vec<bool> {
        flag_above_quantile(scores, self.contamination)
    }

    pub fn predict(&self, x: ArrayView2<'_, f64>) -> Vec<bool> {
        self.flag_outliers(&self.score_samples(x))
    }
}
