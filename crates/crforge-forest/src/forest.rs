//! Bootstrap-aggregated regression forests.
//!
//! [`RandomForestParams`] carries the knobs that materially change model behavior;
//! [`RandomForestParams::fit`] grows the trees and returns an immutable
//! [`RandomForest`].
//!
//! # Parallelization
//!
//! Trees are independent, so they are grown on scoped threads, each thread taking a
//! contiguous chunk of tree indices. Per-tree RNG seeds are drawn up front, which
//! keeps the result independent of the chunking.

use std::{num::NonZeroUsize, thread};

use rand::{Rng, SeedableRng as _};
use rand_pcg::Pcg64;

use crate::{
    FitError, Regressor,
    max_features::MaxFeatures,
    tree::{RegressionTree, TreeParams},
};

/// Training configuration for a [`RandomForest`].
#[derive(Debug, Clone, PartialEq)]
pub struct RandomForestParams {
    /// Number of trees in the ensemble
    pub n_trees: usize,
    /// Features examined per split
    pub max_features: MaxFeatures,
    /// Minimum number of training rows per leaf
    pub min_samples_leaf: usize,
    /// Maximum tree depth (`None` = grow until leaves are pure or too small)
    pub max_depth: Option<usize>,
    /// Train each tree on a bootstrap sample instead of the full training set
    pub bootstrap: bool,
    /// Seed of the master RNG stream
    pub seed: u64,
    /// Worker threads (`None` = available parallelism)
    pub threads: Option<NonZeroUsize>,
}

impl Default for RandomForestParams {
    fn default() -> Self {
        Self {
            n_trees: 100,
            max_features: MaxFeatures::default(),
            min_samples_leaf: 1,
            max_depth: None,
            bootstrap: true,
            seed: 0,
            threads: None,
        }
    }
}

impl RandomForestParams {
    /// Fits a forest on the rows of `x` against targets `y`.
    ///
    /// # Errors
    ///
    /// Returns [`FitError`] if the data is empty, ragged, non-finite, or if a
    /// parameter is out of range.
    pub fn fit<X>(&self, x: &[X], y: &[f32]) -> Result<RandomForest, FitError>
    where
        X: AsRef<[f32]> + Sync,
    {
        self.validate()?;
        let n_features = crate::validate_training_data(x, y)?;
        let tree_params = TreeParams {
            max_features: self.max_features.resolve(n_features),
            min_samples_leaf: self.min_samples_leaf,
            max_depth: self.max_depth,
        };

        let mut master = Pcg64::seed_from_u64(self.seed);
        let seeds: Vec<u64> = (0..self.n_trees).map(|_| master.random()).collect();

        let threads = self
            .threads
            .or_else(|| thread::available_parallelism().ok())
            .map_or(1, NonZeroUsize::get)
            .min(self.n_trees);
        let chunk_size = self.n_trees.div_ceil(threads);

        tracing::debug!(
            n_trees = self.n_trees,
            n_rows = x.len(),
            n_features,
            max_features = tree_params.max_features,
            min_samples_leaf = self.min_samples_leaf,
            threads,
            "fitting random forest"
        );

        let bootstrap = self.bootstrap;
        let trees = thread::scope(|s| {
            let handles = seeds
                .chunks(chunk_size)
                .map(|chunk| {
                    s.spawn(move || {
                        chunk
                            .iter()
                            .map(|&seed| {
                                let mut rng = Pcg64::seed_from_u64(seed);
                                let sample = if bootstrap {
                                    bootstrap_sample(&mut rng, x.len())
                                } else {
                                    (0..x.len()).collect()
                                };
                                RegressionTree::grow(x, y, sample, tree_params, &mut rng)
                            })
                            .collect::<Vec<_>>()
                    })
                })
                .collect::<Vec<_>>();
            handles
                .into_iter()
                .flat_map(|handle| {
                    handle
                        .join()
                        .unwrap_or_else(|payload| std::panic::resume_unwind(payload))
                })
                .collect::<Vec<_>>()
        });

        let feature_importances = mean_decrease_in_impurity(&trees, n_features);
        Ok(RandomForest {
            trees,
            n_features,
            feature_importances,
        })
    }

    fn validate(&self) -> Result<(), FitError> {
        if self.n_trees == 0 {
            return Err(FitError::InvalidParam {
                name: "n_trees",
                reason: "must be at least 1",
            });
        }
        if self.min_samples_leaf == 0 {
            return Err(FitError::InvalidParam {
                name: "min_samples_leaf",
                reason: "must be at least 1",
            });
        }
        if self.max_depth == Some(0) {
            return Err(FitError::InvalidParam {
                name: "max_depth",
                reason: "must be at least 1",
            });
        }
        self.max_features.validate()
    }
}

/// Draws `n` row indices uniformly with replacement.
fn bootstrap_sample<R>(rng: &mut R, n: usize) -> Vec<usize>
where
    R: Rng + ?Sized,
{
    (0..n).map(|_| rng.random_range(0..n)).collect()
}

/// Per-tree impurity decrease normalized to 1, averaged over trees, normalized again.
#[expect(clippy::cast_possible_truncation)]
fn mean_decrease_in_impurity(trees: &[RegressionTree], n_features: usize) -> Vec<f32> {
    let mut totals = vec![0.0_f64; n_features];
    for tree in trees {
        let decrease = tree.impurity_decrease();
        let sum: f64 = decrease.iter().sum();
        if sum > 0.0 {
            for (total, d) in totals.iter_mut().zip(decrease) {
                *total += d / sum;
            }
        }
    }
    let sum: f64 = totals.iter().sum();
    totals
        .into_iter()
        .map(|t| if sum > 0.0 { (t / sum) as f32 } else { 0.0 })
        .collect()
}

/// A fitted random forest regressor.
///
/// Immutable after fitting and safe to share across threads.
#[derive(Debug, Clone)]
pub struct RandomForest {
    trees: Vec<RegressionTree>,
    n_features: usize,
    feature_importances: Vec<f32>,
}

impl RandomForest {
    /// The trees of the ensemble, in seed order.
    #[must_use]
    pub fn trees(&self) -> &[RegressionTree] {
        &self.trees
    }

    /// Mean decrease in impurity per feature column.
    ///
    /// Values are non-negative and sum to 1.0 unless no tree made a single split,
    /// in which case they are all 0.0.
    #[must_use]
    pub fn feature_importances(&self) -> &[f32] {
        &self.feature_importances
    }
}

impl Regressor for RandomForest {
    fn n_features(&self) -> usize {
        self.n_features
    }

    #[expect(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
    fn predict_row(&self, row: &[f32]) -> f32 {
        let sum: f64 = self
            .trees
            .iter()
            .map(|tree| f64::from(tree.predict_row(row)))
            .sum();
        (sum / self.trees.len() as f64) as f32
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;

    use super::*;

    /// y = 2 * x0 + noise-free contribution of x1 thresholds, x2 irrelevant.
    fn synthetic(n: usize) -> (Vec<Vec<f32>>, Vec<f32>) {
        let mut rng = Pcg64::seed_from_u64(99);
        let x: Vec<Vec<f32>> = (0..n)
            .map(|_| {
                vec![
                    rng.random_range(0.0..10.0),
                    rng.random_range(0.0..1.0),
                    rng.random_range(0.0..1.0),
                ]
            })
            .collect();
        let y = x
            .iter()
            .map(|row| 2.0 * row[0] + if row[1] > 0.5 { 5.0 } else { 0.0 })
            .collect();
        (x, y)
    }

    fn params(threads: usize) -> RandomForestParams {
        RandomForestParams {
            n_trees: 24,
            max_features: MaxFeatures::Fixed(2),
            min_samples_leaf: 2,
            seed: 42,
            threads: NonZeroUsize::new(threads),
            ..RandomForestParams::default()
        }
    }

    #[test]
    fn test_same_seed_same_forest_regardless_of_threads() {
        let (x, y) = synthetic(200);
        let single = params(1).fit(&x, &y).unwrap();
        let multi = params(5).fit(&x, &y).unwrap();
        let again = params(3).fit(&x, &y).unwrap();
        assert_eq!(single.predict(&x), multi.predict(&x));
        assert_eq!(single.predict(&x), again.predict(&x));
        assert_eq!(single.feature_importances(), multi.feature_importances());
    }

    #[test]
    fn test_different_seed_changes_forest() {
        let (x, y) = synthetic(200);
        let a = params(2).fit(&x, &y).unwrap();
        let b = RandomForestParams {
            seed: 43,
            ..params(2)
        }
        .fit(&x, &y)
        .unwrap();
        assert_ne!(a.predict(&x), b.predict(&x));
    }

    #[test]
    fn test_fits_signal() {
        let (x, y) = synthetic(400);
        let forest = params(4).fit(&x, &y).unwrap();
        let predictions = forest.predict(&x);
        #[expect(clippy::cast_precision_loss)]
        let mae = predictions
            .iter()
            .zip(&y)
            .map(|(p, t)| (p - t).abs())
            .sum::<f32>()
            / y.len() as f32;
        assert!(mae < 1.5, "mean absolute error too large: {mae}");

        let low = forest.predict_row(&[1.0, 0.2, 0.5]);
        let high = forest.predict_row(&[9.0, 0.2, 0.5]);
        assert!(high > low);
    }

    #[test]
    fn test_importances_sum_to_one_and_rank_signal() {
        let (x, y) = synthetic(300);
        let forest = params(2).fit(&x, &y).unwrap();
        let importances = forest.feature_importances();
        assert_eq!(importances.len(), 3);
        let sum: f32 = importances.iter().sum();
        assert!((sum - 1.0).abs() < 1e-4);
        assert!(importances[0] > importances[2]);
        assert!(importances[1] > importances[2]);
    }

    #[test]
    fn test_tree_count_and_shape() {
        let (x, y) = synthetic(50);
        let forest = params(3).fit(&x, &y).unwrap();
        assert_eq!(forest.trees().len(), 24);
        assert_eq!(forest.n_features(), 3);
    }

    #[test]
    fn test_without_bootstrap_all_features_single_tree_is_exact() {
        let x: Vec<Vec<f32>> = (0..8).map(|i| vec![i as f32]).collect();
        let y: Vec<f32> = (0..8).map(|i| (i % 3) as f32).collect();
        let forest = RandomForestParams {
            n_trees: 1,
            max_features: MaxFeatures::All,
            min_samples_leaf: 1,
            bootstrap: false,
            ..RandomForestParams::default()
        }
        .fit(&x, &y)
        .unwrap();
        assert_eq!(forest.predict(&x), y);
    }

    #[test]
    fn test_rejects_invalid_params() {
        let (x, y) = synthetic(10);
        let err = RandomForestParams {
            n_trees: 0,
            ..RandomForestParams::default()
        }
        .fit(&x, &y)
        .unwrap_err();
        assert!(matches!(err, FitError::InvalidParam { name: "n_trees", .. }));

        let err = RandomForestParams {
            min_samples_leaf: 0,
            ..RandomForestParams::default()
        }
        .fit(&x, &y)
        .unwrap_err();
        assert!(matches!(
            err,
            FitError::InvalidParam {
                name: "min_samples_leaf",
                ..
            }
        ));
    }
}
