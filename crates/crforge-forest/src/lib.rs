//! Ensemble regression engine for challenge-rating estimation.
//!
//! This crate provides the numeric black box the rest of the workspace trains and
//! queries: a random forest of CART regression trees. Callers only rely on the
//! [`Regressor`] contract (`predict` over rows of `f32` features); everything about
//! how trees are grown stays inside this crate.
//!
//! # How Training Works
//!
//! 1. **Bootstrap** - Each tree draws a sample of the training rows with replacement
//! 2. **Grow** - The tree splits nodes greedily on squared-error reduction, looking at
//!    only a random subset of features at every split ([`MaxFeatures`])
//! 3. **Stop** - A node becomes a leaf when it cannot be split without leaving fewer
//!    than `min_samples_leaf` rows on either side, or when its targets are constant
//! 4. **Aggregate** - The forest prediction is the mean of all tree predictions
//!
//! # Architecture
//!
//! ```text
//! RandomForestParams
//!     ↓ fit (one seeded RNG stream per tree, trees grown on scoped threads)
//! RandomForest
//!     ├─ RegressionTree × n_trees
//!     └─ feature importances (mean decrease in impurity)
//!     ↓ predict
//! Vec<f32>
//! ```
//!
//! # Feature Subsampling
//!
//! Restricting the number of features examined per split is what makes the trees of
//! a forest disagree with each other. With a dataset dominated by one strong feature
//! (for monsters: raw hit points), unrestricted trees all pick that feature at the
//! root; [`MaxFeatures::Log2`] hides it from most split searches so weaker features
//! (damage output) get a chance to carry signal.
//!
//! # Determinism
//!
//! Every tree gets its own `Pcg64` stream whose seed is drawn, in tree order, from a
//! master stream seeded with [`RandomForestParams::seed`]. The fitted forest is
//! therefore identical for any worker thread count.
//!
//! # Example
//!
//! ```
//! use crforge_forest::{MaxFeatures, RandomForestParams, Regressor as _};
//!
//! let x = vec![vec![1.0, 0.0], vec![2.0, 0.0], vec![3.0, 1.0], vec![4.0, 1.0]];
//! let y = vec![1.0, 2.0, 3.0, 4.0];
//!
//! let params = RandomForestParams {
//!     n_trees: 10,
//!     max_features: MaxFeatures::All,
//!     min_samples_leaf: 1,
//!     ..RandomForestParams::default()
//! };
//! let forest = params.fit(&x, &y).unwrap();
//! let predictions = forest.predict(&x);
//! assert_eq!(predictions.len(), 4);
//! ```

pub use self::{
    forest::{RandomForest, RandomForestParams},
    max_features::{MaxFeatures, ParseMaxFeaturesError},
    tree::{RegressionTree, TreeParams},
};

pub mod forest;
pub mod max_features;
pub mod tree;

/// Error returned when training data or parameters cannot be used for fitting.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum FitError {
    #[display("training data contains no rows")]
    NoRows,
    #[display("training data contains no feature columns")]
    NoFeatures,
    #[display("row {row} has {found} features, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[display("{rows} feature rows but {targets} target values")]
    LengthMismatch { rows: usize, targets: usize },
    #[display("feature {column} of row {row} is not finite")]
    NonFiniteFeature { row: usize, column: usize },
    #[display("target value of row {row} is not finite")]
    NonFiniteTarget { row: usize },
    #[display("invalid parameter `{name}`: {reason}")]
    InvalidParam {
        name: &'static str,
        reason: &'static str,
    },
}

/// A fitted regression model.
///
/// The contract is purely numeric: one `f32` estimate per row of features, rows
/// having exactly [`Regressor::n_features`] columns in the order used for fitting.
pub trait Regressor: std::fmt::Debug + Send + Sync {
    /// Number of feature columns the model was fitted on.
    #[must_use]
    fn n_features(&self) -> usize;

    /// Predicts a single row.
    ///
    /// # Panics
    ///
    /// Panics if `row.len()` differs from [`Regressor::n_features`].
    #[must_use]
    fn predict_row(&self, row: &[f32]) -> f32;

    /// Predicts every row of a matrix.
    #[must_use]
    fn predict<R>(&self, rows: &[R]) -> Vec<f32>
    where
        R: AsRef<[f32]>,
        Self: Sized,
    {
        rows.iter().map(|row| self.predict_row(row.as_ref())).collect()
    }
}

/// Checks the shape and contents of a training set.
///
/// Returns the number of feature columns on success.
pub(crate) fn validate_training_data<R>(x: &[R], y: &[f32]) -> Result<usize, FitError>
where
    R: AsRef<[f32]>,
{
    let Some(first) = x.first() else {
        return Err(FitError::NoRows);
    };
    if x.len() != y.len() {
        return Err(FitError::LengthMismatch {
            rows: x.len(),
            targets: y.len(),
        });
    }
    let n_features = first.as_ref().len();
    if n_features == 0 {
        return Err(FitError::NoFeatures);
    }
    for (row, (features, target)) in x.iter().zip(y).enumerate() {
        let features = features.as_ref();
        if features.len() != n_features {
            return Err(FitError::RaggedRow {
                row,
                expected: n_features,
                found: features.len(),
            });
        }
        if let Some(column) = features.iter().position(|v| !v.is_finite()) {
            return Err(FitError::NonFiniteFeature { row, column });
        }
        if !target.is_finite() {
            return Err(FitError::NonFiniteTarget { row });
        }
    }
    Ok(n_features)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_accepts_rectangular_data() {
        let x = vec![vec![1.0, 2.0], vec![3.0, 4.0]];
        let y = vec![0.5, 1.0];
        assert_eq!(validate_training_data(&x, &y), Ok(2));
    }

    #[test]
    fn test_validate_rejects_empty() {
        let x: Vec<Vec<f32>> = vec![];
        assert_eq!(validate_training_data(&x, &[]), Err(FitError::NoRows));
        let x = vec![Vec::<f32>::new()];
        assert_eq!(validate_training_data(&x, &[1.0]), Err(FitError::NoFeatures));
    }

    #[test]
    fn test_validate_rejects_bad_shapes() {
        let x = vec![vec![1.0, 2.0], vec![3.0]];
        assert_eq!(
            validate_training_data(&x, &[0.0, 1.0]),
            Err(FitError::RaggedRow {
                row: 1,
                expected: 2,
                found: 1
            })
        );
        let x = vec![vec![1.0], vec![3.0]];
        assert_eq!(
            validate_training_data(&x, &[0.0]),
            Err(FitError::LengthMismatch {
                rows: 2,
                targets: 1
            })
        );
    }

    #[test]
    fn test_validate_rejects_non_finite() {
        let x = vec![vec![1.0, f32::NAN]];
        assert_eq!(
            validate_training_data(&x, &[0.0]),
            Err(FitError::NonFiniteFeature { row: 0, column: 1 })
        );
        let x = vec![vec![1.0]];
        assert_eq!(
            validate_training_data(&x, &[f32::INFINITY]),
            Err(FitError::NonFiniteTarget { row: 0 })
        );
    }
}
