//! Training configuration and model fitting.
//!
//! [`train`] binds a [`FeatureSchema`] to a [`Dataset`] and fits the ensemble
//! regressor configured by a [`TrainingConfig`].
//!
//! # Knobs
//!
//! - **`n_trees`** - ensemble size. More trees reduce variance; training cost grows
//!   roughly linearly.
//! - **`max_features`** - features each split may examine. The default
//!   [`MaxFeatures::Log2`] deliberately starves every tree of candidates so that raw
//!   hit points, which dominate an unrestricted search, cannot be picked by every
//!   tree; weaker signals such as offensive threat then get split on too.
//! - **`min_samples_leaf`** - rows required in each leaf. Small values keep the model
//!   sensitive to outlier monsters, large values smooth them out.
//! - **`seed`** - fixes the result; the same seed gives the same model for any
//!   thread count.
//!
//! # Defaulting Symmetry
//!
//! Training rows go through the same
//! [`FeatureVectorBuilder`] as prediction inputs, so a missing cell in the dataset
//! and a missing key in a what-if mapping mean exactly the same thing to the model.

use std::num::NonZeroUsize;

use crforge_forest::{FitError, MaxFeatures, RandomForestParams, Regressor as _};
use serde::{Deserialize, Serialize};

use crate::{
    dataset::Dataset,
    descriptive::{DescriptiveStats, FitQuality},
    feature_builder::FeatureVectorBuilder,
    label::{ConfigurationError, LabelSpec},
    prediction::FittedModel,
    schema::FeatureSchema,
};

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum TrainError {
    #[display("invalid training configuration: {_0}")]
    Configuration(ConfigurationError),
    #[display("dataset contains no rows")]
    EmptyDataset,
    #[display("feature schema is empty")]
    EmptySchema,
    #[display("label column '{label}' is also listed as a feature")]
    LabelInSchema { label: String },
    #[display("row {row} has no value for label column '{label}'")]
    MissingLabel { row: usize, label: String },
    #[display("failed to fit model: {_0}")]
    Fit(FitError),
}

impl From<ConfigurationError> for TrainError {
    fn from(err: ConfigurationError) -> Self {
        Self::Configuration(err)
    }
}

/// Training configuration.
///
/// The defaults reproduce the reference setup: 500 trees, `log2` feature
/// subsampling, at least two rows per leaf, seed 42.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrainingConfig {
    pub n_trees: usize,
    pub max_features: MaxFeatures,
    pub min_samples_leaf: usize,
    pub max_depth: Option<usize>,
    pub seed: u64,
    /// Worker threads for fitting (`None` = available parallelism)
    pub threads: Option<NonZeroUsize>,
    pub label: LabelSpec,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            n_trees: 500,
            max_features: MaxFeatures::Log2,
            min_samples_leaf: 2,
            max_depth: None,
            seed: 42,
            threads: None,
            label: LabelSpec::default(),
        }
    }
}

impl TrainingConfig {
    #[must_use]
    pub fn forest_params(&self) -> RandomForestParams {
        RandomForestParams {
            n_trees: self.n_trees,
            max_features: self.max_features,
            min_samples_leaf: self.min_samples_leaf,
            max_depth: self.max_depth,
            bootstrap: true,
            seed: self.seed,
            threads: self.threads,
        }
    }
}

/// Facts about a finished training run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrainingSummary {
    pub rows: usize,
    pub label: String,
    pub label_stats: DescriptiveStats,
    /// Features examined per split after resolving `max_features`
    pub split_width: usize,
    /// Fit on the training rows themselves (optimistic)
    pub in_sample: FitQuality,
}

/// Fits a model on `dataset` using the features of `schema`.
///
/// # Errors
///
/// - [`TrainError::Configuration`] if neither label column exists
/// - [`TrainError::EmptyDataset`], [`TrainError::EmptySchema`],
///   [`TrainError::LabelInSchema`], [`TrainError::MissingLabel`] for unusable input
/// - [`TrainError::Fit`] if the regressor rejects the data or parameters
pub fn train(
    dataset: &Dataset,
    schema: &FeatureSchema,
    config: &TrainingConfig,
) -> Result<FittedModel, TrainError> {
    let label = config.label.resolve(dataset)?.to_owned();
    if schema.is_empty() {
        return Err(TrainError::EmptySchema);
    }
    if let Some(&label) = config
        .label
        .columns()
        .iter()
        .find(|&&column| schema.contains(column))
    {
        return Err(TrainError::LabelInSchema {
            label: label.to_owned(),
        });
    }
    if dataset.is_empty() {
        return Err(TrainError::EmptyDataset);
    }

    let targets = dataset
        .records()
        .iter()
        .enumerate()
        .map(|(row, record)| {
            record
                .stats
                .get(&label)
                .ok_or_else(|| TrainError::MissingLabel {
                    row,
                    label: label.clone(),
                })
        })
        .collect::<Result<Vec<f32>, _>>()?;

    let builder = FeatureVectorBuilder::default();
    let matrix = builder.build_matrix(schema, dataset.records().iter().map(|r| &r.stats));

    tracing::info!(
        rows = dataset.len(),
        features = schema.len(),
        label = %label,
        n_trees = config.n_trees,
        max_features = %config.max_features,
        min_samples_leaf = config.min_samples_leaf,
        seed = config.seed,
        "training challenge rating model"
    );

    let forest = config
        .forest_params()
        .fit(&matrix, &targets)
        .map_err(TrainError::Fit)?;

    let in_sample = FitQuality::new(&forest.predict(matrix.as_slice()), &targets);
    let summary = TrainingSummary {
        rows: targets.len(),
        label: label.clone(),
        label_stats: DescriptiveStats::new(targets.iter().copied())
            .ok_or(TrainError::EmptyDataset)?,
        split_width: config.max_features.resolve(schema.len()),
        in_sample,
    };
    tracing::info!(
        mae = summary.in_sample.mean_absolute_error,
        r_squared = summary.in_sample.r_squared,
        "training completed"
    );

    Ok(FittedModel::new(
        schema.clone(),
        builder,
        forest,
        config.clone(),
        summary,
    ))
}
