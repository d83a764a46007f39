use std::{num::NonZeroUsize, path::PathBuf};

use anyhow::Context;
use crforge_forest::MaxFeatures;
use crforge_model::{
    prediction::FittedModel,
    schema::FeatureSchema,
    training::{self, TrainingConfig},
};

use crate::{data, util};

/// Dataset and training options shared by every command that needs a model
#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct ModelArg {
    /// Monster table (CSV with a header row)
    #[arg(long)]
    data: PathBuf,
    /// Training configuration file (JSON); flags below override it
    #[arg(long)]
    config: Option<PathBuf>,
    /// Number of trees
    #[arg(long)]
    n_trees: Option<usize>,
    /// Features examined per split: log2, sqrt, all, a count, or a fraction
    #[arg(long)]
    max_features: Option<MaxFeatures>,
    /// Minimum rows per leaf
    #[arg(long)]
    min_samples_leaf: Option<usize>,
    /// Random seed
    #[arg(long)]
    seed: Option<u64>,
    /// Worker threads (default: available parallelism)
    #[arg(long)]
    threads: Option<NonZeroUsize>,
}

impl ModelArg {
    pub(crate) fn apply_overrides(&self, mut config: TrainingConfig) -> TrainingConfig {
        if let Some(n_trees) = self.n_trees {
            config.n_trees = n_trees;
        }
        if let Some(max_features) = self.max_features {
            config.max_features = max_features;
        }
        if let Some(min_samples_leaf) = self.min_samples_leaf {
            config.min_samples_leaf = min_samples_leaf;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if self.threads.is_some() {
            config.threads = self.threads;
        }
        config
    }

    fn training_config(&self) -> anyhow::Result<TrainingConfig> {
        let config = match &self.config {
            Some(path) => util::read_json_file("training config", path)?,
            None => TrainingConfig::default(),
        };
        Ok(self.apply_overrides(config))
    }

    pub(crate) fn train(&self) -> anyhow::Result<FittedModel> {
        let config = self.training_config()?;

        eprintln!("Loading dataset from {}...", self.data.display());
        let dataset = data::read_dataset_file(&self.data)?;
        eprintln!(
            "Loaded {} monsters with {} columns",
            dataset.len(),
            dataset.columns().len()
        );

        let schema = FeatureSchema::detect(dataset.columns(), &config.label)
            .context("Failed to detect feature schema")?;
        eprintln!("Features ({}): {:?}", schema.len(), schema.features());

        eprintln!(
            "Training model ({} trees, max features {})...",
            config.n_trees, config.max_features
        );
        let model = training::train(&dataset, &schema, &config).with_context(|| {
            format!("Failed to train model on {}", self.data.display())
        })?;
        Ok(model)
    }
}
