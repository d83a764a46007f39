//! Querying a trained model.
//!
//! A [`FittedModel`] is immutable once [`train`](crate::training::train) returns it.
//! It can be shared between threads and queried any number of times; a query never
//! changes the model or the caller's stat mapping.

use crforge_forest::{RandomForest, Regressor as _};

use crate::{
    feature_builder::{FeatureVector, FeatureVectorBuilder},
    schema::FeatureSchema,
    stat_mapping::StatMapping,
    training::{TrainingConfig, TrainingSummary},
};

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum PredictError {
    #[display(
        "feature schema mismatch at position {position}: model was trained on {trained:?}, got {given:?}"
    )]
    SchemaMismatch {
        trained: Vec<String>,
        given: Vec<String>,
        position: usize,
    },
}

/// A trained challenge rating estimator bound to the schema it was trained with.
#[derive(Debug, Clone)]
pub struct FittedModel {
    schema: FeatureSchema,
    builder: FeatureVectorBuilder,
    forest: RandomForest,
    config: TrainingConfig,
    summary: TrainingSummary,
}

impl FittedModel {
    pub(crate) fn new(
        schema: FeatureSchema,
        builder: FeatureVectorBuilder,
        forest: RandomForest,
        config: TrainingConfig,
        summary: TrainingSummary,
    ) -> Self {
        Self {
            schema,
            builder,
            forest,
            config,
            summary,
        }
    }

    #[must_use]
    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    #[must_use]
    pub fn builder(&self) -> &FeatureVectorBuilder {
        &self.builder
    }

    /// Name of the column the model was trained to predict.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.summary.label
    }

    #[must_use]
    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    #[must_use]
    pub fn summary(&self) -> &TrainingSummary {
        &self.summary
    }

    /// Mean decrease in impurity per feature, most important first.
    #[must_use]
    pub fn feature_importances(&self) -> Vec<(String, f32)> {
        let mut importances: Vec<(String, f32)> = self
            .schema
            .iter()
            .map(str::to_owned)
            .zip(self.forest.feature_importances().iter().copied())
            .collect();
        importances.sort_by(|a, b| b.1.total_cmp(&a.1));
        importances
    }

    /// The exact vector the model sees for `stats`.
    #[must_use]
    pub fn feature_vector(&self, stats: &StatMapping) -> FeatureVector {
        self.builder.build(&self.schema, stats)
    }

    /// Estimates the challenge rating of `stats` using the training schema.
    #[must_use]
    pub fn predict(&self, stats: &StatMapping) -> f32 {
        self.forest.predict_row(self.feature_vector(stats).as_slice())
    }

    /// Estimates every mapping, in order.
    pub fn predict_many<'a, I>(&self, stats: I) -> Vec<f32>
    where
        I: IntoIterator<Item = &'a StatMapping>,
    {
        stats.into_iter().map(|s| self.predict(s)).collect()
    }

    /// Like [`FittedModel::predict`], after checking that the caller's schema is the
    /// training schema.
    pub fn predict_with(
        &self,
        schema: &FeatureSchema,
        stats: &StatMapping,
    ) -> Result<f32, PredictError> {
        self.check_schema(schema)?;
        Ok(self.predict(stats))
    }

    /// Fails if `schema` differs from the training schema in names or order.
    pub fn check_schema(&self, schema: &FeatureSchema) -> Result<(), PredictError> {
        match self.schema.first_difference(schema) {
            None => Ok(()),
            Some(position) => Err(PredictError::SchemaMismatch {
                trained: self.schema.features().to_vec(),
                given: schema.features().to_vec(),
                position,
            }),
        }
    }
}

/// Estimates the challenge rating of `stats` with `model`.
///
/// `schema` must be the schema `model` was trained with.
pub fn predict(
    model: &FittedModel,
    schema: &FeatureSchema,
    stats: &StatMapping,
) -> Result<f32, PredictError> {
    model.predict_with(schema, stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        stat_name::{ACTIONS_COUNT, HIT_POINTS, MAX_DAMAGE_PER_HIT},
        training::tests::trained_model,
    };

    const fn assert_send_sync<T: Send + Sync>() {}
    const _: () = assert_send_sync::<FittedModel>();

    #[test]
    fn test_predict_is_repeatable_and_pure() {
        let model = trained_model();
        let stats: StatMapping = [(HIT_POINTS, 120.0), (MAX_DAMAGE_PER_HIT, 20.0)]
            .into_iter()
            .collect();
        let copy = stats.clone();
        let first = model.predict(&stats);
        assert!(first.is_finite());
        assert_eq!(model.predict(&stats), first);
        assert_eq!(stats, copy);
    }

    #[test]
    fn test_empty_mapping_predicts_finite_value() {
        let model = trained_model();
        assert!(model.predict(&StatMapping::new()).is_finite());
    }

    #[test]
    fn test_schema_mismatch() {
        let model = trained_model();
        let mut reordered: Vec<String> = model.schema().features().to_vec();
        reordered.swap(0, 1);
        let reordered = FeatureSchema::new(reordered).unwrap();

        let err = predict(&model, &reordered, &StatMapping::new()).unwrap_err();
        let PredictError::SchemaMismatch { position, .. } = err;
        assert_eq!(position, 0);

        let shorter = FeatureSchema::new(model.schema().iter().take(2)).unwrap();
        assert!(model.check_schema(&shorter).is_err());
        assert!(predict(&model, model.schema(), &StatMapping::new()).is_ok());
    }

    #[test]
    fn test_predict_many_matches_predict() {
        let model = trained_model();
        let rows: Vec<StatMapping> = [10.0, 80.0, 250.0]
            .into_iter()
            .map(|hp| [(HIT_POINTS, hp), (ACTIONS_COUNT, 2.0)].into_iter().collect())
            .collect();
        let many = model.predict_many(&rows);
        let single: Vec<f32> = rows.iter().map(|r| model.predict(r)).collect();
        assert_eq!(many, single);
    }

    #[test]
    fn test_feature_importances_sorted() {
        let model = trained_model();
        let importances = model.feature_importances();
        assert_eq!(importances.len(), model.schema().len());
        assert!(importances.windows(2).all(|w| w[0].1 >= w[1].1));
        let total: f32 = importances.iter().map(|(_, v)| v).sum();
        assert!((total - 1.0).abs() < 1e-3);
    }
}
