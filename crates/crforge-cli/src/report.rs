use chrono::{DateTime, Utc};
use crforge_model::{
    dataset::Record,
    prediction::FittedModel,
    training::{TrainingConfig, TrainingSummary},
};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct TrainingReport {
    pub trained_at: DateTime<Utc>,
    pub features: Vec<String>,
    pub config: TrainingConfig,
    pub summary: TrainingSummary,
    pub importances: Vec<FeatureImportance>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FeatureImportance {
    pub feature: String,
    pub importance: f32,
}

impl TrainingReport {
    pub fn new(model: &FittedModel) -> Self {
        Self {
            trained_at: Utc::now(),
            features: model.schema().features().to_vec(),
            config: model.config().clone(),
            summary: model.summary().clone(),
            importances: model
                .feature_importances()
                .into_iter()
                .map(|(feature, importance)| FeatureImportance {
                    feature,
                    importance,
                })
                .collect(),
        }
    }

    pub fn print(&self) {
        let summary = &self.summary;
        let stats = &summary.label_stats;
        eprintln!("Training completed");
        eprintln!("  Rows:     {}", summary.rows);
        eprintln!("  Label:    {}", summary.label);
        eprintln!(
            "    Min: {:.2}  Max: {:.2}  Mean: {:.2}  Median: {:.2}  StdDev: {:.2}",
            stats.min, stats.max, stats.mean, stats.median, stats.std_dev
        );
        eprintln!(
            "  Features: {} ({} per split)",
            self.features.len(),
            summary.split_width
        );
        eprintln!(
            "  Trees:    {} (min {} rows per leaf, seed {})",
            self.config.n_trees, self.config.min_samples_leaf, self.config.seed
        );
        eprintln!("  In-sample fit:");
        eprintln!("    MAE: {:.3}", summary.in_sample.mean_absolute_error);
        eprintln!("    R²:  {:.3}", summary.in_sample.r_squared);
        eprintln!("  Feature importances:");
        for FeatureImportance {
            feature,
            importance,
        } in &self.importances
        {
            eprintln!("    {feature:<30} {importance:.4}");
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MonsterEstimate {
    pub name: String,
    pub estimate: f32,
}

impl MonsterEstimate {
    pub fn from_records(model: &FittedModel, records: &[Record]) -> Vec<Self> {
        let estimates = model.predict_many(records.iter().map(|record| &record.stats));
        records
            .iter()
            .zip(estimates)
            .enumerate()
            .map(|(i, (record, estimate))| Self {
                name: record.display_name(i),
                estimate,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use crforge_model::{
        dataset::Dataset, label::LabelSpec, schema::FeatureSchema, stat_mapping::StatMapping,
        training::train,
    };

    use super::*;

    fn stats(hit_points: f32) -> StatMapping {
        StatMapping::try_from_pairs([("hit_points", hit_points)]).unwrap()
    }

    fn small_model() -> FittedModel {
        let records = (1..=20_u8)
            .map(|i| {
                let hit_points = 10.0 * f32::from(i);
                let mut stats = stats(hit_points);
                stats.insert("cr", hit_points / 20.0).unwrap();
                Record::new(None, stats)
            })
            .collect();
        let dataset = Dataset::new(vec!["hit_points".into(), "cr".into()], records);
        let schema = FeatureSchema::detect(dataset.columns(), &LabelSpec::default()).unwrap();
        let config = TrainingConfig {
            n_trees: 10,
            ..TrainingConfig::default()
        };
        train(&dataset, &schema, &config).unwrap()
    }

    #[test]
    fn test_monster_estimates_follow_record_order() {
        let model = small_model();
        let records = [
            Record::new(Some("Imp".into()), stats(20.0)),
            Record::new(None, stats(180.0)),
        ];
        let estimates = MonsterEstimate::from_records(&model, &records);
        assert_eq!(estimates.len(), 2);
        assert_eq!(estimates[0].name, "Imp");
        assert_eq!(estimates[1].name, "#1");
        assert_eq!(estimates[0].estimate, model.predict(&records[0].stats));
        assert_eq!(estimates[1].estimate, model.predict(&records[1].stats));
        assert!(estimates[0].estimate < estimates[1].estimate);
    }
}
