//! What-if analysis: how much does the estimate move when a monster is weakened?
//!
//! A [`Scenario`] pairs a baseline [`StatMapping`] with named [`Variant`]s, each a
//! list of [`StatEdit`]s applied in order to a fresh copy of the baseline. The
//! [`ScenarioHarness`] estimates the baseline and every variant with one
//! [`FittedModel`] and reports `delta = baseline − variant` per variant.
//!
//! # Verdicts
//!
//! A delta is *significant* when it is strictly greater than
//! [`HarnessConfig::significance_threshold`]. Variants are tagged with the
//! [`Dimension`] they weaken, and the report gives one [`Sensitivity`] verdict per
//! dimension, so an offense-only nerf and a defense-only nerf of the same baseline
//! tell whether the model weighs damage or durability more.
//!
//! # Example
//!
//! ```text
//! Scenario "glass cannon"
//!   baseline                         → 7.1
//!   offense nerf (offense) 5 dmg × 1 → 4.9   delta 2.2  significant
//!   defense nerf (defense) 30 hp     → 6.8   delta 0.3
//! ```
//!
//! Variants that only touch stats the model never reads produce a zero delta; the
//! harness logs a warning for such edits rather than failing.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::{
    prediction::{FittedModel, PredictError},
    schema::FeatureSchema,
    stat_mapping::{InvalidInputError, StatMapping},
};

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum ScenarioError {
    #[display("{_0}")]
    Predict(PredictError),
    #[display("variant '{variant}' has an invalid edit: {source}")]
    InvalidEdit {
        variant: String,
        source: InvalidInputError,
    },
    #[display("variant name '{name}' is used more than once")]
    DuplicateVariant { name: String },
}

impl From<PredictError> for ScenarioError {
    fn from(err: PredictError) -> Self {
        Self::Predict(err)
    }
}

/// The aspect of a monster a variant changes.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    derive_more::Display,
    derive_more::IsVariant,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    #[display("offense")]
    Offense,
    #[display("defense")]
    Defense,
    /// Offense and defense changed together
    #[display("combined")]
    Combined,
    #[default]
    #[display("other")]
    Other,
}

/// One change to a stat mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum StatEdit {
    /// Sets `stat` to `value`, adding it if absent.
    Set { stat: String, value: f32 },
    /// Multiplies `stat` by `factor`; an absent stat stays absent.
    Scale { stat: String, factor: f32 },
    /// Removes `stat`, so the model sees its default.
    Remove { stat: String },
}

impl StatEdit {
    #[must_use]
    pub fn stat(&self) -> &str {
        match self {
            Self::Set { stat, .. } | Self::Scale { stat, .. } | Self::Remove { stat } => stat,
        }
    }

    /// Applies the edit to `stats` in place.
    pub fn apply(&self, stats: &mut StatMapping) -> Result<(), InvalidInputError> {
        match self {
            Self::Set { stat, value } => {
                stats.insert(stat.as_str(), *value)?;
            }
            Self::Scale { stat, factor } => {
                if let Some(value) = stats.get(stat) {
                    stats.insert(stat.as_str(), value * factor)?;
                }
            }
            Self::Remove { stat } => {
                stats.remove(stat);
            }
        }
        Ok(())
    }
}

/// A named, controlled change to the baseline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variant {
    pub name: String,
    #[serde(default)]
    pub dimension: Dimension,
    pub edits: Vec<StatEdit>,
}

impl Variant {
    #[must_use]
    pub fn new(name: impl Into<String>, dimension: Dimension) -> Self {
        Self {
            name: name.into(),
            dimension,
            edits: vec![],
        }
    }

    #[must_use]
    pub fn set(mut self, stat: impl Into<String>, value: f32) -> Self {
        self.edits.push(StatEdit::Set {
            stat: stat.into(),
            value,
        });
        self
    }

    #[must_use]
    pub fn scale(mut self, stat: impl Into<String>, factor: f32) -> Self {
        self.edits.push(StatEdit::Scale {
            stat: stat.into(),
            factor,
        });
        self
    }

    #[must_use]
    pub fn remove(mut self, stat: impl Into<String>) -> Self {
        self.edits.push(StatEdit::Remove { stat: stat.into() });
        self
    }

    /// Returns a copy of `baseline` with every edit applied in order.
    pub fn apply(&self, baseline: &StatMapping) -> Result<StatMapping, InvalidInputError> {
        let mut stats = baseline.clone();
        for edit in &self.edits {
            edit.apply(&mut stats)?;
        }
        Ok(stats)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub baseline: StatMapping,
    #[serde(default)]
    pub variants: Vec<Variant>,
}

impl Scenario {
    #[must_use]
    pub fn new(name: impl Into<String>, baseline: StatMapping) -> Self {
        Self {
            name: name.into(),
            baseline,
            variants: vec![],
        }
    }

    #[must_use]
    pub fn with_variant(mut self, variant: Variant) -> Self {
        self.variants.push(variant);
        self
    }

    /// The 2×2 matrix: offense nerf only, defense nerf only, and both together.
    #[must_use]
    pub fn offense_defense(
        name: impl Into<String>,
        baseline: StatMapping,
        offense: Vec<StatEdit>,
        defense: Vec<StatEdit>,
    ) -> Self {
        let combined = offense.iter().chain(&defense).cloned().collect();
        Self::new(name, baseline)
            .with_variant(Variant {
                name: "offense nerf".to_owned(),
                dimension: Dimension::Offense,
                edits: offense,
            })
            .with_variant(Variant {
                name: "defense nerf".to_owned(),
                dimension: Dimension::Defense,
                edits: defense,
            })
            .with_variant(Variant {
                name: "both nerfed".to_owned(),
                dimension: Dimension::Combined,
                edits: combined,
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HarnessConfig {
    /// Smallest delta, exclusive, that counts as a real change in rating
    pub significance_threshold: f32,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            significance_threshold: 0.4,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariantOutcome {
    pub name: String,
    pub dimension: Dimension,
    pub stats: StatMapping,
    pub estimate: f32,
    /// `baseline_estimate − estimate`; positive when the variant rates lower
    pub delta: f32,
    pub significant: bool,
}

/// Verdict for one dimension: the largest delta among its variants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Sensitivity {
    pub dimension: Dimension,
    pub max_delta: f32,
    pub sensitive: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioReport {
    pub scenario: String,
    pub threshold: f32,
    pub baseline_estimate: f32,
    pub outcomes: Vec<VariantOutcome>,
    pub sensitivities: Vec<Sensitivity>,
}

impl ScenarioReport {
    #[must_use]
    pub fn outcome(&self, variant: &str) -> Option<&VariantOutcome> {
        self.outcomes.iter().find(|o| o.name == variant)
    }

    /// `(estimate, delta)` per variant name.
    #[must_use]
    pub fn deltas(&self) -> BTreeMap<String, (f32, f32)> {
        self.outcomes
            .iter()
            .map(|o| (o.name.clone(), (o.estimate, o.delta)))
            .collect()
    }

    #[must_use]
    pub fn sensitivity(&self, dimension: Dimension) -> Option<&Sensitivity> {
        self.sensitivities.iter().find(|s| s.dimension == dimension)
    }

    /// Offense or defense, whichever single-dimension nerf moved the estimate more.
    ///
    /// `None` if either is missing or both moved it equally.
    #[must_use]
    pub fn dominant_dimension(&self) -> Option<Dimension> {
        let offense = self.sensitivity(Dimension::Offense)?.max_delta;
        let defense = self.sensitivity(Dimension::Defense)?.max_delta;
        match offense.total_cmp(&defense) {
            std::cmp::Ordering::Greater => Some(Dimension::Offense),
            std::cmp::Ordering::Less => Some(Dimension::Defense),
            std::cmp::Ordering::Equal => None,
        }
    }
}

/// Runs scenarios against one model.
#[derive(Debug, Clone)]
pub struct ScenarioHarness<'a> {
    model: &'a FittedModel,
    schema: &'a FeatureSchema,
    config: HarnessConfig,
}

impl<'a> ScenarioHarness<'a> {
    /// A harness that queries `model` with its own training schema.
    #[must_use]
    pub fn new(model: &'a FittedModel, config: HarnessConfig) -> Self {
        Self {
            model,
            schema: model.schema(),
            config,
        }
    }

    /// Queries through `schema` instead, failing every run if it does not match the
    /// model.
    #[must_use]
    pub fn with_schema(mut self, schema: &'a FeatureSchema) -> Self {
        self.schema = schema;
        self
    }

    #[must_use]
    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    pub fn run(&self, scenario: &Scenario) -> Result<ScenarioReport, ScenarioError> {
        self.model.check_schema(self.schema)?;
        let mut seen = HashSet::new();
        if let Some(dup) = scenario
            .variants
            .iter()
            .find(|v| !seen.insert(v.name.as_str()))
        {
            return Err(ScenarioError::DuplicateVariant {
                name: dup.name.clone(),
            });
        }

        tracing::info!(
            scenario = %scenario.name,
            variants = scenario.variants.len(),
            threshold = self.config.significance_threshold,
            "running scenario"
        );
        let threshold = self.config.significance_threshold;
        let baseline_estimate = self.model.predict_with(self.schema, &scenario.baseline)?;

        let mut outcomes = Vec::with_capacity(scenario.variants.len());
        for variant in &scenario.variants {
            self.warn_unused_edits(&scenario.name, variant);
            let stats = variant.apply(&scenario.baseline).map_err(|source| {
                ScenarioError::InvalidEdit {
                    variant: variant.name.clone(),
                    source,
                }
            })?;
            let estimate = self.model.predict_with(self.schema, &stats)?;
            let delta = baseline_estimate - estimate;
            tracing::debug!(variant = %variant.name, estimate, delta, "variant estimated");
            outcomes.push(VariantOutcome {
                name: variant.name.clone(),
                dimension: variant.dimension,
                stats,
                estimate,
                delta,
                significant: delta > threshold,
            });
        }

        let mut by_dimension = BTreeMap::<Dimension, f32>::new();
        for outcome in &outcomes {
            by_dimension
                .entry(outcome.dimension)
                .and_modify(|max| *max = max.max(outcome.delta))
                .or_insert(outcome.delta);
        }
        let sensitivities = by_dimension
            .into_iter()
            .map(|(dimension, max_delta)| Sensitivity {
                dimension,
                max_delta,
                sensitive: max_delta > threshold,
            })
            .collect();

        Ok(ScenarioReport {
            scenario: scenario.name.clone(),
            threshold,
            baseline_estimate,
            outcomes,
            sensitivities,
        })
    }

    /// Runs every scenario, stopping at the first failure.
    pub fn run_all<'s, I>(&self, scenarios: I) -> Result<Vec<ScenarioReport>, ScenarioError>
    where
        I: IntoIterator<Item = &'s Scenario>,
    {
        scenarios.into_iter().map(|s| self.run(s)).collect()
    }

    fn warn_unused_edits(&self, scenario: &str, variant: &Variant) {
        let builder = self.model.builder();
        for edit in &variant.edits {
            if !builder.is_used(self.schema, edit.stat()) {
                tracing::warn!(
                    scenario,
                    variant = %variant.name,
                    stat = edit.stat(),
                    "edit targets a stat the model does not use"
                );
            }
        }
    }
}

/// Runs `scenario` with the default harness configuration and returns
/// `(estimate, delta)` per variant name.
pub fn run_scenario(
    model: &FittedModel,
    schema: &FeatureSchema,
    scenario: &Scenario,
) -> Result<BTreeMap<String, (f32, f32)>, ScenarioError> {
    let report = ScenarioHarness::new(model, HarnessConfig::default())
        .with_schema(schema)
        .run(scenario)?;
    Ok(report.deltas())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        stat_name::{ACTIONS_COUNT, ARMOR_CLASS, HIT_POINTS, MAX_DAMAGE_PER_HIT},
        training::tests::trained_model,
    };

    fn assassin() -> StatMapping {
        [
            (HIT_POINTS, 60.0),
            (ARMOR_CLASS, 15.0),
            (ACTIONS_COUNT, 3.0),
            (MAX_DAMAGE_PER_HIT, 30.0),
        ]
        .into_iter()
        .collect()
    }

    fn glass_cannon() -> Scenario {
        Scenario::offense_defense(
            "glass cannon",
            assassin(),
            vec![
                StatEdit::Set {
                    stat: MAX_DAMAGE_PER_HIT.into(),
                    value: 5.0,
                },
                StatEdit::Set {
                    stat: ACTIONS_COUNT.into(),
                    value: 1.0,
                },
            ],
            vec![StatEdit::Set {
                stat: HIT_POINTS.into(),
                value: 30.0,
            }],
        )
    }

    #[test]
    fn test_edits() {
        let mut stats = assassin();
        StatEdit::Scale {
            stat: HIT_POINTS.into(),
            factor: 0.5,
        }
        .apply(&mut stats)
        .unwrap();
        assert_eq!(stats.get(HIT_POINTS), Some(30.0));

        StatEdit::Scale {
            stat: "legendary_actions_count".into(),
            factor: 2.0,
        }
        .apply(&mut stats)
        .unwrap();
        assert!(!stats.contains("legendary_actions_count"));

        StatEdit::Remove {
            stat: ARMOR_CLASS.into(),
        }
        .apply(&mut stats)
        .unwrap();
        assert!(!stats.contains(ARMOR_CLASS));

        let overflow = StatEdit::Scale {
            stat: HIT_POINTS.into(),
            factor: f32::MAX,
        };
        assert!(overflow.apply(&mut stats).is_err());
    }

    #[test]
    fn test_variant_leaves_baseline_untouched() {
        let baseline = assassin();
        let variant = Variant::new("halved", Dimension::Defense)
            .scale(HIT_POINTS, 0.5)
            .remove(ARMOR_CLASS);
        let stats = variant.apply(&baseline).unwrap();
        assert_eq!(baseline, assassin());
        assert_eq!(stats.get(HIT_POINTS), Some(30.0));
        assert_eq!(stats.get(ARMOR_CLASS), None);
    }

    #[test]
    fn test_report_deltas() {
        let model = trained_model();
        let scenario = glass_cannon();
        let report = ScenarioHarness::new(&model, HarnessConfig::default())
            .run(&scenario)
            .unwrap();

        assert_eq!(scenario.baseline, assassin());
        assert_eq!(report.baseline_estimate, model.predict(&assassin()));
        assert_eq!(report.outcomes.len(), 3);
        for outcome in &report.outcomes {
            assert_eq!(outcome.delta, report.baseline_estimate - outcome.estimate);
            assert_eq!(outcome.significant, outcome.delta > 0.4);
        }
        let offense = report.outcome("offense nerf").unwrap();
        assert_eq!(offense.stats.get(MAX_DAMAGE_PER_HIT), Some(5.0));
        assert_eq!(offense.stats.get(HIT_POINTS), Some(60.0));
        assert!(offense.delta > 0.0);

        let deltas = report.deltas();
        assert_eq!(deltas["defense nerf"].1, report.outcome("defense nerf").unwrap().delta);
        assert_eq!(report.sensitivities.len(), 3);
    }

    #[test]
    fn test_threshold_is_strict() {
        let model = trained_model();
        let scenario = Scenario::new("noop", assassin())
            .with_variant(Variant::new("nothing", Dimension::Other));
        let report = ScenarioHarness::new(
            &model,
            HarnessConfig {
                significance_threshold: 0.0,
            },
        )
        .run(&scenario)
        .unwrap();
        let outcome = report.outcome("nothing").unwrap();
        assert_eq!(outcome.delta, 0.0);
        assert!(!outcome.significant);
        assert!(!report.sensitivity(Dimension::Other).unwrap().sensitive);
        assert_eq!(report.dominant_dimension(), None);
    }

    #[test]
    fn test_dominant_dimension() {
        let sensitivity = |dimension, max_delta| Sensitivity {
            dimension,
            max_delta,
            sensitive: max_delta > 0.4,
        };
        let mut report = ScenarioReport {
            scenario: "s".into(),
            threshold: 0.4,
            baseline_estimate: 5.0,
            outcomes: vec![],
            sensitivities: vec![
                sensitivity(Dimension::Offense, 2.0),
                sensitivity(Dimension::Defense, 0.5),
            ],
        };
        assert_eq!(report.dominant_dimension(), Some(Dimension::Offense));
        report.sensitivities[1].max_delta = 3.0;
        assert_eq!(report.dominant_dimension(), Some(Dimension::Defense));
    }

    #[test]
    fn test_unused_stat_edit_has_no_effect() {
        let model = trained_model();
        let scenario = Scenario::new("stealthy", assassin())
            .with_variant(Variant::new("sneakier", Dimension::Other).set("skills.stealth", 10.0));
        let deltas = run_scenario(&model, model.schema(), &scenario).unwrap();
        assert_eq!(deltas["sneakier"].1, 0.0);
    }

    #[test]
    fn test_errors() {
        let model = trained_model();

        let duplicate = Scenario::new("dup", assassin())
            .with_variant(Variant::new("a", Dimension::Offense))
            .with_variant(Variant::new("a", Dimension::Defense));
        assert_eq!(
            run_scenario(&model, model.schema(), &duplicate).unwrap_err(),
            ScenarioError::DuplicateVariant { name: "a".into() }
        );

        let invalid = Scenario::new("bad", assassin())
            .with_variant(Variant::new("nan", Dimension::Other).set(HIT_POINTS, f32::NAN));
        assert!(matches!(
            run_scenario(&model, model.schema(), &invalid),
            Err(ScenarioError::InvalidEdit { .. })
        ));

        let other_schema = FeatureSchema::new([HIT_POINTS]).unwrap();
        assert!(matches!(
            run_scenario(&model, &other_schema, &glass_cannon()),
            Err(ScenarioError::Predict(PredictError::SchemaMismatch { .. }))
        ));
    }

    #[test]
    fn test_scenario_from_json() {
        let json = r#"{
            "name": "glass cannon",
            "baseline": { "hit_points": 60, "max_damage_per_hit": 30, "actions_count": 3 },
            "variants": [
                { "name": "weak", "dimension": "offense", "edits": [
                    { "op": "set", "stat": "max_damage_per_hit", "value": 5 },
                    { "op": "scale", "stat": "actions_count", "factor": 0.5 }
                ]},
                { "name": "bare", "edits": [ { "op": "remove", "stat": "hit_points" } ] }
            ]
        }"#;
        let scenario: Scenario = serde_json::from_str(json).unwrap();
        assert_eq!(scenario.variants.len(), 2);
        assert_eq!(scenario.variants[0].dimension, Dimension::Offense);
        assert_eq!(scenario.variants[1].dimension, Dimension::Other);
        let weak = scenario.variants[0].apply(&scenario.baseline).unwrap();
        assert_eq!(weak.get(ACTIONS_COUNT), Some(1.5));
    }

    #[test]
    fn test_run_all() {
        let model = trained_model();
        let harness = ScenarioHarness::new(&model, HarnessConfig::default());
        let scenarios = [glass_cannon(), Scenario::new("empty", assassin())];
        let reports = harness.run_all(&scenarios).unwrap();
        assert_eq!(reports.len(), 2);
        assert!(reports[1].outcomes.is_empty());
        assert_eq!(reports[0].baseline_estimate, reports[1].baseline_estimate);
    }
}
