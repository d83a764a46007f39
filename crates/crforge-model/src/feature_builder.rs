//! Stat mapping → feature vector conversion.
//!
//! [`FeatureVectorBuilder`] turns an arbitrary partial [`StatMapping`] into a
//! complete vector in [`FeatureSchema`] order. The same builder is used for every
//! training row and every prediction, so missing stats are defaulted identically on
//! both paths.
//!
//! # Pipeline
//!
//! 1. **Derive** - For each registered [`DerivedFeature`] that the schema contains and
//!    the mapping lacks, compute it into a working copy of the mapping
//! 2. **Align** - Emit one value per schema feature, in schema order; absent stats
//!    become 0.0
//! 3. **Drop** - Stats not named by the schema are ignored
//!
//! The caller's mapping is never modified; a copy is made only when a derived value
//! has to be inserted.
//!
//! # Example
//!
//! ```
//! use crforge_model::{
//!     feature_builder::FeatureVectorBuilder, schema::FeatureSchema, stat_mapping::StatMapping,
//! };
//!
//! let schema =
//!     FeatureSchema::new(["hit_points", "max_damage_per_hit", "offensive_threat"]).unwrap();
//! let stats =
//!     StatMapping::try_from_pairs([("max_damage_per_hit", 25.0), ("actions_count", 3.0)])
//!         .unwrap();
//!
//! let vector = FeatureVectorBuilder::default().build(&schema, &stats);
//! assert_eq!(vector.as_slice(), [0.0, 25.0, 75.0]);
//! ```

use std::borrow::Cow;

use crate::{
    derived::{BoxedDerivedFeature, DerivedFeature as _, all_derived_features},
    schema::FeatureSchema,
    stat_mapping::StatMapping,
};

/// Schema-ordered model input for one stat mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector(Vec<f32>);

impl FeatureVector {
    #[must_use]
    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Value of a named feature, looked up through the schema the vector was built with.
    #[must_use]
    pub fn get(&self, schema: &FeatureSchema, feature: &str) -> Option<f32> {
        schema.position(feature).and_then(|i| self.0.get(i).copied())
    }
}

impl AsRef<[f32]> for FeatureVector {
    fn as_ref(&self) -> &[f32] {
        &self.0
    }
}

/// Builds [`FeatureVector`]s from partial stat mappings.
#[derive(Debug, Clone)]
pub struct FeatureVectorBuilder {
    derived: Vec<BoxedDerivedFeature>,
}

impl Default for FeatureVectorBuilder {
    /// A builder with every built-in derived feature.
    fn default() -> Self {
        Self::new(all_derived_features())
    }
}

impl FeatureVectorBuilder {
    #[must_use]
    pub fn new(derived: Vec<BoxedDerivedFeature>) -> Self {
        Self { derived }
    }

    /// Whether `stat` influences the vector for `schema`, directly or through a
    /// derived feature.
    #[must_use]
    pub fn is_used(&self, schema: &FeatureSchema, stat: &str) -> bool {
        schema.contains(stat)
            || self
                .derived
                .iter()
                .any(|d| schema.contains(d.id()) && d.inputs().contains(&stat))
    }

    /// Builds the feature vector of `stats` for `schema`.
    #[must_use]
    pub fn build(&self, schema: &FeatureSchema, stats: &StatMapping) -> FeatureVector {
        let stats = self.with_derived(schema, stats);
        FeatureVector(
            schema
                .iter()
                .map(|feature| stats.get_or(feature, 0.0))
                .collect(),
        )
    }

    /// Builds one vector per mapping, in iteration order.
    pub fn build_matrix<'a, I>(&self, schema: &FeatureSchema, rows: I) -> Vec<FeatureVector>
    where
        I: IntoIterator<Item = &'a StatMapping>,
    {
        rows.into_iter().map(|row| self.build(schema, row)).collect()
    }

    fn with_derived<'a>(
        &self,
        schema: &FeatureSchema,
        stats: &'a StatMapping,
    ) -> Cow<'a, StatMapping> {
        let mut working = Cow::Borrowed(stats);
        for derived in &self.derived {
            let id = derived.id();
            if !schema.contains(id) || stats.contains(id) {
                continue;
            }
            let value = saturate(derived.compute(&working));
            working.to_mut().insert_finite(id, value);
        }
        working
    }
}

/// Clamps into the finite `f32` range; `NaN` becomes 0.0.
fn saturate(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(f32::MIN, f32::MAX)
    }
}
