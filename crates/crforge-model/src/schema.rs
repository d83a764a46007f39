//! The ordered list of features a model consumes.
//!
//! Column order, not name matching, decides which number feeds which model input, so
//! a [`FeatureSchema`] is fixed when a model is trained and checked for equality
//! whenever that model is queried.

use std::collections::HashSet;

use serde::Serialize;

use crate::{dataset::NAME_COLUMN, label::LabelSpec};

/// Table columns that never carry features, besides the label columns.
///
/// `Unnamed: 0` is the index column written by pandas-style exporters.
pub const NON_FEATURE_COLUMNS: [&str; 2] = [NAME_COLUMN, "Unnamed: 0"];

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum SchemaError {
    #[display("feature '{feature}' appears more than once in the schema")]
    DuplicateFeature { feature: String },
    #[display("feature name at position {position} is empty")]
    EmptyFeatureName { position: usize },
}

/// An ordered sequence of unique feature names.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct FeatureSchema {
    features: Vec<String>,
}

impl FeatureSchema {
    /// Creates a schema, keeping the given order.
    pub fn new<I, S>(features: I) -> Result<Self, SchemaError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let features: Vec<String> = features.into_iter().map(Into::into).collect();
        let mut seen = HashSet::with_capacity(features.len());
        for (position, feature) in features.iter().enumerate() {
            if feature.is_empty() {
                return Err(SchemaError::EmptyFeatureName { position });
            }
            if !seen.insert(feature.as_str()) {
                return Err(SchemaError::DuplicateFeature {
                    feature: feature.clone(),
                });
            }
        }
        Ok(Self { features })
    }

    /// Derives a schema from table columns: every column except the name column,
    /// the pandas index column, and the rating columns of `label`, in table order.
    pub fn detect<I, S>(columns: I, label: &LabelSpec) -> Result<Self, SchemaError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let excluded: Vec<&str> = NON_FEATURE_COLUMNS
            .into_iter()
            .chain(label.columns())
            .collect();
        Self::new(
            columns
                .into_iter()
                .filter(|column| {
                    let column: &str = column.as_ref();
                    !excluded.contains(&column)
                })
                .map(|column| {
                    let column: &str = column.as_ref();
                    column.to_owned()
                }),
        )
    }

    #[must_use]
    pub fn features(&self) -> &[String] {
        &self.features
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.features.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    #[must_use]
    pub fn contains(&self, feature: &str) -> bool {
        self.position(feature).is_some()
    }

    /// Index of `feature` in model input order.
    #[must_use]
    pub fn position(&self, feature: &str) -> Option<usize> {
        self.features.iter().position(|f| f == feature)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.features.iter().map(String::as_str)
    }

    /// First position at which the two schemas disagree, or `None` if identical.
    #[must_use]
    pub fn first_difference(&self, other: &Self) -> Option<usize> {
        let common = self.len().min(other.len());
        (0..common)
            .find(|&i| self.features[i] != other.features[i])
            .or_else(|| (self.len() != other.len()).then_some(common))
    }
}
