//! Regression target column resolution.

use serde::{Deserialize, Serialize};

use crate::dataset::Dataset;

/// The standard challenge rating column, never a feature whatever the label is.
pub const CHALLENGE_RATING_COLUMN: &str = "challenge_rating";

/// Error raised before training when the dataset cannot be trained on as configured.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ConfigurationError {
    #[display("no label column: neither '{preferred}' nor '{fallback}' is present")]
    MissingLabel { preferred: String, fallback: String },
}

/// Which column holds the challenge rating.
///
/// The preferred column wins when present; otherwise the fallback is used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelSpec {
    pub preferred: String,
    pub fallback: String,
}

impl Default for LabelSpec {
    fn default() -> Self {
        Self {
            preferred: "cr".to_owned(),
            fallback: CHALLENGE_RATING_COLUMN.to_owned(),
        }
    }
}

impl LabelSpec {
    /// Picks the label column of `dataset`.
    pub fn resolve(&self, dataset: &Dataset) -> Result<&str, ConfigurationError> {
        [&self.preferred, &self.fallback]
            .into_iter()
            .find(|column| dataset.has_column(column))
            .map(String::as_str)
            .ok_or_else(|| ConfigurationError::MissingLabel {
                preferred: self.preferred.clone(),
                fallback: self.fallback.clone(),
            })
    }

    /// Columns that hold a rating: both label candidates and
    /// [`CHALLENGE_RATING_COLUMN`]. None may ever be used as a feature.
    #[must_use]
    pub fn columns(&self) -> [&str; 3] {
        [&self.preferred, &self.fallback, CHALLENGE_RATING_COLUMN]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset(columns: &[&str]) -> Dataset {
        Dataset::new(columns.iter().map(|&c| c.to_owned()).collect(), vec![])
    }

    #[test]
    fn test_prefers_cr() {
        let label = LabelSpec::default();
        assert_eq!(
            label.resolve(&dataset(&["name", "challenge_rating", "cr"])),
            Ok("cr")
        );
    }

    #[test]
    fn test_falls_back() {
        let label = LabelSpec::default();
        assert_eq!(
            label.resolve(&dataset(&["name", "challenge_rating"])),
            Ok("challenge_rating")
        );
    }

    #[test]
    fn test_columns_always_include_challenge_rating() {
        let label = LabelSpec {
            preferred: "cr".into(),
            fallback: "cr_alt".into(),
        };
        assert_eq!(label.columns(), ["cr", "cr_alt", "challenge_rating"]);
        assert!(LabelSpec::default().columns().contains(&"challenge_rating"));
    }

    #[test]
    fn test_missing_label_is_configuration_error() {
        let label = LabelSpec {
            preferred: "rating".into(),
            fallback: "difficulty".into(),
        };
        assert_eq!(
            label.resolve(&dataset(&["name", "cr"])),
            Err(ConfigurationError::MissingLabel {
                preferred: "rating".into(),
                fallback: "difficulty".into(),
            })
        );
    }
}
