//! Sparse monster stat records.
//!
//! A [`StatMapping`] holds whatever subset of stats is known for one monster. Absent
//! stats mean "unknown / not applicable" and are read as 0 when a feature vector is
//! built. Every stored value is finite: the only ways to put a value into a mapping
//! validate it, so downstream code never sees `NaN` or infinities.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Error returned when a stat value cannot be used as a model input.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum InvalidInputError {
    #[display("stat '{stat}' must be a number, found {found}")]
    NonNumeric { stat: String, found: &'static str },
    #[display("stat '{stat}' must be finite, found {value}")]
    NonFinite { stat: String, value: f64 },
    #[display("stat '{stat}' has unparsable value '{text}'")]
    Unparsable { stat: String, text: String },
    #[display("expected an object of stats, found {found}")]
    NotAnObject { found: &'static str },
    #[display("field 'name' must be a string, found {found}")]
    InvalidName { found: &'static str },
}

pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// A partial monster stat block: stat name → finite value.
///
/// Keys are kept sorted, so two mappings with the same entries compare equal and
/// iterate identically regardless of insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, f32>", into = "BTreeMap<String, f32>")]
pub struct StatMapping {
    values: BTreeMap<String, f32>,
}

impl StatMapping {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a mapping from `(stat, value)` pairs, rejecting non-finite values.
    ///
    /// Later pairs overwrite earlier ones with the same name.
    pub fn try_from_pairs<I, K>(pairs: I) -> Result<Self, InvalidInputError>
    where
        I: IntoIterator<Item = (K, f32)>,
        K: Into<String>,
    {
        let mut mapping = Self::new();
        for (stat, value) in pairs {
            mapping.insert(stat, value)?;
        }
        Ok(mapping)
    }

    /// Reads a JSON object of stats.
    ///
    /// `null` values are treated as absent. Any other non-number value (including
    /// numeric-looking strings) is rejected.
    pub fn from_json_object(
        object: &serde_json::Map<String, Value>,
    ) -> Result<Self, InvalidInputError> {
        let mut mapping = Self::new();
        for (stat, value) in object {
            match value {
                Value::Null => {}
                Value::Number(number) => {
                    let value = number.as_f64().ok_or_else(|| InvalidInputError::NonNumeric {
                        stat: stat.clone(),
                        found: "number",
                    })?;
                    mapping.insert_f64(stat.clone(), value)?;
                }
                other => {
                    return Err(InvalidInputError::NonNumeric {
                        stat: stat.clone(),
                        found: json_type_name(other),
                    });
                }
            }
        }
        Ok(mapping)
    }

    /// Sets a stat, returning its previous value.
    pub fn insert<K>(&mut self, stat: K, value: f32) -> Result<Option<f32>, InvalidInputError>
    where
        K: Into<String>,
    {
        let stat = stat.into();
        if !value.is_finite() {
            return Err(InvalidInputError::NonFinite {
                stat,
                value: f64::from(value),
            });
        }
        Ok(self.values.insert(stat, value))
    }

    /// Sets a stat from an `f64`, rejecting values outside the `f32` range.
    pub fn insert_f64<K>(&mut self, stat: K, value: f64) -> Result<Option<f32>, InvalidInputError>
    where
        K: Into<String>,
    {
        #[expect(clippy::cast_possible_truncation)]
        let narrowed = value as f32;
        if !narrowed.is_finite() {
            return Err(InvalidInputError::NonFinite {
                stat: stat.into(),
                value,
            });
        }
        self.insert(stat, narrowed)
    }

    /// Builds a mapping from literal stat tables, leaving out non-finite values.
    pub(crate) fn from_literals(pairs: &[(&str, f32)]) -> Self {
        let mut mapping = Self::new();
        for &(stat, value) in pairs {
            debug_assert!(value.is_finite(), "stat '{stat}' must be finite");
            if value.is_finite() {
                mapping.insert_finite(stat, value);
            }
        }
        mapping
    }

    /// Inserts a value the caller has already made finite.
    pub(crate) fn insert_finite(&mut self, stat: &str, value: f32) {
        debug_assert!(value.is_finite());
        self.values.insert(stat.to_owned(), value);
    }

    /// Removes a stat, returning its value if it was present.
    pub fn remove(&mut self, stat: &str) -> Option<f32> {
        self.values.remove(stat)
    }

    #[must_use]
    pub fn get(&self, stat: &str) -> Option<f32> {
        self.values.get(stat).copied()
    }

    /// Returns the stat value, or `default` when absent.
    #[must_use]
    pub fn get_or(&self, stat: &str, default: f32) -> f32 {
        self.get(stat).unwrap_or(default)
    }

    #[must_use]
    pub fn contains(&self, stat: &str) -> bool {
        self.values.contains_key(stat)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates stats in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f32)> + '_ {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl TryFrom<BTreeMap<String, f32>> for StatMapping {
    type Error = InvalidInputError;

    fn try_from(values: BTreeMap<String, f32>) -> Result<Self, Self::Error> {
        if let Some((stat, value)) = values.iter().find(|(_, v)| !v.is_finite()) {
            return Err(InvalidInputError::NonFinite {
                stat: stat.clone(),
                value: f64::from(*value),
            });
        }
        Ok(Self { values })
    }
}

impl From<StatMapping> for BTreeMap<String, f32> {
    fn from(mapping: StatMapping) -> Self {
        mapping.values
    }
}

#[cfg(test)]
impl<K> FromIterator<(K, f32)> for StatMapping
where
    K: Into<String>,
{
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = (K, f32)>,
    {
        let mut mapping = Self::new();
        for (stat, value) in iter {
            let stat = stat.into();
            assert!(value.is_finite(), "stat '{stat}' must be finite");
            mapping.values.insert(stat, value);
        }
        mapping
    }
}
