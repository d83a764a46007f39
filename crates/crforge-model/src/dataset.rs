//! In-memory labeled monster tables.
//!
//! A [`Dataset`] is what the ingestion layer hands to training: the table's column
//! names in file order, and one [`Record`] per row. Empty cells are simply absent
//! from the row's [`StatMapping`]; the label lives in the same mapping as the
//! features and is picked out by [`LabelSpec`](crate::label::LabelSpec).

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::stat_mapping::{InvalidInputError, StatMapping, json_type_name};

/// Column holding the monster's display name.
pub const NAME_COLUMN: &str = "name";

/// One monster: an optional name and its known stats.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub stats: StatMapping,
}

impl Record {
    #[must_use]
    pub fn new(name: Option<String>, stats: StatMapping) -> Self {
        Self { name, stats }
    }

    /// Reads a flat JSON object such as `{"name": "Imp", "hit_points": 10}`.
    ///
    /// The `name` field, if present, must be a string or `null`; every other field
    /// is a stat (see [`StatMapping::from_json_object`]).
    pub fn from_json(value: &Value) -> Result<Self, InvalidInputError> {
        let Value::Object(object) = value else {
            return Err(InvalidInputError::NotAnObject {
                found: json_type_name(value),
            });
        };
        let mut object = object.clone();
        let name = match object.remove(NAME_COLUMN) {
            None | Some(Value::Null) => None,
            Some(Value::String(name)) => Some(name),
            Some(other) => {
                return Err(InvalidInputError::InvalidName {
                    found: json_type_name(&other),
                });
            }
        };
        let stats = StatMapping::from_json_object(&object)?;
        Ok(Self { name, stats })
    }

    /// Reads either a single JSON object or an array of objects.
    pub fn list_from_json(value: &Value) -> Result<Vec<Self>, InvalidInputError> {
        match value {
            Value::Array(items) => items.iter().map(Self::from_json).collect(),
            other => Ok(vec![Self::from_json(other)?]),
        }
    }

    /// The record name, or `#<index>` when unnamed.
    #[must_use]
    pub fn display_name(&self, index: usize) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| format!("#{index}"))
    }
}

/// A table of monsters with its column names.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    columns: Vec<String>,
    records: Vec<Record>,
}

impl Dataset {
    #[must_use]
    pub fn new(columns: Vec<String>, records: Vec<Record>) -> Self {
        Self { columns, records }
    }

    /// Column names in table order (including the name and label columns).
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    #[must_use]
    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    #[must_use]
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn push(&mut self, record: Record) {
        self.records.push(record);
    }
}

/// Cell texts read as missing values, as pandas-style CSV readers do.
pub const MISSING_MARKERS: [&str; 19] = [
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Parses one numeric table cell.
///
/// Blank cells, the [`MISSING_MARKERS`] and `NaN` in any case are missing values
/// (`Ok(None)`); anything else must parse as a finite number.
pub fn parse_cell(stat: &str, text: &str) -> Result<Option<f32>, InvalidInputError> {
    let trimmed = text.trim();
    if MISSING_MARKERS.contains(&trimmed) || trimmed.eq_ignore_ascii_case("nan") {
        return Ok(None);
    }
    let value = trimmed
        .parse::<f64>()
        .map_err(|_| InvalidInputError::Unparsable {
            stat: stat.to_owned(),
            text: text.to_owned(),
        })?;
    #[expect(clippy::cast_possible_truncation)]
    let narrowed = value as f32;
    if !narrowed.is_finite() {
        return Err(InvalidInputError::NonFinite {
            stat: stat.to_owned(),
            value,
        });
    }
    Ok(Some(narrowed))
}
