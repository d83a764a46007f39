//! Challenge rating estimation for D&D 5e monster stat blocks.
//!
//! This crate turns partial monster stat blocks into feature vectors, trains an
//! ensemble regressor on a labeled monster table, and runs what-if scenarios
//! against the trained model.
//!
//! # Architecture
//!
//! ```text
//! Dataset (records + columns)
//!     ↓ FeatureSchema::detect + LabelSpec::resolve
//! train (TrainingConfig)
//!     ↓ FeatureVectorBuilder per row, RandomForest fit
//! FittedModel (schema bound, read-only)
//!     ↓ predict / predict_with
//! ScenarioHarness (baseline vs. variants → deltas, verdicts)
//! ```
//!
//! # Modules
//!
//! - [`stat_mapping`] - Sparse stat name → value records; rejects non-finite values
//! - [`stat_name`] - Well-known stat names
//! - [`dataset`] - Labeled tables and JSON monster records
//! - [`schema`] - Ordered feature lists and their detection from table columns
//! - [`label`] - Label column resolution (`cr`, else `challenge_rating`)
//! - [`derived`] - Features computed from other stats (offensive threat)
//! - [`feature_builder`] - Stat mapping → schema-ordered vector
//! - [`training`] - Training configuration and fitting
//! - [`prediction`] - The fitted model and its query API
//! - [`scenario`] - The delta-analysis harness
//! - [`presets`] - Hand-built monsters for sanity checks
//! - [`descriptive`] - Summary statistics used in training reports
//!
//! # Missing Stats
//!
//! A stat absent from a mapping, or an empty cell in the training table, is read as
//! 0. This is policy, not an error: many monsters simply lack legendary actions or
//! damage immunities. The one exception is the derived offensive threat, where a
//! missing action count is read as 1.
//!
//! # Example
//!
//! ```
//! use crforge_model::{
//!     dataset::{Dataset, Record},
//!     label::LabelSpec,
//!     schema::FeatureSchema,
//!     stat_mapping::StatMapping,
//!     training::{TrainingConfig, train},
//! };
//!
//! let records = (1..=20)
//!     .map(|i| {
//!         let hp = 10.0 * i as f32;
//!         let stats = StatMapping::try_from_pairs([("hit_points", hp), ("cr", hp / 20.0)]).unwrap();
//!         Record::new(None, stats)
//!     })
//!     .collect();
//! let dataset = Dataset::new(vec!["hit_points".into(), "cr".into()], records);
//! let schema = FeatureSchema::detect(dataset.columns(), &LabelSpec::default()).unwrap();
//!
//! let config = TrainingConfig { n_trees: 20, ..TrainingConfig::default() };
//! let model = train(&dataset, &schema, &config).unwrap();
//!
//! let imp = StatMapping::try_from_pairs([("hit_points", 30.0)]).unwrap();
//! let estimate = model.predict(&imp);
//! assert!(estimate < 5.0);
//! ```

pub mod dataset;
pub mod derived;
pub mod descriptive;
pub mod feature_builder;
pub mod label;
pub mod prediction;
pub mod presets;
pub mod scenario;
pub mod schema;
pub mod stat_mapping;
pub mod stat_name;
pub mod training;
