//! Per-split feature subsampling width.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::FitError;

/// How many features a tree may examine when searching for a split.
///
/// The width is resolved against the number of feature columns at fit time, and
/// always lands in `1..=n_features`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaxFeatures {
    /// `floor(log2(n_features))`
    #[default]
    Log2,
    /// `floor(sqrt(n_features))`
    Sqrt,
    /// Every feature (plain bagging, no decorrelation between trees)
    All,
    /// A fixed count, clamped to the number of features
    Fixed(usize),
    /// A fraction of the feature count in `(0.0, 1.0]`
    Fraction(f32),
}

impl MaxFeatures {
    /// Resolves the width for a dataset with `n_features` columns.
    ///
    /// # Examples
    ///
    /// ```
    /// use crforge_forest::MaxFeatures;
    ///
    /// assert_eq!(MaxFeatures::Log2.resolve(20), 4);
    /// assert_eq!(MaxFeatures::Sqrt.resolve(20), 4);
    /// assert_eq!(MaxFeatures::All.resolve(20), 20);
    /// assert_eq!(MaxFeatures::Fixed(50).resolve(20), 20);
    /// assert_eq!(MaxFeatures::Fraction(0.5).resolve(20), 10);
    /// ```
    #[must_use]
    #[expect(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    pub fn resolve(self, n_features: usize) -> usize {
        if n_features == 0 {
            return 0;
        }
        let width = match self {
            Self::Log2 => n_features.ilog2() as usize,
            Self::Sqrt => n_features.isqrt(),
            Self::All => n_features,
            Self::Fixed(count) => count,
            Self::Fraction(fraction) => (fraction * n_features as f32).floor() as usize,
        };
        width.clamp(1, n_features)
    }

    pub(crate) fn validate(self) -> Result<(), FitError> {
        match self {
            Self::Fixed(0) => Err(FitError::InvalidParam {
                name: "max_features",
                reason: "fixed width must be at least 1",
            }),
            Self::Fraction(f) if !(f > 0.0 && f <= 1.0) => Err(FitError::InvalidParam {
                name: "max_features",
                reason: "fraction must be in (0, 1]",
            }),
            _ => Ok(()),
        }
    }
}

impl fmt::Display for MaxFeatures {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Log2 => f.write_str("log2"),
            Self::Sqrt => f.write_str("sqrt"),
            Self::All => f.write_str("all"),
            Self::Fixed(count) => write!(f, "{count}"),
            Self::Fraction(fraction) => write!(f, "{fraction}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid max-features value '{input}' (expected log2, sqrt, all, a count, or a fraction)")]
pub struct ParseMaxFeaturesError {
    input: String,
}

impl FromStr for MaxFeatures {
    type Err = ParseMaxFeaturesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseMaxFeaturesError {
            input: s.to_owned(),
        };
        let value = match s.trim().to_ascii_lowercase().as_str() {
            "log2" => Self::Log2,
            "sqrt" => Self::Sqrt,
            "all" => Self::All,
            other if other.contains('.') => {
                Self::Fraction(other.parse::<f32>().map_err(|_| err())?)
            }
            other => Self::Fixed(other.parse::<usize>().map_err(|_| err())?),
        };
        value.validate().map_err(|_| err())?;
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log2_matches_floor_of_log() {
        assert_eq!(MaxFeatures::Log2.resolve(1), 1);
        assert_eq!(MaxFeatures::Log2.resolve(2), 1);
        assert_eq!(MaxFeatures::Log2.resolve(3), 1);
        assert_eq!(MaxFeatures::Log2.resolve(4), 2);
        assert_eq!(MaxFeatures::Log2.resolve(15), 3);
        assert_eq!(MaxFeatures::Log2.resolve(16), 4);
        assert_eq!(MaxFeatures::Log2.resolve(31), 4);
    }

    #[test]
    fn test_resolve_never_leaves_range() {
        for n in 1..64 {
            for mf in [
                MaxFeatures::Log2,
                MaxFeatures::Sqrt,
                MaxFeatures::All,
                MaxFeatures::Fixed(1),
                MaxFeatures::Fixed(1000),
                MaxFeatures::Fraction(0.01),
                MaxFeatures::Fraction(1.0),
            ] {
                let width = mf.resolve(n);
                assert!((1..=n).contains(&width), "{mf} resolved to {width} for {n}");
            }
        }
        assert_eq!(MaxFeatures::All.resolve(0), 0);
    }

    #[test]
    fn test_parse() {
        assert_eq!("log2".parse(), Ok(MaxFeatures::Log2));
        assert_eq!("SQRT".parse(), Ok(MaxFeatures::Sqrt));
        assert_eq!("all".parse(), Ok(MaxFeatures::All));
        assert_eq!("4".parse(), Ok(MaxFeatures::Fixed(4)));
        assert_eq!("0.5".parse(), Ok(MaxFeatures::Fraction(0.5)));
        assert!("0".parse::<MaxFeatures>().is_err());
        assert!("1.5".parse::<MaxFeatures>().is_err());
        assert!("many".parse::<MaxFeatures>().is_err());
    }

    #[test]
    fn test_serde_format() {
        let json = serde_json::to_string(&MaxFeatures::Log2).unwrap();
        assert_eq!(json, "\"log2\"");
        let json = serde_json::to_string(&MaxFeatures::Fixed(3)).unwrap();
        assert_eq!(json, "{\"fixed\":3}");
        let parsed: MaxFeatures = serde_json::from_str("\"sqrt\"").unwrap();
        assert_eq!(parsed, MaxFeatures::Sqrt);
    }
}
