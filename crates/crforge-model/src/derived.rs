//! Features computed from other stats.
//!
//! A derived feature is filled in by the
//! [`FeatureVectorBuilder`](crate::feature_builder::FeatureVectorBuilder) when the
//! schema asks for it and the caller did not supply it. An explicitly supplied value
//! always wins over the computed one.

use std::fmt;

use crate::{stat_mapping::StatMapping, stat_name};

#[must_use]
pub fn all_derived_features() -> Vec<BoxedDerivedFeature> {
    vec![Box::new(OffensiveThreat)]
}

pub trait DerivedFeature: fmt::Debug + Send + Sync {
    /// Name of the feature this computes.
    #[must_use]
    fn id(&self) -> &str;
    /// Stats read by [`DerivedFeature::compute`].
    #[must_use]
    fn inputs(&self) -> &[&str];
    #[must_use]
    fn clone_boxed(&self) -> BoxedDerivedFeature;
    #[must_use]
    fn compute(&self, stats: &StatMapping) -> f32;
}

pub type BoxedDerivedFeature = Box<dyn DerivedFeature>;

impl Clone for BoxedDerivedFeature {
    fn clone(&self) -> Self {
        self.clone_boxed()
    }
}

/// Damage output per round: `max_damage_per_hit × actions_count`.
///
/// A missing damage value counts as 0; a missing action count as 1 (a monster that
/// hits at all hits at least once).
#[derive(Debug, Default, Clone, Copy)]
pub struct OffensiveThreat;

impl DerivedFeature for OffensiveThreat {
    fn id(&self) -> &str {
        stat_name::OFFENSIVE_THREAT
    }

    fn inputs(&self) -> &[&str] {
        &[stat_name::MAX_DAMAGE_PER_HIT, stat_name::ACTIONS_COUNT]
    }

    fn clone_boxed(&self) -> BoxedDerivedFeature {
        Box::new(*self)
    }

    fn compute(&self, stats: &StatMapping) -> f32 {
        let damage = stats.get_or(stat_name::MAX_DAMAGE_PER_HIT, 0.0);
        let actions = stats.get_or(stat_name::ACTIONS_COUNT, 1.0);
        damage * actions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offensive_threat() {
        let stats: StatMapping = [("max_damage_per_hit", 25.0), ("actions_count", 3.0)]
            .into_iter()
            .collect();
        assert_eq!(OffensiveThreat.compute(&stats), 75.0);
    }

    #[test]
    fn test_offensive_threat_defaults() {
        let damage_only: StatMapping = [("max_damage_per_hit", 25.0)].into_iter().collect();
        assert_eq!(OffensiveThreat.compute(&damage_only), 25.0);

        let actions_only: StatMapping = [("actions_count", 3.0)].into_iter().collect();
        assert_eq!(OffensiveThreat.compute(&actions_only), 0.0);

        let no_actions: StatMapping = [("max_damage_per_hit", 25.0), ("actions_count", 0.0)]
            .into_iter()
            .collect();
        assert_eq!(OffensiveThreat.compute(&no_actions), 0.0);
    }
}
