//! Hand-built monsters for checking a trained model.
//!
//! These are not drawn from any dataset. Their expected ratings are what a game
//! designer would assign, so a model that rates them far off is suspect.

use crate::{
    dataset::Record,
    scenario::{Scenario, StatEdit},
    stat_mapping::StatMapping,
    stat_name::{
        ACTIONS_COUNT, ARMOR_CLASS, CHARISMA, CHARISMA_SAVE, CONDITION_IMMUNITIES_COUNT,
        CONSTITUTION, CONSTITUTION_SAVE, DAMAGE_IMMUNITIES_COUNT, DAMAGE_RESISTANCES_COUNT,
        DEXTERITY, DEXTERITY_SAVE, HIT_DICE_COUNT, HIT_POINTS, INTELLIGENCE_SAVE,
        LEGENDARY_ACTIONS_COUNT, MAX_DAMAGE_PER_HIT, PASSIVE_PERCEPTION, SKILL_ARCANA,
        SKILL_STEALTH, SPECIAL_ABILITIES_COUNT, STRENGTH, WISDOM_SAVE,
    },
};

fn record(name: &str, stats: &[(&str, f32)]) -> Record {
    Record::new(Some(name.to_owned()), StatMapping::from_literals(stats))
}

/// A legendary fire boss dealing 75 damage per round.
#[must_use]
pub fn lord_of_cinder() -> Record {
    record(
        "Lord of Cinder",
        &[
            (HIT_POINTS, 200.0),
            (ARMOR_CLASS, 19.0),
            (CONSTITUTION, 22.0),
            (HIT_DICE_COUNT, 20.0),
            (STRENGTH, 24.0),
            (DEXTERITY, 14.0),
            (CHARISMA, 20.0),
            (WISDOM_SAVE, 9.0),
            (CONSTITUTION_SAVE, 12.0),
            (DAMAGE_IMMUNITIES_COUNT, 2.0),
            (CONDITION_IMMUNITIES_COUNT, 4.0),
            (ACTIONS_COUNT, 3.0),
            (LEGENDARY_ACTIONS_COUNT, 3.0),
            (MAX_DAMAGE_PER_HIT, 25.0),
        ],
    )
}

/// A fragile assassin dealing 90 damage per round.
#[must_use]
pub fn assassin() -> StatMapping {
    StatMapping::from_literals(&[
        (HIT_POINTS, 60.0),
        (ARMOR_CLASS, 15.0),
        (DEXTERITY, 20.0),
        (ACTIONS_COUNT, 3.0),
        (MAX_DAMAGE_PER_HIT, 30.0),
        (HIT_DICE_COUNT, 8.0),
        (CONSTITUTION_SAVE, 4.0),
    ])
}

/// Does the model care about damage as much as durability?
///
/// Offense nerf: one 5-damage hit per round. Defense nerf: half the hit points.
#[must_use]
pub fn glass_cannon() -> Scenario {
    let set = |stat: &str, value| StatEdit::Set {
        stat: stat.to_owned(),
        value,
    };
    Scenario::offense_defense(
        "Glass Cannon",
        assassin(),
        vec![set(MAX_DAMAGE_PER_HIT, 5.0), set(ACTIONS_COUNT, 1.0)],
        vec![set(HIT_POINTS, 30.0)],
    )
}

/// Four archetypes, the two liches differing only in how complete the stat block is.
#[must_use]
pub fn balanced_roster() -> Vec<Record> {
    vec![
        record(
            "Ironbound Sentinel (Tank)",
            &[
                (HIT_POINTS, 85.0),
                (ARMOR_CLASS, 18.0),
                (CONSTITUTION, 18.0),
                (ACTIONS_COUNT, 2.0),
                (MAX_DAMAGE_PER_HIT, 15.0),
                (DAMAGE_RESISTANCES_COUNT, 1.0),
                (HIT_DICE_COUNT, 10.0),
            ],
        ),
        record(
            "Stormborn Goliath (Bruiser)",
            &[
                (HIT_POINTS, 180.0),
                (ARMOR_CLASS, 15.0),
                (CONSTITUTION, 22.0),
                (ACTIONS_COUNT, 3.0),
                (MAX_DAMAGE_PER_HIT, 28.0),
                (DAMAGE_IMMUNITIES_COUNT, 1.0),
                (HIT_DICE_COUNT, 18.0),
            ],
        ),
        record(
            "Void Lich (incomplete)",
            &[
                (HIT_POINTS, 210.0),
                (ARMOR_CLASS, 19.0),
                (CONSTITUTION, 20.0),
                (ACTIONS_COUNT, 3.0),
                (MAX_DAMAGE_PER_HIT, 45.0),
                (LEGENDARY_ACTIONS_COUNT, 3.0),
                (DAMAGE_IMMUNITIES_COUNT, 3.0),
                (CONDITION_IMMUNITIES_COUNT, 5.0),
            ],
        ),
        record(
            "Void Lich (Full Power)",
            &[
                (HIT_POINTS, 210.0),
                (ARMOR_CLASS, 19.0),
                (CONSTITUTION, 20.0),
                (HIT_DICE_COUNT, 22.0),
                (DAMAGE_RESISTANCES_COUNT, 2.0),
                (DAMAGE_IMMUNITIES_COUNT, 3.0),
                (CONDITION_IMMUNITIES_COUNT, 5.0),
                (CHARISMA, 20.0),
                (INTELLIGENCE_SAVE, 13.0),
                (WISDOM_SAVE, 10.0),
                (CONSTITUTION_SAVE, 11.0),
                (CHARISMA_SAVE, 11.0),
                (DEXTERITY_SAVE, 5.0),
                (PASSIVE_PERCEPTION, 22.0),
                (SKILL_ARCANA, 18.0),
                (SKILL_STEALTH, 0.0),
                (ACTIONS_COUNT, 3.0),
                (MAX_DAMAGE_PER_HIT, 45.0),
                (LEGENDARY_ACTIONS_COUNT, 3.0),
                (SPECIAL_ABILITIES_COUNT, 5.0),
            ],
        ),
    ]
}
