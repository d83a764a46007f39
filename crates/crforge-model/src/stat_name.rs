//! Names of well-known monster stats.
//!
//! Datasets may carry any columns; these are the ones the derived features and the
//! demo presets refer to by name.

// defense
pub const HIT_POINTS: &str = "hit_points";
pub const ARMOR_CLASS: &str = "armor_class";
pub const HIT_DICE_COUNT: &str = "hit_dice_count";
pub const DAMAGE_RESISTANCES_COUNT: &str = "damage_resistances_count";
pub const DAMAGE_IMMUNITIES_COUNT: &str = "damage_immunities_count";
pub const CONDITION_IMMUNITIES_COUNT: &str = "condition_immunities_count";

// ability scores
pub const STRENGTH: &str = "strength";
pub const DEXTERITY: &str = "dexterity";
pub const CONSTITUTION: &str = "constitution";
pub const CHARISMA: &str = "charisma";

// saving throws
pub const DEXTERITY_SAVE: &str = "dexterity_save";
pub const CONSTITUTION_SAVE: &str = "constitution_save";
pub const INTELLIGENCE_SAVE: &str = "intelligence_save";
pub const WISDOM_SAVE: &str = "wisdom_save";
pub const CHARISMA_SAVE: &str = "charisma_save";

// senses and skills
pub const PASSIVE_PERCEPTION: &str = "passive_perception";
pub const SKILL_ARCANA: &str = "skills.arcana";
pub const SKILL_STEALTH: &str = "skills.stealth";

// offense
pub const ACTIONS_COUNT: &str = "actions_count";
pub const LEGENDARY_ACTIONS_COUNT: &str = "legendary_actions_count";
pub const SPECIAL_ABILITIES_COUNT: &str = "special_abilities_count";
pub const MAX_DAMAGE_PER_HIT: &str = "max_damage_per_hit";

/// Derived: `max_damage_per_hit × actions_count`
pub const OFFENSIVE_THREAT: &str = "offensive_threat";
