//! Morale multiplier
//!
//! Happy crafters get no bonus. Unhappy ones slow down, more so on recipes
//! that are hard relative to their skills: each skill at exactly the
//! required level doubles the effective morale penalty.

use crate::actor::Crafter;
use crate::core::config::CraftingConfig;
use crate::recipe::Recipe;

/// Multiplier for raw `morale` and the frustration factor of the recipe
pub fn morale_multiplier(morale: i32, frustration: f32, config: &CraftingConfig) -> f32 {
    if morale >= 0 {
        return 1.0;
    }
    let effect = 1.0 + (frustration * morale as f32) / config.morale_halving_point as f32;
    1.0 / effect
}

/// Product of `max(1, 2 * difficulty / skill)` over the primary and required skills
pub fn frustration_factor(crafter: &Crafter, recipe: &Recipe) -> f32 {
    let ratio = |difficulty: i32, level: i32| (2.0 * difficulty as f32 / level.max(1) as f32).max(1.0);

    let mut factor = ratio(
        recipe.difficulty,
        crafter.skills.level_of(recipe.skill_used.as_ref()),
    );
    for (skill, difficulty) in &recipe.required_skills {
        factor *= ratio(*difficulty, crafter.skill_level(skill));
    }
    factor
}

pub fn morale_crafting_speed_multiplier(crafter: &Crafter, recipe: &Recipe, config: &CraftingConfig) -> f32 {
    morale_multiplier(crafter.morale, frustration_factor(crafter, recipe), config)
}

pub fn has_morale_to_craft(crafter: &Crafter, config: &CraftingConfig) -> bool {
    crafter.morale >= config.min_craft_morale
}
