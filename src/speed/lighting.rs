//! Lighting multiplier
//!
//! Full speed while fine details are visible. In poor light only recipes
//! marked as tolerant can proceed, and skill above the requirement buys
//! back the lost speed.

use crate::actor::Crafter;
use crate::core::config::CraftingConfig;
use crate::recipe::{Recipe, RecipeFlag};

/// How much darkness a recipe tolerates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VisionTolerance {
    /// Needs fine-detail vision
    Full,
    /// Workable in the dark; two levels over the requirement remove the penalty
    Easy,
    /// Workable in the dark at two levels over; eight levels remove the penalty
    Hard,
}

impl VisionTolerance {
    pub fn of(recipe: &Recipe) -> Self {
        if recipe.has_flag(RecipeFlag::BlindEasy) {
            VisionTolerance::Easy
        } else if recipe.has_flag(RecipeFlag::BlindHard) {
            VisionTolerance::Hard
        } else {
            VisionTolerance::Full
        }
    }
}

pub fn can_see_fine_details(vision_mod: f32, config: &CraftingConfig) -> bool {
    vision_mod <= config.fine_vision_threshold
}

/// Lighting multiplier for a vision modifier and a skill margin over the recipe
pub fn lighting_multiplier(
    vision_mod: f32,
    skill_bonus: i32,
    tolerance: VisionTolerance,
    config: &CraftingConfig,
) -> f32 {
    if can_see_fine_details(vision_mod, config) {
        return 1.0;
    }

    let darkness = ((vision_mod - config.fine_vision_threshold) / config.darkness_span).clamp(0.0, 1.0);

    match tolerance {
        VisionTolerance::Easy => 1.0 - darkness * 0.75 * (2 - skill_bonus).max(0) as f32 / 2.0,
        VisionTolerance::Hard if skill_bonus >= 2 => {
            1.0 - darkness * 0.75 * (8 - skill_bonus).max(0) as f32 / 6.0
        }
        _ => 0.0,
    }
}

pub fn lighting_crafting_speed_multiplier(crafter: &Crafter, recipe: &Recipe, config: &CraftingConfig) -> f32 {
    lighting_multiplier(
        crafter.vision_mod,
        crafter.exceeds_recipe_requirements(recipe),
        VisionTolerance::of(recipe),
        config,
    )
}
