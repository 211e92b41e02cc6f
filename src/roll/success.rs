//! Dice-pool success model
//!
//! Skill dice are three per primary level plus one per secondary level when
//! the recipe has secondary skills, four per primary level otherwise.
//! Difficulty dice mirror the split. The ratio of the two rolls drives both
//! the failure schedule and the severity of a failure.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::dice::dice;
use crate::actor::{Crafter, Helper};
use crate::core::config::CraftingConfig;
use crate::craft::PROGRESS_MAX;
use crate::recipe::Recipe;

/// Ratio reported when there is nothing to beat
pub const AUTOMATIC_SUCCESS: f64 = 2.0;

/// Dice thrown for one success check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DicePool {
    pub skill_dice: i32,
    pub skill_sides: i32,
    pub difficulty_dice: i32,
    pub difficulty_sides: i32,
    /// Helper whose assistance added dice, for narration
    pub assisted_by: Option<String>,
}

impl DicePool {
    /// Pool for crafting `recipe`
    pub fn for_craft(crafter: &Crafter, recipe: &Recipe, helpers: &[Helper], config: &CraftingConfig) -> Self {
        let primary = crafter.skills.level_of(recipe.skill_used.as_ref());
        let secondary_dice: i32 = recipe
            .required_skills
            .iter()
            .map(|(skill, _)| crafter.skill_level(skill))
            .sum();
        let secondary_difficulty: i32 = recipe.required_skills.iter().map(|(_, level)| *level).sum();

        let mut skill_dice = if secondary_difficulty > 0 {
            primary * 3 + secondary_dice
        } else {
            primary * 4
        };

        let assisted_by = helpers
            .iter()
            .find(|h| h.skills.level_of(recipe.skill_used.as_ref()) >= primary)
            .map(|h| h.name.clone());
        if assisted_by.is_some() {
            skill_dice += config.helper_bonus_dice;
        }

        if let Some(skill) = &recipe.skill_used {
            if !crafter.vision_corrected {
                let ranks: i32 = crafter
                    .traits
                    .iter()
                    .map(|t| config.impairment_ranks(t, skill))
                    .sum();
                skill_dice -= ranks * config.impairment_dice_per_rank;
            }
            skill_dice += crafter.craft_skill_bonus(skill);
        }

        let difficulty_dice = if secondary_difficulty > 0 {
            recipe.difficulty * 3 + secondary_difficulty
        } else {
            recipe.difficulty * 4
        };

        Self {
            skill_dice,
            skill_sides: config.skill_die_sides + crafter.intelligence,
            difficulty_dice,
            difficulty_sides: config.difficulty_die_sides,
            assisted_by,
        }
    }

    /// Pool for recovering one component while disassembling with `recipe`
    pub fn for_disassembly(crafter: &Crafter, recipe: &Recipe, config: &CraftingConfig) -> Self {
        let level = crafter.skills.level_of(recipe.skill_used.as_ref());
        Self {
            skill_dice: 2 + level * 3 + level,
            skill_sides: config.skill_die_sides + crafter.intelligence,
            difficulty_dice: recipe.difficulty,
            difficulty_sides: config.difficulty_die_sides,
            assisted_by: None,
        }
    }

    /// Throw both sides and return the success ratio
    pub fn ratio<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let skill_roll = dice(self.skill_dice, self.skill_sides, rng);
        let difficulty_roll = dice(self.difficulty_dice, self.difficulty_sides, rng);
        if difficulty_roll == 0 {
            return AUTOMATIC_SUCCESS;
        }
        f64::from(skill_roll) / f64::from(difficulty_roll)
    }

    /// Throw both sides; true when skill strictly beats difficulty
    pub fn beats<R: Rng + ?Sized>(&self, rng: &mut R) -> bool {
        dice(self.skill_dice, self.skill_sides, rng) > dice(self.difficulty_dice, self.difficulty_sides, rng)
    }
}

/// One fresh success ratio for crafting `recipe`
pub fn crafting_success_roll<R: Rng + ?Sized>(
    crafter: &Crafter,
    recipe: &Recipe,
    helpers: &[Helper],
    config: &CraftingConfig,
    rng: &mut R,
) -> f64 {
    DicePool::for_craft(crafter, recipe, helpers, config).ratio(rng)
}

/// Progress value of the next failure check
///
/// The remaining distance is scaled by the ratio, so any ratio of 1 or more
/// pushes the check past completion.
pub fn next_failure_point(progress: i32, ratio: f64) -> i32 {
    let left = PROGRESS_MAX - progress;
    let delta = (ratio.max(0.0) * f64::from(left)).min(f64::from(i32::MAX - progress));
    progress + delta as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::SkillSet;
    use crate::core::types::TraitId;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn tailoring() -> Recipe {
        let mut recipe = Recipe::new("vest", "vest", 1000);
        recipe.skill_used = Some("tailor".into());
        recipe.difficulty = 3;
        recipe
    }

    #[test]
    fn test_primary_only_pool() {
        let config = CraftingConfig::default();
        let mut crafter = Crafter::new("Ada");
        crafter.skills.set_level("tailor".into(), 2);
        let pool = DicePool::for_craft(&crafter, &tailoring(), &[], &config);
        assert_eq!(pool.skill_dice, 8);
        assert_eq!(pool.skill_sides, 24);
        assert_eq!(pool.difficulty_dice, 12);
        assert_eq!(pool.difficulty_sides, 24);
    }

    #[test]
    fn test_secondary_skills_split() {
        let config = CraftingConfig::default();
        let mut recipe = tailoring();
        recipe.required_skills.push(("fabrication".into(), 2));
        let mut crafter = Crafter::new("Ada");
        crafter.skills.set_level("tailor".into(), 2);
        crafter.skills.set_level("fabrication".into(), 1);
        let pool = DicePool::for_craft(&crafter, &recipe, &[], &config);
        assert_eq!(pool.skill_dice, 7);
        assert_eq!(pool.difficulty_dice, 11);
    }

    #[test]
    fn test_helper_and_impairment() {
        let config = CraftingConfig::default();
        let mut crafter = Crafter::new("Ada");
        crafter.skills.set_level("tailor".into(), 2);
        crafter.traits.insert(TraitId::from("HYPEROPIC"));
        let helper = Helper::new("Bo", SkillSet::new().with("tailor", 3));

        let pool = DicePool::for_craft(&crafter, &tailoring(), std::slice::from_ref(&helper), &config);
        // 8 + 2 for the helper - 4 for one rank of farsightedness
        assert_eq!(pool.skill_dice, 6);
        assert_eq!(pool.assisted_by.as_deref(), Some("Bo"));

        crafter.vision_corrected = true;
        let pool = DicePool::for_craft(&crafter, &tailoring(), &[helper], &config);
        assert_eq!(pool.skill_dice, 10);
    }

    #[test]
    fn test_trivial_recipe_always_succeeds() {
        let config = CraftingConfig::default();
        let recipe = Recipe::new("knot", "knot", 10);
        let crafter = Crafter::new("Ada");
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        assert_eq!(crafting_success_roll(&crafter, &recipe, &[], &config, &mut rng), AUTOMATIC_SUCCESS);
    }

    #[test]
    fn test_next_failure_point() {
        assert_eq!(next_failure_point(0, 0.5), 5_000_000);
        assert_eq!(next_failure_point(6_000_000, 0.25), 7_000_000);
        assert!(next_failure_point(1_000, 1.0) >= PROGRESS_MAX);
        assert_eq!(next_failure_point(4_000, 0.0), 4_000);
    }

    #[test]
    fn test_disassembly_pool() {
        let config = CraftingConfig::default();
        let mut crafter = Crafter::new("Ada");
        crafter.skills.set_level("tailor".into(), 3);
        let pool = DicePool::for_disassembly(&crafter, &tailoring(), &config);
        assert_eq!(pool.skill_dice, 14);
        assert_eq!(pool.difficulty_dice, 3);
    }
}
