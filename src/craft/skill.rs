//! Practice gained while crafting, and time estimates

use super::Workshop;
use crate::recipe::Recipe;
use crate::roll::{one_in, roll_remainder};
use crate::speed::crafting_speed_multiplier;

impl Workshop<'_, '_> {
    /// Helpers skilled enough to speed up a batch
    pub fn available_assistant_count(&self, recipe: &Recipe) -> usize {
        self.env
            .helpers
            .iter()
            .filter(|h| h.skills.level_of(recipe.skill_used.as_ref()) >= recipe.difficulty)
            .count()
    }

    /// Moves for `batch` units at full speed, with assistance
    pub fn base_time_to_craft(&self, recipe: &Recipe, batch: i32) -> i32 {
        recipe.batch_time(batch, 1.0, self.available_assistant_count(recipe))
    }

    /// Moves for `batch` units at the crafter's current speed
    pub fn expected_time_to_craft(&self, recipe: &Recipe, batch: i32, in_progress: bool) -> i32 {
        let speed = crafting_speed_multiplier(self.crafter, recipe, in_progress, self.config);
        recipe.batch_time(batch, speed, self.available_assistant_count(recipe))
    }

    /// Practice for `steps` progress checkpoints of a `batch`-unit craft
    ///
    /// Helpers practice too: those who understand the recipe at half the
    /// crafter's rate, the rest at a tenth.
    pub fn craft_skill_gain(&mut self, recipe: &Recipe, batch: i32, steps: i32) {
        let Some(skill) = recipe.skill_used.clone() else {
            return;
        };
        if steps <= 0 {
            return;
        }

        // Longer crafts teach more
        let batch_mult = f64::from(batch) + f64::from(self.base_time_to_craft(recipe, batch)) / 30000.0;
        let base_practice =
            roll_remainder(f64::from(recipe.difficulty * 15 + 10) * batch_mult / 20.0, &mut *self.rng) * steps;
        let cap = (f64::from(recipe.difficulty) * 1.25) as i32;

        if self.crafter.practice(&skill, base_practice, cap) {
            let level = self.crafter.skill_level(&skill);
            self.env.good(format!("Your skill in {} has increased to {}!", skill, level));
        }

        for (secondary, required) in &recipe.required_skills {
            if *secondary == skill {
                continue;
            }
            let level = self.crafter.skill_level(secondary);
            let amount =
                roll_remainder(f64::from(level * 15 + 10) * batch_mult / 20.0, &mut *self.rng) * steps / 2;
            let secondary_cap = (f64::from(*required) * 1.25) as i32;
            if self.crafter.practice(secondary, amount, secondary_cap) {
                let level = self.crafter.skill_level(secondary);
                self.env.good(format!("Your skill in {} has increased to {}!", secondary, level));
            }
        }

        for idx in 0..self.env.helpers.len() {
            let helper = &self.env.helpers[idx];
            let name = helper.name.clone();
            let understands = helper.skills.level(&skill) >= recipe.difficulty;
            let share = if understands { 2.0 } else { 10.0 };
            let amount = roll_remainder(f64::from(base_practice) / share, &mut *self.rng);
            self.env.helpers[idx].skills.practice(&skill, amount, cap);

            if understands {
                if batch > 1 && one_in(3, &mut *self.rng) {
                    self.env.info(format!("{} assists with crafting…", name));
                }
                if batch == 1 && one_in(3, &mut *self.rng) {
                    self.env.info(format!("{} could assist you with a batch…", name));
                }
            } else if one_in(3, &mut *self.rng) {
                self.env.info(format!("{} watches you craft…", name));
            }
        }
    }
}
