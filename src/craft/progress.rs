//! One tick of work on a craft

use serde::{Deserialize, Serialize};

use super::completion::CompletionReport;
use super::state::{AbandonReason, CraftState, InProgressCraft, PROGRESS_MAX, PROGRESS_STEP};
use super::{bench_speed, find_best_bench, Workshop};
use crate::recipe::Recipe;
use crate::roll::{roll_failure, FailureReport};
use crate::speed::{in_progress_speed, lighting_crafting_speed_multiplier, morale_crafting_speed_multiplier};

/// Result of advancing a craft
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AdvanceOutcome {
    InProgress {
        progress: i32,
        /// Checkpoints crossed this tick
        steps: i32,
        failure: Option<FailureReport>,
    },
    Completed(CompletionReport),
    Abandoned(AbandonReason),
}

/// Progress after spending `moves` on a craft
///
/// `base_total` is the full-speed time of the whole batch and
/// `assist_total` the time at the current speed with assistance. The
/// result never decreases and never exceeds [`PROGRESS_MAX`].
pub fn progress_after(progress: i32, moves: i32, base_total: i32, assist_total: i32) -> i32 {
    if moves <= 0 {
        return progress;
    }
    let base_total = f64::from(base_total.max(1));
    let assist_total = f64::from(assist_total.max(1));
    let max = f64::from(PROGRESS_MAX);

    // Moves are scaled to full-speed moves, then back to a fraction of the base time
    let delta = f64::from(moves) * base_total / assist_total;
    let current = f64::from(progress) * base_total / max + delta;
    let next = (current / base_total * max).round().min(max) as i32;
    next.max(progress)
}

impl Workshop<'_, '_> {
    /// Spend `moves` of work on `craft`
    ///
    /// The craft is re-validated first. Skill practice and tool charges are
    /// settled per 5% checkpoint crossed; completion wins over a failure
    /// check falling on the same tick.
    pub fn advance(&mut self, craft: &mut InProgressCraft, recipe: &Recipe, moves: i32) -> AdvanceOutcome {
        if let Err(reason) = self.continue_checkpoint(craft, recipe) {
            return self.abandon(craft, reason);
        }

        let (mass, volume) = (craft.mass(), craft.volume());
        craft.bench = find_best_bench(self.crafter, mass, volume, &*self.env.map, self.config);
        let light = lighting_crafting_speed_multiplier(self.crafter, recipe, self.config);
        let bench = bench_speed(&craft.bench, mass, volume, &*self.env.map, self.config);
        let morale = morale_crafting_speed_multiplier(self.crafter, recipe, self.config);
        let check = in_progress_speed(light, bench, morale, self.env.turn, self.config);

        for axis in &check.slow {
            self.env.bad(axis.message(&craft.name));
        }
        if let Some(halt) = check.halt {
            self.env.bad(halt.message(&craft.name));
            return self.abandon(craft, AbandonReason::Halted(halt));
        }

        let batch = craft.batch_size;
        let assistants = self.available_assistant_count(recipe);
        let base_total = recipe.batch_time(batch, 1.0, 0).max(1);
        let assist_total = recipe.batch_time(batch, check.multiplier(), assistants).max(1);

        let old = craft.progress;
        craft.progress = progress_after(old, moves, base_total, assist_total);

        let mut steps = craft.progress / PROGRESS_STEP - old / PROGRESS_STEP;
        if steps > 0 {
            self.craft_skill_gain(recipe, batch, steps);
        }
        // The final checkpoint's charges were paid up front
        if craft.is_complete() {
            steps -= 1;
        }
        if steps > 0 && !self.consume_tool_steps(craft, steps) {
            // Fall back below the last checkpoint so the charges are retried
            craft.progress = (craft.progress - (craft.progress % PROGRESS_STEP + 1)).max(old);
            return self.abandon(craft, AbandonReason::MissingTools);
        }

        if craft.is_complete() {
            return AdvanceOutcome::Completed(self.complete(craft, recipe));
        }

        let failure = if craft.failure_due() {
            Some(self.handle_failure(craft, recipe))
        } else {
            None
        };
        tracing::trace!(craft = %craft.id, progress = craft.progress, steps, "craft advanced");
        AdvanceOutcome::InProgress {
            progress: craft.progress,
            steps: steps.max(0),
            failure,
        }
    }

    fn abandon(&mut self, craft: &mut InProgressCraft, reason: AbandonReason) -> AdvanceOutcome {
        tracing::debug!(craft = %craft.id, %reason, progress = craft.progress, "craft abandoned");
        craft.state = CraftState::Abandoned(reason);
        AdvanceOutcome::Abandoned(reason)
    }

    fn handle_failure(&mut self, craft: &mut InProgressCraft, recipe: &Recipe) -> FailureReport {
        let ratio = self.success_roll(recipe);
        let report = roll_failure(&mut craft.components, &mut craft.progress, ratio, self.config, &mut *self.rng);

        for item in &report.destroyed {
            self.env.bad(format!("You mess up and destroy the {}.", item.name));
        }
        if report.all_destroyed {
            // Kept; the next checkpoint asks for replacements
            self.env
                .bad(format!("There is nothing left of the {} to craft from.", craft.name));
        } else {
            self.env.bad(format!(
                "You mess up and lose {}% progress.",
                report.progress_lost / 100_000
            ));
        }
        tracing::debug!(
            craft = %craft.id,
            ratio,
            destroyed = report.destroyed.len(),
            lost = report.progress_lost,
            "craft failure"
        );
        self.schedule_failure(craft, recipe);
        report
    }
}
