//! Combined crafting speed and the start/continue gates

use serde::{Deserialize, Serialize};

use super::lighting::lighting_crafting_speed_multiplier;
use super::morale::morale_crafting_speed_multiplier;
use crate::actor::Crafter;
use crate::core::config::CraftingConfig;
use crate::core::types::Tick;
use crate::recipe::Recipe;

/// Recipe-level speed from morale and lighting
///
/// A craft that has not started yet needs `start_speed_floor`; anything
/// under `give_up_speed` counts as zero.
pub fn crafting_speed_multiplier(
    crafter: &Crafter,
    recipe: &Recipe,
    in_progress: bool,
    config: &CraftingConfig,
) -> f32 {
    let result = morale_crafting_speed_multiplier(crafter, recipe, config)
        * lighting_crafting_speed_multiplier(crafter, recipe, config);
    if !in_progress && result < config.start_speed_floor {
        return 0.0;
    }
    if result < config.give_up_speed {
        return 0.0;
    }
    result
}

/// Why an in-progress craft stops
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HaltReason {
    CannotSee,
    TooLargeOrHeavy,
    MoraleTooLow,
    Frustrated,
}

impl HaltReason {
    pub fn message(&self, craft_name: &str) -> String {
        match self {
            HaltReason::CannotSee => "You can no longer see well enough to keep crafting.".into(),
            HaltReason::TooLargeOrHeavy => format!(
                "The {} is too large and/or heavy to work on.  You may want to use a workbench or a smaller batch size",
                craft_name
            ),
            HaltReason::MoraleTooLow => "Your morale is too low to continue crafting.".into(),
            HaltReason::Frustrated => "You are too frustrated to continue and just give up.".into(),
        }
    }
}

/// An axis dragging the speed down
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SlowAxis {
    Lighting,
    Bench,
    Morale,
}

impl SlowAxis {
    pub fn message(&self, craft_name: &str) -> String {
        match self {
            SlowAxis::Lighting => "You can't see well and are working slowly.".into(),
            SlowAxis::Bench => format!(
                "The {} is to large and/or heavy to work on comfortably.  You are working slowly.",
                craft_name
            ),
            SlowAxis::Morale => "You can't focus and are working slowly.".into(),
        }
    }
}

/// Verdict of the per-tick speed check
#[derive(Debug, Clone, PartialEq)]
pub struct SpeedCheck {
    pub light: f32,
    pub bench: f32,
    pub morale: f32,
    pub total: f32,
    pub halt: Option<HaltReason>,
    /// Axes to warn about this tick
    pub slow: Vec<SlowAxis>,
}

impl SpeedCheck {
    /// Effective multiplier; zero when halted
    pub fn multiplier(&self) -> f32 {
        if self.halt.is_some() {
            0.0
        } else {
            self.total
        }
    }
}

/// Speed of an in-progress craft; warnings only fall on the hourly boundary
pub fn in_progress_speed(light: f32, bench: f32, morale: f32, turn: Tick, config: &CraftingConfig) -> SpeedCheck {
    let total = light * bench * morale;
    let bench_floor = config.start_speed_floor;
    let frustration = config.frustration_threshold;

    let halt = if light <= 0.0 {
        Some(HaltReason::CannotSee)
    } else if bench <= config.give_up_speed || (bench <= bench_floor && total <= frustration) {
        Some(HaltReason::TooLargeOrHeavy)
    } else if morale <= frustration || (morale <= bench_floor && total <= frustration) {
        Some(HaltReason::MoraleTooLow)
    } else if total <= frustration {
        Some(HaltReason::Frustrated)
    } else {
        None
    };

    let mut slow = Vec::new();
    let hourly = config.warning_interval > 0 && turn % config.warning_interval == 0;
    if halt.is_none() && hourly && total < config.slow_warning_threshold {
        if light <= config.slow_axis_threshold {
            slow.push(SlowAxis::Lighting);
        }
        if bench <= config.slow_axis_threshold {
            slow.push(SlowAxis::Bench);
        }
        if morale <= config.slow_axis_threshold {
            slow.push(SlowAxis::Morale);
        }
    }

    SpeedCheck {
        light,
        bench,
        morale,
        total,
        halt,
        slow,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_floor() {
        let config = CraftingConfig::default();
        let recipe = Recipe::new("rope", "rope", 100);
        let mut crafter = Crafter::new("Ada");
        // Morale -150 quarters the speed
        crafter.morale = -150;
        assert_eq!(crafting_speed_multiplier(&crafter, &recipe, false, &config), 0.0);
        assert!((crafting_speed_multiplier(&crafter, &recipe, true, &config) - 0.25).abs() < 1e-6);
        // Under 10% nothing works
        crafter.morale = -1000;
        assert_eq!(crafting_speed_multiplier(&crafter, &recipe, true, &config), 0.0);
    }

    #[test]
    fn test_darkness_halts() {
        let config = CraftingConfig::default();
        let check = in_progress_speed(0.0, 1.0, 1.0, 1, &config);
        assert_eq!(check.halt, Some(HaltReason::CannotSee));
        assert_eq!(check.multiplier(), 0.0);
    }

    #[test]
    fn test_compound_bench_condition() {
        let config = CraftingConfig::default();
        // Bench alone under 0.1
        assert_eq!(in_progress_speed(1.0, 0.1, 1.0, 1, &config).halt, Some(HaltReason::TooLargeOrHeavy));
        // Bench at 0.3 survives while the total stays above 0.2
        assert_eq!(in_progress_speed(1.0, 0.3, 1.0, 1, &config).halt, None);
        // ...but not when the total drops to 0.2 or less
        assert_eq!(in_progress_speed(0.6, 0.3, 1.0, 1, &config).halt, Some(HaltReason::TooLargeOrHeavy));
    }

    #[test]
    fn test_compound_morale_condition() {
        let config = CraftingConfig::default();
        assert_eq!(in_progress_speed(1.0, 1.0, 0.2, 1, &config).halt, Some(HaltReason::MoraleTooLow));
        assert_eq!(in_progress_speed(1.0, 1.0, 0.3, 1, &config).halt, None);
        assert_eq!(in_progress_speed(0.6, 1.0, 0.3, 1, &config).halt, Some(HaltReason::MoraleTooLow));
    }

    #[test]
    fn test_frustration() {
        let config = CraftingConfig::default();
        assert_eq!(in_progress_speed(0.45, 0.45, 0.9, 1, &config).halt, Some(HaltReason::Frustrated));
    }

    #[test]
    fn test_hourly_warnings() {
        let config = CraftingConfig::default();
        let check = in_progress_speed(0.5, 0.9, 1.0, 3600, &config);
        assert_eq!(check.halt, None);
        assert_eq!(check.slow, vec![SlowAxis::Lighting]);
        // Off the hour nothing is reported
        assert!(in_progress_speed(0.5, 0.9, 1.0, 3601, &config).slow.is_empty());
        // Fast enough overall
        assert!(in_progress_speed(0.9, 0.9, 1.0, 3600, &config).slow.is_empty());
    }
}
