//! Crafting configuration with documented constants
//!
//! All tuning numbers of the crafting engine are collected here. The engine
//! owns one copy; nothing reads configuration from global state.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::types::{Mass, SkillId, TraitId, Volume};
use crate::speed::workbench::WorkbenchInfo;

/// A dice penalty applied to the success roll when a trait is present
/// and left uncorrected
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpairmentPenalty {
    /// Trait that causes the penalty
    pub trait_id: TraitId,
    /// Primary skill of the affected recipes
    pub skill: SkillId,
    /// Severity; each rank removes `impairment_dice_per_rank` dice
    pub ranks: i32,
}

/// Configuration for the crafting engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CraftingConfig {
    // === RESOURCES ===
    /// Radius (tiles) around the crafter searched for components, tools and benches
    pub pickup_range: i32,

    /// Radius (tiles) searched when an output cannot stay with the crafter
    pub drop_radius: i32,

    // === LIGHTING ===
    /// Fine-detail vision modifier at or below which crafting is unimpeded
    ///
    /// Vision modifiers run from 1 (bright daylight) to 11 (pitch black).
    pub fine_vision_threshold: f32,

    /// Width of the vision band between the threshold and total darkness
    pub darkness_span: f32,

    // === SPEED GATES ===
    /// Starting a craft is refused below this recipe-level speed
    pub start_speed_floor: f32,

    /// Any recipe-level speed below this counts as zero
    pub give_up_speed: f32,

    /// Combined in-progress speed at or below which the crafter gives up
    pub frustration_threshold: f32,

    /// Combined speed below which slow-work warnings are emitted
    pub slow_warning_threshold: f32,

    /// Single-axis speed at or below which that axis is named in warnings
    pub slow_axis_threshold: f32,

    /// Turns between slow-work warnings (one hour)
    pub warning_interval: u64,

    // === MORALE ===
    /// Morale at which the morale multiplier halves speed (for the easiest recipe)
    pub morale_halving_point: i32,

    /// Lowest morale at which crafting is allowed at all
    pub min_craft_morale: i32,

    // === WORKBENCHES ===
    /// Bench used when holding the craft in hand
    pub hands_bench: WorkbenchInfo,

    /// Bench used when working on the ground
    pub ground_bench: WorkbenchInfo,

    /// Craft mass at which the workbench penalty bottoms out
    pub bench_mass_cap: Mass,

    /// Craft volume at which the workbench penalty bottoms out
    pub bench_volume_cap: Volume,

    /// Speed multiplier reached at (and beyond) the hard caps
    pub bench_floor: f32,

    // === SUCCESS ROLL ===
    /// Base sides of each skill die, intelligence is added on top
    pub skill_die_sides: i32,

    /// Sides of each difficulty die
    pub difficulty_die_sides: i32,

    /// Bonus skill dice when a helper is at least as skilled as the crafter
    pub helper_bonus_dice: i32,

    /// Dice removed per impairment rank
    pub impairment_dice_per_rank: i32,

    /// Uncorrected trait penalties
    pub impairment_penalties: Vec<ImpairmentPenalty>,

    // === FAILURE ===
    /// Lower bound of the exponential progress-loss fraction
    pub progress_loss_min: f64,

    /// Mean of the exponential progress-loss fraction
    pub progress_loss_mean: f64,

    /// Fraction of components that may be destroyed by one failure
    pub max_destroyed_fraction: f64,

    // === DISASSEMBLY ===
    /// Per-damage-level multiplier on component recovery chance
    pub disassembly_damage_base: f64,

    /// Ask the crafter to confirm before a disassembly begins
    pub confirm_disassembly: bool,

    // === RANDOMNESS ===
    /// Seed of the engine's deterministic generator
    pub rng_seed: u64,
}

impl Default for CraftingConfig {
    fn default() -> Self {
        Self {
            pickup_range: 6,
            drop_radius: 2,

            fine_vision_threshold: 4.0,
            darkness_span: 7.0,

            start_speed_floor: 0.33,
            give_up_speed: 0.1,
            frustration_threshold: 0.2,
            slow_warning_threshold: 0.75,
            slow_axis_threshold: 0.5,
            warning_interval: 3600,

            morale_halving_point: -50,
            min_craft_morale: -50,

            hands_bench: WorkbenchInfo::new(1.0, Mass::from_kilograms(5), Volume::from_liters(10)),
            ground_bench: WorkbenchInfo::new(
                0.7,
                Mass::from_kilograms(1000),
                Volume::from_liters(1000),
            ),
            bench_mass_cap: Mass::from_kilograms(1000),
            bench_volume_cap: Volume::from_liters(1000),
            bench_floor: 0.25,

            skill_die_sides: 16,
            difficulty_die_sides: 24,
            helper_bonus_dice: 2,
            impairment_dice_per_rank: 4,
            impairment_penalties: vec![
                ImpairmentPenalty {
                    trait_id: TraitId::from("HYPEROPIC"),
                    skill: SkillId::from("electronics"),
                    ranks: 2,
                },
                ImpairmentPenalty {
                    trait_id: TraitId::from("HYPEROPIC"),
                    skill: SkillId::from("tailor"),
                    ranks: 1,
                },
            ],

            progress_loss_min: 0.25,
            progress_loss_mean: 0.35,
            max_destroyed_fraction: 0.75,

            disassembly_damage_base: 0.8,
            confirm_disassembly: true,

            rng_seed: 0x5eed_c0de,
        }
    }
}

/// Error type for configuration loading
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl CraftingConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a configuration from TOML; missing keys keep their defaults
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: CraftingConfig = toml::from_str(content)?;
        config.validate().map_err(ConfigError::Invalid)?;
        Ok(config)
    }

    /// Load a configuration file
    pub fn load(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Validate configuration values are sensible
    pub fn validate(&self) -> Result<(), String> {
        if self.pickup_range < 0 || self.drop_radius < 0 {
            return Err("Search radii must not be negative".into());
        }

        if self.darkness_span <= 0.0 {
            return Err(format!(
                "darkness_span ({}) must be positive",
                self.darkness_span
            ));
        }

        if self.give_up_speed > self.start_speed_floor {
            return Err(format!(
                "give_up_speed ({}) should be <= start_speed_floor ({})",
                self.give_up_speed, self.start_speed_floor
            ));
        }

        if self.frustration_threshold >= self.slow_warning_threshold {
            return Err(format!(
                "frustration_threshold ({}) should be < slow_warning_threshold ({})",
                self.frustration_threshold, self.slow_warning_threshold
            ));
        }

        if self.morale_halving_point >= 0 {
            return Err("morale_halving_point must be negative".into());
        }

        if self.bench_floor <= 0.0 || self.bench_floor > 1.0 {
            return Err(format!("bench_floor ({}) must be in (0, 1]", self.bench_floor));
        }

        if self.hands_bench.allowed_mass > self.bench_mass_cap
            || self.hands_bench.allowed_volume > self.bench_volume_cap
        {
            return Err("hands_bench allowances exceed the bench hard caps".into());
        }

        if self.skill_die_sides <= 0 || self.difficulty_die_sides <= 0 {
            return Err("Dice must have at least one side".into());
        }

        if self.progress_loss_mean <= self.progress_loss_min {
            return Err(format!(
                "progress_loss_mean ({}) must exceed progress_loss_min ({})",
                self.progress_loss_mean, self.progress_loss_min
            ));
        }

        if !(0.0..=1.0).contains(&self.max_destroyed_fraction) {
            return Err("max_destroyed_fraction must be within [0, 1]".into());
        }

        if self.warning_interval == 0 {
            return Err("warning_interval must be at least one turn".into());
        }

        Ok(())
    }

    /// Dice penalty for an uncorrected trait affecting `skill`
    pub fn impairment_ranks(&self, trait_id: &TraitId, skill: &SkillId) -> i32 {
        self.impairment_penalties
            .iter()
            .filter(|p| &p.trait_id == trait_id && &p.skill == skill)
            .map(|p| p.ranks)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = CraftingConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_thresholds_detected() {
        let mut config = CraftingConfig::default();
        config.give_up_speed = 0.5;
        config.start_speed_floor = 0.33;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = CraftingConfig::from_toml_str(
            r#"
pickup_range = 3
rng_seed = 42
"#,
        )
        .expect("partial config should parse");
        assert_eq!(config.pickup_range, 3);
        assert_eq!(config.rng_seed, 42);
        assert_eq!(config.difficulty_die_sides, 24);
    }

    #[test]
    fn test_toml_validation_failure() {
        let result = CraftingConfig::from_toml_str("darkness_span = 0.0");
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_impairment_ranks() {
        let config = CraftingConfig::default();
        let hyperopic = TraitId::from("HYPEROPIC");
        assert_eq!(config.impairment_ranks(&hyperopic, &SkillId::from("electronics")), 2);
        assert_eq!(config.impairment_ranks(&hyperopic, &SkillId::from("tailor")), 1);
        assert_eq!(config.impairment_ranks(&hyperopic, &SkillId::from("cooking")), 0);
    }
}
