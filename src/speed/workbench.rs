//! Workbench suitability
//!
//! Every surface allows a craft up to some mass and volume at full speed.
//! Beyond that speed falls linearly to a floor reached at the hard caps.

use serde::{Deserialize, Serialize};

use crate::core::config::CraftingConfig;
use crate::core::types::{Mass, Tripoint, Volume};
use crate::env::MapAccess;

/// Capacity and base speed of a work surface
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorkbenchInfo {
    pub multiplier: f32,
    pub allowed_mass: Mass,
    pub allowed_volume: Volume,
}

impl WorkbenchInfo {
    pub fn new(multiplier: f32, allowed_mass: Mass, allowed_volume: Volume) -> Self {
        Self {
            multiplier,
            allowed_mass,
            allowed_volume,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BenchType {
    Hands,
    Ground,
    Furniture,
    Vehicle,
}

/// The surface a craft is worked on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BenchLocation {
    pub bench_type: BenchType,
    pub position: Tripoint,
}

impl BenchLocation {
    pub fn new(bench_type: BenchType, position: Tripoint) -> Self {
        Self {
            bench_type,
            position,
        }
    }

    /// Capacity of this surface; `None` when the furniture or vehicle bench is gone
    pub fn info(&self, map: &dyn MapAccess, config: &CraftingConfig) -> Option<WorkbenchInfo> {
        match self.bench_type {
            BenchType::Hands => Some(config.hands_bench),
            BenchType::Ground => Some(config.ground_bench),
            BenchType::Furniture => map.furniture_workbench(self.position),
            BenchType::Vehicle => map.vehicle_workbench(self.position),
        }
    }
}

/// 1 below `low`, `floor` above `high`, linear in between
pub fn lerped_multiplier(value: f64, low: f64, high: f64, floor: f32) -> f32 {
    if value < low {
        return 1.0;
    }
    if value > high || high <= low {
        return floor;
    }
    (1.0 + (value - low) * (f64::from(floor) - 1.0) / (high - low)) as f32
}

/// Speed of working a craft of this size on `bench`
pub fn workbench_multiplier(
    craft_mass: Mass,
    craft_volume: Volume,
    bench: &WorkbenchInfo,
    config: &CraftingConfig,
) -> f32 {
    bench.multiplier
        * lerped_multiplier(
            craft_mass.grams() as f64,
            bench.allowed_mass.grams() as f64,
            config.bench_mass_cap.grams() as f64,
            config.bench_floor,
        )
        * lerped_multiplier(
            craft_volume.milliliters() as f64,
            bench.allowed_volume.milliliters() as f64,
            config.bench_volume_cap.milliliters() as f64,
            config.bench_floor,
        )
}
