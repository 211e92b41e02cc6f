//! Speed modifiers - lighting, morale and workbench suitability
//!
//! Each axis is a pure multiplier in [0, 1]; the combined speed is their
//! product, gated differently for starting and for continuing a craft.

pub mod combined;
pub mod lighting;
pub mod morale;
pub mod workbench;

pub use combined::{crafting_speed_multiplier, in_progress_speed, HaltReason, SlowAxis, SpeedCheck};
pub use lighting::{can_see_fine_details, lighting_crafting_speed_multiplier, lighting_multiplier, VisionTolerance};
pub use morale::{has_morale_to_craft, morale_crafting_speed_multiplier, morale_multiplier};
pub use workbench::{lerped_multiplier, workbench_multiplier, BenchLocation, BenchType, WorkbenchInfo};
