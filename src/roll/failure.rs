//! Failure severity: component destruction and progress loss

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::dice::{rng_exponential, x_in_y};
use crate::core::config::CraftingConfig;
use crate::craft::PROGRESS_MAX;
use crate::item::Item;

/// What one failure cost
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailureReport {
    /// Success ratio thrown for this failure
    pub ratio: f64,
    pub destroyed: Vec<Item>,
    pub progress_lost: i32,
    /// Every component of the craft was destroyed
    pub all_destroyed: bool,
}

/// Most components one failure may destroy, never less than one
pub fn max_destroyed(component_count: usize, config: &CraftingConfig) -> usize {
    ((component_count as f64 * config.max_destroyed_fraction).floor() as usize).max(1)
}

/// Destroy components and roll back progress after a failed check
///
/// Each destruction attempt is skipped with probability `ratio`. When the
/// last component goes, no progress is lost.
pub fn roll_failure<R: Rng + ?Sized>(
    components: &mut Vec<Item>,
    progress: &mut i32,
    ratio: f64,
    config: &CraftingConfig,
    rng: &mut R,
) -> FailureReport {
    let starting = components.len();
    let mut destroyed = Vec::new();

    for _ in 0..max_destroyed(starting, config) {
        if components.is_empty() {
            break;
        }
        if x_in_y(ratio, 1.0, rng) {
            continue;
        }
        let idx = rng.gen_range(0..components.len());
        destroyed.push(components.remove(idx));
    }

    if starting > 0 && components.is_empty() {
        return FailureReport {
            ratio,
            destroyed,
            progress_lost: 0,
            all_destroyed: true,
        };
    }

    let fraction = rng_exponential(config.progress_loss_min, config.progress_loss_mean, rng) * (1.0 - ratio.min(1.0));
    let progress_lost = (f64::from(*progress) * fraction) as i32;
    *progress = (*progress - progress_lost).clamp(0, PROGRESS_MAX);

    FailureReport {
        ratio,
        destroyed,
        progress_lost,
        all_destroyed: false,
    }
}
