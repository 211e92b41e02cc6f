//! Choosing the surface a craft is worked on

use crate::actor::Crafter;
use crate::core::config::CraftingConfig;
use crate::core::types::{Mass, Tripoint, Volume};
use crate::env::MapAccess;
use crate::speed::{workbench_multiplier, BenchLocation, BenchType};

/// Best surface on one tile for a craft of this size
///
/// Ground is always available; hands only when the crafter can lift the craft.
pub fn best_bench_here(
    mass: Mass,
    volume: Volume,
    at: Tripoint,
    can_lift: bool,
    map: &dyn MapAccess,
    config: &CraftingConfig,
) -> (BenchType, f32) {
    let mut best_type = BenchType::Ground;
    let mut best = workbench_multiplier(mass, volume, &config.ground_bench, config);

    if can_lift {
        let hands = workbench_multiplier(mass, volume, &config.hands_bench, config);
        if hands > best {
            best_type = BenchType::Hands;
            best = hands;
        }
    }
    if let Some(info) = map.furniture_workbench(at) {
        let furniture = workbench_multiplier(mass, volume, &info, config);
        if furniture > best {
            best_type = BenchType::Furniture;
            best = furniture;
        }
    }
    if let Some(info) = map.vehicle_workbench(at) {
        let vehicle = workbench_multiplier(mass, volume, &info, config);
        if vehicle > best {
            best_type = BenchType::Vehicle;
            best = vehicle;
        }
    }
    (best_type, best)
}

/// Best surface reachable from the crafter
///
/// Benches on other tiles win only on a strictly higher base multiplier.
pub fn find_best_bench(
    crafter: &Crafter,
    mass: Mass,
    volume: Volume,
    map: &dyn MapAccess,
    config: &CraftingConfig,
) -> BenchLocation {
    let can_lift = crafter.can_lift(mass);
    let (mut best_type, mut best) = best_bench_here(mass, volume, crafter.position, can_lift, map, config);
    let mut best_at = crafter.position;

    for at in map.reachable_points(crafter.position, config.pickup_range) {
        if let Some(info) = map.furniture_workbench(at) {
            if info.multiplier > best {
                best_type = BenchType::Furniture;
                best = info.multiplier;
                best_at = at;
            }
        }
        if let Some(info) = map.vehicle_workbench(at) {
            if info.multiplier > best {
                best_type = BenchType::Vehicle;
                best = info.multiplier;
                best_at = at;
            }
        }
    }

    BenchLocation::new(best_type, best_at)
}

/// Speed multiplier of working on `bench`; a vanished bench counts as the ground
pub fn bench_speed(
    bench: &BenchLocation,
    mass: Mass,
    volume: Volume,
    map: &dyn MapAccess,
    config: &CraftingConfig,
) -> f32 {
    let info = bench.info(map, config).unwrap_or(config.ground_bench);
    workbench_multiplier(mass, volume, &info, config)
}
