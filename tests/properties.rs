//! Property tests for the pure calculations under the crafting engine
//!
//! - Progress only moves forward and never passes completion
//! - Larger crafts never work faster on the same bench
//! - A failure destroys a bounded share of components
//! - Resolution does not depend on how often it is asked

use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use craftwork::core::types::{ItemTypeId, Mass, Volume};
use craftwork::core::CraftingConfig;
use craftwork::craft::{progress_after, PROGRESS_MAX};
use craftwork::inventory::{any_item, Inventory};
use craftwork::item::{Item, ItemCatalog};
use craftwork::recipe::ItemComp;
use craftwork::resolve::component_candidates;
use craftwork::roll::{max_destroyed, roll_failure};
use craftwork::speed::{workbench_multiplier, WorkbenchInfo};

proptest! {
    #[test]
    fn progress_is_monotonic(
        progress in 0..=PROGRESS_MAX,
        moves in 0i32..100_000,
        extra in 0i32..100_000,
        base in 1i32..1_000_000,
        assist in 1i32..1_000_000,
    ) {
        let after = progress_after(progress, moves, base, assist);
        let further = progress_after(progress, moves + extra, base, assist);
        prop_assert!(after >= progress);
        prop_assert!(after <= PROGRESS_MAX);
        prop_assert!(further >= after);
    }

    #[test]
    fn bench_never_rewards_bulk(
        grams in 0i64..500_000,
        more_grams in 0i64..500_000,
        ml in 0i64..500_000,
        multiplier in 0.1f32..2.0,
    ) {
        let config = CraftingConfig::default();
        let bench = WorkbenchInfo::new(multiplier, Mass::from_grams(50_000), Volume::from_milliliters(60_000));
        let small = workbench_multiplier(Mass::from_grams(grams), Volume::from_milliliters(ml), &bench, &config);
        let large = workbench_multiplier(Mass::from_grams(grams + more_grams), Volume::from_milliliters(ml), &bench, &config);
        prop_assert!(large <= small + 1e-6);
        prop_assert!(small <= multiplier + 1e-6);
    }

    #[test]
    fn failure_destruction_is_bounded(
        count in 0usize..40,
        progress in 0..=PROGRESS_MAX,
        ratio in 0.0f64..1.5,
        seed in any::<u64>(),
    ) {
        let config = CraftingConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut components: Vec<Item> = (0..count).map(|i| Item::new(format!("part_{}", i))).collect();
        let mut after = progress;

        let report = roll_failure(&mut components, &mut after, ratio, &config, &mut rng);
        prop_assert!(report.destroyed.len() <= max_destroyed(count, &config));
        prop_assert_eq!(report.destroyed.len() + components.len(), count);
        prop_assert!(after >= 0 && after <= progress);
        prop_assert_eq!(after, (progress - report.progress_lost).max(0));
        if report.all_destroyed {
            prop_assert_eq!(after, progress);
        }
    }

    #[test]
    fn resolution_is_idempotent(
        planks in 0usize..8,
        nails in 0i32..30,
        glue in 0i32..5,
        batch in 1i32..4,
    ) {
        let items = ItemCatalog::with_defaults();
        let mut player = Inventory::new();
        let mut map = Inventory::new();
        for _ in 0..planks {
            player.add(items.spawn(&ItemTypeId::from("plank")));
        }
        if nails > 0 {
            player.add(items.spawn(&ItemTypeId::from("nail")).with_charges(nails));
        }
        if glue > 0 {
            map.add(items.spawn(&ItemTypeId::from("glue")).with_charges(glue));
        }
        let group = vec![ItemComp::new("nail", 10), ItemComp::new("glue", 2), ItemComp::new("plank", 4)];

        let first = component_candidates(&group, batch, &player, &map, &items, &any_item);
        let second = component_candidates(&group, batch, &player, &map, &items, &any_item);
        for comp in &first.mixed {
            prop_assert!(!first.player_has.contains(comp) && !first.map_has.contains(comp));
        }
        prop_assert_eq!(first, second);
    }
}
