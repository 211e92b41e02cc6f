//! Benchmarks for resource resolution over large inventories.
//!
//! Run with: cargo bench --bench resolution_bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use craftwork::core::types::RecipeId;
use craftwork::inventory::{any_item, Inventory};
use craftwork::item::ItemCatalog;
use craftwork::recipe::RecipeCatalog;
use craftwork::resolve::{component_candidates, CostAdjustment};

/// Crafter and map inventories with `size` items each, nails and glue mixed in
fn create_inventories(items: &ItemCatalog, size: usize) -> (Inventory, Inventory) {
    let kinds = ["plank", "hammer", "saw", "vegetable", "bottle", "pot"];
    let mut player = Inventory::new();
    let mut map = Inventory::new();
    for i in 0..size {
        let kind = kinds[i % kinds.len()];
        player.add(items.spawn(&kind.into()));
        map.add(items.spawn(&kinds[(i + 3) % kinds.len()].into()));
    }
    player.add(items.spawn(&"nail".into()).with_charges(25));
    map.add(items.spawn(&"glue".into()).with_charges(8));
    (player, map)
}

fn bench_component_candidates(c: &mut Criterion) {
    let items = ItemCatalog::with_defaults();
    let recipes = RecipeCatalog::with_defaults();
    let Some(shelf) = recipes.get(&RecipeId::from("shelf")) else {
        return;
    };
    let mut group = c.benchmark_group("component_candidates");

    for size in [10, 100, 1000].iter() {
        let (player, map) = create_inventories(&items, *size);
        group.bench_with_input(BenchmarkId::from_parameter(format!("{}_items", size)), size, |b, _| {
            b.iter(|| {
                for component in &shelf.requirements.components {
                    let candidates = component_candidates(
                        black_box(component),
                        2,
                        black_box(&player),
                        black_box(&map),
                        &items,
                        &any_item,
                    );
                    black_box(candidates);
                }
            });
        });
    }

    group.finish();
}

fn bench_can_make(c: &mut Criterion) {
    let items = ItemCatalog::with_defaults();
    let recipes = RecipeCatalog::with_defaults();
    let Some(shelf) = recipes.get(&RecipeId::from("shelf")) else {
        return;
    };
    let mut group = c.benchmark_group("can_make_with_inventory");

    for size in [10, 100, 1000].iter() {
        let (mut player, map) = create_inventories(&items, *size);
        player.merge(&map);
        group.bench_with_input(BenchmarkId::from_parameter(format!("{}_items", size)), size, |b, _| {
            b.iter(|| {
                let ok = shelf.requirements.can_make_with_inventory(
                    black_box(&player),
                    &any_item,
                    1,
                    CostAdjustment::StartOnly,
                );
                black_box(ok)
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_component_candidates, bench_can_make);
criterion_main!(benches);
