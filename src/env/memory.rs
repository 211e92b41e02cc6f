//! In-memory map used by tests, benches and the command line harness

use ahash::{AHashMap, AHashSet};
use serde::{Deserialize, Serialize};

use super::map::MapAccess;
use crate::core::types::{ItemTypeId, Tripoint, Volume};
use crate::inventory::{Inventory, ItemFilter};
use crate::item::Item;
use crate::speed::workbench::WorkbenchInfo;

/// A vehicle tank holding one kind of liquid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tank {
    pub liquid: ItemTypeId,
    pub capacity: i32,
    #[serde(default)]
    pub stored: i32,
}

/// The part of a vehicle occupying one tile
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VehiclePart {
    #[serde(default)]
    pub cargo: Option<Cargo>,
    #[serde(default)]
    pub workbench: Option<WorkbenchInfo>,
    #[serde(default)]
    pub tanks: Vec<Tank>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cargo {
    pub capacity: Volume,
    #[serde(default)]
    pub items: Inventory,
}

impl Cargo {
    pub fn new(capacity: Volume) -> Self {
        Self {
            capacity,
            items: Inventory::new(),
        }
    }

    fn free_volume(&self) -> Volume {
        let used: Volume = self.items.items().iter().map(Item::volume).sum();
        Volume(self.capacity.0 - used.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    #[serde(default)]
    pub items: Inventory,
    #[serde(default)]
    pub furniture_bench: Option<WorkbenchInfo>,
    #[serde(default)]
    pub vehicle: Option<VehiclePart>,
}

/// Grid of tiles keyed by position
#[derive(Debug, Clone)]
pub struct GridMap {
    tiles: AHashMap<Tripoint, Tile>,
    blocked: AHashSet<Tripoint>,
    max_items_per_tile: usize,
    spilled: Vec<(Tripoint, Item)>,
}

impl Default for GridMap {
    fn default() -> Self {
        Self {
            tiles: AHashMap::new(),
            blocked: AHashSet::new(),
            max_items_per_tile: 4096,
            spilled: Vec::new(),
        }
    }
}

impl GridMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_items_per_tile(mut self, max: usize) -> Self {
        self.max_items_per_tile = max;
        self
    }

    pub fn tile(&self, at: Tripoint) -> Option<&Tile> {
        self.tiles.get(&at)
    }

    pub fn tile_mut(&mut self, at: Tripoint) -> &mut Tile {
        self.tiles.entry(at).or_default()
    }

    pub fn place(&mut self, at: Tripoint, item: Item) {
        self.tile_mut(at).items.add(item);
    }

    pub fn set_furniture_bench(&mut self, at: Tripoint, bench: WorkbenchInfo) {
        self.tile_mut(at).furniture_bench = Some(bench);
    }

    pub fn set_vehicle(&mut self, at: Tripoint, part: VehiclePart) {
        self.tile_mut(at).vehicle = Some(part);
    }

    /// Mark a tile as impassable; its storage is out of reach
    pub fn block(&mut self, at: Tripoint) {
        self.blocked.insert(at);
    }

    pub fn items_at(&self, at: Tripoint) -> &[Item] {
        self.tiles.get(&at).map(|t| t.items.items()).unwrap_or(&[])
    }

    pub fn cargo_at(&self, at: Tripoint) -> &[Item] {
        self.tiles
            .get(&at)
            .and_then(|t| t.vehicle.as_ref())
            .and_then(|v| v.cargo.as_ref())
            .map(|c| c.items.items())
            .unwrap_or(&[])
    }

    pub fn tanks_at(&self, at: Tripoint) -> &[Tank] {
        self.tiles
            .get(&at)
            .and_then(|t| t.vehicle.as_ref())
            .map(|v| v.tanks.as_slice())
            .unwrap_or(&[])
    }

    /// Liquids that could not be stored
    pub fn spilled(&self) -> &[(Tripoint, Item)] {
        &self.spilled
    }

    /// Storage pools of a tile: ground first, then vehicle cargo
    fn pools_mut(&mut self, at: Tripoint) -> Vec<&mut Inventory> {
        let mut pools = Vec::new();
        if let Some(tile) = self.tiles.get_mut(&at) {
            pools.push(&mut tile.items);
            if let Some(cargo) = tile.vehicle.as_mut().and_then(|v| v.cargo.as_mut()) {
                pools.push(&mut cargo.items);
            }
        }
        pools
    }
}

impl MapAccess for GridMap {
    fn storage_snapshot(&self, origin: Tripoint, radius: i32) -> Inventory {
        let mut snapshot = Inventory::new();
        for point in self.reachable_points(origin, radius) {
            let Some(tile) = self.tiles.get(&point) else {
                continue;
            };
            snapshot.merge(&tile.items);
            if let Some(cargo) = tile.vehicle.as_ref().and_then(|v| v.cargo.as_ref()) {
                snapshot.merge(&cargo.items);
            }
        }
        snapshot
    }

    fn use_amount(
        &mut self,
        origin: Tripoint,
        radius: i32,
        type_id: &ItemTypeId,
        count: i32,
        filter: ItemFilter<'_>,
    ) -> Vec<Item> {
        let mut remaining = count;
        let mut taken = Vec::new();
        for point in self.reachable_points(origin, radius) {
            for pool in self.pools_mut(point) {
                if remaining <= 0 {
                    return taken;
                }
                taken.extend(pool.use_amount(type_id, &mut remaining, filter));
            }
        }
        taken
    }

    fn use_charges(
        &mut self,
        origin: Tripoint,
        radius: i32,
        type_id: &ItemTypeId,
        count: i32,
        filter: ItemFilter<'_>,
    ) -> Vec<Item> {
        let mut remaining = count;
        let mut taken = Vec::new();
        for point in self.reachable_points(origin, radius) {
            for pool in self.pools_mut(point) {
                if remaining <= 0 {
                    return taken;
                }
                taken.extend(pool.use_charges(type_id, &mut remaining, filter));
            }
        }
        taken
    }

    fn furniture_workbench(&self, at: Tripoint) -> Option<WorkbenchInfo> {
        self.tiles.get(&at).and_then(|t| t.furniture_bench)
    }

    fn vehicle_workbench(&self, at: Tripoint) -> Option<WorkbenchInfo> {
        self.tiles
            .get(&at)
            .and_then(|t| t.vehicle.as_ref())
            .and_then(|v| v.workbench)
    }

    fn reachable_points(&self, origin: Tripoint, radius: i32) -> Vec<Tripoint> {
        origin
            .closest_points_first(radius)
            .into_iter()
            .filter(|p| *p == origin || !self.blocked.contains(p))
            .collect()
    }

    fn vehicle_tank_space(&self, at: Tripoint, liquid: &ItemTypeId) -> Option<i32> {
        let tanks = self.tanks_at(at);
        if tanks.is_empty() {
            return None;
        }
        Some(
            tanks
                .iter()
                .filter(|t| &t.liquid == liquid)
                .map(|t| (t.capacity - t.stored).max(0))
                .sum(),
        )
    }

    fn has_vehicle_cargo(&self, at: Tripoint) -> bool {
        self.tiles
            .get(&at)
            .and_then(|t| t.vehicle.as_ref())
            .is_some_and(|v| v.cargo.is_some())
    }

    fn add_to_vehicle_cargo(&mut self, at: Tripoint, item: Item) -> Result<(), Item> {
        let Some(cargo) = self
            .tiles
            .get_mut(&at)
            .and_then(|t| t.vehicle.as_mut())
            .and_then(|v| v.cargo.as_mut())
        else {
            return Err(item);
        };
        if item.volume() > cargo.free_volume() {
            return Err(item);
        }
        cargo.items.add(item);
        Ok(())
    }

    fn add_item(&mut self, at: Tripoint, item: Item) -> Result<(), Item> {
        if self.blocked.contains(&at) {
            return Err(item);
        }
        let max = self.max_items_per_tile;
        let tile = self.tile_mut(at);
        if tile.items.len() >= max && !tile.items.items().iter().any(|i| i.stacks_with(&item)) {
            return Err(item);
        }
        tile.items.add(item);
        Ok(())
    }

    fn handle_liquid(&mut self, origin: Tripoint, mut liquid: Item) {
        if let Some(vehicle) = self.tiles.get_mut(&origin).and_then(|t| t.vehicle.as_mut()) {
            for tank in vehicle.tanks.iter_mut().filter(|t| t.liquid == liquid.type_id) {
                let poured = (tank.capacity - tank.stored).max(0).min(liquid.charges);
                tank.stored += poured;
                liquid.charges -= poured;
            }
        }
        if liquid.charges > 0 {
            tracing::debug!(liquid = %liquid.type_id, charges = liquid.charges, at = %origin, "liquid spilled");
            self.spilled.push((origin, liquid));
        }
    }

    fn items_on(&self, at: Tripoint) -> Vec<Item> {
        self.items_at(at).to_vec()
    }

    fn take_item(&mut self, at: Tripoint, index: usize) -> Option<Item> {
        self.tiles.get_mut(&at).and_then(|t| t.items.remove(index))
    }
}
