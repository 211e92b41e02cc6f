//! Map and vehicle surface consumed by crafting

use crate::core::types::{ItemTypeId, Tripoint};
use crate::inventory::{Inventory, ItemFilter};
use crate::item::Item;
use crate::speed::workbench::WorkbenchInfo;

/// Storage, benches and placement around the crafter
///
/// "Storage" covers ground items, furniture containers and vehicle cargo
/// on every reachable tile within the radius.
pub trait MapAccess {
    /// Merged view of all storage within `radius` of `origin`
    fn storage_snapshot(&self, origin: Tripoint, radius: i32) -> Inventory;

    /// Take up to `count` discrete items from storage, closest tiles first
    fn use_amount(
        &mut self,
        origin: Tripoint,
        radius: i32,
        type_id: &ItemTypeId,
        count: i32,
        filter: ItemFilter<'_>,
    ) -> Vec<Item>;

    /// Take up to `count` charges from storage, closest tiles first
    fn use_charges(
        &mut self,
        origin: Tripoint,
        radius: i32,
        type_id: &ItemTypeId,
        count: i32,
        filter: ItemFilter<'_>,
    ) -> Vec<Item>;

    /// Workbench furniture on a tile
    fn furniture_workbench(&self, at: Tripoint) -> Option<WorkbenchInfo>;

    /// Vehicle-mounted workbench on a tile
    fn vehicle_workbench(&self, at: Tripoint) -> Option<WorkbenchInfo>;

    /// Tiles within `radius` with a clear path from `origin`, closest first
    fn reachable_points(&self, origin: Tripoint, radius: i32) -> Vec<Tripoint>;

    /// Free tank space for `liquid` in a vehicle on this tile
    fn vehicle_tank_space(&self, at: Tripoint, liquid: &ItemTypeId) -> Option<i32>;

    fn has_vehicle_cargo(&self, at: Tripoint) -> bool;

    /// Put an item into vehicle cargo; hands it back when there is no room
    fn add_to_vehicle_cargo(&mut self, at: Tripoint, item: Item) -> Result<(), Item>;

    /// Put an item on a tile; hands it back when the tile cannot hold it
    fn add_item(&mut self, at: Tripoint, item: Item) -> Result<(), Item>;

    /// Deal with a liquid that has nowhere else to go
    fn handle_liquid(&mut self, origin: Tripoint, liquid: Item);

    /// Copies of the items lying on a tile, in tile order
    fn items_on(&self, at: Tripoint) -> Vec<Item>;

    /// Remove the item at `index` of a tile
    fn take_item(&mut self, at: Tripoint, index: usize) -> Option<Item>;
}
