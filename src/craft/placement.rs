//! Putting crafts and their outputs somewhere

use serde::{Deserialize, Serialize};

use super::state::CraftLocation;
use crate::actor::Crafter;
use crate::core::types::{Mass, Tripoint, Volume};
use crate::env::MapAccess;
use crate::item::Item;

/// Where an output ended up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Placement {
    Carried,
    VehicleCargo(Tripoint),
    Ground(Tripoint),
    /// Handed to the liquid handler
    Liquid,
}

/// Where a new in-progress craft of this size goes
pub fn place_craft(crafter: &Crafter, mass: Mass, volume: Volume, map: &dyn MapAccess, drop_radius: i32) -> CraftLocation {
    if crafter.can_carry(mass, volume) {
        return CraftLocation::Carried;
    }
    if map.has_vehicle_cargo(crafter.position) {
        return CraftLocation::VehicleCargo(crafter.position);
    }
    let at = map
        .reachable_points(crafter.position, drop_radius)
        .into_iter()
        .next()
        .unwrap_or(crafter.position);
    CraftLocation::Ground(at)
}

/// Put an item on the closest tile within `radius` that accepts it
pub fn place_on_map(map: &mut dyn MapAccess, origin: Tripoint, item: Item, radius: i32) -> Result<Tripoint, Item> {
    let mut item = item;
    for at in origin.closest_points_first(radius) {
        match map.add_item(at, item) {
            Ok(()) => return Ok(at),
            Err(back) => item = back,
        }
    }
    tracing::error!(item = %item.type_id, ?origin, "could not place item on map");
    Err(item)
}

/// Vehicle cargo at `at`, otherwise the map around it
pub fn place_in_vehicle_or_map(
    map: &mut dyn MapAccess,
    at: Tripoint,
    item: Item,
    radius: i32,
) -> Result<Placement, Item> {
    let item = if map.has_vehicle_cargo(at) {
        match map.add_to_vehicle_cargo(at, item) {
            Ok(()) => return Ok(Placement::VehicleCargo(at)),
            Err(back) => back,
        }
    } else {
        item
    };
    place_on_map(map, at, item, radius).map(Placement::Ground)
}

/// Give an output to the crafter if they can carry it, else set it down nearby
pub fn place_output(
    crafter: &mut Crafter,
    map: &mut dyn MapAccess,
    item: Item,
    radius: i32,
) -> Result<Placement, Item> {
    if crafter.can_carry(item.weight(), item.volume()) {
        crafter.carried.add(item);
        return Ok(Placement::Carried);
    }
    place_in_vehicle_or_map(map, crafter.position, item, radius)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::memory::{Cargo, VehiclePart};
    use crate::env::GridMap;

    fn anvil() -> Item {
        let mut anvil = Item::new("anvil");
        anvil.unit_weight = Mass::from_kilograms(80);
        anvil.unit_volume = Volume::from_liters(10);
        anvil
    }

    #[test]
    fn test_light_output_is_carried() {
        let mut crafter = Crafter::new("Ada");
        let mut map = GridMap::new();
        let placed = place_output(&mut crafter, &mut map, Item::new("nail"), 2);
        assert_eq!(placed, Ok(Placement::Carried));
        assert_eq!(crafter.carried.len(), 1);
    }

    #[test]
    fn test_heavy_output_goes_to_ground() {
        let mut crafter = Crafter::new("Ada");
        let mut map = GridMap::new();
        let placed = place_output(&mut crafter, &mut map, anvil(), 2);
        assert_eq!(placed, Ok(Placement::Ground(crafter.position)));
        assert_eq!(map.items_at(crafter.position).len(), 1);
    }

    #[test]
    fn test_vehicle_cargo_preferred_over_ground() {
        let mut crafter = Crafter::new("Ada");
        let mut map = GridMap::new();
        map.set_vehicle(
            crafter.position,
            VehiclePart {
                cargo: Some(Cargo::new(Volume::from_liters(100))),
                ..VehiclePart::default()
            },
        );
        let placed = place_output(&mut crafter, &mut map, anvil(), 2);
        assert_eq!(placed, Ok(Placement::VehicleCargo(crafter.position)));
        assert_eq!(map.cargo_at(crafter.position).len(), 1);
    }

    #[test]
    fn test_full_tiles_overflow_to_neighbours() {
        let crafter = Crafter::new("Ada");
        let mut map = GridMap::new().with_max_items_per_tile(1);
        map.place(crafter.position, Item::new("rock"));
        let at = place_on_map(&mut map, crafter.position, Item::new("rock"), 2);
        assert!(matches!(at, Ok(p) if p != crafter.position));
    }

    #[test]
    fn test_unplaceable_item_is_handed_back() {
        let crafter = Crafter::new("Ada");
        let mut map = GridMap::new().with_max_items_per_tile(0);
        let back = place_on_map(&mut map, crafter.position, Item::new("rock"), 1);
        assert_eq!(back.map_err(|i| i.type_id), Err("rock".into()));
    }

    #[test]
    fn test_heavy_craft_location() {
        let crafter = Crafter::new("Ada");
        let map = GridMap::new();
        let loc = place_craft(&crafter, Mass::from_kilograms(100), Volume::from_liters(5), &map, 2);
        assert_eq!(loc, CraftLocation::Ground(crafter.position));
    }
}
