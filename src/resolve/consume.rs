//! Taking selected resources out of the world

use crate::actor::Crafter;
use crate::env::{ItemOracle, MapAccess};
use crate::inventory::{any_item, ItemFilter};
use crate::item::{flags, Item};
use crate::recipe::{ItemComp, ToolComp};

use super::component::by_charges;
use super::CompSelection;

/// Strip ammunition, batteries and mods from items and hand them to the crafter
pub fn remove_ammo(items: &mut [Item], crafter: &mut Crafter, oracle: &dyn ItemOracle) {
    for item in items.iter_mut() {
        for content in item.take_removable_contents() {
            crafter.carried.add(content);
        }
        if item.count_by_charges || item.has_flag(flags::NO_UNLOAD) || item.charges <= 0 {
            continue;
        }
        if let Some(ammo_type) = item.ammo_type.clone() {
            let mut ammo = oracle.spawn(&ammo_type);
            ammo.charges = item.charges;
            item.charges = 0;
            crafter.carried.add(ammo);
        }
    }
}

/// Take the selected component out of storage (first) and the crafter (second)
///
/// Charge stacks taken from several places come back merged into one item.
#[allow(clippy::too_many_arguments)]
pub fn consume_items(
    crafter: &mut Crafter,
    map: &mut dyn MapAccess,
    selection: &CompSelection<ItemComp>,
    batch: i32,
    oracle: &dyn ItemOracle,
    filter: ItemFilter<'_>,
    radius: i32,
) -> Vec<Item> {
    let comp = &selection.comp;
    let charges = by_charges(comp, oracle, [&crafter.carried, &crafter.worn]);
    let mut remaining = comp.effective_count(batch);
    let mut taken = Vec::new();

    if selection.use_from.includes_map() {
        let mut from_map = if charges {
            map.use_charges(crafter.position, radius, &comp.item_type, remaining, filter)
        } else {
            map.use_amount(crafter.position, radius, &comp.item_type, remaining, filter)
        };
        if !charges {
            remove_ammo(&mut from_map, crafter, oracle);
        }
        remaining -= from_map.iter().map(Item::quantity).sum::<i32>();
        taken.extend(from_map);
    }

    if selection.use_from.includes_player() && remaining > 0 {
        let mut from_player = if charges {
            crafter.use_charges(&comp.item_type, remaining, filter)
        } else {
            crafter.use_amount(&comp.item_type, remaining, filter)
        };
        if !charges {
            remove_ammo(&mut from_player, crafter, oracle);
        }
        taken.extend(from_player);
    }

    if charges && taken.len() > 1 {
        let mut merged = taken.remove(0);
        for stack in taken.drain(..) {
            merged.charges += stack.charges;
        }
        taken.push(merged);
    }

    if taken.is_empty() {
        tracing::warn!(item = %comp.item_type, batch, "consumed nothing for a selected component");
    }
    crafter.moves += 1;
    taken
}

/// Drain `count × batch` charges of the selected tool
pub fn consume_tools(
    crafter: &mut Crafter,
    map: &mut dyn MapAccess,
    selection: &CompSelection<ToolComp>,
    batch: i32,
    radius: i32,
) {
    let quantity = selection.comp.count * batch;
    if quantity <= 0 {
        return;
    }
    if selection.use_from.includes_player() {
        crafter.use_charges(&selection.comp.item_type, quantity, &any_item);
    }
    if selection.use_from.includes_map() {
        map.use_charges(crafter.position, radius, &selection.comp.item_type, quantity, &any_item);
    }
    crafter.moves += 1;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Tripoint;
    use crate::env::GridMap;
    use crate::item::{ItemCatalog, ItemTemplate};
    use crate::resolve::UsageFrom;

    fn items() -> ItemCatalog {
        let mut catalog = ItemCatalog::new();
        let mut nail = ItemTemplate::new("nail");
        nail.count_by_charges = true;
        catalog.add(nail);
        let mut battery = ItemTemplate::new("battery");
        battery.count_by_charges = true;
        catalog.add(battery);
        catalog
    }

    fn nails(charges: i32) -> Item {
        let mut item = Item::new("nail").with_charges(charges);
        item.count_by_charges = true;
        item
    }

    #[test]
    fn test_mixed_consumption_takes_map_first() {
        let catalog = items();
        let mut crafter = Crafter::new("Ada");
        for _ in 0..3 {
            crafter.carried.add(Item::new("plank"));
        }
        let mut map = GridMap::new();
        for _ in 0..5 {
            map.place(Tripoint::new(1, 0, 0), Item::new("plank"));
        }

        let selection = CompSelection::new(UsageFrom::Both, ItemComp::new("plank", 6));
        let taken = consume_items(&mut crafter, &mut map, &selection, 1, &catalog, &any_item, 6);
        assert_eq!(taken.len(), 6);
        assert!(map.items_at(Tripoint::new(1, 0, 0)).is_empty());
        assert_eq!(crafter.carried.len(), 2);
    }

    #[test]
    fn test_charge_stacks_are_merged() {
        let catalog = items();
        let mut crafter = Crafter::new("Ada");
        crafter.carried.add(nails(6));
        let mut map = GridMap::new();
        map.place(Tripoint::new(0, 1, 0), nails(5));

        let selection = CompSelection::new(UsageFrom::Both, ItemComp::new("nail", 4));
        let taken = consume_items(&mut crafter, &mut map, &selection, 2, &catalog, &any_item, 6);
        assert_eq!(taken.len(), 1);
        assert_eq!(taken[0].charges, 8);
        assert_eq!(crafter.carried.charges_of(&"nail".into(), &any_item), 3);
    }

    #[test]
    fn test_remove_ammo_returns_contents() {
        let catalog = items();
        let mut crafter = Crafter::new("Ada");
        let mut flashlight = Item::new("flashlight").with_charges(30);
        flashlight.ammo_type = Some("battery".into());
        flashlight.contents.push(Item::new("lens_mod"));
        let mut consumed = vec![flashlight];
        remove_ammo(&mut consumed, &mut crafter, &catalog);

        assert_eq!(consumed[0].charges, 0);
        assert!(consumed[0].contents.is_empty());
        assert_eq!(crafter.carried.charges_of(&"battery".into(), &any_item), 30);
        assert_eq!(crafter.carried.amount_of(&"lens_mod".into(), &any_item), 1);
    }

    #[test]
    fn test_consume_tools_scales_with_batch() {
        let mut crafter = Crafter::new("Ada");
        crafter.carried.add(Item::new("welder").with_charges(100));
        let mut map = GridMap::new();
        let selection = CompSelection::new(UsageFrom::Player, ToolComp::new("welder", 5));
        consume_tools(&mut crafter, &mut map, &selection, 3, 6);
        assert_eq!(crafter.carried.charges_of(&"welder".into(), &any_item), 85);

        // Tools without a charge cost are never drained
        let hammer = CompSelection::new(UsageFrom::None, ToolComp::new("welder", 0));
        consume_tools(&mut crafter, &mut map, &hammer, 3, 6);
        assert_eq!(crafter.carried.charges_of(&"welder".into(), &any_item), 85);
    }
}
