//! Component selection
//!
//! Each alternative of a requirement group is tested against the crafter's
//! pool and the nearby storage pool. An alternative lands in `player_has`
//! and/or `map_has` when a pool covers it alone, or in `mixed` when only
//! the two pools together do.

use crate::env::{DecisionStrategy, ItemOracle};
use crate::inventory::{Inventory, ItemFilter};
use crate::item::INFINITE_CHARGES;
use crate::recipe::ItemComp;

use super::{CompSelection, Resolution, UsageFrom};

/// Candidate alternatives for one requirement group
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComponentCandidates {
    pub player_has: Vec<ItemComp>,
    pub map_has: Vec<ItemComp>,
    pub mixed: Vec<ItemComp>,
    /// An alternative nearby storage supplies without limit
    pub infinite: Option<ItemComp>,
}

impl ComponentCandidates {
    pub fn len(&self) -> usize {
        self.player_has.len() + self.map_has.len() + self.mixed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0 && self.infinite.is_none()
    }
}

/// Whether `comp` is measured in charges rather than discrete items
pub(crate) fn by_charges(comp: &ItemComp, items: &dyn ItemOracle, pools: [&Inventory; 2]) -> bool {
    if comp.count <= 0 {
        return false;
    }
    items
        .template(&comp.item_type)
        .map(|t| t.count_by_charges)
        .or_else(|| pools.iter().find_map(|p| p.counts_by_charges(&comp.item_type)))
        .unwrap_or(false)
}

fn available(pool: &Inventory, comp: &ItemComp, by_charges: bool, filter: ItemFilter<'_>) -> i32 {
    pool.quantity_of(&comp.item_type, by_charges, filter)
}

/// Sort the alternatives of `group` by which pools can cover them
pub fn component_candidates(
    group: &[ItemComp],
    batch: i32,
    player: &Inventory,
    map: &Inventory,
    items: &dyn ItemOracle,
    filter: ItemFilter<'_>,
) -> ComponentCandidates {
    let mut candidates = ComponentCandidates::default();

    for comp in group {
        let count = comp.effective_count(batch);
        let charges = by_charges(comp, items, [player, map]);

        let on_map = available(map, comp, charges, filter);
        if charges && on_map == INFINITE_CHARGES {
            candidates.infinite = Some(comp.clone());
            return candidates;
        }
        let on_person = available(player, comp, charges, filter);

        let mut found = false;
        if on_person >= count {
            candidates.player_has.push(comp.clone());
            found = true;
        }
        if on_map >= count {
            candidates.map_has.push(comp.clone());
            found = true;
        }
        if !found && on_person.saturating_add(on_map) >= count {
            candidates.mixed.push(comp.clone());
        }
    }
    candidates
}

/// How a single alternative can be met
pub fn classify(
    comp: &ItemComp,
    batch: i32,
    player: &Inventory,
    map: &Inventory,
    items: &dyn ItemOracle,
    filter: ItemFilter<'_>,
) -> Resolution {
    let candidates = component_candidates(std::slice::from_ref(comp), batch, player, map, items, filter);
    if !candidates.player_has.is_empty() {
        Resolution::FromActor
    } else if candidates.infinite.is_some() || !candidates.map_has.is_empty() {
        Resolution::FromEnvironment
    } else if !candidates.mixed.is_empty() {
        Resolution::Mixed
    } else {
        Resolution::Unsatisfiable
    }
}

fn display_name(items: &dyn ItemOracle, comp: &ItemComp) -> String {
    items
        .template(&comp.item_type)
        .map(|t| t.name.clone())
        .unwrap_or_else(|| comp.item_type.to_string())
}

/// Choose one alternative of `group`, asking the crafter when there is a real choice
#[allow(clippy::too_many_arguments)]
pub fn select_item_component(
    group: &[ItemComp],
    batch: i32,
    player: &Inventory,
    map: &Inventory,
    items: &dyn ItemOracle,
    filter: ItemFilter<'_>,
    decider: &mut DecisionStrategy<'_>,
    can_cancel: bool,
) -> CompSelection<ItemComp> {
    let candidates = component_candidates(group, batch, player, map, items, filter);

    if let Some(comp) = &candidates.infinite {
        return CompSelection::new(UsageFrom::Map, comp.clone());
    }

    // A lone option, or an autonomous crafter, takes the first in preference order
    if candidates.len() == 1 || !decider.is_interactive() {
        if let Some(comp) = candidates.player_has.first() {
            return CompSelection::new(UsageFrom::Player, comp.clone());
        }
        if let Some(comp) = candidates.map_has.first() {
            return CompSelection::new(UsageFrom::Map, comp.clone());
        }
        if let Some(comp) = candidates.mixed.first() {
            return CompSelection::new(UsageFrom::Both, comp.clone());
        }
    }

    if !decider.is_interactive() {
        tracing::error!(?group, batch, "attempted a recipe with no available components");
        return CompSelection::new(UsageFrom::Cancel, group.first().cloned().unwrap_or_else(|| ItemComp::new("null", 0)));
    }

    let quantity = |pool: &Inventory, comp: &ItemComp| {
        let charges = by_charges(comp, items, [player, map]);
        available(pool, comp, charges, filter)
    };

    let mut entries = Vec::with_capacity(candidates.len());
    for comp in &candidates.map_has {
        entries.push(format!(
            "{} ({}/{} nearby)",
            display_name(items, comp),
            comp.effective_count(batch),
            quantity(map, comp)
        ));
    }
    for comp in &candidates.player_has {
        entries.push(format!(
            "{} ({}/{} on person)",
            display_name(items, comp),
            comp.effective_count(batch),
            quantity(player, comp)
        ));
    }
    for comp in &candidates.mixed {
        entries.push(format!(
            "{} ({}/{} nearby & on person)",
            display_name(items, comp),
            comp.effective_count(batch),
            quantity(map, comp).saturating_add(quantity(player, comp))
        ));
    }

    if entries.is_empty() {
        tracing::error!(?group, batch, "attempted a recipe with no available components");
        return CompSelection::new(UsageFrom::Cancel, group.first().cloned().unwrap_or_else(|| ItemComp::new("null", 0)));
    }

    let Some(mut choice) = decider.menu("Use which component?", &entries, can_cancel) else {
        return CompSelection::new(UsageFrom::Cancel, group[0].clone());
    };

    if choice < candidates.map_has.len() {
        return CompSelection::new(UsageFrom::Map, candidates.map_has[choice].clone());
    }
    choice -= candidates.map_has.len();
    if choice < candidates.player_has.len() {
        return CompSelection::new(UsageFrom::Player, candidates.player_has[choice].clone());
    }
    choice -= candidates.player_has.len();
    CompSelection::new(UsageFrom::Both, candidates.mixed[choice].clone())
}
