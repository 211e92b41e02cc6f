//! Tool selection
//!
//! Tools without a charge cost always win. Among charged tools, those that
//! already hold the full cost come first, then the ones with the largest
//! ideal-to-available ratio, so nearly spent tools are used up before
//! well-stocked ones.

use std::cmp::Reverse;

use ordered_float::OrderedFloat;

use crate::env::{DecisionStrategy, ItemOracle};
use crate::inventory::{any_item, Inventory};
use crate::recipe::ToolComp;

use super::charges::{charges_for, CostAdjustment};
use super::{CompSelection, UsageFrom};

/// A tool alternative found in one pool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailableTool {
    pub selection: CompSelection<ToolComp>,
    /// Charges the pool holds
    pub charges: i32,
    /// Charges the whole craft would use
    pub ideal: i32,
}

/// Every usable tool alternative, best first
pub fn find_tool_component(
    tools: &[ToolComp],
    batch: i32,
    player: Option<&Inventory>,
    map: &Inventory,
    cost: CostAdjustment,
) -> Vec<AvailableTool> {
    let mut available = Vec::new();

    for tool in tools {
        if tool.uses_charges() {
            let full = (tool.count * batch).max(1);
            let needed = charges_for(cost, full);
            if let Some(player) = player {
                if player.has_charges(&tool.item_type, needed) {
                    available.push(AvailableTool {
                        selection: CompSelection::new(UsageFrom::Player, tool.clone()),
                        charges: player.charges_of(&tool.item_type, &any_item),
                        ideal: full,
                    });
                }
            }
            if map.has_charges(&tool.item_type, needed) {
                available.push(AvailableTool {
                    selection: CompSelection::new(UsageFrom::Map, tool.clone()),
                    charges: map.charges_of(&tool.item_type, &any_item),
                    ideal: full,
                });
            }
        } else if player.is_some_and(|p| p.has_tools(&tool.item_type, 1)) || map.has_tools(&tool.item_type, 1) {
            available.push(AvailableTool {
                selection: CompSelection::new(UsageFrom::None, tool.clone()),
                charges: 0,
                ideal: 0,
            });
        }
    }

    available.sort_by_key(|t| {
        (
            t.selection.use_from != UsageFrom::None,
            t.charges < t.ideal,
            Reverse(OrderedFloat(t.ideal as f32 / t.charges as f32)),
        )
    });
    available
}

/// Pick one of the found tools
pub fn query_tool_selection(
    available: &[AvailableTool],
    items: &dyn ItemOracle,
    decider: &mut DecisionStrategy<'_>,
    can_cancel: bool,
) -> Option<CompSelection<ToolComp>> {
    let first = available.first()?;
    if first.selection.use_from == UsageFrom::None || available.len() == 1 {
        return Some(first.selection.clone());
    }
    if !decider.is_interactive() {
        let held = available
            .iter()
            .find(|t| t.selection.use_from == UsageFrom::Player)
            .unwrap_or(first);
        return Some(held.selection.clone());
    }

    let entries: Vec<String> = available
        .iter()
        .map(|tool| {
            let comp = &tool.selection.comp;
            let name = items
                .template(&comp.item_type)
                .map(|t| t.name.clone())
                .unwrap_or_else(|| comp.item_type.to_string());
            let nearby = tool.selection.use_from == UsageFrom::Map;
            if tool.ideal > 1 {
                let place = if nearby { "nearby" } else { "on person" };
                format!("{} ({}/{} charges {})", name, tool.ideal, tool.charges, place)
            } else if nearby {
                format!("{} (nearby)", name)
            } else {
                name
            }
        })
        .collect();

    match decider.menu("Use which tool?", &entries, can_cancel) {
        Some(choice) => Some(available[choice].selection.clone()),
        None => Some(CompSelection::new(UsageFrom::Cancel, first.selection.comp.clone())),
    }
}

/// Find and pick a tool for one requirement group
///
/// `None` means no alternative is available at all.
#[allow(clippy::too_many_arguments)]
pub fn select_tool_component(
    tools: &[ToolComp],
    batch: i32,
    player: Option<&Inventory>,
    map: &Inventory,
    cost: CostAdjustment,
    items: &dyn ItemOracle,
    decider: &mut DecisionStrategy<'_>,
    can_cancel: bool,
) -> Option<CompSelection<ToolComp>> {
    let available = find_tool_component(tools, batch, player, map, cost);
    query_tool_selection(&available, items, decider, can_cancel)
}
