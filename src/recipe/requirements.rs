//! Requirement lists - tools, qualities and components with alternatives
//!
//! Each requirement group is a list of alternatives; a group is met when
//! any one alternative is met.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::core::types::{ItemTypeId, QualityId};
use crate::inventory::{any_item, Inventory, ItemFilter};
use crate::item::Item;
use crate::resolve::charges::{charges_for, CostAdjustment};
use crate::resolve::CompSelection;

/// A component alternative
///
/// Positive counts are per batch unit; negative counts are absolute.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemComp {
    #[serde(rename = "item")]
    pub item_type: ItemTypeId,
    pub count: i32,
}

impl ItemComp {
    pub fn new(item_type: impl Into<ItemTypeId>, count: i32) -> Self {
        Self {
            item_type: item_type.into(),
            count,
        }
    }

    /// Total units needed for `batch`
    pub fn effective_count(&self, batch: i32) -> i32 {
        if self.count > 0 {
            self.count * batch
        } else {
            self.count.abs()
        }
    }
}

/// A tool alternative; `count > 0` is a charge cost per batch unit
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ToolComp {
    #[serde(rename = "item")]
    pub item_type: ItemTypeId,
    #[serde(default)]
    pub count: i32,
}

impl ToolComp {
    pub fn new(item_type: impl Into<ItemTypeId>, count: i32) -> Self {
        Self {
            item_type: item_type.into(),
            count,
        }
    }

    pub fn uses_charges(&self) -> bool {
        self.count > 0
    }

    fn is_met(&self, inv: &Inventory, batch: i32, cost: CostAdjustment) -> bool {
        if self.uses_charges() {
            let needed = charges_for(cost, (self.count * batch).max(1));
            inv.has_charges(&self.item_type, needed)
        } else {
            inv.has_tools(&self.item_type, 1)
        }
    }
}

/// A tool quality at a minimum level
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QualityRequirement {
    pub quality: QualityId,
    pub level: i32,
    #[serde(default = "default_quality_count")]
    pub count: i32,
}

fn default_quality_count() -> i32 {
    1
}

impl QualityRequirement {
    pub fn new(quality: impl Into<QualityId>, level: i32) -> Self {
        Self {
            quality: quality.into(),
            level,
            count: 1,
        }
    }

    pub fn has(&self, inv: &Inventory) -> bool {
        inv.has_quality(&self.quality, self.level, self.count)
    }
}

impl std::fmt::Display for QualityRequirement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} tool of {} quality {}", self.count, self.quality, self.level)
    }
}

/// Everything a recipe needs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequirementData {
    #[serde(default)]
    pub tools: Vec<Vec<ToolComp>>,
    #[serde(default)]
    pub qualities: Vec<Vec<QualityRequirement>>,
    #[serde(default)]
    pub components: Vec<Vec<ItemComp>>,
}

fn component_met(comp: &ItemComp, inv: &Inventory, filter: ItemFilter<'_>, batch: i32) -> bool {
    let by_charges = inv.counts_by_charges(&comp.item_type).unwrap_or(false);
    inv.quantity_of(&comp.item_type, by_charges, filter) >= comp.effective_count(batch)
}

impl RequirementData {
    pub fn new(
        tools: Vec<Vec<ToolComp>>,
        qualities: Vec<Vec<QualityRequirement>>,
        components: Vec<Vec<ItemComp>>,
    ) -> Self {
        Self {
            tools,
            qualities,
            components,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty() && self.qualities.is_empty() && self.components.is_empty()
    }

    /// Whether `inv` satisfies every group for `batch`
    pub fn can_make_with_inventory(
        &self,
        inv: &Inventory,
        filter: ItemFilter<'_>,
        batch: i32,
        cost: CostAdjustment,
    ) -> bool {
        self.tools
            .iter()
            .all(|group| group.iter().any(|t| t.is_met(inv, batch, cost)))
            && self
                .qualities
                .iter()
                .all(|group| group.iter().any(|q| q.has(inv)))
            && self
                .components
                .iter()
                .all(|group| group.iter().any(|c| component_met(c, inv, filter, batch)))
    }

    /// Human readable list of the groups `inv` does not satisfy
    pub fn list_missing(&self, inv: &Inventory, batch: i32) -> String {
        let mut lines = Vec::new();
        for group in &self.tools {
            if !group.iter().any(|t| t.is_met(inv, batch, CostAdjustment::None)) {
                lines.push(format_alternatives(group.iter().map(|t| {
                    if t.uses_charges() {
                        format!("{} ({} charges)", t.item_type, t.count * batch)
                    } else {
                        t.item_type.to_string()
                    }
                })));
            }
        }
        for group in &self.qualities {
            if !group.iter().any(|q| q.has(inv)) {
                lines.push(format_alternatives(group.iter().map(|q| q.to_string())));
            }
        }
        for group in &self.components {
            if !group.iter().any(|c| component_met(c, inv, &any_item, batch)) {
                lines.push(format_alternatives(
                    group
                        .iter()
                        .map(|c| format!("{} {}", c.effective_count(batch), c.item_type)),
                ));
            }
        }
        lines.join("\n")
    }

    /// Human readable list of every component group
    pub fn list_all(&self) -> String {
        self.components
            .iter()
            .map(|group| {
                format_alternatives(
                    group
                        .iter()
                        .map(|c| format!("{} {}", c.effective_count(1), c.item_type)),
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Components needed to restore a craft to what it originally consumed
    ///
    /// `comps_used` holds absolute totals; `remaining` is what the craft
    /// still owns. The result is expressed for a batch size of 1.
    pub fn continue_requirements(comps_used: &[CompSelection<ItemComp>], remaining: &[Item]) -> Self {
        let mut available: AHashMap<&ItemTypeId, i32> = AHashMap::new();
        for item in remaining {
            *available.entry(&item.type_id).or_insert(0) += item.quantity();
        }

        let mut components = Vec::new();
        for selection in comps_used {
            let needed = selection.comp.count.abs();
            let have = available.entry(&selection.comp.item_type).or_insert(0);
            let covered = needed.min(*have);
            *have -= covered;
            if needed > covered {
                components.push(vec![ItemComp::new(
                    selection.comp.item_type.clone(),
                    needed - covered,
                )]);
            }
        }

        Self {
            components,
            ..Self::default()
        }
    }

    /// Tool groups costed for the next continuation step
    pub fn continuation_tools(&self, batch: i32) -> Self {
        let tools = self
            .tools
            .iter()
            .map(|group| {
                group
                    .iter()
                    .map(|tool| {
                        let mut adjusted = tool.clone();
                        if adjusted.count > 0 {
                            adjusted.count = charges_for(
                                CostAdjustment::ContinueOnly,
                                adjusted.count * batch,
                            )
                            .max(1);
                        }
                        adjusted
                    })
                    .collect()
            })
            .collect();
        Self {
            tools,
            ..Self::default()
        }
    }
}

fn format_alternatives(options: impl Iterator<Item = String>) -> String {
    format!("> {}", options.collect::<Vec<_>>().join(" OR "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::UsageFrom;

    fn stack(type_id: &str, charges: i32) -> Item {
        let mut item = Item::new(type_id).with_charges(charges);
        item.count_by_charges = true;
        item
    }

    fn shelf_requirements() -> RequirementData {
        RequirementData::new(
            vec![vec![ToolComp::new("hammer", 0)]],
            vec![vec![QualityRequirement::new("SAW_W", 1)]],
            vec![
                vec![ItemComp::new("plank", 2)],
                vec![ItemComp::new("nail", 8), ItemComp::new("glue", 1)],
            ],
        )
    }

    fn saw() -> Item {
        let mut saw = Item::new("saw");
        saw.qualities.push(("SAW_W".into(), 2));
        saw
    }

    #[test]
    fn test_effective_count() {
        assert_eq!(ItemComp::new("plank", 2).effective_count(3), 6);
        assert_eq!(ItemComp::new("plank", -2).effective_count(3), 2);
    }

    #[test]
    fn test_can_make_with_inventory() {
        let reqs = shelf_requirements();
        let inv = Inventory::from_items([
            Item::new("hammer"),
            saw(),
            Item::new("plank"),
            Item::new("plank"),
            stack("nail", 8),
        ]);
        assert!(reqs.can_make_with_inventory(&inv, &any_item, 1, CostAdjustment::None));
        assert!(!reqs.can_make_with_inventory(&inv, &any_item, 2, CostAdjustment::None));
    }

    #[test]
    fn test_list_missing() {
        let reqs = shelf_requirements();
        let inv = Inventory::from_items([Item::new("hammer"), saw()]);
        let missing = reqs.list_missing(&inv, 1);
        assert!(missing.contains("2 plank"));
        assert!(missing.contains("8 nail OR 1 glue"));
        assert!(!missing.contains("hammer"));
    }

    #[test]
    fn test_tool_charge_costing() {
        let reqs = RequirementData::new(vec![vec![ToolComp::new("welder", 10)]], vec![], vec![]);
        let mut welder = Item::new("welder").with_charges(1);
        welder.ammo_type = Some("battery".into());
        let inv = Inventory::from_items([welder]);
        // Full cost 20, starting cost 1
        assert!(reqs.can_make_with_inventory(&inv, &any_item, 2, CostAdjustment::StartOnly));
        assert!(!reqs.can_make_with_inventory(&inv, &any_item, 2, CostAdjustment::None));
    }

    #[test]
    fn test_continue_requirements() {
        let used = vec![
            CompSelection::new(UsageFrom::Player, ItemComp::new("plank", 4)),
            CompSelection::new(UsageFrom::Map, ItemComp::new("nail", 10)),
        ];
        let remaining = vec![Item::new("plank"), Item::new("plank"), Item::new("plank"), stack("nail", 10)];
        let reqs = RequirementData::continue_requirements(&used, &remaining);
        assert_eq!(reqs.components, vec![vec![ItemComp::new("plank", 1)]]);
        assert!(reqs.tools.is_empty());

        let nothing_missing = RequirementData::continue_requirements(&used[1..], &remaining);
        assert!(nothing_missing.is_empty());
    }

    #[test]
    fn test_continuation_tools() {
        let reqs = RequirementData::new(
            vec![vec![ToolComp::new("welder", 10), ToolComp::new("hammer", 0)]],
            vec![],
            vec![],
        );
        let adjusted = reqs.continuation_tools(1);
        // 10 / 20 rounds to zero, but a continuation always costs at least one charge
        assert_eq!(adjusted.tools[0][0].count, 1);
        assert_eq!(adjusted.tools[0][1].count, 0);
        assert_eq!(reqs.continuation_tools(4).tools[0][0].count, 2);
    }
}
