//! Re-validating a craft before work continues
//!
//! Failures destroy components and tools run dry. Before each tick the
//! craft is checked against what it originally consumed; missing components
//! are replaced from the crafting inventory with the crafter's consent, and
//! lost tool selections are made again at the continuation cost.

use super::state::AbandonReason;
use super::{InProgressCraft, Workshop};
use crate::inventory::any_item;
use crate::recipe::{Recipe, RequirementData};
use crate::resolve::{
    charges_for_continuing, consume_items, consume_tools, select_item_component, select_tool_component,
    CostAdjustment, UsageFrom,
};

impl Workshop<'_, '_> {
    /// Make sure the craft can take another tick of work
    pub fn continue_checkpoint(&mut self, craft: &mut InProgressCraft, recipe: &Recipe) -> Result<(), AbandonReason> {
        let continue_reqs = RequirementData::continue_requirements(&craft.comps_used, &craft.components);
        if !continue_reqs.is_empty() {
            self.replace_components(craft, recipe, &continue_reqs)?;
        }
        if !craft.tools_valid {
            self.reselect_tools(craft, recipe)?;
        }
        Ok(())
    }

    fn replace_components(
        &mut self,
        craft: &mut InProgressCraft,
        recipe: &Recipe,
        reqs: &RequirementData,
    ) -> Result<(), AbandonReason> {
        let items = self.env.items;
        let inv = self.crafting_inventory();
        // Continuation requirements already cover the whole batch
        let batch = 1;

        let any_state = recipe.component_filter(items, false);
        if !reqs.can_make_with_inventory(&inv, &any_state, batch, CostAdjustment::None) {
            self.env.bad(format!(
                "You don't have the required components to continue crafting!\n{}",
                reqs.list_missing(&inv, batch)
            ));
            return Err(AbandonReason::MissingComponents);
        }

        let question = format!("Consume the missing components and continue crafting?\n{}", reqs.list_all());
        if !self.env.decider.confirm(&question) {
            return Err(AbandonReason::Declined);
        }

        let fresh = recipe.component_filter(items, true);
        let fresh_suffices = reqs.can_make_with_inventory(&inv, &fresh, batch, CostAdjustment::None);
        if !fresh_suffices
            && !self
                .env
                .decider
                .confirm("Some components required to continue are rotten.\nContinue crafting anyway?")
        {
            return Err(AbandonReason::Declined);
        }
        let filter = recipe.component_filter(items, fresh_suffices);

        let held = self.crafter.held_items();
        let map_inv = self.map_snapshot();
        let mut selections = Vec::with_capacity(reqs.components.len());
        for group in &reqs.components {
            let selection =
                select_item_component(group, batch, &held, &map_inv, items, &filter, &mut self.env.decider, true);
            if selection.is_cancelled() {
                self.env.info("You stop crafting.");
                return Err(AbandonReason::Cancelled);
            }
            selections.push(selection);
        }

        let radius = self.config.pickup_range;
        for selection in &selections {
            let taken = consume_items(self.crafter, self.env.map, selection, batch, items, &filter, radius);
            craft.add_components(taken);
        }
        self.invalidate_inventory();
        craft.refresh_rot();
        tracing::debug!(craft = %craft.id, groups = selections.len(), "replaced lost components");
        Ok(())
    }

    fn reselect_tools(&mut self, craft: &mut InProgressCraft, recipe: &Recipe) -> Result<(), AbandonReason> {
        let batch = craft.batch_size;
        let next_step = recipe.requirements.continuation_tools(batch);
        let inv = self.crafting_inventory();
        if !next_step.can_make_with_inventory(&inv, &any_item, 1, CostAdjustment::None) {
            self.env.bad(format!(
                "You don't have the necessary tools to continue crafting!\n{}",
                next_step.list_missing(&inv, 1)
            ));
            return Err(AbandonReason::MissingTools);
        }

        let items = self.env.items;
        let held = self.crafter.tool_pool();
        let map_inv = self.map_snapshot();
        let mut selections = Vec::with_capacity(recipe.requirements.tools.len());
        for group in &recipe.requirements.tools {
            match select_tool_component(
                group,
                batch,
                Some(&held),
                &map_inv,
                CostAdjustment::ContinueOnly,
                items,
                &mut self.env.decider,
                true,
            ) {
                Some(selection) if !selection.is_cancelled() => selections.push(selection),
                _ => return Err(AbandonReason::Cancelled),
            }
        }
        craft.tool_selections = selections;
        craft.tools_valid = true;
        Ok(())
    }

    /// Pay the tool charges of `steps` progress checkpoints
    ///
    /// Everything is checked before anything is drained. On a shortage the
    /// craft's tool selections are marked stale and nothing is consumed.
    pub fn consume_tool_steps(&mut self, craft: &mut InProgressCraft, steps: i32) -> bool {
        let batch = craft.batch_size;
        let step_cost = |count: i32| {
            if count > 0 {
                charges_for_continuing(count * batch) * steps
            } else {
                count
            }
        };

        let held = self.crafter.tool_pool();
        let map_inv = self.map_snapshot();
        for selection in &craft.tool_selections {
            let type_id = &selection.comp.item_type;
            let name = self
                .env
                .items
                .template(type_id)
                .map(|t| t.name.clone())
                .unwrap_or_else(|| type_id.to_string());
            if selection.comp.count > 0 {
                let count = step_cost(selection.comp.count);
                let enough = match selection.use_from {
                    UsageFrom::Player => held.has_charges(type_id, count),
                    UsageFrom::Map => map_inv.has_charges(type_id, count),
                    _ => true,
                };
                if !enough {
                    self.env
                        .bad(format!("You have insufficient {} charges and can't continue crafting", name));
                    craft.tools_valid = false;
                    return false;
                }
            } else if !held.has_tools(type_id, 1) && !map_inv.has_tools(type_id, 1) {
                self.env
                    .bad(format!("You no longer have a {} and can't continue crafting", name));
                craft.tools_valid = false;
                return false;
            }
        }

        let radius = self.config.pickup_range;
        for selection in &craft.tool_selections {
            let mut step = selection.clone();
            step.comp.count = step_cost(selection.comp.count);
            consume_tools(self.crafter, self.env.map, &step, 1, radius);
        }
        self.invalidate_inventory();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::craft::fixture::Fixture;
    use crate::core::types::{ItemTypeId, RecipeId, Tripoint};
    use crate::env::ScriptedPrompts;
    use crate::recipe::{ItemComp, ToolComp};
    use crate::resolve::CompSelection;
    use crate::speed::{BenchLocation, BenchType};

    fn shelf_craft(fx: &Fixture, planks: usize) -> InProgressCraft {
        let mut craft = InProgressCraft::new(
            "shelf".into(),
            "in progress shelf",
            1,
            BenchLocation::new(BenchType::Hands, Tripoint::default()),
        );
        craft.add_components((0..planks).map(|_| fx.spawn("plank")));
        craft.comps_used = vec![CompSelection::new(UsageFrom::Player, ItemComp::new("plank", 4))];
        craft
    }

    fn shelf(fx: &Fixture) -> Recipe {
        fx.recipes.get(&RecipeId::from("shelf")).cloned().expect("shelf")
    }

    #[test]
    fn test_intact_craft_passes() {
        let mut fx = Fixture::new();
        let recipe = shelf(&fx);
        let mut craft = shelf_craft(&fx, 4);
        assert_eq!(fx.run(|ws| ws.continue_checkpoint(&mut craft, &recipe)), Ok(()));
    }

    #[test]
    fn test_lost_planks_are_replaced() {
        let mut fx = Fixture::new();
        for _ in 0..3 {
            let plank = fx.spawn("plank");
            fx.crafter.carried.add(plank);
        }
        let recipe = shelf(&fx);
        let mut craft = shelf_craft(&fx, 2);
        assert_eq!(fx.run(|ws| ws.continue_checkpoint(&mut craft, &recipe)), Ok(()));
        assert_eq!(craft.components.len(), 4);
        assert_eq!(fx.crafter.carried.amount_of(&ItemTypeId::from("plank"), &any_item), 1);
    }

    #[test]
    fn test_missing_planks_abandon() {
        let mut fx = Fixture::new();
        let recipe = shelf(&fx);
        let mut craft = shelf_craft(&fx, 1);
        assert_eq!(
            fx.run(|ws| ws.continue_checkpoint(&mut craft, &recipe)),
            Err(AbandonReason::MissingComponents)
        );
        assert!(fx.log.contains("You don't have the required components to continue crafting!"));
    }

    #[test]
    fn test_declined_replacement() {
        let mut fx = Fixture::new();
        fx.prompts = Some(ScriptedPrompts::new().answer_yn(false));
        for _ in 0..3 {
            let plank = fx.spawn("plank");
            fx.crafter.carried.add(plank);
        }
        let recipe = shelf(&fx);
        let mut craft = shelf_craft(&fx, 1);
        assert_eq!(
            fx.run(|ws| ws.continue_checkpoint(&mut craft, &recipe)),
            Err(AbandonReason::Declined)
        );
        assert_eq!(craft.components.len(), 1);
    }

    #[test]
    fn test_tool_steps_drain_and_run_dry() {
        let mut fx = Fixture::new();
        let hotplate = fx.spawn("hotplate").with_charges(4);
        fx.crafter.carried.add(hotplate);
        let mut craft = shelf_craft(&fx, 4);
        craft.batch_size = 2;
        // 20 charges per batch unit: one per checkpoint at batch 2 is 2 charges
        craft.tool_selections = vec![CompSelection::new(UsageFrom::Player, ToolComp::new("hotplate", 20))];

        assert!(fx.run(|ws| ws.consume_tool_steps(&mut craft, 1)));
        assert_eq!(fx.crafter.carried.charges_of(&ItemTypeId::from("hotplate"), &any_item), 2);

        assert!(!fx.run(|ws| ws.consume_tool_steps(&mut craft, 2)));
        assert!(!craft.tools_valid);
        assert_eq!(fx.crafter.carried.charges_of(&ItemTypeId::from("hotplate"), &any_item), 2);
        assert!(fx.log.contains("insufficient hotplate charges"));
    }

    #[test]
    fn test_stale_tools_are_reselected() {
        let mut fx = Fixture::new();
        let hotplate = fx.spawn("hotplate").with_charges(50);
        fx.crafter.carried.add(hotplate);
        let mut recipe = shelf(&fx);
        recipe.requirements.tools = vec![vec![ToolComp::new("hotplate", 20)]];
        let mut craft = shelf_craft(&fx, 4);
        craft.tools_valid = false;
        assert_eq!(fx.run(|ws| ws.continue_checkpoint(&mut craft, &recipe)), Ok(()));
        assert!(craft.tools_valid);
        assert_eq!(craft.tool_selections.len(), 1);
        assert_eq!(craft.tool_selections[0].use_from, UsageFrom::Player);
    }
}
