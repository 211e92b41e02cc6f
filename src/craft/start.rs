//! Gates and the start of a craft

use super::bench::{best_bench_here, find_best_bench};
use super::placement::place_craft;
use super::state::InProgressCraft;
use super::Workshop;
use crate::core::error::{CraftError, Result};
use crate::recipe::{ItemComp, Recipe, CATEGORY_BUILDING};
use crate::resolve::{
    charges_for_starting, consume_items, consume_tools, select_item_component, select_tool_component,
    CompSelection, CostAdjustment,
};
use crate::speed::{
    crafting_speed_multiplier, has_morale_to_craft, lighting_crafting_speed_multiplier, BenchLocation, BenchType,
};

impl Workshop<'_, '_> {
    /// Everything that must hold before a craft of `batch` units may start
    ///
    /// Nothing is narrated or consumed.
    pub fn check_start(&mut self, recipe: &Recipe, batch: i32) -> Result<()> {
        if batch < 1 {
            return Err(CraftError::InvalidBatch(batch));
        }
        if recipe.category == CATEGORY_BUILDING {
            return Err(CraftError::CategoryNotImplemented(recipe.category.clone()));
        }
        if !has_morale_to_craft(self.crafter, self.config) {
            return Err(CraftError::MoraleTooLow);
        }
        if lighting_crafting_speed_multiplier(self.crafter, recipe, self.config) <= 0.0 {
            return Err(CraftError::TooDark);
        }
        if crafting_speed_multiplier(self.crafter, recipe, false, self.config) <= 0.0 {
            return Err(CraftError::TooSlow(recipe.result_name(self.env.items)));
        }

        let inv = self.crafting_inventory();
        let filter = recipe.component_filter(self.env.items, false);
        if !recipe
            .requirements
            .can_make_with_inventory(&inv, &filter, batch, CostAdjustment::StartOnly)
        {
            return Err(CraftError::MissingRequirements(recipe.requirements.list_missing(&inv, batch)));
        }
        Ok(())
    }

    /// Start a craft: select and consume components and starting tool charges
    ///
    /// Gate failures and cancellations are narrated and returned; nothing
    /// is consumed unless the craft actually starts.
    pub fn start(&mut self, recipe: &Recipe, batch: i32) -> Result<InProgressCraft> {
        if let Err(err) = self.check_start(recipe, batch) {
            self.env.bad(err.to_string());
            return Err(err);
        }
        let items = self.env.items;

        let inv = self.crafting_inventory();
        let fresh = recipe.component_filter(items, true);
        let fresh_suffices =
            recipe
                .requirements
                .can_make_with_inventory(&inv, &fresh, batch, CostAdjustment::StartOnly);
        if !fresh_suffices
            && !self
                .env
                .decider
                .confirm("Some components used to craft this are rotten.  Continue crafting anyway?")
        {
            return Err(CraftError::Cancelled);
        }
        let filter = recipe.component_filter(items, fresh_suffices);

        if self.env.is_interactive() && !self.check_eligible_containers(recipe, batch) {
            return Err(CraftError::Cancelled);
        }

        // Choose everything before taking anything
        let held = self.crafter.held_items();
        let map_inv = self.map_snapshot();
        let mut comp_selections = Vec::with_capacity(recipe.requirements.components.len());
        for group in &recipe.requirements.components {
            let selection =
                select_item_component(group, batch, &held, &map_inv, items, &filter, &mut self.env.decider, true);
            if selection.is_cancelled() {
                return Err(CraftError::Cancelled);
            }
            comp_selections.push(selection);
        }

        let tool_pool = self.crafter.tool_pool();
        let mut tool_selections = Vec::with_capacity(recipe.requirements.tools.len());
        for group in &recipe.requirements.tools {
            match select_tool_component(
                group,
                batch,
                Some(&tool_pool),
                &map_inv,
                CostAdjustment::StartOnly,
                items,
                &mut self.env.decider,
                true,
            ) {
                Some(selection) if selection.is_cancelled() => return Err(CraftError::Cancelled),
                Some(selection) => tool_selections.push(selection),
                None => {
                    let err = CraftError::MissingRequirements(recipe.requirements.list_missing(&inv, batch));
                    self.env.bad(err.to_string());
                    return Err(err);
                }
            }
        }

        let name = format!("in progress {}", recipe.result_name(items));
        let origin = self.crafter.position;
        let mut craft = InProgressCraft::new(
            recipe.id.clone(),
            name,
            batch,
            BenchLocation::new(BenchType::Hands, origin),
        );

        let radius = self.config.pickup_range;
        for selection in &comp_selections {
            let taken = consume_items(self.crafter, self.env.map, selection, batch, items, &filter, radius);
            craft.add_components(taken);
            // Totals, so continuation works for any batch size
            craft.comps_used.push(CompSelection::new(
                selection.use_from,
                ItemComp::new(selection.comp.item_type.clone(), selection.comp.effective_count(batch)),
            ));
        }
        for selection in &tool_selections {
            if selection.comp.uses_charges() {
                let mut up_front = selection.clone();
                up_front.comp.count = charges_for_starting(selection.comp.count * batch);
                consume_tools(self.crafter, self.env.map, &up_front, 1, radius);
            }
        }
        craft.tool_selections = tool_selections;
        self.invalidate_inventory();
        craft.refresh_rot();

        if let Some(skill) = &recipe.skill_used {
            if f64::from(self.crafter.skill_level(skill)) > f64::from(recipe.difficulty) * 1.25 {
                self.env.info(format!(
                    "You feel that {} tasks of this level are becoming trivial.",
                    skill
                ));
            }
        }

        let (mass, volume) = (craft.mass(), craft.volume());
        craft.bench = find_best_bench(self.crafter, mass, volume, &*self.env.map, self.config);
        let (_, best_here) = best_bench_here(
            mass,
            volume,
            craft.bench.position,
            craft.bench.bench_type == BenchType::Hands,
            &*self.env.map,
            self.config,
        );
        if best_here < 1.0 {
            self.env.info(format!(
                "You can't hold {} in your hands and there is no good work surface nearby.",
                craft.name
            ));
        }
        craft.location = place_craft(self.crafter, mass, volume, &*self.env.map, self.config.drop_radius);

        self.schedule_failure(&mut craft, recipe);
        self.env.neutral(format!("You start working on the {}.", craft.name));
        tracing::info!(
            crafter = %self.crafter.name,
            recipe = %recipe.id,
            batch,
            craft = %craft.id,
            "craft started"
        );
        Ok(craft)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{ItemTypeId, RecipeId, SkillId};
    use crate::craft::state::CraftLocation;
    use crate::env::ScriptedPrompts;
    use crate::inventory::any_item;

    fn shelf(fx: &crate::craft::fixture::Fixture) -> Recipe {
        fx.recipes.get(&RecipeId::from("shelf")).cloned().expect("shelf")
    }

    #[test]
    fn test_start_consumes_components() {
        let mut fx = crate::craft::fixture::Fixture::new();
        fx.stock_shelf();
        let recipe = shelf(&fx);
        let craft = fx.run(|ws| ws.start(&recipe, 1)).expect("craft should start");

        assert_eq!(craft.components.len(), 5);
        assert_eq!(craft.comps_used.len(), 2);
        assert_eq!(craft.comps_used[1].comp, ItemComp::new("nail", 10));
        assert_eq!(craft.location, CraftLocation::Carried);
        assert!(craft.next_failure_point.is_some());
        assert_eq!(craft.name, "in progress shelf");
        assert_eq!(fx.crafter.carried.amount_of(&ItemTypeId::from("plank"), &any_item), 0);
        assert!(fx.log.contains("You start working on the in progress shelf."));
    }

    #[test]
    fn test_gates() {
        let mut fx = crate::craft::fixture::Fixture::new();
        let recipe = shelf(&fx);

        assert_eq!(fx.run(|ws| ws.check_start(&recipe, 0)), Err(CraftError::InvalidBatch(0)));
        assert!(matches!(
            fx.run(|ws| ws.check_start(&recipe, 1)),
            Err(CraftError::MissingRequirements(_))
        ));

        fx.stock_shelf();
        assert_eq!(fx.run(|ws| ws.check_start(&recipe, 1)), Ok(()));

        fx.crafter.morale = -80;
        assert_eq!(fx.run(|ws| ws.check_start(&recipe, 1)), Err(CraftError::MoraleTooLow));
        fx.crafter.morale = 0;

        fx.crafter.vision_mod = 11.0;
        assert_eq!(fx.run(|ws| ws.check_start(&recipe, 1)), Err(CraftError::TooDark));
        fx.crafter.vision_mod = 1.0;

        let mut building = recipe.clone();
        building.category = CATEGORY_BUILDING.into();
        assert!(matches!(
            fx.run(|ws| ws.check_start(&building, 1)),
            Err(CraftError::CategoryNotImplemented(_))
        ));
    }

    #[test]
    fn test_failed_gate_is_narrated_and_consumes_nothing() {
        let mut fx = crate::craft::fixture::Fixture::new();
        let plank = fx.spawn("plank");
        fx.crafter.carried.add(plank);
        let recipe = shelf(&fx);
        let result = fx.run(|ws| ws.start(&recipe, 1));
        assert!(matches!(result, Err(CraftError::MissingRequirements(_))));
        assert!(fx.log.contains("You can no longer make that craft!"));
        assert_eq!(fx.crafter.carried.len(), 1);
    }

    #[test]
    fn test_rotten_components_need_consent() {
        let mut fx = crate::craft::fixture::Fixture::new();
        fx.prompts = Some(ScriptedPrompts::new().answer_yn(false));
        let pot = fx.spawn("pot");
        let water = fx.spawn("water").with_charges(2);
        let hotplate = fx.spawn("hotplate").with_charges(100);
        let mut vegetable = fx.spawn("vegetable");
        vegetable.relative_rot = 1.5;
        fx.crafter.carried.add(pot);
        fx.crafter.carried.add(vegetable.clone());
        fx.crafter.carried.add(vegetable);
        fx.crafter.carried.add(water);
        fx.crafter.pseudo_tools.push(hotplate);
        let recipe = fx.recipes.get(&RecipeId::from("vegetable_soup")).cloned().expect("soup");

        assert_eq!(fx.run(|ws| ws.start(&recipe, 1)).map(|c| c.id), Err(CraftError::Cancelled));
        let asked = fx.prompts.as_ref().map(|p| p.asked().to_vec()).unwrap_or_default();
        assert!(asked[0].contains("rotten"));
        assert_eq!(fx.crafter.carried.amount_of(&ItemTypeId::from("vegetable"), &any_item), 2);
    }

    #[test]
    fn test_skill_cap_notice() {
        let mut fx = crate::craft::fixture::Fixture::new();
        fx.stock_shelf();
        fx.crafter.skills.set_level(SkillId::from("fabrication"), 5);
        let recipe = shelf(&fx);
        fx.run(|ws| ws.start(&recipe, 1)).expect("craft should start");
        assert!(fx.log.contains("becoming trivial"));
    }
}
