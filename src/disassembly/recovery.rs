//! Recovering components from a disassembled item

use rand::Rng;

use super::DisassemblyReport;
use crate::craft::placement::place_in_vehicle_or_map;
use crate::craft::{Placement, Workshop};
use crate::env::ItemOracle;
use crate::item::{flags, Item};
use crate::recipe::{Recipe, RecipeFlag};
use crate::resolve::{consume_tools, remove_ammo, select_tool_component, CostAdjustment};
use crate::roll::{x_in_y, DicePool};

/// A liquid inside the container it normally comes in
fn in_its_container(liquid: Item, items: &dyn ItemOracle) -> Item {
    match items.template(&liquid.type_id).and_then(|t| t.default_container.clone()) {
        Some(container) => {
            let mut holder = items.spawn(&container);
            holder.contents.push(liquid);
            holder
        }
        None => liquid,
    }
}

/// Components of an item with no recorded provenance, per the reverse recipe
///
/// Only the first alternative of each group is produced. Charge stacks and
/// liquids come out as one compressed stack.
pub fn reconstruct(recipe: &Recipe, batches: i32, items: &dyn ItemOracle) -> Vec<Item> {
    let contained = recipe.has_flag(RecipeFlag::UncraftLiquidsContained);
    let full_magazines = recipe.has_flag(RecipeFlag::FullMagazine);
    let mut components = Vec::new();

    for comp in recipe.requirements.components.iter().filter_map(|group| group.first()) {
        let mut count = comp.effective_count(batches);
        let mut part = items.spawn(&comp.item_type);
        let liquid = part.is_liquid();

        if contained && liquid && part.charges != 0 {
            count /= part.charges;
            if count != 0 {
                part = in_its_container(part, items);
            }
        } else if part.count_by_charges || liquid {
            part.charges = count;
            count = 1;
        } else if part.ammo_type.is_some() && !part.has_flag(flags::NO_UNLOAD) && part.charges > 0 {
            // Unloadable tools come out empty
            part.charges = 0;
        }

        if full_magazines {
            if let Some(capacity) = items.template(&comp.item_type).and_then(|t| t.magazine_capacity) {
                part.charges = capacity;
            }
        }
        components.extend(std::iter::repeat(part).take(count.max(0) as usize));
    }
    components
}

impl Workshop<'_, '_> {
    fn consume_disassembly_tools(&mut self, recipe: &Recipe) {
        let items = self.env.items;
        let held = self.crafter.tool_pool();
        let map_inv = self.map_snapshot();
        for group in &recipe.requirements.tools {
            let selection = select_tool_component(
                group,
                1,
                Some(&held),
                &map_inv,
                CostAdjustment::None,
                items,
                &mut self.env.decider,
                false,
            );
            match selection {
                Some(selection) => consume_tools(self.crafter, self.env.map, &selection, 1, self.config.pickup_range),
                None => tracing::warn!(recipe = %recipe.id, "disassembly tool vanished after validation"),
            }
        }
    }

    /// Maybe learn the forward recipe from having taken its result apart
    fn learn_from_disassembly(&mut self, recipe: &Recipe, name: &str) -> bool {
        if recipe.learn_by_disassembly.is_empty() || self.crafter.knows_recipe(&recipe.id) {
            return false;
        }
        if !self.crafter.can_learn_by_disassembly(recipe) {
            self.env
                .info("If you had better skills, you might learn a recipe next time.");
            return false;
        }

        let margin = f64::from(1 + self.crafter.exceeds_recipe_requirements(recipe));
        let skill_bonus = margin * (0.9 + f64::from(self.crafter.intelligence) * 0.025).max(1.0);
        if x_in_y(skill_bonus, 4.0, &mut *self.rng) {
            self.crafter.learn_recipe(recipe.id.clone());
            self.env
                .good(format!("You learned a recipe for {} from disassembling it!", name));
            true
        } else {
            self.env.info(format!(
                "You might be able to learn a recipe for {} if you disassemble another.",
                name
            ));
            false
        }
    }

    /// Take `batches` batches of `item` apart and distribute what survives
    ///
    /// Ammunition and mods come out before any roll. Each component then
    /// needs the skill roll (skipped at difficulty 0) and the damage roll.
    pub fn complete_disassemble(&mut self, mut item: Item, recipe: &Recipe, batches: i32) -> DisassemblyReport {
        let items = self.env.items;
        let recover_chance = self.config.disassembly_damage_base.powi(item.damage_level).min(1.0);

        self.env
            .neutral(format!("You disassemble the {} into its components.", item.name));
        remove_ammo(std::slice::from_mut(&mut item), self.crafter, items);

        if item.count_by_charges {
            item.charges -= recipe.disassembly_batch_size() * batches;
        }
        self.consume_disassembly_tools(recipe);
        if let Some(skill) = &recipe.skill_used {
            self.crafter.practice(skill, recipe.difficulty * 2, recipe.difficulty);
        }

        let mut components = std::mem::take(&mut item.components);
        if components.is_empty() {
            components = reconstruct(recipe, batches, items);
        }

        let mut report = DisassemblyReport {
            item: item.name.clone(),
            batches,
            recovered: Vec::new(),
            lost: Vec::new(),
            unplaced: Vec::new(),
            leftover: None,
            learned: false,
        };

        let pool = DicePool::for_disassembly(self.crafter, recipe, self.config);
        let refitted = item.has_flag(flags::FIT);
        let origin = self.crafter.position;
        let mut drops = Vec::new();
        for mut component in components {
            if recipe.difficulty != 0 && !pool.beats(&mut *self.rng) {
                self.env.bad(format!("You fail to recover {}.", component.name));
                report.lost.push(component.name);
                continue;
            }
            if recover_chance <= self.rng.gen::<f64>() {
                self.env.bad(format!(
                    "You fail to recover {} from the {}.",
                    component.name, item.name
                ));
                report.lost.push(component.name);
                continue;
            }

            if refitted && component.has_flag(flags::VARSIZE) {
                component.set_flag(flags::FIT);
            }
            if component.is_liquid() {
                report.recovered.push((component.name.clone(), Placement::Liquid));
                self.env.map.handle_liquid(origin, component);
            } else {
                drops.push(component);
            }
        }

        for drop in drops {
            let name = drop.name.clone();
            match place_in_vehicle_or_map(self.env.map, origin, drop, self.config.drop_radius) {
                Ok(placement) => report.recovered.push((name, placement)),
                Err(item) => report.unplaced.push(item),
            }
        }
        if item.count_by_charges && item.charges > 0 {
            report.leftover = Some(item);
        }
        self.invalidate_inventory();

        report.learned = self.learn_from_disassembly(recipe, &report.item);
        tracing::info!(
            crafter = %self.crafter.name,
            item = %report.item,
            batches,
            recovered = report.recovered.len(),
            lost = report.lost.len(),
            "disassembly completed"
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{ItemTypeId, RecipeId, SkillId};
    use crate::craft::fixture::Fixture;
    use crate::inventory::any_item;
    use crate::item::ItemTemplate;
    use crate::recipe::{ItemComp, RequirementData};

    fn shelf_reverse(fx: &Fixture, difficulty: i32) -> Recipe {
        let mut reverse = fx.recipes.get_uncraft(&ItemTypeId::from("shelf")).cloned().expect("shelf");
        reverse.difficulty = difficulty;
        reverse
    }

    #[test]
    fn test_reconstruct_compresses_stacks() {
        let fx = Fixture::new();
        let parts = reconstruct(&shelf_reverse(&fx, 2), 2, &fx.items);
        assert_eq!(parts.iter().filter(|p| p.type_id.as_str() == "plank").count(), 8);
        let nails: Vec<&Item> = parts.iter().filter(|p| p.type_id.as_str() == "nail").collect();
        assert_eq!(nails.len(), 1);
        assert_eq!(nails[0].charges, 20);
    }

    #[test]
    fn test_reconstruct_contained_liquid() {
        let fx = Fixture::new();
        let mut recipe = Recipe::new("broth_kit", "broth_kit", 100);
        recipe.flags.push(RecipeFlag::UncraftLiquidsContained);
        recipe.requirements = RequirementData::new(vec![], vec![], vec![vec![ItemComp::new("water", 2)]]);
        let parts = reconstruct(&recipe, 1, &fx.items);
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].type_id.as_str(), "bottle");
        assert_eq!(parts[0].contents[0].type_id.as_str(), "water");
    }

    #[test]
    fn test_reconstruct_full_magazine() {
        let mut fx = Fixture::new();
        let mut magazine = ItemTemplate::new("battery_cell");
        magazine.magazine_capacity = Some(100);
        magazine.ammo_type = Some(ItemTypeId::from("battery"));
        magazine.initial_charges = 0;
        fx.items.add(magazine);
        let mut recipe = Recipe::new("lamp", "lamp", 100);
        recipe.flags.push(RecipeFlag::FullMagazine);
        recipe.requirements = RequirementData::new(vec![], vec![], vec![vec![ItemComp::new("battery_cell", 1)]]);
        let parts = reconstruct(&recipe, 1, &fx.items);
        assert_eq!(parts[0].charges, 100);
    }

    #[test]
    fn test_provenance_comes_back_exactly() {
        let mut fx = Fixture::new();
        let recipe = shelf_reverse(&fx, 0);
        let mut shelf = fx.spawn("shelf");
        let mut warped = fx.spawn("plank");
        warped.damage_level = 1;
        shelf.components = vec![fx.spawn("plank"), warped.clone(), fx.spawn("glue").with_charges(2)];

        let report = fx.run(|ws| ws.complete_disassemble(shelf, &recipe, 1));
        assert!(report.lost.is_empty());
        assert_eq!(report.recovered.len(), 3);
        let tile = fx.map.items_at(fx.crafter.position);
        assert!(tile.contains(&warped));
        assert_eq!(tile.iter().filter(|i| i.type_id.as_str() == "glue").map(|i| i.charges).sum::<i32>(), 2);
        assert!(tile.iter().all(|i| i.type_id.as_str() != "nail"));
    }

    #[test]
    fn test_damaged_item_loses_components() {
        let mut fx = Fixture::new();
        fx.config.disassembly_damage_base = 0.0;
        let recipe = shelf_reverse(&fx, 0);
        let mut shelf = fx.spawn("shelf");
        shelf.damage_level = 2;
        let report = fx.run(|ws| ws.complete_disassemble(shelf, &recipe, 1));
        assert!(report.recovered.is_empty());
        assert_eq!(report.lost.len(), 5);
        assert!(fx.log.contains("You fail to recover plank from the shelf."));
    }

    #[test]
    fn test_ammo_is_returned_first() {
        let mut fx = Fixture::new();
        let mut recipe = Recipe::new("hotplate", "hotplate", 100);
        recipe.requirements = RequirementData::new(vec![], vec![], vec![vec![ItemComp::new("plank", 1)]]);
        let hotplate = fx.spawn("hotplate").with_charges(30);
        fx.run(|ws| ws.complete_disassemble(hotplate, &recipe, 1));
        assert_eq!(fx.crafter.carried.charges_of(&ItemTypeId::from("battery"), &any_item), 30);
    }

    #[test]
    fn test_learning_by_disassembly() {
        let mut fx = Fixture::new();
        let mut recipe = shelf_reverse(&fx, 0);
        recipe.learn_by_disassembly = vec![(SkillId::from("fabrication"), 3)];

        let shelf = fx.spawn("shelf");
        let report = fx.run(|ws| ws.complete_disassemble(shelf, &recipe, 1));
        assert!(!report.learned);
        assert!(fx.log.contains("If you had better skills"));

        // Margin 5 at intelligence 8 is a bonus of 6.6 against 4
        fx.crafter.skills.set_level(SkillId::from("fabrication"), 5);
        let shelf = fx.spawn("shelf");
        let report = fx.run(|ws| ws.complete_disassemble(shelf, &recipe, 1));
        assert!(report.learned);
        assert!(fx.crafter.knows_recipe(&RecipeId::from("shelf")));
        assert!(fx.log.contains("You learned a recipe for shelf from disassembling it!"));
    }

    #[test]
    fn test_practice_is_capped_at_difficulty() {
        let mut fx = Fixture::new();
        let recipe = shelf_reverse(&fx, 2);
        for _ in 0..50 {
            let shelf = fx.spawn("shelf");
            fx.run(|ws| ws.complete_disassemble(shelf, &recipe, 1));
        }
        assert!(fx.crafter.skill_level(&SkillId::from("fabrication")) <= 2);
    }
}
