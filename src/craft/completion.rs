//! Turning a finished craft into its results

use serde::{Deserialize, Serialize};

use super::placement::{place_output, Placement};
use super::state::{CraftState, InProgressCraft};
use super::Workshop;
use crate::item::{flags, Item};
use crate::recipe::{Recipe, RecipeFlag};
use crate::roll::x_in_y;

/// What a finished craft produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionReport {
    /// Name and destination of every result and byproduct
    pub outputs: Vec<(String, Placement)>,
    /// Outputs that found no room anywhere
    pub unplaced: Vec<Item>,
    /// The crafter memorized the recipe
    pub learned: bool,
}

/// The item a result's food data lives on: its contents when it is a filled container
fn contained_mut(item: &mut Item) -> &mut Item {
    if item.is_container() && !item.contents.is_empty() {
        let last = item.contents.len() - 1;
        &mut item.contents[last]
    } else {
        item
    }
}

/// Record the components of result number `offset` of a batch
///
/// Charge stacks are split evenly across the batch; discrete components
/// are dealt out round-robin.
pub fn set_components(of: &mut Item, used: &[Item], batch: i32, offset: usize) {
    if batch <= 1 {
        of.components.extend(used.iter().cloned());
        return;
    }
    let batch = batch as usize;
    let mut discrete = 0;
    for component in used {
        if component.count_by_charges {
            let mut share = component.clone();
            share.charges = component.charges / batch as i32;
            of.components.push(share);
        } else {
            if (discrete + offset) % batch == 0 {
                of.components.push(component.clone());
            }
            discrete += 1;
        }
    }
}

impl Workshop<'_, '_> {
    /// Narrate the completion and maybe memorize the recipe
    ///
    /// Recipes crafted from a reference are learned with a chance of
    /// `time / (8000 * difficulty^4 / (skill * intelligence))`.
    fn learn_from_crafting(&mut self, recipe: &Recipe) -> bool {
        let name = recipe.result_name(self.env.items);
        if self.crafter.knows_recipe(&recipe.id) {
            self.env.info(format!("You craft {} from memory.", name));
            return false;
        }

        let skill = self.crafter.skills.level_of(recipe.skill_used.as_ref());
        let inv = self.crafting_inventory();
        let book = recipe
            .books_available(skill, &inv)
            .into_iter()
            .next()
            .map(|id| self.env.items.template(&id).map(|t| t.name.clone()).unwrap_or_else(|| id.to_string()));
        match book {
            Some(book) => self
                .env
                .info(format!("You craft {} using the {} as a reference.", name, book)),
            None => self
                .env
                .info(format!("You craft {} using a book as a reference.", name)),
        }

        let learning_speed = f64::from(skill.max(1)) * f64::from(self.crafter.intelligence.max(1));
        let time_to_learn = 8000.0 * f64::from(recipe.difficulty).powi(4) / learning_speed;
        if x_in_y(f64::from(recipe.time), time_to_learn, &mut *self.rng) {
            self.crafter.learn_recipe(recipe.id.clone());
            self.env.good(format!("You memorized the recipe for {}!", name));
            return true;
        }
        false
    }

    /// Food provenance: components as they end up after cooking, plus flagged byproducts
    fn food_provenance(&self, recipe: &Recipe, used: &[Item], batch: i32) -> Vec<Item> {
        let items = self.env.items;
        let cooked = recipe.hot_result || recipe.dehydrate_result;
        let mut provenance: Vec<Item> = used
            .iter()
            .map(|component| {
                let cooks_like = component
                    .comestible
                    .then(|| items.template(&component.type_id))
                    .flatten()
                    .and_then(|t| t.cooks_like.clone());
                let mut recorded = match cooks_like {
                    Some(id) => {
                        let mut replacement = items.spawn(&id);
                        replacement.charges = component.charges;
                        replacement
                    }
                    None => component.clone(),
                };
                if cooked {
                    recorded.set_flag_recursive(flags::COOKED);
                }
                recorded
            })
            .collect();
        for mut byproduct in recipe.create_byproducts(batch, items) {
            byproduct.set_flag(flags::BYPRODUCT);
            provenance.push(byproduct);
        }
        provenance
    }

    fn deliver(&mut self, item: Item, report: &mut CompletionReport) {
        let name = item.name.clone();
        if item.is_liquid() {
            self.env.map.handle_liquid(self.crafter.position, item);
            report.outputs.push((name, Placement::Liquid));
            return;
        }
        match place_output(self.crafter, self.env.map, item, self.config.drop_radius) {
            Ok(placement) => report.outputs.push((name, placement)),
            Err(item) => report.unplaced.push(item),
        }
    }

    /// Create, finish and place the results of `craft`
    pub fn complete(&mut self, craft: &mut InProgressCraft, recipe: &Recipe) -> CompletionReport {
        let items = self.env.items;
        let batch = craft.batch_size;
        let used = craft.take_components();
        craft.state = CraftState::Completed;

        let mut report = CompletionReport {
            outputs: Vec::new(),
            unplaced: Vec::new(),
            learned: self.learn_from_crafting(recipe),
        };

        let no_resize = recipe.has_flag(RecipeFlag::NoResize);
        let ignore_components = recipe.has_flag(RecipeFlag::NutrientOverride);
        let record_components = recipe.reversible && self.env.recipes.uncraft(&recipe.result).is_some();
        let inherits = |flag: &str| items.flag_inherits(flag);

        let mut offset = 0;
        for mut result in recipe.create_results(batch, items) {
            let contained = result.is_container() && !result.contents.is_empty();
            let food = contained_mut(&mut result);

            for parent in &used {
                food.inherit_flags(parent, no_resize, &inherits);
            }
            for flag in &recipe.flags_to_delete {
                food.unset_flag(flag);
            }

            if ignore_components {
                food.set_flag(flags::NUTRIENT_OVERRIDE);
            } else if record_components && !food.count_by_charges {
                set_components(food, &used, batch, offset);
                offset += 1;
            } else if food.is_food() && !food.has_flag(flags::NUTRIENT_OVERRIDE) {
                let provenance = self.food_provenance(recipe, &used, batch);
                set_components(food, &provenance, batch, offset);
                // A container holds one run of the recipe whatever the batch
                food.recipe_charges = if contained {
                    food.charges
                } else {
                    food.charges / batch.max(1)
                };
                offset += 1;
            }

            if food.goes_bad {
                food.relative_rot = craft.relative_rot;
            }
            // Tools that spawn empty keep no ammunition type
            if !result.count_by_charges && result.charges <= 0 {
                result.ammo_type = None;
            }
            self.deliver(result, &mut report);
        }

        for mut byproduct in recipe.create_byproducts(batch, items) {
            if byproduct.goes_bad {
                byproduct.relative_rot = craft.relative_rot;
            }
            for parent in &used {
                byproduct.inherit_flags(parent, no_resize, &inherits);
            }
            self.deliver(byproduct, &mut report);
        }

        self.invalidate_inventory();
        tracing::info!(
            crafter = %self.crafter.name,
            recipe = %recipe.id,
            batch,
            outputs = report.outputs.len(),
            "craft completed"
        );
        report
    }
}
