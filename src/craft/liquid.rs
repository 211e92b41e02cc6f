//! Storage check for liquid results

use std::cmp::Reverse;

use super::Workshop;
use crate::item::Item;
use crate::recipe::Recipe;

impl Workshop<'_, '_> {
    /// Containers the crafter could pour results into: held ones and nearby storage
    fn eligible_containers(&self) -> Vec<Item> {
        let mut containers: Vec<Item> = self.crafter.containers().cloned().collect();
        containers.extend(
            self.map_snapshot()
                .items()
                .iter()
                .filter(|i| i.is_container())
                .cloned(),
        );
        // Partly filled containers first
        containers.sort_by_key(|c| Reverse(c.contents.first().map_or(0, |held| held.charges)));
        containers
    }

    /// Whether every liquid result of the craft has somewhere to go
    ///
    /// When one does not, the crafter is asked to proceed anyway.
    pub fn check_eligible_containers(&mut self, recipe: &Recipe, batch: i32) -> bool {
        let items = self.env.items;
        let mut products = recipe.create_results(batch, items);
        products.extend(recipe.create_byproducts(batch, items));
        let containers = self.eligible_containers();

        for product in products.iter().filter(|p| p.is_liquid()) {
            let mut to_store = product.charges;
            for container in &containers {
                if to_store <= 0 {
                    break;
                }
                to_store -= container.remaining_liquid_capacity(&product.type_id);
            }
            if to_store > 0 {
                if let Some(space) = self.env.map.vehicle_tank_space(self.crafter.position, &product.type_id) {
                    to_store -= space;
                }
            }
            if to_store > 0 {
                let question = format!(
                    "You don't have anything in which to store {} and may have to pour it out or consume it as soon as it is prepared!  Proceed?",
                    product.name
                );
                if !self.env.decider.confirm(&question) {
                    return false;
                }
            }
        }
        true
    }
}
