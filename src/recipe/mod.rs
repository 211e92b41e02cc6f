//! Crafting recipes - what a craft consumes, how long it takes and what it yields

pub mod catalog;
pub mod requirements;

use serde::{Deserialize, Serialize};

use crate::core::types::{ItemTypeId, RecipeId, SkillId};
use crate::env::ItemOracle;
use crate::item::Item;

pub use catalog::{RecipeCatalog, RecipeLoadError};
pub use requirements::{ItemComp, QualityRequirement, RequirementData, ToolComp};

/// Category whose recipes build overmap terrain and cannot be crafted by hand
pub const CATEGORY_BUILDING: &str = "CC_BUILDING";

/// Behaviour switches on a recipe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecipeFlag {
    /// Can be crafted in poor light at a reduced speed
    BlindEasy,
    /// Can be crafted in poor light by a crafter two levels over the requirement
    BlindHard,
    /// Results keep the fit of their components instead of being resized
    NoResize,
    /// Results ignore component nutrition
    NutrientOverride,
    /// Magazines recovered by disassembly come out fully loaded
    FullMagazine,
    /// Liquids recovered by disassembly come out in their containers
    UncraftLiquidsContained,
    /// Rotten components are acceptable even for non-perishable results
    AllowRotten,
}

/// A crafting recipe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: RecipeId,
    pub result: ItemTypeId,
    /// Units per batch unit, or charges per batch unit for charge-counted results
    #[serde(default = "default_result_count")]
    pub result_count: i32,
    /// Container each batch unit is delivered in
    #[serde(default)]
    pub container: Option<ItemTypeId>,
    #[serde(default)]
    pub byproducts: Vec<(ItemTypeId, i32)>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub skill_used: Option<SkillId>,
    #[serde(default)]
    pub difficulty: i32,
    #[serde(default)]
    pub required_skills: Vec<(SkillId, i32)>,
    /// Base time of one batch unit, in moves (100 moves = 1 turn)
    pub time: i32,
    /// Maximum fraction of time saved per extra batch unit
    #[serde(default)]
    pub batch_rscale: f64,
    /// Batch size at which the saving is nearly fully applied
    #[serde(default)]
    pub batch_rsize: i32,
    #[serde(default)]
    pub requirements: RequirementData,
    #[serde(default)]
    pub flags: Vec<RecipeFlag>,
    #[serde(default)]
    pub flags_to_delete: Vec<String>,
    #[serde(default)]
    pub hot_result: bool,
    #[serde(default)]
    pub dehydrate_result: bool,
    #[serde(default)]
    pub reversible: bool,
    /// Skills (and levels) needed to learn this recipe by taking results apart
    #[serde(default)]
    pub learn_by_disassembly: Vec<(SkillId, i32)>,
    /// Books teaching this recipe, with the skill level each requires
    #[serde(default)]
    pub booksets: Vec<(ItemTypeId, i32)>,
}

fn default_result_count() -> i32 {
    1
}

impl Recipe {
    pub fn new(id: impl Into<RecipeId>, result: impl Into<ItemTypeId>, time: i32) -> Self {
        Self {
            id: id.into(),
            result: result.into(),
            result_count: 1,
            container: None,
            byproducts: Vec::new(),
            category: String::new(),
            skill_used: None,
            difficulty: 0,
            required_skills: Vec::new(),
            time,
            batch_rscale: 0.0,
            batch_rsize: 0,
            requirements: RequirementData::default(),
            flags: Vec::new(),
            flags_to_delete: Vec::new(),
            hot_result: false,
            dehydrate_result: false,
            reversible: false,
            learn_by_disassembly: Vec::new(),
            booksets: Vec::new(),
        }
    }

    pub fn has_flag(&self, flag: RecipeFlag) -> bool {
        self.flags.contains(&flag)
    }

    pub fn has_byproducts(&self) -> bool {
        !self.byproducts.is_empty()
    }

    /// Items consumed in one disassembly of a charge-counted result
    pub fn disassembly_batch_size(&self) -> i32 {
        self.result_count.max(1)
    }

    /// Moves needed for `batch` units at speed `multiplier` with `assistants` helping
    pub fn batch_time(&self, batch: i32, multiplier: f32, assistants: usize) -> i32 {
        // Crafts that cannot progress are estimated at full speed
        let multiplier = if multiplier == 0.0 { 1.0 } else { multiplier };
        let local_time = self.time as f32 / multiplier;

        if self.batch_rscale == 0.0 && assistants == 0 {
            return local_time as i32 * batch;
        }

        let mut total_time = if self.batch_rscale == 0.0 {
            local_time * batch as f32
        } else {
            // At batch_rsize the incremental time saving reaches 99.5% of batch_rscale
            let scale = f64::from(self.batch_rsize.max(1)) / 6.0;
            (0..batch)
                .map(|x| {
                    let logf = (2.0 / (1.0 + (-(f64::from(x) / scale)).exp())) - 1.0;
                    local_time * (1.0 - self.batch_rscale * logf) as f32
                })
                .sum()
        };

        if assistants == 1 {
            total_time *= 0.75;
        } else if assistants >= 2 {
            total_time *= 0.60;
        }
        total_time.max(local_time) as i32
    }

    /// Whether components must be fresh regardless of the crafter's wishes
    fn rejects_rotten(&self, items: &dyn ItemOracle) -> bool {
        if self.has_flag(RecipeFlag::AllowRotten) {
            return false;
        }
        items
            .template(&self.result)
            .is_some_and(|t| t.comestible && !t.goes_bad)
    }

    /// Filter selecting usable components; `no_rotten` also excludes rotten ones
    pub fn component_filter(&self, items: &dyn ItemOracle, no_rotten: bool) -> impl Fn(&Item) -> bool {
        let reject_rotten = no_rotten || self.rejects_rotten(items);
        move |item: &Item| !(reject_rotten && item.rotten())
    }

    /// Spawn the results of a `batch`-unit craft
    pub fn create_results(&self, batch: i32, items: &dyn ItemOracle) -> Vec<Item> {
        let mut result = items.spawn(&self.result);

        if let Some(container_id) = &self.container {
            if result.count_by_charges || result.is_liquid() {
                result.charges = self.result_count;
            }
            return (0..batch)
                .map(|_| {
                    let mut container = items.spawn(container_id);
                    container.contents.push(result.clone());
                    container
                })
                .collect();
        }

        if result.count_by_charges || result.is_liquid() {
            result.charges = self.result_count * batch;
            return vec![result];
        }

        (0..self.result_count * batch).map(|_| result.clone()).collect()
    }

    /// Spawn the byproducts of a `batch`-unit craft
    pub fn create_byproducts(&self, batch: i32, items: &dyn ItemOracle) -> Vec<Item> {
        let mut out = Vec::new();
        for (type_id, amount) in &self.byproducts {
            let mut byproduct = items.spawn(type_id);
            if byproduct.count_by_charges || byproduct.is_liquid() {
                byproduct.charges = amount * batch;
                out.push(byproduct);
            } else {
                out.extend((0..amount * batch).map(|_| byproduct.clone()));
            }
        }
        out
    }

    /// Display name of the result
    pub fn result_name(&self, items: &dyn ItemOracle) -> String {
        items
            .template(&self.result)
            .map(|t| t.name.clone())
            .unwrap_or_else(|| self.result.to_string())
    }

    /// Books held in `inv` that teach this recipe at the crafter's skill level
    pub fn books_available(&self, skill_level: i32, inv: &crate::inventory::Inventory) -> Vec<ItemTypeId> {
        self.booksets
            .iter()
            .filter(|(book, level)| {
                skill_level >= *level && inv.amount_of(book, &crate::inventory::any_item) > 0
            })
            .map(|(book, _)| book.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::{ItemCatalog, ItemTemplate, Phase};

    fn items() -> ItemCatalog {
        let mut catalog = ItemCatalog::new();
        catalog.add(ItemTemplate::new("shelf"));
        let mut soup = ItemTemplate::new("soup");
        soup.count_by_charges = true;
        soup.phase = Phase::Liquid;
        soup.comestible = true;
        soup.goes_bad = true;
        catalog.add(soup);
        let mut can = ItemTemplate::new("can");
        can.liquid_capacity = Some(2);
        catalog.add(can);
        let mut jerky = ItemTemplate::new("jerky");
        jerky.comestible = true;
        jerky.count_by_charges = true;
        catalog.add(jerky);
        catalog
    }

    #[test]
    fn test_batch_time_simple() {
        let recipe = Recipe::new("shelf", "shelf", 1000);
        assert_eq!(recipe.batch_time(3, 1.0, 0), 3000);
        assert_eq!(recipe.batch_time(1, 0.5, 0), 2000);
        // Zero speed is estimated at full speed
        assert_eq!(recipe.batch_time(1, 0.0, 0), 1000);
    }

    #[test]
    fn test_batch_time_assistants() {
        let recipe = Recipe::new("shelf", "shelf", 1000);
        assert_eq!(recipe.batch_time(4, 1.0, 1), 3000);
        assert_eq!(recipe.batch_time(4, 1.0, 2), 2400);
        // Never faster than a single unit
        assert_eq!(recipe.batch_time(1, 1.0, 2), 1000);
    }

    #[test]
    fn test_batch_time_scaling_discount() {
        let mut recipe = Recipe::new("shelf", "shelf", 1000);
        recipe.batch_rscale = 0.5;
        recipe.batch_rsize = 6;
        let batched = recipe.batch_time(10, 1.0, 0);
        assert!(batched < 10_000);
        assert!(batched > 5_000);
        // First unit never discounted
        assert_eq!(recipe.batch_time(1, 1.0, 0), 1000);
    }

    #[test]
    fn test_create_results_discrete() {
        let mut recipe = Recipe::new("shelf", "shelf", 1000);
        recipe.result_count = 2;
        let results = recipe.create_results(3, &items());
        assert_eq!(results.len(), 6);
    }

    #[test]
    fn test_create_results_charges_and_containers() {
        let mut recipe = Recipe::new("soup", "soup", 1000);
        recipe.result_count = 2;
        let loose = recipe.create_results(3, &items());
        assert_eq!(loose.len(), 1);
        assert_eq!(loose[0].charges, 6);

        recipe.container = Some("can".into());
        let canned = recipe.create_results(3, &items());
        assert_eq!(canned.len(), 3);
        assert!(canned.iter().all(|c| c.contents[0].charges == 2));
    }

    #[test]
    fn test_component_filter_for_preserved_food() {
        let recipe = Recipe::new("jerky", "jerky", 1000);
        let catalog = items();
        let mut rotten = Item::new("meat");
        rotten.goes_bad = true;
        rotten.relative_rot = 2.0;

        // Non-perishable food never accepts rotten components
        let filter = recipe.component_filter(&catalog, false);
        assert!(!filter(&rotten));

        let stew = Recipe::new("soup", "soup", 1000);
        assert!(stew.component_filter(&catalog, false)(&rotten));
        assert!(!stew.component_filter(&catalog, true)(&rotten));
    }

    #[test]
    fn test_flag_names_parse() {
        #[derive(Deserialize)]
        struct Flags {
            flags: Vec<RecipeFlag>,
        }
        let parsed: Flags = toml::from_str(r#"flags = ["BLIND_EASY", "UNCRAFT_LIQUIDS_CONTAINED"]"#)
            .expect("flags should parse");
        assert_eq!(
            parsed.flags,
            vec![RecipeFlag::BlindEasy, RecipeFlag::UncraftLiquidsContained]
        );
    }
}
