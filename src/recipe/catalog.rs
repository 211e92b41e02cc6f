//! Recipe catalog - forward recipes and the reverse recipes used to take items apart
//!
//! Reverse recipes are derived from every reversible forward recipe and can
//! also be declared directly for items that are never crafted.

use ahash::AHashMap;
use serde::Deserialize;
use thiserror::Error;

use super::requirements::{ItemComp, QualityRequirement, RequirementData, ToolComp};
use super::{Recipe, RecipeFlag};
use crate::core::types::{ItemTypeId, RecipeId, SkillId};
use crate::env::RecipeBook;

/// Catalog of all available recipes
#[derive(Debug, Clone, Default)]
pub struct RecipeCatalog {
    recipes: AHashMap<RecipeId, Recipe>,
    uncraft: AHashMap<ItemTypeId, Recipe>,
}

impl RecipeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// A small built-in catalog of woodworking and cooking recipes
    pub fn with_defaults() -> Self {
        let mut catalog = Self::new();

        let mut shelf = Recipe::new("shelf", "shelf", 6000);
        shelf.category = "CC_FURNITURE".into();
        shelf.skill_used = Some(SkillId::from("fabrication"));
        shelf.difficulty = 2;
        shelf.reversible = true;
        shelf.requirements = RequirementData::new(
            vec![],
            vec![
                vec![QualityRequirement::new("HAMMER", 2)],
                vec![QualityRequirement::new("SAW_W", 1)],
            ],
            vec![
                vec![ItemComp::new("plank", 4)],
                vec![ItemComp::new("nail", 10), ItemComp::new("glue", 2)],
            ],
        );
        catalog.add(shelf);

        let mut soup = Recipe::new("vegetable_soup", "soup", 3000);
        soup.category = "CC_FOOD".into();
        soup.skill_used = Some(SkillId::from("cooking"));
        soup.difficulty = 1;
        soup.result_count = 2;
        soup.flags.push(RecipeFlag::BlindEasy);
        soup.requirements = RequirementData::new(
            vec![vec![ToolComp::new("hotplate", 5), ToolComp::new("fire", -1)]],
            vec![vec![QualityRequirement::new("COOK", 1)]],
            vec![
                vec![ItemComp::new("vegetable", 2)],
                vec![ItemComp::new("water", 2)],
            ],
        );
        catalog.add(soup);

        catalog
    }

    /// Add a recipe; reversible recipes also register their reverse
    pub fn add(&mut self, recipe: Recipe) {
        if recipe.reversible {
            let reverse = derive_uncraft(&recipe);
            self.uncraft.insert(reverse.result.clone(), reverse);
        }
        self.recipes.insert(recipe.id.clone(), recipe);
    }

    /// Register a reverse recipe for an item type directly
    pub fn add_uncraft(&mut self, recipe: Recipe) {
        self.uncraft.insert(recipe.result.clone(), recipe);
    }

    /// Get a recipe by ID
    pub fn get(&self, id: &RecipeId) -> Option<&Recipe> {
        self.recipes.get(id)
    }

    /// Reverse recipe for an item type
    pub fn get_uncraft(&self, item_type: &ItemTypeId) -> Option<&Recipe> {
        self.uncraft.get(item_type)
    }

    /// Get all forward recipes
    pub fn all(&self) -> impl Iterator<Item = &Recipe> {
        self.recipes.values()
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    /// Load recipes from a TOML file
    pub fn load_from_toml(path: &std::path::Path) -> Result<Self, RecipeLoadError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| RecipeLoadError::IoError(e.to_string()))?;
        Self::parse_toml(&content)
    }

    /// Parse recipes from TOML string
    pub fn parse_toml(content: &str) -> Result<Self, RecipeLoadError> {
        let toml_data: TomlRecipes = toml::from_str(content)
            .map_err(|e| RecipeLoadError::ParseError(e.to_string()))?;

        let mut catalog = Self::new();
        for recipe in toml_data.recipes {
            validate(&recipe)?;
            if catalog.recipes.contains_key(&recipe.id) {
                return Err(RecipeLoadError::Duplicate(recipe.id));
            }
            catalog.add(recipe);
        }
        for recipe in toml_data.uncraft {
            validate(&recipe)?;
            catalog.add_uncraft(recipe);
        }
        Ok(catalog)
    }
}

impl RecipeBook for RecipeCatalog {
    fn recipe(&self, id: &RecipeId) -> Option<&Recipe> {
        self.get(id)
    }

    fn uncraft(&self, item_type: &ItemTypeId) -> Option<&Recipe> {
        self.get_uncraft(item_type)
    }
}

/// Reverse of a reversible recipe: same tools and components, no byproducts
///
/// The reverse keeps the forward id, so learning from disassembly teaches
/// the forward recipe.
fn derive_uncraft(recipe: &Recipe) -> Recipe {
    let mut reverse = recipe.clone();
    reverse.byproducts.clear();
    reverse.reversible = false;
    reverse.container = None;
    reverse
}

fn validate(recipe: &Recipe) -> Result<(), RecipeLoadError> {
    if recipe.time < 0 {
        return Err(RecipeLoadError::Invalid(recipe.id.clone(), "negative time".into()));
    }
    if recipe.difficulty < 0 {
        return Err(RecipeLoadError::Invalid(recipe.id.clone(), "negative difficulty".into()));
    }
    if !(0.0..=1.0).contains(&recipe.batch_rscale) {
        return Err(RecipeLoadError::Invalid(
            recipe.id.clone(),
            format!("batch_rscale {} outside [0, 1]", recipe.batch_rscale),
        ));
    }
    if recipe.requirements.components.iter().any(|group| group.is_empty())
        || recipe.requirements.tools.iter().any(|group| group.is_empty())
    {
        return Err(RecipeLoadError::Invalid(
            recipe.id.clone(),
            "empty requirement group".into(),
        ));
    }
    Ok(())
}

/// Error type for recipe loading
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RecipeLoadError {
    #[error("IO error: {0}")]
    IoError(String),
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("Duplicate recipe: {0}")]
    Duplicate(RecipeId),
    #[error("Invalid recipe {0}: {1}")]
    Invalid(RecipeId, String),
}

/// TOML representation of recipes file
#[derive(Debug, Deserialize)]
struct TomlRecipes {
    #[serde(default)]
    recipes: Vec<Recipe>,
    #[serde(default)]
    uncraft: Vec<Recipe>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let catalog = RecipeCatalog::with_defaults();
        assert_eq!(catalog.len(), 2);
        let shelf = catalog.get(&RecipeId::from("shelf")).expect("shelf recipe");
        assert_eq!(shelf.difficulty, 2);
        assert!(catalog.get_uncraft(&ItemTypeId::from("shelf")).is_some());
        // Soup is not reversible
        assert!(catalog.get_uncraft(&ItemTypeId::from("soup")).is_none());
    }

    #[test]
    fn test_parse_toml() {
        let content = r#"
[[recipes]]
id = "rope"
result = "rope"
time = 1200
skill_used = "survival"
difficulty = 1
reversible = true
flags = ["BLIND_HARD"]

[recipes.requirements]
qualities = [[{ quality = "CUT", level = 1 }]]
components = [[{ item = "string", count = 6 }, { item = "sinew", count = 20 }]]

[[uncraft]]
id = "uncraft_radio"
result = "radio"
time = 500
difficulty = 2
skill_used = "electronics"

[uncraft.requirements]
components = [[{ item = "circuit", count = 1 }], [{ item = "cable", count = 3 }]]
"#;
        let catalog = RecipeCatalog::parse_toml(content).expect("recipes should parse");
        let rope = catalog.get(&RecipeId::from("rope")).expect("rope");
        assert!(rope.has_flag(RecipeFlag::BlindHard));
        assert_eq!(rope.requirements.components[0].len(), 2);
        assert_eq!(rope.requirements.components[0][1].count, 20);

        let reverse = catalog.get_uncraft(&ItemTypeId::from("rope")).expect("derived uncraft");
        assert_eq!(reverse.id.as_str(), "rope");

        let radio = catalog.get_uncraft(&ItemTypeId::from("radio")).expect("declared uncraft");
        assert_eq!(radio.requirements.components.len(), 2);
    }

    #[test]
    fn test_invalid_rscale_rejected() {
        let content = r#"
[[recipes]]
id = "rope"
result = "rope"
time = 1200
batch_rscale = 1.5
"#;
        let result = RecipeCatalog::parse_toml(content);
        assert!(matches!(result, Err(RecipeLoadError::Invalid(_, _))));
    }

    #[test]
    fn test_duplicate_rejected() {
        let content = r#"
[[recipes]]
id = "rope"
result = "rope"
time = 1200

[[recipes]]
id = "rope"
result = "rope"
time = 600
"#;
        assert_eq!(
            RecipeCatalog::parse_toml(content).unwrap_err(),
            RecipeLoadError::Duplicate(RecipeId::from("rope"))
        );
    }
}
