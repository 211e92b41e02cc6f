//! Item templates - the type database items are spawned from

use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{Item, Phase};
use crate::core::types::{ItemTypeId, Mass, QualityId, Volume};

/// Static data shared by every item of one type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemTemplate {
    pub id: ItemTypeId,
    pub name: String,
    #[serde(default)]
    pub count_by_charges: bool,
    /// Charges a freshly spawned item starts with
    #[serde(default)]
    pub initial_charges: i32,
    #[serde(default)]
    pub weight: Mass,
    #[serde(default)]
    pub volume: Volume,
    #[serde(default)]
    pub phase: Phase,
    #[serde(default)]
    pub goes_bad: bool,
    #[serde(default)]
    pub comestible: bool,
    /// Component this food is recorded as once cooked
    #[serde(default)]
    pub cooks_like: Option<ItemTypeId>,
    #[serde(default)]
    pub flags: Vec<String>,
    #[serde(default)]
    pub qualities: Vec<(QualityId, i32)>,
    #[serde(default)]
    pub ammo_type: Option<ItemTypeId>,
    #[serde(default)]
    pub liquid_capacity: Option<i32>,
    /// Rounds a full magazine holds
    #[serde(default)]
    pub magazine_capacity: Option<i32>,
    /// Container this item spawns in when it must be contained
    #[serde(default)]
    pub default_container: Option<ItemTypeId>,
}

impl ItemTemplate {
    pub fn new(id: impl Into<ItemTypeId>) -> Self {
        let id = id.into();
        Self {
            name: id.to_string(),
            id,
            count_by_charges: false,
            initial_charges: 0,
            weight: Mass::ZERO,
            volume: Volume::ZERO,
            phase: Phase::Solid,
            goes_bad: false,
            comestible: false,
            cooks_like: None,
            flags: Vec::new(),
            qualities: Vec::new(),
            ammo_type: None,
            liquid_capacity: None,
            magazine_capacity: None,
            default_container: None,
        }
    }

    /// Spawn a fresh item of this type
    pub fn spawn(&self) -> Item {
        let mut item = Item::new(self.id.clone());
        item.name = self.name.clone();
        item.charges = if self.count_by_charges {
            self.initial_charges.max(1)
        } else {
            self.initial_charges
        };
        item.count_by_charges = self.count_by_charges;
        item.phase = self.phase;
        item.unit_weight = self.weight;
        item.unit_volume = self.volume;
        item.flags = self.flags.iter().cloned().collect();
        item.qualities = self.qualities.clone();
        item.goes_bad = self.goes_bad;
        item.comestible = self.comestible;
        item.ammo_type = self.ammo_type.clone();
        item.liquid_capacity = self.liquid_capacity;
        item
    }

    pub fn is_magazine(&self) -> bool {
        self.magazine_capacity.is_some()
    }
}

/// Error type for item template loading
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ItemLoadError {
    #[error("IO error: {0}")]
    IoError(String),
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("Duplicate item type: {0}")]
    Duplicate(ItemTypeId),
}

/// Catalog of all item templates
#[derive(Debug, Clone, Default)]
pub struct ItemCatalog {
    templates: AHashMap<ItemTypeId, ItemTemplate>,
}

impl ItemCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Templates for everything the built-in recipe catalog uses
    pub fn with_defaults() -> Self {
        let mut catalog = Self::new();

        let solid = |id: &str, grams: i64, ml: i64| {
            let mut t = ItemTemplate::new(id);
            t.weight = Mass::from_grams(grams);
            t.volume = Volume::from_milliliters(ml);
            t
        };
        let stack = |id: &str, grams: i64, ml: i64| {
            let mut t = solid(id, grams, ml);
            t.count_by_charges = true;
            t
        };

        catalog.add(solid("plank", 2000, 3000));
        catalog.add(stack("nail", 5, 1));
        catalog.add(stack("glue", 10, 10));
        catalog.add(solid("shelf", 8000, 20000));

        let mut hammer = solid("hammer", 700, 500);
        hammer.qualities = vec![(QualityId::from("HAMMER"), 3)];
        catalog.add(hammer);
        let mut saw = solid("saw", 600, 1000);
        saw.name = "wood saw".into();
        saw.qualities = vec![(QualityId::from("SAW_W"), 2)];
        catalog.add(saw);

        let mut vegetable = solid("vegetable", 200, 250);
        vegetable.comestible = true;
        vegetable.goes_bad = true;
        catalog.add(vegetable);

        let mut water = stack("water", 250, 250);
        water.name = "clean water".into();
        water.phase = Phase::Liquid;
        water.comestible = true;
        water.default_container = Some(ItemTypeId::from("bottle"));
        catalog.add(water);

        let mut soup = stack("soup", 250, 250);
        soup.name = "vegetable soup".into();
        soup.phase = Phase::Liquid;
        soup.comestible = true;
        soup.goes_bad = true;
        catalog.add(soup);

        let mut bottle = solid("bottle", 20, 500);
        bottle.liquid_capacity = Some(2);
        catalog.add(bottle);
        let mut pot = solid("pot", 1000, 3000);
        pot.liquid_capacity = Some(8);
        pot.qualities = vec![(QualityId::from("COOK"), 1)];
        catalog.add(pot);

        catalog.add(stack("battery", 1, 1));
        let mut hotplate = solid("hotplate", 900, 1500);
        hotplate.ammo_type = Some(ItemTypeId::from("battery"));
        hotplate.initial_charges = 0;
        catalog.add(hotplate);

        catalog
    }

    /// Add a template, replacing any previous one of the same type
    pub fn add(&mut self, template: ItemTemplate) {
        self.templates.insert(template.id.clone(), template);
    }

    pub fn get(&self, id: &ItemTypeId) -> Option<&ItemTemplate> {
        self.templates.get(id)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Spawn an item by type; unknown types produce a bare item and a diagnostic
    pub fn spawn(&self, id: &ItemTypeId) -> Item {
        match self.templates.get(id) {
            Some(template) => template.spawn(),
            None => {
                tracing::error!(item = %id, "spawning item with no template");
                Item::new(id.clone())
            }
        }
    }

    /// Load templates from a TOML file
    pub fn load_from_toml(path: &std::path::Path) -> Result<Self, ItemLoadError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ItemLoadError::IoError(e.to_string()))?;
        Self::parse_toml(&content)
    }

    /// Parse templates from a TOML string
    pub fn parse_toml(content: &str) -> Result<Self, ItemLoadError> {
        let toml_data: TomlItems =
            toml::from_str(content).map_err(|e| ItemLoadError::ParseError(e.to_string()))?;

        let mut catalog = Self::new();
        for template in toml_data.items {
            if catalog.templates.contains_key(&template.id) {
                return Err(ItemLoadError::Duplicate(template.id));
            }
            catalog.add(template);
        }
        Ok(catalog)
    }
}

/// TOML representation of an item file
#[derive(Debug, Deserialize)]
struct TomlItems {
    items: Vec<ItemTemplate>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_items() {
        let content = r#"
[[items]]
id = "nail"
name = "nail"
count_by_charges = true
initial_charges = 1
weight = 5

[[items]]
id = "water"
name = "clean water"
count_by_charges = true
phase = "Liquid"
default_container = "bottle"

[[items]]
id = "hammer"
name = "hammer"
weight = 700
qualities = [["HAMMER", 3]]
"#;
        let catalog = ItemCatalog::parse_toml(content).expect("items should parse");
        assert_eq!(catalog.len(), 3);

        let water = catalog.spawn(&ItemTypeId::from("water"));
        assert!(water.is_liquid());
        assert!(water.count_by_charges);
        assert_eq!(water.charges, 1);

        let hammer = catalog.spawn(&ItemTypeId::from("hammer"));
        assert_eq!(hammer.quality_level(&QualityId::from("HAMMER")), Some(3));
        assert_eq!(hammer.weight(), Mass(700));
    }

    #[test]
    fn test_duplicate_rejected() {
        let content = r#"
[[items]]
id = "nail"
name = "nail"

[[items]]
id = "nail"
name = "another nail"
"#;
        let result = ItemCatalog::parse_toml(content);
        assert_eq!(result.unwrap_err(), ItemLoadError::Duplicate(ItemTypeId::from("nail")));
    }

    #[test]
    fn test_defaults_cover_builtin_recipes() {
        let catalog = ItemCatalog::with_defaults();
        for id in ["plank", "nail", "glue", "shelf", "vegetable", "water", "soup", "hotplate"] {
            assert!(catalog.get(&ItemTypeId::from(id)).is_some(), "missing {}", id);
        }
        assert!(catalog.spawn(&ItemTypeId::from("soup")).is_liquid());
        assert!(catalog.spawn(&ItemTypeId::from("pot")).is_container());
    }

    #[test]
    fn test_spawn_unknown_type() {
        let catalog = ItemCatalog::new();
        let item = catalog.spawn(&ItemTypeId::from("mystery"));
        assert_eq!(item.type_id.as_str(), "mystery");
        assert_eq!(item.charges, 0);
    }
}
