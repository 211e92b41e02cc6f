//! The acting entity: skills, traits, morale, vision and held items

pub mod skills;

use ahash::AHashSet;
use serde::{Deserialize, Serialize};

use crate::core::types::{ItemTypeId, Mass, RecipeId, SkillId, TraitId, Tripoint, Volume};
use crate::inventory::{Inventory, ItemFilter};
use crate::item::Item;
use crate::recipe::Recipe;

pub use skills::{SkillLevel, SkillSet};

/// A character performing crafts or disassembly
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Crafter {
    pub name: String,
    pub position: Tripoint,
    /// Action counter; any change invalidates the crafting inventory snapshot
    pub moves: i64,
    pub intelligence: i32,
    pub morale: i32,
    /// Fine-detail vision modifier, 1 (bright) to 11 (pitch black)
    pub vision_mod: f32,
    /// Glasses or contacts counter sight impairments
    pub vision_corrected: bool,
    pub traits: AHashSet<TraitId>,
    /// Extra success dice granted by mutations, per skill
    pub craft_skill_bonuses: Vec<(SkillId, i32)>,
    pub skills: SkillSet,
    pub known_recipes: AHashSet<RecipeId>,
    pub carried: Inventory,
    pub worn: Inventory,
    /// Tools provided by bionics or traits; usable but never consumed
    pub pseudo_tools: Vec<Item>,
    pub carry_mass: Mass,
    pub carry_volume: Volume,
    /// Heaviest craft that can be held in hand
    pub lift_capacity: Mass,
}

impl Crafter {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            position: Tripoint::default(),
            moves: 0,
            intelligence: 8,
            morale: 0,
            vision_mod: 1.0,
            vision_corrected: false,
            traits: AHashSet::new(),
            craft_skill_bonuses: Vec::new(),
            skills: SkillSet::new(),
            known_recipes: AHashSet::new(),
            carried: Inventory::new(),
            worn: Inventory::new(),
            pseudo_tools: Vec::new(),
            carry_mass: Mass::from_kilograms(40),
            carry_volume: Volume::from_liters(30),
            lift_capacity: Mass::from_kilograms(20),
        }
    }

    pub fn skill_level(&self, skill: &SkillId) -> i32 {
        self.skills.level(skill)
    }

    pub fn has_trait(&self, trait_id: &TraitId) -> bool {
        self.traits.contains(trait_id)
    }

    /// Mutation dice bonus for recipes using `skill`
    pub fn craft_skill_bonus(&self, skill: &SkillId) -> i32 {
        self.craft_skill_bonuses
            .iter()
            .filter(|(s, _)| s == skill)
            .map(|(_, bonus)| *bonus)
            .sum()
    }

    /// Smallest margin by which skills exceed the recipe's requirements
    pub fn exceeds_recipe_requirements(&self, recipe: &Recipe) -> i32 {
        let mut over = match &recipe.skill_used {
            Some(skill) => self.skill_level(skill) - recipe.difficulty,
            None => 0,
        };
        for (skill, level) in &recipe.required_skills {
            over = over.min(self.skill_level(skill) - level);
        }
        over
    }

    pub fn can_learn_by_disassembly(&self, recipe: &Recipe) -> bool {
        recipe
            .learn_by_disassembly
            .iter()
            .all(|(skill, level)| self.skill_level(skill) >= *level)
    }

    pub fn knows_recipe(&self, id: &RecipeId) -> bool {
        self.known_recipes.contains(id)
    }

    pub fn learn_recipe(&mut self, id: RecipeId) {
        tracing::debug!(crafter = %self.name, recipe = %id, "recipe learned");
        self.known_recipes.insert(id);
    }

    pub fn practice(&mut self, skill: &SkillId, amount: i32, cap: i32) -> bool {
        self.skills.practice(skill, amount, cap)
    }

    /// Everything carried or worn, merged
    pub fn held_items(&self) -> Inventory {
        let mut held = self.carried.clone();
        held.merge(&self.worn);
        held
    }

    /// Held items plus pseudo tools, for tool availability checks
    pub fn tool_pool(&self) -> Inventory {
        let mut pool = self.held_items();
        for tool in &self.pseudo_tools {
            pool.add(tool.clone());
        }
        pool
    }

    /// Take discrete items, carried items first
    pub fn use_amount(&mut self, type_id: &ItemTypeId, count: i32, filter: ItemFilter<'_>) -> Vec<Item> {
        let mut remaining = count;
        let mut taken = self.carried.use_amount(type_id, &mut remaining, filter);
        if remaining > 0 {
            taken.extend(self.worn.use_amount(type_id, &mut remaining, filter));
        }
        taken
    }

    /// Take charges, carried items first
    pub fn use_charges(&mut self, type_id: &ItemTypeId, count: i32, filter: ItemFilter<'_>) -> Vec<Item> {
        let mut remaining = count;
        let mut taken = self.carried.use_charges(type_id, &mut remaining, filter);
        if remaining > 0 {
            taken.extend(self.worn.use_charges(type_id, &mut remaining, filter));
        }
        taken
    }

    pub fn carried_weight(&self) -> Mass {
        self.carried.items().iter().map(Item::weight).sum::<Mass>()
            + self.worn.items().iter().map(Item::weight).sum::<Mass>()
    }

    pub fn carried_volume(&self) -> Volume {
        self.carried.items().iter().map(Item::volume).sum()
    }

    /// Whether an extra load of this size still fits
    pub fn can_carry(&self, mass: Mass, volume: Volume) -> bool {
        self.carried_weight() + mass <= self.carry_mass
            && self.carried_volume() + volume <= self.carry_volume
    }

    pub fn can_lift(&self, mass: Mass) -> bool {
        mass <= self.lift_capacity
    }

    /// Liquid containers held by the crafter
    pub fn containers(&self) -> impl Iterator<Item = &Item> {
        self.carried
            .items()
            .iter()
            .chain(self.worn.items())
            .filter(|i| i.is_container())
    }
}

/// A nearby character who can assist with crafting
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Helper {
    pub name: String,
    pub skills: SkillSet,
}

impl Helper {
    pub fn new(name: impl Into<String>, skills: SkillSet) -> Self {
        Self {
            name: name.into(),
            skills,
        }
    }
}
