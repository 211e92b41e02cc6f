//! Item instances
//!
//! An `Item` is a concrete resource handle: a stack of charges, a discrete
//! unit, a tool carrying ammunition, or a crafted result carrying the
//! components it was built from.

pub mod catalog;
pub mod flags;

use ahash::AHashSet;
use serde::{Deserialize, Serialize};

use crate::core::types::{ItemTypeId, Mass, QualityId, Volume};

pub use catalog::{ItemCatalog, ItemLoadError, ItemTemplate};

/// Sentinel charge count of an inexhaustible source (e.g. a water tap)
pub const INFINITE_CHARGES: i32 = i32::MAX;

/// Physical phase of an item
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    #[default]
    Solid,
    Liquid,
}

/// A single item instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub type_id: ItemTypeId,
    pub name: String,
    /// Quantity for charge-counted items, loaded ammunition for tools
    pub charges: i32,
    pub count_by_charges: bool,
    pub phase: Phase,
    /// Weight of one unit (or one charge for charge-counted items)
    pub unit_weight: Mass,
    /// Volume of one unit (or one charge for charge-counted items)
    pub unit_volume: Volume,
    pub flags: AHashSet<String>,
    pub qualities: Vec<(QualityId, i32)>,
    /// 0 (pristine) through 4 (nearly destroyed)
    pub damage_level: i32,
    pub goes_bad: bool,
    /// Fraction of shelf life consumed; rotten at 1.0
    pub relative_rot: f64,
    pub poison: i32,
    pub comestible: bool,
    /// Ammunition type loaded into this tool, if it can be unloaded
    pub ammo_type: Option<ItemTypeId>,
    /// Liquid charges this container can hold
    pub liquid_capacity: Option<i32>,
    /// Provenance: what this item was built from
    pub components: Vec<Item>,
    /// Items held inside this one (liquids, batteries, mods)
    pub contents: Vec<Item>,
    /// Name of a creature held inside (e.g. a captured pet)
    pub contained_name: Option<String>,
    /// Charges a single (batch size 1) run of the producing recipe yields
    pub recipe_charges: i32,
}

impl Item {
    /// A bare item with no template data
    pub fn new(type_id: impl Into<ItemTypeId>) -> Self {
        let type_id = type_id.into();
        Self {
            name: type_id.to_string(),
            type_id,
            charges: 0,
            count_by_charges: false,
            phase: Phase::Solid,
            unit_weight: Mass::ZERO,
            unit_volume: Volume::ZERO,
            flags: AHashSet::new(),
            qualities: Vec::new(),
            damage_level: 0,
            goes_bad: false,
            relative_rot: 0.0,
            poison: 0,
            comestible: false,
            ammo_type: None,
            liquid_capacity: None,
            components: Vec::new(),
            contents: Vec::new(),
            contained_name: None,
            recipe_charges: 1,
        }
    }

    pub fn with_charges(mut self, charges: i32) -> Self {
        self.charges = charges;
        self
    }

    pub fn with_flag(mut self, flag: &str) -> Self {
        self.set_flag(flag);
        self
    }

    pub fn has_flag(&self, flag: &str) -> bool {
        self.flags.contains(flag)
    }

    pub fn set_flag(&mut self, flag: &str) {
        self.flags.insert(flag.to_string());
    }

    pub fn unset_flag(&mut self, flag: &str) {
        self.flags.remove(flag);
    }

    /// Set a flag on this item and everything it contains
    pub fn set_flag_recursive(&mut self, flag: &str) {
        self.set_flag(flag);
        for content in &mut self.contents {
            content.set_flag_recursive(flag);
        }
    }

    pub fn is_liquid(&self) -> bool {
        self.phase == Phase::Liquid
    }

    pub fn rotten(&self) -> bool {
        self.goes_bad && self.relative_rot >= 1.0
    }

    pub fn is_food(&self) -> bool {
        self.comestible
    }

    /// Food held by this item: itself, or the last content of a filled container
    pub fn food(&self) -> Option<&Item> {
        if self.is_food() {
            Some(self)
        } else {
            self.contents.iter().rev().find(|c| c.is_food())
        }
    }

    pub fn is_container(&self) -> bool {
        self.liquid_capacity.is_some()
    }

    pub fn quality_level(&self, quality: &QualityId) -> Option<i32> {
        self.qualities
            .iter()
            .find(|(q, _)| q == quality)
            .map(|(_, level)| *level)
    }

    /// Number of units this item represents (charges for charge-counted stacks)
    pub fn quantity(&self) -> i32 {
        if self.count_by_charges {
            self.charges
        } else {
            1
        }
    }

    pub fn weight(&self) -> Mass {
        let own = self.unit_weight * i64::from(self.quantity().max(0));
        own + self.contents.iter().map(Item::weight).sum()
    }

    pub fn volume(&self) -> Volume {
        self.unit_volume * i64::from(self.quantity().max(0))
    }

    /// Remaining space for `liquid` in this container, in charges
    pub fn remaining_liquid_capacity(&self, liquid: &ItemTypeId) -> i32 {
        let Some(capacity) = self.liquid_capacity else {
            return 0;
        };
        match self.contents.first() {
            None => capacity,
            Some(held) if &held.type_id == liquid => (capacity - held.charges).max(0),
            Some(_) => 0,
        }
    }

    /// Whether `other` can merge into this stack
    pub fn stacks_with(&self, other: &Item) -> bool {
        self.count_by_charges
            && other.count_by_charges
            && self.type_id == other.type_id
            && self.flags == other.flags
            && self.damage_level == other.damage_level
            && self.components.is_empty()
            && other.components.is_empty()
            && self.charges != INFINITE_CHARGES
            && other.charges != INFINITE_CHARGES
    }

    /// Split `count` charges off this stack into a new item
    pub fn split(&mut self, count: i32) -> Item {
        let taken = count.min(self.charges).max(0);
        let mut part = self.clone();
        part.charges = taken;
        self.charges -= taken;
        part
    }

    /// Carry over flags and hidden poison from a component to this result
    pub fn inherit_flags(&mut self, parent: &Item, no_resize: bool, inherits: &dyn Fn(&str) -> bool) {
        if no_resize {
            if parent.has_flag(flags::VARSIZE) {
                self.unset_flag(flags::FIT);
            }
            if parent.has_flag(flags::FIT) {
                self.set_flag(flags::FIT);
            }
        }
        for flag in &parent.flags {
            if inherits(flag) {
                self.flags.insert(flag.clone());
            }
        }
        if parent.has_flag(flags::HIDDEN_POISON) {
            self.poison = parent.poison;
        }
    }

    /// Remove and return every removable item held inside
    pub fn take_removable_contents(&mut self) -> Vec<Item> {
        let (kept, removed): (Vec<Item>, Vec<Item>) = std::mem::take(&mut self.contents)
            .into_iter()
            .partition(|c| c.has_flag(flags::IRREMOVABLE));
        self.contents = kept;
        removed
    }
}
