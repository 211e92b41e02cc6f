//! Inventory - an owned pool of item instances
//!
//! Used for the crafter's carried and worn items, for each map tile and
//! vehicle cargo space, and for the merged crafting snapshot.

pub mod cache;

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use crate::core::types::{ItemTypeId, QualityId};
use crate::item::{Item, INFINITE_CHARGES};

pub use cache::{InventoryCache, InventoryKey};

/// Predicate applied to candidate items
pub type ItemFilter<'a> = &'a dyn Fn(&Item) -> bool;

/// Filter accepting every item
pub fn any_item(_: &Item) -> bool {
    true
}

static REVISIONS: AtomicU64 = AtomicU64::new(1);

fn next_revision() -> u64 {
    REVISIONS.fetch_add(1, Ordering::Relaxed)
}

/// A pool of items
///
/// Every mutation stamps the pool with a fresh process-wide revision, so two
/// pools with the same revision hold the same items.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Inventory {
    items: Vec<Item>,
    #[serde(skip, default = "next_revision")]
    revision: u64,
}

impl PartialEq for Inventory {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_items(items: impl IntoIterator<Item = Item>) -> Self {
        let mut inv = Self::new();
        for item in items {
            inv.add(item);
        }
        inv
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn items_mut(&mut self) -> &mut Vec<Item> {
        self.touch();
        &mut self.items
    }

    /// Stamp of the last mutation
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn touch(&mut self) {
        self.revision = next_revision();
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Add an item, merging charge stacks
    pub fn add(&mut self, item: Item) {
        self.touch();
        if let Some(stack) = self.items.iter_mut().find(|i| i.stacks_with(&item)) {
            stack.charges += item.charges;
            return;
        }
        self.items.push(item);
    }

    /// Add every item of another inventory
    pub fn merge(&mut self, other: &Inventory) {
        for item in &other.items {
            self.add(item.clone());
        }
    }

    /// Number of discrete items of `type_id`
    pub fn amount_of(&self, type_id: &ItemTypeId, filter: ItemFilter<'_>) -> i32 {
        self.items
            .iter()
            .filter(|i| &i.type_id == type_id && filter(i))
            .count() as i32
    }

    /// Total charges of `type_id`; an infinite source reports `INFINITE_CHARGES`
    pub fn charges_of(&self, type_id: &ItemTypeId, filter: ItemFilter<'_>) -> i32 {
        let mut total: i32 = 0;
        for item in self.items.iter().filter(|i| &i.type_id == type_id && filter(i)) {
            if item.charges == INFINITE_CHARGES {
                return INFINITE_CHARGES;
            }
            total = total.saturating_add(item.charges.max(0));
        }
        total
    }

    /// Units of `type_id` in the counting mode of its items
    pub fn quantity_of(&self, type_id: &ItemTypeId, by_charges: bool, filter: ItemFilter<'_>) -> i32 {
        if by_charges {
            self.charges_of(type_id, filter)
        } else {
            self.amount_of(type_id, filter)
        }
    }

    pub fn has_components(&self, type_id: &ItemTypeId, count: i32, filter: ItemFilter<'_>) -> bool {
        self.amount_of(type_id, filter) >= count
    }

    pub fn has_tools(&self, type_id: &ItemTypeId, count: i32) -> bool {
        self.amount_of(type_id, &any_item) >= count
    }

    pub fn has_charges(&self, type_id: &ItemTypeId, count: i32) -> bool {
        self.charges_of(type_id, &any_item) >= count
    }

    /// Whether at least `count` items offer `quality` at `level` or better
    pub fn has_quality(&self, quality: &QualityId, level: i32, count: i32) -> bool {
        self.items
            .iter()
            .filter(|i| i.quality_level(quality).is_some_and(|l| l >= level))
            .count() as i32
            >= count
    }

    /// Whether any item of this type is charge-counted
    pub fn counts_by_charges(&self, type_id: &ItemTypeId) -> Option<bool> {
        self.items
            .iter()
            .find(|i| &i.type_id == type_id)
            .map(|i| i.count_by_charges)
    }

    /// Remove up to `count` discrete items, decrementing `count` by what was taken
    pub fn use_amount(&mut self, type_id: &ItemTypeId, count: &mut i32, filter: ItemFilter<'_>) -> Vec<Item> {
        self.touch();
        let mut taken = Vec::new();
        let mut idx = 0;
        while idx < self.items.len() && *count > 0 {
            let item = &self.items[idx];
            if &item.type_id == type_id && filter(item) {
                taken.push(self.items.remove(idx));
                *count -= 1;
            } else {
                idx += 1;
            }
        }
        taken
    }

    /// Remove up to `count` charges, decrementing `count` by what was taken
    ///
    /// Charge stacks are split; tool charges are drained in place and
    /// produce no item. Infinite sources are never depleted.
    pub fn use_charges(&mut self, type_id: &ItemTypeId, count: &mut i32, filter: ItemFilter<'_>) -> Vec<Item> {
        self.touch();
        let mut taken = Vec::new();
        let mut idx = 0;
        while idx < self.items.len() && *count > 0 {
            let item = &mut self.items[idx];
            if &item.type_id != type_id || !filter(item) {
                idx += 1;
                continue;
            }
            if item.charges == INFINITE_CHARGES {
                let mut part = item.clone();
                part.charges = *count;
                taken.push(part);
                *count = 0;
                break;
            }
            if !item.count_by_charges {
                let used = (*count).min(item.charges.max(0));
                item.charges -= used;
                *count -= used;
                idx += 1;
                continue;
            }
            if item.charges <= *count {
                *count -= item.charges;
                taken.push(self.items.remove(idx));
            } else {
                taken.push(item.split(*count));
                *count = 0;
            }
        }
        taken
    }

    /// Remove the item at `index`
    pub fn remove(&mut self, index: usize) -> Option<Item> {
        if index < self.items.len() {
            self.touch();
            Some(self.items.remove(index))
        } else {
            None
        }
    }

    /// Remove and return every item matching `pred`
    pub fn remove_matching(&mut self, pred: impl Fn(&Item) -> bool) -> Vec<Item> {
        self.touch();
        let (taken, kept): (Vec<Item>, Vec<Item>) =
            std::mem::take(&mut self.items).into_iter().partition(|i| pred(i));
        self.items = kept;
        taken
    }
}
