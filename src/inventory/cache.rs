//! Crafting inventory snapshot cache
//!
//! Building the merged view of everything within reach scans the map, so
//! the last snapshot is reused until the crafter acts, moves or changes
//! what they hold, or time passes.

use super::Inventory;
use crate::core::types::{Tick, Tripoint};

/// What a snapshot was built for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InventoryKey {
    pub moves: i64,
    pub turn: Tick,
    pub position: Tripoint,
    pub radius: i32,
    /// Revisions of the crafter's carried and worn pools
    pub held: (u64, u64),
}

#[derive(Debug, Clone, Default)]
pub struct InventoryCache {
    key: Option<InventoryKey>,
    snapshot: Inventory,
    rebuilds: u64,
}

impl InventoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached snapshot for `key`, rebuilding it if stale
    pub fn get_or_build(&mut self, key: InventoryKey, build: impl FnOnce() -> Inventory) -> &Inventory {
        if self.key != Some(key) {
            self.snapshot = build();
            self.key = Some(key);
            self.rebuilds += 1;
            tracing::trace!(?key, items = self.snapshot.len(), "rebuilt crafting inventory");
        }
        &self.snapshot
    }

    /// Force the next lookup to rebuild
    pub fn invalidate(&mut self) {
        self.key = None;
    }

    /// Number of rebuilds performed so far
    pub fn rebuilds(&self) -> u64 {
        self.rebuilds
    }
}
