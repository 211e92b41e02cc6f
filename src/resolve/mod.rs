//! Resource resolution - which alternative to use, and from where
//!
//! Resolution works on two pools: what the crafter holds, and a snapshot of
//! the storage around them. Choosing never changes either pool; only the
//! `consume_*` functions take items.

pub mod charges;
pub mod component;
pub mod consume;
pub mod tool;

use serde::{Deserialize, Serialize};

pub use charges::{charges_for, charges_for_continuing, charges_for_starting, CostAdjustment};
pub use component::{classify, component_candidates, select_item_component, ComponentCandidates};
pub use consume::{consume_items, consume_tools, remove_ammo};
pub use tool::{find_tool_component, query_tool_selection, select_tool_component, AvailableTool};

/// Where a selected resource is taken from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum UsageFrom {
    /// Nothing is taken (tools without a charge cost)
    #[default]
    None,
    Map,
    Player,
    /// Map first, the rest from the crafter
    Both,
    Cancel,
}

impl UsageFrom {
    pub fn includes_map(self) -> bool {
        matches!(self, UsageFrom::Map | UsageFrom::Both)
    }

    pub fn includes_player(self) -> bool {
        matches!(self, UsageFrom::Player | UsageFrom::Both)
    }
}

/// A chosen alternative and its source
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CompSelection<T> {
    pub use_from: UsageFrom,
    pub comp: T,
}

impl<T> CompSelection<T> {
    pub fn new(use_from: UsageFrom, comp: T) -> Self {
        Self { use_from, comp }
    }

    pub fn is_cancelled(&self) -> bool {
        self.use_from == UsageFrom::Cancel
    }
}

/// How one requirement can be met
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Resolution {
    FromActor,
    FromEnvironment,
    /// Only by combining both pools
    Mixed,
    Unsatisfiable,
}
