//! Tool charge costing across the life of a craft
//!
//! A craft pays a small share of its tool charges up front and the rest at
//! each 5% progress checkpoint. Twenty checkpoints times the continuing
//! cost plus the starting remainder adds up to the full cost.

use serde::{Deserialize, Serialize};

/// Which slice of the full charge cost is being requested
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CostAdjustment {
    /// The whole cost at once
    #[default]
    None,
    /// The up-front cost paid when the craft starts
    StartOnly,
    /// The cost of one 5% checkpoint
    ContinueOnly,
}

pub fn charges_for_complete(full_charges: i32) -> i32 {
    full_charges
}

pub fn charges_for_starting(full_charges: i32) -> i32 {
    full_charges / 20 + full_charges % 20
}

pub fn charges_for_continuing(full_charges: i32) -> i32 {
    full_charges / 20
}

pub fn charges_for(adjustment: CostAdjustment, full_charges: i32) -> i32 {
    match adjustment {
        CostAdjustment::None => charges_for_complete(full_charges),
        CostAdjustment::StartOnly => charges_for_starting(full_charges),
        CostAdjustment::ContinueOnly => charges_for_continuing(full_charges),
    }
}
