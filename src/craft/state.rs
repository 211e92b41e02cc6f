//! The in-progress craft entity

use serde::{Deserialize, Serialize};

use crate::core::types::{CraftId, Mass, RecipeId, Tripoint, Volume};
use crate::item::Item;
use crate::recipe::{ItemComp, ToolComp};
use crate::resolve::CompSelection;
use crate::speed::{BenchLocation, HaltReason};

/// Progress of a finished craft, in ten-millionths
pub const PROGRESS_MAX: i32 = 10_000_000;

/// Five percent of progress; skill and tool charges are settled per step
pub const PROGRESS_STEP: i32 = 500_000;

/// Why a craft stopped before completion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AbandonReason {
    /// The crafter stopped
    Cancelled,
    /// Working conditions became too poor
    Halted(HaltReason),
    MissingComponents,
    MissingTools,
    /// The crafter refused to consume replacement components
    Declined,
}

impl std::fmt::Display for AbandonReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AbandonReason::Cancelled => write!(f, "cancelled"),
            AbandonReason::Halted(reason) => write!(f, "halted ({:?})", reason),
            AbandonReason::MissingComponents => write!(f, "missing components"),
            AbandonReason::MissingTools => write!(f, "missing tools"),
            AbandonReason::Declined => write!(f, "declined to continue"),
        }
    }
}

/// Lifecycle state of a craft
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CraftState {
    InProgress,
    /// Progress and surviving components are kept for a later resume
    Abandoned(AbandonReason),
    Completed,
}

/// Where the craft object physically sits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CraftLocation {
    Carried,
    Ground(Tripoint),
    VehicleCargo(Tripoint),
}

/// Partially completed work on one batch of a recipe
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InProgressCraft {
    pub id: CraftId,
    pub recipe: RecipeId,
    pub name: String,
    pub batch_size: i32,
    /// Progress in ten-millionths of completion
    pub progress: i32,
    /// Progress value of the next failure check
    pub next_failure_point: Option<i32>,
    /// Components owned by the craft; destroyed on failure, moved into results on completion
    pub components: Vec<Item>,
    /// Component selections made at start, as absolute totals
    pub comps_used: Vec<CompSelection<ItemComp>>,
    pub tool_selections: Vec<CompSelection<ToolComp>>,
    /// Whether `tool_selections` still resolve
    pub tools_valid: bool,
    pub bench: BenchLocation,
    pub location: CraftLocation,
    pub state: CraftState,
    /// Spoilage carried over from perishable components
    pub relative_rot: f64,
}

impl InProgressCraft {
    pub fn new(recipe: RecipeId, name: impl Into<String>, batch_size: i32, bench: BenchLocation) -> Self {
        Self {
            id: CraftId::new(),
            recipe,
            name: name.into(),
            batch_size,
            progress: 0,
            next_failure_point: None,
            components: Vec::new(),
            comps_used: Vec::new(),
            tool_selections: Vec::new(),
            tools_valid: true,
            bench,
            location: CraftLocation::Carried,
            state: CraftState::InProgress,
            relative_rot: 0.0,
        }
    }

    pub fn is_active(&self) -> bool {
        self.state == CraftState::InProgress
    }

    pub fn is_complete(&self) -> bool {
        self.progress >= PROGRESS_MAX
    }

    /// Completion as a percentage
    pub fn percent(&self) -> f64 {
        f64::from(self.progress) / f64::from(PROGRESS_MAX) * 100.0
    }

    /// Next failure check; unset reads as never
    pub fn failure_point(&self) -> i32 {
        self.next_failure_point.unwrap_or(i32::MAX)
    }

    /// Whether the failure check is due
    pub fn failure_due(&self) -> bool {
        self.progress >= self.failure_point()
    }

    pub fn mass(&self) -> Mass {
        self.components.iter().map(Item::weight).sum()
    }

    pub fn volume(&self) -> Volume {
        self.components.iter().map(Item::volume).sum()
    }

    /// Take ownership of more components
    pub fn add_components(&mut self, items: impl IntoIterator<Item = Item>) {
        self.components.extend(items);
    }

    /// Hand every owned component back
    pub fn take_components(&mut self) -> Vec<Item> {
        std::mem::take(&mut self.components)
    }

    /// Rot of the most spoiled perishable component
    pub fn refresh_rot(&mut self) {
        self.relative_rot = self
            .components
            .iter()
            .filter(|c| c.goes_bad)
            .map(|c| c.relative_rot)
            .fold(0.0, f64::max);
    }
}
