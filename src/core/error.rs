use thiserror::Error;

use crate::core::types::{CraftId, RecipeId};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CraftError {
    #[error("Recipe not found: {0}")]
    UnknownRecipe(RecipeId),

    #[error("Craft not found: {0}")]
    UnknownCraft(CraftId),

    #[error("Invalid batch size: {0}")]
    InvalidBatch(i32),

    #[error("Your morale is too low to craft such a difficult thing...")]
    MoraleTooLow,

    #[error("You can't see to craft!")]
    TooDark,

    #[error("You would work too slowly to start crafting {0}")]
    TooSlow(String),

    #[error("Crafting {0} recipes is not implemented yet")]
    CategoryNotImplemented(String),

    #[error("You can no longer make that craft!\n{0}")]
    MissingRequirements(String),

    #[error("Crafting cancelled")]
    Cancelled,

    #[error("Craft {0} is not in a state that allows this operation")]
    InvalidState(CraftId),
}

impl CraftError {
    /// Gate failures are user-facing; the rest indicate caller misuse
    pub fn is_gate_failure(&self) -> bool {
        matches!(
            self,
            CraftError::MoraleTooLow
                | CraftError::TooDark
                | CraftError::TooSlow(_)
                | CraftError::CategoryNotImplemented(_)
                | CraftError::MissingRequirements(_)
                | CraftError::Cancelled
        )
    }
}

pub type Result<T> = std::result::Result<T, CraftError>;
