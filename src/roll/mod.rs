//! Success roll model
//!
//! Pure dice computations. Nothing here narrates; callers turn the results
//! into messages.

pub mod dice;
pub mod failure;
pub mod success;

pub use dice::{dice, one_in, rng_exponential, roll_remainder, x_in_y};
pub use failure::{max_destroyed, roll_failure, FailureReport};
pub use success::{crafting_success_roll, next_failure_point, DicePool, AUTOMATIC_SUCCESS};
