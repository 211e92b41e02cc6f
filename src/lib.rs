//! Craftwork - crafting progression, resource resolution and disassembly

pub mod actor;
pub mod core;
pub mod craft;
pub mod disassembly;
pub mod engine;
pub mod env;
pub mod inventory;
pub mod item;
pub mod recipe;
pub mod resolve;
pub mod roll;
pub mod speed;

pub use engine::CraftingEngine;
