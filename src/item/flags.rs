//! Item flag names understood by the crafting engine

/// Clothing fitted to its wearer
pub const FIT: &str = "FIT";
/// Clothing that can be refitted
pub const VARSIZE: &str = "VARSIZE";
/// Poison that is not visible to the player
pub const HIDDEN_POISON: &str = "HIDDEN_POISON";
/// Food whose nutrition ignores its components
pub const NUTRIENT_OVERRIDE: &str = "NUTRIENT_OVERRIDE";
/// Food that went through heating or dehydration
pub const COOKED: &str = "COOKED";
/// Component record that came from a byproduct rather than an input
pub const BYPRODUCT: &str = "BYPRODUCT";
/// Summoned items that cannot be taken apart
pub const ETHEREAL_ITEM: &str = "ETHEREAL_ITEM";
/// Contents that stay in place when the item is emptied
pub const IRREMOVABLE: &str = "IRREMOVABLE";
/// Tools whose charges cannot be unloaded
pub const NO_UNLOAD: &str = "NO_UNLOAD";

/// Flags carried over from components to crafted results by default
pub const CRAFT_INHERITED_FLAGS: &[&str] = &[
    "HIDDEN_POISON",
    "HIDDEN_HALLU",
    "RADIOACTIVE",
    "FILTHY",
    "ACID",
];
