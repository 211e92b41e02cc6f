//! Collaborators the crafting engine consumes
//!
//! The engine never reaches into global state. Recipe and item data, the
//! surrounding map, the decision surface and the message log are passed
//! in through [`CraftEnv`] on every call.

pub mod decision;
pub mod map;
pub mod memory;
pub mod narration;

use crate::actor::Helper;
use crate::core::types::{ItemTypeId, RecipeId, Tick};
use crate::item::{flags, Item, ItemCatalog, ItemTemplate};
use crate::recipe::Recipe;

pub use decision::{DecisionStrategy, PromptSurface, ScriptedPrompts};
pub use map::MapAccess;
pub use memory::GridMap;
pub use narration::{Message, MessageKind, MessageLog, Narrator, Silent};

/// Read-only recipe lookup
pub trait RecipeBook {
    fn recipe(&self, id: &RecipeId) -> Option<&Recipe>;

    /// Reverse recipe used to disassemble items of `item_type`
    fn uncraft(&self, item_type: &ItemTypeId) -> Option<&Recipe>;
}

/// Read-only item type database
pub trait ItemOracle {
    fn template(&self, id: &ItemTypeId) -> Option<&ItemTemplate>;

    /// Create a fresh item of the given type
    fn spawn(&self, id: &ItemTypeId) -> Item {
        match self.template(id) {
            Some(template) => template.spawn(),
            None => {
                tracing::error!(item = %id, "spawning item with no template");
                Item::new(id.clone())
            }
        }
    }

    /// Whether crafted results pick this flag up from their components
    fn flag_inherits(&self, flag: &str) -> bool {
        flags::CRAFT_INHERITED_FLAGS.contains(&flag)
    }
}

impl ItemOracle for ItemCatalog {
    fn template(&self, id: &ItemTypeId) -> Option<&ItemTemplate> {
        self.get(id)
    }

    fn spawn(&self, id: &ItemTypeId) -> Item {
        ItemCatalog::spawn(self, id)
    }
}

/// Everything outside the crafter that one engine call may touch
pub struct CraftEnv<'a> {
    pub recipes: &'a dyn RecipeBook,
    pub items: &'a dyn ItemOracle,
    pub map: &'a mut dyn MapAccess,
    pub decider: DecisionStrategy<'a>,
    pub narrator: &'a mut dyn Narrator,
    /// Characters nearby who can assist; they practice alongside the crafter
    pub helpers: Vec<Helper>,
    pub turn: Tick,
}

impl<'a> CraftEnv<'a> {
    /// An autonomous environment with no helpers at turn 0
    pub fn new(
        recipes: &'a dyn RecipeBook,
        items: &'a dyn ItemOracle,
        map: &'a mut dyn MapAccess,
        narrator: &'a mut dyn Narrator,
    ) -> Self {
        Self {
            recipes,
            items,
            map,
            decider: DecisionStrategy::Autonomous,
            narrator,
            helpers: Vec::new(),
            turn: 0,
        }
    }

    pub fn with_decider(mut self, decider: DecisionStrategy<'a>) -> Self {
        self.decider = decider;
        self
    }

    pub fn with_helpers(mut self, helpers: Vec<Helper>) -> Self {
        self.helpers = helpers;
        self
    }

    pub fn at_turn(mut self, turn: Tick) -> Self {
        self.turn = turn;
        self
    }

    pub fn is_interactive(&self) -> bool {
        self.decider.is_interactive()
    }

    pub fn info(&mut self, text: impl Into<String>) {
        self.narrator.add(MessageKind::Info, text.into());
    }

    pub fn good(&mut self, text: impl Into<String>) {
        self.narrator.add(MessageKind::Good, text.into());
    }

    pub fn bad(&mut self, text: impl Into<String>) {
        self.narrator.add(MessageKind::Bad, text.into());
    }

    pub fn neutral(&mut self, text: impl Into<String>) {
        self.narrator.add(MessageKind::Neutral, text.into());
    }
}
