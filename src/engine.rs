//! Crafting engine - owns every in-progress craft and drives them
//!
//! The engine is the exposed surface: callers pass the crafter and the
//! environment into each call and refer to crafts by [`CraftId`].

use ahash::AHashMap;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::actor::Crafter;
use crate::core::config::CraftingConfig;
use crate::core::error::{CraftError, Result};
use crate::core::types::{CraftId, RecipeId};
use crate::craft::{AbandonReason, AdvanceOutcome, CraftState, InProgressCraft, Workshop};
use crate::disassembly::{DisassemblyOutcome, DisassemblyReport};
use crate::env::CraftEnv;
use crate::inventory::InventoryCache;
use crate::item::Item;
use crate::recipe::Recipe;

/// Arena of crafts plus the state shared between calls
pub struct CraftingEngine {
    config: CraftingConfig,
    rng: ChaCha8Rng,
    crafts: AHashMap<CraftId, InProgressCraft>,
    cache: InventoryCache,
}

fn lookup<'a>(env: &CraftEnv<'a>, id: &RecipeId) -> Result<&'a Recipe> {
    let recipes = env.recipes;
    recipes.recipe(id).ok_or_else(|| CraftError::UnknownRecipe(id.clone()))
}

impl CraftingEngine {
    /// An engine seeded from `config.rng_seed`
    pub fn new(config: CraftingConfig) -> Self {
        let rng = ChaCha8Rng::seed_from_u64(config.rng_seed);
        Self::with_rng(config, rng)
    }

    pub fn with_rng(config: CraftingConfig, rng: ChaCha8Rng) -> Self {
        Self {
            config,
            rng,
            crafts: AHashMap::new(),
            cache: InventoryCache::new(),
        }
    }

    pub fn config(&self) -> &CraftingConfig {
        &self.config
    }

    /// Get a craft by ID
    pub fn craft(&self, id: CraftId) -> Option<&InProgressCraft> {
        self.crafts.get(&id)
    }

    /// Every craft the engine still owns, in no particular order
    pub fn crafts(&self) -> impl Iterator<Item = &InProgressCraft> {
        self.crafts.values()
    }

    pub fn active_count(&self) -> usize {
        self.crafts.values().filter(|c| c.is_active()).count()
    }

    /// Whether `recipe` could be started right now
    pub fn can_attempt(&mut self, crafter: &mut Crafter, env: &mut CraftEnv<'_>, recipe: &RecipeId, batch: i32) -> bool {
        let Ok(recipe) = lookup(env, recipe) else {
            return false;
        };
        let mut ws = Workshop::new(crafter, env, &self.config, &mut self.rng, &mut self.cache);
        ws.check_start(recipe, batch).is_ok()
    }

    /// Moves a batch is expected to take at the crafter's current speed
    pub fn expected_time(&mut self, crafter: &mut Crafter, env: &mut CraftEnv<'_>, recipe: &RecipeId, batch: i32) -> Result<i32> {
        let recipe = lookup(env, recipe)?;
        let ws = Workshop::new(crafter, env, &self.config, &mut self.rng, &mut self.cache);
        Ok(ws.expected_time_to_craft(recipe, batch, false))
    }

    /// Start a craft; the engine keeps it until it completes or is released
    pub fn start(&mut self, crafter: &mut Crafter, env: &mut CraftEnv<'_>, recipe: &RecipeId, batch: i32) -> Result<CraftId> {
        let recipe = match lookup(env, recipe) {
            Ok(recipe) => recipe,
            Err(err) => {
                env.bad(err.to_string());
                return Err(err);
            }
        };
        let craft = {
            let mut ws = Workshop::new(crafter, env, &self.config, &mut self.rng, &mut self.cache);
            ws.start(recipe, batch)?
        };
        let id = craft.id;
        tracing::debug!(craft = %id, recipe = %recipe.id, batch, "craft registered");
        self.crafts.insert(id, craft);
        Ok(id)
    }

    /// Spend `moves` of work on a craft
    ///
    /// Completed crafts leave the engine; abandoned ones stay until resumed
    /// or released.
    pub fn advance(
        &mut self,
        crafter: &mut Crafter,
        env: &mut CraftEnv<'_>,
        id: CraftId,
        moves: i32,
    ) -> Result<AdvanceOutcome> {
        let recipe = self.active_recipe(env, id)?;
        let Some(mut craft) = self.crafts.remove(&id) else {
            return Err(CraftError::UnknownCraft(id));
        };

        let outcome = {
            let mut ws = Workshop::new(crafter, env, &self.config, &mut self.rng, &mut self.cache);
            ws.advance(&mut craft, recipe, moves)
        };
        if craft.state != CraftState::Completed {
            self.crafts.insert(id, craft);
        }
        Ok(outcome)
    }

    /// Stop work on a craft, keeping its progress and components
    pub fn cancel(&mut self, id: CraftId) -> Result<()> {
        let Some(craft) = self.crafts.get_mut(&id) else {
            tracing::error!(craft = %id, "cancel of unknown craft");
            return Err(CraftError::UnknownCraft(id));
        };
        craft.state = CraftState::Abandoned(AbandonReason::Cancelled);
        tracing::debug!(craft = %id, progress = craft.progress, "craft cancelled");
        Ok(())
    }

    /// Re-validate an abandoned craft and put it back to work
    ///
    /// Returns the craft's state afterwards; a failed checkpoint leaves it
    /// abandoned with the new reason.
    pub fn resume(&mut self, crafter: &mut Crafter, env: &mut CraftEnv<'_>, id: CraftId) -> Result<CraftState> {
        let recipe_id = match self.crafts.get(&id) {
            Some(craft) if matches!(craft.state, CraftState::Abandoned(_)) => craft.recipe.clone(),
            Some(_) => {
                tracing::error!(craft = %id, "resume of a craft that was not abandoned");
                return Err(CraftError::InvalidState(id));
            }
            None => {
                tracing::error!(craft = %id, "resume of unknown craft");
                return Err(CraftError::UnknownCraft(id));
            }
        };
        let recipe = lookup(env, &recipe_id)?;
        let Some(craft) = self.crafts.get_mut(&id) else {
            return Err(CraftError::UnknownCraft(id));
        };

        let mut ws = Workshop::new(crafter, env, &self.config, &mut self.rng, &mut self.cache);
        craft.state = match ws.continue_checkpoint(craft, recipe) {
            Ok(()) => {
                ws.env.neutral(format!("You resume working on the {}.", craft.name));
                CraftState::InProgress
            }
            Err(reason) => CraftState::Abandoned(reason),
        };
        tracing::debug!(craft = %id, state = ?craft.state, "craft resume attempted");
        Ok(craft.state)
    }

    /// Retire a craft and hand its components back
    pub fn release(&mut self, id: CraftId) -> Result<Vec<Item>> {
        let Some(mut craft) = self.crafts.remove(&id) else {
            tracing::error!(craft = %id, "release of unknown craft");
            return Err(CraftError::UnknownCraft(id));
        };
        tracing::debug!(craft = %id, progress = craft.progress, "craft released");
        Ok(craft.take_components())
    }

    /// Take one item apart
    pub fn disassemble(&mut self, crafter: &mut Crafter, env: &mut CraftEnv<'_>, item: Item) -> DisassemblyOutcome {
        let mut ws = Workshop::new(crafter, env, &self.config, &mut self.rng, &mut self.cache);
        ws.disassemble(item)
    }

    /// Take apart everything that can be on the crafter's tile
    pub fn disassemble_all(&mut self, crafter: &mut Crafter, env: &mut CraftEnv<'_>) -> Vec<DisassemblyReport> {
        let mut ws = Workshop::new(crafter, env, &self.config, &mut self.rng, &mut self.cache);
        ws.disassemble_all()
    }

    fn active_recipe<'a>(&self, env: &CraftEnv<'a>, id: CraftId) -> Result<&'a Recipe> {
        match self.crafts.get(&id) {
            Some(craft) if craft.is_active() => lookup(env, &craft.recipe),
            Some(craft) => {
                tracing::error!(craft = %id, state = ?craft.state, "advance of an inactive craft");
                Err(CraftError::InvalidState(id))
            }
            None => {
                tracing::error!(craft = %id, "advance of unknown craft");
                Err(CraftError::UnknownCraft(id))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{GridMap, MessageLog};
    use crate::item::ItemCatalog;
    use crate::recipe::RecipeCatalog;

    struct World {
        recipes: RecipeCatalog,
        items: ItemCatalog,
        map: GridMap,
        log: MessageLog,
        crafter: Crafter,
    }

    impl World {
        fn new() -> Self {
            let items = ItemCatalog::with_defaults();
            let mut crafter = Crafter::new("Ada");
            crafter.skills.set_level("fabrication".into(), 8);
            for _ in 0..4 {
                crafter.carried.add(items.spawn(&"plank".into()));
            }
            for id in ["hammer", "saw"] {
                crafter.carried.add(items.spawn(&id.into()));
            }
            crafter.carried.add(items.spawn(&"nail".into()).with_charges(10));
            Self {
                recipes: RecipeCatalog::with_defaults(),
                items,
                map: GridMap::new(),
                log: MessageLog::new(),
                crafter,
            }
        }
    }

    macro_rules! with_env {
        ($world:expr, |$crafter:ident, $env:ident| $body:expr) => {{
            let w = &mut $world;
            let mut $env = CraftEnv::new(&w.recipes, &w.items, &mut w.map, &mut w.log);
            let $crafter = &mut w.crafter;
            $body
        }};
    }

    #[test]
    fn test_unknown_recipe() {
        let mut world = World::new();
        let mut engine = CraftingEngine::new(CraftingConfig::default());
        let result = with_env!(world, |crafter, env| engine.start(crafter, &mut env, &"rocket".into(), 1));
        assert_eq!(result, Err(CraftError::UnknownRecipe("rocket".into())));
        assert!(world.log.contains("Recipe not found: rocket"));
    }

    #[test]
    fn test_craft_runs_to_completion() {
        let mut world = World::new();
        let mut engine = CraftingEngine::new(CraftingConfig::default());
        let shelf: RecipeId = "shelf".into();

        assert!(with_env!(world, |crafter, env| engine.can_attempt(crafter, &mut env, &shelf, 1)));
        let id = with_env!(world, |crafter, env| engine.start(crafter, &mut env, &shelf, 1)).expect("start");
        assert_eq!(engine.active_count(), 1);

        let mut completed = false;
        for _ in 0..200 {
            let outcome = with_env!(world, |crafter, env| engine.advance(crafter, &mut env, id, 600)).expect("advance");
            match outcome {
                AdvanceOutcome::Completed(_) => {
                    completed = true;
                    break;
                }
                AdvanceOutcome::Abandoned(reason) => panic!("abandoned: {}", reason),
                AdvanceOutcome::InProgress { .. } => {}
            }
        }
        assert!(completed);
        assert!(engine.craft(id).is_none());
        assert_eq!(world.crafter.carried.amount_of(&"shelf".into(), &crate::inventory::any_item), 1);
    }

    #[test]
    fn test_cancel_resume_release() {
        let mut world = World::new();
        let mut engine = CraftingEngine::new(CraftingConfig::default());
        let id = with_env!(world, |crafter, env| engine.start(crafter, &mut env, &"shelf".into(), 1)).expect("start");

        engine.cancel(id).expect("cancel");
        assert_eq!(
            engine.craft(id).map(|c| c.state),
            Some(CraftState::Abandoned(AbandonReason::Cancelled))
        );
        let refused = with_env!(world, |crafter, env| engine.advance(crafter, &mut env, id, 600));
        assert_eq!(refused, Err(CraftError::InvalidState(id)));

        let state = with_env!(world, |crafter, env| engine.resume(crafter, &mut env, id)).expect("resume");
        assert_eq!(state, CraftState::InProgress);
        assert!(world.log.contains("You resume working on the in progress shelf."));

        let components = engine.release(id).expect("release");
        assert_eq!(components.len(), 5);
        assert!(engine.craft(id).is_none());
        assert_eq!(engine.release(id), Err(CraftError::UnknownCraft(id)));
    }
}
