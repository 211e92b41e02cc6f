//! Craft state machine
//!
//! A craft is started once, advanced tick by tick, and ends completed or
//! abandoned. Abandoned crafts keep their progress and surviving
//! components and can be resumed.
//!
//! The operations live on [`Workshop`], which bundles the borrows one call
//! needs: the crafter, the collaborators, the configuration, the generator
//! and the crafting-inventory cache.

pub mod bench;
pub mod completion;
pub mod continuation;
pub mod liquid;
pub mod placement;
pub mod progress;
pub mod skill;
pub mod start;
pub mod state;

use rand::RngCore;

use crate::actor::Crafter;
use crate::core::config::CraftingConfig;
use crate::env::CraftEnv;
use crate::inventory::{Inventory, InventoryCache, InventoryKey};
use crate::recipe::Recipe;
use crate::roll::{next_failure_point, DicePool};

pub use bench::{best_bench_here, bench_speed, find_best_bench};
pub use completion::CompletionReport;
pub use placement::{place_output, Placement};
pub use progress::{progress_after, AdvanceOutcome};
pub use state::{AbandonReason, CraftLocation, CraftState, InProgressCraft, PROGRESS_MAX, PROGRESS_STEP};

/// Everything one crafting call works with
pub struct Workshop<'w, 'a> {
    pub crafter: &'w mut Crafter,
    pub env: &'w mut CraftEnv<'a>,
    pub config: &'w CraftingConfig,
    pub rng: &'w mut dyn RngCore,
    pub cache: &'w mut InventoryCache,
}

impl<'w, 'a> Workshop<'w, 'a> {
    pub fn new(
        crafter: &'w mut Crafter,
        env: &'w mut CraftEnv<'a>,
        config: &'w CraftingConfig,
        rng: &'w mut dyn RngCore,
        cache: &'w mut InventoryCache,
    ) -> Self {
        Self {
            crafter,
            env,
            config,
            rng,
            cache,
        }
    }

    /// Everything usable for crafting: nearby storage, held items and pseudo tools
    pub fn crafting_inventory(&mut self) -> Inventory {
        let key = InventoryKey {
            moves: self.crafter.moves,
            turn: self.env.turn,
            position: self.crafter.position,
            radius: self.config.pickup_range,
            held: (self.crafter.carried.revision(), self.crafter.worn.revision()),
        };
        let crafter = &*self.crafter;
        let map = &*self.env.map;
        self.cache
            .get_or_build(key, || {
                let mut inv = map.storage_snapshot(key.position, key.radius);
                inv.merge(&crafter.tool_pool());
                inv
            })
            .clone()
    }

    /// Nearby storage only
    pub fn map_snapshot(&self) -> Inventory {
        self.env
            .map
            .storage_snapshot(self.crafter.position, self.config.pickup_range)
    }

    /// Forget the cached snapshot after items were taken
    pub fn invalidate_inventory(&mut self) {
        self.cache.invalidate();
    }

    /// Dice pool for `recipe` with the current helpers
    pub fn dice_pool(&self, recipe: &Recipe) -> DicePool {
        DicePool::for_craft(self.crafter, recipe, &self.env.helpers, self.config)
    }

    /// Throw a fresh success ratio, narrating any helper assistance
    pub fn success_roll(&mut self, recipe: &Recipe) -> f64 {
        let pool = self.dice_pool(recipe);
        if let Some(helper) = &pool.assisted_by {
            self.env.info(format!("{} helps with crafting…", helper));
        }
        pool.ratio(&mut *self.rng)
    }

    /// Roll and store the next failure point of `craft`
    pub fn schedule_failure(&mut self, craft: &mut InProgressCraft, recipe: &Recipe) {
        let ratio = self.success_roll(recipe);
        let point = next_failure_point(craft.progress, ratio);
        tracing::trace!(craft = %craft.id, ratio, point, "failure point scheduled");
        craft.next_failure_point = Some(point);
    }
}

#[cfg(test)]
pub(crate) mod fixture {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::Workshop;
    use crate::actor::{Crafter, Helper};
    use crate::core::config::CraftingConfig;
    use crate::core::types::Tick;
    use crate::env::{CraftEnv, DecisionStrategy, GridMap, MessageLog, ScriptedPrompts};
    use crate::inventory::InventoryCache;
    use crate::item::{Item, ItemCatalog};
    use crate::recipe::RecipeCatalog;

    /// Owns everything a [`Workshop`] borrows
    pub struct Fixture {
        pub recipes: RecipeCatalog,
        pub items: ItemCatalog,
        pub map: GridMap,
        pub log: MessageLog,
        pub crafter: Crafter,
        pub helpers: Vec<Helper>,
        /// Answers for an interactive crafter; autonomous when unset
        pub prompts: Option<ScriptedPrompts>,
        pub config: CraftingConfig,
        pub rng: ChaCha8Rng,
        pub cache: InventoryCache,
        pub turn: Tick,
    }

    impl Fixture {
        pub fn new() -> Self {
            Self {
                recipes: RecipeCatalog::with_defaults(),
                items: ItemCatalog::with_defaults(),
                map: GridMap::new(),
                log: MessageLog::new(),
                crafter: Crafter::new("Ada"),
                helpers: Vec::new(),
                prompts: None,
                config: CraftingConfig::default(),
                rng: ChaCha8Rng::seed_from_u64(7),
                cache: InventoryCache::new(),
                turn: 1,
            }
        }

        pub fn spawn(&self, id: &str) -> Item {
            self.items.spawn(&id.into())
        }

        /// Planks, nails and tools for one shelf, carried
        pub fn stock_shelf(&mut self) {
            for _ in 0..4 {
                let plank = self.spawn("plank");
                self.crafter.carried.add(plank);
            }
            let nails = self.spawn("nail").with_charges(10);
            let hammer = self.spawn("hammer");
            let saw = self.spawn("saw");
            self.crafter.carried.add(nails);
            self.crafter.carried.add(hammer);
            self.crafter.carried.add(saw);
            self.cache.invalidate();
        }

        pub fn run<T>(&mut self, f: impl FnOnce(&mut Workshop<'_, '_>) -> T) -> T {
            let mut env = CraftEnv::new(&self.recipes, &self.items, &mut self.map, &mut self.log)
                .with_helpers(std::mem::take(&mut self.helpers))
                .at_turn(self.turn);
            if let Some(prompts) = self.prompts.as_mut() {
                env = env.with_decider(DecisionStrategy::Interactive(prompts));
            }
            let out = {
                let mut ws = Workshop::new(&mut self.crafter, &mut env, &self.config, &mut self.rng, &mut self.cache);
                f(&mut ws)
            };
            self.helpers = env.helpers;
            out
        }
    }
}
