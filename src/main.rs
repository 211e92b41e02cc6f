//! Craftwork - Command Line Harness
//!
//! Runs one crafting scenario to completion without prompting: the crafter,
//! their belongings, nearby storage and work surfaces come from a TOML file,
//! item and recipe data from a data directory (or the built-in catalogs).

use std::path::{Path, PathBuf};

use ahash::AHashMap;
use clap::Parser;
use craftwork::actor::Crafter;
use craftwork::core::config::ConfigError;
use craftwork::core::{CraftError, CraftingConfig};
use craftwork::core::types::{ItemTypeId, Mass, RecipeId, SkillId, TraitId, Tripoint, Volume};
use craftwork::craft::{AdvanceOutcome, Placement};
use craftwork::disassembly::DisassemblyOutcome;
use craftwork::env::{CraftEnv, GridMap, MessageKind, MessageLog};
use craftwork::item::{Item, ItemCatalog, ItemLoadError};
use craftwork::recipe::{RecipeCatalog, RecipeLoadError};
use craftwork::speed::WorkbenchInfo;
use craftwork::CraftingEngine;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Craftwork - run a crafting scenario headless
#[derive(Parser, Debug)]
#[command(name = "craftwork")]
#[command(about = "Run a crafting scenario and report what it produced")]
struct Args {
    /// Scenario file describing the crafter and their surroundings
    scenario: PathBuf,

    /// Directory holding items.toml and recipes.toml (built-in data if omitted)
    #[arg(long)]
    data: Option<PathBuf>,

    /// Engine configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Override the scenario's batch size
    #[arg(long)]
    batch: Option<i32>,

    /// Moves of work spent per tick
    #[arg(long, default_value_t = 100)]
    moves: i32,

    /// Give up after this many ticks
    #[arg(long, default_value_t = 100_000)]
    max_ticks: u64,

    /// Print a JSON summary instead of the message log
    #[arg(long)]
    json: bool,
}

#[derive(Error, Debug)]
enum CliError {
    #[error("Scenario file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Scenario parse error: {0}")]
    Scenario(#[from] toml::de::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Items(#[from] ItemLoadError),

    #[error(transparent)]
    Recipes(#[from] RecipeLoadError),

    #[error(transparent)]
    Craft(#[from] CraftError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// TOML representation of a scenario file
#[derive(Debug, Deserialize)]
struct Scenario {
    recipe: RecipeId,
    #[serde(default = "default_batch")]
    batch: i32,
    /// Take the finished result apart again
    #[serde(default)]
    disassemble_result: bool,
    crafter: CrafterDef,
    #[serde(default)]
    carried: Vec<Stock>,
    #[serde(default)]
    worn: Vec<Stock>,
    #[serde(default)]
    nearby: Vec<Stock>,
    #[serde(default)]
    benches: Vec<BenchDef>,
}

fn default_batch() -> i32 {
    1
}

#[derive(Debug, Deserialize)]
struct CrafterDef {
    name: String,
    #[serde(default)]
    position: Tripoint,
    #[serde(default)]
    intelligence: Option<i32>,
    #[serde(default)]
    morale: i32,
    #[serde(default)]
    vision_mod: Option<f32>,
    #[serde(default)]
    skills: AHashMap<SkillId, i32>,
    #[serde(default)]
    traits: Vec<TraitId>,
    #[serde(default)]
    known_recipes: Vec<RecipeId>,
}

/// Some number of items of one type
#[derive(Debug, Deserialize)]
struct Stock {
    item: ItemTypeId,
    /// Separate items to spawn
    #[serde(default = "default_count")]
    count: usize,
    /// Charges of each spawned item, for charge-counted types
    #[serde(default)]
    charges: Option<i32>,
    /// Tile for nearby stock; ignored for carried and worn items
    #[serde(default)]
    at: Option<Tripoint>,
}

fn default_count() -> usize {
    1
}

#[derive(Debug, Deserialize)]
struct BenchDef {
    at: Tripoint,
    multiplier: f32,
    allowed_mass: Mass,
    allowed_volume: Volume,
}

/// JSON output structure
#[derive(Serialize)]
struct RunSummary {
    recipe: RecipeId,
    batch: i32,
    seed: u64,
    ticks: u64,
    outcome: String,
    outputs: Vec<(String, Placement)>,
    recovered: Vec<(String, Placement)>,
    messages: Vec<String>,
}

fn spawn_stock(items: &ItemCatalog, stock: &Stock) -> Vec<Item> {
    (0..stock.count)
        .map(|_| {
            let item = items.spawn(&stock.item);
            match stock.charges {
                Some(charges) => item.with_charges(charges),
                None => item,
            }
        })
        .collect()
}

fn build_crafter(scenario: &Scenario, items: &ItemCatalog) -> Crafter {
    let def = &scenario.crafter;
    let mut crafter = Crafter::new(def.name.clone());
    crafter.position = def.position;
    crafter.morale = def.morale;
    if let Some(intelligence) = def.intelligence {
        crafter.intelligence = intelligence;
    }
    if let Some(vision_mod) = def.vision_mod {
        crafter.vision_mod = vision_mod;
    }
    for (skill, level) in &def.skills {
        crafter.skills.set_level(skill.clone(), *level);
    }
    crafter.traits.extend(def.traits.iter().cloned());
    crafter.known_recipes.extend(def.known_recipes.iter().cloned());

    for stock in &scenario.carried {
        for item in spawn_stock(items, stock) {
            crafter.carried.add(item);
        }
    }
    for stock in &scenario.worn {
        for item in spawn_stock(items, stock) {
            crafter.worn.add(item);
        }
    }
    crafter
}

fn build_map(scenario: &Scenario, items: &ItemCatalog) -> GridMap {
    let mut map = GridMap::new();
    for stock in &scenario.nearby {
        let at = stock.at.unwrap_or(scenario.crafter.position);
        for item in spawn_stock(items, stock) {
            map.place(at, item);
        }
    }
    for bench in &scenario.benches {
        map.set_furniture_bench(
            bench.at,
            WorkbenchInfo::new(bench.multiplier, bench.allowed_mass, bench.allowed_volume),
        );
    }
    map
}

fn load_catalogs(data: Option<&Path>) -> Result<(ItemCatalog, RecipeCatalog), CliError> {
    match data {
        Some(dir) => {
            let items = ItemCatalog::load_from_toml(&dir.join("items.toml"))?;
            let recipes = RecipeCatalog::load_from_toml(&dir.join("recipes.toml"))?;
            tracing::info!(items = items.len(), recipes = recipes.len(), dir = %dir.display(), "catalogs loaded");
            Ok((items, recipes))
        }
        None => Ok((ItemCatalog::with_defaults(), RecipeCatalog::with_defaults())),
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("craftwork=debug")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    if let Err(err) = run(&args) {
        tracing::error!(%err, "scenario failed");
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), CliError> {
    let scenario: Scenario = toml::from_str(&std::fs::read_to_string(&args.scenario)?)?;
    let mut config = match &args.config {
        Some(path) => CraftingConfig::load(path)?,
        None => CraftingConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.rng_seed = seed;
    }
    let seed = config.rng_seed;
    let batch = args.batch.unwrap_or(scenario.batch);

    let (items, recipes) = load_catalogs(args.data.as_deref())?;
    let mut crafter = build_crafter(&scenario, &items);
    let mut map = build_map(&scenario, &items);
    let mut log = MessageLog::new();
    let mut engine = CraftingEngine::new(config);

    let mut summary = RunSummary {
        recipe: scenario.recipe.clone(),
        batch,
        seed,
        ticks: 0,
        outcome: "unfinished".into(),
        outputs: Vec::new(),
        recovered: Vec::new(),
        messages: Vec::new(),
    };

    {
        let mut env = CraftEnv::new(&recipes, &items, &mut map, &mut log);
        let started = engine.start(&mut crafter, &mut env, &scenario.recipe, batch);
        match started {
            Ok(id) => {
                for tick in 1..=args.max_ticks {
                    env.turn = tick;
                    summary.ticks = tick;
                    match engine.advance(&mut crafter, &mut env, id, args.moves)? {
                        AdvanceOutcome::InProgress { .. } => {}
                        AdvanceOutcome::Completed(report) => {
                            summary.outcome = "completed".into();
                            summary.outputs = report.outputs;
                            break;
                        }
                        AdvanceOutcome::Abandoned(reason) => {
                            summary.outcome = format!("abandoned: {}", reason);
                            break;
                        }
                    }
                }
            }
            Err(err) => summary.outcome = format!("refused: {}", err),
        }

        if scenario.disassemble_result && summary.outcome == "completed" {
            let result_type = recipes.get(&scenario.recipe).map(|r| r.result.clone());
            let product = result_type.and_then(|t| {
                crafter
                    .carried
                    .items()
                    .iter()
                    .position(|item| item.type_id == t)
                    .and_then(|index| crafter.carried.remove(index))
            });
            match product {
                Some(item) => match engine.disassemble(&mut crafter, &mut env, item) {
                    DisassemblyOutcome::Disassembled(report) => summary.recovered = report.recovered,
                    DisassemblyOutcome::Rejected { reason, .. } => {
                        tracing::warn!(%reason, "result could not be disassembled");
                    }
                },
                None => tracing::warn!("finished result is not in the crafter's inventory"),
            }
        }
    }

    summary.messages = log.messages().iter().map(|m| m.text.clone()).collect();
    tracing::info!(outcome = %summary.outcome, ticks = summary.ticks, "scenario finished");

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        for message in log.messages() {
            let marker = match message.kind {
                MessageKind::Good => "+",
                MessageKind::Bad => "!",
                MessageKind::Info | MessageKind::Neutral => " ",
            };
            println!("{} {}", marker, message.text);
        }
        println!();
        println!("Outcome: {} after {} ticks", summary.outcome, summary.ticks);
        for (name, placement) in &summary.outputs {
            println!("  made {} ({:?})", name, placement);
        }
        for (name, placement) in &summary.recovered {
            println!("  recovered {} ({:?})", name, placement);
        }
    }
    Ok(())
}
