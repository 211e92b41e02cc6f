//! Disassembly - taking items apart into what they were made from
//!
//! Items carrying recorded components give exactly those back; factory
//! items are rebuilt from the reverse recipe. Every component must survive
//! a skill roll and a damage roll.

pub mod recovery;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::types::ItemTypeId;
use crate::craft::{Placement, Workshop};
use crate::env::ItemOracle;
use crate::item::{flags, Item};
use crate::recipe::Recipe;
use crate::speed::lighting_crafting_speed_multiplier;

/// Why an item cannot be taken apart
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DisassemblyRejection {
    #[error("You cannot disassemble this.")]
    NotDisassemblable,

    #[error("You can't see to craft!")]
    TooDark,

    #[error("It's rotten, I'm not taking that apart.")]
    Rotten,

    #[error("You must remove the {0} before you can disassemble this.")]
    ContainsCreature(String),

    #[error("You need at least {count} {} of {name}.", charges_word(.count))]
    NotEnoughCharges { count: i32, name: String },

    #[error("You need {0}")]
    MissingQuality(String),

    #[error("You need {0}.")]
    MissingTool(String),

    #[error("You need a {name} with {count} {}.", charges_word(.count))]
    MissingToolCharges { name: String, count: i32 },

    #[error("Never mind.")]
    Declined,
}

fn charges_word(count: &i32) -> &'static str {
    if *count == 1 {
        "charge"
    } else {
        "charges"
    }
}

/// A disassembly that went ahead
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisassemblyReport {
    pub item: String,
    pub batches: i32,
    /// Name and destination of every recovered component
    pub recovered: Vec<(String, Placement)>,
    /// Components that did not survive
    pub lost: Vec<String>,
    pub unplaced: Vec<Item>,
    /// The rest of a charge stack taken apart only partly
    pub leftover: Option<Item>,
    pub learned: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DisassemblyOutcome {
    Disassembled(DisassemblyReport),
    /// The item is handed back untouched
    Rejected {
        item: Item,
        reason: DisassemblyRejection,
    },
}

pub(crate) fn type_name(items: &dyn ItemOracle, id: &ItemTypeId) -> String {
    items
        .template(id)
        .map(|t| t.name.clone())
        .unwrap_or_else(|| id.to_string())
}

impl Workshop<'_, '_> {
    /// The reverse recipe for `item`, if the crafter can take it apart right now
    pub fn can_disassemble(&mut self, item: &Item) -> Result<Recipe, DisassemblyRejection> {
        let recipe = match self.env.recipes.uncraft(&item.type_id) {
            Some(recipe) if !item.has_flag(flags::ETHEREAL_ITEM) => recipe.clone(),
            _ => return Err(DisassemblyRejection::NotDisassemblable),
        };

        if lighting_crafting_speed_multiplier(self.crafter, &recipe, self.config) <= 0.0 {
            return Err(DisassemblyRejection::TooDark);
        }
        if item.rotten() || item.food().is_some_and(Item::rotten) {
            return Err(DisassemblyRejection::Rotten);
        }
        if let Some(creature) = &item.contained_name {
            return Err(DisassemblyRejection::ContainsCreature(creature.clone()));
        }
        if item.count_by_charges {
            let batch_size = recipe.disassembly_batch_size();
            if item.charges < batch_size {
                return Err(DisassemblyRejection::NotEnoughCharges {
                    count: batch_size,
                    name: item.name.clone(),
                });
            }
        }

        let inv = self.crafting_inventory();
        for quality in recipe.requirements.qualities.iter().flatten() {
            if !quality.has(&inv) {
                return Err(DisassemblyRejection::MissingQuality(quality.to_string()));
            }
        }
        for group in &recipe.requirements.tools {
            let found = group.iter().any(|tool| {
                if tool.count <= 0 {
                    inv.has_tools(&tool.item_type, 1)
                } else {
                    inv.has_charges(&tool.item_type, tool.count)
                }
            });
            if found {
                continue;
            }
            if let Some(tool) = group.first() {
                let name = type_name(self.env.items, &tool.item_type);
                return Err(if tool.count <= 0 {
                    DisassemblyRejection::MissingTool(name)
                } else {
                    DisassemblyRejection::MissingToolCharges {
                        name,
                        count: tool.count,
                    }
                });
            }
        }
        Ok(recipe)
    }

    /// What taking `item` apart may give, one line per component
    fn uncraft_yields(&self, item: &Item, recipe: &Recipe) -> Vec<String> {
        if item.components.is_empty() {
            return recipe
                .requirements
                .components
                .iter()
                .filter_map(|group| group.first())
                .map(|comp| format!("{} {}", comp.effective_count(1), type_name(self.env.items, &comp.item_type)))
                .collect();
        }
        let mut totals: Vec<(&str, i32)> = Vec::new();
        for component in &item.components {
            match totals.iter_mut().find(|(name, _)| *name == component.name) {
                Some((_, total)) => *total += component.quantity(),
                None => totals.push((component.name.as_str(), component.quantity())),
            }
        }
        totals
            .into_iter()
            .map(|(name, total)| format!("{} {}", total, name))
            .collect()
    }

    /// Validate `item` and settle how many batches to take apart
    ///
    /// With `confirm` the crafter is shown the yields first. Charge stacks
    /// are asked for a batch count unless `take_max` is set.
    pub fn prompt_disassemble(
        &mut self,
        item: &Item,
        confirm: bool,
        take_max: bool,
    ) -> Result<(Recipe, i32), DisassemblyRejection> {
        let recipe = self.can_disassemble(item)?;
        let batch_size = recipe.disassembly_batch_size();

        if confirm && self.config.confirm_disassembly {
            let mut question = format!("Disassembling the {} may yield:\n", item.name);
            for line in self.uncraft_yields(item, &recipe) {
                question.push_str(&format!("- {}\n", line));
            }
            if batch_size != 1 {
                question.push_str(&format!("(per batch of {})\n", batch_size));
            }
            question.push_str("\nReally disassemble?\n");
            if !self.env.decider.confirm(&question) {
                self.env.info("Never mind.");
                return Err(DisassemblyRejection::Declined);
            }
        }

        if !item.count_by_charges {
            return Ok((recipe, 1));
        }
        let max = item.charges / batch_size;
        if max == 1 || take_max {
            return Ok((recipe, max));
        }
        let title = if batch_size != 1 {
            format!("Disassemble how many batches of {} [MAX: {}]: ", item.name, max)
        } else {
            format!("Disassemble how many {} [MAX: {}]: ", item.name, max)
        };
        match self.env.decider.quantity(&title, max) {
            Some(batches) => Ok((recipe, batches)),
            None => {
                self.env.info("Never mind.");
                Err(DisassemblyRejection::Declined)
            }
        }
    }

    /// Take one item apart
    pub fn disassemble(&mut self, item: Item) -> DisassemblyOutcome {
        let interactive = self.env.is_interactive();
        match self.prompt_disassemble(&item, interactive, false) {
            Ok((recipe, batches)) => DisassemblyOutcome::Disassembled(self.complete_disassemble(item, &recipe, batches)),
            Err(reason) => {
                if interactive && reason != DisassemblyRejection::Declined {
                    self.env.info(reason.to_string());
                }
                tracing::debug!(item = %item.type_id, %reason, "disassembly rejected");
                DisassemblyOutcome::Rejected { item, reason }
            }
        }
    }

    /// Take apart everything on the crafter's tile that can be
    ///
    /// Items that cannot be disassembled stay where they are, as do the
    /// leftovers of charge stacks. Stacks are taken apart in full.
    pub fn disassemble_all(&mut self) -> Vec<DisassemblyReport> {
        let at = self.crafter.position;
        let mut targets = Vec::new();
        for (index, item) in self.env.map.items_on(at).iter().enumerate() {
            match self.prompt_disassemble(item, false, true) {
                Ok((recipe, batches)) => targets.push((index, recipe, batches)),
                Err(reason) => tracing::debug!(item = %item.type_id, %reason, "left on tile"),
            }
        }

        // Highest index first so the rest stay valid
        let mut taken = Vec::with_capacity(targets.len());
        for (index, recipe, batches) in targets.into_iter().rev() {
            if let Some(item) = self.env.map.take_item(at, index) {
                taken.push((item, recipe, batches));
            }
        }
        taken.reverse();
        self.invalidate_inventory();

        let mut reports = Vec::with_capacity(taken.len());
        for (item, recipe, batches) in taken {
            let mut report = self.complete_disassemble(item, &recipe, batches);
            if let Some(rest) = report.leftover.take() {
                if let Err(rest) = self.env.map.add_item(at, rest) {
                    report.unplaced.push(rest);
                }
            }
            reports.push(report);
        }
        reports
    }
}
