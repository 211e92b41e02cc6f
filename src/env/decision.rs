//! Decision strategy - who answers selection menus and confirmations
//!
//! Interactive crafters are asked through a [`PromptSurface`]; autonomous
//! crafters apply fixed heuristics (confirm everything, take the first
//! option, use the largest quantity).

use std::collections::VecDeque;

/// Human interaction surface
pub trait PromptSurface {
    fn query_yn(&mut self, question: &str) -> bool;

    /// Pick one entry; `None` means cancelled
    fn select(&mut self, title: &str, entries: &[String], allow_cancel: bool) -> Option<usize>;

    /// Ask for a number; `None` means cancelled
    fn query_int(&mut self, title: &str, default: i32) -> Option<i32>;
}

/// How choices are made for the current crafter
pub enum DecisionStrategy<'a> {
    Interactive(&'a mut dyn PromptSurface),
    Autonomous,
}

impl DecisionStrategy<'_> {
    pub fn is_interactive(&self) -> bool {
        matches!(self, DecisionStrategy::Interactive(_))
    }

    pub fn confirm(&mut self, question: &str) -> bool {
        match self {
            DecisionStrategy::Interactive(surface) => surface.query_yn(question),
            DecisionStrategy::Autonomous => true,
        }
    }

    pub fn menu(&mut self, title: &str, entries: &[String], allow_cancel: bool) -> Option<usize> {
        if entries.is_empty() {
            return None;
        }
        match self {
            DecisionStrategy::Interactive(surface) => surface
                .select(title, entries, allow_cancel)
                .filter(|&idx| idx < entries.len()),
            DecisionStrategy::Autonomous => Some(0),
        }
    }

    /// Quantity in `1..=max`; `None` when cancelled or nothing is available
    pub fn quantity(&mut self, title: &str, max: i32) -> Option<i32> {
        if max < 1 {
            return None;
        }
        match self {
            DecisionStrategy::Interactive(surface) => surface
                .query_int(title, max)
                .filter(|&n| n > 0)
                .map(|n| n.min(max)),
            DecisionStrategy::Autonomous => Some(max),
        }
    }
}

impl std::fmt::Debug for DecisionStrategy<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecisionStrategy::Interactive(_) => f.write_str("Interactive"),
            DecisionStrategy::Autonomous => f.write_str("Autonomous"),
        }
    }
}

/// Prompt surface answering from queued responses
///
/// Once a queue runs dry it answers yes, picks the first entry and accepts
/// the default quantity. Every prompt is recorded.
#[derive(Debug, Clone, Default)]
pub struct ScriptedPrompts {
    pub yes_no: VecDeque<bool>,
    pub choices: VecDeque<Option<usize>>,
    pub quantities: VecDeque<Option<i32>>,
    asked: Vec<String>,
    menus: Vec<Vec<String>>,
}

impl ScriptedPrompts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answer_yn(mut self, answer: bool) -> Self {
        self.yes_no.push_back(answer);
        self
    }

    pub fn choose(mut self, choice: Option<usize>) -> Self {
        self.choices.push_back(choice);
        self
    }

    pub fn enter(mut self, quantity: Option<i32>) -> Self {
        self.quantities.push_back(quantity);
        self
    }

    /// Every question or menu title shown so far
    pub fn asked(&self) -> &[String] {
        &self.asked
    }

    /// Entries of every menu shown so far
    pub fn menus(&self) -> &[Vec<String>] {
        &self.menus
    }
}

impl PromptSurface for ScriptedPrompts {
    fn query_yn(&mut self, question: &str) -> bool {
        self.asked.push(question.to_string());
        self.yes_no.pop_front().unwrap_or(true)
    }

    fn select(&mut self, title: &str, entries: &[String], _allow_cancel: bool) -> Option<usize> {
        self.asked.push(title.to_string());
        self.menus.push(entries.to_vec());
        self.choices.pop_front().unwrap_or(Some(0))
    }

    fn query_int(&mut self, title: &str, default: i32) -> Option<i32> {
        self.asked.push(title.to_string());
        self.quantities.pop_front().unwrap_or(Some(default))
    }
}
