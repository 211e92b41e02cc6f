//! Player-facing messages
//!
//! Narration is kept apart from the calculations that produce it so the
//! dice and speed code stays pure.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MessageKind {
    Info,
    Good,
    Bad,
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub kind: MessageKind,
    pub text: String,
}

/// Sink for messages shown to the player
pub trait Narrator {
    fn add(&mut self, kind: MessageKind, text: String);
}

/// Narrator that keeps every message in order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessageLog {
    messages: Vec<Message>,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Whether any message contains `needle`
    pub fn contains(&self, needle: &str) -> bool {
        self.messages.iter().any(|m| m.text.contains(needle))
    }

    pub fn count_of(&self, kind: MessageKind) -> usize {
        self.messages.iter().filter(|m| m.kind == kind).count()
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }
}

impl Narrator for MessageLog {
    fn add(&mut self, kind: MessageKind, text: String) {
        tracing::trace!(?kind, %text, "narration");
        self.messages.push(Message { kind, text });
    }
}

/// Narrator that discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct Silent;

impl Narrator for Silent {
    fn add(&mut self, _kind: MessageKind, _text: String) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_log() {
        let mut log = MessageLog::new();
        log.add(MessageKind::Good, "You finish the shelf.".into());
        log.add(MessageKind::Bad, "You damage the planks.".into());
        assert_eq!(log.messages().len(), 2);
        assert!(log.contains("shelf"));
        assert_eq!(log.count_of(MessageKind::Bad), 1);
        log.clear();
        assert!(log.messages().is_empty());
    }
}
