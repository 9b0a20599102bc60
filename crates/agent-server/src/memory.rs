//! Conversation Memory
//!
//! Per-conversation rolling history, keyed by `conversation_id`. It is kept
//! for clients to read back; classification and agents only ever see the
//! current message.

use std::collections::{HashMap, VecDeque};
use std::sync::{PoisonError, RwLock};

use serde::{Deserialize, Serialize};

/// Default number of (user, assistant) exchanges kept per conversation
pub const DEFAULT_MEMORY_TURNS: usize = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One recorded message
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub text: String,
}

/// Keeps the last `capacity` messages, dropping the oldest first
#[derive(Clone, Debug)]
pub struct RollingMemory {
    capacity: usize,
    turns: VecDeque<Turn>,
}

impl RollingMemory {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            turns: VecDeque::with_capacity(capacity),
        }
    }

    pub fn add(&mut self, role: Role, text: impl Into<String>) {
        if self.capacity == 0 {
            return;
        }
        if self.turns.len() == self.capacity {
            self.turns.pop_front();
        }
        self.turns.push_back(Turn {
            role,
            text: text.into(),
        });
    }

    /// Oldest first
    pub fn turns(&self) -> Vec<Turn> {
        self.turns.iter().cloned().collect()
    }
}

/// In-memory store of every conversation's history
pub struct ConversationStore {
    capacity: usize,
    conversations: RwLock<HashMap<String, RollingMemory>>,
}

impl ConversationStore {
    /// Keep `turns` exchanges (two messages each) per conversation
    pub fn new(turns: usize) -> Self {
        Self {
            capacity: turns.saturating_mul(2),
            conversations: RwLock::new(HashMap::new()),
        }
    }

    /// Append one user message and the reply it got
    pub fn record(&self, conversation_id: &str, message: &str, reply: &str) {
        let mut conversations = self
            .conversations
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let memory = conversations
            .entry(conversation_id.to_string())
            .or_insert_with(|| RollingMemory::new(self.capacity));

        memory.add(Role::User, message);
        memory.add(Role::Assistant, reply);
    }

    /// History of a known conversation, oldest first
    pub fn history(&self, conversation_id: &str) -> Option<Vec<Turn>> {
        let conversations = self
            .conversations
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        conversations.get(conversation_id).map(RollingMemory::turns)
    }

    /// Forget a conversation. Returns whether it existed.
    pub fn forget(&self, conversation_id: &str) -> bool {
        let mut conversations = self
            .conversations
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        conversations.remove(conversation_id).is_some()
    }
}

impl Default for ConversationStore {
    fn default() -> Self {
        Self::new(DEFAULT_MEMORY_TURNS)
    }
}
