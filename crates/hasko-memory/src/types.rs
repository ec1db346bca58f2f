// SPDX-FileCopyrightText: 2026 Hasko Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persisted memory document types.

use std::collections::BTreeMap;

use hasko_core::Turn;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Fact key for the user's first name.
pub const USER_NAME: &str = "user_name";

/// Fact key for the place the user lives.
pub const USER_LOCATION: &str = "user_location";

/// Candidate fact values keyed by fact key. Ordered for stable logs and output.
pub type FactDelta = BTreeMap<String, String>;

/// Root persisted object: every known chat keyed by its decimal id.
///
/// `chats` is ordered so that truncation can evict the lexicographically
/// first chat id without a separate sort.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryDocument {
    #[serde(default)]
    pub chats: BTreeMap<String, ChatRecord>,
}

/// State of one conversation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRecord {
    /// Chronological, append-only.
    #[serde(default, alias = "conversationHistory")]
    pub conversation_history: Vec<Turn>,

    /// Remembered facts about the user.
    #[serde(default, alias = "memoryStore")]
    pub memory_store: BTreeMap<String, String>,

    /// A change awaiting a yes/no confirmation.
    #[serde(
        default,
        alias = "pendingChange",
        skip_serializing_if = "Option::is_none"
    )]
    pub pending_change: Option<FactDelta>,
}

impl ChatRecord {
    /// Merges `delta` into the memory store.
    ///
    /// New keys are added, existing keys are overwritten only when the value
    /// differs. Returns the number of keys that actually changed.
    pub fn store_facts(&mut self, delta: &FactDelta) -> usize {
        let mut changed = 0;
        for (key, value) in delta {
            match self.memory_store.get(key) {
                None => {
                    info!(key = %key, value = %value, "stored new memory");
                    self.memory_store.insert(key.clone(), value.clone());
                    changed += 1;
                }
                Some(existing) if existing != value => {
                    info!(key = %key, old = %existing, new = %value, "updating memory");
                    self.memory_store.insert(key.clone(), value.clone());
                    changed += 1;
                }
                Some(_) => {
                    debug!(key = %key, "memory already up-to-date");
                }
            }
        }
        changed
    }

    /// Merges `delta` into the pending change, replacing any earlier value per key.
    pub fn stage_change(&mut self, delta: &FactDelta) {
        let pending = self.pending_change.get_or_insert_with(FactDelta::new);
        pending.extend(delta.iter().map(|(k, v)| (k.clone(), v.clone())));
    }

    /// Applies and clears the pending change. Returns how many keys changed.
    pub fn commit_pending(&mut self) -> usize {
        match self.pending_change.take() {
            Some(delta) => self.store_facts(&delta),
            None => 0,
        }
    }

    /// Drops the pending change without applying it.
    pub fn discard_pending(&mut self) -> bool {
        self.pending_change.take().is_some()
    }

    pub fn fact(&self, key: &str) -> Option<&str> {
        self.memory_store.get(key).map(String::as_str)
    }

    pub fn push(&mut self, turn: Turn) {
        self.conversation_history.push(turn);
    }
}
