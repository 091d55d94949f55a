//! Per-user conversation memory.
//!
//! Each user id maps to a sliding window of the most recent turns. The
//! window holds `max_turns * 2` entries so that `max_turns` user/assistant
//! exchanges survive; older turns are evicted from the front. State lives
//! for the process lifetime only.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: TurnRole,
    pub text: String,
}

impl ConversationTurn {
    pub fn new(role: TurnRole, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
        }
    }
}

#[derive(Clone)]
pub struct ConversationStore {
    capacity: usize,
    conversations: Arc<RwLock<HashMap<String, VecDeque<ConversationTurn>>>>,
}

impl ConversationStore {
    /// `max_turns` counts exchanges; the per-user window is twice that.
    pub fn new(max_turns: usize) -> Self {
        Self {
            capacity: max_turns.saturating_mul(2),
            conversations: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Maximum number of turns kept per user.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub async fn append(&self, user_id: &str, role: TurnRole, text: impl Into<String>) {
        let mut conversations = self.conversations.write().await;
        let turns = conversations.entry(user_id.to_string()).or_default();
        push_bounded(turns, ConversationTurn::new(role, text), self.capacity);
    }

    /// Records a user message and its answer back to back.
    pub async fn append_exchange(
        &self,
        user_id: &str,
        user_text: impl Into<String>,
        assistant_text: impl Into<String>,
    ) {
        let mut conversations = self.conversations.write().await;
        let turns = conversations.entry(user_id.to_string()).or_default();
        push_bounded(
            turns,
            ConversationTurn::new(TurnRole::User, user_text),
            self.capacity,
        );
        push_bounded(
            turns,
            ConversationTurn::new(TurnRole::Assistant, assistant_text),
            self.capacity,
        );
    }

    /// Snapshot of the user's turns, oldest first. Empty for unknown users.
    pub async fn history(&self, user_id: &str) -> Vec<ConversationTurn> {
        let conversations = self.conversations.read().await;
        conversations
            .get(user_id)
            .map(|turns| turns.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Drops everything stored for the user. Returns whether anything was there.
    pub async fn clear(&self, user_id: &str) -> bool {
        let mut conversations = self.conversations.write().await;
        let removed = conversations.remove(user_id).is_some();
        if removed {
            tracing::debug!("Cleared conversation for {}", user_id);
        }
        removed
    }

    pub async fn len(&self, user_id: &str) -> usize {
        let conversations = self.conversations.read().await;
        conversations.get(user_id).map_or(0, VecDeque::len)
    }
}

fn push_bounded(turns: &mut VecDeque<ConversationTurn>, turn: ConversationTurn, capacity: usize) {
    turns.push_back(turn);
    while turns.len() > capacity {
        turns.pop_front();
    }
}
