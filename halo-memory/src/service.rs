use async_trait::async_trait;
use chrono::{DateTime, Utc};
use halo_core::{Result, Turn};
use serde::{Deserialize, Serialize};

pub const DEFAULT_MEMORY_K: usize = 4;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryEntry {
    pub session_id: String,
    pub role: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl MemoryEntry {
    pub fn new(session_id: impl Into<String>, role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            role: role.into(),
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    /// `user` memories become human turns, everything else AI turns.
    pub fn to_turn(&self) -> Turn {
        if self.role == "user" { Turn::human(self.content.clone()) } else { Turn::ai(self.content.clone()) }
    }
}

#[async_trait]
pub trait MemoryService: Send + Sync {
    /// Remember `content`. Empty content is ignored.
    async fn add(&self, session_id: &str, role: &str, content: &str) -> Result<()>;

    /// Up to `k` memories of `session_id` relevant to `query`. Empty query
    /// returns nothing.
    async fn retrieve(&self, session_id: &str, query: &str, k: usize) -> Result<Vec<MemoryEntry>>;
}
