//! Checkpointing of per-thread graph state

use crate::error::Result;
use crate::state::Checkpoint;
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tokio::sync::RwLock;

pub const DEFAULT_MAX_CHECKPOINTS_PER_THREAD: usize = 64;

/// Checkpointer trait for persistence
#[async_trait]
pub trait Checkpointer: Send + Sync {
    /// Save a checkpoint
    async fn save(&self, checkpoint: &Checkpoint) -> Result<String>;

    /// Load the latest checkpoint for a thread
    async fn load(&self, thread_id: &str) -> Result<Option<Checkpoint>>;

    /// Load a specific checkpoint by ID
    async fn load_by_id(&self, checkpoint_id: &str) -> Result<Option<Checkpoint>>;

    /// List the retained checkpoints for a thread, oldest first
    async fn list(&self, thread_id: &str) -> Result<Vec<Checkpoint>>;

    /// Delete checkpoints for a thread
    async fn delete(&self, thread_id: &str) -> Result<()>;
}

/// In-memory checkpointer keeping the most recent checkpoints of each thread
#[derive(Clone)]
pub struct MemoryCheckpointer {
    checkpoints: Arc<RwLock<HashMap<String, VecDeque<Checkpoint>>>>,
    max_per_thread: usize,
}

impl Default for MemoryCheckpointer {
    fn default() -> Self {
        Self { checkpoints: Arc::default(), max_per_thread: DEFAULT_MAX_CHECKPOINTS_PER_THREAD }
    }
}

impl MemoryCheckpointer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Older checkpoints of a thread are dropped beyond `max`.
    pub fn with_max_per_thread(mut self, max: usize) -> Self {
        self.max_per_thread = max.max(1);
        self
    }

    pub async fn thread_count(&self) -> usize {
        self.checkpoints.read().await.len()
    }
}

#[async_trait]
impl Checkpointer for MemoryCheckpointer {
    async fn save(&self, checkpoint: &Checkpoint) -> Result<String> {
        let mut store = self.checkpoints.write().await;
        let thread_checkpoints = store.entry(checkpoint.thread_id.clone()).or_default();

        thread_checkpoints.push_back(checkpoint.clone());
        while thread_checkpoints.len() > self.max_per_thread {
            thread_checkpoints.pop_front();
        }

        Ok(checkpoint.checkpoint_id.clone())
    }

    async fn load(&self, thread_id: &str) -> Result<Option<Checkpoint>> {
        let store = self.checkpoints.read().await;
        Ok(store.get(thread_id).and_then(|checkpoints| checkpoints.back()).cloned())
    }

    async fn load_by_id(&self, checkpoint_id: &str) -> Result<Option<Checkpoint>> {
        let store = self.checkpoints.read().await;
        Ok(store.values().flatten().find(|c| c.checkpoint_id == checkpoint_id).cloned())
    }

    async fn list(&self, thread_id: &str) -> Result<Vec<Checkpoint>> {
        let store = self.checkpoints.read().await;
        Ok(store.get(thread_id).map(|c| c.iter().cloned().collect()).unwrap_or_default())
    }

    async fn delete(&self, thread_id: &str) -> Result<()> {
        let mut store = self.checkpoints.write().await;
        store.remove(thread_id);
        Ok(())
    }
}
