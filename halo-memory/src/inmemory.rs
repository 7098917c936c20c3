use crate::service::*;
use async_trait::async_trait;
use halo_core::Result;
use std::collections::{HashMap, HashSet};
use tokio::sync::RwLock;

#[derive(Clone)]
struct StoredEntry {
    entry: MemoryEntry,
    words: HashSet<String>,
}

/// Keyword memory: an entry matches when it shares at least one word with
/// the query. Newest matches come first.
pub struct InMemoryMemoryService {
    store: RwLock<HashMap<String, Vec<StoredEntry>>>,
}

impl InMemoryMemoryService {
    pub fn new() -> Self {
        Self { store: RwLock::new(HashMap::new()) }
    }

    fn extract_words(text: &str) -> HashSet<String> {
        text.split_whitespace()
            .map(|s| s.trim_matches(|c: char| !c.is_alphanumeric()).to_lowercase())
            .filter(|s| !s.is_empty())
            .collect()
    }

    fn has_intersection(set1: &HashSet<String>, set2: &HashSet<String>) -> bool {
        if set1.is_empty() || set2.is_empty() {
            return false;
        }
        set1.iter().any(|word| set2.contains(word))
    }
}

impl Default for InMemoryMemoryService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MemoryService for InMemoryMemoryService {
    async fn add(&self, session_id: &str, role: &str, content: &str) -> Result<()> {
        let words = Self::extract_words(content);
        if words.is_empty() {
            return Ok(());
        }
        let entry = MemoryEntry::new(session_id, role, content);
        self.store
            .write()
            .await
            .entry(session_id.to_string())
            .or_default()
            .push(StoredEntry { entry, words });
        Ok(())
    }

    async fn retrieve(&self, session_id: &str, query: &str, k: usize) -> Result<Vec<MemoryEntry>> {
        let query_words = Self::extract_words(query);
        let store = self.store.read().await;
        let Some(entries) = store.get(session_id) else {
            return Ok(Vec::new());
        };

        Ok(entries
            .iter()
            .rev()
            .filter(|stored| Self::has_intersection(&stored.words, &query_words))
            .take(k)
            .map(|stored| stored.entry.clone())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_retrieve_is_session_scoped() {
        let memory = InMemoryMemoryService::new();
        memory.add("web:1", "user", "I like blue shirts").await.unwrap();
        memory.add("web:2", "user", "I like red shoes").await.unwrap();

        let hits = memory.retrieve("web:1", "blue shirt size", 4).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].content, "I like blue shirts");
        assert!(memory.retrieve("web:3", "blue", 4).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_retrieve_caps_at_k_newest_first() {
        let memory = InMemoryMemoryService::new();
        for i in 0..6 {
            memory.add("s", "assistant", &format!("order {i} shipped")).await.unwrap();
        }
        let hits = memory.retrieve("s", "Order?", 4).await.unwrap();
        assert_eq!(hits.len(), 4);
        assert_eq!(hits[0].content, "order 5 shipped");
    }

    #[tokio::test]
    async fn test_blank_content_is_ignored() {
        let memory = InMemoryMemoryService::new();
        memory.add("s", "user", "   ").await.unwrap();
        assert!(memory.retrieve("s", "anything", 4).await.unwrap().is_empty());
        assert!(memory.retrieve("s", "", 4).await.unwrap().is_empty());
    }
}
