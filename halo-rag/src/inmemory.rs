use crate::document::{Chunk, MetadataFilter, SearchResult};
use crate::error::Result;
use crate::vectorstore::VectorStore;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

pub(crate) fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

/// Process-local store; collections keep chunks in insertion order.
#[derive(Default)]
pub struct InMemoryVectorStore {
    collections: RwLock<HashMap<String, Vec<Chunk>>>,
}

impl InMemoryVectorStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    async fn create_collection(&self, name: &str, _dimensions: usize) -> Result<()> {
        self.collections.write().await.entry(name.to_string()).or_default();
        Ok(())
    }

    async fn delete_collection(&self, name: &str) -> Result<()> {
        self.collections.write().await.remove(name);
        Ok(())
    }

    async fn upsert(&self, collection: &str, chunks: &[Chunk]) -> Result<()> {
        let mut collections = self.collections.write().await;
        let stored = collections.entry(collection.to_string()).or_default();
        for chunk in chunks {
            match stored.iter_mut().find(|c| c.id == chunk.id) {
                Some(existing) => *existing = chunk.clone(),
                None => stored.push(chunk.clone()),
            }
        }
        debug!(collection, count = chunks.len(), "upserted chunks in memory");
        Ok(())
    }

    async fn delete(&self, collection: &str, ids: &[&str]) -> Result<()> {
        if let Some(stored) = self.collections.write().await.get_mut(collection) {
            stored.retain(|c| !ids.contains(&c.id.as_str()));
        }
        Ok(())
    }

    async fn delete_by_metadata(&self, collection: &str, filter: &MetadataFilter) -> Result<usize> {
        let mut collections = self.collections.write().await;
        let Some(stored) = collections.get_mut(collection) else {
            return Ok(0);
        };
        let before = stored.len();
        stored.retain(|c| !filter.matches(&c.metadata));
        Ok(before - stored.len())
    }

    async fn search(
        &self,
        collection: &str,
        embedding: &[f32],
        top_k: usize,
        filter: Option<&MetadataFilter>,
    ) -> Result<Vec<SearchResult>> {
        let collections = self.collections.read().await;
        let Some(stored) = collections.get(collection) else {
            return Ok(Vec::new());
        };
        let mut results: Vec<SearchResult> = stored
            .iter()
            .filter(|c| filter.is_none_or(|f| f.matches(&c.metadata)))
            .map(|c| SearchResult {
                chunk: c.clone(),
                score: cosine_similarity(embedding, &c.embedding),
            })
            .collect();
        results.sort_by(|a, b| b.score.total_cmp(&a.score));
        results.truncate(top_k);
        Ok(results)
    }

    async fn filter(
        &self,
        collection: &str,
        filter: &MetadataFilter,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<Chunk>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .map(|stored| {
                stored
                    .iter()
                    .filter(|c| filter.matches(&c.metadata))
                    .skip(offset)
                    .take(limit)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn count(&self, collection: &str) -> Result<usize> {
        Ok(self.collections.read().await.get(collection).map_or(0, Vec::len))
    }

    fn descriptor(&self) -> String {
        "in-memory".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn chunk(id: &str, embedding: Vec<f32>, title: &str) -> Chunk {
        Chunk {
            id: id.to_string(),
            text: format!("text {id}"),
            embedding,
            metadata: HashMap::from([("title".to_string(), title.to_string())]),
            document_id: "doc".to_string(),
        }
    }

    #[test]
    fn test_cosine_similarity() {
        assert!((cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]) - 1.0).abs() < 1e-6);
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-6);
        assert_eq!(cosine_similarity(&[1.0], &[1.0, 2.0]), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
    }

    #[tokio::test]
    async fn test_search_orders_by_similarity() {
        let store = InMemoryVectorStore::new();
        store
            .upsert(
                "kb",
                &[
                    chunk("a", vec![1.0, 0.0], "A"),
                    chunk("b", vec![0.0, 1.0], "B"),
                    chunk("c", vec![0.7, 0.7], "C"),
                ],
            )
            .await
            .unwrap();
        let results = store.search("kb", &[1.0, 0.0], 2, None).await.unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].chunk.id, "a");
        assert_eq!(results[1].chunk.id, "c");
    }

    #[tokio::test]
    async fn test_search_with_filter_and_missing_collection() {
        let store = InMemoryVectorStore::new();
        store.upsert("kb", &[chunk("a", vec![1.0, 0.0], "A"), chunk("b", vec![0.9, 0.1], "B")]).await.unwrap();
        let filter = MetadataFilter::equals("title", "B");
        let results = store.search("kb", &[1.0, 0.0], 5, Some(&filter)).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].chunk.id, "b");
        assert!(store.search("missing", &[1.0, 0.0], 5, None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_upsert_replaces_by_id() {
        let store = InMemoryVectorStore::new();
        store.upsert("kb", &[chunk("a", vec![1.0], "old")]).await.unwrap();
        store.upsert("kb", &[chunk("a", vec![1.0], "new")]).await.unwrap();
        assert_eq!(store.count("kb").await.unwrap(), 1);
        let found = store.filter("kb", &MetadataFilter::equals("title", "new"), 10, 0).await.unwrap();
        assert_eq!(found.len(), 1);
    }

    #[tokio::test]
    async fn test_deletes_are_idempotent() {
        let store = InMemoryVectorStore::new();
        store.upsert("kb", &[chunk("a", vec![1.0], "A"), chunk("b", vec![1.0], "A")]).await.unwrap();
        store.delete("kb", &["a", "zzz"]).await.unwrap();
        store.delete("kb", &["a"]).await.unwrap();
        assert_eq!(store.count("kb").await.unwrap(), 1);
        assert_eq!(store.delete_by_metadata("kb", &MetadataFilter::equals("title", "A")).await.unwrap(), 1);
        assert_eq!(store.delete_by_metadata("kb", &MetadataFilter::equals("title", "A")).await.unwrap(), 0);
        assert_eq!(store.delete_by_metadata("nope", &MetadataFilter::equals("title", "A")).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_filter_paginates() {
        let store = InMemoryVectorStore::new();
        let chunks: Vec<Chunk> = (0..5).map(|i| chunk(&i.to_string(), vec![1.0], "T")).collect();
        store.upsert("kb", &chunks).await.unwrap();
        let page = store.filter("kb", &MetadataFilter::equals("title", "T"), 2, 3).await.unwrap();
        let ids: Vec<_> = page.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["3", "4"]);
    }
}
