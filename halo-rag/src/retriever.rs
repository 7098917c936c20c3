use crate::collection::VectorCollection;
use crate::document::Chunk;
use async_trait::async_trait;

pub const RETRIEVER_TOP_K: usize = 5;

/// Query-to-snippets lookup used by the knowledge-base tool.
#[async_trait]
pub trait Retriever: Send + Sync {
    /// Best-effort: failures yield an empty list.
    async fn retrieve(&self, query: &str, collection: Option<&str>) -> Vec<Chunk>;
}

/// Top-k similarity search over the default collection, or an explicitly
/// named one.
#[derive(Clone)]
pub struct KnowledgeRetriever {
    collection: VectorCollection,
    k: usize,
}

impl KnowledgeRetriever {
    pub fn new(collection: VectorCollection) -> Self {
        Self { collection, k: RETRIEVER_TOP_K }
    }

    pub fn with_k(mut self, k: usize) -> Self {
        self.k = k;
        self
    }
}

#[async_trait]
impl Retriever for KnowledgeRetriever {
    async fn retrieve(&self, query: &str, collection: Option<&str>) -> Vec<Chunk> {
        let target = match collection {
            Some(name) if !name.trim().is_empty() && name != self.collection.name() => {
                self.collection.with_name(name)
            }
            _ => self.collection.clone(),
        };
        target
            .similarity_search(query, self.k, None)
            .await
            .into_iter()
            .map(|result| result.chunk)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Metadata;
    use crate::embedding::HashEmbeddingProvider;
    use crate::inmemory::InMemoryVectorStore;
    use std::sync::Arc;

    async fn seeded() -> VectorCollection {
        let collection = VectorCollection::new(
            "ai_cs",
            Arc::new(InMemoryVectorStore::new()),
            Arc::new(HashEmbeddingProvider::default()),
        );
        let texts: Vec<String> = (0..8).map(|i| format!("shipping note number {i}")).collect();
        collection.add_texts(&texts, &Metadata::new()).await.unwrap();
        collection
    }

    #[tokio::test]
    async fn test_retrieve_caps_at_five() {
        let retriever = KnowledgeRetriever::new(seeded().await);
        assert_eq!(retriever.retrieve("shipping", None).await.len(), 5);
    }

    #[tokio::test]
    async fn test_explicit_collection_is_used_verbatim() {
        let base = seeded().await;
        let other = base.with_name("faq_kb");
        other.add_texts(&["refund within 30 days".to_string()], &Metadata::new()).await.unwrap();

        let retriever = KnowledgeRetriever::new(base);
        let hits = retriever.retrieve("refund", Some("faq_kb")).await;
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].text, "refund within 30 days");
    }
}
