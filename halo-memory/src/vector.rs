use crate::service::*;
use async_trait::async_trait;
use halo_core::{LanguageService, Result};
use halo_rag::{Metadata, MetadataFilter, VectorCollection};
use std::sync::Arc;

pub fn memory_collection_name(schema: &str) -> String {
    format!("{schema}_memory")
}

/// Memories stored as single chunks tagged `{session_id, role}`. Queries
/// are translated to English before embedding when a language service is
/// attached.
pub struct VectorMemoryService {
    collection: VectorCollection,
    language: Option<Arc<dyn LanguageService>>,
}

impl VectorMemoryService {
    pub fn new(collection: VectorCollection) -> Self {
        Self { collection, language: None }
    }

    pub fn with_language(mut self, language: Arc<dyn LanguageService>) -> Self {
        self.language = Some(language);
        self
    }

    pub fn collection_name(&self) -> &str {
        self.collection.name()
    }
}

#[async_trait]
impl MemoryService for VectorMemoryService {
    async fn add(&self, session_id: &str, role: &str, content: &str) -> Result<()> {
        if content.trim().is_empty() {
            return Ok(());
        }
        let metadata = Metadata::from([
            ("session_id".to_string(), session_id.to_string()),
            ("role".to_string(), role.to_string()),
        ]);
        self.collection.add_texts(&[content.to_string()], &metadata).await?;
        tracing::debug!(session_id, role, collection = self.collection.name(), "stored memory");
        Ok(())
    }

    async fn retrieve(&self, session_id: &str, query: &str, k: usize) -> Result<Vec<MemoryEntry>> {
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }
        let query = match &self.language {
            Some(language) => language.translate_to_language(query, "en").await,
            None => query.to_string(),
        };
        let filter = MetadataFilter::equals("session_id", session_id);
        let hits = self.collection.similarity_search(&query, k, Some(&filter)).await;

        Ok(hits
            .into_iter()
            .filter(|hit| filter.matches(&hit.chunk.metadata))
            .take(k)
            .map(|hit| {
                let role = hit.chunk.metadata.get("role").cloned().unwrap_or_default();
                MemoryEntry::new(session_id, role, hit.chunk.text)
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use halo_core::TurnKind;
    use halo_rag::{HashEmbeddingProvider, InMemoryVectorStore};

    fn service() -> VectorMemoryService {
        VectorMemoryService::new(VectorCollection::new(
            memory_collection_name("ai_cs"),
            Arc::new(InMemoryVectorStore::new()),
            Arc::new(HashEmbeddingProvider::default()),
        ))
    }

    #[test]
    fn test_memory_collection_name() {
        assert_eq!(memory_collection_name("ai_cs"), "ai_cs_memory");
    }

    #[tokio::test]
    async fn test_vector_memory_filters_by_session() {
        let memory = service();
        memory.add("telegram:1", "user", "my size is L for shirts").await.unwrap();
        memory.add("telegram:2", "user", "my size is M for shirts").await.unwrap();
        memory.add("telegram:1", "assistant", "noted, size L").await.unwrap();

        let hits = memory.retrieve("telegram:1", "shirt size", DEFAULT_MEMORY_K).await.unwrap();
        assert_eq!(hits.len(), 2);
        assert!(hits.iter().all(|h| h.session_id == "telegram:1"));
        let turns: Vec<TurnKind> = hits.iter().map(|h| h.to_turn().kind).collect();
        assert!(turns.contains(&TurnKind::Human) && turns.contains(&TurnKind::Ai));
    }

    #[tokio::test]
    async fn test_vector_memory_empty_inputs() {
        let memory = service();
        memory.add("s", "user", "").await.unwrap();
        assert!(memory.retrieve("s", "", 4).await.unwrap().is_empty());
        assert!(memory.retrieve("s", "anything", 4).await.unwrap().is_empty());
    }
}
