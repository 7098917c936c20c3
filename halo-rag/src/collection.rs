//! Collection-scoped facade over a [`VectorStore`] and an [`EmbeddingProvider`].
//!
//! Writes fail loudly; reads used on the conversation path (`similarity_search`,
//! `filter_by_metadata`) degrade to an empty result and log the failure.

use crate::document::{Chunk, Metadata, MetadataFilter, SearchResult};
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::vectorstore::VectorStore;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

/// Metadata keys accepted by [`VectorCollection::filter_by_metadata`].
pub const ALLOWED_FILTER_KEYS: [&str; 3] = ["category", "title", "source"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionStats {
    pub collection_name: String,
    pub total_vector_count: usize,
    pub embedding_model: String,
    pub backing_store: String,
}

#[derive(Clone)]
pub struct VectorCollection {
    name: String,
    store: Arc<dyn VectorStore>,
    embedder: Arc<dyn EmbeddingProvider>,
}

impl VectorCollection {
    pub fn new(
        name: impl Into<String>,
        store: Arc<dyn VectorStore>,
        embedder: Arc<dyn EmbeddingProvider>,
    ) -> Self {
        Self { name: name.into(), store, embedder }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Same store and embedder, different collection.
    pub fn with_name(&self, name: impl Into<String>) -> Self {
        Self { name: name.into(), store: Arc::clone(&self.store), embedder: Arc::clone(&self.embedder) }
    }

    /// Embed and store `chunks`, returning their ids in input order.
    pub async fn add(&self, mut chunks: Vec<Chunk>) -> Result<Vec<String>> {
        if chunks.is_empty() {
            return Ok(Vec::new());
        }
        let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
        let embeddings = self.embedder.embed_batch(&texts).await?;
        if embeddings.len() != chunks.len() {
            return Err(RagError::EmbeddingError {
                provider: self.embedder.model_name().to_string(),
                message: format!("expected {} embeddings, got {}", chunks.len(), embeddings.len()),
            });
        }

        for (chunk, embedding) in chunks.iter_mut().zip(embeddings) {
            if chunk.id.is_empty() {
                chunk.id = uuid::Uuid::new_v4().to_string();
            }
            chunk.embedding = embedding;
        }

        self.store.create_collection(&self.name, self.embedder.dimensions()).await?;
        self.store.upsert(&self.name, &chunks).await?;
        debug!(collection = %self.name, count = chunks.len(), "added chunks");
        Ok(chunks.into_iter().map(|c| c.id).collect())
    }

    /// Store raw texts with shared metadata. Blank texts are skipped.
    pub async fn add_texts(&self, texts: &[String], metadata: &Metadata) -> Result<Vec<String>> {
        let chunks: Vec<Chunk> = texts
            .iter()
            .filter(|t| !t.trim().is_empty())
            .map(|t| Chunk::new(t.clone(), metadata.clone()))
            .collect();
        self.add(chunks).await
    }

    /// Best-effort nearest-neighbour search.
    pub async fn similarity_search(
        &self,
        query: &str,
        k: usize,
        filter: Option<&MetadataFilter>,
    ) -> Vec<SearchResult> {
        if query.trim().is_empty() || k == 0 {
            return Vec::new();
        }
        let embedding = match self.embedder.embed(query).await {
            Ok(embedding) => embedding,
            Err(e) => {
                warn!(collection = %self.name, error = %e, "query embedding failed");
                return Vec::new();
            }
        };
        match self.store.search(&self.name, &embedding, k, filter).await {
            Ok(results) => {
                debug!(collection = %self.name, k, hits = results.len(), "similarity search");
                results
            }
            Err(e) => {
                warn!(collection = %self.name, error = %e, "similarity search failed");
                Vec::new()
            }
        }
    }

    /// Exact-match listing on one of [`ALLOWED_FILTER_KEYS`]. Matches are
    /// returned in insertion order with a score of 1.0.
    pub async fn filter_by_metadata(
        &self,
        key: &str,
        value: &str,
        k: usize,
        offset: usize,
    ) -> Result<Vec<SearchResult>> {
        if !ALLOWED_FILTER_KEYS.contains(&key) {
            return Err(RagError::Validation(format!(
                "filter key '{key}' is not allowed; use one of: {}",
                ALLOWED_FILTER_KEYS.join(", ")
            )));
        }
        let filter = MetadataFilter::equals(key, value);
        match self.store.filter(&self.name, &filter, k, offset).await {
            Ok(chunks) => {
                Ok(chunks.into_iter().map(|chunk| SearchResult { chunk, score: 1.0 }).collect())
            }
            Err(e) => {
                warn!(collection = %self.name, key, error = %e, "metadata filter failed");
                Ok(Vec::new())
            }
        }
    }

    pub async fn delete_by_ids(&self, ids: &[String]) -> Result<()> {
        let ids: Vec<&str> = ids.iter().map(String::as_str).collect();
        self.store.delete(&self.name, &ids).await
    }

    pub async fn delete_by_metadata_equals(&self, key: &str, value: &str) -> Result<usize> {
        let removed =
            self.store.delete_by_metadata(&self.name, &MetadataFilter::equals(key, value)).await?;
        debug!(collection = %self.name, key, removed, "deleted by metadata");
        Ok(removed)
    }

    pub async fn stats(&self) -> Result<CollectionStats> {
        Ok(CollectionStats {
            collection_name: self.name.clone(),
            total_vector_count: self.store.count(&self.name).await?,
            embedding_model: self.embedder.model_name().to_string(),
            backing_store: self.store.descriptor(),
        })
    }
}
