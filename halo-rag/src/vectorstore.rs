use crate::document::{Chunk, MetadataFilter, SearchResult};
use crate::error::Result;
use async_trait::async_trait;

/// Storage backend for embedded chunks, partitioned by collection name.
///
/// Deletes are idempotent: removing ids or metadata values that do not exist
/// is not an error.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Idempotent.
    async fn create_collection(&self, name: &str, dimensions: usize) -> Result<()>;

    async fn delete_collection(&self, name: &str) -> Result<()>;

    /// Insert or replace chunks by id. Chunks must already carry embeddings.
    async fn upsert(&self, collection: &str, chunks: &[Chunk]) -> Result<()>;

    async fn delete(&self, collection: &str, ids: &[&str]) -> Result<()>;

    /// Returns the number of removed records.
    async fn delete_by_metadata(&self, collection: &str, filter: &MetadataFilter) -> Result<usize>;

    /// Up to `top_k` nearest chunks by cosine similarity, best first.
    async fn search(
        &self,
        collection: &str,
        embedding: &[f32],
        top_k: usize,
        filter: Option<&MetadataFilter>,
    ) -> Result<Vec<SearchResult>>;

    /// Chunks matching `filter` in insertion order, paginated.
    async fn filter(
        &self,
        collection: &str,
        filter: &MetadataFilter,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<Chunk>>;

    async fn count(&self, collection: &str) -> Result<usize>;

    /// Human-readable location of the backing store, without credentials.
    fn descriptor(&self) -> String;
}
