use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub type Metadata = HashMap<String, String>;

/// A loaded source document before chunking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub text: String,
    pub metadata: Metadata,
}

impl Document {
    pub fn new(text: impl Into<String>, metadata: Metadata) -> Self {
        Self { id: uuid::Uuid::new_v4().to_string(), text: text.into(), metadata }
    }
}

/// Unit of embedding and retrieval. `id` is assigned by the collection on
/// insert when left empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    pub id: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub embedding: Vec<f32>,
    pub metadata: Metadata,
    pub document_id: String,
}

impl Chunk {
    pub fn new(text: impl Into<String>, metadata: Metadata) -> Self {
        Self {
            id: String::new(),
            text: text.into(),
            embedding: Vec::new(),
            metadata,
            document_id: String::new(),
        }
    }

    pub fn chunk_index(&self) -> Option<usize> {
        self.metadata.get("chunk_index").and_then(|v| v.parse().ok())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub chunk: Chunk,
    /// Cosine similarity, higher is closer.
    pub score: f32,
}

/// Exact match on one metadata key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataFilter {
    pub key: String,
    pub value: String,
}

impl MetadataFilter {
    pub fn equals(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self { key: key.into(), value: value.into() }
    }

    pub fn matches(&self, metadata: &Metadata) -> bool {
        metadata.get(&self.key).is_some_and(|v| v == &self.value)
    }
}
