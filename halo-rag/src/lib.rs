//! # halo-rag
//!
//! Retrieval for the Halo agent: documents are loaded from uploaded files,
//! split into overlapping chunks, embedded, and stored in a named collection
//! that the knowledge retriever searches.
//!
//! | Feature    | What it enables                                   |
//! |------------|---------------------------------------------------|
//! | `openai`   | `OpenAIEmbeddingProvider` (OpenAI or Ollama `/v1`) |
//! | `pgvector` | `PgVectorStore` via sqlx                          |

pub mod chunking;
pub mod collection;
pub mod document;
pub mod embedding;
pub mod error;
pub mod ingest;
pub mod inmemory;
pub mod loader;
pub mod retriever;
pub mod vectorstore;

#[cfg(feature = "openai")]
pub mod openai;
#[cfg(feature = "pgvector")]
pub mod pgvector;

pub use chunking::{CHUNK_OVERLAP, CHUNK_SIZE, Chunker, RecursiveChunker, chunk_text};
pub use collection::{ALLOWED_FILTER_KEYS, CollectionStats, VectorCollection};
pub use document::{Chunk, Document, Metadata, MetadataFilter, SearchResult};
pub use embedding::{EmbeddingProvider, HashEmbeddingProvider};
pub use error::{RagError, Result};
pub use ingest::{IngestPipeline, IngestReport, sanitize_filename};
pub use inmemory::InMemoryVectorStore;
pub use loader::{FileKind, derive_title, load_documents};
pub use retriever::{KnowledgeRetriever, RETRIEVER_TOP_K, Retriever};
pub use vectorstore::VectorStore;

#[cfg(feature = "openai")]
pub use openai::OpenAIEmbeddingProvider;
#[cfg(feature = "pgvector")]
pub use pgvector::PgVectorStore;
