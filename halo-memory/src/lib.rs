//! # halo-memory
//!
//! Long-term memory scoped to one conversation session.
//!
//! - [`InMemoryMemoryService`] - word-overlap matching, no embeddings
//! - [`VectorMemoryService`] - semantic search over a `{schema}_memory` collection
//! - [`MemoryService`] - trait for custom backends

pub mod inmemory;
pub mod service;
pub mod vector;

pub use inmemory::InMemoryMemoryService;
pub use service::{DEFAULT_MEMORY_K, MemoryEntry, MemoryService};
pub use vector::{VectorMemoryService, memory_collection_name};
