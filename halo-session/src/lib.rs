//! # halo-session
//!
//! Conversation persistence keyed by channel-prefixed session ids.
//!
//! - [`InMemoryConversationRepository`] - process-local, for tests and the CLI
//! - [`SqliteConversationRepository`] - sqlx/SQLite, behind the `sqlite` feature

pub mod conversation;
pub mod inmemory;
pub mod repository;

#[cfg(feature = "sqlite")]
pub mod database;

pub use conversation::{Conversation, Message, Role, UserProfile};
pub use inmemory::InMemoryConversationRepository;
pub use repository::{ConversationRepository, format_transcript};

#[cfg(feature = "sqlite")]
pub use database::SqliteConversationRepository;
