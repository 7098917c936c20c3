//! # halo-core
//!
//! Core traits and types shared by every Halo crate.
//!
//! - [`Llm`] - chat model capability (`complete` is used for both generation and classification)
//! - [`Tool`] / [`Toolset`] - capabilities exposed to the reasoning agents
//! - [`SentimentAnalyzer`] / [`LanguageService`] - black-box text analysis
//! - [`HaloError`] / [`Result`] - unified error handling

pub mod analysis;
pub mod error;
pub mod model;
pub mod tool;
pub mod types;

pub use analysis::{LanguageService, SUPPORTED_LANGUAGES, SentimentAnalyzer};
pub use error::{HaloError, Result};
pub use model::{
    FinishReason, GenerateContentConfig, Llm, LlmRequest, LlmResponse, LlmResponseStream,
    UsageMetadata,
};
pub use tool::{SessionToolContext, Tool, ToolContext, ToolPredicate, Toolset};
pub use types::{Content, Part, Redaction, Turn, TurnKind};
