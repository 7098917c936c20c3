//! # halo-model
//!
//! Model-side capabilities for the Halo agent.
//!
//! - [`OpenAICompatibleClient`] - chat completions against OpenAI or an Ollama `/v1` endpoint
//! - [`MockLlm`] - scripted model for tests
//! - [`VaderSentiment`] - lexicon-based compound sentiment
//! - [`LlmLanguageService`] - language detection with LLM-backed translation
//!
//! ```rust,no_run
//! use halo_model::{OpenAICompatibleClient, OpenAICompatibleConfig};
//!
//! let client = OpenAICompatibleClient::new(
//!     OpenAICompatibleConfig::ollama("http://localhost:11434", "llama3.1:8b-instruct"),
//! )?;
//! # Ok::<(), halo_core::HaloError>(())
//! ```

pub mod language;
pub mod mock;
pub mod openai_compatible;
pub mod retry;
pub mod sentiment;

pub use language::{LlmLanguageService, TRANSLATOR_PROMPT, detect_language};
pub use mock::MockLlm;
pub use openai_compatible::{OpenAICompatibleClient, OpenAICompatibleConfig};
pub use retry::RetryConfig;
pub use sentiment::VaderSentiment;
