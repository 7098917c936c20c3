//! # halo-runner
//!
//! Conversation runtime for the Halo customer-service agent.
//!
//! ## Overview
//!
//! - [`Settings`] - Environment configuration and integration factories
//! - [`Services`] - Collaborators built once per process
//! - [`IntentRouter`] - Sentiment gate and intent classification
//! - [`build_workflow`] - The `start -> router -> handler -> end` state machine
//! - [`ConversationRunner`] - One full turn per inbound message
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use halo_runner::{Services, Settings};
//!
//! # async fn run() -> halo_core::Result<()> {
//! let services = Services::from_settings(Settings::from_env()).await?;
//! let runner = services.runner()?;
//! let state = runner
//!     .run_conversation("web:42", "Di mana pesanan #123456 saya?", "web", Default::default())
//!     .await?;
//! println!("{}", state.assistant_response.unwrap_or_default());
//! # Ok(())
//! # }
//! ```

pub mod nodes;
pub mod router;
mod runner;
mod services;
pub mod settings;
pub mod workflow;

pub use nodes::{CLOSING, GREETING};
pub use router::{Intent, IntentRouter, RouteDecision, SYSTEM_PROMPT, STRONG_NEGATIVE_THRESHOLD};
pub use runner::{ConversationRunner, HISTORY_LIMIT, RunnerConfig, assemble_history};
pub use services::Services;
pub use settings::Settings;
pub use workflow::{build_workflow, build_workflow_with_checkpointer, route_from_task};
