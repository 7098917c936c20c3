//! # halo-agent
//!
//! Tool-using reasoning agents for the Halo assistant.
//!
//! - [`ReactAgent`] - bounded Thought/Action/Observation loop over a fixed toolset
//! - [`parse_step`] - parser for one step of a ReAct trace
//! - [`AgentPool`] - one agent per [`AgentKind`], with canned replies for every failure
//! - [`fallback`] - the canned replies themselves
//!
//! ```rust,ignore
//! let agent = ReactAgent::builder("order_status")
//!     .instruction(AgentKind::OrderStatus.instruction())
//!     .tools(toolkit.order_status_tools())
//!     .model(model)
//!     .build()?;
//! let answer = agent.run(ctx, "Di mana pesanan 12345?").await?;
//! ```

mod error;
pub mod fallback;
mod parser;
mod pool;
mod prompt;
mod react;

pub use error::{AgentError, Result};
pub use parser::{FINAL_ANSWER_MARKER, ParseFailure, ReactStep, parse_step};
pub use pool::{AgentKind, AgentPool, AgentReply, ReplySource};
pub use prompt::render_react_prompt;
pub use react::{
    Agent, DEFAULT_MAX_ITERATIONS, OBSERVATION_STOP, ReactAgent, ReactAgentBuilder,
};
