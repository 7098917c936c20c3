//! # halo-tool
//!
//! Tools available to the reasoning agents.
//!
//! - [`FunctionTool`] - wrap an async closure as a tool
//! - [`BasicToolset`] - group tools, optionally filtered by a predicate
//! - [`builtin`] - the customer-service tools (orders, products, knowledge
//!   base, memory, translation, sentiment, support notifications)
//! - [`CustomerServiceTools`] - builds the fixed toolset of each agent
//!
//! ```rust
//! use halo_tool::FunctionTool;
//! use halo_core::{ToolContext, Result};
//! use serde_json::{json, Value};
//! use std::sync::Arc;
//!
//! async fn echo(_ctx: Arc<dyn ToolContext>, args: Value) -> Result<Value> {
//!     Ok(json!({ "echo": args }))
//! }
//!
//! let tool = FunctionTool::new("echo", "Echo the input back", echo);
//! ```

pub mod args;
pub mod builtin;
mod function_tool;
pub mod toolkit;
pub mod toolset;

pub use builtin::{
    AddMemoryTool, AnalyzeSentimentTool, ExtractOrderIdTool, GetOrderStatusTool,
    NotifyEmailSupportTool, NotifyTelegramSupportTool, RetrieveKbSnippetsTool,
    RetrieveMemoryTool, SearchProductsTool, TranslateToEnglishTool, extract_order_id,
};
pub use function_tool::FunctionTool;
pub use halo_core::{Tool, ToolContext, Toolset};
pub use toolkit::CustomerServiceTools;
pub use toolset::{BasicToolset, string_predicate};
