use crate::args::{field, object_arg};
use async_trait::async_trait;
use halo_core::{Result, Tool, ToolContext};
use halo_memory::{DEFAULT_MEMORY_K, MemoryService};
use serde_json::{Value, json};
use std::sync::Arc;

/// `session_id` from the input, else the calling session.
fn session_id(params: &serde_json::Map<String, Value>, ctx: &dyn ToolContext) -> String {
    field(params, "session_id").unwrap_or_else(|| ctx.session_id().to_string())
}

pub struct RetrieveMemoryTool {
    memory: Arc<dyn MemoryService>,
}

impl RetrieveMemoryTool {
    pub fn new(memory: Arc<dyn MemoryService>) -> Self {
        Self { memory }
    }
}

#[async_trait]
impl Tool for RetrieveMemoryTool {
    fn name(&self) -> &str {
        "retrieve_memory"
    }

    fn description(&self) -> &str {
        "Retrieve conversational memory with keys: session_id, query, k (optional)."
    }

    async fn execute(&self, ctx: Arc<dyn ToolContext>, args: Value) -> Result<Value> {
        let params = match &args {
            Value::String(s) if !s.trim_start().starts_with('{') => {
                serde_json::Map::from_iter([("query".to_string(), Value::String(s.clone()))])
            }
            _ => object_arg(&args),
        };
        let session_id = session_id(&params, ctx.as_ref());
        let query = field(&params, "query").unwrap_or_default();
        let k = field(&params, "k").and_then(|k| k.parse().ok()).unwrap_or(DEFAULT_MEMORY_K);

        let entries = self.memory.retrieve(&session_id, &query, k).await?;
        let mem: Vec<String> = entries.into_iter().map(|e| e.content).collect();
        Ok(json!({ "mem": mem }))
    }
}

pub struct AddMemoryTool {
    memory: Arc<dyn MemoryService>,
}

impl AddMemoryTool {
    pub fn new(memory: Arc<dyn MemoryService>) -> Self {
        Self { memory }
    }
}

#[async_trait]
impl Tool for AddMemoryTool {
    fn name(&self) -> &str {
        "add_memory"
    }

    fn description(&self) -> &str {
        "Add memory with keys: session_id, role, content."
    }

    async fn execute(&self, ctx: Arc<dyn ToolContext>, args: Value) -> Result<Value> {
        let params = object_arg(&args);
        let session_id = session_id(&params, ctx.as_ref());
        let role = field(&params, "role").unwrap_or_else(|| "assistant".to_string());
        let Some(content) = field(&params, "content") else {
            return Ok(Value::String("missing params".to_string()));
        };
        if session_id.is_empty() {
            return Ok(Value::String("missing params".to_string()));
        }
        self.memory.add(&session_id, &role, &content).await?;
        Ok(Value::String("ok".to_string()))
    }
}
