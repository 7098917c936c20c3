use crate::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;
    fn description(&self) -> &str;

    fn parameters_schema(&self) -> Option<Value> {
        None
    }

    /// `args` is either a JSON object or a bare string, depending on what the
    /// caller extracted from the model output.
    async fn execute(&self, ctx: Arc<dyn ToolContext>, args: Value) -> Result<Value>;
}

/// Per-call context handed to tools.
pub trait ToolContext: Send + Sync {
    fn session_id(&self) -> &str;
    fn channel(&self) -> &str;
    fn agent_name(&self) -> &str;
}

#[async_trait]
pub trait Toolset: Send + Sync {
    fn name(&self) -> &str;
    async fn tools(&self) -> Result<Vec<Arc<dyn Tool>>>;
}

pub type ToolPredicate = Box<dyn Fn(&dyn Tool) -> bool + Send + Sync>;

/// Simple owned [`ToolContext`].
#[derive(Debug, Clone, Default)]
pub struct SessionToolContext {
    pub session_id: String,
    pub channel: String,
    pub agent_name: String,
}

impl SessionToolContext {
    pub fn new(session_id: impl Into<String>, channel: impl Into<String>) -> Self {
        Self { session_id: session_id.into(), channel: channel.into(), agent_name: String::new() }
    }

    pub fn with_agent(mut self, agent_name: impl Into<String>) -> Self {
        self.agent_name = agent_name.into();
        self
    }
}

impl ToolContext for SessionToolContext {
    fn session_id(&self) -> &str {
        &self.session_id
    }

    fn channel(&self) -> &str {
        &self.channel
    }

    fn agent_name(&self) -> &str {
        &self.agent_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestTool {
        name: String,
    }

    #[async_trait]
    impl Tool for TestTool {
        fn name(&self) -> &str {
            &self.name
        }

        fn description(&self) -> &str {
            "test tool"
        }

        async fn execute(&self, ctx: Arc<dyn ToolContext>, _args: Value) -> Result<Value> {
            Ok(Value::String(ctx.session_id().to_string()))
        }
    }

    #[test]
    fn test_tool_trait() {
        let tool = TestTool { name: "test".to_string() };
        assert_eq!(tool.name(), "test");
        assert_eq!(tool.description(), "test tool");
        assert!(tool.parameters_schema().is_none());
    }

    #[tokio::test]
    async fn test_tool_execute_sees_session() {
        let tool = TestTool { name: "test".to_string() };
        let ctx = Arc::new(SessionToolContext::new("web:42", "web").with_agent("qa"))
            as Arc<dyn ToolContext>;
        let result = tool.execute(ctx.clone(), Value::Null).await.unwrap();
        assert_eq!(result, Value::String("web:42".to_string()));
        assert_eq!(ctx.agent_name(), "qa");
    }
}
