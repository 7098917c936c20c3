use crate::error::{AgentError, Result};
use crate::parser::{ReactStep, parse_step};
use crate::prompt::{render_react_prompt, tool_names};
use async_trait::async_trait;
use futures::StreamExt;
use halo_core::{Content, HaloError, Llm, LlmRequest, Tool, ToolContext};
use serde_json::Value;
use std::sync::Arc;
use tracing::{Instrument, debug, warn};

pub const DEFAULT_MAX_ITERATIONS: usize = 3;

/// Generation is cut before the model invents its own observation.
pub const OBSERVATION_STOP: &str = "\nObservation:";

/// Something that turns a user query into a natural-language answer.
#[async_trait]
pub trait Agent: Send + Sync {
    fn name(&self) -> &str;
    async fn run(&self, ctx: Arc<dyn ToolContext>, input: &str) -> Result<String>;
}

/// A bounded Thought/Action/Observation loop over a fixed toolset.
pub struct ReactAgent {
    name: String,
    instruction: String,
    model: Arc<dyn Llm>,
    tools: Vec<Arc<dyn Tool>>,
    temperature: f32,
    max_iterations: usize,
}

pub struct ReactAgentBuilder {
    name: String,
    instruction: Option<String>,
    model: Option<Arc<dyn Llm>>,
    tools: Vec<Arc<dyn Tool>>,
    temperature: f32,
    max_iterations: usize,
}

impl ReactAgentBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            instruction: None,
            model: None,
            tools: Vec::new(),
            temperature: 0.0,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }

    pub fn instruction(mut self, instruction: impl Into<String>) -> Self {
        self.instruction = Some(instruction.into());
        self
    }

    pub fn model(mut self, model: Arc<dyn Llm>) -> Self {
        self.model = Some(model);
        self
    }

    pub fn tool(mut self, tool: Arc<dyn Tool>) -> Self {
        self.tools.push(tool);
        self
    }

    pub fn tools(mut self, tools: impl IntoIterator<Item = Arc<dyn Tool>>) -> Self {
        self.tools.extend(tools);
        self
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn build(self) -> halo_core::Result<ReactAgent> {
        let model = self.model.ok_or_else(|| HaloError::Agent("Model is required".to_string()))?;
        if self.max_iterations == 0 {
            return Err(HaloError::Agent("max_iterations must be at least 1".to_string()));
        }

        Ok(ReactAgent {
            name: self.name,
            instruction: self.instruction.unwrap_or_default(),
            model,
            tools: self.tools,
            temperature: self.temperature,
            max_iterations: self.max_iterations,
        })
    }
}

impl ReactAgent {
    pub fn builder(name: impl Into<String>) -> ReactAgentBuilder {
        ReactAgentBuilder::new(name)
    }

    pub fn tools(&self) -> &[Arc<dyn Tool>] {
        &self.tools
    }

    pub fn temperature(&self) -> f32 {
        self.temperature
    }

    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    async fn think(&self, prompt: String) -> Result<String> {
        let request = LlmRequest::new(self.model.name(), vec![Content::new("user").with_text(prompt)])
            .with_temperature(self.temperature)
            .with_stop(vec![OBSERVATION_STOP.to_string()]);
        let span = halo_telemetry::model_call_span(self.model.name());
        async {
            let mut stream = self
                .model
                .generate_content(request, false)
                .await
                .map_err(|e| AgentError::Model(e.to_string()))?;
            let mut text = String::new();
            while let Some(response) = stream.next().await {
                let response = response.map_err(|e| AgentError::Model(e.to_string()))?;
                if let Some(content) = response.content {
                    text.push_str(&content.text());
                }
            }
            Ok(truncate_at_stop(text))
        }
        .instrument(span)
        .await
    }

    async fn call_tool(&self, ctx: Arc<dyn ToolContext>, name: &str, input: &str) -> Result<Value> {
        let Some(tool) = self.tools.iter().find(|t| t.name() == name) else {
            return Err(AgentError::Tool {
                tool: name.to_string(),
                message: format!(
                    "{name} is not a valid tool, try one of [{}].",
                    tool_names(&self.tools)
                ),
            });
        };
        let span = halo_telemetry::tool_execute_span(name);
        tool.execute(ctx, tool_args(input))
            .instrument(span)
            .await
            .map_err(|e| AgentError::Tool { tool: name.to_string(), message: e.to_string() })
    }
}

#[async_trait]
impl Agent for ReactAgent {
    fn name(&self) -> &str {
        &self.name
    }

    async fn run(&self, ctx: Arc<dyn ToolContext>, input: &str) -> Result<String> {
        let span = halo_telemetry::agent_run_span(&self.name);
        let record_span = span.clone();

        async move {
            let mut scratchpad = String::new();
            let mut last_parse_failure: Option<String> = None;

            for iteration in 1..=self.max_iterations {
                record_span.record("agent.iterations", iteration);
                let prompt = render_react_prompt(&self.instruction, &self.tools, input, &scratchpad);
                let output = self.think(prompt).await?;

                let observation = match parse_step(&output) {
                    Ok(ReactStep::Finish { output: answer, .. }) => {
                        debug!(agent = %self.name, iteration, "final answer");
                        return Ok(answer);
                    }
                    Ok(ReactStep::Action { tool, input: tool_input, .. }) => {
                        last_parse_failure = None;
                        debug!(agent = %self.name, iteration, tool = %tool, "tool call");
                        match self.call_tool(ctx.clone(), &tool, &tool_input).await {
                            Ok(value) => observation_text(&value),
                            Err(AgentError::Tool { message, .. }) => {
                                warn!(agent = %self.name, tool = %tool, error = %message, "tool failed");
                                message
                            }
                            Err(other) => return Err(other),
                        }
                    }
                    Err(failure) => {
                        warn!(agent = %self.name, iteration, "malformed reasoning step");
                        last_parse_failure = Some(failure.raw);
                        failure.observation.to_string()
                    }
                };

                scratchpad.push_str(&output);
                scratchpad.push_str("\nObservation: ");
                scratchpad.push_str(&observation);
                scratchpad.push_str("\nThought: ");
            }

            match last_parse_failure {
                Some(raw) => Err(AgentError::OutputParse { raw }),
                None => Err(AgentError::IterationLimit { iterations: self.max_iterations }),
            }
        }
        .instrument(span)
        .await
    }
}

/// Providers that ignore stop sequences still get cut at the first
/// observation marker.
fn truncate_at_stop(mut text: String) -> String {
    if let Some(pos) = text.find(OBSERVATION_STOP) {
        text.truncate(pos);
    }
    text
}

/// JSON objects and arrays go to the tool as structured values, anything else
/// as a plain string.
fn tool_args(input: &str) -> Value {
    match serde_json::from_str::<Value>(input) {
        Ok(value @ (Value::Object(_) | Value::Array(_))) => value,
        _ => Value::String(input.to_string()),
    }
}

fn observation_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tool_args() {
        assert_eq!(tool_args("12345"), json!("12345"));
        assert_eq!(tool_args("{\"query\": \"x\"}"), json!({"query": "x"}));
        assert_eq!(tool_args("sepatu lari"), json!("sepatu lari"));
    }

    #[test]
    fn test_truncate_at_stop() {
        let text = "Action: a\nAction Input: b\nObservation: invented".to_string();
        assert_eq!(truncate_at_stop(text), "Action: a\nAction Input: b");
    }

    #[test]
    fn test_observation_text() {
        assert_eq!(observation_text(&json!("ok")), "ok");
        assert_eq!(observation_text(&json!({"items": []})), "{\"items\":[]}");
    }
}
