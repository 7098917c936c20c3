use halo_core::HaloError;

#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    /// The model never produced a well-formed final answer. `raw` is the last
    /// model output.
    #[error("Could not parse LLM output: `{raw}`")]
    OutputParse { raw: String },

    #[error("Agent stopped after {iterations} iterations without a final answer")]
    IterationLimit { iterations: usize },

    #[error("Model error: {0}")]
    Model(String),

    #[error("Tool '{tool}' failed: {message}")]
    Tool { tool: String, message: String },
}

impl AgentError {
    /// True when the reasoning trace itself was unusable, as opposed to a
    /// failing model or tool.
    pub fn is_output_parse(&self) -> bool {
        matches!(self, Self::OutputParse { .. } | Self::IterationLimit { .. })
    }
}

impl From<AgentError> for HaloError {
    fn from(err: AgentError) -> Self {
        match err {
            AgentError::Model(message) => HaloError::Model(message),
            AgentError::Tool { .. } => HaloError::Tool(err.to_string()),
            other => HaloError::Agent(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, AgentError>;
