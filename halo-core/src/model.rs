use crate::{Result, types::Content};
use async_trait::async_trait;
use futures::stream::{Stream, StreamExt};
use serde::{Deserialize, Serialize};
use std::pin::Pin;

pub type LlmResponseStream = Pin<Box<dyn Stream<Item = Result<LlmResponse>> + Send>>;

#[async_trait]
pub trait Llm: Send + Sync {
    fn name(&self) -> &str;
    async fn generate_content(&self, req: LlmRequest, stream: bool) -> Result<LlmResponseStream>;

    /// Run a non-streaming completion and return the concatenated text.
    ///
    /// Classification is a completion with a constrained-label instruction, so
    /// routers and translators go through this as well.
    async fn complete(&self, contents: Vec<Content>, temperature: f32) -> Result<String> {
        let req = LlmRequest::new(self.name(), contents).with_temperature(temperature);
        let mut stream = self.generate_content(req, false).await?;
        let mut text = String::new();
        while let Some(response) = stream.next().await {
            if let Some(content) = response?.content {
                text.push_str(&content.text());
            }
        }
        Ok(text)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmRequest {
    pub model: String,
    pub contents: Vec<Content>,
    pub config: Option<GenerateContentConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerateContentConfig {
    pub temperature: Option<f32>,
    pub top_p: Option<f32>,
    pub max_output_tokens: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LlmResponse {
    pub content: Option<Content>,
    pub usage_metadata: Option<UsageMetadata>,
    pub finish_reason: Option<FinishReason>,
    pub partial: bool,
    pub turn_complete: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsageMetadata {
    pub prompt_token_count: i32,
    pub candidates_token_count: i32,
    pub total_token_count: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FinishReason {
    Stop,
    MaxTokens,
    Safety,
    Other,
}

impl LlmRequest {
    pub fn new(model: impl Into<String>, contents: Vec<Content>) -> Self {
        Self { model: model.into(), contents, config: None }
    }

    /// Set the generation config.
    pub fn with_config(mut self, config: GenerateContentConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.config.get_or_insert_with(GenerateContentConfig::default).temperature =
            Some(temperature);
        self
    }

    /// Stop sequences, used by the ReAct loop to cut generation before a
    /// hallucinated observation.
    pub fn with_stop(mut self, stop: Vec<String>) -> Self {
        self.config.get_or_insert_with(GenerateContentConfig::default).stop = Some(stop);
        self
    }

    pub fn temperature(&self) -> Option<f32> {
        self.config.as_ref().and_then(|c| c.temperature)
    }
}

impl LlmResponse {
    pub fn new(content: Content) -> Self {
        Self {
            content: Some(content),
            usage_metadata: None,
            finish_reason: Some(FinishReason::Stop),
            partial: false,
            turn_complete: true,
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::new(Content::new("model").with_text(text))
    }
}
