//! Chat completions over the OpenAI wire format.
//!
//! Works against api.openai.com and any server exposing the same
//! `/chat/completions` route, including Ollama's `/v1` compatibility layer.

use crate::retry::{
    RetryConfig, execute_with_retry, is_retryable_model_error, is_retryable_status_code,
};
use async_trait::async_trait;
use halo_core::{
    Content, FinishReason, HaloError, Llm, LlmRequest, LlmResponse, LlmResponseStream,
    UsageMetadata,
};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::Instrument;

pub const OPENAI_API_BASE: &str = "https://api.openai.com/v1";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAICompatibleConfig {
    /// Provider display name used in error messages.
    pub provider_name: String,
    /// Bearer token; Ollama accepts requests without one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl OpenAICompatibleConfig {
    pub fn openai(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            provider_name: "openai".to_string(),
            api_key: Some(api_key.into()),
            model: model.into(),
            base_url: OPENAI_API_BASE.to_string(),
            timeout_secs: 20,
        }
    }

    /// `base_url` is the Ollama server root, e.g. `http://localhost:11434`.
    pub fn ollama(base_url: impl AsRef<str>, model: impl Into<String>) -> Self {
        Self {
            provider_name: "ollama".to_string(),
            api_key: None,
            model: model.into(),
            base_url: format!("{}/v1", base_url.as_ref().trim_end_matches('/')),
            timeout_secs: 20,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}

#[derive(Debug, Clone, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Clone, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stop: Option<Vec<String>>,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    prompt_tokens: i32,
    completion_tokens: i32,
    total_tokens: i32,
}

fn to_message(content: &Content) -> ChatMessage {
    let role = match content.role.as_str() {
        "model" | "assistant" | "ai" => "assistant",
        "system" => "system",
        _ => "user",
    };
    ChatMessage { role: role.to_string(), content: content.text() }
}

fn to_finish_reason(reason: Option<&str>) -> Option<FinishReason> {
    reason.map(|r| match r {
        "stop" => FinishReason::Stop,
        "length" => FinishReason::MaxTokens,
        "content_filter" => FinishReason::Safety,
        _ => FinishReason::Other,
    })
}

pub struct OpenAICompatibleClient {
    client: Client,
    config: OpenAICompatibleConfig,
    retry_config: RetryConfig,
}

impl OpenAICompatibleClient {
    pub fn new(config: OpenAICompatibleConfig) -> Result<Self, HaloError> {
        reqwest::Url::parse(&config.base_url).map_err(|e| {
            HaloError::Config(format!("invalid {} base url '{}': {e}", config.provider_name, config.base_url))
        })?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| HaloError::Model(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { client, config, retry_config: RetryConfig::default() })
    }

    #[must_use]
    pub fn with_retry_config(mut self, retry_config: RetryConfig) -> Self {
        self.retry_config = retry_config;
        self
    }

    pub fn config(&self) -> &OpenAICompatibleConfig {
        &self.config
    }

    fn api_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }

    fn build_request(&self, request: &LlmRequest) -> ChatCompletionRequest {
        let config = request.config.as_ref();
        ChatCompletionRequest {
            model: self.config.model.clone(),
            messages: request.contents.iter().map(to_message).collect(),
            temperature: config.and_then(|c| c.temperature),
            top_p: config.and_then(|c| c.top_p),
            max_tokens: config.and_then(|c| c.max_output_tokens).map(|t| t as u32),
            stop: config.and_then(|c| c.stop.clone()),
            stream: false,
        }
    }

    async fn send(&self, chat_request: &ChatCompletionRequest) -> Result<LlmResponse, HaloError> {
        let provider = self.config.provider_name.as_str();
        let response = execute_with_retry(&self.retry_config, is_retryable_model_error, || {
            let mut builder = self.client.post(self.api_url()).json(chat_request);
            if let Some(api_key) = &self.config.api_key {
                builder = builder.bearer_auth(api_key);
            }
            async move {
                let response = builder.send().await.map_err(|e| {
                    let kind = if e.is_timeout() { "request timed out" } else { "request failed" };
                    HaloError::Model(format!("{provider} chat {kind}: {e}"))
                })?;

                if !response.status().is_success() {
                    let status = response.status();
                    let error_text = response.text().await.unwrap_or_default();
                    let retryability = if is_retryable_status_code(status.as_u16()) {
                        "retryable"
                    } else {
                        "non-retryable"
                    };
                    return Err(HaloError::Model(format!(
                        "{provider} chat API error ({}, {retryability}): {error_text}",
                        status.as_u16()
                    )));
                }

                response
                    .json::<ChatCompletionResponse>()
                    .await
                    .map_err(|e| HaloError::Model(format!("{provider} response decode failed: {e}")))
            }
        })
        .await?;

        let usage_metadata = response.usage.map(|u| UsageMetadata {
            prompt_token_count: u.prompt_tokens,
            candidates_token_count: u.completion_tokens,
            total_token_count: u.total_tokens,
        });
        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| HaloError::Model(format!("{provider} returned no choices")))?;

        Ok(LlmResponse {
            content: Some(Content::new("model").with_text(choice.message.content.unwrap_or_default())),
            usage_metadata,
            finish_reason: to_finish_reason(choice.finish_reason.as_deref()),
            partial: false,
            turn_complete: true,
        })
    }
}

#[async_trait]
impl Llm for OpenAICompatibleClient {
    fn name(&self) -> &str {
        &self.config.model
    }

    /// Always issues a non-streaming request; a streaming caller receives the
    /// whole completion as a single item.
    async fn generate_content(
        &self,
        request: LlmRequest,
        _stream: bool,
    ) -> Result<LlmResponseStream, HaloError> {
        let chat_request = self.build_request(&request);
        let span = halo_telemetry::model_call_span(&self.config.model);
        let response = self.send(&chat_request).instrument(span).await?;
        tracing::debug!(
            model = %self.config.model,
            total_tokens = response.usage_metadata.as_ref().map(|u| u.total_token_count),
            "chat completion finished"
        );
        let stream = async_stream::stream! {
            yield Ok(response);
        };
        Ok(Box::pin(stream))
    }
}
