//! Embeddings over the OpenAI `/embeddings` route.
//!
//! ```rust,ignore
//! use halo_rag::OpenAIEmbeddingProvider;
//!
//! let provider = OpenAIEmbeddingProvider::openai(api_key, "text-embedding-3-small")?;
//! let local = OpenAIEmbeddingProvider::ollama("http://localhost:11434", "nomic-embed-text")?;
//! ```

use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const OPENAI_API_BASE: &str = "https://api.openai.com/v1";

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
    index: usize,
}

pub struct OpenAIEmbeddingProvider {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
    dimensions: usize,
}

/// Output width of well-known embedding models.
fn known_dimensions(model: &str) -> usize {
    match model {
        "text-embedding-3-large" => 3072,
        "nomic-embed-text" => 768,
        "mxbai-embed-large" => 1024,
        "all-minilm" => 384,
        _ => 1536,
    }
}

impl OpenAIEmbeddingProvider {
    pub fn new(
        api_key: Option<String>,
        base_url: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let base_url = base_url.into();
        if reqwest::Url::parse(&base_url).is_err() {
            return Err(RagError::Validation(format!("invalid embedding base url '{base_url}'")));
        }
        let client = Client::builder().timeout(timeout).build().map_err(|e| {
            RagError::EmbeddingError { provider: "openai".to_string(), message: e.to_string() }
        })?;
        let model = model.into();
        Ok(Self { client, api_key, base_url, dimensions: known_dimensions(&model), model })
    }

    pub fn openai(api_key: impl Into<String>, model: impl Into<String>) -> Result<Self> {
        Self::new(Some(api_key.into()), OPENAI_API_BASE, model, Duration::from_secs(20))
    }

    /// `base_url` is the Ollama server root.
    pub fn ollama(base_url: &str, model: impl Into<String>) -> Result<Self> {
        let base = format!("{}/v1", base_url.trim_end_matches('/'));
        Self::new(None, base, model, Duration::from_secs(20))
    }

    pub fn with_dimensions(mut self, dimensions: usize) -> Self {
        self.dimensions = dimensions;
        self
    }

    fn error(&self, message: impl Into<String>) -> RagError {
        RagError::EmbeddingError { provider: self.model.clone(), message: message.into() }
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAIEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut batch = self.embed_batch(&[text.to_string()]).await?;
        batch.pop().ok_or_else(|| self.error("empty embedding response"))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        let url = format!("{}/embeddings", self.base_url.trim_end_matches('/'));
        let mut request =
            self.client.post(&url).json(&EmbeddingRequest { model: &self.model, input: texts });
        if let Some(api_key) = &self.api_key {
            request = request.bearer_auth(api_key);
        }

        let response = request.send().await.map_err(|e| self.error(e.to_string()))?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(self.error(format!("HTTP {status}: {body}")));
        }
        let mut parsed: EmbeddingResponse =
            response.json().await.map_err(|e| self.error(format!("decode failed: {e}")))?;
        if parsed.data.len() != texts.len() {
            return Err(self.error(format!(
                "expected {} embeddings, got {}",
                texts.len(),
                parsed.data.len()
            )));
        }
        parsed.data.sort_by_key(|d| d.index);
        tracing::debug!(model = %self.model, count = texts.len(), "embedded batch");
        Ok(parsed.data.into_iter().map(|d| d.embedding).collect())
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_dimensions() {
        assert_eq!(known_dimensions("text-embedding-3-small"), 1536);
        assert_eq!(known_dimensions("nomic-embed-text"), 768);
    }

    #[test]
    fn test_ollama_base_url() {
        let provider = OpenAIEmbeddingProvider::ollama("http://localhost:11434/", "nomic-embed-text").unwrap();
        assert_eq!(provider.base_url, "http://localhost:11434/v1");
        assert!(provider.api_key.is_none());
        assert_eq!(provider.dimensions(), 768);
    }

    #[test]
    fn test_invalid_url_rejected() {
        assert!(OpenAIEmbeddingProvider::new(None, "::nope", "m", Duration::from_secs(1)).is_err());
    }
}
