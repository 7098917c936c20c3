//! Text analysis capabilities consumed by the router, tools and runner.

use crate::Result;
use async_trait::async_trait;

/// Languages the assistant answers in.
pub const SUPPORTED_LANGUAGES: [&str; 2] = ["id", "en"];

/// Compound sentiment in `[-1.0, 1.0]`.
pub trait SentimentAnalyzer: Send + Sync {
    fn compound(&self, text: &str) -> f64;
}

#[async_trait]
pub trait LanguageService: Send + Sync {
    /// Two-letter code from [`SUPPORTED_LANGUAGES`], or `None` when the text is
    /// in another language or detection is inconclusive.
    fn detect(&self, text: &str) -> Option<String>;

    async fn translate(&self, text: &str, target_lang: &str) -> Result<String>;

    /// Translate unless the text is already in `target_lang`. Translation
    /// failures return the input unchanged.
    async fn translate_to_language(&self, text: &str, target_lang: &str) -> String {
        if text.is_empty() || self.detect(text).as_deref() == Some(target_lang) {
            return text.to_string();
        }
        match self.translate(text, target_lang).await {
            Ok(translated) if !translated.trim().is_empty() => translated,
            _ => text.to_string(),
        }
    }
}
