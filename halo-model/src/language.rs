//! Language detection and LLM-backed translation.

use async_trait::async_trait;
use halo_core::{Content, HaloError, LanguageService, Llm, Result};
use std::sync::Arc;
use whatlang::Lang;

pub const TRANSLATOR_PROMPT: &str = "You are a professional translator. Translate the user text to the target language with the same meaning and tone. Only return the translated text.";

/// `Some("id")` or `Some("en")` when the best guess is a supported language,
/// `None` otherwise. Chat-length text rarely clears whatlang's reliability
/// bar, so the top guess is taken as is. Malay is reported as Indonesian.
pub fn detect_language(text: &str) -> Option<String> {
    let info = whatlang::detect(text)?;
    match info.lang() {
        Lang::Eng => Some("en".to_string()),
        Lang::Ind => Some("id".to_string()),
        _ => None,
    }
}

pub struct LlmLanguageService {
    llm: Arc<dyn Llm>,
}

impl LlmLanguageService {
    pub fn new(llm: Arc<dyn Llm>) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl LanguageService for LlmLanguageService {
    fn detect(&self, text: &str) -> Option<String> {
        detect_language(text)
    }

    async fn translate(&self, text: &str, target_lang: &str) -> Result<String> {
        if text.is_empty() {
            return Ok(String::new());
        }
        let contents = vec![
            Content::new("system").with_text(TRANSLATOR_PROMPT),
            Content::new("user").with_text(format!("Target language: {target_lang}.\nText: {text}")),
        ];
        let translated = self.llm.complete(contents, 0.0).await.map_err(|e| {
            tracing::warn!(target_lang, error = %e, "translation failed");
            HaloError::Model(format!("translation failed: {e}"))
        })?;
        Ok(translated.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MockLlm;

    #[test]
    fn test_detects_english_and_indonesian() {
        assert_eq!(
            detect_language("Where is my order? I bought a blue shirt last week and it has not arrived yet.")
                .as_deref(),
            Some("en")
        );
        assert_eq!(
            detect_language("Di mana pesanan saya? Saya membeli kemeja biru minggu lalu dan belum sampai.")
                .as_deref(),
            Some("id")
        );
    }

    #[test]
    fn test_detects_short_indonesian_chat() {
        for text in [
            "Tolong cek status pesanan saya, sudah seminggu belum datang",
            "Apakah produk ini masih tersedia?",
            "Di mana pesanan saya?",
        ] {
            assert_eq!(detect_language(text).as_deref(), Some("id"), "{text}");
        }
    }

    #[tokio::test]
    async fn test_indonesian_answer_is_not_retranslated() {
        let llm = Arc::new(MockLlm::new("t"));
        let svc = LlmLanguageService::new(llm.clone());
        let answer = "Apakah produk ini masih tersedia?";
        assert_eq!(svc.translate_to_language(answer, "id").await, answer);
        assert_eq!(llm.call_count(), 0);
    }

    #[test]
    fn test_unsupported_language_is_none() {
        assert_eq!(detect_language("Wo ist meine Bestellung? Ich habe letzte Woche ein Hemd gekauft."), None);
        assert_eq!(detect_language(""), None);
    }

    #[tokio::test]
    async fn test_translate_builds_translator_prompt() {
        let llm = Arc::new(MockLlm::new("t").with_text("  where is my order  "));
        let svc = LlmLanguageService::new(llm.clone());
        let out = svc.translate("di mana pesanan saya", "en").await.unwrap();
        assert_eq!(out, "where is my order");

        let req = &llm.requests()[0];
        assert_eq!(req.contents[0].text(), TRANSLATOR_PROMPT);
        assert_eq!(req.contents[1].text(), "Target language: en.\nText: di mana pesanan saya");
        assert_eq!(req.temperature(), Some(0.0));
    }

    #[tokio::test]
    async fn test_translate_to_language_keeps_text_on_failure() {
        let svc = LlmLanguageService::new(Arc::new(MockLlm::new("t").with_error("down")));
        assert_eq!(svc.translate_to_language("hello there", "id").await, "hello there");
    }
}
