use crate::args::text_arg;
use async_trait::async_trait;
use halo_core::{LanguageService, Result, SentimentAnalyzer, Tool, ToolContext};
use serde_json::Value;
use std::sync::Arc;

pub struct AnalyzeSentimentTool {
    analyzer: Arc<dyn SentimentAnalyzer>,
}

impl AnalyzeSentimentTool {
    pub fn new(analyzer: Arc<dyn SentimentAnalyzer>) -> Self {
        Self { analyzer }
    }
}

#[async_trait]
impl Tool for AnalyzeSentimentTool {
    fn name(&self) -> &str {
        "analyze_sentiment"
    }

    fn description(&self) -> &str {
        "Analyze sentiment of text and return a compound score in [-1,1]."
    }

    async fn execute(&self, _ctx: Arc<dyn ToolContext>, args: Value) -> Result<Value> {
        let score = self.analyzer.compound(&text_arg(&args, &["text"]));
        Ok(Value::String(score.to_string()))
    }
}

pub struct TranslateToEnglishTool {
    language: Arc<dyn LanguageService>,
}

impl TranslateToEnglishTool {
    pub fn new(language: Arc<dyn LanguageService>) -> Self {
        Self { language }
    }
}

#[async_trait]
impl Tool for TranslateToEnglishTool {
    fn name(&self) -> &str {
        "translate_to_english"
    }

    fn description(&self) -> &str {
        "Translate text to English."
    }

    async fn execute(&self, _ctx: Arc<dyn ToolContext>, args: Value) -> Result<Value> {
        let text = text_arg(&args, &["text"]);
        Ok(Value::String(self.language.translate_to_language(&text, "en").await))
    }
}
