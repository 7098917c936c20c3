use halo_core::SentimentAnalyzer;
use vader_sentiment::SentimentIntensityAnalyzer;

/// VADER compound score. Neutral (0.0) for empty text.
#[derive(Debug, Clone, Copy, Default)]
pub struct VaderSentiment;

impl VaderSentiment {
    pub fn new() -> Self {
        Self
    }
}

impl SentimentAnalyzer for VaderSentiment {
    fn compound(&self, text: &str) -> f64 {
        if text.trim().is_empty() {
            return 0.0;
        }
        let analyzer = SentimentIntensityAnalyzer::new();
        let scores = analyzer.polarity_scores(text);
        scores.get("compound").copied().unwrap_or(0.0).clamp(-1.0, 1.0)
    }
}
