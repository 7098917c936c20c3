//! Intent classification at the entry of every turn.

use halo_core::{Content, Llm, SentimentAnalyzer};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

pub const SYSTEM_PROMPT: &str = "You are an AI customer service assistant. Default language to Indonesian for user-facing messages unless the user language is different. Use English for internal reasoning and tool usage. Be concise, empathetic, and helpful.";

pub const CLASSIFY_INSTRUCTION: &str = "Classify the user intent into one of: Order_Status, Product_Recommendation, General_Inquiry, Complaint. Return ONLY the label.";

/// Compound sentiment at or below this hands the turn to a human.
pub const STRONG_NEGATIVE_THRESHOLD: f64 = -0.6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intent {
    OrderStatus,
    ProductRecommendation,
    GeneralInquiry,
    Complaint,
}

impl Intent {
    pub const ALL: [Intent; 4] =
        [Intent::OrderStatus, Intent::ProductRecommendation, Intent::GeneralInquiry, Intent::Complaint];

    pub fn label(&self) -> &'static str {
        match self {
            Intent::OrderStatus => "Order_Status",
            Intent::ProductRecommendation => "Product_Recommendation",
            Intent::GeneralInquiry => "General_Inquiry",
            Intent::Complaint => "Complaint",
        }
    }

    /// Exact label match after trimming.
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL.into_iter().find(|intent| intent.label() == label)
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteDecision {
    pub intent: Intent,
    pub sentiment: f64,
    pub handoff: bool,
}

/// Sentiment gate followed by a single LLM classification call.
pub struct IntentRouter {
    llm: Option<Arc<dyn Llm>>,
    sentiment: Arc<dyn SentimentAnalyzer>,
}

impl IntentRouter {
    pub fn new(llm: Option<Arc<dyn Llm>>, sentiment: Arc<dyn SentimentAnalyzer>) -> Self {
        Self { llm, sentiment }
    }

    pub async fn route(&self, query: &str) -> RouteDecision {
        let sentiment = self.sentiment.compound(query);
        if sentiment <= STRONG_NEGATIVE_THRESHOLD {
            debug!(sentiment, "strong negative sentiment, handing off");
            return RouteDecision { intent: Intent::Complaint, sentiment, handoff: true };
        }

        let intent = self.classify(query).await;
        RouteDecision { intent, sentiment, handoff: false }
    }

    /// Anything but an exact label, including a failed call, is a complaint.
    async fn classify(&self, query: &str) -> Intent {
        let Some(llm) = &self.llm else {
            warn!("no chat model for intent classification");
            return Intent::Complaint;
        };

        let prompt = format!("{SYSTEM_PROMPT}\n{CLASSIFY_INSTRUCTION}\nUser: {query}");
        match llm.complete(vec![Content::new("user").with_text(prompt)], 0.0).await {
            Ok(raw) => Intent::from_label(&raw).unwrap_or_else(|| {
                debug!(label = %raw.trim(), "unknown intent label");
                Intent::Complaint
            }),
            Err(e) => {
                warn!(error = %e, "intent classification failed");
                Intent::Complaint
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use halo_model::MockLlm;
    use proptest::prelude::*;

    struct Fixed(f64);

    impl SentimentAnalyzer for Fixed {
        fn compound(&self, _text: &str) -> f64 {
            self.0
        }
    }

    fn router(llm: MockLlm, sentiment: f64) -> (IntentRouter, Arc<MockLlm>) {
        let llm = Arc::new(llm);
        (IntentRouter::new(Some(llm.clone() as Arc<dyn Llm>), Arc::new(Fixed(sentiment))), llm)
    }

    #[tokio::test]
    async fn test_known_label_is_used() {
        let (router, llm) = router(MockLlm::new("m").with_text("  Order_Status\n"), 0.1);
        let decision = router.route("where is order 12345").await;
        assert_eq!(decision.intent, Intent::OrderStatus);
        assert!(!decision.handoff);

        let request = &llm.requests()[0];
        assert_eq!(request.temperature(), Some(0.0));
        let prompt = request.contents[0].text();
        assert!(prompt.starts_with(SYSTEM_PROMPT));
        assert!(prompt.ends_with("Return ONLY the label.\nUser: where is order 12345"));
    }

    #[tokio::test]
    async fn test_unknown_label_is_complaint() {
        let (router, _) = router(MockLlm::new("m").with_text("order status"), 0.0);
        assert_eq!(router.route("hi").await.intent, Intent::Complaint);
    }

    #[tokio::test]
    async fn test_model_failure_is_complaint() {
        let (router, _) = router(MockLlm::new("m").with_error("timeout"), 0.0);
        let decision = router.route("hi").await;
        assert_eq!(decision.intent, Intent::Complaint);
        assert!(!decision.handoff);

        let no_model = IntentRouter::new(None, Arc::new(Fixed(0.0)));
        assert_eq!(no_model.route("hi").await.intent, Intent::Complaint);
    }

    #[tokio::test]
    async fn test_threshold_is_inclusive() {
        let (router, llm) = router(MockLlm::new("m"), -0.6);
        let decision = router.route("ini parah sekali").await;
        assert_eq!(decision, RouteDecision { intent: Intent::Complaint, sentiment: -0.6, handoff: true });
        assert_eq!(llm.call_count(), 0);
    }

    proptest! {
        #[test]
        fn strong_negative_always_hands_off(score in -1.0f64..=-0.6, label in "Order_Status|General_Inquiry|Product_Recommendation") {
            let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
            let (router, llm) = router(MockLlm::new("m").with_default(label), score);
            let decision = rt.block_on(router.route("where is my order"));
            prop_assert_eq!(decision.intent, Intent::Complaint);
            prop_assert!(decision.handoff);
            prop_assert_eq!(llm.call_count(), 0);
        }

        #[test]
        fn labels_outside_the_set_are_complaints(label in "[A-Za-z_ ]{0,24}") {
            prop_assume!(Intent::from_label(&label).is_none());
            let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
            let (router, _) = router(MockLlm::new("m").with_default(label), 0.2);
            prop_assert_eq!(rt.block_on(router.route("halo")).intent, Intent::Complaint);
        }
    }
}
