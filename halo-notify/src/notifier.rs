use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

pub const DEFAULT_HANDOVER_SUBJECT: &str = "AI-CS Handover Needed";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Delivery {
    Sent,
    /// The channel is not configured; nothing was attempted.
    Skipped,
}

/// One outbound support channel.
#[async_trait]
pub trait Notifier: Send + Sync {
    fn channel(&self) -> &'static str;

    fn is_enabled(&self) -> bool;

    /// Channels without a subject line ignore `subject`.
    async fn send(&self, subject: &str, body: &str) -> Result<Delivery>;
}

/// Outcome per channel of one handover notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandoverReport {
    pub email: std::result::Result<Delivery, String>,
    pub telegram: std::result::Result<Delivery, String>,
}

/// The email and Telegram support channels together.
#[derive(Clone)]
pub struct SupportNotifications {
    email: Arc<dyn Notifier>,
    telegram: Arc<dyn Notifier>,
}

impl SupportNotifications {
    pub fn new(email: Arc<dyn Notifier>, telegram: Arc<dyn Notifier>) -> Self {
        Self { email, telegram }
    }

    pub async fn send_support_email(&self, subject: &str, body: &str) -> Result<Delivery> {
        self.email.send(subject, body).await
    }

    pub async fn notify_support_telegram(&self, text: &str) -> Result<Delivery> {
        self.telegram.send("", text).await
    }

    /// Send `transcript` on both channels. A failure on one channel does not
    /// stop the other.
    pub async fn notify_handover(&self, session_id: &str, transcript: &str) -> HandoverReport {
        let email = self.send_support_email(DEFAULT_HANDOVER_SUBJECT, transcript).await;
        let telegram = self.notify_support_telegram(transcript).await;

        for (channel, outcome) in [("email", &email), ("telegram", &telegram)] {
            match outcome {
                Ok(delivery) => info!(session_id, channel, ?delivery, "handover notification"),
                Err(e) => warn!(session_id, channel, error = %e, "handover notification failed"),
            }
        }

        HandoverReport {
            email: email.map_err(|e| e.to_string()),
            telegram: telegram.map_err(|e| e.to_string()),
        }
    }
}
