use crate::error::{NotifyError, Result};
use crate::notifier::{Delivery, Notifier};
use async_trait::async_trait;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentNotification {
    pub subject: String,
    pub body: String,
}

/// In-process notifier that records what would have been sent.
pub struct RecordingNotifier {
    channel: &'static str,
    enabled: bool,
    fail: bool,
    attempts: AtomicU64,
    sent: Mutex<Vec<SentNotification>>,
}

impl RecordingNotifier {
    pub fn new(channel: &'static str) -> Self {
        Self { channel, enabled: true, fail: false, attempts: AtomicU64::new(0), sent: Mutex::new(Vec::new()) }
    }

    /// Behaves like an unconfigured channel.
    pub fn disabled(channel: &'static str) -> Self {
        Self { enabled: false, ..Self::new(channel) }
    }

    /// Every send fails after being counted.
    pub fn failing(channel: &'static str) -> Self {
        Self { fail: true, ..Self::new(channel) }
    }

    pub fn attempts(&self) -> u64 {
        self.attempts.load(Ordering::SeqCst)
    }

    pub fn sent(&self) -> Vec<SentNotification> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    fn channel(&self) -> &'static str {
        self.channel
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    async fn send(&self, subject: &str, body: &str) -> Result<Delivery> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if !self.enabled {
            return Ok(Delivery::Skipped);
        }
        if self.fail {
            return Err(NotifyError::SendFailed(format!("{} unavailable", self.channel)));
        }
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(SentNotification { subject: subject.to_string(), body: body.to_string() });
        }
        tracing::info!(channel = self.channel, subject, "[MOCK] notification recorded");
        Ok(Delivery::Sent)
    }
}
