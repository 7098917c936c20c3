use crate::error::{NotifyError, Result};
use crate::notifier::{Delivery, Notifier};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;

pub const TELEGRAM_API_BASE: &str = "https://api.telegram.org";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelegramConfig {
    pub bot_token: String,
    pub chat_id: String,
    pub api_base: String,
    pub timeout_secs: u64,
}

impl TelegramConfig {
    pub fn new(bot_token: impl Into<String>, chat_id: impl Into<String>) -> Self {
        Self {
            bot_token: bot_token.into(),
            chat_id: chat_id.into(),
            api_base: TELEGRAM_API_BASE.to_string(),
            timeout_secs: 15,
        }
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Option<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Some(Self::new(get("TELEGRAM_BOT_TOKEN")?, get("TELEGRAM_SUPPORT_CHAT_ID")?))
    }
}

/// Posts to the support chat through the Bot API `sendMessage` method.
pub struct TelegramNotifier {
    client: Client,
    config: Option<TelegramConfig>,
}

impl TelegramNotifier {
    pub fn new(config: Option<TelegramConfig>) -> Result<Self> {
        let timeout = config.as_ref().map_or(15, |c| c.timeout_secs);
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout))
            .build()
            .map_err(|e| NotifyError::Configuration(format!("Failed to create HTTP client: {e}")))?;
        Ok(Self { client, config })
    }

    /// Send `text` to an arbitrary chat, e.g. the customer's own chat.
    pub async fn send_message(&self, chat_id: &str, text: &str) -> Result<Delivery> {
        let Some(config) = &self.config else {
            return Ok(Delivery::Skipped);
        };
        let url = format!(
            "{}/bot{}/sendMessage",
            config.api_base.trim_end_matches('/'),
            config.bot_token
        );
        let response = self
            .client
            .post(url)
            .json(&json!({"chat_id": chat_id, "text": text}))
            .send()
            .await
            .map_err(|e| NotifyError::SendFailed(format!("Telegram request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(NotifyError::SendFailed(format!("Telegram API error ({status}): {body}")));
        }
        tracing::info!(chat_id, "telegram message sent");
        Ok(Delivery::Sent)
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    fn channel(&self) -> &'static str {
        "telegram"
    }

    fn is_enabled(&self) -> bool {
        self.config.is_some()
    }

    async fn send(&self, _subject: &str, body: &str) -> Result<Delivery> {
        match &self.config {
            Some(config) => self.send_message(&config.chat_id, body).await,
            None => {
                tracing::debug!("Telegram not configured, skipping support message");
                Ok(Delivery::Skipped)
            }
        }
    }
}
