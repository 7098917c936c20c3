use crate::error::{NotifyError, Result};
use crate::notifier::{Delivery, Notifier};
use async_trait::async_trait;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Mailbox, header::ContentType},
    transport::smtp::authentication::Credentials,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub to: String,
    pub from: String,
}

impl SmtpConfig {
    /// Requires host, user, password and recipient. Port defaults to 587 and
    /// the sender to `no-reply@example.com`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Option<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Some(Self {
            host: get("SMTP_HOST")?,
            port: get("SMTP_PORT").and_then(|p| p.parse().ok()).unwrap_or(587),
            user: get("SMTP_USER")?,
            password: get("SMTP_PASSWORD")?,
            to: get("SUPPORT_EMAIL_TO")?,
            from: get("SUPPORT_EMAIL_FROM").unwrap_or_else(|| "no-reply@example.com".to_string()),
        })
    }
}

/// STARTTLS SMTP sender for the support mailbox.
pub struct SmtpNotifier {
    config: Option<SmtpConfig>,
    transport: Option<AsyncSmtpTransport<Tokio1Executor>>,
}

impl SmtpNotifier {
    pub fn new(config: Option<SmtpConfig>) -> Result<Self> {
        let Some(config) = config else {
            return Ok(Self::disabled());
        };

        let creds = Credentials::new(config.user.clone(), config.password.clone());
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .map_err(|e| NotifyError::Configuration(format!("Failed to create SMTP relay: {e}")))?
            .port(config.port)
            .credentials(creds)
            .build();

        Ok(Self { config: Some(config), transport: Some(transport) })
    }

    pub fn disabled() -> Self {
        Self { config: None, transport: None }
    }

    fn build_message(config: &SmtpConfig, subject: &str, body: &str) -> Result<Message> {
        let from: Mailbox = config
            .from
            .parse()
            .map_err(|e| NotifyError::Configuration(format!("Invalid from address: {e}")))?;
        let to: Mailbox = config
            .to
            .parse()
            .map_err(|e| NotifyError::InvalidRecipient(format!("Invalid recipient: {e}")))?;

        Message::builder()
            .from(from)
            .to(to)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .map_err(|e| NotifyError::SendFailed(format!("Failed to build message: {e}")))
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    fn channel(&self) -> &'static str {
        "email"
    }

    fn is_enabled(&self) -> bool {
        self.transport.is_some()
    }

    async fn send(&self, subject: &str, body: &str) -> Result<Delivery> {
        let (Some(config), Some(transport)) = (&self.config, &self.transport) else {
            tracing::debug!("SMTP not configured, skipping support email");
            return Ok(Delivery::Skipped);
        };

        let message = Self::build_message(config, subject, body)?;
        transport
            .send(message)
            .await
            .map_err(|e| NotifyError::SendFailed(format!("Failed to send email: {e}")))?;

        tracing::info!(to = %config.to, subject, "support email sent");
        Ok(Delivery::Sent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config() -> SmtpConfig {
        SmtpConfig {
            host: "smtp.example.com".into(),
            port: 587,
            user: "bot".into(),
            password: "secret".into(),
            to: "support@example.com".into(),
            from: "no-reply@example.com".into(),
        }
    }

    #[test]
    fn test_from_lookup_requires_credentials() {
        let env: HashMap<&str, &str> =
            [("SMTP_HOST", "smtp.example.com"), ("SUPPORT_EMAIL_TO", "cs@example.com")].into();
        assert!(SmtpConfig::from_lookup(|k| env.get(k).map(|v| v.to_string())).is_none());

        let env: HashMap<&str, &str> = [
            ("SMTP_HOST", "smtp.example.com"),
            ("SMTP_USER", "bot"),
            ("SMTP_PASSWORD", "pw"),
            ("SUPPORT_EMAIL_TO", "cs@example.com"),
        ]
        .into();
        let config = SmtpConfig::from_lookup(|k| env.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(config.port, 587);
        assert_eq!(config.from, "no-reply@example.com");
    }

    #[test]
    fn test_build_message_rejects_bad_recipient() {
        let mut config = config();
        config.to = "not an address".into();
        let err = SmtpNotifier::build_message(&config, "s", "b").unwrap_err();
        assert!(matches!(err, NotifyError::InvalidRecipient(_)));
    }

    #[test]
    fn test_build_message_plain_text() {
        let message = SmtpNotifier::build_message(&config(), "AI-CS Handover Needed", "User: hi").unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();
        assert!(raw.contains("Subject: AI-CS Handover Needed"));
        assert!(raw.contains("User: hi"));
    }

    #[tokio::test]
    async fn test_unconfigured_is_skipped() {
        let notifier = SmtpNotifier::new(None).unwrap();
        assert!(!notifier.is_enabled());
        assert_eq!(notifier.send("s", "b").await.unwrap(), Delivery::Skipped);
    }
}
