use crate::args::{field, object_arg, text_arg};
use async_trait::async_trait;
use halo_core::{Result, Tool, ToolContext};
use halo_notify::{DEFAULT_HANDOVER_SUBJECT, SupportNotifications};
use serde_json::Value;
use std::sync::Arc;
use tracing::warn;

fn ok() -> Value {
    Value::String("ok".to_string())
}

/// Reports `ok` whether or not SMTP is configured or the send succeeds.
pub struct NotifyEmailSupportTool {
    notifications: SupportNotifications,
}

impl NotifyEmailSupportTool {
    pub fn new(notifications: SupportNotifications) -> Self {
        Self { notifications }
    }
}

#[async_trait]
impl Tool for NotifyEmailSupportTool {
    fn name(&self) -> &str {
        "notify_email_support"
    }

    fn description(&self) -> &str {
        "Send an email to support with keys: subject, body. Returns 'ok' even if SMTP not configured."
    }

    async fn execute(&self, ctx: Arc<dyn ToolContext>, args: Value) -> Result<Value> {
        let (subject, body) = match &args {
            Value::String(s) if !s.trim_start().starts_with('{') => {
                (DEFAULT_HANDOVER_SUBJECT.to_string(), s.clone())
            }
            _ => {
                let params = object_arg(&args);
                (
                    field(&params, "subject").unwrap_or_else(|| DEFAULT_HANDOVER_SUBJECT.to_string()),
                    field(&params, "body").unwrap_or_default(),
                )
            }
        };
        if let Err(e) = self.notifications.send_support_email(&subject, &body).await {
            warn!(session_id = ctx.session_id(), error = %e, "support email failed");
        }
        Ok(ok())
    }
}

/// Reports `ok` whether or not the bot token is configured or the send
/// succeeds.
pub struct NotifyTelegramSupportTool {
    notifications: SupportNotifications,
}

impl NotifyTelegramSupportTool {
    pub fn new(notifications: SupportNotifications) -> Self {
        Self { notifications }
    }
}

#[async_trait]
impl Tool for NotifyTelegramSupportTool {
    fn name(&self) -> &str {
        "notify_telegram_support"
    }

    fn description(&self) -> &str {
        "Send a Telegram message to support chat with the given text. Returns 'ok' even if token not configured."
    }

    async fn execute(&self, ctx: Arc<dyn ToolContext>, args: Value) -> Result<Value> {
        let text = text_arg(&args, &["text", "body"]);
        if let Err(e) = self.notifications.notify_support_telegram(&text).await {
            warn!(session_id = ctx.session_id(), error = %e, "support telegram failed");
        }
        Ok(ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use halo_core::SessionToolContext;
    use halo_notify::RecordingNotifier;
    use serde_json::json;

    #[tokio::test]
    async fn test_notify_tools_always_ok() {
        let email = Arc::new(RecordingNotifier::failing("email"));
        let telegram = Arc::new(RecordingNotifier::disabled("telegram"));
        let notifications = SupportNotifications::new(email.clone(), telegram.clone());
        let ctx: Arc<dyn ToolContext> = Arc::new(SessionToolContext::new("web:1", "web"));

        let email_tool = NotifyEmailSupportTool::new(notifications.clone());
        assert_eq!(email_tool.execute(ctx.clone(), json!({"body": "help"})).await.unwrap(), json!("ok"));
        let telegram_tool = NotifyTelegramSupportTool::new(notifications);
        assert_eq!(telegram_tool.execute(ctx, json!("help")).await.unwrap(), json!("ok"));

        assert_eq!(email.attempts(), 1);
        assert_eq!(telegram.attempts(), 1);
    }

    #[tokio::test]
    async fn test_email_subject_defaults() {
        let email = Arc::new(RecordingNotifier::new("email"));
        let notifications =
            SupportNotifications::new(email.clone(), Arc::new(RecordingNotifier::disabled("telegram")));
        let ctx: Arc<dyn ToolContext> = Arc::new(SessionToolContext::new("web:1", "web"));

        NotifyEmailSupportTool::new(notifications).execute(ctx, json!({"body": "transcript"})).await.unwrap();
        let sent = email.sent();
        assert_eq!(sent[0].subject, "AI-CS Handover Needed");
        assert_eq!(sent[0].body, "transcript");
    }
}
