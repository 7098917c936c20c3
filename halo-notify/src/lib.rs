//! # halo-notify
//!
//! Notifications to the human support team when a conversation is handed
//! over. Each channel is gated by its own configuration; an unconfigured
//! channel reports [`Delivery::Skipped`] instead of failing.

pub mod email;
pub mod error;
pub mod mock;
pub mod notifier;
pub mod telegram;

pub use email::{SmtpConfig, SmtpNotifier};
pub use error::{NotifyError, Result};
pub use mock::{RecordingNotifier, SentNotification};
pub use notifier::{
    DEFAULT_HANDOVER_SUBJECT, Delivery, HandoverReport, Notifier, SupportNotifications,
};
pub use telegram::{TELEGRAM_API_BASE, TelegramConfig, TelegramNotifier};
