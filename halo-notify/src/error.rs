use halo_core::HaloError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("invalid recipient: {0}")]
    InvalidRecipient(String),

    #[error("send failed: {0}")]
    SendFailed(String),
}

pub type Result<T> = std::result::Result<T, NotifyError>;

impl From<NotifyError> for HaloError {
    fn from(err: NotifyError) -> Self {
        HaloError::Notify(err.to_string())
    }
}
