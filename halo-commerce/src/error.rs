use halo_core::HaloError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CommerceError {
    #[error("{0} not configured")]
    NotConfigured(&'static str),

    #[error("{provider} request failed: {message}")]
    Http { provider: &'static str, message: String },

    #[error("{provider} API error ({status}): {body}")]
    Status { provider: &'static str, status: u16, body: String },

    #[error("{provider} returned an unexpected payload: {message}")]
    Decode { provider: &'static str, message: String },
}

pub type Result<T> = std::result::Result<T, CommerceError>;

impl From<CommerceError> for HaloError {
    fn from(err: CommerceError) -> Self {
        match err {
            CommerceError::NotConfigured(_) => HaloError::Config(err.to_string()),
            other => HaloError::Tool(other.to_string()),
        }
    }
}
