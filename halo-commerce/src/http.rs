use crate::error::{CommerceError, Result};
use reqwest::{Client, RequestBuilder};
use serde_json::Value;
use std::time::Duration;

pub(crate) fn build_client(provider: &'static str, timeout_secs: u64) -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| CommerceError::Http { provider, message: e.to_string() })
}

/// Send and decode a JSON body, treating any non-2xx status as an error.
pub(crate) async fn send_json(provider: &'static str, request: RequestBuilder) -> Result<Value> {
    let response = request
        .send()
        .await
        .map_err(|e| CommerceError::Http { provider, message: e.to_string() })?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        tracing::warn!(provider, status = status.as_u16(), "storefront request rejected");
        return Err(CommerceError::Status { provider, status: status.as_u16(), body });
    }

    response.json().await.map_err(|e| CommerceError::Decode { provider, message: e.to_string() })
}

/// Platform ids arrive as numbers or strings.
pub(crate) fn id_string(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

pub(crate) fn opt_string(value: Option<&Value>) -> Option<String> {
    value.and_then(Value::as_str).map(str::to_string)
}
