//! Mapping HTTP failures to [`ProviderError`].

use roundtable_agent::ProviderError;

/// Map a non-success status code to a [`ProviderError`].
pub(crate) fn map_http_status(status: reqwest::StatusCode, body: &str) -> ProviderError {
    match status.as_u16() {
        401 | 403 => ProviderError::AuthFailed(body.to_string()),
        429 => ProviderError::RateLimited,
        _ => ProviderError::RequestFailed(format!("HTTP {status}: {body}")),
    }
}
