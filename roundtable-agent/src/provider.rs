//! Provider trait for language model backends.
//!
//! [`Provider`] uses RPITIT and is not object-safe. Agents are generic over
//! it; the object-safe boundary is `roundtable_meeting::ReplyAgent` and
//! `roundtable_meeting::Evaluator`.

use crate::types::{ProviderRequest, ProviderResponse};
use roundtable_meeting::AgentError;
use std::future::Future;
use thiserror::Error;

/// Errors from model backends.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ProviderError {
    /// HTTP or network request failed.
    #[error("request failed: {0}")]
    RequestFailed(String),

    /// The backend rate-limited the request.
    #[error("rate limited")]
    RateLimited,

    /// Authentication or authorization failed.
    #[error("auth failed: {0}")]
    AuthFailed(String),

    /// Could not make sense of the backend's answer.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Catch-all for other errors.
    #[error("{0}")]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl ProviderError {
    /// Whether retrying this request might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ProviderError::RateLimited | ProviderError::RequestFailed(_)
        )
    }
}

impl From<ProviderError> for AgentError {
    fn from(e: ProviderError) -> Self {
        if e.is_retryable() {
            AgentError::Retryable(e.to_string())
        } else {
            AgentError::Model(e.to_string())
        }
    }
}

/// Chat completion backend.
pub trait Provider: Send + Sync {
    /// Send one request and wait for the whole answer.
    fn complete(
        &self,
        request: ProviderRequest,
    ) -> impl Future<Output = Result<ProviderResponse, ProviderError>> + Send;
}
