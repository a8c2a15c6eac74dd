#![deny(missing_docs)]
//! OpenAI-compatible chat completions provider for roundtable agents.
//!
//! Implements [`roundtable_agent::Provider`] against
//! `POST <base_url>/chat/completions` with bearer authentication. Any
//! server speaking the same protocol works by changing the base URL, for
//! example a local Ollama at `http://localhost:11434/v1`.
//!
//! Non-streaming: one request, one complete answer.

mod error;
pub mod types;

use error::map_http_status;
use roundtable_agent::{ChatRole, Provider, ProviderError, ProviderRequest, ProviderResponse, Usage};
use types::{ChatMessage, ChatRequest, ChatResponse};

/// Model used when neither the request nor the provider names one.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Default API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Client for the chat completions API.
///
/// ```no_run
/// use roundtable_provider_openai::OpenAiProvider;
///
/// let provider = OpenAiProvider::new("sk-...")
///     .model("gpt-4o-mini")
///     .base_url("http://localhost:11434/v1");
/// ```
pub struct OpenAiProvider {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenAiProvider {
    /// A provider for the public API using `api_key`.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.into(),
            model: DEFAULT_MODEL.into(),
        }
    }

    /// Override the API base URL. A trailing slash is ignored.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_owned();
        self
    }

    /// Model used when a request does not name one.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// The chat completions endpoint.
    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    fn build_request(&self, request: &ProviderRequest) -> ChatRequest {
        let mut messages = Vec::with_capacity(request.messages.len() + 1);
        if let Some(system) = &request.system {
            messages.push(ChatMessage {
                role: "system".into(),
                content: Some(system.clone()),
            });
        }
        messages.extend(request.messages.iter().map(|m| ChatMessage {
            role: match m.role {
                ChatRole::User => "user".into(),
                ChatRole::Assistant => "assistant".into(),
            },
            content: Some(m.content.clone()),
        }));
        ChatRequest {
            model: request.model.clone().unwrap_or_else(|| self.model.clone()),
            messages,
            stream: false,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        }
    }

    fn parse_response(response: ChatResponse) -> Result<ProviderResponse, ProviderError> {
        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::InvalidResponse("no choices".into()))?;
        let content = choice
            .message
            .content
            .ok_or_else(|| ProviderError::InvalidResponse("choice has no content".into()))?;
        let usage = response.usage.unwrap_or_default();
        Ok(ProviderResponse {
            content,
            model: response.model,
            usage: Usage {
                input_tokens: usage.prompt_tokens,
                output_tokens: usage.completion_tokens,
            },
        })
    }
}

impl Provider for OpenAiProvider {
    fn complete(
        &self,
        request: ProviderRequest,
    ) -> impl std::future::Future<Output = Result<ProviderResponse, ProviderError>> + Send {
        let api_request = self.build_request(&request);
        let url = self.completions_url();
        tracing::debug!(%url, model = %api_request.model, messages = api_request.messages.len(), "chat completion request");
        let http_request = self
            .client
            .post(url)
            .bearer_auth(&self.api_key)
            .header("content-type", "application/json")
            .json(&api_request);

        async move {
            let http_response = http_request
                .send()
                .await
                .map_err(|e| ProviderError::RequestFailed(e.to_string()))?;

            let status = http_response.status();
            if !status.is_success() {
                let body = http_response.text().await.unwrap_or_default();
                return Err(map_http_status(status, &body));
            }

            let api_response: ChatResponse = http_response
                .json()
                .await
                .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;
            Self::parse_response(api_response)
        }
    }
}
