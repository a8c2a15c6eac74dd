//! Chat completions request/response bodies.

use serde::{Deserialize, Serialize};

/// `POST /chat/completions` request body.
#[derive(Debug, Serialize)]
pub struct ChatRequest {
    /// Model identifier.
    pub model: String,
    /// System prompt first, then the conversation.
    pub messages: Vec<ChatMessage>,
    /// Always `false`; this provider does not stream.
    pub stream: bool,
    /// Maximum output tokens.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    /// Sampling temperature.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
}

/// One chat message on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// `system`, `user` or `assistant`.
    pub role: String,
    /// Text content. Null for some refusals and tool calls.
    #[serde(default)]
    pub content: Option<String>,
}

/// `POST /chat/completions` response body.
#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    /// Model that answered.
    #[serde(default)]
    pub model: String,
    /// Candidate answers; only the first is used.
    #[serde(default)]
    pub choices: Vec<Choice>,
    /// Token accounting.
    #[serde(default)]
    pub usage: Option<ChatUsage>,
}

/// One candidate answer.
#[derive(Debug, Deserialize)]
pub struct Choice {
    /// The generated message.
    pub message: ChatMessage,
    /// Why generation stopped.
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Token counts reported by the API.
#[derive(Debug, Default, Deserialize)]
pub struct ChatUsage {
    /// Tokens in the prompt.
    #[serde(default)]
    pub prompt_tokens: u64,
    /// Tokens generated.
    #[serde(default)]
    pub completion_tokens: u64,
}
