//! Model-backed reply agent.

use crate::format::{parse_reply, render_read};
use crate::provider::Provider;
use crate::types::{ChatMessage, ProviderRequest};
use async_trait::async_trait;
use roundtable_meeting::{AgentError, Reply, ReplyAgent, ReplyInput};
use roundtable_model::Thread;

/// Static configuration for a [`Bot`].
#[derive(Debug, Clone, Default)]
pub struct BotConfig {
    /// System prompt, usually the rendered rules for the bot's speaker.
    pub instructions: String,
    /// Model identifier (None = provider default).
    pub model: Option<String>,
    /// Maximum output tokens.
    pub max_tokens: Option<u32>,
    /// Sampling temperature.
    pub temperature: Option<f64>,
}

/// A speaker played by a language model.
///
/// Each turn the bot sends its instructions plus every message its speaker
/// may read. Messages the speaker wrote go in as assistant turns, the rest
/// as user turns, all in the read format. The model's answer is parsed with
/// the write format.
pub struct Bot<P: Provider> {
    provider: P,
    config: BotConfig,
}

impl<P: Provider> Bot<P> {
    /// Create a bot.
    pub fn new(provider: P, config: BotConfig) -> Self {
        Self { provider, config }
    }

    /// The bot's configuration.
    pub fn config(&self) -> &BotConfig {
        &self.config
    }

    fn request(&self, speaker: &str, visible: &Thread) -> ProviderRequest {
        let messages = visible
            .iter()
            .map(|m| {
                let text = render_read(m);
                if m.speaker() == speaker {
                    ChatMessage::assistant(text)
                } else {
                    ChatMessage::user(text)
                }
            })
            .collect();
        ProviderRequest {
            model: self.config.model.clone(),
            system: (!self.config.instructions.is_empty())
                .then(|| self.config.instructions.clone()),
            messages,
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        }
    }
}

#[async_trait]
impl<P: Provider + 'static> ReplyAgent for Bot<P> {
    async fn reply(&self, input: ReplyInput) -> Result<Reply, AgentError> {
        let speaker = input.speaker.name();
        tracing::info!(turn = input.turn, speaker, "bot reply started");
        let request = self.request(speaker, &input.visible);
        for (i, m) in request.messages.iter().enumerate() {
            tracing::debug!(speaker, index = i, role = ?m.role, content = %m.content, "bot input");
        }

        let response = self
            .provider
            .complete(request)
            .await?;
        tracing::debug!(
            speaker,
            model = %response.model,
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            "bot output"
        );

        let reply = parse_reply(&response.content)
            .map_err(|e| AgentError::Model(format!("unusable reply: {e}")))?;
        tracing::info!(turn = input.turn, speaker, role = %reply.role, "bot reply finished");
        Ok(reply)
    }
}
