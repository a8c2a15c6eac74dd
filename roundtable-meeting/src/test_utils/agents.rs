//! Reply agent doubles.

use crate::agent::{Reply, ReplyAgent, ReplyInput};
use crate::error::AgentError;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Answers every turn publicly with `"<speaker> turn <n>"` and keeps the
/// inputs it saw.
#[derive(Debug, Default)]
pub struct EchoAgent {
    seen: Mutex<Vec<ReplyInput>>,
}

impl EchoAgent {
    /// A fresh agent with no history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every input received, in order.
    pub fn seen(&self) -> Vec<ReplyInput> {
        self.seen.lock().map(|s| s.clone()).unwrap_or_default()
    }

    /// Number of turns answered.
    pub fn calls(&self) -> usize {
        self.seen.lock().map(|s| s.len()).unwrap_or_default()
    }
}

#[async_trait]
impl ReplyAgent for EchoAgent {
    async fn reply(&self, input: ReplyInput) -> Result<Reply, AgentError> {
        let content = format!("{} turn {}", input.speaker.name(), input.turn);
        if let Ok(mut seen) = self.seen.lock() {
            seen.push(input);
        }
        Ok(Reply::public(content))
    }
}

/// Plays back a fixed list of replies, then fails.
#[derive(Debug, Default)]
pub struct ScriptedAgent {
    replies: Mutex<VecDeque<Reply>>,
}

impl ScriptedAgent {
    /// Queue `replies` in order.
    pub fn new(replies: impl IntoIterator<Item = Reply>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().collect()),
        }
    }

    /// Replies not yet played.
    pub fn remaining(&self) -> usize {
        self.replies.lock().map(|r| r.len()).unwrap_or_default()
    }
}

#[async_trait]
impl ReplyAgent for ScriptedAgent {
    async fn reply(&self, input: ReplyInput) -> Result<Reply, AgentError> {
        let next = self.replies.lock().ok().and_then(|mut r| r.pop_front());
        next.ok_or_else(|| {
            AgentError::Input(format!("script exhausted at turn {}", input.turn))
        })
    }
}

/// Always fails with a model error carrying the given message.
#[derive(Debug, Clone)]
pub struct FailingAgent {
    message: String,
}

impl FailingAgent {
    /// An agent that fails with `message`.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[async_trait]
impl ReplyAgent for FailingAgent {
    async fn reply(&self, _input: ReplyInput) -> Result<Reply, AgentError> {
        Err(AgentError::Model(self.message.clone()))
    }
}
