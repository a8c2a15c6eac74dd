//! A speaker played by a person.

use crate::format::{parse_reply, render_read};
use async_trait::async_trait;
use roundtable_meeting::{AgentError, Reply, ReplyAgent, ReplyInput};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines, Stdin};
use tokio::sync::Mutex;

/// Where a human's lines come from and where their prompts go.
#[async_trait]
pub trait LineSource: Send + Sync {
    /// Next input line without its terminator. `None` at end of input.
    async fn next_line(&self) -> Result<Option<String>, AgentError>;

    /// Show text to the person before reading. Silent by default.
    async fn show(&self, _text: &str) -> Result<(), AgentError> {
        Ok(())
    }
}

/// Lines from standard input; prompts go to standard error.
pub struct StdinSource {
    lines: Mutex<Lines<BufReader<Stdin>>>,
}

impl StdinSource {
    /// Wrap the process's standard input.
    pub fn new() -> Self {
        Self {
            lines: Mutex::new(BufReader::new(tokio::io::stdin()).lines()),
        }
    }
}

impl Default for StdinSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LineSource for StdinSource {
    async fn next_line(&self) -> Result<Option<String>, AgentError> {
        self.lines
            .lock()
            .await
            .next_line()
            .await
            .map_err(|e| AgentError::Input(e.to_string()))
    }

    async fn show(&self, text: &str) -> Result<(), AgentError> {
        let mut err = tokio::io::stderr();
        err.write_all(text.as_bytes())
            .await
            .map_err(|e| AgentError::Input(e.to_string()))?;
        err.flush().await.map_err(|e| AgentError::Input(e.to_string()))
    }
}

/// Reply agent that asks a person.
///
/// Before each prompt the person sees the messages that arrived since
/// their last turn. Lines are read until the end marker; the joined lines
/// are parsed like a model's answer, so a leading `role:` header picks the
/// write role.
pub struct Human<S> {
    source: S,
    end: String,
    shown: AtomicU64,
}

impl<S: LineSource> Human<S> {
    /// Read from `source` until a line equal to `end`.
    pub fn new(source: S, end: impl Into<String>) -> Self {
        Self {
            source,
            end: end.into(),
            shown: AtomicU64::new(0),
        }
    }

    async fn read_until_end(&self) -> Result<Vec<String>, AgentError> {
        let mut lines = Vec::new();
        loop {
            match self.source.next_line().await? {
                Some(line) if line == self.end => return Ok(lines),
                Some(line) => lines.push(line),
                None if lines.is_empty() => {
                    return Err(AgentError::Input("input closed".into()));
                }
                None => return Ok(lines),
            }
        }
    }
}

#[async_trait]
impl<S: LineSource + 'static> ReplyAgent for Human<S> {
    async fn reply(&self, input: ReplyInput) -> Result<Reply, AgentError> {
        let speaker = input.speaker.name();
        tracing::info!(turn = input.turn, speaker, "human reply started");

        let shown = self.shown.load(Ordering::Relaxed);
        let mut text = String::new();
        for m in input.visible.iter().filter(|m| m.id() > shown) {
            text.push_str(&render_read(m));
            text.push_str("\n\n");
        }
        if let Some(last) = input.visible.messages().last() {
            self.shown.store(last.id(), Ordering::Relaxed);
        }
        text.push_str(&format!("{speaker}: content(end={})> \n", self.end));
        self.source.show(&text).await?;

        let lines = self.read_until_end().await?;
        let reply = parse_reply(&lines.join("\n"))
            .map_err(|e| AgentError::Input(format!("unusable reply: {e}")))?;
        tracing::info!(turn = input.turn, speaker, role = %reply.role, "human reply finished");
        Ok(reply)
    }
}
