//! Collaborator protocols: reply agents, evaluators and report hooks.
//!
//! Collaborators never touch the main thread. They get an owned snapshot of
//! the messages they may read and hand back a value; the scheduler is the
//! only writer.

use crate::error::AgentError;
use async_trait::async_trait;
use roundtable_model::{Speaker, Thread, builtin};

/// What a reply agent gets for one turn.
#[derive(Debug, Clone)]
pub struct ReplyInput {
    /// 1-based turn number.
    pub turn: u32,
    /// The speaker whose turn it is.
    pub speaker: Speaker,
    /// Messages the speaker may read, in thread order.
    pub visible: Thread,
}

impl ReplyInput {
    /// Bundle the turn context.
    pub fn new(turn: u32, speaker: Speaker, visible: Thread) -> Self {
        Self {
            turn,
            speaker,
            visible,
        }
    }
}

/// One statement, to be appended with the permissions of `role`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    /// Write role; must be one of the speaker's write roles.
    pub role: String,
    /// Message body.
    pub content: String,
}

impl Reply {
    /// A reply written as `role`.
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }

    /// A reply everyone can read.
    pub fn public(content: impl Into<String>) -> Self {
        Self::new(builtin::public_name(), content)
    }
}

/// Produces a speaker's statement for a turn.
///
/// Implementations: LLM-backed bots, humans at a terminal, scripted test
/// doubles.
#[async_trait]
pub trait ReplyAgent: Send + Sync {
    /// Answer exactly once for this turn.
    async fn reply(&self, input: ReplyInput) -> Result<Reply, AgentError>;
}

/// What an evaluator gets.
#[derive(Debug, Clone)]
pub struct EvalInput {
    /// The turn that just completed.
    pub turn: u32,
    /// The moderator's view of the thread.
    pub visible: Thread,
}

impl EvalInput {
    /// Bundle the evaluation context.
    pub fn new(turn: u32, visible: Thread) -> Self {
        Self { turn, visible }
    }
}

/// Judges the thread and produces a value: an end decision, a summary.
#[async_trait]
pub trait Evaluator<T>: Send + Sync {
    /// Name used in logs, errors and reports.
    fn name(&self) -> &str;

    /// Evaluate the thread. Implementations pass the value to their report
    /// hook before returning it.
    async fn evaluate(&self, input: EvalInput) -> Result<T, AgentError>;
}

/// Receives each value an evaluator produces.
pub trait Report<T>: Send + Sync {
    /// Record or forward the value.
    fn report(&self, value: &T) -> Result<(), AgentError>;
}

impl<T, F> Report<T> for F
where
    F: Fn(&T) -> Result<(), AgentError> + Send + Sync,
{
    fn report(&self, value: &T) -> Result<(), AgentError> {
        self(value)
    }
}

/// Report hook that drops every value.
#[derive(Debug, Clone, Copy, Default)]
pub struct Discard;

impl<T> Report<T> for Discard {
    fn report(&self, _value: &T) -> Result<(), AgentError> {
        Ok(())
    }
}
