//! Error types for the scheduler and its collaborators.

use roundtable_model::ModelError;
use thiserror::Error;

/// Failure inside a reply agent or evaluator.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum AgentError {
    /// The language model backend failed or answered unusably.
    #[error("model error: {0}")]
    Model(String),

    /// The backend failed in a way that may pass on a later attempt
    /// (rate limits, network trouble).
    #[error("retryable: {0}")]
    Retryable(String),

    /// Reading input (a human's answer, a file) failed.
    #[error("input error: {0}")]
    Input(String),

    /// The caller-supplied report hook rejected the value.
    #[error("report failed: {0}")]
    Report(String),

    /// Catch-all. Include context.
    #[error("{0}")]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

/// Meeting errors.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum MeetingError {
    /// Configuration, integrity or append failure from the model.
    #[error("config error: {0}")]
    Config(#[from] ModelError),

    /// A speaker has no reply agent registered.
    #[error("no reply agent for speaker {0}")]
    AgentNotFound(String),

    /// A reply agent or evaluator failed.
    #[error("{kind} {name} failed: {source}")]
    Collaborator {
        /// `reply agent` or `evaluator`.
        kind: &'static str,
        /// Speaker or evaluator name.
        name: String,
        /// What went wrong.
        source: AgentError,
    },

    /// `run` was called before the configuration was set up.
    #[error("meeting is not set up")]
    NotSetUp,

    /// `setup` or `run` was called after the meeting started.
    #[error("meeting already started")]
    AlreadyStarted,

    /// Catch-all.
    #[error("{0}")]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl MeetingError {
    pub(crate) fn reply_agent(name: &str, source: AgentError) -> Self {
        MeetingError::Collaborator {
            kind: "reply agent",
            name: name.to_owned(),
            source,
        }
    }

    pub(crate) fn evaluator(name: &str, source: AgentError) -> Self {
        MeetingError::Collaborator {
            kind: "evaluator",
            name: name.to_owned(),
            source,
        }
    }
}
