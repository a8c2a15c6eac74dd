#![deny(missing_docs)]
//! # roundtable-meeting — the turn scheduler
//!
//! A [`Meeting`] owns a set-up [`Config`](roundtable_model::Config) and plays
//! it turn by turn. Speakers answer through [`ReplyAgent`]s, an optional end
//! [`Evaluator`] decides when the discussion is over, and report evaluators
//! (summaries) run once it is.
//!
//! ## Turn order
//!
//! | Step | What happens |
//! |------|--------------|
//! | 1 | speaker = speakers\[(turn - 1) mod N\] |
//! | 2 | the speaker's agent gets the messages it may read and returns one [`Reply`] |
//! | 3 | the reply is appended with its write role's permissions |
//! | 4 | [`should_skip`] decides whether to evaluate |
//! | 5 | the end evaluator sees the moderator's view; on `true` the reports run and the meeting ends |
//!
//! Turns never overlap. Collaborators get owned snapshots and return values;
//! only the scheduler appends.
//!
//! ## Errors
//!
//! Everything is fail-fast. A missing agent is reported before turn one; a
//! failing agent or evaluator aborts the meeting with
//! [`MeetingError::Collaborator`], naming who failed.

pub mod agent;
pub mod error;
pub mod meeting;
pub mod policy;

#[cfg(feature = "test-utils")]
pub mod test_utils;

pub use agent::{Discard, EvalInput, Evaluator, Reply, ReplyAgent, ReplyInput, Report};
pub use error::{AgentError, MeetingError};
pub use meeting::{EndReason, Meeting, MeetingConfig, MeetingState, Outcome};
pub use policy::{Skip, rotation, should_skip};
