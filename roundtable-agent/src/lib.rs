#![deny(missing_docs)]
//! # roundtable-agent — who answers for a speaker
//!
//! Implementations of the `roundtable-meeting` collaborator traits.
//!
//! | Type | Implements | Backed by |
//! |------|-----------|-----------|
//! | [`Bot`] | `ReplyAgent` | a [`Provider`] and the speaker's [`Rules`] |
//! | [`Human`] | `ReplyAgent` | a [`LineSource`], standard input by default |
//! | [`LlmEvaluator`] | `Evaluator<T>` | a [`Provider`] and an [`Interpret`] judge |
//!
//! Models see messages in the read format and answer in the write format
//! (see [`format`]). [`Provider`] is deliberately not object-safe; backends
//! such as `roundtable-provider-openai` implement it and agents stay
//! generic over it.

pub mod bot;
pub mod evaluator;
pub mod format;
pub mod human;
pub mod provider;
pub mod rules;
pub mod types;

pub use bot::{Bot, BotConfig};
pub use evaluator::{EndJudge, Interpret, LlmEvaluator, Summarizer};
pub use format::FormatError;
pub use human::{Human, LineSource, StdinSource};
pub use provider::{Provider, ProviderError};
pub use rules::Rules;
pub use types::{ChatMessage, ChatRole, ProviderRequest, ProviderResponse, Usage};
