#![deny(missing_docs)]
//! # roundtable-model — who says what, and who may read it
//!
//! The domain of a roundtable meeting: [`Permission`]s, the [`Role`]s that
//! bundle them, the [`Speaker`]s that hold roles, and the [`Message`]s they
//! write to the [`MainThread`]. A [`Config`] aggregates all of them,
//! generates the builtin roles once via [`Config::setup`] and enforces
//! referential integrity.
//!
//! ## Access control
//!
//! A speaker reads a message when one of its read roles shares a permission
//! with the message. Every speaker gets a public role and a direct message
//! role of its own (see [`builtin`]), and every message carries its
//! author's direct message permission, so authors always see what they wrote.
//!
//! ## Appending
//!
//! [`MainThread::append`] assigns the id and timestamp, builds the message,
//! hands it to the single registered [`AppendHook`] and only then inserts
//! it. A failing hook leaves the thread untouched.

pub mod access;
pub mod builtin;
pub mod config;
pub mod document;
pub mod error;
pub mod message;
pub mod permission;
pub mod speaker;

pub use config::Config;
pub use document::{ConfigDocument, message_record, read_thread};
pub use error::{HookError, IntegrityError, ModelError};
pub use message::{AppendHook, Clock, MainThread, Message, NoopHook, Thread};
pub use permission::{Permission, Role};
pub use speaker::Speaker;

use std::collections::BTreeSet;

roundtable_schema::schema_value!(Permission, Role, Speaker, Message, Thread, MainThread, Config);

pub(crate) fn names<S: Into<String>>(items: impl IntoIterator<Item = S>) -> BTreeSet<String> {
    items.into_iter().map(Into::into).collect()
}
