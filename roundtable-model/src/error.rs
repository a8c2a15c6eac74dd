//! Error types for the domain model.

use roundtable_schema::SchemaError;
use thiserror::Error;

/// A reference between entities that does not resolve, or a collision
/// between identities that must be unique.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntegrityError {
    /// A role or message names a permission that is not defined.
    #[error("permission {permission} not found in {owner}")]
    DanglingPermission {
        /// The undefined permission name.
        permission: String,
        /// Which role or message referenced it.
        owner: String,
    },

    /// A speaker names a role that is not defined.
    #[error("{access} role {role} not found in speaker {speaker}")]
    DanglingRole {
        /// The undefined role name.
        role: String,
        /// The speaker that referenced it.
        speaker: String,
        /// `read` or `write`.
        access: &'static str,
    },

    /// A message was authored by a speaker that is not defined.
    #[error("speaker {speaker} not found in message {id}")]
    UnknownSpeaker {
        /// The undefined speaker name.
        speaker: String,
        /// The message id.
        id: u64,
    },

    /// Two entities of the same kind share a name.
    #[error("duplicate {kind} {name}")]
    DuplicateIdentity {
        /// `permission`, `role` or `speaker`.
        kind: &'static str,
        /// The repeated name.
        name: String,
    },

    /// Two messages in the thread share an id.
    #[error("duplicate message id {0}")]
    DuplicateMessageId(u64),

    /// The configuration defines no speakers.
    #[error("no speakers defined")]
    NoSpeakers,
}

/// Failure reported by an append hook.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum HookError {
    /// The hook rejected or could not record the message.
    #[error("hook failed: {0}")]
    Failed(String),

    /// Catch-all.
    #[error("{0}")]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

/// Domain model errors.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ModelError {
    /// Malformed, missing or invalid entity data.
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),

    /// Referential integrity violation.
    #[error("integrity error: {0}")]
    Integrity(#[from] IntegrityError),

    /// A lookup by name found nothing.
    #[error("{kind} {name} not found")]
    NotFound {
        /// Entity kind.
        kind: &'static str,
        /// The name looked up.
        name: String,
    },

    /// The append hook failed, so the message was not inserted.
    #[error("append hook: {0}")]
    Hook(#[from] HookError),

    /// A speaker tried to write with a role it does not hold.
    #[error("speaker {speaker} cannot write as {role}")]
    UnauthorizedRole {
        /// The speaker.
        speaker: String,
        /// The role it asked for.
        role: String,
    },

    /// Builtin generation already ran on this configuration.
    #[error("config is already set up")]
    AlreadySetUp,

    /// A document could not be parsed or emitted.
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Catch-all.
    #[error("{0}")]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl ModelError {
    pub(crate) fn not_found(kind: &'static str, name: impl Into<String>) -> Self {
        ModelError::NotFound {
            kind,
            name: name.into(),
        }
    }
}
