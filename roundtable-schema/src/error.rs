//! Schema errors with an accumulating field-path trail.

use std::fmt;
use thiserror::Error;

/// What went wrong while converting or validating an entity.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchemaErrorKind {
    /// A required field was absent and has no default.
    #[error("missing required value")]
    Missing,

    /// The wire value has the wrong shape for the field's type.
    #[error("want {expected} but got {found}")]
    TypeMismatch {
        /// The shape the field's type accepts.
        expected: &'static str,
        /// A rendering of the offending value.
        found: String,
    },

    /// A field validator rejected the value.
    #[error("invalid value: {0}")]
    Invalid(String),

    /// The type or container shape is not supported by the framework.
    #[error("unsupported: {0}")]
    Unsupported(String),
}

/// One step on the path from an entity down to the failing value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// A named field of an entity type.
    Field {
        /// Entity type name.
        entity: &'static str,
        /// Field name.
        field: &'static str,
    },
    /// A position inside a sequence.
    Index(usize),
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Field { entity, field } => write!(f, "field {field} of {entity}"),
            Segment::Index(i) => write!(f, "item {i}"),
        }
    }
}

/// Malformed, missing or invalid wire data.
///
/// The trail is ordered innermost first: the field that actually failed
/// comes first, followed by each enclosing field or index on the way out.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaError {
    kind: SchemaErrorKind,
    trail: Vec<Segment>,
}

impl SchemaError {
    /// Create an error with an empty trail.
    pub fn new(kind: SchemaErrorKind) -> Self {
        Self {
            kind,
            trail: Vec::new(),
        }
    }

    /// A required value was missing.
    pub fn missing() -> Self {
        Self::new(SchemaErrorKind::Missing)
    }

    /// The value does not have the expected shape.
    pub fn mismatch(expected: &'static str, found: &crate::Value) -> Self {
        Self::new(SchemaErrorKind::TypeMismatch {
            expected,
            found: format!("{} {}", found.kind(), found),
        })
    }

    /// A validator rejected the value.
    pub fn invalid(detail: impl Into<String>) -> Self {
        Self::new(SchemaErrorKind::Invalid(detail.into()))
    }

    /// The shape is not supported.
    pub fn unsupported(detail: impl Into<String>) -> Self {
        Self::new(SchemaErrorKind::Unsupported(detail.into()))
    }

    /// Record an enclosing segment on the way out.
    pub fn within(mut self, segment: Segment) -> Self {
        self.trail.push(segment);
        self
    }

    /// Shorthand for [`SchemaError::within`] with a field segment.
    pub fn in_field(self, entity: &'static str, field: &'static str) -> Self {
        self.within(Segment::Field { entity, field })
    }

    /// What went wrong.
    pub fn kind(&self) -> &SchemaErrorKind {
        &self.kind
    }

    /// Path to the failing value, innermost first.
    pub fn trail(&self) -> &[Segment] {
        &self.trail
    }

    /// Dotted path from the outermost field to the failing one,
    /// e.g. `main_thread.messages[1].content`.
    pub fn path(&self) -> String {
        let mut out = String::new();
        for segment in self.trail.iter().rev() {
            match segment {
                Segment::Field { field, .. } => {
                    if !out.is_empty() {
                        out.push('.');
                    }
                    out.push_str(field);
                }
                Segment::Index(i) => out.push_str(&format!("[{i}]")),
            }
        }
        out
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        for segment in &self.trail {
            write!(f, "\n  from {segment}")?;
        }
        Ok(())
    }
}

impl std::error::Error for SchemaError {}
