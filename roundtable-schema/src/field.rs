//! Per-type schema tables: one [`FieldSpec`] per field.

use crate::Value;

/// A predicate over a field's wire value.
#[derive(Debug, Clone, Copy)]
pub enum Validator {
    /// Length of a string, sequence or mapping within `[min, max]`.
    Length {
        /// Inclusive lower bound.
        min: usize,
        /// Inclusive upper bound, if any.
        max: Option<usize>,
    },
    /// Integer greater than or equal to the bound.
    AtLeast(i64),
    /// Arbitrary predicate.
    Custom(fn(&Value) -> bool),
}

impl Validator {
    /// At least one element/char.
    pub const NON_EMPTY: Validator = Validator::length(1, None);

    /// Length within `[min, max]`.
    pub const fn length(min: usize, max: Option<usize>) -> Self {
        Validator::Length { min, max }
    }

    /// Integer `>= min`.
    pub const fn at_least(min: i64) -> Self {
        Validator::AtLeast(min)
    }

    /// Run the predicate.
    pub fn check(&self, value: &Value) -> bool {
        match self {
            Validator::Length { min, max } => value
                .len()
                .is_some_and(|n| n >= *min && max.is_none_or(|m| n <= m)),
            Validator::AtLeast(min) => value.as_int().is_some_and(|i| i >= *min),
            Validator::Custom(f) => f(value),
        }
    }
}

/// Metadata for one field of an entity type.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    /// Wire name of the field.
    pub name: &'static str,
    /// Human-readable description (never empty).
    pub description: &'static str,
    /// Optional validator run after construction.
    pub validator: Option<Validator>,
    /// Whether the field is read from and written to mappings.
    pub wire: bool,
    /// Whether the field appears in generated documentation.
    pub doc: bool,
    /// Default used when the mapping lacks the field.
    pub default: Option<fn() -> Value>,
}

impl FieldSpec {
    /// A required, wire- and doc-included field with no validator.
    pub const fn new(name: &'static str, description: &'static str) -> Self {
        Self {
            name,
            description,
            validator: None,
            wire: true,
            doc: true,
            default: None,
        }
    }

    /// Attach a validator.
    pub const fn validate(mut self, validator: Validator) -> Self {
        self.validator = Some(validator);
        self
    }

    /// Attach a default factory.
    pub const fn default_to(mut self, default: fn() -> Value) -> Self {
        self.default = Some(default);
        self
    }

    /// Exclude the field from mappings. Such fields always take their default.
    pub const fn skip_wire(mut self) -> Self {
        self.wire = false;
        self
    }

    /// Exclude the field from documentation.
    pub const fn skip_doc(mut self) -> Self {
        self.doc = false;
        self
    }
}

/// Default factory for an empty string.
pub fn empty_str() -> Value {
    Value::Str(String::new())
}

/// Default factory for an empty sequence.
pub fn empty_seq() -> Value {
    Value::Seq(Vec::new())
}

/// Default factory for optional fields.
pub fn null() -> Value {
    Value::Null
}

/// Default factory for `false`.
pub fn falsy() -> Value {
    Value::Bool(false)
}

/// The schema of one entity type.
#[derive(Debug)]
pub struct SchemaTable {
    /// Type name, used as documentation heading and in error trails.
    pub name: &'static str,
    /// Type-level documentation text.
    pub doc: &'static str,
    /// Fields in declaration order.
    pub fields: Vec<FieldSpec>,
}

impl SchemaTable {
    /// Build a table. Every field must carry a description.
    pub fn new(name: &'static str, doc: &'static str, fields: Vec<FieldSpec>) -> Self {
        debug_assert!(
            fields.iter().all(|f| !f.description.is_empty()),
            "every field of {name} needs a description"
        );
        Self { name, doc, fields }
    }

    /// Look up a field by wire name.
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }
}
