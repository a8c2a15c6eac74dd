//! Discussion participants.

use crate::names;
use roundtable_schema::field::{empty_seq, falsy};
use roundtable_schema::{
    FieldSpec, Fields, Identity, Schema, SchemaError, SchemaTable, ToValue, Validator, Value,
    validate,
};
use std::collections::BTreeSet;
use std::sync::LazyLock;

/// A named participant, automated or human.
///
/// Read roles decide which messages the speaker sees; write roles decide
/// which permission sets its replies may carry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Speaker {
    name: String,
    description: String,
    read_roles: BTreeSet<String>,
    write_roles: BTreeSet<String>,
    human: bool,
}

static SPEAKER: LazyLock<SchemaTable> = LazyLock::new(|| {
    SchemaTable::new(
        "Speaker",
        "Speaker definition.",
        vec![
            FieldSpec::new("name", "speaker name").validate(Validator::NON_EMPTY),
            FieldSpec::new("desc", "speaker description").validate(Validator::NON_EMPTY),
            FieldSpec::new("read_roles", "roles to read messages with").default_to(empty_seq),
            FieldSpec::new("write_roles", "roles to write messages with").default_to(empty_seq),
            FieldSpec::new("human", "if true, a human answers for this speaker")
                .default_to(falsy),
        ],
    )
});

impl Speaker {
    /// Create a validated automated speaker with no roles.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<Self, SchemaError> {
        let speaker = Self {
            name: name.into(),
            description: description.into(),
            read_roles: BTreeSet::new(),
            write_roles: BTreeSet::new(),
            human: false,
        };
        validate(&speaker)?;
        Ok(speaker)
    }

    /// Add read roles.
    pub fn with_read_roles<S: Into<String>>(mut self, roles: impl IntoIterator<Item = S>) -> Self {
        self.read_roles.extend(names(roles));
        self
    }

    /// Add write roles.
    pub fn with_write_roles<S: Into<String>>(
        mut self,
        roles: impl IntoIterator<Item = S>,
    ) -> Self {
        self.write_roles.extend(names(roles));
        self
    }

    /// Mark the speaker as answered by a person.
    pub fn with_human(mut self, human: bool) -> Self {
        self.human = human;
        self
    }

    /// Unique name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Persona description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Roles used to decide visibility.
    pub fn read_roles(&self) -> &BTreeSet<String> {
        &self.read_roles
    }

    /// Roles the speaker may write with.
    pub fn write_roles(&self) -> &BTreeSet<String> {
        &self.write_roles
    }

    /// Whether a person answers for this speaker.
    pub fn is_human(&self) -> bool {
        self.human
    }

    pub(crate) fn grant_read(&mut self, role: String) {
        self.read_roles.insert(role);
    }

    pub(crate) fn grant_write(&mut self, role: String) {
        self.write_roles.insert(role);
    }
}

impl Identity for Speaker {
    fn identity(&self) -> &str {
        &self.name
    }
}

impl Schema for Speaker {
    fn schema() -> &'static SchemaTable {
        &SPEAKER
    }

    fn get(&self, field: &str) -> Option<Value> {
        match field {
            "name" => Some(self.name.to_value()),
            "desc" => Some(self.description.to_value()),
            "read_roles" => Some(self.read_roles.to_value()),
            "write_roles" => Some(self.write_roles.to_value()),
            "human" => Some(self.human.to_value()),
            _ => None,
        }
    }

    fn construct(fields: &Fields<'_>) -> Result<Self, SchemaError> {
        Ok(Self {
            name: fields.read("name")?,
            description: fields.read("desc")?,
            read_roles: fields.read("read_roles")?,
            write_roles: fields.read("write_roles")?,
            human: fields.read("human")?,
        })
    }
}
