//! Capability tags and the roles that bundle them.

use crate::names;
use roundtable_schema::field::{empty_seq, empty_str};
use roundtable_schema::{
    FieldSpec, Fields, Identity, Schema, SchemaError, SchemaTable, ToValue, Validator, Value,
    validate,
};
use std::collections::BTreeSet;
use std::sync::LazyLock;

/// A leaf capability. Messages require permissions; roles grant them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Permission {
    name: String,
    description: String,
}

static PERMISSION: LazyLock<SchemaTable> = LazyLock::new(|| {
    SchemaTable::new(
        "Permission",
        "Permission definition.",
        vec![
            FieldSpec::new("name", "permission name").validate(Validator::NON_EMPTY),
            FieldSpec::new("desc", "permission description").default_to(empty_str),
        ],
    )
});

impl Permission {
    /// Create a validated permission.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<Self, SchemaError> {
        let permission = Self {
            name: name.into(),
            description: description.into(),
        };
        validate(&permission)?;
        Ok(permission)
    }

    /// Unique name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Free-text description.
    pub fn description(&self) -> &str {
        &self.description
    }
}

impl Identity for Permission {
    fn identity(&self) -> &str {
        &self.name
    }
}

impl Schema for Permission {
    fn schema() -> &'static SchemaTable {
        &PERMISSION
    }

    fn get(&self, field: &str) -> Option<Value> {
        match field {
            "name" => Some(self.name.to_value()),
            "desc" => Some(self.description.to_value()),
            _ => None,
        }
    }

    fn construct(fields: &Fields<'_>) -> Result<Self, SchemaError> {
        Ok(Self {
            name: fields.read("name")?,
            description: fields.read("desc")?,
        })
    }
}

/// A named, non-empty set of permissions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Role {
    name: String,
    description: String,
    permissions: BTreeSet<String>,
}

static ROLE: LazyLock<SchemaTable> = LazyLock::new(|| {
    SchemaTable::new(
        "Role",
        "Named set of permissions.",
        vec![
            FieldSpec::new("name", "role name").validate(Validator::NON_EMPTY),
            FieldSpec::new("desc", "role description").validate(Validator::NON_EMPTY),
            FieldSpec::new("permissions", "permissions assigned to this role")
                .validate(Validator::NON_EMPTY)
                .default_to(empty_seq),
        ],
    )
});

impl Role {
    /// Create a validated role.
    pub fn new<S: Into<String>>(
        name: impl Into<String>,
        description: impl Into<String>,
        permissions: impl IntoIterator<Item = S>,
    ) -> Result<Self, SchemaError> {
        let role = Self {
            name: name.into(),
            description: description.into(),
            permissions: names(permissions),
        };
        validate(&role)?;
        Ok(role)
    }

    /// Unique name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Free-text description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Names of the granted permissions.
    pub fn permissions(&self) -> &BTreeSet<String> {
        &self.permissions
    }
}

impl Identity for Role {
    fn identity(&self) -> &str {
        &self.name
    }
}

impl Schema for Role {
    fn schema() -> &'static SchemaTable {
        &ROLE
    }

    fn get(&self, field: &str) -> Option<Value> {
        match field {
            "name" => Some(self.name.to_value()),
            "desc" => Some(self.description.to_value()),
            "permissions" => Some(self.permissions.to_value()),
            _ => None,
        }
    }

    fn construct(fields: &Fields<'_>) -> Result<Self, SchemaError> {
        Ok(Self {
            name: fields.read("name")?,
            description: fields.read("desc")?,
            permissions: fields.read("permissions")?,
        })
    }
}
