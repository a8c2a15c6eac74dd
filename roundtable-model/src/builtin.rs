//! Builtin permissions and roles generated by [`Config::setup`](crate::Config::setup).
//!
//! Every builtin name starts with [`PREFIX`]. Each speaker gets a direct
//! message permission and role named after it; messages always carry their
//! author's direct message permission.

use crate::{Permission, Role};
use roundtable_schema::SchemaError;

/// Prefix of every generated name.
pub const PREFIX: &str = "rt_";

/// Reserved speaker name for system-authored messages.
pub const MODERATOR: &str = "moderator";

/// Direct message permission/role name for a speaker.
pub fn dm_name(speaker: &str) -> String {
    format!("{PREFIX}{speaker}")
}

/// Public permission/role name.
pub fn public_name() -> String {
    format!("{PREFIX}public")
}

/// Name of the role holding every direct message permission.
pub fn dm_all_name() -> String {
    format!("{PREFIX}dm_all")
}

/// Name of the role holding every permission.
pub fn admin_name() -> String {
    format!("{PREFIX}admin")
}

/// Moderator permission/role name.
pub fn moderator_name() -> String {
    dm_name(MODERATOR)
}

/// Permission carried by public messages.
pub fn public_permission() -> Result<Permission, SchemaError> {
    Permission::new(public_name(), "allow public messages")
}

/// Role granting the public permission.
pub fn public_role() -> Result<Role, SchemaError> {
    Role::new(
        public_name(),
        "readable or writable public messages",
        [public_name()],
    )
}

/// Direct message permission for one speaker.
pub fn dm_permission(speaker: &str) -> Result<Permission, SchemaError> {
    Permission::new(
        dm_name(speaker),
        format!("allow direct messages for {speaker}"),
    )
}

/// Direct message role for one speaker.
pub fn dm_role(speaker: &str) -> Result<Role, SchemaError> {
    Role::new(
        dm_name(speaker),
        format!("readable or writable direct messages for {speaker}"),
        [dm_name(speaker)],
    )
}

/// Role holding the direct message permissions of all `speakers`.
pub fn dm_all_role<'a>(speakers: impl IntoIterator<Item = &'a str>) -> Result<Role, SchemaError> {
    Role::new(
        dm_all_name(),
        "readable or writable all direct messages",
        speakers.into_iter().map(dm_name),
    )
}

/// Role holding every direct message permission plus the public one.
pub fn admin_role<'a>(speakers: impl IntoIterator<Item = &'a str>) -> Result<Role, SchemaError> {
    Role::new(
        admin_name(),
        "readable or writable all messages",
        speakers
            .into_iter()
            .map(dm_name)
            .chain(std::iter::once(public_name())),
    )
}

/// Permission carried by moderator-authored messages.
pub fn moderator_permission() -> Result<Permission, SchemaError> {
    Permission::new(moderator_name(), "moderator permission")
}

/// Role with the same permissions as the admin role.
pub fn moderator_role<'a>(
    speakers: impl IntoIterator<Item = &'a str>,
) -> Result<Role, SchemaError> {
    let admin = admin_role(speakers)?;
    Role::new(moderator_name(), "meeting moderator", admin.permissions().iter().cloned())
}
