//! The configuration aggregate: entity lists plus the main thread.

use crate::access;
use crate::builtin;
use crate::error::{IntegrityError, ModelError};
use crate::{MainThread, Message, Permission, Role, Speaker, Thread};
use roundtable_schema::field::empty_seq;
use roundtable_schema::{
    FieldSpec, Fields, Identity, Registry, Schema, SchemaError, SchemaTable, ToValue, Value,
};
use std::collections::{BTreeSet, HashSet};
use std::sync::LazyLock;

/// Everything a meeting needs to know about its participants, plus the
/// thread they write to.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    main_thread: MainThread,
    permissions: Vec<Permission>,
    roles: Vec<Role>,
    speakers: Vec<Speaker>,
}

fn empty_main_thread() -> Value {
    Value::map([("messages", Value::Seq(Vec::new()))])
}

static CONFIG: LazyLock<SchemaTable> = LazyLock::new(|| {
    SchemaTable::new(
        "Config",
        "Application config.",
        vec![
            FieldSpec::new("main_thread", "main thread").default_to(empty_main_thread),
            FieldSpec::new("permissions", "permission definitions").default_to(empty_seq),
            FieldSpec::new("roles", "role definitions").default_to(empty_seq),
            FieldSpec::new("speakers", "speaker definitions").default_to(empty_seq),
        ],
    )
});

impl Config {
    /// A configuration with an empty main thread.
    pub fn new(permissions: Vec<Permission>, roles: Vec<Role>, speakers: Vec<Speaker>) -> Self {
        Self {
            main_thread: MainThread::new(),
            permissions,
            roles,
            speakers,
        }
    }

    /// Replace the main thread.
    pub fn with_main_thread(mut self, main_thread: MainThread) -> Self {
        self.main_thread = main_thread;
        self
    }

    /// Permission definitions, builtins included after setup.
    pub fn permissions(&self) -> &[Permission] {
        &self.permissions
    }

    /// Role definitions, builtins included after setup.
    pub fn roles(&self) -> &[Role] {
        &self.roles
    }

    /// Speakers in turn order.
    pub fn speakers(&self) -> &[Speaker] {
        &self.speakers
    }

    /// The meeting thread.
    pub fn main_thread(&self) -> &MainThread {
        &self.main_thread
    }

    /// Mutable access to the meeting thread, for hooks, clocks and appends.
    pub fn main_thread_mut(&mut self) -> &mut MainThread {
        &mut self.main_thread
    }

    /// Whether [`Config::setup`] already ran.
    ///
    /// Setup always adds the builtin public permission first, so its
    /// presence marks a set-up config, including one reloaded from a
    /// document.
    pub fn is_set_up(&self) -> bool {
        self.permissions
            .iter()
            .any(|p| p.name() == builtin::public_name())
    }

    /// Generate the builtin permissions and roles, then validate.
    ///
    /// Runs at most once per configuration and needs at least one speaker.
    pub fn setup(&mut self) -> Result<(), ModelError> {
        if self.is_set_up() {
            return Err(ModelError::AlreadySetUp);
        }
        if self.speakers.is_empty() {
            return Err(IntegrityError::NoSpeakers.into());
        }

        let speaker_names: Vec<String> =
            self.speakers.iter().map(|s| s.name().to_owned()).collect();
        let names = || speaker_names.iter().map(String::as_str);

        self.permissions.push(builtin::public_permission()?);
        self.roles.push(builtin::public_role()?);
        for speaker in &mut self.speakers {
            speaker.grant_read(builtin::public_name());
            speaker.grant_write(builtin::public_name());
        }

        for name in names() {
            self.permissions.push(builtin::dm_permission(name)?);
            self.roles.push(builtin::dm_role(name)?);
        }
        self.roles.push(builtin::dm_all_role(names())?);

        for speaker in &mut self.speakers {
            let own = builtin::dm_name(speaker.name());
            speaker.grant_read(own);
        }

        self.roles.push(builtin::admin_role(names())?);

        self.permissions.push(builtin::moderator_permission()?);
        self.roles.push(builtin::moderator_role(names())?);

        tracing::info!(
            speakers = self.speakers.len(),
            roles = self.roles.len(),
            permissions = self.permissions.len(),
            "config set up"
        );
        self.validate()
    }

    /// Check referential integrity across every entity and message.
    pub fn validate(&self) -> Result<(), ModelError> {
        let permissions = self.permission_registry()?;
        let roles = self.role_registry(&permissions)?;
        let speakers = self.speaker_registry(&roles)?;

        let mut ids = HashSet::new();
        for message in self.main_thread.messages() {
            if !ids.insert(message.id()) {
                return Err(IntegrityError::DuplicateMessageId(message.id()).into());
            }
            for permission in message.permissions() {
                if !permissions.contains(permission) {
                    return Err(IntegrityError::DanglingPermission {
                        permission: permission.clone(),
                        owner: format!("message {}", message.id()),
                    }
                    .into());
                }
            }
            if message.speaker() != builtin::MODERATOR && !speakers.contains(message.speaker()) {
                return Err(IntegrityError::UnknownSpeaker {
                    speaker: message.speaker().to_owned(),
                    id: message.id(),
                }
                .into());
            }
        }
        Ok(())
    }

    /// Name-keyed permissions, rejecting duplicates.
    pub fn permission_registry(&self) -> Result<Registry<&Permission>, IntegrityError> {
        unique("permission", &self.permissions)
    }

    fn role_registry(
        &self,
        permissions: &Registry<&Permission>,
    ) -> Result<Registry<&Role>, IntegrityError> {
        for role in &self.roles {
            if let Some(missing) = role.permissions().iter().find(|p| !permissions.contains(p)) {
                return Err(IntegrityError::DanglingPermission {
                    permission: missing.clone(),
                    owner: format!("role {}", role.name()),
                });
            }
        }
        unique("role", &self.roles)
    }

    fn speaker_registry(
        &self,
        roles: &Registry<&Role>,
    ) -> Result<Registry<&Speaker>, IntegrityError> {
        for speaker in &self.speakers {
            let read = speaker.read_roles().iter().map(|r| (r, "read"));
            let write = speaker.write_roles().iter().map(|r| (r, "write"));
            if let Some((missing, access)) = read.chain(write).find(|(r, _)| !roles.contains(r)) {
                return Err(IntegrityError::DanglingRole {
                    role: missing.clone(),
                    speaker: speaker.name().to_owned(),
                    access,
                });
            }
        }
        unique("speaker", &self.speakers)
    }

    /// Look up a speaker.
    pub fn speaker(&self, name: &str) -> Result<&Speaker, ModelError> {
        self.speakers
            .iter()
            .find(|s| s.name() == name)
            .ok_or_else(|| ModelError::not_found("speaker", name))
    }

    /// Look up a role.
    pub fn role(&self, name: &str) -> Result<&Role, ModelError> {
        self.roles
            .iter()
            .find(|r| r.name() == name)
            .ok_or_else(|| ModelError::not_found("role", name))
    }

    /// The messages `speaker` may read, in thread order.
    pub fn visible_to(&self, speaker: &str) -> Result<Thread, ModelError> {
        let speaker = self.speaker(speaker)?;
        let roles: Registry<&Role> = self.roles.iter().collect();
        let read_roles = speaker
            .read_roles()
            .iter()
            .map(|name| {
                roles
                    .get_or_fail(name, || ModelError::not_found("role", name.as_str()))
                    .copied()
            })
            .collect::<Result<Vec<_>, _>>()?;
        let permissions: Registry<&Permission> = self.permissions.iter().collect();
        Ok(self
            .main_thread
            .thread()
            .select(|m| access::any_reads(read_roles.iter().copied(), m, &permissions)))
    }

    /// The messages holders of `role` may read, in thread order.
    pub fn visible_to_role(&self, role: &str) -> Result<Thread, ModelError> {
        let role = self.role(role)?;
        let permissions: Registry<&Permission> = self.permissions.iter().collect();
        Ok(self
            .main_thread
            .thread()
            .select(|m| access::role_reads(role, m, &permissions)))
    }

    /// Permissions a message gets when `speaker` writes as `role`.
    pub fn write_permissions(
        &self,
        speaker: &str,
        role: &str,
    ) -> Result<BTreeSet<String>, ModelError> {
        let s = self.speaker(speaker)?;
        if !s.write_roles().contains(role) {
            return Err(ModelError::UnauthorizedRole {
                speaker: speaker.to_owned(),
                role: role.to_owned(),
            });
        }
        Ok(self.role(role)?.permissions().clone())
    }

    /// Append a message from `speaker` written as `role`.
    pub fn post(
        &mut self,
        speaker: &str,
        role: &str,
        content: impl Into<String>,
    ) -> Result<&Message, ModelError> {
        let permissions = self.write_permissions(speaker, role)?;
        self.main_thread.append(speaker, permissions, content)
    }
}

fn unique<'a, T: Identity>(
    kind: &'static str,
    entries: &'a [T],
) -> Result<Registry<&'a T>, IntegrityError> {
    let mut registry = Registry::new();
    for entry in entries {
        registry
            .insert_unique(entry)
            .map_err(|dup| IntegrityError::DuplicateIdentity {
                kind,
                name: dup.identity().to_owned(),
            })?;
    }
    Ok(registry)
}

impl Schema for Config {
    fn schema() -> &'static SchemaTable {
        &CONFIG
    }

    fn get(&self, field: &str) -> Option<Value> {
        match field {
            "main_thread" => Some(self.main_thread.to_value()),
            "permissions" => Some(self.permissions.to_value()),
            "roles" => Some(self.roles.to_value()),
            "speakers" => Some(self.speakers.to_value()),
            _ => None,
        }
    }

    fn construct(fields: &Fields<'_>) -> Result<Self, SchemaError> {
        Ok(Self {
            main_thread: fields.read("main_thread")?,
            permissions: fields.read("permissions")?,
            roles: fields.read("roles")?,
            speakers: fields.read("speakers")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn duo() -> Config {
        Config::new(
            vec![],
            vec![],
            vec![
                Speaker::new("alice", "consultant").unwrap(),
                Speaker::new("bob", "critic").unwrap(),
            ],
        )
    }

    #[test]
    fn setup_generates_builtins_in_order() {
        let mut c = duo();
        c.setup().unwrap();
        let perms: Vec<_> = c.permissions().iter().map(Permission::name).collect();
        assert_eq!(perms, vec!["rt_public", "rt_alice", "rt_bob", "rt_moderator"]);
        let roles: Vec<_> = c.roles().iter().map(Role::name).collect();
        assert_eq!(
            roles,
            vec![
                "rt_public",
                "rt_alice",
                "rt_bob",
                "rt_dm_all",
                "rt_admin",
                "rt_moderator"
            ]
        );
        let alice = c.speaker("alice").unwrap();
        assert!(alice.read_roles().contains("rt_public"));
        assert!(alice.read_roles().contains("rt_alice"));
        assert!(!alice.read_roles().contains("rt_bob"));
        assert!(alice.write_roles().contains("rt_public"));
    }

    #[test]
    fn setup_runs_once() {
        let mut c = duo();
        c.setup().unwrap();
        assert!(matches!(c.setup(), Err(ModelError::AlreadySetUp)));
    }

    #[test]
    fn set_up_config_survives_the_wire() {
        use roundtable_schema::{from_mapping, to_mapping};

        let mut c = duo();
        c.setup().unwrap();
        c.post("alice", "rt_public", "hello").unwrap();
        let mut back: Config = from_mapping(&to_mapping(&c)).unwrap();
        assert_eq!(back, c);
        assert!(back.is_set_up());
        assert!(matches!(back.setup(), Err(ModelError::AlreadySetUp)));

        let fresh: Config = from_mapping(&to_mapping(&duo())).unwrap();
        assert!(!fresh.is_set_up());
    }

    #[test]
    fn setup_needs_speakers() {
        let mut c = Config::default();
        assert!(matches!(
            c.setup(),
            Err(ModelError::Integrity(IntegrityError::NoSpeakers))
        ));
    }

    #[test]
    fn duplicate_speakers_are_rejected() {
        let mut c = Config::new(
            vec![],
            vec![],
            vec![
                Speaker::new("alice", "a").unwrap(),
                Speaker::new("alice", "b").unwrap(),
            ],
        );
        let err = c.setup().unwrap_err();
        assert!(matches!(
            err,
            ModelError::Integrity(IntegrityError::DuplicateIdentity { .. })
        ));
    }

    #[test]
    fn write_permissions_require_write_role() {
        let mut c = duo();
        c.setup().unwrap();
        let perms = c.write_permissions("alice", "rt_public").unwrap();
        assert!(perms.contains("rt_public"));
        assert!(matches!(
            c.write_permissions("alice", "rt_admin"),
            Err(ModelError::UnauthorizedRole { .. })
        ));
        assert!(matches!(
            c.write_permissions("carol", "rt_public"),
            Err(ModelError::NotFound { kind: "speaker", .. })
        ));
    }

    #[test]
    fn post_appends_with_role_permissions() {
        let mut c = duo();
        c.setup().unwrap();
        let m = c.post("bob", "rt_public", "hello").unwrap();
        let perms: Vec<_> = m.permissions().iter().map(String::as_str).collect();
        assert_eq!(perms, vec!["rt_bob", "rt_public"]);
    }
}
