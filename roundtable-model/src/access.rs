//! Readability: who may see which message.
//!
//! A speaker reads a message when any of its read roles shares at least one
//! permission with the message. Permission names missing from the registry
//! never match.

use crate::{Message, Permission, Role};
use roundtable_schema::Registry;
use std::collections::BTreeSet;

fn known<'a>(
    names: &'a BTreeSet<String>,
    permissions: &Registry<&Permission>,
    owner: &str,
) -> BTreeSet<&'a str> {
    names
        .iter()
        .filter(|name| {
            let found = permissions.contains(name);
            if !found {
                tracing::warn!(permission = %name, owner, "permission not found, ignored");
            }
            found
        })
        .map(String::as_str)
        .collect()
}

/// Whether `role` grants read access to `message`.
pub fn role_reads(role: &Role, message: &Message, permissions: &Registry<&Permission>) -> bool {
    let granted = known(role.permissions(), permissions, role.name());
    let owner = format!("message {}", message.id());
    let required = known(message.permissions(), permissions, &owner);
    !granted.is_disjoint(&required)
}

/// Whether any of `roles` grants read access to `message`.
pub fn any_reads<'r>(
    roles: impl IntoIterator<Item = &'r Role>,
    message: &Message,
    permissions: &Registry<&Permission>,
) -> bool {
    roles
        .into_iter()
        .any(|role| role_reads(role, message, permissions))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry(perms: &[Permission]) -> Registry<&Permission> {
        perms.iter().collect()
    }

    #[test]
    fn overlap_grants_access() {
        let perms = vec![
            Permission::new("p1", "").unwrap(),
            Permission::new("p2", "").unwrap(),
        ];
        let reg = registry(&perms);
        let r1 = Role::new("r1", "d", ["p1"]).unwrap();
        let r2 = Role::new("r2", "d", ["p2"]).unwrap();
        let m1 = Message::new(0, 1, "s", ["p1"], "x").unwrap();
        let m2 = Message::new(0, 2, "s", ["p2"], "x").unwrap();
        let m12 = Message::new(0, 3, "s", ["p1", "p2"], "x").unwrap();

        assert!(role_reads(&r1, &m1, &reg));
        assert!(role_reads(&r1, &m12, &reg));
        assert!(!role_reads(&r1, &m2, &reg));
        assert!(any_reads([&r1, &r2], &m2, &reg));
    }

    #[test]
    fn unknown_permissions_never_match() {
        let perms = vec![Permission::new("p1", "").unwrap()];
        let reg = registry(&perms);
        let ghost = Role::new("ghost", "d", ["p9"]).unwrap();
        let m = Message::new(0, 1, "s", ["p9"], "x").unwrap();
        assert!(!role_reads(&ghost, &m, &reg));
    }
}
