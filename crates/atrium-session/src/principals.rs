//! Read-only principal table consulted by login.
//!
//! # Purpose
//! Holds the fixed list of known principals (credential + identity), keyed by
//! email. The table is data, not a database: it is built once at start-up,
//! either in code or from a YAML document, and never mutated afterwards.
use crate::store::{SessionError, SessionResult};
use atrium_authz::{Identity, Role, SocietyBinding, default_permissions_for};
use atrium_common::ids::{AdminId, SocietyId};
use serde::{Deserialize, Serialize};

/// One entry in the principal table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Principal {
    pub credential: String,
    pub identity: Identity,
}

/// The static principal table.
#[derive(Debug, Clone, Default)]
pub struct PrincipalDirectory {
    entries: Vec<Principal>,
}

impl PrincipalDirectory {
    /// Build a directory, rejecting duplicate emails.
    ///
    /// # Errors
    /// - [`SessionError::DuplicatePrincipal`] when two entries share an email.
    pub fn new(entries: Vec<Principal>) -> SessionResult<Self> {
        for (index, entry) in entries.iter().enumerate() {
            let duplicate = entries[..index]
                .iter()
                .any(|earlier| earlier.identity.email == entry.identity.email);
            if duplicate {
                return Err(SessionError::DuplicatePrincipal(
                    entry.identity.email.clone(),
                ));
            }
        }
        Ok(Self { entries })
    }

    /// Parse a directory from a YAML document (a list of [`Principal`]s).
    pub fn from_yaml_str(doc: &str) -> SessionResult<Self> {
        let entries: Vec<Principal> = serde_yaml::from_str(doc)?;
        Self::new(entries)
    }

    pub fn lookup(&self, email: &str) -> Option<&Principal> {
        self.entries
            .iter()
            .find(|entry| entry.identity.email == email)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The development/demo table: one super admin over everything plus one
    /// society-bound admin.
    pub fn seeded() -> Self {
        let society = SocietyBinding {
            id: SocietyId::new(),
            name: "Green Valley Apartments".to_string(),
        };
        Self::new(vec![
            Principal {
                credential: "admin123".to_string(),
                identity: Identity {
                    id: AdminId::new(),
                    name: "Super Admin".to_string(),
                    email: "super@admin.com".to_string(),
                    role: Role::SuperAdmin,
                    permissions: default_permissions_for(Role::SuperAdmin),
                    society: None,
                },
            },
            Principal {
                credential: "admin123".to_string(),
                identity: Identity {
                    id: AdminId::new(),
                    name: "Admin User".to_string(),
                    email: "admin@admin.com".to_string(),
                    role: Role::Admin,
                    permissions: default_permissions_for(Role::Admin),
                    society: Some(society),
                },
            },
        ])
        .expect("seeded principals are distinct")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use atrium_authz::Permission;

    #[test]
    fn seeded_directory_matches_expected_roles() {
        let directory = PrincipalDirectory::seeded();
        assert_eq!(directory.len(), 2);

        let super_admin = directory.lookup("super@admin.com").expect("super admin");
        assert!(super_admin.identity.is_role(Role::SuperAdmin));
        assert!(super_admin.identity.has_permission(Permission::SocietyViewAll));

        let admin = directory.lookup("admin@admin.com").expect("admin");
        assert!(admin.identity.is_role(Role::Admin));
        assert!(!admin.identity.has_permission(Permission::SocietyViewAll));
        assert!(admin.identity.society.is_some());
    }

    #[test]
    fn lookup_misses_unknown_email() {
        let directory = PrincipalDirectory::seeded();
        assert!(directory.lookup("nobody@admin.com").is_none());
    }

    #[test]
    fn duplicate_emails_are_rejected() {
        let entry = PrincipalDirectory::seeded()
            .lookup("admin@admin.com")
            .cloned()
            .expect("admin");
        let err =
            PrincipalDirectory::new(vec![entry.clone(), entry]).expect_err("duplicate email");
        assert!(matches!(err, SessionError::DuplicatePrincipal(email) if email == "admin@admin.com"));
    }

    #[test]
    fn directory_parses_from_yaml() {
        let doc = r#"
- credential: admin123
  identity:
    id: 7b9c5d7e-9a40-4f8f-a1f5-2b1f1c3a9d21
    name: Super Admin
    email: super@admin.com
    role: super_admin
    permissions: ["dashboard.view", "society.view_all"]
"#;
        let directory = PrincipalDirectory::from_yaml_str(doc).expect("parse");
        let principal = directory.lookup("super@admin.com").expect("entry");
        assert!(principal.identity.has_permission(Permission::SocietyViewAll));
        assert!(principal.identity.society.is_none());
    }

    #[test]
    fn malformed_yaml_is_an_error() {
        let err = PrincipalDirectory::from_yaml_str("credential: [").expect_err("bad yaml");
        assert!(matches!(err, SessionError::PrincipalTable(_)));
    }
}
