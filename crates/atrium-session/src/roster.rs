//! Administrative roster of admin identities.
//!
//! # Purpose
//! The user-management side of the system: creating admin accounts, editing
//! their grants, changing roles, and listing them with society-scoped
//! visibility. The roster manages identities at rest; the session store
//! manages the one that is logged in.
//!
//! # Role changes
//! `change_role` always resets the permission set to the new role's default.
//! Overrides must be re-applied explicitly afterwards, so "role implies a
//! known baseline" holds after every role transition.
use atrium_authz::{Identity, Permission, PermissionSet, Role, SocietyBinding, default_permissions_for};
use atrium_common::ids::AdminId;
use std::collections::HashMap;
use thiserror::Error;
use tokio::sync::RwLock;

#[derive(Debug, Error)]
pub enum RosterError {
    #[error("admin exists: {0}")]
    DuplicateEmail(String),
    #[error("admin not found: {0}")]
    NotFound(AdminId),
}

pub type RosterResult<T> = Result<T, RosterError>;

/// Request to create an admin identity.
#[derive(Debug, Clone)]
pub struct NewAdmin {
    pub name: String,
    pub email: String,
    pub role: Role,
    /// Explicit grants; when absent the role default applies.
    pub permissions: Option<PermissionSet>,
    pub society: Option<SocietyBinding>,
}

/// In-memory admin roster.
///
/// Reads are concurrent; mutations serialize behind a write lock, mirroring
/// the session store's locking discipline.
#[derive(Debug, Default)]
pub struct AdminRoster {
    admins: RwLock<HashMap<AdminId, Identity>>,
}

impl AdminRoster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an admin identity.
    ///
    /// # Errors
    /// - [`RosterError::DuplicateEmail`] when the email is already taken.
    pub async fn create_admin(&self, request: NewAdmin) -> RosterResult<Identity> {
        let mut admins = self.admins.write().await;
        if admins
            .values()
            .any(|existing| existing.email == request.email)
        {
            return Err(RosterError::DuplicateEmail(request.email));
        }

        let identity = Identity {
            id: AdminId::new(),
            name: request.name,
            email: request.email,
            role: request.role,
            permissions: request
                .permissions
                .unwrap_or_else(|| default_permissions_for(request.role)),
            society: request.society,
        };
        admins.insert(identity.id, identity.clone());

        tracing::info!(email = %identity.email, role = %identity.role, "admin created");
        metrics::counter!("atrium_admin_changes_total", "op" => "created").increment(1);
        metrics::gauge!("atrium_admins_total").set(admins.len() as f64);
        Ok(identity)
    }

    pub async fn get(&self, id: AdminId) -> Option<Identity> {
        self.admins.read().await.get(&id).cloned()
    }

    /// All identities, ordered by email for stable listings.
    pub async fn list(&self) -> Vec<Identity> {
        let mut admins: Vec<_> = self.admins.read().await.values().cloned().collect();
        admins.sort_by(|a, b| a.email.cmp(&b.email));
        admins
    }

    /// The identities `viewer` is allowed to see.
    ///
    /// Holders of `society.view_all` see the whole roster; everyone else sees
    /// themselves plus admins bound to the same society.
    pub async fn visible_to(&self, viewer: &Identity) -> Vec<Identity> {
        let all = self.list().await;
        if viewer.has_permission(Permission::SocietyViewAll) {
            return all;
        }
        all.into_iter()
            .filter(|admin| {
                admin.id == viewer.id
                    || match (&viewer.society, &admin.society) {
                        (Some(own), Some(other)) => own.id == other.id,
                        _ => false,
                    }
            })
            .collect()
    }

    /// Replace an admin's permission set without touching their role.
    pub async fn update_permissions(
        &self,
        id: AdminId,
        permissions: PermissionSet,
    ) -> RosterResult<Identity> {
        let mut admins = self.admins.write().await;
        let identity = admins.get_mut(&id).ok_or(RosterError::NotFound(id))?;
        identity.permissions = permissions;
        let updated = identity.clone();

        metrics::counter!("atrium_admin_changes_total", "op" => "permissions").increment(1);
        Ok(updated)
    }

    /// Move an admin to a different role, resetting permissions to the new
    /// role's default.
    pub async fn change_role(&self, id: AdminId, role: Role) -> RosterResult<Identity> {
        let mut admins = self.admins.write().await;
        let identity = admins.get_mut(&id).ok_or(RosterError::NotFound(id))?;
        identity.role = role;
        identity.permissions = default_permissions_for(role);
        let updated = identity.clone();

        tracing::info!(email = %updated.email, role = %role, "admin role changed");
        metrics::counter!("atrium_admin_changes_total", "op" => "role").increment(1);
        Ok(updated)
    }

    pub async fn remove(&self, id: AdminId) -> RosterResult<()> {
        let mut admins = self.admins.write().await;
        if admins.remove(&id).is_none() {
            return Err(RosterError::NotFound(id));
        }
        metrics::counter!("atrium_admin_changes_total", "op" => "removed").increment(1);
        metrics::gauge!("atrium_admins_total").set(admins.len() as f64);
        Ok(())
    }

    pub async fn len(&self) -> usize {
        self.admins.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.admins.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use atrium_common::ids::SocietyId;

    fn new_admin(email: &str, role: Role, society: Option<SocietyBinding>) -> NewAdmin {
        NewAdmin {
            name: email.split('@').next().unwrap_or(email).to_string(),
            email: email.to_string(),
            role,
            permissions: None,
            society,
        }
    }

    fn society(name: &str) -> SocietyBinding {
        SocietyBinding {
            id: SocietyId::new(),
            name: name.to_string(),
        }
    }

    #[tokio::test]
    async fn create_defaults_permissions_from_role() {
        let roster = AdminRoster::new();
        let admin = roster
            .create_admin(new_admin("ops@admin.com", Role::Admin, None))
            .await
            .expect("create");
        assert_eq!(admin.permissions, default_permissions_for(Role::Admin));

        let super_admin = roster
            .create_admin(new_admin("root@admin.com", Role::SuperAdmin, None))
            .await
            .expect("create");
        assert_eq!(
            super_admin.permissions,
            default_permissions_for(Role::SuperAdmin)
        );
        assert_eq!(roster.len().await, 2);
    }

    #[tokio::test]
    async fn explicit_permissions_override_the_default() {
        let roster = AdminRoster::new();
        let grants = PermissionSet::from_iter([Permission::DashboardView]);
        let admin = roster
            .create_admin(NewAdmin {
                permissions: Some(grants.clone()),
                ..new_admin("ops@admin.com", Role::Admin, None)
            })
            .await
            .expect("create");
        assert_eq!(admin.permissions, grants);
    }

    #[tokio::test]
    async fn duplicate_email_is_a_conflict() {
        let roster = AdminRoster::new();
        roster
            .create_admin(new_admin("ops@admin.com", Role::Admin, None))
            .await
            .expect("create");
        let err = roster
            .create_admin(new_admin("ops@admin.com", Role::Admin, None))
            .await
            .expect_err("duplicate");
        assert!(matches!(err, RosterError::DuplicateEmail(email) if email == "ops@admin.com"));
    }

    #[tokio::test]
    async fn role_change_resets_permissions_to_the_new_default() {
        let roster = AdminRoster::new();
        let admin = roster
            .create_admin(new_admin("ops@admin.com", Role::Admin, None))
            .await
            .expect("create");

        // Grant an override, then change role; the override must not survive.
        let mut widened = admin.permissions.clone();
        widened.insert(Permission::SocietyViewAll);
        roster
            .update_permissions(admin.id, widened)
            .await
            .expect("update");

        let promoted = roster
            .change_role(admin.id, Role::SuperAdmin)
            .await
            .expect("promote");
        assert_eq!(
            promoted.permissions,
            default_permissions_for(Role::SuperAdmin)
        );

        let demoted = roster
            .change_role(admin.id, Role::Admin)
            .await
            .expect("demote");
        assert_eq!(demoted.permissions, default_permissions_for(Role::Admin));
        assert!(!demoted.has_permission(Permission::SocietyViewAll));
    }

    #[tokio::test]
    async fn update_permissions_keeps_the_role() {
        let roster = AdminRoster::new();
        let admin = roster
            .create_admin(new_admin("ops@admin.com", Role::Admin, None))
            .await
            .expect("create");
        let updated = roster
            .update_permissions(admin.id, PermissionSet::from_iter([Permission::ReportsView]))
            .await
            .expect("update");
        assert_eq!(updated.role, Role::Admin);
        assert_eq!(
            updated.permissions,
            PermissionSet::from_iter([Permission::ReportsView])
        );
    }

    #[tokio::test]
    async fn unknown_ids_are_not_found() {
        let roster = AdminRoster::new();
        let id = AdminId::new();
        assert!(matches!(
            roster.update_permissions(id, PermissionSet::new()).await,
            Err(RosterError::NotFound(_))
        ));
        assert!(matches!(
            roster.change_role(id, Role::Admin).await,
            Err(RosterError::NotFound(_))
        ));
        assert!(matches!(roster.remove(id).await, Err(RosterError::NotFound(_))));
        assert!(roster.get(id).await.is_none());
    }

    #[tokio::test]
    async fn visibility_is_scoped_by_society() {
        let roster = AdminRoster::new();
        let green = society("Green Valley Apartments");
        let sunrise = society("Sunrise Residency");

        let viewer = roster
            .create_admin(new_admin("green-a@admin.com", Role::Admin, Some(green.clone())))
            .await
            .expect("create");
        roster
            .create_admin(new_admin("green-b@admin.com", Role::Admin, Some(green.clone())))
            .await
            .expect("create");
        roster
            .create_admin(new_admin("sunrise@admin.com", Role::Admin, Some(sunrise)))
            .await
            .expect("create");
        let overseer = roster
            .create_admin(new_admin("root@admin.com", Role::SuperAdmin, None))
            .await
            .expect("create");

        let scoped = roster.visible_to(&viewer).await;
        let scoped_emails: Vec<_> = scoped.iter().map(|admin| admin.email.as_str()).collect();
        assert_eq!(scoped_emails, vec!["green-a@admin.com", "green-b@admin.com"]);

        // `society.view_all` sees the whole roster.
        assert_eq!(roster.visible_to(&overseer).await.len(), 4);
    }

    #[tokio::test]
    async fn unbound_viewer_without_view_all_sees_only_themselves() {
        let roster = AdminRoster::new();
        let loner = roster
            .create_admin(new_admin("loner@admin.com", Role::Admin, None))
            .await
            .expect("create");
        roster
            .create_admin(new_admin("other@admin.com", Role::Admin, Some(society("Elsewhere"))))
            .await
            .expect("create");

        let visible = roster.visible_to(&loner).await;
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, loner.id);
    }

    #[tokio::test]
    async fn remove_deletes_the_identity() {
        let roster = AdminRoster::new();
        let admin = roster
            .create_admin(new_admin("ops@admin.com", Role::Admin, None))
            .await
            .expect("create");
        roster.remove(admin.id).await.expect("remove");
        assert!(roster.is_empty().await);
    }
}
