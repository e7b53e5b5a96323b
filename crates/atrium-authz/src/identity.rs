//! Authenticated principal model.
//!
//! # Purpose
//! The identity an admin session carries: who they are, which role they hold,
//! and the concrete permission grants in effect. Grants start as the role
//! default but may diverge from it afterwards; that divergence is the
//! override mechanism, not an inconsistency.
use crate::{Permission, PermissionSet, Role};
use atrium_common::ids::{AdminId, SocietyId};
use serde::{Deserialize, Serialize};

/// Society an admin identity is attached to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocietyBinding {
    pub id: SocietyId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: AdminId,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub permissions: PermissionSet,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub society: Option<SocietyBinding>,
}

impl Identity {
    pub fn has_permission(&self, permission: Permission) -> bool {
        self.permissions.contains(permission)
    }

    /// True when at least one of the given permissions is granted.
    pub fn has_any_permission(&self, permissions: &[Permission]) -> bool {
        permissions
            .iter()
            .any(|permission| self.permissions.contains(*permission))
    }

    /// True when every one of the given permissions is granted.
    pub fn has_all_permissions(&self, permissions: &[Permission]) -> bool {
        permissions
            .iter()
            .all(|permission| self.permissions.contains(*permission))
    }

    pub fn is_role(&self, role: Role) -> bool {
        self.role == role
    }

    /// Whether records scoped to `society` are visible to this identity.
    ///
    /// Holders of `society.view_all` see every society; everyone else only
    /// sees the society they are bound to.
    pub fn can_view_society(&self, society: SocietyId) -> bool {
        if self.permissions.contains(Permission::SocietyViewAll) {
            return true;
        }
        self.society
            .as_ref()
            .is_some_and(|binding| binding.id == society)
    }
}
