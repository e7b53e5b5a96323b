//! Role definitions and the role-to-default-permission mapping.
//!
//! # Purpose
//! The single canonical copy of which permissions each role starts with.
//! Admin screens, the session store, and the roster all read defaults from
//! here; no other copy of the mapping exists.
//!
//! # Key invariants
//! - `default_permissions_for` is total over [`Role`] and deterministic.
//! - The super-admin default is the full permission universe; the admin
//!   default is a proper subset of it.
use crate::{AuthzError, Permission, PermissionSet};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    SuperAdmin,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::SuperAdmin => "super_admin",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::SuperAdmin => "Super Admin",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = AuthzError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "admin" => Ok(Role::Admin),
            "super_admin" => Ok(Role::SuperAdmin),
            other => Err(AuthzError::UnknownRole(other.to_string())),
        }
    }
}

// Admin accounts start with day-to-day operational capabilities and none of
// the destructive or cross-society ones.
const ADMIN_DEFAULTS: [Permission; 10] = [
    Permission::DashboardView,
    Permission::ResidentsView,
    Permission::ResidentsCreate,
    Permission::ResidentsEdit,
    Permission::RequestsView,
    Permission::RequestsApprove,
    Permission::RequestsReject,
    Permission::ActivityView,
    Permission::NotificationsView,
    Permission::ReportsView,
];

/// Default permission set granted to a role at identity creation.
///
/// Identities copy this set when they are created; later edits to an
/// identity's permissions do not write back here.
pub fn default_permissions_for(role: Role) -> PermissionSet {
    match role {
        Role::SuperAdmin => PermissionSet::universe(),
        Role::Admin => PermissionSet::from(&ADMIN_DEFAULTS[..]),
    }
}
