//! Permission tokens and permission sets.
//!
//! # Purpose
//! Defines the closed set of capability tokens recognized by the system and
//! the ordered-set container that identities and role defaults are expressed
//! in.
//!
//! # How it fits
//! The registry assigns `PermissionSet`s to roles, identities carry one, and
//! the access guard evaluates requirements against it.
//!
//! # Key invariants
//! - The token universe is fixed at build time ([`Permission::ALL`]).
//! - Canonical token strings are `section.action` (e.g. `residents.edit`);
//!   `as_str`/`FromStr`/serde all agree on them.
//!
//! # Examples
//! ```rust
//! use atrium_authz::{Permission, PermissionSet};
//!
//! let set = PermissionSet::from_iter([Permission::DashboardView]);
//! assert!(set.contains(Permission::DashboardView));
//! assert_eq!(Permission::DashboardView.as_str(), "dashboard.view");
//! ```
//!
//! # Common pitfalls
//! - Passing unvalidated strings into [`PermissionSet::from_strings`]; unknown
//!   tokens are rejected, not silently dropped.
use crate::{AuthzError, AuthzResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Capability token from the closed permission universe.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Permission {
    #[serde(rename = "dashboard.view")]
    DashboardView,
    #[serde(rename = "residents.view")]
    ResidentsView,
    #[serde(rename = "residents.create")]
    ResidentsCreate,
    #[serde(rename = "residents.edit")]
    ResidentsEdit,
    #[serde(rename = "residents.delete")]
    ResidentsDelete,
    #[serde(rename = "requests.view")]
    RequestsView,
    #[serde(rename = "requests.approve")]
    RequestsApprove,
    #[serde(rename = "requests.reject")]
    RequestsReject,
    #[serde(rename = "permissions.view")]
    PermissionsView,
    #[serde(rename = "permissions.edit")]
    PermissionsEdit,
    #[serde(rename = "activity.view")]
    ActivityView,
    #[serde(rename = "notifications.view")]
    NotificationsView,
    #[serde(rename = "notifications.create")]
    NotificationsCreate,
    #[serde(rename = "reports.view")]
    ReportsView,
    #[serde(rename = "reports.download")]
    ReportsDownload,
    #[serde(rename = "society.view")]
    SocietyView,
    #[serde(rename = "society.create")]
    SocietyCreate,
    #[serde(rename = "society.edit")]
    SocietyEdit,
    #[serde(rename = "society.delete")]
    SocietyDelete,
    #[serde(rename = "society.view_all")]
    SocietyViewAll,
    #[serde(rename = "staff.view")]
    StaffView,
    #[serde(rename = "staff.create")]
    StaffCreate,
    #[serde(rename = "staff.edit")]
    StaffEdit,
    #[serde(rename = "staff.delete")]
    StaffDelete,
}

impl Permission {
    /// Every token that exists; the permission universe.
    pub const ALL: [Permission; 24] = [
        Permission::DashboardView,
        Permission::ResidentsView,
        Permission::ResidentsCreate,
        Permission::ResidentsEdit,
        Permission::ResidentsDelete,
        Permission::RequestsView,
        Permission::RequestsApprove,
        Permission::RequestsReject,
        Permission::PermissionsView,
        Permission::PermissionsEdit,
        Permission::ActivityView,
        Permission::NotificationsView,
        Permission::NotificationsCreate,
        Permission::ReportsView,
        Permission::ReportsDownload,
        Permission::SocietyView,
        Permission::SocietyCreate,
        Permission::SocietyEdit,
        Permission::SocietyDelete,
        Permission::SocietyViewAll,
        Permission::StaffView,
        Permission::StaffCreate,
        Permission::StaffEdit,
        Permission::StaffDelete,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Permission::DashboardView => "dashboard.view",
            Permission::ResidentsView => "residents.view",
            Permission::ResidentsCreate => "residents.create",
            Permission::ResidentsEdit => "residents.edit",
            Permission::ResidentsDelete => "residents.delete",
            Permission::RequestsView => "requests.view",
            Permission::RequestsApprove => "requests.approve",
            Permission::RequestsReject => "requests.reject",
            Permission::PermissionsView => "permissions.view",
            Permission::PermissionsEdit => "permissions.edit",
            Permission::ActivityView => "activity.view",
            Permission::NotificationsView => "notifications.view",
            Permission::NotificationsCreate => "notifications.create",
            Permission::ReportsView => "reports.view",
            Permission::ReportsDownload => "reports.download",
            Permission::SocietyView => "society.view",
            Permission::SocietyCreate => "society.create",
            Permission::SocietyEdit => "society.edit",
            Permission::SocietyDelete => "society.delete",
            Permission::SocietyViewAll => "society.view_all",
            Permission::StaffView => "staff.view",
            Permission::StaffCreate => "staff.create",
            Permission::StaffEdit => "staff.edit",
            Permission::StaffDelete => "staff.delete",
        }
    }

    /// Human-readable label for admin screens. Presentation convenience, not
    /// part of the authorization contract.
    pub fn label(self) -> &'static str {
        match self {
            Permission::DashboardView => "View Dashboard",
            Permission::ResidentsView => "View Residents",
            Permission::ResidentsCreate => "Create Residents",
            Permission::ResidentsEdit => "Edit Residents",
            Permission::ResidentsDelete => "Delete Residents",
            Permission::RequestsView => "View Requests",
            Permission::RequestsApprove => "Approve Requests",
            Permission::RequestsReject => "Reject Requests",
            Permission::PermissionsView => "View Permissions",
            Permission::PermissionsEdit => "Edit Permissions",
            Permission::ActivityView => "View Activity",
            Permission::NotificationsView => "View Notifications",
            Permission::NotificationsCreate => "Create Notifications",
            Permission::ReportsView => "View Reports",
            Permission::ReportsDownload => "Download Reports",
            Permission::SocietyView => "View Societies",
            Permission::SocietyCreate => "Create Societies",
            Permission::SocietyEdit => "Edit Societies",
            Permission::SocietyDelete => "Delete Societies",
            Permission::SocietyViewAll => "View All Societies",
            Permission::StaffView => "View Staff",
            Permission::StaffCreate => "Create Staff",
            Permission::StaffEdit => "Edit Staff",
            Permission::StaffDelete => "Delete Staff",
        }
    }
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Permission {
    type Err = AuthzError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Permission::ALL
            .iter()
            .copied()
            .find(|permission| permission.as_str() == value)
            .ok_or_else(|| AuthzError::UnknownPermission(value.to_string()))
    }
}

/// Ordered set of permission tokens.
///
/// # Summary
/// The container role defaults and identity grants are expressed in. Ordering
/// keeps serialized snapshots stable across runs.
///
/// # Example
/// ```rust
/// use atrium_authz::{Permission, PermissionSet};
///
/// let set = PermissionSet::from_iter([Permission::ReportsView]);
/// assert!(set.is_subset(&PermissionSet::universe()));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionSet(BTreeSet<Permission>);

impl PermissionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// The full permission universe as a set.
    pub fn universe() -> Self {
        Permission::ALL.iter().copied().collect()
    }

    /// Parse a set from canonical token strings.
    ///
    /// # Errors
    /// - [`AuthzError::UnknownPermission`] on the first token outside the
    ///   universe.
    pub fn from_strings(tokens: &[String]) -> AuthzResult<Self> {
        let mut parsed = BTreeSet::new();
        for token in tokens {
            parsed.insert(token.parse()?);
        }
        Ok(Self(parsed))
    }

    pub fn insert(&mut self, permission: Permission) -> bool {
        self.0.insert(permission)
    }

    pub fn remove(&mut self, permission: Permission) -> bool {
        self.0.remove(&permission)
    }

    pub fn contains(&self, permission: Permission) -> bool {
        self.0.contains(&permission)
    }

    /// True when every token in `self` is also in `other`.
    pub fn is_subset(&self, other: &PermissionSet) -> bool {
        self.0.is_subset(&other.0)
    }

    /// True when at least one token is shared with `other`.
    pub fn intersects(&self, other: &PermissionSet) -> bool {
        self.0.intersection(&other.0).next().is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = Permission> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<Permission> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = Permission>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl From<&[Permission]> for PermissionSet {
    fn from(permissions: &[Permission]) -> Self {
        permissions.iter().copied().collect()
    }
}
