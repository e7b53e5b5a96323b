//! Access guard: the render-or-fallback decision for protected regions.
//!
//! # Purpose
//! Evaluates a permission requirement against the current identity and
//! short-circuits protected content on deny. Deny is normal control flow,
//! never an error; an absent identity is simply denied.
//!
//! # Key invariants
//! - The protected closure runs only on allow; none of its side effects occur
//!   on deny.
//! - An empty requirement degrades to a pass-through (allow).
use crate::{Identity, Permission};

/// Standard message shown when no caller-supplied fallback exists.
pub const ACCESS_DENIED_MESSAGE: &str = "You don't have permission to access this section. \
     Please contact your administrator if you believe this is an error.";

/// Permission requirement for a protected region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessRequirement {
    /// No requirement; the guard is a pass-through.
    Unrestricted,
    /// A single permission that must be granted.
    Permission(Permission),
    /// At least one of the listed permissions must be granted.
    AnyOf(Vec<Permission>),
    /// Every listed permission must be granted.
    AllOf(Vec<Permission>),
}

impl AccessRequirement {
    /// Decide allow/deny for the given identity.
    ///
    /// Empty `AnyOf`/`AllOf` lists behave like [`AccessRequirement::Unrestricted`];
    /// any non-empty requirement denies when no identity is present.
    pub fn satisfied_by(&self, identity: Option<&Identity>) -> bool {
        match self {
            AccessRequirement::Unrestricted => true,
            AccessRequirement::AnyOf(permissions) | AccessRequirement::AllOf(permissions)
                if permissions.is_empty() =>
            {
                true
            }
            AccessRequirement::Permission(permission) => {
                identity.is_some_and(|identity| identity.has_permission(*permission))
            }
            AccessRequirement::AnyOf(permissions) => {
                identity.is_some_and(|identity| identity.has_any_permission(permissions))
            }
            AccessRequirement::AllOf(permissions) => {
                identity.is_some_and(|identity| identity.has_all_permissions(permissions))
            }
        }
    }
}

/// Guard wrapping a single [`AccessRequirement`].
///
/// # Example
/// ```rust
/// use atrium_authz::{AccessGuard, Permission};
///
/// let guard = AccessGuard::permission(Permission::DashboardView);
/// assert!(!guard.allows(None));
/// ```
#[derive(Debug, Clone)]
pub struct AccessGuard {
    requirement: AccessRequirement,
}

impl AccessGuard {
    pub fn new(requirement: AccessRequirement) -> Self {
        Self { requirement }
    }

    pub fn unrestricted() -> Self {
        Self::new(AccessRequirement::Unrestricted)
    }

    pub fn permission(permission: Permission) -> Self {
        Self::new(AccessRequirement::Permission(permission))
    }

    pub fn any_of(permissions: impl Into<Vec<Permission>>) -> Self {
        Self::new(AccessRequirement::AnyOf(permissions.into()))
    }

    pub fn all_of(permissions: impl Into<Vec<Permission>>) -> Self {
        Self::new(AccessRequirement::AllOf(permissions.into()))
    }

    pub fn requirement(&self) -> &AccessRequirement {
        &self.requirement
    }

    pub fn allows(&self, identity: Option<&Identity>) -> bool {
        self.requirement.satisfied_by(identity)
    }

    /// Render the protected region or its fallback.
    ///
    /// Exactly one of the two closures runs. The protected closure is never
    /// invoked on deny, so data fetches or mutations behind the guard cannot
    /// fire for unauthorized identities.
    pub fn render<T>(
        &self,
        identity: Option<&Identity>,
        protected: impl FnOnce() -> T,
        fallback: impl FnOnce() -> T,
    ) -> T {
        if self.allows(identity) {
            protected()
        } else {
            fallback()
        }
    }
}
