//! Atrium authorization primitives shared by the session store and admin
//! surfaces.
//!
//! # Purpose
//! Centralizes the permission registry (token universe + role defaults), the
//! identity model, and the access guard used to gate protected regions.
//!
//! # How it fits
//! The session store authenticates principals and keeps the current
//! [`Identity`]; hosts wrap protected content in an [`AccessGuard`] and feed
//! it the current identity. This crate owns the only copy of the permission
//! list and role defaults.
//!
//! # Key invariants
//! - The permission universe is closed and fixed at build time.
//! - `super_admin` defaults to the full universe; `admin` to a proper subset.
//! - Guard denial never runs the protected closure.
//!
//! # Examples
//! ```rust
//! use atrium_authz::{AccessGuard, Permission, default_permissions_for, Role};
//!
//! let defaults = default_permissions_for(Role::Admin);
//! assert!(defaults.contains(Permission::DashboardView));
//!
//! let guard = AccessGuard::permission(Permission::DashboardView);
//! assert!(!guard.allows(None));
//! ```
//!
//! # Common pitfalls
//! - Recomputing an identity's permissions from its role; stored grants may
//!   deliberately diverge from the role default.
//! - Treating guard denial as an error; it is a normal outcome.

mod errors;
mod guard;
mod identity;
mod permission;
mod registry;

pub use errors::{AuthzError, AuthzResult};
pub use guard::{ACCESS_DENIED_MESSAGE, AccessGuard, AccessRequirement};
pub use identity::{Identity, SocietyBinding};
pub use permission::{Permission, PermissionSet};
pub use registry::{Role, default_permissions_for};
