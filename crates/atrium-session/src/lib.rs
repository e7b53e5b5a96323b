//! Session management for the Atrium admin core.
//!
//! # Purpose
//! Owns the logged-in identity lifecycle: authenticating against the static
//! principal table, persisting the session snapshot through a vault,
//! rehydrating at start-up, and administering the roster of admin accounts.
//!
//! # How it fits
//! Hosts construct one [`SessionStore`] at start (usually via
//! [`build_store`] and [`SessionConfig`]), feed its current identity into
//! `atrium-authz` guards, and call back into the store on login/logout and
//! permission edits.
//!
//! # Key invariants
//! - At most one identity is current per store; login replaces it wholesale.
//! - Every mutation persists the snapshot (or its absence) before returning.
//! - A malformed snapshot at start-up degrades to "logged out", never to a
//!   privileged default.
//!
//! # Examples
//! ```rust
//! use atrium_session::{PrincipalDirectory, SESSION_SLOT_KEY, SessionStore};
//! use atrium_vault::MemoryVault;
//! use std::sync::Arc;
//!
//! # async fn demo() -> Result<(), atrium_session::SessionError> {
//! let store = SessionStore::open(
//!     PrincipalDirectory::seeded(),
//!     Arc::new(MemoryVault::new()),
//!     SESSION_SLOT_KEY,
//! )
//! .await?;
//! let identity = store.login("super@admin.com", "admin123").await?;
//! assert_eq!(store.current_identity().await, Some(identity));
//! # Ok(())
//! # }
//! ```
//!
//! # Common pitfalls
//! - Holding a cloned identity across mutations; re-read `current_identity`
//!   after `update_permissions`.
//! - Treating a failed login as fatal; it is a returned error and the store
//!   is untouched.

mod config;
mod principals;
mod roster;
mod store;
mod telemetry;

pub use config::{SessionConfig, VaultBackend, build_store};
pub use principals::{Principal, PrincipalDirectory};
pub use roster::{AdminRoster, NewAdmin, RosterError, RosterResult};
pub use store::{SESSION_SLOT_KEY, SessionError, SessionResult, SessionStore};
pub use telemetry::init_telemetry;
