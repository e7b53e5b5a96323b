//! The session holder: at most one logged-in identity per store.
//!
//! # Purpose
//! Owns the current [`Identity`] and mediates every read and write of it.
//! Each mutation persists the resulting snapshot (or its absence) through the
//! vault, and construction rehydrates from the same slot, so a restart lands
//! back in the last persisted state.
//!
//! # Durability and consistency
//! - The snapshot is serde JSON of the whole identity, overwritten wholesale
//!   under one fixed slot key.
//! - A snapshot that fails to parse at start-up is discarded and the store
//!   starts logged out; rehydration never fails open into a privileged
//!   default.
//! - The identity lives behind `tokio::sync::RwLock`, so the store is safe to
//!   share across threads even though the original design only ever ran it on
//!   a single-threaded event loop.
//!
//! # Error handling
//! - A failed login is a returned error (`InvalidCredentials`) and leaves all
//!   state untouched; it is never a panic.
//! - Guard denial and logged-out reads are normal outcomes, not errors.
use crate::principals::PrincipalDirectory;
use atrium_authz::{Identity, PermissionSet};
use atrium_common::ids::AdminId;
use atrium_vault::{SessionVault, VaultError};
use bytes::Bytes;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;

/// The single vault slot the session snapshot lives under.
pub const SESSION_SLOT_KEY: &str = "session.identity";

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("duplicate principal email: {0}")]
    DuplicatePrincipal(String),
    #[error("vault: {0}")]
    Vault(#[from] VaultError),
    #[error("session snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),
    #[error("principal table: {0}")]
    PrincipalTable(#[from] serde_yaml::Error),
}

pub type SessionResult<T> = Result<T, SessionError>;

/// Explicit session store, constructed once at application start.
///
/// There is deliberately no global instance; hosts own exactly one
/// `SessionStore` and hand references to whatever handles their events.
pub struct SessionStore {
    directory: PrincipalDirectory,
    vault: Arc<dyn SessionVault>,
    slot_key: String,
    current: RwLock<Option<Identity>>,
}

impl SessionStore {
    /// Construct the store and attempt rehydration from the vault slot.
    ///
    /// # Errors
    /// - [`SessionError::Vault`] when the slot cannot be read at all. A slot
    ///   that reads fine but does not parse is discarded instead.
    pub async fn open(
        directory: PrincipalDirectory,
        vault: Arc<dyn SessionVault>,
        slot_key: impl Into<String>,
    ) -> SessionResult<Self> {
        let slot_key = slot_key.into();
        let current = match vault.get(&slot_key).await? {
            Some(snapshot) => match serde_json::from_slice::<Identity>(&snapshot) {
                Ok(identity) => {
                    tracing::info!(email = %identity.email, "restored session from snapshot");
                    Some(identity)
                }
                Err(err) => {
                    // Fail open to "logged out", never to a privileged default.
                    tracing::warn!(error = %err, "discarding malformed session snapshot");
                    vault.remove(&slot_key).await?;
                    None
                }
            },
            None => None,
        };
        metrics::gauge!("atrium_session_active").set(if current.is_some() { 1.0 } else { 0.0 });

        Ok(Self {
            directory,
            vault,
            slot_key,
            current: RwLock::new(current),
        })
    }

    /// Authenticate against the principal table and make the match current.
    ///
    /// The stored identity is used as-is; permissions are not recomputed from
    /// the role default, so per-principal overrides survive login.
    ///
    /// # Errors
    /// - [`SessionError::InvalidCredentials`] on unknown email or wrong
    ///   credential; the current identity and the vault slot are untouched.
    pub async fn login(&self, email: &str, credential: &str) -> SessionResult<Identity> {
        let principal = self
            .directory
            .lookup(email)
            .filter(|principal| principal.credential == credential);
        let Some(principal) = principal else {
            tracing::warn!(email, "rejected login attempt");
            metrics::counter!("atrium_logins_total", "outcome" => "rejected").increment(1);
            return Err(SessionError::InvalidCredentials);
        };

        let identity = principal.identity.clone();
        *self.current.write().await = Some(identity.clone());
        self.persist(Some(&identity)).await?;

        tracing::info!(email = %identity.email, role = %identity.role, "login");
        metrics::counter!("atrium_logins_total", "outcome" => "success").increment(1);
        metrics::gauge!("atrium_session_active").set(1.0);
        Ok(identity)
    }

    /// Clear the current identity. Idempotent; logging out a logged-out store
    /// is a no-op, not an error.
    pub async fn logout(&self) -> SessionResult<()> {
        let previous = self.current.write().await.take();
        self.persist(None).await?;
        if let Some(identity) = previous {
            tracing::info!(email = %identity.email, "logout");
            metrics::counter!("atrium_logouts_total").increment(1);
        }
        metrics::gauge!("atrium_session_active").set(0.0);
        Ok(())
    }

    pub async fn current_identity(&self) -> Option<Identity> {
        self.current.read().await.clone()
    }

    /// Replace the current identity's permission set.
    ///
    /// Only applies when `id` names the current identity; any other id is a
    /// silent no-op. Role is never altered here.
    pub async fn update_permissions(
        &self,
        id: AdminId,
        permissions: PermissionSet,
    ) -> SessionResult<()> {
        let updated = {
            let mut guard = self.current.write().await;
            match guard.as_mut() {
                Some(identity) if identity.id == id => {
                    identity.permissions = permissions;
                    Some(identity.clone())
                }
                _ => None,
            }
        };

        let Some(identity) = updated else {
            tracing::debug!(%id, "ignoring permission update for non-current identity");
            return Ok(());
        };

        self.persist(Some(&identity)).await?;
        tracing::info!(email = %identity.email, grants = identity.permissions.len(), "permissions updated");
        metrics::counter!("atrium_permission_updates_total").increment(1);
        Ok(())
    }

    pub fn directory(&self) -> &PrincipalDirectory {
        &self.directory
    }

    pub fn slot_key(&self) -> &str {
        &self.slot_key
    }

    // Writes the snapshot for `Some`, clears the slot for `None`.
    async fn persist(&self, identity: Option<&Identity>) -> SessionResult<()> {
        match identity {
            Some(identity) => {
                let snapshot = serde_json::to_vec(identity)?;
                self.vault.set(&self.slot_key, Bytes::from(snapshot)).await?;
            }
            None => self.vault.remove(&self.slot_key).await?,
        }
        Ok(())
    }
}
