// Durable key-value slots for session snapshots.
use async_trait::async_trait;
use bytes::Bytes;
use std::fmt;

pub mod file;
pub mod memory;

pub use file::FileVault;
pub use memory::MemoryVault;

pub type Result<T> = std::result::Result<T, VaultError>;

#[derive(Debug)]
pub enum VaultError {
    InvalidKey(String),
    Io(std::io::Error),
}

impl fmt::Display for VaultError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VaultError::InvalidKey(key) => write!(f, "invalid slot key: {key}"),
            VaultError::Io(err) => write!(f, "io error: {err}"),
        }
    }
}

impl std::error::Error for VaultError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            VaultError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for VaultError {
    fn from(err: std::io::Error) -> Self {
        VaultError::Io(err)
    }
}

/// Named-slot durable storage used by the session holder.
///
/// One slot holds one value, overwritten wholesale on every write. A missing
/// slot is `None`, not an error, and removing an absent slot is a no-op.
#[async_trait]
pub trait SessionVault: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Bytes>>;
    async fn set(&self, key: &str, value: Bytes) -> Result<()>;
    async fn remove(&self, key: &str) -> Result<()>;
}

// Slot keys double as file names in the file backend, so constrain them to a
// safe character set for every backend.
pub(crate) fn validate_key(key: &str) -> Result<()> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'));
    if valid {
        Ok(())
    } else {
        Err(VaultError::InvalidKey(key.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_validation_accepts_slot_names() {
        assert!(validate_key("session.identity").is_ok());
        assert!(validate_key("admin_user-1").is_ok());
    }

    #[test]
    fn key_validation_rejects_path_like_keys() {
        for key in ["", "a/b", "../escape", "spaces here"] {
            let err = validate_key(key).expect_err("invalid key");
            assert!(matches!(err, VaultError::InvalidKey(_)));
        }
    }

    #[test]
    fn error_display_variants() {
        let io = VaultError::from(std::io::Error::other("disk gone"));
        assert!(io.to_string().contains("disk gone"));
        let key = VaultError::InvalidKey("a/b".to_string());
        assert!(key.to_string().contains("a/b"));
    }
}
