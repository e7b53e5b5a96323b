// Non-durable vault for tests and hosts that opt out of persistence.
use crate::{Result, SessionVault, validate_key};
use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// In-memory slot storage.
///
/// State is lost on process exit; a session holder backed by this vault
/// simply starts logged out on the next run.
#[derive(Debug, Default)]
pub struct MemoryVault {
    // RwLock allows concurrent readers while writes take exclusive access.
    inner: RwLock<HashMap<String, Bytes>>,
}

impl MemoryVault {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}

#[async_trait]
impl SessionVault for MemoryVault {
    async fn get(&self, key: &str) -> Result<Option<Bytes>> {
        validate_key(key)?;
        Ok(self.inner.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Bytes) -> Result<()> {
        validate_key(key)?;
        self.inner.write().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        validate_key(key)?;
        self.inner.write().await.remove(key);
        Ok(())
    }
}
