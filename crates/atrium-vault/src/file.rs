// File-backed vault: one file per slot under a fixed directory.
use crate::{Result, SessionVault, validate_key};
use async_trait::async_trait;
use bytes::Bytes;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Durable slot storage on the local filesystem.
///
/// Writes go to a temporary file and are renamed into place, so a crash
/// mid-write leaves either the previous snapshot or the new one, never a
/// torn file.
#[derive(Debug)]
pub struct FileVault {
    dir: PathBuf,
}

impl FileVault {
    /// Open (creating if needed) a vault directory.
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir).await?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn slot_path(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }
}

#[async_trait]
impl SessionVault for FileVault {
    async fn get(&self, key: &str) -> Result<Option<Bytes>> {
        validate_key(key)?;
        match tokio::fs::read(self.slot_path(key)).await {
            Ok(contents) => Ok(Some(Bytes::from(contents))),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    async fn set(&self, key: &str, value: Bytes) -> Result<()> {
        validate_key(key)?;
        let path = self.slot_path(key);
        let staged = self.dir.join(format!("{key}.tmp"));
        tokio::fs::write(&staged, &value).await?;
        tokio::fs::rename(&staged, &path).await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        validate_key(key)?;
        match tokio::fs::remove_file(self.slot_path(key)).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}
