use crate::principals::PrincipalDirectory;
use crate::store::{SESSION_SLOT_KEY, SessionStore};
use anyhow::{Context, Result};
use atrium_vault::{FileVault, MemoryVault, SessionVault};
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

// Session wiring configuration sourced from environment variables.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub vault: VaultBackend,
    pub vault_dir: Option<PathBuf>,
    pub slot_key: String,
    pub principals_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VaultBackend {
    Memory,
    File,
}

#[derive(Debug, Deserialize)]
struct SessionConfigOverride {
    vault: Option<String>,
    vault_dir: Option<String>,
    slot_key: Option<String>,
    principals_path: Option<String>,
}

impl SessionConfig {
    pub fn from_env() -> Result<Self> {
        let vault = std::env::var("ATRIUM_VAULT")
            .map(|value| parse_backend(&value))
            .unwrap_or(Ok(VaultBackend::Memory))?;
        let vault_dir = std::env::var("ATRIUM_VAULT_DIR").ok().map(PathBuf::from);
        let slot_key =
            std::env::var("ATRIUM_SESSION_SLOT").unwrap_or_else(|_| SESSION_SLOT_KEY.to_string());
        let principals_path = std::env::var("ATRIUM_PRINCIPALS").ok().map(PathBuf::from);
        Ok(Self {
            vault,
            vault_dir,
            slot_key,
            principals_path,
        })
    }

    pub fn from_env_or_yaml() -> Result<Self> {
        let mut config = Self::from_env()?;
        if let Ok(path) = std::env::var("ATRIUM_SESSION_CONFIG") {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("read ATRIUM_SESSION_CONFIG: {path}"))?;
            let override_cfg: SessionConfigOverride =
                serde_yaml::from_str(&contents).with_context(|| "parse session config yaml")?;
            if let Some(value) = override_cfg.vault {
                config.vault = parse_backend(&value)?;
            }
            if let Some(value) = override_cfg.vault_dir {
                config.vault_dir = Some(PathBuf::from(value));
            }
            if let Some(value) = override_cfg.slot_key {
                config.slot_key = value;
            }
            if let Some(value) = override_cfg.principals_path {
                config.principals_path = Some(PathBuf::from(value));
            }
        }
        Ok(config)
    }
}

fn parse_backend(value: &str) -> Result<VaultBackend> {
    match value {
        "memory" => Ok(VaultBackend::Memory),
        "file" => Ok(VaultBackend::File),
        other => anyhow::bail!("unknown vault backend: {other}"),
    }
}

/// Wire a ready [`SessionStore`] from configuration.
///
/// The principal table comes from `principals_path` when set and the seeded
/// demo table otherwise; the vault backend is constructed to match the
/// config, with the file backend requiring a directory.
pub async fn build_store(config: &SessionConfig) -> Result<SessionStore> {
    let directory = match &config.principals_path {
        Some(path) => {
            let doc = fs::read_to_string(path)
                .with_context(|| format!("read principal table: {}", path.display()))?;
            PrincipalDirectory::from_yaml_str(&doc)
                .with_context(|| "parse principal table yaml")?
        }
        None => PrincipalDirectory::seeded(),
    };

    let vault: Arc<dyn SessionVault> = match config.vault {
        VaultBackend::Memory => Arc::new(MemoryVault::new()),
        VaultBackend::File => {
            let dir = config
                .vault_dir
                .as_ref()
                .context("vault directory missing for file backend")?;
            Arc::new(FileVault::open(dir).await?)
        }
    };

    let store = SessionStore::open(directory, vault, &config.slot_key).await?;
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    struct EnvGuard {
        key: &'static str,
        prev: Option<String>,
    }

    impl EnvGuard {
        fn set(key: &'static str, value: &str) -> Self {
            let prev = std::env::var(key).ok();
            unsafe {
                std::env::set_var(key, value);
            }
            Self { key, prev }
        }

        fn unset(key: &'static str) -> Self {
            let prev = std::env::var(key).ok();
            unsafe {
                std::env::remove_var(key);
            }
            Self { key, prev }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            match &self.prev {
                Some(value) => unsafe {
                    std::env::set_var(self.key, value);
                },
                None => unsafe {
                    std::env::remove_var(self.key);
                },
            }
        }
    }

    #[test]
    #[serial]
    fn from_env_defaults() {
        let _g1 = EnvGuard::unset("ATRIUM_VAULT");
        let _g2 = EnvGuard::unset("ATRIUM_VAULT_DIR");
        let _g3 = EnvGuard::unset("ATRIUM_SESSION_SLOT");
        let _g4 = EnvGuard::unset("ATRIUM_PRINCIPALS");

        let config = SessionConfig::from_env().expect("config");
        assert_eq!(config.vault, VaultBackend::Memory);
        assert!(config.vault_dir.is_none());
        assert_eq!(config.slot_key, SESSION_SLOT_KEY);
        assert!(config.principals_path.is_none());
    }

    #[test]
    #[serial]
    fn from_env_reads_file_backend() {
        let _g1 = EnvGuard::set("ATRIUM_VAULT", "file");
        let _g2 = EnvGuard::set("ATRIUM_VAULT_DIR", "/var/lib/atrium");
        let _g3 = EnvGuard::set("ATRIUM_SESSION_SLOT", "admin_user");
        let _g4 = EnvGuard::unset("ATRIUM_PRINCIPALS");

        let config = SessionConfig::from_env().expect("config");
        assert_eq!(config.vault, VaultBackend::File);
        assert_eq!(config.vault_dir, Some(PathBuf::from("/var/lib/atrium")));
        assert_eq!(config.slot_key, "admin_user");
    }

    #[test]
    #[serial]
    fn from_env_rejects_unknown_backend() {
        let _g1 = EnvGuard::set("ATRIUM_VAULT", "postgres");
        let err = SessionConfig::from_env().expect_err("unknown backend");
        assert!(err.to_string().contains("postgres"));
    }

    #[test]
    #[serial]
    fn yaml_override_wins_over_env() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("session.yaml");
        fs::write(&path, "vault: file\nvault_dir: /data/vault\nslot_key: staging\n")
            .expect("write yaml");

        let _g1 = EnvGuard::unset("ATRIUM_VAULT");
        let _g2 = EnvGuard::unset("ATRIUM_VAULT_DIR");
        let _g3 = EnvGuard::unset("ATRIUM_SESSION_SLOT");
        let _g4 = EnvGuard::unset("ATRIUM_PRINCIPALS");
        let _g5 = EnvGuard::set("ATRIUM_SESSION_CONFIG", path.to_str().expect("utf8 path"));

        let config = SessionConfig::from_env_or_yaml().expect("config");
        assert_eq!(config.vault, VaultBackend::File);
        assert_eq!(config.vault_dir, Some(PathBuf::from("/data/vault")));
        assert_eq!(config.slot_key, "staging");
    }

    #[tokio::test]
    #[serial]
    async fn build_store_memory_backend() {
        let config = SessionConfig {
            vault: VaultBackend::Memory,
            vault_dir: None,
            slot_key: SESSION_SLOT_KEY.to_string(),
            principals_path: None,
        };
        let store = build_store(&config).await.expect("store");
        assert!(store.current_identity().await.is_none());
        assert_eq!(store.directory().len(), 2);
    }

    #[tokio::test]
    #[serial]
    async fn build_store_file_backend_requires_directory() {
        let config = SessionConfig {
            vault: VaultBackend::File,
            vault_dir: None,
            slot_key: SESSION_SLOT_KEY.to_string(),
            principals_path: None,
        };
        let err = build_store(&config).await.err().expect("missing dir");
        assert!(err.to_string().contains("vault directory missing"));
    }

    #[tokio::test]
    #[serial]
    async fn build_store_file_backend_round_trips() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = SessionConfig {
            vault: VaultBackend::File,
            vault_dir: Some(dir.path().to_path_buf()),
            slot_key: SESSION_SLOT_KEY.to_string(),
            principals_path: None,
        };

        {
            let store = build_store(&config).await.expect("store");
            store
                .login("super@admin.com", "admin123")
                .await
                .expect("login");
        }

        let reopened = build_store(&config).await.expect("reopened store");
        let restored = reopened.current_identity().await.expect("restored");
        assert_eq!(restored.email, "super@admin.com");
    }

    #[tokio::test]
    #[serial]
    async fn build_store_loads_principals_from_yaml() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("principals.yaml");
        fs::write(
            &path,
            r#"
- credential: s3cret
  identity:
    id: 7b9c5d7e-9a40-4f8f-a1f5-2b1f1c3a9d21
    name: Ops
    email: ops@admin.com
    role: admin
    permissions: ["dashboard.view"]
"#,
        )
        .expect("write principals");

        let config = SessionConfig {
            vault: VaultBackend::Memory,
            vault_dir: None,
            slot_key: SESSION_SLOT_KEY.to_string(),
            principals_path: Some(path),
        };
        let store = build_store(&config).await.expect("store");
        let identity = store.login("ops@admin.com", "s3cret").await.expect("login");
        assert_eq!(identity.name, "Ops");
    }
}
