//! In-memory account state with optional JSON file persistence.
//!
//! The store is the single source of truth for credentials and cached tokens.
//! Token writes take the write lock for the duration of the mutation only;
//! persistence snapshots the map under a read lock afterwards. Snapshot and
//! file write are serialized so an older snapshot never lands on disk last.

use crate::errors::UpstreamError;
use crate::models::{Account, AccountsFile};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::sync::{Mutex, RwLock};

pub struct AccountStore {
    accounts: RwLock<BTreeMap<String, Account>>,
    path: Option<PathBuf>,
    persist_lock: Mutex<()>,
}

impl AccountStore {
    /// Builds a store with no backing file. `persist` becomes a no-op.
    pub fn in_memory(accounts: BTreeMap<String, Account>) -> Self {
        Self {
            accounts: RwLock::new(accounts),
            path: None,
            persist_lock: Mutex::new(()),
        }
    }

    /// Builds a store that writes itself to `path` on every `persist`.
    pub fn with_file(accounts: BTreeMap<String, Account>, path: impl Into<PathBuf>) -> Self {
        Self {
            accounts: RwLock::new(accounts),
            path: Some(path.into()),
            persist_lock: Mutex::new(()),
        }
    }

    /// Loads the accounts file at `path`.
    pub async fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path.display(), e))?;
        let file: AccountsFile = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", path.display(), e))?;

        tracing::info!(
            "[config] Loaded {} ({} accounts)",
            path.display(),
            file.accounts.len()
        );
        Ok(Self::with_file(file.accounts, path))
    }

    pub async fn get(&self, name: &str) -> Option<Account> {
        self.accounts.read().await.get(name).cloned()
    }

    /// Account names in sorted order.
    pub async fn names(&self) -> Vec<String> {
        self.accounts.read().await.keys().cloned().collect()
    }

    pub async fn snapshot(&self) -> BTreeMap<String, Account> {
        self.accounts.read().await.clone()
    }

    /// Replaces the token of `name`.
    pub async fn set_token(&self, name: &str, token: String) -> Result<(), UpstreamError> {
        let mut accounts = self.accounts.write().await;
        let account = accounts
            .get_mut(name)
            .ok_or_else(|| UpstreamError::UnknownAccount(name.to_string()))?;
        account.token = token;
        Ok(())
    }

    /// Writes the current state to the backing file, if any.
    ///
    /// Failures are logged and swallowed.
    pub async fn persist(&self) {
        let Some(path) = &self.path else {
            return;
        };

        let _guard = self.persist_lock.lock().await;
        let file = AccountsFile {
            accounts: self.snapshot().await,
        };
        let data = match serde_json::to_string_pretty(&file) {
            Ok(data) => data,
            Err(e) => {
                tracing::error!("[config] JSON encode failed: {}", e);
                return;
            }
        };

        match tokio::fs::write(path, data).await {
            Ok(()) => tracing::info!("[config] Saved {}", path.display()),
            Err(e) => tracing::error!(
                "[config] Write file failed: {}, path: {}",
                e,
                path.display()
            ),
        }
    }
}
