//! Account persistence.
//!
//! The store is a whole-file snapshot: the complete username → account
//! mapping is read into memory for each operation and rewritten wholesale on
//! mutation. There is no append log and no schema versioning; the only
//! guarantee is "read whatever was last fully written". The trait exists so
//! a future swap to an embedded or networked store leaves the
//! authentication service contract untouched.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::AuthResult;
use crate::account::Account;
use crate::error::AuthError;

/// Storage operations for accounts.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Loads the full account snapshot.
    ///
    /// Fails soft: a read or deserialize error yields an empty mapping
    /// rather than propagating, since an empty store is a safe degraded
    /// state. The failure is warn-logged.
    async fn load(&self) -> HashMap<String, Account>;

    /// Rewrites the full account snapshot.
    ///
    /// Fails hard: silent data loss on write is unacceptable.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Storage` if the write cannot complete.
    async fn save(&self, accounts: &HashMap<String, Account>) -> AuthResult<()>;

    /// Finds an account by username or, failing that, by email.
    ///
    /// The dual lookup exists because the login surface accepts either
    /// form. Username lookup is a direct map hit; email falls back to a
    /// linear scan.
    async fn find_by_username_or_email(&self, key: &str) -> AuthResult<Option<Account>>;
}

/// Flat-file JSON store, one snapshot per file.
pub struct JsonFileAccountStore {
    path: PathBuf,
}

impl JsonFileAccountStore {
    /// Creates a store backed by the given file path.
    ///
    /// The file is created lazily (an empty snapshot is persisted) on the
    /// first load if it does not exist.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the backing file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl AccountStore for JsonFileAccountStore {
    async fn load(&self) -> HashMap<String, Account> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                // First run: persist an empty snapshot.
                if let Err(e) = self.save(&HashMap::new()).await {
                    tracing::warn!(path = %self.path.display(), error = %e, "could not create account store");
                }
                return HashMap::new();
            }
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "failed to read account store");
                return HashMap::new();
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(accounts) => accounts,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "failed to parse account store");
                HashMap::new()
            }
        }
    }

    async fn save(&self, accounts: &HashMap<String, Account>) -> AuthResult<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| AuthError::storage(format!("failed to create store directory: {e}")))?;
        }

        let json = serde_json::to_vec_pretty(accounts)
            .map_err(|e| AuthError::storage(format!("failed to serialize accounts: {e}")))?;

        tokio::fs::write(&self.path, json)
            .await
            .map_err(|e| AuthError::storage(format!("failed to write account store: {e}")))
    }

    async fn find_by_username_or_email(&self, key: &str) -> AuthResult<Option<Account>> {
        let accounts = self.load().await;

        if let Some(account) = accounts.get(key) {
            return Ok(Some(account.clone()));
        }

        Ok(accounts.into_values().find(|a| a.email == key))
    }
}
