//! Core credential lifecycle logic.
//!
//! The service orchestrates the account store, password hashing, and the
//! token codec. Registration's load-check-save sequence is serialized
//! through a single-writer lock because the store itself offers no
//! transactional guarantee; without the lock, two concurrent registrations
//! of the same username could both observe absence and the later write
//! would silently win.

use std::sync::Arc;

use time::Duration;
use tokio::sync::Mutex;

use crate::AuthResult;
use crate::account::Account;
use crate::error::AuthError;
use crate::password::{hash_password, verify_password};
use crate::store::AccountStore;
use crate::token::TokenCodec;

/// A registration request.
#[derive(Debug, Clone)]
pub struct NewAccount {
    /// Desired unique username.
    pub username: String,
    /// Plaintext password; hashed before anything is persisted.
    pub password: String,
    /// Email address, must be unique across accounts.
    pub email: String,
    /// Display name.
    pub full_name: String,
}

/// Authentication service over an [`AccountStore`] and a [`TokenCodec`].
pub struct AuthService {
    store: Arc<dyn AccountStore>,
    codec: Arc<TokenCodec>,
    // Serializes registration's load-check-save against concurrent writers.
    register_lock: Mutex<()>,
}

impl AuthService {
    /// Creates a new service.
    pub fn new(store: Arc<dyn AccountStore>, codec: Arc<TokenCodec>) -> Self {
        Self {
            store,
            codec,
            register_lock: Mutex::new(()),
        }
    }

    /// Authenticates a username-or-email + password pair.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Unauthenticated` if no matching record exists OR
    /// password verification fails. The two cases are identical to the
    /// caller so account existence is not oracle-leaked.
    pub async fn authenticate(&self, identifier: &str, password: &str) -> AuthResult<Account> {
        let Some(account) = self.store.find_by_username_or_email(identifier).await? else {
            tracing::debug!(identifier, "authentication failed: account not found");
            return Err(Self::bad_credentials());
        };

        if !account.is_active() {
            tracing::debug!(username = %account.username, "authentication failed: account disabled");
            return Err(Self::bad_credentials());
        }

        let matches = verify_password(password, &account.password_hash).map_err(|e| {
            // A malformed stored hash is an internal defect, but surfacing
            // it would distinguish this account from an unknown one.
            tracing::warn!(username = %account.username, error = %e, "stored password hash is invalid");
            Self::bad_credentials()
        })?;

        if !matches {
            tracing::debug!(username = %account.username, "authentication failed: password mismatch");
            return Err(Self::bad_credentials());
        }

        tracing::info!(username = %account.username, "authenticated");
        Ok(account)
    }

    /// Registers a new account and persists it.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Conflict` when the username or email is already
    /// registered (the message names which), `AuthError::Storage` when the
    /// snapshot write fails.
    pub async fn register(&self, request: NewAccount) -> AuthResult<Account> {
        let _guard = self.register_lock.lock().await;

        let mut accounts = self.store.load().await;

        if accounts.contains_key(&request.username) {
            return Err(AuthError::conflict("Username already registered"));
        }
        if accounts.values().any(|a| a.email == request.email) {
            return Err(AuthError::conflict("Email already registered"));
        }

        let password_hash = hash_password(&request.password)
            .map_err(|e| AuthError::internal(format!("password hashing failed: {e}")))?;

        let account = Account::new(
            request.username,
            request.email,
            request.full_name,
            password_hash,
        );

        accounts.insert(account.username.clone(), account.clone());
        self.store.save(&accounts).await?;

        tracing::info!(username = %account.username, "account registered");
        Ok(account)
    }

    /// Issues a bearer token for an account.
    ///
    /// Uses the codec's default lifetime unless `ttl` is given.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Internal` if token encoding fails.
    pub fn issue_token(&self, account: &Account, ttl: Option<Duration>) -> AuthResult<String> {
        self.codec.issue(&account.username, ttl)
    }

    /// Resolves a bearer token to the account it identifies.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredential` for a bad token, and the same
    /// error when the subject no longer resolves to an active account.
    pub async fn resolve_identity(&self, token: &str) -> AuthResult<Account> {
        let subject = self.codec.verify(token)?;

        let Some(account) = self.store.find_by_username_or_email(&subject).await? else {
            tracing::debug!(subject, "token subject no longer exists");
            return Err(AuthError::invalid_credential("Could not validate credentials"));
        };

        if !account.is_active() {
            tracing::debug!(username = %account.username, "token subject is disabled");
            return Err(AuthError::invalid_credential("Could not validate credentials"));
        }

        Ok(account)
    }

    fn bad_credentials() -> AuthError {
        AuthError::unauthenticated("Incorrect username or password")
    }
}
