//! Account record type.
//!
//! An account is a stored user identity with a hashed credential. The
//! username doubles as the unique identifier and is immutable after
//! creation; email is unique across all records as well.

use serde::{Deserialize, Serialize};

/// A registered user account.
///
/// The `password_hash` field is persisted for authentication. When exposing
/// an account via API, return an [`AccountView`] instead so the hash never
/// leaves the service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    /// Unique identifier, immutable after creation.
    pub username: String,

    /// Email address, unique across all accounts.
    pub email: String,

    /// Display name.
    pub full_name: String,

    /// PHC-formatted password hash. Opaque, never reversible.
    #[serde(alias = "hashed_password")]
    pub password_hash: String,

    /// Disabled accounts cannot authenticate.
    #[serde(default)]
    pub disabled: bool,
}

impl Account {
    /// Creates a new enabled account from already-hashed credentials.
    ///
    /// An account is never constructed without a password hash; hashing
    /// happens in the authentication service before this is called.
    #[must_use]
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        full_name: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            full_name: full_name.into(),
            password_hash: password_hash.into(),
            disabled: false,
        }
    }

    /// Returns `true` if the account may authenticate.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.disabled
    }
}

/// Public projection of an [`Account`], without the password hash.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AccountView {
    /// Unique identifier.
    pub username: String,
    /// Email address.
    pub email: String,
    /// Display name.
    pub full_name: String,
    /// Whether the account is disabled.
    pub disabled: bool,
}

impl From<&Account> for AccountView {
    fn from(account: &Account) -> Self {
        Self {
            username: account.username.clone(),
            email: account.email.clone(),
            full_name: account.full_name.clone(),
            disabled: account.disabled,
        }
    }
}
