//! Authentication error types.
//!
//! This module defines all error types that can occur during credential
//! operations. Two unification rules are load-bearing:
//!
//! - `Unauthenticated` covers both "no such account" and "wrong password",
//!   so account existence is not leaked through differing errors.
//! - `InvalidCredential` covers missing, malformed, unsigned, and expired
//!   tokens alike; the distinction is only visible in logs.

/// Errors that can occur during authentication operations.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The presented username/email + password pair did not authenticate.
    ///
    /// Deliberately identical for unknown accounts and wrong passwords.
    #[error("Unauthenticated: {message}")]
    Unauthenticated {
        /// Description safe to show to the caller.
        message: String,
    },

    /// Registration collided with an existing username or email.
    ///
    /// The message names which field conflicted; that is intentional and
    /// helps the user pick another value.
    #[error("Conflict: {message}")]
    Conflict {
        /// Description of the conflicting field.
        message: String,
    },

    /// The bearer token is missing, malformed, unsigned, or expired.
    #[error("Invalid credential: {message}")]
    InvalidCredential {
        /// Description safe to show to the caller.
        message: String,
    },

    /// A durable write to the account store could not complete.
    #[error("Storage error: {message}")]
    Storage {
        /// Description of the storage error.
        message: String,
    },

    /// An unexpected internal error occurred.
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the internal error.
        message: String,
    },
}

impl AuthError {
    /// Creates a new `Unauthenticated` error.
    #[must_use]
    pub fn unauthenticated(message: impl Into<String>) -> Self {
        Self::Unauthenticated {
            message: message.into(),
        }
    }

    /// Creates a new `Conflict` error.
    #[must_use]
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    /// Creates a new `InvalidCredential` error.
    #[must_use]
    pub fn invalid_credential(message: impl Into<String>) -> Self {
        Self::InvalidCredential {
            message: message.into(),
        }
    }

    /// Creates a new `Storage` error.
    #[must_use]
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Creates a new `Internal` error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns the stable category string reported to callers.
    #[must_use]
    pub fn category(&self) -> &'static str {
        match self {
            Self::Unauthenticated { .. } => "unauthenticated",
            Self::Conflict { .. } => "conflict",
            Self::InvalidCredential { .. } => "invalid_credential",
            Self::Storage { .. } => "storage_error",
            Self::Internal { .. } => "internal_error",
        }
    }

    /// Returns `true` if this is a client error (4xx category).
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::Unauthenticated { .. } | Self::Conflict { .. } | Self::InvalidCredential { .. }
        )
    }
}
