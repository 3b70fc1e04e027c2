//! # dermalens-auth
//!
//! Credential lifecycle for the Dermalens service.
//!
//! This crate provides:
//! - Flat-file account store (whole-snapshot load/save behind a trait)
//! - Argon2id password hashing and verification
//! - HS256 bearer token issuance and validation
//! - The authentication service orchestrating the three
//! - An Axum extractor for bearer-protected routes
//!
//! ## Modules
//!
//! - [`account`] - Account record and its public projection
//! - [`store`] - Persistence trait and the JSON flat-file implementation
//! - [`password`] - One-way password hashing
//! - [`token`] - Bearer token codec
//! - [`service`] - Registration, authentication, identity resolution
//! - [`middleware`] - HTTP extractor and error responses

pub mod account;
pub mod error;
pub mod middleware;
pub mod password;
pub mod service;
pub mod store;
pub mod token;

pub use account::{Account, AccountView};
pub use error::AuthError;
pub use middleware::{AuthState, BearerAuth};
pub use service::{AuthService, NewAccount};
pub use store::{AccountStore, JsonFileAccountStore};
pub use token::{DEFAULT_TOKEN_TTL, TokenClaims, TokenCodec};

/// Type alias for authentication results.
pub type AuthResult<T> = Result<T, AuthError>;
