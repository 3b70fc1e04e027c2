//! Bearer token authentication extractor and error responses.
//!
//! Provides the Axum extractor that validates `Authorization: Bearer`
//! headers and resolves the token to an account, plus the `IntoResponse`
//! mapping that turns [`AuthError`] values into JSON error bodies.
//!
//! # Example
//!
//! ```ignore
//! use axum::{Router, routing::get};
//! use dermalens_auth::middleware::{AuthState, BearerAuth};
//!
//! async fn protected_handler(BearerAuth(account): BearerAuth) -> String {
//!     format!("Hello, {}!", account.username)
//! }
//!
//! let app = Router::new()
//!     .route("/protected", get(protected_handler))
//!     .with_state(auth_state);
//! ```

use std::sync::Arc;

use axum::{
    Json,
    extract::{FromRef, FromRequestParts},
    http::{HeaderMap, HeaderValue, StatusCode, header, request::Parts},
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::account::Account;
use crate::error::AuthError;
use crate::service::AuthService;

/// State required for bearer token authentication.
///
/// Include this in your application state and expose it to the extractor
/// via `FromRef`.
#[derive(Clone)]
pub struct AuthState {
    /// The authentication service used to resolve tokens.
    pub service: Arc<AuthService>,
}

impl AuthState {
    /// Creates a new auth state.
    pub fn new(service: Arc<AuthService>) -> Self {
        Self { service }
    }
}

/// Axum extractor that validates a Bearer token and loads the account.
///
/// # Errors
///
/// Rejects with `AuthError::InvalidCredential` when the Authorization
/// header is missing or malformed, or the token fails verification.
pub struct BearerAuth(pub Account);

impl<S> FromRequestParts<S> for BearerAuth
where
    S: Send + Sync,
    AuthState: FromRef<S>,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth_state = AuthState::from_ref(state);

        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(|h| h.strip_prefix("Bearer "))
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                tracing::debug!("missing or malformed Authorization header");
                AuthError::invalid_credential("Could not validate credentials")
            })?;

        let account = auth_state.service.resolve_identity(token).await?;

        tracing::debug!(username = %account.username, "token validated");
        Ok(BearerAuth(account))
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = match &self {
            AuthError::Unauthenticated { .. } | AuthError::InvalidCredential { .. } => {
                StatusCode::UNAUTHORIZED
            }
            AuthError::Conflict { .. } => StatusCode::CONFLICT,
            AuthError::Storage { .. } | AuthError::Internal { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = json!({
            "error": self.category(),
            "message": self.to_string(),
        });

        let mut headers = HeaderMap::new();
        if status == StatusCode::UNAUTHORIZED {
            headers.insert(
                header::WWW_AUTHENTICATE,
                HeaderValue::from_static("Bearer realm=\"dermalens\""),
            );
        }

        (status, headers, Json(body)).into_response()
    }
}
