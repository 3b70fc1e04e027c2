//! HTTP error mapping for the server's own failure modes.
//!
//! Auth errors carry their own `IntoResponse` in `dermalens-auth`; this
//! type covers request-shape problems and upstream model failures.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use dermalens_analysis::AnalysisError;
use dermalens_auth::AuthError;
use serde_json::json;

/// Errors surfaced by route handlers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request body or multipart payload is malformed.
    #[error("Invalid request: {message}")]
    InvalidRequest {
        /// Description of what is malformed.
        message: String,
    },

    /// An authentication failure; delegates to the auth crate's mapping.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// The model invocation failed; the caller sees a gateway error.
    #[error(transparent)]
    Analysis(#[from] AnalysisError),
}

impl ApiError {
    /// Creates a new `InvalidRequest` error.
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::Auth(err) => err.into_response(),
            Self::InvalidRequest { message } => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "invalid_request", "message": message })),
            )
                .into_response(),
            Self::Analysis(err) => {
                let status = match &err {
                    AnalysisError::Upstream { .. } => StatusCode::BAD_GATEWAY,
                    AnalysisError::Configuration { .. } => StatusCode::INTERNAL_SERVER_ERROR,
                };
                (
                    status,
                    Json(json!({ "error": err.category(), "message": err.to_string() })),
                )
                    .into_response()
            }
        }
    }
}
