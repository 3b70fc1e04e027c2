//! Shared application state.

use std::sync::Arc;

use axum::extract::FromRef;
use dermalens_analysis::Analyzer;
use dermalens_auth::AuthState;

/// State shared across all routes.
#[derive(Clone)]
pub struct AppState {
    /// Authentication state for the bearer extractor.
    pub auth: AuthState,

    /// The analysis pipeline.
    pub analyzer: Arc<Analyzer>,
}

impl FromRef<AppState> for AuthState {
    fn from_ref(state: &AppState) -> Self {
        state.auth.clone()
    }
}
