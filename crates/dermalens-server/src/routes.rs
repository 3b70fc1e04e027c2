//! Router assembly.

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{analyze_handler, analyze_v1_handler, login_handler, me_handler, signup_handler};
use crate::state::AppState;

/// Builds the application router.
pub fn build_router(state: AppState, cors_origins: &[String]) -> Router {
    let cors = cors_layer(cors_origins);

    Router::new()
        .route("/health", get(health_handler))
        .route("/api/token", post(login_handler))
        .route("/api/signup", post(signup_handler))
        .route("/api/users/me", get(me_handler))
        .route("/api/analyze", post(analyze_handler))
        .route("/api/v1/analyze", post(analyze_v1_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin, "ignoring unparseable CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}

async fn health_handler() -> &'static str {
    "ok"
}
