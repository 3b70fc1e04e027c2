use std::sync::Arc;

use dermalens_analysis::{Analyzer, OpenAiVision};
use dermalens_auth::{AuthService, AuthState, JsonFileAccountStore, TokenCodec};
use dermalens_server::{AppState, ServerConfig, build_router, observability};

#[tokio::main]
async fn main() {
    // Load .env file if present (before anything else).
    if let Err(e) = dotenvy::dotenv() {
        // Not an error if .env doesn't exist - it's optional.
        if !matches!(e, dotenvy::Error::Io(ref io_err) if io_err.kind() == std::io::ErrorKind::NotFound)
        {
            eprintln!("Warning: Failed to load .env file: {e}");
        }
    }

    observability::init_tracing();

    let config = match ServerConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            std::process::exit(2);
        }
    };

    tracing::info!(
        bind = %config.bind_addr,
        users_file = %config.users_file,
        model = %config.vision.model,
        "Configuration loaded"
    );

    let store = Arc::new(JsonFileAccountStore::new(&config.users_file));
    let codec = Arc::new(TokenCodec::new(&config.secret, config.token_ttl));
    let auth_service = Arc::new(AuthService::new(store, codec));

    let vision = match OpenAiVision::new(config.vision.clone()) {
        Ok(v) => v,
        Err(e) => {
            eprintln!("Vision client initialization failed: {e}");
            std::process::exit(2);
        }
    };
    let analyzer = Arc::new(Analyzer::new(Arc::new(vision)));

    let state = AppState {
        auth: AuthState::new(auth_service),
        analyzer,
    };
    let router = build_router(state, &config.cors_origins);

    let listener = match tokio::net::TcpListener::bind(&config.bind_addr).await {
        Ok(l) => l,
        Err(e) => {
            eprintln!("Failed to bind {}: {e}", config.bind_addr);
            std::process::exit(2);
        }
    };

    tracing::info!(bind = %config.bind_addr, "Server listening");

    if let Err(err) = axum::serve(listener, router).await {
        eprintln!("Server error: {err}");
    }
}
