//! Server configuration.
//!
//! All configuration is environment-driven (after an optional `.env` load
//! in `main`). The resulting struct is passed explicitly to constructors;
//! nothing reads the environment after startup.

use dermalens_analysis::VisionConfig;
use time::Duration;

/// Errors raised while building the configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required environment variable is missing.
    #[error("Missing required environment variable: {name}")]
    MissingVar {
        /// The variable name.
        name: String,
    },

    /// An environment variable could not be parsed.
    #[error("Invalid value for {name}: {message}")]
    InvalidVar {
        /// The variable name.
        name: String,
        /// Why the value is invalid.
        message: String,
    },
}

/// Complete server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Socket address to bind, e.g. `0.0.0.0:8000`.
    pub bind_addr: String,

    /// Token signing secret. The server refuses to start without one.
    pub secret: String,

    /// Path of the account store snapshot file.
    pub users_file: String,

    /// Bearer token lifetime.
    pub token_ttl: Duration,

    /// Allowed CORS origins.
    pub cors_origins: Vec<String>,

    /// Vision model client configuration.
    pub vision: VisionConfig,
}

/// Default CORS origins for local development.
const DEFAULT_CORS_ORIGINS: &[&str] = &[
    "http://localhost:5173",
    "http://127.0.0.1:5173",
    "http://localhost:8080",
    "http://127.0.0.1:8080",
];

impl ServerConfig {
    /// Builds the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when `DERMALENS_SECRET` or `OPENAI_API_KEY`
    /// is absent, or a variable fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        let secret = require("DERMALENS_SECRET")?;
        let api_key = require("OPENAI_API_KEY")?;

        let token_ttl_minutes = match std::env::var("DERMALENS_TOKEN_TTL_MINUTES") {
            Ok(raw) => raw.parse::<i64>().map_err(|e| ConfigError::InvalidVar {
                name: "DERMALENS_TOKEN_TTL_MINUTES".to_string(),
                message: e.to_string(),
            })?,
            Err(_) => 30,
        };

        let cors_origins = match std::env::var("DERMALENS_CORS_ORIGINS") {
            Ok(raw) => raw
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            Err(_) => DEFAULT_CORS_ORIGINS.iter().map(ToString::to_string).collect(),
        };

        let mut vision = VisionConfig::new(api_key);
        if let Ok(base_url) = std::env::var("OPENAI_API_BASE") {
            vision.base_url = base_url;
        }
        if let Ok(model) = std::env::var("DERMALENS_MODEL") {
            vision.model = model;
        }

        Ok(Self {
            bind_addr: std::env::var("DERMALENS_BIND").unwrap_or_else(|_| "0.0.0.0:8000".to_string()),
            secret,
            users_file: std::env::var("DERMALENS_USERS_FILE")
                .unwrap_or_else(|_| "users.json".to_string()),
            token_ttl: Duration::minutes(token_ttl_minutes),
            cors_origins,
            vision,
        })
    }
}

fn require(name: &str) -> Result<String, ConfigError> {
    match std::env::var(name) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => Err(ConfigError::MissingVar {
            name: name.to_string(),
        }),
    }
}
