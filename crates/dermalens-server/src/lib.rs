//! # dermalens-server
//!
//! HTTP surface of the Dermalens service: route wiring, CORS, multipart
//! upload handling, configuration loading, and tracing setup. Business
//! logic lives in `dermalens-auth` and `dermalens-analysis`; this crate
//! only connects them to the network.

pub mod config;
pub mod error;
pub mod handlers;
pub mod observability;
pub mod routes;
pub mod state;

pub use config::{ConfigError, ServerConfig};
pub use error::ApiError;
pub use routes::build_router;
pub use state::AppState;
