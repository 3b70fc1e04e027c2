//! Route handlers.

pub mod analyze;
pub mod auth;

pub use analyze::{analyze_handler, analyze_v1_handler};
pub use auth::{login_handler, me_handler, signup_handler};
