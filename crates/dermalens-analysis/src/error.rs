//! Analysis error types.
//!
//! Parse ambiguity never raises here: the normalizer is total and absorbs
//! every reply shape. Only the outbound model call itself can fail, and
//! that failure propagates to the caller as `Upstream`.

/// Errors that can occur while producing an analysis.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    /// The model invocation could not be made or returned nothing usable.
    #[error("Upstream model error: {message}")]
    Upstream {
        /// Description of the upstream failure.
        message: String,
    },

    /// The vision client configuration is invalid.
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration error.
        message: String,
    },
}

impl AnalysisError {
    /// Creates a new `Upstream` error.
    #[must_use]
    pub fn upstream(message: impl Into<String>) -> Self {
        Self::Upstream {
            message: message.into(),
        }
    }

    /// Creates a new `Configuration` error.
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Returns the stable category string reported to callers.
    #[must_use]
    pub fn category(&self) -> &'static str {
        match self {
            Self::Upstream { .. } => "upstream_error",
            Self::Configuration { .. } => "configuration_error",
        }
    }
}
