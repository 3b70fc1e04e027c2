//! Bearer token issuance and verification.
//!
//! Tokens are compact JWTs signed with HS256 using a server-held secret.
//! Claims carry the subject username, issuance and expiry timestamps, and a
//! unique token id for log correlation. Verification collapses every
//! failure cause (bad signature, malformed structure, elapsed expiry) into
//! the single `InvalidCredential` error so callers cannot tell which check
//! failed; the distinction is only tracing-logged.

use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

use crate::AuthResult;
use crate::error::AuthError;

/// Default token lifetime: 30 minutes.
pub const DEFAULT_TOKEN_TTL: Duration = Duration::minutes(30);

/// Claims embedded in an issued bearer token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TokenClaims {
    /// Subject (account username).
    pub sub: String,

    /// Issued at (Unix timestamp).
    pub iat: i64,

    /// Expiration time (Unix timestamp).
    pub exp: i64,

    /// Unique token id, used only for log correlation.
    pub jti: String,
}

/// Signs and verifies bearer tokens with a symmetric secret.
///
/// Thread-safe (`Send + Sync`); wrap in an `Arc` to share across tasks.
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    default_ttl: Duration,
}

impl TokenCodec {
    /// Creates a codec from the server signing secret.
    #[must_use]
    pub fn new(secret: &str, default_ttl: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            default_ttl,
        }
    }

    /// Issues a signed token for `subject`.
    ///
    /// `ttl` overrides the codec default when given. The expiry is absolute:
    /// `now + ttl`.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Internal` if encoding fails.
    pub fn issue(&self, subject: &str, ttl: Option<Duration>) -> AuthResult<String> {
        let now = OffsetDateTime::now_utc().unix_timestamp();
        let ttl = ttl.unwrap_or(self.default_ttl);

        let claims = TokenClaims {
            sub: subject.to_string(),
            iat: now,
            exp: now + ttl.whole_seconds(),
            jti: uuid::Uuid::new_v4().to_string(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::internal(format!("failed to encode token: {e}")))
    }

    /// Verifies a token and returns the subject username.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredential` for every verification
    /// failure: bad signature, malformed token, elapsed expiry.
    pub fn verify(&self, token: &str) -> AuthResult<String> {
        let validation = Validation::new(Algorithm::HS256);

        match decode::<TokenClaims>(token, &self.decoding_key, &validation) {
            Ok(data) => Ok(data.claims.sub),
            Err(e) => {
                // Only logs may distinguish why verification failed.
                match e.kind() {
                    ErrorKind::ExpiredSignature => {
                        tracing::debug!("token rejected: expired");
                    }
                    ErrorKind::InvalidSignature => {
                        tracing::debug!("token rejected: signature mismatch");
                    }
                    _ => {
                        tracing::debug!(error = %e, "token rejected: malformed");
                    }
                }
                Err(AuthError::invalid_credential("Could not validate credentials"))
            }
        }
    }

    /// Returns the codec's default token lifetime.
    #[must_use]
    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }
}
