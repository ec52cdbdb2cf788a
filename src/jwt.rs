//! JWT token issuing and verification.
//!
//! Tokens are compact HS256 JWTs whose payload is
//! `{userId, email, role?, iat, exp}`. Both operations take the current time
//! as an argument so they stay pure over `(token, key, now)`.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::auth::AuthError;

/// Default token lifetime: 24 hours.
pub const DEFAULT_TOKEN_TTL_SECS: u64 = 24 * 60 * 60;

/// Longest token lifetime accepted from configuration: ten years.
pub const MAX_TOKEN_TTL_SECS: u64 = 10 * 365 * 24 * 60 * 60;

/// Claims carried inside a signed token. Unknown payload fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenClaims {
    pub user_id: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Issued at (Unix timestamp)
    pub iat: u64,
    /// Expiration time (Unix timestamp)
    pub exp: u64,
}

/// Signing key and token lifetime. Immutable once built.
#[derive(Clone)]
pub struct JwtConfig {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl_secs: u64,
}

/// Current Unix time in seconds.
pub fn unix_now() -> Result<u64, AuthError> {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .map_err(|_| AuthError::Internal("System time error".into()))
}

impl JwtConfig {
    /// Create a new JWT configuration with the given secret and token lifetime.
    /// A zero lifetime is raised to one second so `exp > iat` always holds.
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            ttl_secs: ttl.as_secs().max(1),
        }
    }

    /// Issue a signed token for an identity at time `now`.
    pub fn issue(
        &self,
        user_id: &str,
        email: &str,
        role: Option<&str>,
        now: u64,
    ) -> Result<String, AuthError> {
        if user_id.is_empty() || email.is_empty() {
            return Err(AuthError::InvalidIdentity);
        }

        let exp = now
            .checked_add(self.ttl_secs)
            .ok_or_else(|| AuthError::Internal("Token expiry overflows".into()))?;

        let claims = TokenClaims {
            user_id: user_id.to_string(),
            email: email.to_string(),
            role: role.map(str::to_string),
            iat: now,
            exp,
        };

        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Internal(format!("Failed to encode token: {}", e)))
    }

    /// Verify signature and expiry of a token at time `now`.
    ///
    /// Structural or signature problems yield `InvalidToken`; a genuine token
    /// whose `exp` is at or before `now` yields `ExpiredToken`.
    pub fn verify(&self, token: &str, now: u64) -> Result<TokenClaims, AuthError> {
        // Expiry is checked below against the caller's clock, not the system clock.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        let token_data = jsonwebtoken::decode::<TokenClaims>(token, &self.decoding_key, &validation)
            .map_err(|e| {
                tracing::debug!(error = %e, "Token rejected");
                AuthError::InvalidToken
            })?;

        let claims = token_data.claims;
        if now >= claims.exp {
            return Err(AuthError::ExpiredToken);
        }

        Ok(claims)
    }
}
