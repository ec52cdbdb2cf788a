//! Axum extractors for authentication.

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, request::Parts},
};

use super::bearer::bearer_token;
use super::errors::AuthError;
use super::state::HasAuthBackend;
use super::types::AuthContext;
use crate::jwt::{JwtConfig, unix_now};

/// Core authentication step: read the bearer token, verify it at `now` and
/// turn the claims into an [`AuthContext`].
pub fn authenticate(headers: &HeaderMap, jwt: &JwtConfig, now: u64) -> Result<AuthContext, AuthError> {
    let token = bearer_token(headers)?;
    let claims = jwt.verify(token, now)?;
    Ok(AuthContext::from(claims))
}

/// Extractor for endpoints that require a valid bearer token.
///
/// On failure the request is answered with a 401 JSON error and the handler
/// never runs. Expired tokens get their own message.
pub struct Auth(pub AuthContext);

impl<S> FromRequestParts<S> for Auth
where
    S: HasAuthBackend + Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let now = unix_now()?;
        match authenticate(&parts.headers, state.jwt(), now) {
            Ok(ctx) => Ok(Auth(ctx)),
            Err(e) => {
                tracing::debug!(error = %e, path = %parts.uri.path(), "Authentication failed");
                Err(e)
            }
        }
    }
}
