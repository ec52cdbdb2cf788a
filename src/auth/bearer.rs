//! Bearer token parsing for the Authorization header.

use axum::http::{HeaderMap, header};

use super::errors::AuthError;

/// The only accepted authorization scheme.
pub const BEARER_SCHEME: &str = "Bearer";

/// Extract the token from an `Authorization: Bearer <token>` header.
///
/// A missing header is `Unauthorized`. Anything other than exactly two
/// whitespace-separated parts with the scheme `Bearer` is `InvalidAuthFormat`.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::Unauthorized)?
        .to_str()
        .map_err(|_| AuthError::InvalidAuthFormat)?;

    let mut parts = value.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some(BEARER_SCHEME), Some(token), None) => Ok(token),
        _ => Err(AuthError::InvalidAuthFormat),
    }
}
