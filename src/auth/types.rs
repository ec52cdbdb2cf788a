//! Authentication context types.

use serde::Serialize;

use crate::jwt::TokenClaims;

/// Identity of the caller for a single request, built from verified claims.
///
/// Handed from the authentication extractor to the authorizers and the
/// handler as a plain value. It is never stored anywhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthContext {
    pub user_id: String,
    pub email: String,
    pub role: Option<String>,
    pub iat: u64,
    pub exp: u64,
}

impl From<TokenClaims> for AuthContext {
    fn from(claims: TokenClaims) -> Self {
        Self {
            user_id: claims.user_id,
            email: claims.email,
            role: claims.role,
            iat: claims.iat,
            exp: claims.exp,
        }
    }
}

impl AuthContext {
    pub fn has_role(&self, role: &str) -> bool {
        self.role.as_deref() == Some(role)
    }
}
