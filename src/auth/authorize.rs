//! Authorization gates that run after authentication.
//!
//! Both gates take the context as `Option` so a handler wired without the
//! authentication extractor fails closed with `Unauthorized`.

use std::collections::HashSet;

use super::errors::AuthError;
use super::types::AuthContext;

/// Role name that passes every ownership check.
pub const ADMIN_ROLE: &str = "admin";

/// Admits callers whose role is in a fixed allow-list.
#[derive(Debug, Clone)]
pub struct RoleAuthorizer {
    allowed_roles: HashSet<String>,
}

impl RoleAuthorizer {
    pub fn new<I, R>(roles: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<String>,
    {
        Self {
            allowed_roles: roles.into_iter().map(Into::into).collect(),
        }
    }

    pub fn admin_only() -> Self {
        Self::new([ADMIN_ROLE])
    }

    pub fn check(&self, ctx: Option<&AuthContext>) -> Result<(), AuthError> {
        let ctx = ctx.ok_or(AuthError::Unauthorized)?;
        match ctx.role.as_deref() {
            Some(role) if self.allowed_roles.contains(role) => Ok(()),
            _ => Err(AuthError::Forbidden("Forbidden: Insufficient permissions")),
        }
    }
}

/// Admits admins, or the caller whose id matches the addressed resource owner.
#[derive(Debug, Clone, Copy, Default)]
pub struct OwnershipAuthorizer;

impl OwnershipAuthorizer {
    pub fn check(
        &self,
        ctx: Option<&AuthContext>,
        resource_user_id: &str,
    ) -> Result<(), AuthError> {
        let ctx = ctx.ok_or(AuthError::Unauthorized)?;
        if ctx.has_role(ADMIN_ROLE) || ctx.user_id == resource_user_id {
            return Ok(());
        }
        Err(AuthError::Forbidden(
            "Forbidden: You can only access your own resources or be an admin",
        ))
    }
}
