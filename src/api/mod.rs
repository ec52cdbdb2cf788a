mod auth;
mod users;

use axum::Router;
use std::sync::Arc;

use crate::auth::{HasAuthBackend, RoleAuthorizer};
use crate::db::SqliteUserStore;
use crate::jwt::JwtConfig;
use crate::service::{AuthService, UserService};

/// Shared state for every API route. Cheap to clone; everything inside is
/// immutable after startup.
#[derive(Clone)]
pub struct ApiState {
    pub jwt: Arc<JwtConfig>,
    pub auth: Arc<AuthService<SqliteUserStore>>,
    pub users: Arc<UserService<SqliteUserStore>>,
    pub admin_only: Arc<RoleAuthorizer>,
}

impl HasAuthBackend for ApiState {
    fn jwt(&self) -> &JwtConfig {
        &self.jwt
    }
}

/// Create the API router.
pub fn create_api_router(state: ApiState) -> Router {
    Router::new()
        .nest("/auth", auth::router(state.clone()))
        .nest("/users", users::router(state))
}
