pub mod api;
pub mod auth;
pub mod cli;
pub mod db;
pub mod hash;
pub mod jwt;
pub mod service;
pub mod store;

use api::{ApiState, create_api_router};
use auth::{AuthError, RoleAuthorizer};
use axum::{Json, Router, routing::get};
use db::Database;
use hash::CredentialHasher;
use jwt::JwtConfig;
use serde_json::json;
use service::{AuthService, PasswordPolicy, UserService};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

pub struct ServerConfig {
    /// Database connection (cloneable, uses connection pool internally)
    pub db: Database,
    /// Secret for signing tokens
    pub jwt_secret: Vec<u8>,
    /// How long an issued token stays valid
    pub token_ttl: Duration,
    /// bcrypt work factor
    pub bcrypt_cost: u32,
    /// Rules applied to passwords at registration
    pub password_policy: PasswordPolicy,
    /// Role assigned to newly registered users
    pub default_role: String,
}

/// Create the application router with the given configuration.
pub fn create_app(config: &ServerConfig) -> Result<Router, AuthError> {
    let jwt = Arc::new(JwtConfig::new(&config.jwt_secret, config.token_ttl));
    let hasher = CredentialHasher::new(config.bcrypt_cost)?;

    let state = ApiState {
        jwt: jwt.clone(),
        auth: Arc::new(AuthService::new(
            config.db.users(),
            hasher,
            jwt,
            config.password_policy.clone(),
            config.default_role.clone(),
        )?),
        users: Arc::new(UserService::new(config.db.users())),
        admin_only: Arc::new(RoleAuthorizer::admin_only()),
    };

    Ok(Router::new()
        .route("/", get(index))
        .nest("/api", create_api_router(state)))
}

async fn index() -> Json<serde_json::Value> {
    Json(json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Run the server on the given listener until `shutdown` resolves, then
/// close the database pool.
pub async fn run_server<F>(
    config: ServerConfig,
    listener: TcpListener,
    shutdown: F,
) -> Result<(), std::io::Error>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let app = create_app(&config).map_err(std::io::Error::other)?;
    let result = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await;
    config.db.close().await;
    result
}
