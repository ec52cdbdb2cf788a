//! User management endpoints.
//!
//! Listing requires the admin role; single-user routes admit admins or the
//! owner of the addressed id.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch},
};
use serde::Serialize;

use super::ApiState;
use crate::auth::{Auth, AuthError, OwnershipAuthorizer};
use crate::store::PublicUser;

pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/", get(list_users))
        .route("/{id}", get(get_user).delete(delete_user))
        .route("/{id}/status", patch(set_status))
        .with_state(state)
}

#[derive(Serialize)]
struct StatusResponse {
    #[serde(flatten)]
    user: PublicUser,
    message: &'static str,
}

async fn list_users(
    State(state): State<ApiState>,
    Auth(ctx): Auth,
) -> Result<impl IntoResponse, AuthError> {
    state.admin_only.check(Some(&ctx))?;

    let users = state.users.list().await?;
    Ok(Json(users))
}

async fn get_user(
    State(state): State<ApiState>,
    Auth(ctx): Auth,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AuthError> {
    OwnershipAuthorizer.check(Some(&ctx), &id)?;

    let user = state.users.get(&id).await?;
    Ok(Json(user))
}

async fn set_status(
    State(state): State<ApiState>,
    Auth(ctx): Auth,
    Path(id): Path<String>,
    Json(body): Json<serde_json::Value>,
) -> Result<impl IntoResponse, AuthError> {
    OwnershipAuthorizer.check(Some(&ctx), &id)?;

    let status = body
        .get("status")
        .and_then(serde_json::Value::as_bool)
        .ok_or(AuthError::BadRequest(
            "Status must be a boolean (true = active, false = blocked)",
        ))?;

    let user = state.users.set_status(&id, status).await?;
    Ok(Json(StatusResponse {
        user,
        message: if status {
            "User activated"
        } else {
            "User blocked"
        },
    }))
}

async fn delete_user(
    State(state): State<ApiState>,
    Auth(ctx): Auth,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AuthError> {
    OwnershipAuthorizer.check(Some(&ctx), &id)?;

    state.users.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
