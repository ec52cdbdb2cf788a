//! Public auth endpoints: register, login, token verification, current user.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};

use super::ApiState;
use crate::auth::{Auth, AuthError};
use crate::jwt::{TokenClaims, unix_now};
use crate::service::RegisterRequest;
use crate::store::PublicUser;

pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/verify", post(verify))
        .route("/me", get(me))
        .with_state(state)
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RegisterBody {
    email: Option<String>,
    password: Option<String>,
    first_name: Option<String>,
    last_name: Option<String>,
}

#[derive(Deserialize)]
struct LoginBody {
    email: Option<String>,
    password: Option<String>,
}

#[derive(Deserialize)]
struct VerifyBody {
    token: Option<String>,
}

#[derive(Serialize)]
struct MeResponse {
    user: PublicUser,
}

#[derive(Serialize)]
#[serde(untagged)]
enum VerifyResponse {
    Valid { valid: bool, payload: TokenClaims },
    Invalid { valid: bool, error: String },
}

/// Both fields must be present and non-empty.
fn required(email: Option<String>, password: Option<String>) -> Result<(String, String), AuthError> {
    match (email, password) {
        (Some(email), Some(password)) if !email.is_empty() && !password.is_empty() => {
            Ok((email, password))
        }
        _ => Err(AuthError::BadRequest("Email and password are required")),
    }
}

async fn register(
    State(state): State<ApiState>,
    Json(body): Json<RegisterBody>,
) -> Result<impl IntoResponse, AuthError> {
    let (email, password) = required(body.email, body.password)?;

    let resp = state
        .auth
        .register(
            RegisterRequest {
                email,
                password,
                first_name: body.first_name,
                last_name: body.last_name,
            },
            unix_now()?,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(resp)))
}

async fn login(
    State(state): State<ApiState>,
    Json(body): Json<LoginBody>,
) -> Result<impl IntoResponse, AuthError> {
    let (email, password) = required(body.email, body.password)?;

    let resp = state.auth.login(&email, &password, unix_now()?).await?;
    Ok(Json(resp))
}

/// Check a token passed in the body. Failures answer `{valid: false, error}`.
async fn verify(
    State(state): State<ApiState>,
    Json(body): Json<VerifyBody>,
) -> Result<Response, AuthError> {
    let token = body
        .token
        .filter(|t| !t.is_empty())
        .ok_or(AuthError::BadRequest("Token is required"))?;

    let response = match state.auth.verify_token(&token, unix_now()?) {
        Ok(payload) => (
            StatusCode::OK,
            Json(VerifyResponse::Valid {
                valid: true,
                payload,
            }),
        )
            .into_response(),
        Err(e) => (
            StatusCode::UNAUTHORIZED,
            Json(VerifyResponse::Invalid {
                valid: false,
                error: e.public_message(),
            }),
        )
            .into_response(),
    };
    Ok(response)
}

async fn me(
    State(state): State<ApiState>,
    Auth(ctx): Auth,
) -> Result<impl IntoResponse, AuthError> {
    let user = state.auth.current_user(&ctx).await?;
    Ok(Json(MeResponse { user }))
}
