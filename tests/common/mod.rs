#![allow(dead_code)]

use authgate::{
    ServerConfig, create_app,
    db::Database,
    jwt::{JwtConfig, unix_now},
    service::{DEFAULT_ROLE, PasswordPolicy},
};
use axum::{
    Router,
    body::Body,
    http::{Request, Response, StatusCode},
};
use std::time::Duration;
use tower::ServiceExt;

pub const TEST_SECRET: &[u8] = b"test-jwt-secret-for-integration-tests";
pub const TEST_TTL: Duration = Duration::from_secs(3600);

/// Create a test app and return (app, db, jwt_config) sharing the same secret.
pub async fn create_test_app() -> (Router, Database, JwtConfig) {
    let db = Database::open(":memory:")
        .await
        .expect("Failed to open test database");
    let config = ServerConfig {
        db: db.clone(),
        jwt_secret: TEST_SECRET.to_vec(),
        token_ttl: TEST_TTL,
        // Lowest cost bcrypt accepts, keeps tests fast
        bcrypt_cost: 4,
        password_policy: PasswordPolicy::default(),
        default_role: DEFAULT_ROLE.to_string(),
    };
    let app = create_app(&config).expect("Failed to create app");
    (app, db, JwtConfig::new(TEST_SECRET, TEST_TTL))
}

pub fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn authed_request(
    method: &str,
    uri: &str,
    token: &str,
    body: Option<serde_json::Value>,
) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("authorization", format!("Bearer {}", token));
    match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

/// Send a request and return (status, json body).
pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    if status == StatusCode::NO_CONTENT {
        return (status, serde_json::Value::Null);
    }
    (status, body_json(response).await)
}

/// Register a user over the API and return (user_id, access_token).
pub async fn register(app: &Router, email: &str, password: &str) -> (String, String) {
    let (status, json) = send(
        app,
        json_request(
            "POST",
            "/api/auth/register",
            serde_json::json!({ "email": email, "password": password }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {}", json);
    (
        json["user"]["id"].as_str().unwrap().to_string(),
        json["tokens"]["accessToken"].as_str().unwrap().to_string(),
    )
}

/// Issue a token directly, e.g. to forge an admin or an expired token.
pub fn token_for(jwt: &JwtConfig, user_id: &str, email: &str, role: Option<&str>) -> String {
    jwt.issue(user_id, email, role, unix_now().unwrap()).unwrap()
}
