//! Tests for the public auth endpoints.
//!
//! Tests cover:
//! - Registration (success, duplicates, weak passwords, missing fields)
//! - Login (success and enumeration-resistant failures)
//! - Token verification in the body
//! - Current user lookup via the Authorization header

mod common;

use authgate::jwt::unix_now;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use common::{authed_request, create_test_app, json_request, register, send};
use serde_json::json;

#[tokio::test]
async fn test_index() {
    let (app, _, _) = create_test_app().await;

    let (status, json) = send(
        &app,
        Request::builder().uri("/").body(Body::empty()).unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["name"], "authgate");
}

#[tokio::test]
async fn test_register_success() {
    let (app, _, jwt) = create_test_app().await;

    let (status, json) = send(
        &app,
        json_request(
            "POST",
            "/api/auth/register",
            json!({
                "email": "alice@example.com",
                "password": "abcdef",
                "firstName": "Alice",
                "lastName": "Smith"
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["user"]["email"], "alice@example.com");
    assert_eq!(json["user"]["firstName"], "Alice");
    assert_eq!(json["user"]["lastName"], "Smith");
    assert_eq!(json["user"]["role"], "user");
    assert_eq!(json["user"]["status"], true);
    assert!(json["user"].get("password").is_none());
    assert!(json["user"].get("passwordHash").is_none());

    let token = json["tokens"]["accessToken"].as_str().unwrap();
    let claims = jwt.verify(token, unix_now().unwrap()).unwrap();
    assert_eq!(claims.user_id, json["user"]["id"].as_str().unwrap());
    assert_eq!(claims.email, "alice@example.com");
    assert_eq!(claims.role.as_deref(), Some("user"));
}

#[tokio::test]
async fn test_register_duplicate_email() {
    let (app, _, _) = create_test_app().await;
    let (first_id, _) = register(&app, "alice@example.com", "abcdef").await;

    let (status, json) = send(
        &app,
        json_request(
            "POST",
            "/api/auth/register",
            json!({ "email": "alice@example.com", "password": "other-password" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "User with this email already exists");

    // First account is untouched and still logs in with its own password
    let (status, json) = send(
        &app,
        json_request(
            "POST",
            "/api/auth/login",
            json!({ "email": "alice@example.com", "password": "abcdef" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["user"]["id"], first_id);
}

#[tokio::test]
async fn test_register_weak_password() {
    let (app, _, _) = create_test_app().await;

    let (status, json) = send(
        &app,
        json_request(
            "POST",
            "/api/auth/register",
            json!({ "email": "alice@example.com", "password": "abc" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        json["error"],
        "Password must be at least 6 characters long"
    );
}

#[tokio::test]
async fn test_long_password_prefix_cannot_log_in() {
    let (app, _, _) = create_test_app().await;
    let prefix = "p".repeat(72);
    register(&app, "alice@example.com", &prefix).await;

    let (status, json) = send(
        &app,
        json_request(
            "POST",
            "/api/auth/register",
            json!({ "email": "bob@example.com", "password": format!("{}X", prefix) }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Password must be at most 72 bytes long");

    let (status, json) = send(
        &app,
        json_request(
            "POST",
            "/api/auth/login",
            json!({ "email": "alice@example.com", "password": format!("{}Y", prefix) }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["error"], "Invalid credentials");
}

#[tokio::test]
async fn test_register_missing_fields() {
    let (app, _, _) = create_test_app().await;

    for body in [
        json!({ "email": "alice@example.com" }),
        json!({ "password": "abcdef" }),
        json!({ "email": "", "password": "abcdef" }),
    ] {
        let (status, json) = send(&app, json_request("POST", "/api/auth/register", body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "Email and password are required");
    }
}

#[tokio::test]
async fn test_login_success() {
    let (app, _, _) = create_test_app().await;
    let (id, _) = register(&app, "alice@example.com", "abcdef").await;

    let (status, json) = send(
        &app,
        json_request(
            "POST",
            "/api/auth/login",
            json!({ "email": "alice@example.com", "password": "abcdef" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["user"]["id"], id);
    assert!(json["tokens"]["accessToken"].as_str().is_some());
}

#[tokio::test]
async fn test_login_failures_are_identical() {
    let (app, _, _) = create_test_app().await;
    register(&app, "real@x.com", "rightpass").await;

    let (missing_status, missing) = send(
        &app,
        json_request(
            "POST",
            "/api/auth/login",
            json!({ "email": "missing@x.com", "password": "anything" }),
        ),
    )
    .await;
    let (wrong_status, wrong) = send(
        &app,
        json_request(
            "POST",
            "/api/auth/login",
            json!({ "email": "real@x.com", "password": "wrongpass" }),
        ),
    )
    .await;

    assert_eq!(missing_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
    assert_eq!(missing, wrong);
    assert_eq!(missing["error"], "Invalid credentials");
}

#[tokio::test]
async fn test_login_missing_fields() {
    let (app, _, _) = create_test_app().await;

    let (status, _) = send(
        &app,
        json_request("POST", "/api/auth/login", json!({ "email": "a@b.c" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_verify_valid_token() {
    let (app, _, _) = create_test_app().await;
    let (id, token) = register(&app, "alice@example.com", "abcdef").await;

    let (status, json) = send(
        &app,
        json_request("POST", "/api/auth/verify", json!({ "token": token })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["valid"], true);
    assert_eq!(json["payload"]["userId"], id);
    assert_eq!(json["payload"]["email"], "alice@example.com");
    assert!(json["payload"]["exp"].as_u64().unwrap() > json["payload"]["iat"].as_u64().unwrap());
}

#[tokio::test]
async fn test_verify_invalid_and_expired() {
    let (app, _, jwt) = create_test_app().await;

    let (status, json) = send(
        &app,
        json_request("POST", "/api/auth/verify", json!({ "token": "garbage" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["valid"], false);
    assert_eq!(json["error"], "Invalid token");

    let expired = jwt
        .issue("uuid-1", "alice@example.com", None, unix_now().unwrap() - 7200)
        .unwrap();
    let (status, json) = send(
        &app,
        json_request("POST", "/api/auth/verify", json!({ "token": expired })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["valid"], false);
    assert_eq!(json["error"], "Token expired");
}

#[tokio::test]
async fn test_verify_missing_token() {
    let (app, _, _) = create_test_app().await;

    let (status, json) = send(&app, json_request("POST", "/api/auth/verify", json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Token is required");
}

#[tokio::test]
async fn test_me_with_token() {
    let (app, _, _) = create_test_app().await;
    let (id, token) = register(&app, "alice@example.com", "abcdef").await;

    let (status, json) = send(&app, authed_request("GET", "/api/auth/me", &token, None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["user"]["id"], id);
    assert_eq!(json["user"]["email"], "alice@example.com");
}

#[tokio::test]
async fn test_me_without_header() {
    let (app, _, _) = create_test_app().await;

    let (status, json) = send(
        &app,
        Request::builder()
            .uri("/api/auth/me")
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["error"], "Unauthorized");
}

#[tokio::test]
async fn test_me_wrong_scheme_vs_bad_token() {
    let (app, _, _) = create_test_app().await;

    let (status, wrong_scheme) = send(
        &app,
        Request::builder()
            .uri("/api/auth/me")
            .header("authorization", "Token abc")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, bad_token) = send(&app, authed_request("GET", "/api/auth/me", "abc", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    assert_eq!(
        wrong_scheme["error"],
        "Invalid authorization format. Use: Bearer <token>"
    );
    assert_eq!(bad_token["error"], "Invalid token");
}

#[tokio::test]
async fn test_me_expired_token() {
    let (app, _, jwt) = create_test_app().await;
    let (id, _) = register(&app, "alice@example.com", "abcdef").await;

    let expired = jwt
        .issue(&id, "alice@example.com", Some("user"), unix_now().unwrap() - 7200)
        .unwrap();
    let (status, json) = send(&app, authed_request("GET", "/api/auth/me", &expired, None)).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["error"], "Token expired");
}

#[tokio::test]
async fn test_me_deleted_user() {
    let (app, _, _) = create_test_app().await;
    let (id, token) = register(&app, "alice@example.com", "abcdef").await;

    let (status, _) = send(
        &app,
        authed_request("DELETE", &format!("/api/users/{}", id), &token, None),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    // Token is still cryptographically valid but the user is gone
    let (status, json) = send(&app, authed_request("GET", "/api/auth/me", &token, None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "User not found");
}
