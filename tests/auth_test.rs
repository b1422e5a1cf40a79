//! Integration tests for registration, login, and the auth middleware.

mod common;

use axum::http::StatusCode;
use common::TestClient;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct Identity {
    id: i64,
    name: String,
    email: String,
}

/// Registration returns the public identity and never the password hash.
#[tokio::test]
async fn test_register_returns_identity_without_hash() {
    let mut client = TestClient::new();

    let (status, body) = client.register("Ada", "ada@example.com").await;
    assert_eq!(status, StatusCode::CREATED);

    let identity: Identity = serde_json::from_str(&body).unwrap();
    assert!(identity.id > 0);
    assert_eq!(identity.name, "Ada");
    assert_eq!(identity.email, "ada@example.com");
    assert!(!body.contains("password"), "response leaked the password field");
    assert!(!body.contains("argon2"), "response leaked the hash");
}

/// A second registration with the same email is rejected.
#[tokio::test]
async fn test_register_duplicate_email_rejected() {
    let mut client = TestClient::new();

    let (status, _) = client.register("Ada", "ada@example.com").await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = client.register("Imposter", "ada@example.com").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("User already exists"));

    // still exactly one user
    let (_, body) = client.get("/api/auth/usercount").await;
    assert!(body.contains("\"count\":1"));
}

#[tokio::test]
async fn test_register_validates_fields() {
    let mut client = TestClient::new();

    let cases = [
        serde_json::json!({"name": "", "email": "a@example.com", "password": "longenough"}),
        serde_json::json!({"name": "A", "email": "not-an-email", "password": "longenough"}),
        serde_json::json!({"name": "A", "email": "a@example.com", "password": "short"}),
    ];

    for payload in cases {
        let (status, _) = client.post_json("/api/auth/register", payload.clone()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "payload: {}", payload);
    }
}

/// Wrong password and unknown email yield the same 401.
#[tokio::test]
async fn test_login_invalid_credentials() {
    let mut client = TestClient::new();
    client.register("Ada", "ada@example.com").await;

    let (status, body) = client
        .post_json(
            "/api/auth/login",
            serde_json::json!({"email": "ada@example.com", "password": "wrongpassword"}),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status2, body2) = client
        .post_json(
            "/api/auth/login",
            serde_json::json!({"email": "nobody@example.com", "password": "wrongpassword"}),
        )
        .await;
    assert_eq!(status2, StatusCode::UNAUTHORIZED);
    assert_eq!(body, body2, "login errors should not reveal which part failed");
}

/// Login issues a session cookie that unlocks protected routes.
#[tokio::test]
async fn test_login_grants_access() {
    let mut client = TestClient::new();
    client.sign_up("ada@example.com").await;

    let (status, _) = client.get("/api/expenses").await;
    assert_eq!(status, StatusCode::OK);
}

/// Every protected route rejects anonymous requests before any logic runs.
#[tokio::test]
async fn test_protected_routes_require_session() {
    let mut client = TestClient::new();

    for uri in [
        "/api/expenses",
        "/api/expenses/export",
        "/api/budgets",
        "/api/budgets/status",
        "/api/dashboard/summary",
        "/api/reports",
    ] {
        let (status, _) = client.get(uri).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "GET {}", uri);
    }

    let (status, _) = client
        .post_json("/api/expenses", serde_json::json!({"amount": 1.0}))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

/// A forged token is as good as none.
#[tokio::test]
async fn test_garbage_token_rejected() {
    let mut client = TestClient::new();
    client.sign_up("ada@example.com").await;

    client.set_session_token("definitely.not.a-real-token");
    let (status, _) = client.get("/api/expenses").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

/// Logout clears the cookie; later requests are anonymous.
#[tokio::test]
async fn test_logout_ends_session() {
    let mut client = TestClient::new();
    client.sign_up("ada@example.com").await;

    let (status, _) = client.post_json("/api/auth/logout", serde_json::json!({})).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = client.get("/api/expenses").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

/// The user count endpoint is public.
#[tokio::test]
async fn test_usercount_is_public() {
    let mut client = TestClient::new();

    let (status, body) = client.get("/api/auth/usercount").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("\"count\":0"));

    client.register("Ada", "ada@example.com").await;
    let (_, body) = client.get("/api/auth/usercount").await;
    assert!(body.contains("\"count\":1"));
}

/// Health check works without a session.
#[tokio::test]
async fn test_health_is_public() {
    let mut client = TestClient::new();
    let (status, body) = client.get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "OK");
}
