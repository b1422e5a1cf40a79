//! Shared test utilities for integration tests.
//!
//! Provides a `TestClient` that simulates a browser session against the
//! full production router (auth middleware included) backed by an
//! in-memory database. The client remembers the session cookie from the
//! last login, so sequential requests behave like one signed-in user.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use chrono::Datelike;
use http_body_util::BodyExt;
use outlay::config::Config;
use outlay::db::{create_in_memory_pool, migrations};
use outlay::server;
use outlay::state::AppState;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tower::ServiceExt;

pub const TEST_PASSWORD: &str = "testpass123";

pub struct TestClient {
    pub state: AppState,
    router: Router,
    cookie: Option<String>,
}

impl TestClient {
    /// Create a new test client with a fresh in-memory database.
    pub fn new() -> Self {
        let pool = create_in_memory_pool().expect("Failed to create in-memory pool");
        {
            let conn = pool.get().expect("Failed to get connection");
            migrations::run_migrations(&conn, Path::new("migrations"))
                .expect("Failed to run migrations");
        }

        let config = Config {
            host: "127.0.0.1".into(),
            port: 7070,
            database_path: PathBuf::from(":memory:"),
            migrations_path: PathBuf::from("migrations"),
            jwt_secret: "test-secret".into(),
            cookie_secure: false,
            cors_origin: "http://localhost:5173".into(),
        };

        let state = AppState {
            db: pool,
            config: Arc::new(config),
        };
        let router = server::router(state.clone()).expect("Failed to build router");

        Self {
            state,
            router,
            cookie: None,
        }
    }

    /// Forget the session cookie, turning this client anonymous again.
    pub fn clear_session(&mut self) {
        self.cookie = None;
    }

    /// Replace the session cookie with an arbitrary token value.
    pub fn set_session_token(&mut self, token: &str) {
        self.cookie = Some(format!("token={}", token));
    }

    async fn send(&mut self, request: Request<Body>) -> (StatusCode, String) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();

        // Remember the session cookie from login (and its removal on logout).
        if let Some(set_cookie) = response.headers().get(header::SET_COOKIE) {
            let value = set_cookie.to_str().unwrap();
            if let Some(pair) = value.split(';').next() {
                self.cookie = Some(pair.to_string());
            }
        }

        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8_lossy(&body).to_string())
    }

    fn request(&self, method: Method, uri: &str, body: Option<String>) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = &self.cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    pub async fn get(&mut self, uri: &str) -> (StatusCode, String) {
        let request = self.request(Method::GET, uri, None);
        self.send(request).await
    }

    pub async fn post_json(&mut self, uri: &str, body: serde_json::Value) -> (StatusCode, String) {
        let request = self.request(Method::POST, uri, Some(body.to_string()));
        self.send(request).await
    }

    pub async fn put_json(&mut self, uri: &str, body: serde_json::Value) -> (StatusCode, String) {
        let request = self.request(Method::PUT, uri, Some(body.to_string()));
        self.send(request).await
    }

    pub async fn delete(&mut self, uri: &str) -> (StatusCode, String) {
        let request = self.request(Method::DELETE, uri, None);
        self.send(request).await
    }

    /// GET a JSON endpoint and parse the body.
    pub async fn get_json<T: serde::de::DeserializeOwned>(
        &mut self,
        uri: &str,
    ) -> (StatusCode, Option<T>) {
        let (status, body) = self.get(uri).await;
        let parsed = serde_json::from_str(&body).ok();
        (status, parsed)
    }

    // =========================================================================
    // Helper methods for driving the API
    // =========================================================================

    pub async fn register(&mut self, name: &str, email: &str) -> (StatusCode, String) {
        self.post_json(
            "/api/auth/register",
            serde_json::json!({
                "name": name,
                "email": email,
                "password": TEST_PASSWORD,
            }),
        )
        .await
    }

    pub async fn login(&mut self, email: &str) -> StatusCode {
        let (status, _) = self
            .post_json(
                "/api/auth/login",
                serde_json::json!({
                    "email": email,
                    "password": TEST_PASSWORD,
                }),
            )
            .await;
        status
    }

    /// Register a fresh user and sign in as them.
    pub async fn sign_up(&mut self, email: &str) {
        let (status, body) = self.register("Test User", email).await;
        assert_eq!(status, StatusCode::CREATED, "register failed: {}", body);
        assert_eq!(self.login(email).await, StatusCode::OK);
    }

    /// Create an expense and return its id.
    pub async fn create_expense(
        &mut self,
        amount: f64,
        category: &str,
        date: &str,
        payment_method: &str,
    ) -> i64 {
        let (status, body) = self
            .post_json(
                "/api/expenses",
                serde_json::json!({
                    "amount": amount,
                    "category": category,
                    "date": date,
                    "payment_method": payment_method,
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create expense failed: {}", body);

        let parsed: serde_json::Value = serde_json::from_str(&body).unwrap();
        parsed["id"].as_i64().expect("expense id in response")
    }

    /// Set a budget for the current month and return the response status.
    pub async fn set_budget(&mut self, category: &str, amount: f64) -> StatusCode {
        let (status, body) = self
            .post_json(
                "/api/budgets",
                serde_json::json!({ "category": category, "amount": amount }),
            )
            .await;
        assert!(
            status == StatusCode::CREATED || status == StatusCode::OK,
            "set budget failed: {}",
            body
        );
        status
    }
}

impl Default for TestClient {
    fn default() -> Self {
        Self::new()
    }
}

/// A date in the current server month, for tests that exercise the
/// "current month" paths (budgets, reports). Days above 28 are clamped so
/// the date is valid in every month.
pub fn current_month_date(day: u32) -> String {
    let today = chrono::Local::now().date_naive();
    format!("{:04}-{:02}-{:02}", today.year(), today.month(), day.min(28))
}
