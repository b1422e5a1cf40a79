//! Authentication middleware and handlers.
//!
//! Registration stores an Argon2 hashed password; login verifies it and
//! issues an HS256-signed session token delivered in an http-only cookie.
//! Tokens carry the user id and expire after 24 hours; the middleware
//! validates them on every protected request before any business logic
//! runs and attaches the authenticated user id to the request.

use std::sync::OnceLock;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use axum::body::Body;
use axum::extract::{FromRequestParts, State};
use axum::http::request::Parts;
use axum::http::{Request, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use regex::Regex;
use serde::{Deserialize, Serialize};
use tower_cookies::cookie::time::Duration;
use tower_cookies::cookie::SameSite;
use tower_cookies::{Cookie, Cookies};
use uuid::Uuid;

use crate::db::queries::users;
use crate::error::{AppError, AppResult};
use crate::models::UserIdentity;
use crate::state::AppState;

/// Cookie name for the session token.
const SESSION_COOKIE: &str = "token";

/// Session lifetime; both the token `exp` claim and the cookie Max-Age.
const SESSION_TTL_HOURS: i64 = 24;

/// Routes reachable without a session.
const PUBLIC_PATHS: &[&str] = &[
    "/api/auth/register",
    "/api/auth/login",
    "/api/auth/logout",
    "/api/auth/usercount",
    "/health",
];

/// The authenticated user id, inserted by [`auth_middleware`] and read by
/// handlers through the extractor impl. Passing it explicitly keeps
/// handlers free of ambient session state.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub user_id: i64,
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .copied()
            .ok_or_else(|| AppError::Unauthorized("Authentication required".into()))
    }
}

/// Claims carried by a session token.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: i64,
    iat: i64,
    exp: i64,
    jti: String,
}

fn create_session_token(user_id: i64, secret: &str) -> AppResult<String> {
    let now = Utc::now().timestamp();
    let claims = Claims {
        sub: user_id,
        iat: now,
        exp: now + SESSION_TTL_HOURS * 3600,
        jti: Uuid::new_v4().to_string(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("Failed to sign session token: {}", e)))
}

/// Returns the user id for a valid, unexpired token.
fn validate_session_token(token: &str, secret: &str) -> Option<i64> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims.sub)
    .ok()
}

/// Authentication middleware: everything outside [`PUBLIC_PATHS`] requires
/// a valid session cookie, rejected with 401 before reaching a handler.
pub async fn auth_middleware(
    State(state): State<AppState>,
    cookies: Cookies,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let path = request.uri().path();
    if PUBLIC_PATHS.contains(&path) {
        return next.run(request).await;
    }

    if let Some(session_cookie) = cookies.get(SESSION_COOKIE) {
        if let Some(user_id) =
            validate_session_token(session_cookie.value(), &state.config.jwt_secret)
        {
            request.extensions_mut().insert(AuthUser { user_id });
            return next.run(request).await;
        }
    }

    AppError::Unauthorized("Authentication required".into()).into_response()
}

#[derive(Debug, Deserialize)]
pub struct RegisterPayload {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginPayload {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct UserCount {
    pub count: i64,
}

fn is_valid_email(email: &str) -> bool {
    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("email regex compiles")
    });
    regex.is_match(email)
}

/// Create a new user account.
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterPayload>,
) -> AppResult<(StatusCode, Json<UserIdentity>)> {
    let name = payload.name.trim();
    if name.is_empty() {
        return Err(AppError::Validation("Name is required".into()));
    }

    let email = payload.email.trim();
    if !is_valid_email(email) {
        return Err(AppError::Validation("Invalid email address".into()));
    }

    if payload.password.len() < 8 {
        return Err(AppError::Validation(
            "Password must be at least 8 characters long".into(),
        ));
    }

    let conn = state.db.get()?;
    if users::get_user_by_email(&conn, email)?.is_some() {
        return Err(AppError::Validation("User already exists".into()));
    }

    let password_hash = hash_password(&payload.password)?;
    let user = users::create_user(&conn, name, email, &password_hash)?;
    tracing::info!(user_id = user.id, "Registered user");

    Ok((StatusCode::CREATED, Json(user.into())))
}

/// Verify credentials and issue the session cookie.
///
/// Unknown email and wrong password produce the same response, so a login
/// attempt cannot probe which addresses are registered.
pub async fn login(
    State(state): State<AppState>,
    cookies: Cookies,
    Json(payload): Json<LoginPayload>,
) -> AppResult<Json<UserIdentity>> {
    let conn = state.db.get()?;

    let user = users::get_user_by_email(&conn, payload.email.trim())?
        .ok_or_else(|| AppError::Unauthorized("Invalid credentials".into()))?;

    if !verify_password(&payload.password, &user.password_hash) {
        return Err(AppError::Unauthorized("Invalid credentials".into()));
    }

    let token = create_session_token(user.id, &state.config.jwt_secret)?;

    // SameSite=None so a browser client on the configured CORS origin can
    // send the cookie cross-site.
    let cookie = Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .secure(state.config.cookie_secure)
        .same_site(SameSite::None)
        .max_age(Duration::hours(SESSION_TTL_HOURS))
        .build();
    cookies.add(cookie);

    tracing::info!(user_id = user.id, "User logged in");
    Ok(Json(user.into()))
}

/// Clear the session cookie.
pub async fn logout(cookies: Cookies) -> StatusCode {
    let cookie = Cookie::build((SESSION_COOKIE, ""))
        .path("/")
        .http_only(true)
        .build();
    cookies.remove(cookie);

    StatusCode::NO_CONTENT
}

pub async fn user_count(State(state): State<AppState>) -> AppResult<Json<UserCount>> {
    let conn = state.db.get()?;
    let count = users::count_users(&conn)?;
    Ok(Json(UserCount { count }))
}

fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
}

/// Verify a password against an Argon2 hash.
fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed_hash) = PasswordHash::new(hash) else {
        tracing::error!("Invalid password hash in users table");
        return false;
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn token_round_trip() {
        let token = create_session_token(42, SECRET).unwrap();
        assert_eq!(validate_session_token(&token, SECRET), Some(42));
    }

    #[test]
    fn token_rejected_with_wrong_secret() {
        let token = create_session_token(42, SECRET).unwrap();
        assert_eq!(validate_session_token(&token, "other-secret"), None);
    }

    #[test]
    fn expired_token_rejected() {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: 42,
            iat: now - 7200,
            // well past the default validation leeway
            exp: now - 3600,
            jti: Uuid::new_v4().to_string(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert_eq!(validate_session_token(&token, SECRET), None);
    }

    #[test]
    fn garbage_token_rejected() {
        assert_eq!(validate_session_token("not-a-token", SECRET), None);
    }

    #[test]
    fn password_hash_round_trip() {
        let hash = hash_password("hunter2hunter2").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("hunter2hunter2", &hash));
        assert!(!verify_password("wrong", &hash));
    }

    #[test]
    fn email_validation() {
        assert!(is_valid_email("user@example.com"));
        assert!(is_valid_email("first.last+tag@sub.example.co"));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("missing@tld"));
        assert!(!is_valid_email(""));
    }
}
