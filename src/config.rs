use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_path: PathBuf,
    pub migrations_path: PathBuf,
    /// Secret used to sign session tokens.
    pub jwt_secret: String,
    /// Whether the session cookie is marked `Secure`. Disable only for
    /// plain-HTTP local development.
    pub cookie_secure: bool,
    /// Origin allowed to make credentialed cross-site requests.
    pub cors_origin: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let jwt_secret = match env::var("OUTLAY_JWT_SECRET") {
            Ok(secret) if !secret.is_empty() => secret,
            _ => panic!(
                "OUTLAY_JWT_SECRET environment variable is not set. Set it to a long \
                 random string; session tokens are signed with it."
            ),
        };

        Self {
            host: env::var("OUTLAY_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env::var("OUTLAY_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(7070),
            database_path: env::var("OUTLAY_DATABASE_URL")
                .map(|v| {
                    PathBuf::from(
                        v.strip_prefix("sqlite://")
                            .or_else(|| v.strip_prefix("sqlite:"))
                            .unwrap_or(&v),
                    )
                })
                .unwrap_or_else(|_| PathBuf::from("data/outlay.db")),
            migrations_path: env::var("OUTLAY_MIGRATIONS_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("migrations")),
            jwt_secret,
            cookie_secure: env::var("OUTLAY_COOKIE_SECURE")
                .map(|v| v != "false" && v != "0")
                .unwrap_or(true),
            cors_origin: env::var("OUTLAY_CORS_ORIGIN")
                .unwrap_or_else(|_| "http://localhost:5173".into()),
        }
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
