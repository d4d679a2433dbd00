// Application configuration collected once at startup
// Every component receives the values it needs explicitly; nothing reads the
// environment after main() has run.

use chrono::Duration;

/// Top-level application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub auth: AuthConfig,
}

/// Configuration for token signing and password-based authentication.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// HMAC secret used to sign and verify tokens.
    pub jwt_secret: String,
    /// Access token lifetime in minutes.
    pub access_token_expire_minutes: i64,
}

impl AuthConfig {
    pub fn access_token_ttl(&self) -> Duration {
        Duration::minutes(self.access_token_expire_minutes)
    }
}

/// Errors produced while reading configuration from the environment.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("invalid value for environment variable: {0}")]
    Invalid(&'static str),
}

impl AppConfig {
    /// Collect configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let database_url =
            std::env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL"))?;

        let jwt_secret =
            std::env::var("JWT_SECRET").map_err(|_| ConfigError::Missing("JWT_SECRET"))?;

        let access_token_expire_minutes = match std::env::var("ACCESS_TOKEN_EXPIRE_MINUTES") {
            Ok(value) => value
                .parse::<i64>()
                .map_err(|_| ConfigError::Invalid("ACCESS_TOKEN_EXPIRE_MINUTES"))?,
            Err(_) => 30,
        };

        Ok(Self {
            host,
            port,
            database_url,
            auth: AuthConfig {
                jwt_secret,
                access_token_expire_minutes,
            },
        })
    }
}
