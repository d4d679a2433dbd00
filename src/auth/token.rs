// JWT token generation and validation service

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::error::AuthError;
use crate::config::AuthConfig;

/// Refresh token lifetime: 7 days, fixed. Refresh tokens are only issued at
/// login and their lifetime is not caller-overridable.
pub const REFRESH_TOKEN_TTL_SECS: i64 = 7 * 24 * 60 * 60;

/// Discriminates access tokens from refresh tokens. The tag is fixed at
/// issuance; type-sensitive callers re-check it on every validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

/// JWT claims structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user id this token authenticates.
    pub sub: Uuid,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiry timestamp (seconds since epoch). `exp <= now` is expired.
    pub exp: i64,
    #[serde(rename = "type")]
    pub token_type: TokenType,
}

/// Validation failures for presented tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("token is malformed")]
    Malformed,

    #[error("token signature is invalid")]
    BadSignature,

    #[error("token has expired")]
    Expired,
}

/// Token service for JWT operations.
///
/// Holds the signing key material and the configured access-token lifetime.
/// Stateless otherwise: issuing and validating are pure functions of the
/// secret and the clock, and validation performs no I/O.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_token_ttl: Duration,
}

impl TokenService {
    /// Create a new TokenService from the auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            access_token_ttl: config.access_token_ttl(),
        }
    }

    /// Issue an access token with the configured lifetime.
    pub fn issue_access(&self, subject: Uuid) -> Result<String, AuthError> {
        self.issue_access_with_ttl(subject, self.access_token_ttl)
    }

    /// Issue an access token with a caller-chosen lifetime.
    pub fn issue_access_with_ttl(&self, subject: Uuid, ttl: Duration) -> Result<String, AuthError> {
        self.issue(subject, ttl, TokenType::Access)
    }

    /// Issue a refresh token (7-day lifetime, not overridable).
    pub fn issue_refresh(&self, subject: Uuid) -> Result<String, AuthError> {
        self.issue(
            subject,
            Duration::seconds(REFRESH_TOKEN_TTL_SECS),
            TokenType::Refresh,
        )
    }

    fn issue(&self, subject: Uuid, ttl: Duration, token_type: TokenType) -> Result<String, AuthError> {
        let now = Utc::now().timestamp();

        let claims = Claims {
            sub: subject,
            iat: now,
            exp: now + ttl.num_seconds(),
            token_type,
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AuthError::TokenCreation(e.to_string()))
    }

    /// Validate a presented token and return its claims.
    ///
    /// The declared algorithm must be HS256; anything else, including `none`,
    /// is rejected. Expiry is strict: a token whose `exp` equals the current
    /// second is already expired. Token type is NOT checked here; callers
    /// that care about access-vs-refresh semantics check the returned claims.
    pub fn validate(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        // The library default allows 60s of expiry leeway; expiry is instead
        // checked strictly against the clock below.
        validation.validate_exp = false;

        let claims = decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature
                | ErrorKind::InvalidAlgorithm
                | ErrorKind::InvalidAlgorithmName => TokenError::BadSignature,
                _ => TokenError::Malformed,
            })?;

        if claims.exp <= Utc::now().timestamp() {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }
}
