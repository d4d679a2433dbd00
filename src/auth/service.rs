// Authentication service - business logic layer

use std::sync::Arc;

use tracing::info;

use crate::auth::error::AuthError;
use crate::auth::models::{
    AccessTokenResponse, LoginRequest, RegisterRequest, TokenPairResponse, UserResponse,
};
use crate::auth::password::PasswordHasher;
use crate::auth::repository::UserStore;
use crate::auth::token::{TokenService, TokenType};

/// Authentication service coordinating registration, login and token refresh.
///
/// Argon2 work is pushed onto the blocking thread pool so the CPU-heavy
/// hashing never stalls the async request executor.
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    hasher: PasswordHasher,
    tokens: TokenService,
}

impl AuthService {
    /// Create a new AuthService
    pub fn new(users: Arc<dyn UserStore>, hasher: PasswordHasher, tokens: TokenService) -> Self {
        Self {
            users,
            hasher,
            tokens,
        }
    }

    /// Register a new user.
    ///
    /// Duplicate checks name the offending field; the unique constraints in
    /// the store remain the backstop for races between check and insert.
    pub async fn register(&self, request: RegisterRequest) -> Result<UserResponse, AuthError> {
        if self.users.find_by_email(&request.email).await?.is_some() {
            return Err(AuthError::EmailTaken);
        }
        if self
            .users
            .find_by_username(&request.username)
            .await?
            .is_some()
        {
            return Err(AuthError::UsernameTaken);
        }

        let hasher = self.hasher.clone();
        let password = request.password;
        let password_hash = tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|_| AuthError::PasswordHash)??;

        let user = self
            .users
            .create(&request.email, &request.username, &password_hash)
            .await?;

        info!("Registered new user with id: {}", user.id);
        Ok(user.into())
    }

    /// Login with email and password, returning an access/refresh token pair.
    ///
    /// Unknown email and wrong password are indistinguishable to the caller.
    pub async fn login(&self, request: LoginRequest) -> Result<TokenPairResponse, AuthError> {
        let user = self
            .users
            .find_by_email(&request.email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let hasher = self.hasher.clone();
        let password = request.password;
        let stored_hash = user.password_hash.clone();
        let verified = tokio::task::spawn_blocking(move || hasher.verify(&password, &stored_hash))
            .await
            .map_err(|_| AuthError::PasswordHash)?;

        if !verified {
            return Err(AuthError::InvalidCredentials);
        }

        // Checked after password verification: a wrong password on a disabled
        // account still reports invalid credentials, not account state
        if !user.is_active {
            return Err(AuthError::InactiveAccount);
        }

        let access_token = self.tokens.issue_access(user.id)?;
        let refresh_token = self.tokens.issue_refresh(user.id)?;

        info!("Issued token pair for user: {}", user.id);
        Ok(TokenPairResponse {
            access_token,
            refresh_token,
            token_type: "bearer".to_string(),
        })
    }

    /// Exchange a refresh token for a new access token.
    ///
    /// Any failure (bad signature, expired, wrong type, unresolvable or
    /// inactive subject) collapses to the same invalid-refresh error.
    pub async fn refresh(&self, refresh_token: &str) -> Result<AccessTokenResponse, AuthError> {
        let claims = self
            .tokens
            .validate(refresh_token)
            .map_err(|_| AuthError::InvalidRefreshToken)?;

        if claims.token_type != TokenType::Refresh {
            return Err(AuthError::InvalidRefreshToken);
        }

        // The subject must still resolve to a live, active account before a
        // new access token is minted
        let user = self
            .users
            .find_by_id(claims.sub)
            .await?
            .ok_or(AuthError::InvalidRefreshToken)?;

        if !user.is_active {
            return Err(AuthError::InvalidRefreshToken);
        }

        let access_token = self.tokens.issue_access(user.id)?;

        Ok(AccessTokenResponse {
            access_token,
            token_type: "bearer".to_string(),
        })
    }
}
