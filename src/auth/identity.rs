// Resolves bearer credentials to live user accounts

use std::sync::Arc;

use crate::auth::error::AuthError;
use crate::auth::models::User;
use crate::auth::repository::UserStore;
use crate::auth::token::{TokenService, TokenType};

/// Maps a presented bearer token to the account it authenticates.
///
/// Resolution is read-only. A bad token, a wrong-type token and a token whose
/// subject no longer exists all fail with errors that render identically
/// (one generic 401), so callers cannot probe which accounts exist. A
/// cryptographically valid token for a disabled account fails distinctly.
#[derive(Clone)]
pub struct IdentityResolver {
    tokens: TokenService,
    users: Arc<dyn UserStore>,
}

impl IdentityResolver {
    pub fn new(tokens: TokenService, users: Arc<dyn UserStore>) -> Self {
        Self { tokens, users }
    }

    /// Resolve an Authorization header value ("Bearer <token>").
    pub async fn resolve(&self, authorization: &str) -> Result<User, AuthError> {
        let token = authorization
            .strip_prefix("Bearer ")
            .ok_or(AuthError::MissingToken)?;

        self.resolve_token(token).await
    }

    /// Resolve a raw access token.
    pub async fn resolve_token(&self, token: &str) -> Result<User, AuthError> {
        let claims = self.tokens.validate(token)?;

        // Only access tokens authenticate requests; a refresh token presented
        // as a bearer credential is rejected
        if claims.token_type != TokenType::Access {
            return Err(AuthError::WrongTokenType);
        }

        let user = self
            .users
            .find_by_id(claims.sub)
            .await?
            .ok_or(AuthError::UnknownSubject)?;

        if !user.is_active {
            return Err(AuthError::InactiveAccount);
        }

        Ok(user)
    }
}
