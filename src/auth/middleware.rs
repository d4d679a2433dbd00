// Authentication extractor for protected routes

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use crate::auth::error::AuthError;
use crate::auth::models::User;
use crate::AppState;

/// Authenticated user extractor for protected routes.
///
/// Pulls the bearer token from the Authorization header and resolves it
/// through the identity resolver held in application state.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let authorization = parts
            .headers
            .get(header::AUTHORIZATION)
            .ok_or(AuthError::MissingToken)?
            .to_str()
            .map_err(|_| AuthError::MissingToken)?;

        let user = state.identity.resolve(authorization).await?;

        Ok(AuthenticatedUser(user))
    }
}
