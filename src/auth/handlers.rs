// HTTP handlers for authentication endpoints

use axum::{extract::State, http::StatusCode, Json};
use validator::Validate;

use crate::auth::error::AuthError;
use crate::auth::middleware::AuthenticatedUser;
use crate::auth::models::{
    AccessTokenResponse, LoginRequest, RefreshRequest, RegisterRequest, TokenPairResponse,
    UserResponse,
};
use crate::AppState;

/// Register a new user
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Validation failure or email/username already taken", body = String, example = json!({"error": "Email already registered"}))
    ),
    tag = "auth"
)]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AuthError> {
    payload.validate()?;

    let user = state.auth.register(payload).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Login with email and password to receive a token pair
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token pair issued", body = TokenPairResponse),
        (status = 401, description = "Invalid credentials", body = String, example = json!({"error": "Incorrect email or password"})),
        (status = 400, description = "Inactive account", body = String, example = json!({"error": "Inactive user"}))
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<TokenPairResponse>, AuthError> {
    payload.validate()?;

    let tokens = state.auth.login(payload).await?;
    Ok(Json(tokens))
}

/// Get the authenticated user's profile
#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Missing, invalid, expired or wrong-type token", body = String, example = json!({"error": "Could not validate credentials"}))
    ),
    tag = "auth"
)]
pub async fn me(AuthenticatedUser(user): AuthenticatedUser) -> Json<UserResponse> {
    Json(user.into())
}

/// Exchange a refresh token for a new access token
#[utoipa::path(
    post,
    path = "/api/v1/auth/refresh",
    request_body = RefreshRequest,
    responses(
        (status = 200, description = "New access token", body = AccessTokenResponse),
        (status = 401, description = "Invalid, expired or wrong-type refresh token", body = String, example = json!({"error": "Invalid refresh token"}))
    ),
    tag = "auth"
)]
pub async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> Result<Json<AccessTokenResponse>, AuthError> {
    let tokens = state.auth.refresh(&payload.refresh_token).await?;
    Ok(Json(tokens))
}
