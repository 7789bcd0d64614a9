//! User registration, login and profile updates

use std::sync::Arc;

use axum::{Json, extract::State};
use validator::Validate;

use super::super::state::AppState;
use super::super::types::{
    ApiError, ApiResult, CreateUserRequest, LoginUserRequest, LoginUserResponse,
    UpdateUserRequest, UserResponse, ok,
};
use crate::auth::{
    AuthError, AuthErrorCode, AuthenticatedUser, PasswordError, check_password, hash_password,
};
use crate::store::{CreateUserParams, UpdateUserParams};

/// Register a new user
///
/// POST /api/v1/users
#[utoipa::path(
    post,
    path = "/api/v1/users",
    request_body = CreateUserRequest,
    responses(
        (status = 200, description = "User created", body = UserResponse),
        (status = 400, description = "Invalid parameters"),
        (status = 403, description = "Username or email already taken")
    ),
    tag = "Users"
)]
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateUserRequest>,
) -> ApiResult<UserResponse> {
    req.validate()?;

    let hashed_password = hash_password(&req.password).map_err(|e| {
        tracing::error!(error = %e, "Password hashing failed");
        ApiError::internal("failed to create user")
    })?;

    let user = state
        .store
        .create_user(CreateUserParams {
            username: req.username,
            hashed_password,
            full_name: req.full_name,
            email: req.email,
        })
        .await?;

    tracing::info!(username = %user.username, "User created");
    ok(user.into())
}

/// Log in and obtain an access token
///
/// POST /api/v1/users/login
#[utoipa::path(
    post,
    path = "/api/v1/users/login",
    request_body = LoginUserRequest,
    responses(
        (status = 200, description = "Access token issued", body = LoginUserResponse),
        (status = 400, description = "Invalid parameters"),
        (status = 401, description = "Wrong password"),
        (status = 404, description = "Unknown user")
    ),
    tag = "Users"
)]
pub async fn login_user(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginUserRequest>,
) -> ApiResult<LoginUserResponse> {
    req.validate()?;

    let user = state.store.get_user(&req.username).await?;

    check_password(&req.password, &user.hashed_password).map_err(|e| match e {
        PasswordError::Mismatch => {
            tracing::debug!(username = %req.username, "Login rejected");
            ApiError::from(AuthError::from_code(AuthErrorCode::InvalidCredentials))
        }
        PasswordError::Hash(msg) => {
            tracing::error!(username = %req.username, error = %msg, "Stored password hash unreadable");
            ApiError::internal("login failed")
        }
    })?;

    let (access_token, payload) = state
        .token_maker
        .create_token(&user.username, state.access_token_duration)
        .map_err(|e| {
            tracing::error!(error = %e, "Token issue failed");
            ApiError::internal("login failed")
        })?;

    tracing::info!(username = %user.username, token_id = %payload.id, "User logged in");
    ok(LoginUserResponse {
        access_token,
        access_token_expires_at: payload.expired_at,
        user: user.into(),
    })
}

/// Update the caller's own profile
///
/// PATCH /api/v1/users
///
/// The username comes from the access token, so a caller can only change
/// their own record. A new password moves `password_changed_at`.
#[utoipa::path(
    patch,
    path = "/api/v1/users",
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 400, description = "Invalid parameters"),
        (status = 401, description = "Authentication failed"),
        (status = 403, description = "Email already taken"),
        (status = 404, description = "User no longer exists")
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn update_user(
    State(state): State<Arc<AppState>>,
    user: AuthenticatedUser,
    Json(req): Json<UpdateUserRequest>,
) -> ApiResult<UserResponse> {
    req.validate()?;

    let hashed_password = match req.password.as_deref() {
        Some(password) => Some(hash_password(password).map_err(|e| {
            tracing::error!(error = %e, "Password hashing failed");
            ApiError::internal("failed to update user")
        })?),
        None => None,
    };
    let password_changed = hashed_password.is_some();

    let updated = state
        .store
        .update_user(UpdateUserParams {
            username: user.username,
            full_name: req.full_name,
            email: req.email,
            hashed_password,
        })
        .await?;

    tracing::info!(username = %updated.username, password_changed, "User updated");
    ok(updated.into())
}
