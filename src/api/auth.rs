//! Account endpoints: signup, login, token refresh, logout, profile.
//!
//! Token pairs follow the split contract: a short-lived signed access token
//! authorizes requests, an opaque refresh token (stored on the user row,
//! one active per user) only mints new pairs. Every login, signup, and
//! refresh rotates the stored refresh token.

use crate::auth::{AuthUser, generate_refresh_token, is_valid_email, password};
use crate::domain::{Role, UserPublic};
use crate::error::{ApiResult, AppError};
use crate::state::AppState;
use crate::store::users::{EMAIL_TAKEN, ProfilePatch};
use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

/// Signup payload.
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    /// Display name.
    pub name: String,
    /// Login email.
    pub email: String,
    /// Plain password, hashed before storage.
    pub password: String,
    /// Requested role; defaults to customer. Admin is not self-service.
    pub role: Option<Role>,
}

/// Login payload.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Login email.
    pub email: String,
    /// Plain password.
    pub password: String,
}

/// Refresh-exchange payload.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    /// The opaque refresh token handed out earlier.
    pub refresh_token: Option<String>,
}

/// Profile update payload; absent fields stay unchanged.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRequest {
    /// New display name.
    pub name: Option<String>,
    /// New email.
    pub email: Option<String>,
    /// New interests.
    pub interests: Option<Vec<String>>,
    /// New avatar URL.
    pub avatar_url: Option<String>,
}

/// Password change payload.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    /// Current password, verified before the change.
    pub current_password: String,
    /// Replacement password.
    pub new_password: String,
}

/// Token pair plus the account it belongs to.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    /// Signed access token.
    pub token: String,
    /// Opaque refresh token.
    pub refresh_token: String,
    /// The account.
    pub user: UserPublic,
}

/// Fresh token pair from a refresh exchange.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPairResponse {
    /// Signed access token.
    pub token: String,
    /// Rotated refresh token.
    pub refresh_token: String,
}

/// Wrapper for endpoints returning a single user.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    /// The account.
    pub user: UserPublic,
}

/// Plain confirmation message.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    /// Human-readable confirmation.
    pub message: String,
}

/// `POST /api/auth/signup`
///
/// # Errors
///
/// 400 on validation failures or a duplicate email.
pub async fn signup(
    State(state): State<AppState>,
    Json(body): Json<SignupRequest>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    if body.name.trim().is_empty() {
        return Err(AppError::bad_request("Name is required"));
    }
    if !is_valid_email(&body.email) {
        return Err(AppError::bad_request("A valid email is required"));
    }
    password::check_policy(&body.password)?;

    let role = match body.role {
        None => Role::Customer,
        Some(Role::Admin) => {
            return Err(AppError::bad_request("Admin accounts cannot be self-registered"));
        }
        Some(role) => role,
    };

    // Defensive check; the unique index on users.email is the real guard.
    if state.users.find_by_email(&body.email).await?.is_some() {
        return Err(AppError::conflict(EMAIL_TAKEN));
    }

    let password_hash = password::hash(body.password).await?;
    let user = state
        .users
        .create(body.name.trim(), &body.email, &password_hash, role)
        .await?;

    let token = state
        .tokens
        .issue_access_token(user.id, user.role, &user.name)
        .map_err(|_| AppError::internal(anyhow::anyhow!("token signing failed")))?;
    let refresh_token = generate_refresh_token();
    state
        .users
        .set_refresh_token(user.id, Some(&refresh_token))
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            refresh_token,
            user: user.into(),
        }),
    ))
}

/// `POST /api/auth/login`
///
/// # Errors
///
/// 400 on wrong credentials, 403 when the account is blocked — even with
/// the right password.
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let Some(user) = state.users.find_by_email(&body.email).await? else {
        return Err(AppError::bad_request("Invalid credentials"));
    };

    if user.is_blocked {
        return Err(AppError::forbidden("User is blocked"));
    }

    if !password::verify(body.password, user.password_hash.clone()).await? {
        return Err(AppError::bad_request("Invalid credentials"));
    }

    let token = state
        .tokens
        .issue_access_token(user.id, user.role, &user.name)
        .map_err(|_| AppError::internal(anyhow::anyhow!("token signing failed")))?;
    let refresh_token = generate_refresh_token();
    state
        .users
        .set_refresh_token(user.id, Some(&refresh_token))
        .await?;

    Ok(Json(AuthResponse {
        token,
        refresh_token,
        user: user.into(),
    }))
}

/// `POST /api/auth/refresh` — exchange a refresh token for a new pair.
///
/// # Errors
///
/// 400 without a token, 401 for an unknown one, 403 for a blocked account.
pub async fn refresh(
    State(state): State<AppState>,
    Json(body): Json<RefreshRequest>,
) -> ApiResult<Json<TokenPairResponse>> {
    let Some(refresh_token) = body.refresh_token.filter(|t| !t.is_empty()) else {
        return Err(AppError::bad_request("Refresh token is required"));
    };

    let Some(user) = state.users.find_by_refresh_token(&refresh_token).await? else {
        return Err(AppError::unauthorized("Invalid refresh token"));
    };

    if user.is_blocked {
        return Err(AppError::forbidden("User is blocked"));
    }

    let token = state
        .tokens
        .issue_access_token(user.id, user.role, &user.name)
        .map_err(|_| AppError::internal(anyhow::anyhow!("token signing failed")))?;
    let new_refresh_token = generate_refresh_token();
    state
        .users
        .set_refresh_token(user.id, Some(&new_refresh_token))
        .await?;

    Ok(Json(TokenPairResponse {
        token,
        refresh_token: new_refresh_token,
    }))
}

/// `POST /api/auth/logout` — invalidate the stored refresh token.
///
/// # Errors
///
/// 401 without a valid bearer token.
pub async fn logout(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<Json<MessageResponse>> {
    state.users.set_refresh_token(user.id, None).await?;
    Ok(Json(MessageResponse {
        message: "Logged out successfully".to_string(),
    }))
}

/// `GET /api/auth/me`
///
/// # Errors
///
/// 404 when the account behind the token no longer exists.
pub async fn me(State(state): State<AppState>, user: AuthUser) -> ApiResult<Json<UserResponse>> {
    let user = state
        .users
        .find_by_id(user.id)
        .await?
        .ok_or_else(|| AppError::not_found("User"))?;
    Ok(Json(UserResponse { user: user.into() }))
}

/// `PUT /api/auth/profile`
///
/// # Errors
///
/// 400 on an invalid or already-taken email, 404 for a vanished account.
pub async fn update_profile(
    State(state): State<AppState>,
    user: AuthUser,
    Json(body): Json<ProfileRequest>,
) -> ApiResult<Json<UserResponse>> {
    if let Some(email) = &body.email {
        if !is_valid_email(email) {
            return Err(AppError::bad_request("A valid email is required"));
        }
        // Defensive check; the unique index still backs this.
        if state.users.email_taken_by_other(email, user.id).await? {
            return Err(AppError::conflict(EMAIL_TAKEN));
        }
    }

    let patch = ProfilePatch {
        name: body.name,
        email: body.email,
        interests: body.interests,
        avatar_url: body.avatar_url,
    };
    let user = state
        .users
        .update_profile(user.id, patch)
        .await?
        .ok_or_else(|| AppError::not_found("User"))?;
    Ok(Json(UserResponse { user: user.into() }))
}

/// `PUT /api/auth/change-password`
///
/// # Errors
///
/// 400 when the current password is wrong or the new one violates policy.
pub async fn change_password(
    State(state): State<AppState>,
    user: AuthUser,
    Json(body): Json<ChangePasswordRequest>,
) -> ApiResult<Json<MessageResponse>> {
    let account = state
        .users
        .find_by_id(user.id)
        .await?
        .ok_or_else(|| AppError::not_found("User"))?;

    if !password::verify(body.current_password, account.password_hash).await? {
        return Err(AppError::bad_request("Current password is incorrect"));
    }
    password::check_policy(&body.new_password)?;

    let new_hash = password::hash(body.new_password).await?;
    state.users.set_password_hash(user.id, &new_hash).await?;

    Ok(Json(MessageResponse {
        message: "Password updated successfully".to_string(),
    }))
}
