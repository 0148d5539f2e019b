//! Authentication endpoints.
//!
//! Staff log in with email plus either their password or their till
//! PIN; both paths issue the same access/refresh token pair.
//!
//! # Endpoints
//!
//! - `POST /v1/auth/login` - Email + password
//! - `POST /v1/auth/login-pin` - Email + PIN
//! - `POST /v1/auth/refresh` - Refresh access token

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use whiz_core::types::{Role, User};

use crate::app::AppState;
use crate::auth::verify_secret;
use crate::error::{ApiError, ApiResult};

/// Password login request.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// PIN login request.
#[derive(Debug, Deserialize)]
pub struct PinLoginRequest {
    pub email: String,
    pub pin: String,
}

/// Login response, shared by both login paths.
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub user_id: String,
    pub business_id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
}

/// Refresh token request.
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Refresh token response.
#[derive(Debug, Serialize, Deserialize)]
pub struct RefreshResponse {
    pub access_token: String,
    pub expires_in: i64,
}

fn issue_tokens(state: &AppState, user: &User) -> ApiResult<LoginResponse> {
    let access_token =
        state
            .jwt
            .generate_access_token(&user.id, &user.business_id, user.role)?;
    let refresh_token =
        state
            .jwt
            .generate_refresh_token(&user.id, &user.business_id, user.role)?;

    Ok(LoginResponse {
        user_id: user.id.clone(),
        business_id: user.business_id.clone(),
        name: user.name.clone(),
        email: user.email.clone(),
        role: user.role,
        access_token,
        refresh_token,
        expires_in: state.jwt.access_lifetime_secs(),
    })
}

/// Login with email and password.
///
/// # Errors
///
/// - `401 Unauthorized`: unknown email, wrong password, or PIN-only user
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let user = state
        .db
        .users()
        .get_by_email(&req.email)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid email or password".to_string()))?;

    // PIN-only users have no password hash
    let valid = user
        .password_hash
        .as_deref()
        .map(|hash| verify_secret(&req.password, hash))
        .unwrap_or(false);

    if !valid {
        return Err(ApiError::Unauthorized(
            "Invalid email or password".to_string(),
        ));
    }

    info!(user_id = %user.id, "Password login");
    Ok(Json(issue_tokens(&state, &user)?))
}

/// Login with email and PIN.
///
/// # Errors
///
/// - `401 Unauthorized`: unknown email or wrong PIN
pub async fn login_pin(
    State(state): State<AppState>,
    Json(req): Json<PinLoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let user = state
        .db
        .users()
        .get_by_email(&req.email)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid email or PIN".to_string()))?;

    if !verify_secret(&req.pin, &user.pin_hash) {
        return Err(ApiError::Unauthorized("Invalid email or PIN".to_string()));
    }

    info!(user_id = %user.id, "PIN login");
    Ok(Json(issue_tokens(&state, &user)?))
}

/// Exchange a refresh token for a new access token.
pub async fn refresh(
    State(state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> ApiResult<Json<RefreshResponse>> {
    let claims = state.jwt.validate_refresh_token(&req.refresh_token)?;

    let role = claims
        .role
        .ok_or_else(|| ApiError::Unauthorized("Token carries no role".to_string()))?;

    let access_token = state
        .jwt
        .generate_access_token(&claims.sub, &claims.business_id, role)?;

    Ok(Json(RefreshResponse {
        access_token,
        expires_in: state.jwt.access_lifetime_secs(),
    }))
}
