//! Authentication: JWT issuing/validation, password and PIN hashing,
//! and the request extractor that guards protected routes.
//!
//! ## Token Types
//! ```text
//! access  - short-lived, carries user id + business + role
//! refresh - long-lived, exchanged for new access tokens
//! device  - issued at device linking, carries device id + business
//! ```

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, TokenData, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use whiz_core::types::Role;

use crate::app::AppState;
use crate::error::ApiError;

// =============================================================================
// Claims
// =============================================================================

/// JWT claims structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user id, or device id for device tokens)
    pub sub: String,

    /// Business the subject belongs to
    pub business_id: String,

    /// Staff role (absent on device tokens)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration (Unix timestamp)
    pub exp: i64,

    /// JWT ID (unique identifier for this token)
    pub jti: String,

    /// Token type ("access", "refresh" or "device")
    pub token_type: String,
}

// =============================================================================
// JWT Manager
// =============================================================================

/// JWT token manager.
pub struct JwtManager {
    secret: String,
    access_lifetime_secs: i64,
    refresh_lifetime_secs: i64,
}

impl JwtManager {
    /// Create a new JWT manager.
    pub fn new(secret: String, access_lifetime_secs: i64, refresh_lifetime_secs: i64) -> Self {
        JwtManager {
            secret,
            access_lifetime_secs,
            refresh_lifetime_secs,
        }
    }

    fn generate(
        &self,
        sub: &str,
        business_id: &str,
        role: Option<Role>,
        token_type: &str,
        lifetime_secs: i64,
    ) -> Result<String, ApiError> {
        let now = Utc::now();
        let exp = now + Duration::seconds(lifetime_secs);

        let claims = Claims {
            sub: sub.to_string(),
            business_id: business_id.to_string(),
            role,
            iat: now.timestamp(),
            exp: exp.timestamp(),
            jti: Uuid::new_v4().to_string(),
            token_type: token_type.to_string(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| ApiError::Internal(format!("Failed to generate token: {e}")))
    }

    /// Generate an access token for a staff user.
    pub fn generate_access_token(
        &self,
        user_id: &str,
        business_id: &str,
        role: Role,
    ) -> Result<String, ApiError> {
        self.generate(
            user_id,
            business_id,
            Some(role),
            "access",
            self.access_lifetime_secs,
        )
    }

    /// Generate a refresh token for a staff user.
    pub fn generate_refresh_token(
        &self,
        user_id: &str,
        business_id: &str,
        role: Role,
    ) -> Result<String, ApiError> {
        self.generate(
            user_id,
            business_id,
            Some(role),
            "refresh",
            self.refresh_lifetime_secs,
        )
    }

    /// Generate a device token at linking time.
    ///
    /// Device tokens use the refresh lifetime: terminals stay linked
    /// for weeks, not hours.
    pub fn generate_device_token(
        &self,
        device_id: &str,
        business_id: &str,
    ) -> Result<String, ApiError> {
        self.generate(
            device_id,
            business_id,
            None,
            "device",
            self.refresh_lifetime_secs,
        )
    }

    /// Validate and decode a token of any type.
    pub fn validate_token(&self, token: &str) -> Result<Claims, ApiError> {
        let validation = Validation::default();

        let token_data: TokenData<Claims> = decode(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map_err(|e| ApiError::Unauthorized(format!("Invalid token: {e}")))?;

        Ok(token_data.claims)
    }

    /// Validate that a token is an access token.
    pub fn validate_access_token(&self, token: &str) -> Result<Claims, ApiError> {
        let claims = self.validate_token(token)?;

        if claims.token_type != "access" {
            return Err(ApiError::Unauthorized("Expected access token".to_string()));
        }

        Ok(claims)
    }

    /// Validate that a token is a refresh token.
    pub fn validate_refresh_token(&self, token: &str) -> Result<Claims, ApiError> {
        let claims = self.validate_token(token)?;

        if claims.token_type != "refresh" {
            return Err(ApiError::Unauthorized("Expected refresh token".to_string()));
        }

        Ok(claims)
    }

    /// Access-token lifetime in seconds, for login responses.
    pub fn access_lifetime_secs(&self) -> i64 {
        self.access_lifetime_secs
    }
}

/// Extract bearer token from an authorization header value.
pub fn extract_bearer_token(auth_header: &str) -> Option<&str> {
    auth_header.strip_prefix("Bearer ")
}

// =============================================================================
// Password / PIN Hashing
// =============================================================================

/// Hashes a password or PIN with Argon2id and a random salt.
///
/// Output is a PHC string carrying the algorithm, parameters, salt and
/// hash, so verification needs no extra bookkeeping.
pub fn hash_secret(secret: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(secret.as_bytes(), &salt)
        .map_err(|e| ApiError::Internal(format!("Failed to hash secret: {e}")))?;

    Ok(hash.to_string())
}

/// Verifies a password or PIN against its stored hash.
///
/// Returns false for both wrong secrets and malformed hashes; login
/// handlers treat either as invalid credentials.
pub fn verify_secret(secret: &str, stored_hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored_hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(secret.as_bytes(), &parsed)
        .is_ok()
}

// =============================================================================
// Request Extractor
// =============================================================================

/// Authenticated staff identity, extracted from the bearer token.
///
/// ## Usage
/// ```rust,ignore
/// pub async fn list_products(
///     State(state): State<AppState>,
///     auth: AuthUser,
/// ) -> ApiResult<Json<Vec<Product>>> {
///     let products = state.db.products().list_for_business(&auth.business_id).await?;
///     Ok(Json(products))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: String,
    pub business_id: String,
    pub role: Role,
}

impl AuthUser {
    /// Guards admin-only operations.
    pub fn require_admin(&self) -> Result<(), ApiError> {
        if self.role != Role::Admin {
            return Err(ApiError::Forbidden("Admin role required".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ApiError::Unauthorized("Missing authorization header".to_string()))?;

        let token = extract_bearer_token(header)
            .ok_or_else(|| ApiError::Unauthorized("Expected bearer token".to_string()))?;

        let claims = state.jwt.validate_access_token(token)?;

        let role = claims
            .role
            .ok_or_else(|| ApiError::Unauthorized("Token carries no role".to_string()))?;

        Ok(AuthUser {
            user_id: claims.sub,
            business_id: claims.business_id,
            role,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
