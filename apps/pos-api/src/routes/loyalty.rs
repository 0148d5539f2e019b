//! Loyalty program endpoints.
//!
//! Members are listed highest points first, matching the back-office
//! loyalty page. Point accrual happens automatically when a sale is
//! created with a `loyalty_customer_id`.
//!
//! # Endpoints
//!
//! - `GET  /v1/loyalty` - List members
//! - `POST /v1/loyalty` - Enroll a member

use axum::{extract::State, Json};
use chrono::Utc;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use whiz_core::types::{LoyaltyCustomer, LoyaltyTier};
use whiz_core::validation::validate_name;

use crate::app::AppState;
use crate::auth::AuthUser;
use crate::error::ApiResult;

/// Member enrollment request.
#[derive(Debug, Deserialize)]
pub struct EnrollRequest {
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
}

/// Lists loyalty members, highest points first.
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<LoyaltyCustomer>>> {
    let customers = state
        .db
        .loyalty()
        .list_for_business(&auth.business_id)
        .await?;
    Ok(Json(customers))
}

/// Enrolls a new loyalty member.
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<EnrollRequest>,
) -> ApiResult<Json<LoyaltyCustomer>> {
    validate_name("name", &req.name)?;

    let now = Utc::now();
    let customer = LoyaltyCustomer {
        id: Uuid::new_v4().to_string(),
        business_id: auth.business_id.clone(),
        name: req.name.trim().to_string(),
        phone: req.phone,
        email: req.email,
        points: 0,
        tier: LoyaltyTier::Bronze,
        total_spent_cents: 0,
        visits_count: 0,
        last_visit: None,
        created_at: now,
        updated_at: now,
    };

    state.db.loyalty().insert(&customer).await?;
    info!(customer_id = %customer.id, "Loyalty member enrolled");

    Ok(Json(customer))
}
