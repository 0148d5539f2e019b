//! Inventory log endpoint.
//!
//! # Endpoint
//!
//! - `GET /v1/inventory-logs?limit=` - Recent stock adjustments

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use whiz_core::types::InventoryLog;

use crate::app::AppState;
use crate::auth::AuthUser;
use crate::error::ApiResult;

/// List query parameters.
#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub limit: Option<i64>,
}

/// Lists recent stock adjustments, newest first.
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<Vec<InventoryLog>>> {
    let limit = params.limit.unwrap_or(50).clamp(1, 500);
    let logs = state
        .db
        .inventory()
        .list_for_business(&auth.business_id, limit)
        .await?;
    Ok(Json(logs))
}
