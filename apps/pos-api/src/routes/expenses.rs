//! Expense endpoints.
//!
//! # Endpoints
//!
//! - `GET  /v1/expenses?limit=` - Recent expenses
//! - `POST /v1/expenses` - Record an expense

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use whiz_core::types::Expense;
use whiz_core::validation::validate_amount_cents;

use crate::app::AppState;
use crate::auth::AuthUser;
use crate::error::ApiResult;

/// Expense creation request.
#[derive(Debug, Deserialize)]
pub struct CreateExpenseRequest {
    pub description: String,
    pub amount_cents: i64,
    pub category: Option<String>,
    pub supplier_id: Option<String>,
}

/// List query parameters.
#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub limit: Option<i64>,
}

/// Lists recent expenses.
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<Vec<Expense>>> {
    let limit = params.limit.unwrap_or(50).clamp(1, 500);
    let expenses = state
        .db
        .expenses()
        .list_for_business(&auth.business_id, limit)
        .await?;
    Ok(Json(expenses))
}

/// Records an expense.
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateExpenseRequest>,
) -> ApiResult<Json<Expense>> {
    validate_amount_cents("amount", req.amount_cents)?;

    // Denormalize the supplier name for display, like the desktop app
    let supplier_name = match &req.supplier_id {
        Some(id) => state.db.suppliers().get_by_id(id).await?.map(|s| s.name),
        None => None,
    };

    let recorded_by = state
        .db
        .users()
        .get_by_id(&auth.user_id)
        .await?
        .map(|u| u.name);

    let expense = Expense {
        id: Uuid::new_v4().to_string(),
        business_id: auth.business_id.clone(),
        description: req.description.trim().to_string(),
        amount_cents: req.amount_cents,
        category: req.category,
        supplier_id: req.supplier_id,
        supplier_name,
        recorded_by,
        created_at: Utc::now(),
    };

    state.db.expenses().insert(&expense).await?;
    info!(expense_id = %expense.id, amount = expense.amount_cents, "Expense recorded");

    Ok(Json(expense))
}
