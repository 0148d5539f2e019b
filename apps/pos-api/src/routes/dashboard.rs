//! Dashboard endpoints: headline statistics and the period-bucketed
//! sales chart series.
//!
//! # Endpoints
//!
//! - `GET /v1/dashboard` - Totals, counts, and recent transactions
//! - `GET /v1/dashboard/sales-series?period=today|week|month|year`

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use whiz_core::reporting::{bucket_sales, ReportPeriod, SalesSeries};
use whiz_core::types::Transaction;
use whiz_db::DashboardStats;

use crate::app::AppState;
use crate::auth::AuthUser;
use crate::error::ApiResult;

/// Number of recent transactions shown on the dashboard.
const RECENT_LIMIT: i64 = 5;

/// Dashboard response.
#[derive(Debug, Serialize, Deserialize)]
pub struct DashboardResponse {
    pub stats: DashboardStats,
    pub recent_transactions: Vec<Transaction>,
}

/// Sales series query parameters.
#[derive(Debug, Deserialize)]
pub struct SeriesParams {
    pub period: Option<ReportPeriod>,
}

/// Headline statistics plus the most recent transactions.
pub async fn index(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<DashboardResponse>> {
    let stats = state
        .db
        .transactions()
        .dashboard_stats(&auth.business_id)
        .await?;

    let recent_transactions = state
        .db
        .transactions()
        .list_recent(&auth.business_id, RECENT_LIMIT)
        .await?;

    Ok(Json(DashboardResponse {
        stats,
        recent_transactions,
    }))
}

/// Period-bucketed sales series for the dashboard chart.
///
/// Fixed bucket counts per period (24/7/30/12); empty buckets are
/// zero-filled and buckets past "now" appear as zeros.
pub async fn sales_series(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<SeriesParams>,
) -> ApiResult<Json<SalesSeries>> {
    let period = params.period.unwrap_or_default();
    let now = Utc::now();

    let totals = state
        .db
        .transactions()
        .totals_between(
            &auth.business_id,
            period.window_start(now),
            period.window_end(now),
        )
        .await?;

    Ok(Json(bucket_sales(period, now, &totals)))
}
