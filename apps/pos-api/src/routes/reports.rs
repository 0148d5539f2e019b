//! Daily closing report endpoint.
//!
//! # Endpoint
//!
//! ```text
//! GET /v1/reports/closing?date=2026-08-06&detailed=true
//! ```
//!
//! Aggregates the day's completed sales per cashier (items sold plus
//! cash/M-Pesa/credit splits), renders the closing report document,
//! writes it to the document store, and returns it.

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{Days, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use whiz_core::money::Money;
use whiz_docs::{render_closing_report, CashierReport, ClosingReport, ItemSale, TemplateKind};

use crate::app::AppState;
use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};

/// Closing report query parameters.
#[derive(Debug, Deserialize)]
pub struct ClosingParams {
    /// Day to report on (YYYY-MM-DD), defaults to today.
    pub date: Option<NaiveDate>,

    /// Include item tables (defaults to true).
    pub detailed: Option<bool>,
}

/// Closing report response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ClosingResponse {
    pub date: NaiveDate,
    pub total_cash_cents: i64,
    pub total_mpesa_cents: i64,
    pub total_credit_cents: i64,
    pub grand_total_cents: i64,
    pub path: String,
    pub html: String,
}

/// Renders the daily closing report.
pub async fn closing(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<ClosingParams>,
) -> ApiResult<Json<ClosingResponse>> {
    let date = params.date.unwrap_or_else(|| Utc::now().date_naive());
    let detailed = params.detailed.unwrap_or(true);

    let start = Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN));
    let end = Utc.from_utc_datetime(&(date + Days::new(1)).and_time(NaiveTime::MIN));

    let business = state
        .db
        .businesses()
        .get_by_id(&auth.business_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Business not found: {}", auth.business_id)))?;

    let txns = state.db.transactions();
    let item_rows = txns.day_item_sales(&auth.business_id, start, end).await?;
    let cashier_item_rows = txns.day_cashier_items(&auth.business_id, start, end).await?;
    let payment_rows = txns
        .day_cashier_payments(&auth.business_id, start, end)
        .await?;

    // Assemble cashier sections in first-seen order: every cashier who
    // sold an item or took a payment gets a section.
    let mut cashiers: Vec<CashierReport> = Vec::new();

    let mut section_for = |name: &str, cashiers: &mut Vec<CashierReport>| -> usize {
        match cashiers.iter().position(|c| c.cashier_name == name) {
            Some(idx) => idx,
            None => {
                cashiers.push(CashierReport {
                    cashier_name: name.to_string(),
                    items: Vec::new(),
                    cash_total: Money::zero(),
                    mpesa_total: Money::zero(),
                    credit_total: Money::zero(),
                });
                cashiers.len() - 1
            }
        }
    };

    for row in &cashier_item_rows {
        let idx = section_for(&row.cashier_name, &mut cashiers);
        cashiers[idx].items.push(ItemSale {
            name: row.name.clone(),
            quantity: row.quantity,
            total: Money::from_cents(row.total_cents),
        });
    }

    for row in &payment_rows {
        let idx = section_for(&row.cashier_name, &mut cashiers);
        let total = Money::from_cents(row.total_cents);
        match row.method.as_str() {
            "cash" => cashiers[idx].cash_total += total,
            "mpesa" => cashiers[idx].mpesa_total += total,
            "credit" => cashiers[idx].credit_total += total,
            // Unknown methods cannot occur with the schema CHECK; fold
            // anything unexpected into cash rather than dropping money
            _ => cashiers[idx].cash_total += total,
        }
    }

    let report = ClosingReport {
        date,
        item_sales: item_rows
            .into_iter()
            .map(|r| ItemSale {
                name: r.name,
                quantity: r.quantity,
                total: Money::from_cents(r.total_cents),
            })
            .collect(),
        cashiers,
    };

    let template = state.docs.template(TemplateKind::ClosingReport)?;
    let html = render_closing_report(&template, &report, &business.receipt_profile(), detailed)?;
    let path = state
        .docs
        .write_document(&format!("closing-report-{date}.html"), &html)?;

    info!(%date, path = %path.display(), "Closing report generated");

    Ok(Json(ClosingResponse {
        date,
        total_cash_cents: report.total_cash().cents(),
        total_mpesa_cents: report.total_mpesa().cents(),
        total_credit_cents: report.total_credit().cents(),
        grand_total_cents: report.grand_total().cents(),
        path: path.display().to_string(),
        html,
    }))
}
