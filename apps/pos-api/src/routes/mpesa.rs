//! M-Pesa endpoints.
//!
//! # Endpoints
//!
//! - `POST /v1/mpesa/stk-push` - Prompt a customer's phone for payment
//! - `GET  /v1/mpesa/status/:checkout_request_id` - Query an STK push
//! - `POST /v1/mpesa/callback` - Daraja result callback (public)
//!
//! All three return 503 when M-Pesa credentials are not configured,
//! except the callback, which is always acknowledged.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::info;

use whiz_core::validation::{validate_amount_cents, validate_phone_number};

use crate::app::AppState;
use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::mpesa::DarajaClient;

/// STK push request.
#[derive(Debug, Deserialize)]
pub struct StkPushRequest {
    /// Amount in whole shillings (Daraja rejects decimals).
    pub amount: i64,

    /// Payer's phone, 2547XXXXXXXX form.
    pub phone_number: String,
}

fn client(state: &AppState) -> ApiResult<Arc<DarajaClient>> {
    state
        .mpesa
        .clone()
        .ok_or_else(|| ApiError::ServiceUnavailable("M-Pesa is not configured".to_string()))
}

/// Initiates an STK push to the customer's phone.
pub async fn stk_push(
    State(state): State<AppState>,
    _auth: AuthUser,
    Json(req): Json<StkPushRequest>,
) -> ApiResult<Json<Value>> {
    validate_amount_cents("amount", req.amount)?;
    validate_phone_number(&req.phone_number)?;

    let response = client(&state)?
        .stk_push(req.amount, &req.phone_number)
        .await?;
    Ok(Json(response))
}

/// Queries the status of an earlier STK push.
pub async fn status(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(checkout_request_id): Path<String>,
) -> ApiResult<Json<Value>> {
    let response = client(&state)?.stk_status(&checkout_request_id).await?;
    Ok(Json(response))
}

/// Daraja result callback.
///
/// Payment reconciliation is out of scope; the callback is logged and
/// acknowledged so Daraja stops retrying.
pub async fn callback(Json(body): Json<Value>) -> Json<Value> {
    info!(payload = %body, "M-Pesa callback received");
    Json(json!({ "message": "Callback received" }))
}
