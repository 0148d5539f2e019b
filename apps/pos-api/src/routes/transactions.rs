//! Transaction (sale) endpoints.
//!
//! # Endpoints
//!
//! - `POST /v1/transactions` - Create a sale
//! - `GET  /v1/transactions?limit=` - Recent sales
//! - `GET  /v1/transactions/:id` - One sale with items and payments
//! - `POST /v1/transactions/:id/void` - Void a completed sale
//! - `GET  /v1/transactions/:id/receipt?reprint=` - Render the receipt
//!
//! ## Sale Creation
//! ```text
//! { "items": [{ "product_id": "...", "quantity": 2 }],
//!   "payment_method": "cash",
//!   "credit_customer": null,
//!   "loyalty_customer_id": null }
//!       │
//!       ▼
//! fetch products, check stock, snapshot prices   ← price at sale time
//!       │
//!       ▼
//! subtotal = Σ line totals, tax from business rate, total = subtotal + tax
//!       │
//!       ▼
//! repo.create() - atomic insert + stock decrement
//!       │
//!       ▼
//! loyalty accrual when a loyalty customer is attached
//! ```

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use whiz_core::error::CoreError;
use whiz_core::money::Money;
use whiz_core::types::{
    Payment, PaymentMethod, TaxRate, Transaction, TransactionItem, TransactionStatus,
};
use whiz_core::validation::validate_quantity;
use whiz_docs::{render_receipt, ReceiptContext, TemplateKind};

use crate::app::AppState;
use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};

/// One requested sale line.
#[derive(Debug, Deserialize)]
pub struct SaleLineRequest {
    pub product_id: String,
    pub quantity: i64,
}

/// Sale creation request.
#[derive(Debug, Deserialize)]
pub struct CreateTransactionRequest {
    pub items: Vec<SaleLineRequest>,
    pub payment_method: PaymentMethod,

    /// Customer name for credit sales.
    pub credit_customer: Option<String>,

    /// Loyalty member to accrue points for.
    pub loyalty_customer_id: Option<String>,

    /// Terminal the sale was rung on, when known.
    pub device_id: Option<String>,
}

/// Full transaction detail.
#[derive(Debug, Serialize, Deserialize)]
pub struct TransactionDetail {
    pub transaction: Transaction,
    pub items: Vec<TransactionItem>,
    pub payments: Vec<Payment>,
}

/// List query parameters.
#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub limit: Option<i64>,
}

/// Receipt query parameters.
#[derive(Debug, Deserialize)]
pub struct ReceiptParams {
    pub reprint: Option<bool>,
}

/// Rendered receipt response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ReceiptResponse {
    pub transaction_id: String,
    pub path: String,
    pub html: String,
}

/// Creates a sale.
///
/// # Errors
///
/// - `400 Bad Request`: empty cart, bad quantity, or not enough stock
/// - `404 Not Found`: unknown product
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateTransactionRequest>,
) -> ApiResult<Json<TransactionDetail>> {
    if req.items.is_empty() {
        return Err(CoreError::EmptyTransaction.into());
    }

    let business = state
        .db
        .businesses()
        .get_by_id(&auth.business_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Business not found: {}", auth.business_id)))?;

    let cashier_name = state
        .db
        .users()
        .get_by_id(&auth.user_id)
        .await?
        .map(|u| u.name)
        .unwrap_or_else(|| "Cashier".to_string());

    let now = Utc::now();
    let transaction_id = Uuid::new_v4().to_string();

    // Build line items with price snapshots, failing fast on stock.
    // The repository re-checks stock atomically at insert time.
    let mut items = Vec::with_capacity(req.items.len());
    let mut subtotal = Money::zero();

    for line in &req.items {
        validate_quantity(line.quantity)?;

        let product = state
            .db
            .products()
            .get_by_id(&line.product_id)
            .await?
            .filter(|p| p.business_id == auth.business_id && p.is_active)
            .ok_or_else(|| CoreError::ProductNotFound(line.product_id.clone()))?;

        if product.stock < line.quantity {
            return Err(CoreError::InsufficientStock {
                name: product.name,
                available: product.stock,
                requested: line.quantity,
            }
            .into());
        }

        let line_total = Money::from_cents(product.price_cents).multiply_quantity(line.quantity);
        subtotal += line_total;

        items.push(TransactionItem {
            id: Uuid::new_v4().to_string(),
            transaction_id: transaction_id.clone(),
            product_id: product.id,
            name: product.name,
            quantity: line.quantity,
            unit_price_cents: product.price_cents,
            line_total_cents: line_total.cents(),
        });
    }

    let tax = subtotal.calculate_tax(TaxRate::from_bps(business.tax_rate_bps));
    let total = subtotal + tax;

    let transaction = Transaction {
        id: transaction_id.clone(),
        business_id: auth.business_id.clone(),
        device_id: req.device_id,
        user_id: auth.user_id.clone(),
        cashier_name,
        status: TransactionStatus::Completed,
        subtotal_cents: subtotal.cents(),
        tax_cents: tax.cents(),
        total_cents: total.cents(),
        credit_customer: req.credit_customer,
        created_at: now,
        updated_at: now,
    };

    let payments = vec![Payment {
        id: Uuid::new_v4().to_string(),
        transaction_id: transaction_id.clone(),
        method: req.payment_method,
        amount_cents: total.cents(),
        created_at: now,
    }];

    state
        .db
        .transactions()
        .create(&transaction, &items, &payments)
        .await?;

    // Loyalty accrual is best-effort: the sale stands even if the
    // member record went away mid-request.
    if let Some(customer_id) = &req.loyalty_customer_id {
        if let Err(e) = state
            .db
            .loyalty()
            .record_visit(customer_id, total, now)
            .await
        {
            warn!(customer_id = %customer_id, error = %e, "Loyalty accrual failed");
        }
    }

    info!(
        transaction_id = %transaction.id,
        total = total.cents(),
        items = items.len(),
        "Sale completed"
    );

    Ok(Json(TransactionDetail {
        transaction,
        items,
        payments,
    }))
}

/// Lists recent transactions of the caller's business.
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<Vec<Transaction>>> {
    let limit = params.limit.unwrap_or(50).clamp(1, 500);
    let transactions = state
        .db
        .transactions()
        .list_recent(&auth.business_id, limit)
        .await?;
    Ok(Json(transactions))
}

/// Fetches a transaction with items and payments.
async fn owned_detail(
    state: &AppState,
    auth: &AuthUser,
    id: &str,
) -> ApiResult<TransactionDetail> {
    let transaction = state
        .db
        .transactions()
        .get_by_id(id)
        .await?
        .filter(|t| t.business_id == auth.business_id)
        .ok_or_else(|| ApiError::NotFound(format!("Transaction not found: {id}")))?;

    let items = state.db.transactions().get_items(id).await?;
    let payments = state.db.transactions().get_payments(id).await?;

    Ok(TransactionDetail {
        transaction,
        items,
        payments,
    })
}

/// Fetches one transaction.
pub async fn get_one(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<TransactionDetail>> {
    Ok(Json(owned_detail(&state, &auth, &id).await?))
}

/// Voids a completed transaction.
pub async fn void(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<Transaction>> {
    // Ownership check before the state transition
    owned_detail(&state, &auth, &id).await?;

    state.db.transactions().void(&id).await?;

    let transaction = state
        .db
        .transactions()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Transaction not found: {id}")))?;

    Ok(Json(transaction))
}

/// Renders the receipt document for a transaction and writes it to the
/// document store.
pub async fn receipt(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    Query(params): Query<ReceiptParams>,
) -> ApiResult<Json<ReceiptResponse>> {
    let detail = owned_detail(&state, &auth, &id).await?;

    let business = state
        .db
        .businesses()
        .get_by_id(&auth.business_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Business not found: {}", auth.business_id)))?;

    let template = state.docs.template(TemplateKind::Receipt)?;
    let html = render_receipt(
        &template,
        &ReceiptContext {
            transaction: &detail.transaction,
            items: &detail.items,
            payments: &detail.payments,
            profile: &business.receipt_profile(),
            reprint: params.reprint.unwrap_or(false),
        },
    )?;

    let path = state
        .docs
        .write_document(&format!("receipt-{id}.html"), &html)?;

    info!(transaction_id = %id, path = %path.display(), "Receipt generated");

    Ok(Json(ReceiptResponse {
        transaction_id: id,
        path: path.display().to_string(),
        html,
    }))
}
