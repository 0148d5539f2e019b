//! Product catalog endpoints.
//!
//! # Endpoints
//!
//! - `GET    /v1/products` - List active products
//! - `GET    /v1/products/search?q=&limit=` - Name search
//! - `POST   /v1/products` - Create
//! - `GET    /v1/products/:id` - Fetch one
//! - `PUT    /v1/products/:id` - Update
//! - `DELETE /v1/products/:id` - Deactivate (soft delete)
//! - `POST   /v1/products/:id/stock` - Manual stock adjustment,
//!   recorded in the inventory log

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use whiz_core::types::{InventoryLog, Product};
use whiz_core::validation::{validate_name, validate_price_cents};

use crate::app::AppState;
use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};

/// Create/update product request.
#[derive(Debug, Deserialize)]
pub struct ProductRequest {
    pub name: String,
    pub price_cents: i64,
    pub stock: i64,
    pub category: Option<String>,
}

/// Search query parameters.
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: String,
    pub limit: Option<i64>,
}

/// Stock adjustment request.
#[derive(Debug, Deserialize)]
pub struct AdjustStockRequest {
    pub new_stock: i64,
    pub reason: Option<String>,
}

/// Stock adjustment response.
#[derive(Debug, Serialize, Deserialize)]
pub struct AdjustStockResponse {
    pub product_id: String,
    pub old_stock: i64,
    pub new_stock: i64,
    pub variance: i64,
}

/// Fetches a product and checks it belongs to the caller's business.
async fn owned_product(state: &AppState, auth: &AuthUser, id: &str) -> ApiResult<Product> {
    let product = state
        .db
        .products()
        .get_by_id(id)
        .await?
        .filter(|p| p.business_id == auth.business_id)
        .ok_or_else(|| ApiError::NotFound(format!("Product not found: {id}")))?;
    Ok(product)
}

/// Lists active products of the caller's business.
pub async fn list(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Json<Vec<Product>>> {
    let products = state
        .db
        .products()
        .list_for_business(&auth.business_id)
        .await?;
    Ok(Json(products))
}

/// Searches products by name substring.
pub async fn search(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<SearchParams>,
) -> ApiResult<Json<Vec<Product>>> {
    let limit = params.limit.unwrap_or(20).clamp(1, 100);
    let products = state
        .db
        .products()
        .search(&auth.business_id, &params.q, limit)
        .await?;
    Ok(Json(products))
}

/// Creates a product.
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<ProductRequest>,
) -> ApiResult<Json<Product>> {
    validate_name("name", &req.name)?;
    validate_price_cents(req.price_cents)?;

    let now = Utc::now();
    let product = Product {
        id: Uuid::new_v4().to_string(),
        business_id: auth.business_id.clone(),
        name: req.name.trim().to_string(),
        price_cents: req.price_cents,
        stock: req.stock.max(0),
        category: req.category.unwrap_or_default(),
        is_active: true,
        created_at: now,
        updated_at: now,
    };

    state.db.products().insert(&product).await?;
    info!(product_id = %product.id, "Product created");

    Ok(Json(product))
}

/// Fetches one product.
pub async fn get_one(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<Product>> {
    Ok(Json(owned_product(&state, &auth, &id).await?))
}

/// Updates a product's editable fields.
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<ProductRequest>,
) -> ApiResult<Json<Product>> {
    validate_name("name", &req.name)?;
    validate_price_cents(req.price_cents)?;

    let mut product = owned_product(&state, &auth, &id).await?;
    product.name = req.name.trim().to_string();
    product.price_cents = req.price_cents;
    product.stock = req.stock;
    if let Some(category) = req.category {
        product.category = category;
    }

    state.db.products().update(&product).await?;
    Ok(Json(product))
}

/// Deactivates a product (soft delete).
///
/// Admin only; sale history keeps referencing the row.
pub async fn deactivate(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    auth.require_admin()?;

    let product = owned_product(&state, &auth, &id).await?;
    state.db.products().deactivate(&product.id).await?;
    info!(product_id = %product.id, "Product deactivated");

    Ok(Json(serde_json::json!({ "message": "Product removed" })))
}

/// Manually adjusts stock and appends an inventory log entry.
pub async fn adjust_stock(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<AdjustStockRequest>,
) -> ApiResult<Json<AdjustStockResponse>> {
    if req.new_stock < 0 {
        return Err(ApiError::BadRequest("Stock cannot be negative".to_string()));
    }

    let product = owned_product(&state, &auth, &id).await?;
    let old_stock = state.db.products().set_stock(&product.id, req.new_stock).await?;

    let cashier_name = state
        .db
        .users()
        .get_by_id(&auth.user_id)
        .await?
        .map(|u| u.name);

    let log = InventoryLog {
        id: Uuid::new_v4().to_string(),
        business_id: auth.business_id.clone(),
        product_id: product.id.clone(),
        product_name: product.name.clone(),
        old_stock,
        new_stock: req.new_stock,
        variance: req.new_stock - old_stock,
        reason: req.reason,
        cashier_name,
        created_at: Utc::now(),
    };
    state.db.inventory().insert(&log).await?;

    info!(
        product_id = %product.id,
        old_stock,
        new_stock = req.new_stock,
        "Stock adjusted"
    );

    Ok(Json(AdjustStockResponse {
        product_id: product.id,
        old_stock,
        new_stock: req.new_stock,
        variance: req.new_stock - old_stock,
    }))
}
