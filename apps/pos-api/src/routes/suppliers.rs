//! Supplier endpoints.
//!
//! # Endpoints
//!
//! - `GET  /v1/suppliers` - List suppliers
//! - `POST /v1/suppliers` - Create a supplier
//! - `PUT  /v1/suppliers/:id` - Update a supplier

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use whiz_core::types::Supplier;
use whiz_core::validation::validate_name;

use crate::app::AppState;
use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};

/// Supplier create/update request.
#[derive(Debug, Deserialize)]
pub struct SupplierRequest {
    pub name: String,
    pub contact: Option<String>,
    pub location: Option<String>,
    pub active: Option<bool>,
    pub notes: Option<String>,
}

/// Lists suppliers of the caller's business.
pub async fn list(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Json<Vec<Supplier>>> {
    let suppliers = state
        .db
        .suppliers()
        .list_for_business(&auth.business_id)
        .await?;
    Ok(Json(suppliers))
}

/// Creates a supplier.
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<SupplierRequest>,
) -> ApiResult<Json<Supplier>> {
    validate_name("name", &req.name)?;

    let supplier = Supplier {
        id: Uuid::new_v4().to_string(),
        business_id: auth.business_id.clone(),
        name: req.name.trim().to_string(),
        contact: req.contact,
        location: req.location,
        active: req.active.unwrap_or(true),
        notes: req.notes,
        created_at: Utc::now(),
    };

    state.db.suppliers().insert(&supplier).await?;
    info!(supplier_id = %supplier.id, "Supplier created");

    Ok(Json(supplier))
}

/// Updates a supplier.
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<SupplierRequest>,
) -> ApiResult<Json<Supplier>> {
    validate_name("name", &req.name)?;

    let mut supplier = state
        .db
        .suppliers()
        .get_by_id(&id)
        .await?
        .filter(|s| s.business_id == auth.business_id)
        .ok_or_else(|| ApiError::NotFound(format!("Supplier not found: {id}")))?;

    supplier.name = req.name.trim().to_string();
    supplier.contact = req.contact;
    supplier.location = req.location;
    supplier.notes = req.notes;
    if let Some(active) = req.active {
        supplier.active = active;
    }

    state.db.suppliers().update(&supplier).await?;
    Ok(Json(supplier))
}
