//! Business registration and settings endpoints.
//!
//! # Endpoints
//!
//! - `POST /v1/businesses/register` - Register a business and its first
//!   admin user, returning the device-linking API key
//! - `GET /v1/businesses/me` - Current business (authenticated)
//! - `PUT /v1/businesses/profile` - Update receipt profile (admin)
//!
//! Registration also renders the setup invoice document. This is the
//! only moment the admin PIN exists in plaintext, so the document is
//! generated here and its path returned.

use axum::{extract::State, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use whiz_core::types::{Business, ReceiptProfile, Role, SubscriptionPlan, User};
use whiz_core::validation::{validate_email, validate_name, validate_password, validate_pin};
use whiz_core::{DEFAULT_CURRENCY, DEFAULT_PAPER_WIDTH_MM};
use whiz_docs::{render_setup_invoice, TemplateKind};

use crate::app::AppState;
use crate::auth::{hash_secret, AuthUser};
use crate::error::{ApiError, ApiResult};

/// Business registration request.
#[derive(Debug, Deserialize)]
pub struct RegisterBusinessRequest {
    pub business_name: String,
    pub admin_name: String,
    pub admin_email: String,
    pub admin_password: Option<String>,
    pub admin_pin: String,
    pub subscription_plan: Option<SubscriptionPlan>,
}

/// Business registration response.
#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterBusinessResponse {
    pub message: String,
    pub business: BusinessSummary,
    pub admin: AdminSummary,

    /// Path of the rendered setup invoice document.
    pub setup_invoice_path: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BusinessSummary {
    pub id: String,
    pub name: String,
    pub api_key: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AdminSummary {
    pub id: String,
    pub name: String,
    pub email: String,
}

/// Receipt profile update request.
#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub business_name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub receipt_header: Option<String>,
    pub receipt_footer: Option<String>,
    pub mpesa_paybill: Option<String>,
    pub mpesa_account_number: Option<String>,
    pub mpesa_till: Option<String>,
    pub show_developer_footer: Option<bool>,
    pub printer_paper_width: Option<i64>,
}

/// Register a new business and its first admin user.
///
/// # Errors
///
/// - `400 Bad Request`: validation failed
/// - `409 Conflict`: admin email already registered
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterBusinessRequest>,
) -> ApiResult<Json<RegisterBusinessResponse>> {
    validate_name("business_name", &req.business_name)?;
    validate_name("admin_name", &req.admin_name)?;
    validate_email(&req.admin_email)?;
    validate_pin(&req.admin_pin)?;
    if let Some(password) = &req.admin_password {
        validate_password(password)?;
    }

    if state
        .db
        .users()
        .get_by_email(&req.admin_email)
        .await?
        .is_some()
    {
        return Err(ApiError::Conflict(
            "An admin with this email already exists".to_string(),
        ));
    }

    let now = Utc::now();

    let business = Business {
        id: Uuid::new_v4().to_string(),
        name: req.business_name.trim().to_string(),
        api_key: Uuid::new_v4().to_string(),
        subscription_plan: req.subscription_plan.unwrap_or_default(),
        currency: DEFAULT_CURRENCY.to_string(),
        tax_rate_bps: 0,
        address: None,
        phone: None,
        receipt_header: None,
        receipt_footer: None,
        mpesa_paybill: None,
        mpesa_account_number: None,
        mpesa_till: None,
        show_developer_footer: true,
        printer_paper_width: DEFAULT_PAPER_WIDTH_MM,
        brand_primary: "#0047FF".to_string(),
        brand_secondary: "#FFD700".to_string(),
        created_at: now,
        updated_at: now,
    };
    state.db.businesses().insert(&business).await?;

    let admin = User {
        id: Uuid::new_v4().to_string(),
        business_id: business.id.clone(),
        name: req.admin_name.trim().to_string(),
        email: req.admin_email.trim().to_string(),
        role: Role::Admin,
        password_hash: req
            .admin_password
            .as_deref()
            .map(hash_secret)
            .transpose()?,
        pin_hash: hash_secret(&req.admin_pin)?,
        created_at: now,
        updated_at: now,
    };
    state.db.users().insert(&admin).await?;

    // Render the setup invoice while the PIN is still in plaintext.
    // A failure here does not fail the registration.
    let setup_invoice_path = match render_setup_document(&state, &business, &admin, &req.admin_pin)
    {
        Ok(path) => Some(path),
        Err(e) => {
            warn!(error = %e, "Setup invoice rendering failed");
            None
        }
    };

    info!(business_id = %business.id, admin_id = %admin.id, "Business registered");

    Ok(Json(RegisterBusinessResponse {
        message: "Business and admin user registered successfully".to_string(),
        business: BusinessSummary {
            id: business.id,
            name: business.name,
            api_key: business.api_key,
        },
        admin: AdminSummary {
            id: admin.id,
            name: admin.name,
            email: admin.email,
        },
        setup_invoice_path,
    }))
}

fn render_setup_document(
    state: &AppState,
    business: &Business,
    admin: &User,
    admin_pin: &str,
) -> ApiResult<String> {
    let template = state.docs.template(TemplateKind::SetupInvoice)?;
    let html = render_setup_invoice(&template, &business.receipt_profile(), &admin.name, admin_pin)?;
    let path = state
        .docs
        .write_document(&format!("setup-invoice-{}.html", business.id), &html)?;
    Ok(path.display().to_string())
}

/// Returns the authenticated user's business.
pub async fn me(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Json<Business>> {
    let business = state
        .db
        .businesses()
        .get_by_id(&auth.business_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Business not found: {}", auth.business_id)))?;

    Ok(Json(business))
}

/// Updates the receipt profile of the authenticated business.
///
/// Admin only: these fields appear on every printed document.
pub async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<UpdateProfileRequest>,
) -> ApiResult<Json<Business>> {
    auth.require_admin()?;
    validate_name("business_name", &req.business_name)?;

    let profile = ReceiptProfile {
        business_name: req.business_name.trim().to_string(),
        address: req.address,
        phone: req.phone,
        receipt_header: req.receipt_header,
        receipt_footer: req.receipt_footer,
        mpesa_paybill: req.mpesa_paybill,
        mpesa_account_number: req.mpesa_account_number,
        mpesa_till: req.mpesa_till,
        show_developer_footer: req.show_developer_footer.unwrap_or(true),
        printer_paper_width: req.printer_paper_width.unwrap_or(DEFAULT_PAPER_WIDTH_MM),
    };

    state
        .db
        .businesses()
        .update_receipt_profile(&auth.business_id, &profile)
        .await?;

    let business = state
        .db
        .businesses()
        .get_by_id(&auth.business_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Business not found: {}", auth.business_id)))?;

    Ok(Json(business))
}
