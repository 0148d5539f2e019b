//! Device linking endpoint.
//!
//! Binds a physical terminal to a business by exchanging the business's
//! API key for a long-lived device token plus branding colors.
//!
//! # Endpoint
//!
//! ```text
//! POST /v1/devices/link
//! { "api_key": "...", "fingerprint": "...", "device_type": "desktop" }
//! ```
//!
//! Re-linking an already-known fingerprint reuses the device record
//! (and refreshes its last-seen time) instead of duplicating it.

use axum::{extract::State, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use whiz_core::types::{Device, DeviceType};

use crate::app::AppState;
use crate::error::{ApiError, ApiResult};

/// Device link request.
#[derive(Debug, Deserialize)]
pub struct LinkDeviceRequest {
    pub api_key: String,
    pub fingerprint: String,
    pub device_type: DeviceType,
}

/// Device link response.
#[derive(Debug, Serialize, Deserialize)]
pub struct LinkDeviceResponse {
    pub business_id: String,
    pub device_id: String,
    pub device_token: String,
    pub branding: Branding,
}

/// Branding colors pushed to the linked terminal.
#[derive(Debug, Serialize, Deserialize)]
pub struct Branding {
    pub primary_color: String,
    pub secondary_color: String,
}

/// Links a device to a business via API key exchange.
///
/// # Errors
///
/// - `401 Unauthorized`: unknown API key
/// - `409 Conflict`: fingerprint already linked to another business
pub async fn link(
    State(state): State<AppState>,
    Json(req): Json<LinkDeviceRequest>,
) -> ApiResult<Json<LinkDeviceResponse>> {
    let business = state
        .db
        .businesses()
        .get_by_api_key(&req.api_key)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid API key".to_string()))?;

    let now = Utc::now();

    let device = match state
        .db
        .devices()
        .get_by_fingerprint(&req.fingerprint)
        .await?
    {
        Some(existing) => {
            if existing.business_id != business.id {
                return Err(ApiError::Conflict(
                    "Device is already linked to another business".to_string(),
                ));
            }
            state.db.devices().touch_last_seen(&existing.id, now).await?;
            existing
        }
        None => {
            let device = Device {
                id: Uuid::new_v4().to_string(),
                business_id: business.id.clone(),
                fingerprint: req.fingerprint.clone(),
                device_type: req.device_type,
                last_seen: now,
                created_at: now,
            };
            state.db.devices().insert(&device).await?;
            device
        }
    };

    let device_token = state.jwt.generate_device_token(&device.id, &business.id)?;

    info!(
        device_id = %device.id,
        business_id = %business.id,
        "Device linked"
    );

    Ok(Json(LinkDeviceResponse {
        business_id: business.id,
        device_id: device.id,
        device_token,
        branding: Branding {
            primary_color: business.brand_primary,
            secondary_color: business.brand_secondary,
        },
    }))
}
