//! M-Pesa Daraja API client.
//!
//! Thin passthrough over the public Daraja sandbox endpoints: OAuth
//! client-credentials token, STK push initiation, and STK push status
//! query. No bespoke protocol work; requests and responses follow the
//! Daraja wire format as-is.
//!
//! ## STK Push Flow
//! ```text
//! POST /v1/mpesa/stk-push { amount, phone_number }
//!       │
//!       ▼
//! GET  {base}/oauth/v1/generate          ← basic auth, returns token
//!       │
//!       ▼
//! POST {base}/mpesa/stkpush/v1/processrequest
//!       password = base64(shortcode + passkey + timestamp)
//!       │
//!       ▼
//! Customer's phone shows the payment prompt; Daraja calls back later
//! ```

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::config::MpesaConfig;
use crate::error::{ApiError, ApiResult};

/// Account reference shown on the customer's payment prompt.
const ACCOUNT_REFERENCE: &str = "WHIZ POS";

/// Client for the Daraja REST API.
pub struct DarajaClient {
    http: reqwest::Client,
    config: MpesaConfig,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

impl DarajaClient {
    /// Creates a client from the configured credentials.
    pub fn new(config: MpesaConfig) -> Self {
        DarajaClient {
            http: reqwest::Client::new(),
            config,
        }
    }

    /// Fetches an OAuth access token via client credentials.
    async fn access_token(&self) -> ApiResult<String> {
        let url = format!(
            "{}/oauth/v1/generate?grant_type=client_credentials",
            self.config.base_url
        );

        let response = self
            .http
            .get(&url)
            .basic_auth(&self.config.consumer_key, Some(&self.config.consumer_secret))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ApiError::Internal(format!(
                "Daraja auth failed with status {}",
                response.status()
            )));
        }

        let token: TokenResponse = response.json().await?;
        Ok(token.access_token)
    }

    /// Daraja timestamp: YYYYMMDDHHMMSS.
    fn timestamp() -> String {
        Utc::now().format("%Y%m%d%H%M%S").to_string()
    }

    /// STK password: base64(shortcode + passkey + timestamp).
    fn password(&self, timestamp: &str) -> String {
        BASE64.encode(format!(
            "{}{}{}",
            self.config.short_code, self.config.passkey, timestamp
        ))
    }

    /// Initiates an STK push payment prompt.
    ///
    /// `amount` is in whole shillings (Daraja rejects decimals) and
    /// `phone_number` is the 2547XXXXXXXX form.
    pub async fn stk_push(&self, amount: i64, phone_number: &str) -> ApiResult<Value> {
        let token = self.access_token().await?;
        let timestamp = Self::timestamp();

        let body = json!({
            "BusinessShortCode": self.config.short_code,
            "Password": self.password(&timestamp),
            "Timestamp": timestamp,
            "TransactionType": "CustomerPayBillOnline",
            "Amount": amount,
            "PartyA": phone_number,
            "PartyB": self.config.short_code,
            "PhoneNumber": phone_number,
            "CallBackURL": self.config.callback_url,
            "AccountReference": ACCOUNT_REFERENCE,
            "TransactionDesc": "Payment for goods",
        });

        info!(amount, phone = %phone_number, "Initiating STK push");

        let url = format!("{}/mpesa/stkpush/v1/processrequest", self.config.base_url);
        let response = self
            .http
            .post(&url)
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let payload: Value = response.json().await?;
        debug!(%status, "STK push response received");

        Ok(payload)
    }

    /// Queries the status of an earlier STK push.
    pub async fn stk_status(&self, checkout_request_id: &str) -> ApiResult<Value> {
        let token = self.access_token().await?;
        let timestamp = Self::timestamp();

        let body = json!({
            "BusinessShortCode": self.config.short_code,
            "Password": self.password(&timestamp),
            "Timestamp": timestamp,
            "CheckoutRequestID": checkout_request_id,
        });

        let url = format!("{}/mpesa/stkpushquery/v1/query", self.config.base_url);
        let response = self
            .http
            .post(&url)
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?;

        let payload: Value = response.json().await?;
        Ok(payload)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
