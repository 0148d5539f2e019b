//! API server configuration.
//!
//! Configuration is loaded from environment variables with fallback to
//! defaults. A `.env` file is honored in development.

use serde::{Deserialize, Serialize};
use std::env;

/// API server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,

    /// Path to the SQLite database file
    pub database_path: String,

    /// JWT secret key for signing tokens
    pub jwt_secret: String,

    /// JWT access token lifetime in seconds
    pub jwt_access_lifetime_secs: i64,

    /// JWT refresh token lifetime in seconds
    pub jwt_refresh_lifetime_secs: i64,

    /// Directory generated documents are written to
    pub document_output_dir: String,

    /// Optional directory of template overrides
    pub template_dir: Option<String>,

    /// M-Pesa Daraja credentials (absent = M-Pesa endpoints disabled)
    pub mpesa: Option<MpesaConfig>,
}

/// M-Pesa Daraja API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MpesaConfig {
    /// Daraja base URL (sandbox by default)
    pub base_url: String,
    pub consumer_key: String,
    pub consumer_secret: String,
    pub short_code: String,
    pub passkey: String,
    pub callback_url: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (for development)
        dotenvy::dotenv().ok();

        let config = Config {
            host: env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),

            port: env::var("API_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("API_PORT".to_string()))?,

            database_path: env::var("DATABASE_PATH")
                .unwrap_or_else(|_| "./whiz-pos.db".to_string()),

            jwt_secret: env::var("JWT_SECRET").unwrap_or_else(|_| {
                // Development fallback; production deployments MUST set this
                "whiz-pos-dev-secret-change-in-production".to_string()
            }),

            jwt_access_lifetime_secs: env::var("JWT_ACCESS_LIFETIME_SECS")
                .unwrap_or_else(|_| "3600".to_string()) // 1 hour
                .parse()
                .map_err(|_| ConfigError::InvalidValue("JWT_ACCESS_LIFETIME_SECS".to_string()))?,

            jwt_refresh_lifetime_secs: env::var("JWT_REFRESH_LIFETIME_SECS")
                .unwrap_or_else(|_| "2592000".to_string()) // 30 days
                .parse()
                .map_err(|_| ConfigError::InvalidValue("JWT_REFRESH_LIFETIME_SECS".to_string()))?,

            document_output_dir: env::var("DOCUMENT_OUTPUT_DIR")
                .unwrap_or_else(|_| "./documents".to_string()),

            template_dir: env::var("TEMPLATE_DIR").ok(),

            mpesa: Self::load_mpesa(),
        };

        Ok(config)
    }

    /// M-Pesa is optional: configured only when all credentials are set.
    fn load_mpesa() -> Option<MpesaConfig> {
        let consumer_key = env::var("MPESA_CONSUMER_KEY").ok()?;
        let consumer_secret = env::var("MPESA_CONSUMER_SECRET").ok()?;
        let short_code = env::var("MPESA_SHORTCODE").ok()?;
        let passkey = env::var("MPESA_PASSKEY").ok()?;
        let callback_url = env::var("MPESA_CALLBACK_URL").ok()?;

        Some(MpesaConfig {
            base_url: env::var("MPESA_BASE_URL")
                .unwrap_or_else(|_| "https://sandbox.safaricom.co.ke".to_string()),
            consumer_key,
            consumer_secret,
            short_code,
            passkey,
            callback_url,
        })
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}
