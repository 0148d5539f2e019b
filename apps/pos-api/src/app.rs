//! Application state and router builder.
//!
//! ## Router Layout
//! ```text
//! /
//! ├── /health                        # Liveness + DB connectivity (public)
//! └── /v1/
//!     ├── /businesses/register       # Business + admin signup (public)
//!     ├── /businesses/me             # Current business (auth)
//!     ├── /businesses/profile        # Receipt profile update (admin)
//!     ├── /auth/login                # Email + password (public)
//!     ├── /auth/login-pin            # Email + PIN (public)
//!     ├── /auth/refresh              # Refresh access token (public)
//!     ├── /devices/link              # API key exchange (public)
//!     ├── /products ...              # Catalog CRUD + stock (auth)
//!     ├── /transactions ...          # Sales + receipts (auth)
//!     ├── /dashboard ...             # Stats + sales series (auth)
//!     ├── /reports/closing           # Daily closing report (auth)
//!     ├── /expenses, /suppliers,     # Back-office records (auth)
//!     │   /loyalty, /inventory-logs
//!     └── /mpesa/...                 # STK push + callback
//! ```
//!
//! ## Middleware Stack
//! 1. Request tracing (tower-http TraceLayer)
//! 2. CORS (tower-http CorsLayer)
//! 3. Authentication (per-handler `AuthUser` extractor)

use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use whiz_db::Database;
use whiz_docs::DocumentStore;

use crate::auth::JwtManager;
use crate::config::Config;
use crate::mpesa::DarajaClient;
use crate::routes;

/// Shared application state.
///
/// Cloned for each request handler via Axum's `State` extractor; all
/// members are cheap to clone (pool handle or `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Database handle
    pub db: Database,

    /// Application configuration
    pub config: Arc<Config>,

    /// JWT token manager
    pub jwt: Arc<JwtManager>,

    /// Template loading + document output
    pub docs: Arc<DocumentStore>,

    /// Daraja client, when M-Pesa is configured
    pub mpesa: Option<Arc<DarajaClient>>,
}

impl AppState {
    /// Creates application state from loaded configuration.
    pub fn new(db: Database, config: Config) -> Self {
        let jwt = Arc::new(JwtManager::new(
            config.jwt_secret.clone(),
            config.jwt_access_lifetime_secs,
            config.jwt_refresh_lifetime_secs,
        ));

        let mut docs = DocumentStore::new(&config.document_output_dir);
        if let Some(template_dir) = &config.template_dir {
            docs = docs.with_template_dir(template_dir);
        }

        let mpesa = config
            .mpesa
            .clone()
            .map(|cfg| Arc::new(DarajaClient::new(cfg)));

        AppState {
            db,
            config: Arc::new(config),
            jwt,
            docs: Arc::new(docs),
            mpesa,
        }
    }
}

/// Builds the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let v1 = Router::new()
        // Business registration and settings
        .route("/businesses/register", post(routes::business::register))
        .route("/businesses/me", get(routes::business::me))
        .route("/businesses/profile", put(routes::business::update_profile))
        // Authentication
        .route("/auth/login", post(routes::auth::login))
        .route("/auth/login-pin", post(routes::auth::login_pin))
        .route("/auth/refresh", post(routes::auth::refresh))
        // Device linking
        .route("/devices/link", post(routes::devices::link))
        // Product catalog
        .route(
            "/products",
            get(routes::products::list).post(routes::products::create),
        )
        .route("/products/search", get(routes::products::search))
        .route(
            "/products/:id",
            get(routes::products::get_one)
                .put(routes::products::update)
                .delete(routes::products::deactivate),
        )
        .route("/products/:id/stock", post(routes::products::adjust_stock))
        // Transactions
        .route(
            "/transactions",
            get(routes::transactions::list).post(routes::transactions::create),
        )
        .route("/transactions/:id", get(routes::transactions::get_one))
        .route("/transactions/:id/void", post(routes::transactions::void))
        .route(
            "/transactions/:id/receipt",
            get(routes::transactions::receipt),
        )
        // Dashboard
        .route("/dashboard", get(routes::dashboard::index))
        .route("/dashboard/sales-series", get(routes::dashboard::sales_series))
        // Reports
        .route("/reports/closing", get(routes::reports::closing))
        // Back-office records
        .route(
            "/expenses",
            get(routes::expenses::list).post(routes::expenses::create),
        )
        .route(
            "/suppliers",
            get(routes::suppliers::list).post(routes::suppliers::create),
        )
        .route("/suppliers/:id", put(routes::suppliers::update))
        .route(
            "/loyalty",
            get(routes::loyalty::list).post(routes::loyalty::create),
        )
        .route("/inventory-logs", get(routes::inventory::list))
        // M-Pesa
        .route("/mpesa/stk-push", post(routes::mpesa::stk_push))
        .route(
            "/mpesa/status/:checkout_request_id",
            get(routes::mpesa::status),
        )
        .route("/mpesa/callback", post(routes::mpesa::callback));

    Router::new()
        .route("/health", get(routes::health::health_check))
        .nest("/v1", v1)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
