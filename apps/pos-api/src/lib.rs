//! # Whiz POS API
//!
//! HTTP JSON API server for Whiz POS.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          POS API Server                                 │
//! │                                                                         │
//! │  Terminals/Dashboard ──► HTTP (8080) ──► Routes ──► SQLite (whiz-db)   │
//! │                                             │                           │
//! │                                             ├──► whiz-docs (receipts)  │
//! │                                             └──► Daraja (M-Pesa)       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Exposed as a library so integration tests can build the router
//! against an in-memory database.

pub mod app;
pub mod auth;
pub mod config;
pub mod error;
pub mod mpesa;
pub mod routes;

pub use app::{build_router, AppState};
pub use config::Config;
pub use error::{ApiError, ApiResult};
