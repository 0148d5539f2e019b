//! # whiz-core: Pure Business Logic for Whiz POS
//!
//! This crate is the **heart** of Whiz POS. It contains all business logic
//! as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Whiz POS Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 apps/pos-api (Axum HTTP API)                    │   │
//! │  │   /v1/transactions, /v1/dashboard, /v1/reports, /v1/mpesa ...   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                ★ whiz-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │ reporting │  │ validation│  │   │
//! │  │   │  Product  │  │   Money   │  │  bucketer │  │   rules   │  │   │
//! │  │   │Transaction│  │  TaxRate  │  │  periods  │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │        whiz-db (SQLite) • whiz-docs (document rendering)        │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Business, Product, Transaction, etc.)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`reporting`] - Period-bucketed sales aggregation for the dashboard
//! - [`loyalty`] - Loyalty point accrual and tier rules
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in cents (i64) to avoid float errors
//! 4. **Explicit Errors**: All errors are typed, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod loyalty;
pub mod money;
pub mod reporting;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use whiz_core::Money` instead of
// `use whiz_core::money::Money`

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use reporting::{bucket_sales, ReportPeriod, SaleTotal, SalesSeries};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Default currency for new businesses.
pub const DEFAULT_CURRENCY: &str = "KES";

/// Default thermal printer paper width in millimetres.
pub const DEFAULT_PAPER_WIDTH_MM: i64 = 80;

/// Customer label printed on non-credit receipts.
pub const WALK_IN_CUSTOMER: &str = "Walk Through Customer";
