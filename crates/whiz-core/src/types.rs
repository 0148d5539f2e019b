//! # Domain Types
//!
//! Core domain types used throughout Whiz POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Business     │   │      User       │   │     Device      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id (UUID)      │       │
//! │  │  api_key (uniq) │   │  email (uniq)   │   │  fingerprint    │       │
//! │  │  receipt profile│   │  role           │   │  (unique)       │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │   Transaction   │   │    Payment      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  price_cents    │   │  total_cents    │   │  method         │       │
//! │  │  stock          │   │  status         │   │  amount_cents   │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  Plus: Expense, Supplier, LoyaltyCustomer, InventoryLog                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Every entity has:
//! - `id`: UUID v4 - immutable, used for database relations
//! - Business ID where one exists: (api_key, fingerprint, email) -
//!   human-facing, enforced unique

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 1600 bps = 16% (Kenyan standard VAT)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Creates a tax rate from a percentage (for convenience).
    pub fn from_percentage(pct: f64) -> Self {
        TaxRate((pct * 100.0).round() as u32)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero tax rate.
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }

    /// Checks if tax rate is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::zero()
    }
}

// =============================================================================
// Business
// =============================================================================

/// Subscription plan a business is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
pub enum SubscriptionPlan {
    Free,
    Standard,
    Pro,
}

impl Default for SubscriptionPlan {
    fn default() -> Self {
        SubscriptionPlan::Free
    }
}

/// A registered business (tenant). One business owns its users, devices,
/// products and transactions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Business {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name.
    pub name: String,

    /// API key used for device linking. Unique across all businesses.
    pub api_key: String,

    /// Subscription plan.
    pub subscription_plan: SubscriptionPlan,

    /// ISO currency code. Defaults to KES.
    pub currency: String,

    /// Tax rate in basis points (1600 = 16% VAT).
    pub tax_rate_bps: u32,

    /// Physical address printed on documents.
    pub address: Option<String>,

    /// Contact phone printed on documents.
    pub phone: Option<String>,

    /// Greeting line at the top of receipts.
    pub receipt_header: Option<String>,

    /// Optional closing line at the bottom of receipts.
    pub receipt_footer: Option<String>,

    /// M-Pesa paybill number, when the business accepts paybill payments.
    pub mpesa_paybill: Option<String>,

    /// Account number shown next to the paybill.
    pub mpesa_account_number: Option<String>,

    /// M-Pesa till number, when the business accepts till payments.
    pub mpesa_till: Option<String>,

    /// Whether the developer credit line is printed on receipts.
    pub show_developer_footer: bool,

    /// Thermal printer paper width in millimetres.
    pub printer_paper_width: i64,

    /// Primary branding color sent to linked devices.
    pub brand_primary: String,

    /// Secondary branding color sent to linked devices.
    pub brand_secondary: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Business {
    /// Extracts the document-rendering profile from this business.
    pub fn receipt_profile(&self) -> ReceiptProfile {
        ReceiptProfile {
            business_name: self.name.clone(),
            address: self.address.clone(),
            phone: self.phone.clone(),
            receipt_header: self.receipt_header.clone(),
            receipt_footer: self.receipt_footer.clone(),
            mpesa_paybill: self.mpesa_paybill.clone(),
            mpesa_account_number: self.mpesa_account_number.clone(),
            mpesa_till: self.mpesa_till.clone(),
            show_developer_footer: self.show_developer_footer,
            printer_paper_width: self.printer_paper_width,
        }
    }
}

/// Business-setup fields that document rendering needs.
///
/// Missing optional fields render as empty sections, never as "undefined".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReceiptProfile {
    pub business_name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub receipt_header: Option<String>,
    pub receipt_footer: Option<String>,
    pub mpesa_paybill: Option<String>,
    pub mpesa_account_number: Option<String>,
    pub mpesa_till: Option<String>,
    pub show_developer_footer: bool,
    pub printer_paper_width: i64,
}

// =============================================================================
// User
// =============================================================================

/// Staff role within a business.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
pub enum Role {
    Admin,
    Manager,
    Cashier,
    StockClerk,
}

impl Role {
    /// Human-readable role name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::Manager => "Manager",
            Role::Cashier => "Cashier",
            Role::StockClerk => "Stock Clerk",
        }
    }
}

/// A staff member of a business.
///
/// Password is optional (PIN-only cashiers), the PIN is always set.
/// Both are stored as Argon2 hashes, never plaintext.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct User {
    pub id: String,
    pub business_id: String,
    pub name: String,

    /// Login identifier. Unique across all businesses.
    pub email: String,
    pub role: Role,

    /// Argon2 hash of the password, if the user has one.
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,

    /// Argon2 hash of the login PIN.
    #[serde(skip_serializing)]
    pub pin_hash: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Device
// =============================================================================

/// Kind of terminal a device record represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum DeviceType {
    Desktop,
    Mobile,
}

/// A physical terminal linked to a business via API key exchange.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Device {
    pub id: String,
    pub business_id: String,

    /// Hardware fingerprint supplied by the terminal. Unique.
    pub fingerprint: String,
    pub device_type: DeviceType,
    pub last_seen: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Product
// =============================================================================

/// A product available for sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    pub id: String,
    pub business_id: String,

    /// Display name shown to cashier and on receipts.
    pub name: String,

    /// Price in cents (smallest currency unit).
    pub price_cents: i64,

    /// Current stock level. Sales decrement this, never below zero.
    pub stock: i64,

    /// Category used for grouping on the sales grid.
    pub category: String,

    /// Whether product is active (soft delete).
    pub is_active: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Transaction (Sale)
// =============================================================================

/// Lifecycle status of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
pub enum TransactionStatus {
    /// Paid and final. The normal case; sales complete at creation.
    Completed,
    /// Cancelled after completion. Kept for audit.
    Voided,
    /// Awaiting payment confirmation (e.g. STK push in flight).
    Pending,
}

impl Default for TransactionStatus {
    fn default() -> Self {
        TransactionStatus::Completed
    }
}

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Completed => "COMPLETED",
            TransactionStatus::Voided => "VOIDED",
            TransactionStatus::Pending => "PENDING",
        }
    }
}

/// How a payment was made.
///
/// Only the methods the closing report distinguishes: cash drawer,
/// M-Pesa, and credit (pay later).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Cash,
    Mpesa,
    Credit,
}

impl PaymentMethod {
    /// Uppercase form used on printed receipts.
    pub fn receipt_label(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "CASH",
            PaymentMethod::Mpesa => "MPESA",
            PaymentMethod::Credit => "CREDIT",
        }
    }
}

/// A completed sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Transaction {
    pub id: String,
    pub business_id: String,
    pub device_id: Option<String>,
    pub user_id: String,

    /// Name of the cashier at sale time, snapshotted for receipts and
    /// closing reports (users can be renamed or removed later).
    pub cashier_name: String,

    pub status: TransactionStatus,
    pub subtotal_cents: i64,
    pub tax_cents: i64,
    pub total_cents: i64,

    /// Customer name for credit sales, printed on the receipt.
    pub credit_customer: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A line item on a transaction.
///
/// Name and price are snapshots taken at sale time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct TransactionItem {
    pub id: String,
    pub transaction_id: String,
    pub product_id: String,
    pub name: String,
    pub quantity: i64,
    pub unit_price_cents: i64,
    pub line_total_cents: i64,
}

/// A payment applied to a transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Payment {
    pub id: String,
    pub transaction_id: String,
    pub method: PaymentMethod,
    pub amount_cents: i64,
    pub created_at: DateTime<Utc>,
}

/// Sums line totals over a set of items.
///
/// Invariant: a transaction's `total_cents` equals this sum plus tax.
pub fn sum_line_totals(items: &[TransactionItem]) -> Money {
    items
        .iter()
        .map(|i| Money::from_cents(i.line_total_cents))
        .sum()
}

// =============================================================================
// Expense
// =============================================================================

/// An operating expense recorded at the till.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Expense {
    pub id: String,
    pub business_id: String,
    pub description: String,
    pub amount_cents: i64,
    pub category: Option<String>,

    /// Associated supplier, when the expense is a supplier payment.
    pub supplier_id: Option<String>,

    /// Supplier name, denormalized for display.
    pub supplier_name: Option<String>,

    /// Name of the user who recorded the expense.
    pub recorded_by: Option<String>,

    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Supplier
// =============================================================================

/// A goods supplier.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Supplier {
    pub id: String,
    pub business_id: String,
    pub name: String,
    pub contact: Option<String>,
    pub location: Option<String>,
    pub active: bool,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Loyalty Customer
// =============================================================================

/// Loyalty tier, derived from lifetime points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
pub enum LoyaltyTier {
    Bronze,
    Silver,
    Gold,
}

impl Default for LoyaltyTier {
    fn default() -> Self {
        LoyaltyTier::Bronze
    }
}

/// A customer enrolled in the loyalty program.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct LoyaltyCustomer {
    pub id: String,
    pub business_id: String,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub points: i64,
    pub tier: LoyaltyTier,
    pub total_spent_cents: i64,
    pub visits_count: i64,
    pub last_visit: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Inventory Log
// =============================================================================

/// An audit entry for a manual stock adjustment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct InventoryLog {
    pub id: String,
    pub business_id: String,
    pub product_id: String,

    /// Product name snapshot at adjustment time.
    pub product_name: String,
    pub old_stock: i64,
    pub new_stock: i64,

    /// `new_stock - old_stock`.
    pub variance: i64,
    pub reason: Option<String>,
    pub cashier_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Unit Tests
// =============================================================================
