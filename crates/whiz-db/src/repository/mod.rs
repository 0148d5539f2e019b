//! # Repository Implementations
//!
//! One repository per aggregate, each owning the SQL for its tables.
//!
//! ## Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Database (pool.rs)                                                     │
//! │       │                                                                 │
//! │       ├── businesses()    → BusinessRepository                         │
//! │       ├── users()         → UserRepository                             │
//! │       ├── devices()       → DeviceRepository                           │
//! │       ├── products()      → ProductRepository                          │
//! │       ├── transactions()  → TransactionRepository                      │
//! │       ├── expenses()      → ExpenseRepository                          │
//! │       ├── suppliers()     → SupplierRepository                         │
//! │       ├── loyalty()       → LoyaltyRepository                          │
//! │       └── inventory()     → InventoryLogRepository                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Repositories are cheap to construct (they hold a pool clone) and
//! return whiz-core types directly.

pub mod business;
pub mod device;
pub mod expense;
pub mod inventory;
pub mod loyalty;
pub mod product;
pub mod supplier;
pub mod transaction;
pub mod user;

pub use business::BusinessRepository;
pub use device::DeviceRepository;
pub use expense::ExpenseRepository;
pub use inventory::InventoryLogRepository;
pub use loyalty::LoyaltyRepository;
pub use product::ProductRepository;
pub use supplier::SupplierRepository;
pub use transaction::{
    CashierItemRow, CashierMethodTotal, DashboardStats, ItemSaleRow, TransactionRepository,
};
pub use user::UserRepository;
