//! # whiz-docs: Document Generation for Whiz POS
//!
//! Renders the three printable documents the POS produces - sale
//! receipts, daily closing reports, and the business setup invoice -
//! by literal `{{placeholder}}` substitution over HTML templates.
//!
//! ## Module Organization
//!
//! - [`template`] - The placeholder substitution engine
//! - [`receipt`] - Sale receipt rendering
//! - [`closing`] - Daily closing report rendering
//! - [`setup`] - Business setup invoice rendering
//! - [`store`] - Template overrides and document output files
//! - [`error`] - Document error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use whiz_docs::{DocumentStore, TemplateKind};
//! use whiz_docs::receipt::{render_receipt, ReceiptContext};
//!
//! let store = DocumentStore::new("documents");
//! let template = store.template(TemplateKind::Receipt)?;
//! let html = render_receipt(&template, &ctx)?;
//! let path = store.write_document(&format!("receipt-{}.html", txn.id), &html)?;
//! ```
//!
//! Rendering never leaves a placeholder unresolved: `finish()` fails
//! listing any leftover tokens, and missing optional business fields
//! become empty sections.

pub mod closing;
pub mod error;
pub mod receipt;
pub mod setup;
pub mod store;
pub mod template;

pub use closing::{render_closing_report, CashierReport, ClosingReport, ItemSale};
pub use error::{DocError, DocResult};
pub use receipt::{render_receipt, ReceiptContext};
pub use setup::render_setup_invoice;
pub use store::{DocumentStore, TemplateKind};
pub use template::Template;
