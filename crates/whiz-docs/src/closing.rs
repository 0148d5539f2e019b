//! # Daily Closing Report Rendering
//!
//! End-of-day report: what every cashier sold and how it was paid.
//!
//! ## Report Shape
//! ```text
//! ┌────────────────────────────┐
//! │      BUSINESS NAME         │
//! │   DAILY CLOSING REPORT     │
//! │      Wed Aug 06 2026       │
//! ├────────────────────────────┤
//! │ ALL ITEMS SOLD             │ ← detailed mode only
//! │   item qty total ...       │
//! ├────────────────────────────┤
//! │ User: MARY                 │ ← one section per cashier,
//! │   Items Sold: ...          │   in input order
//! │   Payments Summary         │
//! │   Cash / M-Pesa / Credit   │
//! ├────────────────────────────┤
//! │ Grand totals               │
//! └────────────────────────────┘
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use whiz_core::money::Money;
use whiz_core::types::ReceiptProfile;
use whiz_core::DEFAULT_PAPER_WIDTH_MM;

use crate::error::DocResult;
use crate::template::Template;

// =============================================================================
// Report Data
// =============================================================================

/// Aggregated sales of one item (by name) for the day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemSale {
    pub name: String,
    pub quantity: i64,
    pub total: Money,
}

/// One cashier's slice of the day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CashierReport {
    pub cashier_name: String,
    pub items: Vec<ItemSale>,
    pub cash_total: Money,
    pub mpesa_total: Money,
    pub credit_total: Money,
}

impl CashierReport {
    /// Everything this cashier took, across payment methods.
    pub fn total_sales(&self) -> Money {
        self.cash_total + self.mpesa_total + self.credit_total
    }
}

/// The aggregated closing report for one day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClosingReport {
    pub date: NaiveDate,

    /// Day-wide per-item totals, across cashiers.
    pub item_sales: Vec<ItemSale>,

    /// Cashier sections, rendered in this order.
    pub cashiers: Vec<CashierReport>,
}

impl ClosingReport {
    pub fn total_cash(&self) -> Money {
        self.cashiers.iter().map(|c| c.cash_total).sum()
    }

    pub fn total_mpesa(&self) -> Money {
        self.cashiers.iter().map(|c| c.mpesa_total).sum()
    }

    pub fn total_credit(&self) -> Money {
        self.cashiers.iter().map(|c| c.credit_total).sum()
    }

    pub fn grand_total(&self) -> Money {
        self.cashiers.iter().map(|c| c.total_sales()).sum()
    }
}

// =============================================================================
// Rendering
// =============================================================================

/// Renders the closing report document.
///
/// `detailed` controls the item tables: when false, only the payment
/// summaries are printed.
pub fn render_closing_report(
    template_html: &str,
    report: &ClosingReport,
    profile: &ReceiptProfile,
    detailed: bool,
) -> DocResult<String> {
    let paper_width = if profile.printer_paper_width > 0 {
        profile.printer_paper_width
    } else {
        DEFAULT_PAPER_WIDTH_MM
    };

    let mut sections = String::new();
    if detailed {
        sections.push_str(&global_items_html(&report.item_sales));
    }
    for cashier in &report.cashiers {
        sections.push_str(&cashier_section_html(cashier, detailed));
    }

    Template::new(template_html)
        .set("paperWidth", &paper_width.to_string())
        .set("businessName", &profile.business_name)
        .set("businessAddress", profile.address.as_deref().unwrap_or(""))
        .set("businessPhone", profile.phone.as_deref().unwrap_or(""))
        .set("date", &report.date.format("%a %b %d %Y").to_string())
        .set("cashierSections", &sections)
        .set("totalCash", &report.total_cash().to_string())
        .set("totalMpesa", &report.total_mpesa().to_string())
        .set("totalCredit", &report.total_credit().to_string())
        .set("grandTotal", &report.grand_total().to_string())
        .finish()
}

fn item_rows_html(items: &[ItemSale]) -> String {
    items
        .iter()
        .map(|item| {
            format!(
                "<tr>\
                 <td style=\"text-align: left; padding: 2px;\">{}</td>\
                 <td style=\"text-align: center; padding: 2px;\">{}</td>\
                 <td style=\"text-align: right; padding: 2px;\">{}</td>\
                 </tr>",
                item.name,
                item.quantity,
                item.total.format_amount(),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Day-wide "ALL ITEMS SOLD" table, prepended ahead of the cashier
/// sections. Empty when there were no sales.
fn global_items_html(item_sales: &[ItemSale]) -> String {
    if item_sales.is_empty() {
        return String::new();
    }

    format!(
        "<div style=\"margin-bottom: 20px; border-bottom: 2px solid #000; padding-bottom: 10px;\">\n\
         <h3 style=\"margin: 0 0 5px 0; font-size: 14px; text-transform: uppercase; text-align: center;\">ALL ITEMS SOLD</h3>\n\
         <table style=\"width: 100%; font-size: 12px; border-collapse: collapse;\">\n\
         <thead style=\"border-bottom: 1px solid #000;\">\n\
         <tr><th style=\"text-align: left;\">Item</th>\
         <th style=\"text-align: center;\">Qty</th>\
         <th style=\"text-align: right;\">Total</th></tr>\n\
         </thead>\n<tbody>\n{}\n</tbody>\n</table>\n</div>\n",
        item_rows_html(item_sales)
    )
}

fn cashier_section_html(cashier: &CashierReport, detailed: bool) -> String {
    let items_table = if !detailed {
        String::new()
    } else if cashier.items.is_empty() {
        "<p style=\"font-size: 12px; font-style: italic;\">No items sold.</p>".to_string()
    } else {
        format!(
            "<div style=\"margin-bottom: 5px;\">\n\
             <h4 style=\"margin: 0 0 2px 0; font-size: 12px; font-weight: bold;\">Items Sold:</h4>\n\
             <table style=\"width: 100%; font-size: 12px; border-collapse: collapse;\">\n\
             <thead style=\"border-bottom: 1px dashed #000;\">\n\
             <tr><th style=\"text-align: left;\">Item</th>\
             <th style=\"text-align: center;\">Qty</th>\
             <th style=\"text-align: right;\">Total</th></tr>\n\
             </thead>\n<tbody>\n{}\n</tbody>\n</table>\n</div>",
            item_rows_html(&cashier.items)
        )
    };

    format!(
        "<div class=\"cashier-section\" style=\"margin-bottom: 20px; border-bottom: 2px solid #000; padding-bottom: 10px;\">\n\
         <h3 style=\"margin: 0 0 5px 0; font-size: 14px; text-transform: uppercase;\">User: {}</h3>\n\
         {}\n\
         <div class=\"summary\" style=\"font-size: 12px; padding: 5px;\">\n\
         <h4 style=\"margin: 0 0 2px 0; font-size: 12px; font-weight: bold; text-decoration: underline;\">Payments Summary</h4>\n\
         <div style=\"display: flex; justify-content: space-between;\"><span>Cash:</span><span>{}</span></div>\n\
         <div style=\"display: flex; justify-content: space-between;\"><span>M-Pesa:</span><span>{}</span></div>\n\
         <div style=\"display: flex; justify-content: space-between;\"><span>Credit:</span><span>{}</span></div>\n\
         <div style=\"display: flex; justify-content: space-between; font-weight: bold;\"><span>Total:</span><span>{}</span></div>\n\
         </div>\n</div>\n",
        cashier.cashier_name,
        items_table,
        cashier.cash_total.format_amount(),
        cashier.mpesa_total.format_amount(),
        cashier.credit_total.format_amount(),
        cashier.total_sales().format_amount(),
    )
}

// =============================================================================
// Unit Tests
// =============================================================================
