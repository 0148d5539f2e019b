//! # Sale Receipt Rendering
//!
//! Fills the receipt template from a completed transaction and the
//! business's receipt profile.
//!
//! ## Layout
//! ```text
//! ┌────────────────────────────┐
//! │       BUSINESS NAME        │
//! │     address / phone        │
//! │      receipt header        │
//! ├────────────────────────────┤
//! │ Receipt No / Date / Served │
//! │ Customer / Payment         │
//! ├────────────────────────────┤
//! │ Item        Qty      Price │
//! │ ...one row per line item   │
//! ├────────────────────────────┤
//! │ Subtotal / Tax / TOTAL     │
//! │ (M-Pesa paybill/till)      │ ← only when configured
//! │ (receipt footer)           │ ← only when configured
//! │ (developer credit)         │ ← unless switched off
//! └────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};

use whiz_core::money::Money;
use whiz_core::types::{Payment, ReceiptProfile, Transaction, TransactionItem};
use whiz_core::{PaymentMethod, DEFAULT_PAPER_WIDTH_MM, WALK_IN_CUSTOMER};

use crate::error::DocResult;
use crate::template::Template;

/// Greeting used when the business has not configured one.
const DEFAULT_RECEIPT_HEADER: &str = "Thank you for your business!";

/// Everything the receipt renderer needs about one sale.
#[derive(Debug, Clone)]
pub struct ReceiptContext<'a> {
    pub transaction: &'a Transaction,
    pub items: &'a [TransactionItem],
    pub payments: &'a [Payment],
    pub profile: &'a ReceiptProfile,

    /// Adds a "(REPRINT)" marker to the receipt number.
    pub reprint: bool,
}

/// Renders a receipt document from the given template HTML.
///
/// Every placeholder is resolved; optional profile fields render as
/// empty sections rather than literal "None"/"undefined" text.
pub fn render_receipt(template_html: &str, ctx: &ReceiptContext<'_>) -> DocResult<String> {
    let txn = ctx.transaction;
    let profile = ctx.profile;

    let paper_width = paper_width(profile);
    let method = primary_method(ctx.payments);

    let receipt_id = if ctx.reprint {
        format!("{} (REPRINT)", txn.id)
    } else {
        txn.id.clone()
    };

    let customer = match (&method, &txn.credit_customer) {
        (PaymentMethod::Credit, Some(name)) => name.clone(),
        _ => WALK_IN_CUSTOMER.to_string(),
    };

    let header = profile
        .receipt_header
        .clone()
        .unwrap_or_else(|| DEFAULT_RECEIPT_HEADER.to_string());

    let footer_html = match profile.receipt_footer.as_deref() {
        Some(text) if !text.is_empty() => format!("<p>{text}</p>"),
        _ => String::new(),
    };

    Template::new(template_html)
        .set("paperWidth", &paper_width.to_string())
        .set("businessName", &profile.business_name)
        .set("address", profile.address.as_deref().unwrap_or(""))
        .set("phone", profile.phone.as_deref().unwrap_or(""))
        .set("receiptHeader", &header)
        .set("receiptId", &receipt_id)
        .set("date", &format_receipt_date(txn.created_at))
        .set("servedBy", &txn.cashier_name)
        .set("customer", &customer)
        .set("paymentMethod", method.receipt_label())
        .set("itemsHtml", &items_html(ctx.items))
        .set(
            "subtotal",
            &Money::from_cents(txn.subtotal_cents).to_string(),
        )
        .set("tax", &Money::from_cents(txn.tax_cents).to_string())
        .set("total", &Money::from_cents(txn.total_cents).to_string())
        .set("mpesaDetails", &mpesa_details_html(profile))
        .set("receiptFooter", &footer_html)
        .set("developerFooter", &developer_footer_html(profile))
        .finish()
}

/// Formats a timestamp as `YYYY-MM-DD HH:MM AM/PM`.
pub fn format_receipt_date(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %I:%M %p").to_string()
}

fn paper_width(profile: &ReceiptProfile) -> i64 {
    if profile.printer_paper_width > 0 {
        profile.printer_paper_width
    } else {
        DEFAULT_PAPER_WIDTH_MM
    }
}

/// Receipts show a single payment method. Split tender is not a thing
/// at the till; the first payment wins, cash when there are none.
fn primary_method(payments: &[Payment]) -> PaymentMethod {
    payments
        .first()
        .map(|p| p.method)
        .unwrap_or(PaymentMethod::Cash)
}

/// One `<tr>` per line item, concatenated in input order.
fn items_html(items: &[TransactionItem]) -> String {
    items
        .iter()
        .map(|item| {
            format!(
                "<tr><td>{}</td><td class=\"qty\">{}</td><td class=\"price\">{}</td></tr>",
                item.name,
                item.quantity,
                Money::from_cents(item.unit_price_cents).format_amount(),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Paybill/till block, present only when the business configured one.
fn mpesa_details_html(profile: &ReceiptProfile) -> String {
    let mut details = Vec::new();

    if let Some(paybill) = profile.mpesa_paybill.as_deref() {
        let account = profile
            .mpesa_account_number
            .as_deref()
            .unwrap_or("Business No");
        details.push(format!(
            "<p>Paybill No: <b>{paybill}</b> | A/C No: <b>{account}</b></p>"
        ));
    }

    if let Some(till) = profile.mpesa_till.as_deref() {
        details.push(format!(
            "<p style=\"text-align: center;\">Pay By Till : <b>{till}</b></p>"
        ));
    }

    if details.is_empty() {
        return String::new();
    }

    format!(
        "<div class=\"separator\"></div>\n<div class=\"info\">\n{}\n</div>",
        details.join("")
    )
}

/// Developer credit line, on by default.
fn developer_footer_html(profile: &ReceiptProfile) -> String {
    if !profile.show_developer_footer {
        return String::new();
    }

    "<div class=\"footer-dev\">\n\
     <p>System Designed and serviced by Whiz tech</p>\n\
     <p>Tell: 0740 841 168</p>\n\
     </div>"
        .to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use whiz_core::types::TransactionStatus;

    const TEMPLATE: &str = include_str!("../templates/receipt.html");

    fn profile() -> ReceiptProfile {
        ReceiptProfile {
            business_name: "Kagwe General Store".to_string(),
            address: Some("Kagwe Town, Kiambu".to_string()),
            phone: Some("0712 000000".to_string()),
            receipt_header: None,
            receipt_footer: None,
            mpesa_paybill: None,
            mpesa_account_number: None,
            mpesa_till: None,
            show_developer_footer: true,
            printer_paper_width: 80,
        }
    }

    fn transaction() -> Transaction {
        let ts = Utc.with_ymd_and_hms(2026, 8, 6, 14, 5, 0).unwrap();
        Transaction {
            id: "txn-0001".to_string(),
            business_id: "b1".to_string(),
            device_id: None,
            user_id: "u1".to_string(),
            cashier_name: "Mary".to_string(),
            status: TransactionStatus::Completed,
            subtotal_cents: 17500,
            tax_cents: 0,
            total_cents: 17500,
            credit_customer: None,
            created_at: ts,
            updated_at: ts,
        }
    }

    fn items() -> Vec<TransactionItem> {
        vec![
            TransactionItem {
                id: "i1".to_string(),
                transaction_id: "txn-0001".to_string(),
                product_id: "p1".to_string(),
                name: "Bread".to_string(),
                quantity: 2,
                unit_price_cents: 6000,
                line_total_cents: 12000,
            },
            TransactionItem {
                id: "i2".to_string(),
                transaction_id: "txn-0001".to_string(),
                product_id: "p2".to_string(),
                name: "Milk 500ml".to_string(),
                quantity: 1,
                unit_price_cents: 5500,
                line_total_cents: 5500,
            },
        ]
    }

    fn payment(method: PaymentMethod) -> Payment {
        Payment {
            id: "pay1".to_string(),
            transaction_id: "txn-0001".to_string(),
            method,
            amount_cents: 17500,
            created_at: Utc.with_ymd_and_hms(2026, 8, 6, 14, 5, 0).unwrap(),
        }
    }

    fn render(ctx: &ReceiptContext<'_>) -> String {
        render_receipt(TEMPLATE, ctx).expect("receipt renders")
    }

    #[test]
    fn test_receipt_has_no_unresolved_placeholders() {
        let txn = transaction();
        let items = items();
        let payments = vec![payment(PaymentMethod::Cash)];
        let profile = profile();

        let html = render(&ReceiptContext {
            transaction: &txn,
            items: &items,
            payments: &payments,
            profile: &profile,
            reprint: false,
        });

        assert!(!html.contains("{{"), "placeholders left in: {html}");
    }

    #[test]
    fn test_receipt_body() {
        let txn = transaction();
        let items = items();
        let payments = vec![payment(PaymentMethod::Cash)];
        let profile = profile();

        let html = render(&ReceiptContext {
            transaction: &txn,
            items: &items,
            payments: &payments,
            profile: &profile,
            reprint: false,
        });

        assert!(html.contains("Kagwe General Store"));
        assert!(html.contains("Receipt No: txn-0001"));
        assert!(html.contains("Date: 2026-08-06 02:05 PM"));
        assert!(html.contains("Served By: Mary"));
        assert!(html.contains("Customer: Walk Through Customer"));
        assert!(html.contains("Payment: CASH"));
        assert!(html.contains("<td>Bread</td><td class=\"qty\">2</td><td class=\"price\">60.00</td>"));
        assert!(html.contains("Ksh 175.00"));
        // Item rows follow input order
        let bread = html.find("Bread").unwrap();
        let milk = html.find("Milk 500ml").unwrap();
        assert!(bread < milk);
    }

    #[test]
    fn test_reprint_marker() {
        let txn = transaction();
        let items = items();
        let payments = vec![payment(PaymentMethod::Cash)];
        let profile = profile();

        let html = render(&ReceiptContext {
            transaction: &txn,
            items: &items,
            payments: &payments,
            profile: &profile,
            reprint: true,
        });

        assert!(html.contains("txn-0001 (REPRINT)"));
    }

    #[test]
    fn test_credit_sale_prints_customer_name() {
        let mut txn = transaction();
        txn.credit_customer = Some("John Kamau".to_string());
        let items = items();
        let payments = vec![payment(PaymentMethod::Credit)];
        let profile = profile();

        let html = render(&ReceiptContext {
            transaction: &txn,
            items: &items,
            payments: &payments,
            profile: &profile,
            reprint: false,
        });

        assert!(html.contains("Customer: John Kamau"));
        assert!(html.contains("Payment: CREDIT"));
    }

    #[test]
    fn test_missing_optional_fields_render_empty_not_undefined() {
        let txn = transaction();
        let items = items();
        let payments = vec![payment(PaymentMethod::Cash)];
        let mut profile = profile();
        profile.address = None;
        profile.phone = None;
        profile.receipt_footer = None;

        let html = render(&ReceiptContext {
            transaction: &txn,
            items: &items,
            payments: &payments,
            profile: &profile,
            reprint: false,
        });

        assert!(!html.contains("undefined"));
        assert!(!html.contains("None"));
        // Default greeting is used when none is configured
        assert!(html.contains("Thank you for your business!"));
    }

    #[test]
    fn test_mpesa_block_only_when_configured() {
        let txn = transaction();
        let items = items();
        let payments = vec![payment(PaymentMethod::Cash)];

        let bare = profile();
        let html = render(&ReceiptContext {
            transaction: &txn,
            items: &items,
            payments: &payments,
            profile: &bare,
            reprint: false,
        });
        assert!(!html.contains("Paybill No"));
        assert!(!html.contains("Pay By Till"));

        let mut configured = profile();
        configured.mpesa_paybill = Some("522522".to_string());
        configured.mpesa_till = Some("832909".to_string());
        let html = render(&ReceiptContext {
            transaction: &txn,
            items: &items,
            payments: &payments,
            profile: &configured,
            reprint: false,
        });
        assert!(html.contains("Paybill No: <b>522522</b>"));
        // Account number falls back to the generic label
        assert!(html.contains("A/C No: <b>Business No</b>"));
        assert!(html.contains("Pay By Till : <b>832909</b>"));
    }

    #[test]
    fn test_developer_footer_toggle() {
        let txn = transaction();
        let items = items();
        let payments = vec![payment(PaymentMethod::Cash)];

        let on = profile();
        let html = render(&ReceiptContext {
            transaction: &txn,
            items: &items,
            payments: &payments,
            profile: &on,
            reprint: false,
        });
        assert!(html.contains("Whiz tech"));

        let mut off = profile();
        off.show_developer_footer = false;
        let html = render(&ReceiptContext {
            transaction: &txn,
            items: &items,
            payments: &payments,
            profile: &off,
            reprint: false,
        });
        assert!(!html.contains("Whiz tech"));
    }

    #[test]
    fn test_paper_width_substituted() {
        let txn = transaction();
        let items = items();
        let payments = vec![payment(PaymentMethod::Cash)];
        let mut profile = profile();
        profile.printer_paper_width = 58;

        let html = render(&ReceiptContext {
            transaction: &txn,
            items: &items,
            payments: &payments,
            profile: &profile,
            reprint: false,
        });

        assert!(html.contains("size: 58mm auto"));
        assert!(html.contains("width: 58mm"));
    }
}
