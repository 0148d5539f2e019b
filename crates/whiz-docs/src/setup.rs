//! # Business Setup Invoice Rendering
//!
//! The one-page document printed when a business finishes onboarding:
//! business details plus the first admin's name and login PIN.

use whiz_core::types::ReceiptProfile;
use whiz_core::DEFAULT_PAPER_WIDTH_MM;

use crate::error::DocResult;
use crate::template::Template;

/// Renders the setup invoice.
///
/// `admin_pin` is the plaintext PIN chosen at registration; this is the
/// single place it is ever written out, so the admin can log in for the
/// first time.
pub fn render_setup_invoice(
    template_html: &str,
    profile: &ReceiptProfile,
    admin_name: &str,
    admin_pin: &str,
) -> DocResult<String> {
    let paper_width = if profile.printer_paper_width > 0 {
        profile.printer_paper_width
    } else {
        DEFAULT_PAPER_WIDTH_MM
    };

    Template::new(template_html)
        .set("paperWidth", &paper_width.to_string())
        .set("businessName", &profile.business_name)
        .set("businessAddress", profile.address.as_deref().unwrap_or(""))
        .set("businessPhone", profile.phone.as_deref().unwrap_or(""))
        .set("adminName", admin_name)
        .set("adminPin", admin_pin)
        .finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEMPLATE: &str = include_str!("../templates/setup-invoice.html");

    #[test]
    fn test_setup_invoice_renders() {
        let profile = ReceiptProfile {
            business_name: "Kagwe General Store".to_string(),
            address: Some("Kagwe Town".to_string()),
            printer_paper_width: 80,
            ..Default::default()
        };

        let html = render_setup_invoice(TEMPLATE, &profile, "Jane Wanjiku", "4821").unwrap();
        assert!(!html.contains("{{"));
        assert!(html.contains("Administrator: Jane Wanjiku"));
        assert!(html.contains("Login PIN: 4821"));
    }

    #[test]
    fn test_missing_address_renders_empty() {
        let profile = ReceiptProfile {
            business_name: "Duka".to_string(),
            printer_paper_width: 0,
            ..Default::default()
        };

        let html = render_setup_invoice(TEMPLATE, &profile, "Admin", "1234").unwrap();
        assert!(!html.contains("undefined"));
        // Zero paper width falls back to the 80mm default
        assert!(html.contains("size: 80mm auto"));
    }
}
