//! # Document Store
//!
//! The filesystem half of document generation: template overrides in,
//! rendered documents out.
//!
//! ## Layout
//! ```text
//! <template_dir>/             ← optional overrides, falls back to the
//!     receipt.html              templates embedded in this crate
//!     closing-report.html
//!     setup-invoice.html
//!
//! <output_dir>/               ← generated documents
//!     receipt-<txn id>.html
//!     closing-report-<date>.html
//!     setup-invoice-<business id>.html
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::DocResult;

/// Embedded default templates.
const RECEIPT_TEMPLATE: &str = include_str!("../templates/receipt.html");
const CLOSING_TEMPLATE: &str = include_str!("../templates/closing-report.html");
const SETUP_TEMPLATE: &str = include_str!("../templates/setup-invoice.html");

/// Which document a template renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateKind {
    Receipt,
    ClosingReport,
    SetupInvoice,
}

impl TemplateKind {
    /// Override file name looked up inside the template directory.
    pub const fn file_name(&self) -> &'static str {
        match self {
            TemplateKind::Receipt => "receipt.html",
            TemplateKind::ClosingReport => "closing-report.html",
            TemplateKind::SetupInvoice => "setup-invoice.html",
        }
    }

    const fn embedded(&self) -> &'static str {
        match self {
            TemplateKind::Receipt => RECEIPT_TEMPLATE,
            TemplateKind::ClosingReport => CLOSING_TEMPLATE,
            TemplateKind::SetupInvoice => SETUP_TEMPLATE,
        }
    }
}

/// Loads templates and persists rendered documents.
#[derive(Debug, Clone)]
pub struct DocumentStore {
    template_dir: Option<PathBuf>,
    output_dir: PathBuf,
}

impl DocumentStore {
    /// Creates a store writing documents under `output_dir`.
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        DocumentStore {
            template_dir: None,
            output_dir: output_dir.into(),
        }
    }

    /// Uses `template_dir` for template overrides.
    pub fn with_template_dir(mut self, template_dir: impl Into<PathBuf>) -> Self {
        self.template_dir = Some(template_dir.into());
        self
    }

    /// Returns the template HTML for `kind`.
    ///
    /// An override file in the template directory wins; otherwise the
    /// embedded default is used.
    pub fn template(&self, kind: TemplateKind) -> DocResult<String> {
        if let Some(dir) = &self.template_dir {
            let path = dir.join(kind.file_name());
            if path.exists() {
                debug!(path = %path.display(), "Loading template override");
                return Ok(fs::read_to_string(&path)?);
            }
        }
        Ok(kind.embedded().to_string())
    }

    /// Writes a rendered document and returns its path.
    pub fn write_document(&self, file_name: &str, html: &str) -> DocResult<PathBuf> {
        fs::create_dir_all(&self.output_dir)?;
        let path = self.output_dir.join(file_name);
        fs::write(&path, html)?;
        debug!(path = %path.display(), "Document written");
        Ok(path)
    }

    /// Directory rendered documents land in.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("whiz-docs-test-{name}-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_embedded_templates_are_used_by_default() {
        let store = DocumentStore::new(temp_dir("out1"));
        let html = store.template(TemplateKind::Receipt).unwrap();
        assert!(html.contains("{{businessName}}"));
    }

    #[test]
    fn test_override_wins_when_present() {
        let tpl_dir = temp_dir("tpl");
        fs::create_dir_all(&tpl_dir).unwrap();
        fs::write(tpl_dir.join("receipt.html"), "custom {{businessName}}").unwrap();

        let store = DocumentStore::new(temp_dir("out2")).with_template_dir(&tpl_dir);
        let html = store.template(TemplateKind::Receipt).unwrap();
        assert_eq!(html, "custom {{businessName}}");

        // Kinds without an override still fall back
        let closing = store.template(TemplateKind::ClosingReport).unwrap();
        assert!(closing.contains("DAILY CLOSING REPORT"));

        let _ = fs::remove_dir_all(&tpl_dir);
    }

    #[test]
    fn test_write_document_creates_output_dir() {
        let out_dir = temp_dir("out3");
        let store = DocumentStore::new(&out_dir);

        let path = store.write_document("receipt-abc.html", "<html></html>").unwrap();
        assert!(path.exists());
        assert_eq!(fs::read_to_string(&path).unwrap(), "<html></html>");

        let _ = fs::remove_dir_all(&out_dir);
    }
}
