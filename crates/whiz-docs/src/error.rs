//! Error types for document generation.

use thiserror::Error;

/// Document generation errors.
#[derive(Debug, Error)]
pub enum DocError {
    /// A template file override could not be read.
    #[error("Template not found: {0}")]
    TemplateNotFound(String),

    /// Rendering finished with `{{placeholder}}` tokens still present.
    ///
    /// ## When This Occurs
    /// - A template override references a placeholder the renderer
    ///   does not know about
    #[error("Unresolved placeholders: {}", .0.join(", "))]
    UnresolvedPlaceholders(Vec<String>),

    /// Filesystem failure reading a template or writing a document.
    #[error("Document I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for document operations.
pub type DocResult<T> = Result<T, DocError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unresolved_message_lists_tokens() {
        let err = DocError::UnresolvedPlaceholders(vec![
            "{{businessName}}".to_string(),
            "{{total}}".to_string(),
        ]);
        assert_eq!(
            err.to_string(),
            "Unresolved placeholders: {{businessName}}, {{total}}"
        );
    }
}
