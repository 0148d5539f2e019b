//! # Template Engine
//!
//! Literal `{{placeholder}}` substitution over HTML templates.
//!
//! ## How Rendering Works
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Template Rendering                                 │
//! │                                                                         │
//! │  Template HTML ("...<h1>{{businessName}}</h1>...")                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Template::new(html)                                                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  .set("businessName", "Kagwe General Store")   ← ordered, literal      │
//! │  .set("total", "Ksh 1250.00")                                          │
//! │  ...                                                                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  .finish() ── any {{...}} left? ──► Err(UnresolvedPlaceholders)        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Final HTML, guaranteed placeholder-free                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Substitutions are applied in call order. `set` replaces every
//! occurrence of its token, so a template may reuse a placeholder
//! (paper width appears in two CSS rules, for example). Values are
//! inserted verbatim; conditional sections are passed as pre-built HTML
//! or the empty string.

use crate::error::{DocError, DocResult};

/// A template mid-substitution.
#[derive(Debug, Clone)]
pub struct Template {
    content: String,
}

impl Template {
    /// Wraps raw template HTML.
    pub fn new(content: impl Into<String>) -> Self {
        Template {
            content: content.into(),
        }
    }

    /// Substitutes `{{key}}` with `value`, consuming and returning the
    /// template so calls chain.
    pub fn set(mut self, key: &str, value: &str) -> Self {
        let token = format!("{{{{{key}}}}}");
        if self.content.contains(&token) {
            self.content = self.content.replace(&token, value);
        }
        self
    }

    /// Lists `{{...}}` tokens still present, in document order.
    pub fn unresolved(&self) -> Vec<String> {
        let mut tokens = Vec::new();
        let mut rest = self.content.as_str();

        while let Some(open) = rest.find("{{") {
            let after = &rest[open + 2..];
            match after.find("}}") {
                Some(close) => {
                    tokens.push(format!("{{{{{}}}}}", &after[..close]));
                    rest = &after[close + 2..];
                }
                None => break,
            }
        }

        tokens
    }

    /// Returns the rendered document, or fails if any placeholder
    /// survived substitution.
    pub fn finish(self) -> DocResult<String> {
        let leftover = self.unresolved();
        if !leftover.is_empty() {
            return Err(DocError::UnresolvedPlaceholders(leftover));
        }
        Ok(self.content)
    }

    /// The current (possibly partially substituted) content.
    pub fn content(&self) -> &str {
        &self.content
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_substitutes_token() {
        let html = Template::new("<h1>{{name}}</h1>")
            .set("name", "Whiz POS")
            .finish()
            .unwrap();
        assert_eq!(html, "<h1>Whiz POS</h1>");
    }

    #[test]
    fn test_set_substitutes_every_occurrence() {
        let html = Template::new("{{w}}mm wide, {{w}}mm page")
            .set("w", "80")
            .finish()
            .unwrap();
        assert_eq!(html, "80mm wide, 80mm page");
    }

    #[test]
    fn test_substitution_is_ordered_and_literal() {
        // A value containing another token is inserted verbatim and
        // then resolved by a later set call, matching call order.
        let html = Template::new("{{outer}}")
            .set("outer", "a {{inner}} b")
            .set("inner", "x")
            .finish()
            .unwrap();
        assert_eq!(html, "a x b");
    }

    #[test]
    fn test_missing_value_is_reported() {
        let result = Template::new("<p>{{left}} and {{right}}</p>")
            .set("left", "done")
            .finish();

        match result {
            Err(DocError::UnresolvedPlaceholders(tokens)) => {
                assert_eq!(tokens, vec!["{{right}}".to_string()]);
            }
            other => panic!("expected unresolved placeholder error, got {other:?}"),
        }
    }

    #[test]
    fn test_unresolved_lists_in_document_order() {
        let template = Template::new("{{b}} ... {{a}} ... {{c}}");
        assert_eq!(
            template.unresolved(),
            vec!["{{b}}".to_string(), "{{a}}".to_string(), "{{c}}".to_string()]
        );
    }

    #[test]
    fn test_empty_value_clears_section() {
        let html = Template::new("<div>{{footer}}</div>")
            .set("footer", "")
            .finish()
            .unwrap();
        assert_eq!(html, "<div></div>");
    }

    #[test]
    fn test_unknown_key_is_a_noop() {
        let template = Template::new("plain text").set("anything", "value");
        assert_eq!(template.content(), "plain text");
    }
}
