//! Diagnostics returned to the caller of a lifecycle operation

use crate::jumpcloud::http::format_api_error;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// A user-visible problem report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    /// Attribute the diagnostic refers to, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribute: Option<String>,
}

impl Diagnostic {
    pub fn error(summary: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            summary: summary.into(),
            detail: None,
            attribute: None,
        }
    }

    pub fn warning(summary: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            ..Self::error(summary)
        }
    }

    pub fn with_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.attribute = Some(attribute.into());
        self
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Convert an operation error; the full context chain becomes the summary
    pub fn from_error(error: &anyhow::Error) -> Self {
        Self::error(format!("{:#}", error)).with_detail(format_api_error(error))
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

pub fn has_errors(diagnostics: &[Diagnostic]) -> bool {
    diagnostics.iter().any(Diagnostic::is_error)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_error_keeps_context_chain() {
        let err = anyhow::anyhow!("API request failed: 500 Internal Server Error")
            .context("could not find system specified");
        let diag = Diagnostic::from_error(&err);

        assert!(diag.is_error());
        assert_eq!(
            diag.summary,
            "could not find system specified: API request failed: 500 Internal Server Error"
        );
        assert!(diag.detail.is_some());
    }

    #[test]
    fn test_has_errors_ignores_warnings() {
        let diags = vec![Diagnostic::warning("heads up")];
        assert!(!has_errors(&diags));
        assert!(has_errors(&[Diagnostic::error("boom").with_attribute("name")]));
    }
}
