use crate::diagnostics::diagnostic_category::DiagnosticCategory;
use crate::diagnostics::diagnostic_code::DiagnosticCode;
use crate::diagnostics::severity::DiagnosticSeverity;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A diagnostic message (error or warning) produced during extraction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub code: DiagnosticCode,
    pub severity: DiagnosticSeverity,
    pub category: DiagnosticCategory,
    pub message: String,
    /// The symbol display name or file path the diagnostic refers to
    pub subject: Option<String>,
}

impl Diagnostic {
    pub fn new(code: DiagnosticCode, message: String) -> Self {
        Self {
            severity: code.severity(),
            category: code.category(),
            code,
            message,
            subject: None,
        }
    }

    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    pub fn error(code: DiagnosticCode, message: String) -> Self {
        debug_assert!(matches!(code.severity(), DiagnosticSeverity::Error));
        Self::new(code, message)
    }

    pub fn warning(code: DiagnosticCode, message: String) -> Self {
        debug_assert!(matches!(code.severity(), DiagnosticSeverity::Warning));
        Self::new(code, message)
    }

    /// Create diagnostic with the default message for its code
    pub fn with_default_message(code: DiagnosticCode) -> Self {
        Self::new(code, code.default_message().to_string())
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.subject {
            Some(subject) => write!(
                f,
                "{}: {}: {} ({})",
                self.code.as_str(),
                self.severity.to_string().to_uppercase(),
                self.message,
                subject
            ),
            None => write!(
                f,
                "{}: {}: {}",
                self.code.as_str(),
                self.severity.to_string().to_uppercase(),
                self.message
            ),
        }
    }
}
