use crate::diagnostics::diagnostic_category::DiagnosticCategory;
use crate::diagnostics::severity::DiagnosticSeverity;
use serde::{Deserialize, Serialize};

/// docnet diagnostic codes
/// Format: DNE[XXXXX] for errors, DNW[XXXXX] for warnings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiagnosticCode {
    // Input Errors (DNE01000-DNE01999)
    DNE01001, // Target binary not found
    DNE01002, // Required path argument missing or blank
    DNE01003, // Assembly symbol resolution failed
    DNE01004, // Processing cancelled by host
    DNE01005, // Assembly merge failed

    // Extraction Warnings (DNW01000-DNW01999)
    DNW01001, // Sidecar XML documentation file missing
    DNW01002, // Malformed XML doc comment on a symbol
    DNW01003, // Sidecar XML documentation file unreadable
    DNW01004, // Member symbol could not be resolved
    DNW01005, // Cross-reference could not be resolved

    // Overlay Warnings (DNW02000-DNW02999)
    DNW02001, // Conceptual overlay file unreadable
}

impl DiagnosticCode {
    pub fn severity(&self) -> DiagnosticSeverity {
        match self {
            // All DNE codes are errors
            DiagnosticCode::DNE01001
            | DiagnosticCode::DNE01002
            | DiagnosticCode::DNE01003
            | DiagnosticCode::DNE01004
            | DiagnosticCode::DNE01005 => DiagnosticSeverity::Error,

            // All DNW codes are warnings
            _ => DiagnosticSeverity::Warning,
        }
    }

    pub fn category(&self) -> DiagnosticCategory {
        match self {
            DiagnosticCode::DNE01001 | DiagnosticCode::DNE01002 => DiagnosticCategory::Input,

            DiagnosticCode::DNE01003
            | DiagnosticCode::DNE01004
            | DiagnosticCode::DNE01005
            | DiagnosticCode::DNW01004 => DiagnosticCategory::Metadata,

            DiagnosticCode::DNW01001 | DiagnosticCode::DNW01002 | DiagnosticCode::DNW01003 => {
                DiagnosticCategory::XmlDoc
            }

            DiagnosticCode::DNW01005 => DiagnosticCategory::Reference,

            DiagnosticCode::DNW02001 => DiagnosticCategory::Overlay,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticCode::DNE01001 => "DNE01001",
            DiagnosticCode::DNE01002 => "DNE01002",
            DiagnosticCode::DNE01003 => "DNE01003",
            DiagnosticCode::DNE01004 => "DNE01004",
            DiagnosticCode::DNE01005 => "DNE01005",
            DiagnosticCode::DNW01001 => "DNW01001",
            DiagnosticCode::DNW01002 => "DNW01002",
            DiagnosticCode::DNW01003 => "DNW01003",
            DiagnosticCode::DNW01004 => "DNW01004",
            DiagnosticCode::DNW01005 => "DNW01005",
            DiagnosticCode::DNW02001 => "DNW02001",
        }
    }

    pub fn default_message(&self) -> &'static str {
        match self {
            DiagnosticCode::DNE01001 => "Target binary not found",
            DiagnosticCode::DNE01002 => "Required path argument missing or blank",
            DiagnosticCode::DNE01003 => "Assembly symbol resolution failed",
            DiagnosticCode::DNE01004 => "Processing cancelled",
            DiagnosticCode::DNE01005 => "Assembly merge failed",
            DiagnosticCode::DNW01001 => "Sidecar XML documentation file missing",
            DiagnosticCode::DNW01002 => "Malformed XML doc comment",
            DiagnosticCode::DNW01003 => "Sidecar XML documentation file unreadable",
            DiagnosticCode::DNW01004 => "Member symbol could not be resolved",
            DiagnosticCode::DNW01005 => "Cross-reference could not be resolved",
            DiagnosticCode::DNW02001 => "Conceptual overlay file unreadable",
        }
    }
}
