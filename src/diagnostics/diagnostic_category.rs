use serde::{Deserialize, Serialize};

/// Diagnostic categories for organization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiagnosticCategory {
    Input,
    Metadata,
    XmlDoc,
    Reference,
    Overlay,
}
