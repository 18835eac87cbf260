//! docnet main library
//!
//! Extracts a structured documentation model from compiled .NET assemblies
//! and their sidecar XML documentation files.

pub mod cli;
pub mod collab;
pub mod conceptual;
pub mod diagnostics;
pub mod metadata;
pub mod model;
pub mod options;
pub mod pipeline;
pub mod xmldoc;
pub mod xref;

// Minimal re-exports only where ergonomic
pub use collab::Collaborators;
pub use diagnostics::diagnostic::Diagnostic;
pub use diagnostics::diagnostic_code::DiagnosticCode;
pub use diagnostics::diagnostic_collection::DiagnosticCollection;
pub use diagnostics::severity::DiagnosticSeverity;
pub use options::{DocOptions, Visibility};
pub use pipeline::{CancelToken, DocInput, DocPipeline, ProcessResult};
