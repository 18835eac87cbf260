// Conceptual content module - overlay loading and placeholder scaffolding

pub mod overlay;
pub mod scaffold;

pub use overlay::{OverlayLoader, PLACEHOLDER_MARKER, is_placeholder_text};
pub use scaffold::{ScaffoldReport, generate_placeholders};
