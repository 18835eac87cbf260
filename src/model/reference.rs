use serde::{Deserialize, Serialize};

/// Classification of a resolved cross-reference target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceKind {
    Type,
    Field,
    Property,
    Method,
    Event,
    Namespace,
    /// Plain http/https link
    External,
    /// Known vendor namespace resolved to a framework-docs URL
    Framework,
    Unknown,
}

/// A cref resolved into a portable link target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocReference {
    /// The raw cref string as written
    pub cref: String,
    pub kind: ReferenceKind,
    pub display_name: String,
    /// Documentation-root-relative page path, or an absolute URL for
    /// external/framework references. Collapses to the bare file name when
    /// source and target share a directory.
    pub relative_path: Option<String>,
    pub anchor: Option<String>,
    pub resolved: bool,
    /// Canonical ID of the target node in the reference map (non-owning)
    pub target_id: Option<String>,
}

impl DocReference {
    pub fn unresolved(cref: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            cref: cref.into(),
            kind: ReferenceKind::Unknown,
            display_name: display_name.into(),
            relative_path: None,
            anchor: None,
            resolved: false,
            target_id: None,
        }
    }
}
