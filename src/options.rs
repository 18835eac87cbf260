use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;

/// Member accessibility levels recognized by the extraction filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Visibility {
    Public,
    Internal,
    Protected,
    ProtectedOrInternal,
    ProtectedAndInternal,
    Private,
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Visibility::Public => write!(f, "public"),
            Visibility::Internal => write!(f, "internal"),
            Visibility::Protected => write!(f, "protected"),
            Visibility::ProtectedOrInternal => write!(f, "protected internal"),
            Visibility::ProtectedAndInternal => write!(f, "private protected"),
            Visibility::Private => write!(f, "private"),
        }
    }
}

/// How namespace segments map onto the conceptual/output directory tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NamespaceMode {
    /// One directory per namespace segment
    #[default]
    Folder,
    /// Flat file names joined with `namespace_separator`
    File,
}

/// Configuration for a documentation extraction run.
///
/// Deserializable from JSON or TOML; every field has a sensible default so a
/// partial config file is enough.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocOptions {
    /// Accessibility levels included in the model
    #[serde(default = "default_visibilities")]
    pub included_visibilities: BTreeSet<Visibility>,

    /// Include members inherited from System.Object
    #[serde(default = "default_true")]
    pub include_object_inheritance: bool,

    /// Include members inherited from base types
    #[serde(default)]
    pub include_inherited: bool,

    /// Synthesize shadow types for extension methods over external types
    #[serde(default = "default_true")]
    pub create_external_type_references: bool,

    /// Treat placeholder overlay files as real content
    #[serde(default = "default_true")]
    pub show_placeholders: bool,

    /// Load the conceptual overlay after merging
    #[serde(default)]
    pub conceptual_docs_enabled: bool,

    /// Root of the conceptual overlay tree
    #[serde(default)]
    pub conceptual_path: Option<PathBuf>,

    /// Root all relative documentation paths are computed against
    #[serde(default)]
    pub documentation_root_path: Option<PathBuf>,

    /// Directory segment prefixed to API reference links
    #[serde(default = "default_api_reference_path")]
    pub api_reference_path: String,

    /// Glob-like patterns for type names to exclude (`*` wildcard)
    #[serde(default)]
    pub excluded_type_patterns: Vec<String>,

    #[serde(default)]
    pub namespace_mode: NamespaceMode,

    /// Separator used when `namespace_mode` is `File`
    #[serde(default = "default_namespace_separator")]
    pub namespace_separator: char,
}

fn default_visibilities() -> BTreeSet<Visibility> {
    BTreeSet::from([Visibility::Public])
}

fn default_true() -> bool {
    true
}

fn default_api_reference_path() -> String {
    "api".to_string()
}

fn default_namespace_separator() -> char {
    '.'
}

impl Default for DocOptions {
    fn default() -> Self {
        Self {
            included_visibilities: default_visibilities(),
            include_object_inheritance: true,
            include_inherited: false,
            create_external_type_references: true,
            show_placeholders: true,
            conceptual_docs_enabled: false,
            conceptual_path: None,
            documentation_root_path: None,
            api_reference_path: default_api_reference_path(),
            excluded_type_patterns: Vec::new(),
            namespace_mode: NamespaceMode::default(),
            namespace_separator: default_namespace_separator(),
        }
    }
}

impl DocOptions {
    pub fn includes(&self, visibility: Visibility) -> bool {
        self.included_visibilities.contains(&visibility)
    }

    /// Check a type name (simple or fully qualified) against the exclusion patterns.
    pub fn is_excluded(&self, simple_name: &str, full_name: &str) -> bool {
        self.excluded_type_patterns
            .iter()
            .any(|p| glob_match(p, simple_name) || glob_match(p, full_name))
    }
}

/// Minimal glob matching: `*` matches any run of characters, everything else
/// is literal. Patterns are matched against the whole name.
fn glob_match(pattern: &str, name: &str) -> bool {
    fn matches(p: &[u8], n: &[u8]) -> bool {
        match (p.first(), n.first()) {
            (None, None) => true,
            (Some(b'*'), _) => matches(&p[1..], n) || (!n.is_empty() && matches(p, &n[1..])),
            (Some(pc), Some(nc)) if pc == nc => matches(&p[1..], &n[1..]),
            _ => false,
        }
    }
    matches(pattern.as_bytes(), name.as_bytes())
}
