//! The documentation model graph.
//!
//! Ownership edges form a finite rooted tree: assembly → namespace → type →
//! member → parameter, plus type → enum-value. Parameter and return type
//! slots hold reference-only placeholder nodes (`is_external_reference`
//! set, member list empty) so recursive definitions cannot produce cycles.

use serde::{Deserialize, Serialize};

use crate::diagnostics::DiagnosticCollection;
use crate::model::docs::DocFields;
use crate::model::reference::DocReference;
use crate::options::Visibility;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeKind {
    Class,
    Interface,
    Struct,
    Enum,
    Delegate,
    Error,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberKind {
    Method,
    Property,
    Field,
    Event,
}

/// Sub-classification for method members.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MethodKind {
    Ordinary,
    Constructor,
    Operator,
    Accessor,
    Other,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnumValueNode {
    pub name: String,
    /// Numeric value rendered as a decimal string
    pub value: String,
    #[serde(default)]
    pub docs: DocFields,
}

/// Enum-specific payload carried by enum type nodes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnumInfo {
    pub is_flags: bool,
    /// C#-friendly display of the underlying type (`int`, `byte`, …)
    pub underlying_type: String,
    pub values: Vec<EnumValueNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterNode {
    pub name: String,
    /// C#-friendly type display
    pub type_name: String,
    /// Display form as it appears in a signature (`ref int x = 4`)
    pub display: String,
    pub is_optional: bool,
    pub has_default: bool,
    pub default_value: Option<String>,
    pub is_params: bool,
    /// Reference-only placeholder for the parameter type; never carries
    /// expanded members
    pub type_ref: Option<Box<TypeNode>>,
    #[serde(default)]
    pub docs: DocFields,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberNode {
    pub name: String,
    /// Compact display, e.g. `Add(int, int)`
    pub display_name: String,
    /// Full signature string with visibility, modifiers and parameters
    pub signature: String,
    pub kind: MemberKind,
    pub method_kind: Option<MethodKind>,
    pub visibility: Visibility,
    /// C#-friendly display of the return/property/field type
    pub return_type: Option<String>,
    /// Reference-only placeholder for the return type
    pub return_type_ref: Option<Box<TypeNode>>,
    #[serde(default)]
    pub parameters: Vec<ParameterNode>,

    // Provenance
    #[serde(default)]
    pub inherited: bool,
    #[serde(default)]
    pub is_override: bool,
    #[serde(default)]
    pub is_virtual: bool,
    #[serde(default)]
    pub is_abstract: bool,
    #[serde(default)]
    pub is_extension: bool,

    // Context
    pub declaring_type: Option<String>,
    pub overridden_member: Option<String>,
    /// Full display name of the extended type, for extension methods
    pub extended_type: Option<String>,

    #[serde(default)]
    pub docs: DocFields,
}

impl MemberNode {
    pub fn is_extension_method(&self) -> bool {
        self.kind == MemberKind::Method && self.is_extension
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeNode {
    /// Simple name without generic arity suffix
    pub name: String,
    pub full_name: String,
    /// C#-like display signature, e.g. `public class C : Base`
    pub display_signature: String,
    pub kind: TypeKind,
    /// Name of the containing binary
    pub assembly: String,
    /// Full display name of the base type; the display signature carries
    /// the friendly form
    pub base_type: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub interfaces: Vec<String>,
    /// Static class (abstract + sealed in metadata)
    #[serde(default)]
    pub is_static: bool,
    #[serde(default)]
    pub members: Vec<MemberNode>,
    /// True for shadow types and reference-only placeholders: the type lives
    /// in a binary that was not passed to the loader
    #[serde(default)]
    pub is_external_reference: bool,
    /// Present only for enums
    pub enum_info: Option<EnumInfo>,
    /// Resolved reference edges: base type, see-also and related APIs
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<DocReference>,
    #[serde(default)]
    pub docs: DocFields,
}

impl TypeNode {
    /// A reference-only placeholder used for parameter and return type
    /// slots. Never interned and never registered in the reference map.
    pub fn reference(full_name: &str, display_name: &str) -> Self {
        Self {
            name: display_name.to_string(),
            full_name: full_name.to_string(),
            display_signature: display_name.to_string(),
            kind: TypeKind::Other,
            assembly: String::new(),
            base_type: None,
            interfaces: Vec::new(),
            is_static: false,
            members: Vec::new(),
            is_external_reference: true,
            enum_info: None,
            references: Vec::new(),
            docs: DocFields::default(),
        }
    }

    pub fn find_member(&self, display_name: &str) -> Option<&MemberNode> {
        self.members.iter().find(|m| m.display_name == display_name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NamespaceNode {
    /// Fully qualified dotted name; empty for the global namespace
    pub name: String,
    #[serde(default)]
    pub types: Vec<TypeNode>,
    #[serde(default)]
    pub docs: DocFields,
}

impl NamespaceNode {
    pub fn find_type(&self, full_name: &str) -> Option<&TypeNode> {
        self.types.iter().find(|t| t.full_name == full_name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssemblyNode {
    pub name: String,
    pub version: String,
    pub display_name: String,
    #[serde(default)]
    pub namespaces: Vec<NamespaceNode>,
    #[serde(default)]
    pub docs: DocFields,
    /// Per-symbol faults recorded during the build
    #[serde(default)]
    pub diagnostics: DiagnosticCollection,
}

impl AssemblyNode {
    pub fn find_namespace(&self, name: &str) -> Option<&NamespaceNode> {
        self.namespaces.iter().find(|ns| ns.name == name)
    }

    pub fn find_type(&self, full_name: &str) -> Option<&TypeNode> {
        self.namespaces
            .iter()
            .find_map(|ns| ns.find_type(full_name))
    }

    pub fn type_count(&self) -> usize {
        self.namespaces.iter().map(|ns| ns.types.len()).sum()
    }
}
