//! Self-contained symbol graph extracted from assembly metadata.
//!
//! Every attribute the model builder needs is captured eagerly so the
//! front-end object can be dropped once loading completes. Identity across
//! the graph is the fully qualified display name plus the compiler's
//! canonical doc-comment ID (`T:`/`M:`/`P:`/`F:`/`E:` prefixed).

use crate::options::Visibility;

/// Raw shape of a type as the metadata front-end reports it. Enum detection
/// for metadata-degenerate enums (sealed class extending System.Enum)
/// happens later, in the model builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeSymbolKind {
    Class,
    Interface,
    Struct,
    Enum,
    Delegate,
    Other,
}

/// Parameter passing convention
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RefKind {
    #[default]
    None,
    Ref,
    Out,
    In,
}

/// A compile-time constant attached to a literal field or a parameter default.
#[derive(Debug, Clone, PartialEq)]
pub enum ConstantValue {
    Boolean(bool),
    Char(char),
    SByte(i8),
    Byte(u8),
    Int16(i16),
    UInt16(u16),
    Int32(i32),
    UInt32(u32),
    Int64(i64),
    UInt64(u64),
    Single(f32),
    Double(f64),
    String(String),
    Null,
}

impl ConstantValue {
    /// Decimal (or literal) rendering used in signatures and enum values.
    pub fn render(&self) -> String {
        match self {
            ConstantValue::Boolean(v) => v.to_string(),
            ConstantValue::Char(v) => format!("'{}'", v),
            ConstantValue::SByte(v) => v.to_string(),
            ConstantValue::Byte(v) => v.to_string(),
            ConstantValue::Int16(v) => v.to_string(),
            ConstantValue::UInt16(v) => v.to_string(),
            ConstantValue::Int32(v) => v.to_string(),
            ConstantValue::UInt32(v) => v.to_string(),
            ConstantValue::Int64(v) => v.to_string(),
            ConstantValue::UInt64(v) => v.to_string(),
            ConstantValue::Single(v) => v.to_string(),
            ConstantValue::Double(v) => v.to_string(),
            ConstantValue::String(v) => format!("\"{}\"", v),
            ConstantValue::Null => "null".to_string(),
        }
    }

    /// The C#-friendly name of the constant's runtime type, used to infer an
    /// enum's underlying type when metadata does not declare one.
    pub fn type_display(&self) -> &'static str {
        match self {
            ConstantValue::Boolean(_) => "bool",
            ConstantValue::Char(_) => "char",
            ConstantValue::SByte(_) => "sbyte",
            ConstantValue::Byte(_) => "byte",
            ConstantValue::Int16(_) => "short",
            ConstantValue::UInt16(_) => "ushort",
            ConstantValue::Int32(_) => "int",
            ConstantValue::UInt32(_) => "uint",
            ConstantValue::Int64(_) => "long",
            ConstantValue::UInt64(_) => "ulong",
            ConstantValue::Single(_) => "float",
            ConstantValue::Double(_) => "double",
            ConstantValue::String(_) => "string",
            ConstantValue::Null => "object",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct GenericParamSymbol {
    pub name: String,
    pub constraints: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct ParamSymbol {
    pub name: String,
    /// Full display name of the parameter type (e.g. `System.Int32`)
    pub param_type: String,
    pub ref_kind: RefKind,
    pub is_optional: bool,
    pub default_value: Option<ConstantValue>,
    /// `params` array parameter
    pub is_params: bool,
}

impl ParamSymbol {
    pub fn plain(name: impl Into<String>, param_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            param_type: param_type.into(),
            ref_kind: RefKind::None,
            is_optional: false,
            default_value: None,
            is_params: false,
        }
    }

    pub fn has_default(&self) -> bool {
        self.default_value.is_some()
    }
}

#[derive(Debug, Clone)]
pub struct MethodSymbol {
    pub name: String,
    pub visibility: Visibility,
    pub is_static: bool,
    pub is_virtual: bool,
    pub is_abstract: bool,
    pub is_override: bool,
    /// Marked with System.Runtime.CompilerServices.ExtensionAttribute
    pub is_extension: bool,
    /// Compiler-generated accessor/ctor methods carry their metadata name
    /// (`.ctor`, `get_X`, `set_X`, `add_X`, `remove_X`, `op_X`)
    pub is_special_name: bool,
    pub return_type: String,
    pub params: Vec<ParamSymbol>,
    pub generic_params: Vec<GenericParamSymbol>,
    pub attributes: Vec<String>,
    pub doc_id: String,
}

#[derive(Debug, Clone)]
pub struct FieldSymbol {
    pub name: String,
    pub visibility: Visibility,
    pub is_static: bool,
    /// `const` field; enum values are literal fields
    pub is_literal: bool,
    pub field_type: String,
    pub constant: Option<ConstantValue>,
    pub doc_id: String,
}

#[derive(Debug, Clone)]
pub struct PropertySymbol {
    pub name: String,
    pub visibility: Visibility,
    pub is_static: bool,
    pub is_virtual: bool,
    pub is_abstract: bool,
    pub is_override: bool,
    pub has_getter: bool,
    pub has_setter: bool,
    pub property_type: String,
    pub doc_id: String,
}

#[derive(Debug, Clone)]
pub struct EventSymbol {
    pub name: String,
    pub visibility: Visibility,
    pub is_static: bool,
    pub event_type: String,
    pub doc_id: String,
}

#[derive(Debug, Clone)]
pub struct TypeSymbol {
    /// Dotted namespace, empty for the global namespace
    pub namespace: String,
    /// Metadata name, including a backtick arity suffix for generics
    pub name: String,
    /// `Namespace.Name`, or just `Name` in the global namespace
    pub full_name: String,
    pub kind: TypeSymbolKind,
    pub visibility: Visibility,
    pub is_sealed: bool,
    pub is_abstract: bool,
    pub is_nested: bool,
    /// Full display name of the base type, if any
    pub base_type: Option<String>,
    /// Full display names of implemented interfaces
    pub interfaces: Vec<String>,
    pub generic_params: Vec<GenericParamSymbol>,
    /// Simple names of attribute types on this type (e.g. `FlagsAttribute`)
    pub attributes: Vec<String>,
    pub methods: Vec<MethodSymbol>,
    pub fields: Vec<FieldSymbol>,
    pub properties: Vec<PropertySymbol>,
    pub events: Vec<EventSymbol>,
    /// Name of the assembly this type was loaded from
    pub assembly: String,
    pub doc_id: String,
}

impl TypeSymbol {
    /// Static classes surface in metadata as abstract + sealed.
    pub fn is_static(&self) -> bool {
        self.is_abstract && self.is_sealed
    }

    pub fn has_attribute(&self, simple_name: &str) -> bool {
        self.attributes.iter().any(|a| a == simple_name)
    }

    /// Simple name with the backtick arity suffix stripped.
    pub fn simple_name(&self) -> &str {
        strip_arity(&self.name)
    }
}

#[derive(Debug, Clone, Default)]
pub struct AssemblySymbols {
    pub name: String,
    pub version: String,
    pub types: Vec<TypeSymbol>,
}

impl AssemblySymbols {
    pub fn find_type(&self, full_name: &str) -> Option<&TypeSymbol> {
        self.types.iter().find(|t| t.full_name == full_name)
    }
}

/// Strip a metadata generic arity suffix: ``List`1`` → `List`.
pub fn strip_arity(name: &str) -> &str {
    match name.find('`') {
        Some(idx) => &name[..idx],
        None => name,
    }
}

/// Canonical doc-comment ID for a type: `T:Namespace.Name`.
pub fn type_doc_id(full_name: &str) -> String {
    format!("T:{}", full_name)
}

/// Canonical doc-comment ID for a field, property or event.
pub fn member_doc_id(prefix: char, type_full_name: &str, member_name: &str) -> String {
    format!("{}:{}.{}", prefix, type_full_name, member_name)
}

/// Canonical doc-comment ID for a method, including the generic arity marker
/// and the parenthesized parameter type list the C# compiler emits.
pub fn method_doc_id(
    type_full_name: &str,
    method_name: &str,
    generic_arity: usize,
    param_types: &[String],
) -> String {
    // Constructors are encoded as #ctor
    let name = if method_name == ".ctor" {
        "#ctor"
    } else {
        method_name
    };
    let mut id = format!("M:{}.{}", type_full_name, name);
    if generic_arity > 0 {
        id.push_str(&format!("``{}", generic_arity));
    }
    if !param_types.is_empty() {
        id.push('(');
        id.push_str(&param_types.join(","));
        id.push(')');
    }
    id
}
