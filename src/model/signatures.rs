//! Signature rendering.
//!
//! Three fixed forms are produced for the model: a compact display
//! (`Add(int, int)`), a detailed member signature (visibility, modifiers,
//! return type, parameters with ref kinds and defaults, generic
//! constraints), and a property signature showing accessors.

use crate::metadata::symbols::{
    FieldSymbol, GenericParamSymbol, MethodSymbol, ParamSymbol, PropertySymbol, RefKind,
    TypeSymbol, TypeSymbolKind,
};

/// C#-friendly display of a metadata type name: keyword aliases for the
/// well-known primitives, the simple name otherwise. Nested-type `+`
/// becomes `.`, generic arity suffixes are dropped.
pub fn friendly_name(full_name: &str) -> String {
    if let Some(alias) = keyword_alias(full_name) {
        return alias.to_string();
    }
    let simple = full_name.rsplit('.').next().unwrap_or(full_name);
    let simple = simple.replace('+', ".");
    match simple.find('`') {
        Some(idx) => simple[..idx].to_string(),
        None => simple,
    }
}

pub fn keyword_alias(full_name: &str) -> Option<&'static str> {
    Some(match full_name {
        "System.Void" => "void",
        "System.Boolean" => "bool",
        "System.Char" => "char",
        "System.SByte" => "sbyte",
        "System.Byte" => "byte",
        "System.Int16" => "short",
        "System.UInt16" => "ushort",
        "System.Int32" => "int",
        "System.UInt32" => "uint",
        "System.Int64" => "long",
        "System.UInt64" => "ulong",
        "System.Single" => "float",
        "System.Double" => "double",
        "System.Decimal" => "decimal",
        "System.String" => "string",
        "System.Object" => "object",
        _ => return None,
    })
}

/// `Add(int, int)`: member name plus friendly parameter types.
pub fn compact_display(name: &str, params: &[ParamSymbol]) -> String {
    if params.is_empty() {
        format!("{}()", name)
    } else {
        let types: Vec<String> = params.iter().map(|p| friendly_name(&p.param_type)).collect();
        format!("{}({})", name, types.join(", "))
    }
}

/// One parameter as it appears in a detailed signature:
/// `ref int x`, `int count = 4`, `params object[] rest`.
pub fn parameter_display(param: &ParamSymbol) -> String {
    let mut out = String::new();
    match param.ref_kind {
        RefKind::Ref => out.push_str("ref "),
        RefKind::Out => out.push_str("out "),
        RefKind::In => out.push_str("in "),
        RefKind::None => {}
    }
    if param.is_params {
        out.push_str("params ");
    }
    out.push_str(&friendly_name(&param.param_type));
    out.push(' ');
    out.push_str(&param.name);
    if let Some(default) = &param.default_value {
        out.push_str(" = ");
        out.push_str(&default.render());
    }
    out
}

fn generic_list(params: &[GenericParamSymbol]) -> String {
    if params.is_empty() {
        return String::new();
    }
    let names: Vec<&str> = params.iter().map(|p| p.name.as_str()).collect();
    format!("<{}>", names.join(", "))
}

fn generic_constraints(params: &[GenericParamSymbol]) -> String {
    let mut out = String::new();
    for param in params {
        if param.constraints.is_empty() {
            continue;
        }
        let constraints: Vec<String> =
            param.constraints.iter().map(|c| friendly_name(c)).collect();
        out.push_str(&format!(" where {} : {}", param.name, constraints.join(", ")));
    }
    out
}

/// Detailed method signature:
/// `public static int Add(int a, int b)`.
pub fn method_signature(type_simple_name: &str, method: &MethodSymbol) -> String {
    let mut out = String::new();
    out.push_str(&method.visibility.to_string());
    out.push(' ');
    if method.is_static {
        out.push_str("static ");
    }
    if method.is_abstract {
        out.push_str("abstract ");
    } else if method.is_override {
        out.push_str("override ");
    } else if method.is_virtual {
        out.push_str("virtual ");
    }

    let is_ctor = method.name == ".ctor" || method.name == ".cctor";
    if !is_ctor {
        out.push_str(&friendly_name(&method.return_type));
        out.push(' ');
    }
    let name = if is_ctor {
        type_simple_name.to_string()
    } else {
        method.name.clone()
    };
    out.push_str(&name);
    out.push_str(&generic_list(&method.generic_params));

    let params: Vec<String> = method.params.iter().map(parameter_display).collect();
    out.push('(');
    out.push_str(&params.join(", "));
    out.push(')');
    out.push_str(&generic_constraints(&method.generic_params));
    out
}

/// Property signature with accessors: `public int Count { get; set; }`.
pub fn property_signature(property: &PropertySymbol) -> String {
    let mut out = String::new();
    out.push_str(&property.visibility.to_string());
    out.push(' ');
    if property.is_static {
        out.push_str("static ");
    }
    if property.is_abstract {
        out.push_str("abstract ");
    } else if property.is_override {
        out.push_str("override ");
    } else if property.is_virtual {
        out.push_str("virtual ");
    }
    out.push_str(&friendly_name(&property.property_type));
    out.push(' ');
    out.push_str(&property.name);
    out.push_str(" { ");
    if property.has_getter {
        out.push_str("get; ");
    }
    if property.has_setter {
        out.push_str("set; ");
    }
    out.push('}');
    out
}

/// Field signature: `public const int Max = 42`.
pub fn field_signature(field: &FieldSymbol) -> String {
    let mut out = String::new();
    out.push_str(&field.visibility.to_string());
    out.push(' ');
    if field.is_literal {
        out.push_str("const ");
    } else if field.is_static {
        out.push_str("static ");
    }
    out.push_str(&friendly_name(&field.field_type));
    out.push(' ');
    out.push_str(&field.name);
    if let Some(constant) = &field.constant {
        out.push_str(" = ");
        out.push_str(&constant.render());
    }
    out
}

/// Type display signature: `public class C<T> : Base, IFoo`.
pub fn type_display_signature(ty: &TypeSymbol, kind_word: &str) -> String {
    let mut out = String::new();
    out.push_str(&ty.visibility.to_string());
    out.push(' ');
    if kind_word == "class" {
        if ty.is_static() {
            out.push_str("static ");
        } else if ty.is_abstract {
            out.push_str("abstract ");
        } else if ty.is_sealed {
            out.push_str("sealed ");
        }
    }
    out.push_str(kind_word);
    out.push(' ');
    out.push_str(ty.simple_name());
    out.push_str(&generic_list(&ty.generic_params));

    let mut bases: Vec<String> = Vec::new();
    if let Some(base) = &ty.base_type
        && !is_implicit_base(base)
    {
        bases.push(friendly_name(base));
    }
    bases.extend(ty.interfaces.iter().map(|i| friendly_name(i)));
    if !bases.is_empty() {
        out.push_str(" : ");
        out.push_str(&bases.join(", "));
    }
    out.push_str(&generic_constraints(&ty.generic_params));
    out
}

pub fn kind_word(kind: TypeSymbolKind) -> &'static str {
    match kind {
        TypeSymbolKind::Class => "class",
        TypeSymbolKind::Interface => "interface",
        TypeSymbolKind::Struct => "struct",
        TypeSymbolKind::Enum => "enum",
        TypeSymbolKind::Delegate => "delegate",
        TypeSymbolKind::Other => "class",
    }
}

fn is_implicit_base(base: &str) -> bool {
    matches!(
        base,
        "System.Object" | "System.ValueType" | "System.Enum" | "System.MulticastDelegate"
    )
}
