//! dotscope-backed [`MetadataProvider`].
//!
//! Maps a loaded [`CilObject`] into the self-contained symbol graph. Raw
//! metadata reading surfaces every member regardless of visibility, which is
//! what lets documentation optionally include non-public APIs; the model
//! builder applies the accessibility filter afterwards.

use std::collections::HashMap;
use std::path::Path;

use dotscope::metadata::cilobject::CilObject;
use dotscope::metadata::signatures::TypeSignature;
use dotscope::prelude::*;

use log::debug;

use crate::metadata::errors::Result;
use crate::metadata::loader::MetadataProvider;
use crate::metadata::symbols::{
    self, AssemblySymbols, ConstantValue, EventSymbol, FieldSymbol, GenericParamSymbol,
    MethodSymbol, ParamSymbol, PropertySymbol, RefKind, TypeSymbol, TypeSymbolKind,
};
use crate::options::Visibility;

// ECMA-335 II.23.1 flag masks.
const TYPE_VISIBILITY_MASK: u32 = 0x7;
const TYPE_ABSTRACT: u32 = 0x80;
const TYPE_SEALED: u32 = 0x100;

const METHOD_ACCESS_MASK: u32 = 0x7;
const METHOD_STATIC: u32 = 0x10;
const METHOD_FINAL: u32 = 0x20;
const METHOD_VIRTUAL: u32 = 0x40;
const METHOD_NEWSLOT: u32 = 0x100;
const METHOD_ABSTRACT: u32 = 0x400;
const METHOD_SPECIALNAME: u32 = 0x800;

const FIELD_ACCESS_MASK: u32 = 0x7;
const FIELD_STATIC: u32 = 0x10;
const FIELD_LITERAL: u32 = 0x40;

const PARAM_OUT: u32 = 0x2;
const PARAM_OPTIONAL: u32 = 0x10;
const PARAM_HAS_DEFAULT: u32 = 0x1000;

pub struct DotscopeProvider;

impl DotscopeProvider {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DotscopeProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MetadataProvider for DotscopeProvider {
    fn load_assembly(&self, path: &Path) -> Result<AssemblySymbols> {
        let canon = path.canonicalize()?;
        let obj = CilObject::from_file(&canon)?;
        let mapper = Mapper::new(&obj, &canon);
        Ok(mapper.run())
    }
}

/// One-shot mapping of a `CilObject` into `AssemblySymbols`.
struct Mapper<'a> {
    obj: &'a CilObject,
    assembly_name: String,
    version: String,
    // custom attribute type simple names keyed by the attributed token
    attributes: HashMap<u32, Vec<String>>,
    // constant values keyed by the owning field/param token
    constants: HashMap<u32, ConstantValue>,
    // implemented interface display names keyed by the TypeDef rid
    interfaces: HashMap<u32, Vec<String>>,
}

impl<'a> Mapper<'a> {
    fn new(obj: &'a CilObject, path: &Path) -> Self {
        let (assembly_name, version) = read_assembly_identity(obj, path);
        let mut mapper = Self {
            obj,
            assembly_name,
            version,
            attributes: HashMap::new(),
            constants: HashMap::new(),
            interfaces: HashMap::new(),
        };
        mapper.index_custom_attributes();
        mapper.index_constants();
        mapper.index_interface_impls();
        mapper
    }

    fn run(self) -> AssemblySymbols {
        let mut ordered: Vec<(u32, TypeSymbol)> = Vec::new();
        let registry = self.obj.types();
        for entry in registry.iter() {
            let ty = entry.value();
            if ty.name == "<Module>" || ty.name.starts_with('<') {
                continue;
            }
            let token = ty.token.value();
            // Imported references share the registry with definitions; only
            // TypeDef tokens (0x02) describe this assembly's own types.
            if token >> 24 != 0x02 {
                continue;
            }

            let flags = self.type_def_flags(token);
            let full_name = full_type_name(&ty.namespace, &ty.name);
            let base_type = ty
                .base()
                .map(|base| full_type_name(&base.namespace, &base.name));

            let kind = match base_type.as_deref() {
                Some("System.Enum") => TypeSymbolKind::Enum,
                Some("System.MulticastDelegate") | Some("System.Delegate") => {
                    TypeSymbolKind::Delegate
                }
                _ => match *ty.flavor() {
                    CilFlavor::Interface => TypeSymbolKind::Interface,
                    CilFlavor::ValueType => TypeSymbolKind::Struct,
                    CilFlavor::Class | CilFlavor::GenericInstance => TypeSymbolKind::Class,
                    _ => TypeSymbolKind::Other,
                },
            };

            let mut methods = Vec::new();
            for (_, method_ref) in ty.methods.iter() {
                if let Some(method) = method_ref.upgrade() {
                    let method_token = method.token.value();
                    let method_flags = self.method_def_flags(method_token);
                    let attributes = self
                        .attributes
                        .get(&method_token)
                        .cloned()
                        .unwrap_or_default();
                    let is_extension = attributes.iter().any(|a| a == "ExtensionAttribute");

                    let return_type =
                        self.type_signature_display(&method.signature.return_type.base);
                    let sig_params: Vec<String> = method
                        .signature
                        .params
                        .iter()
                        .map(|p| self.type_signature_display(&p.base))
                        .collect();

                    let mut params = Vec::new();
                    for (_, param) in method.params.iter() {
                        // Sequence 0 is the return parameter slot
                        if param.sequence == 0 {
                            continue;
                        }
                        let index = (param.sequence as usize) - 1;
                        let param_type = sig_params
                            .get(index)
                            .cloned()
                            .unwrap_or_else(|| "System.Object".to_string());
                        let param_token = param.token.value();
                        let param_flags = param.flags;
                        let is_byref = matches!(
                            method.signature.params.get(index).map(|p| &p.base),
                            Some(TypeSignature::ByRef(_))
                        );
                        let ref_kind = if is_byref && param_flags & PARAM_OUT != 0 {
                            RefKind::Out
                        } else if is_byref {
                            RefKind::Ref
                        } else {
                            RefKind::None
                        };
                        let is_params = self
                            .attributes
                            .get(&param_token)
                            .map(|attrs| attrs.iter().any(|a| a == "ParamArrayAttribute"))
                            .unwrap_or(false);
                        let default_value = if param_flags & PARAM_HAS_DEFAULT != 0 {
                            self.constants.get(&param_token).cloned()
                        } else {
                            None
                        };
                        params.push(ParamSymbol {
                            name: param
                                .name
                                .clone()
                                .unwrap_or_else(|| format!("arg{}", index)),
                            param_type,
                            ref_kind,
                            is_optional: param_flags & PARAM_OPTIONAL != 0,
                            default_value,
                            is_params,
                        });
                    }

                    let mut generic_params = Vec::new();
                    for (_, gp) in method.generic_params.iter() {
                        let mut constraints = Vec::new();
                        for (_, constraint) in gp.constraints.iter() {
                            if let Some(name) = constraint.name() {
                                constraints.push(name);
                            }
                        }
                        generic_params.push(GenericParamSymbol {
                            name: gp.name.clone(),
                            constraints,
                        });
                    }

                    let doc_id = symbols::method_doc_id(
                        &full_name,
                        &method.name,
                        generic_params.len(),
                        &sig_params,
                    );

                    let is_virtual = method_flags & METHOD_VIRTUAL != 0;
                    methods.push(MethodSymbol {
                        name: method.name.clone(),
                        visibility: method_visibility(method_flags),
                        is_static: method_flags & METHOD_STATIC != 0,
                        is_virtual: is_virtual && method_flags & METHOD_FINAL == 0,
                        is_abstract: method_flags & METHOD_ABSTRACT != 0,
                        is_override: is_virtual && method_flags & METHOD_NEWSLOT == 0,
                        is_extension,
                        is_special_name: method_flags & METHOD_SPECIALNAME != 0,
                        return_type,
                        params,
                        generic_params,
                        attributes,
                        doc_id,
                    });
                }
            }

            let mut fields = Vec::new();
            for (_, field) in ty.fields.iter() {
                let field_flags = field.flags;
                let field_token = field.token.value();
                fields.push(FieldSymbol {
                    name: field.name.clone(),
                    visibility: field_visibility(field_flags),
                    is_static: field_flags & FIELD_STATIC != 0,
                    is_literal: field_flags & FIELD_LITERAL != 0,
                    field_type: self.type_signature_display(&field.signature.base),
                    constant: self.constants.get(&field_token).cloned(),
                    doc_id: symbols::member_doc_id('F', &full_name, &field.name),
                });
            }

            // Properties are reconstructed from their accessor pair; the
            // Property table carries the name, the accessors everything else.
            let mut properties = Vec::new();
            for (_, property) in ty.properties.iter() {
                let getter_name = format!("get_{}", property.name);
                let setter_name = format!("set_{}", property.name);
                let getter = methods.iter().find(|m| m.name == getter_name);
                let setter = methods.iter().find(|m| m.name == setter_name);
                let accessor = match getter.or(setter) {
                    Some(m) => m,
                    None => continue,
                };
                let property_type = match getter {
                    Some(g) => g.return_type.clone(),
                    None => setter
                        .and_then(|s| s.params.last().map(|p| p.param_type.clone()))
                        .unwrap_or_else(|| "System.Object".to_string()),
                };
                properties.push(PropertySymbol {
                    name: property.name.clone(),
                    visibility: widest_visibility(getter, setter),
                    is_static: accessor.is_static,
                    is_virtual: accessor.is_virtual,
                    is_abstract: accessor.is_abstract,
                    is_override: accessor.is_override,
                    has_getter: getter.is_some(),
                    has_setter: setter.is_some(),
                    property_type,
                    doc_id: symbols::member_doc_id('P', &full_name, &property.name),
                });
            }

            let mut events = Vec::new();
            for (_, event) in ty.events.iter() {
                let add_name = format!("add_{}", event.name);
                let adder = match methods.iter().find(|m| m.name == add_name) {
                    Some(m) => m,
                    None => continue,
                };
                let event_type = adder
                    .params
                    .first()
                    .map(|p| p.param_type.clone())
                    .unwrap_or_else(|| "System.Object".to_string());
                events.push(EventSymbol {
                    name: event.name.clone(),
                    visibility: adder.visibility,
                    is_static: adder.is_static,
                    event_type,
                    doc_id: symbols::member_doc_id('E', &full_name, &event.name),
                });
            }

            let mut generic_params = Vec::new();
            for (_, gp) in ty.generic_params.iter() {
                let mut constraints = Vec::new();
                for (_, constraint) in gp.constraints.iter() {
                    if let Some(name) = constraint.name() {
                        constraints.push(name);
                    }
                }
                generic_params.push(GenericParamSymbol {
                    name: gp.name.clone(),
                    constraints,
                });
            }

            ordered.push((
                token,
                TypeSymbol {
                    namespace: ty.namespace.clone(),
                    name: ty.name.clone(),
                    full_name: full_name.clone(),
                    kind,
                    visibility: type_visibility(flags),
                    is_sealed: flags & TYPE_SEALED != 0,
                    is_abstract: flags & TYPE_ABSTRACT != 0,
                    is_nested: flags & TYPE_VISIBILITY_MASK >= 2,
                    base_type,
                    interfaces: self
                        .interfaces
                        .get(&(token & 0x00FF_FFFF))
                        .cloned()
                        .unwrap_or_default(),
                    generic_params,
                    attributes: self.attributes.get(&token).cloned().unwrap_or_default(),
                    methods,
                    fields,
                    properties,
                    events,
                    assembly: self.assembly_name.clone(),
                    doc_id: symbols::type_doc_id(&full_name),
                },
            ));
        }

        // Registry iteration order is not declaration order; tokens are
        // assigned in declaration order, so sort to restore it.
        ordered.sort_by_key(|(token, _)| *token);

        AssemblySymbols {
            name: self.assembly_name,
            version: self.version,
            types: ordered.into_iter().map(|(_, t)| t).collect(),
        }
    }

    /// Render a signature type to its metadata full display name, the form
    /// used in doc IDs (`System.Int32`, `N.C`).
    fn type_signature_display(&self, ts: &TypeSignature) -> String {
        match ts {
            TypeSignature::Void => "System.Void".to_string(),
            TypeSignature::Boolean => "System.Boolean".to_string(),
            TypeSignature::Char => "System.Char".to_string(),
            TypeSignature::I1 => "System.SByte".to_string(),
            TypeSignature::U1 => "System.Byte".to_string(),
            TypeSignature::I2 => "System.Int16".to_string(),
            TypeSignature::U2 => "System.UInt16".to_string(),
            TypeSignature::I4 => "System.Int32".to_string(),
            TypeSignature::U4 => "System.UInt32".to_string(),
            TypeSignature::I8 => "System.Int64".to_string(),
            TypeSignature::U8 => "System.UInt64".to_string(),
            TypeSignature::R4 => "System.Single".to_string(),
            TypeSignature::R8 => "System.Double".to_string(),
            TypeSignature::String => "System.String".to_string(),
            TypeSignature::Object => "System.Object".to_string(),
            TypeSignature::I => "System.IntPtr".to_string(),
            TypeSignature::U => "System.UIntPtr".to_string(),
            TypeSignature::ByRef(inner) => self.type_signature_display(inner),
            TypeSignature::Class(tok) | TypeSignature::ValueType(tok) => self
                .resolve_token_name(tok.value())
                .unwrap_or_else(|| "System.Object".to_string()),
            other => {
                debug!("unmapped type signature variant: {:?}", other);
                "System.Object".to_string()
            }
        }
    }

    /// Resolve a TypeDef/TypeRef token to a full display name.
    fn resolve_token_name(&self, token: u32) -> Option<String> {
        match token >> 24 {
            // TypeDef: scan the loaded registry
            0x02 => {
                let types = self.obj.types();
                for entry in types.iter() {
                    let t = entry.value();
                    if t.token.value() == token {
                        return Some(full_type_name(&t.namespace, &t.name));
                    }
                }
                None
            }
            // TypeRef: raw table + string heap
            0x01 => self.type_ref_name(token & 0x00FF_FFFF),
            _ => None,
        }
    }

    fn type_ref_name(&self, rid: u32) -> Option<String> {
        let tables = self.obj.tables()?;
        let table = tables.table::<TypeRefRaw>()?;
        let row = table.get(rid)?;
        let strings = self.obj.strings()?;
        let name = strings.get(row.type_name as usize).ok()?;
        let namespace = strings.get(row.type_namespace as usize).ok().unwrap_or("");
        Some(full_type_name(namespace, name))
    }

    fn type_def_flags(&self, token: u32) -> u32 {
        self.obj
            .tables()
            .and_then(|t| t.table::<TypeDefRaw>())
            .and_then(|t| t.get(token & 0x00FF_FFFF))
            .map(|row| row.flags)
            .unwrap_or(0)
    }

    fn method_def_flags(&self, token: u32) -> u32 {
        self.obj
            .tables()
            .and_then(|t| t.table::<MethodDefRaw>())
            .and_then(|t| t.get(token & 0x00FF_FFFF))
            .map(|row| row.flags)
            .unwrap_or(0)
    }

    /// Index attribute type simple names by attributed token. The attribute
    /// type is recovered from the constructor coded index: a MethodDef
    /// constructor means an attribute defined in this assembly, a MemberRef
    /// one defined elsewhere (the typical corlib case).
    fn index_custom_attributes(&mut self) {
        let Some(tables) = self.obj.tables() else {
            return;
        };
        let Some(table) = tables.table::<CustomAttributeRaw>() else {
            return;
        };
        for row in table.iter() {
            let ctor_token = row.constructor.token.value();
            let attr_name = match ctor_token >> 24 {
                0x06 => self.method_owner_type_name(ctor_token),
                0x0A => self.member_ref_owner_type_name(ctor_token & 0x00FF_FFFF),
                _ => None,
            };
            if let Some(name) = attr_name {
                self.attributes
                    .entry(row.parent.token.value())
                    .or_default()
                    .push(name);
            }
        }
    }

    fn method_owner_type_name(&self, method_token: u32) -> Option<String> {
        let types = self.obj.types();
        for entry in types.iter() {
            let t = entry.value();
            for (_, method_ref) in t.methods.iter() {
                if let Some(m) = method_ref.upgrade()
                    && m.token.value() == method_token
                {
                    return Some(t.name.clone());
                }
            }
        }
        None
    }

    fn member_ref_owner_type_name(&self, rid: u32) -> Option<String> {
        let tables = self.obj.tables()?;
        let table = tables.table::<MemberRefRaw>()?;
        let row = table.get(rid)?;
        let class_token = row.class.token.value();
        match class_token >> 24 {
            0x01 => {
                // Simple name only; attribute detection keys off it
                let type_ref = tables
                    .table::<TypeRefRaw>()?
                    .get(class_token & 0x00FF_FFFF)?;
                let strings = self.obj.strings()?;
                strings
                    .get(type_ref.type_name as usize)
                    .ok()
                    .map(String::from)
            }
            0x02 => self.resolve_token_name(class_token).map(|full| {
                symbols::strip_arity(full.rsplit('.').next().unwrap_or(&full)).to_string()
            }),
            _ => None,
        }
    }

    fn index_constants(&mut self) {
        let Some(tables) = self.obj.tables() else {
            return;
        };
        let Some(table) = tables.table::<ConstantRaw>() else {
            return;
        };
        let Some(blobs) = self.obj.blob() else {
            return;
        };
        for row in table.iter() {
            let Ok(blob) = blobs.get(row.value as usize) else {
                continue;
            };
            if let Some(value) = parse_constant_blob(row.base as u8, blob) {
                self.constants.insert(row.parent.token.value(), value);
            }
        }
    }

    fn index_interface_impls(&mut self) {
        let Some(tables) = self.obj.tables() else {
            return;
        };
        let Some(table) = tables.table::<InterfaceImplRaw>() else {
            return;
        };
        for row in table.iter() {
            if let Some(name) = self.resolve_token_name(row.interface.token.value()) {
                self.interfaces.entry(row.class).or_default().push(name);
            }
        }
    }
}

fn read_assembly_identity(obj: &CilObject, path: &Path) -> (String, String) {
    let fallback = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("assembly")
        .to_string();
    let Some(tables) = obj.tables() else {
        return (fallback, String::new());
    };
    let Some(table) = tables.table::<AssemblyRaw>() else {
        return (fallback, String::new());
    };
    let Some(row) = table.get(1) else {
        return (fallback, String::new());
    };
    let name = obj
        .strings()
        .and_then(|s| s.get(row.name as usize).ok())
        .map(String::from)
        .unwrap_or(fallback);
    let version = format!(
        "{}.{}.{}.{}",
        row.major_version, row.minor_version, row.build_number, row.revision_number
    );
    (name, version)
}

fn full_type_name(namespace: &str, name: &str) -> String {
    if namespace.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", namespace, name)
    }
}

/// ECMA-335 II.23.1.15 type visibility
fn type_visibility(flags: u32) -> Visibility {
    match flags & TYPE_VISIBILITY_MASK {
        1 | 2 => Visibility::Public,
        3 => Visibility::Private,
        4 => Visibility::Protected,
        5 => Visibility::Internal,
        6 => Visibility::ProtectedAndInternal,
        7 => Visibility::ProtectedOrInternal,
        _ => Visibility::Internal,
    }
}

/// ECMA-335 II.23.1.10 method member access
fn method_visibility(flags: u32) -> Visibility {
    match flags & METHOD_ACCESS_MASK {
        1 => Visibility::Private,
        2 => Visibility::ProtectedAndInternal,
        3 => Visibility::Internal,
        4 => Visibility::Protected,
        5 => Visibility::ProtectedOrInternal,
        6 => Visibility::Public,
        _ => Visibility::Private,
    }
}

/// ECMA-335 II.23.1.5 field access (same encoding as methods)
fn field_visibility(flags: u32) -> Visibility {
    match flags & FIELD_ACCESS_MASK {
        1 => Visibility::Private,
        2 => Visibility::ProtectedAndInternal,
        3 => Visibility::Internal,
        4 => Visibility::Protected,
        5 => Visibility::ProtectedOrInternal,
        6 => Visibility::Public,
        _ => Visibility::Private,
    }
}

fn widest_visibility(getter: Option<&MethodSymbol>, setter: Option<&MethodSymbol>) -> Visibility {
    let rank = |v: Visibility| match v {
        Visibility::Public => 5,
        Visibility::ProtectedOrInternal => 4,
        Visibility::Internal => 3,
        Visibility::Protected => 2,
        Visibility::ProtectedAndInternal => 1,
        Visibility::Private => 0,
    };
    [getter, setter]
        .into_iter()
        .flatten()
        .map(|m| m.visibility)
        .max_by_key(|v| rank(*v))
        .unwrap_or(Visibility::Private)
}

/// ECMA-335 II.22.9: a constant row's `base` is the element type of the
/// little-endian blob value.
fn parse_constant_blob(element_type: u8, blob: &[u8]) -> Option<ConstantValue> {
    fn le<const N: usize>(blob: &[u8]) -> Option<[u8; N]> {
        blob.get(..N)?.try_into().ok()
    }
    match element_type {
        0x02 => Some(ConstantValue::Boolean(*blob.first()? != 0)),
        0x03 => {
            let raw = u16::from_le_bytes(le::<2>(blob)?);
            Some(ConstantValue::Char(char::from_u32(raw as u32)?))
        }
        0x04 => Some(ConstantValue::SByte(i8::from_le_bytes(le::<1>(blob)?))),
        0x05 => Some(ConstantValue::Byte(*blob.first()?)),
        0x06 => Some(ConstantValue::Int16(i16::from_le_bytes(le::<2>(blob)?))),
        0x07 => Some(ConstantValue::UInt16(u16::from_le_bytes(le::<2>(blob)?))),
        0x08 => Some(ConstantValue::Int32(i32::from_le_bytes(le::<4>(blob)?))),
        0x09 => Some(ConstantValue::UInt32(u32::from_le_bytes(le::<4>(blob)?))),
        0x0A => Some(ConstantValue::Int64(i64::from_le_bytes(le::<8>(blob)?))),
        0x0B => Some(ConstantValue::UInt64(u64::from_le_bytes(le::<8>(blob)?))),
        0x0C => Some(ConstantValue::Single(f32::from_le_bytes(le::<4>(blob)?))),
        0x0D => Some(ConstantValue::Double(f64::from_le_bytes(le::<8>(blob)?))),
        0x0E => {
            // UTF-16 string constant
            let units: Vec<u16> = blob
                .chunks_exact(2)
                .map(|c| u16::from_le_bytes([c[0], c[1]]))
                .collect();
            Some(ConstantValue::String(String::from_utf16_lossy(&units)))
        }
        0x12 => Some(ConstantValue::Null),
        _ => None,
    }
}
