//! Model construction: walks the loaded symbol graph, applies the
//! accessibility filter, weaves in XML doc fragments and produces a fully
//! linked [`AssemblyNode`].
//!
//! Parameter and return types are materialized as fresh reference-only
//! placeholder nodes and are never inserted into the per-build type map;
//! reusing interned nodes in those positions would reintroduce cycles for
//! self-referential definitions.

use std::collections::{BTreeMap, HashSet};

use log::debug;

use crate::diagnostics::{Diagnostic, DiagnosticCode, DiagnosticCollection};
use crate::metadata::loader::AssemblyLoader;
use crate::metadata::symbols::{
    EventSymbol, FieldSymbol, MethodSymbol, PropertySymbol, TypeSymbol, TypeSymbolKind,
};
use crate::model::docs::DocFields;
use crate::model::nodes::{
    AssemblyNode, EnumInfo, EnumValueNode, MemberKind, MemberNode, MethodKind, NamespaceNode,
    ParameterNode, TypeKind, TypeNode,
};
use crate::model::signatures;
use crate::options::{DocOptions, Visibility};
use crate::xmldoc::{DocComment, SidecarDocs, parse_doc_comment};

pub struct ModelBuilder<'a> {
    loader: &'a AssemblyLoader,
    docs: &'a SidecarDocs,
    options: &'a DocOptions,
    diagnostics: DiagnosticCollection,
    /// Full display names of first-class types: declared in the input
    /// binary and not reference-only. Placeholders stay out.
    type_map: HashSet<String>,
}

impl<'a> ModelBuilder<'a> {
    pub fn new(loader: &'a AssemblyLoader, docs: &'a SidecarDocs, options: &'a DocOptions) -> Self {
        Self {
            loader,
            docs,
            options,
            diagnostics: DiagnosticCollection::new(),
            type_map: HashSet::new(),
        }
    }

    pub fn build(self) -> AssemblyNode {
        self.build_with_type_map().0
    }

    /// Build the model and hand back the per-build type map of first-class
    /// full names, consumed by the extension relocator.
    pub fn build_with_type_map(mut self) -> (AssemblyNode, HashSet<String>) {
        let loader = self.loader;
        let assembly = loader.target();

        let display_name = if assembly.version.is_empty() {
            assembly.name.clone()
        } else {
            format!("{}, Version={}", assembly.name, assembly.version)
        };

        // Namespace order is alphabetical, types keep declared order.
        let mut by_namespace: BTreeMap<String, Vec<&TypeSymbol>> = BTreeMap::new();
        for ty in &assembly.types {
            if self.skip_type(ty) {
                continue;
            }
            self.type_map.insert(ty.full_name.clone());
            by_namespace.entry(ty.namespace.clone()).or_default().push(ty);
        }

        let mut namespaces = Vec::new();
        for (name, types) in by_namespace {
            let built: Vec<TypeNode> = types.into_iter().map(|ty| self.build_type(ty)).collect();
            // A namespace is materialized only when types survive filtering
            if built.is_empty() {
                continue;
            }
            namespaces.push(NamespaceNode {
                name,
                types: built,
                docs: DocFields::default(),
            });
        }

        let node = AssemblyNode {
            name: assembly.name.clone(),
            version: assembly.version.clone(),
            display_name,
            namespaces,
            docs: DocFields::default(),
            diagnostics: self.diagnostics,
        };
        (node, self.type_map)
    }

    fn skip_type(&self, ty: &TypeSymbol) -> bool {
        if ty.is_nested {
            return true;
        }
        if !self.options.includes(ty.visibility) {
            return true;
        }
        if self.options.is_excluded(ty.simple_name(), &ty.full_name) {
            debug!("excluding type {}", ty.full_name);
            return true;
        }
        false
    }

    fn build_type(&mut self, ty: &TypeSymbol) -> TypeNode {
        if is_enum_symbol(ty) {
            return self.build_enum(ty);
        }
        if ty.kind == TypeSymbolKind::Delegate {
            return self.build_delegate(ty);
        }

        let kind = match ty.kind {
            TypeSymbolKind::Class => TypeKind::Class,
            TypeSymbolKind::Interface => TypeKind::Interface,
            TypeSymbolKind::Struct => TypeKind::Struct,
            TypeSymbolKind::Enum => TypeKind::Enum,
            TypeSymbolKind::Delegate => TypeKind::Delegate,
            TypeSymbolKind::Other => TypeKind::Other,
        };
        let kind_word = signatures::kind_word(ty.kind);

        let mut node = TypeNode {
            name: ty.simple_name().to_string(),
            full_name: ty.full_name.clone(),
            display_signature: signatures::type_display_signature(ty, kind_word),
            kind,
            assembly: ty.assembly.clone(),
            // Kept as the full name so the resolver can classify it; the
            // display signature renders the friendly form.
            base_type: ty
                .base_type
                .as_deref()
                .filter(|b| *b != "System.Object" && *b != "System.ValueType")
                .map(String::from),
            interfaces: ty
                .interfaces
                .iter()
                .map(|i| signatures::friendly_name(i))
                .collect(),
            is_static: ty.is_static(),
            members: Vec::new(),
            is_external_reference: false,
            enum_info: None,
            references: Vec::new(),
            docs: DocFields::default(),
        };

        if let Some(comment) = self.lookup_docs(&ty.doc_id, &ty.full_name) {
            node.docs.apply_comment(&comment);
        }

        for method in &ty.methods {
            if !self.include_declared(method.visibility) {
                continue;
            }
            let Some(method_kind) = classify_method(method) else {
                continue;
            };
            node.members
                .push(self.build_method_member(ty, method, method_kind, false, None));
        }

        for property in &ty.properties {
            if !self.include_declared(property.visibility) {
                continue;
            }
            node.members.push(self.build_property_member(property, false, None));
        }

        for field in &ty.fields {
            if field.name == "value__" || !self.include_declared(field.visibility) {
                continue;
            }
            node.members.push(self.build_field_member(field, false, None));
        }

        for event in &ty.events {
            if !self.include_declared(event.visibility) {
                continue;
            }
            node.members.push(self.build_event_member(event, false, None));
        }

        if self.options.include_inherited {
            self.collect_inherited(ty, &mut node);
        }

        node
    }

    fn build_enum(&mut self, ty: &TypeSymbol) -> TypeNode {
        let is_flags = ty.has_attribute("FlagsAttribute");

        // Prefer the declared value__ field; fall back to the runtime type
        // of the first constant; default to int.
        let underlying_type = ty
            .fields
            .iter()
            .find(|f| f.name == "value__")
            .map(|f| signatures::friendly_name(&f.field_type))
            .or_else(|| {
                ty.fields
                    .iter()
                    .filter(|f| f.is_literal)
                    .find_map(|f| f.constant.as_ref())
                    .map(|c| c.type_display().to_string())
            })
            .unwrap_or_else(|| "int".to_string());

        let mut values = Vec::new();
        for field in ty.fields.iter().filter(|f| f.is_literal) {
            let mut docs = DocFields::default();
            if let Some(comment) = self.lookup_docs(&field.doc_id, &field.name) {
                docs.apply_comment(&comment);
            }
            values.push(EnumValueNode {
                name: field.name.clone(),
                value: field
                    .constant
                    .as_ref()
                    .map(|c| c.render())
                    .unwrap_or_default(),
                docs,
            });
        }

        let mut docs = DocFields::default();
        if let Some(comment) = self.lookup_docs(&ty.doc_id, &ty.full_name) {
            docs.apply_comment(&comment);
        }

        TypeNode {
            name: ty.simple_name().to_string(),
            full_name: ty.full_name.clone(),
            display_signature: format!("{} enum {}", ty.visibility, ty.simple_name()),
            kind: TypeKind::Enum,
            assembly: ty.assembly.clone(),
            base_type: None,
            interfaces: Vec::new(),
            is_static: false,
            members: Vec::new(),
            is_external_reference: false,
            enum_info: Some(EnumInfo {
                is_flags,
                underlying_type,
                values,
            }),
            references: Vec::new(),
            docs,
        }
    }

    /// Delegates surface in metadata as classes with compiler-generated
    /// members; the documented shape is the Invoke signature alone.
    fn build_delegate(&mut self, ty: &TypeSymbol) -> TypeNode {
        let invoke = ty.methods.iter().find(|m| m.name == "Invoke");
        let display_signature = match invoke {
            Some(invoke) => {
                let params: Vec<String> =
                    invoke.params.iter().map(signatures::parameter_display).collect();
                let generics = if ty.generic_params.is_empty() {
                    String::new()
                } else {
                    let names: Vec<&str> =
                        ty.generic_params.iter().map(|p| p.name.as_str()).collect();
                    format!("<{}>", names.join(", "))
                };
                format!(
                    "{} delegate {} {}{}({})",
                    ty.visibility,
                    signatures::friendly_name(&invoke.return_type),
                    ty.simple_name(),
                    generics,
                    params.join(", ")
                )
            }
            None => format!("{} delegate {}", ty.visibility, ty.simple_name()),
        };

        let mut docs = DocFields::default();
        if let Some(comment) = self.lookup_docs(&ty.doc_id, &ty.full_name) {
            docs.apply_comment(&comment);
        }

        TypeNode {
            name: ty.simple_name().to_string(),
            full_name: ty.full_name.clone(),
            display_signature,
            kind: TypeKind::Delegate,
            assembly: ty.assembly.clone(),
            base_type: None,
            interfaces: Vec::new(),
            is_static: false,
            members: Vec::new(),
            is_external_reference: false,
            enum_info: None,
            references: Vec::new(),
            docs,
        }
    }

    fn build_method_member(
        &mut self,
        ty: &TypeSymbol,
        method: &MethodSymbol,
        method_kind: MethodKind,
        inherited: bool,
        declaring_type: Option<&str>,
    ) -> MemberNode {
        let comment = self.lookup_docs(&method.doc_id, &method.name);

        let parameters: Vec<ParameterNode> = method
            .params
            .iter()
            .map(|param| {
                let mut docs = DocFields::default();
                if let Some(text) = comment.as_ref().and_then(|c| c.param(&param.name)) {
                    docs.usage = Some(text.to_string());
                }
                ParameterNode {
                    name: param.name.clone(),
                    type_name: signatures::friendly_name(&param.param_type),
                    display: signatures::parameter_display(param),
                    is_optional: param.is_optional,
                    has_default: param.has_default(),
                    default_value: param.default_value.as_ref().map(|d| d.render()),
                    is_params: param.is_params,
                    type_ref: Some(Box::new(self.reference_placeholder(&param.param_type))),
                    docs,
                }
            })
            .collect();

        let returns_void = method.return_type == "System.Void";
        let extended_type = if method.is_extension {
            method.params.first().map(|p| p.param_type.clone())
        } else {
            None
        };
        let overridden_member = if method.is_override {
            ty.base_type
                .as_ref()
                .map(|base| format!("{}.{}", base, method.name))
        } else {
            None
        };

        let mut docs = DocFields::default();
        if let Some(comment) = &comment {
            docs.apply_comment(comment);
        }

        MemberNode {
            name: display_method_name(ty, method),
            display_name: signatures::compact_display(&display_method_name(ty, method), &method.params),
            signature: signatures::method_signature(ty.simple_name(), method),
            kind: MemberKind::Method,
            method_kind: Some(method_kind),
            visibility: method.visibility,
            return_type: if returns_void {
                None
            } else {
                Some(signatures::friendly_name(&method.return_type))
            },
            return_type_ref: if returns_void {
                None
            } else {
                Some(Box::new(self.reference_placeholder(&method.return_type)))
            },
            parameters,
            inherited,
            is_override: method.is_override,
            is_virtual: method.is_virtual,
            is_abstract: method.is_abstract,
            is_extension: method.is_extension,
            declaring_type: declaring_type.map(String::from),
            overridden_member,
            extended_type,
            docs,
        }
    }

    fn build_property_member(
        &mut self,
        property: &PropertySymbol,
        inherited: bool,
        declaring_type: Option<&str>,
    ) -> MemberNode {
        let mut docs = DocFields::default();
        if let Some(comment) = self.lookup_docs(&property.doc_id, &property.name) {
            docs.apply_comment(&comment);
        }
        MemberNode {
            name: property.name.clone(),
            display_name: property.name.clone(),
            signature: signatures::property_signature(property),
            kind: MemberKind::Property,
            method_kind: None,
            visibility: property.visibility,
            return_type: Some(signatures::friendly_name(&property.property_type)),
            return_type_ref: Some(Box::new(self.reference_placeholder(&property.property_type))),
            parameters: Vec::new(),
            inherited,
            is_override: property.is_override,
            is_virtual: property.is_virtual,
            is_abstract: property.is_abstract,
            is_extension: false,
            declaring_type: declaring_type.map(String::from),
            overridden_member: None,
            extended_type: None,
            docs,
        }
    }

    fn build_field_member(
        &mut self,
        field: &FieldSymbol,
        inherited: bool,
        declaring_type: Option<&str>,
    ) -> MemberNode {
        let mut docs = DocFields::default();
        if let Some(comment) = self.lookup_docs(&field.doc_id, &field.name) {
            docs.apply_comment(&comment);
        }
        MemberNode {
            name: field.name.clone(),
            display_name: field.name.clone(),
            signature: signatures::field_signature(field),
            kind: MemberKind::Field,
            method_kind: None,
            visibility: field.visibility,
            return_type: Some(signatures::friendly_name(&field.field_type)),
            return_type_ref: Some(Box::new(self.reference_placeholder(&field.field_type))),
            parameters: Vec::new(),
            inherited,
            is_override: false,
            is_virtual: false,
            is_abstract: false,
            is_extension: false,
            declaring_type: declaring_type.map(String::from),
            overridden_member: None,
            extended_type: None,
            docs,
        }
    }

    fn build_event_member(
        &mut self,
        event: &EventSymbol,
        inherited: bool,
        declaring_type: Option<&str>,
    ) -> MemberNode {
        let mut docs = DocFields::default();
        if let Some(comment) = self.lookup_docs(&event.doc_id, &event.name) {
            docs.apply_comment(&comment);
        }
        MemberNode {
            name: event.name.clone(),
            display_name: event.name.clone(),
            signature: format!(
                "{} event {} {}",
                event.visibility,
                signatures::friendly_name(&event.event_type),
                event.name
            ),
            kind: MemberKind::Event,
            method_kind: None,
            visibility: event.visibility,
            return_type: Some(signatures::friendly_name(&event.event_type)),
            return_type_ref: Some(Box::new(self.reference_placeholder(&event.event_type))),
            parameters: Vec::new(),
            inherited,
            is_override: false,
            is_virtual: false,
            is_abstract: false,
            is_extension: false,
            declaring_type: declaring_type.map(String::from),
            overridden_member: None,
            extended_type: None,
            docs,
        }
    }

    /// Walk the base chain collecting inherited members. An unresolvable
    /// base (the error-object degenerate) is corrected to System.Object.
    fn collect_inherited(&mut self, ty: &TypeSymbol, node: &mut TypeNode) {
        let declared: HashSet<String> =
            node.members.iter().map(|m| m.display_name.clone()).collect();
        let mut seen = declared;

        let loader = self.loader;
        let mut current = ty.base_type.clone();
        let mut depth = 0;
        while let Some(base_full) = current.take() {
            depth += 1;
            if depth > 64 {
                break;
            }
            let base = match loader.find_type(&base_full) {
                Some(base) => base,
                None if base_full != "System.Object" => {
                    // Degenerate base symbol; substitute the object type
                    match loader.find_type("System.Object") {
                        Some(base) => base,
                        None => break,
                    }
                }
                None => break,
            };
            let from_object = base.full_name == "System.Object";
            if from_object && !self.options.include_object_inheritance {
                break;
            }
            let same_assembly = base.assembly == ty.assembly;

            let mut incoming: Vec<MemberNode> = Vec::new();
            for method in &base.methods {
                if !inherited_passes(method.visibility, same_assembly) {
                    continue;
                }
                // Constructors and accessors are not inherited members
                match classify_method(method) {
                    Some(MethodKind::Ordinary) => {}
                    _ => continue,
                }
                incoming.push(self.build_method_member(
                    base,
                    method,
                    MethodKind::Ordinary,
                    true,
                    Some(&base.full_name),
                ));
            }
            for property in &base.properties {
                if !inherited_passes(property.visibility, same_assembly) {
                    continue;
                }
                incoming.push(self.build_property_member(property, true, Some(&base.full_name)));
            }
            for event in &base.events {
                if !inherited_passes(event.visibility, same_assembly) {
                    continue;
                }
                incoming.push(self.build_event_member(event, true, Some(&base.full_name)));
            }

            for member in incoming {
                if seen.insert(member.display_name.clone()) {
                    node.members.push(member);
                }
            }

            if from_object {
                break;
            }
            current = base.base_type.clone();
        }
    }

    fn include_declared(&self, visibility: Visibility) -> bool {
        self.options.includes(visibility)
    }

    fn reference_placeholder(&self, full_name: &str) -> TypeNode {
        // Fresh, non-interned, never registered anywhere
        TypeNode::reference(full_name, &signatures::friendly_name(full_name))
    }

    /// Fetch and parse the XML fragment for a doc ID. A malformed fragment
    /// is recorded as a diagnostic; the node is still emitted without docs.
    fn lookup_docs(&mut self, doc_id: &str, subject: &str) -> Option<DocComment> {
        let docs = self.docs;
        let raw = docs.get(doc_id)?;
        match parse_doc_comment(raw) {
            Ok(comment) => comment,
            Err(e) => {
                self.diagnostics.add(
                    Diagnostic::warning(DiagnosticCode::DNW01002, e.to_string())
                        .with_subject(subject),
                );
                None
            }
        }
    }
}

/// Accessibility rule for inherited members: public/protected and their
/// unions always pass; internal unions pass only when the base type lives
/// in the same binary as the derived type.
fn inherited_passes(visibility: Visibility, same_assembly: bool) -> bool {
    match visibility {
        Visibility::Public | Visibility::Protected | Visibility::ProtectedOrInternal => true,
        Visibility::Internal | Visibility::ProtectedAndInternal => same_assembly,
        Visibility::Private => false,
    }
}

/// Enums may surface as genuine enum symbols or, from bare metadata, as a
/// sealed class extending System.Enum with literal fields.
fn is_enum_symbol(ty: &TypeSymbol) -> bool {
    if ty.kind == TypeSymbolKind::Enum {
        return true;
    }
    ty.is_sealed
        && ty.base_type.as_deref() == Some("System.Enum")
        && ty.fields.iter().any(|f| f.is_literal)
}

/// Classify a method symbol; `None` means the method is not emitted as a
/// standalone member (property/event accessors, static initializers).
fn classify_method(method: &MethodSymbol) -> Option<MethodKind> {
    if method.name == ".cctor" {
        return None;
    }
    if method.name == ".ctor" {
        return Some(MethodKind::Constructor);
    }
    if method.name.starts_with("op_") {
        return Some(MethodKind::Operator);
    }
    if method.is_special_name
        || method.name.starts_with("get_")
        || method.name.starts_with("set_")
        || method.name.starts_with("add_")
        || method.name.starts_with("remove_")
    {
        return None;
    }
    Some(MethodKind::Ordinary)
}

fn display_method_name(ty: &TypeSymbol, method: &MethodSymbol) -> String {
    if method.name == ".ctor" {
        ty.simple_name().to_string()
    } else {
        method.name.clone()
    }
}
