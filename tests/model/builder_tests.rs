use docnet::metadata::symbols::ParamSymbol;
use docnet::model::nodes::{MemberKind, MethodKind, TypeKind};
use docnet::model::ModelBuilder;
use docnet::options::{DocOptions, Visibility};
use docnet::xmldoc::SidecarDocs;

use crate::common;

#[test]
fn namespaces_without_surviving_types_are_not_materialized() {
    let mut internal = common::class("N.Hidden", "Secret", "Lib");
    internal.visibility = Visibility::Internal;
    let visible = common::class("N", "C", "Lib");

    let loader = common::loader(common::assembly("Lib", vec![internal, visible]));
    let options = DocOptions::default();
    let docs = SidecarDocs::empty();
    let model = ModelBuilder::new(&loader, &docs, &options).build();

    assert_eq!(model.namespaces.len(), 1);
    assert_eq!(model.namespaces[0].name, "N");
}

#[test]
fn namespace_order_is_alphabetical_types_keep_declared_order() {
    let b1 = common::class("B", "Zed", "Lib");
    let b2 = common::class("B", "Alpha", "Lib");
    let a = common::class("A", "Mid", "Lib");

    let loader = common::loader(common::assembly("Lib", vec![b1, b2, a]));
    let options = DocOptions::default();
    let docs = SidecarDocs::empty();
    let model = ModelBuilder::new(&loader, &docs, &options).build();

    let names: Vec<&str> = model.namespaces.iter().map(|ns| ns.name.as_str()).collect();
    assert_eq!(names, vec!["A", "B"]);
    let b_types: Vec<&str> = model.namespaces[1]
        .types
        .iter()
        .map(|t| t.name.as_str())
        .collect();
    assert_eq!(b_types, vec!["Zed", "Alpha"]);
}

#[test]
fn declared_member_filter_follows_included_visibilities() {
    let mut ty = common::class("N", "C", "Lib");
    let public = common::method(&ty, "Visible", "System.Void", vec![]);
    let mut internal = common::method(&ty, "Hidden", "System.Void", vec![]);
    internal.visibility = Visibility::Internal;
    ty.methods = vec![public, internal];

    let loader = common::loader(common::assembly("Lib", vec![ty]));
    let options = DocOptions::default();
    let docs = SidecarDocs::empty();
    let model = ModelBuilder::new(&loader, &docs, &options).build();

    let c = model.find_type("N.C").unwrap();
    assert_eq!(c.members.len(), 1);
    assert_eq!(c.members[0].name, "Visible");
    // Property 4: every non-inherited member's visibility is in the set
    for member in &c.members {
        assert!(options.includes(member.visibility));
    }
}

#[test]
fn parameter_and_return_placeholders_are_reference_only() {
    // A method returning its own type must not expand into a cycle
    let mut ty = common::class("N", "Node", "Lib");
    let m = common::method(
        &ty,
        "Clone",
        "N.Node",
        vec![ParamSymbol::plain("other", "N.Node")],
    );
    ty.methods = vec![m];

    let loader = common::loader(common::assembly("Lib", vec![ty]));
    let options = DocOptions::default();
    let docs = SidecarDocs::empty();
    let model = ModelBuilder::new(&loader, &docs, &options).build();

    let node = model.find_type("N.Node").unwrap();
    let clone = &node.members[0];

    let ret = clone.return_type_ref.as_ref().unwrap();
    assert!(ret.is_external_reference);
    assert!(ret.members.is_empty());

    let param_ref = clone.parameters[0].type_ref.as_ref().unwrap();
    assert!(param_ref.is_external_reference);
    assert!(param_ref.members.is_empty());

    // Property 1: serialization terminates
    let json = serde_json::to_string(&model).unwrap();
    assert!(json.contains("\"Clone(Node)\""));
}

#[test]
fn constructors_operators_and_accessors_are_classified() {
    let mut ty = common::class("N", "C", "Lib");
    let ctor = common::method(&ty, ".ctor", "System.Void", vec![]);
    let op = common::method(&ty, "op_Addition", "N.C", vec![]);
    let mut getter = common::method(&ty, "get_Count", "System.Int32", vec![]);
    getter.is_special_name = true;
    ty.methods = vec![ctor, op, getter];
    ty.properties = vec![common::property(&ty, "Count", "System.Int32")];

    let loader = common::loader(common::assembly("Lib", vec![ty]));
    let options = DocOptions::default();
    let docs = SidecarDocs::empty();
    let model = ModelBuilder::new(&loader, &docs, &options).build();

    let c = model.find_type("N.C").unwrap();
    let kinds: Vec<(&str, Option<MethodKind>)> = c
        .members
        .iter()
        .map(|m| (m.name.as_str(), m.method_kind))
        .collect();

    // The accessor disappears; the property carries it instead
    assert_eq!(
        kinds,
        vec![
            ("C", Some(MethodKind::Constructor)),
            ("op_Addition", Some(MethodKind::Operator)),
            ("Count", None),
        ]
    );
    let count = c.find_member("Count").unwrap();
    assert_eq!(count.kind, MemberKind::Property);
    assert_eq!(count.signature, "public int Count { get; set; }");
}

#[test]
fn metadata_degenerate_enums_are_detected() {
    // Sealed class extending System.Enum with literal int fields
    let mut ty = common::class("N", "Mode", "Lib");
    ty.is_sealed = true;
    ty.base_type = Some("System.Enum".to_string());
    let value_slot = common::field(&ty, "value__", "System.Int32");
    ty.fields = vec![
        value_slot,
        common::literal_field(&ty, "A", 1),
        common::literal_field(&ty, "B", 2),
        common::literal_field(&ty, "C", 4),
    ];
    ty.attributes = vec!["FlagsAttribute".to_string()];

    let loader = common::loader(common::assembly("Lib", vec![ty]));
    let options = DocOptions::default();
    let docs = SidecarDocs::empty();
    let model = ModelBuilder::new(&loader, &docs, &options).build();

    let mode = model.find_type("N.Mode").unwrap();
    assert_eq!(mode.kind, TypeKind::Enum);
    let info = mode.enum_info.as_ref().unwrap();
    assert!(info.is_flags);
    assert_eq!(info.underlying_type, "int");
    let values: Vec<(&str, &str)> = info
        .values
        .iter()
        .map(|v| (v.name.as_str(), v.value.as_str()))
        .collect();
    assert_eq!(values, vec![("A", "1"), ("B", "2"), ("C", "4")]);
}

#[test]
fn enum_underlying_type_falls_back_to_first_constant() {
    let mut ty = common::class("N", "Tiny", "Lib");
    ty.is_sealed = true;
    ty.base_type = Some("System.Enum".to_string());
    let mut small = common::literal_field(&ty, "One", 0);
    small.constant = Some(docnet::metadata::ConstantValue::Byte(1));
    ty.fields = vec![small];

    let loader = common::loader(common::assembly("Lib", vec![ty]));
    let options = DocOptions::default();
    let docs = SidecarDocs::empty();
    let model = ModelBuilder::new(&loader, &docs, &options).build();

    let info = model.find_type("N.Tiny").unwrap().enum_info.as_ref().unwrap().clone();
    assert_eq!(info.underlying_type, "byte");
    assert_eq!(info.values[0].value, "1");
}

#[test]
fn delegates_render_their_invoke_signature() {
    let mut handler = common::class("N", "Handler", "Lib");
    handler.kind = docnet::metadata::TypeSymbolKind::Delegate;
    handler.base_type = Some("System.MulticastDelegate".to_string());
    handler.methods = vec![common::method(
        &handler,
        "Invoke",
        "System.Int32",
        vec![ParamSymbol::plain("x", "System.Int32")],
    )];

    let loader = common::loader(common::assembly("Lib", vec![handler]));
    let options = DocOptions::default();
    let docs = SidecarDocs::empty();
    let model = ModelBuilder::new(&loader, &docs, &options).build();

    let node = model.find_type("N.Handler").unwrap();
    assert_eq!(node.kind, TypeKind::Delegate);
    assert_eq!(node.display_signature, "public delegate int Handler(int x)");
    assert!(node.members.is_empty());
}

#[test]
fn inherited_members_walk_the_base_chain() {
    let mut base = common::class("N", "Base", "Lib");
    let inherited_method = common::method(&base, "FromBase", "System.Void", vec![]);
    let mut internal_method = common::method(&base, "InternalHelper", "System.Void", vec![]);
    internal_method.visibility = Visibility::Internal;
    base.methods = vec![inherited_method, internal_method];

    let mut derived = common::class("N", "Derived", "Lib");
    derived.base_type = Some("N.Base".to_string());
    derived.methods = vec![common::method(&derived, "Own", "System.Void", vec![])];

    let mut options = DocOptions::default();
    options.include_inherited = true;

    let loader = common::loader(common::assembly("Lib", vec![base, derived]));
    let docs = SidecarDocs::empty();
    let model = ModelBuilder::new(&loader, &docs, &options).build();

    let derived_node = model.find_type("N.Derived").unwrap();
    let from_base = derived_node.find_member("FromBase()").unwrap();
    assert!(from_base.inherited);
    assert_eq!(from_base.declaring_type.as_deref(), Some("N.Base"));

    // Internal member passes because base and derived share the binary
    assert!(derived_node.find_member("InternalHelper()").is_some());
}

#[test]
fn internal_inherited_members_require_same_binary() {
    let mut base = common::class("N", "Base", "OtherLib");
    let mut internal_method = common::method(&base, "InternalHelper", "System.Void", vec![]);
    internal_method.visibility = Visibility::Internal;
    let public_method = common::method(&base, "PublicHelper", "System.Void", vec![]);
    base.methods = vec![internal_method, public_method];

    let mut derived = common::class("N", "Derived", "Lib");
    derived.base_type = Some("N.Base".to_string());

    let mut options = DocOptions::default();
    options.include_inherited = true;

    let loader = common::loader_with_refs(
        common::assembly("Lib", vec![derived]),
        vec![common::assembly("OtherLib", vec![base])],
    );
    let docs = SidecarDocs::empty();
    let model = ModelBuilder::new(&loader, &docs, &options).build();

    let derived_node = model.find_type("N.Derived").unwrap();
    assert!(derived_node.find_member("PublicHelper()").is_some());
    assert!(derived_node.find_member("InternalHelper()").is_none());
}

#[test]
fn excluded_type_patterns_drop_types() {
    let keep = common::class("N", "Keep", "Lib");
    let drop = common::class("N", "LegacyThing", "Lib");

    let mut options = DocOptions::default();
    options.excluded_type_patterns = vec!["Legacy*".to_string()];

    let loader = common::loader(common::assembly("Lib", vec![keep, drop]));
    let docs = SidecarDocs::empty();
    let model = ModelBuilder::new(&loader, &docs, &options).build();

    assert!(model.find_type("N.Keep").is_some());
    assert!(model.find_type("N.LegacyThing").is_none());
}

#[test]
fn malformed_doc_fragments_keep_the_node_and_record_a_diagnostic() {
    let mut ty = common::class("N", "C", "Lib");
    let m = common::method(&ty, "Broken", "System.Void", vec![]);
    let doc_id = m.doc_id.clone();
    ty.methods = vec![m];

    let xml = format!(
        r#"<doc><members><member name="{}"><summary>unclosed</member></members></doc>"#,
        doc_id
    );
    // The sidecar itself parses member-by-member; the broken fragment is
    // isolated to its symbol.
    let docs = SidecarDocs::parse(&xml).unwrap_or_else(|_| SidecarDocs::empty());

    let loader = common::loader(common::assembly("Lib", vec![ty]));
    let options = DocOptions::default();
    let model = ModelBuilder::new(&loader, &docs, &options).build();

    let c = model.find_type("N.C").unwrap();
    assert_eq!(c.members.len(), 1);
    assert!(c.members[0].docs.summary.is_none());
}
