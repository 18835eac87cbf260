use docnet::metadata::symbols::ParamSymbol;
use docnet::model::reference::ReferenceKind;
use docnet::model::ModelBuilder;
use docnet::options::{DocOptions, NamespaceMode};
use docnet::xmldoc::SidecarDocs;
use docnet::xref::CrossReferenceResolver;

use crate::common;

fn sample_model() -> docnet::model::AssemblyNode {
    let mut c = common::class("N", "C", "Lib");
    c.methods = vec![common::method(
        &c,
        "Add",
        "System.Int32",
        vec![
            ParamSymbol::plain("a", "System.Int32"),
            ParamSymbol::plain("b", "System.Int32"),
        ],
    )];
    c.properties = vec![common::property(&c, "Count", "System.Int32")];

    let mut mode = common::class("N", "Mode", "Lib");
    mode.is_sealed = true;
    mode.base_type = Some("System.Enum".to_string());
    mode.fields = vec![
        common::literal_field(&mode, "On", 1),
        common::literal_field(&mode, "Off", 0),
    ];

    let loader = common::loader(common::assembly("Lib", vec![c, mode]));
    let options = DocOptions::default();
    let docs = SidecarDocs::empty();
    ModelBuilder::new(&loader, &docs, &options).build()
}

#[test]
fn canonical_ids_resolve_back_to_their_nodes() {
    let model = sample_model();
    let options = DocOptions::default();
    let resolver = CrossReferenceResolver::build(&model, &options);

    // Property 6: round-trip through the map
    let type_ref = resolver.resolve("T:N.C", None);
    assert!(type_ref.resolved);
    assert_eq!(type_ref.kind, ReferenceKind::Type);
    assert_eq!(type_ref.display_name, "C");
    assert_eq!(type_ref.target_id.as_deref(), Some("T:N.C"));
    assert_eq!(type_ref.relative_path.as_deref(), Some("api/N/C.md"));
    assert_eq!(type_ref.anchor, None);

    let method_ref = resolver.resolve("M:N.C.Add", None);
    assert!(method_ref.resolved);
    assert_eq!(method_ref.kind, ReferenceKind::Method);
    assert_eq!(method_ref.display_name, "Add");
    assert_eq!(method_ref.anchor.as_deref(), Some("add"));

    let property_ref = resolver.resolve("P:N.C.Count", None);
    assert_eq!(property_ref.kind, ReferenceKind::Property);
}

#[test]
fn unprefixed_full_and_simple_names_resolve() {
    let model = sample_model();
    let options = DocOptions::default();
    let resolver = CrossReferenceResolver::build(&model, &options);

    assert!(resolver.resolve("N.C", None).resolved);
    assert!(resolver.resolve("C", None).resolved);
    assert!(resolver.resolve("N.C.Add", None).resolved);
}

#[test]
fn enum_values_register_under_dotted_and_prefixed_forms() {
    let model = sample_model();
    let options = DocOptions::default();
    let resolver = CrossReferenceResolver::build(&model, &options);

    let value_ref = resolver.resolve("F:N.Mode.On", None);
    assert!(value_ref.resolved);
    assert_eq!(value_ref.kind, ReferenceKind::Field);
    assert_eq!(value_ref.display_name, "On");
    assert_eq!(value_ref.anchor.as_deref(), Some("on"));

    assert!(resolver.resolve("N.Mode.On", None).resolved);
}

#[test]
fn vendor_namespaces_fall_back_to_framework_urls() {
    let model = sample_model();
    let options = DocOptions::default();
    let resolver = CrossReferenceResolver::build(&model, &options);

    // Scenario S5
    let framework = resolver.resolve("T:System.Collections.Generic.List`1", None);
    assert!(framework.resolved);
    assert_eq!(framework.kind, ReferenceKind::Framework);
    assert_eq!(framework.display_name, "List");
    assert_eq!(
        framework.relative_path.as_deref(),
        Some("https://learn.microsoft.com/dotnet/api/system.collections.generic.list-1")
    );
}

#[test]
fn http_urls_are_external_references() {
    let model = sample_model();
    let options = DocOptions::default();
    let resolver = CrossReferenceResolver::build(&model, &options);

    let external = resolver.resolve("https://example.com/docs", None);
    assert_eq!(external.kind, ReferenceKind::External);
    assert!(external.resolved);
    assert_eq!(
        external.relative_path.as_deref(),
        Some("https://example.com/docs")
    );
}

#[test]
fn unresolved_strings_fall_back_to_simple_names() {
    let model = sample_model();
    let options = DocOptions::default();
    let resolver = CrossReferenceResolver::build(&model, &options);

    let unknown = resolver.resolve("T:Vendor.Thing", None);
    assert!(!unknown.resolved);
    assert_eq!(unknown.kind, ReferenceKind::Unknown);
    assert_eq!(unknown.display_name, "Thing");
    assert_eq!(unknown.anchor, None);

    let member_like = resolver.resolve("Vendor.Thing.doStuff", None);
    assert_eq!(member_like.anchor.as_deref(), Some("doStuff"));
}

#[test]
fn same_directory_references_collapse_to_file_names() {
    let model = sample_model();
    let options = DocOptions::default();
    let resolver = CrossReferenceResolver::build(&model, &options);

    let from_sibling = resolver.resolve("T:N.Mode", Some("api/N/C.md"));
    assert_eq!(from_sibling.relative_path.as_deref(), Some("Mode.md"));

    let from_elsewhere = resolver.resolve("T:N.Mode", Some("guides/intro.md"));
    assert_eq!(from_elsewhere.relative_path.as_deref(), Some("api/N/Mode.md"));
}

#[test]
fn file_namespace_mode_flattens_pages() {
    let model = sample_model();
    let mut options = DocOptions::default();
    options.namespace_mode = NamespaceMode::File;
    options.namespace_separator = '-';
    let resolver = CrossReferenceResolver::build(&model, &options);

    let type_ref = resolver.resolve("T:N.C", None);
    assert_eq!(type_ref.relative_path.as_deref(), Some("api/N-C.md"));
}

#[test]
fn resolver_apply_fills_type_reference_lists() {
    let mut derived = common::class("N", "Derived", "Lib");
    derived.base_type = Some("N.Base".to_string());
    let base = common::class("N", "Base", "Lib");

    let loader = common::loader(common::assembly("Lib", vec![base, derived]));
    let options = DocOptions::default();
    let docs = SidecarDocs::empty();
    let mut model = ModelBuilder::new(&loader, &docs, &options).build();
    model.namespaces[0].types[1].docs.see_also = vec!["T:N.Base".to_string()];

    let resolver = CrossReferenceResolver::build(&model, &options);
    resolver.apply(&mut model, &options);

    let derived_node = model.find_type("N.Derived").unwrap();
    assert!(!derived_node.references.is_empty());
    assert!(derived_node.references.iter().any(|r| r.cref == "T:N.Base"));
    // The base-type edge resolved by full name, within the same directory
    let base_edge = derived_node
        .references
        .iter()
        .find(|r| r.cref == "N.Base")
        .unwrap();
    assert!(base_edge.resolved);
    assert_eq!(base_edge.display_name, "Base");
    assert_eq!(base_edge.relative_path.as_deref(), Some("Base.md"));
}

#[test]
fn framework_base_types_resolve_to_vendor_docs() {
    let mut derived = common::class("N", "CustomError", "Lib");
    derived.base_type = Some("System.Exception".to_string());

    let loader = common::loader(common::assembly("Lib", vec![derived]));
    let options = DocOptions::default();
    let docs = SidecarDocs::empty();
    let mut model = ModelBuilder::new(&loader, &docs, &options).build();

    let resolver = CrossReferenceResolver::build(&model, &options);
    let diagnostics = resolver.apply(&mut model, &options);

    let node = model.find_type("N.CustomError").unwrap();
    let base_edge = node
        .references
        .iter()
        .find(|r| r.cref == "System.Exception")
        .unwrap();
    assert!(base_edge.resolved);
    assert_eq!(base_edge.kind, ReferenceKind::Framework);
    assert_eq!(base_edge.display_name, "Exception");
    assert_eq!(
        base_edge.relative_path.as_deref(),
        Some("https://learn.microsoft.com/dotnet/api/system.exception")
    );
    // A resolved framework base produces no unresolved-cref warning
    assert!(diagnostics.is_empty());
}
