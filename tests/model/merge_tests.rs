use docnet::model::{ModelBuilder, merge_assemblies};
use docnet::options::DocOptions;
use docnet::xmldoc::SidecarDocs;

use crate::common;

fn build(assembly: docnet::metadata::AssemblySymbols) -> docnet::model::AssemblyNode {
    let loader = common::loader(assembly);
    let options = DocOptions::default();
    let docs = SidecarDocs::empty();
    ModelBuilder::new(&loader, &docs, &options).build()
}

#[test]
fn merging_a_singleton_is_identity() {
    let model = build(common::assembly("Lib", vec![common::class("N", "C", "Lib")]));
    let merged = merge_assemblies(vec![model.clone()]).unwrap();
    assert_eq!(merged, model);
}

#[test]
fn merging_an_empty_sequence_yields_none() {
    assert!(merge_assemblies(vec![]).is_none());
}

#[test]
fn merging_a_model_with_itself_changes_nothing() {
    let mut ty = common::class("N", "C", "Lib");
    ty.methods = vec![common::method(&ty, "Go", "System.Void", vec![])];
    let model = build(common::assembly("Lib", vec![ty]));

    let merged = merge_assemblies(vec![model.clone(), model.clone()]).unwrap();

    // Property 5: same namespace/type/member name sets, first wins
    assert_eq!(merged.namespaces.len(), model.namespaces.len());
    let c = merged.find_type("N.C").unwrap();
    assert_eq!(c.members.len(), 1);
}

#[test]
fn disjoint_types_in_a_shared_namespace_combine_in_input_order() {
    let a = build(common::assembly("LibA", vec![common::class("X", "T1", "LibA")]));
    let b = build(common::assembly("LibB", vec![common::class("X", "T2", "LibB")]));

    let merged = merge_assemblies(vec![a, b]).unwrap();

    assert_eq!(merged.namespaces.len(), 1);
    let x = merged.find_namespace("X").unwrap();
    let names: Vec<&str> = x.types.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["T1", "T2"]);
    // First input owns the merged assembly identity
    assert_eq!(merged.name, "LibA");
}

#[test]
fn duplicate_members_are_discarded_first_wins() {
    let mut first = common::class("N", "C", "LibA");
    first.methods = vec![common::method(&first, "Go", "System.Void", vec![])];
    let mut second = common::class("N", "C", "LibB");
    second.methods = vec![
        common::method(&second, "Go", "System.Void", vec![]),
        common::method(&second, "Extra", "System.Void", vec![]),
    ];

    let a = build(common::assembly("LibA", vec![first]));
    let b = build(common::assembly("LibB", vec![second]));
    let merged = merge_assemblies(vec![a, b]).unwrap();

    let c = merged.find_type("N.C").unwrap();
    let names: Vec<&str> = c.members.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["Go", "Extra"]);
    // Ownership stayed with the first assembly
    assert_eq!(c.assembly, "LibA");
}

#[test]
fn sparse_doc_fields_flow_into_empty_destinations_only() {
    let mut first = common::class("N", "C", "LibA");
    first.methods = vec![common::method(&first, "Go", "System.Void", vec![])];
    let mut a = build(common::assembly("LibA", vec![first]));
    a.namespaces[0].types[0].docs.summary = Some("first summary".to_string());

    let second = common::class("N", "C", "LibB");
    let mut b = build(common::assembly("LibB", vec![second]));
    b.namespaces[0].types[0].docs.summary = Some("second summary".to_string());
    b.namespaces[0].types[0].docs.remarks = Some("second remarks".to_string());

    let merged = merge_assemblies(vec![a, b]).unwrap();
    let c = merged.find_type("N.C").unwrap();
    assert_eq!(c.docs.summary.as_deref(), Some("first summary"));
    assert_eq!(c.docs.remarks.as_deref(), Some("second remarks"));
}
