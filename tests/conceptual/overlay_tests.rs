use std::fs;

use docnet::conceptual::{OverlayLoader, PLACEHOLDER_MARKER};
use docnet::model::ModelBuilder;
use docnet::options::DocOptions;
use docnet::xmldoc::SidecarDocs;

use crate::common;

fn model_with_member() -> docnet::model::AssemblyNode {
    let mut c = common::class("N", "C", "Lib");
    c.methods = vec![common::method(
        &c,
        "Add",
        "System.Int32",
        vec![docnet::metadata::symbols::ParamSymbol::plain(
            "a",
            "System.Int32",
        )],
    )];
    let loader = common::loader(common::assembly("Lib", vec![c]));
    let options = DocOptions::default();
    let docs = SidecarDocs::empty();
    ModelBuilder::new(&loader, &docs, &options).build()
}

#[test]
fn overlay_files_attach_to_types_and_members() {
    let root = common::unique_temp_dir("docnet_overlay_attach");
    common::write(&root.join("N/C/usage.md"), "How to use C.");
    common::write(&root.join("N/C/related-apis.md"), "T:N.Other\n\nT:N.More\n");
    common::write(&root.join("N/C/Add/usage.md"), "How to call Add.");
    common::write(&root.join("N/C/Add/param-a.md"), "The first operand.");
    common::write(&root.join("N/summary.md"), "The N namespace.");

    let mut model = model_with_member();
    let options = DocOptions::default();
    let diagnostics = OverlayLoader::new(&options).load(&root, &mut model);
    assert!(diagnostics.is_empty());

    assert_eq!(
        model.namespaces[0].docs.summary.as_deref(),
        Some("The N namespace.")
    );
    let c = model.find_type("N.C").unwrap();
    assert_eq!(c.docs.usage.as_deref(), Some("How to use C."));
    assert_eq!(
        c.docs.related_apis,
        vec!["T:N.Other".to_string(), "T:N.More".to_string()]
    );
    let add = &c.members[0];
    assert_eq!(add.docs.usage.as_deref(), Some("How to call Add."));
    assert_eq!(
        add.parameters[0].docs.usage.as_deref(),
        Some("The first operand.")
    );

    fs::remove_dir_all(&root).unwrap();
}

#[test]
fn placeholder_files_are_invisible_when_disabled() {
    // Scenario S6 and property 8
    let root = common::unique_temp_dir("docnet_overlay_placeholder");
    common::write(
        &root.join("N/C/usage.md"),
        &format!("{}\n\nStub body.", PLACEHOLDER_MARKER),
    );

    let mut options = DocOptions::default();
    options.show_placeholders = false;
    let mut model = model_with_member();
    OverlayLoader::new(&options).load(&root, &mut model);
    assert!(model.find_type("N.C").unwrap().docs.usage.is_none());

    options.show_placeholders = true;
    let mut model = model_with_member();
    OverlayLoader::new(&options).load(&root, &mut model);
    let usage = model.find_type("N.C").unwrap().docs.usage.clone().unwrap();
    assert!(usage.starts_with("<!--"));
    assert!(usage.contains("Stub body."));

    fs::remove_dir_all(&root).unwrap();
}

#[test]
fn byte_order_marks_are_stripped_and_content_trimmed() {
    let root = common::unique_temp_dir("docnet_overlay_bom");
    common::write(&root.join("N/C/usage.md"), "\u{feff}  Trimmed content.  \n");

    let mut model = model_with_member();
    let options = DocOptions::default();
    OverlayLoader::new(&options).load(&root, &mut model);

    assert_eq!(
        model.find_type("N.C").unwrap().docs.usage.as_deref(),
        Some("Trimmed content.")
    );

    fs::remove_dir_all(&root).unwrap();
}

#[test]
fn missing_overlay_root_is_silently_ignored() {
    let root = common::unique_temp_dir("docnet_overlay_missing").join("nope");
    let mut model = model_with_member();
    let options = DocOptions::default();
    let diagnostics = OverlayLoader::new(&options).load(&root, &mut model);
    assert!(diagnostics.is_empty());
    assert!(model.find_type("N.C").unwrap().docs.usage.is_none());
}

#[test]
fn xml_derived_examples_are_not_replaced() {
    let root = common::unique_temp_dir("docnet_overlay_examples");
    common::write(&root.join("N/C/examples.md"), "Overlay example.");

    let mut model = model_with_member();
    model.namespaces[0].types[0].docs.examples = Some("From XML.".to_string());
    let options = DocOptions::default();
    OverlayLoader::new(&options).load(&root, &mut model);

    assert_eq!(
        model.find_type("N.C").unwrap().docs.examples.as_deref(),
        Some("From XML.")
    );

    fs::remove_dir_all(&root).unwrap();
}
