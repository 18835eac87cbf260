//! End-to-end scenarios driving the full pipeline through an in-memory
//! metadata provider, with real files on disk for binaries and sidecars.

use std::fs;
use std::sync::Arc;

use docnet::metadata::symbols::ParamSymbol;
use docnet::options::DocOptions;
use docnet::pipeline::{DocInput, DocPipeline};

use crate::common::{self, FixtureProvider};

#[test]
fn s1_single_class_with_xml_docs() {
    let root = common::unique_temp_dir("docnet_s1");
    let binary = root.join("Lib.dll");
    common::write(&binary, "stub");
    let xml = root.join("Lib.xml");
    common::write(
        &xml,
        r#"<doc>
  <assembly><name>Lib</name></assembly>
  <members>
    <member name="M:N.C.Add(System.Int32,System.Int32)">
      <summary>Adds two ints.</summary>
      <param name="a">first</param>
      <param name="b">second</param>
    </member>
  </members>
</doc>"#,
    );

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
    let provider = FixtureProvider::new();
    provider.insert("Lib.dll", common::assembly("Lib", vec![c]));

    let pipeline = DocPipeline::with_provider(Arc::new(provider));
    let inputs = vec![DocInput::new(&binary).with_xml(&xml)];
    let result = pipeline.process(&inputs, &DocOptions::default());

    assert_eq!(result.model.namespaces.len(), 1);
    assert_eq!(result.model.namespaces[0].name, "N");
    let c = result.model.find_type("N.C").unwrap();
    assert_eq!(c.members.len(), 1);

    let add = &c.members[0];
    assert_eq!(add.name, "Add");
    assert_eq!(add.docs.summary.as_deref(), Some("Adds two ints."));
    assert_eq!(add.parameters.len(), 2);
    assert_eq!(add.parameters[0].docs.usage.as_deref(), Some("first"));
    assert_eq!(add.parameters[1].docs.usage.as_deref(), Some("second"));

    assert!(!result.diagnostics.has_errors());
    fs::remove_dir_all(&root).unwrap();
}

#[test]
fn s2_extension_over_external_int_creates_a_shadow_type() {
    let root = common::unique_temp_dir("docnet_s2");
    let binary = root.join("Ext.dll");
    common::write(&binary, "stub");

    let mut e = common::static_class("", "E", "Ext");
    e.methods = vec![common::extension_method(
        &e,
        "Doubled",
        "System.Int32",
        vec![ParamSymbol::plain("x", "System.Int32")],
    )];
    let provider = FixtureProvider::new();
    provider.insert("Ext.dll", common::assembly("Ext", vec![e]));

    let pipeline = DocPipeline::with_provider(Arc::new(provider));
    let inputs = vec![DocInput::new(&binary)];
    let result = pipeline.process(&inputs, &DocOptions::default());

    // The empty static class is gone
    assert!(result.model.find_type("E").is_none());

    // Shadow namespace and type for System.Int32
    let int32 = result.model.find_type("System.Int32").unwrap();
    assert!(int32.is_external_reference);
    assert_eq!(int32.name, "Int32");
    assert_eq!(int32.members.len(), 1);
    assert_eq!(int32.members[0].name, "Doubled");

    let summary = int32.docs.summary.as_deref().unwrap();
    assert!(summary.contains(".NET"));
    let remarks = int32.docs.remarks.as_deref().unwrap();
    assert!(remarks.contains("https://learn.microsoft.com/dotnet/api/system.int32"));

    fs::remove_dir_all(&root).unwrap();
}

#[test]
fn s4_two_binaries_sharing_a_namespace_merge_in_input_order() {
    let root = common::unique_temp_dir("docnet_s4");
    let bin_a = root.join("A.dll");
    let bin_b = root.join("B.dll");
    common::write(&bin_a, "stub");
    common::write(&bin_b, "stub");

    let provider = FixtureProvider::new();
    provider.insert("A.dll", common::assembly("A", vec![common::class("X", "T1", "A")]));
    provider.insert("B.dll", common::assembly("B", vec![common::class("X", "T2", "B")]));

    let pipeline = DocPipeline::with_provider(Arc::new(provider));
    let inputs = vec![DocInput::new(&bin_a), DocInput::new(&bin_b)];
    let result = pipeline.process(&inputs, &DocOptions::default());

    assert_eq!(result.model.namespaces.len(), 1);
    let x = result.model.find_namespace("X").unwrap();
    let names: Vec<&str> = x.types.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["T1", "T2"]);

    fs::remove_dir_all(&root).unwrap();
}

#[test]
fn s6_conceptual_overlay_respects_the_placeholder_flag() {
    let root = common::unique_temp_dir("docnet_s6");
    let binary = root.join("Lib.dll");
    common::write(&binary, "stub");
    let overlay_root = root.join("conceptual");
    common::write(
        &overlay_root.join("N/C/usage.md"),
        "<!-- TODO: REMOVE THIS COMMENT AFTER YOU CUSTOMIZE THIS CONTENT -->\n\nStub.",
    );

    let build = |show_placeholders: bool| {
        let provider = FixtureProvider::new();
        provider.insert("Lib.dll", common::assembly("Lib", vec![common::class("N", "C", "Lib")]));
        let pipeline = DocPipeline::with_provider(Arc::new(provider));
        let mut options = DocOptions::default();
        options.conceptual_docs_enabled = true;
        options.conceptual_path = Some(overlay_root.clone());
        options.show_placeholders = show_placeholders;
        pipeline.process(&[DocInput::new(&binary)], &options)
    };

    let hidden = build(false);
    assert!(hidden.model.find_type("N.C").unwrap().docs.usage.is_none());

    let shown = build(true);
    let usage = shown.model.find_type("N.C").unwrap().docs.usage.clone().unwrap();
    assert!(usage.contains("Stub."));

    fs::remove_dir_all(&root).unwrap();
}
