use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use docnet::conceptual::{generate_placeholders, is_placeholder_text};
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

fn snapshot_tree(root: &Path) -> BTreeMap<String, String> {
    let mut out = BTreeMap::new();
    let walker = globwalk::GlobWalkerBuilder::from_patterns(root, &["**/*.md"])
        .build()
        .unwrap();
    for entry in walker.filter_map(|r| r.ok()) {
        if entry.file_type().is_file() {
            let rel = entry
                .path()
                .strip_prefix(root)
                .unwrap()
                .to_string_lossy()
                .replace('\\', "/");
            out.insert(rel, fs::read_to_string(entry.path()).unwrap());
        }
    }
    out
}

#[test]
fn scaffold_emits_stub_files_per_node_and_parameter() {
    let root = common::unique_temp_dir("docnet_scaffold_emit");
    let model = model_with_member();
    let options = DocOptions::default();

    let report = generate_placeholders(&model, &options, &root).unwrap();
    assert!(report.files_written > 0);
    assert_eq!(report.files_skipped, 0);

    let tree = snapshot_tree(&root);
    assert!(tree.contains_key("N/summary.md"));
    assert!(tree.contains_key("N/C/usage.md"));
    assert!(tree.contains_key("N/C/related-apis.md"));
    assert!(tree.contains_key("N/C/Add/usage.md"));
    assert!(tree.contains_key("N/C/Add/param-a.md"));

    // Every stub starts with the placeholder marker
    for (path, content) in &tree {
        assert!(is_placeholder_text(content), "{} is not a placeholder", path);
    }

    fs::remove_dir_all(&root).unwrap();
}

#[test]
fn scaffold_is_idempotent_and_never_overwrites() {
    // Property 7
    let root = common::unique_temp_dir("docnet_scaffold_idempotent");
    let model = model_with_member();
    let options = DocOptions::default();

    let first = generate_placeholders(&model, &options, &root).unwrap();
    let before = snapshot_tree(&root);

    // Customize one file; a second run must not clobber it
    let customized = root.join("N/C/usage.md");
    fs::write(&customized, "# My usage notes\n").unwrap();

    let second = generate_placeholders(&model, &options, &root).unwrap();
    let after = snapshot_tree(&root);

    assert_eq!(second.files_written, 0);
    assert_eq!(second.files_skipped, first.files_written);
    assert_eq!(before.keys().collect::<Vec<_>>(), after.keys().collect::<Vec<_>>());
    assert_eq!(after.get("N/C/usage.md").unwrap(), "# My usage notes\n");

    fs::remove_dir_all(&root).unwrap();
}

#[test]
fn scaffolded_placeholders_are_invisible_to_the_overlay_by_default_flag() {
    // The generated tree round-trips through the overlay placeholder rule
    let root = common::unique_temp_dir("docnet_scaffold_roundtrip");
    let model = model_with_member();
    let options = DocOptions::default();
    generate_placeholders(&model, &options, &root).unwrap();

    let mut hidden = DocOptions::default();
    hidden.show_placeholders = false;
    let mut reloaded = model_with_member();
    docnet::conceptual::OverlayLoader::new(&hidden).load(&root, &mut reloaded);
    assert!(reloaded.find_type("N.C").unwrap().docs.usage.is_none());

    fs::remove_dir_all(&root).unwrap();
}
