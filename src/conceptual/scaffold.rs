//! Placeholder file generation.
//!
//! Emits the conceptual-overlay directory tree for a merged model, one stub
//! file per conceptual field per node, plus per-parameter stubs. Existing
//! files are never overwritten, which makes repeated runs idempotent.

use std::fs;
use std::io;
use std::path::Path;

use log::info;

use crate::conceptual::overlay::{PLACEHOLDER_MARKER, namespace_rel_path};
use crate::model::nodes::{AssemblyNode, MemberNode, TypeNode};
use crate::options::DocOptions;

const CONCEPTUAL_FILES: &[(&str, &str)] = &[
    ("usage.md", "Usage"),
    ("examples.md", "Examples"),
    ("best-practices.md", "Best Practices"),
    ("patterns.md", "Patterns"),
    ("considerations.md", "Considerations"),
    ("related-apis.md", "Related APIs"),
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScaffoldReport {
    pub files_written: usize,
    pub files_skipped: usize,
}

/// Generate the placeholder tree for `model` under `root`.
pub fn generate_placeholders(
    model: &AssemblyNode,
    options: &DocOptions,
    root: &Path,
) -> io::Result<ScaffoldReport> {
    let mut report = ScaffoldReport::default();

    for namespace in &model.namespaces {
        let ns_dir = root.join(namespace_rel_path(&namespace.name, options));
        fs::create_dir_all(&ns_dir)?;
        let ns_label = if namespace.name.is_empty() {
            "the global namespace"
        } else {
            &namespace.name
        };
        write_stub(
            &ns_dir.join("summary.md"),
            &format!("# {}\n\nSummarize the purpose of {}.", ns_label, ns_label),
            &mut report,
        )?;

        for ty in &namespace.types {
            scaffold_type(&ns_dir, ty, &mut report)?;
        }
    }

    info!(
        "placeholder generation: {} written, {} already present",
        report.files_written, report.files_skipped
    );
    Ok(report)
}

fn scaffold_type(ns_dir: &Path, ty: &TypeNode, report: &mut ScaffoldReport) -> io::Result<()> {
    let type_dir = ns_dir.join(&ty.name);
    fs::create_dir_all(&type_dir)?;
    for (file, heading) in CONCEPTUAL_FILES {
        write_stub(
            &type_dir.join(file),
            &format!(
                "# {} for {}\n\nDescribe {} for `{}`.",
                heading,
                ty.full_name,
                heading.to_lowercase(),
                ty.name
            ),
            report,
        )?;
    }

    for member in &ty.members {
        scaffold_member(&type_dir, ty, member, report)?;
    }
    Ok(())
}

fn scaffold_member(
    type_dir: &Path,
    ty: &TypeNode,
    member: &MemberNode,
    report: &mut ScaffoldReport,
) -> io::Result<()> {
    let member_dir = type_dir.join(&member.name);
    fs::create_dir_all(&member_dir)?;
    for (file, heading) in CONCEPTUAL_FILES {
        write_stub(
            &member_dir.join(file),
            &format!(
                "# {} for {}.{}\n\nDescribe {} for `{}`.",
                heading,
                ty.full_name,
                member.name,
                heading.to_lowercase(),
                member.display_name
            ),
            report,
        )?;
    }
    for parameter in &member.parameters {
        write_stub(
            &member_dir.join(format!("param-{}.md", parameter.name)),
            &format!(
                "# Parameter `{}`\n\nDescribe the `{}` parameter of `{}`.",
                parameter.name, parameter.name, member.display_name
            ),
            report,
        )?;
    }
    Ok(())
}

/// Write a placeholder stub unless the file already exists.
fn write_stub(path: &Path, body: &str, report: &mut ScaffoldReport) -> io::Result<()> {
    if path.exists() {
        report.files_skipped += 1;
        return Ok(());
    }
    let content = format!("{}\n\n{}\n", PLACEHOLDER_MARKER, body);
    fs::write(path, content)?;
    report.files_written += 1;
    Ok(())
}
