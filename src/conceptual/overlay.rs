//! Conceptual-overlay loading.
//!
//! Attaches hand-authored prose files to model nodes by path convention:
//!
//! ```text
//! <root>/[<namespace-path>/]<TypeName>/{usage,examples,best-practices,
//!     patterns,considerations,related-apis}.md
//! <root>/[<namespace-path>/]<TypeName>/<MemberName>/...same files...
//! <root>/[<namespace-path>/]summary.md
//! ```
//!
//! Files whose first non-blank line is the project-wide TODO marker are
//! placeholders; with `show_placeholders` off they are treated as absent.
//! Missing directories are silently ignored. Model invariants are never
//! altered: only doc fields are written.

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;

use crate::diagnostics::{Diagnostic, DiagnosticCode, DiagnosticCollection};
use crate::model::docs::DocFields;
use crate::model::nodes::AssemblyNode;
use crate::options::{DocOptions, NamespaceMode};

pub const PLACEHOLDER_MARKER: &str =
    "<!-- TODO: REMOVE THIS COMMENT AFTER YOU CUSTOMIZE THIS CONTENT -->";

/// Check whether the first non-blank line is the placeholder marker,
/// case-insensitively and tolerant of extra inner whitespace.
pub fn is_placeholder_text(content: &str) -> bool {
    let Some(first_line) = content.lines().find(|l| !l.trim().is_empty()) else {
        return false;
    };
    normalize_marker(first_line) == normalize_marker(PLACEHOLDER_MARKER)
}

fn normalize_marker(line: &str) -> String {
    line.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Directory component(s) for a namespace under the overlay root.
pub fn namespace_rel_path(namespace: &str, options: &DocOptions) -> PathBuf {
    if namespace.is_empty() {
        return PathBuf::new();
    }
    match options.namespace_mode {
        NamespaceMode::Folder => namespace.split('.').collect(),
        NamespaceMode::File => {
            PathBuf::from(namespace.replace('.', &options.namespace_separator.to_string()))
        }
    }
}

pub struct OverlayLoader<'a> {
    options: &'a DocOptions,
    diagnostics: DiagnosticCollection,
}

impl<'a> OverlayLoader<'a> {
    pub fn new(options: &'a DocOptions) -> Self {
        Self {
            options,
            diagnostics: DiagnosticCollection::new(),
        }
    }

    /// Walk the model in stable order (namespace tree order, then declared
    /// type/member order) and attach overlay files found under `root`.
    pub fn load(mut self, root: &Path, model: &mut AssemblyNode) -> DiagnosticCollection {
        if !root.is_dir() {
            debug!("overlay root missing, skipping: {}", root.display());
            return self.diagnostics;
        }

        for namespace in &mut model.namespaces {
            let ns_dir = root.join(namespace_rel_path(&namespace.name, self.options));
            if let Some(summary) = self.read_overlay_file(&ns_dir.join("summary.md"))
                && namespace.docs.summary.is_none()
            {
                namespace.docs.summary = Some(summary);
            }

            for ty in &mut namespace.types {
                let type_dir = ns_dir.join(&ty.name);
                if !type_dir.is_dir() {
                    continue;
                }
                self.apply_conceptual_files(&type_dir, &mut ty.docs);

                for member in &mut ty.members {
                    let member_dir = type_dir.join(&member.name);
                    if !member_dir.is_dir() {
                        continue;
                    }
                    self.apply_conceptual_files(&member_dir, &mut member.docs);

                    for parameter in &mut member.parameters {
                        let param_file =
                            member_dir.join(format!("param-{}.md", parameter.name));
                        if let Some(text) = self.read_overlay_file(&param_file)
                            && parameter.docs.usage.is_none()
                        {
                            parameter.docs.usage = Some(text);
                        }
                    }
                }
            }
        }

        self.diagnostics
    }

    fn apply_conceptual_files(&mut self, dir: &Path, docs: &mut DocFields) {
        if let Some(text) = self.read_overlay_file(&dir.join("usage.md")) {
            docs.usage = Some(text);
        }
        if let Some(text) = self.read_overlay_file(&dir.join("best-practices.md")) {
            docs.best_practices = Some(text);
        }
        if let Some(text) = self.read_overlay_file(&dir.join("patterns.md")) {
            docs.patterns = Some(text);
        }
        if let Some(text) = self.read_overlay_file(&dir.join("considerations.md")) {
            docs.considerations = Some(text);
        }
        // XML-derived examples are never replaced
        if let Some(text) = self.read_overlay_file(&dir.join("examples.md"))
            && docs.examples.is_none()
        {
            docs.examples = Some(text);
        }
        if let Some(text) = self.read_overlay_file(&dir.join("related-apis.md")) {
            docs.related_apis = parse_related_apis(&text);
        }
    }

    /// Read one overlay file: strip any byte-order mark, trim, honor the
    /// placeholder protocol. Missing files yield `None` silently; unreadable
    /// files yield `None` with a diagnostic.
    fn read_overlay_file(&mut self, path: &Path) -> Option<String> {
        if !path.is_file() {
            return None;
        }
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) => {
                self.diagnostics.add(
                    Diagnostic::warning(DiagnosticCode::DNW02001, e.to_string())
                        .with_subject(path.display().to_string()),
                );
                return None;
            }
        };
        let content = raw.trim_start_matches('\u{feff}').trim();
        if content.is_empty() {
            return None;
        }
        if !self.options.show_placeholders && is_placeholder_text(content) {
            return None;
        }
        Some(content.to_string())
    }
}

/// Non-blank, non-comment lines, each trimmed.
fn parse_related_apis(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with("<!--") && !l.starts_with('#'))
        .map(String::from)
        .collect()
}
