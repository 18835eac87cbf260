//! Cref resolution against the reference map.
//!
//! Every raw cref becomes a [`DocReference`] with a display name, a link
//! path and an optional anchor. Paths are documentation-root-relative (the
//! page path as registered), collapsing to the bare file name when source
//! and target share a directory. Unknown vendor-namespace targets fall back
//! to synthesized framework-docs URLs.

use crate::diagnostics::{Diagnostic, DiagnosticCode, DiagnosticCollection};
use crate::model::nodes::{AssemblyNode, TypeNode};
use crate::model::reference::{DocReference, ReferenceKind};
use crate::model::signatures;
use crate::options::DocOptions;
use crate::xref::map::{ReferenceMap, type_page};
use crate::xref::vendor;

pub struct CrossReferenceResolver {
    map: ReferenceMap,
}

impl CrossReferenceResolver {
    pub fn new(map: ReferenceMap) -> Self {
        Self { map }
    }

    pub fn build(model: &AssemblyNode, options: &DocOptions) -> Self {
        Self::new(ReferenceMap::build(model, options))
    }

    pub fn map(&self) -> &ReferenceMap {
        &self.map
    }

    /// Resolve one raw cref. `current_page` is the page the link will be
    /// rendered on, used to collapse same-directory paths.
    pub fn resolve(&self, cref: &str, current_page: Option<&str>) -> DocReference {
        let raw = cref.trim();
        if raw.is_empty() {
            return DocReference::unresolved(raw, raw);
        }

        // Plain URLs pass through as external references
        if raw.starts_with("http://") || raw.starts_with("https://") {
            return DocReference {
                cref: raw.to_string(),
                kind: ReferenceKind::External,
                display_name: raw.to_string(),
                relative_path: Some(raw.to_string()),
                anchor: None,
                resolved: true,
                target_id: None,
            };
        }

        let bare = strip_id_prefix(raw);

        // Exact ID first, then the un-prefixed form
        let target = self.map.get(raw).or_else(|| self.map.get(bare));
        if let Some(target) = target {
            return DocReference {
                cref: raw.to_string(),
                kind: target.kind,
                display_name: target.display_name.clone(),
                relative_path: Some(relative_path(current_page, &target.page_path)),
                anchor: target.anchor.clone(),
                resolved: true,
                target_id: Some(target.id.clone()),
            };
        }

        // Recognized vendor namespaces resolve to framework-docs URLs
        if vendor::is_vendor(bare) {
            return DocReference {
                cref: raw.to_string(),
                kind: ReferenceKind::Framework,
                display_name: signatures::friendly_name(bare),
                relative_path: Some(vendor::docs_url(bare)),
                anchor: None,
                resolved: true,
                target_id: None,
            };
        }

        DocReference {
            cref: raw.to_string(),
            kind: ReferenceKind::Unknown,
            display_name: signatures::friendly_name(bare),
            relative_path: None,
            anchor: anchor_heuristic(bare),
            resolved: false,
            target_id: None,
        }
    }

    /// Resolve the reference edges owned by each type node: base type,
    /// see-also crefs (the type's own and its members'), and related APIs.
    /// Unresolved crefs stay in the model as `unknown` references and are
    /// additionally reported as warnings.
    pub fn apply(&self, model: &mut AssemblyNode, options: &DocOptions) -> DiagnosticCollection {
        let mut diagnostics = DiagnosticCollection::new();
        for namespace in &mut model.namespaces {
            let ns_name = namespace.name.clone();
            for ty in &mut namespace.types {
                let page = type_page(&ns_name, &ty.name, options);
                ty.references = self.collect_type_references(ty, &page);
                for reference in ty.references.iter().filter(|r| !r.resolved) {
                    diagnostics.add(
                        Diagnostic::warning(
                            DiagnosticCode::DNW01005,
                            format!("cref '{}' did not resolve", reference.cref),
                        )
                        .with_subject(ty.full_name.clone()),
                    );
                }
            }
        }
        diagnostics
    }

    fn collect_type_references(&self, ty: &TypeNode, page: &str) -> Vec<DocReference> {
        let mut out = Vec::new();
        if let Some(base) = &ty.base_type {
            out.push(self.resolve(base, Some(page)));
        }
        for cref in &ty.docs.see_also {
            out.push(self.resolve(cref, Some(page)));
        }
        for cref in &ty.docs.related_apis {
            out.push(self.resolve(cref, Some(page)));
        }
        for member in &ty.members {
            for cref in &member.docs.see_also {
                out.push(self.resolve(cref, Some(page)));
            }
            for cref in &member.docs.related_apis {
                out.push(self.resolve(cref, Some(page)));
            }
        }
        out
    }
}

/// Strip a one-letter canonical ID prefix (`T:`, `M:`, …).
fn strip_id_prefix(raw: &str) -> &str {
    let bytes = raw.as_bytes();
    if bytes.len() > 2
        && bytes[1] == b':'
        && matches!(bytes[0], b'T' | b'M' | b'F' | b'P' | b'E' | b'N' | b'A')
    {
        &raw[2..]
    } else {
        raw
    }
}

/// Same-directory targets collapse to the bare file name; anything else
/// keeps its documentation-root-relative path.
fn relative_path(current_page: Option<&str>, target_page: &str) -> String {
    if let Some(current) = current_page {
        let current_dir = current.rsplit_once('/').map(|(dir, _)| dir).unwrap_or("");
        let (target_dir, target_file) = target_page
            .rsplit_once('/')
            .map(|(dir, file)| (dir, file))
            .unwrap_or(("", target_page));
        if current_dir == target_dir {
            return target_file.to_string();
        }
    }
    target_page.to_string()
}

/// For unresolved strings: the trailing segment is an anchor only when it
/// starts lowercase (member-style), never for type-style segments.
fn anchor_heuristic(bare: &str) -> Option<String> {
    let trailing = bare.rsplit('.').next()?;
    let first = trailing.chars().next()?;
    if first.is_lowercase() {
        Some(trailing.to_string())
    } else {
        None
    }
}
