//! Extension method relocation.
//!
//! Post-pass over a built model: every method flagged as an extension is
//! moved from its declaring static class into the member list of the type
//! it extends. When the extended type is not declared in the input binaries
//! a shadow type is interned by full display name (lazily, reused on later
//! demands). Static classes left empty, and namespaces left without types,
//! are removed afterwards.

use std::collections::HashSet;

use log::debug;

use crate::model::docs::DocFields;
use crate::model::nodes::{AssemblyNode, MemberNode, NamespaceNode, TypeKind, TypeNode};
use crate::options::DocOptions;
use crate::xref::vendor;

pub struct ExtensionRelocator<'a> {
    options: &'a DocOptions,
    /// First-class full names from the builder; anything outside it gets a
    /// shadow type.
    type_map: &'a HashSet<String>,
}

struct PendingMove {
    member: MemberNode,
    donor_namespace: String,
    donor_type: String,
}

impl<'a> ExtensionRelocator<'a> {
    pub fn new(options: &'a DocOptions, type_map: &'a HashSet<String>) -> Self {
        Self { options, type_map }
    }

    pub fn run(&self, model: &mut AssemblyNode) {
        let moves = drain_extension_methods(model);
        if moves.is_empty() {
            return;
        }
        debug!("relocating {} extension method(s)", moves.len());

        for pending in moves {
            self.place(model, pending);
        }

        // Empty static donors first, then empty namespaces
        for namespace in &mut model.namespaces {
            namespace
                .types
                .retain(|ty| !(ty.is_static && ty.members.is_empty()));
        }
        model.namespaces.retain(|ns| !ns.types.is_empty());
    }

    fn place(&self, model: &mut AssemblyNode, pending: PendingMove) {
        let PendingMove {
            mut member,
            donor_namespace,
            donor_type,
        } = pending;

        let Some(extended_full) = member.extended_type.clone() else {
            // No first parameter to extend; leave the method where it was
            return_to_donor(model, &donor_namespace, &donor_type, member);
            return;
        };

        member.declaring_type = Some(donor_type.clone());

        if self.type_map.contains(&extended_full) {
            if let Some(target) = find_type_mut(model, &extended_full) {
                target.members.push(member);
                return;
            }
            // Declared but filtered out of the model; fall through
        }

        if !self.options.create_external_type_references {
            member.declaring_type = None;
            return_to_donor(model, &donor_namespace, &donor_type, member);
            return;
        }

        let shadow = self.shadow_type_mut(model, &extended_full);
        shadow.members.push(member);
    }

    /// Find or create the shadow type for an external extended type,
    /// interned by full display name in its namespace.
    fn shadow_type_mut<'m>(
        &self,
        model: &'m mut AssemblyNode,
        extended_full: &str,
    ) -> &'m mut TypeNode {
        let namespace_name = match extended_full.rsplit_once('.') {
            Some((ns, _)) => ns.to_string(),
            None => String::new(),
        };

        let ns_index = match model
            .namespaces
            .iter()
            .position(|ns| ns.name == namespace_name)
        {
            Some(index) => index,
            None => {
                // Keep namespace order alphabetical, matching the builder
                let index = model
                    .namespaces
                    .iter()
                    .position(|ns| ns.name.as_str() > namespace_name.as_str())
                    .unwrap_or(model.namespaces.len());
                model.namespaces.insert(
                    index,
                    NamespaceNode {
                        name: namespace_name.clone(),
                        types: Vec::new(),
                        docs: DocFields::default(),
                    },
                );
                index
            }
        };

        let namespace = &mut model.namespaces[ns_index];
        let type_index = match namespace
            .types
            .iter()
            .position(|t| t.full_name == extended_full)
        {
            Some(index) => index,
            None => {
                namespace.types.push(new_shadow_type(extended_full));
                namespace.types.len() - 1
            }
        };
        &mut namespace.types[type_index]
    }
}

fn drain_extension_methods(model: &mut AssemblyNode) -> Vec<PendingMove> {
    let mut moves = Vec::new();
    for namespace in &mut model.namespaces {
        for ty in &mut namespace.types {
            if !ty.is_static {
                continue;
            }
            let mut kept = Vec::with_capacity(ty.members.len());
            for member in ty.members.drain(..) {
                if member.is_extension_method() {
                    moves.push(PendingMove {
                        member,
                        donor_namespace: namespace.name.clone(),
                        donor_type: ty.full_name.clone(),
                    });
                } else {
                    kept.push(member);
                }
            }
            ty.members = kept;
        }
    }
    moves
}

fn return_to_donor(
    model: &mut AssemblyNode,
    donor_namespace: &str,
    donor_type: &str,
    member: MemberNode,
) {
    if let Some(namespace) = model
        .namespaces
        .iter_mut()
        .find(|ns| ns.name == donor_namespace)
        && let Some(ty) = namespace
            .types
            .iter_mut()
            .find(|t| t.full_name == donor_type)
    {
        ty.members.push(member);
    }
}

fn find_type_mut<'m>(model: &'m mut AssemblyNode, full_name: &str) -> Option<&'m mut TypeNode> {
    model
        .namespaces
        .iter_mut()
        .flat_map(|ns| ns.types.iter_mut())
        .find(|t| t.full_name == full_name)
}

fn new_shadow_type(full_name: &str) -> TypeNode {
    // Keyword aliases are for parameter/return display positions only; a
    // shadow type keeps its metadata simple name (Int32, not int).
    let leaf = full_name.rsplit('.').next().unwrap_or(full_name);
    let simple = leaf.split('`').next().unwrap_or(leaf).replace('+', ".");
    let namespace = full_name.rsplit_once('.').map(|(ns, _)| ns).unwrap_or("");

    let mut docs = DocFields::default();
    if let Some(vendor_name) = vendor::vendor_of(full_name) {
        docs.summary = Some(format!(
            "{} is defined in the {} namespace by the {} framework assembly.",
            simple, namespace, vendor_name
        ));
        docs.remarks = Some(format!(
            "See the official documentation: {}",
            vendor::docs_url(full_name)
        ));
    } else {
        docs.summary = Some(format!(
            "{} is defined in an external assembly and is shown here because extension methods target it.",
            simple
        ));
    }

    TypeNode {
        name: simple.clone(),
        full_name: full_name.to_string(),
        display_signature: format!("public class {}", simple),
        kind: TypeKind::Class,
        assembly: String::new(),
        base_type: None,
        interfaces: Vec::new(),
        is_static: false,
        members: Vec::new(),
        is_external_reference: true,
        enum_info: None,
        references: Vec::new(),
        docs,
    }
}
