//! Deterministic multi-assembly merge.
//!
//! The first model is the base; later models merge in by namespace display
//! name, then type full name, then member display string. Ownership is
//! first-wins throughout; sparse doc fields flow into empty destinations
//! but never overwrite.

use log::debug;

use crate::model::nodes::{AssemblyNode, NamespaceNode, TypeNode};

/// Merge one or more single-assembly models. Returns `None` for an empty
/// input; a singleton is returned as-is.
pub fn merge_assemblies(mut models: Vec<AssemblyNode>) -> Option<AssemblyNode> {
    if models.is_empty() {
        return None;
    }
    if models.len() == 1 {
        return models.pop();
    }

    let mut base = models.remove(0);
    for other in models {
        debug!("merging assembly {} into {}", other.name, base.name);
        base.docs.fill_from(&other.docs);
        base.diagnostics.extend(other.diagnostics);
        for namespace in other.namespaces {
            match base
                .namespaces
                .iter_mut()
                .find(|ns| ns.name == namespace.name)
            {
                Some(existing) => merge_namespace(existing, namespace),
                None => base.namespaces.push(namespace),
            }
        }
    }
    Some(base)
}

fn merge_namespace(dst: &mut NamespaceNode, src: NamespaceNode) {
    dst.docs.fill_from(&src.docs);
    for ty in src.types {
        match dst.types.iter_mut().find(|t| t.full_name == ty.full_name) {
            Some(existing) => merge_type(existing, ty),
            None => dst.types.push(ty),
        }
    }
}

fn merge_type(dst: &mut TypeNode, src: TypeNode) {
    dst.docs.fill_from(&src.docs);
    // A first-class definition wins over a shadow from an earlier assembly
    if dst.is_external_reference && !src.is_external_reference {
        dst.is_external_reference = false;
        dst.display_signature = src.display_signature;
        dst.kind = src.kind;
        dst.assembly = src.assembly;
        dst.base_type = src.base_type;
        dst.interfaces = src.interfaces;
        dst.is_static = src.is_static;
        dst.enum_info = src.enum_info;
    }
    for member in src.members {
        // Member identity is the display string; duplicates are discarded
        if dst
            .members
            .iter()
            .any(|m| m.display_name == member.display_name)
        {
            continue;
        }
        dst.members.push(member);
    }
}
