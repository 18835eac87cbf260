//! Identifier → node map for cross-reference resolution.
//!
//! Keys are the compiler's canonical ID strings (`T:` `M:` `F:` `P:` `E:`
//! `N:` `A:` prefixed). Every node additionally registers under its
//! un-prefixed full name and, for types, the simple name; enum values get
//! the `TypeFullName.ValueName` form too. All inserts are first-write-wins,
//! which is also how overload collisions on `M:Type.Name` are settled.

use std::collections::HashMap;

use crate::model::nodes::{AssemblyNode, MemberKind, NamespaceNode, TypeNode};
use crate::model::reference::ReferenceKind;
use crate::options::{DocOptions, NamespaceMode};

/// A registered link target.
#[derive(Debug, Clone, PartialEq)]
pub struct RefTarget {
    /// Canonical ID this target is primarily registered under
    pub id: String,
    pub kind: ReferenceKind,
    /// Simple display name
    pub display_name: String,
    /// Documentation-root-relative page path
    pub page_path: String,
    pub anchor: Option<String>,
}

#[derive(Debug, Default)]
pub struct ReferenceMap {
    entries: HashMap<String, RefTarget>,
}

impl ReferenceMap {
    pub fn build(model: &AssemblyNode, options: &DocOptions) -> Self {
        let mut map = ReferenceMap::default();

        map.insert(
            format!("A:{}", model.name),
            RefTarget {
                id: format!("A:{}", model.name),
                kind: ReferenceKind::Unknown,
                display_name: model.name.clone(),
                page_path: format!("{}/index.md", options.api_reference_path),
                anchor: None,
            },
        );

        for namespace in &model.namespaces {
            map.register_namespace(namespace, options);
            for ty in &namespace.types {
                map.register_type(namespace, ty, options);
            }
        }
        map
    }

    pub fn get(&self, key: &str) -> Option<&RefTarget> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn insert(&mut self, key: String, target: RefTarget) {
        // First write wins
        self.entries.entry(key).or_insert(target);
    }

    fn register_namespace(&mut self, namespace: &NamespaceNode, options: &DocOptions) {
        let id = format!("N:{}", namespace.name);
        let target = RefTarget {
            id: id.clone(),
            kind: ReferenceKind::Namespace,
            display_name: if namespace.name.is_empty() {
                "global".to_string()
            } else {
                namespace.name.clone()
            },
            page_path: namespace_page(&namespace.name, options),
            anchor: None,
        };
        self.insert(id, target.clone());
        if !namespace.name.is_empty() {
            self.insert(namespace.name.clone(), target);
        }
    }

    fn register_type(&mut self, namespace: &NamespaceNode, ty: &TypeNode, options: &DocOptions) {
        // Reference-only placeholders never land in the map; shadow types
        // do, since relocated members live there.
        let page = type_page(&namespace.name, &ty.name, options);
        let id = format!("T:{}", ty.full_name);
        let target = RefTarget {
            id: id.clone(),
            kind: ReferenceKind::Type,
            display_name: ty.name.clone(),
            page_path: page.clone(),
            anchor: None,
        };
        self.insert(id.clone(), target.clone());
        self.insert(ty.full_name.clone(), target.clone());
        self.insert(ty.name.clone(), target);

        for member in &ty.members {
            let (prefix, kind) = match member.kind {
                MemberKind::Method => ('M', ReferenceKind::Method),
                MemberKind::Property => ('P', ReferenceKind::Property),
                MemberKind::Field => ('F', ReferenceKind::Field),
                MemberKind::Event => ('E', ReferenceKind::Event),
            };
            // Keyed without the parameter signature; overloads collide and
            // the first in traversal order wins.
            let bare = format!("{}.{}", ty.full_name, member.name);
            let member_id = format!("{}:{}", prefix, bare);
            let target = RefTarget {
                id: member_id.clone(),
                kind,
                display_name: member.name.clone(),
                page_path: page.clone(),
                anchor: Some(member.name.to_lowercase()),
            };
            self.insert(member_id, target.clone());
            self.insert(bare, target);
        }

        if let Some(enum_info) = &ty.enum_info {
            for value in &enum_info.values {
                let bare = format!("{}.{}", ty.full_name, value.name);
                let value_id = format!("F:{}", bare);
                let target = RefTarget {
                    id: value_id.clone(),
                    kind: ReferenceKind::Field,
                    display_name: value.name.clone(),
                    page_path: page.clone(),
                    anchor: Some(value.name.to_lowercase()),
                };
                self.insert(value_id, target.clone());
                self.insert(bare, target);
            }
        }
    }
}

/// Page path for a type, under the configured API reference segment.
pub fn type_page(namespace: &str, type_name: &str, options: &DocOptions) -> String {
    let api = options.api_reference_path.as_str();
    match options.namespace_mode {
        NamespaceMode::Folder => {
            if namespace.is_empty() {
                format!("{}/{}.md", api, type_name)
            } else {
                format!("{}/{}/{}.md", api, namespace.replace('.', "/"), type_name)
            }
        }
        NamespaceMode::File => {
            let sep = options.namespace_separator;
            if namespace.is_empty() {
                format!("{}/{}.md", api, type_name)
            } else {
                format!(
                    "{}/{}{}{}.md",
                    api,
                    namespace.replace('.', &sep.to_string()),
                    sep,
                    type_name
                )
            }
        }
    }
}

pub fn namespace_page(namespace: &str, options: &DocOptions) -> String {
    let api = options.api_reference_path.as_str();
    match options.namespace_mode {
        NamespaceMode::Folder => {
            if namespace.is_empty() {
                format!("{}/index.md", api)
            } else {
                format!("{}/{}/index.md", api, namespace.replace('.', "/"))
            }
        }
        NamespaceMode::File => {
            if namespace.is_empty() {
                format!("{}/index.md", api)
            } else {
                let sep = options.namespace_separator;
                format!("{}/{}.md", api, namespace.replace('.', &sep.to_string()))
            }
        }
    }
}
