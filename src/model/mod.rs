// Model module - the documentation graph and the phases that build it

pub mod builder;
pub mod docs;
pub mod extensions;
pub mod merge;
pub mod nodes;
pub mod reference;
pub mod signatures;

pub use builder::ModelBuilder;
pub use docs::{DocFields, ExceptionDoc, TypeParamDoc};
pub use extensions::ExtensionRelocator;
pub use merge::merge_assemblies;
pub use nodes::{
    AssemblyNode, EnumInfo, EnumValueNode, MemberKind, MemberNode, MethodKind, NamespaceNode,
    ParameterNode, TypeKind, TypeNode,
};
pub use reference::{DocReference, ReferenceKind};
