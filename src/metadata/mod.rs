// Metadata module - wraps the .NET metadata front-end behind a provider seam

pub mod dotscope;
pub mod errors;
pub mod loader;
pub mod symbols;

pub use dotscope::DotscopeProvider;
pub use errors::MetadataError;
pub use loader::{AssemblyLoader, MetadataProvider};
pub use symbols::{
    AssemblySymbols, ConstantValue, EventSymbol, FieldSymbol, GenericParamSymbol, MethodSymbol,
    ParamSymbol, PropertySymbol, RefKind, TypeSymbol, TypeSymbolKind,
};
