// Cross-reference module - identifier map, cref resolution, vendor URLs

pub mod map;
pub mod resolver;
pub mod vendor;

pub use map::{RefTarget, ReferenceMap};
pub use resolver::CrossReferenceResolver;
