pub mod base;
pub mod parser;
pub mod resources;

// Re-export the main entry points
pub use resources::{
    LookupContext, NedResourceCache, NedTypeInfo, NedTypeKind, NedTypeNames, ResourceError,
};
