//! # Metadata
//!
//! A loaded-but-not-executed view over a compiled API crate: its types,
//! properties, methods and attributes.
//!
//! - **models**: the descriptor types (`TypeDef`, `TypeRef`, ...).
//! - **snapshot**: a session backed by JSON/YAML snapshot files.

pub mod models;
pub mod snapshot;

pub use models::{
    AttrValue, Attribute, Method, Parameter, Property, TypeDef, TypeKind, TypeRef, Visibility,
};
pub use snapshot::{ModuleSnapshot, SnapshotSession};

/// Read-only access to the types of a metadata session.
///
/// Descriptors borrow from the session and live as long as it does.
pub trait MetadataProvider {
    /// Name of the module the session was opened for.
    fn target_module(&self) -> &str;

    /// Every loaded type, target module first.
    fn types(&self) -> &[TypeDef];

    /// Looks a type up by fully-qualified name, or by a name relative to the
    /// target module.
    fn type_by_name(&self, name: &str) -> Option<&TypeDef>;

    /// Resolves a named reference. Generic and array references resolve to `None`.
    fn resolve(&self, ty: &TypeRef) -> Option<&TypeDef> {
        match ty {
            TypeRef::Named(name) => self.type_by_name(name),
            _ => None,
        }
    }
}
