//! Ownership of types: API surface or foreign.

use crate::metadata::{MetadataProvider, TypeRef};

/// Decides whether a type belongs to the API surface ("in-domain") or is
/// foreign (runtime, third-party).
#[derive(Debug, Clone)]
pub struct OwnershipClassifier {
    target_module: String,
    allowed_prefixes: Vec<String>,
}

impl OwnershipClassifier {
    /// Creates a classifier for `target_module`, additionally accepting any
    /// module whose name starts with one of `allowed_prefixes`.
    pub fn new(target_module: impl Into<String>, allowed_prefixes: Vec<String>) -> Self {
        Self {
            target_module: target_module.into(),
            allowed_prefixes,
        }
    }

    /// True when `module` is the target module or an allow-listed family member.
    pub fn owns_module(&self, module: &str) -> bool {
        module == self.target_module
            || self
                .allowed_prefixes
                .iter()
                .any(|prefix| !prefix.is_empty() && module.starts_with(prefix.as_str()))
    }

    /// Classifies a type reference.
    ///
    /// A generic is in-domain when *any* argument is; an array when its
    /// element is. Named types are judged by their owning module; names no
    /// loaded module declares are foreign.
    pub fn is_in_domain(&self, session: &dyn MetadataProvider, ty: &TypeRef) -> bool {
        match ty {
            TypeRef::Generic { args, .. } => args.iter().any(|arg| self.is_in_domain(session, arg)),
            TypeRef::Array { array } => self.is_in_domain(session, array),
            TypeRef::Named(name) => session
                .type_by_name(name)
                .is_some_and(|def| self.owns_module(&def.module)),
        }
    }
}
