//! # Model Graph Resolution
//!
//! Walks property types from a set of roots to the closure of in-domain models.

use crate::discovery::ownership::OwnershipClassifier;
use crate::metadata::{MetadataProvider, TypeDef, TypeKind, TypeRef};
use indexmap::IndexMap;
use std::collections::HashSet;
use tracing::debug;

/// Computes the leaf-type closure of a root type.
///
/// Every recursive step is gated by the [`OwnershipClassifier`]: a foreign
/// type is dropped together with its whole subtree.
pub struct ModelGraphResolver<'s, 'c> {
    session: &'s dyn MetadataProvider,
    classifier: &'c OwnershipClassifier,
}

/// Ordered, de-duplicated leaves keyed by fully-qualified name.
pub type LeafSet<'a> = IndexMap<String, &'a TypeDef>;

impl<'s, 'c> ModelGraphResolver<'s, 'c> {
    /// Creates a resolver over a session.
    pub fn new(session: &'s dyn MetadataProvider, classifier: &'c OwnershipClassifier) -> Self {
        Self {
            session,
            classifier,
        }
    }

    /// The leaf types reachable from `root`, in order of first discovery.
    pub fn leaf_types(&self, root: &TypeRef) -> Vec<&'s TypeDef> {
        let mut leaves = LeafSet::new();
        self.collect_leaves(root, &mut leaves);
        leaves.into_values().collect()
    }

    /// Adds the leaves of `root` to an existing set.
    ///
    /// The expansion guard is scoped to this root: a class already expanded
    /// while walking `root` is not walked again, which terminates recursive
    /// models.
    pub fn collect_leaves(&self, root: &TypeRef, leaves: &mut LeafSet<'s>) {
        let mut expanded = HashSet::new();
        self.visit(root, leaves, &mut expanded);
    }

    fn in_domain(&self, ty: &TypeRef) -> bool {
        self.classifier.is_in_domain(self.session, ty)
    }

    fn visit(&self, ty: &TypeRef, leaves: &mut LeafSet<'s>, expanded: &mut HashSet<String>) {
        if !self.in_domain(ty) {
            return;
        }

        match ty {
            TypeRef::Generic { args, .. } => {
                for arg in args {
                    if self.in_domain(arg) {
                        self.visit(arg, leaves, expanded);
                    }
                }
            }
            // Array elements are emitted as leaves without expanding their
            // own properties.
            TypeRef::Array { array } => {
                if self.in_domain(array) {
                    if let Some(element) = self.session.resolve(array) {
                        leaves.entry(element.name.clone()).or_insert(element);
                    }
                }
            }
            TypeRef::Named(_) => {
                let Some(def) = self.session.resolve(ty) else {
                    return;
                };
                if def.kind != TypeKind::Class {
                    return;
                }
                if !expanded.insert(def.name.clone()) {
                    debug!(name = %def.name, "Already expanded for this root");
                    return;
                }
                leaves.entry(def.name.clone()).or_insert(def);

                if let Some(base) = &def.base {
                    if self.in_domain(base) {
                        self.visit(base, leaves, expanded);
                    }
                }
                for property in &def.properties {
                    if self.in_domain(&property.ty) {
                        self.visit(&property.ty, leaves, expanded);
                    }
                }
            }
        }
    }
}
