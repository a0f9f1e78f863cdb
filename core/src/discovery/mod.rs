//! # Model Discovery
//!
//! Walks the metadata of an API crate from its entry points (controllers and
//! their actions) to the set of data-model types they expose.
//!
//! - **ownership**: in-domain vs foreign classification.
//! - **resolver**: leaf-type closure of a single root.
//! - **catalog**: controllers, actions, response/parameter models.

pub mod catalog;
pub mod ownership;
pub mod resolver;

pub use catalog::{ControllerCatalog, ModelClosure};
pub use ownership::OwnershipClassifier;
pub use resolver::{LeafSet, ModelGraphResolver};

/// Naming conventions used to recognise entry points in metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryConventions {
    /// Simple name of the base type every controller derives from.
    pub controller_base: String,
    /// Simple name of the attribute declaring a response status and model.
    pub response_attribute: String,
    /// Module-name prefixes treated as in-domain besides the target module.
    pub allowed_module_prefixes: Vec<String>,
}

impl Default for DiscoveryConventions {
    fn default() -> Self {
        Self {
            controller_base: "ControllerBase".into(),
            response_attribute: "response".into(),
            allowed_module_prefixes: Vec::new(),
        }
    }
}
