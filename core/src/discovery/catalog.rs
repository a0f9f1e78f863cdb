//! # Controller Catalog
//!
//! Finds controllers and the request and response models reachable from their
//! actions, and names description constants for their members.

use crate::discovery::ownership::OwnershipClassifier;
use crate::discovery::resolver::{LeafSet, ModelGraphResolver};
use crate::discovery::DiscoveryConventions;
use crate::metadata::{Attribute, MetadataProvider, Method, Property, TypeDef, TypeRef, Visibility};
use crate::naming::{description_constant, normalize_version_prefix, simple_name, strip_module_prefix};
use indexmap::IndexMap;
use tracing::{debug, info};

/// The models one controller exposes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelClosure {
    /// Controller name (module prefix stripped).
    pub controller: String,
    /// Leaf model names in discovery order: response models, then parameter models.
    pub models: Vec<String>,
}

impl ModelClosure {
    /// Controller name followed by every model name.
    pub fn with_controller(&self) -> Vec<String> {
        std::iter::once(self.controller.clone())
            .chain(self.models.iter().cloned())
            .collect()
    }
}

/// Enumerates controllers and their actions, and collects the models they
/// expose through success responses and parameters.
pub struct ControllerCatalog<'a> {
    session: &'a dyn MetadataProvider,
    classifier: OwnershipClassifier,
    conventions: DiscoveryConventions,
}

impl<'a> ControllerCatalog<'a> {
    /// Creates a catalog over a session.
    pub fn new(session: &'a dyn MetadataProvider, conventions: DiscoveryConventions) -> Self {
        let classifier = OwnershipClassifier::new(
            session.target_module(),
            conventions.allowed_module_prefixes.clone(),
        );
        Self {
            session,
            classifier,
            conventions,
        }
    }

    /// The ownership classifier in use.
    pub fn classifier(&self) -> &OwnershipClassifier {
        &self.classifier
    }

    /// True when the type's base has the controller marker's simple name.
    ///
    /// Matching is by simple name, not identity: snapshots exported from
    /// separately loaded crates do not share type identities. Two unrelated
    /// bases with the same simple name in different modules both match.
    pub fn is_controller(&self, def: &TypeDef) -> bool {
        def.base
            .as_ref()
            .and_then(|base| base.simple_name())
            .is_some_and(|name| name == self.conventions.controller_base)
    }

    /// Controllers whose fully-qualified name contains the version prefix.
    pub fn controllers_for_version(&self, version_prefix: &str) -> Vec<&'a TypeDef> {
        let prefix = normalize_version_prefix(version_prefix);
        self.session
            .types()
            .iter()
            .filter(|def| self.is_controller(def) && def.name.contains(prefix.as_str()))
            .collect()
    }

    /// First controller whose name contains both the version prefix and `controller_name`.
    pub fn controller_by_name(
        &self,
        controller_name: &str,
        version_prefix: &str,
    ) -> Option<&'a TypeDef> {
        let prefix = normalize_version_prefix(version_prefix);
        self.session.types().iter().find(|def| {
            self.is_controller(def)
                && def.name.contains(prefix.as_str())
                && def.name.contains(controller_name)
        })
    }

    /// Public instance methods declared directly on the controller.
    pub fn actions_of(&self, controller: &'a TypeDef) -> Vec<&'a Method> {
        controller
            .methods
            .iter()
            .filter(|m| m.visibility == Visibility::Public && !m.is_static && !m.inherited)
            .collect()
    }

    /// True for a success-response attribute carrying a model type.
    fn is_success_response(&self, attribute: &Attribute) -> bool {
        simple_name(&attribute.name) == self.conventions.response_attribute
            && attribute.int_values().any(|status| (200..300).contains(&status))
    }

    fn resolver(&self) -> ModelGraphResolver<'a, '_> {
        ModelGraphResolver::new(self.session, &self.classifier)
    }

    /// Leaves of every 2xx response model declared on `actions`.
    pub fn response_models(&self, actions: &[&'a Method]) -> Vec<&'a TypeDef> {
        let mut leaves = LeafSet::new();
        self.collect_response_models(actions, &mut leaves);
        leaves.into_values().collect()
    }

    fn collect_response_models(&self, actions: &[&'a Method], leaves: &mut LeafSet<'a>) {
        let resolver = self.resolver();
        for action in actions {
            for attribute in action.attributes.iter().filter(|a| self.is_success_response(a)) {
                let Some(model) = attribute.type_argument() else {
                    debug!(action = %action.name, "Response attribute without a type argument");
                    continue;
                };
                if self.classifier.is_in_domain(self.session, model) {
                    resolver.collect_leaves(model, leaves);
                }
            }
        }
    }

    fn collect_parameter_models(&self, actions: &[&'a Method], leaves: &mut LeafSet<'a>) {
        let resolver = self.resolver();
        for parameter in actions.iter().flat_map(|a| a.parameters.iter()) {
            if self.classifier.is_in_domain(self.session, &parameter.ty) {
                resolver.collect_leaves(&parameter.ty, leaves);
            }
        }
    }

    /// Response-model leaves followed by parameter-model leaves, de-duplicated.
    pub fn controller_models(&self, controller: &'a TypeDef) -> Vec<&'a TypeDef> {
        let actions = self.actions_of(controller);
        let mut leaves = LeafSet::new();
        self.collect_response_models(&actions, &mut leaves);
        self.collect_parameter_models(&actions, &mut leaves);
        leaves.into_values().collect()
    }

    /// Builds the closure of one controller.
    pub fn closure(&self, controller: &'a TypeDef, keep_module_prefix: bool) -> ModelClosure {
        let name = |def: &TypeDef| self.display_name(&def.name, keep_module_prefix);
        ModelClosure {
            controller: name(controller),
            models: self.controller_models(controller).into_iter().map(name).collect(),
        }
    }

    /// Every controller of a version mapped by simple name to
    /// `[controller, models...]`.
    pub fn models_for_version(&self, version_prefix: &str) -> IndexMap<String, Vec<String>> {
        self.controllers_for_version(version_prefix)
            .into_iter()
            .map(|controller| {
                let closure = self.closure(controller, false);
                (controller.simple_name().to_string(), closure.with_controller())
            })
            .collect()
    }

    /// Model names of a single controller, optionally led by the controller's own name.
    pub fn controller_model_names(
        &self,
        controller_name: &str,
        include_controller: bool,
        version_prefix: &str,
        keep_module_prefix: bool,
    ) -> Vec<String> {
        let Some(controller) = self.controller_by_name(controller_name, version_prefix) else {
            info!(controller = controller_name, "No controller found");
            return Vec::new();
        };
        let closure = self.closure(controller, keep_module_prefix);
        if include_controller {
            closure.with_controller()
        } else {
            closure.models
        }
    }

    /// Each response-model leaf of a controller mapped (by fully-qualified
    /// name) to its declared properties.
    pub fn response_model_properties(
        &self,
        controller_name: &str,
        version_prefix: &str,
    ) -> IndexMap<String, Vec<Property>> {
        let Some(controller) = self.controller_by_name(controller_name, version_prefix) else {
            info!(controller = controller_name, "No controller found");
            return IndexMap::new();
        };
        let actions = self.actions_of(controller);
        let resolver = self.resolver();
        let mut leaves = LeafSet::new();
        // Array elements come back unexpanded; walking each model again
        // expands them. Non-class models drop out here.
        for model in self.response_models(&actions) {
            resolver.collect_leaves(&TypeRef::named(model.name.as_str()), &mut leaves);
        }
        leaves
            .into_values()
            .map(|model| (model.name.clone(), model.properties.clone()))
            .collect()
    }

    /// Declared properties of a type, empty when the type is unknown.
    pub fn properties_of(&self, type_name: &str) -> Vec<Property> {
        self.session
            .type_by_name(type_name)
            .map(|def| def.properties.clone())
            .unwrap_or_default()
    }

    /// `{TypeName}{CleanedProperty}` for every declared property of a type.
    pub fn qualified_property_names(&self, type_name: &str) -> Vec<String> {
        self.session
            .type_by_name(type_name)
            .map(|def| {
                def.properties
                    .iter()
                    .map(|p| description_constant(def.simple_name(), &p.name))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Name as shown to users and matched against documents.
    pub fn display_name(&self, name: &str, keep_module_prefix: bool) -> String {
        if keep_module_prefix {
            name.to_string()
        } else {
            strip_module_prefix(name, self.session.target_module()).to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{ModuleSnapshot, SnapshotSession};
    use serde_json::json;

    fn session() -> SnapshotSession {
        let snapshot: ModuleSnapshot = serde_json::from_value(json!({
            "module": "acme",
            "types": [
                { "name": "acme::v05::UsersController", "base": "web::ControllerBase",
                  "methods": [
                    { "name": "get", "attributes": [
                        { "name": "SwaggerResponse", "args": [ { "int": 200 }, { "type": "acme::X" } ] },
                        { "name": "SwaggerResponse", "args": [ { "int": 201 }, { "type": "acme::Y" } ] },
                        { "name": "SwaggerResponse", "args": [ { "int": 404 }, { "type": "acme::NotFound" } ] },
                        { "name": "SwaggerResponse", "args": [ { "int": 204 } ] }
                    ] },
                    { "name": "create",
                      "parameters": [ { "name": "body", "type": "acme::CreateUser" },
                                      { "name": "id", "type": "String" } ] },
                    { "name": "helper", "visibility": "private",
                      "parameters": [ { "name": "p", "type": "acme::Hidden" } ] },
                    { "name": "base_action", "inherited": true,
                      "parameters": [ { "name": "p", "type": "acme::Hidden" } ] },
                    { "name": "factory", "is_static": true,
                      "parameters": [ { "name": "p", "type": "acme::Hidden" } ] }
                  ] },
                { "name": "acme::v04::UsersController", "base": "web::ControllerBase" },
                { "name": "acme::v05::NotAController", "base": "web::Other" },
                { "name": "web::ControllerBase", "module": "web" },
                { "name": "acme::X", "properties": [ { "name": "y", "type": "acme::Y" } ] },
                { "name": "acme::Y", "properties": [ { "name": "label", "type": "String" },
                                                     { "name": "first_name", "type": "String" } ] },
                { "name": "acme::NotFound" },
                { "name": "acme::CreateUser" },
                { "name": "acme::Hidden" }
            ]
        }))
        .unwrap();
        SnapshotSession::from_snapshots(vec![snapshot])
    }

    fn conventions() -> DiscoveryConventions {
        DiscoveryConventions {
            response_attribute: "SwaggerResponse".into(),
            ..DiscoveryConventions::default()
        }
    }

    #[test]
    fn test_controllers_for_version() {
        let s = session();
        let catalog = ControllerCatalog::new(&s, conventions());
        let names: Vec<_> = catalog
            .controllers_for_version("v0.5")
            .iter()
            .map(|c| c.name.clone())
            .collect();
        assert_eq!(names, vec!["acme::v05::UsersController"]);
    }

    #[test]
    fn test_actions_are_public_declared_instance_methods() {
        let s = session();
        let catalog = ControllerCatalog::new(&s, conventions());
        let controller = catalog.controller_by_name("Users", "v05").unwrap();
        let actions: Vec<_> = catalog
            .actions_of(controller)
            .iter()
            .map(|m| m.name.clone())
            .collect();
        assert_eq!(actions, vec!["get", "create"]);
    }

    #[test]
    fn test_response_models_union_of_success_types() {
        let s = session();
        let catalog = ControllerCatalog::new(&s, conventions());
        let controller = catalog.controller_by_name("Users", "v05").unwrap();
        let actions = catalog.actions_of(controller);
        let names: Vec<_> = catalog
            .response_models(&actions)
            .iter()
            .map(|t| t.name.clone())
            .collect();
        assert_eq!(names, vec!["acme::X", "acme::Y"]);
    }

    #[test]
    fn test_models_for_version_orders_controller_responses_parameters() {
        let s = session();
        let catalog = ControllerCatalog::new(&s, conventions());
        let models = catalog.models_for_version("v05");
        assert_eq!(
            models.get("UsersController").unwrap(),
            &vec!["v05::UsersController", "X", "Y", "CreateUser"]
        );
    }

    #[test]
    fn test_controller_model_names_with_prefix() {
        let s = session();
        let catalog = ControllerCatalog::new(&s, conventions());
        assert_eq!(
            catalog.controller_model_names("Users", false, "v05", true),
            vec!["acme::X", "acme::Y", "acme::CreateUser"]
        );
        assert!(catalog
            .controller_model_names("Missing", true, "v05", false)
            .is_empty());
    }

    #[test]
    fn test_response_model_properties_and_qualified_names() {
        let s = session();
        let catalog = ControllerCatalog::new(&s, conventions());
        let props = catalog.response_model_properties("Users", "v05");
        assert_eq!(props.keys().collect::<Vec<_>>(), vec!["acme::X", "acme::Y"]);
        assert_eq!(props["acme::Y"].len(), 2);

        assert_eq!(
            catalog.qualified_property_names("acme::Y"),
            vec!["YLabel", "YFirstName"]
        );
        assert!(catalog.qualified_property_names("nope::Z").is_empty());
    }
}
