use crate::error::AppResult;
use crate::naming::{clean_member_name, description_constant};
use crate::patcher::common::{
    apply_edits, attr_bodies, attribute_insertion, parse, type_simple_name, TextEdit,
};
use crate::patcher::Rewrite;
use indexmap::IndexSet;
use ra_ap_syntax::ast::{self, HasName};
use ra_ap_syntax::AstNode;
use regex::Regex;
use std::sync::OnceLock;
use tracing::info;

/// Settings of the description annotator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotatorOptions {
    /// Type holding the description constants (`Descriptions`).
    pub descriptions_type: String,
    /// Attribute text marking an action method (`utoipa::path`).
    pub operation_marker: String,
    /// Also decorate parameters of action methods.
    pub decorate_parameters: bool,
}

impl Default for AnnotatorOptions {
    fn default() -> Self {
        Self {
            descriptions_type: "Descriptions".into(),
            operation_marker: "utoipa::path".into(),
            decorate_parameters: false,
        }
    }
}

/// Output of one annotation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotated {
    /// The document rewrite.
    pub rewrite: Rewrite,
    /// Constants referenced by newly added attributes, in document order.
    pub constants: Vec<String>,
}

/// Attaches description attributes to struct fields and, optionally, to the
/// parameters of action methods.
#[derive(Debug, Clone, Default)]
pub struct DescriptionAnnotator {
    options: AnnotatorOptions,
}

fn has_schema_description(bodies: &[String]) -> bool {
    static SCHEMA_DESC_RE: OnceLock<Regex> = OnceLock::new();
    let re = SCHEMA_DESC_RE.get_or_init(|| {
        Regex::new(r"^schema\s*\((.*[\s,(])?description\s*=").expect("Invalid regex")
    });
    bodies.iter().any(|b| re.is_match(b))
}

fn has_parameter_doc(bodies: &[String]) -> bool {
    bodies
        .iter()
        .any(|b| b.starts_with("param") || b.starts_with("request_body"))
}

impl DescriptionAnnotator {
    /// Creates an annotator.
    pub fn new(options: AnnotatorOptions) -> Self {
        Self { options }
    }

    /// Annotates every field (and action parameter) of `source` that lacks a
    /// description.
    pub fn annotate(&self, source: &str) -> AppResult<Annotated> {
        let file = parse(source);
        let mut edits = Vec::new();
        let mut constants = IndexSet::new();

        for strukt in file.syntax().descendants().filter_map(ast::Struct::cast) {
            let Some(owner) = strukt.name() else { continue };
            let Some(ast::FieldList::RecordFieldList(fields)) = strukt.field_list() else {
                continue;
            };
            for field in fields.fields() {
                let Some(name) = field.name() else { continue };
                let constant =
                    description_constant(&owner.text().to_string(), &name.text().to_string());
                if let Some(edit) = self.annotate_field(&field, &constant) {
                    edits.push(edit);
                    constants.insert(constant);
                }
            }
        }

        if self.options.decorate_parameters {
            self.annotate_parameters(&file, &mut edits, &mut constants);
        }

        Ok(Annotated {
            rewrite: Rewrite {
                original: source.to_string(),
                rewritten: apply_edits(source, edits),
            },
            constants: constants.into_iter().collect(),
        })
    }

    fn annotate_field(&self, field: &ast::RecordField, constant: &str) -> Option<TextEdit> {
        let attribute = format!(
            "#[schema(description = {}::{})]",
            self.options.descriptions_type, constant
        );
        let bodies = attr_bodies(field);
        if has_schema_description(&bodies) || field.syntax().text().to_string().contains(&attribute)
        {
            return None;
        }
        attribute_insertion(field.syntax(), &attribute)
    }

    fn is_action(&self, func: &ast::Fn) -> bool {
        attr_bodies(func)
            .iter()
            .any(|b| b.contains(self.options.operation_marker.as_str()))
    }

    fn annotate_parameters(
        &self,
        file: &ra_ap_syntax::SourceFile,
        edits: &mut Vec<TextEdit>,
        constants: &mut IndexSet<String>,
    ) {
        for imp in file.syntax().descendants().filter_map(ast::Impl::cast) {
            if imp.trait_().is_some() {
                continue;
            }
            let Some(self_ty) = imp.self_ty() else { continue };
            let owner = type_simple_name(&self_ty.syntax().text().to_string()).to_string();
            let Some(items) = imp.assoc_item_list() else { continue };

            for item in items.assoc_items() {
                let ast::AssocItem::Fn(func) = item else { continue };
                if !self.is_action(&func) {
                    continue;
                }
                let Some(params) = func.param_list() else { continue };
                for param in params.params() {
                    if let Some(constant) = self.annotate_parameter(&owner, &param, edits) {
                        constants.insert(constant);
                    }
                }
            }
        }
    }

    fn annotate_parameter(
        &self,
        owner: &str,
        param: &ast::Param,
        edits: &mut Vec<TextEdit>,
    ) -> Option<String> {
        let name = param
            .pat()?
            .syntax()
            .descendants()
            .find_map(ast::IdentPat::cast)?
            .name()?
            .text()
            .to_string();

        let bodies = attr_bodies(param);
        if has_parameter_doc(&bodies) {
            info!(parameter = %name, "Parameter description already defined");
            return None;
        }

        let constant = format!("{}{}", owner, clean_member_name(&name));
        let required = bodies.iter().any(|b| b == "required");
        let attribute = if required {
            format!(
                "#[param(description = {}::{}, required = true)]",
                self.options.descriptions_type, constant
            )
        } else {
            format!(
                "#[param(description = {}::{})]",
                self.options.descriptions_type, constant
            )
        };
        if param.syntax().text().to_string().contains(&attribute) {
            return None;
        }

        edits.push(attribute_insertion(param.syntax(), &attribute)?);
        Some(constant)
    }
}
