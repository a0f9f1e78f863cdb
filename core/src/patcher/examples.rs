use crate::error::AppResult;
use crate::naming::simple_name;
use crate::patcher::common::{apply_edits, detect_indent, list_insertion, parse, type_simple_name};
use crate::patcher::Rewrite;
use crate::synthesis::{FieldShape, ValueSynthesizer};
use heck::ToSnakeCase;
use ra_ap_syntax::{ast, AstNode};
use tracing::debug;

/// Field present on every generated model; never initialised by examples.
pub const EXTENSION_DATA_FIELD: &str = "extension_data";

/// A model field to populate, with its classified type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExampleField {
    /// Field name as declared.
    pub name: String,
    /// Classified type.
    pub shape: FieldShape,
}

/// Adds an initialiser for every missing field to each struct literal of
/// `model` in `source`.
///
/// Fields are inserted before the closing brace, or before a `..base` spread.
pub fn populate_examples(
    source: &str,
    model: &str,
    fields: &[ExampleField],
    synth: &mut ValueSynthesizer,
) -> AppResult<Rewrite> {
    let model_name = simple_name(model);
    let file = parse(source);
    let mut edits = Vec::new();

    for literal in file.syntax().descendants().filter_map(ast::RecordExpr::cast) {
        let Some(path) = literal.path() else { continue };
        if type_simple_name(&path.syntax().text().to_string()) != model_name {
            continue;
        }
        let Some(list) = literal.record_expr_field_list() else {
            continue;
        };

        let mut present: Vec<String> = list
            .fields()
            .filter_map(|f| f.field_name())
            .map(|n| n.text().to_string())
            .collect();
        present.push(EXTENSION_DATA_FIELD.to_string());

        let items: Vec<String> = fields
            .iter()
            .filter(|f| !present.contains(&f.name))
            .map(|f| format!("{}: {}", f.name, synth.render(model, &f.name, &f.shape)))
            .collect();
        if items.is_empty() {
            debug!(model = model_name, "Example literal already complete");
            continue;
        }

        let anchor = match list.dotdot_token() {
            Some(dotdot) => dotdot,
            None => match list.r_curly_token() {
                Some(r_curly) => r_curly,
                None => continue,
            },
        };
        let first_field = list.fields().next();
        let inner = detect_indent(first_field.as_ref().map(|f| f.syntax()));
        edits.push(list_insertion(source, &anchor, &items, inner));
    }

    Ok(Rewrite {
        original: source.to_string(),
        rewritten: apply_edits(source, edits),
    })
}

/// Naming and imports of a generated examples-provider document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExampleTemplate {
    /// Path of the examples provider trait.
    pub provider_path: String,
    /// Import path of the descriptions type.
    pub descriptions_import: String,
    /// Folders the document is placed in.
    pub folders: Vec<String>,
}

impl Default for ExampleTemplate {
    fn default() -> Self {
        Self {
            provider_path: "crate::swagger::ExamplesProvider".into(),
            descriptions_import: "crate::docs::Descriptions".into(),
            folders: vec!["swagger".into(), "response_examples".into()],
        }
    }
}

impl ExampleTemplate {
    /// File name of the examples provider for `model`.
    pub fn file_name(&self, model: &str) -> String {
        format!("{}_response_example.rs", simple_name(model).to_snake_case())
    }
}

/// Renders an examples-provider document whose accessor returns an empty
/// literal of the model, ready to be populated.
///
/// `model_path` is the import path of the model (`crate::v05::User`).
pub fn render_example_template(template: &ExampleTemplate, model_path: &str) -> String {
    let model = simple_name(model_path);
    let provider = simple_name(&template.provider_path);

    let mut imports = Vec::new();
    if model_path.contains("::") {
        imports.push(format!("use {};", model_path));
    }
    imports.push(format!("use {};", template.provider_path));
    imports.push(format!("use {};", template.descriptions_import));

    format!(
        "{imports}

/// Example payload for [`{model}`].
pub struct {model}ResponseExample;

impl {provider}<{model}> for {model}ResponseExample {{
    fn get_examples(&self) -> {model} {{
        {model} {{ }}
    }}
}}
",
        imports = imports.join("\n"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synthesis::{PrimitiveKind, DEFAULT_SEED};
    use pretty_assertions::assert_eq;

    fn field(name: &str, kind: PrimitiveKind, nullable: bool) -> ExampleField {
        ExampleField {
            name: name.into(),
            shape: FieldShape { kind, nullable },
        }
    }

    fn fields() -> Vec<ExampleField> {
        vec![
            field("user_id", PrimitiveKind::String, false),
            field("name", PrimitiveKind::String, false),
            field("active", PrimitiveKind::Boolean, false),
            field("extension_data", PrimitiveKind::Other, false),
        ]
    }

    #[test]
    fn test_template_then_populate() {
        let template = ExampleTemplate::default();
        assert_eq!(template.file_name("v05::models::UserProfile"), "user_profile_response_example.rs");

        let doc = render_example_template(&template, "crate::v05::models::User");
        assert!(doc.starts_with("use crate::v05::models::User;\nuse crate::swagger::ExamplesProvider;"));
        assert!(doc.contains("impl ExamplesProvider<User> for UserResponseExample {"));

        let mut synth = ValueSynthesizer::new(DEFAULT_SEED, "Descriptions");
        let out = populate_examples(&doc, "acme::v05::models::User", &fields(), &mut synth).unwrap();
        assert!(out.rewritten.contains(
            "        User {
            user_id: uuid::Uuid::new_v4().to_string(),
            name: Descriptions::UserName.into(),
            active: false,
        }
"
        ));
        assert!(!out.rewritten.contains("extension_data"));
    }

    #[test]
    fn test_existing_fields_are_kept() {
        let src = "fn get() -> User {
    User {
        name: \"fixed\".into(),
    }
}
";
        let mut synth = ValueSynthesizer::new(DEFAULT_SEED, "Descriptions");
        let out = populate_examples(src, "User", &fields(), &mut synth).unwrap();
        assert_eq!(
            out.rewritten,
            "fn get() -> User {
    User {
        name: \"fixed\".into(),
        user_id: uuid::Uuid::new_v4().to_string(),
        active: false,
    }
}
"
        );

        let again = populate_examples(&out.rewritten, "User", &fields(), &mut synth).unwrap();
        assert!(!again.is_changed());
    }

    #[test]
    fn test_spread_and_missing_comma() {
        let src = "fn a() -> User {\n    User {\n        name: x,\n        ..Default::default()\n    }\n}\n";
        let mut synth = ValueSynthesizer::new(DEFAULT_SEED, "Descriptions");
        let out = populate_examples(src, "User", &fields(), &mut synth).unwrap();
        assert!(out.rewritten.contains(
            "        name: x,\n        user_id: uuid::Uuid::new_v4().to_string(),\n        active: false,\n        ..Default::default()"
        ));

        let src = "fn a() -> User {\n    User {\n        name: x\n    }\n}\n";
        let out = populate_examples(src, "User", &fields(), &mut synth).unwrap();
        assert!(out.rewritten.contains("        name: x,\n        user_id:"));
    }

    #[test]
    fn test_other_literals_untouched() {
        let src = "fn a() { let _ = Account { }; }";
        let mut synth = ValueSynthesizer::new(DEFAULT_SEED, "Descriptions");
        let out = populate_examples(src, "User", &fields(), &mut synth).unwrap();
        assert!(!out.is_changed());
    }
}
