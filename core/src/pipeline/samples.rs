//! # Response Samples Pipeline
//!
//! Creates or completes the response example document of every response model.

use crate::discovery::ControllerCatalog;
use crate::error::{AppError, AppResult};
use crate::metadata::{MetadataProvider, Property};
use crate::patcher::{populate_examples, render_example_template, ExampleField};
use crate::pipeline::report::{DocumentOutcome, Reporter, RunReport};
use crate::pipeline::{crate_path, emit, missing_target, skip_input_error, Conventions};
use crate::synthesis::{FieldShape, ValueSynthesizer};
use crate::workspace::{single_by_name, DocumentSet};
use indexmap::IndexMap;
use tracing::info;

/// Inputs of a response-samples run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SamplesRequest {
    /// Controller whose response models get examples.
    pub controller: Option<String>,
    /// Single type to generate an example for when no controller is given.
    pub type_name: Option<String>,
    /// Controller version prefix (`v05`).
    pub version_prefix: String,
    /// Print instead of writing.
    pub dry_run: bool,
}

fn response_models(
    catalog: &ControllerCatalog<'_>,
    session: &dyn MetadataProvider,
    request: &SamplesRequest,
) -> AppResult<IndexMap<String, Vec<Property>>> {
    let controller = request.controller.as_deref().filter(|s| !s.trim().is_empty());
    let type_name = request.type_name.as_deref().filter(|s| !s.trim().is_empty());
    match (controller, type_name) {
        (Some(controller), _) => {
            Ok(catalog.response_model_properties(controller, &request.version_prefix))
        }
        (None, Some(type_name)) => {
            let def = session
                .type_by_name(type_name)
                .ok_or_else(|| AppError::TypeNotFound(type_name.to_string()))?;
            Ok(IndexMap::from([(def.name.clone(), def.properties.clone())]))
        }
        (None, None) => Err(missing_target()),
    }
}

/// Runs the response-samples pipeline against a document set.
///
/// Every response model gets its examples-provider document populated with
/// the fields it lacks; a missing document is rendered from the template
/// first and then added to the set.
pub fn run(
    session: &dyn MetadataProvider,
    conventions: &Conventions,
    request: &SamplesRequest,
    docs: &mut dyn DocumentSet,
    reporter: &mut dyn Reporter,
) -> AppResult<RunReport> {
    let catalog = ControllerCatalog::new(session, conventions.discovery());
    let mut report = RunReport::default();

    let models = match response_models(&catalog, session, request) {
        Err(e @ AppError::TypeNotFound(_)) => {
            let subject = request.type_name.clone().unwrap_or_default();
            report.record(&subject, skip_input_error(&subject, Err(e))?);
            return Ok(report);
        }
        other => other?,
    };
    for name in models.keys() {
        info!(name = %name, "Response model");
    }

    let template = conventions.template();
    let all_docs = docs.documents();

    for (name, properties) in &models {
        let shown = catalog.display_name(name, false);
        let fields: Vec<ExampleField> = properties
            .iter()
            .map(|p| ExampleField {
                name: p.name.clone(),
                shape: FieldShape::classify(session, &p.ty),
            })
            .collect();
        let mut synth =
            ValueSynthesizer::new(conventions.seed, conventions.descriptions_type.as_str());
        let file_name = template.file_name(name);

        let outcome = match single_by_name(&all_docs, &file_name) {
            Ok(document) => docs.read(&document).and_then(|text| {
                let rewrite = populate_examples(&text, name, &fields, &mut synth)?;
                if rewrite.is_changed() {
                    emit(docs, reporter, &document, &rewrite.rewritten, request.dry_run)
                } else {
                    Ok(DocumentOutcome::Unchanged)
                }
            }),
            Err(AppError::DocumentNotFound(_)) => {
                let model_path = crate_path(name, session.target_module());
                let skeleton = render_example_template(&template, &model_path);
                populate_examples(&skeleton, name, &fields, &mut synth).and_then(|rewrite| {
                    if request.dry_run {
                        reporter.document(&file_name, &rewrite.rewritten);
                        Ok(DocumentOutcome::Printed)
                    } else {
                        let document =
                            docs.add(&file_name, &template.folders, &rewrite.rewritten)?;
                        info!(
                            document = %document.path.display(),
                            model = %shown,
                            "Generated document"
                        );
                        Ok(DocumentOutcome::Created)
                    }
                })
            }
            Err(e) => Err(e),
        };
        report.record(shown.clone(), skip_input_error(&shown, outcome)?);
    }

    Ok(report)
}
