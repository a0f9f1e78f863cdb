//! # Annotations Pipeline
//!
//! Adds description attributes to model and controller documents, then folds
//! the constants they reference into the descriptions registry.

use crate::discovery::ControllerCatalog;
use crate::error::AppResult;
use crate::metadata::MetadataProvider;
use crate::naming::simple_name;
use crate::patcher::{
    append_constants, append_external_types, append_imports, DescriptionAnnotator, Rewrite,
};
use crate::pipeline::report::{DocumentOutcome, Reporter, RunReport};
use crate::pipeline::{crate_path, emit, missing_target, skip_input_error, Conventions};
use crate::workspace::{
    is_controller_document, matching_documents, single_by_name, Document, DocumentSet,
};
use indexmap::IndexMap;
use std::path::PathBuf;
use tracing::{info, warn};

/// Inputs of an annotations run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnnotationRequest {
    /// Controller whose models are annotated.
    pub controller: Option<String>,
    /// Single type to annotate when no controller is given.
    pub type_name: Option<String>,
    /// Controller version prefix (`v05`).
    pub version_prefix: String,
    /// Imports added to every annotated document.
    pub imports: Vec<String>,
    /// Print instead of writing.
    pub dry_run: bool,
}

/// Description constants discovered across documents, grouped by region.
///
/// Folded into the descriptions registry once at the end of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConstantsAccumulator {
    regions: IndexMap<String, IndexMap<String, String>>,
}

impl ConstantsAccumulator {
    /// Records constants (valued by their own name) under `region`.
    pub fn record(&mut self, region: &str, constants: impl IntoIterator<Item = String>) {
        let entry = self.regions.entry(region.to_string()).or_default();
        for name in constants {
            entry.insert(name.clone(), name);
        }
    }

    /// True when nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.regions.values().all(IndexMap::is_empty)
    }

    /// Recorded regions in insertion order.
    pub fn regions(&self) -> &IndexMap<String, IndexMap<String, String>> {
        &self.regions
    }

    /// Appends every region to the inherent impl of `type_name` in `source`.
    pub fn fold_into(&self, source: &str, type_name: &str) -> AppResult<Rewrite> {
        self.regions
            .iter()
            .filter(|(_, constants)| !constants.is_empty())
            .try_fold(Rewrite::unchanged(source), |acc, (region, constants)| {
                acc.and_then(|text| append_constants(text, type_name, region, constants))
            })
    }
}

/// Fully-qualified names a run is interested in: the controller and its
/// models, or the single requested type.
pub(crate) fn interested_names(
    catalog: &ControllerCatalog<'_>,
    session: &dyn MetadataProvider,
    request: &AnnotationRequest,
) -> AppResult<Vec<String>> {
    let controller = request.controller.as_deref().filter(|s| !s.trim().is_empty());
    let type_name = request.type_name.as_deref().filter(|s| !s.trim().is_empty());
    match (controller, type_name) {
        (Some(controller), _) => Ok(catalog.controller_model_names(
            controller,
            true,
            &request.version_prefix,
            true,
        )),
        (None, Some(type_name)) => Ok(vec![session
            .type_by_name(type_name)
            .map_or_else(|| type_name.to_string(), |def| def.name.clone())]),
        (None, None) => Err(missing_target()),
    }
}

/// Runs the annotations pipeline against a document set.
///
/// For every interested type: no document records its properties as
/// external constants, several documents are reported as ambiguous, a
/// single document is annotated. A document matched by several types is
/// annotated once and its outcome reported for each of them. Constants are then folded into the
/// descriptions registry and external types into the registry list, each
/// written at most once.
pub fn run(
    session: &dyn MetadataProvider,
    conventions: &Conventions,
    request: &AnnotationRequest,
    docs: &mut dyn DocumentSet,
    reporter: &mut dyn Reporter,
) -> AppResult<RunReport> {
    let catalog = ControllerCatalog::new(session, conventions.discovery());
    let names = interested_names(&catalog, session, request)?;
    for name in &names {
        info!(name = %name, "Interested type");
    }

    let all_docs = docs.documents();
    let mut report = RunReport::default();
    let mut constants = ConstantsAccumulator::default();
    let mut external_types: Vec<String> = Vec::new();

    let mut planned: Vec<(String, Option<DocumentOutcome>)> = Vec::new();
    let mut subjects: IndexMap<PathBuf, (Document, Vec<String>)> = IndexMap::new();

    for name in &names {
        let shown = catalog.display_name(name, false);
        let matches = matching_documents(&all_docs, &shown);
        match matches.as_slice() {
            [] => {
                let properties = catalog.qualified_property_names(name);
                if !properties.is_empty() {
                    constants.record(&shown, properties);
                    external_types.push(crate_path(name, session.target_module()));
                }
                warn!(name = %shown, "Found no matching document");
                planned.push((
                    shown,
                    Some(DocumentOutcome::Skipped("no matching document".into())),
                ));
            }
            [document] => {
                subjects
                    .entry(document.path.clone())
                    .or_insert_with(|| (document.clone(), Vec::new()))
                    .1
                    .push(shown.clone());
                planned.push((shown, None));
            }
            many => {
                let candidates: Vec<String> =
                    many.iter().map(|d| d.path.display().to_string()).collect();
                warn!(name = %shown, ?candidates, "Found more than one matching document");
                planned.push((
                    shown,
                    Some(DocumentOutcome::Skipped(format!(
                        "more than one matching document: {}",
                        candidates.join(", ")
                    ))),
                ));
            }
        }
    }

    // Each document is annotated once, however many types it declares.
    let mut annotated: IndexMap<String, DocumentOutcome> = IndexMap::new();
    for (document, shown) in subjects.values() {
        let region = simple_name(&shown[0]);
        let outcome = annotate_document(conventions, request, document, docs, reporter)
            .map(|(outcome, found)| {
                if !found.is_empty() {
                    constants.record(region, found);
                }
                outcome
            });
        let outcome = skip_input_error(&shown[0], outcome)?;
        for subject in shown {
            annotated.insert(subject.clone(), outcome.clone());
        }
    }

    for (shown, outcome) in planned {
        let outcome = match outcome {
            Some(outcome) => outcome,
            None => annotated
                .get(&shown)
                .cloned()
                .unwrap_or(DocumentOutcome::Unchanged),
        };
        report.record(shown, outcome);
    }

    if !constants.is_empty() {
        let outcome =
            update_descriptions(conventions, request, &constants, &all_docs, docs, reporter);
        let subject = conventions.descriptions_document.as_str();
        report.record(subject, skip_input_error(subject, outcome)?);
    }

    if !external_types.is_empty() {
        let outcome =
            update_registry(conventions, request, &external_types, &all_docs, docs, reporter);
        let subject = conventions.registry_document.as_str();
        report.record(subject, skip_input_error(subject, outcome)?);
    }

    Ok(report)
}

/// Annotates one document and appends imports when anything changed.
fn annotate_document(
    conventions: &Conventions,
    request: &AnnotationRequest,
    document: &Document,
    docs: &mut dyn DocumentSet,
    reporter: &mut dyn Reporter,
) -> AppResult<(DocumentOutcome, Vec<String>)> {
    let text = docs.read(document)?;
    let annotator =
        DescriptionAnnotator::new(conventions.annotator(is_controller_document(document)));
    let annotated = annotator.annotate(&text)?;
    if !annotated.rewrite.is_changed() {
        return Ok((DocumentOutcome::Unchanged, annotated.constants));
    }

    let rewrite = annotated
        .rewrite
        .and_then(|source| append_imports(source, &request.imports))?;
    let outcome = emit(docs, reporter, document, &rewrite.rewritten, request.dry_run)?;
    Ok((outcome, annotated.constants))
}

fn update_descriptions(
    conventions: &Conventions,
    request: &AnnotationRequest,
    constants: &ConstantsAccumulator,
    all_docs: &[Document],
    docs: &mut dyn DocumentSet,
    reporter: &mut dyn Reporter,
) -> AppResult<DocumentOutcome> {
    let document = single_by_name(all_docs, &conventions.descriptions_document)?;
    let text = docs.read(&document)?;
    let rewrite = constants.fold_into(&text, &conventions.descriptions_type)?;
    if !rewrite.is_changed() {
        return Ok(DocumentOutcome::Unchanged);
    }
    emit(docs, reporter, &document, &rewrite.rewritten, request.dry_run)
}

fn update_registry(
    conventions: &Conventions,
    request: &AnnotationRequest,
    external_types: &[String],
    all_docs: &[Document],
    docs: &mut dyn DocumentSet,
    reporter: &mut dyn Reporter,
) -> AppResult<DocumentOutcome> {
    let document = single_by_name(all_docs, &conventions.registry_document)?;
    let text = docs.read(&document)?;
    let rewrite = append_external_types(&text, &conventions.registry_variable, external_types)?;
    if !rewrite.is_changed() {
        return Ok(DocumentOutcome::Unchanged);
    }
    emit(docs, reporter, &document, &rewrite.rewritten, request.dry_run)
}
