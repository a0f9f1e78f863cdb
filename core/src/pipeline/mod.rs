//! # Pipelines
//!
//! Sequences discovery, rewriting and the write-or-print decision.
//!
//! - **annotations**: description attributes, the constants registry and the
//!   external model list.
//! - **samples**: examples-provider documents for response models.
//! - **report**: run outcomes and dry-run output.
//!
//! Each document is rewritten fully in memory before anything is written.
//! Input errors skip the affected unit; other errors abort the run.

pub mod annotations;
pub mod report;
pub mod samples;

pub use annotations::{AnnotationRequest, ConstantsAccumulator};
pub use report::{
    CapturingReporter, DocumentOutcome, ReportEntry, Reporter, RunReport, StdoutReporter,
};
pub use samples::SamplesRequest;

use crate::discovery::DiscoveryConventions;
use crate::error::{AppError, AppResult};
use crate::naming::strip_module_prefix;
use crate::patcher::{AnnotatorOptions, ExampleTemplate};
use crate::synthesis::DEFAULT_SEED;
use crate::workspace::{Document, DocumentSet};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Naming conventions of the API crate being documented.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Conventions {
    /// Simple name of the base type every controller derives from.
    pub controller_base: String,
    /// Simple name of the response attribute in metadata.
    pub response_attribute: String,
    /// Attribute text marking action methods in source.
    pub operation_marker: String,
    /// Module prefixes treated as in-domain besides the target module.
    pub allowed_module_prefixes: Vec<String>,
    /// Type holding the description constants.
    pub descriptions_type: String,
    /// File name of the descriptions registry document.
    pub descriptions_document: String,
    /// File name of the external model registry document.
    pub registry_document: String,
    /// Binding holding the external model list.
    pub registry_variable: String,
    /// Path of the examples provider trait.
    pub examples_provider: String,
    /// Import path of the descriptions type.
    pub descriptions_import: String,
    /// Folders new example documents are placed in.
    pub example_folders: Vec<String>,
    /// Seed of the numeric example generator.
    pub seed: u64,
}

impl Default for Conventions {
    fn default() -> Self {
        let discovery = DiscoveryConventions::default();
        let annotator = AnnotatorOptions::default();
        let template = ExampleTemplate::default();
        Self {
            controller_base: discovery.controller_base,
            response_attribute: discovery.response_attribute,
            operation_marker: annotator.operation_marker,
            allowed_module_prefixes: discovery.allowed_module_prefixes,
            descriptions_type: annotator.descriptions_type,
            descriptions_document: "descriptions.rs".into(),
            registry_document: "external_models.rs".into(),
            registry_variable: "external_model_types".into(),
            examples_provider: template.provider_path,
            descriptions_import: template.descriptions_import,
            example_folders: template.folders,
            seed: DEFAULT_SEED,
        }
    }
}

impl Conventions {
    /// Conventions used by controller discovery.
    pub fn discovery(&self) -> DiscoveryConventions {
        DiscoveryConventions {
            controller_base: self.controller_base.clone(),
            response_attribute: self.response_attribute.clone(),
            allowed_module_prefixes: self.allowed_module_prefixes.clone(),
        }
    }

    /// Annotator settings for one document.
    pub fn annotator(&self, decorate_parameters: bool) -> AnnotatorOptions {
        AnnotatorOptions {
            descriptions_type: self.descriptions_type.clone(),
            operation_marker: self.operation_marker.clone(),
            decorate_parameters,
        }
    }

    /// Template settings for new example documents.
    pub fn template(&self) -> ExampleTemplate {
        ExampleTemplate {
            provider_path: self.examples_provider.clone(),
            descriptions_import: self.descriptions_import.clone(),
            folders: self.example_folders.clone(),
        }
    }
}

/// Path of a type as seen from the API crate's root.
pub(crate) fn crate_path(name: &str, target_module: &str) -> String {
    let stripped = strip_module_prefix(name, target_module);
    if stripped.len() == name.len() {
        name.to_string()
    } else {
        format!("crate::{}", stripped)
    }
}

/// Writes a rewritten document, or sends it to the reporter on a dry run.
pub(crate) fn emit(
    docs: &mut dyn DocumentSet,
    reporter: &mut dyn Reporter,
    document: &Document,
    text: &str,
    dry_run: bool,
) -> AppResult<DocumentOutcome> {
    if dry_run {
        reporter.document(&document.path.display().to_string(), text);
        Ok(DocumentOutcome::Printed)
    } else {
        docs.write(document, text)?;
        info!(document = %document.path.display(), "Document updated");
        Ok(DocumentOutcome::Written)
    }
}

/// Turns an input error into a skipped outcome; other errors propagate.
pub(crate) fn skip_input_error(
    subject: &str,
    result: AppResult<DocumentOutcome>,
) -> AppResult<DocumentOutcome> {
    match result {
        Err(e) if e.is_input_error() => {
            warn!(subject, error = %e, "Skipping");
            Ok(DocumentOutcome::Skipped(e.to_string()))
        }
        other => other,
    }
}

/// Error for runs given neither a controller nor a type.
pub(crate) fn missing_target() -> AppError {
    AppError::MissingArgument("one of controller name or type name is required".into())
}
