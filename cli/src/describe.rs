#![deny(missing_docs)]

//! # Describe Command
//!
//! Adds description attributes to a controller's models (or a single type),
//! then records the description constants and external models in their
//! registry documents.

use apidoc_core::pipeline::annotations;
use apidoc_core::{
    AnnotationRequest, AppResult, Conventions, DocumentSet, MetadataProvider, Reporter,
    RunReport,
};

/// Arguments for the describe command.
#[derive(clap::Args, Debug, Clone)]
pub struct DescribeArgs {
    /// Controller to work with (e.g. `UsersController`).
    #[clap(long, env = "APIDOC_CONTROLLER")]
    pub controller: Option<String>,

    /// Type to work with when no controller is given (e.g. `v05::models::User`).
    #[clap(long = "type", env = "APIDOC_TYPE")]
    pub type_name: Option<String>,

    /// Version prefix of the controller (e.g. `v05`).
    #[clap(long = "controller-version-prefix", env = "APIDOC_VERSION_PREFIX", default_value = "")]
    pub version_prefix: String,

    /// Import added to every annotated document. May be repeated.
    #[clap(long = "use", env = "APIDOC_IMPORTS", value_delimiter = ',')]
    pub imports: Vec<String>,

    /// File name of the descriptions registry document.
    #[clap(long, env = "APIDOC_DESCRIPTIONS_DOCUMENT")]
    pub descriptions_document: Option<String>,

    /// File name of the external model registry document.
    #[clap(long, env = "APIDOC_REGISTRY_DOCUMENT")]
    pub registry_document: Option<String>,

    /// Print rewritten documents instead of writing them.
    #[clap(long, env = "APIDOC_DRY_RUN")]
    pub dry: bool,
}

/// Executes the annotations pipeline.
pub fn execute(
    args: &DescribeArgs,
    session: &dyn MetadataProvider,
    conventions: &Conventions,
    docs: &mut dyn DocumentSet,
    reporter: &mut dyn Reporter,
) -> AppResult<RunReport> {
    let mut conventions = conventions.clone();
    if let Some(name) = &args.descriptions_document {
        conventions.descriptions_document = name.clone();
    }
    if let Some(name) = &args.registry_document {
        conventions.registry_document = name.clone();
    }

    let request = AnnotationRequest {
        controller: args.controller.clone(),
        type_name: args.type_name.clone(),
        version_prefix: args.version_prefix.clone(),
        imports: args.imports.clone(),
        dry_run: args.dry,
    };
    annotations::run(session, &conventions, &request, docs, reporter)
}
