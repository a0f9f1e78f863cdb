#![deny(missing_docs)]

//! # Samples Command
//!
//! Creates or completes the response example documents of a controller's
//! response models (or a single type).

use apidoc_core::pipeline::samples;
use apidoc_core::{
    AppResult, Conventions, DocumentSet, MetadataProvider, Reporter, RunReport, SamplesRequest,
};

/// Arguments for the samples command.
#[derive(clap::Args, Debug, Clone)]
pub struct SamplesArgs {
    /// Controller whose response models get examples.
    #[clap(long, env = "APIDOC_CONTROLLER")]
    pub controller: Option<String>,

    /// Type to generate an example for when no controller is given.
    #[clap(long = "type", env = "APIDOC_TYPE")]
    pub type_name: Option<String>,

    /// Version prefix of the controller (e.g. `v05`).
    #[clap(long = "controller-version-prefix", env = "APIDOC_VERSION_PREFIX", default_value = "")]
    pub version_prefix: String,

    /// Print generated documents instead of writing them.
    #[clap(long, env = "APIDOC_DRY_RUN")]
    pub dry: bool,
}

/// Executes the response-samples pipeline.
pub fn execute(
    args: &SamplesArgs,
    session: &dyn MetadataProvider,
    conventions: &Conventions,
    docs: &mut dyn DocumentSet,
    reporter: &mut dyn Reporter,
) -> AppResult<RunReport> {
    let request = SamplesRequest {
        controller: args.controller.clone(),
        type_name: args.type_name.clone(),
        version_prefix: args.version_prefix.clone(),
        dry_run: args.dry,
    };
    samples::run(session, conventions, &request, docs, reporter)
}
