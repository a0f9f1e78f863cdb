#![deny(missing_docs)]

//! # Configuration
//!
//! Naming conventions come from built-in defaults, then an optional
//! `apidoc.yaml`, then command-line flags.

use crate::error::{CliError, CliResult};
use apidoc_core::Conventions;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Config file looked up in the project directory when `--config` is absent.
pub const DEFAULT_CONFIG: &str = "apidoc.yaml";

/// Convention overrides shared by every command.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct ConventionArgs {
    /// Simple name of the type every controller derives from.
    #[clap(long, env = "APIDOC_CONTROLLER_BASE")]
    pub controller_base: Option<String>,

    /// Name of the response attribute recorded on actions.
    #[clap(long, env = "APIDOC_RESPONSE_ATTRIBUTE")]
    pub response_attribute: Option<String>,

    /// Module prefix treated as part of the API's domain (e.g. `emoney`).
    /// May be repeated or comma separated.
    #[clap(long = "allowed-prefix", env = "APIDOC_ALLOWED_PREFIXES", value_delimiter = ',')]
    pub allowed_prefixes: Vec<String>,

    /// Seed of the numeric example generator.
    #[clap(long, env = "APIDOC_SEED")]
    pub seed: Option<u64>,
}

impl ConventionArgs {
    /// Overwrites every convention given on the command line.
    pub fn apply(&self, conventions: &mut Conventions) {
        if let Some(base) = &self.controller_base {
            conventions.controller_base = base.clone();
        }
        if let Some(attribute) = &self.response_attribute {
            conventions.response_attribute = attribute.clone();
        }
        if !self.allowed_prefixes.is_empty() {
            conventions.allowed_module_prefixes = self.allowed_prefixes.clone();
        }
        if let Some(seed) = self.seed {
            conventions.seed = seed;
        }
    }
}

/// Loads conventions from `explicit`, or from `apidoc.yaml` in `project`
/// when present. An explicit file that cannot be read is an error.
pub fn load(explicit: Option<&Path>, project: &Path) -> CliResult<Conventions> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let candidate = project.join(DEFAULT_CONFIG);
            if !candidate.is_file() {
                debug!(path = %candidate.display(), "No config file, using defaults");
                return Ok(Conventions::default());
            }
            candidate
        }
    };

    let text = fs::read_to_string(&path)
        .map_err(|e| CliError::General(format!("Failed to read config {:?}: {}", path, e)))?;
    let conventions: Conventions = serde_yaml::from_str(&text)?;
    info!(path = %path.display(), "Loaded config");
    Ok(conventions)
}
