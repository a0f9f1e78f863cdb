#![deny(missing_docs)]

//! # CLI Errors
//!
//! Error types for the CLI crate.

use apidoc_core::AppError;
use derive_more::{Display, From};

/// Errors surfaced by `apidoc` commands.
#[derive(Debug, Display, From)]
pub enum CliError {
    /// Filesystem failure outside a pipeline.
    #[display("IO Error: {}", _0)]
    Io(std::io::Error),

    /// Failure inside a core pipeline.
    #[display("{}", _0)]
    App(AppError),

    /// Malformed configuration file.
    #[display("Config Error: {}", _0)]
    Yaml(serde_yaml::Error),

    /// General failure message.
    #[display("Operation failed: {}", _0)]
    General(String),
}

impl std::error::Error for CliError {}

/// Result of a CLI command.
pub type CliResult<T> = Result<T, CliError>;
