//! # Error Handling
//!
//! `AppError` is shared by every core module.
//!
//! Errors fall into two groups. *Input errors* (an unresolvable type or
//! document, an ambiguous document match, a missing discovery argument)
//! affect a single unit of work and are reported and skipped by the pipelines.
//! Everything else is fatal for the run.

use derive_more::{Display, From};

/// Every failure a discovery or patching run can report.
///
/// Plain strings convert into `General`.
#[derive(Debug, Display, From)]
pub enum AppError {
    /// Filesystem failure.
    #[display("IO Error: {_0}")]
    Io(std::io::Error),

    /// Metadata snapshot (JSON) decoding failure.
    #[display("JSON Error: {_0}")]
    Json(serde_json::Error),

    /// Metadata snapshot (YAML) decoding failure.
    #[display("YAML Error: {_0}")]
    Yaml(serde_yaml::Error),

    /// A type name could not be resolved in the metadata session.
    #[from(ignore)]
    #[display("Type '{_0}' not found in metadata")]
    TypeNotFound(String),

    /// No document in the document set matches the requested name.
    #[from(ignore)]
    #[display("Document '{_0}' not found")]
    DocumentNotFound(String),

    /// More than one document matches the requested name.
    #[from(ignore)]
    #[display("Found more than one document matching '{name}': {candidates:?}")]
    AmbiguousDocument {
        /// The requested name.
        name: String,
        /// Every matching document path.
        candidates: Vec<String>,
    },

    /// A required discovery argument was not supplied.
    #[from(ignore)]
    #[display("Missing argument: {_0}")]
    MissingArgument(String),

    /// A source document could not be patched (unexpected syntax shape).
    #[from(ignore)]
    #[display("Parse Error: {_0}")]
    Parse(String),

    /// Any other fatal failure.
    #[display("General Error: {_0}")]
    General(String),
}

impl AppError {
    /// Returns true for errors that only affect one unit of work.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            AppError::TypeNotFound(_)
                | AppError::DocumentNotFound(_)
                | AppError::AmbiguousDocument { .. }
                | AppError::MissingArgument(_)
                | AppError::Parse(_)
        )
    }
}

impl std::error::Error for AppError {}

/// Result alias used throughout the core crate.
pub type AppResult<T> = Result<T, AppError>;
