#![deny(missing_docs)]

//! # API Doc Core
//!
//! Core library for documenting Rust API crates from their metadata.
//!
//! Discovers the data models each controller exposes, then patches the
//! crate's sources with description attributes, description constants,
//! example payloads and external model registrations. Every patch is
//! idempotent.

/// Shared error types.
pub mod error;

/// Member and type naming rules.
pub mod naming;

/// Type descriptors and metadata sessions.
pub mod metadata;

/// Controller and model discovery.
pub mod discovery;

/// Example value synthesis.
pub mod synthesis;

/// Code patching utilities.
pub mod patcher;

/// Editable document sets.
pub mod workspace;

/// Annotation and response-sample pipelines.
pub mod pipeline;

pub use discovery::{
    ControllerCatalog, DiscoveryConventions, ModelClosure, ModelGraphResolver,
    OwnershipClassifier,
};
pub use error::{AppError, AppResult};
pub use metadata::{MetadataProvider, SnapshotSession, TypeDef, TypeRef};
pub use patcher::Rewrite;
pub use pipeline::{
    AnnotationRequest, CapturingReporter, Conventions, DocumentOutcome, Reporter, RunReport,
    SamplesRequest, StdoutReporter,
};
pub use workspace::{DocumentSet, FsWorkspace, MemoryWorkspace};
