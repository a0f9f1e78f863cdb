#![deny(missing_docs)]

//! # Code Patching
//!
//! Idempotent rewrites of Rust source strings based on AST analysis.
//!
//! Every rewrite parses the document into a lossless syntax tree, computes
//! text edits and returns a [`Rewrite`]. Applying a rewrite to its own output
//! yields an unchanged result.
//!
//! - **descriptions**: description attributes on fields and action parameters.
//! - **files**: file-level items like imports.
//! - **constants**: description constants appended in a named region.
//! - **examples**: example-provider bodies and their template.
//! - **registry**: external model type list entries.

pub(crate) mod common;

/// Description attribute annotation.
pub mod descriptions;

/// File-level patching operations (e.g. imports).
pub mod files;

/// Constants region appending.
pub mod constants;

/// Example body generation.
pub mod examples;

/// External model registry appending.
pub mod registry;

pub use constants::append_constants;
pub use descriptions::{Annotated, AnnotatorOptions, DescriptionAnnotator};
pub use examples::{populate_examples, render_example_template, ExampleField, ExampleTemplate};
pub use files::append_imports;
pub use registry::append_external_types;

/// The outcome of a rewrite: the input text and the candidate output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    /// Document text before the rewrite.
    pub original: String,
    /// Document text after the rewrite.
    pub rewritten: String,
}

impl Rewrite {
    /// A rewrite that changed nothing.
    pub fn unchanged(source: &str) -> Self {
        Self {
            original: source.to_string(),
            rewritten: source.to_string(),
        }
    }

    /// True when the output differs from the input.
    ///
    /// The tree is lossless, so text inequality is structural inequality.
    pub fn is_changed(&self) -> bool {
        self.original != self.rewritten
    }

    /// Chains a further rewrite over this one's output.
    pub fn and_then(
        self,
        next: impl FnOnce(&str) -> crate::error::AppResult<Rewrite>,
    ) -> crate::error::AppResult<Rewrite> {
        let step = next(&self.rewritten)?;
        Ok(Rewrite {
            original: self.original,
            rewritten: step.rewritten,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rewrite_chaining() {
        let r = Rewrite::unchanged("a")
            .and_then(|s| {
                Ok(Rewrite {
                    original: s.into(),
                    rewritten: format!("{}b", s),
                })
            })
            .unwrap();
        assert!(r.is_changed());
        assert_eq!(r.original, "a");
        assert_eq!(r.rewritten, "ab");
        assert!(!Rewrite::unchanged("a").is_changed());
    }
}
