//! # Document Sets
//!
//! The editable set of source documents the pipelines patch: a file-system
//! backed set for real runs and an in-memory set for tests and dry runs.

use crate::error::{AppError, AppResult};
use crate::naming::path_segments;
use heck::ToSnakeCase;
use indexmap::IndexMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

/// A source document known to a [`DocumentSet`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Document {
    /// Path relative to the set's root.
    pub path: PathBuf,
    /// File name, e.g. `user.rs`.
    pub name: String,
    /// Folder names between the root and the file.
    pub folders: Vec<String>,
}

impl Document {
    /// Builds a document descriptor from a root-relative path.
    pub fn from_relative(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let folders = path
            .parent()
            .map(|p| {
                p.components()
                    .map(|c| c.as_os_str().to_string_lossy().into_owned())
                    .collect()
            })
            .unwrap_or_default();
        Self { path, name, folders }
    }

    /// File name without the `.rs` extension.
    pub fn stem(&self) -> &str {
        self.name.strip_suffix(".rs").unwrap_or(&self.name)
    }

    /// Module path segments of the document: its folders plus its stem,
    /// unless the stem is `mod`, `lib` or `main`.
    pub fn module_segments(&self) -> Vec<&str> {
        let mut segments: Vec<&str> = self.folders.iter().map(String::as_str).collect();
        if !matches!(self.stem(), "mod" | "lib" | "main") {
            segments.push(self.stem());
        }
        segments
    }
}

/// An editable set of source documents.
pub trait DocumentSet {
    /// Every document in a stable order.
    fn documents(&self) -> Vec<Document>;

    /// Reads a document's full text.
    fn read(&self, document: &Document) -> AppResult<String>;

    /// Replaces a document's full text.
    fn write(&mut self, document: &Document, text: &str) -> AppResult<()>;

    /// Adds a new document under `folders`.
    fn add(&mut self, name: &str, folders: &[String], text: &str) -> AppResult<Document>;
}

/// Documents that may hold the type `type_name` (`v05::models::User`).
///
/// Every namespace segment must appear among the document's module segments.
/// Documents whose stem names the type (`User` or `user`) win; only when there
/// are none does the module of the last namespace segment (`models.rs`,
/// `models/mod.rs`) match.
pub fn matching_documents(documents: &[Document], type_name: &str) -> Vec<Document> {
    let segments = path_segments(type_name);
    let Some((type_segment, namespace)) = segments.split_last() else {
        return Vec::new();
    };
    let snake = type_segment.to_snake_case();

    let in_namespace: Vec<&Document> = documents
        .iter()
        .filter(|doc| {
            let module = doc.module_segments();
            namespace.iter().all(|ns| module.contains(ns))
        })
        .collect();

    let by_stem: Vec<Document> = in_namespace
        .iter()
        .filter(|doc| {
            let stem = doc.stem();
            stem == *type_segment || stem == snake
        })
        .map(|doc| (*doc).clone())
        .collect();
    if !by_stem.is_empty() {
        return by_stem;
    }

    in_namespace
        .into_iter()
        .filter(|doc| {
            namespace
                .last()
                .is_some_and(|ns| doc.module_segments().last() == Some(ns))
        })
        .cloned()
        .collect()
}

/// The single document named exactly `name`.
pub fn single_by_name(documents: &[Document], name: &str) -> AppResult<Document> {
    let found: Vec<&Document> = documents.iter().filter(|d| d.name == name).collect();
    match found.as_slice() {
        [] => Err(AppError::DocumentNotFound(name.to_string())),
        [doc] => Ok((*doc).clone()),
        many => Err(AppError::AmbiguousDocument {
            name: name.to_string(),
            candidates: many.iter().map(|d| d.path.display().to_string()).collect(),
        }),
    }
}

/// True when a document holds a controller (stem ends with `controller`).
pub fn is_controller_document(document: &Document) -> bool {
    document.stem().to_lowercase().ends_with("controller")
}

/// A document set over the `.rs` files below a directory.
#[derive(Debug)]
pub struct FsWorkspace {
    root: PathBuf,
    documents: Vec<Document>,
}

impl FsWorkspace {
    /// Scans `root` for Rust sources, skipping `target` and hidden directories.
    pub fn open(root: impl Into<PathBuf>) -> AppResult<Self> {
        let root = root.into();
        if !root.is_dir() {
            return Err(AppError::General(format!(
                "Project directory not found: {:?}",
                root
            )));
        }

        let walker = WalkDir::new(&root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| {
                e.depth() == 0
                    || !(e.file_type().is_dir()
                        && (e.file_name() == "target"
                            || e.file_name().to_string_lossy().starts_with('.')))
            });

        let mut documents = Vec::new();
        for entry in walker.filter_map(|e| e.ok()) {
            let path = entry.path();
            if !entry.file_type().is_file() || path.extension().is_none_or(|ext| ext != "rs") {
                continue;
            }
            if let Ok(relative) = path.strip_prefix(&root) {
                documents.push(Document::from_relative(relative));
            }
        }

        info!(root = %root.display(), count = documents.len(), "Loaded documents");
        Ok(Self { root, documents })
    }

    /// The workspace root.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl DocumentSet for FsWorkspace {
    fn documents(&self) -> Vec<Document> {
        self.documents.clone()
    }

    fn read(&self, document: &Document) -> AppResult<String> {
        let path = self.root.join(&document.path);
        fs::read_to_string(&path)
            .map_err(|e| AppError::General(format!("Failed to read file {:?}: {}", path, e)))
    }

    fn write(&mut self, document: &Document, text: &str) -> AppResult<()> {
        let path = self.root.join(&document.path);
        debug!(path = %path.display(), "Writing document");
        fs::write(&path, text)
            .map_err(|e| AppError::General(format!("Failed to write file {:?}: {}", path, e)))
    }

    fn add(&mut self, name: &str, folders: &[String], text: &str) -> AppResult<Document> {
        let relative: PathBuf = folders.iter().collect::<PathBuf>().join(name);
        let path = self.root.join(&relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, text)
            .map_err(|e| AppError::General(format!("Failed to write file {:?}: {}", path, e)))?;
        let document = Document::from_relative(relative);
        self.documents.push(document.clone());
        Ok(document)
    }
}

/// A document set held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryWorkspace {
    files: IndexMap<PathBuf, String>,
}

impl MemoryWorkspace {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a document at a root-relative path.
    pub fn with_document(mut self, path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        self.files.insert(path.into(), text.into());
        self
    }

    /// Current text of a document, if present.
    pub fn text(&self, path: impl AsRef<Path>) -> Option<&str> {
        self.files.get(path.as_ref()).map(String::as_str)
    }
}

impl DocumentSet for MemoryWorkspace {
    fn documents(&self) -> Vec<Document> {
        self.files.keys().map(Document::from_relative).collect()
    }

    fn read(&self, document: &Document) -> AppResult<String> {
        self.files
            .get(&document.path)
            .cloned()
            .ok_or_else(|| AppError::DocumentNotFound(document.path.display().to_string()))
    }

    fn write(&mut self, document: &Document, text: &str) -> AppResult<()> {
        match self.files.get_mut(&document.path) {
            Some(slot) => {
                *slot = text.to_string();
                Ok(())
            }
            None => Err(AppError::DocumentNotFound(
                document.path.display().to_string(),
            )),
        }
    }

    fn add(&mut self, name: &str, folders: &[String], text: &str) -> AppResult<Document> {
        let relative: PathBuf = folders.iter().collect::<PathBuf>().join(name);
        self.files.insert(relative.clone(), text.to_string());
        Ok(Document::from_relative(relative))
    }
}
