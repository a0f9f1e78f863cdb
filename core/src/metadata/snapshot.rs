//! # Metadata Snapshots
//!
//! Loads module snapshots from JSON or YAML and serves type lookups across them.

use crate::error::{AppError, AppResult};
use crate::metadata::models::TypeDef;
use crate::metadata::MetadataProvider;
use indexmap::IndexMap;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// On-disk form of one module's metadata.
#[derive(Debug, Deserialize)]
pub struct ModuleSnapshot {
    /// Module (crate) name; inherited by types that omit theirs.
    pub module: String,
    /// Other snapshots to load alongside, relative to this file.
    #[serde(default)]
    pub references: Vec<PathBuf>,
    /// Declared types.
    #[serde(default)]
    pub types: Vec<TypeDef>,
}

impl ModuleSnapshot {
    /// Parses a snapshot, choosing YAML or JSON by file extension.
    pub fn parse(text: &str, path: &Path) -> AppResult<Self> {
        let is_yaml = path
            .extension()
            .is_some_and(|ext| ext == "yaml" || ext == "yml");
        if is_yaml {
            Ok(serde_yaml::from_str(text)?)
        } else {
            Ok(serde_json::from_str(text)?)
        }
    }
}

/// A metadata session backed by snapshot files.
///
/// The first module loaded is the target module; the rest are references
/// (shared model crates, runtime types).
#[derive(Debug, Default)]
pub struct SnapshotSession {
    target_module: String,
    types: Vec<TypeDef>,
    index: IndexMap<String, usize>,
}

impl SnapshotSession {
    /// Opens the target snapshot and every snapshot it references.
    pub fn open(path: impl AsRef<Path>) -> AppResult<Self> {
        let mut session = Self::default();
        session.load_module(path.as_ref())?;
        Ok(session)
    }

    /// Builds a session from already-parsed snapshots. The first is the target.
    pub fn from_snapshots(snapshots: Vec<ModuleSnapshot>) -> Self {
        let mut session = Self::default();
        for snapshot in snapshots {
            session.add_snapshot(snapshot);
        }
        session
    }

    /// Loads a module snapshot (and its references) into the session.
    pub fn load_module(&mut self, path: &Path) -> AppResult<()> {
        let text = fs::read_to_string(path).map_err(|e| {
            AppError::General(format!("Failed to read metadata {:?}: {}", path, e))
        })?;
        let snapshot = ModuleSnapshot::parse(&text, path)?;
        let base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        let references: Vec<PathBuf> = snapshot
            .references
            .iter()
            .map(|r| base_dir.join(r))
            .collect();

        info!(module = %snapshot.module, types = snapshot.types.len(), "Loaded metadata");
        self.add_snapshot(snapshot);

        for reference in references {
            self.load_module(&reference)?;
        }
        Ok(())
    }

    fn add_snapshot(&mut self, snapshot: ModuleSnapshot) {
        if self.target_module.is_empty() {
            self.target_module = snapshot.module.clone();
        }
        for mut ty in snapshot.types {
            if ty.module.is_empty() {
                ty.module = snapshot.module.clone();
            }
            if self.index.contains_key(&ty.name) {
                debug!(name = %ty.name, "Type already loaded, keeping first definition");
                continue;
            }
            self.index.insert(ty.name.clone(), self.types.len());
            self.types.push(ty);
        }
    }
}

impl MetadataProvider for SnapshotSession {
    fn target_module(&self) -> &str {
        &self.target_module
    }

    fn types(&self) -> &[TypeDef] {
        &self.types
    }

    fn type_by_name(&self, name: &str) -> Option<&TypeDef> {
        let idx = self.index.get(name).or_else(|| {
            let qualified = format!("{}::{}", self.target_module, name);
            self.index.get(&qualified)
        })?;
        self.types.get(*idx)
    }
}
