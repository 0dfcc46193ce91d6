//! Definition store: loads issue definitions from a directory tree.
//!
//! Every `*.yaml` / `*.yml` file below the root holds one definition:
//!
//! ```text
//! <root>/
//!   ├── ops/
//!   │   ├── backup-rotation.yaml
//!   │   └── patching.yaml
//!   └── security/
//!       └── access-review.yaml
//! ```
//!
//! Files are loaded in sorted path order so runs are reproducible.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{info, warn};

use crate::definition::IssueDefinition;
use crate::ports::FileSystem;

/// Errors that make the definition set unloadable.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The issues directory does not exist.
    #[error("issues directory {0} does not exist")]
    MissingRoot(PathBuf),

    /// The directory tree could not be listed.
    #[error("failed to list issues directory {path}: {message}")]
    List {
        /// Directory being listed.
        path: PathBuf,
        /// Underlying error.
        message: String,
    },

    /// A definition file could not be read.
    #[error("failed to read definition {path}: {message}")]
    Read {
        /// File being read.
        path: PathBuf,
        /// Underlying error.
        message: String,
    },

    /// A definition file is not a valid definition document.
    #[error("failed to parse definition {path}: {message}")]
    Parse {
        /// File being parsed.
        path: PathBuf,
        /// Underlying error.
        message: String,
    },
}

/// Read-only access to the definition files under one root.
pub struct DefinitionStore<'a> {
    fs: &'a dyn FileSystem,
    root: PathBuf,
}

impl<'a> DefinitionStore<'a> {
    /// Creates a new store rooted at the given path.
    #[must_use]
    pub fn new(fs: &'a dyn FileSystem, root: &Path) -> Self {
        Self { fs, root: root.to_path_buf() }
    }

    /// Root directory of the store.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Lists definition file paths in sorted order.
    ///
    /// # Errors
    ///
    /// Returns an error if the root is missing or cannot be listed.
    pub fn list_definition_files(&self) -> Result<Vec<PathBuf>, StoreError> {
        if !self.fs.exists(&self.root) {
            return Err(StoreError::MissingRoot(self.root.clone()));
        }
        let mut files: Vec<PathBuf> = self
            .fs
            .list_files_recursive(&self.root)
            .map_err(|e| StoreError::List { path: self.root.clone(), message: e.to_string() })?
            .into_iter()
            .filter(|p| is_definition_file(p))
            .collect();
        files.sort();
        Ok(files)
    }

    /// Loads every definition in the store.
    ///
    /// A definition whose date rule is unrecognized still loads; it is
    /// logged here and never matches.
    ///
    /// # Errors
    ///
    /// Returns an error if any file cannot be listed, read or parsed.
    pub fn load_all(&self) -> Result<Vec<IssueDefinition>, StoreError> {
        info!(root = %self.root.display(), "Reading issues directory");
        let files = self.list_definition_files()?;

        let mut definitions = Vec::with_capacity(files.len());
        for path in files {
            let definition = self.load_file(&path)?;
            if let Err(reason) = &definition.rule {
                warn!(file = %path.display(), %reason, "date rule rejected; definition will never match");
            }
            if definition.project.is_empty() {
                warn!(file = %path.display(), "definition has no project");
            }
            definitions.push(definition);
        }

        info!(count = definitions.len(), "Found {} issues", definitions.len());
        Ok(definitions)
    }

    fn load_file(&self, path: &Path) -> Result<IssueDefinition, StoreError> {
        let contents = self
            .fs
            .read_to_string(path)
            .map_err(|e| StoreError::Read { path: path.to_path_buf(), message: e.to_string() })?;
        IssueDefinition::from_yaml(&contents)
            .map_err(|e| StoreError::Parse { path: path.to_path_buf(), message: e.to_string() })
    }
}

fn is_definition_file(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()).is_some_and(|e| e == "yaml" || e == "yml")
}
