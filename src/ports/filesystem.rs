//! Filesystem port for reading the definition store.

use std::path::{Path, PathBuf};

/// Provides read access to definition files.
///
/// Abstracting the filesystem allows the store to be tested without
/// touching the real disk.
pub trait FileSystem: Send + Sync {
    /// Reads the entire contents of a file as a UTF-8 string.
    ///
    /// # Errors
    ///
    /// Returns an error if the file does not exist or is not valid UTF-8.
    fn read_to_string(&self, path: &Path)
        -> Result<String, Box<dyn std::error::Error + Send + Sync>>;

    /// Returns `true` if the path exists on the filesystem.
    fn exists(&self, path: &Path) -> bool;

    /// Lists every file below `root`, recursing into subdirectories.
    ///
    /// # Errors
    ///
    /// Returns an error if `root` or any subdirectory cannot be read.
    fn list_files_recursive(
        &self,
        root: &Path,
    ) -> Result<Vec<PathBuf>, Box<dyn std::error::Error + Send + Sync>>;
}
