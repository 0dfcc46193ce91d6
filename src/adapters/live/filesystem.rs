//! Live filesystem adapter using `std::fs` and `walkdir`.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::ports::filesystem::FileSystem;

/// Live filesystem adapter backed by real disk I/O.
pub struct LiveFileSystem;

impl FileSystem for LiveFileSystem {
    fn read_to_string(
        &self,
        path: &Path,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        Ok(std::fs::read_to_string(path)?)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn list_files_recursive(
        &self,
        root: &Path,
    ) -> Result<Vec<PathBuf>, Box<dyn std::error::Error + Send + Sync>> {
        let mut files = Vec::new();
        for entry in WalkDir::new(root).follow_links(true) {
            let entry = entry?;
            if entry.file_type().is_file() {
                files.push(entry.into_path());
            }
        }
        files.sort();
        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_nested_files() {
        let dir = std::env::temp_dir().join("issuegen_live_fs_test");
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(dir.join("ops")).unwrap();
        std::fs::write(dir.join("top.yaml"), "a").unwrap();
        std::fs::write(dir.join("ops").join("nested.yaml"), "b").unwrap();

        let fs = LiveFileSystem;
        let files = fs.list_files_recursive(&dir).unwrap();
        assert_eq!(files, vec![dir.join("ops").join("nested.yaml"), dir.join("top.yaml")]);
        assert_eq!(fs.read_to_string(&dir.join("top.yaml")).unwrap(), "a");
        assert!(fs.exists(&dir));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[cfg(unix)]
    #[test]
    fn follows_symlinked_directories() {
        let base = std::env::temp_dir().join("issuegen_live_fs_symlink_test");
        let _ = std::fs::remove_dir_all(&base);
        let shared = base.join("shared");
        let root = base.join("issues");
        std::fs::create_dir_all(&shared).unwrap();
        std::fs::create_dir_all(&root).unwrap();
        std::fs::write(shared.join("linked.yaml"), "c").unwrap();
        std::os::unix::fs::symlink(&shared, root.join("ops")).unwrap();

        let files = LiveFileSystem.list_files_recursive(&root).unwrap();
        assert_eq!(files, vec![root.join("ops").join("linked.yaml")]);

        let _ = std::fs::remove_dir_all(&base);
    }

    #[test]
    fn missing_directory_errors() {
        let fs = LiveFileSystem;
        let missing = std::env::temp_dir().join("issuegen_definitely_missing_dir");
        assert!(!fs.exists(&missing));
        assert!(fs.list_files_recursive(&missing).is_err());
    }
}
