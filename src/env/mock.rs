//! In-memory filesystem for testing
//!
//! Files live in a map keyed by path. Directories are implicit parents of
//! files, plus any added explicitly with [`MockFileEnv::add_dir`].

use super::traits::FileEnv;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Mock file system for testing
///
/// # Examples
///
/// ```
/// use gae_setup::env::{FileEnv, MockFileEnv};
/// use std::path::Path;
///
/// let env = MockFileEnv::new();
/// env.add_file("/app/config/view.php", "<?php");
///
/// assert!(env.is_dir(Path::new("/app/config")));
/// assert_eq!(env.read_to_string(Path::new("/app/config/view.php")).unwrap(), "<?php");
/// ```
#[derive(Debug, Clone)]
pub struct MockFileEnv {
    files: Arc<Mutex<HashMap<PathBuf, String>>>,
    dirs: Arc<Mutex<HashSet<PathBuf>>>,
    failing_writes: Arc<Mutex<HashSet<PathBuf>>>,
}

impl MockFileEnv {
    pub fn new() -> Self {
        Self {
            files: Arc::new(Mutex::new(HashMap::new())),
            dirs: Arc::new(Mutex::new(HashSet::new())),
            failing_writes: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    /// Add a file to the mock file system
    pub fn add_file(&self, path: impl Into<PathBuf>, content: impl Into<String>) {
        self.files
            .lock()
            .unwrap()
            .insert(path.into(), content.into());
    }

    /// Add an (empty) directory to the mock file system
    pub fn add_dir(&self, path: impl Into<PathBuf>) {
        self.dirs.lock().unwrap().insert(path.into());
    }

    /// Make every write or copy targeting `path` fail
    pub fn fail_writes_to(&self, path: impl Into<PathBuf>) {
        self.failing_writes.lock().unwrap().insert(path.into());
    }

    /// Content of a file, if present
    pub fn file(&self, path: impl AsRef<Path>) -> Option<String> {
        self.files.lock().unwrap().get(path.as_ref()).cloned()
    }

    /// Get all files in the mock file system
    pub fn files(&self) -> HashMap<PathBuf, String> {
        self.files.lock().unwrap().clone()
    }

    fn not_found(path: &Path) -> std::io::Error {
        std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("File not found: {}", path.display()),
        )
    }

    fn check_writable(&self, path: &Path) -> std::io::Result<()> {
        if self.failing_writes.lock().unwrap().contains(path) {
            return Err(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                format!("Write denied: {}", path.display()),
            ));
        }
        Ok(())
    }

    fn children(&self, path: &Path, want_dirs: bool) -> BTreeSet<PathBuf> {
        let files = self.files.lock().unwrap();
        let dirs = self.dirs.lock().unwrap();

        let mut children = BTreeSet::new();
        if want_dirs {
            let ancestors = files
                .keys()
                .flat_map(|file| file.ancestors().skip(1))
                .chain(dirs.iter().flat_map(|dir| dir.ancestors()));
            for dir in ancestors {
                if dir.parent() == Some(path) {
                    children.insert(dir.to_path_buf());
                }
            }
        } else {
            for file in files.keys() {
                if file.parent() == Some(path) {
                    children.insert(file.clone());
                }
            }
        }
        children
    }
}

impl Default for MockFileEnv {
    fn default() -> Self {
        Self::new()
    }
}

impl FileEnv for MockFileEnv {
    fn read_to_string(&self, path: &Path) -> std::io::Result<String> {
        self.files
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| Self::not_found(path))
    }

    fn write(&self, path: &Path, content: &str) -> std::io::Result<()> {
        self.check_writable(path)?;
        self.files
            .lock()
            .unwrap()
            .insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        let is_file = self.files.lock().unwrap().contains_key(path);
        is_file || self.is_dir(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        let in_dirs = self
            .dirs
            .lock()
            .unwrap()
            .iter()
            .any(|dir| dir.starts_with(path));
        in_dirs
            || self
                .files
                .lock()
                .unwrap()
                .keys()
                .any(|file| file != path && file.starts_with(path))
    }

    fn copy(&self, from: &Path, to: &Path) -> std::io::Result<()> {
        let content = self.read_to_string(from)?;
        self.write(to, &content)
    }

    fn remove_file(&self, path: &Path) -> std::io::Result<()> {
        self.files
            .lock()
            .unwrap()
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| Self::not_found(path))
    }

    fn create_dir_all(&self, path: &Path) -> std::io::Result<()> {
        self.add_dir(path);
        Ok(())
    }

    fn list_dirs(&self, path: &Path) -> std::io::Result<Vec<PathBuf>> {
        if !self.is_dir(path) {
            return Err(Self::not_found(path));
        }
        Ok(self.children(path, true).into_iter().collect())
    }

    fn list_files(&self, path: &Path) -> std::io::Result<Vec<PathBuf>> {
        if !self.is_dir(path) {
            return Err(Self::not_found(path));
        }
        Ok(self.children(path, false).into_iter().collect())
    }
}
