//! Filesystem trait definition

use std::path::{Path, PathBuf};

/// File system operations trait
///
/// Abstracts all file system interactions to enable testing with mock implementations.
///
/// # Examples
///
/// ```
/// use gae_setup::env::FileEnv;
/// use std::path::Path;
///
/// fn read_env<E: FileEnv + ?Sized>(env: &E, path: &Path) -> Result<String, std::io::Error> {
///     env.read_to_string(path)
/// }
/// ```
pub trait FileEnv: Send + Sync {
    /// Read a file's contents as a string
    fn read_to_string(&self, path: &Path) -> std::io::Result<String>;

    /// Replace a file's contents
    ///
    /// Implementations must not leave a truncated file behind when the
    /// write fails part way.
    fn write(&self, path: &Path, content: &str) -> std::io::Result<()>;

    /// Check if a path exists
    fn exists(&self, path: &Path) -> bool;

    /// Check if a path is a directory
    fn is_dir(&self, path: &Path) -> bool;

    /// Copy a file, replacing the destination
    fn copy(&self, from: &Path, to: &Path) -> std::io::Result<()>;

    /// Remove a file
    fn remove_file(&self, path: &Path) -> std::io::Result<()>;

    /// Create a directory (and all parent directories)
    fn create_dir_all(&self, path: &Path) -> std::io::Result<()>;

    /// Immediate subdirectories of a directory
    fn list_dirs(&self, path: &Path) -> std::io::Result<Vec<PathBuf>>;

    /// Immediate files of a directory
    fn list_files(&self, path: &Path) -> std::io::Result<Vec<PathBuf>>;
}
