//! Real filesystem implementation used in production

use super::traits::FileEnv;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Real file system implementation
///
/// Delegates to `std::fs`. Writes go to a temp file next to the target and
/// are renamed over it, so the target is either the old or the new content.
#[derive(Debug, Clone, Default)]
pub struct RealFileEnv;

impl RealFileEnv {
    pub fn new() -> Self {
        Self
    }

    fn entries(path: &Path, want_dirs: bool) -> std::io::Result<Vec<PathBuf>> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(path)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() == want_dirs {
                entries.push(entry.path());
            }
        }
        entries.sort();
        Ok(entries)
    }
}

impl FileEnv for RealFileEnv {
    fn read_to_string(&self, path: &Path) -> std::io::Result<String> {
        fs::read_to_string(path)
    }

    fn write(&self, path: &Path, content: &str) -> std::io::Result<()> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let permissions = fs::metadata(path).map(|m| m.permissions()).ok();

        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.as_file().sync_all()?;
        if let Some(permissions) = permissions {
            fs::set_permissions(tmp.path(), permissions)?;
        }

        tmp.persist(path).map_err(|e| e.error)?;
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn copy(&self, from: &Path, to: &Path) -> std::io::Result<()> {
        fs::copy(from, to).map(|_| ())
    }

    fn remove_file(&self, path: &Path) -> std::io::Result<()> {
        fs::remove_file(path)
    }

    fn create_dir_all(&self, path: &Path) -> std::io::Result<()> {
        fs::create_dir_all(path)
    }

    fn list_dirs(&self, path: &Path) -> std::io::Result<Vec<PathBuf>> {
        Self::entries(path, true)
    }

    fn list_files(&self, path: &Path) -> std::io::Result<Vec<PathBuf>> {
        Self::entries(path, false)
    }
}
