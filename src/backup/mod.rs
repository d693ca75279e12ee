//! Backups taken before a file is overwritten
//!
//! The first backup of `path` is `path.bak`. Later backups never replace an
//! existing one: they go to `path.<unix-timestamp>.bak`, and to
//! `path.<unix-timestamp>-<n>.bak` if several land in the same second.

use crate::env::FileEnv;
use crate::error::{IoResultExt, SetupResult};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Seconds since the unix epoch
pub type Clock = fn() -> i64;

fn system_clock() -> i64 {
    chrono::Utc::now().timestamp()
}

/// A backup that was written for a file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupRecord {
    pub original: PathBuf,
    pub backup: PathBuf,
}

/// Creates and restores file backups
#[derive(Clone)]
pub struct BackupManager {
    fs: Arc<dyn FileEnv>,
    clock: Clock,
}

impl BackupManager {
    pub fn new(fs: Arc<dyn FileEnv>) -> Self {
        Self {
            fs,
            clock: system_clock,
        }
    }

    /// Use a fixed time source instead of the system clock
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Copy `path` to the first free backup location
    pub fn backup(&self, path: &Path) -> SetupResult<BackupRecord> {
        let backup = self.next_backup_path(path);
        self.fs.copy(path, &backup).at_path(&backup)?;
        info!("Backed up {} to {}", path.display(), backup.display());

        Ok(BackupRecord {
            original: path.to_path_buf(),
            backup,
        })
    }

    /// Copy `backup` back over `path`, deleting the backup when `clean`
    ///
    /// A missing backup is a no-op. The backup path is returned either way,
    /// so callers that care must check whether it existed.
    pub fn restore(&self, path: &Path, backup: &Path, clean: bool) -> SetupResult<PathBuf> {
        if !self.fs.exists(backup) {
            debug!("No backup at {}, nothing to restore", backup.display());
            return Ok(backup.to_path_buf());
        }

        self.fs.copy(backup, path).at_path(path)?;
        info!("Restored {} from {}", path.display(), backup.display());

        if clean {
            self.fs.remove_file(backup).at_path(backup)?;
            debug!("Removed backup {}", backup.display());
        }
        Ok(backup.to_path_buf())
    }

    /// Existing backups of `path`, oldest first
    pub fn list_backups(&self, path: &Path) -> SetupResult<Vec<PathBuf>> {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            return Ok(Vec::new());
        };
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut backups: Vec<(BackupOrder, PathBuf)> = self
            .fs
            .list_files(dir)
            .at_path(dir)?
            .into_iter()
            .filter_map(|candidate| {
                let file_name = candidate.file_name()?.to_str()?;
                let order = backup_order(name, file_name)?;
                Some((order, candidate))
            })
            .collect();
        backups.sort();

        Ok(backups.into_iter().map(|(_, path)| path).collect())
    }

    fn next_backup_path(&self, path: &Path) -> PathBuf {
        let default = default_backup_path(path);
        if !self.fs.exists(&default) {
            return default;
        }

        let timestamp = (self.clock)();
        let stamped = with_suffix(path, &format!(".{timestamp}.bak"));
        if !self.fs.exists(&stamped) {
            return stamped;
        }

        (1u32..)
            .map(|n| with_suffix(path, &format!(".{timestamp}-{n}.bak")))
            .find(|candidate| !self.fs.exists(candidate))
            .unwrap_or(stamped)
    }
}

/// `path.bak`
pub fn default_backup_path(path: &Path) -> PathBuf {
    with_suffix(path, ".bak")
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}

/// Sort key for backups: the plain `.bak` first, then by timestamp and counter
type BackupOrder = (u8, i64, u32);

fn backup_order(original: &str, candidate: &str) -> Option<BackupOrder> {
    let rest = candidate.strip_prefix(original)?.strip_suffix(".bak")?;
    if rest.is_empty() {
        return Some((0, 0, 0));
    }

    let stamp = rest.strip_prefix('.')?;
    let (timestamp, counter) = match stamp.split_once('-') {
        Some((timestamp, counter)) => (timestamp, counter.parse().ok()?),
        None => (stamp, 0),
    };
    Some((1, timestamp.parse().ok()?, counter))
}
