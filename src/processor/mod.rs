//! Apply a rule chain to one file
//!
//! [`FileProcessor::process`] reads the file, folds the chain over its
//! text and only when the result differs backs up the original and writes
//! the new text. An unchanged result has no side effects at all.

use crate::backup::{BackupManager, BackupRecord};
use crate::env::FileEnv;
use crate::error::{IoResultExt, SetupResult};
use crate::interaction::UserInteraction;
use crate::rules::{RuleId, RuleRegistry};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Result of processing one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessOutcome {
    /// No rule changed the text; nothing was written
    Unchanged,
    /// The file was rewritten after backing up the original
    Updated {
        backup: BackupRecord,
        fired: Vec<RuleId>,
    },
}

impl ProcessOutcome {
    pub fn is_updated(&self) -> bool {
        matches!(self, ProcessOutcome::Updated { .. })
    }
}

/// A file's text before and after a rule chain
#[derive(Debug, Clone)]
pub struct FileEditSession {
    pub path: PathBuf,
    pub original: String,
    pub processed: String,
    pub fired: Vec<RuleId>,
}

impl FileEditSession {
    /// Read the file and start with no edits applied
    pub fn open(fs: &dyn FileEnv, path: &Path) -> SetupResult<Self> {
        let original = fs.read_to_string(path).at_path(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            processed: original.clone(),
            original,
            fired: Vec::new(),
        })
    }

    /// Run a chain over the current text
    pub fn run(&mut self, registry: &RuleRegistry, chain: &[RuleId]) -> SetupResult<()> {
        let (processed, fired) = registry.apply_chain(&self.processed, chain)?;
        self.processed = processed;
        self.fired.extend(fired);
        Ok(())
    }

    pub fn is_changed(&self) -> bool {
        self.processed != self.original
    }
}

/// Orchestrates read, transform, backup and write for single files
pub struct FileProcessor {
    fs: Arc<dyn FileEnv>,
    backups: BackupManager,
    registry: RuleRegistry,
    ui: Arc<dyn UserInteraction>,
    display_root: Option<PathBuf>,
}

impl FileProcessor {
    pub fn new(
        fs: Arc<dyn FileEnv>,
        backups: BackupManager,
        registry: RuleRegistry,
        ui: Arc<dyn UserInteraction>,
    ) -> Self {
        Self {
            fs,
            backups,
            registry,
            ui,
            display_root: None,
        }
    }

    /// Name files relative to `root` in user-facing notices
    pub fn with_display_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.display_root = Some(root.into());
        self
    }

    /// Apply `chain` to the file at `path`
    pub fn process(&self, path: &Path, chain: &[RuleId]) -> SetupResult<ProcessOutcome> {
        let mut session = FileEditSession::open(self.fs.as_ref(), path)?;
        session.run(&self.registry, chain)?;

        if !session.is_changed() {
            debug!("No changes needed for {}", path.display());
            return Ok(ProcessOutcome::Unchanged);
        }

        let backup = self.backups.backup(path)?;
        self.fs.write(path, &session.processed).at_path(path)?;
        info!(
            "Rewrote {} ({} rule(s) applied)",
            path.display(),
            session.fired.len()
        );

        let shown = self.display_name(path);
        for id in &session.fired {
            if let Some(rule) = self.registry.get(*id) {
                self.ui
                    .display_info(&format!("{} in \"{}\".", rule.summary, shown));
            }
        }

        Ok(ProcessOutcome::Updated {
            backup,
            fired: session.fired,
        })
    }

    fn display_name(&self, path: &Path) -> String {
        self.display_root
            .as_deref()
            .and_then(|root| path.strip_prefix(root).ok())
            .unwrap_or(path)
            .display()
            .to_string()
    }
}
