//! Command routing and execution
//!
//! This module handles routing CLI commands to their respective implementations.

use crate::backup::{default_backup_path, BackupManager};
use crate::cli::args::{Commands, ConfigureArgs};
use crate::config::{SetupOptions, SetupPaths};
use crate::configurator::Configurator;
use crate::env::{FileEnv, RealFileEnv};
use crate::interaction::{DefaultUserInteraction, UserInteraction};
use crate::processor::{FileProcessor, ProcessOutcome};
use crate::rules::{RuleId, RuleRegistry};
use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Execute a CLI command based on the parsed arguments
pub fn execute_command(command: Commands) -> Result<()> {
    let fs: Arc<dyn FileEnv> = Arc::new(RealFileEnv::new());
    match command {
        Commands::Configure(args) => run_configure(fs, args),
        Commands::Process { file, rules } => run_process(fs, &file, &rules),
        Commands::Restore { file, backup, keep } => run_restore(fs, &file, backup, keep),
        Commands::Backups { file } => run_list_backups(fs, &file),
    }
}

fn run_configure(fs: Arc<dyn FileEnv>, args: ConfigureArgs) -> Result<()> {
    let base_dir = match &args.path {
        Some(path) => path.clone(),
        None => std::env::current_dir().context("Failed to determine the current directory")?,
    };
    if !fs.is_dir(&base_dir) {
        bail!("Application directory {} does not exist", base_dir.display());
    }

    let paths = SetupPaths::from_base_dir(base_dir);
    let options = SetupOptions::discover(fs.as_ref(), &paths, args.config.as_deref())?
        .merge(args.options());
    debug!("Effective setup options: {:?}", options);

    let ui: Arc<dyn UserInteraction> = if args.auto_accept {
        Arc::new(DefaultUserInteraction::auto_accept())
    } else {
        Arc::new(DefaultUserInteraction::new())
    };

    let report = Configurator::new(fs, ui, paths, options).configure()?;
    let failed = report.failures().count();
    if failed > 0 {
        bail!("Setup finished with {failed} failed step(s)");
    }
    Ok(())
}

fn run_process(fs: Arc<dyn FileEnv>, file: &Path, rules: &[RuleId]) -> Result<()> {
    let ui: Arc<dyn UserInteraction> = Arc::new(DefaultUserInteraction::new());
    let processor = FileProcessor::new(
        fs.clone(),
        BackupManager::new(fs),
        RuleRegistry::builtin(),
        ui.clone(),
    );

    match processor.process(file, rules)? {
        ProcessOutcome::Unchanged => {
            ui.display_info(&format!("No changes needed in \"{}\".", file.display()));
        }
        ProcessOutcome::Updated { backup, .. } => {
            debug!("Original saved to {}", backup.backup.display());
        }
    }
    Ok(())
}

fn run_restore(fs: Arc<dyn FileEnv>, file: &Path, backup: Option<PathBuf>, keep: bool) -> Result<()> {
    let ui = DefaultUserInteraction::new();
    let backup = backup.unwrap_or_else(|| default_backup_path(file));
    if !fs.exists(&backup) {
        ui.display_warning(&format!(
            "No backup at {}; \"{}\" left as is.",
            backup.display(),
            file.display()
        ));
        return Ok(());
    }

    BackupManager::new(fs).restore(file, &backup, !keep)?;
    ui.display_info(&format!(
        "Restored \"{}\" from {}.",
        file.display(),
        backup.display()
    ));
    Ok(())
}

fn run_list_backups(fs: Arc<dyn FileEnv>, file: &Path) -> Result<()> {
    let backups = BackupManager::new(fs).list_backups(file)?;
    if backups.is_empty() {
        DefaultUserInteraction::new()
            .display_info(&format!("No backups of \"{}\".", file.display()));
    }
    for backup in backups {
        println!("{}", backup.display());
    }
    Ok(())
}
