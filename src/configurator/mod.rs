//! Full App Engine setup of a Lumen application
//!
//! [`Configurator::configure`] runs every step in a fixed order:
//!
//! 1. `.env.production` and `.env.local` derived from `.env`
//! 2. the application class in `bootstrap/app.php`
//! 3. `config/view.php`, `queue.php`, `database.php` and `filesystems.php`,
//!    each seeded from the framework's stock copy when missing
//! 4. `app.yaml` and `php.ini`, when asked for
//!
//! Steps are independent. A failing step is reported and recorded in the
//! [`SetupReport`], and the run moves on to the next one.

use crate::artifacts::{ArtifactWriter, SeedOutcome};
use crate::backup::{BackupManager, Clock};
use crate::config::{SetupOptions, SetupPaths};
use crate::env::FileEnv;
use crate::error::{SetupError, SetupResult};
use crate::generator::{file_label, EnvFileGenerator, EnvVariant, GenerateOutcome};
use crate::interaction::UserInteraction;
use crate::processor::{FileProcessor, ProcessOutcome};
use crate::rules::{RuleId, RuleRegistry};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Framework config files and the rules applied to each, in run order
pub const CONFIG_RULES: [(&str, &[RuleId]); 4] = [
    ("view.php", &[RuleId::ReplaceCompiledPath]),
    ("queue.php", &[RuleId::AddQueueConfig]),
    ("database.php", &[RuleId::AddCloudSqlConfig]),
    ("filesystems.php", &[RuleId::AddGaeDisk]),
];

/// What one step did to its target file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    EnvFile(GenerateOutcome),
    Seeded(SeedOutcome),
    Processed(ProcessOutcome),
    Artifact(GenerateOutcome),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupStep {
    pub target: PathBuf,
    pub outcome: StepOutcome,
}

/// Every step of a run, in execution order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SetupReport {
    steps: Vec<SetupStep>,
}

impl SetupReport {
    pub fn steps(&self) -> &[SetupStep] {
        &self.steps
    }

    pub fn failures(&self) -> impl Iterator<Item = &SetupStep> {
        self.steps
            .iter()
            .filter(|step| matches!(step.outcome, StepOutcome::Failed(_)))
    }

    pub fn has_failures(&self) -> bool {
        self.failures().next().is_some()
    }

    /// Files that were rewritten by a rule chain
    pub fn updated_files(&self) -> Vec<&Path> {
        self.steps
            .iter()
            .filter(|step| matches!(&step.outcome, StepOutcome::Processed(outcome) if outcome.is_updated()))
            .map(|step| step.target.as_path())
            .collect()
    }

    /// The recorded outcomes for `target`
    pub fn outcomes_for(&self, target: &Path) -> Vec<&StepOutcome> {
        self.steps
            .iter()
            .filter(|step| step.target == target)
            .map(|step| &step.outcome)
            .collect()
    }

    fn push(&mut self, target: &Path, outcome: StepOutcome) {
        self.steps.push(SetupStep {
            target: target.to_path_buf(),
            outcome,
        });
    }
}

/// Runs the complete setup for one application directory
pub struct Configurator {
    fs: Arc<dyn FileEnv>,
    ui: Arc<dyn UserInteraction>,
    paths: SetupPaths,
    options: SetupOptions,
    processor: FileProcessor,
    generator: EnvFileGenerator,
    artifacts: ArtifactWriter,
}

impl Configurator {
    pub fn new(
        fs: Arc<dyn FileEnv>,
        ui: Arc<dyn UserInteraction>,
        paths: SetupPaths,
        options: SetupOptions,
    ) -> Self {
        let processor = Self::build_processor(&fs, &ui, &paths, BackupManager::new(fs.clone()));
        Self {
            generator: EnvFileGenerator::new(fs.clone(), ui.clone()),
            artifacts: ArtifactWriter::new(fs.clone(), ui.clone()),
            processor,
            fs,
            ui,
            paths,
            options,
        }
    }

    /// Stamp timestamped backups with `clock` instead of the system time
    pub fn with_backup_clock(mut self, clock: Clock) -> Self {
        let backups = BackupManager::new(self.fs.clone()).with_clock(clock);
        self.processor = Self::build_processor(&self.fs, &self.ui, &self.paths, backups);
        self
    }

    fn build_processor(
        fs: &Arc<dyn FileEnv>,
        ui: &Arc<dyn UserInteraction>,
        paths: &SetupPaths,
        backups: BackupManager,
    ) -> FileProcessor {
        FileProcessor::new(fs.clone(), backups, RuleRegistry::builtin(), ui.clone())
            .with_display_root(&paths.base_dir)
    }

    /// Run every setup step
    ///
    /// Fails up front only when the options are inconsistent. Per-file
    /// failures end up in the report.
    pub fn configure(&self) -> SetupResult<SetupReport> {
        self.options.validate()?;
        info!("Configuring {} for App Engine", self.paths.base_dir.display());

        let mut report = SetupReport::default();
        self.generate_env_files(&mut report);

        self.run_step(&mut report, &self.paths.bootstrap_app, || {
            self.processor
                .process(&self.paths.bootstrap_app, &[RuleId::ReplaceAppClass])
                .map(StepOutcome::Processed)
        });

        for (name, chain) in CONFIG_RULES {
            self.configure_framework_file(&mut report, name, chain);
        }

        if self.options.generate_config {
            self.generate_artifacts(&mut report)?;
        }

        debug!(
            "Setup finished with {} step(s), {} failed",
            report.steps().len(),
            report.failures().count()
        );
        Ok(report)
    }

    fn generate_env_files(&self, report: &mut SetupReport) {
        let db = self.options.database();
        let targets = [
            (EnvVariant::Production, &self.paths.env_production_file),
            (EnvVariant::Local, &self.paths.env_local_file),
        ];
        for (variant, dest) in targets {
            self.run_step(report, dest, || {
                self.generator
                    .generate(&self.paths.env_file, dest, variant, &db)
                    .map(StepOutcome::EnvFile)
            });
        }
    }

    fn configure_framework_file(&self, report: &mut SetupReport, name: &str, chain: &[RuleId]) {
        let target = self.paths.config_file(name);
        self.run_step(report, &target, || {
            self.artifacts
                .seed_framework_config(&self.paths, name)
                .map(StepOutcome::Seeded)
        });

        if !self.fs.exists(&target) {
            debug!("Skipping rules for missing {}", target.display());
            return;
        }
        self.run_step(report, &target, || {
            self.processor.process(&target, chain).map(StepOutcome::Processed)
        });
    }

    fn generate_artifacts(&self, report: &mut SetupReport) -> SetupResult<()> {
        let app_id = self
            .options
            .app_id
            .as_deref()
            .ok_or_else(|| SetupError::config("an application id is required"))?;

        self.run_step(report, &self.paths.app_yaml, || {
            self.artifacts
                .generate_app_yaml(app_id, &self.paths.app_yaml, &self.paths.public_dir)
                .map(StepOutcome::Artifact)
        });
        self.run_step(report, &self.paths.php_ini, || {
            self.artifacts
                .generate_php_ini(app_id, self.options.bucket_id.as_deref(), &self.paths.php_ini)
                .map(StepOutcome::Artifact)
        });
        Ok(())
    }

    fn run_step<F>(&self, report: &mut SetupReport, target: &Path, step: F)
    where
        F: FnOnce() -> SetupResult<StepOutcome>,
    {
        let outcome = match step() {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!("Setup step for {} failed: {}", target.display(), err);
                self.ui.display_error(&format!(
                    "Failed to update the \"{}\" file: {}",
                    file_label(target),
                    err
                ));
                StepOutcome::Failed(err.to_string())
            }
        };
        report.push(target, outcome);
    }
}
