//! App Engine deployment files and stock framework config
//!
//! - `app.yaml` and `php.ini` are rendered from fixed templates and written
//!   after the usual overwrite confirmation.
//! - Framework config files (`config/queue.php`, ...) are copied from the
//!   framework's vendor directory when the application has none, so the
//!   rules have something to patch.

pub mod templates;

pub use templates::{render_app_yaml, render_php_ini, storage_bucket};

use crate::config::SetupPaths;
use crate::env::FileEnv;
use crate::error::{IoResultExt, SetupResult};
use crate::generator::{confirm_overwrite, file_label, GenerateOutcome};
use crate::interaction::UserInteraction;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// Result of seeding a framework config file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    Copied,
    AlreadyPresent,
    /// The framework does not ship the file; reported to the user
    MissingSource,
}

/// Writes deployment files and seeds framework config
pub struct ArtifactWriter {
    fs: Arc<dyn FileEnv>,
    ui: Arc<dyn UserInteraction>,
}

impl ArtifactWriter {
    pub fn new(fs: Arc<dyn FileEnv>, ui: Arc<dyn UserInteraction>) -> Self {
        Self { fs, ui }
    }

    /// Write `app.yaml` for `app_id`, mapping each directory of `public_dir`
    pub fn generate_app_yaml(
        &self,
        app_id: &str,
        dest: &Path,
        public_dir: &Path,
    ) -> SetupResult<GenerateOutcome> {
        if !confirm_overwrite(self.fs.as_ref(), self.ui.as_ref(), dest) {
            return Ok(GenerateOutcome::Declined);
        }

        let static_dirs = self.static_dirs(public_dir)?;
        self.fs
            .write(dest, &render_app_yaml(app_id, &static_dirs))
            .at_path(dest)?;

        info!(
            "Wrote {} with {} static dir(s)",
            dest.display(),
            static_dirs.len()
        );
        self.ui
            .display_info(&format!("Generated the \"{}\" file.", file_label(dest)));
        Ok(GenerateOutcome::Created(dest.to_path_buf()))
    }

    /// Write `php.ini`, allowing includes from the app's storage bucket
    pub fn generate_php_ini(
        &self,
        app_id: &str,
        bucket_id: Option<&str>,
        dest: &Path,
    ) -> SetupResult<GenerateOutcome> {
        if !confirm_overwrite(self.fs.as_ref(), self.ui.as_ref(), dest) {
            return Ok(GenerateOutcome::Declined);
        }

        let bucket = storage_bucket(app_id, bucket_id);
        self.fs.write(dest, &render_php_ini(&bucket)).at_path(dest)?;

        info!("Wrote {} for bucket {}", dest.display(), bucket);
        self.ui
            .display_info(&format!("Generated the \"{}\" file.", file_label(dest)));
        Ok(GenerateOutcome::Created(dest.to_path_buf()))
    }

    /// Copy the framework's stock `name` config into the app if it has none
    pub fn seed_framework_config(&self, paths: &SetupPaths, name: &str) -> SetupResult<SeedOutcome> {
        let target = paths.config_file(name);
        if self.fs.exists(&target) {
            debug!("{} already present", target.display());
            return Ok(SeedOutcome::AlreadyPresent);
        }

        let stock = paths.framework_config_file(name);
        if !self.fs.exists(&stock) {
            self.ui.display_error(&format!(
                "Cannot find the framework's \"{}\" config file at {}.",
                name,
                stock.display()
            ));
            return Ok(SeedOutcome::MissingSource);
        }

        if !self.fs.exists(&paths.config_dir) {
            self.fs
                .create_dir_all(&paths.config_dir)
                .at_path(&paths.config_dir)?;
        }
        self.fs.copy(&stock, &target).at_path(&target)?;

        self.ui.display_info(&format!(
            "Copied {} file to {}.",
            stock.display(),
            target.display()
        ));
        Ok(SeedOutcome::Copied)
    }

    fn static_dirs(&self, public_dir: &Path) -> SetupResult<Vec<String>> {
        if !self.fs.is_dir(public_dir) {
            self.ui.display_warning(&format!(
                "No public directory at {}; app.yaml will have no static handlers.",
                public_dir.display()
            ));
            return Ok(Vec::new());
        }

        let mut dirs: Vec<String> = self
            .fs
            .list_dirs(public_dir)
            .at_path(public_dir)?
            .iter()
            .filter_map(|dir| dir.file_name())
            .map(|name| name.to_string_lossy().into_owned())
            .collect();
        dirs.sort();
        Ok(dirs)
    }
}
