//! Paths and options for a setup run
//!
//! [`SetupPaths`] resolves every file the setup touches from the
//! application's base directory once, up front; nothing below the
//! configurator builds paths of its own. [`SetupOptions`] carries the
//! App Engine parameters, read from an optional TOML file and overridden
//! by command-line flags.

use crate::env::FileEnv;
use crate::error::{IoResultExt, SetupError, SetupResult};
use crate::generator::DatabaseParams;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default options file name, looked up in the application's base directory
pub const OPTIONS_FILE_NAME: &str = "gae-setup.toml";

/// Resolved locations of everything a setup run reads or writes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupPaths {
    pub base_dir: PathBuf,
    pub env_file: PathBuf,
    pub env_production_file: PathBuf,
    pub env_local_file: PathBuf,
    pub bootstrap_app: PathBuf,
    pub config_dir: PathBuf,
    /// Stock config files shipped with the framework
    pub framework_config_dir: PathBuf,
    pub public_dir: PathBuf,
    pub app_yaml: PathBuf,
    pub php_ini: PathBuf,
}

impl SetupPaths {
    /// Lay out the standard Lumen project structure under `base_dir`
    pub fn from_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        let base_dir = base_dir.into();
        Self {
            env_file: base_dir.join(".env"),
            env_production_file: base_dir.join(".env.production"),
            env_local_file: base_dir.join(".env.local"),
            bootstrap_app: base_dir.join("bootstrap").join("app.php"),
            config_dir: base_dir.join("config"),
            framework_config_dir: base_dir
                .join("vendor")
                .join("laravel")
                .join("lumen-framework")
                .join("config"),
            public_dir: base_dir.join("public"),
            app_yaml: base_dir.join("app.yaml"),
            php_ini: base_dir.join("php.ini"),
            base_dir,
        }
    }

    /// An application config file, e.g. `config/queue.php`
    pub fn config_file(&self, name: &str) -> PathBuf {
        self.config_dir.join(name)
    }

    /// A stock framework config file
    pub fn framework_config_file(&self, name: &str) -> PathBuf {
        self.framework_config_dir.join(name)
    }

    /// The default options file location
    pub fn options_file(&self) -> PathBuf {
        self.base_dir.join(OPTIONS_FILE_NAME)
    }
}

/// App Engine parameters for a setup run
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SetupOptions {
    /// App Engine application id, required to generate `app.yaml`/`php.ini`
    pub app_id: Option<String>,
    /// Generate `app.yaml` and `php.ini`
    pub generate_config: bool,
    /// Cloud Storage bucket; defaults to `<app_id>.appspot.com`
    pub bucket_id: Option<String>,
    pub db_socket: Option<String>,
    pub db_name: Option<String>,
    pub db_host: Option<String>,
}

impl SetupOptions {
    /// Parse options from TOML text
    pub fn from_toml(text: &str) -> SetupResult<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Load options from a file
    pub fn load(fs: &dyn FileEnv, path: &Path) -> SetupResult<Self> {
        let text = fs.read_to_string(path).at_path(path)?;
        debug!("Loaded setup options from {}", path.display());
        Self::from_toml(&text)
    }

    /// Load `path` if given, otherwise the default options file if present
    pub fn discover(fs: &dyn FileEnv, paths: &SetupPaths, path: Option<&Path>) -> SetupResult<Self> {
        match path {
            Some(path) if !fs.exists(path) => Err(SetupError::missing_source(path)),
            Some(path) => Self::load(fs, path),
            None => {
                let default = paths.options_file();
                if fs.exists(&default) {
                    Self::load(fs, &default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Overlay `overrides` on these options; set values in `overrides` win
    pub fn merge(self, overrides: OptionOverrides) -> Self {
        Self {
            app_id: overrides.app_id.or(self.app_id),
            generate_config: overrides.generate_config.unwrap_or(self.generate_config),
            bucket_id: overrides.bucket_id.or(self.bucket_id),
            db_socket: overrides.db_socket.or(self.db_socket),
            db_name: overrides.db_name.or(self.db_name),
            db_host: overrides.db_host.or(self.db_host),
        }
    }

    /// Check the options are consistent
    pub fn validate(&self) -> SetupResult<()> {
        if self.generate_config && self.app_id.as_deref().map_or(true, str::is_empty) {
            return Err(SetupError::config(
                "an application id is required to generate app.yaml and php.ini",
            ));
        }

        let values = [
            ("app_id", &self.app_id),
            ("bucket_id", &self.bucket_id),
            ("db_socket", &self.db_socket),
            ("db_name", &self.db_name),
            ("db_host", &self.db_host),
        ];
        for (name, value) in values {
            if value.as_deref().is_some_and(|v| v.contains(['\n', '\r'])) {
                return Err(SetupError::config(format!("{name} must not contain line breaks")));
            }
        }
        Ok(())
    }

    pub fn database(&self) -> DatabaseParams {
        DatabaseParams {
            socket: self.db_socket.clone(),
            host: self.db_host.clone(),
            name: self.db_name.clone(),
        }
    }
}

/// Options given explicitly for one run; `None` keeps the loaded value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionOverrides {
    pub app_id: Option<String>,
    pub generate_config: Option<bool>,
    pub bucket_id: Option<String>,
    pub db_socket: Option<String>,
    pub db_name: Option<String>,
    pub db_host: Option<String>,
}
