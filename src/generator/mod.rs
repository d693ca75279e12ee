//! Derived env files for production and local App Engine runs
//!
//! A derived file is the base `.env` with a fixed overlay assigned on top.
//! The Cloud SQL block is only added when both its connection parameter
//! (socket for production, host for local) and the database name are set.

use crate::env::FileEnv;
use crate::error::SetupResult;
use crate::interaction::UserInteraction;
use crate::store::EnvFile;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Which derived env file to build
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvVariant {
    Production,
    Local,
}

impl EnvVariant {
    /// Conventional file name of the derived file
    pub fn file_name(self) -> &'static str {
        match self {
            EnvVariant::Production => ".env.production",
            EnvVariant::Local => ".env.local",
        }
    }
}

/// Cloud SQL connection parameters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DatabaseParams {
    /// Unix socket, e.g. `/cloudsql/project:instance`
    pub socket: Option<String>,
    /// IPv4 address for connecting from outside App Engine
    pub host: Option<String>,
    pub name: Option<String>,
}

/// Key/value pairs assigned over the base file for `variant`
pub fn overlay(variant: EnvVariant, db: &DatabaseParams) -> Vec<(&'static str, String)> {
    let mut pairs: Vec<(&'static str, String)> = match variant {
        EnvVariant::Production => vec![
            ("APP_ENV", "production".into()),
            ("APP_DEBUG", "false".into()),
            ("CACHE_DRIVER", "memcached".into()),
            ("SESSION_DRIVER", "memcached".into()),
            ("MAIL_DRIVER", "gae".into()),
            ("QUEUE_DRIVER", "gae".into()),
            ("FILESYSTEM", "gae".into()),
        ],
        EnvVariant::Local => vec![
            ("APP_ENV", "local".into()),
            ("APP_DEBUG", "true".into()),
            ("CACHE_DRIVER", "file".into()),
            ("SESSION_DRIVER", "file".into()),
        ],
    };

    let cloud_sql = match variant {
        EnvVariant::Production => db.socket.as_ref().zip(db.name.as_ref()).map(|(socket, name)| {
            [
                ("CLOUD_SQL_SOCKET", socket.clone()),
                ("CLOUD_SQL_HOST", String::new()),
                ("CLOUD_SQL_DATABASE", name.clone()),
                ("CLOUD_SQL_USERNAME", "root".into()),
                ("CLOUD_SQL_PASSWORD", String::new()),
            ]
        }),
        EnvVariant::Local => db.host.as_ref().zip(db.name.as_ref()).map(|(host, name)| {
            [
                ("CLOUD_SQL_SOCKET", String::new()),
                ("CLOUD_SQL_HOST", host.clone()),
                ("CLOUD_SQL_DATABASE", name.clone()),
                ("CLOUD_SQL_USERNAME", "root".into()),
                ("CLOUD_SQL_PASSWORD", "password".into()),
            ]
        }),
    };

    if let Some(block) = cloud_sql {
        pairs.push(("DB_CONNECTION", "cloudsql".into()));
        pairs.extend(block);
    }
    pairs
}

/// Result of generating a derived env file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerateOutcome {
    Created(PathBuf),
    /// The destination exists and the user chose to keep it
    Declined,
    /// The base file does not exist; reported to the user
    MissingSource,
}

/// Builds derived env files from a base env file
pub struct EnvFileGenerator {
    fs: Arc<dyn FileEnv>,
    ui: Arc<dyn UserInteraction>,
}

impl EnvFileGenerator {
    pub fn new(fs: Arc<dyn FileEnv>, ui: Arc<dyn UserInteraction>) -> Self {
        Self { fs, ui }
    }

    /// Write `dest` as `base` plus the overlay for `variant`
    pub fn generate(
        &self,
        base: &Path,
        dest: &Path,
        variant: EnvVariant,
        db: &DatabaseParams,
    ) -> SetupResult<GenerateOutcome> {
        if !self.fs.exists(base) {
            self.ui.display_error(&format!(
                "Cannot find \"{}\" file to import the existing options.",
                file_label(base)
            ));
            return Ok(GenerateOutcome::MissingSource);
        }

        if !confirm_overwrite(self.fs.as_ref(), self.ui.as_ref(), dest) {
            return Ok(GenerateOutcome::Declined);
        }

        let mut env = EnvFile::load(self.fs.as_ref(), base)?;
        env.apply(overlay(variant, db))?;
        env.save(self.fs.as_ref(), dest)?;

        info!("Generated {:?} env file at {}", variant, dest.display());
        self.ui
            .display_info(&format!("Created the \"{}\" file.", file_label(dest)));
        Ok(GenerateOutcome::Created(dest.to_path_buf()))
    }
}

/// Ask before replacing an existing file; a missing file needs no consent
pub(crate) fn confirm_overwrite(fs: &dyn FileEnv, ui: &dyn UserInteraction, dest: &Path) -> bool {
    if !fs.exists(dest) {
        return true;
    }
    let question = format!("Overwrite the existing \"{}\" file?", file_label(dest));
    let overwrite = ui.confirm(&question, false);
    if !overwrite {
        debug!("Kept existing {}", dest.display());
    }
    overwrite
}

pub(crate) fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::MockFileEnv;
    use crate::interaction::MockUserInteraction;

    const CLOUD_SQL_KEYS: [&str; 5] = [
        "CLOUD_SQL_SOCKET",
        "CLOUD_SQL_HOST",
        "CLOUD_SQL_DATABASE",
        "CLOUD_SQL_USERNAME",
        "CLOUD_SQL_PASSWORD",
    ];

    fn setup(base: Option<&str>) -> (MockFileEnv, Arc<MockUserInteraction>, EnvFileGenerator) {
        let fs = MockFileEnv::new();
        if let Some(content) = base {
            fs.add_file("/app/.env", content);
        }
        let ui = Arc::new(MockUserInteraction::new());
        let generator = EnvFileGenerator::new(Arc::new(fs.clone()), ui.clone());
        (fs, ui, generator)
    }

    fn generated(fs: &MockFileEnv, path: &str) -> EnvFile {
        EnvFile::parse(&fs.file(path).unwrap())
    }

    #[test]
    fn test_production_without_database() {
        let (fs, ui, generator) = setup(Some("APP_ENV=local\nAPP_DEBUG=true\n"));

        let outcome = generator
            .generate(
                Path::new("/app/.env"),
                Path::new("/app/.env.production"),
                EnvVariant::Production,
                &DatabaseParams::default(),
            )
            .unwrap();

        assert_eq!(
            outcome,
            GenerateOutcome::Created(PathBuf::from("/app/.env.production"))
        );
        let env = generated(&fs, "/app/.env.production");
        assert_eq!(env.get("APP_ENV"), Some("production"));
        assert_eq!(env.get("APP_DEBUG"), Some("false"));
        assert_eq!(env.get("CACHE_DRIVER"), Some("memcached"));
        assert_eq!(env.get("SESSION_DRIVER"), Some("memcached"));
        assert_eq!(env.get("MAIL_DRIVER"), Some("gae"));
        assert_eq!(env.get("QUEUE_DRIVER"), Some("gae"));
        assert_eq!(env.get("FILESYSTEM"), Some("gae"));
        assert!(env.keys().all(|key| !key.starts_with("CLOUD_SQL_")));
        assert!(!env.contains_key("DB_CONNECTION"));
        assert_eq!(
            ui.messages_with("INFO"),
            vec!["Created the \".env.production\" file."]
        );
        // The base file is untouched
        assert_eq!(fs.file("/app/.env").unwrap(), "APP_ENV=local\nAPP_DEBUG=true\n");
    }

    #[test]
    fn test_production_with_socket_and_name() {
        let db = DatabaseParams {
            socket: Some("/cloudsql/x:y".into()),
            host: None,
            name: Some("mydb".into()),
        };
        let mut env = EnvFile::new();
        env.apply(overlay(EnvVariant::Production, &db)).unwrap();

        assert_eq!(env.get("DB_CONNECTION"), Some("cloudsql"));
        assert_eq!(env.get("CLOUD_SQL_SOCKET"), Some("/cloudsql/x:y"));
        assert_eq!(env.get("CLOUD_SQL_DATABASE"), Some("mydb"));
        assert_eq!(env.get("CLOUD_SQL_HOST"), Some(""));
        assert_eq!(env.get("CLOUD_SQL_USERNAME"), Some("root"));
        assert_eq!(env.get("CLOUD_SQL_PASSWORD"), Some(""));
    }

    #[test]
    fn test_cloud_sql_block_needs_both_parameters() {
        let only_socket = DatabaseParams {
            socket: Some("/cloudsql/x:y".into()),
            ..Default::default()
        };
        let only_name = DatabaseParams {
            name: Some("mydb".into()),
            ..Default::default()
        };
        // The local variant ignores the socket; it needs the host
        let socket_and_name = DatabaseParams {
            socket: Some("/cloudsql/x:y".into()),
            host: None,
            name: Some("mydb".into()),
        };

        for (variant, db) in [
            (EnvVariant::Production, &only_socket),
            (EnvVariant::Production, &only_name),
            (EnvVariant::Local, &only_name),
            (EnvVariant::Local, &socket_and_name),
        ] {
            let pairs = overlay(variant, db);
            for key in CLOUD_SQL_KEYS {
                assert!(
                    pairs.iter().all(|(k, _)| *k != key),
                    "{key} present for {variant:?} with {db:?}"
                );
            }
            assert!(pairs.iter().all(|(k, _)| *k != "DB_CONNECTION"));
        }
    }

    #[test]
    fn test_local_with_host_and_name() {
        let (fs, _ui, generator) = setup(Some("APP_ENV=local\nDB_CONNECTION=mysql\n"));
        let db = DatabaseParams {
            socket: None,
            host: Some("173.194.0.1".into()),
            name: Some("mydb".into()),
        };

        generator
            .generate(
                Path::new("/app/.env"),
                Path::new("/app/.env.local"),
                EnvVariant::Local,
                &db,
            )
            .unwrap();

        let env = generated(&fs, "/app/.env.local");
        assert_eq!(env.get("APP_DEBUG"), Some("true"));
        assert_eq!(env.get("CACHE_DRIVER"), Some("file"));
        assert_eq!(env.get("SESSION_DRIVER"), Some("file"));
        assert_eq!(env.get("DB_CONNECTION"), Some("cloudsql"));
        assert_eq!(env.get("CLOUD_SQL_SOCKET"), Some(""));
        assert_eq!(env.get("CLOUD_SQL_HOST"), Some("173.194.0.1"));
        assert_eq!(env.get("CLOUD_SQL_PASSWORD"), Some("password"));
        assert!(!env.contains_key("MAIL_DRIVER"));
        // Overlay wins but the key keeps its position
        assert_eq!(env.keys().nth(1), Some("DB_CONNECTION"));
    }

    #[test]
    fn test_missing_base_reports_and_aborts() {
        let (fs, ui, generator) = setup(None);

        let outcome = generator
            .generate(
                Path::new("/app/.env"),
                Path::new("/app/.env.production"),
                EnvVariant::Production,
                &DatabaseParams::default(),
            )
            .unwrap();

        assert_eq!(outcome, GenerateOutcome::MissingSource);
        assert!(fs.files().is_empty());
        assert_eq!(
            ui.messages_with("ERROR"),
            vec!["Cannot find \".env\" file to import the existing options."]
        );
    }

    #[test]
    fn test_existing_destination_declined() {
        let (fs, ui, generator) = setup(Some("APP_ENV=local\n"));
        fs.add_file("/app/.env.production", "KEEP=me\n");
        ui.add_yes_no_response(false);

        let outcome = generator
            .generate(
                Path::new("/app/.env"),
                Path::new("/app/.env.production"),
                EnvVariant::Production,
                &DatabaseParams::default(),
            )
            .unwrap();

        assert_eq!(outcome, GenerateOutcome::Declined);
        assert_eq!(fs.file("/app/.env.production").unwrap(), "KEEP=me\n");
        assert_eq!(
            ui.messages_with("PROMPT"),
            vec!["Overwrite the existing \".env.production\" file?"]
        );
        assert!(ui.messages_with("INFO").is_empty());
    }

    #[test]
    fn test_existing_destination_confirmed() {
        let (fs, ui, generator) = setup(Some("APP_ENV=local\n"));
        fs.add_file("/app/.env.production", "KEEP=me\n");
        ui.add_yes_no_response(true);

        let outcome = generator
            .generate(
                Path::new("/app/.env"),
                Path::new("/app/.env.production"),
                EnvVariant::Production,
                &DatabaseParams::default(),
            )
            .unwrap();

        assert!(matches!(outcome, GenerateOutcome::Created(_)));
        let env = generated(&fs, "/app/.env.production");
        assert!(!env.contains_key("KEEP"));
        assert_eq!(env.get("APP_ENV"), Some("production"));
    }

    #[test]
    fn test_line_break_in_parameter_writes_nothing() {
        let (fs, ui, generator) = setup(Some("APP_ENV=local\n"));
        let db = DatabaseParams {
            socket: Some("/cloudsql/x:y".into()),
            host: None,
            name: Some("mydb\nAPP_DEBUG=true".into()),
        };

        let result = generator.generate(
            Path::new("/app/.env"),
            Path::new("/app/.env.production"),
            EnvVariant::Production,
            &db,
        );

        assert!(result.is_err());
        assert!(fs.file("/app/.env.production").is_none());
        assert!(ui.messages_with("INFO").is_empty());
    }
}
