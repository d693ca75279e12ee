use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type for setup operations
pub type SetupResult<T> = Result<T, SetupError>;

/// Errors raised while patching an application's configuration
///
/// A declined confirmation or a rule chain that changes nothing are not
/// errors; they surface as outcome variants of the operation that hit them.
#[derive(Error, Debug)]
pub enum SetupError {
    /// An expected input file does not exist
    #[error("Missing source file: {}", path.display())]
    MissingSource { path: PathBuf },

    /// Filesystem failure at a known path
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid options or an unusable configuration file
    #[error("Configuration error: {0}")]
    Config(String),

    /// The options file is not valid TOML
    #[error("Invalid options file: {0}")]
    Toml(#[from] toml::de::Error),
}

impl SetupError {
    /// Create a missing-source error for a path
    pub fn missing_source(path: impl Into<PathBuf>) -> Self {
        Self::MissingSource { path: path.into() }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

/// Attach a path to raw `std::io` results
pub trait IoResultExt<T> {
    fn at_path(self, path: &Path) -> SetupResult<T>;
}

impl<T> IoResultExt<T> for std::io::Result<T> {
    fn at_path(self, path: &Path) -> SetupResult<T> {
        self.map_err(|source| SetupError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}
