//! Settings loading errors.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort settings loading.
///
/// Both variants are fatal at startup; there is no partial record to fall
/// back to.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The settings file could not be read (missing, permission denied, ...).
    #[error("cannot read settings file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file contents are not JSON of the expected shape.
    #[error("cannot decode settings file {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl ConfigError {
    /// Path of the settings file that failed to load.
    pub fn path(&self) -> &std::path::Path {
        match self {
            ConfigError::Io { path, .. } | ConfigError::Decode { path, .. } => path,
        }
    }
}

/// Result type for settings loading.
pub type ConfigResult<T> = Result<T, ConfigError>;
