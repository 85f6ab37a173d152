use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Main error type for pagefix operations
#[derive(Error, Debug)]
pub enum PagefixError {
    #[error("Not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Pattern error: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Unknown fix set: {0}")]
    UnknownFixSet(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read configuration at {path:?}: {message}")]
    Unreadable { path: PathBuf, message: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Unknown config key: {key}")]
    UnknownKey { key: String },

    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },
}

/// Result type alias for pagefix operations
pub type PagefixResult<T> = Result<T, PagefixError>;

impl PagefixError {
    /// Wrap an I/O error with the path it happened on. A missing file becomes
    /// `NotFound` so callers can report it separately.
    pub fn io(path: impl AsRef<Path>, source: io::Error) -> Self {
        let path = path.as_ref().to_path_buf();
        if source.kind() == io::ErrorKind::NotFound {
            PagefixError::NotFound { path }
        } else {
            PagefixError::Io { path, source }
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, PagefixError::NotFound { .. })
    }
}

/// Helper trait for attaching the offending path to I/O results
pub trait PathContext<T> {
    fn with_path<P: AsRef<Path>>(self, path: P) -> PagefixResult<T>;
}

impl<T> PathContext<T> for Result<T, io::Error> {
    fn with_path<P: AsRef<Path>>(self, path: P) -> PagefixResult<T> {
        self.map_err(|e| PagefixError::io(path, e))
    }
}

/// Short, single-line reason used in per-file progress output
pub struct Reason<'a>(pub &'a PagefixError);

impl fmt::Display for Reason<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            PagefixError::NotFound { .. } => write!(f, "file does not exist"),
            PagefixError::Io { source, .. } => write!(f, "{}", source),
            other => write!(f, "{}", other),
        }
    }
}
