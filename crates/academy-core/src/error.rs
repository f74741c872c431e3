//! Error types for the academy core library.

use std::path::{Path, PathBuf};

use http::StatusCode;
use thiserror::Error;

/// Result type alias using `CoreError`.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Coarse classification of a [`CoreError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    Render,
    Filesystem,
    Validation,
}

/// Core error types for the academy site.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Missing template root, missing view, or invalid settings.
    #[error("Configuration error: {message}")]
    Configuration {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Template syntax or runtime error raised by the template engine.
    #[error("Render error in {template}: {message}")]
    Render { template: String, message: String },

    /// File system I/O error.
    #[error("Filesystem error at {}: {source}", path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed client input that could not be defaulted.
    #[error("Validation error: {0}")]
    Validation(String),
}

impl CoreError {
    /// Create a new configuration error with a message.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
            source: None,
        }
    }

    /// Create a new configuration error with source.
    pub fn configuration_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Configuration {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new render error for a template.
    pub fn render(template: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Render {
            template: template.into(),
            message: message.into(),
        }
    }

    /// Create a new filesystem error for a path.
    pub fn filesystem(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Filesystem {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Create a new validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// The kind of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Configuration { .. } => ErrorKind::Configuration,
            Self::Render { .. } => ErrorKind::Render,
            Self::Filesystem { .. } => ErrorKind::Filesystem,
            Self::Validation(_) => ErrorKind::Validation,
        }
    }

    /// HTTP status associated with this error.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self.kind() {
            ErrorKind::Configuration | ErrorKind::Render | ErrorKind::Filesystem => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
        }
    }
}
