//! Error types for the frontquery library
//!
//! Every fallible operation in the crate returns [`Result`]. Errors carry a
//! [`ErrorKind`] so callers can tell load, parse, compile and query failures
//! apart without matching on every variant.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for all library operations
#[derive(Error, Debug)]
pub enum ContentError {
    /// I/O related errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Requested file or directory does not exist under the content root
    #[error("Cannot find directory or file: {path}")]
    FileNotFound { path: PathBuf },

    /// Front matter parsing errors
    #[error("Invalid front matter in {path}: {reason}")]
    InvalidFrontMatter { path: PathBuf, reason: String },

    /// Field path parsing errors
    #[error("Invalid field path: {path} ({reason})")]
    InvalidFieldPath { path: String, reason: String },

    /// The compiler rejected a document
    #[error("Failed to compile {path}: {reason}")]
    CompileFailed { path: String, reason: String },

    /// Path resolution errors
    #[error("Path resolution error: {reason}")]
    PathResolution { reason: String },

    /// Generic validation errors
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// Multiple errors (for batch operations)
    #[error("Multiple errors occurred")]
    Multiple { errors: Vec<ContentError> },
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, ContentError>;

/// Broad category of a [`ContentError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The requested content could not be located or read
    Load,
    /// A document's front matter could not be decoded
    Parse,
    /// The external compiler rejected a document
    Compile,
    /// A field path or query parameter was malformed
    Query,
    /// Serialization or validation failures
    Other,
}

impl ContentError {
    /// Create a new file not found error
    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// Create a new invalid front matter error
    pub fn invalid_front_matter(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::InvalidFrontMatter {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a new invalid field path error
    pub fn invalid_field_path(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidFieldPath {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a new compile failure
    pub fn compile_failed(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::CompileFailed {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a new path resolution error
    pub fn path_resolution(reason: impl Into<String>) -> Self {
        Self::PathResolution {
            reason: reason.into(),
        }
    }

    /// Create a new validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a multiple errors wrapper
    pub fn multiple(errors: Vec<ContentError>) -> Self {
        Self::Multiple { errors }
    }

    /// Category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Io(_) | Self::FileNotFound { .. } | Self::PathResolution { .. } => {
                ErrorKind::Load
            }
            Self::Yaml(_) | Self::InvalidFrontMatter { .. } => ErrorKind::Parse,
            Self::CompileFailed { .. } => ErrorKind::Compile,
            Self::InvalidFieldPath { .. } => ErrorKind::Query,
            Self::Json(_) | Self::Validation { .. } => ErrorKind::Other,
            Self::Multiple { errors } => errors
                .first()
                .map(|e| e.kind())
                .unwrap_or(ErrorKind::Other),
        }
    }

    /// Check if a batch can keep going after this error
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Io(io_err) => !matches!(
                io_err.kind(),
                std::io::ErrorKind::NotFound | std::io::ErrorKind::PermissionDenied
            ),
            Self::FileNotFound { .. } | Self::PathResolution { .. } => false,
            Self::InvalidFrontMatter { .. }
            | Self::Yaml(_)
            | Self::CompileFailed { .. }
            | Self::InvalidFieldPath { .. }
            | Self::Json(_)
            | Self::Validation { .. } => true,
            Self::Multiple { errors } => errors.iter().any(|e| e.is_recoverable()),
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Load => write!(f, "LOAD"),
            Self::Parse => write!(f, "PARSE"),
            Self::Compile => write!(f, "COMPILE"),
            Self::Query => write!(f, "QUERY"),
            Self::Other => write!(f, "OTHER"),
        }
    }
}
