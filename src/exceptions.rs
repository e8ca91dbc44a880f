//! Error types for bundlefs

use std::fmt;
use std::path::PathBuf;

/// Main error type for packing and virtual filesystem operations
#[derive(Debug)]
pub enum BundleError {
    /// I/O failure on a concrete path
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Exclusion pattern failed to compile
    InvalidPattern(regex::Error),

    /// Two inputs normalized to the same registry key
    DuplicateKey {
        key: String,
        first: String,
        second: String,
    },

    /// Path is not registered in the bundle
    NotFound(String),

    /// Payload could not be decoded back into the original bytes
    Decode { path: String, reason: String },

    /// Asset is not valid UTF-8 text
    InvalidUtf8 { path: String },

    /// Operation is not supported by the virtual filesystem
    Unsupported(String),

    /// JSON manifest error
    Json(serde_json::Error),

    /// Generic error with message
    Generic(String),
}

impl BundleError {
    /// Attach a path to an I/O error
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        BundleError::Io {
            path: path.into(),
            source,
        }
    }

    /// True for the recoverable "no such asset" condition
    pub fn is_not_found(&self) -> bool {
        match self {
            BundleError::NotFound(_) => true,
            BundleError::Io { source, .. } => source.kind() == std::io::ErrorKind::NotFound,
            _ => false,
        }
    }
}

impl fmt::Display for BundleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BundleError::Io { path, source } => {
                write!(f, "IO error on {}: {source}", path.display())
            }
            BundleError::InvalidPattern(err) => write!(f, "Invalid ignore pattern: {err}"),
            BundleError::DuplicateKey { key, first, second } => write!(
                f,
                "Duplicate key {key}: both {first} and {second} normalize to it"
            ),
            BundleError::NotFound(path) => write!(f, "File not found: {path}"),
            BundleError::Decode { path, reason } => {
                write!(f, "Failed to decode {path}: {reason}")
            }
            BundleError::InvalidUtf8 { path } => write!(f, "File is not valid UTF-8: {path}"),
            BundleError::Unsupported(what) => write!(f, "Unsupported operation: {what}"),
            BundleError::Json(err) => write!(f, "JSON error: {err}"),
            BundleError::Generic(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for BundleError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BundleError::Io { source, .. } => Some(source),
            BundleError::InvalidPattern(err) => Some(err),
            BundleError::Json(err) => Some(err),
            _ => None,
        }
    }
}

impl From<regex::Error> for BundleError {
    fn from(err: regex::Error) -> Self {
        BundleError::InvalidPattern(err)
    }
}

impl From<serde_json::Error> for BundleError {
    fn from(err: serde_json::Error) -> Self {
        BundleError::Json(err)
    }
}

/// Result type for bundlefs operations
pub type Result<T> = std::result::Result<T, BundleError>;
