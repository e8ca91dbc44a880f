//! Standard exit codes for the bundlefs binary
//!
//! Codes share the numbering used across the packaging tools so scripts
//! can tell a bad flag from an unreadable input tree.

use crate::exceptions::BundleError;

/// Successful execution
pub const EXIT_SUCCESS: i32 = 0;

/// Generic error (avoid using - be more specific)
pub const EXIT_ERROR: i32 = 1;

/// Panic or unrecoverable error
pub const EXIT_PANIC: i32 = 101;

/// Invalid command-line arguments
pub const EXIT_INVALID_ARGS: i32 = 105;

/// I/O error (file not found, permission denied, disk error)
pub const EXIT_IO_ERROR: i32 = 106;

/// Build/packaging error
pub const EXIT_BUILD_ERROR: i32 = 108;

/// Configuration error (bad ignore pattern, colliding keys)
pub const EXIT_CONFIG_ERROR: i32 = 109;

/// Map a packing failure onto its exit code
pub fn exit_code_for(err: &BundleError) -> i32 {
    match err {
        BundleError::Io { .. } => EXIT_IO_ERROR,
        BundleError::InvalidPattern(_) | BundleError::DuplicateKey { .. } => EXIT_CONFIG_ERROR,
        BundleError::Decode { .. } | BundleError::Json(_) => EXIT_BUILD_ERROR,
        BundleError::NotFound(_) | BundleError::InvalidUtf8 { .. } => EXIT_ERROR,
        BundleError::Unsupported(_) | BundleError::Generic(_) => EXIT_BUILD_ERROR,
    }
}
