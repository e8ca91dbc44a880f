//! Serializable registry structures

use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// Format tag written into JSON manifests
pub const MANIFEST_FORMAT: &str = "bundlefs/1";

/// One registry entry as it is persisted in the artifact
///
/// Generated Rust modules build these in `const` context with [`file`] and
/// [`dir`]; JSON manifests deserialize into owned strings.
///
/// [`file`]: EntryDescriptor::file
/// [`dir`]: EntryDescriptor::dir
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryDescriptor {
    pub path: Cow<'static, str>, // Canonical key, e.g. "/static/app.js"
    pub local: Cow<'static, str>, // Original on-disk path
    #[serde(default)]
    pub is_dir: bool,
    #[serde(default)]
    pub size: u64, // Decompressed length
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modtime: Option<i64>, // Unix seconds
    #[serde(default)]
    pub payload: Cow<'static, str>, // gzip + base64, may contain line breaks
}

impl EntryDescriptor {
    /// Describe a packed file
    pub const fn file(
        path: &'static str,
        local: &'static str,
        size: u64,
        modtime: Option<i64>,
        payload: &'static str,
    ) -> Self {
        EntryDescriptor {
            path: Cow::Borrowed(path),
            local: Cow::Borrowed(local),
            is_dir: false,
            size,
            modtime,
            payload: Cow::Borrowed(payload),
        }
    }

    /// Describe a synthesized directory
    pub const fn dir(path: &'static str, local: &'static str) -> Self {
        EntryDescriptor {
            path: Cow::Borrowed(path),
            local: Cow::Borrowed(local),
            is_dir: true,
            size: 0,
            modtime: None,
            payload: Cow::Borrowed(""),
        }
    }
}

/// JSON form of a whole registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryManifest {
    pub format: String,
    pub entries: Vec<EntryDescriptor>,
}

impl RegistryManifest {
    pub fn new(entries: Vec<EntryDescriptor>) -> Self {
        RegistryManifest {
            format: MANIFEST_FORMAT.to_string(),
            entries,
        }
    }
}
