//! Read-only virtual filesystem over a packed registry
//!
//! Two interchangeable backends implement [`VirtualFs`]:
//!
//! - [`EmbeddedFs`] decodes payloads from the registry (once per entry)
//! - [`LocalFs`] opens the original files from disk for development
//!
//! [`ScopedFs`] restricts either one to a subtree. [`Bundle`] is the entry
//! point generated modules and applications hold on to.

pub mod embedded;
pub mod handle;
pub mod local;
pub mod scoped;

pub use embedded::EmbeddedFs;
pub use handle::{EmbeddedFile, FileInfo, FileMode, LocalFile, VfsFile};
pub use local::LocalFs;
pub use scoped::ScopedFs;

use std::fmt;
use std::io::Read;
use std::sync::Arc;

use log::debug;

use crate::exceptions::{BundleError, Result};
use crate::registry::{EntryDescriptor, Registry};
use crate::utils::{USE_LOCAL_ENV, is_env_true};

/// A filesystem that can open files by slash path
pub trait VirtualFs: Send + Sync + fmt::Debug {
    /// Open a file or directory; unknown paths give [`BundleError::NotFound`]
    fn open(&self, name: &str) -> Result<Box<dyn VfsFile>>;
}

/// Packed assets plus the accessors applications use to read them
#[derive(Debug, Clone)]
pub struct Bundle {
    registry: Arc<Registry>,
}

impl Bundle {
    pub fn new(registry: Registry) -> Self {
        Bundle {
            registry: Arc::new(registry),
        }
    }

    /// Bundle over a generated static table
    pub fn from_static(table: &'static [EntryDescriptor]) -> Result<Self> {
        Ok(Self::new(Registry::from_static(table)?))
    }

    /// Bundle over a JSON manifest
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(Self::new(Registry::from_json(json)?))
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Local backend when `use_local`, embedded backend otherwise
    pub fn fs(&self, use_local: bool) -> Box<dyn VirtualFs> {
        if use_local {
            Box::new(LocalFs::new(Arc::clone(&self.registry)))
        } else {
            Box::new(EmbeddedFs::new(Arc::clone(&self.registry)))
        }
    }

    /// Backend chosen by the `BUNDLEFS_USE_LOCAL` environment variable
    pub fn fs_from_env(&self) -> Box<dyn VirtualFs> {
        let use_local = is_env_true(USE_LOCAL_ENV);
        debug!(
            "🔧 {}={} selects the {} backend",
            USE_LOCAL_ENV,
            use_local,
            backend_name(use_local)
        );
        self.fs(use_local)
    }

    /// Filesystem rooted at `name`
    pub fn dir(&self, use_local: bool, name: &str) -> ScopedFs {
        ScopedFs::new(Arc::from(self.fs(use_local)), name)
    }

    /// Whole contents of a file
    pub fn read_bytes(&self, use_local: bool, name: &str) -> Result<Arc<[u8]>> {
        let entry = self.registry.lookup(name)?;
        if entry.is_dir() {
            return Err(BundleError::Unsupported(format!(
                "{} is a directory",
                entry.path()
            )));
        }

        if !use_local {
            return entry.contents();
        }

        let mut file = self.fs(true).open(name)?;
        let mut data = Vec::new();
        file.read_to_end(&mut data)
            .map_err(|e| BundleError::io(entry.local(), e))?;
        Ok(Arc::from(data))
    }

    /// [`read_bytes`](Self::read_bytes) for mandatory assets; panics on any error
    #[allow(clippy::panic)]
    pub fn must_read_bytes(&self, use_local: bool, name: &str) -> Arc<[u8]> {
        match self.read_bytes(use_local, name) {
            Ok(data) => data,
            Err(e) => panic!("{e}"),
        }
    }

    /// Contents of a UTF-8 text file
    pub fn read_string(&self, use_local: bool, name: &str) -> Result<String> {
        let data = self.read_bytes(use_local, name)?;
        String::from_utf8(data.to_vec()).map_err(|_| BundleError::InvalidUtf8 {
            path: name.to_string(),
        })
    }

    /// [`read_string`](Self::read_string) for mandatory assets; panics on any error
    #[allow(clippy::panic)]
    pub fn must_read_string(&self, use_local: bool, name: &str) -> String {
        match self.read_string(use_local, name) {
            Ok(text) => text,
            Err(e) => panic!("{e}"),
        }
    }
}

fn backend_name(use_local: bool) -> &'static str {
    if use_local { "local" } else { "embedded" }
}
