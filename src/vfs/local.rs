//! Backend that passes opens through to the original files on disk

use std::fs::File;
use std::sync::Arc;

use log::debug;

use super::VirtualFs;
use super::handle::{LocalFile, VfsFile};
use crate::exceptions::{BundleError, Result};
use crate::registry::Registry;

/// Local backend: the registry only maps keys to on-disk paths
///
/// Every open reads the current disk state, so edits show up without
/// re-packing. Keys that were not packed stay invisible.
#[derive(Debug, Clone)]
pub struct LocalFs {
    registry: Arc<Registry>,
}

impl LocalFs {
    pub fn new(registry: Arc<Registry>) -> Self {
        LocalFs { registry }
    }
}

impl VirtualFs for LocalFs {
    fn open(&self, name: &str) -> Result<Box<dyn VfsFile>> {
        let entry = self.registry.lookup(name)?;
        let file = File::open(entry.local()).map_err(|e| BundleError::io(entry.local(), e))?;
        debug!("💾 Opened {} from disk at {}", entry.path(), entry.local());
        Ok(Box::new(LocalFile::new(file, Arc::clone(entry))))
    }
}
