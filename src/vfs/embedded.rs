//! Backend serving decoded bytes from the in-memory registry

use std::sync::Arc;

use log::{debug, trace};

use super::VirtualFs;
use super::handle::{EmbeddedFile, VfsFile};
use crate::exceptions::Result;
use crate::registry::Registry;

/// Embedded backend: every open is served from the registry
#[derive(Debug, Clone)]
pub struct EmbeddedFs {
    registry: Arc<Registry>,
}

impl EmbeddedFs {
    pub fn new(registry: Arc<Registry>) -> Self {
        EmbeddedFs { registry }
    }
}

impl VirtualFs for EmbeddedFs {
    fn open(&self, name: &str) -> Result<Box<dyn VfsFile>> {
        let entry = self.registry.lookup(name)?;
        if entry.is_dir() {
            trace!("📁 Opened embedded directory {}", entry.path());
            return Ok(Box::new(EmbeddedFile::directory(Arc::clone(entry))));
        }

        let data = entry.contents()?;
        debug!("📄 Opened embedded {} ({} bytes)", entry.path(), data.len());
        Ok(Box::new(EmbeddedFile::new(data, Arc::clone(entry))))
    }
}
