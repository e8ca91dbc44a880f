//! Sub-filesystem view rooted at a fixed directory

use std::sync::Arc;

use super::VirtualFs;
use super::handle::VfsFile;
use crate::exceptions::Result;
use crate::paths;

/// Forwards every open to `inner`, prefixed with `base`
///
/// Request paths are rooted before joining, so `..` cannot climb out of
/// the base directory.
#[derive(Debug, Clone)]
pub struct ScopedFs {
    inner: Arc<dyn VirtualFs>,
    base: String,
}

impl ScopedFs {
    pub fn new(inner: Arc<dyn VirtualFs>, base: &str) -> Self {
        ScopedFs {
            inner,
            base: paths::rooted(base),
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// Key the inner filesystem sees for `name`
    pub fn resolve(&self, name: &str) -> String {
        paths::join(&self.base, &paths::rooted(name))
    }
}

impl VirtualFs for ScopedFs {
    fn open(&self, name: &str) -> Result<Box<dyn VfsFile>> {
        self.inner.open(&self.resolve(name))
    }
}
