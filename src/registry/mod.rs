//! Runtime registry of packed entries
//!
//! The registry is built once from the artifact's descriptor table and then
//! shared read-only through `Arc`. Each entry owns a [`DecodeCell`], the only
//! state that changes after construction.

pub mod decode;
pub mod manifest;

pub use decode::{DecodeCell, DecodeFailure};
pub use manifest::{EntryDescriptor, MANIFEST_FORMAT, RegistryManifest};

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::sync::{Arc, OnceLock};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use log::{debug, trace};

use crate::codec;
use crate::exceptions::{BundleError, Result};
use crate::paths;

/// A file or directory node with its lazily decoded contents
#[derive(Debug)]
pub struct Entry {
    descriptor: EntryDescriptor,
    name: OnceLock<String>,
    decoded: DecodeCell,
}

impl Entry {
    pub fn new(descriptor: EntryDescriptor) -> Self {
        Entry {
            descriptor,
            name: OnceLock::new(),
            decoded: DecodeCell::new(),
        }
    }

    pub fn path(&self) -> &str {
        &self.descriptor.path
    }

    pub fn local(&self) -> &str {
        &self.descriptor.local
    }

    pub fn is_dir(&self) -> bool {
        self.descriptor.is_dir
    }

    pub fn size(&self) -> u64 {
        self.descriptor.size
    }

    pub fn descriptor(&self) -> &EntryDescriptor {
        &self.descriptor
    }

    /// Base name, computed on first access
    pub fn name(&self) -> &str {
        self.name
            .get_or_init(|| paths::base_name(&self.descriptor.path).to_string())
    }

    /// Recorded modification time, or the epoch when none was packed
    pub fn modtime(&self) -> SystemTime {
        let recorded = match self.descriptor.modtime {
            Some(secs) if secs >= 0 => {
                UNIX_EPOCH.checked_add(Duration::from_secs(secs.unsigned_abs()))
            }
            Some(secs) => UNIX_EPOCH.checked_sub(Duration::from_secs(secs.unsigned_abs())),
            None => None,
        };
        recorded.unwrap_or(UNIX_EPOCH)
    }

    /// Decoded file contents, decoded at most once per process
    pub fn contents(&self) -> Result<Arc<[u8]>> {
        let size = self.descriptor.size;
        self.decoded
            .get_or_decode(size, || {
                trace!("🗜️ Decoding {}", self.descriptor.path);
                codec::decode(&self.descriptor.payload, size)
            })
            .map_err(|failure| BundleError::Decode {
                path: self.descriptor.path.to_string(),
                reason: failure.0,
            })
    }

    /// How many times this entry's payload was decoded
    pub fn decode_runs(&self) -> u32 {
        self.decoded.decode_runs()
    }
}

/// Immutable lookup table from canonical path to entry
#[derive(Debug, Default)]
pub struct Registry {
    entries: BTreeMap<String, Arc<Entry>>,
}

impl Registry {
    /// Build a registry, rejecting duplicate keys and adding `/` if absent
    pub fn from_descriptors<I>(descriptors: I) -> Result<Self>
    where
        I: IntoIterator<Item = EntryDescriptor>,
    {
        let mut entries: BTreeMap<String, Arc<Entry>> = BTreeMap::new();

        for mut descriptor in descriptors {
            let key = paths::rooted(&descriptor.path);
            if descriptor.path != key {
                descriptor.path = Cow::Owned(key.clone());
            }
            if let Some(existing) = entries.get(&key) {
                return Err(BundleError::DuplicateKey {
                    key,
                    first: existing.local().to_string(),
                    second: descriptor.local.to_string(),
                });
            }
            entries.insert(key, Arc::new(Entry::new(descriptor)));
        }

        entries
            .entry(paths::ROOT.to_string())
            .or_insert_with(|| Arc::new(Entry::new(EntryDescriptor::dir(paths::ROOT, "."))));

        debug!("📚 Registry loaded with {} entries", entries.len());
        Ok(Registry { entries })
    }

    /// Build from a generated static table
    pub fn from_static(table: &'static [EntryDescriptor]) -> Result<Self> {
        Self::from_descriptors(table.iter().cloned())
    }

    /// Build from a JSON manifest
    pub fn from_json(json: &str) -> Result<Self> {
        let manifest: RegistryManifest = serde_json::from_str(json)?;
        if manifest.format != MANIFEST_FORMAT {
            return Err(BundleError::Generic(format!(
                "Unsupported manifest format: {}",
                manifest.format
            )));
        }
        Self::from_descriptors(manifest.entries)
    }

    /// Look up a request path after cleaning it
    pub fn get(&self, name: &str) -> Option<&Arc<Entry>> {
        self.entries.get(&paths::rooted(name))
    }

    /// Like [`get`](Self::get) but with a not-found error
    pub fn lookup(&self, name: &str) -> Result<&Arc<Entry>> {
        self.get(name)
            .ok_or_else(|| BundleError::NotFound(paths::rooted(name)))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Canonical keys in sorted order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn entries(&self) -> impl Iterator<Item = &Arc<Entry>> {
        self.entries.values()
    }

    /// Serializable snapshot of every entry
    pub fn to_manifest(&self) -> RegistryManifest {
        RegistryManifest::new(
            self.entries
                .values()
                .map(|entry| entry.descriptor().clone())
                .collect(),
        )
    }
}
