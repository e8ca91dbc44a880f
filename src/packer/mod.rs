//! Build-time packer: walk, normalize, synthesize directories, encode
//!
//! The packer runs once per artifact and is strictly sequential. Its output,
//! [`PackedBundle`], is sorted by key so rendering is deterministic.

pub mod dirs;
pub mod emitter;
pub mod walker;

pub use emitter::ArtifactFormat;

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Instant;

use log::{debug, info, trace};
use regex::Regex;

use crate::codec::{self, EncodedPayload};
use crate::exceptions::{BundleError, Result};
use crate::paths;
use walker::WalkedFile;

/// Normalization and filtering settings for one packing run
#[derive(Debug, Clone, Default)]
pub struct PackConfig {
    pub prefix: String, // Stripped from walked paths before keying
    pub ignore: Option<Regex>,
    pub include_modtime: bool,
}

impl PackConfig {
    /// Build a config, compiling the ignore pattern if there is one
    pub fn new(prefix: &str, ignore: Option<&str>, include_modtime: bool) -> Result<Self> {
        let ignore = match ignore {
            Some(pattern) if !pattern.is_empty() => Some(Regex::new(pattern)?),
            _ => None,
        };
        Ok(PackConfig {
            prefix: prefix.replace('\\', "/"),
            ignore,
            include_modtime,
        })
    }
}

/// A file ready for emission
#[derive(Debug, Clone)]
pub struct PackedFile {
    pub key: String,
    pub local: String,
    pub size: u64,
    pub modtime: Option<i64>,
    pub payload: EncodedPayload,
}

/// A synthesized directory ready for emission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedDir {
    pub key: String,
    pub local: String,
}

/// Everything the emitter needs, sorted by key
#[derive(Debug, Clone)]
pub struct PackedBundle {
    pub files: Vec<PackedFile>,
    pub dirs: Vec<PackedDir>,
}

/// Pack every root into a [`PackedBundle`]
pub fn pack(roots: &[PathBuf], config: &PackConfig) -> Result<PackedBundle> {
    let timer = Instant::now();
    info!("📦 Packing {} roots (prefix {:?})", roots.len(), config.prefix);

    let walked = walker::walk(roots, config.ignore.as_ref(), config.include_modtime)?;
    let keyed = key_files(walked, &config.prefix)?;

    let dir_keys = dirs::synthesize(keyed.keys().map(String::as_str));
    if let Some(clash) = dir_keys.iter().find(|dir| keyed.contains_key(*dir)) {
        let file = &keyed[clash];
        return Err(BundleError::DuplicateKey {
            key: clash.clone(),
            first: file.local.clone(),
            second: directory_local(&config.prefix, clash),
        });
    }

    let mut files = Vec::with_capacity(keyed.len());
    for (key, file) in keyed {
        let payload = codec::encode(&file.data).map_err(|e| {
            BundleError::Generic(format!("Failed to compress {}: {}", file.local, e))
        })?;
        trace!(
            "🗜️ {} -> {} ({} bytes, {} encoded)",
            file.local,
            key,
            file.data.len(),
            payload.encoded_len()
        );
        files.push(PackedFile {
            key,
            local: file.local,
            size: file.data.len() as u64,
            modtime: file.modtime,
            payload,
        });
    }

    let dirs = dir_keys
        .into_iter()
        .map(|key| PackedDir {
            local: directory_local(&config.prefix, &key),
            key,
        })
        .collect::<Vec<_>>();

    info!(
        "✅ Packed {} files and {} directories in {:?}",
        files.len(),
        dirs.len(),
        timer.elapsed()
    );
    Ok(PackedBundle { files, dirs })
}

/// Key every walked file, refusing two files on one key
fn key_files(walked: Vec<WalkedFile>, prefix: &str) -> Result<BTreeMap<String, WalkedFile>> {
    let mut keyed: BTreeMap<String, WalkedFile> = BTreeMap::new();
    for file in walked {
        let key = paths::canonical_key(&file.local, prefix);
        if let Some(existing) = keyed.get(&key) {
            return Err(BundleError::DuplicateKey {
                key,
                first: existing.local.clone(),
                second: file.local,
            });
        }
        debug!("🔑 {} -> {}", file.local, key);
        keyed.insert(key, file);
    }
    Ok(keyed)
}

/// On-disk location of a synthesized directory
fn directory_local(prefix: &str, key: &str) -> String {
    let local = if prefix.is_empty() {
        key.trim_start_matches('/').to_string()
    } else {
        paths::join(prefix, key)
    };
    if local.is_empty() { ".".to_string() } else { local }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_prefix_stripping_and_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let build = temp_dir.path().join("build");
        fs::create_dir_all(build.join("static")).unwrap();
        fs::write(build.join("static/app.js"), "let x = 1;").unwrap();

        let prefix = paths::to_slash(&build);
        let config = PackConfig::new(&prefix, None, false).unwrap();
        let bundle = pack(&[build.clone()], &config).unwrap();

        assert_eq!(bundle.files.len(), 1);
        assert_eq!(bundle.files[0].key, "/static/app.js");
        assert_eq!(bundle.files[0].local, format!("{prefix}/static/app.js"));
        assert_eq!(bundle.files[0].size, 10);
        assert_eq!(
            bundle.dirs,
            vec![
                PackedDir {
                    key: "/".into(),
                    local: prefix.clone(),
                },
                PackedDir {
                    key: "/static".into(),
                    local: format!("{prefix}/static"),
                },
            ]
        );
    }

    #[test]
    fn test_payload_round_trips() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("empty.txt"), "").unwrap();
        fs::write(temp_dir.path().join("data.bin"), [1u8, 2, 3, 0, 255]).unwrap();

        let prefix = paths::to_slash(temp_dir.path());
        let config = PackConfig::new(&prefix, None, false).unwrap();
        let bundle = pack(&[temp_dir.path().to_path_buf()], &config).unwrap();

        let originals = [("/data.bin", vec![1u8, 2, 3, 0, 255]), ("/empty.txt", vec![])];
        for (file, (key, original)) in bundle.files.iter().zip(originals) {
            assert_eq!(file.key, key);
            let decoded = codec::decode(&file.payload.joined(), file.size).unwrap();
            assert_eq!(decoded, original);
        }
    }

    #[test]
    fn test_duplicate_keys_fail() {
        let temp_dir = TempDir::new().unwrap();
        let site = temp_dir.path().join("site");
        fs::create_dir_all(&site).unwrap();
        fs::write(site.join("same.txt"), "1").unwrap();

        // Overlapping roots reach the same file twice
        let config = PackConfig::new("", None, false).unwrap();
        let err = pack(&[site.clone(), site.join("same.txt")], &config).unwrap_err();
        match err {
            BundleError::DuplicateKey { first, second, .. } => assert_eq!(first, second),
            other => panic!("expected duplicate key, got {other:?}"),
        }
    }

    #[test]
    fn test_file_directory_collision_fails() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("p/x")).unwrap();
        fs::write(root.join("p/x/inner.txt"), "inner").unwrap();
        fs::write(root.join("px"), "file keyed like a directory").unwrap();

        // The prefix is stripped verbatim, so "<root>/px" keys to "/x"
        let prefix = paths::to_slash(&root.join("p"));
        let config = PackConfig::new(&prefix, None, false).unwrap();
        let err = pack(&[root.join("p"), root.join("px")], &config).unwrap_err();
        match err {
            BundleError::DuplicateKey { key, .. } => assert_eq!(key, "/x"),
            other => panic!("expected duplicate key, got {other:?}"),
        }
    }

    #[test]
    fn test_ignore_pattern_applies() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("keep.css"), "a{}").unwrap();
        fs::write(temp_dir.path().join(".DS_Store"), "junk").unwrap();

        let prefix = paths::to_slash(temp_dir.path());
        let config = PackConfig::new(&prefix, Some(r"\.DS_Store$"), false).unwrap();
        let bundle = pack(&[temp_dir.path().to_path_buf()], &config).unwrap();
        let keys: Vec<_> = bundle.files.iter().map(|f| f.key.as_str()).collect();
        assert_eq!(keys, vec!["/keep.css"]);
    }

    #[test]
    fn test_invalid_pattern() {
        let err = PackConfig::new("", Some("(unclosed"), false).unwrap_err();
        assert!(matches!(err, BundleError::InvalidPattern(_)));
    }
}
