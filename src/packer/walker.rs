//! Breadth-first walk over the input roots

use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::{DateTime, Utc};
use log::{debug, trace};
use regex::Regex;

use crate::exceptions::{BundleError, Result};
use crate::paths;

/// A regular file found under one of the roots
#[derive(Debug, Clone)]
pub struct WalkedFile {
    pub local: String, // Slash-separated path as walked
    pub data: Vec<u8>,
    pub modtime: Option<i64>,
}

/// Walk every root breadth-first and read all files into memory
///
/// Children of a directory are queued in file-name order. A path matching
/// `ignore` is skipped, and an ignored directory is never descended into.
/// The first I/O error aborts the walk.
pub fn walk(
    roots: &[PathBuf],
    ignore: Option<&Regex>,
    include_modtime: bool,
) -> Result<Vec<WalkedFile>> {
    let timer = Instant::now();
    let mut queue: VecDeque<PathBuf> = roots.iter().cloned().collect();
    let mut files = Vec::new();

    while let Some(path) = queue.pop_front() {
        let local = paths::to_slash(&path);
        if ignore.is_some_and(|re| re.is_match(&local)) {
            debug!("🙈 Ignoring {}", local);
            continue;
        }

        let metadata = fs::metadata(&path).map_err(|e| BundleError::io(&path, e))?;
        if metadata.is_dir() {
            let children = sorted_children(&path)?;
            trace!("📂 {} has {} children", local, children.len());
            queue.extend(children);
            continue;
        }

        let data = fs::read(&path).map_err(|e| BundleError::io(&path, e))?;
        let modtime = if include_modtime {
            let modified = metadata.modified().map_err(|e| BundleError::io(&path, e))?;
            Some(DateTime::<Utc>::from(modified).timestamp())
        } else {
            None
        };
        trace!("📖 Read {} ({} bytes)", local, data.len());
        files.push(WalkedFile {
            local,
            data,
            modtime,
        });
    }

    debug!(
        "✅ Walked {} roots, {} files in {:?}",
        roots.len(),
        files.len(),
        timer.elapsed()
    );
    Ok(files)
}

fn sorted_children(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| BundleError::io(dir, e))? {
        let entry = entry.map_err(|e| BundleError::io(dir, e))?;
        names.push(entry.file_name());
    }
    names.sort();
    Ok(names.into_iter().map(|name| dir.join(name)).collect())
}
