//! Path normalization shared by the packer and the runtime
//!
//! Registry keys are slash-separated, root-anchored and lexically clean.
//! Nothing here touches the filesystem.

use std::path::{MAIN_SEPARATOR, Path};

/// Registry root key
pub const ROOT: &str = "/";

/// Convert a host path to slash-separated form
pub fn to_slash(path: &Path) -> String {
    let s = path.to_string_lossy();
    if MAIN_SEPARATOR == '/' {
        s.into_owned()
    } else {
        s.replace(MAIN_SEPARATOR, "/")
    }
}

/// Lexically clean a slash path
///
/// Collapses repeated separators, drops `.` segments, resolves `..` against
/// the previous segment and removes trailing slashes. A rooted path never
/// climbs above `/`. An empty input cleans to `.`.
pub fn clean(path: &str) -> String {
    if path.is_empty() {
        return ".".to_string();
    }

    let rooted = path.starts_with('/');
    let mut segments: Vec<&str> = Vec::new();

    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if segments.last().is_some_and(|last| *last != "..") {
                    segments.pop();
                } else if !rooted {
                    segments.push("..");
                }
            }
            other => segments.push(other),
        }
    }

    let joined = segments.join("/");
    match (rooted, joined.is_empty()) {
        (true, _) => format!("/{joined}"),
        (false, true) => ".".to_string(),
        (false, false) => joined,
    }
}

/// Join a request path onto `/` so it is always rooted, then clean it
pub fn rooted(path: &str) -> String {
    clean(&format!("/{path}"))
}

/// Join two slash paths and clean the result
pub fn join(base: &str, name: &str) -> String {
    if base.is_empty() {
        return clean(name);
    }
    clean(&format!("{base}/{name}"))
}

/// Compute the registry key for a walked path
///
/// `local` and `prefix` are both slash-separated. The prefix is stripped
/// verbatim from the front, then the rest is anchored at `/`.
pub fn canonical_key(local: &str, prefix: &str) -> String {
    let stripped = local.strip_prefix(prefix).unwrap_or(local);
    rooted(stripped)
}

/// Last element of a cleaned path; `/` for the root
pub fn base_name(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        return if path.is_empty() { "." } else { ROOT };
    }
    match trimmed.rfind('/') {
        Some(idx) => &trimmed[idx + 1..],
        None => trimmed,
    }
}

/// Parent of a cleaned, rooted key; the root is its own parent
pub fn parent(path: &str) -> &str {
    match path.rfind('/') {
        Some(0) | None => ROOT,
        Some(idx) => &path[..idx],
    }
}
