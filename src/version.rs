//! Version information for the bundlefs binary

/// Current version of bundlefs (from `VERSION` or the package manifest)
pub const VERSION: &str = env!("BUNDLEFS_VERSION");

/// Build timestamp (set at compile time)
pub const BUILD_TIME: Option<&str> = option_env!("BUILD_TIME");

/// Git commit hash (set at compile time)
pub const GIT_COMMIT: Option<&str> = option_env!("GIT_COMMIT");

/// Get full version string with optional build information
pub fn full_version() -> String {
    let mut version = VERSION.to_string();

    if let Some(commit) = GIT_COMMIT {
        version.push_str(&format!(" ({})", short_commit(commit)));
    }

    if let Some(time) = BUILD_TIME {
        version.push_str(&format!(" built {}", time));
    }

    version
}

/// First eight characters of a commit id
fn short_commit(commit: &str) -> String {
    commit.chars().take(8).collect()
}
