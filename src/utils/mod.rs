//! Utility functions for bundlefs

use std::env;

/// Environment variable that switches the runtime to the local backend
pub const USE_LOCAL_ENV: &str = "BUNDLEFS_USE_LOCAL";

/// Check if an environment variable is set to a truthy value
/// Accepts: "1", "true", "on", "yes", "t" (case insensitive)
pub fn is_env_true(key: &str) -> bool {
    match env::var(key) {
        Ok(val) => is_truthy(&val),
        Err(_) => false,
    }
}

fn is_truthy(val: &str) -> bool {
    let val_lower = val.to_lowercase();
    matches!(val_lower.as_str(), "1" | "true" | "on" | "yes" | "t")
}
