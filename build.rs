use std::env;
use std::fs;
use std::path::Path;

fn main() {
    // Read version from the VERSION file at the crate root, if any
    let version = if let Ok(v) = env::var("BUNDLEFS_VERSION") {
        v
    } else {
        let version_file = Path::new("VERSION");
        if version_file.exists() {
            fs::read_to_string(version_file)
                .unwrap_or_else(|_| env!("CARGO_PKG_VERSION").to_string())
                .trim()
                .to_string()
        } else {
            env!("CARGO_PKG_VERSION").to_string()
        }
    };

    println!("cargo:rustc-env=BUNDLEFS_VERSION={}", version);
    println!("cargo:rerun-if-changed=VERSION");
    println!("cargo:rerun-if-env-changed=BUNDLEFS_VERSION");
}
