//! High-level API for bundlefs operations

use crate::exceptions::{BundleError, Result};
use crate::packer::{self, ArtifactFormat, PackConfig};
use log::{debug, info};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Options for packing assets into an artifact
#[derive(Debug, Clone)]
pub struct PackOptions {
    /// Destination file; `None` writes to stdout
    pub output: Option<PathBuf>,
    /// Name of the generated Rust module
    pub pkg: String,
    /// Leading path stripped from every walked file
    pub prefix: String,
    /// Regex matched against slash paths; matches are skipped
    pub ignore: Option<String>,
    /// Artifact flavour
    pub format: ArtifactFormat,
    /// Record file modification times
    pub include_modtime: bool,
}

impl Default for PackOptions {
    fn default() -> Self {
        PackOptions {
            output: None,
            pkg: "main".to_string(),
            prefix: String::new(),
            ignore: None,
            format: ArtifactFormat::default(),
            include_modtime: false,
        }
    }
}

/// Pack `roots` and render the artifact as a string
pub fn pack_assets(roots: &[PathBuf], options: &PackOptions) -> Result<String> {
    if roots.is_empty() {
        return Err(BundleError::Generic(
            "At least one input path is required".to_string(),
        ));
    }

    let config = PackConfig::new(
        &options.prefix,
        options.ignore.as_deref(),
        options.include_modtime,
    )?;
    let bundle = packer::pack(roots, &config)?;
    packer::emitter::render(&bundle, options.format, &options.pkg)
}

/// Write an artifact atomically to `output`, or to stdout
pub fn write_artifact(artifact: &str, output: Option<&Path>) -> Result<()> {
    let Some(output) = output else {
        let mut stdout = std::io::stdout().lock();
        stdout
            .write_all(artifact.as_bytes())
            .and_then(|()| stdout.flush())
            .map_err(|e| BundleError::io("<stdout>", e))?;
        return Ok(());
    };

    let parent = match output.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let mut temp = tempfile::NamedTempFile::new_in(parent).map_err(|e| BundleError::io(parent, e))?;
    temp.write_all(artifact.as_bytes())
        .and_then(|()| temp.as_file().sync_all())
        .map_err(|e| BundleError::io(temp.path(), e))?;
    temp.persist(output)
        .map_err(|e| BundleError::io(output, e.error))?;

    debug!("💾 Wrote {} bytes to {}", artifact.len(), output.display());
    Ok(())
}

/// Pack `roots` and write the artifact where `options.output` says
pub fn build_bundle(roots: &[PathBuf], options: &PackOptions) -> Result<()> {
    let timer = Instant::now();
    let artifact = pack_assets(roots, options)?;
    write_artifact(&artifact, options.output.as_deref())?;
    info!(
        "✅ Bundle written to {} in {:?}",
        options
            .output
            .as_ref()
            .map_or_else(|| "stdout".to_string(), |p| p.display().to_string()),
        timer.elapsed()
    );
    Ok(())
}
