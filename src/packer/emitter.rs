//! Registry emission: Rust source module or JSON manifest
//!
//! Files come first, then directories, each sorted by key. The same input
//! therefore renders to byte-identical output regardless of walk order.

use std::fmt::{self, Write as _};

use log::debug;
use regex::Regex;

use super::{PackedBundle, PackedDir, PackedFile};
use crate::exceptions::{BundleError, Result};
use crate::registry::{EntryDescriptor, RegistryManifest};
use crate::version::VERSION;

/// Artifact flavours the emitter can render
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ArtifactFormat {
    /// Rust module with a static entry table and accessor functions
    #[default]
    Rust,
    /// JSON manifest loadable with `Registry::from_json`
    Json,
}

/// Descriptors for every entry, in emission order
pub fn descriptors(bundle: &PackedBundle) -> Vec<EntryDescriptor> {
    let file_entries = sorted_files(bundle).into_iter().map(|file| EntryDescriptor {
        path: file.key.clone().into(),
        local: file.local.clone().into(),
        is_dir: false,
        size: file.size,
        modtime: file.modtime,
        payload: file.payload.joined().into(),
    });
    let dir_entries = sorted_dirs(bundle).into_iter().map(|dir| EntryDescriptor {
        path: dir.key.clone().into(),
        local: dir.local.clone().into(),
        is_dir: true,
        size: 0,
        modtime: None,
        payload: "".into(),
    });

    file_entries.chain(dir_entries).collect()
}

/// Render the artifact in the requested format
pub fn render(bundle: &PackedBundle, format: ArtifactFormat, pkg: &str) -> Result<String> {
    let artifact = match format {
        ArtifactFormat::Rust => render_rust(bundle, pkg)?,
        ArtifactFormat::Json => render_json(bundle)?,
    };
    debug!("📝 Rendered {:?} artifact, {} bytes", format, artifact.len());
    Ok(artifact)
}

/// Pretty-printed JSON manifest with a trailing newline
pub fn render_json(bundle: &PackedBundle) -> Result<String> {
    let manifest = RegistryManifest::new(descriptors(bundle));
    let mut json = serde_json::to_string_pretty(&manifest)?;
    json.push('\n');
    Ok(json)
}

/// Rust module exposing the bundle under `pub mod <pkg>`
pub fn render_rust(bundle: &PackedBundle, pkg: &str) -> Result<String> {
    validate_module_name(pkg)?;

    let count = bundle.files.len() + bundle.dirs.len();
    let mut out = module_header(pkg, count);
    write_entries(&mut out, bundle)
        .map_err(|e| BundleError::Generic(format!("Failed to render module {pkg}: {e}")))?;
    out.push_str(MODULE_FOOTER);
    Ok(out)
}

fn write_entries(out: &mut String, bundle: &PackedBundle) -> fmt::Result {
    for file in sorted_files(bundle) {
        writeln!(out, "        EntryDescriptor::file(")?;
        writeln!(out, "            {:?},", file.key)?;
        writeln!(out, "            {:?},", file.local)?;
        writeln!(out, "            {},", file.size)?;
        match file.modtime {
            Some(secs) => writeln!(out, "            Some({secs}),")?,
            None => writeln!(out, "            None,")?,
        }
        writeln!(out, "            concat!(")?;
        for chunk in file.payload.chunks() {
            writeln!(out, "                {chunk:?},")?;
        }
        writeln!(out, "            ),")?;
        writeln!(out, "        ),")?;
    }

    for dir in sorted_dirs(bundle) {
        writeln!(
            out,
            "        EntryDescriptor::dir({:?}, {:?}),",
            dir.key, dir.local
        )?;
    }
    Ok(())
}

fn sorted_files(bundle: &PackedBundle) -> Vec<&PackedFile> {
    let mut files: Vec<_> = bundle.files.iter().collect();
    files.sort_by(|a, b| a.key.cmp(&b.key));
    files
}

fn sorted_dirs(bundle: &PackedBundle) -> Vec<&PackedDir> {
    let mut dirs: Vec<_> = bundle.dirs.iter().collect();
    dirs.sort_by(|a, b| a.key.cmp(&b.key));
    dirs
}

/// Strict and reserved keywords, none of which can name a module
const KEYWORDS: &[&str] = &[
    "Self", "abstract", "as", "async", "await", "become", "box", "break", "const", "continue",
    "crate", "do", "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if",
    "impl", "in", "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv",
    "pub", "ref", "return", "self", "static", "struct", "super", "trait", "true", "try", "type",
    "typeof", "unsafe", "unsized", "use", "virtual", "where", "while", "yield",
];

fn validate_module_name(pkg: &str) -> Result<()> {
    let ident = Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$")?;
    if pkg == "_" || !ident.is_match(pkg) {
        return Err(BundleError::Generic(format!(
            "Invalid module name {pkg:?}: must be a Rust identifier"
        )));
    }
    if KEYWORDS.contains(&pkg) {
        return Err(BundleError::Generic(format!(
            "Invalid module name {pkg:?}: reserved Rust keyword"
        )));
    }
    Ok(())
}

fn module_header(pkg: &str, count: usize) -> String {
    format!(
        r#"// Code generated by bundlefs {VERSION}. DO NOT EDIT.

#[allow(dead_code)]
pub mod {pkg} {{
    use std::sync::{{Arc, LazyLock}};

    use bundlefs::{{Bundle, EntryDescriptor, ScopedFs, VirtualFs}};

    /// Packed entries, files then directories, sorted by path
    pub static ENTRIES: [EntryDescriptor; {count}] = [
"#
    )
}

const MODULE_FOOTER: &str = r#"    ];

    /// Registry over [`ENTRIES`], built on first use
    pub static BUNDLE: LazyLock<Bundle> = LazyLock::new(|| match Bundle::from_static(&ENTRIES) {
        Ok(bundle) => bundle,
        Err(e) => panic!("embedded registry is invalid: {e}"),
    });

    /// Embedded assets, or the original files on disk when `use_local` is true
    pub fn fs(use_local: bool) -> Box<dyn VirtualFs> {
        BUNDLE.fs(use_local)
    }

    /// Assets below the directory `name`
    pub fn dir(use_local: bool, name: &str) -> ScopedFs {
        BUNDLE.dir(use_local, name)
    }

    /// Contents of the asset at `name`
    pub fn read_bytes(use_local: bool, name: &str) -> bundlefs::Result<Arc<[u8]>> {
        BUNDLE.read_bytes(use_local, name)
    }

    /// Same as `read_bytes`, but panics if the asset is missing or corrupt
    pub fn must_read_bytes(use_local: bool, name: &str) -> Arc<[u8]> {
        BUNDLE.must_read_bytes(use_local, name)
    }

    /// Contents of the text asset at `name`
    pub fn read_string(use_local: bool, name: &str) -> bundlefs::Result<String> {
        BUNDLE.read_string(use_local, name)
    }

    /// Same as `read_string`, but panics if the asset is missing or corrupt
    pub fn must_read_string(use_local: bool, name: &str) -> String {
        BUNDLE.must_read_string(use_local, name)
    }
}
"#;
