//! bundlefs - pack a file tree into source code and serve it back
//!
//! The packer walks input directories, compresses every file and emits a
//! registry (a Rust module or a JSON manifest). At runtime a [`Bundle`]
//! exposes that registry as a read-only [`VirtualFs`], backed either by the
//! embedded payloads or by the original files on disk.

// Enforce strict code quality and reliability
#![deny(
    // Safety
    unsafe_code,

    // Correctness
    missing_debug_implementations,

    // Future compatibility
    future_incompatible,

    // Rust 2018 idioms
    rust_2018_idioms,
)]
#![warn(
    // Documentation
    missing_docs,

    // Error handling best practices
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::unimplemented,
    clippy::todo,

    // Performance
    clippy::inefficient_to_string,
    clippy::large_enum_variant,

    // Code clarity and maintainability
    clippy::cognitive_complexity,
    clippy::type_complexity,

    // Best practices
    clippy::clone_on_ref_ptr,
    clippy::wildcard_imports,
    clippy::enum_glob_use,
    clippy::if_not_else,
    clippy::single_match_else,
    clippy::needless_continue,
    clippy::explicit_iter_loop,
    clippy::explicit_into_iter_loop,
)]
#![allow(missing_docs)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

pub mod api;
pub mod codec;
pub mod exceptions;
pub mod exit_codes;
pub mod logger;
pub mod packer;
pub mod paths;
pub mod registry;
pub mod utils;
pub mod version;
pub mod vfs;

// Re-export main API functions
pub use api::{PackOptions, build_bundle, pack_assets};
pub use exceptions::{BundleError, Result};
pub use packer::ArtifactFormat;

// Runtime types referenced by generated modules
pub use registry::{Entry, EntryDescriptor, Registry};
pub use vfs::{Bundle, FileInfo, FileMode, ScopedFs, VfsFile, VirtualFs};
