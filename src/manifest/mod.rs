//! go.mod location, parsing, loading and rewriting
//!
//! This module provides functionality to:
//! - Locate the manifest for a directory or file path
//! - Parse require entries from go.mod
//! - Resolve available versions for each dependency concurrently
//! - Rewrite pinned versions atomically, one dependency at a time

mod detector;
mod go_mod;
mod loader;
mod writer;

pub use detector::{locate_manifest, manifest_dir, read_manifest, MANIFEST_FILE_NAME};
pub use go_mod::{GoMod, GoModError, GoModParser, Requirement};
pub use loader::{ManifestLoader, DEFAULT_CONCURRENCY};
pub use writer::{write_atomic, ManifestWriter, SkipReason, UpdateOutcome, WriteResult};
