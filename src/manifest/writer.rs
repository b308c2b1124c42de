//! Manifest rewriting
//!
//! This module provides:
//! - ManifestWriter applying selected versions from a ResolutionMap to go.mod
//! - One atomic write per dependency (temp file + rename)
//! - Dry-run mode support (no actual file modifications)
//! - Per-dependency failure recording with continuation

use crate::cancel::Cancellation;
use crate::domain::{CheckResult, ResolutionMap, Version};
use crate::error::{CheckError, DependencyError};
use crate::manifest::{manifest_dir, read_manifest, GoModParser};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

/// Reason a dependency was left untouched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Listed in `ignored_modules`
    Ignored,
    /// Resolution recorded an error for it
    Errored,
    /// Selected version equals the pinned one
    UpToDate,
    /// Selected version is older than the pinned one
    NotNewer,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Ignored => write!(f, "ignored"),
            SkipReason::Errored => write!(f, "check failed"),
            SkipReason::UpToDate => write!(f, "up to date"),
            SkipReason::NotNewer => write!(f, "pinned version is newer"),
        }
    }
}

/// What happened to a single dependency
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum UpdateOutcome {
    /// Pin rewritten (or would be, in dry-run mode)
    Updated { from: Version, to: Version },
    Skipped { reason: SkipReason },
    Failed { error: DependencyError },
}

/// Result of applying a ResolutionMap to a manifest file
#[derive(Debug, Serialize)]
pub struct WriteResult {
    /// Path to the manifest file
    pub path: PathBuf,
    /// Whether this was a dry run
    pub dry_run: bool,
    /// Outcome per module path
    pub outcomes: BTreeMap<String, UpdateOutcome>,
}

impl WriteResult {
    fn new(path: impl Into<PathBuf>, dry_run: bool) -> Self {
        Self {
            path: path.into(),
            dry_run,
            outcomes: BTreeMap::new(),
        }
    }

    /// Number of pins rewritten
    pub fn updates_applied(&self) -> usize {
        self.outcomes
            .values()
            .filter(|o| matches!(o, UpdateOutcome::Updated { .. }))
            .count()
    }

    /// Modules whose pin was rewritten, in map order
    pub fn updated_modules(&self) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter(|(_, o)| matches!(o, UpdateOutcome::Updated { .. }))
            .map(|(module, _)| module.as_str())
            .collect()
    }

    /// Number of pins that could not be rewritten
    pub fn updates_failed(&self) -> usize {
        self.outcomes
            .values()
            .filter(|o| matches!(o, UpdateOutcome::Failed { .. }))
            .count()
    }

    /// Returns true if the file on disk changed
    pub fn file_modified(&self) -> bool {
        !self.dry_run && self.updates_applied() > 0
    }

    /// Returns true if any errors occurred
    pub fn has_errors(&self) -> bool {
        self.updates_failed() > 0
    }
}

/// Writer for go.mod that applies selected versions
#[derive(Debug, Clone, Copy)]
pub struct ManifestWriter {
    /// Whether to run in dry-run mode (no file modifications)
    dry_run: bool,
}

impl ManifestWriter {
    /// Create a new ManifestWriter
    pub fn new(dry_run: bool) -> Self {
        Self { dry_run }
    }

    /// Create a ManifestWriter in dry-run mode
    pub fn dry_run() -> Self {
        Self { dry_run: true }
    }

    /// Check if this writer is in dry-run mode
    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Rewrite every pin in `results` that has a newer selection.
    ///
    /// Each dependency is an independent atomic write; a failure is recorded
    /// and the remaining dependencies are still attempted. Returns `Cancelled`
    /// if the signal fires, leaving already-written pins in place.
    pub fn apply(
        &self,
        path: &Path,
        results: &ResolutionMap,
        cancel: &Cancellation,
    ) -> Result<WriteResult, CheckError> {
        let mut write_result = WriteResult::new(path, self.dry_run);

        for (module, result) in results {
            if cancel.is_cancelled() {
                warn!(
                    updated = ?write_result.updated_modules(),
                    dry_run = self.dry_run,
                    "update interrupted, remaining dependencies left untouched"
                );
                return Err(CheckError::Cancelled);
            }

            let outcome = match plan(result) {
                Err(reason) => UpdateOutcome::Skipped { reason },
                Ok(to) => match self.apply_one(path, module, to) {
                    Ok(()) => UpdateOutcome::Updated {
                        from: result.local_version.clone(),
                        to: to.clone(),
                    },
                    Err(error) => {
                        warn!(module = %module, "failed to update: {}", error);
                        UpdateOutcome::Failed { error }
                    }
                },
            };

            write_result.outcomes.insert(module.clone(), outcome);
        }

        Ok(write_result)
    }

    fn apply_one(&self, path: &Path, module: &str, to: &Version) -> Result<(), DependencyError> {
        // Re-read per dependency so one failed rewrite never leaks into the next.
        let content =
            read_manifest(path).map_err(|e| DependencyError::write_failed(e.to_string()))?;
        let updated = GoModParser
            .update_version(&content, module, to)
            .map_err(|e| DependencyError::write_failed(e.message))?;

        if self.dry_run {
            debug!(module, to = %to, "dry-run, not writing");
            return Ok(());
        }

        write_atomic(path, &updated).map_err(|e| DependencyError::write_failed(e.to_string()))?;
        info!(module, to = %to, "updated pin");
        Ok(())
    }
}

/// Decide whether a result should be written, and to which version
fn plan(result: &CheckResult) -> Result<&Version, SkipReason> {
    match (&result.error, &result.latest_version) {
        (Some(DependencyError::ModuleIgnored), _) => Err(SkipReason::Ignored),
        (Some(_), _) | (None, None) => Err(SkipReason::Errored),
        (None, Some(latest)) if *latest == result.local_version => Err(SkipReason::UpToDate),
        (None, Some(latest)) if *latest < result.local_version => Err(SkipReason::NotNewer),
        (None, Some(latest)) => Ok(latest),
    }
}

/// Replace `path` with `content` via a temp file in the same directory
pub fn write_atomic(path: &Path, content: &str) -> io::Result<()> {
    let mut tmp = NamedTempFile::new_in(manifest_dir(path))?;
    tmp.write_all(content.as_bytes())?;
    tmp.as_file().sync_all()?;

    if let Ok(metadata) = fs::metadata(path) {
        fs::set_permissions(tmp.path(), metadata.permissions())?;
    }

    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
