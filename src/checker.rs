//! Version resolution engine
//!
//! This module provides:
//! - Workflow coordination: locate → load (concurrent lookups) → ignore → select
//! - Cancellation of a whole run
//! - The update flow: check, then rewrite pins

use crate::cancel::Cancellation;
use crate::domain::{CheckResult, DependencyRecord, ResolutionMap};
use crate::error::{CheckError, DependencyError};
use crate::manifest::{locate_manifest, ManifestLoader, ManifestWriter, WriteResult};
use crate::policy::{IgnorePolicy, SelectionStrategy, Strategy};
use crate::registry::VersionSource;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Resolves every dependency of a go.mod to a CheckResult
pub struct Checker {
    loader: ManifestLoader,
    ignore: IgnorePolicy,
    strategy: Arc<dyn SelectionStrategy>,
}

impl Checker {
    /// Create a checker with the default `latest` strategy
    pub fn new(source: Arc<dyn VersionSource>, ignore: IgnorePolicy) -> Self {
        Self {
            loader: ManifestLoader::new(source),
            ignore,
            strategy: Arc::new(Strategy::default()),
        }
    }

    /// Replace the selection strategy
    pub fn with_strategy(mut self, strategy: impl SelectionStrategy + 'static) -> Self {
        self.strategy = Arc::new(strategy);
        self
    }

    /// Set the maximum number of simultaneous version lookups
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.loader = self.loader.with_concurrency(concurrency);
        self
    }

    /// Check the manifest at `location` (directory, file, or `None` for `./go.mod`).
    ///
    /// Manifest problems and cancellation fail the whole call; every other
    /// problem is recorded on the affected dependency.
    pub async fn check(
        &self,
        location: Option<&Path>,
        cancel: &Cancellation,
    ) -> Result<ResolutionMap, CheckError> {
        let path = locate_manifest(location)?;

        let records = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(CheckError::Cancelled),
            loaded = self.loader.load(&path) => loaded?,
        };

        Ok(self.resolve(records))
    }

    /// Apply ignore policy and selection strategy to loaded records
    pub fn resolve(&self, records: Vec<DependencyRecord>) -> ResolutionMap {
        let mut results = ResolutionMap::new();

        for record in records {
            let result = self.resolve_one(&record);
            debug!(module = %record.path, ?result, "resolved");
            results.insert(record.path, result);
        }

        results
    }

    fn resolve_one(&self, record: &DependencyRecord) -> CheckResult {
        let local = record.local_version.clone();

        if self.ignore.is_ignored(&record.path) {
            return CheckResult::failed(local, DependencyError::ModuleIgnored);
        }

        if let Some(error) = &record.lookup_error {
            return CheckResult::failed(local, error.clone());
        }

        match self
            .strategy
            .select(&record.local_version, &record.available_versions)
        {
            Ok(latest) => CheckResult::selected(local, latest),
            Err(error) => CheckResult::failed(local, error),
        }
    }
}

/// Checks a manifest and rewrites the pins that have newer versions
pub struct Updater {
    checker: Checker,
    writer: ManifestWriter,
}

impl Updater {
    pub fn new(checker: Checker, dry_run: bool) -> Self {
        Self {
            checker,
            writer: ManifestWriter::new(dry_run),
        }
    }

    /// Run a check and apply its results to the same manifest
    pub async fn update(
        &self,
        location: Option<&Path>,
        cancel: &Cancellation,
    ) -> Result<(ResolutionMap, WriteResult), CheckError> {
        let path = locate_manifest(location)?;
        let results = self.checker.check(Some(&path), cancel).await?;

        let writer = self.writer;
        let cancel = cancel.clone();
        let (results, written) = tokio::task::spawn_blocking(move || {
            let written = writer.apply(&path, &results, &cancel);
            (results, written)
        })
        .await
        .map_err(|e| match e.try_into_panic() {
            Ok(panic) => std::panic::resume_unwind(panic),
            Err(_) => CheckError::Cancelled,
        })?;
        Ok((results, written?))
    }
}
