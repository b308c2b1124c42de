//! Manifest loading with concurrent version lookups
//!
//! Reads go.mod, then fans out one version-source lookup per distinct module
//! on a bounded pool of tokio tasks. Results are collected by a single owner
//! and returned in manifest order.

use crate::domain::{DependencyRecord, Version};
use crate::error::{CheckError, DependencyError};
use crate::manifest::{read_manifest, GoModParser, Requirement};
use crate::registry::VersionSource;
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, warn};

/// Default number of simultaneous version lookups
pub const DEFAULT_CONCURRENCY: usize = 10;

/// Turns a go.mod into dependency records with their available versions
pub struct ManifestLoader {
    source: Arc<dyn VersionSource>,
    concurrency: usize,
}

impl ManifestLoader {
    /// Create a loader with the default concurrency limit
    pub fn new(source: Arc<dyn VersionSource>) -> Self {
        Self {
            source,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }

    /// Set the maximum number of outstanding lookups (at least 1)
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Parse the manifest at `path` and resolve available versions.
    ///
    /// Fails only for manifest-level problems; lookup failures are recorded on
    /// the affected record.
    pub async fn load(&self, path: &Path) -> Result<Vec<DependencyRecord>, CheckError> {
        let content = read_manifest(path)?;
        let go_mod = GoModParser
            .parse(&content)
            .map_err(|e| CheckError::malformed(path, e.line, e.message))?;

        let requirements = distinct(go_mod.requirements);
        debug!(
            module = %go_mod.module,
            dependencies = requirements.len(),
            "parsed manifest"
        );

        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let mut tasks = JoinSet::new();

        for (index, requirement) in requirements.iter().enumerate() {
            let source = Arc::clone(&self.source);
            let semaphore = Arc::clone(&semaphore);
            let path = requirement.path.clone();
            let local = requirement.version.clone();
            let indirect = requirement.indirect;

            tasks.spawn(async move {
                let _permit = semaphore.acquire_owned().await.ok();
                let record = fetch_record(source.as_ref(), path, local).await;
                (index, record.with_indirect(indirect))
            });
        }

        let mut collected: Vec<Option<DependencyRecord>> = vec![None; requirements.len()];
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, record)) => collected[index] = Some(record),
                Err(e) => warn!("version lookup task failed: {}", e),
            }
        }

        // A task that panicked still yields a terminal record for its module.
        let records = requirements
            .into_iter()
            .zip(collected)
            .map(|(requirement, record)| {
                record.unwrap_or_else(|| {
                    DependencyRecord::failed(
                        requirement.path,
                        requirement.version,
                        DependencyError::source_unavailable("version lookup aborted"),
                    )
                    .with_indirect(requirement.indirect)
                })
            })
            .collect();

        Ok(records)
    }
}

/// Keep the first entry for each module path
fn distinct(requirements: Vec<Requirement>) -> Vec<Requirement> {
    let mut seen = HashSet::new();
    requirements
        .into_iter()
        .filter(|r| {
            let first = seen.insert(r.path.clone());
            if !first {
                warn!(module = %r.path, line = r.line, "duplicate require entry ignored");
            }
            first
        })
        .collect()
}

async fn fetch_record(source: &dyn VersionSource, path: String, local: Version) -> DependencyRecord {
    match source.list_versions(&path).await {
        Ok(versions) if versions.is_empty() => {
            // Modules without tagged releases only resolve through their latest pseudo-version.
            match source.current_version(&path).await {
                Ok(current) => DependencyRecord::new(path, local, vec![current]),
                Err(e) => {
                    debug!(module = %path, "no current version: {}", e);
                    DependencyRecord::new(path, local, Vec::new())
                }
            }
        }
        Ok(versions) => {
            debug!(module = %path, count = versions.len(), "fetched versions");
            DependencyRecord::new(path, local, versions)
        }
        Err(e) => {
            warn!(module = %path, source = source.name(), "version lookup failed: {}", e);
            DependencyRecord::failed(path, local, e.into())
        }
    }
}
