//! Check result summary types
//!
//! Provides counts over a ResolutionMap and the semantic kind of each update.

use super::{ResolutionMap, Version};
use serde::Serialize;
use std::fmt;

/// Semantic version change between a pinned and a selected version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VersionChangeType {
    /// Same major, minor and patch (pre-release or pseudo-version moves)
    Prerelease,
    Patch,
    Minor,
    /// Major version change (breaking)
    Major,
}

impl VersionChangeType {
    /// Determine the change type between two versions
    pub fn between(old: &Version, new: &Version) -> Self {
        if old.major() != new.major() {
            VersionChangeType::Major
        } else if old.minor() != new.minor() {
            VersionChangeType::Minor
        } else if old.patch() != new.patch() {
            VersionChangeType::Patch
        } else {
            VersionChangeType::Prerelease
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            VersionChangeType::Major => "major",
            VersionChangeType::Minor => "minor",
            VersionChangeType::Patch => "patch",
            VersionChangeType::Prerelease => "pre",
        }
    }
}

impl fmt::Display for VersionChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Counts over the results of one check
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CheckSummary {
    /// Total number of distinct dependencies
    pub total: usize,
    /// Dependencies with a newer selected version
    pub outdated: usize,
    pub up_to_date: usize,
    pub ignored: usize,
    /// Dependencies whose resolution failed
    pub failed: usize,
    pub major: usize,
    pub minor: usize,
    pub patch: usize,
}

impl CheckSummary {
    pub fn from_results(results: &ResolutionMap) -> Self {
        let mut summary = Self {
            total: results.len(),
            ..Self::default()
        };

        for result in results.values() {
            if result.is_ignored() {
                summary.ignored += 1;
            } else if result.is_failure() {
                summary.failed += 1;
            } else if let (true, Some(latest)) = (result.has_update(), &result.latest_version) {
                summary.outdated += 1;
                match VersionChangeType::between(&result.local_version, latest) {
                    VersionChangeType::Major => summary.major += 1,
                    VersionChangeType::Minor => summary.minor += 1,
                    VersionChangeType::Patch | VersionChangeType::Prerelease => summary.patch += 1,
                }
            } else {
                summary.up_to_date += 1;
            }
        }

        summary
    }

    /// Returns true if any dependency carried a real error
    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}
