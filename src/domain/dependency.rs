//! Dependency records produced by the manifest loader

use super::Version;
use crate::error::DependencyError;
use serde::Serialize;
use std::fmt;

/// One `require` entry of go.mod together with the versions published for it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependencyRecord {
    /// Module path, unique within a manifest
    pub path: String,
    /// Version pinned in go.mod
    pub local_version: Version,
    /// Versions published by the version source, ascending
    pub available_versions: Vec<Version>,
    /// Marked `// indirect` in go.mod
    pub indirect: bool,
    /// Lookup failure deferred to the checker
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lookup_error: Option<DependencyError>,
}

impl DependencyRecord {
    /// Creates a record whose lookup succeeded
    pub fn new(path: impl Into<String>, local_version: Version, available: Vec<Version>) -> Self {
        let mut available_versions = available;
        available_versions.sort();
        available_versions.dedup();

        Self {
            path: path.into(),
            local_version,
            available_versions,
            indirect: false,
            lookup_error: None,
        }
    }

    /// Creates a record whose lookup failed; it carries no versions
    pub fn failed(path: impl Into<String>, local_version: Version, error: DependencyError) -> Self {
        Self {
            path: path.into(),
            local_version,
            available_versions: Vec::new(),
            indirect: false,
            lookup_error: Some(error),
        }
    }

    /// Sets the indirect marker (builder pattern)
    pub fn with_indirect(mut self, indirect: bool) -> Self {
        self.indirect = indirect;
        self
    }
}

impl fmt::Display for DependencyRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let indirect = if self.indirect { " (indirect)" } else { "" };
        write!(f, "{}@{}{}", self.path, self.local_version, indirect)
    }
}
