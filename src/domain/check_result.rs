//! Per-dependency resolution results

use super::Version;
use crate::error::DependencyError;
use serde::Serialize;
use std::collections::BTreeMap;

/// Mapping from module path to its result, one entry per distinct dependency
pub type ResolutionMap = BTreeMap<String, CheckResult>;

/// Outcome of resolving a single dependency.
///
/// At most one of `latest_version` and `error` is set. `latest_version` is set
/// even when it equals `local_version`; compare the two to find updates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckResult {
    pub local_version: Version,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_version: Option<Version>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<DependencyError>,
}

impl CheckResult {
    /// A successful selection
    pub fn selected(local_version: Version, latest_version: Version) -> Self {
        Self {
            local_version,
            latest_version: Some(latest_version),
            error: None,
        }
    }

    /// A recorded per-dependency failure or skip
    pub fn failed(local_version: Version, error: DependencyError) -> Self {
        Self {
            local_version,
            latest_version: None,
            error: Some(error),
        }
    }

    /// True when the selected version is newer than the pinned one
    pub fn has_update(&self) -> bool {
        self.latest_version
            .as_ref()
            .is_some_and(|latest| *latest > self.local_version)
    }

    /// True when the selection equals the pinned version
    pub fn is_up_to_date(&self) -> bool {
        self.latest_version
            .as_ref()
            .is_some_and(|latest| *latest == self.local_version)
    }

    pub fn is_ignored(&self) -> bool {
        matches!(self.error, Some(DependencyError::ModuleIgnored))
    }

    /// True when the dependency carries an error other than being ignored
    pub fn is_failure(&self) -> bool {
        self.error.as_ref().is_some_and(DependencyError::is_failure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> Version {
        Version::parse(s).unwrap()
    }

    #[test]
    fn test_selected_with_update() {
        let result = CheckResult::selected(v("v1.0.0"), v("v1.2.0"));
        assert!(result.has_update());
        assert!(!result.is_up_to_date());
        assert!(result.error.is_none());
    }

    #[test]
    fn test_selected_up_to_date() {
        let result = CheckResult::selected(v("v2.1.0"), v("v2.1.0"));
        assert!(!result.has_update());
        assert!(result.is_up_to_date());
    }

    #[test]
    fn test_selected_older_is_not_an_update() {
        let result = CheckResult::selected(v("v1.3.0"), v("v1.2.0"));
        assert!(!result.has_update());
        assert!(!result.is_up_to_date());
    }

    #[test]
    fn test_failed() {
        let result = CheckResult::failed(v("v1.0.0"), DependencyError::ModuleIgnored);
        assert!(result.latest_version.is_none());
        assert!(result.is_ignored());
        assert!(!result.is_failure());
        assert!(!result.has_update());

        let result = CheckResult::failed(v("v1.0.0"), DependencyError::NoVersionAvailable);
        assert!(result.is_failure());
    }

    #[test]
    fn test_serialize_skips_absent_fields() {
        let json = serde_json::to_value(CheckResult::selected(v("v1.0.0"), v("v1.1.0"))).unwrap();
        assert_eq!(json["local_version"], "v1.0.0");
        assert_eq!(json["latest_version"], "v1.1.0");
        assert!(json.get("error").is_none());
    }
}
