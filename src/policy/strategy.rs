//! Selection strategies
//!
//! A strategy chooses which of the published versions counts as the update
//! for a dependency. Strategies are pure: they never touch the caller's slice.

use crate::domain::Version;
use crate::error::DependencyError;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Rule choosing the version a dependency should move to
pub trait SelectionStrategy: Send + Sync {
    /// Select a version from `available` for a module pinned at `current`
    fn select(&self, current: &Version, available: &[Version]) -> Result<Version, DependencyError>;
}

/// Built-in strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
pub enum Strategy {
    /// Greatest version overall, including major upgrades and pre-releases
    #[default]
    #[value(name = "latest")]
    #[serde(rename = "latest")]
    LatestOverall,
    /// Greatest version sharing the current major version
    #[value(name = "latest-major")]
    #[serde(rename = "latest-major")]
    LatestWithinMajor,
    /// Greatest version without a pre-release part (excludes pseudo-versions)
    #[value(name = "latest-stable")]
    #[serde(rename = "latest-stable")]
    LatestStableOnly,
}

impl Strategy {
    /// Name used in configuration and on the command line
    pub fn name(&self) -> &'static str {
        match self {
            Strategy::LatestOverall => "latest",
            Strategy::LatestWithinMajor => "latest-major",
            Strategy::LatestStableOnly => "latest-stable",
        }
    }

    /// Parse a strategy name as accepted in configuration
    pub fn from_name(name: &str) -> Option<Self> {
        <Self as ValueEnum>::from_str(name.trim(), true).ok()
    }

    fn accepts(&self, current: &Version, candidate: &Version) -> bool {
        match self {
            Strategy::LatestOverall => true,
            Strategy::LatestWithinMajor => candidate.major() == current.major(),
            Strategy::LatestStableOnly => !candidate.is_prerelease(),
        }
    }
}

impl SelectionStrategy for Strategy {
    fn select(&self, current: &Version, available: &[Version]) -> Result<Version, DependencyError> {
        available
            .iter()
            .filter(|candidate| self.accepts(current, candidate))
            .max()
            .cloned()
            .ok_or(DependencyError::NoVersionAvailable)
    }
}

impl<F> SelectionStrategy for F
where
    F: Fn(&Version, &[Version]) -> Result<Version, DependencyError> + Send + Sync,
{
    fn select(&self, current: &Version, available: &[Version]) -> Result<Version, DependencyError> {
        self(current, available)
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn versions(list: &[&str]) -> Vec<Version> {
        list.iter().map(|s| Version::parse(s).unwrap()).collect()
    }

    fn v(s: &str) -> Version {
        Version::parse(s).unwrap()
    }

    #[rstest]
    #[case(Strategy::LatestOverall, "v1.0.0", &["v1.2.0", "v1.3.0", "v1.2.5"], "v1.3.0")]
    #[case(Strategy::LatestOverall, "v1.0.0", &["v1.9.0", "v2.0.0", "v2.1.0-rc.1"], "v2.1.0-rc.1")]
    #[case(Strategy::LatestWithinMajor, "v1.0.0", &["v1.9.0", "v2.0.0", "v1.10.1"], "v1.10.1")]
    #[case(Strategy::LatestWithinMajor, "v2.0.0+incompatible", &["v1.9.0", "v2.3.0+incompatible", "v3.0.0+incompatible"], "v2.3.0+incompatible")]
    #[case(Strategy::LatestStableOnly, "v1.0.0", &["v1.1.0", "v1.2.0-beta.1"], "v1.1.0")]
    #[case(Strategy::LatestStableOnly, "v0.0.0-20210101120000-abcdef123456", &["v0.0.0-20230101120000-abcdef123456", "v0.1.0"], "v0.1.0")]
    fn test_select(
        #[case] strategy: Strategy,
        #[case] current: &str,
        #[case] available: &[&str],
        #[case] expected: &str,
    ) {
        let selected = strategy.select(&v(current), &versions(available)).unwrap();
        assert_eq!(selected.as_str(), expected);
    }

    #[rstest]
    #[case(Strategy::LatestOverall, &[])]
    #[case(Strategy::LatestWithinMajor, &["v2.0.0", "v3.0.0"])]
    #[case(Strategy::LatestStableOnly, &["v1.1.0-rc.1"])]
    fn test_select_nothing_eligible(#[case] strategy: Strategy, #[case] available: &[&str]) {
        let result = strategy.select(&v("v1.0.0"), &versions(available));
        assert_eq!(result, Err(DependencyError::NoVersionAvailable));
    }

    #[test]
    fn test_select_does_not_reorder_input() {
        let available = versions(&["v1.3.0", "v1.0.0", "v1.2.0"]);
        let before = available.clone();
        let _ = Strategy::LatestOverall.select(&v("v1.0.0"), &available);
        let order: Vec<&str> = available.iter().map(|v| v.as_str()).collect();
        let expected: Vec<&str> = before.iter().map(|v| v.as_str()).collect();
        assert_eq!(order, expected);
    }

    #[test]
    fn test_closure_strategy() {
        let pin_current = |current: &Version, _: &[Version]| -> Result<Version, DependencyError> {
            Ok(current.clone())
        };
        let selected = pin_current
            .select(&v("v1.0.0"), &versions(&["v2.0.0"]))
            .unwrap();
        assert_eq!(selected.as_str(), "v1.0.0");
    }

    #[test]
    fn test_from_name() {
        assert_eq!(Strategy::from_name("latest"), Some(Strategy::LatestOverall));
        assert_eq!(
            Strategy::from_name("latest-major"),
            Some(Strategy::LatestWithinMajor)
        );
        assert_eq!(
            Strategy::from_name(" LATEST-STABLE "),
            Some(Strategy::LatestStableOnly)
        );
        assert_eq!(Strategy::from_name("newest"), None);
    }

    #[test]
    fn test_deserialize() {
        #[derive(Deserialize)]
        struct Wrapper {
            strategy: Strategy,
        }
        let parsed: Wrapper = toml::from_str("strategy = \"latest-major\"").unwrap();
        assert_eq!(parsed.strategy, Strategy::LatestWithinMajor);
    }

    #[test]
    fn test_default_and_display() {
        assert_eq!(Strategy::default(), Strategy::LatestOverall);
        assert_eq!(Strategy::LatestStableOnly.to_string(), "latest-stable");
    }
}
