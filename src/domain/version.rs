//! Go module version values
//!
//! Go versions are `v`-prefixed semantic versions:
//! - Release: `v1.2.3`
//! - Prerelease: `v1.2.3-beta.1`
//! - Pseudo-version: `v0.0.0-20210101120000-abcdef123456`
//! - Pre-modules major: `v2.0.0+incompatible`

use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// A semantic version as written in go.mod or reported by the proxy.
///
/// Ordering follows semantic-version precedence, so build metadata such as
/// `+incompatible` does not participate in comparisons. The original text is
/// kept so it can be written back unchanged.
#[derive(Debug, Clone)]
pub struct Version {
    raw: String,
    semver: semver::Version,
}

/// Error returned when a string is not a Go semantic version
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid version '{input}': {message}")]
pub struct ParseVersionError {
    input: String,
    message: String,
}

impl Version {
    /// Parse a version, accepting an optional leading `v`
    pub fn parse(input: &str) -> Result<Self, ParseVersionError> {
        let trimmed = input.trim();
        let bare = trimmed.strip_prefix('v').unwrap_or(trimmed);
        let semver = semver::Version::parse(bare).map_err(|e| ParseVersionError {
            input: input.to_string(),
            message: e.to_string(),
        })?;

        let raw = if trimmed.starts_with('v') {
            trimmed.to_string()
        } else {
            format!("v{}", trimmed)
        };

        Ok(Self { raw, semver })
    }

    /// The version text, always with its `v` prefix
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn major(&self) -> u64 {
        self.semver.major
    }

    pub fn minor(&self) -> u64 {
        self.semver.minor
    }

    pub fn patch(&self) -> u64 {
        self.semver.patch
    }

    /// Pre-release versions, including Go pseudo-versions
    pub fn is_prerelease(&self) -> bool {
        !self.semver.pre.is_empty()
    }

    /// Pseudo-versions reference a commit rather than a tag
    pub fn is_pseudo(&self) -> bool {
        let pre = self.semver.pre.as_str();
        // Last two dash-separated segments are a 14-digit timestamp and a 12-hex revision.
        let mut parts = pre.rsplit('-');
        let revision = parts.next().unwrap_or("");
        let stamp = parts
            .next()
            .map(|s| s.rsplit('.').next().unwrap_or(s))
            .unwrap_or("");
        revision.len() == 12
            && revision.chars().all(|c| c.is_ascii_hexdigit())
            && stamp.len() == 14
            && stamp.chars().all(|c| c.is_ascii_digit())
    }

    pub fn is_incompatible(&self) -> bool {
        self.semver.build.as_str() == "incompatible"
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.semver.cmp_precedence(&other.semver)
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl FromStr for Version {
    type Err = ParseVersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Version::parse(s)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl Serialize for Version {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}
