//! Ignore policy
//!
//! Holds the set of module paths excluded from version selection.

use std::collections::HashSet;

/// Modules that must not be resolved or updated.
///
/// Built once from configuration and read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IgnorePolicy {
    modules: HashSet<String>,
}

impl IgnorePolicy {
    /// Create an empty policy (nothing ignored)
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a policy from module paths; blank entries are dropped
    pub fn from_modules<I, S>(modules: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let modules = modules
            .into_iter()
            .map(|m| m.as_ref().trim().to_string())
            .filter(|m| !m.is_empty())
            .collect();
        Self { modules }
    }

    /// Check if a module path is ignored
    pub fn is_ignored(&self, path: &str) -> bool {
        self.modules.contains(path)
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<S> for IgnorePolicy {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::from_modules(iter)
    }
}
